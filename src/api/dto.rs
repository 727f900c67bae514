//! Request payload types
//!
//! Deserialized JSON bodies for the planning endpoints. Update
//! payloads carry only the fields being changed; an update with no
//! fields set is a validation error at the handler.

use serde::Deserialize;

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneLoginRequest {
    pub phone: String,
    pub name: Option<String>,
}

// =============================================================================
// Weddings
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WeddingCreate {
    pub couple_names: String,
    pub date: String,
    pub city: String,
    pub haldi_date_time: Option<String>,
    pub sangeet_date_time: Option<String>,
    pub wedding_date_time: Option<String>,
    #[serde(default)]
    pub total_budget: i64,
    /// Optional override for the auto-created owner team member
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeddingUpdate {
    pub couple_names: Option<String>,
    pub date: Option<String>,
    pub city: Option<String>,
    pub haldi_date_time: Option<String>,
    pub sangeet_date_time: Option<String>,
    pub wedding_date_time: Option<String>,
    pub total_budget: Option<i64>,
}

impl WeddingUpdate {
    pub fn is_empty(&self) -> bool {
        self.couple_names.is_none()
            && self.date.is_none()
            && self.city.is_none()
            && self.haldi_date_time.is_none()
            && self.sangeet_date_time.is_none()
            && self.wedding_date_time.is_none()
            && self.total_budget.is_none()
    }
}

// =============================================================================
// Team Members
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TeamMemberCreate {
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamMemberUpdate {
    pub role: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl TeamMemberUpdate {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.name.is_none() && self.email.is_none()
    }
}

// =============================================================================
// Guests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GuestCreate {
    pub name: String,
    pub phone: Option<String>,
    pub side: String,
    #[serde(default = "default_rsvp_status")]
    pub rsvp_status: String,
    #[serde(default)]
    pub accompanying_count: i64,
}

fn default_rsvp_status() -> String {
    "invited".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub side: Option<String>,
    pub rsvp_status: Option<String>,
    pub accompanying_count: Option<i64>,
}

impl GuestUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.side.is_none()
            && self.rsvp_status.is_none()
            && self.accompanying_count.is_none()
    }
}

// =============================================================================
// Timeline Events
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TimelineEventCreate {
    pub title: String,
    pub date_time: String,
    pub venue: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineEventUpdate {
    pub title: Option<String>,
    pub date_time: Option<String>,
    pub venue: Option<String>,
    pub notes: Option<String>,
}

impl TimelineEventUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date_time.is_none()
            && self.venue.is_none()
            && self.notes.is_none()
    }
}

// =============================================================================
// Tasks
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(default = "default_task_status")]
    pub status: String,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
}

fn default_task_status() -> String {
    "todo".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.assigned_to.is_none()
    }
}

// =============================================================================
// Budget Items
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct BudgetItemCreate {
    pub category: String,
    pub description: Option<String>,
    #[serde(default)]
    pub planned: i64,
    #[serde(default)]
    pub actual: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct BudgetItemUpdate {
    pub category: Option<String>,
    pub description: Option<String>,
    pub planned: Option<i64>,
    pub actual: Option<i64>,
}

impl BudgetItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.description.is_none()
            && self.planned.is_none()
            && self.actual.is_none()
    }
}
