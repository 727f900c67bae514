//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user
///
/// Created through password signup, verified phone login, or
/// Google OAuth. Password digest is absent for OAuth/phone users.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// SHA-256 hex digest of the password, None for OAuth/phone users
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public user representation returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

// =============================================================================
// Wedding
// =============================================================================

/// A wedding being planned
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wedding {
    pub id: String,
    pub couple_names: String,
    /// Primary wedding date (display string, e.g. "2026-11-21")
    pub date: String,
    pub city: String,
    pub haldi_date_time: Option<String>,
    pub sangeet_date_time: Option<String>,
    pub wedding_date_time: Option<String>,
    pub total_budget: i64,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Team Member
// =============================================================================

/// Role of a wedding team member
///
/// Values: owner, bride, groom, family_admin, helper
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    pub id: String,
    pub wedding_id: String,
    /// Linked user account, if the member has one
    pub user_id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Allowed team roles
pub const TEAM_ROLES: &[&str] = &["owner", "bride", "groom", "family_admin", "helper"];

// =============================================================================
// Guest
// =============================================================================

/// An invited guest
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Guest {
    pub id: String,
    pub wedding_id: String,
    pub name: String,
    pub phone: Option<String>,
    /// "bride" or "groom"
    pub side: String,
    /// invited, going, not_going, maybe
    pub rsvp_status: String,
    /// Additional people coming with this guest
    pub accompanying_count: i64,
}

/// Allowed RSVP statuses
pub const RSVP_STATUSES: &[&str] = &["invited", "going", "not_going", "maybe"];

// =============================================================================
// Timeline Event
// =============================================================================

/// A ceremony or event on the wedding timeline
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimelineEvent {
    pub id: String,
    pub wedding_id: String,
    pub title: String,
    pub date_time: String,
    pub venue: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Task
// =============================================================================

/// A planning task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: String,
    pub wedding_id: String,
    pub title: String,
    /// todo, in_progress, done
    pub status: String,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
}

/// Allowed task statuses
pub const TASK_STATUSES: &[&str] = &["todo", "in_progress", "done"];

// =============================================================================
// Budget Item
// =============================================================================

/// A budget line item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BudgetItem {
    pub id: String,
    pub wedding_id: String,
    pub category: String,
    pub description: Option<String>,
    /// Planned amount
    pub planned: i64,
    /// Actually spent amount
    pub actual: i64,
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// Guest headcounts by RSVP status, including accompanying guests
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GuestStats {
    pub total: i64,
    pub going: i64,
    pub not_going: i64,
    pub maybe: i64,
    pub pending: i64,
}

/// Task completion counts
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
}

/// Budget totals
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BudgetStats {
    pub total_budget: i64,
    pub total_spent: i64,
    pub total_planned: i64,
}

/// Aggregated dashboard statistics for a wedding
#[derive(Debug, Clone, Serialize)]
pub struct WeddingStats {
    pub guests: GuestStats,
    pub tasks: TaskStats,
    pub budget: BudgetStats,
}
