//! SQLite database operations
//!
//! All database access goes through this module. The rest of the
//! application only sees `Database`, so the backing store can move
//! to a hosted Postgres without touching handlers.

use sqlx::{Pool, QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;

use super::models::*;
use crate::api::dto::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    /// Cheap liveness probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = ?")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, password, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password)
        .bind(&user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Weddings
    // =========================================================================

    pub async fn get_wedding(&self, id: &str) -> Result<Option<Wedding>, AppError> {
        let wedding = sqlx::query_as::<_, Wedding>("SELECT * FROM weddings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(wedding)
    }

    pub async fn get_weddings_by_owner(&self, owner_id: &str) -> Result<Vec<Wedding>, AppError> {
        let weddings = sqlx::query_as::<_, Wedding>(
            "SELECT * FROM weddings WHERE owner_id = ? ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(weddings)
    }

    pub async fn insert_wedding(&self, wedding: &Wedding) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO weddings (
                id, couple_names, date, city, haldi_date_time, sangeet_date_time,
                wedding_date_time, total_budget, owner_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&wedding.id)
        .bind(&wedding.couple_names)
        .bind(&wedding.date)
        .bind(&wedding.city)
        .bind(&wedding.haldi_date_time)
        .bind(&wedding.sangeet_date_time)
        .bind(&wedding.wedding_date_time)
        .bind(wedding.total_budget)
        .bind(&wedding.owner_id)
        .bind(&wedding.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Apply a partial update and return the updated row.
    ///
    /// # Errors
    /// `AppError::NotFound` if no wedding has this id.
    pub async fn update_wedding(
        &self,
        id: &str,
        updates: &WeddingUpdate,
    ) -> Result<Wedding, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE weddings SET ");
        let mut fields = query.separated(", ");

        if let Some(couple_names) = &updates.couple_names {
            fields.push("couple_names = ").push_bind_unseparated(couple_names);
        }
        if let Some(date) = &updates.date {
            fields.push("date = ").push_bind_unseparated(date);
        }
        if let Some(city) = &updates.city {
            fields.push("city = ").push_bind_unseparated(city);
        }
        if let Some(haldi) = &updates.haldi_date_time {
            fields.push("haldi_date_time = ").push_bind_unseparated(haldi);
        }
        if let Some(sangeet) = &updates.sangeet_date_time {
            fields.push("sangeet_date_time = ").push_bind_unseparated(sangeet);
        }
        if let Some(wedding) = &updates.wedding_date_time {
            fields.push("wedding_date_time = ").push_bind_unseparated(wedding);
        }
        if let Some(total_budget) = updates.total_budget {
            fields.push("total_budget = ").push_bind_unseparated(total_budget);
        }

        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        self.get_wedding(id).await?.ok_or(AppError::NotFound)
    }

    // =========================================================================
    // Team Members
    // =========================================================================

    pub async fn get_team_members(&self, wedding_id: &str) -> Result<Vec<TeamMember>, AppError> {
        let members = sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM wedding_team_members WHERE wedding_id = ?",
        )
        .bind(wedding_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn insert_team_member(&self, member: &TeamMember) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO wedding_team_members (id, wedding_id, user_id, name, email, role)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.id)
        .bind(&member.wedding_id)
        .bind(&member.user_id)
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.role)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_team_member(
        &self,
        id: &str,
        updates: &TeamMemberUpdate,
    ) -> Result<TeamMember, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE wedding_team_members SET ");
        let mut fields = query.separated(", ");

        if let Some(role) = &updates.role {
            fields.push("role = ").push_bind_unseparated(role);
        }
        if let Some(name) = &updates.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(email) = &updates.email {
            fields.push("email = ").push_bind_unseparated(email);
        }

        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        let member =
            sqlx::query_as::<_, TeamMember>("SELECT * FROM wedding_team_members WHERE id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(member)
    }

    pub async fn delete_team_member(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM wedding_team_members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Guests
    // =========================================================================

    pub async fn get_guests(&self, wedding_id: &str) -> Result<Vec<Guest>, AppError> {
        let guests = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE wedding_id = ?")
            .bind(wedding_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(guests)
    }

    pub async fn insert_guest(&self, guest: &Guest) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO guests (id, wedding_id, name, phone, side, rsvp_status, accompanying_count)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&guest.id)
        .bind(&guest.wedding_id)
        .bind(&guest.name)
        .bind(&guest.phone)
        .bind(&guest.side)
        .bind(&guest.rsvp_status)
        .bind(guest.accompanying_count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_guest(&self, id: &str, updates: &GuestUpdate) -> Result<Guest, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE guests SET ");
        let mut fields = query.separated(", ");

        if let Some(name) = &updates.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(phone) = &updates.phone {
            fields.push("phone = ").push_bind_unseparated(phone);
        }
        if let Some(side) = &updates.side {
            fields.push("side = ").push_bind_unseparated(side);
        }
        if let Some(rsvp_status) = &updates.rsvp_status {
            fields.push("rsvp_status = ").push_bind_unseparated(rsvp_status);
        }
        if let Some(accompanying_count) = updates.accompanying_count {
            fields
                .push("accompanying_count = ")
                .push_bind_unseparated(accompanying_count);
        }

        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(guest)
    }

    pub async fn delete_guest(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM guests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Timeline Events
    // =========================================================================

    pub async fn get_events(&self, wedding_id: &str) -> Result<Vec<TimelineEvent>, AppError> {
        let events = sqlx::query_as::<_, TimelineEvent>(
            "SELECT * FROM timeline_events WHERE wedding_id = ? ORDER BY date_time",
        )
        .bind(wedding_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn insert_event(&self, event: &TimelineEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO timeline_events (id, wedding_id, title, date_time, venue, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.wedding_id)
        .bind(&event.title)
        .bind(&event.date_time)
        .bind(&event.venue)
        .bind(&event.notes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_event(
        &self,
        id: &str,
        updates: &TimelineEventUpdate,
    ) -> Result<TimelineEvent, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE timeline_events SET ");
        let mut fields = query.separated(", ");

        if let Some(title) = &updates.title {
            fields.push("title = ").push_bind_unseparated(title);
        }
        if let Some(date_time) = &updates.date_time {
            fields.push("date_time = ").push_bind_unseparated(date_time);
        }
        if let Some(venue) = &updates.venue {
            fields.push("venue = ").push_bind_unseparated(venue);
        }
        if let Some(notes) = &updates.notes {
            fields.push("notes = ").push_bind_unseparated(notes);
        }

        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        let event = sqlx::query_as::<_, TimelineEvent>("SELECT * FROM timeline_events WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(event)
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM timeline_events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub async fn get_tasks(&self, wedding_id: &str) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE wedding_id = ?")
            .bind(wedding_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    pub async fn insert_task(&self, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, wedding_id, title, status, due_date, assigned_to)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.wedding_id)
        .bind(&task.title)
        .bind(&task.status)
        .bind(&task.due_date)
        .bind(&task.assigned_to)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_task(&self, id: &str, updates: &TaskUpdate) -> Result<Task, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE tasks SET ");
        let mut fields = query.separated(", ");

        if let Some(title) = &updates.title {
            fields.push("title = ").push_bind_unseparated(title);
        }
        if let Some(status) = &updates.status {
            fields.push("status = ").push_bind_unseparated(status);
        }
        if let Some(due_date) = &updates.due_date {
            fields.push("due_date = ").push_bind_unseparated(due_date);
        }
        if let Some(assigned_to) = &updates.assigned_to {
            fields.push("assigned_to = ").push_bind_unseparated(assigned_to);
        }

        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Budget Items
    // =========================================================================

    pub async fn get_budget_items(&self, wedding_id: &str) -> Result<Vec<BudgetItem>, AppError> {
        let items =
            sqlx::query_as::<_, BudgetItem>("SELECT * FROM budget_items WHERE wedding_id = ?")
                .bind(wedding_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(items)
    }

    pub async fn insert_budget_item(&self, item: &BudgetItem) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO budget_items (id, wedding_id, category, description, planned, actual)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.wedding_id)
        .bind(&item.category)
        .bind(&item.description)
        .bind(item.planned)
        .bind(item.actual)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_budget_item(
        &self,
        id: &str,
        updates: &BudgetItemUpdate,
    ) -> Result<BudgetItem, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE budget_items SET ");
        let mut fields = query.separated(", ");

        if let Some(category) = &updates.category {
            fields.push("category = ").push_bind_unseparated(category);
        }
        if let Some(description) = &updates.description {
            fields.push("description = ").push_bind_unseparated(description);
        }
        if let Some(planned) = updates.planned {
            fields.push("planned = ").push_bind_unseparated(planned);
        }
        if let Some(actual) = updates.actual {
            fields.push("actual = ").push_bind_unseparated(actual);
        }

        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        let item = sqlx::query_as::<_, BudgetItem>("SELECT * FROM budget_items WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn delete_budget_item(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM budget_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Dashboard Stats
    // =========================================================================

    /// Aggregate dashboard statistics for a wedding.
    ///
    /// Guest counts include the guest plus their accompanying party;
    /// any RSVP status outside going/not_going/maybe counts as pending.
    pub async fn get_wedding_stats(&self, wedding_id: &str) -> Result<WeddingStats, AppError> {
        let guests = self.get_guests(wedding_id).await?;
        let tasks = self.get_tasks(wedding_id).await?;
        let budget_items = self.get_budget_items(wedding_id).await?;
        let total_budget = self
            .get_wedding(wedding_id)
            .await?
            .map(|w| w.total_budget)
            .unwrap_or(0);

        let mut guest_stats = GuestStats::default();
        for guest in &guests {
            let count = 1 + guest.accompanying_count.max(0);
            guest_stats.total += count;
            match guest.rsvp_status.as_str() {
                "going" => guest_stats.going += count,
                "not_going" => guest_stats.not_going += count,
                "maybe" => guest_stats.maybe += count,
                _ => guest_stats.pending += count,
            }
        }

        let task_stats = TaskStats {
            total: tasks.len() as i64,
            completed: tasks.iter().filter(|t| t.status == "done").count() as i64,
        };

        let budget_stats = BudgetStats {
            total_budget,
            total_spent: budget_items.iter().map(|b| b.actual).sum(),
            total_planned: budget_items.iter().map(|b| b.planned).sum(),
        };

        Ok(WeddingStats {
            guests: guest_stats,
            tasks: task_stats,
            budget: budget_stats,
        })
    }
}
