//! API layer
//!
//! HTTP handlers for:
//! - Auth (password, phone, logout, me)
//! - Wedding planning CRUD
//! - Health check

mod auth;
mod budget;
pub mod dto;
mod events;
mod guests;
mod health;
mod tasks;
mod team;
mod weddings;

pub use auth::auth_router;
pub use health::health_router;
pub use weddings::{resources_router, weddings_router};
