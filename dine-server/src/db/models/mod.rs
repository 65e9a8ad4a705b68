//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod admin_user;

// Catalog
pub mod dining_table;
pub mod menu_item;

// Reservations
pub mod reservation;

// Chat
pub mod chat_log;

// Re-exports
pub use admin_user::{AdminUser, AdminUserResponse};
pub use chat_log::ChatLog;
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use reservation::{Reservation, ReservationFilter, ReservationStatus};
