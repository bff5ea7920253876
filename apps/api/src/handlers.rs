pub mod health;
pub mod me;
pub mod module_access;
pub mod permissions;
pub mod users;

use stationdesk_core::AppError;
use stationdesk_domain::UserId;

/// Parses a user id path segment.
fn user_id_from_path(value: &str) -> Result<UserId, AppError> {
    UserId::parse(value)
}
