use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stationdesk_core::AppError;

/// Stable audit actions emitted by administrative use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A user profile was created.
    UserCreated,
    /// A user profile was deleted.
    UserDeleted,
    /// A user profile was activated or deactivated.
    UserActivationChanged,
    /// A whole grant matrix was replaced.
    PermissionsReplaced,
    /// One grant matrix cell was toggled.
    PermissionCellSet,
    /// A bulk action was applied to one resource row.
    PermissionResourceBulkApplied,
    /// A bulk action was applied to every resource in a category.
    PermissionCategoryBulkApplied,
    /// A role template replaced the grant matrix.
    PermissionTemplateApplied,
    /// The grant matrix was copied from another user.
    PermissionsCopied,
    /// A module-access record was updated.
    ModuleAccessUpdated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "user.created",
            Self::UserDeleted => "user.deleted",
            Self::UserActivationChanged => "user.activation_changed",
            Self::PermissionsReplaced => "permissions.replaced",
            Self::PermissionCellSet => "permissions.cell_set",
            Self::PermissionResourceBulkApplied => "permissions.resource_bulk_applied",
            Self::PermissionCategoryBulkApplied => "permissions.category_bulk_applied",
            Self::PermissionTemplateApplied => "permissions.template_applied",
            Self::PermissionsCopied => "permissions.copied",
            Self::ModuleAccessUpdated => "module_access.updated",
        }
    }

    /// Returns all audit actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AuditAction] = &[
            AuditAction::UserCreated,
            AuditAction::UserDeleted,
            AuditAction::UserActivationChanged,
            AuditAction::PermissionsReplaced,
            AuditAction::PermissionCellSet,
            AuditAction::PermissionResourceBulkApplied,
            AuditAction::PermissionCategoryBulkApplied,
            AuditAction::PermissionTemplateApplied,
            AuditAction::PermissionsCopied,
            AuditAction::ModuleAccessUpdated,
        ];

        ALL
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown audit action '{value}'")))
    }
}
