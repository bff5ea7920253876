//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod action;
mod actor;
mod audit;
mod catalog;
mod evaluation;
mod grant_matrix;
mod module_access;
mod role_template;
mod user;

pub use action::ActionKind;
pub use actor::{Actor, RoleLabel};
pub use audit::AuditAction;
pub use catalog::{
    Resource, ResourceCategory, ResourceKey, list_resources, list_resources_by_category,
};
pub use evaluation::{can, can_by_key, capabilities, navigation};
pub use grant_matrix::{
    ActionGrants, BulkMode, DecodedGrantMatrix, GrantMatrix, GrantMatrixDocument,
};
pub use module_access::{
    ModuleAccessFlags, ModuleAccessOverlay, ModuleAccessPatch, ModuleAccessRecord,
    ModuleAccessRecordId, ModuleName, OverlayProvisioning,
};
pub use role_template::{
    CUSTOM_ROLE, RoleTemplate, apply_template, get_template, minimal_access_matrix,
    seed_matrix_for_new_actor,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, UserId, validate_password,
};
