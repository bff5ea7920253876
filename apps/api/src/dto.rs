mod auth;
mod common;
mod module_access;
mod permissions;
mod users;

pub use auth::{AuthLoginRequest, AuthLoginResponse};
pub use common::{
    ActionGrantsResponse, CapabilitiesResponse, HealthResponse, ResourceResponse,
    UserIdentityResponse, grant_rows,
};
pub use module_access::{ModuleAccessRecordResponse, UpdateModuleAccessRequest};
pub use permissions::{
    ApplyTemplateRequest, BulkCategoryRequest, BulkResourceRequest, CatalogResponse,
    CategoryResponse, CopyFromRequest, GrantMatrixResponse, ReplaceGrantsRequest,
    RoleTemplateResponse, SetCellRequest,
};
pub use users::{CreateUserRequest, SetUserActiveRequest, UserResponse};
