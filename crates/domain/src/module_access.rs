//! Coarse per-module create/edit/delete veto layer.
//!
//! The overlay is consulted only after the grant matrix allowed an action and
//! can only turn that answer into a denial. When no overlay is loaded the
//! matrix decides alone.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stationdesk_core::{AppError, AppResult};
use uuid::Uuid;

use crate::{ActionKind, ResourceKey, UserId};

/// Functional module toggled by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleName {
    /// Employee records and schedules.
    Employees,
    /// Sales reporting and cash handling.
    Sales,
    /// Product catalog.
    Products,
    /// Stock and purchase orders.
    Inventory,
    /// Vendors and invoices.
    Vendors,
    /// Deliveries.
    Delivery,
    /// Document uploads.
    Documents,
    /// Station records.
    Stations,
    /// User profiles.
    Users,
    /// Application settings.
    Settings,
}

impl ModuleName {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Sales => "sales",
            Self::Products => "products",
            Self::Inventory => "inventory",
            Self::Vendors => "vendors",
            Self::Delivery => "delivery",
            Self::Documents => "documents",
            Self::Stations => "stations",
            Self::Users => "users",
            Self::Settings => "settings",
        }
    }

    /// Returns every known module.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ModuleName] = &[
            ModuleName::Employees,
            ModuleName::Sales,
            ModuleName::Products,
            ModuleName::Inventory,
            ModuleName::Vendors,
            ModuleName::Delivery,
            ModuleName::Documents,
            ModuleName::Stations,
            ModuleName::Users,
            ModuleName::Settings,
        ];

        ALL
    }

    /// Returns the module gating a resource. Dashboard and the permission
    /// editors are never gated.
    #[must_use]
    pub fn for_resource(resource: ResourceKey) -> Option<Self> {
        match resource {
            ResourceKey::Dashboard | ResourceKey::Permissions | ResourceKey::ModuleAccess => None,
            ResourceKey::Employees | ResourceKey::Schedules => Some(Self::Employees),
            ResourceKey::SalesReports | ResourceKey::FuelSales | ResourceKey::CashReconciliation => {
                Some(Self::Sales)
            }
            ResourceKey::Products => Some(Self::Products),
            ResourceKey::Inventory | ResourceKey::Orders => Some(Self::Inventory),
            ResourceKey::Vendors | ResourceKey::Invoices => Some(Self::Vendors),
            ResourceKey::Delivery => Some(Self::Delivery),
            ResourceKey::Documents => Some(Self::Documents),
            ResourceKey::Stations => Some(Self::Stations),
            ResourceKey::Users => Some(Self::Users),
            ResourceKey::Settings => Some(Self::Settings),
        }
    }
}

impl Display for ModuleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ModuleName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|module| module.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown module '{value}'")))
    }
}

/// Identifier of one module-access record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleAccessRecordId(Uuid);

impl ModuleAccessRecordId {
    /// Creates a random record identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses an identifier from a path segment.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
            AppError::Validation(format!("invalid module access record id '{value}': {error}"))
        })
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ModuleAccessRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ModuleAccessRecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// The three overlay flags for one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleAccessFlags {
    /// Create allowed.
    pub create_enabled: bool,
    /// Edit allowed.
    pub edit_enabled: bool,
    /// Delete allowed.
    pub delete_enabled: bool,
}

impl ModuleAccessFlags {
    /// Every flag enabled; the state of a freshly provisioned record.
    pub const ALLOW_ALL: Self = Self {
        create_enabled: true,
        edit_enabled: true,
        delete_enabled: true,
    };

    /// Returns whether the flags let an action through. Non-gated actions
    /// always pass.
    #[must_use]
    pub fn permits(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Create => self.create_enabled,
            ActionKind::Edit => self.edit_enabled,
            ActionKind::Delete => self.delete_enabled,
            ActionKind::View | ActionKind::Export | ActionKind::Print => true,
        }
    }
}

/// Partial admin edit of a module-access record. Absent fields are untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccessPatch {
    /// New create flag.
    pub create_enabled: Option<bool>,
    /// New edit flag.
    pub edit_enabled: Option<bool>,
    /// New delete flag.
    pub delete_enabled: Option<bool>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl ModuleAccessPatch {
    /// Returns whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Coarse override for one user and module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccessRecord {
    id: ModuleAccessRecordId,
    user_id: UserId,
    module: ModuleName,
    flags: ModuleAccessFlags,
    is_active: bool,
}

impl ModuleAccessRecord {
    /// Creates a record with explicit values.
    #[must_use]
    pub fn new(
        id: ModuleAccessRecordId,
        user_id: UserId,
        module: ModuleName,
        flags: ModuleAccessFlags,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            user_id,
            module,
            flags,
            is_active,
        }
    }

    /// Creates the default record provisioned on first access: every flag on.
    #[must_use]
    pub fn provisioned_default(user_id: UserId, module: ModuleName) -> Self {
        Self::new(
            ModuleAccessRecordId::new(),
            user_id,
            module,
            ModuleAccessFlags::ALLOW_ALL,
            true,
        )
    }

    /// Returns one default record per known module.
    #[must_use]
    pub fn provisioned_defaults(user_id: UserId) -> Vec<Self> {
        ModuleName::all()
            .iter()
            .map(|module| Self::provisioned_default(user_id, *module))
            .collect()
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> ModuleAccessRecordId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the module.
    #[must_use]
    pub fn module(&self) -> ModuleName {
        self.module
    }

    /// Returns the overlay flags.
    #[must_use]
    pub fn flags(&self) -> ModuleAccessFlags {
        self.flags
    }

    /// Returns whether the record is enforced.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the record with the patch applied.
    #[must_use]
    pub fn apply_patch(mut self, patch: &ModuleAccessPatch) -> Self {
        if let Some(value) = patch.create_enabled {
            self.flags.create_enabled = value;
        }
        if let Some(value) = patch.edit_enabled {
            self.flags.edit_enabled = value;
        }
        if let Some(value) = patch.delete_enabled {
            self.flags.delete_enabled = value;
        }
        if let Some(value) = patch.is_active {
            self.is_active = value;
        }
        self
    }
}

/// Overlay configuration passed explicitly into evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModuleAccessOverlay {
    /// Overlay subsystem off or unavailable; never vetoes.
    #[default]
    Disabled,
    /// Loaded overlay flags keyed by module.
    Enabled(BTreeMap<ModuleName, ModuleAccessFlags>),
}

impl ModuleAccessOverlay {
    /// Builds an enabled overlay from stored records. Inactive records are
    /// ignored.
    #[must_use]
    pub fn from_records(records: &[ModuleAccessRecord]) -> Self {
        Self::Enabled(
            records
                .iter()
                .filter(|record| record.is_active)
                .map(|record| (record.module, record.flags))
                .collect(),
        )
    }

    /// Returns whether the overlay is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Returns whether the overlay lets the action through on the resource.
    ///
    /// Missing records, ungated resources and ungated actions always pass.
    #[must_use]
    pub fn permits(&self, resource: ResourceKey, action: ActionKind) -> bool {
        let Self::Enabled(flags) = self else {
            return true;
        };

        if !action.is_overlay_gated() {
            return true;
        }

        ModuleName::for_resource(resource)
            .and_then(|module| flags.get(&module))
            .map(|module_flags| module_flags.permits(action))
            .unwrap_or(true)
    }
}

/// Per-actor overlay provisioning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayProvisioning {
    /// No records seen yet.
    #[default]
    Unprovisioned,
    /// Default records are being created.
    Provisioning,
    /// Records exist and the overlay is enforced.
    Provisioned,
    /// Creating default records failed.
    ProvisionFailed,
    /// Overlay disabled for the session after a failure.
    FallbackAllowAll,
}

impl OverlayProvisioning {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unprovisioned => "unprovisioned",
            Self::Provisioning => "provisioning",
            Self::Provisioned => "provisioned",
            Self::ProvisionFailed => "provision_failed",
            Self::FallbackAllowAll => "fallback_allow_all",
        }
    }

    /// Starts provisioning from the unprovisioned state.
    pub fn begin(self) -> AppResult<Self> {
        self.transition(Self::Unprovisioned, Self::Provisioning)
    }

    /// Marks provisioning complete.
    pub fn complete(self) -> AppResult<Self> {
        self.transition(Self::Provisioning, Self::Provisioned)
    }

    /// Records a provisioning failure.
    pub fn fail(self) -> AppResult<Self> {
        self.transition(Self::Provisioning, Self::ProvisionFailed)
    }

    /// Falls back to allow-all after a failure.
    pub fn fall_back(self) -> AppResult<Self> {
        self.transition(Self::ProvisionFailed, Self::FallbackAllowAll)
    }

    /// Returns whether the overlay is enforced in this state.
    #[must_use]
    pub fn overlay_enabled(&self) -> bool {
        matches!(self, Self::Provisioned)
    }

    fn transition(self, from: Self, to: Self) -> AppResult<Self> {
        if self == from {
            Ok(to)
        } else {
            Err(self.illegal(to))
        }
    }

    fn illegal(self, to: Self) -> AppError {
        AppError::Validation(format!(
            "illegal overlay provisioning transition '{}' -> '{}'",
            self.as_str(),
            to.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ModuleAccessFlags, ModuleAccessOverlay, ModuleAccessPatch, ModuleAccessRecord,
        ModuleName, OverlayProvisioning,
    };
    use crate::{ActionKind, ResourceKey, UserId};

    fn employees_record(flags: ModuleAccessFlags, is_active: bool) -> ModuleAccessRecord {
        ModuleAccessRecord::provisioned_default(UserId::new(), ModuleName::Employees)
            .apply_patch(&ModuleAccessPatch {
                create_enabled: Some(flags.create_enabled),
                edit_enabled: Some(flags.edit_enabled),
                delete_enabled: Some(flags.delete_enabled),
                is_active: Some(is_active),
            })
    }

    #[test]
    fn provisioned_defaults_cover_every_module_with_all_flags() {
        let records = ModuleAccessRecord::provisioned_defaults(UserId::new());
        assert_eq!(records.len(), ModuleName::all().len());
        assert!(records.iter().all(|record| record.flags() == ModuleAccessFlags::ALLOW_ALL));
        assert!(records.iter().all(ModuleAccessRecord::is_active));
    }

    #[test]
    fn disabled_overlay_never_vetoes() {
        let overlay = ModuleAccessOverlay::Disabled;
        assert!(overlay.permits(ResourceKey::Employees, ActionKind::Delete));
    }

    #[test]
    fn enabled_overlay_vetoes_disabled_delete() {
        let record = employees_record(
            ModuleAccessFlags {
                create_enabled: true,
                edit_enabled: true,
                delete_enabled: false,
            },
            true,
        );
        let overlay = ModuleAccessOverlay::from_records(&[record]);

        assert!(!overlay.permits(ResourceKey::Employees, ActionKind::Delete));
        assert!(!overlay.permits(ResourceKey::Schedules, ActionKind::Delete));
        assert!(overlay.permits(ResourceKey::Employees, ActionKind::Edit));
        assert!(overlay.permits(ResourceKey::Employees, ActionKind::Export));
    }

    #[test]
    fn view_export_print_are_never_gated() {
        let record = employees_record(
            ModuleAccessFlags {
                create_enabled: false,
                edit_enabled: false,
                delete_enabled: false,
            },
            true,
        );
        let overlay = ModuleAccessOverlay::from_records(&[record]);

        for action in [ActionKind::View, ActionKind::Export, ActionKind::Print] {
            assert!(overlay.permits(ResourceKey::Employees, action));
        }
    }

    #[test]
    fn inactive_and_missing_records_fail_open() {
        let record = employees_record(
            ModuleAccessFlags {
                create_enabled: false,
                edit_enabled: false,
                delete_enabled: false,
            },
            false,
        );
        let overlay = ModuleAccessOverlay::from_records(&[record]);

        assert!(overlay.permits(ResourceKey::Employees, ActionKind::Delete));
        assert!(overlay.permits(ResourceKey::Products, ActionKind::Delete));
    }

    #[test]
    fn permission_editors_are_never_gated() {
        assert_eq!(ModuleName::for_resource(ResourceKey::Permissions), None);
        assert_eq!(ModuleName::for_resource(ResourceKey::ModuleAccess), None);
        assert_eq!(ModuleName::for_resource(ResourceKey::Dashboard), None);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let record = ModuleAccessRecord::provisioned_default(UserId::new(), ModuleName::Sales);
        let patch = ModuleAccessPatch::default();
        assert!(patch.is_empty());
        assert_eq!(record.clone().apply_patch(&patch), record);
    }

    #[test]
    fn provisioning_happy_path_enables_overlay() {
        let state = OverlayProvisioning::Unprovisioned
            .begin()
            .and_then(OverlayProvisioning::complete);
        assert_eq!(state.ok(), Some(OverlayProvisioning::Provisioned));
        assert!(OverlayProvisioning::Provisioned.overlay_enabled());
    }

    #[test]
    fn provisioning_failure_falls_back_to_allow_all() {
        let state = OverlayProvisioning::Unprovisioned
            .begin()
            .and_then(OverlayProvisioning::fail)
            .and_then(OverlayProvisioning::fall_back);
        assert_eq!(state.ok(), Some(OverlayProvisioning::FallbackAllowAll));
        assert!(!OverlayProvisioning::FallbackAllowAll.overlay_enabled());
    }

    #[test]
    fn illegal_provisioning_transitions_are_rejected() {
        assert!(OverlayProvisioning::Provisioned.begin().is_err());
        assert!(OverlayProvisioning::Unprovisioned.fail().is_err());
        assert!(OverlayProvisioning::Unprovisioned.complete().is_err());
        assert!(OverlayProvisioning::FallbackAllowAll.complete().is_err());
    }
}
