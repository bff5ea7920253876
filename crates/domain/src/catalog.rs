//! Compiled-in catalog of application pages and their categories.
//!
//! The catalog is closed: resources cannot be added at runtime, and every
//! grant matrix is keyed by [`ResourceKey`]. Categories exist only to drive
//! bulk edits and never change evaluation.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stationdesk_core::AppError;

/// Grouping of resources used for bulk permission edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    /// Landing dashboard.
    Overview,
    /// Sales reporting and cash handling.
    Sales,
    /// Product catalog, stock and purchase orders.
    Inventory,
    /// Vendor records, deliveries and invoices.
    Vendors,
    /// Employee records and schedules.
    People,
    /// Uploaded documents.
    Documents,
    /// Station records.
    Stations,
    /// User, permission and settings administration.
    SystemAdmin,
}

impl ResourceCategory {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Sales => "sales",
            Self::Inventory => "inventory",
            Self::Vendors => "vendors",
            Self::People => "people",
            Self::Documents => "documents",
            Self::Stations => "stations",
            Self::SystemAdmin => "system_admin",
        }
    }

    /// Returns the label shown in the permission editor.
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Sales => "Sales & Reporting",
            Self::Inventory => "Products & Inventory",
            Self::Vendors => "Vendors & Deliveries",
            Self::People => "People",
            Self::Documents => "Documents",
            Self::Stations => "Stations",
            Self::SystemAdmin => "System Administration",
        }
    }

    /// Returns all categories in catalog order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceCategory] = &[
            ResourceCategory::Overview,
            ResourceCategory::Sales,
            ResourceCategory::Inventory,
            ResourceCategory::Vendors,
            ResourceCategory::People,
            ResourceCategory::Documents,
            ResourceCategory::Stations,
            ResourceCategory::SystemAdmin,
        ];

        ALL
    }

    /// Returns the keys of every resource in this category.
    #[must_use]
    pub fn resource_keys(&self) -> Vec<ResourceKey> {
        list_resources()
            .iter()
            .filter(|resource| resource.category() == *self)
            .map(Resource::key)
            .collect()
    }

    /// Parses a transport value, returning `None` for unknown categories.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_str(value).ok()
    }
}

impl FromStr for ResourceCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown resource category '{value}'")))
    }
}

/// Stable identifier of one application page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKey {
    /// Station dashboard.
    Dashboard,
    /// Daily and shift sales reports.
    SalesReports,
    /// Fuel sales and pump totals.
    FuelSales,
    /// Till counts and cash drops.
    CashReconciliation,
    /// Product catalog.
    Products,
    /// Stock levels and adjustments.
    Inventory,
    /// Purchase orders.
    Orders,
    /// Vendor records.
    Vendors,
    /// Delivery receipts.
    Delivery,
    /// Vendor invoices.
    Invoices,
    /// Employee records.
    Employees,
    /// Shift schedules.
    Schedules,
    /// Uploaded documents.
    Documents,
    /// Station records.
    Stations,
    /// User profiles.
    Users,
    /// Per-user permission editor.
    Permissions,
    /// Module access overlay editor.
    ModuleAccess,
    /// Application settings.
    Settings,
}

impl ResourceKey {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.resource().key_str
    }

    /// Returns the catalog entry for this key.
    #[must_use]
    pub fn resource(&self) -> &'static Resource {
        // CATALOG lists every variant exactly once, in declaration order.
        &CATALOG[*self as usize]
    }

    /// Returns the category this resource belongs to.
    #[must_use]
    pub fn category(&self) -> ResourceCategory {
        self.resource().category
    }

    /// Returns all resource keys in catalog order.
    pub fn all() -> impl Iterator<Item = ResourceKey> {
        CATALOG.iter().map(Resource::key)
    }

    /// Parses a transport value, returning `None` for keys outside the catalog.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_str(value).ok()
    }
}

impl Display for ResourceKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ResourceKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .find(|resource| resource.key_str == value)
            .map(Resource::key)
            .ok_or_else(|| AppError::Validation(format!("unknown resource '{value}'")))
    }
}

/// One entry of the permission catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct Resource {
    key: ResourceKey,
    key_str: &'static str,
    category: ResourceCategory,
    display_label: &'static str,
}

impl Resource {
    const fn new(
        key: ResourceKey,
        key_str: &'static str,
        category: ResourceCategory,
        display_label: &'static str,
    ) -> Self {
        Self {
            key,
            key_str,
            category,
            display_label,
        }
    }

    /// Returns the resource key.
    #[must_use]
    pub fn key(&self) -> ResourceKey {
        self.key
    }

    /// Returns the owning category.
    #[must_use]
    pub fn category(&self) -> ResourceCategory {
        self.category
    }

    /// Returns the page label.
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        self.display_label
    }
}

static CATALOG: [Resource; 18] = [
    Resource::new(
        ResourceKey::Dashboard,
        "dashboard",
        ResourceCategory::Overview,
        "Dashboard",
    ),
    Resource::new(
        ResourceKey::SalesReports,
        "sales_reports",
        ResourceCategory::Sales,
        "Sales Reports",
    ),
    Resource::new(
        ResourceKey::FuelSales,
        "fuel_sales",
        ResourceCategory::Sales,
        "Fuel Sales",
    ),
    Resource::new(
        ResourceKey::CashReconciliation,
        "cash_reconciliation",
        ResourceCategory::Sales,
        "Cash Reconciliation",
    ),
    Resource::new(
        ResourceKey::Products,
        "products",
        ResourceCategory::Inventory,
        "Products",
    ),
    Resource::new(
        ResourceKey::Inventory,
        "inventory",
        ResourceCategory::Inventory,
        "Inventory",
    ),
    Resource::new(
        ResourceKey::Orders,
        "orders",
        ResourceCategory::Inventory,
        "Purchase Orders",
    ),
    Resource::new(
        ResourceKey::Vendors,
        "vendors",
        ResourceCategory::Vendors,
        "Vendors",
    ),
    Resource::new(
        ResourceKey::Delivery,
        "delivery",
        ResourceCategory::Vendors,
        "Deliveries",
    ),
    Resource::new(
        ResourceKey::Invoices,
        "invoices",
        ResourceCategory::Vendors,
        "Vendor Invoices",
    ),
    Resource::new(
        ResourceKey::Employees,
        "employees",
        ResourceCategory::People,
        "Employees",
    ),
    Resource::new(
        ResourceKey::Schedules,
        "schedules",
        ResourceCategory::People,
        "Schedules",
    ),
    Resource::new(
        ResourceKey::Documents,
        "documents",
        ResourceCategory::Documents,
        "Documents",
    ),
    Resource::new(
        ResourceKey::Stations,
        "stations",
        ResourceCategory::Stations,
        "Stations",
    ),
    Resource::new(
        ResourceKey::Users,
        "users",
        ResourceCategory::SystemAdmin,
        "Users",
    ),
    Resource::new(
        ResourceKey::Permissions,
        "permissions",
        ResourceCategory::SystemAdmin,
        "User Permissions",
    ),
    Resource::new(
        ResourceKey::ModuleAccess,
        "module_access",
        ResourceCategory::SystemAdmin,
        "Module Access",
    ),
    Resource::new(
        ResourceKey::Settings,
        "settings",
        ResourceCategory::SystemAdmin,
        "Settings",
    ),
];

/// Returns every catalog resource in catalog order.
#[must_use]
pub fn list_resources() -> &'static [Resource] {
    &CATALOG
}

/// Returns catalog resources grouped by category, in catalog order.
#[must_use]
pub fn list_resources_by_category() -> Vec<(ResourceCategory, Vec<&'static Resource>)> {
    ResourceCategory::all()
        .iter()
        .map(|category| {
            let resources = CATALOG
                .iter()
                .filter(|resource| resource.category == *category)
                .collect();
            (*category, resources)
        })
        .collect()
}
