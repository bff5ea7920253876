//! Hand-authored default matrices per role.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{ActionGrants, ActionKind, GrantMatrix, ResourceCategory, ResourceKey};

/// Role label marking a matrix that was edited by hand.
pub const CUSTOM_ROLE: &str = "Custom";

/// Roles with an authored template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleTemplate {
    /// Full access to every page.
    Administrator,
    /// Station manager: everything outside system administration.
    Manager,
    /// Back-office bookkeeping.
    Accountant,
    /// Register and till work.
    Cashier,
    /// General station staff.
    Employee,
}

impl RoleTemplate {
    /// Returns the canonical role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Manager => "Manager",
            Self::Accountant => "Accountant",
            Self::Cashier => "Cashier",
            Self::Employee => "Employee",
        }
    }

    /// Returns all authored templates.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleTemplate] = &[
            RoleTemplate::Administrator,
            RoleTemplate::Manager,
            RoleTemplate::Accountant,
            RoleTemplate::Cashier,
            RoleTemplate::Employee,
        ];

        ALL
    }

    /// Finds the template for a role label, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn find(role: &str) -> Option<Self> {
        let role = role.trim();
        Self::all()
            .iter()
            .copied()
            .find(|template| template.as_str().eq_ignore_ascii_case(role))
    }

    /// Builds this template's matrix.
    #[must_use]
    pub fn matrix(&self) -> GrantMatrix {
        use ActionKind::{Create, Edit, Export, Print, View};
        use ResourceKey as R;

        match self {
            Self::Administrator => GrantMatrix::full(),
            Self::Manager => {
                let outside_admin = ResourceKey::all()
                    .filter(|key| key.category() != ResourceCategory::SystemAdmin)
                    .map(|key| (key, ActionGrants::ALL));
                GrantMatrix::from_rows(outside_admin.chain([
                    (R::Users, ActionGrants::VIEW_ONLY),
                    (R::Settings, ActionGrants::VIEW_ONLY),
                ]))
            }
            Self::Accountant => GrantMatrix::from_rows([
                (R::Dashboard, ActionGrants::VIEW_ONLY),
                (R::SalesReports, ActionGrants::of(&[View, Export, Print])),
                (R::FuelSales, ActionGrants::of(&[View, Export, Print])),
                (
                    R::CashReconciliation,
                    ActionGrants::of(&[View, Export, Print]),
                ),
                (
                    R::Invoices,
                    ActionGrants::of(&[View, Create, Edit, Export, Print]),
                ),
                (R::Vendors, ActionGrants::VIEW_ONLY),
                (R::Orders, ActionGrants::of(&[View, Export, Print])),
                (R::Documents, ActionGrants::of(&[View, Create])),
            ]),
            Self::Cashier => GrantMatrix::from_rows([
                (R::Dashboard, ActionGrants::VIEW_ONLY),
                (R::SalesReports, ActionGrants::of(&[View, Create])),
                (R::FuelSales, ActionGrants::of(&[View, Create])),
                (R::CashReconciliation, ActionGrants::of(&[View, Create])),
                (R::Products, ActionGrants::VIEW_ONLY),
            ]),
            Self::Employee => GrantMatrix::from_rows([
                (R::Dashboard, ActionGrants::VIEW_ONLY),
                (R::SalesReports, ActionGrants::of(&[View, Create, Edit])),
                (R::Delivery, ActionGrants::of(&[View, Create, Edit])),
                (R::Products, ActionGrants::VIEW_ONLY),
                (R::Inventory, ActionGrants::VIEW_ONLY),
            ]),
        }
    }
}

impl Display for RoleTemplate {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Minimal-access matrix used when a role has no authored template.
#[must_use]
pub fn minimal_access_matrix() -> GrantMatrix {
    GrantMatrix::empty().set_cell(ResourceKey::Dashboard, ActionKind::View, true)
}

/// Returns the default matrix for a role label.
///
/// Unknown labels, including [`CUSTOM_ROLE`], resolve to
/// [`minimal_access_matrix`].
#[must_use]
pub fn get_template(role: &str) -> GrantMatrix {
    RoleTemplate::find(role)
        .map(|template| template.matrix())
        .unwrap_or_else(minimal_access_matrix)
}

/// Returns a fresh matrix seeded from the role's template. The caller must
/// replace its current matrix with the result.
#[must_use]
pub fn apply_template(role: &str) -> GrantMatrix {
    get_template(role)
}

/// Returns the matrix a newly created actor starts with: the role's template
/// when authored, otherwise an all-denied matrix.
#[must_use]
pub fn seed_matrix_for_new_actor(role: &str) -> GrantMatrix {
    RoleTemplate::find(role)
        .map(|template| template.matrix())
        .unwrap_or_else(GrantMatrix::empty)
}
