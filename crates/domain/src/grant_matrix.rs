//! Per-actor grant matrix and its pure mutation operations.
//!
//! Every operation consumes a matrix and returns the edited matrix. Rows for
//! all catalog resources are always present, so two matrices that grant the
//! same cells compare equal.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stationdesk_core::AppError;

use crate::{ActionKind, ResourceKey};

/// Transport shape of a grant matrix: `{resource: {action: bool}}`.
pub type GrantMatrixDocument = BTreeMap<String, BTreeMap<String, bool>>;

/// Six action flags for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionGrants {
    /// View flag.
    pub view: bool,
    /// Create flag.
    pub create: bool,
    /// Edit flag.
    pub edit: bool,
    /// Delete flag.
    pub delete: bool,
    /// Export flag.
    pub export: bool,
    /// Print flag.
    pub print: bool,
}

impl ActionGrants {
    /// Every action denied.
    pub const NONE: Self = Self {
        view: false,
        create: false,
        edit: false,
        delete: false,
        export: false,
        print: false,
    };

    /// Every action granted.
    pub const ALL: Self = Self {
        view: true,
        create: true,
        edit: true,
        delete: true,
        export: true,
        print: true,
    };

    /// Only `view` granted.
    pub const VIEW_ONLY: Self = Self {
        view: true,
        ..Self::NONE
    };

    /// Builds a row granting exactly the listed actions.
    #[must_use]
    pub fn of(actions: &[ActionKind]) -> Self {
        actions.iter().fold(Self::NONE, |row, action| {
            let mut row = row;
            row.set(*action, true);
            row
        })
    }

    /// Returns the flag for one action.
    #[must_use]
    pub fn get(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::View => self.view,
            ActionKind::Create => self.create,
            ActionKind::Edit => self.edit,
            ActionKind::Delete => self.delete,
            ActionKind::Export => self.export,
            ActionKind::Print => self.print,
        }
    }

    /// Sets the flag for one action.
    pub fn set(&mut self, action: ActionKind, value: bool) {
        let flag = match action {
            ActionKind::View => &mut self.view,
            ActionKind::Create => &mut self.create,
            ActionKind::Edit => &mut self.edit,
            ActionKind::Delete => &mut self.delete,
            ActionKind::Export => &mut self.export,
            ActionKind::Print => &mut self.print,
        };
        *flag = value;
    }

    /// Returns the granted actions in display order.
    #[must_use]
    pub fn granted(&self) -> Vec<ActionKind> {
        ActionKind::all()
            .iter()
            .copied()
            .filter(|action| self.get(*action))
            .collect()
    }

    /// Returns whether no action is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Bulk edit applied to a whole resource row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkMode {
    /// Grant all six actions.
    GrantAll,
    /// Deny all six actions.
    RevokeAll,
    /// Reset the row to `view` only.
    ViewOnly,
}

impl BulkMode {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrantAll => "grant_all",
            Self::RevokeAll => "revoke_all",
            Self::ViewOnly => "view_only",
        }
    }

    /// Returns the row this mode writes.
    #[must_use]
    pub fn row(&self) -> ActionGrants {
        match self {
            Self::GrantAll => ActionGrants::ALL,
            Self::RevokeAll => ActionGrants::NONE,
            Self::ViewOnly => ActionGrants::VIEW_ONLY,
        }
    }
}

impl FromStr for BulkMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "grant_all" => Ok(Self::GrantAll),
            "revoke_all" => Ok(Self::RevokeAll),
            "view_only" => Ok(Self::ViewOnly),
            _ => Err(AppError::Validation(format!("unknown bulk mode '{value}'"))),
        }
    }
}

/// Resource to action-flag mapping owned by one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantMatrix {
    rows: BTreeMap<ResourceKey, ActionGrants>,
}

impl Default for GrantMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

impl GrantMatrix {
    /// Creates a matrix denying everything.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: ResourceKey::all()
                .map(|key| (key, ActionGrants::NONE))
                .collect(),
        }
    }

    /// Creates a matrix granting every action on every resource.
    #[must_use]
    pub fn full() -> Self {
        Self {
            rows: ResourceKey::all()
                .map(|key| (key, ActionGrants::ALL))
                .collect(),
        }
    }

    /// Creates a matrix from explicit rows; unlisted resources are denied.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = (ResourceKey, ActionGrants)>) -> Self {
        rows.into_iter()
            .fold(Self::empty(), |matrix, (key, row)| matrix.with_row(key, row))
    }

    /// Returns the row for a resource.
    #[must_use]
    pub fn row(&self, resource: ResourceKey) -> ActionGrants {
        self.rows.get(&resource).copied().unwrap_or_default()
    }

    /// Returns one cell.
    #[must_use]
    pub fn get(&self, resource: ResourceKey, action: ActionKind) -> bool {
        self.row(resource).get(action)
    }

    /// Iterates rows in catalog order.
    pub fn rows(&self) -> impl Iterator<Item = (ResourceKey, ActionGrants)> + '_ {
        self.rows.iter().map(|(key, row)| (*key, *row))
    }

    /// Returns whether every cell is denied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.values().all(ActionGrants::is_empty)
    }

    /// Sets exactly one cell.
    #[must_use]
    pub fn set_cell(self, resource: ResourceKey, action: ActionKind, value: bool) -> Self {
        let mut row = self.row(resource);
        row.set(action, value);
        self.with_row(resource, row)
    }

    /// Sets one cell addressed by transport keys. Unknown resources are a no-op.
    #[must_use]
    pub fn set_cell_by_key(self, resource_key: &str, action: ActionKind, value: bool) -> Self {
        match ResourceKey::parse(resource_key) {
            Some(resource) => self.set_cell(resource, action, value),
            None => self,
        }
    }

    /// Replaces one resource row according to the bulk mode.
    #[must_use]
    pub fn bulk_resource(self, resource: ResourceKey, mode: BulkMode) -> Self {
        self.with_row(resource, mode.row())
    }

    /// Applies a bulk mode to a resource addressed by transport key. Unknown
    /// resources are a no-op.
    #[must_use]
    pub fn bulk_resource_by_key(self, resource_key: &str, mode: BulkMode) -> Self {
        match ResourceKey::parse(resource_key) {
            Some(resource) => self.bulk_resource(resource, mode),
            None => self,
        }
    }

    /// Applies a bulk mode independently to every listed resource.
    #[must_use]
    pub fn bulk_category(self, category_resources: &[ResourceKey], mode: BulkMode) -> Self {
        category_resources
            .iter()
            .fold(self, |matrix, resource| matrix.bulk_resource(*resource, mode))
    }

    /// Returns a deep copy of another actor's matrix.
    #[must_use]
    pub fn copy_from(source: &GrantMatrix) -> Self {
        source.clone()
    }

    /// Converts the matrix into its transport document with every key present.
    #[must_use]
    pub fn to_document(&self) -> GrantMatrixDocument {
        self.rows
            .iter()
            .map(|(key, row)| {
                let actions = ActionKind::all()
                    .iter()
                    .map(|action| (action.as_str().to_owned(), row.get(*action)))
                    .collect();
                (key.as_str().to_owned(), actions)
            })
            .collect()
    }

    /// Decodes a transport document into a typed matrix.
    ///
    /// Unknown resource or action keys are dropped and reported; missing
    /// actions are denied.
    #[must_use]
    pub fn from_document(document: &GrantMatrixDocument) -> DecodedGrantMatrix {
        let mut ignored_keys = Vec::new();
        let mut matrix = Self::empty();

        for (resource_key, actions) in document {
            let Some(resource) = ResourceKey::parse(resource_key) else {
                ignored_keys.push(resource_key.clone());
                continue;
            };

            let mut row = ActionGrants::NONE;
            for (action_key, value) in actions {
                match ActionKind::parse(action_key) {
                    Some(action) => row.set(action, *value),
                    None => ignored_keys.push(format!("{resource_key}.{action_key}")),
                }
            }
            matrix = matrix.with_row(resource, row);
        }

        DecodedGrantMatrix {
            matrix,
            ignored_keys,
        }
    }

    fn with_row(mut self, resource: ResourceKey, row: ActionGrants) -> Self {
        self.rows.insert(resource, row);
        self
    }
}

/// Result of decoding a transport document at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedGrantMatrix {
    /// Typed matrix.
    pub matrix: GrantMatrix,
    /// Keys present in the document but absent from the catalog.
    pub ignored_keys: Vec<String>,
}

impl Serialize for GrantMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GrantMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = GrantMatrixDocument::deserialize(deserializer)?;
        Ok(Self::from_document(&document).matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionGrants, BulkMode, GrantMatrix, GrantMatrixDocument};
    use crate::{ActionKind, ResourceCategory, ResourceKey};

    #[test]
    fn empty_matrix_denies_every_cell() {
        let matrix = GrantMatrix::empty();
        for key in ResourceKey::all() {
            for action in ActionKind::all() {
                assert!(!matrix.get(key, *action));
            }
        }
        assert!(matrix.is_empty());
    }

    #[test]
    fn set_cell_touches_only_one_cell() {
        let matrix = GrantMatrix::empty().set_cell(ResourceKey::Orders, ActionKind::Delete, true);

        assert!(matrix.get(ResourceKey::Orders, ActionKind::Delete));
        assert!(!matrix.get(ResourceKey::Orders, ActionKind::Edit));
        assert_eq!(
            matrix.row(ResourceKey::Orders).granted(),
            vec![ActionKind::Delete]
        );
        assert!(matrix.row(ResourceKey::Products).is_empty());
    }

    #[test]
    fn view_only_resets_the_row() {
        let matrix = GrantMatrix::empty()
            .set_cell(ResourceKey::Employees, ActionKind::View, true)
            .set_cell(ResourceKey::Employees, ActionKind::Edit, true)
            .set_cell(ResourceKey::Employees, ActionKind::Delete, true)
            .bulk_resource(ResourceKey::Employees, BulkMode::ViewOnly);

        assert_eq!(
            matrix.row(ResourceKey::Employees),
            ActionGrants {
                view: true,
                create: false,
                edit: false,
                delete: false,
                export: false,
                print: false,
            }
        );
    }

    #[test]
    fn grant_all_on_orders_enables_delete_and_print() {
        let matrix = GrantMatrix::empty().bulk_resource(ResourceKey::Orders, BulkMode::GrantAll);
        assert!(matrix.get(ResourceKey::Orders, ActionKind::Delete));
        assert!(matrix.get(ResourceKey::Orders, ActionKind::Print));
    }

    #[test]
    fn bulk_category_leaves_other_categories_untouched() {
        let matrix = GrantMatrix::full().bulk_category(
            &ResourceCategory::SystemAdmin.resource_keys(),
            BulkMode::RevokeAll,
        );

        for key in ResourceCategory::SystemAdmin.resource_keys() {
            assert!(matrix.row(key).is_empty());
        }
        assert_eq!(matrix.row(ResourceKey::Dashboard), ActionGrants::ALL);
    }

    #[test]
    fn unknown_resource_key_is_a_no_op() {
        let original = GrantMatrix::empty().set_cell(ResourceKey::Dashboard, ActionKind::View, true);
        let edited = original
            .clone()
            .set_cell_by_key("payroll", ActionKind::View, true)
            .bulk_resource_by_key("payroll", BulkMode::GrantAll);
        assert_eq!(edited, original);
    }

    #[test]
    fn copy_from_is_structurally_equal_and_independent() {
        let source = GrantMatrix::empty().bulk_resource(ResourceKey::Vendors, BulkMode::GrantAll);
        let copy = GrantMatrix::copy_from(&source);
        assert_eq!(copy, source);

        let edited = copy.bulk_resource(ResourceKey::Vendors, BulkMode::RevokeAll);
        assert!(source.get(ResourceKey::Vendors, ActionKind::Edit));
        assert!(!edited.get(ResourceKey::Vendors, ActionKind::Edit));
    }

    #[test]
    fn document_decode_drops_unknown_keys_and_defaults_missing_actions() {
        let mut document = GrantMatrixDocument::new();
        document.insert(
            "employees".to_owned(),
            [("view".to_owned(), true), ("approve".to_owned(), true)]
                .into_iter()
                .collect(),
        );
        document.insert(
            "payroll".to_owned(),
            [("view".to_owned(), true)].into_iter().collect(),
        );

        let decoded = GrantMatrix::from_document(&document);

        assert_eq!(
            decoded.matrix.row(ResourceKey::Employees),
            ActionGrants::VIEW_ONLY
        );
        assert_eq!(
            decoded.ignored_keys,
            vec!["employees.approve".to_owned(), "payroll".to_owned()]
        );
    }

    #[test]
    fn serde_document_carries_every_action_key() {
        let matrix = GrantMatrix::empty().set_cell(ResourceKey::Dashboard, ActionKind::View, true);
        let value = serde_json::to_value(&matrix).unwrap_or_default();

        assert_eq!(value["dashboard"]["view"], serde_json::Value::Bool(true));
        assert_eq!(value["dashboard"]["print"], serde_json::Value::Bool(false));
        assert_eq!(value["settings"]["delete"], serde_json::Value::Bool(false));

        let restored: Result<GrantMatrix, _> = serde_json::from_value(value);
        assert_eq!(restored.ok(), Some(matrix));
    }

    #[test]
    fn bulk_mode_parses_transport_values() {
        assert_eq!("view_only".parse::<BulkMode>().ok(), Some(BulkMode::ViewOnly));
        assert!("grant_some".parse::<BulkMode>().is_err());
    }
}
