//! Permission evaluation.
//!
//! Everything here is pure: the actor snapshot and overlay are passed in and
//! nothing is loaded or cached.

use crate::{
    ActionGrants, ActionKind, Actor, ModuleAccessOverlay, Resource, ResourceKey, list_resources,
};

/// Returns whether the actor may perform the action on the resource.
///
/// The grant matrix decides first. A granted action is then checked against
/// the module-access overlay, which can only veto. Missing, inactive or
/// unlabelled actors are denied.
#[must_use]
pub fn can(
    actor: Option<&Actor>,
    resource: ResourceKey,
    action: ActionKind,
    overlay: &ModuleAccessOverlay,
) -> bool {
    let Some(actor) = actor else {
        return false;
    };

    if !actor.is_active() || actor.role().is_blank() {
        return false;
    }

    if !actor.grant_matrix().get(resource, action) {
        return false;
    }

    overlay.permits(resource, action)
}

/// Evaluates a check expressed as raw transport keys. Unknown resources or
/// actions are denied.
#[must_use]
pub fn can_by_key(
    actor: Option<&Actor>,
    resource_key: &str,
    action_key: &str,
    overlay: &ModuleAccessOverlay,
) -> bool {
    match (ResourceKey::parse(resource_key), ActionKind::parse(action_key)) {
        (Some(resource), Some(action)) => can(actor, resource, action, overlay),
        _ => false,
    }
}

/// Returns the effective action flags for one resource.
#[must_use]
pub fn capabilities(
    actor: Option<&Actor>,
    resource: ResourceKey,
    overlay: &ModuleAccessOverlay,
) -> ActionGrants {
    let mut grants = ActionGrants::NONE;
    for action in ActionKind::all() {
        grants.set(*action, can(actor, resource, *action, overlay));
    }
    grants
}

/// Returns the catalog resources the actor can see, in catalog order.
#[must_use]
pub fn navigation(actor: Option<&Actor>, overlay: &ModuleAccessOverlay) -> Vec<&'static Resource> {
    list_resources()
        .iter()
        .filter(|resource| can(actor, resource.key(), ActionKind::View, overlay))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use stationdesk_core::NonEmptyString;

    use super::{can, can_by_key, capabilities, navigation};
    use crate::role_template::RoleTemplate;
    use crate::{
        ActionGrants, ActionKind, Actor, BulkMode, GrantMatrix, ModuleAccessFlags,
        ModuleAccessOverlay, ModuleAccessPatch, ModuleAccessRecord, ModuleName, ResourceCategory,
        ResourceKey, RoleLabel, UserId, get_template,
    };

    fn actor(role: &str) -> Actor {
        Actor::new(UserId::new(), "Dana", None, role).unwrap_or_else(|_| unreachable!())
    }

    fn overlay_with(module: ModuleName, patch: ModuleAccessPatch) -> ModuleAccessOverlay {
        let record = ModuleAccessRecord::provisioned_default(UserId::new(), module).apply_patch(&patch);
        ModuleAccessOverlay::from_records(&[record])
    }

    #[test]
    fn employee_cannot_edit_employees() {
        let actor = actor("Employee");
        assert!(!can(
            Some(&actor),
            ResourceKey::Employees,
            ActionKind::Edit,
            &ModuleAccessOverlay::Disabled
        ));
        assert!(can(
            Some(&actor),
            ResourceKey::SalesReports,
            ActionKind::Edit,
            &ModuleAccessOverlay::Disabled
        ));
    }

    #[test]
    fn grant_all_on_orders_allows_delete_and_print() {
        let actor = actor("Employee").with_edited_matrix(|matrix| {
            matrix.bulk_resource_by_key("orders", BulkMode::GrantAll)
        });
        let overlay = ModuleAccessOverlay::Disabled;

        assert!(can_by_key(Some(&actor), "orders", "delete", &overlay));
        assert!(can_by_key(Some(&actor), "orders", "print", &overlay));
    }

    #[test]
    fn revoking_system_admin_leaves_dashboard_untouched() {
        let system_admin = ResourceCategory::SystemAdmin.resource_keys();
        let actor = actor("Administrator")
            .with_edited_matrix(|matrix| matrix.bulk_category(&system_admin, BulkMode::RevokeAll));
        let overlay = ModuleAccessOverlay::Disabled;

        for resource in &system_admin {
            assert!(capabilities(Some(&actor), *resource, &overlay).is_empty());
        }
        assert_eq!(
            capabilities(Some(&actor), ResourceKey::Dashboard, &overlay),
            ActionGrants::ALL
        );
    }

    #[test]
    fn overlay_vetoes_delete_granted_by_matrix() {
        let actor = actor("Administrator");
        let overlay = overlay_with(
            ModuleName::Employees,
            ModuleAccessPatch {
                delete_enabled: Some(false),
                ..ModuleAccessPatch::default()
            },
        );

        assert!(!can(Some(&actor), ResourceKey::Employees, ActionKind::Delete, &overlay));
        assert!(can(Some(&actor), ResourceKey::Employees, ActionKind::Edit, &overlay));
        assert!(can(Some(&actor), ResourceKey::Employees, ActionKind::Print, &overlay));
    }

    #[test]
    fn custom_template_after_administrator_leaves_dashboard_view_only() {
        let actor = actor("Administrator").with_template("Custom");
        let overlay = ModuleAccessOverlay::Disabled;

        for resource in ResourceKey::all() {
            for action in ActionKind::all() {
                let expected = resource == ResourceKey::Dashboard && *action == ActionKind::View;
                assert_eq!(can(Some(&actor), resource, *action, &overlay), expected);
            }
        }
    }

    #[test]
    fn missing_inactive_and_unknown_inputs_are_denied() {
        let overlay = ModuleAccessOverlay::Disabled;
        let admin = actor("Administrator");

        assert!(!can(None, ResourceKey::Dashboard, ActionKind::View, &overlay));
        assert!(!can_by_key(Some(&admin), "fuel_pumps", "view", &overlay));
        assert!(!can_by_key(Some(&admin), "dashboard", "approve", &overlay));

        let inactive = admin.with_active(false);
        assert!(!can(Some(&inactive), ResourceKey::Dashboard, ActionKind::View, &overlay));
    }

    #[test]
    fn navigation_lists_viewable_resources_in_catalog_order() {
        let actor = actor("Cashier");
        let keys: Vec<ResourceKey> = navigation(Some(&actor), &ModuleAccessOverlay::Disabled)
            .into_iter()
            .map(|resource| resource.key())
            .collect();

        assert_eq!(
            keys,
            vec![
                ResourceKey::Dashboard,
                ResourceKey::SalesReports,
                ResourceKey::FuelSales,
                ResourceKey::CashReconciliation,
                ResourceKey::Products,
            ]
        );
    }

    #[test]
    fn overlay_never_hides_navigation() {
        let actor = actor("Manager");
        let overlay = overlay_with(
            ModuleName::Sales,
            ModuleAccessPatch {
                create_enabled: Some(false),
                edit_enabled: Some(false),
                delete_enabled: Some(false),
                is_active: None,
            },
        );

        assert_eq!(
            navigation(Some(&actor), &overlay).len(),
            navigation(Some(&actor), &ModuleAccessOverlay::Disabled).len()
        );
    }

    fn arb_resource() -> impl Strategy<Value = ResourceKey> {
        prop::sample::select(ResourceKey::all().collect::<Vec<_>>())
    }

    fn arb_action() -> impl Strategy<Value = ActionKind> {
        prop::sample::select(ActionKind::all().to_vec())
    }

    fn arb_role() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "Administrator",
            "Manager",
            "Accountant",
            "Cashier",
            "Employee",
            "Custom",
            "Night Auditor",
        ])
    }

    fn arb_flags() -> impl Strategy<Value = ModuleAccessFlags> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(create, edit, delete)| {
            ModuleAccessFlags {
                create_enabled: create,
                edit_enabled: edit,
                delete_enabled: delete,
            }
        })
    }

    fn arb_overlay() -> impl Strategy<Value = ModuleAccessOverlay> {
        prop::collection::btree_map(
            prop::sample::select(ModuleName::all().to_vec()),
            arb_flags(),
            0..ModuleName::all().len(),
        )
        .prop_map(ModuleAccessOverlay::Enabled)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_unset_cells_are_denied(resource in arb_resource(), action in arb_action(), overlay in arb_overlay()) {
            let actor = Actor::from_parts(
                UserId::new(),
                NonEmptyString::new("Dana").unwrap_or_else(|_| unreachable!()),
                None,
                RoleLabel::custom(),
                GrantMatrix::empty(),
                true,
            );
            prop_assert!(!can(Some(&actor), resource, action, &overlay));
        }

        #[test]
        fn prop_overlay_only_narrows(
            role in arb_role(),
            resource in arb_resource(),
            action in arb_action(),
            overlay in arb_overlay(),
        ) {
            let actor = actor(role);
            let fine_grained = can(Some(&actor), resource, action, &ModuleAccessOverlay::Disabled);
            let with_overlay = can(Some(&actor), resource, action, &overlay);
            prop_assert!(!with_overlay || fine_grained);
        }

        #[test]
        fn prop_disabled_overlay_equals_matrix(role in arb_role(), resource in arb_resource(), action in arb_action()) {
            let actor = actor(role);
            prop_assert_eq!(
                can(Some(&actor), resource, action, &ModuleAccessOverlay::Disabled),
                actor.grant_matrix().get(resource, action)
            );
        }

        #[test]
        fn prop_template_replacement_is_total(
            first in arb_role(),
            second in arb_role(),
            resource in arb_resource(),
            action in arb_action(),
        ) {
            let actor = actor("Employee").with_template(first).with_template(second);
            let expected = get_template(second).get(resource, action);
            prop_assert_eq!(
                can(Some(&actor), resource, action, &ModuleAccessOverlay::Disabled),
                expected
            );
        }

        #[test]
        fn prop_view_and_output_actions_ignore_overlay(
            resource in arb_resource(),
            overlay in arb_overlay(),
        ) {
            let actor = actor(RoleTemplate::Administrator.as_str());
            for action in [ActionKind::View, ActionKind::Export, ActionKind::Print] {
                prop_assert!(can(Some(&actor), resource, action, &overlay));
            }
        }
    }
}
