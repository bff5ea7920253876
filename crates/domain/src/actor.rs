//! User profiles with their role label and grant matrix.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use stationdesk_core::{AppError, AppResult, NonEmptyString};

use crate::role_template::{CUSTOM_ROLE, RoleTemplate, apply_template, seed_matrix_for_new_actor};
use crate::{EmailAddress, GrantMatrix, UserId};

/// Free-form role label shown next to a user profile.
///
/// The label only has meaning through a [`RoleTemplate`] lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleLabel(String);

impl RoleLabel {
    /// Creates a label from a raw value, trimming whitespace.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Returns the hand-edited marker label.
    #[must_use]
    pub fn custom() -> Self {
        Self(CUSTOM_ROLE.to_owned())
    }

    /// Returns the label value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the authored template behind the label, if any.
    #[must_use]
    pub fn template(&self) -> Option<RoleTemplate> {
        RoleTemplate::find(self.as_str())
    }

    /// Returns whether the label marks a hand-edited matrix.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.0.eq_ignore_ascii_case(CUSTOM_ROLE)
    }

    /// Returns whether the label is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for RoleLabel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// User profile whose permissions are evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    display_name: NonEmptyString,
    email: Option<EmailAddress>,
    role: RoleLabel,
    grant_matrix: GrantMatrix,
    is_active: bool,
}

impl Actor {
    /// Creates an active actor whose matrix is seeded from the role template.
    pub fn new(
        id: UserId,
        display_name: impl Into<String>,
        email: Option<EmailAddress>,
        role: impl Into<String>,
    ) -> AppResult<Self> {
        let role = RoleLabel::new(role);
        if role.is_blank() {
            return Err(AppError::Validation(
                "role must not be empty".to_owned(),
            ));
        }

        let grant_matrix = seed_matrix_for_new_actor(role.as_str());
        let role = role
            .template()
            .map(|template| RoleLabel::new(template.as_str()))
            .unwrap_or(role);

        Ok(Self {
            id,
            display_name: NonEmptyString::new(display_name)?,
            email,
            role,
            grant_matrix,
            is_active: true,
        })
    }

    /// Rehydrates an actor loaded from storage.
    #[must_use]
    pub fn from_parts(
        id: UserId,
        display_name: NonEmptyString,
        email: Option<EmailAddress>,
        role: RoleLabel,
        grant_matrix: GrantMatrix,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            display_name,
            email,
            role,
            grant_matrix,
            is_active,
        }
    }

    /// Returns the profile identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the email address, if the profile has one.
    #[must_use]
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Returns the role label.
    #[must_use]
    pub fn role(&self) -> &RoleLabel {
        &self.role
    }

    /// Returns the grant matrix.
    #[must_use]
    pub fn grant_matrix(&self) -> &GrantMatrix {
        &self.grant_matrix
    }

    /// Returns whether the profile is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Sets the active flag.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Applies a hand edit to the matrix and marks the role label custom.
    #[must_use]
    pub fn with_edited_matrix(mut self, edit: impl FnOnce(GrantMatrix) -> GrantMatrix) -> Self {
        self.grant_matrix = edit(self.grant_matrix);
        self.role = RoleLabel::custom();
        self
    }

    /// Replaces the matrix with a role template.
    ///
    /// Authored templates set the label to the canonical role name; any other
    /// role leaves the minimal-access fallback marked custom.
    #[must_use]
    pub fn with_template(mut self, role: &str) -> Self {
        self.grant_matrix = apply_template(role);
        self.role = RoleTemplate::find(role)
            .map(|template| RoleLabel::new(template.as_str()))
            .unwrap_or_else(RoleLabel::custom);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Actor, RoleLabel};
    use crate::role_template::{RoleTemplate, minimal_access_matrix};
    use crate::{ActionKind, BulkMode, GrantMatrix, ResourceKey, UserId};

    fn actor(role: &str) -> Actor {
        Actor::new(UserId::new(), "Dana", None, role).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn new_actor_is_seeded_from_template_and_canonicalized() {
        let actor = actor("cashier");
        assert_eq!(actor.role().as_str(), "Cashier");
        assert_eq!(actor.grant_matrix(), &RoleTemplate::Cashier.matrix());
        assert!(actor.is_active());
    }

    #[test]
    fn new_actor_with_unknown_role_keeps_label_and_empty_matrix() {
        let actor = actor("Night Auditor");
        assert_eq!(actor.role().as_str(), "Night Auditor");
        assert!(actor.grant_matrix().is_empty());
    }

    #[test]
    fn blank_role_is_rejected() {
        assert!(Actor::new(UserId::new(), "Dana", None, "  ").is_err());
    }

    #[test]
    fn hand_edit_marks_label_custom() {
        let actor = actor("Employee").with_edited_matrix(|matrix| {
            matrix.bulk_resource(ResourceKey::Orders, BulkMode::GrantAll)
        });
        assert!(actor.role().is_custom());
        assert!(
            actor
                .grant_matrix()
                .get(ResourceKey::Orders, ActionKind::Delete)
        );
    }

    #[test]
    fn custom_template_after_administrator_yields_minimal_access() {
        let actor = actor("Administrator").with_template("Custom");
        assert_eq!(actor.grant_matrix(), &minimal_access_matrix());
        assert_eq!(actor.role(), &RoleLabel::custom());
    }

    #[test]
    fn template_replaces_matrix_and_label() {
        let actor = actor("Administrator").with_template("Employee");
        assert_eq!(actor.role().as_str(), "Employee");
        assert_ne!(actor.grant_matrix(), &GrantMatrix::full());
    }
}
