use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stationdesk_core::AppError;

/// Action an actor may perform on a catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Open the page and read its records. Required for navigation.
    View,
    /// Create new records.
    Create,
    /// Modify existing records.
    Edit,
    /// Remove records.
    Delete,
    /// Export records (CSV and similar).
    Export,
    /// Produce printable output.
    Print,
}

impl ActionKind {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Export => "export",
            Self::Print => "print",
        }
    }

    /// Returns all action kinds in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ActionKind] = &[
            ActionKind::View,
            ActionKind::Create,
            ActionKind::Edit,
            ActionKind::Delete,
            ActionKind::Export,
            ActionKind::Print,
        ];

        ALL
    }

    /// Returns whether the module-access overlay can veto this action.
    #[must_use]
    pub fn is_overlay_gated(&self) -> bool {
        matches!(self, Self::Create | Self::Edit | Self::Delete)
    }

    /// Parses a transport value, returning `None` for unknown actions.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_str(value).ok()
    }
}

impl Display for ActionKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            "export" => Ok(Self::Export),
            "print" => Ok(Self::Print),
            _ => Err(AppError::Validation(format!(
                "unknown action kind '{value}'"
            ))),
        }
    }
}
