//! Quick records: diaper changes and bottle feedings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a diaper change contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiaperKind {
    /// Wet diaper.
    Pee,
    /// Dirty diaper.
    Poop,
}

impl DiaperKind {
    /// Stable lowercase name, used as the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pee => "pee",
            Self::Poop => "poop",
        }
    }

    /// Parse a stored value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pee" => Some(Self::Pee),
            "poop" => Some(Self::Poop),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pee => "Pee",
            Self::Poop => "Poop",
        }
    }
}

impl fmt::Display for DiaperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diaper change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaperChange {
    /// Row id.
    pub id: i64,
    /// Owner.
    pub user_id: String,
    /// Pee or poop.
    pub kind: DiaperKind,
    /// When it was logged.
    pub created_at: DateTime<Utc>,
}

/// One bottle feeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingRecord {
    /// Row id.
    pub id: i64,
    /// Owner.
    pub user_id: String,
    /// When it was logged.
    pub created_at: DateTime<Utc>,
}
