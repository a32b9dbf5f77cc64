//! Timed session records.
//!
//! A [`TimedSession`] is the persisted form of one nursing or sleep session.
//! Everything the tracker shows can be rebuilt from these fields alone.

use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Opaque session identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Breast side for a nursing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left side.
    #[default]
    Left,
    /// Right side.
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Stable lowercase name, used as the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a stored side value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "right" | "r" => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of timed activity, without nursing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Breastfeeding.
    Nursing,
    /// Sleep.
    Sleep,
}

impl ActivityKind {
    /// Stable lowercase name, used as the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nursing => "nursing",
            Self::Sleep => "sleep",
        }
    }

    /// Parse a stored kind value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nursing" => Some(Self::Nursing),
            "sleep" => Some(Self::Sleep),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Nursing => "Nursing",
            Self::Sleep => "Sleep",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed activity, carrying the nursing side where it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Activity {
    /// Nursing on one side.
    Nursing {
        /// Side being nursed.
        side: Side,
    },
    /// Sleep.
    Sleep,
}

impl Activity {
    /// Build an activity of `kind`; `side` is ignored for sleep.
    #[must_use]
    pub const fn new(kind: ActivityKind, side: Side) -> Self {
        match kind {
            ActivityKind::Nursing => Self::Nursing { side },
            ActivityKind::Sleep => Self::Sleep,
        }
    }

    /// The side-less kind.
    #[must_use]
    pub const fn kind(self) -> ActivityKind {
        match self {
            Self::Nursing { .. } => ActivityKind::Nursing,
            Self::Sleep => ActivityKind::Sleep,
        }
    }

    /// Nursing side, if any.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Nursing { side } => Some(side),
            Self::Sleep => None,
        }
    }
}

/// Tracker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerState {
    /// No session held.
    Idle,
    /// Open and counting.
    Running,
    /// Open, frozen at a checkpoint.
    Paused,
    /// Stopped; the record is history.
    Closed,
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Closed => "closed",
        })
    }
}

/// Tracker commands, named in transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin a session.
    Start,
    /// Freeze the running session.
    Pause,
    /// Continue a paused session.
    Resume,
    /// Close the session.
    Stop,
    /// Change nursing side.
    SwitchSide,
    /// Delete the open session.
    Discard,
    /// Adopt a persisted open session.
    Reattach,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::SwitchSide => "switch side",
            Self::Discard => "discard",
            Self::Reattach => "reattach",
        })
    }
}

/// Payload for creating a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// Owner of the session.
    pub user_id: String,
    /// What is being timed.
    pub activity: Activity,
    /// First start instant.
    pub started_at: DateTime<Utc>,
}

/// A persisted timed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedSession {
    /// Store-assigned id.
    pub id: SessionId,
    /// Owner of the session.
    pub user_id: String,
    /// What is being timed.
    #[serde(flatten)]
    pub activity: Activity,
    /// First start instant.
    pub started_at: DateTime<Utc>,
    /// Close instant; `None` while open.
    pub ended_at: Option<DateTime<Utc>>,
    /// Total completed pause time in milliseconds.
    pub accumulated_pause_ms: i64,
    /// Start of the current pause, only while paused.
    pub pause_started_at: Option<DateTime<Utc>>,
    /// Whether the session is paused.
    pub is_paused: bool,
    /// Pause checkpoint while paused; final duration once closed.
    pub duration_seconds: i64,
}

impl TimedSession {
    /// A freshly opened, unpaused session.
    #[must_use]
    pub fn opened(id: SessionId, new: NewSession) -> Self {
        Self {
            id,
            user_id: new.user_id,
            activity: new.activity,
            started_at: new.started_at,
            ended_at: None,
            accumulated_pause_ms: 0,
            pause_started_at: None,
            is_paused: false,
            duration_seconds: 0,
        }
    }

    /// Whether the session is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// The lifecycle state this record represents.
    #[must_use]
    pub const fn state(&self) -> TrackerState {
        if self.ended_at.is_some() {
            TrackerState::Closed
        } else if self.is_paused {
            TrackerState::Paused
        } else {
            TrackerState::Running
        }
    }
}

/// Partial update of a session's mutable fields.
///
/// `None` leaves a field untouched. `pause_started_at: Some(None)` clears it,
/// and `ended_at: Some(None)` reopens a closed session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    /// New paused flag.
    pub is_paused: Option<bool>,
    /// New pause start (or cleared).
    pub pause_started_at: Option<Option<DateTime<Utc>>>,
    /// New accumulated pause total.
    pub accumulated_pause_ms: Option<i64>,
    /// Close instant (or cleared).
    pub ended_at: Option<Option<DateTime<Utc>>>,
    /// Checkpoint or final duration.
    pub duration_seconds: Option<i64>,
}

impl SessionUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_paused.is_none()
            && self.pause_started_at.is_none()
            && self.accumulated_pause_ms.is_none()
            && self.ended_at.is_none()
            && self.duration_seconds.is_none()
    }

    /// Whether the update clears `ended_at`.
    #[must_use]
    pub const fn reopens(&self) -> bool {
        matches!(self.ended_at, Some(None))
    }

    /// Apply the update to an in-memory record.
    pub fn apply_to(&self, session: &mut TimedSession) {
        if let Some(paused) = self.is_paused {
            session.is_paused = paused;
        }
        if let Some(pause_started_at) = self.pause_started_at {
            session.pause_started_at = pause_started_at;
        }
        if let Some(accumulated) = self.accumulated_pause_ms {
            session.accumulated_pause_ms = accumulated;
        }
        if let Some(ended_at) = self.ended_at {
            session.ended_at = ended_at;
        }
        if let Some(duration) = self.duration_seconds {
            session.duration_seconds = duration;
        }
    }
}
