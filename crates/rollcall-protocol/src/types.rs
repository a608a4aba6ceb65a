//! Core protocol types for Rollcall's wire format.
//!
//! Every inbound and outbound frame is a JSON object of the shape
//! `{ "event": <KIND>, "data": { ... } }`. The enums below model that
//! shape directly: adjacently tagged serde enums with SCREAMING_SNAKE_CASE
//! event names and camelCase payload fields, so adding an event kind is a
//! compile-time-checked addition dispatched by exhaustive matching.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user (teacher or student).
///
/// Identity and roster stores issue opaque string ids, so unlike a numeric
/// id this wraps a `String`. `#[serde(transparent)]` keeps the wire form a
/// plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A unique identifier for a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub String);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClassId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The role a credential resolves to. Bound at admission, never reassigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

/// Who a connection belongs to: the verified subject and their role.
///
/// Produced by the authenticator during admission and attached to the
/// connection's registry entry as an immutable tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The verified subject id.
    pub user_id: UserId,
    /// The subject's role.
    pub role: Role,
}

impl Identity {
    /// Convenience constructor.
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

// ---------------------------------------------------------------------------
// Attendance values
// ---------------------------------------------------------------------------

/// The closed set of statuses a mark or a persisted record can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// A student's view of their own status within the active session.
///
/// Distinct from [`AttendanceStatus`] because "no mark recorded yet" is a
/// reportable answer for the student, not a status the teacher can assign.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum SelfStatus {
    #[serde(rename = "present")]
    Present,
    #[serde(rename = "absent")]
    Absent,
    #[serde(rename = "not yet updated")]
    NotYetUpdated,
}

impl From<Option<AttendanceStatus>> for SelfStatus {
    fn from(status: Option<AttendanceStatus>) -> Self {
        match status {
            Some(AttendanceStatus::Present) => Self::Present,
            Some(AttendanceStatus::Absent) => Self::Absent,
            None => Self::NotYetUpdated,
        }
    }
}

/// The `{present, absent, total}` tally broadcast on summary and finalize.
///
/// `total` is the roster size, not the mark count: students never marked
/// count as absent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct SessionSummary {
    /// Number of students marked present.
    pub present: usize,
    /// `total - present`, saturating at zero.
    pub absent: usize,
    /// Roster size for the session's class.
    pub total: usize,
}

// ---------------------------------------------------------------------------
// ClientEvent — inbound frames
// ---------------------------------------------------------------------------

/// Events a connected client may send.
///
/// `#[serde(tag = "event", content = "data")]` produces the adjacently
/// tagged wire shape `{ "event": "ATTENDANCE_MARKED", "data": {...} }`.
/// The empty-payload kinds use struct variants (not unit variants) so that
/// `"data": {}` deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Teacher assigns a status to one student (last write wins).
    AttendanceMarked {
        student_id: UserId,
        status: AttendanceStatus,
    },

    /// Teacher requests the running tally, broadcast to everyone.
    TodaySummary {},

    /// Student asks for their own recorded status (reply to sender only).
    MyAttendance {},

    /// Teacher finalizes the session: reconcile, persist, clear.
    Done {},
}

/// Every `event` tag [`ClientEvent`] recognizes, in wire form.
///
/// Used by the codec to tell a malformed frame ("Invalid message format")
/// apart from a well-formed frame of an unrecognized kind ("Unknown
/// event"). Must list exactly the variants above.
pub const CLIENT_EVENT_KINDS: [&str; 4] = [
    "ATTENDANCE_MARKED",
    "TODAY_SUMMARY",
    "MY_ATTENDANCE",
    "DONE",
];

// ---------------------------------------------------------------------------
// ServerEvent — outbound frames
// ---------------------------------------------------------------------------

/// Events the server sends back: broadcasts on accepted mutations, or an
/// `ERROR` to the originating connection alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// An accepted mark, echoed to every connection.
    AttendanceMarked {
        student_id: UserId,
        status: AttendanceStatus,
    },

    /// The running tally, broadcast to every connection.
    TodaySummary(SessionSummary),

    /// A student's own status, sent only to the requester.
    MyAttendance { status: SelfStatus },

    /// Finalize succeeded: records persisted, session cleared.
    Done {
        message: String,
        #[serde(flatten)]
        summary: SessionSummary,
    },

    /// Something went wrong; sent to the offending connection only.
    Error { message: String },
}

impl ServerEvent {
    /// Builds an `ERROR` event with the given client-facing message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Builds the `DONE` event announcing a persisted session.
    pub fn done(summary: SessionSummary) -> Self {
        Self::Done {
            message: "Attendance persisted".to_string(),
            summary,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
