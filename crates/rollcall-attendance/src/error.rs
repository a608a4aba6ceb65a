//! Error types for the attendance domain.
//!
//! All of these are recoverable, reply-only errors: the dispatcher turns
//! them into an `ERROR` event for the originating connection and nothing
//! else. The `Display` strings of the first four variants are the exact
//! client-facing messages and must stay stable.

use rollcall_protocol::ClassId;

use crate::{RecordError, RosterError};

/// Errors produced by attendance session operations.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// The operation requires an active session and the state is Idle.
    #[error("No active attendance session")]
    NoActiveSession,

    /// The caller is not the active session's owning teacher.
    /// Covers both a wrong role and a different teacher's identity.
    #[error("Forbidden, teacher event only")]
    TeacherEventOnly,

    /// The caller is not a student (self-status lookup is student-only).
    #[error("Forbidden, student event only")]
    StudentEventOnly,

    /// The Start requester is not the class's teacher-of-record.
    #[error("Forbidden, not class teacher")]
    NotClassTeacher,

    /// A session is already active; it must be finalized before another
    /// can start. Starting never silently discards in-progress marks.
    #[error("attendance session already active for class {0}")]
    SessionAlreadyActive(ClassId),

    /// The roster collaborator failed or knows no such class.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// A durable record write failed during finalize. The session stays
    /// Active so the teacher can retry; no student record is silently
    /// dropped.
    #[error(transparent)]
    Persistence(#[from] RecordError),
}
