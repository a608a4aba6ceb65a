//! The attendance session state machine.
//!
//! Exactly two states, one transition cycle:
//!
//! ```text
//!   Idle ──(start)──→ Active ──(finalize)──→ Idle
//! ```
//!
//! At most one session exists per process. The machine itself is plain
//! data with synchronous methods; the server guards it with a single
//! `tokio::sync::Mutex` and keeps every critical section short. All I/O
//! (roster lookups, record writes) happens outside these methods.

use std::collections::HashMap;
use std::time::Instant;

use rollcall_protocol::{
    AttendanceStatus, ClassId, Identity, Role, SelfStatus, SessionSummary,
    UserId,
};

use crate::{AttendanceError, ClassInfo};

/// Computes the `{present, absent, total}` tally.
///
/// Shared by the summary query and the finalizer so the two can never
/// disagree: `total` is the roster size, `absent` saturates at zero (a
/// teacher may have marked someone who is not on the roster).
pub fn tally(present: usize, total: usize) -> SessionSummary {
    SessionSummary {
        present,
        absent: total.saturating_sub(present),
        total,
    }
}

/// One live attendance-taking episode for one class.
///
/// `teacher_id` is immutable for the session's lifetime and is the only
/// identity permitted to mutate marks or finalize.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    class_id: ClassId,
    teacher_id: UserId,
    started_at: Instant,
    /// Last write wins; no mid-session history is kept.
    attendance: HashMap<UserId, AttendanceStatus>,
}

impl ActiveSession {
    /// The class this session is for.
    pub fn class_id(&self) -> &ClassId {
        &self.class_id
    }

    /// The owning teacher.
    pub fn teacher_id(&self) -> &UserId {
        &self.teacher_id
    }

    /// When the session was started.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// The recorded status for one student, if any mark was accepted.
    pub fn status_of(&self, student_id: &UserId) -> Option<AttendanceStatus> {
        self.attendance.get(student_id).copied()
    }

    /// Number of students currently marked present.
    pub fn present_count(&self) -> usize {
        self.attendance
            .values()
            .filter(|s| **s == AttendanceStatus::Present)
            .count()
    }

    /// Number of accepted marks (not the roster size).
    pub fn mark_count(&self) -> usize {
        self.attendance.len()
    }

    /// Checks that the caller is this session's owning teacher.
    ///
    /// # Errors
    /// [`AttendanceError::TeacherEventOnly`] for a wrong role or a
    /// different teacher's identity alike.
    pub fn authorize_owner(
        &self,
        caller: &Identity,
    ) -> Result<(), AttendanceError> {
        if caller.role == Role::Teacher && caller.user_id == self.teacher_id
        {
            Ok(())
        } else {
            Err(AttendanceError::TeacherEventOnly)
        }
    }
}

/// The singleton session state: Idle, or one [`ActiveSession`].
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// No session in progress.
    #[default]
    Idle,
    /// One session accumulating marks.
    Active(ActiveSession),
}

impl SessionState {
    /// Creates the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Returns `true` if a session is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Borrows the active session.
    ///
    /// # Errors
    /// [`AttendanceError::NoActiveSession`] when Idle.
    pub fn active(&self) -> Result<&ActiveSession, AttendanceError> {
        match self {
            Self::Active(session) => Ok(session),
            Self::Idle => Err(AttendanceError::NoActiveSession),
        }
    }

    /// Starts a session for the given class.
    ///
    /// The caller supplies the class description it fetched (outside any
    /// lock) from the roster collaborator; only the class's
    /// teacher-of-record may start.
    ///
    /// # Errors
    /// - [`AttendanceError::NotClassTeacher`] — requester is not the
    ///   teacher-of-record.
    /// - [`AttendanceError::SessionAlreadyActive`] — a session is in
    ///   progress; it must be finalized first (no silent replacement).
    pub fn start(
        &mut self,
        class: &ClassInfo,
        requesting_teacher: &UserId,
    ) -> Result<(), AttendanceError> {
        if class.teacher_id != *requesting_teacher {
            return Err(AttendanceError::NotClassTeacher);
        }
        if let Self::Active(current) = self {
            return Err(AttendanceError::SessionAlreadyActive(
                current.class_id.clone(),
            ));
        }

        *self = Self::Active(ActiveSession {
            class_id: class.class_id.clone(),
            teacher_id: class.teacher_id.clone(),
            started_at: Instant::now(),
            attendance: HashMap::new(),
        });
        tracing::info!(
            class_id = %class.class_id,
            teacher_id = %class.teacher_id,
            roster_size = class.roster_size(),
            "attendance session started"
        );
        Ok(())
    }

    /// Records a status for one student. Overwrite semantics: the last
    /// accepted mark for a student wins.
    ///
    /// # Errors
    /// - [`AttendanceError::NoActiveSession`] when Idle.
    /// - [`AttendanceError::TeacherEventOnly`] unless the caller is the
    ///   owning teacher.
    pub fn mark(
        &mut self,
        caller: &Identity,
        student_id: UserId,
        status: AttendanceStatus,
    ) -> Result<(), AttendanceError> {
        let session = match self {
            Self::Active(session) => session,
            Self::Idle => return Err(AttendanceError::NoActiveSession),
        };
        session.authorize_owner(caller)?;

        tracing::debug!(
            class_id = %session.class_id,
            student_id = %student_id,
            %status,
            "mark accepted"
        );
        session.attendance.insert(student_id, status);
        Ok(())
    }

    /// A student's own recorded status, or "not yet updated".
    /// Non-mutating.
    ///
    /// # Errors
    /// - [`AttendanceError::NoActiveSession`] when Idle.
    /// - [`AttendanceError::StudentEventOnly`] for non-student callers.
    pub fn my_status(
        &self,
        caller: &Identity,
    ) -> Result<SelfStatus, AttendanceError> {
        let session = self.active()?;
        if caller.role != Role::Student {
            return Err(AttendanceError::StudentEventOnly);
        }
        Ok(SelfStatus::from(session.status_of(&caller.user_id)))
    }

    /// Clears the session: Active → Idle. Only the finalizer calls this,
    /// and only after every roster record has been written.
    pub(crate) fn clear(&mut self) {
        *self = Self::Idle;
    }
}

// =========================================================================
// Tests
// =========================================================================
