//! The roster collaborator: who teaches a class, who is enrolled.
//!
//! Class and enrollment data live outside this process, typically in a
//! document store behind its own CRUD surface. The coordinator only ever
//! needs one read: the class's teacher-of-record plus the enrolled
//! student ids. [`RosterSource`] is that seam.

use rollcall_protocol::{ClassId, UserId};

/// The authoritative description of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// The class this describes.
    pub class_id: ClassId,
    /// The only identity allowed to start, mark, and finalize a session
    /// for this class.
    pub teacher_id: UserId,
    /// Enrolled students. Finalize writes exactly one record per entry.
    pub students: Vec<UserId>,
}

impl ClassInfo {
    /// Returns the roster size.
    pub fn roster_size(&self) -> usize {
        self.students.len()
    }
}

/// Errors from the roster collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// No class exists with the given id.
    #[error("class {0} not found")]
    ClassNotFound(ClassId),

    /// The roster backend could not be reached or answered garbage.
    #[error("roster lookup failed: {0}")]
    Unavailable(String),
}

/// Read access to class and enrollment data.
///
/// Implementations are expected to be queried outside the session lock
/// wherever possible — lookups used only to validate happen before the
/// lock is taken.
pub trait RosterSource: Send + Sync + 'static {
    /// Returns the teacher-of-record and enrolled students for a class.
    fn class_info(
        &self,
        class_id: &ClassId,
    ) -> impl std::future::Future<Output = Result<ClassInfo, RosterError>> + Send;
}
