//! The record-store collaborator: durable per-student outcomes.

use rollcall_protocol::{AttendanceStatus, ClassId, UserId};
use serde::{Deserialize, Serialize};

/// One finalized attendance outcome, written exactly once per roster
/// member per finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The student this record is for.
    pub student_id: UserId,
    /// The class the session belonged to.
    pub class_id: ClassId,
    /// The recorded mark, defaulting to absent when the student was never
    /// marked during the session.
    pub status: AttendanceStatus,
}

/// Errors from the record-store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A record write failed. Finalize treats any write failure as a
    /// failure of the whole transition.
    #[error("record write failed: {0}")]
    WriteFailed(String),
}

/// Append-only storage of finalized attendance outcomes.
///
/// The finalizer is the sole caller. Writes for one finalize may run
/// concurrently; no batching is assumed.
pub trait RecordStore: Send + Sync + 'static {
    /// Durably appends one attendance record.
    fn create(
        &self,
        record: AttendanceRecord,
    ) -> impl std::future::Future<Output = Result<(), RecordError>> + Send;
}
