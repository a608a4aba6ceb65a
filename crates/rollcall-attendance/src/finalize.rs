//! The finalizer: reconcile marks against the roster, persist, clear.
//!
//! Finalize is the only multi-step transition in the state machine and
//! the only place a mark becomes durable. The caller holds the session
//! lock across the whole call so no mark can land between the summary
//! computation and the write-out.

use futures_util::future::try_join_all;
use rollcall_protocol::{AttendanceStatus, Identity, SessionSummary};

use crate::{
    AttendanceError, AttendanceRecord, RecordStore, RosterSource,
    SessionState, session::tally,
};

/// Finalizes the active session.
///
/// Writes exactly one [`AttendanceRecord`] per enrolled student —
/// unmarked students are recorded absent — then transitions the state to
/// Idle and returns the summary. Record writes for one finalize run
/// concurrently.
///
/// On any failure the state is left untouched: a roster or write error
/// keeps the session Active so the teacher can retry, and no partial
/// summary is produced. (Some records may already be durable when a
/// sibling write fails; the store is append-only and a retry rewrites
/// the full roster.)
///
/// # Errors
/// - [`AttendanceError::NoActiveSession`] when Idle.
/// - [`AttendanceError::TeacherEventOnly`] unless the caller is the
///   owning teacher.
/// - [`AttendanceError::Roster`] / [`AttendanceError::Persistence`] on
///   collaborator failure.
pub async fn finalize<R, S>(
    state: &mut SessionState,
    roster: &R,
    records: &S,
    caller: &Identity,
) -> Result<SessionSummary, AttendanceError>
where
    R: RosterSource,
    S: RecordStore,
{
    let session = state.active()?;
    session.authorize_owner(caller)?;

    let class_id = session.class_id().clone();
    let class = roster.class_info(&class_id).await?;

    let writes = class.students.iter().map(|student_id| {
        let record = AttendanceRecord {
            student_id: student_id.clone(),
            class_id: class_id.clone(),
            status: session
                .status_of(student_id)
                .unwrap_or(AttendanceStatus::Absent),
        };
        records.create(record)
    });
    try_join_all(writes).await?;

    let summary = tally(session.present_count(), class.roster_size());
    tracing::info!(
        %class_id,
        present = summary.present,
        absent = summary.absent,
        total = summary.total,
        "attendance session finalized"
    );
    state.clear();
    Ok(summary)
}
