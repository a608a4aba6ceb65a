//! Attendance domain logic for Rollcall.
//!
//! This crate owns the singleton session state machine and its two
//! collaborator seams: the [`RosterSource`] (who teaches a class, who is
//! enrolled) and the [`RecordStore`] (durable per-student outcomes). It
//! performs no transport or protocol work; the server crate wires it to
//! connections and events.

mod error;
mod finalize;
mod record;
mod roster;
mod session;

pub use error::AttendanceError;
pub use finalize::finalize;
pub use record::{AttendanceRecord, RecordError, RecordStore};
pub use roster::{ClassInfo, RosterError, RosterSource};
pub use session::{ActiveSession, SessionState, tally};
