//! End-to-end exercises of the session lifecycle against in-memory
//! collaborators: start, mark, finalize, and the failure paths that must
//! leave the session recoverable.

use std::collections::HashMap;
use std::sync::Mutex;

use rollcall_attendance::{
    AttendanceError, AttendanceRecord, ClassInfo, RecordError, RecordStore,
    RosterError, RosterSource, SessionState, finalize,
};
use rollcall_protocol::{
    AttendanceStatus, ClassId, Identity, Role, SessionSummary, UserId,
};

// =========================================================================
// In-memory collaborators
// =========================================================================

struct MemoryRoster {
    classes: HashMap<ClassId, ClassInfo>,
}

impl MemoryRoster {
    fn with_class(class: ClassInfo) -> Self {
        let mut classes = HashMap::new();
        classes.insert(class.class_id.clone(), class);
        Self { classes }
    }
}

impl RosterSource for MemoryRoster {
    async fn class_info(
        &self,
        class_id: &ClassId,
    ) -> Result<ClassInfo, RosterError> {
        self.classes
            .get(class_id)
            .cloned()
            .ok_or_else(|| RosterError::ClassNotFound(class_id.clone()))
    }
}

#[derive(Default)]
struct MemoryRecords {
    written: Mutex<Vec<AttendanceRecord>>,
}

impl MemoryRecords {
    fn written(&self) -> Vec<AttendanceRecord> {
        self.written.lock().unwrap().clone()
    }
}

impl RecordStore for MemoryRecords {
    async fn create(&self, record: AttendanceRecord) -> Result<(), RecordError> {
        self.written.lock().unwrap().push(record);
        Ok(())
    }
}

/// Rejects every write, as a database outage would.
struct FailingRecords;

impl RecordStore for FailingRecords {
    async fn create(&self, _: AttendanceRecord) -> Result<(), RecordError> {
        Err(RecordError::WriteFailed("connection refused".into()))
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn uid(s: &str) -> UserId {
    UserId::from(s)
}

fn class() -> ClassInfo {
    ClassInfo {
        class_id: ClassId::from("math-101"),
        teacher_id: uid("t-1"),
        students: vec![uid("s-1"), uid("s-2"), uid("s-3")],
    }
}

fn owner() -> Identity {
    Identity::new("t-1", Role::Teacher)
}

fn started() -> SessionState {
    let mut state = SessionState::new();
    state.start(&class(), &uid("t-1")).expect("start");
    state
}

fn status_of(records: &[AttendanceRecord], student: &str) -> AttendanceStatus {
    records
        .iter()
        .find(|r| r.student_id == uid(student))
        .expect("record for student")
        .status
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_finalize_writes_one_record_per_roster_member() {
    let roster = MemoryRoster::with_class(class());
    let records = MemoryRecords::default();
    let mut state = started();
    state
        .mark(&owner(), uid("s-1"), AttendanceStatus::Present)
        .unwrap();
    state
        .mark(&owner(), uid("s-2"), AttendanceStatus::Present)
        .unwrap();
    // s-3 is never marked and must be recorded absent.

    let summary = finalize(&mut state, &roster, &records, &owner())
        .await
        .expect("finalize");

    assert_eq!(
        summary,
        SessionSummary {
            present: 2,
            absent: 1,
            total: 3
        }
    );
    assert!(!state.is_active());

    let written = records.written();
    assert_eq!(written.len(), 3);
    assert_eq!(status_of(&written, "s-1"), AttendanceStatus::Present);
    assert_eq!(status_of(&written, "s-2"), AttendanceStatus::Present);
    assert_eq!(status_of(&written, "s-3"), AttendanceStatus::Absent);
    assert!(written.iter().all(|r| r.class_id == ClassId::from("math-101")));
}

#[tokio::test]
async fn test_finalize_uses_last_mark_for_each_student() {
    let roster = MemoryRoster::with_class(class());
    let records = MemoryRecords::default();
    let mut state = started();
    state
        .mark(&owner(), uid("s-1"), AttendanceStatus::Present)
        .unwrap();
    state
        .mark(&owner(), uid("s-1"), AttendanceStatus::Absent)
        .unwrap();

    let summary = finalize(&mut state, &roster, &records, &owner())
        .await
        .expect("finalize");

    assert_eq!(summary.present, 0);
    assert_eq!(status_of(&records.written(), "s-1"), AttendanceStatus::Absent);
}

#[tokio::test]
async fn test_finalize_on_idle_fails() {
    let roster = MemoryRoster::with_class(class());
    let records = MemoryRecords::default();
    let mut state = SessionState::new();

    let result = finalize(&mut state, &roster, &records, &owner()).await;

    assert!(matches!(result, Err(AttendanceError::NoActiveSession)));
}

#[tokio::test]
async fn test_finalize_by_non_owner_is_forbidden() {
    let roster = MemoryRoster::with_class(class());
    let records = MemoryRecords::default();
    let mut state = started();

    let intruder = Identity::new("t-2", Role::Teacher);
    let result = finalize(&mut state, &roster, &records, &intruder).await;

    assert!(matches!(result, Err(AttendanceError::TeacherEventOnly)));
    assert!(state.is_active(), "session survives a forbidden finalize");
    assert!(records.written().is_empty());
}

#[tokio::test]
async fn test_finalize_write_failure_keeps_session_active() {
    let roster = MemoryRoster::with_class(class());
    let mut state = started();
    state
        .mark(&owner(), uid("s-1"), AttendanceStatus::Present)
        .unwrap();

    let result = finalize(&mut state, &roster, &FailingRecords, &owner()).await;

    assert!(matches!(result, Err(AttendanceError::Persistence(_))));
    assert!(state.is_active(), "failed persistence must not clear marks");
    // The teacher can retry against a healthy store.
    let records = MemoryRecords::default();
    let summary = finalize(&mut state, &roster, &records, &owner())
        .await
        .expect("retry succeeds");
    assert_eq!(summary.present, 1);
    assert!(!state.is_active());
}

#[tokio::test]
async fn test_finalize_roster_failure_keeps_session_active() {
    // The class vanished between start and finalize.
    let roster = MemoryRoster {
        classes: HashMap::new(),
    };
    let records = MemoryRecords::default();
    let mut state = started();

    let result = finalize(&mut state, &roster, &records, &owner()).await;

    assert!(matches!(
        result,
        Err(AttendanceError::Roster(RosterError::ClassNotFound(_)))
    ));
    assert!(state.is_active());
    assert!(records.written().is_empty());
}

#[tokio::test]
async fn test_new_session_can_start_after_finalize() {
    let roster = MemoryRoster::with_class(class());
    let records = MemoryRecords::default();
    let mut state = started();

    finalize(&mut state, &roster, &records, &owner())
        .await
        .expect("finalize");
    state
        .start(&class(), &uid("t-1"))
        .expect("restart after finalize");

    assert!(state.is_active());
    assert_eq!(state.active().unwrap().mark_count(), 0);
}

#[tokio::test]
async fn test_non_roster_mark_counts_present_but_writes_no_record() {
    let roster = MemoryRoster::with_class(class());
    let records = MemoryRecords::default();
    let mut state = started();
    state
        .mark(&owner(), uid("visitor"), AttendanceStatus::Present)
        .unwrap();

    let summary = finalize(&mut state, &roster, &records, &owner())
        .await
        .expect("finalize");

    assert_eq!(summary.present, 1);
    assert_eq!(summary.absent, 2);
    assert_eq!(summary.total, 3);
    let written = records.written();
    assert_eq!(written.len(), 3, "only roster members get records");
    assert!(written.iter().all(|r| r.student_id != uid("visitor")));
}
