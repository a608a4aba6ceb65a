//! Runnable demo: one hard-coded class, prefix tokens, records logged
//! instead of persisted.
//!
//! Start it, then connect with a WebSocket client:
//!
//! ```text
//! websocat "ws://127.0.0.1:8080/?token=teacher:t-1"
//! websocat "ws://127.0.0.1:8080/?token=student:s-1"
//! ```
//!
//! and send frames like:
//!
//! ```text
//! {"event":"ATTENDANCE_MARKED","data":{"studentId":"s-1","status":"present"}}
//! {"event":"TODAY_SUMMARY","data":{}}
//! {"event":"DONE","data":{}}
//! ```

use rollcall::prelude::*;

/// Accepts `teacher:<id>` and `student:<id>` tokens. Demo only.
struct PrefixAuth;

impl Authenticator for PrefixAuth {
    async fn authenticate(
        &self,
        token: &str,
    ) -> Result<Identity, SessionError> {
        match token.split_once(':') {
            Some(("teacher", id)) => Ok(Identity::new(id, Role::Teacher)),
            Some(("student", id)) => Ok(Identity::new(id, Role::Student)),
            _ => Err(SessionError::unauthorized("unrecognized token")),
        }
    }
}

/// One static class: `homeroom`, taught by `t-1`, five students.
struct StaticRoster;

impl RosterSource for StaticRoster {
    async fn class_info(
        &self,
        class_id: &ClassId,
    ) -> Result<ClassInfo, RosterError> {
        if class_id != &ClassId::from("homeroom") {
            return Err(RosterError::ClassNotFound(class_id.clone()));
        }
        Ok(ClassInfo {
            class_id: class_id.clone(),
            teacher_id: UserId::from("t-1"),
            students: (1..=5)
                .map(|n| UserId::from(format!("s-{n}").as_str()))
                .collect(),
        })
    }
}

/// Logs each record instead of writing it anywhere durable.
struct LoggingRecords;

impl RecordStore for LoggingRecords {
    async fn create(
        &self,
        record: AttendanceRecord,
    ) -> Result<(), RecordError> {
        tracing::info!(
            student_id = %record.student_id,
            class_id = %record.class_id,
            status = %record.status,
            "attendance record"
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), RollcallError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let server = RollcallServerBuilder::new()
        .bind("127.0.0.1:8080")
        .build(PrefixAuth, StaticRoster, LoggingRecords)
        .await?;

    tracing::info!(
        addr = %server.local_addr().expect("bound listener has an addr"),
        "classroom demo listening"
    );

    // Kick off a session immediately so clients can mark right away.
    let handle = server.handle();
    let started = handle
        .start_session(&ClassId::from("homeroom"), &UserId::from("t-1"))
        .await?;
    tracing::info!(
        class_id = %started.class_id,
        roster_size = started.roster_size,
        "session started"
    );

    server.run().await
}
