//! # Rollcall
//!
//! Live classroom attendance coordination over WebSockets.
//!
//! A single server process holds at most one attendance session at a
//! time. Teachers mark students present or absent, every connected client
//! sees accepted marks in real time, students can query their own status,
//! and finalizing the session reconciles the marks against the class
//! roster and persists one record per enrolled student.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rollcall::prelude::*;
//!
//! // Implement Authenticator, RosterSource, and RecordStore, then:
//! // let server = RollcallServer::builder()
//! //     .bind("0.0.0.0:8080")
//! //     .build(auth, roster, records)
//! //     .await?;
//! // let handle = server.handle();
//! // server.run().await
//! ```

mod broadcast;
mod dispatch;
mod error;
mod handler;
mod server;

pub use error::RollcallError;
pub use server::{
    RollcallServer, RollcallServerBuilder, SessionHandle, SessionStarted,
};

/// Commonly used items, re-exported for one-line imports.
pub mod prelude {
    pub use crate::{
        RollcallError, RollcallServer, RollcallServerBuilder,
        SessionHandle, SessionStarted,
    };
    pub use rollcall_attendance::{
        AttendanceError, AttendanceRecord, ClassInfo, RecordError,
        RecordStore, RosterError, RosterSource,
    };
    pub use rollcall_protocol::{
        AttendanceStatus, ClassId, Identity, Role, SelfStatus,
        SessionSummary, UserId,
    };
    pub use rollcall_session::{Authenticator, SessionError};
}
