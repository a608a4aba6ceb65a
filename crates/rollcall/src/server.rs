//! `RollcallServer` builder and server loop.
//!
//! This is the entry point for running a Rollcall attendance coordinator.
//! It ties together all the layers: transport → protocol → session →
//! attendance.

use std::sync::Arc;

use rollcall_attendance::{RecordStore, RosterSource, SessionState};
use rollcall_protocol::{ClassId, Codec, JsonCodec, UserId};
use rollcall_session::{Authenticator, ConnectionRegistry};
use rollcall_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::RollcallError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The two
/// mutexes are never held at the same time: the registry lock covers
/// admissions, removals, and broadcast snapshots; the session lock covers
/// state-machine transitions.
pub(crate) struct ServerState<A, R, S, C> {
    pub(crate) registry: Mutex<ConnectionRegistry>,
    pub(crate) session: Mutex<SessionState>,
    pub(crate) auth: A,
    pub(crate) roster: R,
    pub(crate) records: S,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Rollcall server.
///
/// # Example
///
/// ```rust,ignore
/// use rollcall::prelude::*;
///
/// let server = RollcallServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(my_auth, my_roster, my_records)
///     .await?;
/// server.run().await
/// ```
pub struct RollcallServerBuilder {
    bind_addr: String,
}

impl RollcallServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Builds the server with the given authenticator, roster source, and
    /// record store.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` as defaults.
    pub async fn build<A, R, S>(
        self,
        auth: A,
        roster: R,
        records: S,
    ) -> Result<RollcallServer<A, R, S, JsonCodec>, RollcallError>
    where
        A: Authenticator,
        R: RosterSource,
        S: RecordStore,
    {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(ConnectionRegistry::new()),
            session: Mutex::new(SessionState::new()),
            auth,
            roster,
            records,
            codec: JsonCodec,
        });

        Ok(RollcallServer { transport, state })
    }
}

impl Default for RollcallServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Rollcall attendance server.
///
/// Call [`run()`](Self::run) to start accepting connections. Session
/// starts arrive out-of-band (a class-management surface, not a socket
/// event), so grab a [`SessionHandle`] via [`handle()`](Self::handle)
/// before consuming the server with `run()`.
pub struct RollcallServer<A, R, S, C> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, R, S, C>>,
}

impl<A, R, S, C> RollcallServer<A, R, S, C>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    /// Creates a new builder.
    pub fn builder() -> RollcallServerBuilder {
        RollcallServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle for out-of-band session control.
    pub fn handle(&self) -> SessionHandle<A, R, S, C> {
        SessionHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections, verifies their credential, and
    /// spawns a handler task for each admitted client. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), RollcallError> {
        tracing::info!("Rollcall server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Confirmation that a session started: the class and its roster size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStarted {
    /// The class the new session is for.
    pub class_id: ClassId,
    /// Number of enrolled students (each gets a record at finalize).
    pub roster_size: usize,
}

/// Out-of-band control over the singleton attendance session.
///
/// Cheap to clone; all clones drive the same server.
pub struct SessionHandle<A, R, S, C> {
    state: Arc<ServerState<A, R, S, C>>,
}

impl<A, R, S, C> Clone for SessionHandle<A, R, S, C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<A, R, S, C> SessionHandle<A, R, S, C>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    /// Starts an attendance session for a class.
    ///
    /// The roster lookup happens before the session lock is taken, so a
    /// slow roster backend never stalls mark dispatch.
    ///
    /// # Errors
    /// - [`AttendanceError::NotClassTeacher`] — `teacher_id` is not the
    ///   class's teacher-of-record.
    /// - [`AttendanceError::SessionAlreadyActive`] — a session is already
    ///   in progress; finalize it first.
    /// - [`AttendanceError::Roster`] — the class is unknown or the
    ///   backend failed.
    ///
    /// [`AttendanceError::NotClassTeacher`]: rollcall_attendance::AttendanceError::NotClassTeacher
    /// [`AttendanceError::SessionAlreadyActive`]: rollcall_attendance::AttendanceError::SessionAlreadyActive
    /// [`AttendanceError::Roster`]: rollcall_attendance::AttendanceError::Roster
    pub async fn start_session(
        &self,
        class_id: &ClassId,
        teacher_id: &UserId,
    ) -> Result<SessionStarted, RollcallError> {
        let class = self
            .state
            .roster
            .class_info(class_id)
            .await
            .map_err(rollcall_attendance::AttendanceError::from)?;

        let mut session = self.state.session.lock().await;
        session.start(&class, teacher_id)?;

        Ok(SessionStarted {
            class_id: class.class_id.clone(),
            roster_size: class.roster_size(),
        })
    }

    /// Returns `true` if an attendance session is in progress.
    pub async fn is_active(&self) -> bool {
        self.state.session.lock().await.is_active()
    }
}
