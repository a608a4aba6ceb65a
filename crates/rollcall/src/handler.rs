//! Per-connection handler: admission, writer task, and the read loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Verify the handshake credential → get an [`Identity`]
//!   2. Register in the connection registry with an outbound queue
//!   3. Spawn the writer task draining that queue into the socket
//!   4. Loop: receive frames → dispatch events
//!
//! The handler task is the only reader; the writer task is the only
//! sender. Dispatch and broadcast never touch the socket directly — they
//! enqueue frames, so a slow client can't stall anyone else.

use std::sync::Arc;

use rollcall_attendance::{RecordStore, RosterSource};
use rollcall_protocol::{Codec, ServerEvent};
use rollcall_session::Authenticator;
use rollcall_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::RollcallError;
use crate::dispatch::dispatch;
use crate::server::ServerState;

/// Drop guard that removes a connection's registry entry when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct RegistryGuard<A, R, S, C>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    conn_id: ConnectionId,
    state: Arc<ServerState<A, R, S, C>>,
}

impl<A, R, S, C> Drop for RegistryGuard<A, R, S, C>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.registry.lock().await.remove(conn_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, R, S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, R, S, C>>,
) -> Result<(), RollcallError>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: Admission ---
    // A connection arriving without a token is verified with the empty
    // string; real authenticators reject it.
    let token = conn.credential().unwrap_or("");
    let identity = match state.auth.authenticate(token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::info!(%conn_id, error = %e, "admission rejected");
            let frame =
                state.codec.encode(&ServerEvent::error(e.to_string()))?;
            let _ = conn.send(&frame).await;
            let _ = conn.close().await;
            return Err(RollcallError::Session(e));
        }
    };

    tracing::info!(
        %conn_id,
        user_id = %identity.user_id,
        role = ?identity.role,
        "client admitted"
    );

    // --- Step 2: Registration ---
    // Register and guard atomically: once the entry exists, the guard is
    // active and will remove it however the handler exits.
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    state
        .registry
        .lock()
        .await
        .admit(conn_id, identity.clone(), tx.clone());
    let _guard = RegistryGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    // --- Step 3: Writer task ---
    // Sole sender on this socket. Exits once every queue handle is gone:
    // the local `tx` when this function returns, the registry's clone when
    // the guard's removal lands.
    let conn = Arc::new(conn);
    let writer_conn = Arc::clone(&conn);
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if writer_conn.send(&frame).await.is_err() {
                break;
            }
        }
        let _ = writer_conn.close().await;
    });

    // --- Step 4: Read loop ---
    loop {
        match conn.recv().await {
            Ok(Some(data)) => {
                dispatch(&state, &identity, &tx, &data).await?;
            }
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        }
    }

    // _guard drops here → registry removal fires → writer task drains
    // and closes the socket.
    Ok(())
}
