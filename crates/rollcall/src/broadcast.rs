//! Broadcast engine: deliver one event to every live connection.
//!
//! Delivery is enqueue-only. The event is encoded once, the recipient
//! list is copied out of the registry, and the registry lock is released
//! before any frame moves — an admission or removal never waits on a
//! fan-out, and a slow socket only backs up its own writer task.

use std::sync::Arc;

use rollcall_attendance::{RecordStore, RosterSource};
use rollcall_protocol::{Codec, ServerEvent};
use rollcall_session::Authenticator;

use crate::RollcallError;
use crate::server::ServerState;

/// Sends an event to every registered connection.
///
/// A failed enqueue means the connection's writer task is gone; such
/// connections are removed from the registry after the fan-out. Removal
/// races the handler's own drop guard harmlessly — registry removal is
/// idempotent.
pub(crate) async fn broadcast<A, R, S, C>(
    state: &Arc<ServerState<A, R, S, C>>,
    event: &ServerEvent,
) -> Result<(), RollcallError>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    let frame = state.codec.encode(event)?;
    let recipients = state.registry.lock().await.snapshot();

    let mut dead = Vec::new();
    for (conn_id, sender) in recipients {
        if sender.send(frame.clone()).is_err() {
            dead.push(conn_id);
        }
    }

    if !dead.is_empty() {
        let mut registry = state.registry.lock().await;
        for conn_id in dead {
            tracing::warn!(
                %conn_id,
                "removing dead connection found during broadcast"
            );
            registry.remove(conn_id);
        }
    }

    Ok(())
}
