//! The connection registry: every live, authenticated client.
//!
//! The registry is the single authority on connection liveness. Each entry
//! pairs the connection's immutable identity tag (bound at admission,
//! never reassigned) with the unbounded queue feeding its writer task.
//! Nothing else in the system holds a connection reference past removal.
//!
//! # Concurrency note
//!
//! `ConnectionRegistry` is NOT thread-safe by itself — it uses a plain
//! `HashMap`, not a concurrent one. It is guarded by a single mutex one
//! level up (in the server state), and [`snapshot`](ConnectionRegistry::snapshot)
//! exists precisely so the broadcast engine can copy the recipient list
//! and release that lock before doing any delivery work.

use std::collections::HashMap;

use rollcall_protocol::Identity;
use rollcall_transport::ConnectionId;
use tokio::sync::mpsc;

/// The outbound queue handle for one connection.
///
/// Unbounded so enqueueing a frame never blocks a broadcast; a dead
/// connection surfaces as a send error when its writer task is gone.
pub type ClientSender = mpsc::UnboundedSender<Vec<u8>>;

/// One live, authenticated client.
#[derive(Debug, Clone)]
pub struct RegisteredClient {
    /// Who this connection belongs to. Immutable for its lifetime.
    pub identity: Identity,
    /// The connection's outbound frame queue.
    pub sender: ClientSender,
}

/// Tracks every live, authenticated connection.
///
/// O(1) insert and remove, keyed by [`ConnectionId`], so admission and
/// teardown stay constant-time however many clients are watching.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    clients: HashMap<ConnectionId, RegisteredClient>,
}

impl ConnectionRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Registers an admitted connection.
    ///
    /// Called only after the authenticator has verified the credential;
    /// a connection that fails admission never enters the registry (and
    /// therefore never appears in a broadcast snapshot).
    pub fn admit(
        &mut self,
        conn_id: ConnectionId,
        identity: Identity,
        sender: ClientSender,
    ) {
        tracing::info!(
            %conn_id,
            user_id = %identity.user_id,
            role = ?identity.role,
            "connection registered"
        );
        self.clients
            .insert(conn_id, RegisteredClient { identity, sender });
    }

    /// Removes a connection. Idempotent: removing an id that is already
    /// gone (closed handler racing a broadcast-detected death) is a no-op.
    pub fn remove(&mut self, conn_id: ConnectionId) {
        if self.clients.remove(&conn_id).is_some() {
            tracing::info!(%conn_id, "connection removed");
        }
    }

    /// Returns a point-in-time copy of every recipient.
    ///
    /// The broadcast engine iterates this copy with the registry lock
    /// released, so delivery never serializes against admissions or
    /// removals.
    pub fn snapshot(&self) -> Vec<(ConnectionId, ClientSender)> {
        self.clients
            .iter()
            .map(|(id, client)| (*id, client.sender.clone()))
            .collect()
    }

    /// Looks up a registered client by connection id.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<&RegisteredClient> {
        self.clients.get(conn_id)
    }

    /// Returns the number of live connections.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns `true` if no connections are registered.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
