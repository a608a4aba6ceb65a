//! Connection admission and the live-client registry for Rollcall.
//!
//! This crate handles everything between a raw accepted connection and a
//! client the dispatcher is willing to talk to:
//!
//! 1. **Verification** — the [`Authenticator`] trait turns the handshake
//!    credential into an [`Identity`](rollcall_protocol::Identity).
//! 2. **Registration** — the [`ConnectionRegistry`] tracks every live,
//!    authenticated connection together with its outbound frame queue.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server layer (above)   ← admits connections, broadcasts via snapshots
//!     ↕
//! Session layer (this crate)  ← identity verification + live-client set
//!     ↕
//! Protocol layer (below)  ← provides Identity, Role, event types
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod registry;

pub use auth::Authenticator;
pub use error::SessionError;
pub use registry::{ClientSender, ConnectionRegistry, RegisteredClient};
