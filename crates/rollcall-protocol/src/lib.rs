//! Wire protocol for Rollcall.
//!
//! This crate defines the language that attendance clients and the server
//! speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Identity`],
//!   [`AttendanceStatus`], etc.) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those events are
//!   converted to and from byte frames, including the classification of
//!   malformed vs unrecognized inbound frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong, with `Display`
//!   strings that double as the client-facing error messages.
//!
//! The protocol layer sits between transport (raw frames) and session
//! (connection identity). It knows nothing about connections, the registry,
//! or the attendance state machine.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AttendanceStatus, ClassId, ClientEvent, Identity, Role, SelfStatus,
    ServerEvent, SessionSummary, UserId, CLIENT_EVENT_KINDS,
};
