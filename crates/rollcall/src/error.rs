//! Unified error type for the Rollcall coordinator.

use rollcall_attendance::AttendanceError;
use rollcall_protocol::ProtocolError;
use rollcall_session::SessionError;
use rollcall_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `rollcall` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RollcallError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, unknown event).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An admission-level error (credential rejected).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An attendance domain error (state machine, roster, persistence).
    #[error(transparent)]
    Attendance(#[from] AttendanceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ReceiveFailed(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "gone",
        ));
        let rollcall_err: RollcallError = err.into();
        assert!(matches!(rollcall_err, RollcallError::Transport(_)));
        assert!(rollcall_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidFormat;
        let rollcall_err: RollcallError = err.into();
        assert!(matches!(rollcall_err, RollcallError::Protocol(_)));
        assert_eq!(rollcall_err.to_string(), "Invalid message format");
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::unauthorized("nope");
        let rollcall_err: RollcallError = err.into();
        assert!(matches!(rollcall_err, RollcallError::Session(_)));
        assert_eq!(
            rollcall_err.to_string(),
            "Unauthorized or invalid token"
        );
    }

    #[test]
    fn test_from_attendance_error() {
        let err = AttendanceError::NoActiveSession;
        let rollcall_err: RollcallError = err.into();
        assert!(matches!(rollcall_err, RollcallError::Attendance(_)));
        assert_eq!(
            rollcall_err.to_string(),
            "No active attendance session"
        );
    }
}
