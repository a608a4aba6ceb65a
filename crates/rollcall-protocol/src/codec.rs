//! Codec trait and implementations for the event wire format.
//!
//! The layers above never touch raw serialization: they hand outbound
//! events to [`Codec::encode`] and run every inbound frame through
//! [`Codec::decode_event`]. Decoding does more than deserialize — it
//! classifies failures, because the two failure modes get different
//! client-facing errors: a frame that isn't valid JSON (or has the wrong
//! shape) is an "Invalid message format", while a well-formed frame whose
//! `event` tag names no known kind is an "Unknown event".

use serde::Serialize;

use crate::{ProtocolError, CLIENT_EVENT_KINDS, ClientEvent};

/// Encodes outbound events and decodes inbound client frames.
///
/// `Send + Sync + 'static` because one codec instance is shared across all
/// connection tasks for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes an outbound value into a wire frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Parses an inbound frame into a [`ClientEvent`].
    ///
    /// # Errors
    /// - [`ProtocolError::InvalidFormat`] — not JSON, no `event` tag, or
    ///   a payload that doesn't match the event's schema.
    /// - [`ProtocolError::UnknownEvent`] — valid frame, unrecognized tag.
    fn decode_event(
        &self,
        data: &[u8],
    ) -> Result<ClientEvent, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] speaking the JSON `{event, data}` wire format.
///
/// Behind the `json` feature flag (enabled by default) so a binary codec
/// can replace it without dragging `serde_json` along.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode_event(
        &self,
        data: &[u8],
    ) -> Result<ClientEvent, ProtocolError> {
        // Two-phase parse: first as a bare JSON value to classify the
        // `event` tag, then as the typed enum.
        let value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|_| ProtocolError::InvalidFormat)?;

        let kind = value
            .get("event")
            .and_then(serde_json::Value::as_str)
            .ok_or(ProtocolError::InvalidFormat)?;

        if !CLIENT_EVENT_KINDS.contains(&kind) {
            return Err(ProtocolError::UnknownEvent {
                kind: kind.to_string(),
            });
        }

        serde_json::from_value(value)
            .map_err(|_| ProtocolError::InvalidFormat)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{AttendanceStatus, ServerEvent, UserId};

    #[test]
    fn test_decode_event_valid_mark() {
        let codec = JsonCodec;
        let wire = br#"{"event":"ATTENDANCE_MARKED","data":{"studentId":"s-1","status":"present"}}"#;

        let event = codec.decode_event(wire).expect("should decode");
        assert_eq!(
            event,
            ClientEvent::AttendanceMarked {
                student_id: UserId::from("s-1"),
                status: AttendanceStatus::Present,
            }
        );
    }

    #[test]
    fn test_decode_event_garbage_is_invalid_format() {
        let codec = JsonCodec;
        let result = codec.decode_event(b"{{{{not json");
        assert!(matches!(result, Err(ProtocolError::InvalidFormat)));
    }

    #[test]
    fn test_decode_event_missing_event_tag_is_invalid_format() {
        let codec = JsonCodec;
        let result = codec.decode_event(br#"{"data": {}}"#);
        assert!(matches!(result, Err(ProtocolError::InvalidFormat)));
    }

    #[test]
    fn test_decode_event_non_string_tag_is_invalid_format() {
        let codec = JsonCodec;
        let result = codec.decode_event(br#"{"event": 7, "data": {}}"#);
        assert!(matches!(result, Err(ProtocolError::InvalidFormat)));
    }

    #[test]
    fn test_decode_event_unknown_kind_is_unknown_event() {
        let codec = JsonCodec;
        let result =
            codec.decode_event(br#"{"event": "LAUNCH", "data": {}}"#);
        match result {
            Err(ProtocolError::UnknownEvent { kind }) => {
                assert_eq!(kind, "LAUNCH");
            }
            other => panic!("expected UnknownEvent, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_event_known_kind_bad_payload_is_invalid_format() {
        // Recognized tag, but the payload violates the mark schema.
        let codec = JsonCodec;
        let result = codec.decode_event(
            br#"{"event":"ATTENDANCE_MARKED","data":{"status":"late"}}"#,
        );
        assert!(matches!(result, Err(ProtocolError::InvalidFormat)));
    }

    #[test]
    fn test_error_display_matches_client_messages() {
        assert_eq!(
            ProtocolError::InvalidFormat.to_string(),
            "Invalid message format"
        );
        assert_eq!(
            ProtocolError::UnknownEvent {
                kind: "X".to_string()
            }
            .to_string(),
            "Unknown event"
        );
    }

    #[test]
    fn test_encode_decode_round_trip_via_value() {
        let codec = JsonCodec;
        let event = ServerEvent::error("Unknown event");
        let bytes = codec.encode(&event).unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["event"], "ERROR");
    }
}
