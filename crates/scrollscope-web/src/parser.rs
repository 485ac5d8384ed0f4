#![forbid(unsafe_code)]

//! Parsing of host-encoded event JSON into [`HostEvent`] values.
//!
//! Accepts the schema produced by a JS shim (or a recorded trace) and
//! rejects payloads the controller must never see: non-finite geometry
//! would poison the cached metrics and boundary predicate, so it fails
//! here rather than deep in a dispatch.

use crate::input::{HostEvent, HostEventJson};

/// Errors from parsing encoded host-event JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON or unknown `kind`.
    Json(String),
    /// A numeric field carried a non-finite or negative value.
    InvalidField(&'static str),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::InvalidField(field) => write!(f, "invalid value for field: {field}"),
        }
    }
}

impl std::error::Error for InputParseError {}

/// Parse one encoded host event.
pub fn parse_host_event(json: &str) -> Result<HostEvent, InputParseError> {
    let decoded: HostEventJson =
        serde_json::from_str(json).map_err(|err| InputParseError::Json(err.to_string()))?;
    let event = HostEvent::from(decoded);
    validate(&event)?;
    Ok(event)
}

/// Encode a host event back into its stable JSON form (for traces).
#[must_use]
pub fn encode_host_event(event: &HostEvent) -> String {
    // The schema contains no map keys or non-string tags; encoding cannot
    // fail for values this crate constructs.
    serde_json::to_string(&HostEventJson::from(event)).unwrap_or_default()
}

fn validate(event: &HostEvent) -> Result<(), InputParseError> {
    match event {
        HostEvent::Wheel(wheel) => {
            if !wheel.dy.is_finite() || !wheel.dx.is_finite() {
                return Err(InputParseError::InvalidField("dy"));
            }
            if !wheel.scroll_top.is_finite() || wheel.scroll_top < 0.0 {
                return Err(InputParseError::InvalidField("scroll_top"));
            }
        }
        HostEvent::Touch(touch) => {
            if !touch.scroll_top.is_finite() || touch.scroll_top < 0.0 {
                return Err(InputParseError::InvalidField("scroll_top"));
            }
            if touch.touches.iter().any(|t| !t.y.is_finite()) {
                return Err(InputParseError::InvalidField("touches"));
            }
        }
        HostEvent::Measure {
            scroll_extent,
            client_extent,
        } => {
            if !scroll_extent.is_finite() || *scroll_extent < 0.0 {
                return Err(InputParseError::InvalidField("scroll_extent"));
            }
            if !client_extent.is_finite() || *client_extent < 0.0 {
                return Err(InputParseError::InvalidField("client_extent"));
            }
        }
        HostEvent::ResizeSignal { .. }
        | HostEvent::MutationSignal { .. }
        | HostEvent::RefreshTimer { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{InputParseError, encode_host_event, parse_host_event};
    use crate::input::HostEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_wheel_event() {
        let event = parse_host_event(r#"{"kind":"wheel","dx":0.0,"dy":-3.0,"scroll_top":0.0}"#)
            .expect("parse");
        let HostEvent::Wheel(wheel) = event else {
            panic!("expected wheel");
        };
        assert_eq!(wheel.dy, -3.0);
    }

    #[test]
    fn parses_signals_and_measures() {
        assert!(matches!(
            parse_host_event(r#"{"kind":"mutation","now_ms":40}"#),
            Ok(HostEvent::MutationSignal { now_ms: 40 })
        ));
        assert!(matches!(
            parse_host_event(r#"{"kind":"measure","scroll_extent":1000.0,"client_extent":400.0}"#),
            Ok(HostEvent::Measure { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_host_event("{not json"),
            Err(InputParseError::Json(_))
        ));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(matches!(
            parse_host_event(r#"{"kind":"pinch","scale":2.0}"#),
            Err(InputParseError::Json(_))
        ));
    }

    #[test]
    fn rejects_non_finite_geometry() {
        // JSON has no literal infinity; a null dy is the realistic failure.
        assert!(matches!(
            parse_host_event(r#"{"kind":"wheel","dx":0.0,"dy":null,"scroll_top":0.0}"#),
            Err(InputParseError::Json(_))
        ));
        assert_eq!(
            parse_host_event(r#"{"kind":"wheel","dx":0.0,"dy":1.0,"scroll_top":-5.0}"#),
            Err(InputParseError::InvalidField("scroll_top"))
        );
        assert_eq!(
            parse_host_event(
                r#"{"kind":"measure","scroll_extent":-1.0,"client_extent":400.0}"#
            ),
            Err(InputParseError::InvalidField("scroll_extent"))
        );
    }

    #[test]
    fn encode_parse_round_trip() {
        let event =
            parse_host_event(r#"{"kind":"resize","now_ms":120}"#).expect("parse");
        let json = encode_host_event(&event);
        assert_eq!(parse_host_event(&json).expect("reparse"), event);
    }
}
