#![forbid(unsafe_code)]

//! Deterministic, JSON-friendly input schema for `scrollscope-web`.
//!
//! The web host (JS/TS) encodes DOM events into this schema and pushes them
//! to the session; the same encoding doubles as a record/replay format. The
//! schema is intentionally small and stable: a `kind` tag plus the minimum
//! semantic fields the controller needs.
//!
//! Events that the controller reads live from the element in a browser
//! (`scrollTop`) are captured *in* the event by the host's handler, so a
//! replayed trace evaluates against exactly the offsets the handlers saw.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held during an input event, encoded as a compact `u8`
    /// bitset in JSON (`mods`). Carried for logs/traces; suppression
    /// decisions never depend on modifiers.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One contact point in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// Normalized wheel event with the scroll offset read at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub dx: f64,
    pub dy: f64,
    /// `scrollTop` of the scoped element when the handler ran.
    pub scroll_top: f64,
    pub mods: Modifiers,
}

/// Normalized touch event with the scroll offset read at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
    pub scroll_top: f64,
    pub mods: Modifiers,
}

/// One host-pushed event for the scroll session.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Wheel(WheelInput),
    Touch(TouchInput),
    /// Window resize or size-observer callback.
    ResizeSignal {
        /// Monotonic host time in milliseconds.
        now_ms: u64,
    },
    /// Mutation-observer callback.
    MutationSignal { now_ms: u64 },
    /// The refresh timer armed by a `schedule_refresh_timer` command fired.
    RefreshTimer { now_ms: u64 },
    /// Freshly measured element extents (host performed the layout read).
    Measure {
        scroll_extent: f64,
        client_extent: f64,
    },
}

/// JSON wire encoding of [`HostEvent`].
///
/// A `kind` tag plus flat fields, mirroring what a thin JS shim assembles
/// from `WheelEvent` / `TouchEvent` / observer callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEventJson {
    Wheel {
        dx: f64,
        dy: f64,
        scroll_top: f64,
        #[serde(default)]
        mods: u8,
    },
    Touch {
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
        scroll_top: f64,
        #[serde(default)]
        mods: u8,
    },
    Resize {
        now_ms: u64,
    },
    Mutation {
        now_ms: u64,
    },
    RefreshTimer {
        now_ms: u64,
    },
    Measure {
        scroll_extent: f64,
        client_extent: f64,
    },
}

impl From<HostEventJson> for HostEvent {
    fn from(json: HostEventJson) -> Self {
        match json {
            HostEventJson::Wheel {
                dx,
                dy,
                scroll_top,
                mods,
            } => Self::Wheel(WheelInput {
                dx,
                dy,
                scroll_top,
                mods: Modifiers::from_bits_truncate(mods),
            }),
            HostEventJson::Touch {
                phase,
                touches,
                scroll_top,
                mods,
            } => Self::Touch(TouchInput {
                phase,
                touches,
                scroll_top,
                mods: Modifiers::from_bits_truncate(mods),
            }),
            HostEventJson::Resize { now_ms } => Self::ResizeSignal { now_ms },
            HostEventJson::Mutation { now_ms } => Self::MutationSignal { now_ms },
            HostEventJson::RefreshTimer { now_ms } => Self::RefreshTimer { now_ms },
            HostEventJson::Measure {
                scroll_extent,
                client_extent,
            } => Self::Measure {
                scroll_extent,
                client_extent,
            },
        }
    }
}

impl From<&HostEvent> for HostEventJson {
    fn from(event: &HostEvent) -> Self {
        match event {
            HostEvent::Wheel(wheel) => Self::Wheel {
                dx: wheel.dx,
                dy: wheel.dy,
                scroll_top: wheel.scroll_top,
                mods: wheel.mods.bits(),
            },
            HostEvent::Touch(touch) => Self::Touch {
                phase: touch.phase,
                touches: touch.touches.clone(),
                scroll_top: touch.scroll_top,
                mods: touch.mods.bits(),
            },
            HostEvent::ResizeSignal { now_ms } => Self::Resize { now_ms: *now_ms },
            HostEvent::MutationSignal { now_ms } => Self::Mutation { now_ms: *now_ms },
            HostEvent::RefreshTimer { now_ms } => Self::RefreshTimer { now_ms: *now_ms },
            HostEvent::Measure {
                scroll_extent,
                client_extent,
            } => Self::Measure {
                scroll_extent: *scroll_extent,
                client_extent: *client_extent,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HostEvent, HostEventJson, Modifiers, TouchPhase, TouchPoint, WheelInput};
    use pretty_assertions::assert_eq;

    #[test]
    fn wheel_json_shape_is_stable() {
        let event = HostEvent::Wheel(WheelInput {
            dx: 0.0,
            dy: -120.0,
            scroll_top: 0.0,
            mods: Modifiers::SHIFT,
        });
        let json = serde_json::to_string(&HostEventJson::from(&event)).expect("encode");
        assert_eq!(
            json,
            r#"{"kind":"wheel","dx":0.0,"dy":-120.0,"scroll_top":0.0,"mods":1}"#
        );
    }

    #[test]
    fn touch_round_trips() {
        let original = HostEventJson::Touch {
            phase: TouchPhase::Move,
            touches: vec![TouchPoint {
                id: 3,
                x: 10.0,
                y: 540.0,
            }],
            scroll_top: 600.0,
            mods: 0,
        };
        let json = serde_json::to_string(&original).expect("encode");
        let back: HostEventJson = serde_json::from_str(&json).expect("decode");
        assert_eq!(back, original);
    }

    #[test]
    fn mods_default_to_empty_when_absent() {
        let json = r#"{"kind":"wheel","dx":0.0,"dy":5.0,"scroll_top":100.0}"#;
        let decoded: HostEventJson = serde_json::from_str(json).expect("decode");
        let HostEvent::Wheel(wheel) = HostEvent::from(decoded) else {
            panic!("expected wheel event");
        };
        assert_eq!(wheel.mods, Modifiers::empty());
    }

    #[test]
    fn unknown_mod_bits_are_truncated() {
        let json = r#"{"kind":"wheel","dx":0.0,"dy":5.0,"scroll_top":0.0,"mods":255}"#;
        let decoded: HostEventJson = serde_json::from_str(json).expect("decode");
        let HostEvent::Wheel(wheel) = HostEvent::from(decoded) else {
            panic!("expected wheel event");
        };
        assert_eq!(wheel.mods, Modifiers::all());
    }
}
