#![forbid(unsafe_code)]

//! `scrollscope-core` scopes scroll input to one element, suppressing
//! scroll chaining exactly at the element's top/bottom boundary.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes wheel/touch
//!   events, refresh signals, and timer deadlines; the controller answers
//!   with suppress-default decisions and wiring commands.
//! - **Deterministic time**: the host supplies monotonic timestamps
//!   explicitly; no wall clocks, no real timers.
//! - **No globals**: the element and the environment probe are injected
//!   capability handles, so the core runs (and is tested) without a browser
//!   runtime and is suitable for `wasm32-unknown-unknown`.
//!
//! The only stateful component is [`ScrollScope`]. It selects one strategy
//! at [`ScrollScope::init`] — native overscroll containment when the style
//! surface supports it, manual wheel/touch interception otherwise — and
//! exposes the enable/disable/destroy lifecycle around it.

pub mod controller;
pub mod element;
pub mod gesture;
pub mod metrics;
pub mod throttle;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_element;

pub use controller::{
    DispatchOutcome, DispatchPhase, HostCommand, IgnoredReason, ScrollDispatch, ScrollLogEntry,
    ScrollScope, ScrollScopeError, Strategy,
};
pub use element::{EnvCapabilities, ScrollElement};
pub use gesture::{TouchContact, TouchTracker};
pub use metrics::ScrollMetrics;
pub use throttle::{ThrottleSignal, TrailingThrottle};
