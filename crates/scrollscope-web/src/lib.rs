#![forbid(unsafe_code)]

//! Browser-facing bridge for the scroll-scoping controller.
//!
//! This crate keeps the same shape as the core: no wasm bindings, no DOM
//! types, no global state. A thin JS shim owns the real element and event
//! loop; it pushes JSON-encoded events into a [`ScrollSession`] and applies
//! the returned decision (suppress the default action, wire or unwire
//! listeners, arm the refresh timer). Everything on this side is plain data,
//! which makes the whole input path replayable in tests.
//!
//! - [`input`] — the typed event schema and its JSON wire form.
//! - [`parser`] — decode/validate host JSON into typed events.
//! - [`session`] — the session driving one controller over that protocol.

pub mod input;
pub mod parser;
pub mod session;

pub use input::{HostEvent, Modifiers, TouchInput, TouchPhase, TouchPoint, WheelInput};
pub use parser::{InputParseError, encode_host_event, parse_host_event};
pub use session::{HostCommandJson, HostDecision, HostElement, ScrollSession, SessionConfig};
