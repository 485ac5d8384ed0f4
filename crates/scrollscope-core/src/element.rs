#![forbid(unsafe_code)]

//! Injected capability handles for the target element and its environment.
//!
//! The controller never touches ambient globals. Everything it needs from the
//! browser is split into:
//! - [`ScrollElement`] — the style/geometry surface of the one element the
//!   controller wraps, injected at construction, and
//! - [`EnvCapabilities`] — a probe result describing which optional
//!   observation capabilities the host environment offers.
//!
//! Wiring the controller cannot perform itself (listener registration,
//! observers, timers) is expressed as [`HostCommand`](crate::HostCommand)
//! values the host applies.

/// Capability handle for the wrapped scrollable element.
///
/// The element is owned externally; implementations attach behavior to it but
/// never manage its lifecycle. A wasm deployment wraps the live DOM node; a
/// test or replay host mirrors the values it recorded.
pub trait ScrollElement {
    /// Whether the element's style surface accepts the "contain overscroll"
    /// property.
    fn supports_overscroll_containment(&self) -> bool;

    /// Apply (`true`) or clear (`false`) the containing style value.
    ///
    /// Idempotent by contract: re-applying an already-applied value is safe.
    fn set_overscroll_containment(&mut self, contained: bool);

    /// Whether the element is attached to a live document.
    fn is_connected(&self) -> bool;

    /// Current vertical scroll offset in CSS pixels.
    fn scroll_top(&self) -> f64;

    /// Full scroll-content height (`scrollHeight`). Forces a layout read.
    fn scroll_extent(&self) -> f64;

    /// Visible viewport height (`clientHeight`). Forces a layout read.
    fn client_extent(&self) -> f64;
}

/// Probe result for optional host-environment observation capabilities.
///
/// Absence of a capability silently selects the next strategy tier; it is
/// never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvCapabilities {
    /// A size-observation capability (such as `ResizeObserver`) exists.
    pub size_observer: bool,
    /// A DOM-mutation-observation capability exists.
    pub mutation_observer: bool,
}

impl EnvCapabilities {
    /// No optional capabilities: window resize is the only refresh signal.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            size_observer: false,
            mutation_observer: false,
        }
    }

    /// Every optional capability present.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            size_observer: true,
            mutation_observer: true,
        }
    }
}
