#![forbid(unsafe_code)]

//! Scripted [`ScrollElement`] for deterministic tests.
//!
//! Available to downstream crates behind the `test-helpers` feature. The
//! element records containment writes and counts layout reads so tests can
//! assert what the controller touched and how often.

use core::cell::Cell;

use crate::element::ScrollElement;

/// In-memory element with scripted geometry and capability flags.
#[derive(Debug, Clone)]
pub struct TestElement {
    containment_supported: bool,
    /// Last containment value written, `None` until the first write.
    containment: Option<bool>,
    connected: bool,
    scroll_top: f64,
    scroll_extent: f64,
    client_extent: f64,
    /// Layout reads of the content extent; one per metrics refresh.
    measure_count: Cell<u32>,
}

impl TestElement {
    /// Element whose style surface accepts overscroll containment.
    #[must_use]
    pub fn native() -> Self {
        Self {
            containment_supported: true,
            containment: None,
            connected: true,
            scroll_top: 0.0,
            scroll_extent: 1000.0,
            client_extent: 400.0,
            measure_count: Cell::new(0),
        }
    }

    /// Element without native support, with the given extents.
    #[must_use]
    pub fn manual(scroll_extent: f64, client_extent: f64) -> Self {
        Self {
            containment_supported: false,
            containment: None,
            connected: true,
            scroll_top: 0.0,
            scroll_extent,
            client_extent,
            measure_count: Cell::new(0),
        }
    }

    /// Last containment value the controller wrote, if any.
    #[must_use]
    pub const fn containment(&self) -> Option<bool> {
        self.containment
    }

    /// Number of metrics refreshes that read this element.
    #[must_use]
    pub fn measure_count(&self) -> u32 {
        self.measure_count.get()
    }

    /// Script whether the element is attached to a document.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Script the current scroll offset.
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }

    /// Script both extents, simulating content or viewport growth.
    pub fn set_extents(&mut self, scroll_extent: f64, client_extent: f64) {
        self.scroll_extent = scroll_extent;
        self.client_extent = client_extent;
    }
}

impl ScrollElement for TestElement {
    fn supports_overscroll_containment(&self) -> bool {
        self.containment_supported
    }

    fn set_overscroll_containment(&mut self, contained: bool) {
        self.containment = Some(contained);
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_extent(&self) -> f64 {
        self.measure_count.set(self.measure_count.get() + 1);
        self.scroll_extent
    }

    fn client_extent(&self) -> f64 {
        self.client_extent
    }
}
