#![forbid(unsafe_code)]

//! Cached scrollable metrics and the boundary predicate.
//!
//! The controller never re-measures the element on the wheel/touch hot path;
//! it evaluates boundaries against the last completed refresh. Until the
//! first measurement both extents are [`ScrollMetrics::UNBOUNDED`], which
//! makes the bottom predicate unsatisfiable (`top >= inf - inf` is a NaN
//! comparison) and therefore never suppresses an event on stale data.

use crate::element::ScrollElement;

/// Last-refreshed scroll geometry of the target element.
///
/// `scroll_extent` is the full content height (`scrollHeight`) and
/// `client_extent` the visible viewport height (`clientHeight`). Both are
/// read together and only ever consumed through [`ScrollMetrics::at_top`] /
/// [`ScrollMetrics::at_bottom`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Scroll-content extent in CSS pixels.
    pub scroll_extent: f64,
    /// Visible viewport extent in CSS pixels.
    pub client_extent: f64,
}

impl ScrollMetrics {
    /// Sentinel "not yet measured" metrics.
    pub const UNBOUNDED: Self = Self {
        scroll_extent: f64::INFINITY,
        client_extent: f64::INFINITY,
    };

    /// Measure both extents from the element in one pass.
    #[must_use]
    pub fn measure<E: ScrollElement>(element: &E) -> Self {
        Self {
            scroll_extent: element.scroll_extent(),
            client_extent: element.client_extent(),
        }
    }

    /// Whether the element is scrolled to its very top.
    #[must_use]
    pub fn at_top(&self, scroll_top: f64) -> bool {
        scroll_top == 0.0
    }

    /// Whether the element is scrolled to (or past) its bottom boundary.
    ///
    /// Returns `false` while unmeasured: the sentinel extents make the
    /// comparison `NaN` and a never-measured element never suppresses.
    #[must_use]
    pub fn at_bottom(&self, scroll_top: f64) -> bool {
        scroll_top >= self.scroll_extent - self.client_extent
    }

    /// Whether these metrics still hold the unmeasured sentinel.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.scroll_extent.is_infinite() && self.client_extent.is_infinite()
    }
}

impl Default for ScrollMetrics {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
