#![forbid(unsafe_code)]

//! Single-finger touch gesture tracking.
//!
//! A gesture spans one touch-start and the moves that follow it. Only
//! single-contact gestures participate in boundary suppression; anything
//! with two or more contacts falls through to default browser handling.
//!
//! The anchor is *not* cleared on multi-contact starts or on gesture end.
//! It is implicitly replaced by the next single-contact start, mirroring how
//! browsers deliver `targetTouches` (there is no reliable "gesture over"
//! signal worth depending on).

/// One active contact point, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchContact {
    /// Stable per-gesture contact identifier.
    pub id: u32,
    /// Vertical client coordinate in CSS pixels.
    pub client_y: f64,
}

impl TouchContact {
    /// Construct a contact.
    #[must_use]
    pub const fn new(id: u32, client_y: f64) -> Self {
        Self { id, client_y }
    }
}

/// Vertical anchor state for the current single-finger gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchTracker {
    anchor_y: Option<f64>,
}

impl TouchTracker {
    /// Create a tracker with no recorded gesture.
    #[must_use]
    pub const fn new() -> Self {
        Self { anchor_y: None }
    }

    /// Anchor of the current gesture, if one was recorded.
    #[must_use]
    pub const fn anchor(&self) -> Option<f64> {
        self.anchor_y
    }

    /// Handle a touch-start. Records the anchor only for exactly one contact;
    /// any other count leaves the previous anchor untouched.
    ///
    /// Returns `true` when a new anchor was recorded.
    pub fn begin(&mut self, contacts: &[TouchContact]) -> bool {
        if let [only] = contacts {
            self.anchor_y = Some(only.client_y);
            true
        } else {
            false
        }
    }

    /// Vertical drag delta of a touch-move relative to the gesture anchor.
    ///
    /// `Some(current_y - anchor_y)` when the move has exactly one contact and
    /// an anchor exists; `None` otherwise (multi-touch, or no single-contact
    /// start was ever seen).
    #[must_use]
    pub fn drag_delta(&self, contacts: &[TouchContact]) -> Option<f64> {
        match (contacts, self.anchor_y) {
            ([only], Some(anchor)) => Some(only.client_y - anchor),
            _ => None,
        }
    }

    /// Forget the current gesture. Used on teardown.
    pub fn clear(&mut self) {
        self.anchor_y = None;
    }
}
