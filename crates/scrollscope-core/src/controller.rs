#![forbid(unsafe_code)]

//! The scroll-scoping controller.
//!
//! [`ScrollScope`] wraps one scrollable element and suppresses scroll
//! chaining exactly at its top/bottom boundary. One strategy is selected at
//! [`ScrollScope::init`] and never re-evaluated afterwards:
//!
//! - **Native containment** — the element's style surface accepts the
//!   "contain overscroll" property. The controller sets it and installs
//!   nothing else; the platform handles every gesture type at zero runtime
//!   cost.
//! - **Manual interception** — the controller asks the host (via
//!   [`HostCommand`]) to wire wheel/touch listeners and a metrics-refresh
//!   trigger, then cancels the default action of boundary-crossing wheel and
//!   single-finger touch events as they are dispatched to it.
//!
//! A strategy installed once is never upgraded, even if the native
//! capability appears later (polyfill load, dynamic styles). That matches
//! the one-shot probe at `init` and is documented behavior.
//!
//! Wheel and touch dispatches run synchronously and return their
//! suppress-default decision in the same turn; the controller never defers a
//! cancellation, which would be invalid outside the event's handling turn.

use core::time::Duration;

use crate::element::{EnvCapabilities, ScrollElement};
use crate::gesture::{TouchContact, TouchTracker};
use crate::metrics::ScrollMetrics;
use crate::throttle::{ThrottleSignal, TrailingThrottle};

/// Boundary-suppression strategy selected at `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Platform style property contains overscroll; no listeners installed.
    NativeContainment,
    /// Wheel/touch interception with throttled metrics refresh.
    ManualInterception,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstallState {
    Idle,
    Installed(Strategy),
}

/// Wiring the host must apply on the controller's behalf.
///
/// The controller owns the decision of *what* to observe; the host owns the
/// DOM and the event loop, so listener registration, observers, and the
/// refresh timer are its job. Commands come out of [`ScrollScope::init`] and
/// [`ScrollScope::destroy`] in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Observe the element with the size-observation capability, bound to
    /// the resize signal.
    ObserveSize,
    /// Disconnect the size observer.
    DisconnectSizeObserver,
    /// Add a window-level resize listener bound to the resize signal.
    AddWindowResizeListener,
    /// Remove the window-level resize listener (no-op if never added).
    RemoveWindowResizeListener,
    /// Observe the element for child-list, attribute, and character-data
    /// mutations, subtree-wide, bound to the mutation signal.
    ObserveMutations,
    /// Disconnect the mutation observer.
    DisconnectMutationObserver,
    /// Add non-capturing wheel, touch-start, and touch-move listeners on the
    /// element (not the window).
    AddElementListeners,
    /// Remove the three element listeners.
    RemoveElementListeners,
    /// Arm a one-shot timer that reports back via
    /// [`ScrollScope::on_refresh_deadline`] at `deadline`.
    ScheduleRefreshTimer {
        /// Monotonic instant the pending refresh becomes due.
        deadline: Duration,
    },
    /// Disarm the refresh timer if armed.
    CancelRefreshTimer,
}

/// Errors surfaced by [`ScrollScope::init`]. Every other operation is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollScopeError {
    /// The element is not attached to a live document. Initializing anyway
    /// would cache stale metrics, so this fails fast.
    ElementDetached,
    /// `init` was called while a strategy is already installed. Call
    /// [`ScrollScope::destroy`] first.
    AlreadyInitialized,
}

impl core::fmt::Display for ScrollScopeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ElementDetached => write!(f, "element is not attached to a live document"),
            Self::AlreadyInitialized => write!(f, "controller is already initialized"),
        }
    }
}

impl std::error::Error for ScrollScopeError {}

/// Which handler a dispatch record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Wheel,
    TouchStart,
    TouchMove,
}

/// Deterministic reason an event produced no suppression decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// No strategy installed (before `init` or after `destroy`).
    NotInstalled,
    /// Native containment is active; the platform handles the event.
    NativeStrategy,
    /// Suppression is bypassed via [`ScrollScope::disable`].
    Disabled,
    /// The event carried a contact count other than one.
    MultiTouch,
    /// A touch-move arrived with no single-contact start on record.
    NoAnchor,
}

/// Outcome of one wheel/touch dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Boundary case: the default action must be cancelled.
    Suppressed,
    /// In-range scroll: default handling proceeds.
    Allowed,
    /// A single-contact gesture anchor was recorded.
    AnchorSet,
    /// The event was not evaluated.
    Ignored(IgnoredReason),
}

/// Structured record of one dispatch, for host logs and replay traces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollLogEntry {
    pub phase: DispatchPhase,
    /// Live scroll offset at decision time, when one was read.
    pub scroll_top: Option<f64>,
    /// Signed vertical delta the decision was based on, when one existed.
    pub delta_y: Option<f64>,
    pub outcome: DispatchOutcome,
}

/// Result of one wheel/touch dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollDispatch {
    /// When `true` the host must cancel the event's default action within
    /// the current handling turn.
    pub suppress_default: bool,
    pub log: ScrollLogEntry,
}

impl ScrollDispatch {
    fn ignored(phase: DispatchPhase, reason: IgnoredReason) -> Self {
        Self {
            suppress_default: false,
            log: ScrollLogEntry {
                phase,
                scroll_top: None,
                delta_y: None,
                outcome: DispatchOutcome::Ignored(reason),
            },
        }
    }

    fn decided(phase: DispatchPhase, scroll_top: f64, delta_y: f64, suppress: bool) -> Self {
        Self {
            suppress_default: suppress,
            log: ScrollLogEntry {
                phase,
                scroll_top: Some(scroll_top),
                delta_y: Some(delta_y),
                outcome: if suppress {
                    DispatchOutcome::Suppressed
                } else {
                    DispatchOutcome::Allowed
                },
            },
        }
    }
}

/// Scroll-scoping controller for one element.
///
/// Construction takes the element capability handle and the environment
/// probe; nothing global is touched. The host drives the controller:
/// it applies returned [`HostCommand`]s, forwards wheel/touch events, and
/// reports resize/mutation signals and timer deadlines with monotonic
/// timestamps.
#[derive(Debug, Clone)]
pub struct ScrollScope<E: ScrollElement> {
    element: E,
    caps: EnvCapabilities,
    state: InstallState,
    disabled: bool,
    metrics: ScrollMetrics,
    touch: TouchTracker,
    throttle: TrailingThrottle,
}

impl<E: ScrollElement> ScrollScope<E> {
    /// Create a controller with the default 200 ms refresh window.
    #[must_use]
    pub fn new(element: E, caps: EnvCapabilities) -> Self {
        Self::with_refresh_window(element, caps, TrailingThrottle::DEFAULT_WINDOW)
    }

    /// Create a controller with an explicit refresh-throttle window.
    #[must_use]
    pub fn with_refresh_window(element: E, caps: EnvCapabilities, window: Duration) -> Self {
        Self {
            element,
            caps,
            state: InstallState::Idle,
            disabled: false,
            metrics: ScrollMetrics::UNBOUNDED,
            touch: TouchTracker::new(),
            throttle: TrailingThrottle::new(window),
        }
    }

    /// The wrapped element handle.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Mutable access to the wrapped element handle.
    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Installed strategy, if any.
    #[must_use]
    pub const fn strategy(&self) -> Option<Strategy> {
        match self.state {
            InstallState::Idle => None,
            InstallState::Installed(strategy) => Some(strategy),
        }
    }

    /// Whether suppression is currently bypassed.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Last-refreshed metrics.
    #[must_use]
    pub const fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    /// Select and install a strategy.
    ///
    /// Native path: sets the containing style value and returns no commands.
    /// Manual path: returns the observation/listener wiring for the host to
    /// apply and performs an immediate metrics refresh so the first gesture
    /// is evaluated against real extents.
    ///
    /// Fails while already installed; after [`ScrollScope::destroy`] a fresh
    /// `init` is permitted and re-probes capabilities.
    pub fn init(&mut self) -> Result<Vec<HostCommand>, ScrollScopeError> {
        if matches!(self.state, InstallState::Installed(_)) {
            return Err(ScrollScopeError::AlreadyInitialized);
        }
        if !self.element.is_connected() {
            return Err(ScrollScopeError::ElementDetached);
        }

        if self.element.supports_overscroll_containment() {
            self.element.set_overscroll_containment(!self.disabled);
            self.state = InstallState::Installed(Strategy::NativeContainment);
            #[cfg(feature = "tracing")]
            tracing::debug!(strategy = "native", "scroll scope installed");
            return Ok(Vec::new());
        }

        let mut commands = Vec::with_capacity(3);
        if self.caps.size_observer {
            commands.push(HostCommand::ObserveSize);
        } else {
            commands.push(HostCommand::AddWindowResizeListener);
            if self.caps.mutation_observer {
                commands.push(HostCommand::ObserveMutations);
            }
        }
        commands.push(HostCommand::AddElementListeners);

        self.state = InstallState::Installed(Strategy::ManualInterception);
        self.refresh_metrics();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            strategy = "manual",
            size_observer = self.caps.size_observer,
            mutation_observer = self.caps.mutation_observer,
            "scroll scope installed"
        );
        Ok(commands)
    }

    /// Reverse all observation and listening.
    ///
    /// Idempotent and infallible: a second call returns no commands. The
    /// pending refresh (if any) is cancelled so no deferred layout read can
    /// fire after teardown. The containment style is left as applied; the
    /// caller owns the element's style lifecycle once the controller is
    /// inert.
    pub fn destroy(&mut self) -> Vec<HostCommand> {
        let was = core::mem::replace(&mut self.state, InstallState::Idle);
        self.touch.clear();
        let had_pending = self.throttle.cancel();

        match was {
            InstallState::Idle | InstallState::Installed(Strategy::NativeContainment) => {
                Vec::new()
            }
            InstallState::Installed(Strategy::ManualInterception) => {
                let mut commands = Vec::with_capacity(4);
                if self.caps.size_observer {
                    commands.push(HostCommand::DisconnectSizeObserver);
                } else {
                    commands.push(HostCommand::RemoveWindowResizeListener);
                    if self.caps.mutation_observer {
                        commands.push(HostCommand::DisconnectMutationObserver);
                    }
                }
                commands.push(HostCommand::RemoveElementListeners);
                if had_pending {
                    commands.push(HostCommand::CancelRefreshTimer);
                }
                commands
            }
        }
    }

    /// Clear the suppression bypass. Under native containment this
    /// re-applies the containing style value (idempotent).
    pub fn enable(&mut self) {
        self.disabled = false;
        if matches!(
            self.state,
            InstallState::Installed(Strategy::NativeContainment)
        ) {
            self.element.set_overscroll_containment(true);
        }
    }

    /// Set the suppression bypass.
    ///
    /// Under native containment this clears the style value, restoring
    /// default chaining. Under manual interception only the handlers'
    /// cancellation logic is bypassed; listeners stay registered and metrics
    /// keep refreshing.
    pub fn disable(&mut self) {
        self.disabled = true;
        if matches!(
            self.state,
            InstallState::Installed(Strategy::NativeContainment)
        ) {
            self.element.set_overscroll_containment(false);
        }
    }

    /// Re-read both extents into the cached metrics.
    pub fn refresh_metrics(&mut self) {
        self.metrics = ScrollMetrics::measure(&self.element);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            scroll_extent = self.metrics.scroll_extent,
            client_extent = self.metrics.client_extent,
            "metrics refreshed"
        );
    }

    /// Report a window-resize (or size-observer) signal at `now`.
    ///
    /// Returns the timer command to arm when this signal opened a new
    /// throttle window.
    pub fn on_resize_signal(&mut self, now: Duration) -> Option<HostCommand> {
        self.on_refresh_signal(now)
    }

    /// Report a mutation-observer signal at `now`. Mutations are a proxy for
    /// layout changes a resize listener cannot see (content growth without a
    /// window resize).
    pub fn on_mutation_signal(&mut self, now: Duration) -> Option<HostCommand> {
        self.on_refresh_signal(now)
    }

    fn on_refresh_signal(&mut self, now: Duration) -> Option<HostCommand> {
        if !matches!(
            self.state,
            InstallState::Installed(Strategy::ManualInterception)
        ) {
            return None;
        }
        match self.throttle.signal(now) {
            ThrottleSignal::Scheduled { deadline } => {
                Some(HostCommand::ScheduleRefreshTimer { deadline })
            }
            ThrottleSignal::Coalesced => None,
        }
    }

    /// Report that the refresh timer fired at `now`.
    ///
    /// Runs the deferred metrics refresh when one is due; returns whether a
    /// refresh ran.
    pub fn on_refresh_deadline(&mut self, now: Duration) -> bool {
        if !matches!(
            self.state,
            InstallState::Installed(Strategy::ManualInterception)
        ) {
            return false;
        }
        if self.throttle.fire(now) {
            self.refresh_metrics();
            true
        } else {
            false
        }
    }

    /// Dispatch a wheel event with signed vertical delta `delta_y`.
    ///
    /// Suppresses the default action exactly when the element sits at the
    /// boundary the delta would chain past: negative delta at the top,
    /// positive delta at the bottom. Evaluated against cached metrics and a
    /// live offset read; no layout is forced on the wheel path.
    pub fn on_wheel(&mut self, delta_y: f64) -> ScrollDispatch {
        if let Some(ignored) = self.manual_gate(DispatchPhase::Wheel) {
            return ignored;
        }
        let top = self.element.scroll_top();
        let suppress = (self.metrics.at_top(top) && delta_y < 0.0)
            || (self.metrics.at_bottom(top) && delta_y > 0.0);
        self.logged(ScrollDispatch::decided(
            DispatchPhase::Wheel,
            top,
            delta_y,
            suppress,
        ))
    }

    /// Dispatch a touch-start.
    ///
    /// Records the gesture anchor for exactly one contact point; multi-touch
    /// leaves the previous anchor stale and is never suppressed. The anchor
    /// is recorded even while disabled so a mid-gesture `enable` evaluates
    /// against the right baseline.
    pub fn on_touch_start(&mut self, contacts: &[TouchContact]) -> ScrollDispatch {
        if !matches!(
            self.state,
            InstallState::Installed(Strategy::ManualInterception)
        ) {
            return ScrollDispatch::ignored(
                DispatchPhase::TouchStart,
                self.not_manual_reason(),
            );
        }
        if self.touch.begin(contacts) {
            ScrollDispatch {
                suppress_default: false,
                log: ScrollLogEntry {
                    phase: DispatchPhase::TouchStart,
                    scroll_top: None,
                    delta_y: None,
                    outcome: DispatchOutcome::AnchorSet,
                },
            }
        } else {
            ScrollDispatch::ignored(DispatchPhase::TouchStart, IgnoredReason::MultiTouch)
        }
    }

    /// Dispatch a touch-move.
    ///
    /// Suppresses when the finger drags content past the boundary the
    /// element already sits at: positive delta (finger down) at the top,
    /// negative delta (finger up) at the bottom.
    pub fn on_touch_move(&mut self, contacts: &[TouchContact]) -> ScrollDispatch {
        if let Some(ignored) = self.manual_gate(DispatchPhase::TouchMove) {
            return ignored;
        }
        let Some(delta) = self.touch.drag_delta(contacts) else {
            let reason = if contacts.len() == 1 {
                IgnoredReason::NoAnchor
            } else {
                IgnoredReason::MultiTouch
            };
            return ScrollDispatch::ignored(DispatchPhase::TouchMove, reason);
        };

        let top = self.element.scroll_top();
        let suppress = (self.metrics.at_top(top) && delta > 0.0)
            || (self.metrics.at_bottom(top) && delta < 0.0);
        self.logged(ScrollDispatch::decided(
            DispatchPhase::TouchMove,
            top,
            delta,
            suppress,
        ))
    }

    /// Gate shared by the boundary-evaluating handlers: `Some(dispatch)`
    /// when the event must be ignored, `None` when evaluation proceeds.
    fn manual_gate(&self, phase: DispatchPhase) -> Option<ScrollDispatch> {
        if !matches!(
            self.state,
            InstallState::Installed(Strategy::ManualInterception)
        ) {
            return Some(ScrollDispatch::ignored(phase, self.not_manual_reason()));
        }
        if self.disabled {
            return Some(ScrollDispatch::ignored(phase, IgnoredReason::Disabled));
        }
        None
    }

    const fn not_manual_reason(&self) -> IgnoredReason {
        match self.state {
            InstallState::Installed(Strategy::NativeContainment) => IgnoredReason::NativeStrategy,
            _ => IgnoredReason::NotInstalled,
        }
    }

    fn logged(&self, dispatch: ScrollDispatch) -> ScrollDispatch {
        #[cfg(feature = "tracing")]
        if dispatch.suppress_default {
            tracing::trace!(
                phase = ?dispatch.log.phase,
                scroll_top = ?dispatch.log.scroll_top,
                delta_y = ?dispatch.log.delta_y,
                "boundary event suppressed"
            );
        }
        dispatch
    }
}
