#![forbid(unsafe_code)]

//! Host-driven scroll session: a thin JS shim feeds encoded events in and
//! applies decisions coming back out.
//!
//! The session owns a [`ScrollScope`] over a [`HostElement`] mirror. In a
//! browser, the shim keeps the mirror honest:
//! - wheel/touch handlers read `scrollTop` synchronously and embed it in
//!   the event they push,
//! - when a `schedule_refresh_timer` command's deadline fires, the shim
//!   performs the layout read and pushes `measure` followed by
//!   `refresh_timer`, so the throttled refresh snapshots fresh extents.
//!
//! Until the first `measure` arrives the mirror reports unbounded extents,
//! which keeps the bottom boundary unsatisfiable rather than suppressing on
//! made-up geometry.

use core::time::Duration;

use scrollscope_core::{
    EnvCapabilities, HostCommand, ScrollDispatch, ScrollElement, ScrollScope, ScrollScopeError,
    TouchContact,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::input::{HostEvent, TouchInput, TouchPhase, TouchPoint};
use crate::parser::{InputParseError, parse_host_event};

/// Host-mirrored element state implementing the core's capability handle.
///
/// A wasm deployment would implement [`ScrollElement`] directly over the DOM
/// node instead; this mirror is what lets the session run host-driven and
/// deterministic without binding to the browser.
#[derive(Debug, Clone)]
pub struct HostElement {
    supports_containment: bool,
    containment: Option<bool>,
    connected: bool,
    scroll_top: f64,
    scroll_extent: f64,
    client_extent: f64,
}

impl HostElement {
    /// Create a mirror for a connected element. Extents start unbounded
    /// until the host pushes the first measure.
    #[must_use]
    pub fn new(supports_containment: bool) -> Self {
        Self {
            supports_containment,
            containment: None,
            connected: true,
            scroll_top: 0.0,
            scroll_extent: f64::INFINITY,
            client_extent: f64::INFINITY,
        }
    }

    /// Last containment value the controller applied, if any. The shim
    /// writes this through to the element's style.
    #[must_use]
    pub const fn containment(&self) -> Option<bool> {
        self.containment
    }

    fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }

    fn set_extents(&mut self, scroll_extent: f64, client_extent: f64) {
        self.scroll_extent = scroll_extent;
        self.client_extent = client_extent;
    }
}

impl ScrollElement for HostElement {
    fn supports_overscroll_containment(&self) -> bool {
        self.supports_containment
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
        self.scroll_extent
    }

    fn client_extent(&self) -> f64 {
        self.client_extent
    }
}

/// Session construction parameters, decodable from host-provided JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// The element's style surface accepts overscroll containment.
    pub supports_containment: bool,
    /// A size-observation capability exists in the environment.
    pub size_observer: bool,
    /// A mutation-observation capability exists in the environment.
    pub mutation_observer: bool,
    /// Metrics refresh throttle window.
    pub refresh_window_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            supports_containment: false,
            size_observer: false,
            mutation_observer: false,
            refresh_window_ms: 200,
        }
    }
}

/// JSON wire form of a [`HostCommand`] for the shim to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostCommandJson {
    ObserveSize,
    DisconnectSizeObserver,
    AddWindowResizeListener,
    RemoveWindowResizeListener,
    ObserveMutations,
    DisconnectMutationObserver,
    AddElementListeners,
    RemoveElementListeners,
    ScheduleRefreshTimer { deadline_ms: u64 },
    CancelRefreshTimer,
}

impl From<HostCommand> for HostCommandJson {
    fn from(command: HostCommand) -> Self {
        match command {
            HostCommand::ObserveSize => Self::ObserveSize,
            HostCommand::DisconnectSizeObserver => Self::DisconnectSizeObserver,
            HostCommand::AddWindowResizeListener => Self::AddWindowResizeListener,
            HostCommand::RemoveWindowResizeListener => Self::RemoveWindowResizeListener,
            HostCommand::ObserveMutations => Self::ObserveMutations,
            HostCommand::DisconnectMutationObserver => Self::DisconnectMutationObserver,
            HostCommand::AddElementListeners => Self::AddElementListeners,
            HostCommand::RemoveElementListeners => Self::RemoveElementListeners,
            HostCommand::ScheduleRefreshTimer { deadline } => Self::ScheduleRefreshTimer {
                deadline_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            },
            HostCommand::CancelRefreshTimer => Self::CancelRefreshTimer,
        }
    }
}

/// Decision returned to the host for one pushed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostDecision {
    /// The host must call `preventDefault()` on the triggering event,
    /// within the same handling turn.
    pub suppress_default: bool,
    /// Wiring to apply, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<HostCommandJson>,
}

impl HostDecision {
    fn passthrough() -> Self {
        Self::default()
    }

    fn from_dispatch(dispatch: ScrollDispatch) -> Self {
        Self {
            suppress_default: dispatch.suppress_default,
            commands: Vec::new(),
        }
    }

    fn from_command(command: Option<HostCommand>) -> Self {
        Self {
            suppress_default: false,
            commands: command.map(HostCommandJson::from).into_iter().collect(),
        }
    }
}

/// One scroll-scoped element, driven over the JSON host protocol.
#[derive(Debug, Clone)]
pub struct ScrollSession {
    scope: ScrollScope<HostElement>,
}

impl ScrollSession {
    /// Create a session for a connected element.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let caps = EnvCapabilities {
            size_observer: config.size_observer,
            mutation_observer: config.mutation_observer,
        };
        let scope = ScrollScope::with_refresh_window(
            HostElement::new(config.supports_containment),
            caps,
            Duration::from_millis(config.refresh_window_ms),
        );
        Self { scope }
    }

    /// The underlying controller.
    #[must_use]
    pub fn scope(&self) -> &ScrollScope<HostElement> {
        &self.scope
    }

    /// Install a strategy; returns the wiring the shim must apply.
    pub fn start(&mut self) -> Result<Vec<HostCommandJson>, ScrollScopeError> {
        let commands = self.scope.init()?;
        debug!(strategy = ?self.scope.strategy(), "scroll session started");
        Ok(commands.into_iter().map(HostCommandJson::from).collect())
    }

    /// Tear down all wiring; idempotent.
    pub fn stop(&mut self) -> Vec<HostCommandJson> {
        self.scope
            .destroy()
            .into_iter()
            .map(HostCommandJson::from)
            .collect()
    }

    /// Clear the suppression bypass.
    pub fn enable(&mut self) {
        self.scope.enable();
    }

    /// Set the suppression bypass.
    pub fn disable(&mut self) {
        self.scope.disable();
    }

    /// Handle one typed host event.
    pub fn handle(&mut self, event: &HostEvent) -> HostDecision {
        match event {
            HostEvent::Wheel(wheel) => {
                self.scope.element_mut().set_scroll_top(wheel.scroll_top);
                let dispatch = self.scope.on_wheel(wheel.dy);
                trace!(dy = wheel.dy, outcome = ?dispatch.log.outcome, "wheel dispatched");
                HostDecision::from_dispatch(dispatch)
            }
            HostEvent::Touch(touch) => self.handle_touch(touch),
            HostEvent::ResizeSignal { now_ms } => {
                HostDecision::from_command(self.scope.on_resize_signal(ms(*now_ms)))
            }
            HostEvent::MutationSignal { now_ms } => {
                HostDecision::from_command(self.scope.on_mutation_signal(ms(*now_ms)))
            }
            HostEvent::RefreshTimer { now_ms } => {
                let refreshed = self.scope.on_refresh_deadline(ms(*now_ms));
                trace!(refreshed, "refresh timer fired");
                HostDecision::passthrough()
            }
            HostEvent::Measure {
                scroll_extent,
                client_extent,
            } => {
                self.scope
                    .element_mut()
                    .set_extents(*scroll_extent, *client_extent);
                HostDecision::passthrough()
            }
        }
    }

    /// Handle one encoded host event and return the encoded decision.
    pub fn handle_json(&mut self, json: &str) -> Result<String, InputParseError> {
        let event = parse_host_event(json)?;
        let decision = self.handle(&event);
        serde_json::to_string(&decision).map_err(|err| InputParseError::Json(err.to_string()))
    }

    fn handle_touch(&mut self, touch: &TouchInput) -> HostDecision {
        self.scope.element_mut().set_scroll_top(touch.scroll_top);
        let contacts: Vec<TouchContact> = touch.touches.iter().map(contact).collect();
        match touch.phase {
            TouchPhase::Start => {
                HostDecision::from_dispatch(self.scope.on_touch_start(&contacts))
            }
            TouchPhase::Move => {
                let dispatch = self.scope.on_touch_move(&contacts);
                trace!(outcome = ?dispatch.log.outcome, "touch move dispatched");
                HostDecision::from_dispatch(dispatch)
            }
            // The anchor is implicitly replaced by the next single-contact
            // start; end/cancel carry no decision.
            TouchPhase::End | TouchPhase::Cancel => HostDecision::passthrough(),
        }
    }
}

fn ms(now_ms: u64) -> Duration {
    Duration::from_millis(now_ms)
}

fn contact(point: &TouchPoint) -> TouchContact {
    TouchContact::new(point.id, point.y)
}

#[cfg(test)]
mod tests {
    use super::{HostCommandJson, ScrollSession, SessionConfig};
    use pretty_assertions::assert_eq;
    use scrollscope_core::Strategy;

    fn manual_session() -> ScrollSession {
        let mut session = ScrollSession::new(SessionConfig {
            mutation_observer: true,
            ..SessionConfig::default()
        });
        let commands = session.start().expect("start should succeed");
        assert_eq!(
            commands,
            vec![
                HostCommandJson::AddWindowResizeListener,
                HostCommandJson::ObserveMutations,
                HostCommandJson::AddElementListeners,
            ]
        );
        // Shim measures once on startup.
        let decision = session
            .handle_json(r#"{"kind":"measure","scroll_extent":1000.0,"client_extent":400.0}"#)
            .expect("measure");
        assert_eq!(decision, r#"{"suppress_default":false}"#);
        session
            .handle_json(r#"{"kind":"mutation","now_ms":0}"#)
            .expect("signal");
        session
            .handle_json(r#"{"kind":"refresh_timer","now_ms":200}"#)
            .expect("timer");
        session
    }

    #[test]
    fn native_session_installs_nothing() {
        let mut session = ScrollSession::new(SessionConfig {
            supports_containment: true,
            ..SessionConfig::default()
        });
        assert_eq!(session.start().expect("start"), vec![]);
        assert_eq!(
            session.scope().strategy(),
            Some(Strategy::NativeContainment)
        );
        assert_eq!(session.scope().element().containment(), Some(true));
        // Events pass through untouched.
        let decision = session
            .handle_json(r#"{"kind":"wheel","dx":0.0,"dy":-3.0,"scroll_top":0.0}"#)
            .expect("wheel");
        assert_eq!(decision, r#"{"suppress_default":false}"#);
    }

    #[test]
    fn wheel_at_top_suppresses_end_to_end() {
        let mut session = manual_session();
        let up = session
            .handle_json(r#"{"kind":"wheel","dx":0.0,"dy":-3.0,"scroll_top":0.0}"#)
            .expect("wheel");
        assert_eq!(up, r#"{"suppress_default":true}"#);
        let down = session
            .handle_json(r#"{"kind":"wheel","dx":0.0,"dy":3.0,"scroll_top":0.0}"#)
            .expect("wheel");
        assert_eq!(down, r#"{"suppress_default":false}"#);
    }

    #[test]
    fn touch_gesture_suppresses_at_bottom() {
        let mut session = manual_session();
        session
            .handle_json(
                r#"{"kind":"touch","phase":"start","touches":[{"id":1,"x":0.0,"y":500.0}],"scroll_top":600.0}"#,
            )
            .expect("start");
        let drag_up = session
            .handle_json(
                r#"{"kind":"touch","phase":"move","touches":[{"id":1,"x":0.0,"y":460.0}],"scroll_top":600.0}"#,
            )
            .expect("move");
        assert_eq!(drag_up, r#"{"suppress_default":true}"#);
        // End carries no decision; the next start re-anchors.
        let end = session
            .handle_json(r#"{"kind":"touch","phase":"end","touches":[],"scroll_top":600.0}"#)
            .expect("end");
        assert_eq!(end, r#"{"suppress_default":false}"#);
    }

    #[test]
    fn refresh_cycle_updates_boundary() {
        let mut session = manual_session();
        // Content grew: the shim re-measures on the next timer fire.
        session
            .handle_json(r#"{"kind":"measure","scroll_extent":2000.0,"client_extent":400.0}"#)
            .expect("measure");
        // Cached metrics still hold the old bottom boundary until a
        // signal+timer cycle completes.
        let stale = session
            .handle_json(r#"{"kind":"wheel","dx":0.0,"dy":3.0,"scroll_top":600.0}"#)
            .expect("wheel");
        assert_eq!(stale, r#"{"suppress_default":true}"#);

        let scheduled = session
            .handle_json(r#"{"kind":"resize","now_ms":1000}"#)
            .expect("resize");
        assert_eq!(
            scheduled,
            r#"{"suppress_default":false,"commands":[{"op":"schedule_refresh_timer","deadline_ms":1200}]}"#
        );
        session
            .handle_json(r#"{"kind":"refresh_timer","now_ms":1200}"#)
            .expect("timer");
        let fresh = session
            .handle_json(r#"{"kind":"wheel","dx":0.0,"dy":3.0,"scroll_top":600.0}"#)
            .expect("wheel");
        assert_eq!(fresh, r#"{"suppress_default":false}"#);
    }

    #[test]
    fn stop_is_idempotent_and_mirrors_install() {
        let mut session = manual_session();
        assert_eq!(
            session.stop(),
            vec![
                HostCommandJson::RemoveWindowResizeListener,
                HostCommandJson::DisconnectMutationObserver,
                HostCommandJson::RemoveElementListeners,
            ]
        );
        assert_eq!(session.stop(), vec![]);
    }

    #[test]
    fn disable_bypasses_suppression_over_the_wire() {
        let mut session = manual_session();
        session.disable();
        let decision = session
            .handle_json(r#"{"kind":"wheel","dx":0.0,"dy":-3.0,"scroll_top":0.0}"#)
            .expect("wheel");
        assert_eq!(decision, r#"{"suppress_default":false}"#);
        session.enable();
        let decision = session
            .handle_json(r#"{"kind":"wheel","dx":0.0,"dy":-3.0,"scroll_top":0.0}"#)
            .expect("wheel");
        assert_eq!(decision, r#"{"suppress_default":true}"#);
    }
}
