//! One connection to the backend: owns the render state, the pollers and the
//! command queue, and applies every event to the panel and the canvas.

use crate::{
    backend::{Backend, BackendError},
    config::Config,
    dispatcher::{DragTracker, InputDispatcher, PointerButton, UserAction},
    half_time::{DelayedStep, HalfTimeFlow, SEPARATOR_LABEL},
    poller::{Poller, VisionSource},
    render::{FieldRenderer, RefereeRenderer, VisionUpdate},
    settings::{DisplaySettings, FpsLimit},
    view::{Element, FieldCanvas, GoalVerdict, RefereePanel},
};
use log::{debug, info, warn};
use rsk_common::{
    constants::Constants, game_snapshot::GameState, geometry::ScreenPose, marker::TeleportTarget,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc::{Receiver, Sender, channel};

const EVENT_QUEUE_LEN: usize = 32;
pub const SHOW_FIELD_LABEL: &str = "Simulated View";
pub const HIDE_FIELD_LABEL: &str = "Camera View";

#[derive(Debug)]
pub enum SessionEvent {
    GameState(GameState),
    Vision(VisionUpdate),
    /// A half time step whose delay has elapsed
    Delayed(DelayedStep),
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GameState(_) => "game state",
            Self::Vision(_) => "vision",
            Self::Delayed(_) => "half time step",
        }
    }
}

pub struct Session<B, P, C> {
    constants: Constants,
    simulated: bool,
    panel: P,
    canvas: C,
    referee: RefereeRenderer,
    field: FieldRenderer,
    settings: DisplaySettings,
    vision_source: VisionSource,
    field_shown: bool,
    penalty_duration: f64,
    game_state_period: Duration,
    half_time: HalfTimeFlow,
    drag: DragTracker,
    poller: Poller<B>,
    dispatcher: InputDispatcher,
    sender: Sender<SessionEvent>,
    events: Receiver<SessionEvent>,
}

impl<B: Backend, P: RefereePanel, C: FieldCanvas> Session<B, P, C> {
    /// Fetches what the console needs to know before it can draw anything
    pub async fn connect(
        backend: Arc<B>,
        config: &Config,
        panel: P,
        canvas: C,
    ) -> Result<Self, BackendError> {
        let constants = backend.constants().await?;
        let simulated = backend.is_simulated().await?;
        info!(
            "Connected, {} robots per team, {}",
            constants.robots_per_team,
            if simulated { "simulated" } else { "real field" }
        );

        let vision_source = config.field.vision_source;
        let field = FieldRenderer::new(
            constants.clone(),
            vision_source.world_size(&constants),
            canvas.size(),
        );
        let (sender, events) = channel(EVENT_QUEUE_LEN);

        Ok(Self {
            referee: RefereeRenderer::new(constants.clone(), config.referee.history.clone()),
            field,
            constants,
            simulated,
            panel,
            canvas,
            settings: config.field.display_settings(),
            vision_source,
            field_shown: false,
            penalty_duration: config.referee.penalty_duration,
            game_state_period: config.polling.game_state_period(),
            half_time: HalfTimeFlow::default(),
            drag: DragTracker::default(),
            poller: Poller::new(backend.clone(), sender.clone()),
            dispatcher: InputDispatcher::new(backend),
            sender,
            events,
        })
    }

    pub fn start(&mut self) {
        self.referee.reset_history(&mut self.panel);
        self.half_time.apply(&mut self.panel);
        self.panel
            .set_text(Element::FpsLimit, &self.settings.fps_limit.label());
        self.panel.set_text(Element::ViewToggle, SHOW_FIELD_LABEL);
        self.poller.start_game_state(self.game_state_period);
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::GameState(state) => self.referee.render(&state, &mut self.panel),
            SessionEvent::Vision(update) => {
                if self.field_shown {
                    self.field
                        .render(&update, &self.settings, &mut self.canvas, &mut self.panel);
                }
            }
            SessionEvent::Delayed(step) => {
                let (next, calls) = self.half_time.on_delay(step);
                self.dispatcher.send(calls);
                self.set_half_time(next);
            }
        }
    }

    pub fn perform(&mut self, action: UserAction) {
        match &action {
            UserAction::StartGame => self.referee.reset_history(&mut self.panel),
            UserAction::StartHalfTime => {
                self.panel.append_history_separator(SEPARATOR_LABEL);
                self.set_half_time(HalfTimeFlow::CoverQuestion);
            }
            UserAction::ValidateGoal(valid) => {
                let verdict = if *valid {
                    GoalVerdict::Validated
                } else {
                    GoalVerdict::Disallowed
                };
                self.referee.mark_newest(verdict, &mut self.panel);
            }
            UserAction::HalfTime(step) => {
                if let Some(step) = self.half_time.step(*step) {
                    self.dispatcher.send(step.calls);
                    self.set_half_time(step.next);
                    if let Some(delayed) = step.delayed {
                        self.schedule(delayed);
                    }
                }
                return;
            }
            UserAction::Teleport { .. } if !self.simulated => {
                warn!("Teleporting is only possible in simulation");
                return;
            }
            _ => {}
        }
        self.dispatcher.send(action.calls(self.penalty_duration));
    }

    fn set_half_time(&mut self, flow: HalfTimeFlow) {
        debug!("Half time flow: {:?} -> {flow:?}", self.half_time);
        self.half_time = flow;
        flow.apply(&mut self.panel);
    }

    fn schedule(&self, step: DelayedStep) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(step.delay()).await;
            if sender.send(SessionEvent::Delayed(step)).await.is_err() {
                debug!("Session closed before {step:?} was due");
            }
        });
    }

    pub fn show_field(&mut self) {
        self.field_shown = true;
        self.poller
            .start_vision(self.vision_source, self.settings.fps_limit.period());
        self.panel.set_text(Element::ViewToggle, HIDE_FIELD_LABEL);
    }

    pub fn hide_field(&mut self) {
        self.field_shown = false;
        self.poller.stop_vision();
        self.field.clear(&mut self.canvas);
        self.drag = DragTracker::default();
        self.panel.set_text(Element::ViewToggle, SHOW_FIELD_LABEL);
    }

    pub fn toggle_field(&mut self) {
        if self.field_shown {
            self.hide_field();
        } else {
            self.show_field();
        }
    }

    /// Picks up a new canvas size after the surface was resized
    pub fn canvas_resized(&mut self) {
        self.field.resize(self.canvas.size());
    }

    pub fn set_fps_limit(&mut self, limit: FpsLimit) {
        self.settings.fps_limit = limit;
        self.panel.set_text(Element::FpsLimit, &limit.label());
        if self.field_shown {
            self.poller.start_vision(self.vision_source, limit.period());
        }
    }

    pub fn set_landmark(&mut self, landmark: bool) {
        self.settings.landmark = landmark;
    }

    pub fn set_timed_circle(&mut self, timed_circle: bool) {
        self.settings.timed_circle = timed_circle;
    }

    /// Grabs the robot under the pointer, or the ball when there is none
    pub fn pointer_down(&mut self, x: f64, y: f64, button: PointerButton) {
        if !(self.simulated && self.field_shown) {
            return;
        }
        let (target, initial) = match self.field.marker_at(x, y) {
            Some(marker) => (
                TeleportTarget::Robot(marker),
                self.field.marker_pose(marker).unwrap_or_default(),
            ),
            None => (TeleportTarget::Ball, ScreenPose::default()),
        };
        debug!("Dragging {target}");
        self.drag.pointer_down(target, initial, button);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(action) = self.drag.pointer_move(x, y, self.field.transform()) {
            self.perform(action);
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        if let Some(action) = self.drag.pointer_up(x, y, self.field.transform()) {
            self.perform(action);
        }
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    pub fn field_shown(&self) -> bool {
        self.field_shown
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn half_time(&self) -> HalfTimeFlow {
        self.half_time
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn shutdown(&mut self) {
        info!("Stopping the session");
        self.poller.stop();
    }
}
