//! Turns referee input into backend commands.

use crate::{
    backend::{Backend, BackendCall, PlacementLayout},
    half_time::HalfTimeAction,
};
use core::f64::consts::FRAC_PI_2;
use log::{info, warn};
use rsk_common::{
    color::TeamColor,
    geometry::{FieldTransform, ScreenPose},
    marker::{MarkerId, TeleportTarget},
};
use std::sync::Arc;
use tokio::{
    sync::mpsc::{UnboundedSender, unbounded_channel},
    task::JoinHandle,
};

/// Everything the referee can ask for
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    StartGame,
    PauseGame,
    ResumeGame,
    StopGame,
    StartHalfTime,
    HalfTime(HalfTimeAction),
    SetTeamName(TeamColor, String),
    ScoreUp(TeamColor),
    ScoreDown(TeamColor),
    ResetScore,
    Penalize(MarkerId),
    Unpenalize(MarkerId),
    ValidateGoal(bool),
    Place(PlacementLayout),
    Teleport {
        target: TeleportTarget,
        x: f64,
        y: f64,
        orientation: f64,
    },
}

impl UserAction {
    /// Commands issued for this action. Half time steps depend on where the
    /// flow stands and are resolved by the flow itself.
    pub fn calls(&self, penalty_duration: f64) -> Vec<BackendCall> {
        let call = match self {
            Self::StartGame => BackendCall::StartGame,
            Self::PauseGame => BackendCall::PauseGame,
            Self::ResumeGame => BackendCall::ResumeGame,
            Self::StopGame => BackendCall::StopGame,
            Self::StartHalfTime => BackendCall::StartHalfTime,
            Self::HalfTime(_) => return vec![],
            Self::SetTeamName(team, name) => BackendCall::SetTeamName(*team, name.clone()),
            Self::ScoreUp(team) => BackendCall::IncrementScore(*team, 1),
            Self::ScoreDown(team) => BackendCall::IncrementScore(*team, -1),
            Self::ResetScore => BackendCall::ResetScore,
            Self::Penalize(robot) => BackendCall::AddPenalty {
                duration: penalty_duration,
                robot: *robot,
            },
            Self::Unpenalize(robot) => BackendCall::CancelPenalty(*robot),
            Self::ValidateGoal(valid) => BackendCall::ValidateGoal(*valid),
            Self::Place(layout) => BackendCall::PlaceGame(*layout),
            Self::Teleport {
                target,
                x,
                y,
                orientation,
            } => BackendCall::Teleport {
                target: *target,
                x: *x,
                y: *y,
                orientation: *orientation,
            },
        };
        vec![call]
    }
}

/// Sends commands to the backend from a worker task, in the order they were
/// queued. A failed command is logged and the next one is sent anyway.
#[derive(Debug)]
pub struct InputDispatcher {
    queue: UnboundedSender<BackendCall>,
    worker: JoinHandle<()>,
}

impl InputDispatcher {
    pub fn new<B: Backend>(backend: Arc<B>) -> Self {
        let (queue, mut calls) = unbounded_channel::<BackendCall>();
        let worker = tokio::spawn(async move {
            while let Some(call) = calls.recv().await {
                let description = call.to_string();
                info!("Sending {description}");
                if let Err(e) = backend.call(call).await {
                    warn!("Command {description} failed: {e}");
                }
            }
        });
        Self { queue, worker }
    }

    pub fn send(&self, calls: Vec<BackendCall>) {
        for call in calls {
            if self.queue.send(call).is_err() {
                warn!("Command worker is gone, dropping command");
                return;
            }
        }
    }
}

impl Drop for InputDispatcher {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Position,
    Orientation,
}

impl From<PointerButton> for DragKind {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => Self::Position,
            PointerButton::Secondary => Self::Orientation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    target: TeleportTarget,
    kind: DragKind,
    initial: ScreenPose,
}

/// Drag-to-teleport on the field view
#[derive(Debug, Default)]
pub struct DragTracker {
    drag: Option<Drag>,
}

impl DragTracker {
    /// `initial` is where the target was last drawn
    pub fn pointer_down(&mut self, target: TeleportTarget, initial: ScreenPose, button: PointerButton) {
        self.drag = Some(Drag {
            target,
            kind: button.into(),
            initial,
        });
    }

    pub fn target(&self) -> Option<TeleportTarget> {
        self.drag.map(|drag| drag.target)
    }

    pub fn kind(&self) -> Option<DragKind> {
        self.drag.map(|drag| drag.kind)
    }

    pub fn pointer_move(&self, x: f64, y: f64, transform: &FieldTransform) -> Option<UserAction> {
        let drag = self.drag?;
        let screen = match drag.kind {
            DragKind::Position => ScreenPose::new(x, y, drag.initial.angle),
            DragKind::Orientation => ScreenPose::new(
                drag.initial.x,
                drag.initial.y,
                (y - drag.initial.y).atan2(x - drag.initial.x) + FRAC_PI_2,
            ),
        };
        let pose = transform.to_world(screen);
        Some(UserAction::Teleport {
            target: drag.target,
            x: pose.position[0],
            y: pose.position[1],
            orientation: pose.orientation,
        })
    }

    /// Ends the drag with a last teleport
    pub fn pointer_up(&mut self, x: f64, y: f64, transform: &FieldTransform) -> Option<UserAction> {
        let action = self.pointer_move(x, y, transform);
        self.drag = None;
        action
    }
}
