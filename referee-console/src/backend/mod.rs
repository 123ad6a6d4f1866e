//! The console's only window on the match: a fixed set of queries and
//! fire-and-forget commands served by the RSK backend.

use enum_iterator::Sequence;
use rsk_common::{
    color::TeamColor,
    constants::Constants,
    game_snapshot::GameState,
    geometry::FieldPoint,
    marker::{MarkerId, TeleportTarget},
    vision::{VideoFrame, VisionState},
};
use serde_json::{Value, json};
use std::{fmt, future::Future, str::FromStr};
use thiserror::Error;

#[cfg(test)]
pub(crate) mod fake;
pub mod http;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("The backend answered {status} to {method}: {body}")]
    Status {
        method: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Could not decode the reply to {method}: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("The backend is unreachable")]
    Unreachable,
}

pub trait Backend: Send + Sync + 'static {
    fn constants(&self) -> impl Future<Output = Result<Constants, BackendError>> + Send;

    fn get_game_state(&self) -> impl Future<Output = Result<GameState, BackendError>> + Send;

    /// Field state as seen by the simulator or the vision pipeline
    fn get_state(&self) -> impl Future<Output = Result<VisionState, BackendError>> + Send;

    fn get_video(&self) -> impl Future<Output = Result<VideoFrame, BackendError>> + Send;

    /// Where the ball is expected to be placed, while a placement is pending
    fn get_wait_ball_position(
        &self,
    ) -> impl Future<Output = Result<Option<FieldPoint>, BackendError>> + Send;

    fn is_simulated(&self) -> impl Future<Output = Result<bool, BackendError>> + Send;

    /// Issues a command. The backend's reply, if any, is not used.
    fn call(&self, call: BackendCall) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Named robot placements understood by `place_game`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence)]
pub enum PlacementLayout {
    Standard,
    Dots,
    Side,
    SwapCovers,
    GentlySwapSide,
}

impl PlacementLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Dots => "dots",
            Self::Side => "side",
            Self::SwapCovers => "swap_covers",
            Self::GentlySwapSide => "gently_swap_side",
        }
    }
}

impl fmt::Display for PlacementLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown placement layout: {0:?}")]
pub struct UnknownLayout(pub String);

impl FromStr for PlacementLayout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum_iterator::all::<PlacementLayout>()
            .find(|layout| layout.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    StartGame,
    PauseGame,
    ResumeGame,
    StopGame,
    StartHalfTime,
    StartSecondHalfTime,
    PlaceGame(PlacementLayout),
    SwapTeamSides,
    SetTeamName(TeamColor, String),
    IncrementScore(TeamColor, i32),
    ResetScore,
    AddPenalty { duration: f64, robot: MarkerId },
    CancelPenalty(MarkerId),
    ValidateGoal(bool),
    Teleport {
        target: TeleportTarget,
        x: f64,
        y: f64,
        orientation: f64,
    },
}

impl BackendCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::StartGame => "start_game",
            Self::PauseGame => "pause_game",
            Self::ResumeGame => "resume_game",
            Self::StopGame => "stop_game",
            Self::StartHalfTime => "start_half_time",
            Self::StartSecondHalfTime => "start_second_half_time",
            Self::PlaceGame(_) => "place_game",
            Self::SwapTeamSides => "swap_team_sides",
            Self::SetTeamName(..) => "set_team_name",
            Self::IncrementScore(..) => "increment_score",
            Self::ResetScore => "reset_score",
            Self::AddPenalty { .. } => "add_penalty",
            Self::CancelPenalty(_) => "cancel_penalty",
            Self::ValidateGoal(_) => "validate_goal",
            Self::Teleport { .. } => "teleport",
        }
    }

    /// Positional arguments, in the order the backend method takes them
    pub fn args(&self) -> Value {
        match self {
            Self::StartGame
            | Self::PauseGame
            | Self::ResumeGame
            | Self::StopGame
            | Self::StartHalfTime
            | Self::StartSecondHalfTime
            | Self::SwapTeamSides
            | Self::ResetScore => json!([]),
            Self::PlaceGame(layout) => json!([layout.as_str()]),
            Self::SetTeamName(team, name) => json!([team, name]),
            Self::IncrementScore(team, delta) => json!([team, delta]),
            Self::AddPenalty { duration, robot } => json!([duration, robot]),
            Self::CancelPenalty(robot) => json!([robot]),
            Self::ValidateGoal(accepted) => json!([accepted]),
            Self::Teleport {
                target,
                x,
                y,
                orientation,
            } => json!([target, x, y, orientation]),
        }
    }
}

impl fmt::Display for BackendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.method(), self.args())
    }
}
