use crate::{
    poller::VisionSource,
    render::HistoryTemplates,
    settings::{DisplaySettings, FpsLimit},
};
use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Connection {
    #[derivative(Default(value = "\"http://127.0.0.1:7070\".to_string()"))]
    pub url: String,
    #[derivative(Default(value = "1000"))]
    pub request_timeout_ms: u64,
}

impl Connection {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Polling {
    #[derivative(Default(value = "200"))]
    pub game_state_period_ms: u64,
}

impl Polling {
    pub fn game_state_period(&self) -> Duration {
        Duration::from_millis(self.game_state_period_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct FieldView {
    #[derivative(Default(value = "980.0"))]
    pub canvas_width: f64,
    #[derivative(Default(value = "736.0"))]
    pub canvas_height: f64,
    pub vision_source: VisionSource,
    pub show_at_startup: bool,
    #[derivative(Default(value = "true"))]
    pub landmark: bool,
    pub timed_circle: bool,
    /// Redraws per second, 65 or more meaning unlimited
    #[derivative(Default(value = "30"))]
    pub fps_limit: u32,
}

impl FieldView {
    pub fn canvas_size(&self) -> [f64; 2] {
        [self.canvas_width, self.canvas_height]
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            landmark: self.landmark,
            timed_circle: self.timed_circle,
            fps_limit: FpsLimit::from_slider(self.fps_limit),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Referee {
    /// Length of the penalties given from the console, in seconds
    #[derivative(Default(value = "5.0"))]
    pub penalty_duration: f64,
    pub history: HistoryTemplates,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: Connection,
    pub polling: Polling,
    pub field: FieldView,
    pub referee: Referee,
}
