//! The two presentation surfaces the renderers drive: the referee panel
//! (addressable elements plus an append-only event history) and the field
//! canvas (one layer per robot plus a ball/guides layer).

use crate::half_time::HalfTimeSection;
use rsk_common::{color::TeamColor, geometry::ScreenPose, marker::MarkerId};
use std::fmt;

pub mod retained;

pub use retained::{RecordingCanvas, RetainedPanel};

/// Left/right slot of the panel, filled by the first and second team
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    TeamName(Side),
    Score(Side),
    Timer,
    Background,
    GameState,
    StartGame,
    PauseGroup,
    ResumeGroup,
    ResumeGame,
    HalfTimeButton,
    ScoreUp(TeamColor),
    ScoreDown(TeamColor),
    Penalize(MarkerId),
    Unpenalize(MarkerId),
    PenaltyBar(MarkerId),
    RobotState(MarkerId),
    PenaltyTabs,
    NoHistory,
    HalfTime(HalfTimeSection),
    ViewToggle,
    FpsCounter,
    FpsLimit,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamName(side) => write!(f, "team-name[{side:?}]"),
            Self::Score(side) => write!(f, "score[{side:?}]"),
            Self::ScoreUp(team) => write!(f, "score-up[{team}]"),
            Self::ScoreDown(team) => write!(f, "score-down[{team}]"),
            Self::Penalize(robot) => write!(f, "penalize[{robot}]"),
            Self::Unpenalize(robot) => write!(f, "unpenalize[{robot}]"),
            Self::PenaltyBar(robot) => write!(f, "penalty-bar[{robot}]"),
            Self::RobotState(robot) => write!(f, "robot-state[{robot}]"),
            Self::HalfTime(section) => write!(f, "half-time[{section:?}]"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Style flags an element can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Class {
    /// Red text: overtime clock, preempted robot
    Danger,
    /// Blinking background in the last seconds of a half
    Alert,
    /// Mirrored layout, when the first team plays towards negative x
    Reversed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalVerdict {
    Validated,
    Disallowed,
}

impl GoalVerdict {
    pub fn label(self) -> &'static str {
        match self {
            Self::Validated => "Goal Validated",
            Self::Disallowed => "Goal Disallowed",
        }
    }
}

pub trait RefereePanel {
    fn set_text(&mut self, element: Element, text: &str);

    fn set_class(&mut self, element: Element, class: Class, on: bool);

    fn set_enabled(&mut self, element: Element, enabled: bool);

    fn set_visible(&mut self, element: Element, visible: bool);

    /// Width of a progress bar, in percent
    fn set_width(&mut self, element: Element, percent: f64);

    fn append_history(&mut self, id: usize, content: String);

    /// A label between history events, not tied to any backend entry
    fn append_history_separator(&mut self, label: &str);

    fn clear_history(&mut self);

    fn mark_history(&mut self, id: usize, verdict: GoalVerdict);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Robot(MarkerId),
    Ball,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
    /// Dash and gap lengths, solid when `None`
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub const fn solid(color: Rgb) -> Self {
        Self {
            color,
            width: 1.0,
            dash: None,
        }
    }

    pub const fn dashed(color: Rgb, dash: [f64; 2]) -> Self {
        Self {
            color,
            width: 1.0,
            dash: Some(dash),
        }
    }
}

/// Every call carries absolute canvas coordinates; implementations must not
/// keep any transform between calls.
pub trait FieldCanvas {
    /// Width and height, in pixels
    fn size(&self) -> [f64; 2];

    fn clear(&mut self, layer: Layer);

    /// Robot sprite of `size` pixels centered on `pose`, rotated by its angle
    fn draw_robot(&mut self, marker: MarkerId, pose: ScreenPose, size: f64);

    /// Soft radial glow of an LED
    fn draw_glow(&mut self, layer: Layer, center: [f64; 2], color: Rgb);

    fn fill_circle(&mut self, layer: Layer, center: [f64; 2], radius: f64, color: Rgb);

    fn stroke_circle(&mut self, layer: Layer, center: [f64; 2], radius: f64, stroke: Stroke);

    fn line(&mut self, layer: Layer, from: [f64; 2], to: [f64; 2], stroke: Stroke);
}
