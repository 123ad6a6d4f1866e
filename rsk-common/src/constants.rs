//! Static match configuration published once by the backend.

use crate::color::TeamColor;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FIELD_SIZE: [f64; 2] = [1.83, 1.22];
pub const DEFAULT_CARPET_LENGTH: f64 = 2.45;
pub const DEFAULT_CARPET_WIDTH: f64 = 1.84;
pub const DEFAULT_PENALTY_SECS: f64 = 5.0;
pub const DEFAULT_ROBOT_RADIUS: f64 = 0.088;
pub const DEFAULT_BALL_RADIUS: f64 = 0.0215;
pub const DEFAULT_PLACE_BALL_MARGIN: f64 = 0.05;
pub const DEFAULT_TIMED_CIRCLE_RADIUS: f64 = 0.25;
pub const DEFAULT_ROBOTS_PER_TEAM: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constants {
    /// First and second team, in the order the console lays them out
    pub team_colors: [TeamColor; 2],
    /// Playing field (length, width) in meters
    pub field_size: [f64; 2],
    pub carpet_length: f64,
    pub carpet_width: f64,
    pub default_penalty: f64,
    pub robot_radius: f64,
    pub ball_radius: f64,
    pub place_ball_margin: f64,
    pub timed_circle_radius: f64,
    pub robots_per_team: u8,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            team_colors: [TeamColor::Green, TeamColor::Blue],
            field_size: DEFAULT_FIELD_SIZE,
            carpet_length: DEFAULT_CARPET_LENGTH,
            carpet_width: DEFAULT_CARPET_WIDTH,
            default_penalty: DEFAULT_PENALTY_SECS,
            robot_radius: DEFAULT_ROBOT_RADIUS,
            ball_radius: DEFAULT_BALL_RADIUS,
            place_ball_margin: DEFAULT_PLACE_BALL_MARGIN,
            timed_circle_radius: DEFAULT_TIMED_CIRCLE_RADIUS,
            robots_per_team: DEFAULT_ROBOTS_PER_TEAM,
        }
    }
}

impl Constants {
    pub fn first_team(&self) -> TeamColor {
        self.team_colors[0]
    }

    pub fn second_team(&self) -> TeamColor {
        self.team_colors[1]
    }

    pub fn carpet_size(&self) -> [f64; 2] {
        [self.carpet_length, self.carpet_width]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_constants() {
        let constants: Constants =
            serde_json::from_str(r#"{"team_colors": ["blue", "green"], "default_penalty": 10}"#)
                .unwrap();
        assert_eq!(constants.first_team(), TeamColor::Blue);
        assert_eq!(constants.second_team(), TeamColor::Green);
        assert_eq!(constants.default_penalty, 10.0);
        assert_eq!(constants.robot_radius, DEFAULT_ROBOT_RADIUS);
        assert_eq!(constants.carpet_size(), [2.45, 1.84]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let constants: Constants =
            serde_json::from_str(r#"{"robot_mass": 0.7, "ball_radius": 0.02}"#).unwrap();
        assert_eq!(constants.ball_radius, 0.02);
    }
}
