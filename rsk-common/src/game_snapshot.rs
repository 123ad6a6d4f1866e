use crate::{bundles::TeamBundle, color::TeamColor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase label the backend reports while the clock is running
pub const GAME_RUNNING_MSG: &str = "Game is running...";
/// Phase label the backend reports while a goal awaits the referee's decision
pub const GOAL_VALIDATION_MSG: &str = "Waiting for Goal Validation";

/// Point-in-time referee state as reported by `get_game_state`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub game_is_running: bool,
    pub game_paused: bool,
    pub halftime_is_running: bool,
    /// Seconds left on the match clock, negative once it runs out
    pub timer: f64,
    pub game_state_msg: String,
    pub teams: TeamBundle<TeamState>,
    pub referee_history_sliced: Vec<HistoryEntry>,
}

impl GameState {
    pub fn clock_is_running(&self) -> bool {
        self.game_state_msg == GAME_RUNNING_MSG
    }

    pub fn awaits_goal_validation(&self) -> bool {
        self.game_state_msg == GOAL_VALIDATION_MSG
    }

    /// The team's display name, falling back to its color label
    pub fn team_name(&self, team: TeamColor) -> &str {
        match self.teams[team].name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => team.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamState {
    pub name: Option<String>,
    pub score: i32,
    /// Whether this team attacks towards positive x
    pub x_positive: bool,
    pub robots: BTreeMap<u8, RobotState>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotState {
    pub penalized: bool,
    pub penalized_remaining: Option<f64>,
    pub penalized_reason: Option<String>,
    pub preempted: bool,
    pub preemption_reasons: Vec<String>,
}

/// Who a history event is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTeam {
    #[default]
    Neutral,
    Green,
    Blue,
}

impl EventTeam {
    pub fn team(self) -> Option<TeamColor> {
        match self {
            Self::Neutral => None,
            Self::Green => Some(TeamColor::Green),
            Self::Blue => Some(TeamColor::Blue),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.team() {
            None => "neutral",
            Some(team) => team.as_str(),
        }
    }
}

/// One referee event, sent on the wire as `[number, time, team, event]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position of the event in the whole match history
    pub number: usize,
    /// Match clock when the event happened
    pub time: f64,
    pub team: EventTeam,
    pub event: String,
}

#[cfg(test)]
mod test {
    use super::*;

    const GAME_STATE: &str = r#"{
        "game_is_running": true,
        "game_paused": false,
        "halftime_is_running": false,
        "timer": 173,
        "game_state_msg": "Game is running...",
        "teams": {
            "green": {
                "name": "",
                "score": 2,
                "x_positive": true,
                "robots": {
                    "1": {"penalized": true, "penalized_remaining": 3, "penalized_reason": "abuse",
                          "preempted": true, "preemption_reasons": ["penalty"]},
                    "2": {"penalized": false, "penalized_remaining": null, "penalized_reason": null,
                          "preempted": false, "preemption_reasons": []}
                }
            },
            "blue": {"name": "Blue Team", "score": 1, "x_positive": false, "robots": {}}
        },
        "referee_history_sliced": [[0, 180, "neutral", "Game started"], [1, 175, "green", "Goal"]]
    }"#;

    #[test]
    fn test_decode_game_state() {
        let state: GameState = serde_json::from_str(GAME_STATE).unwrap();
        assert!(state.game_is_running);
        assert!(state.clock_is_running());
        assert!(!state.awaits_goal_validation());
        assert_eq!(state.timer, 173.0);
        assert_eq!(state.team_name(TeamColor::Green), "green");
        assert_eq!(state.team_name(TeamColor::Blue), "Blue Team");
        assert_eq!(state.teams.green.score, 2);

        let robot = &state.teams.green.robots[&1];
        assert_eq!(robot.penalized_remaining, Some(3.0));
        assert_eq!(robot.penalized_reason.as_deref(), Some("abuse"));
        assert_eq!(robot.preemption_reasons, vec!["penalty".to_string()]);
        assert_eq!(state.teams.green.robots[&2].penalized_remaining, None);

        assert_eq!(
            state.referee_history_sliced[1],
            HistoryEntry {
                number: 1,
                time: 175.0,
                team: EventTeam::Green,
                event: "Goal".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let state: GameState = serde_json::from_str(r#"{"game_is_running": false}"#).unwrap();
        assert_eq!(state, GameState::default());
        assert_eq!(state.team_name(TeamColor::Blue), "blue");
    }

    #[test]
    fn test_event_team() {
        assert_eq!(EventTeam::Neutral.team(), None);
        assert_eq!(EventTeam::Blue.team(), Some(TeamColor::Blue));
        assert_eq!(EventTeam::Green.as_str(), "green");
    }
}
