use super::{
    format_timer,
    history::{HistoryRenderer, HistoryTemplates},
    penalty_bar_width,
};
use crate::view::{Class, Element, GoalVerdict, RefereePanel, Side};
use rsk_common::{
    constants::Constants,
    game_snapshot::{GameState, RobotState},
    marker::MarkerId,
};

/// Where the match stands, as far as the referee's controls are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolePhase {
    Stopped,
    Running,
    Paused,
    AwaitingGoalValidation { paused: bool },
}

impl ConsolePhase {
    pub fn of(state: &GameState) -> Self {
        if !state.game_is_running {
            Self::Stopped
        } else if state.awaits_goal_validation() {
            Self::AwaitingGoalValidation {
                paused: state.game_paused,
            }
        } else if state.game_paused {
            Self::Paused
        } else {
            Self::Running
        }
    }

    /// Controls for this phase, with Resume held off while a goal waits for
    /// the referee's decision
    pub fn controls_for(state: &GameState) -> ControlStates {
        let mut controls = Self::of(state).controls();
        controls.resume_enabled &= !state.awaits_goal_validation();
        controls
    }

    pub fn controls(self) -> ControlStates {
        match self {
            Self::Stopped => ControlStates {
                start_visible: true,
                pause_visible: false,
                resume_visible: false,
                resume_enabled: true,
                actions_enabled: false,
            },
            Self::Running => ControlStates {
                start_visible: false,
                pause_visible: true,
                resume_visible: false,
                resume_enabled: true,
                actions_enabled: true,
            },
            Self::Paused => ControlStates {
                start_visible: false,
                pause_visible: false,
                resume_visible: true,
                resume_enabled: true,
                actions_enabled: true,
            },
            Self::AwaitingGoalValidation { paused } => ControlStates {
                start_visible: false,
                pause_visible: !paused,
                resume_visible: paused,
                resume_enabled: false,
                actions_enabled: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStates {
    pub start_visible: bool,
    pub pause_visible: bool,
    pub resume_visible: bool,
    pub resume_enabled: bool,
    /// Half time, score and penalty buttons
    pub actions_enabled: bool,
}

impl ControlStates {
    pub fn apply(&self, panel: &mut impl RefereePanel, constants: &Constants) {
        panel.set_visible(Element::StartGame, self.start_visible);
        panel.set_visible(Element::PauseGroup, self.pause_visible);
        panel.set_visible(Element::ResumeGroup, self.resume_visible);
        panel.set_enabled(Element::ResumeGame, self.resume_enabled);

        panel.set_enabled(Element::HalfTimeButton, self.actions_enabled);
        for team in constants.team_colors {
            panel.set_enabled(Element::ScoreUp(team), self.actions_enabled);
            panel.set_enabled(Element::ScoreDown(team), self.actions_enabled);
        }
        for robot in MarkerId::all(constants.robots_per_team) {
            panel.set_enabled(Element::Penalize(robot), self.actions_enabled);
            panel.set_enabled(Element::Unpenalize(robot), self.actions_enabled);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotStatus {
    Preempted(String),
    Playing,
    Ready,
}

impl RobotStatus {
    pub fn of(robot: &RobotState, clock_running: bool) -> Self {
        if !robot.preemption_reasons.is_empty() {
            match &robot.penalized_reason {
                Some(reason) => Self::Preempted(format!("[{reason}]")),
                None => Self::Preempted(robot.preemption_reasons.join(",")),
            }
        } else if clock_running {
            Self::Playing
        } else {
            Self::Ready
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Preempted(reasons) => reasons,
            Self::Playing => "Robot is playing...",
            Self::Ready => "Robot is ready to play",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerStyle {
    /// The clock went past zero
    pub danger: bool,
    /// Blink phase of the final countdown
    pub alert: bool,
}

impl TimerStyle {
    pub fn of(state: &GameState) -> Self {
        if !state.clock_is_running() {
            return Self::default();
        }
        let timer = state.timer;
        if timer < 0.0 {
            Self {
                danger: true,
                alert: false,
            }
        } else if timer < 10.0 && timer % 2.0 != 0.0 {
            Self {
                danger: false,
                alert: true,
            }
        } else {
            Self::default()
        }
    }
}

/// Keeps the referee panel in step with the latest game state
#[derive(Debug)]
pub struct RefereeRenderer {
    constants: Constants,
    history: HistoryRenderer,
}

impl RefereeRenderer {
    pub fn new(constants: Constants, templates: HistoryTemplates) -> Self {
        Self {
            constants,
            history: HistoryRenderer::new(templates),
        }
    }

    pub fn history(&self) -> &HistoryRenderer {
        &self.history
    }

    pub fn render(&mut self, state: &GameState, panel: &mut impl RefereePanel) {
        let first = self.constants.first_team();
        let second = self.constants.second_team();

        panel.set_text(Element::TeamName(Side::First), state.team_name(first));
        panel.set_text(Element::TeamName(Side::Second), state.team_name(second));

        let clock_running = state.clock_is_running();
        for (team, team_state) in state.teams.iter() {
            for (number, robot) in &team_state.robots {
                self.render_robot(MarkerId::new(team, *number), robot, clock_running, panel);
            }
        }

        panel.set_text(Element::Score(Side::First), &state.teams[first].score.to_string());
        panel.set_text(
            Element::Score(Side::Second),
            &state.teams[second].score.to_string(),
        );

        panel.set_text(Element::Timer, &format_timer(state.timer));
        let style = TimerStyle::of(state);
        panel.set_class(Element::Timer, Class::Danger, style.danger);
        panel.set_class(Element::Background, Class::Alert, style.alert);

        panel.set_text(Element::GameState, &state.game_state_msg);
        ConsolePhase::controls_for(state).apply(panel, &self.constants);

        self.history.render(&state.referee_history_sliced, panel);

        panel.set_class(
            Element::PenaltyTabs,
            Class::Reversed,
            !state.teams[first].x_positive,
        );
    }

    fn render_robot(
        &self,
        marker: MarkerId,
        robot: &RobotState,
        clock_running: bool,
        panel: &mut impl RefereePanel,
    ) {
        let bar = Element::PenaltyBar(marker);
        panel.set_width(
            bar,
            penalty_bar_width(robot.penalized_remaining, self.constants.default_penalty),
        );
        match robot.penalized_remaining {
            Some(remaining) => panel.set_text(bar, &format!("{remaining} s")),
            None => panel.set_text(bar, ""),
        }

        let status = RobotStatus::of(robot, clock_running);
        let element = Element::RobotState(marker);
        panel.set_text(element, status.text());
        panel.set_class(
            element,
            Class::Danger,
            matches!(status, RobotStatus::Preempted(_)),
        );
    }

    /// Forgets the displayed events, for a new game
    pub fn reset_history(&mut self, panel: &mut impl RefereePanel) {
        self.history.reset(panel);
    }

    /// Labels the newest event with the referee's decision on it
    pub fn mark_newest(&self, verdict: GoalVerdict, panel: &mut impl RefereePanel) {
        if let Some(id) = self.history.newest() {
            panel.mark_history(id, verdict);
        }
    }
}
