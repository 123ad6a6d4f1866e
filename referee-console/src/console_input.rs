//! Commands typed on the console's standard input.

use crate::{
    backend::{PlacementLayout, UnknownLayout},
    dispatcher::{PointerButton, UserAction},
    half_time::HalfTimeAction,
    settings::{FPS_SLIDER_MAX, FpsLimit},
};
use rsk_common::{
    color::{TeamColor, UnknownColor},
    marker::{MarkerId, MarkerParseError, TeleportTarget},
};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
start | pause | resume | stop
half-time | cover yes|no | identify | identify-next | second-half
name <team> <name> | score <team> +|- | reset-score
penalize <robot> | unpenalize <robot> | goal accept|reject
place standard|dots|side | teleport <ball|robot> <x> <y> <orientation>
view [on|off] | fps <10-60|unlimited> | landmark on|off | timed-circle on|off
drag <x> <y> <to x> <to y> [turn]
help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Action(UserAction),
    ShowField(Option<bool>),
    FpsLimit(FpsLimit),
    Landmark(bool),
    TimedCircle(bool),
    /// A pointer drag on the field canvas, in pixels
    Drag {
        from: [f64; 2],
        to: [f64; 2],
        button: PointerButton,
    },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandParseError {
    #[error("Unknown command {0:?}, try \"help\"")]
    UnknownCommand(String),
    #[error("{command} needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("{command} does not understand {value:?}")]
    BadArgument { command: &'static str, value: String },
    #[error(transparent)]
    Color(#[from] UnknownColor),
    #[error(transparent)]
    Marker(#[from] MarkerParseError),
    #[error(transparent)]
    Layout(#[from] UnknownLayout),
}

struct Args<'a> {
    command: &'static str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn next(&mut self, argument: &'static str) -> Result<&'a str, CommandParseError> {
        self.words.next().ok_or(CommandParseError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn parse<T: FromStr>(&mut self, argument: &'static str) -> Result<T, CommandParseError> {
        let value = self.next(argument)?;
        value.parse().map_err(|_| self.bad(value))
    }

    fn switch(&mut self) -> Result<bool, CommandParseError> {
        let value = self.next("on or off")?;
        match value {
            "on" | "yes" => Ok(true),
            "off" | "no" => Ok(false),
            _ => Err(self.bad(value)),
        }
    }

    fn rest(self) -> String {
        self.words.collect::<Vec<_>>().join(" ")
    }

    fn bad(&self, value: &str) -> CommandParseError {
        CommandParseError::BadArgument {
            command: self.command,
            value: value.to_string(),
        }
    }
}

impl FromStr for ConsoleInput {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(word) = words.next() else {
            return Err(CommandParseError::UnknownCommand(String::new()));
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "start" => "start",
            "pause" => "pause",
            "resume" => "resume",
            "stop" => "stop",
            "half-time" | "halftime" => "half-time",
            "cover" => "cover",
            "identify" => "identify",
            "identify-next" | "next" => "identify-next",
            "second-half" => "second-half",
            "name" => "name",
            "score" => "score",
            "reset-score" => "reset-score",
            "penalize" => "penalize",
            "unpenalize" => "unpenalize",
            "goal" => "goal",
            "place" => "place",
            "teleport" => "teleport",
            "view" => "view",
            "fps" => "fps",
            "landmark" => "landmark",
            "timed-circle" => "timed-circle",
            "drag" => "drag",
            "help" | "?" => "help",
            "quit" | "exit" => "quit",
            _ => return Err(CommandParseError::UnknownCommand(word.to_string())),
        };
        let mut args = Args { command, words };

        let action = match command {
            "start" => UserAction::StartGame,
            "pause" => UserAction::PauseGame,
            "resume" => UserAction::ResumeGame,
            "stop" => UserAction::StopGame,
            "half-time" => UserAction::StartHalfTime,
            "cover" => UserAction::HalfTime(HalfTimeAction::CoversChanged(args.switch()?)),
            "identify" => UserAction::HalfTime(HalfTimeAction::Identify),
            "identify-next" => UserAction::HalfTime(HalfTimeAction::IdentifyNext),
            "second-half" => UserAction::HalfTime(HalfTimeAction::StartSecondHalf),
            "name" => {
                let team: TeamColor = args.next("a team")?.parse()?;
                UserAction::SetTeamName(team, args.rest())
            }
            "score" => {
                let team: TeamColor = args.next("a team")?.parse()?;
                match args.next("+ or -")? {
                    "+" | "up" => UserAction::ScoreUp(team),
                    "-" | "down" => UserAction::ScoreDown(team),
                    other => return Err(args.bad(other)),
                }
            }
            "reset-score" => UserAction::ResetScore,
            "penalize" => UserAction::Penalize(args.next("a robot")?.parse::<MarkerId>()?),
            "unpenalize" => UserAction::Unpenalize(args.next("a robot")?.parse::<MarkerId>()?),
            "goal" => match args.next("accept or reject")? {
                "accept" | "validate" => UserAction::ValidateGoal(true),
                "reject" | "disallow" => UserAction::ValidateGoal(false),
                other => return Err(args.bad(other)),
            },
            "place" => {
                let layout: PlacementLayout = args.next("a layout")?.parse()?;
                UserAction::Place(layout)
            }
            "teleport" => UserAction::Teleport {
                target: args.next("a target")?.parse::<TeleportTarget>()?,
                x: args.parse("x")?,
                y: args.parse("y")?,
                orientation: args.parse("an orientation")?,
            },
            "view" => {
                return Ok(Self::ShowField(match args.words.next() {
                    None => None,
                    Some("on") => Some(true),
                    Some("off") => Some(false),
                    Some(other) => return Err(args.bad(other)),
                }));
            }
            "fps" => {
                let value = args.next("a frame rate")?;
                if value == "unlimited" {
                    return Ok(Self::FpsLimit(FpsLimit::Unlimited));
                }
                let fps: u32 = value.parse().map_err(|_| args.bad(value))?;
                return Ok(Self::FpsLimit(FpsLimit::from_slider(fps.min(FPS_SLIDER_MAX))));
            }
            "landmark" => return Ok(Self::Landmark(args.switch()?)),
            "timed-circle" => return Ok(Self::TimedCircle(args.switch()?)),
            "drag" => {
                let from = [args.parse("x")?, args.parse("y")?];
                let to = [args.parse("a target x")?, args.parse("a target y")?];
                let button = match args.words.next() {
                    None => PointerButton::Primary,
                    Some("turn") => PointerButton::Secondary,
                    Some(other) => return Err(args.bad(other)),
                };
                return Ok(Self::Drag { from, to, button });
            }
            "help" => return Ok(Self::Help),
            _ => return Ok(Self::Quit),
        };
        Ok(Self::Action(action))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(s: &str) -> Result<ConsoleInput, CommandParseError> {
        s.parse()
    }

    fn action(s: &str) -> UserAction {
        match parse(s) {
            Ok(ConsoleInput::Action(action)) => action,
            other => panic!("{s:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn test_game_commands() {
        assert_eq!(action("start"), UserAction::StartGame);
        assert_eq!(action("  PAUSE "), UserAction::PauseGame);
        assert_eq!(action("half-time"), UserAction::StartHalfTime);
        assert_eq!(
            action("cover no"),
            UserAction::HalfTime(HalfTimeAction::CoversChanged(false))
        );
        assert_eq!(
            action("next"),
            UserAction::HalfTime(HalfTimeAction::IdentifyNext)
        );
        assert_eq!(action("goal reject"), UserAction::ValidateGoal(false));
        assert_eq!(
            action("place dots"),
            UserAction::Place(PlacementLayout::Dots)
        );
    }

    #[test]
    fn test_team_commands() {
        assert_eq!(
            action("name blue  Les Robots  Bleus"),
            UserAction::SetTeamName(TeamColor::Blue, "Les Robots Bleus".to_string())
        );
        assert_eq!(action("score green -"), UserAction::ScoreDown(TeamColor::Green));
        assert_eq!(
            action("penalize blue2"),
            UserAction::Penalize(MarkerId::new(TeamColor::Blue, 2))
        );
        assert_eq!(
            action("teleport green1 0.5 -0.25 1.57"),
            UserAction::Teleport {
                target: TeleportTarget::Robot(MarkerId::new(TeamColor::Green, 1)),
                x: 0.5,
                y: -0.25,
                orientation: 1.57,
            }
        );
    }

    #[test]
    fn test_display_commands() {
        assert_eq!(parse("view"), Ok(ConsoleInput::ShowField(None)));
        assert_eq!(parse("view off"), Ok(ConsoleInput::ShowField(Some(false))));
        assert_eq!(
            parse("fps 42"),
            Ok(ConsoleInput::FpsLimit(FpsLimit::Capped(40)))
        );
        assert_eq!(
            parse("fps 300"),
            Ok(ConsoleInput::FpsLimit(FpsLimit::Unlimited))
        );
        assert_eq!(parse("landmark off"), Ok(ConsoleInput::Landmark(false)));
        assert_eq!(
            parse("drag 10 20 30 40 turn"),
            Ok(ConsoleInput::Drag {
                from: [10.0, 20.0],
                to: [30.0, 40.0],
                button: PointerButton::Secondary,
            })
        );
        assert_eq!(parse("quit"), Ok(ConsoleInput::Quit));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse("dance"),
            Err(CommandParseError::UnknownCommand("dance".to_string()))
        );
        assert_eq!(
            parse("penalize"),
            Err(CommandParseError::MissingArgument {
                command: "penalize",
                argument: "a robot"
            })
        );
        assert!(matches!(
            parse("score red +"),
            Err(CommandParseError::Color(_))
        ));
        assert!(matches!(
            parse("place spiral"),
            Err(CommandParseError::Layout(_))
        ));
        assert_eq!(
            parse("teleport ball one 0 0"),
            Err(CommandParseError::BadArgument {
                command: "teleport",
                value: "one".to_string()
            })
        );
        assert_eq!(
            parse("landmark maybe"),
            Err(CommandParseError::BadArgument {
                command: "landmark",
                value: "maybe".to_string()
            })
        );
    }
}
