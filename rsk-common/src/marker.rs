use crate::color::{TeamColor, UnknownColor};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A robot's field marker, written `<team><number>` (e.g. `green1`)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct MarkerId {
    pub team: TeamColor,
    pub number: u8,
}

impl MarkerId {
    pub const fn new(team: TeamColor, number: u8) -> Self {
        Self { team, number }
    }

    /// Every marker of a match, in team-then-number order
    pub fn all(robots_per_team: u8) -> impl Iterator<Item = MarkerId> {
        enum_iterator::all::<TeamColor>()
            .flat_map(move |team| (1..=robots_per_team).map(move |number| Self::new(team, number)))
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.team, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerParseError {
    #[error("Marker {0:?} has no robot number")]
    MissingNumber(String),
    #[error("Marker {0:?} has an invalid robot number")]
    BadNumber(String),
    #[error(transparent)]
    Color(#[from] UnknownColor),
}

impl FromStr for MarkerId {
    type Err = MarkerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| MarkerParseError::MissingNumber(s.to_string()))?;
        let (team, number) = s.split_at(split);
        let number = number
            .parse()
            .map_err(|_| MarkerParseError::BadNumber(s.to_string()))?;
        Ok(Self::new(team.parse()?, number))
    }
}

/// Something that can be teleported on the simulated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, SerializeDisplay, DeserializeFromStr)]
pub enum TeleportTarget {
    #[default]
    Ball,
    Robot(MarkerId),
}

impl fmt::Display for TeleportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ball => f.write_str("ball"),
            Self::Robot(marker) => marker.fmt(f),
        }
    }
}

impl FromStr for TeleportTarget {
    type Err = MarkerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ball") {
            Ok(Self::Ball)
        } else {
            s.parse().map(Self::Robot)
        }
    }
}
