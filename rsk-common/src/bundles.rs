use crate::color::TeamColor;
use core::ops::{Index, IndexMut};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One value per team, keyed the way the backend keys its team records
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Default, Debug, Clone, PartialEq)]
pub struct TeamBundle<T> {
    #[serde(default)]
    pub green: T,
    #[serde(default)]
    pub blue: T,
}

impl<T> TeamBundle<T> {
    pub fn iter(&self) -> impl Iterator<Item = (TeamColor, &T)> {
        self.into_iter()
    }

    pub fn map<U>(self, mut f: impl FnMut(TeamColor, T) -> U) -> TeamBundle<U> {
        TeamBundle {
            green: f(TeamColor::Green, self.green),
            blue: f(TeamColor::Blue, self.blue),
        }
    }
}

impl<T> Index<TeamColor> for TeamBundle<T> {
    type Output = T;

    fn index(&self, color: TeamColor) -> &Self::Output {
        match color {
            TeamColor::Green => &self.green,
            TeamColor::Blue => &self.blue,
        }
    }
}

impl<T> IndexMut<TeamColor> for TeamBundle<T> {
    fn index_mut(&mut self, color: TeamColor) -> &mut Self::Output {
        match color {
            TeamColor::Green => &mut self.green,
            TeamColor::Blue => &mut self.blue,
        }
    }
}

impl<T: Display> Display for TeamBundle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Green: {}, Blue: {}", self.green, self.blue)
    }
}

pub struct TeamBundleIterator<'a, T> {
    bundle: &'a TeamBundle<T>,
    index: usize,
}

impl<'a, T> Iterator for TeamBundleIterator<'a, T> {
    type Item = (TeamColor, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.index {
            0 => (TeamColor::Green, &self.bundle.green),
            1 => (TeamColor::Blue, &self.bundle.blue),
            _ => return None,
        };

        self.index += 1;
        Some(value)
    }
}

impl<'a, T> IntoIterator for &'a TeamBundle<T> {
    type Item = (TeamColor, &'a T);
    type IntoIter = TeamBundleIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        TeamBundleIterator {
            bundle: self,
            index: 0,
        }
    }
}
