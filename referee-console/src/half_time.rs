//! Steps the referee walks through at half time: optionally swap the robot
//! covers and re-identify the robots, swap sides, place the robots, then
//! start the second half.

use crate::{
    backend::{BackendCall, PlacementLayout},
    view::{Element, RefereePanel},
};
use enum_iterator::Sequence;
use log::warn;
use std::time::Duration;

pub const SEPARATOR_LABEL: &str = "Half Time";
/// Delay before robots are placed once they have swapped sides without a cover change
pub const PLACE_DELAY: Duration = Duration::from_secs(5);
/// Time given to the vision to identify robots after a cover change
pub const IDENTIFY_DELAY: Duration = Duration::from_secs(4);
/// Delay before the half-time panel is reset once the second half starts
pub const RESET_DELAY: Duration = Duration::from_millis(500);

/// Parts of the half-time panel, one of which is shown per step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum HalfTimeSection {
    CoverQuestion,
    IdentifyPrompt,
    IdentifyWaiting,
    IdentifyDone,
    IdentifyNext,
    PlaceStandard,
    SecondHalf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HalfTimeFlow {
    #[default]
    CoverQuestion,
    IdentifyPrompt,
    IdentifyWaiting,
    IdentifyDone,
    SecondHalfReady {
        /// Whether the robots were re-identified, in which case a manual
        /// "place" button is offered
        identified: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfTimeAction {
    CoversChanged(bool),
    Identify,
    IdentifyNext,
    StartSecondHalf,
}

/// Work that must happen some time after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayedStep {
    PlaceStandard,
    IdentifyFinished,
    Reset,
}

impl DelayedStep {
    pub fn delay(self) -> Duration {
        match self {
            Self::PlaceStandard => PLACE_DELAY,
            Self::IdentifyFinished => IDENTIFY_DELAY,
            Self::Reset => RESET_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub next: HalfTimeFlow,
    pub calls: Vec<BackendCall>,
    pub delayed: Option<DelayedStep>,
}

impl HalfTimeFlow {
    /// The transition `action` triggers, or `None` if it makes no sense now
    pub fn step(self, action: HalfTimeAction) -> Option<Step> {
        let step = match (self, action) {
            (Self::CoverQuestion, HalfTimeAction::CoversChanged(true)) => Step {
                next: Self::IdentifyPrompt,
                calls: vec![BackendCall::PlaceGame(PlacementLayout::SwapCovers)],
                delayed: None,
            },
            (Self::CoverQuestion, HalfTimeAction::CoversChanged(false)) => Step {
                next: Self::SecondHalfReady { identified: false },
                calls: vec![
                    BackendCall::PlaceGame(PlacementLayout::GentlySwapSide),
                    BackendCall::SwapTeamSides,
                ],
                delayed: Some(DelayedStep::PlaceStandard),
            },
            (Self::IdentifyPrompt, HalfTimeAction::Identify) => Step {
                next: Self::IdentifyWaiting,
                calls: vec![],
                delayed: Some(DelayedStep::IdentifyFinished),
            },
            (Self::IdentifyDone, HalfTimeAction::IdentifyNext) => Step {
                next: Self::SecondHalfReady { identified: true },
                calls: vec![
                    BackendCall::SwapTeamSides,
                    BackendCall::PlaceGame(PlacementLayout::Standard),
                ],
                delayed: None,
            },
            (Self::SecondHalfReady { .. }, HalfTimeAction::StartSecondHalf) => Step {
                next: self,
                calls: vec![BackendCall::StartSecondHalfTime],
                delayed: Some(DelayedStep::Reset),
            },
            (state, action) => {
                warn!("Ignoring half time action {action:?} while in {state:?}");
                return None;
            }
        };
        Some(step)
    }

    /// State and calls once a delayed step is due
    pub fn on_delay(self, delayed: DelayedStep) -> (Self, Vec<BackendCall>) {
        match delayed {
            DelayedStep::PlaceStandard => {
                (self, vec![BackendCall::PlaceGame(PlacementLayout::Standard)])
            }
            DelayedStep::IdentifyFinished if self == Self::IdentifyWaiting => {
                (Self::IdentifyDone, vec![])
            }
            DelayedStep::IdentifyFinished => (self, vec![]),
            DelayedStep::Reset => (Self::CoverQuestion, vec![]),
        }
    }

    pub fn shows(self, section: HalfTimeSection) -> bool {
        use HalfTimeSection as S;
        match self {
            Self::CoverQuestion => section == S::CoverQuestion,
            Self::IdentifyPrompt => section == S::IdentifyPrompt,
            Self::IdentifyWaiting => section == S::IdentifyWaiting,
            Self::IdentifyDone => matches!(section, S::IdentifyDone | S::IdentifyNext),
            Self::SecondHalfReady { identified } => {
                section == S::SecondHalf || (identified && section == S::PlaceStandard)
            }
        }
    }

    pub fn apply(self, panel: &mut impl RefereePanel) {
        for section in enum_iterator::all::<HalfTimeSection>() {
            panel.set_visible(Element::HalfTime(section), self.shows(section));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::view::RetainedPanel;

    #[test]
    fn test_cover_change_path() {
        let step = HalfTimeFlow::CoverQuestion
            .step(HalfTimeAction::CoversChanged(true))
            .unwrap();
        assert_eq!(step.next, HalfTimeFlow::IdentifyPrompt);
        assert_eq!(
            step.calls,
            vec![BackendCall::PlaceGame(PlacementLayout::SwapCovers)]
        );

        let step = step.next.step(HalfTimeAction::Identify).unwrap();
        assert_eq!(step.next, HalfTimeFlow::IdentifyWaiting);
        assert_eq!(step.delayed, Some(DelayedStep::IdentifyFinished));
        assert_eq!(DelayedStep::IdentifyFinished.delay(), IDENTIFY_DELAY);

        // Nothing to do until identification is over
        assert_eq!(step.next.step(HalfTimeAction::IdentifyNext), None);

        let (flow, calls) = step.next.on_delay(DelayedStep::IdentifyFinished);
        assert_eq!(flow, HalfTimeFlow::IdentifyDone);
        assert!(calls.is_empty());

        let step = flow.step(HalfTimeAction::IdentifyNext).unwrap();
        assert_eq!(step.next, HalfTimeFlow::SecondHalfReady { identified: true });
        assert_eq!(
            step.calls,
            vec![
                BackendCall::SwapTeamSides,
                BackendCall::PlaceGame(PlacementLayout::Standard)
            ]
        );

        let step = step.next.step(HalfTimeAction::StartSecondHalf).unwrap();
        assert_eq!(step.calls, vec![BackendCall::StartSecondHalfTime]);
        assert_eq!(step.delayed, Some(DelayedStep::Reset));
        let (flow, _) = step.next.on_delay(DelayedStep::Reset);
        assert_eq!(flow, HalfTimeFlow::CoverQuestion);
    }

    #[test]
    fn test_no_cover_change_path() {
        let step = HalfTimeFlow::CoverQuestion
            .step(HalfTimeAction::CoversChanged(false))
            .unwrap();
        assert_eq!(step.next, HalfTimeFlow::SecondHalfReady { identified: false });
        assert_eq!(
            step.calls,
            vec![
                BackendCall::PlaceGame(PlacementLayout::GentlySwapSide),
                BackendCall::SwapTeamSides
            ]
        );
        assert_eq!(step.delayed, Some(DelayedStep::PlaceStandard));

        let (flow, calls) = step.next.on_delay(DelayedStep::PlaceStandard);
        assert_eq!(flow, step.next);
        assert_eq!(calls, vec![BackendCall::PlaceGame(PlacementLayout::Standard)]);
    }

    #[test]
    fn test_stale_identify_timer() {
        let (flow, _) = HalfTimeFlow::CoverQuestion.on_delay(DelayedStep::IdentifyFinished);
        assert_eq!(flow, HalfTimeFlow::CoverQuestion);
    }

    #[test]
    fn test_sections() {
        let mut panel = RetainedPanel::new();
        HalfTimeFlow::IdentifyDone.apply(&mut panel);
        let shown: Vec<_> = enum_iterator::all::<HalfTimeSection>()
            .filter(|s| panel.is_visible(Element::HalfTime(*s)))
            .collect();
        assert_eq!(
            shown,
            vec![HalfTimeSection::IdentifyDone, HalfTimeSection::IdentifyNext]
        );

        HalfTimeFlow::SecondHalfReady { identified: false }.apply(&mut panel);
        assert!(panel.is_visible(Element::HalfTime(HalfTimeSection::SecondHalf)));
        assert!(!panel.is_visible(Element::HalfTime(HalfTimeSection::PlaceStandard)));
    }
}
