use crate::{
    render::format_timer,
    view::{Element, RefereePanel},
};
use log::info;
use rsk_common::game_snapshot::{EventTeam, HistoryEntry};
use serde_derive::{Deserialize, Serialize};

pub const NO_HISTORY_LABEL: &str = "No History";

/// Text templates for history events. `{id}`, `{team}`, `{title}`,
/// `{timestamp}` and `{event}` are substituted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryTemplates {
    pub neutral: String,
    pub team: String,
}

impl Default for HistoryTemplates {
    fn default() -> Self {
        Self {
            neutral: "[{timestamp}] {event}".to_string(),
            team: "[{timestamp}] {team}: {event}".to_string(),
        }
    }
}

impl HistoryTemplates {
    pub fn render(&self, id: usize, entry: &HistoryEntry) -> String {
        let template = match entry.team {
            EventTeam::Neutral => &self.neutral,
            EventTeam::Green | EventTeam::Blue => &self.team,
        };
        [
            ("{id}", id.to_string()),
            ("{team}", entry.team.as_str().to_string()),
            ("{title}", entry.event.clone()),
            ("{timestamp}", format_timer(entry.time)),
            ("{event}", entry.event.clone()),
        ]
        .into_iter()
        .fold(template.clone(), |text, (key, value)| text.replace(key, &value))
    }
}

/// Turns the backend's sliding window of recent events into an append-only
/// list. Every entry numbered below `displayed` is already on the panel.
#[derive(Debug, Default)]
pub struct HistoryRenderer {
    templates: HistoryTemplates,
    displayed: usize,
    /// The newest entry on the panel, as the backend sent it
    newest: Option<HistoryEntry>,
}

impl HistoryRenderer {
    pub fn new(templates: HistoryTemplates) -> Self {
        Self {
            templates,
            displayed: 0,
            newest: None,
        }
    }

    pub fn displayed(&self) -> usize {
        self.displayed
    }

    /// Id of the newest event on the panel
    pub fn newest(&self) -> Option<usize> {
        self.displayed.checked_sub(1)
    }

    pub fn reset(&mut self, panel: &mut impl RefereePanel) {
        self.displayed = 0;
        self.newest = None;
        panel.clear_history();
        panel.set_text(Element::NoHistory, NO_HISTORY_LABEL);
    }

    pub fn render(&mut self, entries: &[HistoryEntry], panel: &mut impl RefereePanel) {
        let Some(newest) = entries.last() else {
            return;
        };

        // A new game was started from elsewhere
        if self.restarted(entries) {
            info!(
                "History restarted at event {} after {} events, clearing",
                newest.number, self.displayed
            );
            self.reset(panel);
        }

        panel.set_text(Element::NoHistory, "");

        for entry in entries {
            if entry.number < self.displayed {
                continue;
            }
            panel.append_history(entry.number, self.templates.render(entry.number, entry));
            self.displayed = entry.number + 1;
            self.newest = Some(entry.clone());
        }
    }

    /// Numbering went backwards, or the newest shown event was replaced
    fn restarted(&self, entries: &[HistoryEntry]) -> bool {
        let Some(shown) = &self.newest else {
            return false;
        };
        let Some(newest) = entries.last() else {
            return false;
        };
        newest.number < shown.number
            || entries
                .iter()
                .any(|entry| entry.number == shown.number && entry != shown)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::view::RetainedPanel;

    fn entry(number: usize, team: EventTeam, event: &str) -> HistoryEntry {
        HistoryEntry {
            number,
            time: 300.0 - number as f64,
            team,
            event: event.to_string(),
        }
    }

    #[test]
    fn test_templates() {
        let templates = HistoryTemplates {
            neutral: "<{id}> {title} @ {timestamp}".to_string(),
            team: "<{id}> {team} {event}".to_string(),
        };
        assert_eq!(
            templates.render(3, &entry(3, EventTeam::Neutral, "Game started")),
            "<3> Game started @ 04:57"
        );
        assert_eq!(
            templates.render(4, &entry(4, EventTeam::Blue, "Goal")),
            "<4> blue Goal"
        );
    }

    #[test]
    fn test_append_only() {
        let mut panel = RetainedPanel::new();
        let mut history = HistoryRenderer::default();
        history.reset(&mut panel);
        assert_eq!(panel.text(Element::NoHistory), NO_HISTORY_LABEL);

        let mut entries = Vec::new();
        for n in 0..12 {
            entries.push(entry(n, EventTeam::Green, "Goal"));
            // The backend only keeps a window of recent events
            let window = &entries[entries.len().saturating_sub(5)..];
            history.render(window, &mut panel);
            history.render(window, &mut panel);
        }

        let ids: Vec<usize> = panel.history_events().map(|(id, _, _)| id).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
        assert_eq!(history.displayed(), 12);
        assert_eq!(history.newest(), Some(11));
        assert_eq!(panel.text(Element::NoHistory), "");
    }

    #[test]
    fn test_joining_mid_game() {
        let mut panel = RetainedPanel::new();
        let mut history = HistoryRenderer::default();
        let window: Vec<_> = (30..35)
            .map(|n| entry(n, EventTeam::Neutral, "Event"))
            .collect();
        history.render(&window, &mut panel);
        history.render(&window[1..], &mut panel);
        assert_eq!(panel.history_events().count(), 5);
        assert_eq!(history.displayed(), 35);
    }

    #[test]
    fn test_restart_detected() {
        let mut panel = RetainedPanel::new();
        let mut history = HistoryRenderer::default();
        let first_game: Vec<_> = (0..6).map(|n| entry(n, EventTeam::Blue, "Goal")).collect();
        history.render(&first_game, &mut panel);
        assert_eq!(history.displayed(), 6);

        history.render(&[entry(0, EventTeam::Neutral, "Game started")], &mut panel);
        let events: Vec<_> = panel.history_events().collect();
        assert_eq!(events, vec![(0, "[05:00] Game started", None)]);
        assert_eq!(history.displayed(), 1);
    }

    #[test]
    fn test_restart_after_single_event() {
        let mut panel = RetainedPanel::new();
        let mut history = HistoryRenderer::default();
        history.render(&[entry(0, EventTeam::Neutral, "Game started")], &mut panel);
        history.render(&[entry(0, EventTeam::Neutral, "Game started")], &mut panel);
        assert_eq!(panel.history_events().count(), 1);

        let new_game = [
            entry(0, EventTeam::Green, "Goal"),
            entry(1, EventTeam::Neutral, "Game paused"),
        ];
        history.render(&new_game, &mut panel);
        let events: Vec<_> = panel.history_events().collect();
        assert_eq!(
            events,
            vec![
                (0, "[05:00] green: Goal", None),
                (1, "[04:59] Game paused", None)
            ]
        );
        assert_eq!(history.displayed(), 2);
    }

    #[test]
    fn test_empty_window_keeps_placeholder() {
        let mut panel = RetainedPanel::new();
        let mut history = HistoryRenderer::default();
        history.reset(&mut panel);
        history.render(&[], &mut panel);
        assert_eq!(panel.text(Element::NoHistory), NO_HISTORY_LABEL);
    }
}
