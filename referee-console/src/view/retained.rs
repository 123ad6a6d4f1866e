//! In-memory panel and canvas. They keep the last written value of every
//! element and layer, only count writes that change something, and queue
//! those changes so the console can print them.

use super::{Class, Element, FieldCanvas, GoalVerdict, Layer, RefereePanel, Rgb, Stroke};
use derivative::Derivative;
use rsk_common::{geometry::ScreenPose, marker::MarkerId};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

#[derive(Derivative)]
#[derivative(Debug, Default, Clone, PartialEq)]
pub struct ElementState {
    pub text: String,
    pub classes: BTreeSet<Class>,
    #[derivative(Default(value = "true"))]
    pub enabled: bool,
    #[derivative(Default(value = "true"))]
    pub visible: bool,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryNode {
    Event {
        id: usize,
        content: String,
        verdict: Option<GoalVerdict>,
    },
    Separator(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelChange {
    Text(Element, String),
    Class(Element, Class, bool),
    Enabled(Element, bool),
    Visible(Element, bool),
    Width(Element, f64),
    HistoryAppended(String),
    HistoryCleared,
    HistoryMarked(usize, GoalVerdict),
}

impl fmt::Display for PanelChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(element, text) => write!(f, "{element}: {text:?}"),
            Self::Class(element, class, on) => {
                write!(f, "{element}: {class:?} {}", if *on { "on" } else { "off" })
            }
            Self::Enabled(element, enabled) => write!(
                f,
                "{element}: {}",
                if *enabled { "enabled" } else { "disabled" }
            ),
            Self::Visible(element, visible) => {
                write!(f, "{element}: {}", if *visible { "shown" } else { "hidden" })
            }
            Self::Width(element, percent) => write!(f, "{element}: {percent:.0}%"),
            Self::HistoryAppended(content) => write!(f, "history: {content}"),
            Self::HistoryCleared => write!(f, "history cleared"),
            Self::HistoryMarked(id, verdict) => write!(f, "history #{id}: {}", verdict.label()),
        }
    }
}

#[derive(Debug, Default)]
pub struct RetainedPanel {
    elements: BTreeMap<Element, ElementState>,
    history: Vec<HistoryNode>,
    mutations: usize,
    changes: Vec<PanelChange>,
}

impl RetainedPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, element: Element) -> ElementState {
        self.elements.get(&element).cloned().unwrap_or_default()
    }

    pub fn text(&self, element: Element) -> String {
        self.element(element).text
    }

    pub fn has_class(&self, element: Element, class: Class) -> bool {
        self.element(element).classes.contains(&class)
    }

    pub fn is_enabled(&self, element: Element) -> bool {
        self.element(element).enabled
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.element(element).visible
    }

    pub fn width(&self, element: Element) -> Option<f64> {
        self.element(element).width
    }

    pub fn history(&self) -> &[HistoryNode] {
        &self.history
    }

    /// The history events, without separators
    pub fn history_events(&self) -> impl Iterator<Item = (usize, &str, Option<GoalVerdict>)> {
        self.history.iter().filter_map(|node| match node {
            HistoryNode::Event {
                id,
                content,
                verdict,
            } => Some((*id, content.as_str(), *verdict)),
            HistoryNode::Separator(_) => None,
        })
    }

    /// Number of writes that actually changed the panel
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    pub fn take_changes(&mut self) -> Vec<PanelChange> {
        std::mem::take(&mut self.changes)
    }

    fn update(
        &mut self,
        element: Element,
        change: PanelChange,
        apply: impl FnOnce(&mut ElementState) -> bool,
    ) {
        if apply(self.elements.entry(element).or_default()) {
            self.record(change);
        }
    }

    fn record(&mut self, change: PanelChange) {
        self.mutations += 1;
        self.changes.push(change);
    }
}

impl RefereePanel for RetainedPanel {
    fn set_text(&mut self, element: Element, text: &str) {
        self.update(element, PanelChange::Text(element, text.to_string()), |state| {
            if state.text == text {
                false
            } else {
                state.text = text.to_string();
                true
            }
        });
    }

    fn set_class(&mut self, element: Element, class: Class, on: bool) {
        self.update(element, PanelChange::Class(element, class, on), |state| {
            if on {
                state.classes.insert(class)
            } else {
                state.classes.remove(&class)
            }
        });
    }

    fn set_enabled(&mut self, element: Element, enabled: bool) {
        self.update(element, PanelChange::Enabled(element, enabled), |state| {
            std::mem::replace(&mut state.enabled, enabled) != enabled
        });
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        self.update(element, PanelChange::Visible(element, visible), |state| {
            std::mem::replace(&mut state.visible, visible) != visible
        });
    }

    fn set_width(&mut self, element: Element, percent: f64) {
        self.update(element, PanelChange::Width(element, percent), |state| {
            state.width.replace(percent) != Some(percent)
        });
    }

    fn append_history(&mut self, id: usize, content: String) {
        self.record(PanelChange::HistoryAppended(content.clone()));
        self.history.push(HistoryNode::Event {
            id,
            content,
            verdict: None,
        });
    }

    fn append_history_separator(&mut self, label: &str) {
        self.record(PanelChange::HistoryAppended(label.to_string()));
        self.history.push(HistoryNode::Separator(label.to_string()));
    }

    fn clear_history(&mut self) {
        if !self.history.is_empty() {
            self.history.clear();
            self.record(PanelChange::HistoryCleared);
        }
    }

    fn mark_history(&mut self, id: usize, verdict: GoalVerdict) {
        let marked = self.history.iter_mut().any(|node| match node {
            HistoryNode::Event {
                id: node_id,
                verdict: node_verdict,
                ..
            } if *node_id == id && *node_verdict != Some(verdict) => {
                *node_verdict = Some(verdict);
                true
            }
            _ => false,
        });
        if marked {
            self.record(PanelChange::HistoryMarked(id, verdict));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Robot {
        marker: MarkerId,
        pose: ScreenPose,
        size: f64,
    },
    Glow {
        center: [f64; 2],
        color: Rgb,
    },
    FillCircle {
        center: [f64; 2],
        radius: f64,
        color: Rgb,
    },
    StrokeCircle {
        center: [f64; 2],
        radius: f64,
        stroke: Stroke,
    },
    Line {
        from: [f64; 2],
        to: [f64; 2],
        stroke: Stroke,
    },
}

/// Canvas that keeps the draw list of every layer
#[derive(Debug)]
pub struct RecordingCanvas {
    size: [f64; 2],
    layers: BTreeMap<Layer, Vec<DrawOp>>,
    mutations: usize,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: [width, height],
            layers: BTreeMap::new(),
            mutations: 0,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = [width, height];
        self.layers.clear();
    }

    pub fn layer(&self, layer: Layer) -> &[DrawOp] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of clears of non-empty layers plus draw calls
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn push(&mut self, layer: Layer, op: DrawOp) {
        self.mutations += 1;
        self.layers.entry(layer).or_default().push(op);
    }
}

impl FieldCanvas for RecordingCanvas {
    fn size(&self) -> [f64; 2] {
        self.size
    }

    fn clear(&mut self, layer: Layer) {
        if self.layers.remove(&layer).is_some_and(|ops| !ops.is_empty()) {
            self.mutations += 1;
        }
    }

    fn draw_robot(&mut self, marker: MarkerId, pose: ScreenPose, size: f64) {
        self.push(Layer::Robot(marker), DrawOp::Robot { marker, pose, size });
    }

    fn draw_glow(&mut self, layer: Layer, center: [f64; 2], color: Rgb) {
        self.push(layer, DrawOp::Glow { center, color });
    }

    fn fill_circle(&mut self, layer: Layer, center: [f64; 2], radius: f64, color: Rgb) {
        self.push(
            layer,
            DrawOp::FillCircle {
                center,
                radius,
                color,
            },
        );
    }

    fn stroke_circle(&mut self, layer: Layer, center: [f64; 2], radius: f64, stroke: Stroke) {
        self.push(
            layer,
            DrawOp::StrokeCircle {
                center,
                radius,
                stroke,
            },
        );
    }

    fn line(&mut self, layer: Layer, from: [f64; 2], to: [f64; 2], stroke: Stroke) {
        self.push(layer, DrawOp::Line { from, to, stroke });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rsk_common::color::TeamColor;

    #[test]
    fn test_identical_writes_are_free() {
        let mut panel = RetainedPanel::new();
        panel.set_text(Element::Timer, "01:00");
        panel.set_enabled(Element::StartGame, false);
        panel.set_class(Element::Timer, Class::Danger, true);
        assert_eq!(panel.mutations(), 3);

        panel.set_text(Element::Timer, "01:00");
        panel.set_enabled(Element::StartGame, false);
        panel.set_class(Element::Timer, Class::Danger, true);
        panel.set_visible(Element::PauseGroup, true);
        panel.set_class(Element::Background, Class::Alert, false);
        assert_eq!(panel.mutations(), 3);
        assert_eq!(panel.take_changes().len(), 3);
        assert!(panel.take_changes().is_empty());
    }

    #[test]
    fn test_history_marking() {
        let mut panel = RetainedPanel::new();
        panel.append_history(0, "kickoff".to_string());
        panel.append_history_separator("Half Time");
        panel.append_history(1, "goal".to_string());
        panel.mark_history(1, GoalVerdict::Validated);
        panel.mark_history(1, GoalVerdict::Validated);
        panel.mark_history(7, GoalVerdict::Disallowed);

        let events: Vec<_> = panel.history_events().collect();
        assert_eq!(
            events,
            vec![
                (0, "kickoff", None),
                (1, "goal", Some(GoalVerdict::Validated))
            ]
        );
        assert_eq!(panel.history().len(), 3);
        assert_eq!(panel.mutations(), 4);

        panel.clear_history();
        panel.clear_history();
        assert!(panel.history().is_empty());
        assert_eq!(panel.mutations(), 5);
    }

    #[test]
    fn test_canvas_layers() {
        let marker = MarkerId::new(TeamColor::Green, 1);
        let mut canvas = RecordingCanvas::new(100.0, 50.0);
        canvas.clear(Layer::Ball);
        assert_eq!(canvas.mutations(), 0);

        canvas.draw_robot(marker, ScreenPose::new(1.0, 2.0, 0.0), 10.0);
        canvas.fill_circle(Layer::Ball, [5.0, 5.0], 2.0, Rgb::ORANGE);
        assert_eq!(canvas.layer(Layer::Robot(marker)).len(), 1);
        assert_eq!(canvas.mutations(), 2);

        canvas.clear(Layer::Robot(marker));
        assert!(canvas.layer(Layer::Robot(marker)).is_empty());
        assert_eq!(canvas.layer(Layer::Ball).len(), 1);
        assert_eq!(canvas.mutations(), 3);
        assert_eq!(canvas.size(), [100.0, 50.0]);
    }
}
