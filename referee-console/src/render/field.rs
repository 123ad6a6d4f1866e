//! Field view: robot markers, their LEDs, the ball and placement guides.

use crate::{
    settings::DisplaySettings,
    view::{Element, FieldCanvas, Layer, RefereePanel, Rgb, Stroke},
};
use log::debug;
use rsk_common::{
    constants::Constants,
    geometry::{FieldPoint, FieldTransform, ScreenPose},
    marker::MarkerId,
    vision::{RawLeds, VisionState},
};
use std::{collections::BTreeMap, time::Duration};
use tokio::time::Instant;

/// LED positions around the robot, in degrees from its heading
const LED_ANGLES_DEG: [f64; 3] = [-30.0, 90.0, 210.0];
/// LED distance from the robot center, relative to its radius
const LED_OFFSET: f64 = 0.93;
const LANDMARK_LENGTH_PX: f64 = 100.0;
const TIMED_CIRCLE_DASH: [f64; 2] = [10.0, 10.0];
const FPS_WINDOW: Duration = Duration::from_millis(100);

/// One vision poll: the detections and the ball placement target, if any
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisionUpdate {
    pub vision: VisionState,
    pub placement: Option<FieldPoint>,
}

fn led_channel(value: f64) -> u8 {
    let scaled = 50.0 + (value.max(0.0) + 1.0).ln() / 256f64.ln() * 255.0;
    scaled.min(255.0).round() as u8
}

/// Display color of a robot's LEDs, brightened so dim values stay visible
pub fn led_color(raw: RawLeds) -> Rgb {
    Rgb(led_channel(raw[0]), led_channel(raw[1]), led_channel(raw[2]))
}

#[derive(Debug, Clone, Copy, Default)]
struct MarkerState {
    pose: Option<ScreenPose>,
    leds: Option<Rgb>,
    cleared: bool,
}

/// Everything drawn on the ball layer, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
struct BallScene {
    ball: Option<[f64; 2]>,
    placement: Option<[f64; 2]>,
    landmark: bool,
    timed_circle: bool,
}

#[derive(Debug)]
struct FpsMeter {
    frames: u32,
    since: Instant,
}

impl FpsMeter {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
        }
    }

    /// Counts a frame, returning the rate once a full window has elapsed
    fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed < FPS_WINDOW {
            return None;
        }
        let fps = (f64::from(self.frames) / elapsed.as_secs_f64()).round() as u32;
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}

#[derive(Debug)]
pub struct FieldRenderer {
    constants: Constants,
    transform: FieldTransform,
    markers: BTreeMap<MarkerId, MarkerState>,
    ball: Option<BallScene>,
    fps: FpsMeter,
}

impl FieldRenderer {
    /// `world_size` is the area shown by the canvas, in meters
    pub fn new(constants: Constants, world_size: [f64; 2], canvas_size: [f64; 2]) -> Self {
        Self {
            constants,
            transform: FieldTransform::new(world_size, canvas_size),
            markers: BTreeMap::new(),
            ball: None,
            fps: FpsMeter::new(),
        }
    }

    pub fn transform(&self) -> &FieldTransform {
        &self.transform
    }

    /// Robot diameter on the canvas
    pub fn robot_size(&self) -> f64 {
        self.constants.robot_radius * 2.0 * self.transform.px_per_meter()
    }

    /// Forgets what was drawn, so the next frame redraws everything
    pub fn resize(&mut self, canvas_size: [f64; 2]) {
        self.transform = FieldTransform::new(self.transform.world_size(), canvas_size);
        self.markers.clear();
        self.ball = None;
    }

    pub fn clear(&mut self, canvas: &mut impl FieldCanvas) {
        for marker in MarkerId::all(self.constants.robots_per_team) {
            canvas.clear(Layer::Robot(marker));
        }
        canvas.clear(Layer::Ball);
        self.markers.clear();
        self.ball = None;
    }

    /// Last drawn pose of a marker
    pub fn marker_pose(&self, marker: MarkerId) -> Option<ScreenPose> {
        self.markers.get(&marker).and_then(|state| state.pose)
    }

    pub fn drawn_markers(&self) -> impl Iterator<Item = (MarkerId, ScreenPose)> + '_ {
        self.markers
            .iter()
            .filter_map(|(marker, state)| state.pose.map(|pose| (*marker, pose)))
    }

    /// The drawn marker closest to a canvas point, if it lies within the
    /// robot's radius
    pub fn marker_at(&self, x: f64, y: f64) -> Option<MarkerId> {
        let radius = self.robot_size() / 2.0;
        self.drawn_markers()
            .map(|(marker, pose)| (marker, pose.distance_to(x, y)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(marker, _)| marker)
    }

    pub fn render(
        &mut self,
        update: &VisionUpdate,
        settings: &DisplaySettings,
        canvas: &mut impl FieldCanvas,
        panel: &mut impl RefereePanel,
    ) {
        if update.vision.simulated {
            if let Some(fps) = self.fps.tick(Instant::now()) {
                panel.set_text(Element::FpsCounter, &format!("FPS : {fps}"));
            }
        }

        for marker in MarkerId::all(self.constants.robots_per_team) {
            self.render_marker(marker, &update.vision, canvas);
        }

        let scene = BallScene {
            ball: update
                .vision
                .ball
                .map(|ball| self.transform.point_to_screen(ball)),
            placement: update
                .placement
                .map(|point| self.transform.point_to_screen(point)),
            landmark: settings.landmark,
            timed_circle: settings.timed_circle,
        };
        if self.ball != Some(scene) {
            self.draw_ball_layer(&scene, canvas);
            self.ball = Some(scene);
        }
    }

    fn render_marker(
        &mut self,
        marker: MarkerId,
        vision: &VisionState,
        canvas: &mut impl FieldCanvas,
    ) {
        let layer = Layer::Robot(marker);
        let state = self.markers.entry(marker).or_default();

        let Some(pose) = vision.pose(marker) else {
            if !state.cleared {
                canvas.clear(layer);
                *state = MarkerState {
                    cleared: true,
                    ..Default::default()
                };
            }
            return;
        };

        let screen = self.transform.to_screen(pose);
        let leds = vision.leds.get(&marker).copied().map(led_color);
        let moved = state.pose.is_none_or(|last| last.differs_from(&screen));
        if !(moved || state.cleared || state.leds != leds) {
            return;
        }

        debug!("Redrawing {marker} at {screen:?}");
        canvas.clear(layer);
        let size = self.constants.robot_radius * 2.0 * self.transform.px_per_meter();
        if let Some(color) = leds {
            let offset = self.constants.robot_radius * self.transform.px_per_meter() * LED_OFFSET;
            let (sin, cos) = screen.angle.sin_cos();
            for angle in LED_ANGLES_DEG {
                let (dy, dx) = angle.to_radians().sin_cos();
                let (dx, dy) = ((dx * offset).round(), (dy * offset).round());
                let center = [
                    screen.x + dx * cos - dy * sin,
                    screen.y + dx * sin + dy * cos,
                ];
                canvas.draw_glow(layer, center, color);
            }
        }
        canvas.draw_robot(marker, screen, size);

        *state = MarkerState {
            pose: Some(screen),
            leds,
            cleared: false,
        };
    }

    fn draw_ball_layer(&self, scene: &BallScene, canvas: &mut impl FieldCanvas) {
        let px_per_meter = self.transform.px_per_meter();
        canvas.clear(Layer::Ball);

        if let Some(ball) = scene.ball {
            canvas.fill_circle(
                Layer::Ball,
                ball,
                self.constants.ball_radius * px_per_meter,
                Rgb::ORANGE,
            );
        }

        if let Some(placement) = scene.placement {
            canvas.stroke_circle(
                Layer::Ball,
                placement,
                self.constants.place_ball_margin * px_per_meter,
                Stroke::solid(Rgb::RED),
            );
        }

        if scene.landmark {
            let [width, height] = self.transform.canvas_size();
            let center = [width / 2.0, height / 2.0];
            canvas.line(
                Layer::Ball,
                center,
                [center[0], center[1] - LANDMARK_LENGTH_PX],
                Stroke::solid(Rgb::BLUE),
            );
            canvas.line(
                Layer::Ball,
                center,
                [center[0] + LANDMARK_LENGTH_PX, center[1]],
                Stroke::solid(Rgb::RED),
            );
        }

        if let (true, Some(ball)) = (scene.timed_circle, scene.ball) {
            canvas.stroke_circle(
                Layer::Ball,
                ball,
                self.constants.timed_circle_radius * px_per_meter,
                Stroke::dashed(Rgb::RED, TIMED_CIRCLE_DASH),
            );
        }
    }
}
