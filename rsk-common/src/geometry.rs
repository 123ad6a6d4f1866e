//! Mapping between field coordinates (meters, origin at the center, y up) and
//! canvas coordinates (pixels, origin top-left, y down).

use core::f64::consts::FRAC_PI_2;
use serde::{Deserialize, Serialize};

/// Smallest screen-space move, in pixels, that is worth a redraw
pub const MIN_TRANSLATION_PX: f64 = 1.0;
/// Smallest screen-space rotation, in radians, that is worth a redraw
pub const MIN_ROTATION_RAD: f64 = 0.05;

/// A point on the field, in meters
pub type FieldPoint = [f64; 2];

/// A detected pose on the field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub position: FieldPoint,
    #[serde(default)]
    pub orientation: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, orientation: f64) -> Self {
        Self {
            position: [x, y],
            orientation,
        }
    }
}

/// A pose on the canvas, in pixels, with the angle measured from canvas "up"
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPose {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl ScreenPose {
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    pub fn point(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// True when `other` is far enough from `self` on any axis to be redrawn
    pub fn differs_from(&self, other: &ScreenPose) -> bool {
        (self.x - other.x).abs() > MIN_TRANSLATION_PX
            || (self.y - other.y).abs() > MIN_TRANSLATION_PX
            || (self.angle - other.angle).abs() > MIN_ROTATION_RAD
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTransform {
    world_size: [f64; 2],
    canvas_size: [f64; 2],
}

impl FieldTransform {
    /// `world_size` is the (length, width) in meters covered by a canvas of
    /// `canvas_size` (width, height) pixels
    pub fn new(world_size: [f64; 2], canvas_size: [f64; 2]) -> Self {
        Self {
            world_size,
            canvas_size,
        }
    }

    pub fn canvas_size(&self) -> [f64; 2] {
        self.canvas_size
    }

    pub fn world_size(&self) -> [f64; 2] {
        self.world_size
    }

    /// Horizontal scale, used to size robots, the ball and guide circles
    pub fn px_per_meter(&self) -> f64 {
        self.canvas_size[0] / self.world_size[0]
    }

    pub fn point_to_screen(&self, point: FieldPoint) -> [f64; 2] {
        let [w, h] = self.world_size;
        let [pw, ph] = self.canvas_size;
        [(point[0] + w / 2.0) * pw / w, (-point[1] + h / 2.0) * ph / h]
    }

    pub fn point_to_world(&self, x: f64, y: f64) -> FieldPoint {
        let [w, h] = self.world_size;
        let [pw, ph] = self.canvas_size;
        [x * w / pw - w / 2.0, -(y * h / ph - h / 2.0)]
    }

    pub fn to_screen(&self, pose: Pose) -> ScreenPose {
        let [x, y] = self.point_to_screen(pose.position);
        ScreenPose::new(x, y, -pose.orientation + FRAC_PI_2)
    }

    pub fn to_world(&self, pose: ScreenPose) -> Pose {
        let [x, y] = self.point_to_world(pose.x, pose.y);
        Pose::new(x, y, FRAC_PI_2 - pose.angle)
    }
}
