//! Field detections, as published by the simulator (`get_state`) and the
//! camera (`get_video`).

use crate::{
    geometry::{FieldPoint, Pose},
    marker::MarkerId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type RawLeds = [f64; 3];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionState {
    /// Markers seen on the field, `None` for a known marker that is not detected
    pub markers: BTreeMap<MarkerId, Option<Pose>>,
    pub ball: Option<FieldPoint>,
    /// Raw LED intensities, only published by the simulator
    pub leds: BTreeMap<MarkerId, RawLeds>,
    pub simulated: bool,
}

impl VisionState {
    pub fn pose(&self, marker: MarkerId) -> Option<Pose> {
        self.markers.get(&marker).copied().flatten()
    }
}

/// A camera frame. The image itself is not used by the console.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoFrame {
    pub running: bool,
    pub fps: Option<f64>,
    pub detection: VisionState,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::TeamColor;

    #[test]
    fn test_decode_state() {
        let state: VisionState = serde_json::from_str(
            r#"{
                "markers": {
                    "green1": {"position": [0.1, -0.2], "orientation": 1.5},
                    "blue2": null
                },
                "ball": [0.0, 0.3],
                "leds": {"green1": [255, 0, 12]},
                "simulated": true
            }"#,
        )
        .unwrap();

        let green1 = MarkerId::new(TeamColor::Green, 1);
        assert_eq!(state.pose(green1), Some(Pose::new(0.1, -0.2, 1.5)));
        assert_eq!(state.pose(MarkerId::new(TeamColor::Blue, 2)), None);
        assert_eq!(state.pose(MarkerId::new(TeamColor::Blue, 1)), None);
        assert_eq!(state.ball, Some([0.0, 0.3]));
        assert_eq!(state.leds[&green1], [255.0, 0.0, 12.0]);
        assert!(state.simulated);
    }

    #[test]
    fn test_decode_video() {
        let frame: VideoFrame = serde_json::from_str(
            r#"{"running": true, "image": "...", "detection": {"ball": null}}"#,
        )
        .unwrap();
        assert!(frame.running);
        assert_eq!(frame.detection, VisionState::default());
    }
}
