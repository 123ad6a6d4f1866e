use std::time::Duration;

pub const FPS_SLIDER_MIN: u32 = 10;
pub const FPS_SLIDER_STEP: u32 = 5;
/// Slider position meaning "no limit"
pub const FPS_SLIDER_MAX: u32 = 65;
/// Redraw rate used when the limit is lifted
pub const UNLIMITED_FPS: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpsLimit {
    Capped(u32),
    Unlimited,
}

impl Default for FpsLimit {
    fn default() -> Self {
        Self::Capped(30)
    }
}

impl FpsLimit {
    /// Snaps a slider value to the slider's range and steps
    pub fn from_slider(value: u32) -> Self {
        let value = value.clamp(FPS_SLIDER_MIN, FPS_SLIDER_MAX);
        let value = FPS_SLIDER_MIN
            + (value - FPS_SLIDER_MIN + FPS_SLIDER_STEP / 2) / FPS_SLIDER_STEP * FPS_SLIDER_STEP;
        if value >= FPS_SLIDER_MAX {
            Self::Unlimited
        } else {
            Self::Capped(value)
        }
    }

    pub fn slider_value(self) -> u32 {
        match self {
            Self::Capped(fps) => fps,
            Self::Unlimited => FPS_SLIDER_MAX,
        }
    }

    /// Time between two redraws
    pub fn period(self) -> Duration {
        let fps = match self {
            Self::Capped(fps) => fps.max(1),
            Self::Unlimited => UNLIMITED_FPS,
        };
        Duration::from_nanos(1_000_000_000 / u64::from(fps))
    }

    pub fn label(self) -> String {
        match self {
            Self::Capped(fps) => format!("FPS Limit : {fps}"),
            Self::Unlimited => "FPS Limit : unlimited".to_string(),
        }
    }
}

/// Field view options the referee can toggle during a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Axis lines from the field center
    pub landmark: bool,
    /// Dashed circle around the ball
    pub timed_circle: bool,
    pub fps_limit: FpsLimit,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            landmark: true,
            timed_circle: false,
            fps_limit: FpsLimit::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slider() {
        assert_eq!(FpsLimit::from_slider(30), FpsLimit::Capped(30));
        assert_eq!(FpsLimit::from_slider(0), FpsLimit::Capped(10));
        assert_eq!(FpsLimit::from_slider(33), FpsLimit::Capped(35));
        assert_eq!(FpsLimit::from_slider(31), FpsLimit::Capped(30));
        assert_eq!(FpsLimit::from_slider(60), FpsLimit::Capped(60));
        assert_eq!(FpsLimit::from_slider(65), FpsLimit::Unlimited);
        assert_eq!(FpsLimit::from_slider(200), FpsLimit::Unlimited);
        assert_eq!(FpsLimit::Unlimited.slider_value(), 65);
    }

    #[test]
    fn test_period() {
        assert_eq!(FpsLimit::Capped(10).period(), Duration::from_millis(100));
        assert_eq!(FpsLimit::Unlimited.period(), Duration::from_nanos(4_166_666));
        assert_eq!(FpsLimit::Capped(30).label(), "FPS Limit : 30");
        assert_eq!(FpsLimit::Unlimited.label(), "FPS Limit : unlimited");
    }

    #[test]
    fn test_defaults() {
        let settings = DisplaySettings::default();
        assert!(settings.landmark);
        assert!(!settings.timed_circle);
        assert_eq!(settings.fps_limit, FpsLimit::Capped(30));
    }
}
