pub mod field;
pub mod history;
pub mod referee;

pub use field::{FieldRenderer, VisionUpdate};
pub use history::{HistoryRenderer, HistoryTemplates};
pub use referee::{ConsolePhase, ControlStates, RefereeRenderer};

/// `MM:SS` clock text, with a leading `-` once the clock has run out
pub fn format_timer(secs: f64) -> String {
    let total = secs.round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{sign}{:02}:{:02}", total / 60, total % 60)
}

/// Penalty progress in percent of the default penalty, capped at 100
pub fn penalty_bar_width(remaining: Option<f64>, default_penalty: f64) -> f64 {
    match remaining {
        None => 0.0,
        Some(remaining) if default_penalty > 0.0 => {
            (remaining * 100.0 / default_penalty).clamp(0.0, 100.0)
        }
        Some(remaining) if remaining > 0.0 => 100.0,
        Some(_) => 0.0,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(0.0), "00:00");
        assert_eq!(format_timer(59.0), "00:59");
        assert_eq!(format_timer(300.0), "05:00");
        assert_eq!(format_timer(61.4), "01:01");
        assert_eq!(format_timer(-7.0), "-00:07");
        assert_eq!(format_timer(-75.0), "-01:15");
    }

    #[test]
    fn test_penalty_bar_width() {
        assert_eq!(penalty_bar_width(None, 5.0), 0.0);
        assert_eq!(penalty_bar_width(Some(2.5), 5.0), 50.0);
        assert_eq!(penalty_bar_width(Some(5.0), 5.0), 100.0);
        assert_eq!(penalty_bar_width(Some(12.0), 5.0), 100.0);
        assert_eq!(penalty_bar_width(Some(1.0), 10.0), 10.0);
        assert_eq!(penalty_bar_width(Some(3.0), 0.0), 100.0);
    }
}
