// Stay-duration classifier
// Shared by the dashboard, the admin report and the late-exit alerts so every
// surface agrees on what counts as late

/// A stay strictly longer than 4h05m is late.
pub const LATE_THRESHOLD_MS: i64 = 14_700_000;

const HOUR_MS: i64 = 3_600_000;
const MINUTE_MS: i64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationClass {
    pub text: String,
    pub is_late: bool,
}

/// Classifies the elapsed stay between check-in and the effective exit time.
///
/// No exit yet means the visit is still active; a negative span means the exit
/// was recorded before the entry and the value is meaningless, so it is marked
/// as an error and never late.
pub fn classify_duration(entered_at: i64, exited_at: Option<i64>) -> DurationClass {
    let Some(exit) = exited_at else {
        return DurationClass {
            text: "-".to_string(),
            is_late: false,
        };
    };

    let elapsed = exit - entered_at;
    if elapsed < 0 {
        return DurationClass {
            text: "Error".to_string(),
            is_late: false,
        };
    }

    let hours = elapsed / HOUR_MS;
    let minutes = (elapsed % HOUR_MS) / MINUTE_MS;
    DurationClass {
        text: format!("{}h {}m", hours, minutes),
        is_late: elapsed > LATE_THRESHOLD_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_visit_has_placeholder_and_is_not_late() {
        let class = classify_duration(1_700_000_000_000, None);
        assert_eq!(class.text, "-");
        assert!(!class.is_late);
    }

    #[test]
    fn zero_elapsed_is_zero_hours_zero_minutes() {
        let class = classify_duration(1_700_000_000_000, Some(1_700_000_000_000));
        assert_eq!(class.text, "0h 0m");
        assert!(!class.is_late);
    }

    #[test]
    fn exit_before_entry_is_an_error_and_not_late() {
        let class = classify_duration(1_700_000_000_000, Some(1_699_999_999_000));
        assert_eq!(class.text, "Error");
        assert!(!class.is_late);
    }

    #[test]
    fn minutes_are_floored_not_rounded() {
        // 1h 59m 59s
        let class = classify_duration(0, Some(HOUR_MS + 59 * MINUTE_MS + 59_000));
        assert_eq!(class.text, "1h 59m");
    }

    #[test]
    fn lateness_is_strictly_greater_than_the_threshold() {
        let at = classify_duration(0, Some(LATE_THRESHOLD_MS));
        assert_eq!(at.text, "4h 5m");
        assert!(!at.is_late);

        let just_under = classify_duration(0, Some(LATE_THRESHOLD_MS - 1));
        assert!(!just_under.is_late);

        let just_over = classify_duration(0, Some(LATE_THRESHOLD_MS + 1));
        assert!(just_over.is_late);
    }

    #[test]
    fn four_and_a_half_hours_is_late() {
        // Entry 10:00, exit 14:30.
        let entry = 1_700_000_000_000;
        let class = classify_duration(entry, Some(entry + 4 * HOUR_MS + 30 * MINUTE_MS));
        assert_eq!(class.text, "4h 30m");
        assert!(class.is_late);
    }
}
