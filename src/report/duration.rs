const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Human readable duration such as `1 day 2 hours 5 seconds`.
///
/// Units that are zero are left out, so `0` (and anything negative, which is
/// clamped) yields an empty string.
pub fn format_duration(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let parts = [
        (total / DAY, "day"),
        (total % DAY / HOUR, "hour"),
        (total % HOUR / MINUTE, "minute"),
        (total % MINUTE, "second"),
    ];

    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| {
            if *value > 1 {
                format!("{value} {unit}s")
            } else {
                format!("{value} {unit}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Offset of an event from now: `in 2 hours`, `started 5 minutes ago` or `now`.
pub fn format_relative(seconds_from_now: i64) -> String {
    match seconds_from_now {
        s if s > 0 => format!("in {}", format_duration(s)),
        s if s < 0 => format!("started {} ago", format_duration(-s)),
        _ => "now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_empty() {
        assert_eq!(format_duration(0), "");
    }

    #[test]
    fn singular_units() {
        assert_eq!(format_duration(1), "1 second");
        assert_eq!(format_duration(61), "1 minute 1 second");
        assert_eq!(format_duration(3661), "1 hour 1 minute 1 second");
    }

    #[test]
    fn zero_units_are_omitted() {
        assert_eq!(format_duration(90000), "1 day 1 hour");
        assert_eq!(format_duration(7200), "2 hours");
        assert_eq!(format_duration(86_401), "1 day 1 second");
    }

    #[test]
    fn plurals() {
        assert_eq!(
            format_duration(2 * DAY + 3 * HOUR + 4 * MINUTE + 5),
            "2 days 3 hours 4 minutes 5 seconds"
        );
        assert_eq!(format_duration(119), "1 minute 59 seconds");
    }

    #[test]
    fn negative_is_clamped() {
        assert_eq!(format_duration(-61), "");
    }

    #[test]
    fn relative_start() {
        assert_eq!(format_relative(3600), "in 1 hour");
        assert_eq!(format_relative(-300), "started 5 minutes ago");
        assert_eq!(format_relative(0), "now");
    }
}
