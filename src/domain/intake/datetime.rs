//! Free-form date and time parsing.
//!
//! Answers are tried in a fixed priority order:
//! 1. the literal `unknown`
//! 2. `today` / `yesterday` anywhere in the answer, with an optional clock time
//! 3. a fixed list of absolute formats, first match wins
//! 4. a permissive list of additional layouts

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Clock time anywhere in a relative answer, e.g. `2:30 pm` or `14:30`.
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2}):(\d{2})\s*(am|pm)?").expect("clock time pattern is valid")
});

static TODAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btoday\b").expect("today pattern is valid"));

static YESTERDAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\byesterday\b").expect("yesterday pattern is valid"));

/// Absolute formats, tried in order. `true` marks formats carrying a time.
const ABSOLUTE_FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%d %H:%M", true),
    ("%Y-%m-%d %H:%M:%S", true),
    ("%m/%d/%Y %H:%M", true),
    ("%m/%d/%Y", false),
    ("%Y-%m-%d", false),
    ("%d/%m/%Y %H:%M", true),
    ("%d/%m/%Y", false),
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%d %I:%M%p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M%p",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%d %B %Y %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
];

/// Result of parsing a free-form date/time answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexibleDateTime {
    /// The user explicitly answered "unknown".
    Unknown,
    /// The answer resolved to a point in time.
    At(NaiveDateTime),
}

/// Parses a free-form date/time answer relative to `now`.
///
/// Returns `None` when no rule matches.
pub fn parse_flexible(raw: &str, now: NaiveDateTime) -> Option<FlexibleDateTime> {
    let input = raw.trim();
    let lower = input.to_lowercase();

    if lower == "unknown" {
        return Some(FlexibleDateTime::Unknown);
    }

    if let Some(relative) = parse_relative(&lower, now) {
        return relative.map(FlexibleDateTime::At);
    }

    parse_absolute(input)
        .or_else(|| parse_permissive(input))
        .map(FlexibleDateTime::At)
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Handles `today` / `yesterday` appearing as a word anywhere in the answer.
///
/// The outer `Option` says whether a relative keyword was present; the
/// inner one whether a clock time, if any, was in range. Without a clock
/// time the result is midnight.
fn parse_relative(lower: &str, now: NaiveDateTime) -> Option<Option<NaiveDateTime>> {
    let date = if TODAY.is_match(lower) {
        now.date()
    } else if YESTERDAY.is_match(lower) {
        now.date() - Duration::days(1)
    } else {
        return None;
    };

    if !CLOCK_TIME.is_match(lower) {
        return Some(Some(date.and_time(NaiveTime::MIN)));
    }

    Some(parse_clock_time(lower).map(|time| date.and_time(time)))
}

/// Parses the first `HH:MM` in `text`, with an optional `am`/`pm` suffix.
fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let caps = CLOCK_TIME.captures(text)?;
    let mut hours: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = caps.get(2)?.as_str().parse().ok()?;

    match caps.get(3).map(|m| m.as_str()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hours) {
                return None;
            }
            if meridiem == "pm" && hours != 12 {
                hours += 12;
            } else if meridiem == "am" && hours == 12 {
                hours = 0;
            }
        }
        None if hours > 23 => return None,
        None => {}
    }

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

fn parse_absolute(input: &str) -> Option<NaiveDateTime> {
    ABSOLUTE_FORMATS
        .iter()
        .find_map(|(format, has_time)| parse_with(input, format, *has_time))
}

fn parse_permissive(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.naive_local());
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|format| parse_with(input, format, true))
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|format| parse_with(input, format, false))
        })
}

fn parse_with(input: &str, format: &str, has_time: bool) -> Option<NaiveDateTime> {
    if has_time {
        NaiveDateTime::parse_from_str(input, format).ok()
    } else {
        NaiveDate::parse_from_str(input, format)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .and_then(|d| d.and_hms_opt(9, 15, 0))
            .unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> FlexibleDateTime {
        FlexibleDateTime::At(
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(h, min, 0))
                .unwrap(),
        )
    }

    mod keywords {
        use super::*;

        #[test]
        fn unknown_is_case_insensitive() {
            assert_eq!(parse_flexible("Unknown", now()), Some(FlexibleDateTime::Unknown));
            assert_eq!(parse_flexible(" unknown ", now()), Some(FlexibleDateTime::Unknown));
        }

        #[test]
        fn today_alone_is_midnight() {
            assert_eq!(parse_flexible("today", now()), Some(at(2024, 3, 10, 0, 0)));
        }

        #[test]
        fn today_with_pm_time() {
            assert_eq!(
                parse_flexible("today at 2:30 PM", now()),
                Some(at(2024, 3, 10, 14, 30))
            );
        }

        #[test]
        fn today_with_24_hour_time() {
            assert_eq!(
                parse_flexible("today at 14:30", now()),
                Some(at(2024, 3, 10, 14, 30))
            );
        }

        #[test]
        fn twelve_am_is_midnight_and_twelve_pm_is_noon() {
            let midnight = parse_flexible("today 12:05am", now());
            let noon = parse_flexible("today 12:05pm", now());
            assert_eq!(midnight, Some(at(2024, 3, 10, 0, 5)));
            assert_eq!(noon, Some(at(2024, 3, 10, 12, 5)));
        }

        #[test]
        fn yesterday_with_time() {
            assert_eq!(
                parse_flexible("yesterday at 9:05 am", now()),
                Some(at(2024, 3, 9, 9, 5))
            );
        }

        #[test]
        fn yesterday_crosses_month_boundary() {
            let first = NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(8, 0, 0))
                .unwrap();
            assert_eq!(parse_flexible("yesterday", first), Some(at(2024, 2, 29, 0, 0)));
        }

        #[test]
        fn relative_keyword_without_time_is_midnight() {
            assert_eq!(parse_flexible("today at teatime", now()), Some(at(2024, 3, 10, 0, 0)));
            assert_eq!(parse_flexible("earlier today", now()), Some(at(2024, 3, 10, 0, 0)));
            assert_eq!(parse_flexible("yesterday afternoon", now()), Some(at(2024, 3, 9, 0, 0)));
        }

        #[test]
        fn time_is_found_anywhere_around_the_keyword() {
            assert_eq!(
                parse_flexible("today around 2:30 pm", now()),
                Some(at(2024, 3, 10, 14, 30))
            );
            assert_eq!(parse_flexible("Today, 2:30 PM", now()), Some(at(2024, 3, 10, 14, 30)));
            assert_eq!(parse_flexible("2:30 PM today", now()), Some(at(2024, 3, 10, 14, 30)));
        }

        #[test]
        fn out_of_range_time_is_rejected() {
            assert_eq!(parse_flexible("today at 25:00", now()), None);
            assert_eq!(parse_flexible("today at 13:00 pm", now()), None);
        }

        #[test]
        fn keyword_must_be_a_whole_word() {
            assert_eq!(parse_flexible("todayish", now()), None);
        }
    }

    mod absolute {
        use super::*;

        #[test]
        fn iso_with_minutes() {
            assert_eq!(
                parse_flexible("2024-01-15 14:30", now()),
                Some(at(2024, 1, 15, 14, 30))
            );
        }

        #[test]
        fn iso_with_seconds() {
            let parsed = parse_flexible("2024-01-15 14:30:45", now());
            match parsed {
                Some(FlexibleDateTime::At(dt)) => assert_eq!(dt.second(), 45),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn us_date_wins_over_day_first() {
            assert_eq!(parse_flexible("02/03/2024", now()), Some(at(2024, 2, 3, 0, 0)));
        }

        #[test]
        fn day_first_used_when_month_first_fails() {
            assert_eq!(
                parse_flexible("25/12/2023 08:00", now()),
                Some(at(2023, 12, 25, 8, 0))
            );
            assert_eq!(parse_flexible("25/12/2023", now()), Some(at(2023, 12, 25, 0, 0)));
        }

        #[test]
        fn iso_date_only() {
            assert_eq!(parse_flexible("2024-01-15", now()), Some(at(2024, 1, 15, 0, 0)));
        }
    }

    mod permissive {
        use super::*;

        #[test]
        fn rfc3339() {
            assert_eq!(
                parse_flexible("2024-01-15T14:30:00+00:00", now()),
                Some(at(2024, 1, 15, 14, 30))
            );
        }

        #[test]
        fn month_name() {
            assert_eq!(
                parse_flexible("January 15, 2024", now()),
                Some(at(2024, 1, 15, 0, 0))
            );
        }

        #[test]
        fn twelve_hour_clock_on_absolute_date() {
            assert_eq!(
                parse_flexible("2024-01-15 2:30 PM", now()),
                Some(at(2024, 1, 15, 14, 30))
            );
        }

        #[test]
        fn nonsense_is_rejected() {
            assert_eq!(parse_flexible("banana", now()), None);
            assert_eq!(parse_flexible("", now()), None);
        }
    }

    #[test]
    fn iso_date_is_strict() {
        assert_eq!(
            parse_iso_date("2024-06-30"),
            NaiveDate::from_ymd_opt(2024, 6, 30)
        );
        assert_eq!(parse_iso_date("06/30/2024"), None);
        assert_eq!(parse_iso_date("2024-02-30"), None);
    }
}
