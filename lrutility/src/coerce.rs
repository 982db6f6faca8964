//! Turns raw attribute text into typed values.
//!
//! Every function here is total. A value that can't be read becomes the
//! caller's default (or `None`), and we log it at `debug` so a noisy sidecar
//! can still be tracked down.
//!
//! Empty text always counts as missing. `"0"` is a real zero.

use chrono::{FixedOffset, NaiveDate};
use lrutility_types::record::Timestamp;
use winnow::{
    ModalResult, Parser as _,
    combinator::{alt, opt, preceded},
    token::{one_of, take_while},
};

/// Returns the text if there's anything in it.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|text| !text.trim().is_empty())
}

/// Keeps text as written, unless it's blank.
pub fn parse_text(raw: Option<&str>) -> Option<String> {
    present(raw).map(str::to_owned)
}

/// Parses an integer, or `None` if it's missing or malformed.
pub fn parse_opt_int(raw: Option<&str>) -> Option<i64> {
    let text = present(raw)?;
    text.trim()
        .parse::<i64>()
        .inspect_err(|e| log::debug!("Couldn't read `{text}` as an integer. err: {e}"))
        .ok()
}

/// Parses an integer, falling back to `default`.
pub fn parse_int(raw: Option<&str>, default: i64) -> i64 {
    parse_opt_int(raw).unwrap_or(default)
}

/// Parses a float, falling back to `default`.
pub fn parse_float(raw: Option<&str>, default: f64) -> f64 {
    let Some(text) = present(raw) else {
        return default;
    };

    text.trim()
        .parse::<f64>()
        .inspect_err(|e| log::debug!("Couldn't read `{text}` as a real. err: {e}"))
        .unwrap_or(default)
}

/// Parses a boolean.
///
/// Only `true` (in any case) is `true`. Anything else, including a missing
/// value, is `default`.
pub fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(text) if text.trim().eq_ignore_ascii_case("true") => true,
        _ => default,
    }
}

/// Parses a boolean that has no default.
///
/// Missing or blank is `None`. Otherwise, it's whether the text says `true`.
pub fn parse_opt_bool(raw: Option<&str>) -> Option<bool> {
    present(raw).map(|text| parse_bool(Some(text), false))
}

/// Parses a rational like `1/250` or a plain decimal like `2.8` into a float.
///
/// A zero denominator, or either side failing to parse, gives `None`.
pub fn parse_rational(raw: Option<&str>) -> Option<f64> {
    let text = present(raw)?;

    let value = match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = numerator.trim().parse::<f64>().ok();
            let denominator = denominator.trim().parse::<f64>().ok();

            match (numerator, denominator) {
                (Some(_), Some(d)) if d == 0.0 => {
                    log::debug!("Rational `{text}` has a zero denominator.");
                    None
                }
                (Some(n), Some(d)) => Some(n / d),
                _ => None,
            }
        }
        None => text.trim().parse::<f64>().ok(),
    };

    if value.is_none() {
        log::debug!("Couldn't read `{text}` as a rational.");
    }

    value
}

/// Parses an ISO 8601 date-time, as found in XMP date fields.
///
/// Accepted forms look like `2024-01-01`, `2024-01-01T12:00`,
/// `2024-01-01T12:00:00.25` or `2024-01-01T12:00:00+09:00`. A trailing `Z`
/// means `+00:00`. A date with no zone stays zone-less.
pub fn parse_timestamp(raw: Option<&str>) -> Option<Timestamp> {
    let text = present(raw)?.trim();

    let parts = raw_timestamp
        .parse(text)
        .inspect_err(|e| log::debug!("Couldn't read `{text}` as a date. err: {e}"))
        .ok()?;

    let timestamp = parts.build();
    if timestamp.is_none() {
        log::debug!("Date `{text}` is out of range.");
    }
    timestamp
}

/// The pieces of a date-time, before range checks.
struct RawTimestamp {
    year: i32,
    month: u32,
    day: u32,

    /// `(hour, minute, second, nanosecond)`
    time: Option<(u32, u32, u32, u32)>,

    /// Seconds east of UTC.
    offset: Option<i32>,
}

impl RawTimestamp {
    /// Lets `chrono` check each field's range.
    fn build(self) -> Option<Timestamp> {
        let (hour, minute, second, nano) = self.time.unwrap_or_default();
        let local = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_nano_opt(hour, minute, second, nano)?;

        let offset = match self.offset {
            Some(seconds) => Some(FixedOffset::east_opt(seconds)?),
            None => None,
        };

        Some(Timestamp { local, offset })
    }
}

fn raw_timestamp(input: &mut &str) -> ModalResult<RawTimestamp> {
    let (year, _, month, _, day) = (year, '-', two_digits, '-', two_digits).parse_next(input)?;

    let time = opt(preceded(one_of(['T', 't', ' ']), time)).parse_next(input)?;

    // a zone only makes sense after a time
    let offset = match time {
        Some(_) => opt(zone).parse_next(input)?,
        None => None,
    };

    Ok(RawTimestamp {
        year,
        month,
        day,
        time,
        offset,
    })
}

fn year(input: &mut &str) -> ModalResult<i32> {
    take_while(4, '0'..='9')
        .try_map(str::parse::<i32>)
        .parse_next(input)
}

fn two_digits(input: &mut &str) -> ModalResult<u32> {
    take_while(2, '0'..='9')
        .try_map(str::parse::<u32>)
        .parse_next(input)
}

/// `HH:MM[:SS[.fff]]`
fn time(input: &mut &str) -> ModalResult<(u32, u32, u32, u32)> {
    let (hour, _, minute) = (two_digits, ':', two_digits).parse_next(input)?;
    let seconds = opt(preceded(':', (two_digits, opt(fraction)))).parse_next(input)?;

    let (second, nano) = match seconds {
        Some((second, nano)) => (second, nano.unwrap_or(0)),
        None => (0, 0),
    };

    Ok((hour, minute, second, nano))
}

/// A decimal fraction of a second, as nanoseconds.
///
/// Digits past nanosecond precision are dropped.
fn fraction(input: &mut &str) -> ModalResult<u32> {
    preceded(one_of(['.', ',']), take_while(1.., '0'..='9'))
        .map(|digits: &str| {
            digits
                .chars()
                .chain(core::iter::repeat('0'))
                .take(9)
                .fold(0_u32, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0))
        })
        .parse_next(input)
}

/// `Z`, or `+HH:MM` / `-HHMM`, as seconds east of UTC.
fn zone(input: &mut &str) -> ModalResult<i32> {
    alt((
        one_of(['Z', 'z']).value(0),
        (one_of(['+', '-']), two_digits, opt(':'), two_digits).map(
            |(sign, hours, _, minutes): (char, u32, _, u32)| {
                let seconds = (hours * 3600 + minutes * 60) as i32;
                if sign == '-' { -seconds } else { seconds }
            },
        ),
    ))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike as _, FixedOffset, Timelike as _};

    use super::{
        parse_bool, parse_float, parse_int, parse_opt_bool, parse_opt_int, parse_rational,
        parse_text, parse_timestamp,
    };

    #[test]
    fn rationals() {
        crate::util::logger();

        assert_eq!(parse_rational(Some("1/2")), Some(0.5));
        assert_eq!(parse_rational(Some("100/10")), Some(10.0));
        assert_eq!(parse_rational(Some("-7/10")), Some(-0.7));

        // plain decimals are fine too
        assert_eq!(parse_rational(Some("3.14")), Some(3.14));
        assert_eq!(parse_rational(Some("42")), Some(42.0));
        assert_eq!(parse_rational(Some("+0.35")), Some(0.35));
    }

    #[test]
    fn rational_zero_denominator_is_none() {
        crate::util::logger();

        assert_eq!(parse_rational(Some("1/0")), None);
        assert_eq!(parse_rational(Some("0/0")), None);
        assert_eq!(parse_rational(Some("5/0.0")), None);
    }

    #[test]
    fn malformed_rationals_are_none() {
        crate::util::logger();

        assert_eq!(parse_rational(None), None);
        assert_eq!(parse_rational(Some("")), None);
        assert_eq!(parse_rational(Some("invalid")), None);
        assert_eq!(parse_rational(Some("1/")), None);
        assert_eq!(parse_rational(Some("/2")), None);
        assert_eq!(parse_rational(Some("a/b")), None);
        assert_eq!(parse_rational(Some("1/2/3")), None);
    }

    #[test]
    fn timestamps_with_utc_marker() {
        crate::util::logger();

        let ts = parse_timestamp(Some("2024-01-01T12:00:00Z")).expect("should parse");
        assert_eq!(ts.local.year(), 2024);
        assert_eq!(ts.local.month(), 1);
        assert_eq!(ts.local.day(), 1);
        assert_eq!(ts.local.hour(), 12);
        assert_eq!(ts.offset, FixedOffset::east_opt(0));
    }

    #[test]
    fn timestamps_in_lightroom_shapes() {
        crate::util::logger();

        // zoned, as written by Lightroom for `xmp:ModifyDate`
        let ts = parse_timestamp(Some("2023-11-05T09:41:27+09:00")).expect("zoned");
        assert_eq!(ts.offset, FixedOffset::east_opt(9 * 3600));
        assert_eq!(ts.local.minute(), 41);

        // negative offset without a colon
        let ts = parse_timestamp(Some("2023-11-05T09:41:27-0530")).expect("compact zone");
        assert_eq!(ts.offset, FixedOffset::west_opt(5 * 3600 + 30 * 60));

        // fractional seconds with no zone, as in `exif:DateTimeOriginal`
        let ts = parse_timestamp(Some("2023-11-05T09:41:27.52")).expect("fraction");
        assert_eq!(ts.offset, None);
        assert_eq!(ts.local.nanosecond(), 520_000_000);

        // minutes only
        let ts = parse_timestamp(Some("2023-11-05T09:41")).expect("no seconds");
        assert_eq!(ts.local.second(), 0);

        // date only
        let ts = parse_timestamp(Some("2023-11-05")).expect("date only");
        assert_eq!((ts.local.hour(), ts.local.minute()), (0, 0));

        // space separator
        assert!(parse_timestamp(Some("2023-11-05 09:41:27")).is_some());
    }

    #[test]
    fn bad_timestamps_are_none() {
        crate::util::logger();

        assert_eq!(parse_timestamp(None), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(Some("invalid")), None);
        assert_eq!(parse_timestamp(Some("2024-13-01T00:00:00")), None);
        assert_eq!(parse_timestamp(Some("2024-02-30")), None);
        assert_eq!(parse_timestamp(Some("2024-01-01T25:00:00")), None);
        assert_eq!(parse_timestamp(Some("2024-01-01T12:00:00Zjunk")), None);
        assert_eq!(parse_timestamp(Some("2024-01-01Z")), None);
    }

    #[test]
    fn integers_fall_back_to_their_default() {
        crate::util::logger();

        assert_eq!(parse_int(Some("6"), 1), 6);
        assert_eq!(parse_int(Some("+25"), 0), 25);
        assert_eq!(parse_int(Some("-1"), 0), -1);
        assert_eq!(parse_int(None, 1), 1);
        assert_eq!(parse_int(Some(""), 1), 1);
        assert_eq!(parse_int(Some("six"), 1), 1);
        assert_eq!(parse_int(Some("1.5"), 7), 7);
    }

    /// An empty value is missing, but a written zero is a real zero.
    #[test]
    fn empty_is_missing_but_zero_is_zero() {
        crate::util::logger();

        assert_eq!(parse_opt_int(Some("")), None);
        assert_eq!(parse_opt_int(Some("   ")), None);
        assert_eq!(parse_opt_int(Some("0")), Some(0));
        assert_eq!(parse_opt_int(None), None);
        assert_eq!(parse_int(Some("0"), 1), 0);

        assert_eq!(parse_text(Some("")), None);
        assert_eq!(parse_text(Some("ILCE-7M4")), Some("ILCE-7M4".into()));
    }

    #[test]
    fn floats_fall_back_to_their_default() {
        crate::util::logger();

        assert_eq!(parse_float(Some("0.25"), 0.0), 0.25);
        assert_eq!(parse_float(None, 1.0), 1.0);
        assert_eq!(parse_float(Some("wide"), 1.0), 1.0);
    }

    #[test]
    fn booleans_only_match_true() {
        crate::util::logger();

        assert!(parse_bool(Some("True"), false));
        assert!(parse_bool(Some("true"), false));
        assert!(parse_bool(Some("TRUE"), false));
        assert!(!parse_bool(Some("False"), false));
        assert!(!parse_bool(Some("1"), false));
        assert!(!parse_bool(None, false));
        assert!(parse_bool(None, true));
        assert!(parse_bool(Some("yes"), true));

        assert_eq!(parse_opt_bool(None), None);
        assert_eq!(parse_opt_bool(Some("")), None);
        assert_eq!(parse_opt_bool(Some("True")), Some(true));
        assert_eq!(parse_opt_bool(Some("False")), Some(false));
        assert_eq!(parse_opt_bool(Some("maybe")), Some(false));
    }
}
