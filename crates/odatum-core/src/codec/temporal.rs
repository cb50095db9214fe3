//! Parse/format helpers for the temporal primitives.
//!
//! Wire forms are the ISO shapes OData uses: `YYYY-MM-DD` dates,
//! `HH:MM:SS[.f]` times, RFC 3339 date-times, and day/time ISO 8601
//! durations. The V2-era `/Date(ms)/` form is accepted on input only.

use time::{
    Date, Duration, OffsetDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, DATE_FORMAT).ok()
}

pub(crate) fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

pub(crate) fn parse_time(raw: &str) -> Option<Time> {
    let (clock, fraction) = match raw.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (raw, None),
    };

    let mut parts = clock.split(':');
    let hour = parts.next()?.parse::<u8>().ok()?;
    let minute = parts.next()?.parse::<u8>().ok()?;
    let second = match parts.next() {
        Some(second) => second.parse::<u8>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let nanosecond = match fraction {
        Some(digits) if !digits.is_empty() && digits.len() <= 9 => {
            let scale = 10u32.pow(9 - u32::try_from(digits.len()).ok()?);
            digits.parse::<u32>().ok()? * scale
        }
        Some(_) => return None,
        None => 0,
    };

    Time::from_hms_nano(hour, minute, second, nanosecond).ok()
}

pub(crate) fn format_time(time: Time) -> String {
    let base = format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    );

    match time.nanosecond() {
        0 => base,
        nanos => {
            let fraction = format!("{nanos:09}");
            format!("{base}.{}", fraction.trim_end_matches('0'))
        }
    }
}

pub(crate) fn parse_datetime(raw: &str) -> Option<OffsetDateTime> {
    if let Some(ms) = parse_legacy_ticks(raw) {
        return OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok();
    }

    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

pub(crate) fn format_datetime(datetime: OffsetDateTime) -> String {
    datetime
        .format(&Rfc3339)
        .unwrap_or_else(|_| datetime.to_string())
}

// "/Date(1234567890000)/", optionally with a "+0060"-style minute offset
// appended; the offset only shifts the display, so it is dropped here.
fn parse_legacy_ticks(raw: &str) -> Option<i64> {
    let inner = raw.strip_prefix("/Date(")?.strip_suffix(")/")?;
    let ms = match inner.find(['+', '-']) {
        Some(at) if at > 0 => &inner[..at],
        _ => inner,
    };

    ms.parse::<i64>().ok()
}

pub(crate) fn parse_duration(raw: &str) -> Option<Duration> {
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let rest = rest.strip_prefix('P')?;

    let (day_part, time_part) = match rest.split_once('T') {
        Some((days, time)) => (days, Some(time)),
        None => (rest, None),
    };

    let mut total = Duration::ZERO;

    if !day_part.is_empty() {
        let days = day_part.strip_suffix('D')?.parse::<i64>().ok()?;
        total += Duration::days(days);
    }

    if let Some(time_part) = time_part {
        if time_part.is_empty() {
            return None;
        }

        let mut rest = time_part;
        while !rest.is_empty() {
            let unit_at = rest.find(|c: char| c.is_ascii_alphabetic())?;
            let number = &rest[..unit_at];
            let unit = rest.as_bytes()[unit_at];
            rest = &rest[unit_at + 1..];

            match unit {
                b'H' => total += Duration::hours(number.parse::<i64>().ok()?),
                b'M' => total += Duration::minutes(number.parse::<i64>().ok()?),
                b'S' => total += Duration::seconds_f64(number.parse::<f64>().ok()?),
                _ => return None,
            }
        }
    } else if day_part.is_empty() {
        // a bare "P" carries nothing
        return None;
    }

    Some(if negative { -total } else { total })
}

pub(crate) fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "PT0S".to_string();
    }

    let negative = duration.is_negative();
    let duration = duration.abs();

    let days = duration.whole_days();
    let hours = duration.whole_hours() % 24;
    let minutes = duration.whole_minutes() % 60;
    let seconds = duration.whole_seconds() % 60;
    let nanos = duration.subsec_nanoseconds().unsigned_abs();

    let mut out = String::from(if negative { "-P" } else { "P" });

    if days != 0 {
        out.push_str(&format!("{days}D"));
    }

    if hours != 0 || minutes != 0 || seconds != 0 || nanos != 0 {
        out.push('T');
        if hours != 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes != 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if seconds != 0 || nanos != 0 {
            if nanos == 0 {
                out.push_str(&format!("{seconds}S"));
            } else {
                let fraction = format!("{nanos:09}");
                out.push_str(&format!("{seconds}.{}S", fraction.trim_end_matches('0')));
            }
        }
    }

    out
}
