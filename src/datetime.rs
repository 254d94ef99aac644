//! TOML date-time values.
//!
//! TOML distinguishes four date-time forms, and the distinction is part of
//! the value: an offset date-time pins an absolute instant, the three local
//! forms do not.
//!
//! - **Offset date-time**: `1979-05-27T07:32:00Z`, `1979-05-27T00:32:00-07:00`
//! - **Local date-time**: `1979-05-27T07:32:00`
//! - **Local date**: `1979-05-27`
//! - **Local time**: `07:32:00`
//!
//! [`TomlDateTime`] stores calendar fields plus an optional UTC offset in
//! minutes; an absent offset marks the value as local. Two offset values
//! compare by their normalized instant (`07:32:00Z == 08:32:00+01:00`);
//! local values compare field-wise; comparing across forms is undefined
//! ([`PartialOrd`] yields `None`) and never equal.
//!
//! ## Examples
//!
//! ```rust
//! use tomldoc::TomlDateTime;
//!
//! let utc: TomlDateTime = "1979-05-27T07:32:00Z".parse().unwrap();
//! let shifted: TomlDateTime = "1979-05-27T08:32:00+01:00".parse().unwrap();
//! let local: TomlDateTime = "1979-05-27T07:32:00".parse().unwrap();
//!
//! assert_eq!(utc, shifted);
//! assert_ne!(utc, local);
//! assert!(local.partial_cmp(&utc).is_none());
//! ```

use crate::{Error, Result};
use chrono::{
    DateTime as ChronoDateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A calendar date (year, month, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A time of day with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

/// The logical form of a [`TomlDateTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeForm {
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
}

/// A TOML date-time in any of the four logical forms.
///
/// Constructed from text via [`FromStr`], from date-bearing chrono types via
/// `TryFrom` (chrono years can fall outside TOML's 0-9999 range), or
/// field-wise via the checked constructors. The checked constructors return
/// `None` for out-of-range fields (month 13, day 31 in April, hour 24, an
/// offset beyond ±24h); validation is delegated to chrono's calendar.
///
/// # Examples
///
/// ```rust
/// use tomldoc::TomlDateTime;
///
/// let date = TomlDateTime::local_date(2024, 1, 2).unwrap();
/// assert_eq!(date.to_string(), "2024-01-02");
/// assert!(TomlDateTime::local_date(2024, 2, 30).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TomlDateTime {
    date: Option<Date>,
    time: Option<Time>,
    /// Minutes east of UTC; `None` marks a local value.
    offset: Option<i32>,
}

impl TomlDateTime {
    /// Creates a local date, or `None` if the fields do not name a real
    /// calendar day.
    #[must_use]
    pub fn local_date(year: u16, month: u8, day: u8) -> Option<Self> {
        NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?;
        Some(TomlDateTime {
            date: Some(Date { year, month, day }),
            time: None,
            offset: None,
        })
    }

    /// Creates a local time, or `None` for out-of-range fields.
    #[must_use]
    pub fn local_time(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Option<Self> {
        NaiveTime::from_hms_nano_opt(
            u32::from(hour),
            u32::from(minute),
            u32::from(second),
            nanosecond,
        )?;
        Some(TomlDateTime {
            date: None,
            time: Some(Time {
                hour,
                minute,
                second,
                nanosecond,
            }),
            offset: None,
        })
    }

    /// Creates a local date-time from a date part and a time part.
    #[must_use]
    pub fn local_datetime(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> Option<Self> {
        let date = Self::local_date(year, month, day)?;
        let time = Self::local_time(hour, minute, second, nanosecond)?;
        Some(TomlDateTime {
            date: date.date,
            time: time.time,
            offset: None,
        })
    }

    /// Creates an offset date-time; `offset_minutes` is minutes east of UTC
    /// and must stay within ±24 hours.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn offset_datetime(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
        offset_minutes: i32,
    ) -> Option<Self> {
        FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
        let local = Self::local_datetime(year, month, day, hour, minute, second, nanosecond)?;
        Some(TomlDateTime {
            date: local.date,
            time: local.time,
            offset: Some(offset_minutes),
        })
    }

    /// The logical form of this value.
    #[must_use]
    pub fn form(&self) -> DateTimeForm {
        match (self.date, self.time, self.offset) {
            (Some(_), Some(_), Some(_)) => DateTimeForm::OffsetDateTime,
            (Some(_), Some(_), None) => DateTimeForm::LocalDateTime,
            (Some(_), None, _) => DateTimeForm::LocalDate,
            (None, _, _) => DateTimeForm::LocalTime,
        }
    }

    /// The date part, if this form has one.
    #[inline]
    #[must_use]
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    /// The time part, if this form has one.
    #[inline]
    #[must_use]
    pub fn time(&self) -> Option<Time> {
        self.time
    }

    /// The UTC offset in minutes, if this is an offset date-time.
    #[inline]
    #[must_use]
    pub fn offset_minutes(&self) -> Option<i32> {
        self.offset
    }

    /// Converts an offset date-time to a chrono instant. Local forms return
    /// `None` since they name no absolute point in time.
    #[must_use]
    pub fn to_chrono(&self) -> Option<ChronoDateTime<FixedOffset>> {
        let (date, time, offset) = (self.date?, self.time?, self.offset?);
        let nd = NaiveDate::from_ymd_opt(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
        )?;
        let nt = NaiveTime::from_hms_nano_opt(
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second),
            time.nanosecond,
        )?;
        let zone = FixedOffset::east_opt(offset.checked_mul(60)?)?;
        zone.from_local_datetime(&nd.and_time(nt)).single()
    }

    /// Parses the textual forms accepted by the TOML grammar. Used by the
    /// tokenizer, which prefixes position information on failure.
    pub(crate) fn parse_toml(s: &str) -> std::result::Result<Self, String> {
        let bytes = s.as_bytes();

        // Local time stands alone when the run starts with `HH:`.
        if bytes.len() >= 3 && bytes[2] == b':' {
            let (time, rest) = parse_time_part(s)?;
            if !rest.is_empty() {
                return Err(format!("trailing characters `{rest}` after time"));
            }
            return Self::local_time(time.hour, time.minute, time.second, time.nanosecond)
                .ok_or_else(|| format!("time `{s}` is out of range"));
        }

        let (date, rest) = parse_date_part(s)?;
        if rest.is_empty() {
            return Self::local_date(date.year, date.month, date.day)
                .ok_or_else(|| format!("date `{s}` does not exist in the calendar"));
        }

        let sep = rest.as_bytes()[0];
        if sep != b'T' && sep != b't' && sep != b' ' {
            return Err(format!("expected `T` or space before time, found `{}`", sep as char));
        }
        let (time, rest) = parse_time_part(&rest[1..])?;

        let offset = if rest.is_empty() {
            None
        } else {
            Some(parse_offset_part(rest)?)
        };

        let built = match offset {
            None => Self::local_datetime(
                date.year,
                date.month,
                date.day,
                time.hour,
                time.minute,
                time.second,
                time.nanosecond,
            ),
            Some(minutes) => Self::offset_datetime(
                date.year,
                date.month,
                date.day,
                time.hour,
                time.minute,
                time.second,
                time.nanosecond,
                minutes,
            ),
        };
        built.ok_or_else(|| format!("date-time `{s}` is out of range"))
    }
}

fn two_digits(s: &str) -> std::result::Result<(u8, &str), String> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
        return Err("expected two digits".to_string());
    }
    Ok(((bytes[0] - b'0') * 10 + (bytes[1] - b'0'), &s[2..]))
}

fn parse_date_part(s: &str) -> std::result::Result<(Date, &str), String> {
    let bytes = s.as_bytes();
    if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return Err("expected date as YYYY-MM-DD".to_string());
    }
    let year: u16 = s[..4].parse().map_err(|_| "invalid year".to_string())?;
    let rest = s[4..]
        .strip_prefix('-')
        .ok_or_else(|| "expected `-` after year".to_string())?;
    let (month, rest) = two_digits(rest)?;
    let rest = rest
        .strip_prefix('-')
        .ok_or_else(|| "expected `-` after month".to_string())?;
    let (day, rest) = two_digits(rest)?;
    Ok((Date { year, month, day }, rest))
}

fn parse_time_part(s: &str) -> std::result::Result<(Time, &str), String> {
    let (hour, rest) = two_digits(s)?;
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| "expected `:` after hour".to_string())?;
    let (minute, rest) = two_digits(rest)?;
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| "expected `:` after minute".to_string())?;
    let (second, mut rest) = two_digits(rest)?;

    let mut nanosecond = 0u32;
    if let Some(frac) = rest.strip_prefix('.') {
        let digits: usize = frac.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err("expected digits after `.` in time".to_string());
        }
        // Nanosecond precision; further digits are truncated.
        let mut value = 0u32;
        for (i, b) in frac.as_bytes()[..digits].iter().enumerate() {
            if i < 9 {
                value = value * 10 + u32::from(b - b'0');
            }
        }
        for _ in digits.min(9)..9 {
            value *= 10;
        }
        nanosecond = value;
        rest = &frac[digits..];
    }

    Ok((
        Time {
            hour,
            minute,
            second,
            nanosecond,
        },
        rest,
    ))
}

fn parse_offset_part(s: &str) -> std::result::Result<i32, String> {
    if s == "Z" || s == "z" {
        return Ok(0);
    }
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1i32, &s[1..]),
        Some(b'-') => (-1i32, &s[1..]),
        _ => return Err(format!("invalid UTC offset `{s}`")),
    };
    let (hours, rest) = two_digits(rest)?;
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| "expected `:` in UTC offset".to_string())?;
    let (minutes, rest) = two_digits(rest)?;
    if !rest.is_empty() {
        return Err(format!("trailing characters `{rest}` after offset"));
    }
    if hours > 23 || minutes > 59 {
        return Err(format!("UTC offset `{s}` is out of range"));
    }
    Ok(sign * (i32::from(hours) * 60 + i32::from(minutes)))
}

impl FromStr for TomlDateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_toml(s).map_err(Error::custom)
    }
}

impl fmt::Display for TomlDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(d) = self.date {
            write!(f, "{:04}-{:02}-{:02}", d.year, d.month, d.day)?;
            if self.time.is_some() {
                write!(f, "T")?;
            }
        }
        if let Some(t) = self.time {
            write!(f, "{:02}:{:02}:{:02}", t.hour, t.minute, t.second)?;
            if t.nanosecond > 0 {
                let frac = format!("{:09}", t.nanosecond);
                write!(f, ".{}", frac.trim_end_matches('0'))?;
            }
        }
        if let Some(minutes) = self.offset {
            if minutes == 0 {
                write!(f, "Z")?;
            } else {
                let sign = if minutes < 0 { '-' } else { '+' };
                let abs = minutes.abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)?;
            }
        }
        Ok(())
    }
}

impl PartialEq for TomlDateTime {
    fn eq(&self, other: &Self) -> bool {
        if self.form() != other.form() {
            return false;
        }
        match (self.to_chrono(), other.to_chrono()) {
            (Some(a), Some(b)) => a == b,
            _ => self.date == other.date && self.time == other.time,
        }
    }
}

impl PartialOrd for TomlDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.form() != other.form() {
            return None;
        }
        if let (Some(a), Some(b)) = (self.to_chrono(), other.to_chrono()) {
            return a.partial_cmp(&b);
        }
        (self.date, self.time).partial_cmp(&(other.date, other.time))
    }
}

fn checked_date(d: NaiveDate) -> Result<Date> {
    let year = u16::try_from(d.year())
        .ok()
        .filter(|&y| y <= 9999)
        .ok_or_else(|| {
            Error::unsupported(format!("year {} is outside the TOML range 0-9999", d.year()))
        })?;
    Ok(Date {
        year,
        month: d.month() as u8,
        day: d.day() as u8,
    })
}

impl TryFrom<ChronoDateTime<Utc>> for TomlDateTime {
    type Error = Error;

    fn try_from(dt: ChronoDateTime<Utc>) -> Result<Self> {
        TomlDateTime::try_from(dt.fixed_offset())
    }
}

impl TryFrom<ChronoDateTime<FixedOffset>> for TomlDateTime {
    type Error = Error;

    fn try_from(dt: ChronoDateTime<FixedOffset>) -> Result<Self> {
        let local = dt.naive_local();
        Ok(TomlDateTime {
            date: Some(checked_date(local.date())?),
            time: Some(Time {
                hour: local.hour() as u8,
                minute: local.minute() as u8,
                second: local.second() as u8,
                nanosecond: local.nanosecond(),
            }),
            offset: Some(dt.offset().local_minus_utc() / 60),
        })
    }
}

impl TryFrom<NaiveDate> for TomlDateTime {
    type Error = Error;

    fn try_from(d: NaiveDate) -> Result<Self> {
        Ok(TomlDateTime {
            date: Some(checked_date(d)?),
            time: None,
            offset: None,
        })
    }
}

impl From<NaiveTime> for TomlDateTime {
    fn from(t: NaiveTime) -> Self {
        TomlDateTime {
            date: None,
            time: Some(Time {
                hour: t.hour() as u8,
                minute: t.minute() as u8,
                second: t.second() as u8,
                nanosecond: t.nanosecond(),
            }),
            offset: None,
        }
    }
}

impl TryFrom<NaiveDateTime> for TomlDateTime {
    type Error = Error;

    fn try_from(dt: NaiveDateTime) -> Result<Self> {
        let time = TomlDateTime::from(dt.time());
        Ok(TomlDateTime {
            date: Some(checked_date(dt.date())?),
            time: time.time,
            offset: None,
        })
    }
}

impl Serialize for TomlDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TomlDateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TomlDateTime::parse_toml(&s).map_err(serde::de::Error::custom)
    }
}
