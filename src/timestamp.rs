use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

/// A single component of a timestamp, in the order it appears in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Millisecond => "millisecond",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no numeric fields found")]
    Empty,
    #[error("{field} is missing")]
    Missing { field: Field },
    #[error("{field} does not fit into an integer")]
    Overflow { field: Field },
    #[error("fields describe an instant outside the supported range")]
    InvalidDate,
}

const FIELDS: [Field; 7] = [
    Field::Year,
    Field::Month,
    Field::Day,
    Field::Hour,
    Field::Minute,
    Field::Second,
    Field::Millisecond,
];

const MS_PER_DAY: i64 = 86_400_000;

/// Parses a loosely delimited `year month day hour minute second millisecond`
/// timestamp as UTC.
///
/// Any run of non-digit characters separates two fields, so
/// `2023-06-15T10:30:00.123` and `2023//06..15 10:30:00,123` are the same
/// instant. The month is 1-based and years `0..=99` mean `1900..=1999`.
/// All seven fields are required, anything past them is ignored.
///
/// Fields are not range checked: values past the end of their unit carry
/// into the next one, so `2023-02-30` is March 2nd and hour `24` is
/// midnight of the following day.
pub fn parse_iso_string(s: &str) -> Result<DateTime<Utc>, ParseError> {
    let mut groups = s
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty());

    let mut values = [0i64; 7];

    for (field, value) in FIELDS.into_iter().zip(values.iter_mut()) {
        let group = match groups.next() {
            Some(group) => group,
            None if field == Field::Year => return Err(ParseError::Empty),
            None => return Err(ParseError::Missing { field }),
        };

        *value = group
            .parse::<i64>()
            .map_err(|_| ParseError::Overflow { field })?;
    }

    let [year, month, day, hour, minute, second, millisecond] = values;

    let year = if (0..=99).contains(&year) {
        year + 1900
    } else {
        year
    };

    let month0 = month - 1;
    let year = year
        .checked_add(month0.div_euclid(12))
        .and_then(|year| i32::try_from(year).ok())
        .ok_or(ParseError::InvalidDate)?;

    // rem_euclid(12) is in 0..12
    let first_of_month = NaiveDate::from_ymd_opt(year, month0.rem_euclid(12) as u32 + 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or(ParseError::InvalidDate)?
        .and_utc();

    let offset = (day - 1)
        .checked_mul(MS_PER_DAY)
        .and_then(|ms| ms.checked_add(hour.checked_mul(3_600_000)?))
        .and_then(|ms| ms.checked_add(minute.checked_mul(60_000)?))
        .and_then(|ms| ms.checked_add(second.checked_mul(1_000)?))
        .and_then(|ms| ms.checked_add(millisecond))
        .and_then(Duration::try_milliseconds)
        .ok_or(ParseError::InvalidDate)?;

    first_of_month
        .checked_add_signed(offset)
        .ok_or(ParseError::InvalidDate)
}

/// A UTC instant parsed with [`parse_iso_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_iso_string(s).map(Timestamp)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, TimeZone, Timelike};

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
            + chrono::Duration::milliseconds(ms.into())
    }

    #[test]
    fn parses_well_formed_input() {
        let parsed = parse_iso_string("2023-06-15T10:30:00.123").unwrap();
        assert_eq!(parsed, utc(2023, 6, 15, 10, 30, 0, 123));
        assert_eq!(parsed.nanosecond(), 123_000_000);
    }

    #[test]
    fn first_month_is_january() {
        let parsed = parse_iso_string("2024-01-10T00:00:00.000").unwrap();
        assert_eq!(parsed.month(), 1);
        assert_eq!(parsed.month0(), 0);
    }

    #[test]
    fn separators_are_interchangeable() {
        assert_eq!(
            parse_iso_string("2023//06..15 10:30:00,123"),
            parse_iso_string("2023-06-15T10:30:00.123"),
        );
    }

    #[test]
    fn surrounding_separators_are_ignored() {
        assert_eq!(
            parse_iso_string("T2023-06-15T10:30:00.123Z").unwrap(),
            utc(2023, 6, 15, 10, 30, 0, 123)
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert_eq!(
            parse_iso_string("2023-06-15T10:30:00.123+02:00").unwrap(),
            utc(2023, 6, 15, 10, 30, 0, 123)
        );
    }

    #[test]
    fn truncated_input_is_rejected() {
        assert_eq!(
            parse_iso_string("2023-06-15 10:30"),
            Err(ParseError::Missing {
                field: Field::Second
            })
        );
        assert_eq!(
            parse_iso_string("2023-06-15T10:30:00"),
            Err(ParseError::Missing {
                field: Field::Millisecond
            })
        );
        assert_eq!(
            parse_iso_string("2023-06"),
            Err(ParseError::Missing { field: Field::Day })
        );
        assert_eq!(
            parse_iso_string("2023"),
            Err(ParseError::Missing {
                field: Field::Month
            })
        );
    }

    #[test]
    fn millisecond_group_is_a_count() {
        assert_eq!(
            parse_iso_string("2023-06-15T10:30:00.5").unwrap(),
            utc(2023, 6, 15, 10, 30, 0, 5)
        );
    }

    #[test]
    fn rejects_input_without_digits() {
        assert_eq!(parse_iso_string(""), Err(ParseError::Empty));
        assert_eq!(parse_iso_string("not a date"), Err(ParseError::Empty));
    }

    #[test]
    fn out_of_range_fields_carry_over() {
        assert_eq!(
            parse_iso_string("2023-06-15T24:00:00.000").unwrap(),
            utc(2023, 6, 16, 0, 0, 0, 0)
        );
        assert_eq!(
            parse_iso_string("2023-13-01T00:00:00.000").unwrap(),
            utc(2024, 1, 1, 0, 0, 0, 0)
        );
        assert_eq!(
            parse_iso_string("2023-02-30T00:00:00.000").unwrap(),
            utc(2023, 3, 2, 0, 0, 0, 0)
        );
        assert_eq!(
            parse_iso_string("2023-06-15T10:30:00.123456").unwrap(),
            utc(2023, 6, 15, 10, 32, 3, 456)
        );
    }

    #[test]
    fn zero_fields_step_backwards() {
        assert_eq!(
            parse_iso_string("2023-06-00T00:00:00.000").unwrap(),
            utc(2023, 5, 31, 0, 0, 0, 0)
        );
        assert_eq!(
            parse_iso_string("2023-00-15T00:00:00.000").unwrap(),
            utc(2022, 12, 15, 0, 0, 0, 0)
        );
    }

    #[test]
    fn two_digit_years_are_twentieth_century() {
        assert_eq!(
            parse_iso_string("0023-01-01T00:00:00.000").unwrap(),
            utc(1923, 1, 1, 0, 0, 0, 0)
        );
        assert_eq!(
            parse_iso_string("99-12-31T23:59:59.999").unwrap(),
            utc(1999, 12, 31, 23, 59, 59, 999)
        );
        assert_eq!(
            parse_iso_string("0100-01-01T00:00:00.000").unwrap(),
            utc(100, 1, 1, 0, 0, 0, 0)
        );
    }

    #[test]
    fn rejects_unrepresentable_values() {
        assert_eq!(
            parse_iso_string("99999999999999999999-01-01T00:00:00.000"),
            Err(ParseError::Overflow { field: Field::Year })
        );
        assert_eq!(
            parse_iso_string("9999999-01-01T00:00:00.000"),
            Err(ParseError::InvalidDate)
        );
        assert_eq!(
            parse_iso_string("2023-01-9999999999999T00:00:00.000"),
            Err(ParseError::InvalidDate)
        );
    }

    #[test]
    fn timestamp_displays_as_rfc3339() {
        let timestamp: Timestamp = "2023//06..15 10:30:00,123".parse().unwrap();
        assert_eq!(timestamp.to_string(), "2023-06-15T10:30:00.123Z");
    }
}
