use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use exn::{OptionExt, ResultExt};
use time::{Date, Month, PrimitiveDateTime, Time};

use crate::consts;
use crate::error::{Error, ErrorKind, Result};

/// Publish timestamp of a document, as shown on the document list
/// (`DD.MM.YY HH:MM`, local time of the publisher, two-digit year in the
/// 2000s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Published(PrimitiveDateTime);
impl Published {
    fn component<T: FromStr>(value: Option<regex::Match<'_>>, field: &'static str) -> Result<T> {
        let value = value.ok_or_raise(|| ErrorKind::ParseError { field, value: String::new() })?;
        value.as_str().parse::<T>().ok().ok_or_raise(|| ErrorKind::ParseError {
            field,
            value: value.as_str().to_string(),
        })
    }
}
impl FromStr for Published {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let captures = consts::PUBLISHED_REGEX.captures(s.trim()).ok_or_raise(|| ErrorKind::ParseError {
            field: "published",
            value: s.to_string(),
        })?;
        let day: u8 = Self::component(captures.get(1), "published-day")?;
        let month: u8 = Self::component(captures.get(2), "published-month")?;
        let year: i32 = Self::component(captures.get(3), "published-year")?;
        let hour: u8 = Self::component(captures.get(4), "published-hour")?;
        let minute: u8 = Self::component(captures.get(5), "published-minute")?;
        let month = Month::try_from(month).or_raise(|| ErrorKind::ParseError {
            field: "published-month",
            value: month.to_string(),
        })?;
        let date = Date::from_calendar_date(2000 + year, month, day).or_raise(|| ErrorKind::ParseError {
            field: "published-date",
            value: s.to_string(),
        })?;
        let time = Time::from_hms(hour, minute, 0).or_raise(|| ErrorKind::ParseError {
            field: "published-time",
            value: s.to_string(),
        })?;
        Ok(Self(PrimitiveDateTime::new(date, time)))
    }
}

impl Display for Published {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let (date, time) = (self.0.date(), self.0.time());
        write!(
            f,
            "{:02}.{:02}.{:02} {:02}:{:02}",
            date.day(),
            u8::from(date.month()),
            date.year() % 100,
            time.hour(),
            time.minute()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse() {
        let published: Published = "01.06.25 19:22".parse().unwrap();
        let expected = PrimitiveDateTime::new(
            Date::from_calendar_date(2025, Month::June, 1).unwrap(),
            Time::from_hms(19, 22, 0).unwrap(),
        );
        assert_eq!(published, Published(expected));
    }

    #[test]
    fn test_display_round_trips_upstream_format() {
        let published: Published = " 7.3.24 9:05 ".parse().unwrap();
        assert_eq!(published.to_string(), "07.03.24 09:05");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier: Published = "31.05.25 23:59".parse().unwrap();
        let later: Published = "01.06.25 00:00".parse().unwrap();
        assert!(earlier < later);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("01.06.2025 19:22")]
    #[case("32.01.25 10:00")]
    #[case("01.13.25 10:00")]
    #[case("01.06.25 24:00")]
    #[case("29.02.25 10:00")]
    fn test_parse_invalid(#[case] input: &str) {
        let err = input.parse::<Published>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { .. }));
    }
}
