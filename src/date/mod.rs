//! Validated calendar dates in the `DD/MM/YYYY` layout used by the data files.
//!
//! A [`Date`] can only be obtained through a validating constructor
//! ([`Date::new`], [`Date::parse`]) or through arithmetic that always lands on a
//! real calendar day, so every `Date` in the program satisfies
//! `1 <= month <= 12`, `1 <= day <= days_in_month(month, year)` and `year >= 1`.

mod error;

pub use error::InvalidDate;

use std::fmt;
use std::str::FromStr;

/// Length of the textual form `DD/MM/YYYY`.
pub const DATE_STR_LEN: usize = 10;

const MONTHS_PER_YEAR: u8 = 12;
const MIN_YEAR: i16 = 1;

/// A calendar day.
///
/// Field order matters: the derived ordering compares year, then month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: i16,
    month: u8,
    day: u8,
}

impl Date {
    /// 01/01/1970, used when no better date is known.
    pub const EPOCH: Self = Self {
        year: 1970,
        month: 1,
        day: 1,
    };

    /// Build a date from its components, rejecting anything that is not a real day.
    pub fn new(day: u8, month: u8, year: i16) -> Result<Self, InvalidDate> {
        if year < MIN_YEAR {
            return Err(InvalidDate::Year(year));
        }
        if month == 0 || month > MONTHS_PER_YEAR {
            return Err(InvalidDate::Month(month));
        }
        if day == 0 || day > Self::days_in_month(month, year) {
            return Err(InvalidDate::Day { day, month, year });
        }
        Ok(Self { year, month, day })
    }

    /// Parse the fixed layout `DD/MM/YYYY`.
    ///
    /// Exactly ten ASCII characters are accepted: digits everywhere except
    /// positions 2 and 5, which must be `/`.
    pub fn parse(s: &str) -> Result<Self, InvalidDate> {
        let bytes = s.as_bytes();
        if bytes.len() != DATE_STR_LEN {
            return Err(InvalidDate::Length(s.chars().count()));
        }

        let (mut day, mut month, mut year) = (0u8, 0u8, 0i16);
        for (position, &byte) in bytes.iter().enumerate() {
            if position == 2 || position == 5 {
                if byte != b'/' {
                    return Err(InvalidDate::MissingSeparator { position });
                }
                continue;
            }
            if !byte.is_ascii_digit() {
                return Err(InvalidDate::NotADigit { position });
            }
            let digit = byte - b'0';
            match position {
                0 | 1 => day = day * 10 + digit,
                3 | 4 => month = month * 10 + digit,
                _ => year = year * 10 + i16::from(digit),
            }
        }

        Self::new(day, month, year)
    }

    /// Today's date according to the system clock, in UTC.
    ///
    /// Falls back to [`Date::EPOCH`] if the clock reads before 1970.
    pub fn today() -> Self {
        let days = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() / 86_400)
            .unwrap_or(0);
        i64::try_from(days)
            .ok()
            .and_then(Self::from_days_since_epoch)
            .unwrap_or(Self::EPOCH)
    }

    /// Convert a day count relative to 01/01/1970 into a civil date.
    pub fn from_days_since_epoch(days: i64) -> Option<Self> {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self::new(
            u8::try_from(day).ok()?,
            u8::try_from(month).ok()?,
            i16::try_from(year).ok()?,
        )
        .ok()
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> i16 {
        self.year
    }

    /// Gregorian leap-year rule.
    pub fn is_leap_year(year: i16) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    /// Number of days in `month` of `year`; 0 for a month outside 1..=12.
    pub fn days_in_month(month: u8, year: i16) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Render as `DD/MM/YYYY`.
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// The date `nights` days later.
    ///
    /// Walks month by month, consuming the days left in the current month and
    /// rolling the year over after December.
    pub fn add_nights(&self, nights: u16) -> Self {
        let (mut day, mut month, mut year) = (self.day, self.month, self.year);
        let mut remaining = nights;

        while remaining > 0 {
            let left_in_month = Self::days_in_month(month, year) - day;
            if remaining <= u16::from(left_in_month) {
                day += remaining as u8;
                break;
            }
            remaining -= u16::from(left_in_month) + 1;
            day = 1;
            month += 1;
            if month > MONTHS_PER_YEAR {
                month = 1;
                year = year.saturating_add(1);
            }
        }

        Self { year, month, day }
    }

    /// Same day and month `years` later.
    ///
    /// 29 February becomes 28 February when the target year is not a leap year.
    pub fn add_years(&self, years: u8) -> Self {
        let year = self.year.saturating_add(i16::from(years));
        let day = if self.month == 2 && self.day == 29 && !Self::is_leap_year(year) {
            28
        } else {
            self.day
        };
        Self {
            year,
            month: self.month,
            day,
        }
    }

    /// Day of the week by Zeller's congruence, 0 = Sunday through 6 = Saturday.
    pub fn weekday(&self) -> u8 {
        let (month, year) = if self.month < 3 {
            (i32::from(self.month) + 12, i32::from(self.year) - 1)
        } else {
            (i32::from(self.month), i32::from(self.year))
        };
        let k = year.rem_euclid(100);
        let j = year.div_euclid(100);
        let h = (i32::from(self.day) + 13 * (month + 1) / 5 + k + k / 4 + j / 4 + 5 * j)
            .rem_euclid(7);
        // Zeller counts from Saturday.
        ((h + 6) % 7) as u8
    }

    /// [`Date::weekday`] as a [`Weekday`].
    pub fn weekday_name(&self) -> Weekday {
        Weekday::from_index(self.weekday())
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

impl FromStr for Date {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    fn from_index(index: u8) -> Self {
        match index % 7 {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        };
        f.write_str(name)
    }
}
