//! Jalaali (solar Hijri) calendar arithmetic.
//!
//! Conversion goes through the Julian day number using the break-year
//! algorithm of the arithmetic Jalaali calendar, which is exact over the
//! whole break table. Leap years follow the 33-year cycle rule; the
//! "divisible by four" shortcut seen in some calendar grids disagrees
//! with it (1404 and 1376 are not leap years, 1403 and 1375 are) and is
//! deliberately not used anywhere.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{digits, CalendarError};

/// Years in which the length of the 33-year cycle changes.
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// A date in the Jalaali calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct JalaaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaaliDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidComponent(format!("month {}", month)));
        }
        let len = month_length(year, month)?;
        if day < 1 || day > len {
            return Err(CalendarError::InvalidComponent(format!("day {}", day)));
        }
        Ok(Self { year, month, day })
    }

    /// Parse `YYYY/MM/DD`, accepting digits in either script.
    pub fn parse(input: &str) -> Result<Self, CalendarError> {
        let ascii = digits::to_ascii_digits(input.trim());
        let parts: Vec<&str> = ascii.split('/').collect();
        if parts.len() != 3 {
            return Err(CalendarError::Malformed(input.to_string()));
        }
        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| CalendarError::Malformed(input.to_string()))?;
        let month = parts[1]
            .parse::<u32>()
            .map_err(|_| CalendarError::Malformed(input.to_string()))?;
        let day = parts[2]
            .parse::<u32>()
            .map_err(|_| CalendarError::Malformed(input.to_string()))?;
        Self::new(year, month, day)
    }

    /// `۱۴۰۳/۰۱/۰۱` — the display form used throughout the UI.
    pub fn display_persian(&self) -> String {
        digits::to_persian_digits(&self.to_string())
    }
}

impl fmt::Display for JalaaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

struct JalCal {
    leap: i32,
    gy: i32,
    march: i32,
}

/// Leap status and the March day of Farvardin 1 for a Jalaali year.
fn jal_cal(jy: i32) -> Result<JalCal, CalendarError> {
    if jy < BREAKS[0] || jy >= BREAKS[BREAKS.len() - 1] {
        return Err(CalendarError::YearOutOfRange(jy));
    }

    let gy = jy + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Ok(JalCal { leap, gy, march })
}

/// True for leap Jalaali years (Esfand has 30 days).
pub fn is_leap_jalaali_year(jy: i32) -> Result<bool, CalendarError> {
    Ok(jal_cal(jy)?.leap == 0)
}

/// Number of days in a Jalaali month.
pub fn month_length(jy: i32, jm: u32) -> Result<u32, CalendarError> {
    match jm {
        1..=6 => Ok(31),
        7..=11 => Ok(30),
        12 => Ok(if is_leap_jalaali_year(jy)? { 30 } else { 29 }),
        _ => Err(CalendarError::InvalidComponent(format!("month {}", jm))),
    }
}

fn gregorian_to_jdn(gy: i32, gm: i32, gd: i32) -> i32 {
    let mut d =
        (gy + (gm - 8) / 6 + 100100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd - 34840408;
    d = d - (gy + 100100 + (gm - 8) / 6) / 100 * 3 / 4 + 752;
    d
}

fn jdn_to_gregorian(jdn: i32) -> (i32, u32, u32) {
    let mut j = 4 * jdn + 139361631;
    j += (4 * jdn + 183187720) / 146097 * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let gd = (i % 153) / 5 + 1;
    let gm = (i / 153) % 12 + 1;
    let gy = j / 1461 - 100100 + (8 - gm) / 6;
    (gy, gm as u32, gd as u32)
}

fn jalaali_to_jdn(jy: i32, jm: i32, jd: i32) -> Result<i32, CalendarError> {
    let r = jal_cal(jy)?;
    Ok(gregorian_to_jdn(r.gy, 3, r.march) + (jm - 1) * 31 - jm / 7 * (jm - 7) + jd - 1)
}

fn jdn_to_jalaali(jdn: i32) -> Result<JalaaliDate, CalendarError> {
    let (gy, _, _) = jdn_to_gregorian(jdn);
    let mut jy = gy - 621;
    let r = jal_cal(jy)?;
    let jdn1f = gregorian_to_jdn(r.gy, 3, r.march);

    let mut k = jdn - jdn1f;
    if k >= 0 {
        if k <= 185 {
            let month = (1 + k / 31) as u32;
            let day = (k % 31 + 1) as u32;
            return Ok(JalaaliDate { year: jy, month, day });
        }
        k -= 186;
    } else {
        jy -= 1;
        k += 179;
        if r.leap == 1 {
            k += 1;
        }
    }
    let month = (7 + k / 30) as u32;
    let day = (k % 30 + 1) as u32;
    Ok(JalaaliDate { year: jy, month, day })
}

/// Convert a Gregorian date to its Jalaali equivalent.
pub fn to_jalaali(date: NaiveDate) -> Result<JalaaliDate, CalendarError> {
    jdn_to_jalaali(gregorian_to_jdn(date.year(), date.month() as i32, date.day() as i32))
}

/// Convert a Jalaali date to its Gregorian equivalent.
pub fn to_gregorian(date: &JalaaliDate) -> Result<NaiveDate, CalendarError> {
    let jdn = jalaali_to_jdn(date.year, date.month as i32, date.day as i32)?;
    let (gy, gm, gd) = jdn_to_gregorian(jdn);
    NaiveDate::from_ymd_opt(gy, gm, gd)
        .ok_or_else(|| CalendarError::InvalidComponent(format!("{}-{}-{}", gy, gm, gd)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_dates() {
        let nowruz = to_jalaali(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()).unwrap();
        assert_eq!(nowruz, JalaaliDate { year: 1403, month: 1, day: 1 });

        let newyear = to_jalaali(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        assert_eq!(newyear, JalaaliDate { year: 1398, month: 10, day: 11 });

        let d = JalaaliDate::new(1400, 1, 1).unwrap();
        assert_eq!(to_gregorian(&d).unwrap(), NaiveDate::from_ymd_opt(2021, 3, 21).unwrap());
    }

    #[test]
    fn test_round_trip_sweep() {
        // Every Gregorian day over several decades must survive the
        // there-and-back conversion unchanged.
        let mut date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2060, 12, 31).unwrap();
        while date <= end {
            let j = to_jalaali(date).unwrap();
            assert_eq!(to_gregorian(&j).unwrap(), date, "round trip failed for {}", date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_leap_years_follow_exact_rule() {
        // Years where the `% 4` shortcut and the exact rule disagree.
        for y in [1375, 1399, 1403] {
            assert!(is_leap_jalaali_year(y).unwrap(), "{} should be leap", y);
        }
        for y in [1376, 1400, 1404] {
            assert!(!is_leap_jalaali_year(y).unwrap(), "{} should not be leap", y);
        }
        // 1404 % 4 == 0 yet it is a common year; 1375 % 4 != 0 yet it is leap.
        assert_eq!(1404 % 4, 0);
        assert_ne!(1375 % 4, 0);
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(month_length(1403, 1).unwrap(), 31);
        assert_eq!(month_length(1403, 7).unwrap(), 30);
        assert_eq!(month_length(1403, 12).unwrap(), 30);
        assert_eq!(month_length(1404, 12).unwrap(), 29);
    }

    #[test]
    fn test_parse_and_display() {
        let d = JalaaliDate::parse("1403/01/15").unwrap();
        assert_eq!(d, JalaaliDate { year: 1403, month: 1, day: 15 });

        let p = JalaaliDate::parse("۱۴۰۳/۰۱/۱۵").unwrap();
        assert_eq!(p, d);
        assert_eq!(p.display_persian(), "۱۴۰۳/۰۱/۱۵");

        assert!(JalaaliDate::parse("1403-01-15").is_err());
        assert!(JalaaliDate::parse("1403/13/01").is_err());
        assert!(JalaaliDate::parse("1404/12/30").is_err());
    }

    #[test]
    fn test_year_out_of_range() {
        assert_eq!(is_leap_jalaali_year(3200), Err(CalendarError::YearOutOfRange(3200)));
        assert_eq!(is_leap_jalaali_year(-100), Err(CalendarError::YearOutOfRange(-100)));
    }
}
