pub mod digits;
pub mod jalaali;

pub use digits::{to_ascii_digits, to_persian_digits};
pub use jalaali::{is_leap_jalaali_year, month_length, to_gregorian, to_jalaali, JalaaliDate};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("year {0} is outside the supported Jalaali range")]
    YearOutOfRange(i32),

    #[error("invalid date component: {0}")]
    InvalidComponent(String),

    #[error("malformed date string: {0}")]
    Malformed(String),
}
