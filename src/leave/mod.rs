pub mod balance;
pub mod duration;

pub use balance::{
    allowed_minutes, ensure_balance, format_minutes, record_minutes, summarize, BalanceSummary,
    MINUTES_PER_DAY,
};
pub use duration::{daily_days, hourly_minutes, hours_from_minutes, parse_time};
