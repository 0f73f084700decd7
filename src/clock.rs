use chrono::{DateTime, Local};
use crate::models::TIMESTAMP_FORMAT;

/// Source of wall clock time for capture timestamps and object keys
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Current time formatted as `YYYYMMDD-HHMMSS`
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(test)]
impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        use chrono::TimeZone;
        FixedClock(Local.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap())
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
