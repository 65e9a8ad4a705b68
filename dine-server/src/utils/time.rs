//! 时间工具函数 — 日期和时段解析
//!
//! 所有字符串→日期/时间转换统一在 API handler 层完成，
//! 领域层只接收 `NaiveDate` / `NaiveTime`。

use chrono::{NaiveDate, NaiveTime, Utc};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时段字符串 (HH:MM)
pub fn parse_slot(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 格式化时段为 HH:MM
pub fn format_slot(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// 当前日期 (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 当前时间 (UTC)
pub fn now_time() -> NaiveTime {
    Utc::now().time()
}

/// 时间 → 当日分钟数 (用于占用窗口计算)
pub fn minutes_of_day(time: NaiveTime) -> i32 {
    use chrono::Timelike;
    (time.hour() * 60 + time.minute()) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_format() {
        assert_eq!(
            parse_date("2026-09-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
        assert!(parse_date("01/09/2026").is_err());
    }

    #[test]
    fn parse_slot_accepts_hh_mm() {
        let t = parse_slot("19:30").unwrap();
        assert_eq!(minutes_of_day(t), 19 * 60 + 30);
        assert!(parse_slot("7pm").is_err());
    }

    #[test]
    fn format_slot_round_trips() {
        let t = parse_slot("09:05").unwrap();
        assert_eq!(format_slot(t), "09:05");
    }
}
