//! 时段与占用窗口
//!
//! 占用窗口是半开区间 `[start, end)`，以当日分钟数表示。
//! 半开语义允许背靠背预订：前一桌结束的分钟即后一桌开始的分钟。

use chrono::NaiveTime;

use crate::utils::time::minutes_of_day;

/// Occupancy window in minutes since midnight, half-open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyWindow {
    pub start_min: i32,
    pub end_min: i32,
}

impl OccupancyWindow {
    /// Window for a seating starting at `slot` with the given turnover.
    ///
    /// The end may pass midnight numerically (e.g. 23:30 + 90min = 1500);
    /// windows are only ever compared within one date, so the raw minute
    /// count keeps the comparison total.
    pub fn for_slot(slot: NaiveTime, turnover_minutes: i64) -> Self {
        let start_min = minutes_of_day(slot);
        Self {
            start_min,
            end_min: start_min + turnover_minutes as i32,
        }
    }

    /// Half-open interval overlap: `a.start < b.end && b.start < a.end`
    pub fn overlaps(&self, other: &OccupancyWindow) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: i32, end: i32) -> OccupancyWindow {
        OccupancyWindow {
            start_min: start,
            end_min: end,
        }
    }

    #[test]
    fn window_from_slot_and_turnover() {
        let slot = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
        let w = OccupancyWindow::for_slot(slot, 90);
        assert_eq!(w.start_min, 19 * 60 + 30);
        assert_eq!(w.end_min, 21 * 60);
    }

    #[test]
    fn overlapping_windows() {
        assert!(window(1140, 1230).overlaps(&window(1200, 1290)));
        assert!(window(1200, 1290).overlaps(&window(1140, 1230)));
        assert!(window(1140, 1230).overlaps(&window(1140, 1230)));
    }

    #[test]
    fn back_to_back_is_not_overlap() {
        // End of one == start of the next: both seatings are allowed
        assert!(!window(1140, 1230).overlaps(&window(1230, 1320)));
        assert!(!window(1230, 1320).overlaps(&window(1140, 1230)));
    }

    #[test]
    fn disjoint_windows() {
        assert!(!window(660, 750).overlaps(&window(1140, 1230)));
    }

    #[test]
    fn late_slot_past_midnight_stays_comparable() {
        let slot = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        let w = OccupancyWindow::for_slot(slot, 90);
        assert_eq!(w.end_min, 1500);
        assert!(w.overlaps(&window(1440, 1470)));
    }
}
