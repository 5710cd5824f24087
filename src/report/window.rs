use chrono::{Days, NaiveDate};

/// Calendar days compared against the day before the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub yesterday: NaiveDate,
    pub day_before: NaiveDate,
    pub week_before: NaiveDate,
}

/// Which comparison day a transfer belongs to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Yesterday,
    DayBefore,
    WeekBefore,
}

impl DateWindow {
    pub fn new(as_of: NaiveDate) -> Self {
        let back = |days: u64| {
            as_of.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
        };

        Self {
            yesterday: back(1),
            day_before: back(2),
            week_before: back(8),
        }
    }

    pub fn period(&self, date: NaiveDate) -> Option<Period> {
        if date == self.yesterday {
            Some(Period::Yesterday)
        } else if date == self.day_before {
            Some(Period::DayBefore)
        } else if date == self.week_before {
            Some(Period::WeekBefore)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_window_offsets() {
        let window = DateWindow::new(ymd(2025, 3, 1));

        assert_eq!(window.yesterday, ymd(2025, 2, 28));
        assert_eq!(window.day_before, ymd(2025, 2, 27));
        assert_eq!(window.week_before, ymd(2025, 2, 21));
    }

    #[test]
    fn test_period_lookup() {
        let window = DateWindow::new(ymd(2025, 3, 10));

        assert_eq!(window.period(ymd(2025, 3, 9)), Some(Period::Yesterday));
        assert_eq!(window.period(ymd(2025, 3, 8)), Some(Period::DayBefore));
        assert_eq!(window.period(ymd(2025, 3, 2)), Some(Period::WeekBefore));
        assert_eq!(window.period(ymd(2025, 3, 10)), None);
        assert_eq!(window.period(ymd(2025, 3, 3)), None);
    }
}
