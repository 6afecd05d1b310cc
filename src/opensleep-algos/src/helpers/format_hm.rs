use chrono::{NaiveDateTime, NaiveTime, Timelike as _};

/// Hour-and-minute display label, the granularity chart axes use.
pub trait FormatHM {
    fn format_hm(&self) -> String;
}

impl FormatHM for NaiveTime {
    fn format_hm(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FormatHM for NaiveDateTime {
    fn format_hm(&self) -> String {
        self.time().format_hm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn pads_single_digits() {
        let t = NaiveTime::from_hms_opt(8, 5, 30).unwrap();
        assert_eq!(t.format_hm(), "08:05");
    }

    #[test]
    fn datetime_drops_date_and_seconds() {
        let dt = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(23, 45, 59)
            .unwrap();
        assert_eq!(dt.format_hm(), "23:45");
    }
}
