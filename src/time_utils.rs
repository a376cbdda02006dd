use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Key a daily challenge by the user's local calendar date. Accepts an
/// ISO date or datetime string from the client; anything unparsable
/// falls back to the current UTC date.
pub fn local_date_key(raw: Option<&str>, now: DateTime<Utc>) -> NaiveDate {
    if let Some(raw) = raw {
        let trimmed = raw.trim();
        if let Some(prefix) = trimmed.get(..10) {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return date;
            }
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return dt.date_naive();
        }
    }
    now.date_naive()
}

/// Monday of the ISO week containing `date`.
pub fn iso_week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    #[test]
    fn date_key_prefers_client_supplied_date() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 23, 0, 0).unwrap();
        let key = local_date_key(Some("2025-03-11"), now);
        assert_eq!(key, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }

    #[test]
    fn date_key_accepts_rfc3339_and_falls_back() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 23, 0, 0).unwrap();
        let key = local_date_key(Some("2025-03-11T08:30:00+02:00"), now);
        assert_eq!(key, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        assert_eq!(local_date_key(Some("not-a-date"), now), now.date_naive());
        assert_eq!(local_date_key(None, now), now.date_naive());
    }

    #[test]
    fn week_start_is_monday_at_or_before_input() {
        for offset in 0..14 {
            let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + Duration::days(offset);
            let start = iso_week_start(date);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert!(start <= date);
            assert!(date - start < Duration::days(7));
        }
    }
}
