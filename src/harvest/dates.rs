//! Date label normalization.
//!
//! The schedule page expresses an item's broadcast date three different ways:
//! the relative words `오늘` / `내일`, an explicit `M월 D일` label, or nothing
//! at all beyond the active date tab. All of them collapse to a zero-padded
//! `MM.DD` string so records from different passes compare equal.

use chrono::NaiveDate;
use regex::Regex;

/// Relative label for the reference date itself
pub const LABEL_TODAY: &str = "오늘";
/// Relative label for the day after the reference date
pub const LABEL_TOMORROW: &str = "내일";

/// Resolves a raw date label to canonical `MM.DD` form.
///
/// `reference` anchors the relative labels. A label matching none of the
/// known shapes falls back to the active tab's label with its whitespace
/// collapsed, so the record still lands in a stable bucket.
pub fn normalize(date_label: &str, reference: NaiveDate, tab_label: &str) -> String {
    if date_label == LABEL_TODAY {
        return reference.format("%m.%d").to_string();
    }
    if date_label == LABEL_TOMORROW {
        let tomorrow = reference.succ_opt().unwrap_or(reference);
        return tomorrow.format("%m.%d").to_string();
    }

    let explicit = Regex::new(r"(\d{1,2})월\s*(\d{1,2})일").expect("valid month-day regex");
    if let Some(caps) = explicit.captures(date_label) {
        if let (Ok(month), Ok(day)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            return format!("{month:02}.{day:02}");
        }
    }

    collapse_whitespace(tab_label)
}

/// Rejoins a label on single spaces, flattening newlines and runs of blanks.
pub fn collapse_whitespace(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date")
    }

    #[test]
    fn today_label_formats_the_reference_date() {
        assert_eq!(normalize(LABEL_TODAY, reference(), "오늘"), "03.05");
    }

    #[test]
    fn tomorrow_label_adds_one_day() {
        assert_eq!(normalize(LABEL_TOMORROW, reference(), "오늘"), "03.06");
    }

    #[test]
    fn tomorrow_rolls_over_a_month_boundary() {
        let end_of_march = NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date");
        assert_eq!(normalize(LABEL_TOMORROW, end_of_march, "오늘"), "04.01");
    }

    #[test]
    fn explicit_month_day_label_is_zero_padded() {
        assert_eq!(normalize("3월 9일", reference(), "오늘"), "03.09");
    }

    #[test]
    fn explicit_label_tolerates_missing_space() {
        assert_eq!(normalize("12월25일", reference(), "오늘"), "12.25");
    }

    #[test]
    fn explicit_label_is_found_inside_longer_text() {
        assert_eq!(normalize("방송 10월 3일 예정", reference(), "오늘"), "10.03");
    }

    #[test]
    fn unknown_label_falls_back_to_the_tab_label() {
        assert_eq!(normalize("", reference(), "3.10(일)"), "3.10(일)");
    }

    #[test]
    fn tab_label_fallback_collapses_whitespace() {
        assert_eq!(normalize("모레", reference(), "일\n 3.10 "), "일 3.10");
    }
}
