//! Column ordering for date keys.
//!
//! Handwritten notes carry dates as ISO strings (`-` or `/`), `DD/MM/YYYY`,
//! `DD/MM/YY` (with `/`, `-` or `.`) or bare `DD/MM`. Keys are ordered
//! chronologically where they parse; full dates come first, then day-month
//! fragments, then anything else lexically. Ties fall back to the raw string
//! so the order is total.

use chrono::NaiveDate;

const FULL_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Full(NaiveDate),
    DayMonth { month: u32, day: u32 },
    Unparsed,
}

impl DateKey {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        // `%Y` happily reads "25" as year 25, so two-digit years go first.
        let year = trimmed.rsplit(['/', '-', '.']).next().unwrap_or_default();
        if year.len() == 2 {
            for format in SHORT_YEAR_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                    return Self::Full(date);
                }
            }
        }
        for format in FULL_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Self::Full(date);
            }
        }
        if let Some((day, month)) = parse_day_month(trimmed) {
            return Self::DayMonth { month, day };
        }
        Self::Unparsed
    }
}

fn parse_day_month(text: &str) -> Option<(u32, u32)> {
    let (day, month) = text.split_once(['/', '-', '.'])?;
    let day: u32 = day.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    // leap-year date so 29/02 is accepted
    NaiveDate::from_ymd_opt(2000, month, day)?;
    Some((day, month))
}

/// Sort date keys ascending for left-to-right column assignment.
pub fn sort_dates<'a, I>(dates: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keyed: Vec<(DateKey, &str)> = dates
        .into_iter()
        .map(|d| (DateKey::parse(d), d))
        .collect();
    keyed.sort_by(|(ka, a), (kb, b)| ka.cmp(kb).then_with(|| a.cmp(b)));
    keyed.into_iter().map(|(_, d)| d).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates_sort_ascending() {
        assert_eq!(
            sort_dates(["2025-01-05", "2025-01-02"]),
            vec!["2025-01-02", "2025-01-05"]
        );
    }

    #[test]
    fn day_first_dates_sort_chronologically_not_lexically() {
        let sorted = sort_dates(["02/01/2025", "28/12/2024", "15/01/2025"]);
        assert_eq!(sorted, vec!["28/12/2024", "02/01/2025", "15/01/2025"]);
    }

    #[test]
    fn short_years_parse_as_full_dates() {
        let expected = DateKey::Full(NaiveDate::from_ymd_opt(2025, 12, 27).unwrap());
        assert_eq!(DateKey::parse("27/12/25"), expected);
        assert_eq!(DateKey::parse("27-12-25"), expected);
        assert_eq!(DateKey::parse("27.12.25"), expected);
    }

    #[test]
    fn every_full_date_format_parses_to_the_same_day() {
        let expected = DateKey::Full(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        for raw in [
            "2025-01-02",
            "2025/01/02",
            "02/01/2025",
            "02-01-2025",
            "02.01.2025",
        ] {
            assert_eq!(DateKey::parse(raw), expected, "{raw}");
        }
    }

    #[test]
    fn day_month_fragments_order_by_month_then_day() {
        let sorted = sort_dates(["03/01", "25/12", "31/12"]);
        assert_eq!(sorted, vec!["03/01", "25/12", "31/12"]);
        assert_eq!(
            DateKey::parse("25/12"),
            DateKey::DayMonth { month: 12, day: 25 }
        );
    }

    #[test]
    fn mixed_kinds_keep_full_dates_first_and_junk_last() {
        let sorted = sort_dates(["admission", "25/12", "2024-12-20", "Day 3"]);
        assert_eq!(sorted, vec!["2024-12-20", "25/12", "Day 3", "admission"]);
    }

    #[test]
    fn invalid_calendar_dates_are_unparsed() {
        assert_eq!(DateKey::parse("31/02/2025"), DateKey::Unparsed);
        assert_eq!(DateKey::parse("45/13"), DateKey::Unparsed);
        assert_eq!(
            DateKey::parse("29/02"),
            DateKey::DayMonth { month: 2, day: 29 }
        );
    }

    #[test]
    fn same_day_in_two_formats_breaks_ties_on_raw_text() {
        let sorted = sort_dates(["2025-01-02", "02/01/2025"]);
        assert_eq!(sorted, vec!["02/01/2025", "2025-01-02"]);
    }
}
