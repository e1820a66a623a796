use chrono::{Datelike, NaiveDate};

use crate::models::cv::WorkExperience;

/// End-date spellings meaning "still employed".
const OPEN_ENDED: [&str; 4] = ["present", "current", "now", "ongoing"];

/// Whole years of professional experience across a work history.
///
/// Each role becomes a month interval; overlapping or adjacent roles are
/// merged so concurrent jobs are not double-counted. Roles without a
/// parseable start date, or ending before they start, are skipped. Open-ended
/// and future end dates are capped at `today`.
pub fn total_experience_years(work: &[WorkExperience], today: NaiveDate) -> u32 {
    let now = month_index(today);

    let mut intervals: Vec<(i32, i32)> = work
        .iter()
        .filter_map(|role| {
            let start = month_index(parse_work_date(role.start_date.as_deref()?)?);
            let end = match role.end_date.as_deref().map(str::trim) {
                None => now,
                Some(s) if s.is_empty() || is_open_ended(s) => now,
                Some(s) => month_index(parse_work_date(s)?).min(now),
            };
            (start < end).then_some((start, end))
        })
        .collect();

    intervals.sort_unstable();

    let mut total_months = 0;
    let mut current: Option<(i32, i32)> = None;
    for (start, end) in intervals {
        current = match current {
            Some((cur_start, cur_end)) if start <= cur_end => Some((cur_start, cur_end.max(end))),
            Some((cur_start, cur_end)) => {
                total_months += cur_end - cur_start;
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((start, end)) = current {
        total_months += end - start;
    }

    (total_months / 12) as u32
}

/// Parses `YYYY-MM-DD`, `YYYY-MM`, or `YYYY`. Partial dates resolve to the
/// first day of the period.
pub fn parse_work_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
        .or_else(|| {
            if raw.len() == 4 {
                raw.parse::<i32>()
                    .ok()
                    .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            } else {
                None
            }
        })
}

fn is_open_ended(raw: &str) -> bool {
    OPEN_ENDED.iter().any(|w| raw.eq_ignore_ascii_case(w))
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}
