//! Read-side helpers for the announcement feed.

use chrono::{DateTime, NaiveDate};

use crate::core::models::{Announcement, AnnouncementCategory};

/// Count announcements that have not been read.
pub fn unread_count(announcements: &[Announcement]) -> usize {
    announcements.iter().filter(|a| !a.read).count()
}

/// Selection criteria for listing announcements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementFilter {
    /// Only unread announcements.
    pub unread_only: bool,
    /// Only announcements in this category.
    pub category: Option<AnnouncementCategory>,
}

impl AnnouncementFilter {
    /// Whether an announcement passes the filter.
    pub fn matches(&self, announcement: &Announcement) -> bool {
        if self.unread_only && announcement.read {
            return false;
        }
        match self.category {
            Some(category) => announcement.category == category,
            None => true,
        }
    }

    /// Apply the filter, keeping feed order.
    pub fn apply<'a>(&self, announcements: &'a [Announcement]) -> Vec<&'a Announcement> {
        announcements.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Parse the calendar date of an ISO-8601 date or timestamp.
pub fn parse_announcement_date(date: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(date) {
        return Some(ts.date_naive());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Human-friendly date relative to `today`.
///
/// Within a week the distance in calendar days is shown ("Today",
/// "Yesterday", "3 days ago"); older dates print as "Jan 5, 2025". Dates that
/// cannot be parsed are returned unchanged.
pub fn format_relative_date(date: &str, today: NaiveDate) -> String {
    let Some(parsed) = parse_announcement_date(date) else {
        return date.to_string();
    };

    let diff_days = (today - parsed).num_days().abs();
    match diff_days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", diff_days),
        _ => parsed.format("%b %-d, %Y").to_string(),
    }
}
