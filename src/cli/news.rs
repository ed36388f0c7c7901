//! News command for EduDash.
//!
//! Lists the announcement feed and marks announcements as read.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::core::{format_relative_date, Announcement, AnnouncementFilter};
use crate::state::StudentStateStore;
use crate::storage::KeyValueStore;

/// Options for the news command.
#[derive(Debug, Clone, Default)]
pub struct NewsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Which announcements to list.
    pub filter: AnnouncementFilter,
    /// Maximum number of announcements to list.
    pub limit: Option<usize>,
}

/// What the news command should do.
#[derive(Debug, Clone, PartialEq)]
pub enum NewsAction {
    List,
    Read { id: String },
}

/// One announcement with its display date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub relative_date: String,
}

/// Output format for the news command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsOutput {
    pub success: bool,
    pub items: Vec<NewsItem>,
    pub unread_count: usize,
    /// Whether a `read` action changed anything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The news command implementation.
pub struct NewsCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
    today: NaiveDate,
}

impl<'a, K: KeyValueStore> NewsCommand<'a, K> {
    /// Create a new news command dated today.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self {
            store,
            today: Local::now().date_naive(),
        }
    }

    /// Use a fixed date for relative date labels.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run the news command.
    pub async fn run(&self, action: &NewsAction, options: &NewsOptions) -> NewsOutput {
        let marked_read = match action {
            NewsAction::List => None,
            NewsAction::Read { id } => {
                let known = self.store.announcements().iter().any(|a| &a.id == id);
                if !known {
                    return NewsOutput {
                        success: false,
                        items: Vec::new(),
                        unread_count: self.store.unread_announcements_count(),
                        marked_read: Some(false),
                        error: Some(format!("no announcement '{}'", id)),
                    };
                }
                Some(self.store.mark_announcement_as_read(id).await)
            }
        };

        let announcements = self.store.announcements();
        let mut items: Vec<NewsItem> = options
            .filter
            .apply(&announcements)
            .into_iter()
            .map(|a| NewsItem {
                relative_date: format_relative_date(&a.date, self.today),
                announcement: a.clone(),
            })
            .collect();

        if let Some(limit) = options.limit {
            items.truncate(limit);
        }

        NewsOutput {
            success: true,
            items,
            unread_count: self.store.unread_announcements_count(),
            marked_read,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &NewsOutput, options: &NewsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            to_json(output)
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &NewsOutput) -> String {
        if !output.success {
            return format!(
                "News failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        match output.marked_read {
            Some(true) => lines.push("Marked as read.\n".to_string()),
            Some(false) => lines.push("Already read.\n".to_string()),
            None => {}
        }

        if output.items.is_empty() {
            lines.push("No announcements.".to_string());
        }

        for item in &output.items {
            let a = &item.announcement;
            let marker = if a.read { " " } else { "*" };
            let badge = if a.is_high_priority() { " [!]" } else { "" };
            lines.push(format!(
                "{} {} [{}] {}{}",
                marker,
                a.id,
                a.category.display_name(),
                a.title,
                badge
            ));
            lines.push(format!("    {} · {}", a.author, item.relative_date));
        }

        lines.push(String::new());
        lines.push(format!("{} unread", output.unread_count));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::loaded_store;
    use crate::core::AnnouncementCategory;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_list_all_with_relative_dates() {
        let store = loaded_store().await;
        let output = NewsCommand::new(&store)
            .with_today(today())
            .run(&NewsAction::List, &NewsOptions::default())
            .await;

        assert!(output.success);
        assert_eq!(output.items.len(), 4);
        assert_eq!(output.unread_count, 3);
        assert_eq!(output.items[0].relative_date, "Today");
        assert_eq!(output.items[1].relative_date, "2 days ago");
        assert_eq!(output.items[3].relative_date, "Mar 1, 2025");
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let store = loaded_store().await;
        let options = NewsOptions {
            filter: AnnouncementFilter {
                unread_only: true,
                category: Some(AnnouncementCategory::Urgent),
            },
            ..Default::default()
        };

        let output = NewsCommand::new(&store)
            .run(&NewsAction::List, &options)
            .await;

        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0].announcement.id, "ann-003");
    }

    #[tokio::test]
    async fn test_list_limit() {
        let store = loaded_store().await;
        let options = NewsOptions {
            limit: Some(2),
            ..Default::default()
        };

        let output = NewsCommand::new(&store)
            .run(&NewsAction::List, &options)
            .await;

        assert_eq!(output.items.len(), 2);
    }

    #[tokio::test]
    async fn test_read_marks_once() {
        let store = loaded_store().await;
        let cmd = NewsCommand::new(&store);
        let read = NewsAction::Read {
            id: "ann-001".to_string(),
        };

        let first = cmd.run(&read, &NewsOptions::default()).await;
        assert!(first.success);
        assert_eq!(first.marked_read, Some(true));
        assert_eq!(first.unread_count, 2);

        let second = cmd.run(&read, &NewsOptions::default()).await;
        assert_eq!(second.marked_read, Some(false));
        assert_eq!(second.unread_count, 2);
    }

    #[tokio::test]
    async fn test_read_unknown_fails() {
        let store = loaded_store().await;
        let output = NewsCommand::new(&store)
            .run(
                &NewsAction::Read {
                    id: "ann-999".to_string(),
                },
                &NewsOptions::default(),
            )
            .await;

        assert!(!output.success);
        assert_eq!(output.unread_count, 3);
    }

    #[tokio::test]
    async fn test_json_flattens_announcement() {
        let store = loaded_store().await;
        let cmd = NewsCommand::new(&store).with_today(today());
        let options = NewsOptions {
            json: true,
            ..Default::default()
        };
        let output = cmd.run(&NewsAction::List, &options).await;

        let parsed: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &options)).unwrap();
        assert_eq!(parsed["items"][0]["id"], "ann-001");
        assert_eq!(parsed["items"][0]["relativeDate"], "Today");
        assert_eq!(parsed["unreadCount"], 3);
    }
}
