use serde::{Deserialize, Serialize};

/// One commit as consumed by the comparison engine.
///
/// `author` keeps the raw `Name <email>` form; it is the canonical
/// comparison key. Stripping the contact suffix for display happens
/// only when building a `CommitListItem`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub timestamp: i64,
    pub message: String,
}

/// Commit as rendered in the history browse list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitListItem {
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub author: String,
    pub author_display: String,
    pub timestamp: i64,
    pub relative_time: String,
}

impl CommitListItem {
    pub fn from_record(record: CommitRecord) -> Self {
        Self {
            short_hash: record.hash.chars().take(7).collect(),
            author_display: strip_contact_suffix(&record.author).to_string(),
            relative_time: format_relative_time(record.timestamp),
            hash: record.hash,
            message: record.message,
            author: record.author,
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitListResponse {
    pub query_ref: String,
    pub used_remote: bool,
    pub commits: Vec<CommitListItem>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorInfo {
    pub name: String,
    pub email: String,
    pub commit_count: usize,
}

/// Drop a trailing `<email>` block from an author string.
pub fn strip_contact_suffix(author: &str) -> &str {
    match author.find('<') {
        Some(idx) => author[..idx].trim_end(),
        None => author,
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_contact_block() {
        assert_eq!(strip_contact_suffix("Alice <alice@example.com>"), "Alice");
        assert_eq!(strip_contact_suffix("Alice"), "Alice");
        assert_eq!(strip_contact_suffix("<alice@example.com>"), "");
    }

    #[test]
    fn list_item_keeps_raw_author() {
        let item = CommitListItem::from_record(CommitRecord {
            hash: "0123456789abcdef".to_string(),
            author: "Bob Builder <bob@example.com>".to_string(),
            timestamp: 0,
            message: "Initial".to_string(),
        });
        assert_eq!(item.short_hash, "0123456");
        assert_eq!(item.author, "Bob Builder <bob@example.com>");
        assert_eq!(item.author_display, "Bob Builder");
    }
}
