use chrono_tz::Tz;
use serde::Serialize;

use crate::content::ContentEntry;
use crate::date::LONG_DATE_FORMAT;
use crate::taxonomy::{TagLink, TermLinks};

/// A [`ContentEntry`] prepared for display in a feed.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct FeedItem<'a> {
    #[serde(skip)]
    pub entry: &'a ContentEntry,
    pub path: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    /// The publish date as shown to readers, e.g. `January 5, 2024`.
    pub date: String,
    /// The publish date as written in the content, for `<time datetime>`.
    pub datetime: &'a str,
    pub category: &'a str,
    /// Missing when the category has no listing.
    pub category_path: Option<String>,
    pub tags: Vec<TagLink<'a>>,
    pub read_time: String,
}

impl<'a> FeedItem<'a> {
    pub fn from_entry(entry: &'a ContentEntry, timezone: Tz, links: &TermLinks) -> Self {
        Self {
            entry,
            path: entry.path(),
            title: entry.title(),
            description: entry.description(),
            date: entry.date().format(LONG_DATE_FORMAT, timezone),
            datetime: entry.date().as_str(),
            category: entry.category(),
            category_path: links.category_path(entry.category_slug()),
            tags: links.tag_links(entry),
            read_time: entry.read_time().label(),
        }
    }
}

/// Prepares each entry for display, keeping the order (and the length) of the input.
pub fn assemble_feed<'a, I>(entries: I, timezone: Tz, links: &TermLinks) -> Vec<FeedItem<'a>>
where
    I: IntoIterator<Item = &'a ContentEntry>,
{
    entries
        .into_iter()
        .map(|entry| FeedItem::from_entry(entry, timezone, links))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::content::{NewContentEntry, ReadTime};
    use crate::routes::RouteTable;

    use super::*;

    fn make_entry(
        slug: &str,
        date: &str,
        tags: &[&str],
        custom_slug: Option<&str>,
    ) -> ContentEntry {
        ContentEntry::new(NewContentEntry {
            slug: slug.to_string(),
            custom_slug: custom_slug.map(ToString::to_string),
            title: format!("Title of {slug}"),
            description: "A description.".to_string(),
            date: date.to_string(),
            category: "Software Engineering".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            read_time: ReadTime(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_feed_item() {
        let entry = make_entry("/posts/hello", "2024-01-05", &["Rust"], None);

        let links = TermLinks::for_entries(RouteTable::blog(), std::slice::from_ref(&entry));

        let feed = assemble_feed([&entry], Tz::UTC, &links);

        assert_eq!(
            feed,
            vec![FeedItem {
                entry: &entry,
                path: "/posts/hello",
                title: "Title of /posts/hello",
                description: "A description.",
                date: "January 5, 2024".to_string(),
                datetime: "2024-01-05",
                category: "Software Engineering",
                category_path: Some("/blog/category/software-engineering".to_string()),
                tags: vec![TagLink {
                    label: "Rust",
                    path: Some("/blog/tag/rust".to_string()),
                }],
                read_time: "5 min read".to_string(),
            }]
        );
    }

    #[test]
    fn test_feed_keeps_order_and_length() {
        let entries = vec![
            make_entry("/c", "2022-03-01", &[], None),
            make_entry("/a", "2024-01-01", &["x", "y"], Some("custom-a")),
            make_entry("/b", "2023-06-15T12:00:00Z", &[], None),
        ];

        let links = TermLinks::for_entries(RouteTable::root(), &entries);

        let feed = assemble_feed(&entries, Tz::UTC, &links);

        assert_eq!(feed.len(), entries.len());
        assert_eq!(
            feed.iter().map(|item| item.path).collect::<Vec<_>>(),
            vec!["/c", "/custom-a", "/b"]
        );
        assert!(feed[0].tags.is_empty());
        assert_eq!(feed[2].date, "June 15, 2023");
    }
}
