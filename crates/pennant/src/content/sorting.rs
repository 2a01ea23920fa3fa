use serde::{Deserialize, Serialize};

use crate::content::ContentEntry;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Sort by date, in descending order (newest to oldest).
    Date,

    /// Sort by title, in ascending order.
    Title,
}

/// Sorts the entries in place. Ties are broken by path so the order is the
/// same from one build to the next.
pub fn sort_entries_by(sort_by: SortBy, entries: &mut [ContentEntry]) {
    entries.sort_by(|a, b| {
        let ord = match sort_by {
            SortBy::Date => b.date().cmp(a.date()),
            SortBy::Title => a.title().cmp(b.title()),
        };

        ord.then_with(|| a.path().cmp(b.path()))
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::content::{NewContentEntry, ReadTime};

    use super::*;

    fn make_entry(slug: &str, title: &str, date: &str) -> ContentEntry {
        ContentEntry::new(NewContentEntry {
            slug: slug.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            read_time: ReadTime(1),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_sort_by_date() {
        let mut entries = vec![
            make_entry("/posts/hello-world", "Hello, World", "2023-07-01"),
            make_entry("/posts/happy-new-year", "Happy New Year", "2024-01-01"),
            make_entry("/posts/year-in-review", "Year in Review", "2023-12-31"),
            make_entry("/posts/also-new-year", "Also New Year", "2024-01-01"),
        ];

        sort_entries_by(SortBy::Date, &mut entries);

        assert_eq!(
            entries.iter().map(ContentEntry::path).collect::<Vec<_>>(),
            vec![
                "/posts/also-new-year",
                "/posts/happy-new-year",
                "/posts/year-in-review",
                "/posts/hello-world",
            ]
        );
    }

    #[test]
    fn test_sort_by_title() {
        let mut entries = vec![
            make_entry("/b", "Beta", "2024-01-01"),
            make_entry("/a", "Alpha", "2023-01-01"),
        ];

        sort_entries_by(SortBy::Title, &mut entries);

        assert_eq!(entries[0].title(), "Alpha");
    }
}
