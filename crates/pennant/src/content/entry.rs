use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ReadTime;
use crate::date::{ParseDateError, PublishDate};
use crate::slug::to_kebab_case;

/// Whether a piece of content is a dated post or a standalone page.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[default]
    Post,
    Page,
}

/// The fields needed to construct a [`ContentEntry`].
#[derive(Debug, Clone, Default)]
pub struct NewContentEntry {
    /// The path derived from the entry's location on disk, e.g. `/posts/hello-world`.
    pub slug: String,
    /// A path that takes precedence over `slug` when linking to the entry.
    pub custom_slug: Option<String>,
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    pub date: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Slugs for `tags`, by position. Derived from the tags when absent.
    pub tag_slugs: Option<Vec<String>>,
    pub read_time: ReadTime,
    pub body: String,
    pub social_image: Option<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContentEntryError {
    #[error("'{slug}' has {tags} tags but {tag_slugs} tag slugs")]
    TagSlugMismatch {
        slug: String,
        tags: usize,
        tag_slugs: usize,
    },

    #[error("'{slug}' gives tag '{tag}' the slug '{tag_slug}', but its listing is at '{expected}'")]
    UnroutableTagSlug {
        slug: String,
        tag: String,
        tag_slug: String,
        expected: String,
    },

    #[error("'{slug}' must take at least one minute to read")]
    ZeroReadTime { slug: String },

    #[error("'{slug}' has no slug")]
    EmptySlug { slug: String },

    #[error("'{slug}' has an invalid date: {source}")]
    InvalidDate {
        slug: String,
        #[source]
        source: ParseDateError,
    },
}

/// A single published post or page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    slug: String,
    custom_slug: Option<String>,
    kind: EntryKind,
    title: String,
    description: String,
    date: PublishDate,
    category: String,
    category_slug: String,
    tags: Vec<String>,
    tag_slugs: Vec<String>,
    read_time: ReadTime,
    body: String,
    social_image: Option<String>,
}

impl ContentEntry {
    pub fn new(entry: NewContentEntry) -> Result<Self, ContentEntryError> {
        let slug = normalize_path(&entry.slug);
        if slug == "/" {
            return Err(ContentEntryError::EmptySlug { slug: entry.slug });
        }

        if entry.read_time.0 == 0 {
            return Err(ContentEntryError::ZeroReadTime { slug });
        }

        let tag_slugs = match entry.tag_slugs {
            Some(tag_slugs) if tag_slugs.len() != entry.tags.len() => {
                return Err(ContentEntryError::TagSlugMismatch {
                    slug,
                    tags: entry.tags.len(),
                    tag_slugs: tag_slugs.len(),
                });
            }
            Some(tag_slugs) => tag_slugs,
            None => entry.tags.iter().map(|tag| to_kebab_case(tag)).collect(),
        };

        // Term listings are keyed by the derived slug, so anything else would dangle.
        for (tag, tag_slug) in entry.tags.iter().zip(&tag_slugs) {
            let expected = to_kebab_case(tag);
            if *tag_slug != expected {
                return Err(ContentEntryError::UnroutableTagSlug {
                    slug,
                    tag: tag.clone(),
                    tag_slug: tag_slug.clone(),
                    expected,
                });
            }
        }

        let date = PublishDate::parse(&entry.date).map_err(|source| {
            ContentEntryError::InvalidDate {
                slug: slug.clone(),
                source,
            }
        })?;

        Ok(Self {
            category_slug: to_kebab_case(&entry.category),
            custom_slug: entry
                .custom_slug
                .filter(|custom_slug| !custom_slug.trim().is_empty())
                .map(|custom_slug| normalize_path(&custom_slug)),
            slug,
            kind: entry.kind,
            title: entry.title,
            description: entry.description,
            date,
            category: entry.category,
            tags: entry.tags,
            tag_slugs,
            read_time: entry.read_time,
            body: entry.body,
            social_image: entry.social_image,
        })
    }

    /// Returns the path to link to: the custom slug when one is set, otherwise
    /// the path derived from the file.
    pub fn path(&self) -> &str {
        self.custom_slug.as_deref().unwrap_or(&self.slug)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn custom_slug(&self) -> Option<&str> {
        self.custom_slug.as_deref()
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> &PublishDate {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn category_slug(&self) -> &str {
        &self.category_slug
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_slugs(&self) -> &[String] {
        &self.tag_slugs
    }

    /// Returns each tag alongside its slug.
    pub fn tags_with_slugs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .zip(&self.tag_slugs)
            .map(|(label, slug)| (label.as_str(), slug.as_str()))
    }

    pub fn has_tag(&self, label: &str) -> bool {
        self.tags.iter().any(|tag| tag == label)
    }

    pub fn read_time(&self) -> ReadTime {
        self.read_time
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn social_image(&self) -> Option<&str> {
        self.social_image.as_deref()
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim().trim_matches('/');
    format!("/{path}")
}
