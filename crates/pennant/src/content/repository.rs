use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use walkdir::WalkDir;

use crate::content::{
    sort_entries_by, ContentEntry, Document, EntryKind, ParseDocumentError, SortBy,
};

#[derive(Error, Debug)]
pub enum LoadContentError {
    #[error("failed to walk content directory: {0}")]
    Io(#[from] walkdir::Error),

    #[error(transparent)]
    ParseDocument(#[from] ParseDocumentError),

    #[error("'{path}' is used by both '{first}' and '{second}'")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },
}

/// The published posts and pages of a site.
#[derive(Debug, Default)]
pub struct ContentRepository {
    posts: Vec<ContentEntry>,
    pages: Vec<ContentEntry>,
}

impl ContentRepository {
    /// Returns a [`ContentRepository`] over entries that were already resolved
    /// and ordered elsewhere. The order is kept as-is.
    pub fn from_entries(
        posts: Vec<ContentEntry>,
        pages: Vec<ContentEntry>,
    ) -> Result<Self, LoadContentError> {
        let repository = Self { posts, pages };
        repository.check_unique_paths()?;

        Ok(repository)
    }

    /// Loads every Markdown file under `content_path`.
    ///
    /// Drafts are skipped. Posts are ordered newest first and pages by title.
    pub fn load(
        content_path: impl AsRef<Path>,
        words_per_minute: usize,
    ) -> Result<Self, LoadContentError> {
        let content_path = content_path.as_ref();
        let walker = WalkDir::new(content_path).follow_links(true).into_iter();

        let mut posts = Vec::new();
        let mut pages = Vec::new();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            let Some(filename) = entry.file_name().to_str() else {
                continue;
            };

            if path.is_dir() || !filename.ends_with(".md") || filename.starts_with('.') {
                continue;
            }

            let document = Document::from_path(content_path, path)?;
            if document.meta.draft {
                tracing::debug!(path = %path.display(), "Skipping draft");
                continue;
            }

            let entry = document.into_entry(words_per_minute)?;
            tracing::debug!(path = %path.display(), slug = entry.path(), "Loaded content");

            match entry.kind() {
                EntryKind::Post => posts.push(entry),
                EntryKind::Page => pages.push(entry),
            }
        }

        sort_entries_by(SortBy::Date, &mut posts);
        sort_entries_by(SortBy::Title, &mut pages);

        Self::from_entries(posts, pages)
    }

    pub fn posts(&self) -> &[ContentEntry] {
        &self.posts
    }

    pub fn pages(&self) -> &[ContentEntry] {
        &self.pages
    }

    /// Returns the posts in the given category, in feed order.
    pub fn in_category(&self, category: &str) -> Vec<&ContentEntry> {
        self.posts
            .iter()
            .filter(|post| post.category() == category)
            .collect()
    }

    /// Returns the posts with the given tag, in feed order.
    pub fn tagged(&self, tag: &str) -> Vec<&ContentEntry> {
        self.posts.iter().filter(|post| post.has_tag(tag)).collect()
    }

    /// Returns up to `limit` other posts that share a category or a tag with `entry`.
    pub fn related(&self, entry: &ContentEntry, limit: usize) -> Vec<&ContentEntry> {
        self.posts
            .iter()
            .filter(|post| post.path() != entry.path())
            .filter(|post| {
                (!entry.category().is_empty() && post.category() == entry.category())
                    || entry.tags().iter().any(|tag| post.has_tag(tag))
            })
            .take(limit)
            .collect()
    }

    pub fn find(&self, path: &str) -> Option<&ContentEntry> {
        self.posts
            .iter()
            .chain(&self.pages)
            .find(|entry| entry.path() == path)
    }

    fn check_unique_paths(&self) -> Result<(), LoadContentError> {
        let mut seen: HashMap<&str, &ContentEntry> = HashMap::new();

        for entry in self.posts.iter().chain(&self.pages) {
            if let Some(existing) = seen.insert(entry.path(), entry) {
                return Err(LoadContentError::DuplicatePath {
                    path: entry.path().to_string(),
                    first: existing.slug().to_string(),
                    second: entry.slug().to_string(),
                });
            }
        }

        Ok(())
    }
}
