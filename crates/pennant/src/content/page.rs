use std::fs;
use std::path::{Path, PathBuf};

use derive_more::{Deref, Display};
use thiserror::Error;

use crate::content::{
    parse_front_matter, ContentEntry, ContentEntryError, EntryFrontMatter, FrontMatterError,
    NewContentEntry, ReadingMetrics,
};

/// The path of a Markdown file relative to the content directory, without
/// its extension.
#[derive(Debug, PartialEq, Eq, Clone, Display, Deref)]
pub struct DocumentPath(pub(crate) String);

impl DocumentPath {
    pub fn from_file_path(root_path: impl AsRef<Path>, file_path: impl AsRef<Path>) -> Self {
        let file_path = file_path.as_ref();
        let relative = file_path.strip_prefix(root_path).unwrap_or(file_path);

        let slug = relative
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let parent = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();

        if parent.is_empty() {
            Self(format!("/{slug}"))
        } else {
            Self(format!("/{parent}/{slug}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A Markdown document read from the content directory.
#[derive(Debug)]
pub struct Document {
    pub meta: EntryFrontMatter,
    pub file_path: PathBuf,
    pub path: DocumentPath,
    pub raw_content: String,
}

#[derive(Error, Debug)]
pub enum ParseDocumentError {
    #[error("failed to read '{filepath}': {source}")]
    Io {
        filepath: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front matter in '{filepath}': {source}")]
    InvalidFrontMatter {
        filepath: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("invalid entry in '{filepath}': {source}")]
    InvalidEntry {
        filepath: PathBuf,
        #[source]
        source: ContentEntryError,
    },
}

impl Document {
    pub fn from_path(
        root_path: impl AsRef<Path>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ParseDocumentError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ParseDocumentError::Io {
            filepath: path.to_owned(),
            source,
        })?;

        Self::parse(&contents, root_path, path)
    }

    pub fn parse(
        text: &str,
        root_path: impl AsRef<Path>,
        filepath: &Path,
    ) -> Result<Self, ParseDocumentError> {
        let (front_matter, content) =
            parse_front_matter::<EntryFrontMatter>(text).map_err(|source| {
                ParseDocumentError::InvalidFrontMatter {
                    filepath: filepath.to_owned(),
                    source,
                }
            })?;

        Ok(Self {
            meta: front_matter,
            file_path: filepath.to_owned(),
            path: DocumentPath::from_file_path(root_path, filepath),
            raw_content: content.to_string(),
        })
    }

    /// Turns the document into a [`ContentEntry`], measuring how long it takes to read.
    pub fn into_entry(self, words_per_minute: usize) -> Result<ContentEntry, ParseDocumentError> {
        let metrics = ReadingMetrics::for_markdown(&self.raw_content, words_per_minute);
        let file_path = self.file_path;

        ContentEntry::new(NewContentEntry {
            slug: self.path.0,
            custom_slug: self.meta.slug,
            kind: self.meta.template,
            title: self.meta.title,
            description: self.meta.description,
            date: self.meta.date,
            category: self.meta.category,
            tags: self.meta.tags,
            tag_slugs: None,
            read_time: metrics.read_time,
            body: self.raw_content,
            social_image: self.meta.social_image,
        })
        .map_err(|source| ParseDocumentError::InvalidEntry {
            filepath: file_path,
            source,
        })
    }
}
