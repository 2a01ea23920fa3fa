//! Groups content by category or tag.

use std::cmp::Reverse;
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::content::ContentEntry;
use crate::routes::RouteTable;
use crate::slug::to_kebab_case;

/// The field content is grouped by.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Category,
    Tag,
}

impl TaxonomyKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }

    /// Returns the distinct labels the entry carries for this taxonomy, in
    /// the order they appear.
    pub fn labels<'a>(&self, entry: &'a ContentEntry) -> Vec<&'a str> {
        match self {
            Self::Category => Some(entry.category())
                .filter(|category| !category.trim().is_empty())
                .into_iter()
                .collect(),
            Self::Tag => {
                let mut tags = Vec::with_capacity(entry.tags().len());
                for tag in entry.tags() {
                    if !tags.contains(&tag.as_str()) {
                        tags.push(tag.as_str());
                    }
                }
                tags
            }
        }
    }
}

/// A category or tag, along with the number of entries that carry it.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct TaxonomyGroup {
    pub label: String,
    pub slug: String,
    pub count: usize,
}

/// A problem with a label that needs to be fixed in the content.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TaxonomyWarning {
    #[error("{kind} labels {labels:?} all map to the slug '{slug}' and were left out")]
    SlugCollision {
        kind: &'static str,
        slug: String,
        labels: Vec<String>,
    },

    #[error("{kind} label '{label}' has no URL-safe characters and was left out")]
    EmptySlug { kind: &'static str, label: String },

    #[error("{kind} label '{label}' lost most of its characters in its slug '{slug}'")]
    LossySlug {
        kind: &'static str,
        label: String,
        slug: String,
    },
}

/// The groups for one taxonomy, plus any warnings raised while building them.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TaxonomyListing {
    kind: TaxonomyKind,
    groups: Vec<TaxonomyGroup>,
    warnings: Vec<TaxonomyWarning>,
}

impl TaxonomyListing {
    pub fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    /// Returns the groups, in the order their labels first appear in the input.
    pub fn groups(&self) -> &[TaxonomyGroup] {
        &self.groups
    }

    pub fn warnings(&self) -> &[TaxonomyWarning] {
        &self.warnings
    }

    pub fn get(&self, label: &str) -> Option<&TaxonomyGroup> {
        self.groups.iter().find(|group| group.label == label)
    }

    /// Orders the groups for a listing page: most entries first, then by label.
    pub fn sort_by_count(&mut self) {
        self.groups.sort_by(|a, b| {
            Reverse(a.count)
                .cmp(&Reverse(b.count))
                .then_with(|| a.label.cmp(&b.label))
        });
    }
}

/// Groups `entries` by the given [`TaxonomyKind`].
///
/// Labels whose slugs collide, or that have no slug at all, are left out of
/// the listing and reported as warnings. Nothing is merged.
pub fn build_taxonomy(entries: &[ContentEntry], kind: TaxonomyKind) -> TaxonomyListing {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for entry in entries {
        for label in kind.labels(entry) {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut labels_by_slug: IndexMap<String, Vec<&str>> = IndexMap::new();
    let mut warnings = Vec::new();

    for label in counts.keys() {
        let slug = to_kebab_case(label);
        if slug.is_empty() {
            warnings.push(TaxonomyWarning::EmptySlug {
                kind: kind.name(),
                label: label.to_string(),
            });
            continue;
        }

        labels_by_slug.entry(slug).or_default().push(label);
    }

    let mut groups = Vec::with_capacity(labels_by_slug.len());

    for (slug, labels) in labels_by_slug {
        if labels.len() > 1 {
            warnings.push(TaxonomyWarning::SlugCollision {
                kind: kind.name(),
                slug,
                labels: labels.iter().map(|label| label.to_string()).collect(),
            });
            continue;
        }

        let label = labels[0];
        if is_lossy(label, &slug) {
            warnings.push(TaxonomyWarning::LossySlug {
                kind: kind.name(),
                label: label.to_string(),
                slug: slug.clone(),
            });
        }

        groups.push(TaxonomyGroup {
            label: label.to_string(),
            slug,
            count: counts[label],
        });
    }

    // Collisions are discovered per slug, so restore first-seen label order.
    groups.sort_by_key(|group| counts.get_index_of(group.label.as_str()));

    for warning in &warnings {
        tracing::warn!(taxonomy = kind.name(), "{warning}");
    }

    TaxonomyListing {
        kind,
        groups,
        warnings,
    }
}

/// A tag paired with the path of its listing, when it has one.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct TagLink<'a> {
    pub label: &'a str,
    pub path: Option<String>,
}

/// Resolves category and tag slugs to the listings a site renders.
///
/// Labels that were left out of their taxonomy have no listing and resolve to `None`.
#[derive(Debug, Clone)]
pub struct TermLinks {
    routes: RouteTable,
    categories: HashSet<String>,
    tags: HashSet<String>,
}

impl TermLinks {
    pub fn new(routes: RouteTable, categories: &TaxonomyListing, tags: &TaxonomyListing) -> Self {
        fn slugs(listing: &TaxonomyListing) -> HashSet<String> {
            listing
                .groups()
                .iter()
                .map(|group| group.slug.clone())
                .collect()
        }

        Self {
            routes,
            categories: slugs(categories),
            tags: slugs(tags),
        }
    }

    /// Links for every category and tag in `entries`.
    pub fn for_entries(routes: RouteTable, entries: &[ContentEntry]) -> Self {
        Self::new(
            routes,
            &build_taxonomy(entries, TaxonomyKind::Category),
            &build_taxonomy(entries, TaxonomyKind::Tag),
        )
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn category_path(&self, slug: &str) -> Option<String> {
        self.categories
            .contains(slug)
            .then(|| self.routes.category_path(slug))
    }

    pub fn tag_path(&self, slug: &str) -> Option<String> {
        self.tags
            .contains(slug)
            .then(|| self.routes.tag_path(slug))
    }

    /// Returns each of the entry's tags alongside its listing path.
    pub fn tag_links<'a>(&self, entry: &'a ContentEntry) -> Vec<TagLink<'a>> {
        entry
            .tags_with_slugs()
            .map(|(label, slug)| TagLink {
                label,
                path: self.tag_path(slug),
            })
            .collect()
    }
}

/// Whether more than half of the label's visible characters were stripped.
fn is_lossy(label: &str, slug: &str) -> bool {
    let visible = label.chars().filter(|ch| !ch.is_whitespace()).count();
    let kept = slug.chars().filter(|ch| *ch != '-').count();

    kept * 2 < visible
}
