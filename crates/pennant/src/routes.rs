//! The route table maps each kind of page to its path prefix.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The path layout a site is generated with.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RouteScheme {
    /// Listings live under `/blog`, and `/` redirects to the blog index.
    #[default]
    Blog,

    /// Listings live at the root, next to the collaboration and certifications pages.
    Root,
}

/// A logical kind of page.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum RouteKind {
    Home,
    Index,
    Category,
    CategoriesList,
    Tag,
    TagsList,
    NotFound,
    Collaboration,
    CertificationsList,
}

/// A frozen mapping from [`RouteKind`] to path prefix.
///
/// The fields are private and there are no setters, so once a table has been
/// constructed it cannot change.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RouteTable {
    scheme: RouteScheme,
    home: &'static str,
    index: &'static str,
    category: &'static str,
    categories_list: &'static str,
    tag: &'static str,
    tags_list: &'static str,
    not_found: &'static str,
    collaboration: Option<&'static str>,
    certifications_list: Option<&'static str>,
}

impl RouteTable {
    /// Returns the route table for the `/blog`-prefixed layout.
    pub const fn blog() -> Self {
        Self {
            scheme: RouteScheme::Blog,
            home: "/",
            index: "/blog",
            category: "/blog/category",
            categories_list: "/blog/categories",
            tag: "/blog/tag",
            tags_list: "/blog/tags",
            not_found: "/404",
            collaboration: None,
            certifications_list: None,
        }
    }

    /// Returns the route table for the root-level layout.
    pub const fn root() -> Self {
        Self {
            scheme: RouteScheme::Root,
            home: "/",
            index: "/",
            category: "/category",
            categories_list: "/categories",
            tag: "/tag",
            tags_list: "/tags",
            not_found: "/404",
            collaboration: Some("/collaboration"),
            certifications_list: Some("/certifications"),
        }
    }

    pub const fn for_scheme(scheme: RouteScheme) -> Self {
        match scheme {
            RouteScheme::Blog => Self::blog(),
            RouteScheme::Root => Self::root(),
        }
    }

    pub fn scheme(&self) -> RouteScheme {
        self.scheme
    }

    pub fn home(&self) -> &'static str {
        self.home
    }

    pub fn index(&self) -> &'static str {
        self.index
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn categories_list(&self) -> &'static str {
        self.categories_list
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn tags_list(&self) -> &'static str {
        self.tags_list
    }

    pub fn not_found(&self) -> &'static str {
        self.not_found
    }

    pub fn collaboration(&self) -> Option<&'static str> {
        self.collaboration
    }

    pub fn certifications_list(&self) -> Option<&'static str> {
        self.certifications_list
    }

    /// Returns the path prefix for the given [`RouteKind`], if this layout has one.
    pub fn path(&self, kind: RouteKind) -> Option<&'static str> {
        match kind {
            RouteKind::Home => Some(self.home),
            RouteKind::Index => Some(self.index),
            RouteKind::Category => Some(self.category),
            RouteKind::CategoriesList => Some(self.categories_list),
            RouteKind::Tag => Some(self.tag),
            RouteKind::TagsList => Some(self.tags_list),
            RouteKind::NotFound => Some(self.not_found),
            RouteKind::Collaboration => self.collaboration,
            RouteKind::CertificationsList => self.certifications_list,
        }
    }

    /// Returns whether the home page is a separate route from the blog index.
    pub fn home_redirects(&self) -> bool {
        self.home != self.index
    }

    /// Returns the listing path for the category with the given slug.
    pub fn category_path(&self, slug: &str) -> String {
        format!("{}/{slug}", self.category)
    }

    /// Returns the listing path for the tag with the given slug.
    pub fn tag_path(&self, slug: &str) -> String {
        format!("{}/{slug}", self.tag)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::blog()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route table is already installed with the {installed:?} scheme")]
    AlreadyInstalled { installed: RouteScheme },
}

static ROUTES: OnceCell<RouteTable> = OnceCell::new();

/// Installs the process-wide [`RouteTable`].
///
/// Only the first call succeeds.
pub fn install(table: RouteTable) -> Result<&'static RouteTable, RouteTableError> {
    let mut installed = false;
    let current = ROUTES.get_or_init(|| {
        installed = true;
        table
    });

    if installed {
        Ok(current)
    } else {
        Err(RouteTableError::AlreadyInstalled {
            installed: current.scheme,
        })
    }
}

/// Returns the process-wide [`RouteTable`], falling back to [`RouteTable::blog`]
/// when none was installed.
pub fn routes() -> &'static RouteTable {
    ROUTES.get_or_init(RouteTable::blog)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_blog_routes() {
        let routes = RouteTable::blog();

        assert_eq!(routes.home(), "/");
        assert_eq!(routes.index(), "/blog");
        assert_eq!(routes.categories_list(), "/blog/categories");
        assert_eq!(routes.tags_list(), "/blog/tags");
        assert_eq!(routes.not_found(), "/404");
        assert_eq!(routes.collaboration(), None);
        assert_eq!(routes.category_path("tools"), "/blog/category/tools");
        assert_eq!(routes.tag_path("rust"), "/blog/tag/rust");
        assert!(routes.home_redirects());
    }

    #[test]
    fn test_root_routes() {
        let routes = RouteTable::root();

        assert_eq!(routes.index(), "/");
        assert_eq!(routes.path(RouteKind::Category), Some("/category"));
        assert_eq!(routes.path(RouteKind::Collaboration), Some("/collaboration"));
        assert_eq!(
            routes.path(RouteKind::CertificationsList),
            Some("/certifications")
        );
        assert_eq!(routes.tag_path("rust"), "/tag/rust");
        assert!(!routes.home_redirects());
    }

    #[test]
    fn test_install_only_once() {
        let installed = install(RouteTable::root()).unwrap();
        assert_eq!(installed.scheme(), RouteScheme::Root);

        assert_eq!(
            install(RouteTable::blog()),
            Err(RouteTableError::AlreadyInstalled {
                installed: RouteScheme::Root
            })
        );
        assert_eq!(routes().scheme(), RouteScheme::Root);
    }
}
