use std::ops::Deref;

use auk::Element;
use auk_markdown::{markdown, MarkdownComponents};
use chrono_tz::Tz;

use crate::config::SiteConfig;
use crate::content::{ContentEntry, ContentRepository};
use crate::embed::ExternalEmbed;
use crate::feed::FeedItem;
use crate::pagination::Pagination;
use crate::permalink::Permalink;
use crate::routes::RouteTable;
use crate::taxonomy::{TaxonomyListing, TermLinks};
use crate::theme::ColorMode;

/// Everything a template can see about the site as a whole.
///
/// The color mode lives here rather than in any global state, so two renders
/// with different modes never affect one another.
pub struct RenderContext<'a> {
    pub(crate) config: &'a SiteConfig,
    pub(crate) routes: &'a RouteTable,
    /// Where each rendered category and tag listing lives.
    pub(crate) links: &'a TermLinks,
    pub(crate) content: &'a ContentRepository,
    pub(crate) timezone: Tz,
    pub(crate) color_mode: ColorMode,
    pub(crate) comments: Option<&'a dyn ExternalEmbed>,
    pub(crate) badges: Option<&'a dyn ExternalEmbed>,
}

impl<'a> RenderContext<'a> {
    pub fn config(&self) -> &'a SiteConfig {
        self.config
    }

    pub fn routes(&self) -> &'a RouteTable {
        self.routes
    }

    pub fn links(&self) -> &'a TermLinks {
        self.links
    }

    pub fn content(&self) -> &'a ContentRepository {
        self.content
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn comments(&self) -> Option<&'a dyn ExternalEmbed> {
        self.comments
    }

    pub fn badges(&self) -> Option<&'a dyn ExternalEmbed> {
        self.badges
    }

    /// Renders the provided Markdown text.
    pub fn render_markdown(&self, text: &str) -> Vec<Element> {
        markdown(text, MarkdownComponents::default())
    }

    /// Returns the absolute URL for a site-relative path, if it resolves.
    pub fn permalink(&self, path: &str) -> Option<Permalink> {
        Permalink::from_path(&self.config.base_url, path).ok()
    }
}

/// A page of a post listing: the blog index, or a single category or tag.
pub struct RenderListingContext<'a> {
    pub(crate) base: &'a RenderContext<'a>,
    /// The group label for category and tag listings.
    pub label: Option<&'a str>,
    pub feed: Vec<FeedItem<'a>>,
    pub pagination: Pagination,
}

impl<'a> Deref for RenderListingContext<'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.base
    }
}

/// The list of every category or every tag.
pub struct RenderTaxonomyContext<'a> {
    pub(crate) base: &'a RenderContext<'a>,
    pub taxonomy: &'a TaxonomyListing,
}

impl<'a> Deref for RenderTaxonomyContext<'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.base
    }
}

/// A single post or page.
pub struct RenderEntryContext<'a> {
    pub(crate) base: &'a RenderContext<'a>,
    pub entry: &'a ContentEntry,
    pub related: Vec<FeedItem<'a>>,
}

impl<'a> Deref for RenderEntryContext<'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.base
    }
}
