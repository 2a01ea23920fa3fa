use std::path::Path;

use auk::renderer::HtmlElementRenderer;
use auk::HtmlElement;
use chrono_tz::Tz;
use thiserror::Error;

use crate::config::{ConfigError, SiteConfig};
use crate::content::ContentRepository;
use crate::embed::{CredlyBadge, ExternalEmbed, Utterances};
use crate::feed::assemble_feed;
use crate::newsletter::NewsletterForm;
use crate::pagination::{paginate, PaginationError};
use crate::permalink::Permalink;
use crate::render::{
    RenderContext, RenderEntryContext, RenderListingContext, RenderTaxonomyContext,
};
use crate::routes::RouteTable;
use crate::sitemap::{render_sitemap, SitemapEntry};
use crate::storage::Store;
use crate::taxonomy::{
    build_taxonomy, TaxonomyKind, TaxonomyListing, TaxonomyWarning, TermLinks,
};
use crate::templates::*;
use crate::theme::{default_color_mode, ColorMode};

#[derive(Error, Debug)]
pub enum BuildSiteError {
    #[error("invalid site config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum RenderSiteError {
    #[error("render error: {0}")]
    RenderPage(#[from] std::fmt::Error),

    #[error("pagination error: {0}")]
    Pagination(#[from] PaginationError),

    #[error("failed to serialize feed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build permalink for '{path}': {source}")]
    Permalink {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

/// What a call to [`Site::render_to`] produced.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Every route (or static file) that was written, in the order it was written.
    pub paths: Vec<String>,
    /// Problems found in the content's categories and tags.
    pub warnings: Vec<TaxonomyWarning>,
}

pub struct Site {
    config: SiteConfig,
    routes: RouteTable,
    content: ContentRepository,
    timezone: Tz,
    color_mode: ColorMode,
    comments: Option<Box<dyn ExternalEmbed>>,
    badges: Option<Box<dyn ExternalEmbed>>,
}

impl Site {
    pub fn builder() -> SiteBuilder<()> {
        SiteBuilder::new()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn content(&self) -> &ContentRepository {
        &self.content
    }

    fn render_context<'a>(&'a self, links: &'a TermLinks) -> RenderContext<'a> {
        RenderContext {
            config: &self.config,
            routes: &self.routes,
            links,
            content: &self.content,
            timezone: self.timezone,
            color_mode: self.color_mode,
            comments: self.comments.as_deref(),
            badges: self.badges.as_deref(),
        }
    }

    /// Renders every route of the site into `storage`.
    pub fn render_to(&self, storage: &impl Store) -> Result<RenderReport, RenderSiteError> {
        let posts = self.content.posts();
        let page_size = self.config.posts_per_page;

        // Links are only rendered for terms whose listing is written below.
        let taxonomies =
            [TaxonomyKind::Category, TaxonomyKind::Tag].map(|kind| build_taxonomy(posts, kind));
        let links = TermLinks::new(self.routes, &taxonomies[0], &taxonomies[1]);
        let ctx = self.render_context(&links);
        let mut output = Output::new(storage, &self.config.base_url);

        for page in paginate(self.routes.index(), posts, page_size)? {
            let listing = RenderListingContext {
                base: &ctx,
                label: None,
                feed: assemble_feed(page.items, self.timezone, &links),
                pagination: page.pagination,
            };

            output.page(&page.path, &blog_template(&listing), None)?;
        }

        if self.routes.home_redirects() {
            output.unlisted_page(self.routes.home(), &home_redirect_template(&ctx))?;
        }

        let mut warnings = Vec::new();
        for taxonomy in &taxonomies {
            self.render_taxonomy(&ctx, &mut output, taxonomy)?;
            warnings.extend(taxonomy.warnings().iter().cloned());
        }

        for entry in posts {
            let related = self.content.related(entry, self.config.related_posts);
            let post = RenderEntryContext {
                base: &ctx,
                entry,
                related: assemble_feed(related, self.timezone, &links),
            };

            output.page(
                entry.path(),
                &post_template(&post),
                Some(entry.date().to_w3c_date()),
            )?;
        }

        for entry in self.content.pages() {
            let page = RenderEntryContext {
                base: &ctx,
                entry,
                related: Vec::new(),
            };

            output.page(
                entry.path(),
                &page_template(&page),
                Some(entry.date().to_w3c_date()),
            )?;
        }

        if let (Some(path), Some(collaboration)) = (
            self.routes.collaboration(),
            self.config.collaboration.as_ref(),
        ) {
            output.page(path, &collaboration_template(&ctx, collaboration), None)?;
        }

        if let (Some(path), Some(_)) = (self.routes.certifications_list(), self.badges.as_ref()) {
            output.page(path, &certifications_template(&ctx), None)?;
        }

        if let Some(newsletter) = self.config.newsletter.as_ref() {
            output.page(
                &newsletter.path,
                &newsletter_template(&ctx, &NewsletterForm::new()),
                None,
            )?;
            output.unlisted_page(&newsletter.confirm_path, &newsletter_confirm_template(&ctx))?;
        }

        output.static_html(Path::new("404.html"), &not_found_template(&ctx))?;

        let feed = assemble_feed(posts, self.timezone, &links);
        let feed = serde_json::to_string_pretty(&feed)?;
        output.store_static_file(Path::new("feed.json"), feed)?;
        output.sitemap()?;

        tracing::info!(
            routes = output.paths.len(),
            posts = posts.len(),
            pages = self.content.pages().len(),
            warnings = warnings.len(),
            "Rendered site"
        );

        Ok(RenderReport {
            paths: output.paths,
            warnings,
        })
    }

    /// Renders the list of every group, then each group's paginated listing.
    fn render_taxonomy<S: Store>(
        &self,
        ctx: &RenderContext,
        output: &mut Output<S>,
        taxonomy: &TaxonomyListing,
    ) -> Result<(), RenderSiteError> {
        let list_path = match taxonomy.kind() {
            TaxonomyKind::Category => self.routes.categories_list(),
            TaxonomyKind::Tag => self.routes.tags_list(),
        };

        let mut sorted = taxonomy.clone();
        sorted.sort_by_count();
        let list = RenderTaxonomyContext {
            base: ctx,
            taxonomy: &sorted,
        };
        output.page(list_path, &taxonomy_list_template(&list), None)?;

        for group in taxonomy.groups() {
            let (base_path, entries) = match taxonomy.kind() {
                TaxonomyKind::Category => (
                    self.routes.category_path(&group.slug),
                    self.content.in_category(&group.label),
                ),
                TaxonomyKind::Tag => (
                    self.routes.tag_path(&group.slug),
                    self.content.tagged(&group.label),
                ),
            };

            for page in paginate(&base_path, &entries, self.config.posts_per_page)? {
                let listing = RenderListingContext {
                    base: ctx,
                    label: Some(group.label.as_str()),
                    feed: assemble_feed(page.items.iter().copied(), self.timezone, ctx.links()),
                    pagination: page.pagination,
                };

                output.page(&page.path, &term_template(&listing), None)?;
            }
        }

        Ok(())
    }
}

/// Writes rendered pages to a [`Store`], remembering what was written.
struct Output<'a, S: Store> {
    storage: &'a S,
    base_url: &'a str,
    paths: Vec<String>,
    sitemap: Vec<SitemapEntry>,
}

impl<'a, S: Store> Output<'a, S> {
    fn new(storage: &'a S, base_url: &'a str) -> Self {
        Self {
            storage,
            base_url,
            paths: Vec::new(),
            sitemap: Vec::new(),
        }
    }

    /// Stores a page and lists it in the sitemap.
    fn page(
        &mut self,
        path: &str,
        element: &HtmlElement,
        updated_at: Option<String>,
    ) -> Result<(), RenderSiteError> {
        let permalink =
            Permalink::from_path(self.base_url, path).map_err(|source| {
                RenderSiteError::Permalink {
                    path: path.to_string(),
                    source,
                }
            })?;

        self.unlisted_page(path, element)?;
        self.sitemap.push(SitemapEntry {
            permalink,
            updated_at,
        });

        Ok(())
    }

    /// Stores a page that is reachable but left out of the sitemap.
    fn unlisted_page(&mut self, path: &str, element: &HtmlElement) -> Result<(), RenderSiteError> {
        let rendered = render_document(element)?;

        self.storage
            .store_rendered_page(path, rendered)
            .map_err(|err| RenderSiteError::Storage(err.to_string()))?;
        tracing::debug!(path, "Rendered page");
        self.paths.push(path.to_string());

        Ok(())
    }

    fn static_html(&mut self, path: &Path, element: &HtmlElement) -> Result<(), RenderSiteError> {
        let rendered = render_document(element)?;

        self.store_static_file(path, rendered)
    }

    fn sitemap(&mut self) -> Result<(), RenderSiteError> {
        let sitemap = render_sitemap(std::mem::take(&mut self.sitemap))?;

        self.store_static_file(Path::new("sitemap.xml"), sitemap)
    }

    fn store_static_file(&mut self, path: &Path, contents: String) -> Result<(), RenderSiteError> {
        self.storage
            .store_static_file(path, contents)
            .map_err(|err| RenderSiteError::Storage(err.to_string()))?;
        self.paths.push(format!("/{}", path.display()));

        Ok(())
    }
}

fn render_document(element: &HtmlElement) -> Result<String, std::fmt::Error> {
    let rendered = HtmlElementRenderer::new().render_to_string(element)?;

    Ok(format!("<!DOCTYPE html>\n{rendered}"))
}

pub struct SiteBuilder<T> {
    state: T,
}

impl SiteBuilder<()> {
    pub fn new() -> Self {
        Self { state: () }
    }

    pub fn config(self, config: SiteConfig) -> SiteBuilder<WithConfig> {
        SiteBuilder {
            state: WithConfig { config },
        }
    }
}

impl Default for SiteBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WithConfig {
    config: SiteConfig,
}

impl SiteBuilder<WithConfig> {
    pub fn content(self, content: ContentRepository) -> SiteBuilder<WithContent> {
        SiteBuilder {
            state: WithContent {
                with_config: self.state,
                content,
                routes: None,
                color_mode: None,
                comments: None,
                badges: None,
            },
        }
    }
}

pub struct WithContent {
    with_config: WithConfig,
    content: ContentRepository,
    routes: Option<RouteTable>,
    color_mode: Option<ColorMode>,
    comments: Option<Box<dyn ExternalEmbed>>,
    badges: Option<Box<dyn ExternalEmbed>>,
}

impl SiteBuilder<WithContent> {
    /// Uses the given route table instead of the one named in the config.
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.state.routes = Some(routes);
        self
    }

    pub fn color_mode(mut self, color_mode: ColorMode) -> Self {
        self.state.color_mode = Some(color_mode);
        self
    }

    pub fn comments(mut self, comments: impl ExternalEmbed + 'static) -> Self {
        self.state.comments = Some(Box::new(comments));
        self
    }

    pub fn badges(mut self, badges: impl ExternalEmbed + 'static) -> Self {
        self.state.badges = Some(Box::new(badges));
        self
    }

    /// Builds the [`Site`].
    ///
    /// Embeds that were not provided explicitly are created from the config.
    pub fn build(self) -> Result<Site, BuildSiteError> {
        let WithContent {
            with_config: WithConfig { config },
            content,
            routes,
            color_mode,
            comments,
            badges,
        } = self.state;

        let timezone = config.timezone()?;
        let routes = routes.unwrap_or_else(|| RouteTable::for_scheme(config.routes));
        let color_mode = color_mode
            .or(config.color_mode)
            .unwrap_or_else(|| default_color_mode(None));

        let comments = comments.or_else(|| {
            config.comments.as_ref().map(|comments| {
                Box::new(Utterances::new(comments.repo.clone(), comments.issue_term))
                    as Box<dyn ExternalEmbed>
            })
        });
        let badges = badges.or_else(|| {
            config.certifications.as_ref().map(|certifications| {
                Box::new(CredlyBadge::new(certifications.badge_id.clone()))
                    as Box<dyn ExternalEmbed>
            })
        });

        Ok(Site {
            config,
            routes,
            content,
            timezone,
            color_mode,
            comments,
            badges,
        })
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use regex::Regex;

    use crate::content::{ContentEntry, NewContentEntry, ReadTime};
    use crate::storage::InMemoryStorage;

    use super::*;

    fn make_post(slug: &str, date: &str, category: &str, tags: &[&str]) -> ContentEntry {
        ContentEntry::new(NewContentEntry {
            slug: slug.to_string(),
            title: format!("Title of {slug}"),
            description: "A description.".to_string(),
            date: date.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            read_time: ReadTime(2),
            body: "Hello, *world*!".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn make_site(config: &str) -> Site {
        make_site_with(
            config,
            vec![
                make_post("/posts/c", "2024-03-01", "Rust", &["cli", "C++"]),
                make_post("/posts/b", "2024-02-01", "Rust", &["cli", "c"]),
                make_post("/posts/a", "2024-01-01", "Web", &["api"]),
            ],
        )
    }

    fn make_site_with(config: &str, posts: Vec<ContentEntry>) -> Site {
        let content = ContentRepository::from_entries(posts, vec![]).unwrap();

        Site::builder()
            .config(SiteConfig::parse(config).unwrap())
            .content(content)
            .build()
            .unwrap()
    }

    /// Asserts that every category and tag link in the output, in pages and in
    /// `feed.json`, points at a page that was rendered.
    fn assert_term_links_resolve(storage: &InMemoryStorage) -> usize {
        let term_link = Regex::new(r#"(?:href=|": )"(/(?:[^"/]+/)*(?:category|tag)/[^"]*)""#).unwrap();
        let paths = storage.paths();

        let mut checked = 0;
        for path in &paths {
            let Some(contents) = storage.get(path) else {
                continue;
            };

            for captures in term_link.captures_iter(&contents) {
                let target = &captures[1];
                assert!(
                    paths.iter().any(|rendered| rendered == target),
                    "{path} links to {target}, which was never rendered"
                );
                checked += 1;
            }
        }

        checked
    }

    const CONFIG: &str = indoc! {r#"
        base_url = "https://example.com"
        title = "Notes"
        posts_per_page = 2

        [author]
        name = "Jane Doe"

        [comments]
        repo = "jane/comments"

        [newsletter]
        form_id = "1234"
    "#};

    #[test]
    fn test_render_blog_site() {
        let site = make_site(CONFIG);
        let storage = InMemoryStorage::default();

        let report = site.render_to(&storage).unwrap();

        assert_eq!(
            report.paths,
            vec![
                "/blog",
                "/blog/1",
                "/",
                "/blog/categories",
                "/blog/category/rust",
                "/blog/category/web",
                "/blog/tags",
                "/blog/tag/cli",
                "/blog/tag/api",
                "/posts/c",
                "/posts/b",
                "/posts/a",
                "/newsletter",
                "/newsletter/confirm",
                "/404.html",
                "/feed.json",
                "/sitemap.xml",
            ]
        );

        // `C++` and `c` share a slug, so neither gets a page.
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            report.warnings[0],
            TaxonomyWarning::SlugCollision { .. }
        ));

        let index = storage.get("/blog").unwrap();
        assert!(index.starts_with("<!DOCTYPE html>"));
        assert!(index.contains(r#"class="dark""#));
        assert!(index.contains("Title of /posts/c"));
        assert!(!index.contains("Title of /posts/a"));

        let home = storage.get("/").unwrap();
        assert!(home.contains(r#"content="0; url=/blog""#));

        let categories = storage.get("/blog/categories").unwrap();
        assert!(categories.contains("Rust (2)"));
        assert!(categories.find("Rust (2)") < categories.find("Web (1)"));

        let post = storage.get("/posts/c").unwrap();
        assert!(post.contains("utteranc.es/client.js"));
        assert!(post.contains("Title of /posts/b"));

        let feed: serde_json::Value =
            serde_json::from_str(&storage.get("/feed.json").unwrap()).unwrap();
        assert_eq!(feed[0]["path"], "/posts/c");
        assert_eq!(feed[0]["date"], "March 1, 2024");
        assert_eq!(feed[2]["tags"][0]["path"], "/blog/tag/api");

        // The colliding tags are shown, but not linked.
        assert!(post.contains("C++"));
        assert!(!post.contains(r#"href="/blog/tag/c""#));
        assert!(assert_term_links_resolve(&storage) > 0);

        let sitemap = storage.get("/sitemap.xml").unwrap();
        assert!(sitemap.contains("<loc>https://example.com/posts/a/</loc>"));
        assert!(sitemap.contains("<lastmod>2024-01-01</lastmod>"));
        assert!(!sitemap.contains("404"));
        assert!(!sitemap.contains("confirm"));
    }

    #[test]
    fn test_render_root_site() {
        let config = format!(
            "{CONFIG}{}",
            indoc! {r#"
                [certifications]
                badge_id = "badge-123"

                [collaboration]
                email = "jane@example.com"
                intro = ["Open to reviews of developer tools."]

                [[collaboration.partners]]
                name = "Acme"
                url = "https://acme.example"
                logo = "/media/acme.png"
            "#}
        );
        let config = config.replacen("title = \"Notes\"", "title = \"Notes\"\nroutes = \"root\"", 1);
        let site = make_site(&config);
        let storage = InMemoryStorage::default();

        let report = site.render_to(&storage).unwrap();

        assert!(report.paths.contains(&"/collaboration".to_string()));
        assert!(report.paths.contains(&"/certifications".to_string()));
        assert!(report.paths.contains(&"/1".to_string()));
        assert!(storage
            .get("/certifications")
            .unwrap()
            .contains(r#"data-share-badge-id="badge-123""#));
        assert!(!report.paths.contains(&"/blog".to_string()));

        let collaboration = storage.get("/collaboration").unwrap();
        assert!(collaboration.contains("Open to reviews of developer tools."));
        assert!(collaboration.contains(r#"href="https://acme.example""#));
        assert!(collaboration.contains(r#"alt="Acme""#));

        let post = storage.get("/posts/a").unwrap();
        assert!(post.contains(r#"href="/tag/api""#));
        assert!(!post.contains("/blog/tag/"));
        assert!(assert_term_links_resolve(&storage) > 0);
    }

    #[test]
    fn test_terms_without_listing_are_not_linked() {
        let site = make_site_with(
            CONFIG,
            vec![
                make_post("/posts/b", "2024-02-01", "", &["???", "rust"]),
                make_post("/posts/a", "2024-01-01", "Web", &["rust"]),
            ],
        );
        let storage = InMemoryStorage::default();

        let report = site.render_to(&storage).unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert!(!report.paths.contains(&"/blog/category/".to_string()));

        let post = storage.get("/posts/b").unwrap();
        assert!(post.contains("???"));
        assert!(post.contains(r#"href="/blog/tag/rust""#));

        let index = storage.get("/blog").unwrap();
        assert!(!index.contains(r#"href="/blog/category/""#));
        assert!(index.contains(r#"href="/blog/category/web""#));

        let feed: serde_json::Value =
            serde_json::from_str(&storage.get("/feed.json").unwrap()).unwrap();
        assert_eq!(feed[0]["category_path"], serde_json::Value::Null);
        assert_eq!(feed[0]["tags"][0]["path"], serde_json::Value::Null);
        assert_eq!(feed[0]["tags"][1]["path"], "/blog/tag/rust");

        assert!(assert_term_links_resolve(&storage) > 0);
    }

    #[test]
    fn test_explicit_color_mode_wins() {
        let content = ContentRepository::default();
        let site = Site::builder()
            .config(SiteConfig::parse(CONFIG).unwrap())
            .content(content)
            .color_mode(ColorMode::Light)
            .build()
            .unwrap();
        let storage = InMemoryStorage::default();

        site.render_to(&storage).unwrap();

        assert!(storage.get("/blog").unwrap().contains(r#"class="light""#));
    }
}
