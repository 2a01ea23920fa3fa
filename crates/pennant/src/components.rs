//! The building blocks every page template is composed from.

use auk::*;

use crate::config::MenuItem;
use crate::content::ContentEntry;
use crate::date::SHORT_DATE_FORMAT;
use crate::embed::EmbedContainer;
use crate::feed::FeedItem;
use crate::newsletter::{form_action, NewsletterForm, SubscriptionStatus};
use crate::pagination::Pagination;
use crate::render::RenderContext;
use crate::taxonomy::TagLink;

/// What goes into a page's `<head>`.
#[derive(Debug, Clone)]
pub struct PageMeta<'a> {
    pub title: String,
    pub description: &'a str,
    pub social_image: Option<&'a str>,
}

impl<'a> PageMeta<'a> {
    pub fn new(title: impl Into<String>, description: &'a str) -> Self {
        Self {
            title: title.into(),
            description,
            social_image: None,
        }
    }

    pub fn social_image(mut self, social_image: Option<&'a str>) -> Self {
        self.social_image = social_image;
        self
    }
}

/// The document shell: `<head>`, then the sidebar next to the page content.
///
/// The color mode is written as the class of the root `<html>` element.
pub fn layout(
    ctx: &RenderContext,
    meta: PageMeta,
    is_index: bool,
    content: impl Into<Element>,
) -> HtmlElement {
    html()
        .attr("lang", "en")
        .class(ctx.color_mode().as_str())
        .child(page_head(ctx, &meta))
        .child(
            body().child(
                div()
                    .class("layout")
                    .child(sidebar(ctx, is_index))
                    .child(content),
            ),
        )
}

fn page_head(ctx: &RenderContext, page_meta: &PageMeta) -> HtmlElement {
    let social_image = page_meta
        .social_image
        .and_then(|image| ctx.permalink(image))
        .map(|permalink| {
            meta()
                .attr("property", "og:image")
                .attr("content", permalink.as_str())
        });

    head()
        .child(meta().attr("charset", "utf-8"))
        .child(
            meta()
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(title().child(page_meta.title.as_str()))
        .child(
            meta()
                .attr("name", "description")
                .attr("content", page_meta.description),
        )
        .child(
            meta()
                .attr("property", "og:title")
                .attr("content", page_meta.title.as_str()),
        )
        .children(social_image)
}

/// The titled content column.
pub fn page(title: &str, children: impl IntoIterator<Item = Element>) -> HtmlElement {
    div()
        .class("page")
        .child(h1().class("page__title").child(title))
        .child(div().class("page__body").children(children))
}

pub fn sidebar(ctx: &RenderContext, is_index: bool) -> HtmlElement {
    div().class("sidebar").child(
        div()
            .class("sidebar__inner")
            .child(sidebar_author(ctx, is_index))
            .child(sidebar_menu(&ctx.config().menu))
            .child(contacts(ctx)),
    )
}

/// The author's photo, name, and bio. The name is the page heading on the index.
fn sidebar_author(ctx: &RenderContext, is_index: bool) -> HtmlElement {
    let author = &ctx.config().author;
    let index = ctx.routes().index();

    let name = a()
        .class("author__link")
        .href(index)
        .child(author.name.as_str());
    let heading = if is_index { h1() } else { h2() };

    div()
        .class("author")
        .children(author.photo.as_deref().map(|photo| {
            a().href(index).child(
                img()
                    .class("author__photo")
                    .attr("src", photo)
                    .attr("alt", author.name.as_str())
                    .attr("width", "75")
                    .attr("height", "75"),
            )
        }))
        .child(heading.class("author__title").child(name))
        .child(p().class("author__subtitle").child(author.bio.as_str()))
}

fn sidebar_menu(menu: &[MenuItem]) -> HtmlElement {
    nav().class("menu").child(
        ul().class("menu__list").children(menu.iter().map(|item| {
            li().class("menu__item").child(
                a().class("menu__link")
                    .href(item.path.as_str())
                    .child(item.label.as_str()),
            )
        })),
    )
}

/// Links to the author's profiles, in the order they are configured.
pub fn contacts(ctx: &RenderContext) -> HtmlElement {
    div().class("contacts").child(
        ul().class("contacts__list")
            .children(ctx.config().author.contacts.iter().map(|(name, value)| {
                li().class("contacts__item").child(
                    a().class("contacts__link")
                        .href(contact_href(name, value))
                        .rel("noopener noreferrer")
                        .attr("target", "_blank")
                        .child(name.as_str()),
                )
            })),
    )
}

fn contact_href(name: &str, value: &str) -> String {
    if value.starts_with("http://") || value.starts_with("https://") {
        return value.to_string();
    }

    match name {
        "email" => format!("mailto:{value}"),
        "github" => format!("https://github.com/{value}"),
        "twitter" => format!("https://twitter.com/{value}"),
        "linkedin" => format!("https://www.linkedin.com/in/{value}"),
        "telegram" => format!("https://t.me/{value}"),
        _ => value.to_string(),
    }
}

pub fn feed(items: &[FeedItem]) -> HtmlElement {
    div().class("feed").children(items.iter().map(|item| {
        div()
            .class("feed__item")
            .child(
                div()
                    .class("feed__meta")
                    .child(
                        time()
                            .class("feed__time")
                            .attr("datetime", item.datetime)
                            .child(item.date.as_str()),
                    )
                    .child(span().class("feed__divider"))
                    .child(span().class("feed__category").child(
                        match item.category_path.as_deref() {
                            Some(path) => a().class("feed__link").href(path),
                            None => span(),
                        }
                        .child(item.category),
                    )),
            )
            .child(
                h2().class("feed__title").child(
                    a().class("feed__link")
                        .href(item.path)
                        .child(item.title),
                ),
            )
            .child(p().class("feed__description").child(item.description))
            .child(
                div()
                    .class("feed__bottom")
                    .children((!item.tags.is_empty()).then(|| tags(&item.tags)))
                    .child(small().child(item.read_time.as_str())),
            )
    }))
}

pub fn pagination_nav(pagination: &Pagination) -> HtmlElement {
    fn page_link(label: &str, path: Option<&str>, class_name: &str) -> HtmlElement {
        let link = match path {
            Some(path) => a().class("pagination__link").rel(class_name).href(path),
            None => span().class("pagination__link pagination__link--disabled"),
        };

        div()
            .class(format!("pagination__{class_name}"))
            .child(link.child(label))
    }

    nav()
        .class("pagination")
        .child(page_link(
            "← PREV",
            pagination.prev_page_path.as_deref(),
            "prev",
        ))
        .child(page_link(
            "→ NEXT",
            pagination.next_page_path.as_deref(),
            "next",
        ))
}

pub fn tags(tags: &[TagLink]) -> HtmlElement {
    div().class("tags").child(
        ul().class("tags__list").children(tags.iter().map(|tag| {
            let label = match tag.path.as_deref() {
                Some(path) => a().class("button tags__button").href(path),
                None => span().class("button tags__button"),
            };

            li().class("tags__item").child(label.child(tag.label))
        })),
    )
}

/// The date and read time shown under a post's title.
fn post_meta(ctx: &RenderContext, entry: &ContentEntry) -> HtmlElement {
    div()
        .class("meta")
        .child(
            p().class("meta__date")
                .child(entry.date().format(SHORT_DATE_FORMAT, ctx.timezone())),
        )
        .child(span().child("—"))
        .child(p().child(entry.read_time().label()))
}

fn post_author(ctx: &RenderContext, entry: &ContentEntry) -> HtmlElement {
    let author = &ctx.config().author;

    div().class("post-author").child(
        div()
            .class("post-author__information")
            .children(author.photo.as_deref().map(|photo| {
                img()
                    .class("post-author__photo")
                    .attr("src", photo)
                    .attr("alt", author.name.as_str())
            }))
            .child(
                div()
                    .child(strong().child(author.name.as_str()))
                    .child(post_meta(ctx, entry)),
            ),
    )
}

pub fn post_content(ctx: &RenderContext, entry: &ContentEntry) -> HtmlElement {
    div()
        .class("content")
        .child(h1().class("content__title").child(entry.title()))
        .child(post_author(ctx, entry))
        .child(
            div()
                .class("content__body")
                .children(ctx.render_markdown(entry.body())),
        )
}

pub fn copyright(ctx: &RenderContext) -> HtmlElement {
    div()
        .class("copyright")
        .child(ctx.config().copyright.as_str())
}

/// The comments widget for an entry, when comments are configured.
pub fn comments(ctx: &RenderContext, entry: &ContentEntry) -> Option<HtmlElement> {
    let container = EmbedContainer::new("comments", ctx.color_mode())
        .for_page(entry.path(), entry.title());

    ctx.comments().map(|embed| embed.render(&container))
}

pub fn related(items: &[FeedItem]) -> HtmlElement {
    section().class("related").child(feed(items))
}

/// A full post: content, footer, comments, newsletter sign-up, and related posts.
pub fn post(ctx: &RenderContext, entry: &ContentEntry, related_items: &[FeedItem]) -> HtmlElement {
    let tag_links = ctx.links().tag_links(entry);

    let newsletter = ctx.config().newsletter.is_some().then(|| {
        div()
            .class("post__newsletter")
            .child(h2().child("Newsletter"))
            .child(newsletter_form(ctx, &NewsletterForm::new()))
    });

    let related_posts = (!related_items.is_empty()).then(|| {
        div()
            .child(hr())
            .child(h2().child("Related articles"))
            .child(related(related_items))
    });

    div()
        .class("post")
        .child(div().class("post__content").child(post_content(ctx, entry)))
        .child(div().child(copyright(ctx)))
        .child(
            div()
                .class("post__footer")
                .children((!tag_links.is_empty()).then(|| tags(&tag_links))),
        )
        .child(
            div()
                .class("post__comments")
                .children(comments(ctx, entry)),
        )
        .children(newsletter)
        .children(related_posts)
}

/// The sign-up form, as it looks in the given state.
pub fn newsletter_form(ctx: &RenderContext, state: &NewsletterForm) -> HtmlElement {
    let content: Vec<Element> = match state.status() {
        SubscriptionStatus::Idle => {
            let action = ctx.config().newsletter.as_ref().and_then(form_action);

            vec![section()
                .child(p().child(
                    "Get a once-per-month email with my latest article and additional \
                     details about my launches, products and experiments.",
                ))
                .child(
                    form()
                        .class("newsletter__form")
                        .attr("method", "post")
                        .attr("action", action)
                        .child(
                            div()
                                .class("newsletter__container")
                                .child(
                                    input()
                                        .class("newsletter__input")
                                        .attr("type", "email")
                                        .attr("name", "email")
                                        .attr("placeholder", "Email address")
                                        .attr("required", ""),
                                )
                                .child(div().class("newsletter__error").children(
                                    state.error().map(|err| span().child(err.to_string())),
                                )),
                        )
                        .child(
                            button()
                                .class("button")
                                .attr("type", "submit")
                                .child("Get updates"),
                        ),
                )
                .child(p().child(
                    "No spam, sales or ads. Unsubscribe as your heart desires.",
                ))
                .into()]
        }
        SubscriptionStatus::Success => vec![
            p().child("Thanks, but that's not all!").into(),
            p().child("You will receive an email in a moment asking you to ")
                .child(strong().child("confirm the address"))
                .child(" you entered. I can't send you anything if you don't :(")
                .into(),
            p().child("If the message did not arrive, check your SPAM and OFFERS folders.")
                .into(),
            signature(ctx, "To be read soon!").into(),
        ],
        SubscriptionStatus::Failed => vec![
            p().child("Oops! Something went wrong.").into(),
            p().child(
                "It looks like the newsletter service is having some problems. \
                 Please try again in a moment.",
            )
            .into(),
        ],
    };

    div().class("newsletter").children(content)
}

pub fn newsletter_confirm(ctx: &RenderContext) -> HtmlElement {
    div()
        .class("newsletter-confirm")
        .child(p().child("Thank you for subscribing to my newsletter!"))
        .child(p().child(
            "That means a lot to me. I hope it will be a good choice for you.",
        ))
        .child(p().child(
            "If you have questions or feedback for me in the meantime, I'm always \
             available on my email and social media profiles.",
        ))
        .child(contacts(ctx))
        .child(signature(ctx, "Enjoy reading,"))
}

fn signature(ctx: &RenderContext, closing: &str) -> HtmlElement {
    p().child(closing)
        .child(br())
        .child(ctx.config().author.name.as_str())
}

fn time() -> HtmlElement {
    HtmlElement::new("time")
}

#[cfg(test)]
mod tests {
    use auk::renderer::HtmlElementRenderer;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::config::SiteConfig;
    use crate::content::{ContentRepository, NewContentEntry, ReadTime};
    use crate::feed::assemble_feed;
    use crate::routes::RouteTable;
    use crate::taxonomy::TermLinks;
    use crate::theme::ColorMode;

    use super::*;

    fn render(element: &HtmlElement) -> String {
        HtmlElementRenderer::new().render_to_string(element).unwrap()
    }

    fn config() -> SiteConfig {
        SiteConfig::parse(indoc! {r#"
            base_url = "https://example.com"
            title = "Notes"
            copyright = "All rights reserved."

            [author]
            name = "Jane Doe"
            bio = "Writes software."
            photo = "/media/photo.jpg"

            [author.contacts]
            github = "janedoe"
            email = "jane@example.com"

            [[menu]]
            label = "Articles"
            path = "/blog"

            [newsletter]
            form_id = "1234"
        "#})
        .unwrap()
    }

    fn entry() -> ContentEntry {
        ContentEntry::new(NewContentEntry {
            slug: "/posts/hello".to_string(),
            title: "Hello".to_string(),
            description: "The first post.".to_string(),
            date: "2024-01-05".to_string(),
            category: "Notes".to_string(),
            tags: vec!["Rust".to_string()],
            read_time: ReadTime(3),
            body: "Some *text*.".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn with_context<T>(
        config: &SiteConfig,
        color_mode: ColorMode,
        f: impl FnOnce(&RenderContext) -> T,
    ) -> T {
        let content = ContentRepository::default();
        let links = TermLinks::for_entries(RouteTable::blog(), &[entry()]);
        let ctx = RenderContext {
            config,
            routes: &RouteTable::blog(),
            links: &links,
            content: &content,
            timezone: chrono_tz::Tz::UTC,
            color_mode,
            comments: None,
            badges: None,
        };

        f(&ctx)
    }

    #[test]
    fn test_contact_href() {
        assert_eq!(contact_href("email", "jane@example.com"), "mailto:jane@example.com");
        assert_eq!(contact_href("github", "janedoe"), "https://github.com/janedoe");
        assert_eq!(
            contact_href("github", "https://github.com/other"),
            "https://github.com/other"
        );
        assert_eq!(contact_href("rss", "/rss.xml"), "/rss.xml");
    }

    #[test]
    fn test_layout_writes_color_mode() {
        let config = config();

        let rendered = with_context(&config, ColorMode::Light, |ctx| {
            render(&layout(
                ctx,
                PageMeta::new("Hello — Notes", "The first post.")
                    .social_image(Some("/media/hello.png")),
                false,
                div(),
            ))
        });

        assert!(rendered.contains(r#"class="light""#));
        assert!(rendered.contains("<title>Hello — Notes</title>"));
        assert!(rendered.contains(r#"content="https://example.com/media/hello.png""#));
        assert!(rendered.contains("https://github.com/janedoe"));
        assert!(rendered.contains("<h2"));
    }

    #[test]
    fn test_feed_item_markup() {
        let entry = entry();
        let links = TermLinks::for_entries(RouteTable::blog(), std::slice::from_ref(&entry));
        let items = assemble_feed([&entry], chrono_tz::Tz::UTC, &links);

        let rendered = render(&feed(&items));

        assert!(rendered.contains(r#"datetime="2024-01-05""#));
        assert!(rendered.contains("January 5, 2024"));
        assert!(rendered.contains(r#"href="/blog/category/notes""#));
        assert!(rendered.contains(r#"href="/blog/tag/rust""#));
        assert!(rendered.contains("3 min read"));
    }

    #[test]
    fn test_terms_without_listing_are_not_linked() {
        let entry = entry();
        let links = TermLinks::for_entries(RouteTable::blog(), &[]);
        let items = assemble_feed([&entry], chrono_tz::Tz::UTC, &links);

        let rendered = render(&feed(&items));

        assert!(rendered.contains("Notes"));
        assert!(rendered.contains("Rust"));
        assert!(!rendered.contains("/blog/category/"));
        assert!(!rendered.contains("/blog/tag/"));
    }

    #[test]
    fn test_pagination_nav() {
        let first = Pagination::resolve("/blog", 25, 10, 0).unwrap();

        let rendered = render(&pagination_nav(&first));

        assert!(rendered.contains(r#"href="/blog/1""#));
        assert!(rendered.contains("pagination__link--disabled"));
    }

    #[test]
    fn test_post_markup() {
        let config = config();
        let entry = entry();

        let rendered = with_context(&config, ColorMode::Dark, |ctx| {
            render(&post(ctx, &entry, &[]))
        });

        assert!(rendered.contains("Jan 5, 2024"));
        assert!(rendered.contains("All rights reserved."));
        assert!(rendered.contains("<em>text</em>"));
        assert!(rendered.contains(r#"href="/blog/tag/rust""#));
        assert!(rendered.contains(r#"action="https://api.convertkit.com/v3/forms/1234/subscribe""#));
        assert!(!rendered.contains("Related articles"));
    }

    #[test]
    fn test_newsletter_form_states() {
        let config = config();

        let idle = with_context(&config, ColorMode::Dark, |ctx| {
            render(&newsletter_form(ctx, &NewsletterForm::new()))
        });
        assert!(idle.contains(r#"placeholder="Email address""#));
        assert!(idle.contains("Get updates"));

        let confirm = with_context(&config, ColorMode::Dark, |ctx| {
            render(&newsletter_confirm(ctx))
        });
        assert!(confirm.contains("Jane Doe"));
        assert!(confirm.contains("mailto:jane@example.com"));
    }
}
