//! Full-page templates, one per kind of route.

use auk::*;

use crate::components::{
    feed, layout, newsletter_confirm, newsletter_form, page, pagination_nav, post, PageMeta,
};
use crate::config::{CollaborationConfig, PartnerConfig};
use crate::embed::EmbedContainer;
use crate::newsletter::NewsletterForm;
use crate::render::{
    RenderContext, RenderEntryContext, RenderListingContext, RenderTaxonomyContext,
};
use crate::taxonomy::TaxonomyKind;

/// Returns the `<title>` for a page of a listing.
///
/// The first page is titled with the label alone; later pages include their number.
pub fn listing_title(label: &str, current_page: usize, site_title: &str) -> String {
    if current_page > 0 {
        format!("{label} - Page {current_page} — {site_title}")
    } else {
        format!("{label} — {site_title}")
    }
}

fn titled(label: &str, site_title: &str) -> String {
    format!("{label} — {site_title}")
}

/// The blog index: every post, newest first.
pub fn blog_template(ctx: &RenderListingContext) -> HtmlElement {
    let config = ctx.config();
    let page_title = if ctx.pagination.current_page > 0 {
        listing_title("Posts", ctx.pagination.current_page, &config.title)
    } else {
        config.title.clone()
    };

    layout(
        ctx,
        PageMeta::new(page_title, &config.subtitle),
        true,
        page(
            "Articles",
            [
                feed(&ctx.feed).into(),
                pagination_nav(&ctx.pagination).into(),
            ],
        ),
    )
}

/// A single category or tag, with the posts that carry it.
pub fn term_template(ctx: &RenderListingContext) -> HtmlElement {
    let config = ctx.config();
    let label = ctx.label.unwrap_or_default();

    layout(
        ctx,
        PageMeta::new(
            listing_title(label, ctx.pagination.current_page, &config.title),
            &config.subtitle,
        ),
        false,
        page(
            label,
            [
                feed(&ctx.feed).into(),
                pagination_nav(&ctx.pagination).into(),
            ],
        ),
    )
}

/// Every category or every tag, with the number of posts in each.
pub fn taxonomy_list_template(ctx: &RenderTaxonomyContext) -> HtmlElement {
    let config = ctx.config();
    let routes = ctx.routes();
    let kind = ctx.taxonomy.kind();
    let heading = match kind {
        TaxonomyKind::Category => "Categories",
        TaxonomyKind::Tag => "Tags",
    };

    let list = ul().children(ctx.taxonomy.groups().iter().map(|group| {
        let path = match kind {
            TaxonomyKind::Category => routes.category_path(&group.slug),
            TaxonomyKind::Tag => routes.tag_path(&group.slug),
        };

        li().child(
            a().href(path)
                .child(format!("{} ({})", group.label, group.count)),
        )
    }));

    layout(
        ctx,
        PageMeta::new(titled(heading, &config.title), &config.subtitle),
        false,
        page(heading, [list.into()]),
    )
}

pub fn post_template(ctx: &RenderEntryContext) -> HtmlElement {
    let config = ctx.config();
    let entry = ctx.entry;
    let description = if entry.description().is_empty() {
        config.subtitle.as_str()
    } else {
        entry.description()
    };

    layout(
        ctx,
        PageMeta::new(titled(entry.title(), &config.title), description)
            .social_image(entry.social_image()),
        false,
        post(ctx, entry, &ctx.related),
    )
}

/// A standalone page: its title and its rendered body.
pub fn page_template(ctx: &RenderEntryContext) -> HtmlElement {
    let config = ctx.config();
    let entry = ctx.entry;
    let description = if entry.description().is_empty() {
        config.subtitle.as_str()
    } else {
        entry.description()
    };

    layout(
        ctx,
        PageMeta::new(titled(entry.title(), &config.title), description)
            .social_image(entry.social_image()),
        false,
        page(entry.title(), ctx.render_markdown(entry.body())),
    )
}

pub fn not_found_template(ctx: &RenderContext) -> HtmlElement {
    let config = ctx.config();

    layout(
        ctx,
        PageMeta::new(titled("Not Found", &config.title), &config.subtitle),
        false,
        page(
            "NOT FOUND",
            [p().child("You just hit a route that doesn't exist... the sadness.")
                .into()],
        ),
    )
}

/// Sends readers from the home page to the blog index.
pub fn home_redirect_template(ctx: &RenderContext) -> HtmlElement {
    let config = ctx.config();
    let index = ctx.routes().index();

    html()
        .attr("lang", "en")
        .class(ctx.color_mode().as_str())
        .child(
            head()
                .child(meta().attr("charset", "utf-8"))
                .child(title().child(config.title.as_str()))
                .child(
                    meta()
                        .attr("name", "description")
                        .attr("content", config.subtitle.as_str()),
                )
                .child(
                    meta()
                        .attr("http-equiv", "refresh")
                        .attr("content", format!("0; url={index}")),
                )
                .children(
                    ctx.permalink(index)
                        .map(|permalink| link().rel("canonical").href(permalink.as_str())),
                ),
        )
        .child(body().child(a().href(index).child(config.title.as_str())))
}

pub fn newsletter_template(ctx: &RenderContext, form: &NewsletterForm) -> HtmlElement {
    let config = ctx.config();

    layout(
        ctx,
        PageMeta::new(titled("Newsletter", &config.title), &config.subtitle),
        false,
        page("Newsletter", [newsletter_form(ctx, form).into()]),
    )
}

pub fn newsletter_confirm_template(ctx: &RenderContext) -> HtmlElement {
    let config = ctx.config();

    layout(
        ctx,
        PageMeta::new(titled("Newsletter", &config.title), &config.subtitle),
        false,
        page("Newsletter", [newsletter_confirm(ctx).into()]),
    )
}

pub fn collaboration_template(
    ctx: &RenderContext,
    collaboration: &CollaborationConfig,
) -> HtmlElement {
    let config = ctx.config();

    let report = collaboration.report_url.as_deref().map(|report_url| {
        a().class("button")
            .attr("target", "_blank")
            .href(report_url)
            .child(collaboration.report_label.as_str())
    });

    let content = section()
        .class("collaboration")
        .children(
            collaboration
                .intro
                .iter()
                .map(|paragraph| p().child(paragraph.as_str())),
        )
        .children(report)
        .child(hr())
        .child(
            p().child("Questions and proposals: ")
                .child(
                    a().href(format!("mailto:{}", collaboration.email))
                        .child(collaboration.email.as_str()),
                )
                .child("."),
        );

    layout(
        ctx,
        PageMeta::new(titled("Collaboration", &config.title), &config.subtitle),
        false,
        page(
            "Collaboration",
            [
                Some::<Element>(content.into()),
                partners(&collaboration.partners).map(Into::into),
            ]
            .into_iter()
            .flatten(),
        ),
    )
}

/// The partner logos, when there are any.
fn partners(partners: &[PartnerConfig]) -> Option<HtmlElement> {
    if partners.is_empty() {
        return None;
    }

    Some(
        section()
            .class("partners")
            .child(h2().child("Partners"))
            .child(div().class("partners__list").children(partners.iter().map(
                |partner| {
                    let label = match partner.logo.as_deref() {
                        Some(logo) => img()
                            .attr("src", logo)
                            .attr("alt", partner.name.as_str()),
                        None => span().child(partner.name.as_str()),
                    };

                    a().class("partners__item")
                        .href(partner.url.as_str())
                        .child(label)
                },
            ))),
    )
}

pub fn certifications_template(ctx: &RenderContext) -> HtmlElement {
    let config = ctx.config();
    let container = EmbedContainer::new("credly-badge-container", ctx.color_mode());

    layout(
        ctx,
        PageMeta::new(titled("Certifications", &config.title), &config.subtitle),
        false,
        page(
            "Certifications",
            ctx.badges()
                .map(|badges| -> Element { badges.render(&container).into() }),
        ),
    )
}
