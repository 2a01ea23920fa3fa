use std::collections::BTreeSet;

use auk::renderer::HtmlElementRenderer;
use auk::*;

use crate::permalink::Permalink;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct SitemapEntry {
    pub permalink: Permalink,
    /// A W3C date (`YYYY-MM-DD`), when the route has one.
    pub updated_at: Option<String>,
}

const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Renders `sitemap.xml`, with the entries deduplicated and in sorted order.
pub fn render_sitemap(
    entries: impl IntoIterator<Item = SitemapEntry>,
) -> Result<String, std::fmt::Error> {
    let entries = entries.into_iter().collect::<BTreeSet<_>>();

    let rendered = HtmlElementRenderer::new().render_to_string(&sitemap_template(entries))?;

    Ok(format!("{XML_PROLOG}\n{rendered}"))
}

fn sitemap_template(entries: impl IntoIterator<Item = SitemapEntry>) -> HtmlElement {
    urlset()
        .attr("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9")
        .children(entries.into_iter().map(|entry| {
            url().child(loc().child(entry.permalink.as_str())).children(
                entry
                    .updated_at
                    .as_ref()
                    .map(|updated_at| lastmod().child(updated_at.as_str())),
            )
        }))
}

fn urlset() -> HtmlElement {
    HtmlElement::new("urlset")
}

fn url() -> HtmlElement {
    HtmlElement::new("url")
}

fn loc() -> HtmlElement {
    HtmlElement::new("loc")
}

fn lastmod() -> HtmlElement {
    HtmlElement::new("lastmod")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sitemap() {
        let entry = |path: &str, updated_at: Option<&str>| SitemapEntry {
            permalink: Permalink::from_path("https://example.com", path).unwrap(),
            updated_at: updated_at.map(ToString::to_string),
        };

        let sitemap = render_sitemap([
            entry("/posts/hello", Some("2024-01-05")),
            entry("/blog", None),
            entry("/blog", None),
        ])
        .unwrap();

        assert!(sitemap.starts_with(XML_PROLOG));
        assert_eq!(sitemap.matches("<url>").count(), 2);
        assert!(sitemap.contains("<loc>https://example.com/blog/</loc>"));
        assert!(sitemap.contains("<lastmod>2024-01-05</lastmod>"));
        assert!(
            sitemap.find("https://example.com/blog/").unwrap()
                < sitemap.find("https://example.com/posts/hello/").unwrap()
        );
    }
}
