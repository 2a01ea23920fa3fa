//! Third-party widgets that load in the reader's browser.
//!
//! Rendering code only ever sees an [`ExternalEmbed`], which turns a container
//! into the markup the widget needs to bootstrap itself.

use auk::*;
use serde::Deserialize;

use crate::theme::ColorMode;

/// Where an embed is mounted, and what it knows about the surrounding page.
#[derive(Debug, Clone, Copy)]
pub struct EmbedContainer<'a> {
    pub id: &'a str,
    pub color_mode: ColorMode,
    pub page_path: Option<&'a str>,
    pub page_title: Option<&'a str>,
}

impl<'a> EmbedContainer<'a> {
    pub fn new(id: &'a str, color_mode: ColorMode) -> Self {
        Self {
            id,
            color_mode,
            page_path: None,
            page_title: None,
        }
    }

    pub fn for_page(mut self, path: &'a str, title: &'a str) -> Self {
        self.page_path = Some(path);
        self.page_title = Some(title);
        self
    }
}

/// A widget rendered from a container handle.
pub trait ExternalEmbed: Send + Sync {
    fn render(&self, container: &EmbedContainer) -> HtmlElement;
}

/// How Utterances maps a page to a GitHub issue.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueTerm {
    #[default]
    Title,
    Pathname,
    /// Uses the page's path as an explicit issue term, so it survives title edits.
    PagePath,
}

/// Comments backed by GitHub issues.
///
/// [utteranc.es](https://utteranc.es)
#[derive(Debug, Clone)]
pub struct Utterances {
    pub repo: String,
    pub issue_term: IssueTerm,
}

impl Utterances {
    pub fn new(repo: impl Into<String>, issue_term: IssueTerm) -> Self {
        Self {
            repo: repo.into(),
            issue_term,
        }
    }

    fn theme(color_mode: ColorMode) -> &'static str {
        match color_mode {
            ColorMode::Dark => "dark-blue",
            ColorMode::Light => "github-light",
        }
    }
}

impl ExternalEmbed for Utterances {
    fn render(&self, container: &EmbedContainer) -> HtmlElement {
        let issue_term = match self.issue_term {
            IssueTerm::Title => "title",
            IssueTerm::Pathname => "pathname",
            IssueTerm::PagePath => container.page_path.unwrap_or("pathname"),
        };

        div().id(container.id).child(
            script()
                .attr("src", "https://utteranc.es/client.js")
                .attr("repo", self.repo.as_str())
                .attr("issue-term", issue_term)
                .attr("theme", Self::theme(container.color_mode))
                .attr("crossorigin", "anonymous")
                .attr("async", ""),
        )
    }
}

/// A Credly badge.
#[derive(Debug, Clone)]
pub struct CredlyBadge {
    pub badge_id: String,
    pub width: u32,
    pub height: u32,
    pub host: String,
}

impl CredlyBadge {
    pub fn new(badge_id: impl Into<String>) -> Self {
        Self {
            badge_id: badge_id.into(),
            width: 150,
            height: 270,
            host: "https://www.credly.com".to_string(),
        }
    }
}

impl ExternalEmbed for CredlyBadge {
    fn render(&self, container: &EmbedContainer) -> HtmlElement {
        div()
            .id(container.id)
            .attr("data-iframe-width", self.width.to_string())
            .attr("data-iframe-height", self.height.to_string())
            .attr("data-share-badge-id", self.badge_id.as_str())
            .attr("data-share-badge-host", self.host.as_str())
            .child(
                script()
                    .attr("type", "text/javascript")
                    .attr("src", "//cdn.credly.com/assets/utilities/embed.js")
                    .attr("async", ""),
            )
    }
}

fn script() -> HtmlElement {
    HtmlElement::new("script")
}
