use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::content::AVERAGE_ADULT_WPM;
use crate::routes::RouteScheme;
use crate::theme::ColorMode;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid site config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown timezone '{name}': {reason}")]
    InvalidTimezone { name: String, reason: String },

    #[error("`posts_per_page` must be at least 1")]
    ZeroPostsPerPage,

    #[error("invalid `base_url`: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// The contents of `site.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub base_url: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
    #[serde(default = "default_related_posts")]
    pub related_posts: usize,
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: usize,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub routes: RouteScheme,
    pub color_mode: Option<ColorMode>,
    pub author: AuthorConfig,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    pub comments: Option<CommentsConfig>,
    pub newsletter: Option<NewsletterConfig>,
    pub certifications: Option<CertificationsConfig>,
    pub collaboration: Option<CollaborationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorConfig {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    pub photo: Option<String>,
    /// Contact links, keyed by service name, in the order they are listed.
    #[serde(default)]
    pub contacts: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsConfig {
    pub repo: String,
    #[serde(default)]
    pub issue_term: crate::embed::IssueTerm,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterConfig {
    #[serde(default = "default_newsletter_endpoint")]
    pub endpoint: String,
    pub form_id: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_newsletter_path")]
    pub path: String,
    #[serde(default = "default_newsletter_confirm_path")]
    pub confirm_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CertificationsConfig {
    pub badge_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollaborationConfig {
    pub email: String,
    /// Paragraphs shown above the contact details.
    #[serde(default)]
    pub intro: Vec<String>,
    pub report_url: Option<String>,
    #[serde(default = "default_report_label")]
    pub report_label: String,
    #[serde(default)]
    pub partners: Vec<PartnerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartnerConfig {
    pub name: String,
    pub url: String,
    pub logo: Option<String>,
}

fn default_report_label() -> String {
    "Get the traffic report".to_string()
}

fn default_posts_per_page() -> usize {
    4
}

fn default_related_posts() -> usize {
    2
}

fn default_words_per_minute() -> usize {
    AVERAGE_ADULT_WPM
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_newsletter_endpoint() -> String {
    "https://api.convertkit.com/v3/forms/".to_string()
}

fn default_newsletter_path() -> String {
    "/newsletter".to_string()
}

fn default_newsletter_confirm_path() -> String {
    "/newsletter/confirm".to_string()
}

impl SiteConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::parse(&contents)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Returns the timezone dates are displayed in.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| ConfigError::InvalidTimezone {
                name: self.timezone.clone(),
                reason: err.to_string(),
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.posts_per_page == 0 {
            return Err(ConfigError::ZeroPostsPerPage);
        }

        url::Url::parse(&self.base_url)?;
        self.timezone()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::embed::IssueTerm;

    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = SiteConfig::parse(indoc! {r#"
            base_url = "https://example.com"
            title = "Notes"

            [author]
            name = "Jane Doe"
        "#})
        .unwrap();

        assert_eq!(config.posts_per_page, 4);
        assert_eq!(config.related_posts, 2);
        assert_eq!(config.words_per_minute, AVERAGE_ADULT_WPM);
        assert_eq!(config.routes, RouteScheme::Blog);
        assert_eq!(config.timezone().unwrap(), Tz::UTC);
        assert!(config.comments.is_none());
        assert!(config.menu.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = SiteConfig::parse(indoc! {r#"
            base_url = "https://example.com"
            title = "Notes"
            subtitle = "Writing about software"
            posts_per_page = 10
            timezone = "Europe/Warsaw"
            routes = "root"
            color_mode = "light"

            [author]
            name = "Jane Doe"
            bio = "Engineer"

            [author.contacts]
            github = "janedoe"
            email = "jane@example.com"

            [[menu]]
            label = "Articles"
            path = "/"

            [comments]
            repo = "janedoe/comments"
            issue_term = "pathname"

            [newsletter]
            form_id = "1234"

            [certifications]
            badge_id = "abc"
        "#})
        .unwrap();

        assert_eq!(config.routes, RouteScheme::Root);
        assert_eq!(config.color_mode, Some(ColorMode::Light));
        assert_eq!(config.timezone().unwrap(), Tz::Europe__Warsaw);
        assert_eq!(
            config.author.contacts.keys().collect::<Vec<_>>(),
            vec!["github", "email"]
        );
        assert_eq!(
            config.menu,
            vec![MenuItem {
                label: "Articles".to_string(),
                path: "/".to_string()
            }]
        );
        assert_eq!(
            config.comments.map(|comments| comments.issue_term),
            Some(IssueTerm::Pathname)
        );

        let newsletter = config.newsletter.unwrap();
        assert_eq!(newsletter.endpoint, "https://api.convertkit.com/v3/forms/");
        assert_eq!(newsletter.path, "/newsletter");
        assert_eq!(newsletter.form_id.as_deref(), Some("1234"));
    }

    #[test]
    fn test_collaboration_config() {
        let config = SiteConfig::parse(indoc! {r#"
            base_url = "https://example.com"
            title = "Notes"

            [author]
            name = "Jane Doe"

            [collaboration]
            email = "jane@example.com"
            intro = ["Open to sponsored reviews."]

            [[collaboration.partners]]
            name = "Acme"
            url = "https://acme.example"
            logo = "/media/acme.png"

            [[collaboration.partners]]
            name = "Globex"
            url = "https://globex.example"
        "#})
        .unwrap();

        let collaboration = config.collaboration.unwrap();
        assert_eq!(collaboration.intro, vec!["Open to sponsored reviews."]);
        assert_eq!(collaboration.report_label, "Get the traffic report");
        assert_eq!(
            collaboration.partners,
            vec![
                PartnerConfig {
                    name: "Acme".to_string(),
                    url: "https://acme.example".to_string(),
                    logo: Some("/media/acme.png".to_string()),
                },
                PartnerConfig {
                    name: "Globex".to_string(),
                    url: "https://globex.example".to_string(),
                    logo: None,
                },
            ]
        );
    }

    #[test]
    fn test_invalid_config() {
        let base = indoc! {r#"
            base_url = "https://example.com"
            title = "Notes"
            [author]
            name = "Jane Doe"
        "#};

        assert!(matches!(
            SiteConfig::parse(&format!("posts_per_page = 0\n{base}")),
            Err(ConfigError::ZeroPostsPerPage)
        ));
        assert!(matches!(
            SiteConfig::parse(&format!("timezone = \"Mars/Olympus\"\n{base}")),
            Err(ConfigError::InvalidTimezone { .. })
        ));
        assert!(matches!(
            SiteConfig::parse("title = \"Missing base url\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
