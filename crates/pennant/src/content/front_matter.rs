use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::content::EntryKind;

static TOML_REGEX: OnceLock<Regex> = OnceLock::new();

fn toml_regex() -> &'static Regex {
    TOML_REGEX.get_or_init(|| {
        let pattern = r"^[[:space:]]*\+\+\+(\r?\n(?s).*?(?-s))\+\+\+[[:space:]]*(?:$|(?:\r?\n((?s).*(?-s))$))";
        Regex::new(pattern).expect("failed to compile regex for TOML front matter")
    })
}

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing `+++` delimited front matter")]
    Missing,

    #[error("invalid front matter: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug)]
pub struct RawTomlFrontMatter<'a>(&'a str);

impl RawTomlFrontMatter<'_> {
    fn deserialize<T>(&self) -> Result<T, toml::de::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        toml::from_str(self.0)
    }
}

/// Splits `content` into its deserialized front matter and the remaining body.
pub fn parse_front_matter<T>(content: &str) -> Result<(T, &str), FrontMatterError>
where
    T: serde::de::DeserializeOwned,
{
    let captures = toml_regex()
        .captures(content)
        .ok_or(FrontMatterError::Missing)?;

    let front_matter = RawTomlFrontMatter(captures.get(1).map_or("", |m| m.as_str()));
    let body = captures.get(2).map_or("", |m| m.as_str());

    Ok((front_matter.deserialize()?, body))
}

/// The front matter of a post or page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntryFrontMatter {
    pub title: String,
    #[serde(deserialize_with = "from_toml_datetime")]
    pub date: String,
    #[serde(default)]
    pub template: EntryKind,
    #[serde(default)]
    pub draft: bool,
    pub slug: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub social_image: Option<String>,
}

/// Accepts both TOML datetimes (`date = 2024-01-05`) and quoted strings.
pub fn from_toml_datetime<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DatetimeOrString {
        Datetime(toml::value::Datetime),
        String(String),
    }

    Ok(match DatetimeOrString::deserialize(deserializer)? {
        DatetimeOrString::Datetime(datetime) => datetime.to_string(),
        DatetimeOrString::String(string) => string,
    })
}
