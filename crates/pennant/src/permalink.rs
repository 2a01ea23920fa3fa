use std::str::FromStr;

use url::Url;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Permalink(Url);

impl Permalink {
    /// Resolves a site-relative path against the site's base URL.
    ///
    /// Paths that look like files (`sitemap.xml`, `photo.jpg`) are left as-is,
    /// everything else gets a trailing slash.
    pub fn from_path(base_url: &str, path: &str) -> Result<Self, url::ParseError> {
        let path = path.trim_start_matches('/');
        let is_file = path
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment.contains('.'));

        let suffix = if path.ends_with('/') || path.is_empty() || is_file {
            ""
        } else {
            "/"
        };
        let base_url = base_url.trim_end_matches('/');

        Url::from_str(&format!("{base_url}/{path}{suffix}")).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }
}
