//! Poster and backdrop URLs on the TMDB image host.

use std::fmt;

use url::Url;

/// Base of every image URL.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Rendition requested from the image host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    /// 500 px wide, used for posters in lists.
    #[default]
    W500,
    /// Full-size original, used for backdrops.
    Original,
}

impl ImageSize {
    /// Path segment understood by the image host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the URL of an image.
///
/// Returns `None` when `path` is missing, blank, or would leave the image
/// host, so callers render a placeholder instead.
#[must_use]
pub fn image_url(path: Option<&str>, size: ImageSize) -> Option<Url> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let relative = path.trim_start_matches('/');
    let url = Url::parse(IMAGE_BASE_URL)
        .and_then(|base| base.join(&format!("{size}/{relative}")))
        .ok()?;
    (url.host_str() == Some("image.tmdb.org")).then_some(url)
}
