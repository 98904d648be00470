//! Links - keyword search against parts and video sites
//!
//! Builds a search URL, fetches the results page and keeps the first
//! [`MAX_LINKS`] anchors whose `href` matches the source's pattern, in
//! document order.

use crate::error::Result;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Maximum links returned per source
pub const MAX_LINKS: usize = 3;

/// Site to search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSource {
    /// Parts retailer product pages
    Parts,
    /// Video platform watch pages
    Video,
}

impl LinkSource {
    fn search_path(&self) -> &'static str {
        match self {
            Self::Parts => "/search",
            Self::Video => "/results",
        }
    }

    fn query_param(&self) -> &'static str {
        match self {
            Self::Parts => "q",
            Self::Video => "search_query",
        }
    }

    fn query_suffix(&self) -> &'static str {
        match self {
            Self::Parts => "",
            Self::Video => " car repair tutorial",
        }
    }

    /// Whether an anchor target points at a result page
    #[must_use]
    pub fn matches(&self, href: &str) -> bool {
        match self {
            Self::Parts => href.contains("/detail/"),
            Self::Video => href.starts_with("/watch"),
        }
    }
}

/// Site origins to search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Parts retailer origin
    #[serde(default = "default_parts_base_url")]
    pub parts_base_url: String,
    /// Video platform origin
    #[serde(default = "default_video_base_url")]
    pub video_base_url: String,
}

fn default_parts_base_url() -> String {
    "https://www.oreillyauto.com".to_string()
}

fn default_video_base_url() -> String {
    "https://www.youtube.com".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parts_base_url: default_parts_base_url(),
            video_base_url: default_video_base_url(),
        }
    }
}

impl SearchConfig {
    /// Origin for the given source, without trailing slash
    #[must_use]
    pub fn base_url(&self, source: LinkSource) -> &str {
        let base = match source {
            LinkSource::Parts => &self.parts_base_url,
            LinkSource::Video => &self.video_base_url,
        };
        base.trim_end_matches('/')
    }
}

/// Links gathered from both sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkSet {
    /// Parts retailer links
    pub parts: Vec<String>,
    /// Video links
    pub videos: Vec<String>,
}

impl LinkSet {
    /// Whether neither source produced a link
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.videos.is_empty()
    }

    /// Plain-text block suitable for appending to a guide
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if !self.parts.is_empty() {
            out.push_str("🛒 Parts:\n");
            for link in &self.parts {
                out.push_str("- ");
                out.push_str(link);
                out.push('\n');
            }
        }
        if !self.videos.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("🎥 Videos:\n");
            for link in &self.videos {
                out.push_str("- ");
                out.push_str(link);
                out.push('\n');
            }
        }
        out
    }
}

/// Absolute URLs of the first matching anchors in `html`
#[must_use]
pub fn extract_links(html: &str, source: LinkSource, base_url: &str) -> Vec<String> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&anchors)
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| source.matches(href))
        .take(MAX_LINKS)
        .map(|href| format!("{base_url}{href}"))
        .collect()
}

/// Fetches search result pages and extracts candidate links
#[derive(Debug, Clone)]
pub struct LinkFinder {
    client: Client,
    config: SearchConfig,
}

impl LinkFinder {
    /// Create a finder for the given sites
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        let client = Client::builder()
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Site origins in use
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search URL for `query` on `source`
    pub fn search_url(&self, query: &str, source: LinkSource) -> Result<Url> {
        let endpoint = format!("{}{}", self.config.base_url(source), source.search_path());
        let term = format!("{query}{}", source.query_suffix());
        Ok(Url::parse_with_params(
            &endpoint,
            &[(source.query_param(), term.as_str())],
        )?)
    }

    async fn fetch(&self, query: &str, source: LinkSource) -> Result<String> {
        let url = self.search_url(query, source)?;
        debug!("Fetching {:?} search page: {}", source, url);

        let body = self.client.get(url).send().await?.text().await?;
        Ok(body)
    }

    /// Up to [`MAX_LINKS`] result links; empty when the page cannot be fetched
    pub async fn find_links(&self, query: &str, source: LinkSource) -> Vec<String> {
        match self.fetch(query, source).await {
            Ok(html) => extract_links(&html, source, self.config.base_url(source)),
            Err(e) => {
                warn!("{:?} link search failed: {}", source, e);
                Vec::new()
            }
        }
    }

    /// Parts links, then video links, fetched one after the other
    pub async fn enrich(&self, query: &str) -> LinkSet {
        let parts = self.find_links(query, LinkSource::Parts).await;
        let videos = self.find_links(query, LinkSource::Video).await;
        LinkSet { parts, videos }
    }
}
