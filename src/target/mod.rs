//! Target identifiers and site URL handling
//!
//! A target identifier is the final path segment of a `/biz/<id>` URL. This
//! module owns the mapping in both directions: links found in payloads are
//! parsed into identifiers, and identifiers are expanded into the endpoint
//! URLs the fetcher requests.

mod link;

pub use link::target_from_link;

use crate::config::SiteConfig;
use crate::{ConfigError, TargetError, TargetResult};
use std::fmt;
use url::Url;

/// Path segment that precedes every target identifier
pub const TARGET_SEGMENT: &str = "biz";

/// Canonical key naming one crawl target
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(String);

impl TargetId {
    /// Creates an identifier, rejecting values that cannot be a single path segment
    ///
    /// # Examples
    ///
    /// ```
    /// use canary::TargetId;
    ///
    /// assert!(TargetId::new("golden-gate-bakery-san-francisco").is_ok());
    /// assert!(TargetId::new("").is_err());
    /// assert!(TargetId::new("a/b").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> TargetResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(TargetError::Empty);
        }
        if value
            .chars()
            .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
        {
            return Err(TargetError::Invalid(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Catalog endpoint variant for a by-name item fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishKind {
    Food,
    Drink,
}

impl DishKind {
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Drink => "drink",
        }
    }
}

/// The source site: where targets live and how their endpoints are shaped
#[derive(Debug, Clone)]
pub struct Site {
    origin: Url,
    entity_type: String,
    link_key: String,
}

impl Site {
    /// Builds a site from its configuration section
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let origin = Url::parse(&config.origin)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.origin, e)))?;

        Ok(Self {
            origin,
            entity_type: config.entity_type.clone(),
            link_key: config.link_key.clone(),
        })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Declared type of the embedded structured-data block to select
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Payload key whose values carry target links
    pub fn link_key(&self) -> &str {
        &self.link_key
    }

    /// Relative prefix that marks a link as site-local
    pub fn link_prefix(&self) -> String {
        format!("/{}", TARGET_SEGMENT)
    }

    /// `<origin>/biz/<id>`, the page document
    pub fn page_url(&self, id: &TargetId) -> TargetResult<Url> {
        self.join(&format!("/{}/{}", TARGET_SEGMENT, id))
    }

    /// `<origin>/biz/<id>/props`, the auxiliary structured payload
    pub fn props_url(&self, id: &TargetId) -> TargetResult<Url> {
        self.join(&format!("/{}/{}/props", TARGET_SEGMENT, id))
    }

    /// `<origin>/popular_dish/<id>/<food|drink>/<encoded name>`
    pub fn dish_by_name_url(
        &self,
        id: &TargetId,
        kind: DishKind,
        encoded_name: &str,
    ) -> TargetResult<Url> {
        self.join(&format!(
            "/popular_dish/{}/{}/{}",
            id,
            kind.as_path(),
            encoded_name
        ))
    }

    /// `<origin>/popular_dish/<business id>/menu/<slug>`
    pub fn dish_by_menu_url(&self, business_id: &str, slug: &str) -> TargetResult<Url> {
        self.join(&format!("/popular_dish/{}/menu/{}", business_id, slug))
    }

    fn join(&self, path: &str) -> TargetResult<Url> {
        self.origin
            .join(path)
            .map_err(|e| TargetError::Parse(format!("{}: {}", path, e)))
    }
}
