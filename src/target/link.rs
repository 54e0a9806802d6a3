use crate::target::{Site, TargetId, TARGET_SEGMENT};
use crate::{TargetError, TargetResult};
use url::Url;

/// Parses a link value into the target identifier it points at
///
/// # Resolution Steps
///
/// 1. A value starting with the site's link prefix (`/biz`) is resolved
///    against the site origin; anything else must be an absolute http(s) URL
/// 2. The path is scanned for the first `biz/<segment>` pair
/// 3. `<segment>` becomes the identifier; query strings and fragments never
///    reach it because they are not part of the path
///
/// # Examples
///
/// ```
/// use canary::config::SiteConfig;
/// use canary::target::{target_from_link, Site};
///
/// let site = Site::from_config(&SiteConfig::default()).unwrap();
/// let id = target_from_link(&site, "/biz/example-ny?osq=x").unwrap();
/// assert_eq!(id.as_str(), "example-ny");
/// ```
pub fn target_from_link(site: &Site, value: &str) -> TargetResult<TargetId> {
    let value = value.trim();
    let url = resolve(site, value)?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();

    segments
        .windows(2)
        .find(|pair| pair[0] == TARGET_SEGMENT && !pair[1].is_empty())
        .map(|pair| TargetId::new(pair[1]))
        .unwrap_or_else(|| Err(TargetError::NoTargetPath(value.to_string())))
}

fn resolve(site: &Site, value: &str) -> TargetResult<Url> {
    if value.starts_with(&site.link_prefix()) {
        return site
            .origin()
            .join(value)
            .map_err(|e| TargetError::Parse(format!("{}: {}", value, e)));
    }

    let url = Url::parse(value).map_err(|e| TargetError::Parse(format!("{}: {}", value, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(TargetError::Parse(format!(
            "unsupported scheme '{}' in {}",
            url.scheme(),
            value
        )));
    }
    Ok(url)
}
