//! Link discovery over payloads of unknown shape
//!
//! The auxiliary payload embeds links to other targets at arbitrary depths
//! (related businesses, "people also viewed", search links). Rather than
//! modelling every place they can appear, the payload is walked as a plain
//! tree and every string under the configured link key is tried as a target
//! link.

use crate::target::{target_from_link, Site, TargetId};
use serde_json::Value;
use std::collections::HashSet;

/// Finds every target identifier reachable from `payload`
///
/// Leaves are visited depth-first. A leaf contributes when its key equals the
/// site's link key and its value is a string that parses as a target link;
/// malformed values are skipped without stopping the walk. Array elements
/// have no key of their own and only contribute through nested objects.
///
/// The result is deduplicated and keeps first-seen order.
///
/// # Example
///
/// ```
/// use canary::config::SiteConfig;
/// use canary::discovery::discover_targets;
/// use canary::Site;
/// use serde_json::json;
///
/// let site = Site::from_config(&SiteConfig::default()).unwrap();
/// let payload = json!({"a": {"businessUrl": "/biz/example-ny?osq=x"}});
/// let found = discover_targets(&payload, &site);
/// assert_eq!(found[0].as_str(), "example-ny");
/// ```
pub fn discover_targets(payload: &Value, site: &Site) -> Vec<TargetId> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    walk(payload, None, &mut |key, value| {
        if key != site.link_key() {
            return;
        }
        let Value::String(link) = value else {
            return;
        };
        match target_from_link(site, link) {
            Ok(id) => {
                if seen.insert(id.clone()) {
                    found.push(id);
                }
            }
            Err(e) => tracing::debug!("Skipping link {:?}: {}", link, e),
        }
    });

    found
}

/// Depth-first traversal calling `visit(key, leaf)` for every keyed scalar
fn walk<'a, F>(node: &'a Value, key: Option<&'a str>, visit: &mut F)
where
    F: FnMut(&'a str, &'a Value),
{
    match node {
        Value::Object(map) => {
            for (child_key, child) in map {
                walk(child, Some(child_key.as_str()), visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, None, visit);
            }
        }
        scalar => {
            if let Some(key) = key {
                visit(key, scalar);
            }
        }
    }
}
