//! Catalog (menu) item sub-fetches
//!
//! Each menu entry is resolved through an ordered list of endpoint
//! strategies. The first strategy that answers wins. Only a failed request
//! moves on to the next strategy; a payload that answers but does not decode
//! ends the item. A failed item is kept with its title only so one bad entry
//! never sinks the whole record.

use crate::extract::document::MenuEntry;
use crate::extract::payload::DishPayload;
use crate::extract::record::{DishImage, DishReview, FoodItem};
use crate::fetcher::{FetchError, Fetcher};
use crate::target::{DishKind, Site, TargetId};
use crate::TargetError;
use futures::future::join_all;
use thiserror::Error;
use url::Url;

/// One way of reaching a catalog item's payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DishEndpoint {
    /// `/popular_dish/<business id>/menu/<slug>`, for entries with a direct link
    Menu { slug: String },
    /// `/popular_dish/<id>/<food|drink>/<encoded name>`
    ByName { kind: DishKind, encoded_name: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no endpoint strategy for catalog item")]
    NoStrategy,

    #[error("payload has no business id for menu endpoint")]
    MissingBusinessId,

    #[error("invalid catalog URL: {0}")]
    Url(#[from] TargetError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CatalogError {
    /// Whether the next endpoint strategy should be tried after this failure
    fn allows_fallback(&self) -> bool {
        matches!(
            self,
            Self::Fetch(FetchError::Http { .. } | FetchError::Status { .. })
        )
    }
}

/// Encodes an item name for the by-name endpoint
///
/// Lowercases, then maps spaces to `%20` and unescapes the entities the page
/// leaves in item titles.
///
/// ```
/// use canary::extract::encode_dish_name;
///
/// assert_eq!(encode_dish_name("Chicken Wings"), "chicken%20wings");
/// assert_eq!(encode_dish_name("Joe&#x27;s &amp; Co"), "joe's%20&%20co");
/// ```
pub fn encode_dish_name(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "%20")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
        .replace("&quot;", "%22")
}

/// Ordered strategies for one menu entry
///
/// A direct item URL is fetched through the menu endpoint only. Otherwise the
/// name is tried against the food endpoint first, since most entries are
/// food, then the drink endpoint.
pub fn strategies_for(entry: &MenuEntry) -> Vec<DishEndpoint> {
    if let Some(slug) = entry.url.as_deref().and_then(last_path_segment) {
        return vec![DishEndpoint::Menu {
            slug: slug.to_string(),
        }];
    }

    let encoded_name = encode_dish_name(&entry.title);
    vec![
        DishEndpoint::ByName {
            kind: DishKind::Food,
            encoded_name: encoded_name.clone(),
        },
        DishEndpoint::ByName {
            kind: DishKind::Drink,
            encoded_name,
        },
    ]
}

fn last_path_segment(url: &str) -> Option<&str> {
    url.split(['?', '#'])
        .next()?
        .rsplit('/')
        .find(|segment| !segment.is_empty())
}

/// Shared inputs for every sub-fetch of one target
pub struct CatalogContext<'a> {
    pub fetcher: &'a Fetcher,
    pub site: &'a Site,
    pub target: &'a TargetId,
    pub business_id: Option<&'a str>,
}

impl CatalogContext<'_> {
    fn endpoint_url(&self, endpoint: &DishEndpoint) -> Result<Url, CatalogError> {
        match endpoint {
            DishEndpoint::Menu { slug } => {
                let business_id = self.business_id.ok_or(CatalogError::MissingBusinessId)?;
                Ok(self.site.dish_by_menu_url(business_id, slug)?)
            }
            DishEndpoint::ByName { kind, encoded_name } => {
                Ok(self.site.dish_by_name_url(self.target, *kind, encoded_name)?)
            }
        }
    }

    /// Tries each strategy in order and returns the first payload
    ///
    /// Moves on only when the request itself failed. The error of the last
    /// attempted strategy is the one reported.
    pub async fn fetch_dish<'s>(
        &self,
        strategies: &'s [DishEndpoint],
    ) -> Result<(DishPayload, &'s DishEndpoint), CatalogError> {
        let referer = self.site.page_url(self.target)?;
        let mut last_error = CatalogError::NoStrategy;

        for endpoint in strategies {
            let attempt = async {
                let url = self.endpoint_url(endpoint)?;
                let payload: DishPayload = self.fetcher.fetch_json(&url, &referer).await?;
                Ok::<_, CatalogError>(payload)
            };

            match attempt.await {
                Ok(payload) => return Ok((payload, endpoint)),
                Err(e) if !e.allows_fallback() => return Err(e),
                Err(e) => {
                    tracing::debug!(
                        "Catalog strategy {:?} failed for {}: {}",
                        endpoint,
                        self.target,
                        e
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Resolves one entry into a food item, keeping the bare title on failure
    pub async fn resolve(&self, entry: &MenuEntry) -> FoodItem {
        let strategies = strategies_for(entry);

        match self.fetch_dish(&strategies).await {
            Ok((payload, endpoint)) => build_food_item(&entry.title, payload, endpoint),
            Err(e) => {
                tracing::warn!(
                    "Catalog item {:?} of {} unavailable: {}",
                    entry.title,
                    self.target,
                    e
                );
                FoodItem {
                    title: entry.title.clone(),
                    ..FoodItem::default()
                }
            }
        }
    }

    /// Resolves every entry concurrently, preserving menu order
    pub async fn resolve_all(&self, entries: &[MenuEntry]) -> Vec<FoodItem> {
        join_all(entries.iter().map(|entry| self.resolve(entry))).await
    }
}

fn build_food_item(title: &str, payload: DishPayload, endpoint: &DishEndpoint) -> FoodItem {
    let is_drink = matches!(
        endpoint,
        DishEndpoint::ByName {
            kind: DishKind::Drink,
            ..
        }
    );

    FoodItem {
        title: title.to_string(),
        images: payload
            .media_items
            .into_iter()
            .map(|media| DishImage {
                src: media.url,
                alt: media.caption,
                time_uploaded: media.time_uploaded,
            })
            .collect(),
        reviews: payload
            .review_data
            .map(|data| data.reviews)
            .unwrap_or_default()
            .into_iter()
            .map(|review| DishReview {
                text: review.text,
                rating: review.rating,
                total_user_review_count: review.user_review_count,
                date: review.date,
            })
            .collect(),
        is_drink: is_drink.then_some(true),
    }
}
