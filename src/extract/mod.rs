//! Record extraction
//!
//! One attempt per target: fetch the auxiliary payload and the page document
//! together, read the page synchronously, resolve catalog items concurrently,
//! then assemble a [`CandidateRecord`]. Completeness is left to the schema.

mod catalog;
mod document;
pub mod payload;
mod record;
mod reviews;

pub use catalog::{encode_dish_name, strategies_for, CatalogContext, CatalogError, DishEndpoint};
pub use document::{read_page, MenuEntry, PageFacts, LOCATED_IN_LABEL, WEBSITE_LABEL};
pub use record::{
    Address, CandidateRecord, DishImage, DishReview, FoodItem, Hours, Image, Location, Review,
};
pub use reviews::{merge_reviews, parse_categories};

use crate::fetcher::{FetchError, Fetcher};
use crate::target::{Site, TargetId};
use crate::TargetError;
use payload::{BizProps, EmbeddedBusiness};
use serde_json::Value;
use thiserror::Error;

/// Reasons an extraction attempt produced no candidate
///
/// Each one returns the target to pending.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no embedded structured-data block for {id}")]
    NoStructuredData { id: TargetId },

    #[error("malformed source for {id}: {reason}")]
    Malformed { id: TargetId, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Raw payload pair for one attempt
#[derive(Debug, Clone)]
pub struct RawPayloads {
    pub props: Value,
    pub page: String,
}

/// Fetches and assembles candidate records for one site
#[derive(Clone)]
pub struct Extractor {
    fetcher: Fetcher,
    site: Site,
}

impl Extractor {
    pub fn new(fetcher: Fetcher, site: Site) -> Self {
        Self { fetcher, site }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Fetches the auxiliary payload and the page document concurrently
    ///
    /// Either failing fails the whole attempt.
    pub async fn fetch_payloads(&self, id: &TargetId) -> Result<RawPayloads, ExtractError> {
        let page_url = self.site.page_url(id)?;
        let props_url = self.site.props_url(id)?;

        let (props, page) = tokio::try_join!(
            self.fetcher.fetch_json::<Value>(&props_url, &page_url),
            self.fetcher.fetch_page(&page_url),
        )?;

        Ok(RawPayloads { props, page })
    }

    /// Assembles a candidate record from an already fetched payload pair
    pub async fn extract(
        &self,
        id: &TargetId,
        payloads: &RawPayloads,
    ) -> Result<CandidateRecord, ExtractError> {
        let PageFacts {
            business_block,
            menu,
            hours,
            website,
            located_in,
        } = read_page(&payloads.page, self.site.entity_type());

        let block =
            business_block.ok_or_else(|| ExtractError::NoStructuredData { id: id.clone() })?;
        let block: EmbeddedBusiness = serde_json::from_value(block)
            .map_err(|e| malformed(id, format!("structured data: {}", e)))?;

        let props: BizProps = serde_json::from_value(payloads.props.clone())
            .map_err(|e| malformed(id, format!("props: {}", e)))?;
        let details = props
            .biz_details_page_props
            .ok_or_else(|| malformed(id, "props carry no bizDetailsPageProps".to_string()))?;

        let categories = parse_categories(details.nearby_links());
        let reviews = merge_reviews(details.feed_reviews(), &block.exact_dates());

        let catalog = CatalogContext {
            fetcher: &self.fetcher,
            site: &self.site,
            target: id,
            business_id: details.business_id.as_deref(),
        };
        let food_items = catalog.resolve_all(&menu).await;

        tracing::debug!(
            "Extracted {}: {} reviews, {} catalog items, {} categories",
            id,
            reviews.len(),
            food_items.len(),
            categories.len()
        );

        let about = details.specialties_text();
        let address = block.address.unwrap_or_default();

        Ok(CandidateRecord {
            merchant_id: details.business_id,
            merchant_name: Some(id.to_string()),
            name: details.business_name,
            location: Location {
                address: Address {
                    address: address.street_address,
                    city: address.address_locality,
                    country: address.address_country,
                    state: address.address_region,
                    zip: address.postal_code,
                },
                located_in,
            },
            about,
            website,
            phone_number: block.telephone,
            dollar_rating: block.price_range,
            hours: Hours::from_rows(hours),
            reviews,
            food_items,
            categories,
            entity_type: block.kind,
        })
    }
}

fn malformed(id: &TargetId, reason: String) -> ExtractError {
    ExtractError::Malformed {
        id: id.clone(),
        reason,
    }
}
