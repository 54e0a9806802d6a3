//! Wire shapes of the source payloads
//!
//! Only the fields the extractor reads are modelled. Everything is lenient:
//! a missing field becomes `None` here and is caught later by the schema.

use serde::Deserialize;
use serde_json::Value;

/// `/biz/<id>/props`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BizProps {
    pub biz_details_page_props: Option<BizDetailsPageProps>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BizDetailsPageProps {
    pub business_id: Option<String>,
    pub business_name: Option<String>,
    pub from_the_business_props: Option<FromTheBusinessProps>,
    pub review_feed_query_props: Option<ReviewFeedQueryProps>,
    pub seo_links_props: Option<SeoLinksProps>,
}

impl BizDetailsPageProps {
    pub fn specialties_text(&self) -> Option<String> {
        self.from_the_business_props
            .as_ref()?
            .from_the_business_content_props
            .as_ref()?
            .specialties_text
            .clone()
    }

    pub fn feed_reviews(&self) -> &[FeedReview] {
        self.review_feed_query_props
            .as_ref()
            .map(|p| p.reviews.as_slice())
            .unwrap_or_default()
    }

    pub fn nearby_links(&self) -> &[SeoLink] {
        self.seo_links_props
            .as_ref()
            .and_then(|p| p.nearby_search_internal_links.as_ref())
            .map(|group| group.links.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FromTheBusinessProps {
    pub from_the_business_content_props: Option<FromTheBusinessContentProps>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FromTheBusinessContentProps {
    pub specialties_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewFeedQueryProps {
    #[serde(default)]
    pub reviews: Vec<FeedReview>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedReview {
    pub comment: Option<FeedComment>,
    pub rating: Option<f64>,
    pub localized_date: Option<String>,
    pub user: Option<FeedUser>,
    #[serde(default)]
    pub photos: Vec<FeedPhoto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedComment {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedUser {
    pub display_location: Option<String>,
    pub review_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPhoto {
    pub src: Option<String>,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoLinksProps {
    pub nearby_search_internal_links: Option<SeoLinkGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoLinkGroup {
    #[serde(default)]
    pub links: Vec<SeoLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoLink {
    pub label: Option<String>,
}

/// The `application/ld+json` island describing the business
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedBusiness {
    #[serde(rename = "@type")]
    pub kind: Option<String>,
    pub address: Option<PostalAddress>,
    pub telephone: Option<String>,
    pub price_range: Option<String>,
    /// Usually a list of review objects; kept raw because some pages inline a
    /// single object instead
    #[serde(default)]
    pub review: Value,
}

impl EmbeddedBusiness {
    /// `datePublished` of each embedded review, by position
    pub fn exact_dates(&self) -> Vec<Option<String>> {
        match &self.review {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("datePublished")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub street_address: Option<String>,
    pub address_locality: Option<String>,
    pub address_region: Option<String>,
    pub address_country: Option<String>,
    pub postal_code: Option<String>,
}

/// `/popular_dish/...` catalog item payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishPayload {
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    pub review_data: Option<DishReviewData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub url: Option<String>,
    pub caption: Option<String>,
    pub time_uploaded: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishReviewData {
    #[serde(default)]
    pub reviews: Vec<DishReviewPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishReviewPayload {
    pub text: Option<String>,
    pub rating: Option<f64>,
    pub user_review_count: Option<u64>,
    pub date: Option<String>,
}
