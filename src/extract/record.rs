//! Candidate record types
//!
//! Every leaf is optional here. Completeness is not enforced by the type but
//! by [`crate::schema::merchant_shape`], so a partially scraped page still
//! produces a record whose first missing field can be named.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(
        rename = "platform_specific_merchant_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub merchant_id: Option<String>,

    #[serde(
        rename = "platform_specific_merchant_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub merchant_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub location: Location,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Price tier, e.g. `"$$"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dollar_rating: Option<String>,

    pub hours: Hours,

    pub reviews: Vec<Review>,

    pub food_items: Vec<FoodItem>,

    pub categories: Vec<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: Address,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub located_in: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Opening hours, one display string per weekday
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<String>,
}

impl Hours {
    /// Builds hours from rows listed Monday first; missing rows stay `None`
    pub fn from_rows(rows: Vec<String>) -> Self {
        let mut days = rows.into_iter();
        Self {
            monday: days.next(),
            tuesday: days.next(),
            wednesday: days.next(),
            thursday: days.next(),
            friday: days.next(),
            saturday: days.next(),
            sunday: days.next(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Publish date from the embedded block, when the positions line up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_exact: Option<String>,
    /// Localized display date from the review feed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_approx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Reviewer's display location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_user_review_count: Option<u64>,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_uploaded: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_user_review_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One catalog (menu) entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub title: String,
    pub images: Vec<DishImage>,
    pub reviews: Vec<DishReview>,
    /// Set only when the item was found under the drink endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_drink: Option<bool>,
}
