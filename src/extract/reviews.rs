//! Review merge and category labels

use crate::extract::payload::{FeedReview, SeoLink};
use crate::extract::record::{Image, Review};
use regex::Regex;
use std::sync::OnceLock;

static CATEGORY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn category_pattern() -> &'static Regex {
    CATEGORY_PATTERN
        .get_or_init(|| Regex::new(r"Find more (.+) near").expect("valid category regex"))
}

/// Merges the review feed with the embedded block's publish dates
///
/// The two lists are matched by position. Where the embedded list is shorter
/// the exact date is left empty; surplus dates are ignored.
pub fn merge_reviews(feed: &[FeedReview], exact_dates: &[Option<String>]) -> Vec<Review> {
    feed.iter()
        .enumerate()
        .map(|(index, review)| Review {
            date_exact: exact_dates.get(index).cloned().flatten(),
            date_approx: review.localized_date.clone(),
            text: review.comment.as_ref().and_then(|c| c.text.clone()),
            rating: review.rating,
            location: review.user.as_ref().and_then(|u| u.display_location.clone()),
            total_user_review_count: review.user.as_ref().and_then(|u| u.review_count),
            images: review
                .photos
                .iter()
                .map(|photo| Image {
                    src: photo.src.clone(),
                    alt: photo.alt_text.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Category names from "Find more X near Y" link labels
///
/// Labels of any other shape are dropped with a warning.
pub fn parse_categories(links: &[SeoLink]) -> Vec<String> {
    links
        .iter()
        .filter_map(|link| {
            let label = link.label.as_deref()?;
            match category_pattern().captures(label) {
                Some(captures) => Some(captures[1].to_string()),
                None => {
                    tracing::warn!("Dropping category link with unexpected label {:?}", label);
                    None
                }
            }
        })
        .collect()
}
