//! Mock site fixtures and store wrappers shared by the integration tests

use async_trait::async_trait;
use canary::config::{FetcherConfig, SiteConfig};
use canary::extract::Extractor;
use canary::fetcher::Fetcher;
use canary::frontier::{FrontierResult, InMemoryFrontier};
use canary::schema::ValidatedRecord;
use canary::sink::{RecordSink, SinkError, SinkResult};
use canary::{FrontierStore, Membership, Site, TargetId};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn id(s: &str) -> TargetId {
    TargetId::new(s).unwrap()
}

pub fn site(server: &MockServer) -> Site {
    Site::from_config(&SiteConfig {
        origin: server.uri(),
        ..SiteConfig::default()
    })
    .unwrap()
}

pub fn extractor(server: &MockServer) -> Extractor {
    Extractor::new(Fetcher::new(&FetcherConfig::default()).unwrap(), site(server))
}

fn structured_block(name: &str) -> String {
    json!({
        "@type": "Restaurant",
        "name": name,
        "telephone": "(212) 555-0100",
        "priceRange": "$$",
        "address": {
            "streetAddress": "7 Carmine St",
            "addressLocality": "New York",
            "addressRegion": "NY",
            "addressCountry": "US",
            "postalCode": "10014"
        },
        "review": [{"datePublished": "2024-03-14"}]
    })
    .to_string()
}

/// A business page; `menu` titles are rendered as by-name catalog entries
pub fn page_html(name: &str, with_block: bool, menu: &[&str]) -> String {
    let block = if with_block {
        format!(
            r#"<script type="application/ld+json">{}</script>"#,
            structured_block(name)
        )
    } else {
        String::new()
    };

    let entries: String = menu
        .iter()
        .map(|title| format!(r#"<div><a href="javascript:;"><img/></a><p>{}</p></div>"#, title))
        .collect();

    format!(
        r#"<html><head>
        <script type="application/ld+json">{{"@type": "BreadcrumbList"}}</script>
        {block}
        </head><body>
        <section aria-label="Menu"><div data-testid="scroll-container">{entries}</div></section>
        <div><p>Business website</p><p><a href="https://joes.example">joes.example</a></p></div>
        <table><tbody><tr><td><ul>
            <li><p>11:00 AM - 10:00 PM</p></li><li><p>11:00 AM - 10:00 PM</p></li>
        </ul></td></tr></tbody></table>
        </body></html>"#
    )
}

/// Auxiliary payload; `links` end up under `businessUrl` keys in nested places
pub fn props_json(name: &str, links: &[&str]) -> Value {
    let similar: Vec<Value> = links
        .iter()
        .map(|link| json!({"business": {"businessUrl": link, "rating": 4.5}}))
        .collect();

    json!({
        "bizDetailsPageProps": {
            "businessId": format!("{}-id", name),
            "businessName": name,
            "reviewFeedQueryProps": {"reviews": [{
                "comment": {"text": "Great slice"},
                "rating": 5,
                "localizedDate": "3/14/2024",
                "user": {"displayLocation": "Brooklyn, NY", "reviewCount": 12},
                "photos": [{"src": "https://img.example/r1.jpg", "altText": "slice"}]
            }]},
            "seoLinksProps": {"nearbySearchInternalLinks": {"links": [
                {"label": "Find more Pizza near Joe's"}
            ]}},
            "similarBusinesses": similar
        }
    })
}

/// Mounts the page and payload endpoints for one business
pub async fn mount_business(
    server: &MockServer,
    business: &str,
    with_block: bool,
    menu: &[&str],
    links: &[&str],
) {
    Mock::given(method("GET"))
        .and(path(format!("/biz/{}", business)))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(page_html(business, with_block, menu)),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/biz/{}/props", business)))
        .respond_with(ResponseTemplate::new(200).set_body_json(props_json(business, links)))
        .mount(server)
        .await;
}

/// A catalog payload with one image and one review
pub fn dish_json() -> Value {
    json!({
        "mediaItems": [{"url": "https://img.example/d1.jpg", "caption": "tall glass", "timeUploaded": "2024-02-01"}],
        "reviewData": {"reviews": [{"text": "refreshing", "rating": 4, "userReviewCount": 3, "date": "2/1/2024"}]}
    })
}

/// Frontier wrapper counting `mark_completed` calls per identifier
#[derive(Default)]
pub struct CountingFrontier {
    pub inner: InMemoryFrontier,
    completions: Mutex<HashMap<TargetId, u32>>,
}

impl CountingFrontier {
    pub fn with_pending(ids: impl IntoIterator<Item = TargetId>) -> Self {
        Self {
            inner: InMemoryFrontier::with_pending(ids),
            completions: Mutex::default(),
        }
    }

    pub fn completions(&self, id: &TargetId) -> u32 {
        self.completions
            .lock()
            .unwrap()
            .get(id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl FrontierStore for CountingFrontier {
    async fn claim_one(&self) -> FrontierResult<Option<TargetId>> {
        self.inner.claim_one().await
    }

    async fn release(&self, id: &TargetId) -> FrontierResult<()> {
        self.inner.release(id).await
    }

    async fn mark_completed(&self, id: &TargetId) -> FrontierResult<()> {
        *self.completions.lock().unwrap().entry(id.clone()).or_default() += 1;
        self.inner.mark_completed(id).await
    }

    async fn add_if_new(&self, id: &TargetId) -> FrontierResult<bool> {
        self.inner.add_if_new(id).await
    }

    async fn membership(&self, id: &TargetId) -> FrontierResult<Membership> {
        self.inner.membership(id).await
    }

    async fn pending_count(&self) -> FrontierResult<u64> {
        self.inner.pending_count().await
    }

    async fn completed_count(&self) -> FrontierResult<u64> {
        self.inner.completed_count().await
    }
}

/// Sink that rejects every write
pub struct FailingSink;

#[async_trait]
impl RecordSink for FailingSink {
    async fn store(&self, _record: ValidatedRecord) -> SinkResult<()> {
        Err(SinkError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "database offline",
        )))
    }
}
