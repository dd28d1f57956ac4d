//! Shared fixtures: a host-routed fake transport and listing page builders
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shopmania_lib::api::{AppState, create_router};
use shopmania_lib::application::ProductSearchService;
use shopmania_lib::infrastructure::{
    FetchError, FetchPolicy, IdentityHeaders, IdentityPool, ParsingConfig, ResilientFetcher,
    Transport, TransportResponse,
};

#[derive(Clone)]
pub enum Reply {
    Page(String),
    Status(u16),
    Refused,
}

/// Answers by matching the request URL against registered prefixes
#[derive(Default)]
pub struct FakeStorefronts {
    routes: Mutex<Vec<(String, Reply)>>,
    requests: Mutex<Vec<String>>,
}

impl FakeStorefronts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(self: &Arc<Self>, url_prefix: &str, reply: Reply) -> Arc<Self> {
        self.routes
            .lock()
            .unwrap()
            .push((url_prefix.to_string(), reply));
        Arc::clone(self)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeStorefronts {
    async fn get(
        &self,
        url: &str,
        _identity: &IdentityHeaders,
        _timeout: Duration,
    ) -> Result<TransportResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        let reply = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::Status(404));

        match reply {
            Reply::Page(body) => Ok(TransportResponse { status: 200, body }),
            Reply::Status(status) => Ok(TransportResponse {
                status,
                body: String::new(),
            }),
            Reply::Refused => Err(FetchError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

pub fn search_service(transport: Arc<FakeStorefronts>) -> ProductSearchService {
    let fetcher = ResilientFetcher::new(transport, IdentityPool::default(), FetchPolicy::default());
    ProductSearchService::new(fetcher, &ParsingConfig::default()).unwrap()
}

pub fn router(transport: Arc<FakeStorefronts>) -> axum::Router {
    create_router(AppState::new(search_service(transport)))
}

pub const SNAPDEAL_SEARCH: &str = "https://www.snapdeal.com/search";
pub const SHOPCLUES_SEARCH: &str = "https://www.shopclues.com/search";

pub fn snapdeal_card(title: &str, width: Option<&str>) -> String {
    let rating = width.map_or_else(String::new, |w| {
        format!(r#"<div class="rating-stars"><div class="filled-stars" style="width:{w}"></div></div>"#)
    });
    format!(
        r#"<div class="product-tuple-listing">
            <a class="dp-widget-link" href="/product/{slug}/1001"><img src="https://n1.sdlcdn.com/{slug}.jpg"></a>
            <p class="product-title">{title}</p>
            <span class="lfloat product-price">Rs. 499</span>
            {rating}
        </div>"#,
        slug = title.to_lowercase().replace(' ', "-"),
    )
}

pub fn shopclues_block(title: Option<&str>, href: Option<&str>) -> String {
    let heading = title.map_or_else(String::new, |t| format!("<h2>{t}</h2>"));
    let anchor = href.map_or_else(|| "<a>".to_string(), |h| format!(r#"<a href="{h}">"#));
    format!(
        r#"<div class="column col3 search_blocks">{anchor}
            <img data-img="https://cdn.shopclues.com/item.jpg">
            {heading}
            <span class="p_price">₹199</span>
        </a></div>"#
    )
}

pub fn listing_page(items: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Search</title></head><body><div id=\"products\">{}</div></body></html>",
        items.concat()
    )
}
