//! HTTP client for the catalogue API, used by the `stayfinder` CLI.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::db::HotelFilter;
use crate::models::{Destination, DestinationDraft, HotelDraft, HotelSummary, HotelView};
use crate::server::{ErrorBody, HealthResponse, MessageResponse};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} ({status}): {error}")]
    Api {
        status: u16,
        message: String,
        error: String,
    },
}

impl ClientError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = format!("{}/api", self.base_url);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let (message, error) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.message, body.error),
            Err(_) => (
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
                text,
            ),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
            error,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<T, ClientError> {
        Self::send(self.request(method, segments)).await
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        self.call(Method::GET, segments).await
    }

    async fn with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        Self::send(self.request(method, segments).json(body)).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get(&["health"]).await
    }

    // ========================================================================
    // Destinations
    // ========================================================================

    pub async fn list_destinations(&self) -> Result<Vec<Destination>, ClientError> {
        self.get(&["destinations"]).await
    }

    pub async fn get_destination(&self, id: &str) -> Result<Destination, ClientError> {
        self.get(&["destinations", id]).await
    }

    pub async fn destinations_by_country(
        &self,
        country: &str,
    ) -> Result<Vec<Destination>, ClientError> {
        self.get(&["destinations", "country", country]).await
    }

    pub async fn create_destination(
        &self,
        draft: &DestinationDraft,
    ) -> Result<Destination, ClientError> {
        self.with_body(Method::POST, &["destinations"], draft).await
    }

    /// Sends a partial document; fields not in `patch` keep their values.
    pub async fn update_destination(
        &self,
        id: &str,
        patch: &Value,
    ) -> Result<Destination, ClientError> {
        self.with_body(Method::PUT, &["destinations", id], patch).await
    }

    pub async fn delete_destination(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.call(Method::DELETE, &["destinations", id]).await
    }

    // ========================================================================
    // Hotels
    // ========================================================================

    pub async fn list_hotels(&self) -> Result<Vec<HotelView>, ClientError> {
        self.get(&["hotels"]).await
    }

    pub async fn get_hotel(&self, id: &str) -> Result<HotelView, ClientError> {
        self.get(&["hotels", id]).await
    }

    pub async fn hotel_summary(&self, id: &str) -> Result<HotelSummary, ClientError> {
        self.get(&["hotels", id, "summary"]).await
    }

    pub async fn hotels_by_destination(
        &self,
        destination_id: &str,
    ) -> Result<Vec<HotelView>, ClientError> {
        self.get(&["hotels", "destination", destination_id]).await
    }

    pub async fn hotels_by_price_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<HotelView>, ClientError> {
        let (min, max) = (min.to_string(), max.to_string());
        self.get(&["hotels", "price", &min, &max]).await
    }

    pub async fn hotels_by_stars(&self, stars: i64) -> Result<Vec<HotelView>, ClientError> {
        self.get(&["hotels", "stars", &stars.to_string()]).await
    }

    pub async fn filter_hotels(&self, filter: &HotelFilter) -> Result<Vec<HotelView>, ClientError> {
        let request = self
            .request(Method::GET, &["hotels", "search", "filter"])
            .query(&filter_query(filter));
        Self::send(request).await
    }

    pub async fn create_hotel(&self, draft: &HotelDraft) -> Result<HotelView, ClientError> {
        self.with_body(Method::POST, &["hotels"], draft).await
    }

    pub async fn update_hotel(&self, id: &str, patch: &Value) -> Result<HotelView, ClientError> {
        self.with_body(Method::PUT, &["hotels", id], patch).await
    }

    pub async fn delete_hotel(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.call(Method::DELETE, &["hotels", id]).await
    }
}

/// Query pairs for `GET /hotels/search/filter`. Unset bounds are omitted.
fn filter_query(filter: &HotelFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(id) = &filter.destination_id {
        query.push(("destinationId", id.clone()));
    }
    if let Some(min) = filter.price_min {
        query.push(("minPrice", min.to_string()));
    }
    if let Some(max) = filter.price_max {
        query.push(("maxPrice", max.to_string()));
    }
    if let Some(min) = filter.stars_min {
        query.push(("minStars", min.to_string()));
    }
    if let Some(max) = filter.stars_max {
        query.push(("maxStars", max.to_string()));
    }
    if let Some(min) = filter.rating_min {
        query.push(("minRating", min.to_string()));
    }
    query
}
