use async_trait::async_trait;
use reqwest::{Client, Request, header::ACCEPT};
use tracing::{info, instrument};

use super::interpret_response;
use crate::{
    ClientConfig, Coordinate, PAGE_SIZE, RestaurantCategory, SearchProvider, SortKey,
    error::Result, model::Restaurant,
};

/// HTTP implementation of [`SearchProvider`] backed by the Yelp Fusion API.
#[derive(Debug, Clone)]
pub struct YelpClient {
    http: Client,
    config: ClientConfig,
}

impl YelpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the search request for one page without sending it.
    pub fn build_request(
        &self,
        coordinate: Coordinate,
        sort_key: Option<SortKey>,
        category: Option<RestaurantCategory>,
        offset: usize,
    ) -> Result<Request> {
        let mut query = vec![
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("offset", offset.to_string()),
        ];
        if let Some(sort_key) = sort_key {
            query.push(("sort_by", sort_key.as_str().to_string()));
        }
        if let Some(category) = category {
            query.push(("categories", category.as_str().to_string()));
        }

        Ok(self
            .http
            .get(&self.config.base_url)
            .query(&query)
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.config.api_key)
            .build()?)
    }
}

#[async_trait]
impl SearchProvider for YelpClient {
    #[instrument(name = "Fetch restaurants", skip(self), level = "info")]
    async fn fetch_results(
        &self,
        coordinate: Coordinate,
        sort_key: Option<SortKey>,
        category: Option<RestaurantCategory>,
        offset: usize,
    ) -> Result<Vec<Restaurant>> {
        let request = self.build_request(coordinate, sort_key, category, offset)?;
        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        let restaurants = interpret_response(status.as_u16(), &body)?;
        info!(
            status = status.as_u16(),
            count = restaurants.len(),
            "Search page received"
        );
        Ok(restaurants)
    }
}
