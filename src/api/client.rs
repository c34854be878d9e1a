use reqwest::Client;

use crate::analyzer::DealQuery;
use crate::api::data::{CategoriesResponse, ListingsResponse, PriceGuidePage, PriceGuidesResponse};
use crate::api::traits::PriceGuideApi;
use crate::model::{ApiError, Category, Listing};

pub struct ReverbClient {
    client: Client,
    base_address: String,
}

impl ReverbClient {
    pub fn new(base_address: &str) -> Self {
        let client = Client::builder()
            .user_agent("ReverbSniperBot/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_address: base_address.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ApiError::InvalidResponse(response.status()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl PriceGuideApi for ReverbClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = format!("{}/categories", self.base_address);
        let body: CategoriesResponse = self.get_json(self.client.get(&url)).await?;

        Ok(body
            .categories
            .into_iter()
            .map(|category| category.into_category())
            .collect())
    }

    async fn fetch_price_guides(&self, category: &str) -> Result<PriceGuidePage, ApiError> {
        let url = format!("{}/priceguide", self.base_address);
        let request = self.client.get(&url).query(&[("product_type", category)]);
        let body: PriceGuidesResponse = self.get_json(request).await?;

        Ok(body.into_page())
    }

    async fn fetch_price_guides_page(&self, url: &str) -> Result<PriceGuidePage, ApiError> {
        let body: PriceGuidesResponse = self.get_json(self.client.get(url)).await?;

        Ok(body.into_page())
    }

    async fn fetch_listings(&self, query: &DealQuery) -> Result<Vec<Listing>, ApiError> {
        let url = format!("{}/listings", self.base_address);
        // All five filter keys are always sent; the unused year form
        // carries empty values.
        let request = self.client.get(&url).query(&[
            ("finish", query.finish.as_str()),
            ("make", query.make.as_str()),
            ("model", query.model.as_str()),
            ("price_max", query.price_max.to_string().as_str()),
            ("year_max", query.year_max.as_str()),
            ("year_min", query.year_min.as_str()),
            ("decade", query.decade.as_str()),
        ]);
        let body: ListingsResponse = self.get_json(request).await?;

        Ok(body
            .listings
            .into_iter()
            .map(|listing| listing.into_listing(query))
            .collect())
    }
}
