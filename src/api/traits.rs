use crate::analyzer::DealQuery;
use crate::api::data::PriceGuidePage;
use crate::model::{ApiError, Category, Listing};

#[async_trait::async_trait]
pub trait PriceGuideApi: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn fetch_price_guides(&self, category: &str) -> Result<PriceGuidePage, ApiError>;
    async fn fetch_price_guides_page(&self, url: &str) -> Result<PriceGuidePage, ApiError>;
    async fn fetch_listings(&self, query: &DealQuery) -> Result<Vec<Listing>, ApiError>;
}
