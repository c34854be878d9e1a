// Core structs: Category, PriceGuide, Listing, FetchState
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image_url: String,
}

/// Estimated market value range reported by the price guide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedValue {
    pub bottom_price: f64,
    pub top_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceGuide {
    /// Opaque resource link, unique per guide.
    pub identifier: String,
    pub make: String,
    pub model: String,
    pub finish: String,
    /// Either an exact year ("2012") or a decade label ("1990s").
    pub year: String,
    pub estimated_value: Option<EstimatedValue>,
}

/// A listing qualified against the price guide that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub link: String,
    pub title: String,
    pub shop: String,
    pub created_at: Option<DateTime<Utc>>,
    pub condition: String,
    pub price: f64,
    pub thumbnail_url: Option<String>,
    pub price_guide_link: String,
    pub bottom_price: f64,
    pub top_price: f64,
}

/// Per-collection fetch record. A new fetch is allowed only while not
/// fetching and the collection is absent or invalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub items: Vec<T>,
    pub is_fetching: bool,
    pub did_invalidate: bool,
    pub next: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_fetching: false,
            did_invalidate: false,
            next: None,
        }
    }
}

/// Key identifying one fetchable resource collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    Categories,
    PriceGuides { category: String },
    Listings { price_guide: String },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response status: {0}")]
    InvalidResponse(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum DealQueryError {
    #[error("No estimated value found for {identifier}")]
    MissingEstimatedValue { identifier: String },
}
