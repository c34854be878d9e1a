use crate::model::{Category, Listing, PriceGuide};

/// State transitions produced by the finder and consumed by the reducer.
/// Each fetchable resource gets a request/success/error triple; the
/// price-guide triple serves both the first page and load-more pages.
#[derive(Debug, Clone, PartialEq)]
pub enum FinderEvent {
    CategoriesRequest,
    CategoriesSuccess(Vec<Category>),
    CategoriesError(String),

    CategorySelected(String),
    CategoryReset,

    PriceGuidesRequest {
        category: String,
    },
    PriceGuidesSuccess {
        category: String,
        guides: Vec<PriceGuide>,
        next: Option<String>,
    },
    PriceGuidesError {
        category: String,
        error: String,
    },

    ListingsRequest {
        price_guide: String,
    },
    ListingsSuccess {
        price_guide: String,
        listings: Vec<Listing>,
    },
    ListingsError {
        price_guide: String,
        error: String,
    },

    DealsByCategoryStart,
    DealsByCategoryError(String),

    DealsReset,
    ErrorMessageReset,
}
