// API module: raw wire shapes and the HTTP client for the price-guide service.

pub mod client;
pub mod data;
pub mod traits;

pub use client::ReverbClient;
pub use data::PriceGuidePage;
pub use traits::PriceGuideApi;
