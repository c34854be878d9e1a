// Analyzer module: derives qualifying listings queries from price guides.

pub mod deal_query;

// Re-export the main query type for ease of use.
pub use deal_query::DealQuery;
