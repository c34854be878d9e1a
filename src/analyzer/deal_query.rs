use crate::model::{DealQueryError, PriceGuide};

/// Listings search parameters under which a result counts as a deal for
/// one price guide. Carries the guide's identifier and value range so
/// results can be tied back to the guide that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct DealQuery {
    pub identifier: String,
    pub make: String,
    pub model: String,
    pub finish: String,
    pub price_max: f64,
    pub year_min: String,
    pub year_max: String,
    pub decade: String,
    pub bottom_price: f64,
    pub top_price: f64,
}

impl DealQuery {
    /// Builds the query for a price guide, or fails without any network
    /// call when the guide carries no estimated value.
    pub fn for_price_guide(guide: &PriceGuide) -> Result<Self, DealQueryError> {
        let value = guide
            .estimated_value
            .ok_or_else(|| DealQueryError::MissingEstimatedValue {
                identifier: guide.identifier.clone(),
            })?;

        // Year can be something like "2010s" or the exact year. When an
        // exact year is present, search for items that are approximately
        // the same age (± 5 years); otherwise filter by the decade label.
        let (year_min, year_max, decade) = match guide.year.parse::<i32>() {
            Ok(year) => ((year - 5).to_string(), (year + 5).to_string(), String::new()),
            Err(_) => (String::new(), String::new(), guide.year.clone()),
        };

        // A listing is a good deal when its price is at most 10% over the
        // low estimate, and never above the high estimate.
        let mut price_max = value.bottom_price * 1.1;
        if price_max > value.top_price {
            price_max = value.top_price;
        }

        Ok(Self {
            identifier: guide.identifier.clone(),
            make: guide.make.clone(),
            model: guide.model.clone(),
            finish: guide.finish.clone(),
            price_max,
            year_min,
            year_max,
            decade,
            bottom_price: value.bottom_price,
            top_price: value.top_price,
        })
    }
}
