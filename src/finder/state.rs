use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::finder::events::FinderEvent;
use crate::model::{Category, FetchKey, FetchState, Listing, PriceGuide};

/// The finder slice of application state, materialized from events.
#[derive(Debug, Clone, Default)]
pub struct FinderState {
    pub categories: FetchState<Category>,
    pub selected_category: Option<String>,
    pub search_term: Option<String>,
    pub price_guides_by_category: HashMap<String, FetchState<PriceGuide>>,
    pub price_guides_by_search: FetchState<PriceGuide>,
    /// Derived listings, keyed by the originating price-guide identifier.
    pub deals_listings: HashMap<String, FetchState<Listing>>,
    pub finding_deals: bool,
    pub error_message: Option<String>,
}

impl FinderState {
    /// Whether a fetch for this resource may be issued: never while one
    /// is in flight, and otherwise only when the collection is absent or
    /// has been invalidated since the last success.
    pub fn should_fetch(&self, key: &FetchKey) -> bool {
        match key {
            FetchKey::Categories => {
                !self.categories.is_fetching
                    && (self.categories.items.is_empty() || self.categories.did_invalidate)
            }
            FetchKey::PriceGuides { category } => {
                match self.price_guides_by_category.get(category) {
                    None => true,
                    Some(state) => !state.is_fetching && state.did_invalidate,
                }
            }
            FetchKey::Listings { price_guide } => match self.deals_listings.get(price_guide) {
                None => true,
                Some(state) => !state.is_fetching && state.did_invalidate,
            },
        }
    }

    /// Applies one state transition.
    pub fn apply(&mut self, event: FinderEvent) {
        match event {
            FinderEvent::CategoriesRequest => {
                self.categories.is_fetching = true;
            }
            FinderEvent::CategoriesSuccess(categories) => {
                settle(&mut self.categories, categories, None);
            }
            FinderEvent::CategoriesError(error) => {
                self.categories.is_fetching = false;
                self.error_message = Some(error);
            }
            FinderEvent::CategorySelected(category) => {
                self.selected_category = Some(category);
            }
            FinderEvent::CategoryReset => {
                self.selected_category = None;
            }
            FinderEvent::PriceGuidesRequest { category } => {
                self.price_guides_by_category
                    .entry(category)
                    .or_default()
                    .is_fetching = true;
            }
            FinderEvent::PriceGuidesSuccess {
                category,
                guides,
                next,
            } => {
                let state = self.price_guides_by_category.entry(category).or_default();
                settle(state, guides, next);
            }
            FinderEvent::PriceGuidesError { category, error } => {
                self.price_guides_by_category
                    .entry(category)
                    .or_default()
                    .is_fetching = false;
                self.error_message = Some(error);
            }
            FinderEvent::ListingsRequest { price_guide } => {
                self.deals_listings.entry(price_guide).or_default().is_fetching = true;
            }
            FinderEvent::ListingsSuccess {
                price_guide,
                listings,
            } => {
                let state = self.deals_listings.entry(price_guide).or_default();
                settle(state, listings, None);
            }
            FinderEvent::ListingsError { price_guide, error } => {
                // No entry is created here: a guide that never got as far
                // as a request stays eligible for a later attempt.
                if let Some(state) = self.deals_listings.get_mut(&price_guide) {
                    state.is_fetching = false;
                }
                self.error_message = Some(error);
            }
            FinderEvent::DealsByCategoryStart => {
                self.finding_deals = true;
                self.error_message = None;
            }
            FinderEvent::DealsByCategoryError(error) => {
                self.finding_deals = false;
                self.error_message = Some(error);
            }
            FinderEvent::DealsReset => {
                self.deals_listings.clear();
                self.finding_deals = false;
            }
            FinderEvent::ErrorMessageReset => {
                self.error_message = None;
            }
        }
    }
}

/// Records a successful fetch: replaces items when the collection had been
/// invalidated, appends otherwise (pagination), and stores the new cursor.
fn settle<T>(state: &mut FetchState<T>, items: Vec<T>, next: Option<String>) {
    if state.did_invalidate {
        state.items = items;
    } else {
        state.items.extend(items);
    }
    state.is_fetching = false;
    state.did_invalidate = false;
    state.next = next;
}

/// State container: read access via snapshots, write access via events.
#[derive(Default)]
pub struct FinderStore {
    state: Mutex<FinderState>,
}

impl FinderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, event: FinderEvent) {
        debug!("Applying event: {:?}", event);
        self.state
            .lock()
            .expect("finder state lock poisoned")
            .apply(event);
    }

    pub fn snapshot(&self) -> FinderState {
        self.state
            .lock()
            .expect("finder state lock poisoned")
            .clone()
    }

    pub fn should_fetch(&self, key: &FetchKey) -> bool {
        self.state
            .lock()
            .expect("finder state lock poisoned")
            .should_fetch(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EstimatedValue;

    fn sample_guide(identifier: &str) -> PriceGuide {
        PriceGuide {
            identifier: identifier.to_string(),
            make: "Gibson".to_string(),
            model: "Les Paul".to_string(),
            finish: "Cherry".to_string(),
            year: "2010s".to_string(),
            estimated_value: Some(EstimatedValue {
                bottom_price: 900.0,
                top_price: 1200.0,
            }),
        }
    }

    #[test]
    fn request_marks_collection_as_fetching() {
        let mut state = FinderState::default();

        state.apply(FinderEvent::PriceGuidesRequest {
            category: "electric-guitars".to_string(),
        });

        let guides = &state.price_guides_by_category["electric-guitars"];
        assert!(guides.is_fetching);
        assert!(guides.items.is_empty());
    }

    #[test]
    fn success_appends_items_and_stores_cursor() {
        let mut state = FinderState::default();
        let category = "electric-guitars".to_string();
        state.apply(FinderEvent::PriceGuidesRequest {
            category: category.clone(),
        });
        state.apply(FinderEvent::PriceGuidesSuccess {
            category: category.clone(),
            guides: vec![sample_guide("/priceguide/1")],
            next: Some("/priceguide?page=2&per_page=1".to_string()),
        });

        state.apply(FinderEvent::PriceGuidesRequest {
            category: category.clone(),
        });
        state.apply(FinderEvent::PriceGuidesSuccess {
            category: category.clone(),
            guides: vec![sample_guide("/priceguide/2")],
            next: None,
        });

        let guides = &state.price_guides_by_category[&category];
        assert_eq!(guides.items.len(), 2);
        assert!(!guides.is_fetching);
        assert_eq!(guides.next, None);
    }

    #[test]
    fn success_replaces_items_after_invalidation() {
        let mut state = FinderState::default();
        let category = "effects-and-pedals".to_string();
        state.apply(FinderEvent::PriceGuidesSuccess {
            category: category.clone(),
            guides: vec![sample_guide("/priceguide/old")],
            next: None,
        });
        state
            .price_guides_by_category
            .get_mut(&category)
            .unwrap()
            .did_invalidate = true;

        state.apply(FinderEvent::PriceGuidesSuccess {
            category: category.clone(),
            guides: vec![sample_guide("/priceguide/new")],
            next: None,
        });

        let guides = &state.price_guides_by_category[&category];
        assert_eq!(guides.items.len(), 1);
        assert_eq!(guides.items[0].identifier, "/priceguide/new");
        assert!(!guides.did_invalidate);
    }

    #[test]
    fn error_clears_fetching_and_records_message() {
        let mut state = FinderState::default();
        state.apply(FinderEvent::CategoriesRequest);

        state.apply(FinderEvent::CategoriesError("boom".to_string()));

        assert!(!state.categories.is_fetching);
        assert_eq!(state.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn listings_error_does_not_create_an_entry() {
        let mut state = FinderState::default();

        state.apply(FinderEvent::ListingsError {
            price_guide: "/priceguide/9".to_string(),
            error: "No estimated value found for /priceguide/9".to_string(),
        });

        assert!(!state.deals_listings.contains_key("/priceguide/9"));
        assert!(state.should_fetch(&FetchKey::Listings {
            price_guide: "/priceguide/9".to_string(),
        }));
    }

    #[test]
    fn categories_are_refetched_only_when_empty_or_invalidated() {
        let mut state = FinderState::default();
        assert!(state.should_fetch(&FetchKey::Categories));

        state.apply(FinderEvent::CategoriesRequest);
        assert!(!state.should_fetch(&FetchKey::Categories));

        state.apply(FinderEvent::CategoriesSuccess(vec![Category {
            id: "1".to_string(),
            name: "Electric Guitars".to_string(),
            slug: "electric-guitars".to_string(),
            description: String::new(),
            image_url: "https://images.test/cat.jpg".to_string(),
        }]));
        assert!(!state.should_fetch(&FetchKey::Categories));

        state.categories.did_invalidate = true;
        assert!(state.should_fetch(&FetchKey::Categories));
    }

    #[test]
    fn fetched_collections_stay_settled_until_invalidated() {
        let mut state = FinderState::default();
        let key = FetchKey::PriceGuides {
            category: "electric-guitars".to_string(),
        };
        assert!(state.should_fetch(&key));

        state.apply(FinderEvent::PriceGuidesRequest {
            category: "electric-guitars".to_string(),
        });
        state.apply(FinderEvent::PriceGuidesSuccess {
            category: "electric-guitars".to_string(),
            guides: Vec::new(),
            next: None,
        });

        // Present but empty: no refetch without an invalidation.
        assert!(!state.should_fetch(&key));

        state
            .price_guides_by_category
            .get_mut("electric-guitars")
            .unwrap()
            .did_invalidate = true;
        assert!(state.should_fetch(&key));
    }

    #[test]
    fn deals_start_clears_previous_error() {
        let mut state = FinderState::default();
        state.apply(FinderEvent::DealsByCategoryError("old failure".to_string()));
        assert!(!state.finding_deals);

        state.apply(FinderEvent::DealsByCategoryStart);

        assert!(state.finding_deals);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn deals_reset_drops_derived_listings() {
        let mut state = FinderState::default();
        state.apply(FinderEvent::ListingsRequest {
            price_guide: "/priceguide/1".to_string(),
        });
        state.apply(FinderEvent::DealsByCategoryStart);

        state.apply(FinderEvent::DealsReset);

        assert!(state.deals_listings.is_empty());
        assert!(!state.finding_deals);
    }
}
