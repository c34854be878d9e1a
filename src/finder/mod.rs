// Finder module: sequences category selection, price-guide fetches and the
// per-guide listings fan-out.

pub mod events;
pub mod pagination;
pub mod state;

pub use events::FinderEvent;
pub use state::{FinderState, FinderStore};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::analyzer::DealQuery;
use crate::api::PriceGuideApi;
use crate::model::{FetchKey, PriceGuide};
use crate::navigator::Navigator;
use self::pagination::{can_fetch_more, next_page_request};

const DEALS_PATH: &str = "/deals";

pub struct DealFinder {
    api: Arc<dyn PriceGuideApi>,
    store: Arc<FinderStore>,
    navigator: Arc<dyn Navigator>,
    api_host: String,
    /// Handles of spawned listings fetches, keyed by resource. Entries are
    /// never aborted; they either settle or are joined via wait_for_listings.
    in_flight: Mutex<HashMap<FetchKey, JoinHandle<()>>>,
}

impl DealFinder {
    pub fn new(
        api: Arc<dyn PriceGuideApi>,
        store: Arc<FinderStore>,
        navigator: Arc<dyn Navigator>,
        api_host: String,
    ) -> Self {
        Self {
            api,
            store,
            navigator,
            api_host,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches the category list unless it is already cached or in flight.
    pub async fn fetch_categories_if_needed(&self) {
        if !self.store.should_fetch(&FetchKey::Categories) {
            return;
        }
        self.store.dispatch(FinderEvent::CategoriesRequest);

        match self.api.fetch_categories().await {
            Ok(categories) => {
                info!("Fetched {} categories", categories.len());
                self.store
                    .dispatch(FinderEvent::CategoriesSuccess(categories));
            }
            Err(e) => {
                warn!("Categories fetch failed: {}", e);
                self.store
                    .dispatch(FinderEvent::CategoriesError(e.to_string()));
            }
        }
    }

    /// Selects a category, fetches its price guides, fans out one listings
    /// fetch per guide and switches to the deals view. The fan-out is not
    /// awaited; navigation fires as soon as the fetches are issued.
    pub async fn find_deals_for_category(&self, category: &str) {
        self.store
            .dispatch(FinderEvent::CategorySelected(category.to_string()));
        self.store.dispatch(FinderEvent::DealsByCategoryStart);

        let guides = match self.fetch_price_guides(category).await {
            Ok(guides) => guides,
            Err(error) => {
                warn!("Deals scan for {} failed: {}", category, error);
                self.store.dispatch(FinderEvent::DealsByCategoryError(error));
                return;
            }
        };

        for guide in guides {
            self.spawn_listings_fetch(guide);
        }
        self.navigator.navigate_to(DEALS_PATH);
    }

    /// Loads the next page of price guides for the active collection and
    /// fans out listings fetches for the new guides. Resolves immediately
    /// when pagination is not possible.
    pub async fn find_more_deals(&self) {
        let snapshot = self.store.snapshot();
        if !can_fetch_more(&snapshot) {
            return;
        }
        if snapshot.search_term.is_some() {
            // TODO: paginate the search-term collection once search results
            // carry a cursor.
            return;
        }
        let Some(request) = next_page_request(&snapshot, &self.api_host) else {
            return;
        };

        info!("Loading more price guides for {}", request.category);
        self.store.dispatch(FinderEvent::PriceGuidesRequest {
            category: request.category.clone(),
        });

        match self.api.fetch_price_guides_page(&request.url).await {
            Ok(page) => {
                self.store.dispatch(FinderEvent::PriceGuidesSuccess {
                    category: request.category,
                    guides: page.guides.clone(),
                    next: page.next,
                });
                for guide in page.guides {
                    self.spawn_listings_fetch(guide);
                }
            }
            Err(e) => {
                warn!("Loading more deals failed: {}", e);
                self.store.dispatch(FinderEvent::PriceGuidesError {
                    category: request.category,
                    error: e.to_string(),
                });
                self.store
                    .dispatch(FinderEvent::DealsByCategoryError(e.to_string()));
            }
        }
    }

    pub fn reset_category(&self) {
        self.store.dispatch(FinderEvent::CategoryReset);
    }

    pub fn reset_deals(&self) {
        self.store.dispatch(FinderEvent::DealsReset);
    }

    pub fn reset_error_message(&self) {
        self.store.dispatch(FinderEvent::ErrorMessageReset);
    }

    /// Waits until every issued listings fetch has settled.
    pub async fn wait_for_listings(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut in_flight = self.in_flight.lock().expect("in-flight lock poisoned");
            in_flight.drain().map(|(_, handle)| handle).collect()
        };
        let _ = join_all(handles).await;
    }

    /// Guarded fetch of the first price-guide page for a category. A
    /// guard-skip yields an empty page so the caller still navigates.
    async fn fetch_price_guides(&self, category: &str) -> Result<Vec<PriceGuide>, String> {
        let key = FetchKey::PriceGuides {
            category: category.to_string(),
        };
        if !self.store.should_fetch(&key) {
            return Ok(Vec::new());
        }
        self.store.dispatch(FinderEvent::PriceGuidesRequest {
            category: category.to_string(),
        });

        match self.api.fetch_price_guides(category).await {
            Ok(page) => {
                info!(
                    "Fetched {} price guides for {}",
                    page.guides.len(),
                    category
                );
                self.store.dispatch(FinderEvent::PriceGuidesSuccess {
                    category: category.to_string(),
                    guides: page.guides.clone(),
                    next: page.next,
                });
                Ok(page.guides)
            }
            Err(e) => {
                self.store.dispatch(FinderEvent::PriceGuidesError {
                    category: category.to_string(),
                    error: e.to_string(),
                });
                Err(e.to_string())
            }
        }
    }

    /// Issues one listings fetch for a guide, deduplicated per identifier.
    /// Guides without an estimated value fail here, before any network call.
    fn spawn_listings_fetch(&self, guide: PriceGuide) {
        let query = match DealQuery::for_price_guide(&guide) {
            Ok(query) => query,
            Err(e) => {
                warn!("Skipping {}: {}", guide.identifier, e);
                self.store.dispatch(FinderEvent::ListingsError {
                    price_guide: guide.identifier,
                    error: e.to_string(),
                });
                return;
            }
        };

        let key = FetchKey::Listings {
            price_guide: guide.identifier.clone(),
        };
        let mut in_flight = self.in_flight.lock().expect("in-flight lock poisoned");
        if let Some(handle) = in_flight.get(&key) {
            if !handle.is_finished() {
                return;
            }
        }
        if !self.store.should_fetch(&key) {
            return;
        }

        self.store.dispatch(FinderEvent::ListingsRequest {
            price_guide: guide.identifier.clone(),
        });

        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let identifier = guide.identifier;
        let handle = tokio::spawn(async move {
            match api.fetch_listings(&query).await {
                Ok(listings) => {
                    info!("Found {} deal candidates for {}", listings.len(), identifier);
                    store.dispatch(FinderEvent::ListingsSuccess {
                        price_guide: identifier,
                        listings,
                    });
                }
                Err(e) => {
                    warn!("Listings fetch for {} failed: {}", identifier, e);
                    store.dispatch(FinderEvent::ListingsError {
                        price_guide: identifier,
                        error: e.to_string(),
                    });
                }
            }
        });
        in_flight.insert(key, handle);
    }
}
