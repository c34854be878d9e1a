use std::sync::Arc;

use tracing::{error, info, warn};

use reverb_sniper::api::ReverbClient;
use reverb_sniper::config::load_config;
use reverb_sniper::finder::{DealFinder, FinderState, FinderStore};
use reverb_sniper::navigator::TracingNavigator;
use reverb_sniper::utils::to_kebab_case;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from file
    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let api = Arc::new(ReverbClient::new(&config.api_base_address));
    let store = Arc::new(FinderStore::new());
    let navigator = Arc::new(TracingNavigator);
    let finder = DealFinder::new(api, store.clone(), navigator, config.api_host.clone());

    info!("ReverbSniper started, scanning {} categories", config.categories.len());

    finder.fetch_categories_if_needed().await;
    let state = store.snapshot();
    info!("Categories available upstream: {}", state.categories.items.len());

    for category in &config.categories {
        let slug = to_kebab_case(category);
        info!("Finding deals in category: {}", slug);

        finder.find_deals_for_category(&slug).await;
        for _ in 0..config.extra_pages {
            finder.find_more_deals().await;
        }
        finder.wait_for_listings().await;

        report_deals(&store.snapshot(), &slug);

        finder.reset_deals();
        finder.reset_category();
        finder.reset_error_message();
    }
}

/// Logs every deal currently held in the store, with the guide range each
/// listing was qualified against.
fn report_deals(state: &FinderState, category: &str) {
    let mut total = 0usize;
    for listings in state.deals_listings.values() {
        for listing in &listings.items {
            info!(
                "Deal: {} | {} | {:.2} (guide {:.2}-{:.2}) | {}",
                listing.title,
                listing.shop,
                listing.price,
                listing.bottom_price,
                listing.top_price,
                listing.link
            );
            total += 1;
        }
    }

    if let Some(message) = &state.error_message {
        warn!("Finder reported an error for {}: {}", category, message);
    }
    info!("Found {} deals in {}", total, category);
}
