use crate::finder::state::FinderState;

/// Soft cap on price guides held per collection. Be a little gentle on
/// the Reverb API.
pub const MAX_PRICE_GUIDE_ITEMS: usize = 75;

/// A decoded next-page fetch for the selected category's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct NextPageRequest {
    pub category: String,
    pub url: String,
    /// Upper bound on the item count once this page has been fetched.
    pub max_items_after_fetch: usize,
}

/// True only when the active collection has a next-page cursor and is not
/// currently fetching. An active search term takes precedence over the
/// selected category; with neither, there is nothing to page through.
pub fn can_fetch_more(state: &FinderState) -> bool {
    if state.search_term.is_some() {
        return state.price_guides_by_search.next.is_some()
            && !state.price_guides_by_search.is_fetching;
    }
    if let Some(category) = &state.selected_category {
        if let Some(guides) = state.price_guides_by_category.get(category) {
            return guides.next.is_some() && !guides.is_fetching;
        }
    }
    false
}

/// Builds the next-page request for the selected category, or nothing when
/// a guard blocks it: cursor missing or undecodable, a fetch in flight,
/// the expected post-fetch count already reached, or the soft item cap hit.
pub fn next_page_request(state: &FinderState, api_host: &str) -> Option<NextPageRequest> {
    let category = state.selected_category.clone()?;
    let guides = state.price_guides_by_category.get(&category)?;
    let cursor = guides.next.as_deref()?;

    let url = format!("{}{}", api_host, cursor);
    let (page, per_page) = decode_cursor(&url)?;
    let max_items_after_fetch = page * per_page;

    if guides.is_fetching
        || guides.items.len() >= max_items_after_fetch
        || guides.items.len() >= MAX_PRICE_GUIDE_ITEMS
    {
        return None;
    }

    Some(NextPageRequest {
        category,
        url,
        max_items_after_fetch,
    })
}

fn decode_cursor(url: &str) -> Option<(usize, usize)> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let mut page = None;
    let mut per_page = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "page" => page = value.parse().ok(),
            "per_page" => per_page = value.parse().ok(),
            _ => {}
        }
    }
    Some((page?, per_page?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EstimatedValue, FetchState, PriceGuide};

    const HOST: &str = "https://api.reverb.test";

    fn guide(n: usize) -> PriceGuide {
        PriceGuide {
            identifier: format!("/priceguide/{}", n),
            make: "Fender".to_string(),
            model: "Jazzmaster".to_string(),
            finish: "Olympic White".to_string(),
            year: "2012".to_string(),
            estimated_value: Some(EstimatedValue {
                bottom_price: 700.0,
                top_price: 950.0,
            }),
        }
    }

    fn state_with_category(items: usize, next: Option<&str>) -> FinderState {
        let mut state = FinderState::default();
        state.selected_category = Some("electric-guitars".to_string());
        state.price_guides_by_category.insert(
            "electric-guitars".to_string(),
            FetchState {
                items: (0..items).map(guide).collect(),
                is_fetching: false,
                did_invalidate: false,
                next: next.map(str::to_string),
            },
        );
        state
    }

    #[test]
    fn cannot_fetch_more_without_a_selection() {
        let state = FinderState::default();
        assert!(!can_fetch_more(&state));
    }

    #[test]
    fn cannot_fetch_more_without_a_cursor() {
        let state = state_with_category(10, None);
        assert!(!can_fetch_more(&state));
    }

    #[test]
    fn cannot_fetch_more_while_fetching() {
        let mut state = state_with_category(10, Some("/priceguide?page=2&per_page=10"));
        state
            .price_guides_by_category
            .get_mut("electric-guitars")
            .unwrap()
            .is_fetching = true;
        assert!(!can_fetch_more(&state));
    }

    #[test]
    fn can_fetch_more_with_idle_cursor() {
        let state = state_with_category(10, Some("/priceguide?page=2&per_page=10"));
        assert!(can_fetch_more(&state));
    }

    #[test]
    fn search_term_takes_precedence_over_category() {
        let mut state = state_with_category(10, Some("/priceguide?page=2&per_page=10"));
        state.search_term = Some("jazzmaster".to_string());

        // The search collection has no cursor, so the category's is ignored.
        assert!(!can_fetch_more(&state));

        state.price_guides_by_search.next = Some("/priceguide?page=2&per_page=10".to_string());
        assert!(can_fetch_more(&state));
    }

    #[test]
    fn next_page_request_decodes_cursor_and_bound() {
        let state = state_with_category(
            35,
            Some("/priceguide?product_type=electric-guitars&page=2&per_page=20"),
        );

        let request = next_page_request(&state, HOST).unwrap();
        assert_eq!(
            request.url,
            format!(
                "{}/priceguide?product_type=electric-guitars&page=2&per_page=20",
                HOST
            )
        );
        assert_eq!(request.max_items_after_fetch, 40);
        assert_eq!(request.category, "electric-guitars");
    }

    #[test]
    fn next_page_is_skipped_when_expected_count_already_met() {
        let state = state_with_category(40, Some("/priceguide?page=2&per_page=20"));
        assert_eq!(next_page_request(&state, HOST), None);
    }

    #[test]
    fn next_page_is_skipped_at_the_soft_cap() {
        // A cursor still exists, but 75 items is as far as we go.
        let state = state_with_category(75, Some("/priceguide?page=20&per_page=20"));
        assert_eq!(next_page_request(&state, HOST), None);
    }

    #[test]
    fn next_page_is_skipped_while_fetching() {
        let mut state = state_with_category(35, Some("/priceguide?page=2&per_page=20"));
        state
            .price_guides_by_category
            .get_mut("electric-guitars")
            .unwrap()
            .is_fetching = true;
        assert_eq!(next_page_request(&state, HOST), None);
    }

    #[test]
    fn undecodable_cursor_yields_no_request() {
        let state = state_with_category(35, Some("/priceguide?product_type=electric-guitars"));
        assert_eq!(next_page_request(&state, HOST), None);
    }
}
