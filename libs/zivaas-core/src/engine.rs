//! Listings filter/sort/paginate engine
//!
//! A stateless, deterministic transform over an already-fetched collection:
//! the owning surface re-invokes it whenever the collection, the live
//! filters or the saved criteria change, and resets pagination to the
//! first page by constructing a fresh [`Paginator`]. Nothing here touches
//! the gateway and nothing here returns an error; an empty result is a
//! state, not a failure.

use crate::models::{Filters, Property, SortOrder, WishlistCriteria};
use zivaas_common::PAGE_SIZE;

/// Parsed price-range token: `"<min>-<max>"` bounds both ends, `"<min>+"`
/// is unbounded above. Boundary digits are extracted by stripping every
/// non-digit character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    /// Parse a range token; `None` means the token imposes no constraint
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        match token.split_once('-') {
            Some((lo, hi)) => {
                let min = digits(lo).unwrap_or(0.0);
                let hi = hi.trim();
                let max = if hi.is_empty() || hi == "+" {
                    None
                } else {
                    digits(hi)
                };
                Some(Self { min, max })
            }
            None => {
                if let Some(rest) = token.strip_suffix('+') {
                    Some(Self {
                        min: digits(rest).unwrap_or(0.0),
                        max: None,
                    })
                } else {
                    // A bare amount without '-' or '+' is an exact point
                    digits(token).map(|n| Self { min: n, max: Some(n) })
                }
            }
        }
    }

    /// Whether a property price falls inside the range
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && self.max.map_or(true, |max| price <= max)
    }
}

/// Parsed area token: a bare number matches the carpet area exactly, a
/// `+`-suffixed number is a lower bound. The exact-match reading of the
/// bare form mirrors the shipped listings page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaFilter {
    Exact(f64),
    AtLeast(f64),
}

impl AreaFilter {
    /// Parse an area token; `None` means the token imposes no constraint
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some(rest) = token.strip_suffix('+') {
            Some(Self::AtLeast(digits(rest).unwrap_or(0.0)))
        } else {
            digits(token).map(Self::Exact)
        }
    }

    /// Whether a carpet area satisfies the token
    #[must_use]
    pub fn matches(&self, area: f64) -> bool {
        match self {
            Self::Exact(n) => area == *n,
            Self::AtLeast(n) => area >= *n,
        }
    }
}

fn digits(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(char::is_ascii_digit).collect();
    if cleaned.is_empty() {
        None
    } else {
        cleaned.parse().ok()
    }
}

/// The predicate set shared by the live-filter branch and the
/// saved-criteria branch; `None` fields impose no constraint
#[derive(Debug, Clone, Copy, Default)]
struct Criteria<'a> {
    location: Option<&'a str>,
    price: Option<&'a str>,
    area: Option<&'a str>,
    property_type: Option<&'a str>,
    status: Option<&'a str>,
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl<'a> From<&'a Filters> for Criteria<'a> {
    fn from(filters: &'a Filters) -> Self {
        Self {
            location: non_empty(&filters.location),
            price: non_empty(&filters.price),
            area: non_empty(&filters.area),
            property_type: non_empty(&filters.property_type),
            status: non_empty(&filters.status),
        }
    }
}

impl<'a> From<&'a WishlistCriteria> for Criteria<'a> {
    fn from(criteria: &'a WishlistCriteria) -> Self {
        Self {
            location: criteria.location.as_deref().and_then(non_empty),
            price: criteria.price.as_deref().and_then(non_empty),
            area: criteria.area.as_deref().and_then(non_empty),
            property_type: criteria.property_type.as_deref().and_then(non_empty),
            status: criteria.status.as_deref().and_then(non_empty),
        }
    }
}

impl Criteria<'_> {
    fn matches(&self, property: &Property) -> bool {
        self.location.map_or(true, |wanted| {
            property
                .location
                .to_lowercase()
                .contains(&wanted.to_lowercase())
        }) && self.price.map_or(true, |token| {
            PriceRange::parse(token).map_or(true, |range| range.contains(property.price))
        }) && self.area.map_or(true, |token| {
            AreaFilter::parse(token).map_or(true, |area| area.matches(property.carpet_area))
        }) && self.property_type.map_or(true, |wanted| {
            property.property_type.label().eq_ignore_ascii_case(wanted)
        }) && self.status.map_or(true, |wanted| status_matches(wanted, property))
    }
}

/// The "Upcoming" filter keys on progress alone: a zero-progress row is
/// upcoming no matter what its status text claims. Every other status
/// filter requires the label to match AND the row to be past zero
/// progress.
fn status_matches(wanted: &str, property: &Property) -> bool {
    if wanted.eq_ignore_ascii_case("upcoming") {
        property.progress == 0.0
    } else {
        property.status.eq_ignore_ascii_case(wanted) && property.progress > 0.0
    }
}

fn search_matches(query: &str, property: &Property) -> bool {
    let query = query.to_lowercase();
    property.name.to_lowercase().contains(&query)
        || property.developer.to_lowercase().contains(&query)
        || property.location.to_lowercase().contains(&query)
}

/// Result of one engine pass, tagged with which branch produced it so the
/// caller can word the empty state correctly
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub properties: Vec<Property>,
    pub used_saved_criteria: bool,
}

impl FilterOutcome {
    /// Classify an empty result; `None` while there are matches
    #[must_use]
    pub fn empty_state(&self, collection_len: usize) -> Option<EmptyState> {
        if !self.properties.is_empty() {
            return None;
        }
        Some(if collection_len == 0 {
            EmptyState::NoData
        } else if self.used_saved_criteria {
            EmptyState::NoSavedCriteriaMatches
        } else {
            EmptyState::NoMatches
        })
    }
}

/// Why a pass produced nothing; a display state, never an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection itself is empty
    NoData,
    /// Live filters matched nothing
    NoMatches,
    /// The saved preset matched nothing
    NoSavedCriteriaMatches,
}

impl EmptyState {
    /// User-facing message for the listings page
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoData => "No properties found in the database.",
            Self::NoMatches => "No properties match the current filters.",
            Self::NoSavedCriteriaMatches => "No properties match your saved criteria.",
        }
    }
}

/// Run one engine pass over the collection.
///
/// When the saved-criteria flag is raised and a non-empty preset exists,
/// only the preset's predicates run: live filter fields and the free-text
/// search are ignored, and the result keeps the collection's natural order
/// (the shipped page never sorts this branch). Otherwise the optional
/// search predicate runs first, each non-empty filter field is AND-ed on
/// top, and the requested sort is applied last.
#[must_use]
pub fn filter_listings(
    collection: &[Property],
    filters: &Filters,
    saved_criteria: Option<&WishlistCriteria>,
    search: Option<&str>,
) -> FilterOutcome {
    if filters.wishlist_criteria {
        if let Some(criteria) = saved_criteria.filter(|c| !c.is_empty()) {
            let criteria = Criteria::from(criteria);
            let properties = collection
                .iter()
                .filter(|p| criteria.matches(p))
                .cloned()
                .collect();
            return FilterOutcome {
                properties,
                used_saved_criteria: true,
            };
        }
    }

    let criteria = Criteria::from(filters);
    let query = search.map(str::trim).filter(|q| !q.is_empty());
    let mut properties: Vec<Property> = collection
        .iter()
        .filter(|p| query.map_or(true, |q| search_matches(q, p)))
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect();
    sort_listings(&mut properties, filters.sort);
    FilterOutcome {
        properties,
        used_saved_criteria: false,
    }
}

/// Sort in place; `Unsorted` preserves the incoming order and both price
/// sorts are stable with respect to equal prices
pub fn sort_listings(properties: &mut [Property], order: SortOrder) {
    match order {
        SortOrder::Unsorted => {}
        SortOrder::PriceLowHigh => properties.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceHighLow => properties.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
}

/// Page window over a filtered collection.
///
/// Construction resets to page 1: the owning surface builds a fresh
/// paginator every time filters are (re)applied. Navigation clamps at the
/// boundaries and never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    total_items: usize,
    page_size: usize,
}

impl Paginator {
    /// Paginator over `total_items` at the standard listings page size
    #[must_use]
    pub fn new(total_items: usize) -> Self {
        Self::with_page_size(total_items, PAGE_SIZE)
    }

    /// Paginator with an explicit page size (clamped to at least 1)
    #[must_use]
    pub fn with_page_size(total_items: usize, page_size: usize) -> Self {
        Self {
            page: 1,
            total_items,
            page_size: page_size.max(1),
        }
    }

    /// Current page, 1-based
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Number of pages needed for the collection
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Jump to a page, clamped into `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Advance one page; a no-op at the last page
    pub fn next(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    /// Go back one page; a no-op at the first page
    pub fn previous(&mut self) {
        if self.has_previous() {
            self.page -= 1;
        }
    }

    /// The current page's window into the filtered collection
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(name: &str, price: f64) -> Property {
        Property {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            property_type: crate::models::PropertyType::Flat,
            bhk: 2,
            price,
            location: "Pune".to_string(),
            status: "Ready".to_string(),
            progress: 1.0,
            image: String::new(),
            developer: "Acme Homes".to_string(),
            developer_logo: String::new(),
            carpet_area: 1000.0,
            listed_at: None,
            wishlisted: None,
        }
    }

    #[test]
    fn test_price_range_parse_bounded() {
        let range = PriceRange::parse("5000000-7000000").unwrap();
        assert_eq!(range.min, 5_000_000.0);
        assert_eq!(range.max, Some(7_000_000.0));
    }

    #[test]
    fn test_price_range_parse_open_ended() {
        let range = PriceRange::parse("15000000+").unwrap();
        assert_eq!(range.min, 15_000_000.0);
        assert_eq!(range.max, None);
        assert!(range.contains(15_000_000.0));
        assert!(range.contains(90_000_000.0));
        assert!(!range.contains(14_999_999.0));
    }

    #[test]
    fn test_price_range_parse_empty_is_unconstrained() {
        assert_eq!(PriceRange::parse(""), None);
        assert_eq!(PriceRange::parse("   "), None);
    }

    #[test]
    fn test_price_range_boundaries_inclusive() {
        let range = PriceRange::parse("5000000-7000000").unwrap();
        assert!(range.contains(5_000_000.0));
        assert!(range.contains(7_000_000.0));
        assert!(!range.contains(4_999_999.0));
        assert!(!range.contains(7_000_001.0));
    }

    #[test]
    fn test_price_range_strips_currency_noise() {
        let range = PriceRange::parse("₹5000000-₹7000000").unwrap();
        assert_eq!(range.min, 5_000_000.0);
        assert_eq!(range.max, Some(7_000_000.0));
    }

    #[test]
    fn test_area_filter_exact_vs_at_least() {
        assert!(AreaFilter::parse("1500").unwrap().matches(1500.0));
        assert!(!AreaFilter::parse("1500").unwrap().matches(1501.0));
        assert!(AreaFilter::parse("1500+").unwrap().matches(1500.0));
        assert!(AreaFilter::parse("1500+").unwrap().matches(2200.0));
        assert!(!AreaFilter::parse("1500+").unwrap().matches(1499.0));
    }

    #[test]
    fn test_status_matches_upcoming_ignores_label() {
        let mut ready_but_stalled = property("Stalled", 1.0);
        ready_but_stalled.progress = 0.0;
        assert!(status_matches("Upcoming", &ready_but_stalled));
        assert!(status_matches("upcoming", &ready_but_stalled));
        assert!(!status_matches("Ready", &ready_but_stalled));
    }

    #[test]
    fn test_status_matches_label_requires_progress() {
        let ready = property("Ready", 1.0);
        assert!(status_matches("Ready", &ready));
        assert!(status_matches("ready", &ready));
        assert!(!status_matches("Upcoming", &ready));
    }

    #[test]
    fn test_sort_listings_orders() {
        let mut listings = vec![
            property("b", 300.0),
            property("a", 100.0),
            property("c", 200.0),
        ];
        sort_listings(&mut listings, SortOrder::PriceLowHigh);
        let prices: Vec<f64> = listings.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![100.0, 200.0, 300.0]);

        sort_listings(&mut listings, SortOrder::PriceHighLow);
        let prices: Vec<f64> = listings.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![300.0, 200.0, 100.0]);
    }

    #[test]
    fn test_sort_listings_unsorted_preserves_order() {
        let mut listings = vec![property("b", 300.0), property("a", 100.0)];
        sort_listings(&mut listings, SortOrder::Unsorted);
        assert_eq!(listings[0].name, "b");
        assert_eq!(listings[1].name, "a");
    }

    #[test]
    fn test_paginator_window_and_clamping() {
        let items: Vec<usize> = (0..23).collect();
        let mut pager = Paginator::new(items.len());
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.slice(&items).len(), 9);

        pager.next();
        pager.next();
        assert_eq!(pager.page(), 3);
        assert_eq!(pager.slice(&items), &items[18..23]);

        // Never wraps past either edge
        pager.next();
        assert_eq!(pager.page(), 3);
        pager.set_page(99);
        assert_eq!(pager.page(), 3);
        pager.set_page(0);
        assert_eq!(pager.page(), 1);
        pager.previous();
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_paginator_empty_collection() {
        let items: Vec<usize> = Vec::new();
        let pager = Paginator::new(0);
        assert_eq!(pager.total_pages(), 0);
        assert!(!pager.has_next());
        assert!(!pager.has_previous());
        assert!(pager.slice(&items).is_empty());
    }

    #[test]
    fn test_paginator_concatenation_is_lossless() {
        let items: Vec<usize> = (0..40).collect();
        let mut pager = Paginator::new(items.len());
        let mut rebuilt = Vec::new();
        loop {
            rebuilt.extend_from_slice(pager.slice(&items));
            if !pager.has_next() {
                break;
            }
            pager.next();
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn test_empty_state_classification() {
        let empty = FilterOutcome {
            properties: Vec::new(),
            used_saved_criteria: false,
        };
        assert_eq!(empty.empty_state(0), Some(EmptyState::NoData));
        assert_eq!(empty.empty_state(5), Some(EmptyState::NoMatches));

        let saved = FilterOutcome {
            properties: Vec::new(),
            used_saved_criteria: true,
        };
        assert_eq!(saved.empty_state(5), Some(EmptyState::NoSavedCriteriaMatches));

        let non_empty = FilterOutcome {
            properties: vec![property("a", 1.0)],
            used_saved_criteria: false,
        };
        assert_eq!(non_empty.empty_state(5), None);
    }
}
