//! Algebraic properties of the listings engine, checked with proptest

use proptest::prelude::*;
use uuid::Uuid;
use zivaas_core::{filter_listings, Filters, Paginator, Property, PropertyType, SortOrder};

fn arbitrary_property() -> impl Strategy<Value = Property> {
    (
        any::<u128>(),
        0u32..6,
        0.0f64..50_000_000.0,
        0.0f64..6000.0,
        prop::sample::select(vec!["Ready", "Under Construction", "Upcoming"]),
        prop::sample::select(vec!["Pune", "Mumbai", "Nashik", "Bengaluru"]),
        prop::sample::select(vec![
            PropertyType::Flat,
            PropertyType::Villa,
            PropertyType::Plot,
            PropertyType::Commercial,
        ]),
    )
        .prop_map(
            |(id, bhk, price, carpet_area, status, location, property_type)| {
                let progress = match status {
                    "Upcoming" => 0.0,
                    "Under Construction" => 0.5,
                    _ => 1.0,
                };
                Property {
                    id: Uuid::from_u128(id),
                    name: format!("Project {}", id % 1000),
                    property_type,
                    bhk,
                    price,
                    location: location.to_string(),
                    status: status.to_string(),
                    progress,
                    image: String::new(),
                    developer: "Prop Dev".to_string(),
                    developer_logo: String::new(),
                    carpet_area,
                    listed_at: None,
                    wishlisted: None,
                }
            },
        )
}

fn arbitrary_filters() -> impl Strategy<Value = Filters> {
    (
        prop::sample::select(vec!["", "pune", "mumbai", "nashik"]),
        prop::sample::select(vec![
            "",
            "0-5000000",
            "5000000-7000000",
            "7000000-10000000",
            "15000000+",
        ]),
        prop::sample::select(vec!["", "1500", "1500+"]),
        prop::sample::select(vec!["", "Flat", "Villa", "Plot", "Commercial"]),
        prop::sample::select(vec!["", "Ready", "Under Construction", "Upcoming"]),
        prop::sample::select(vec![
            SortOrder::Unsorted,
            SortOrder::PriceLowHigh,
            SortOrder::PriceHighLow,
        ]),
    )
        .prop_map(|(location, price, area, property_type, status, sort)| Filters {
            location: location.to_string(),
            price: price.to_string(),
            area: area.to_string(),
            property_type: property_type.to_string(),
            status: status.to_string(),
            sort,
            wishlist_criteria: false,
        })
}

proptest! {
    #[test]
    fn filtering_yields_a_subset(
        collection in prop::collection::vec(arbitrary_property(), 0..40),
        filters in arbitrary_filters(),
    ) {
        let outcome = filter_listings(&collection, &filters, None, None);
        prop_assert!(outcome.properties.len() <= collection.len());
        for property in &outcome.properties {
            prop_assert!(collection.iter().any(|candidate| candidate == property));
        }
        // No property appears twice that appeared once
        for property in &outcome.properties {
            let in_source = collection.iter().filter(|c| *c == property).count();
            let in_result = outcome.properties.iter().filter(|c| *c == property).count();
            prop_assert!(in_result <= in_source);
        }
    }

    #[test]
    fn filtering_is_idempotent(
        collection in prop::collection::vec(arbitrary_property(), 0..40),
        filters in arbitrary_filters(),
    ) {
        let once = filter_listings(&collection, &filters, None, None);
        let twice = filter_listings(&once.properties, &filters, None, None);
        prop_assert_eq!(once.properties, twice.properties);
    }

    #[test]
    fn upcoming_filter_admits_only_zero_progress(
        collection in prop::collection::vec(arbitrary_property(), 0..40),
    ) {
        let filters = Filters {
            status: "Upcoming".to_string(),
            ..Filters::default()
        };
        let outcome = filter_listings(&collection, &filters, None, None);
        for property in &outcome.properties {
            prop_assert!(property.progress == 0.0);
        }
    }

    #[test]
    fn price_sorts_are_monotonic(
        collection in prop::collection::vec(arbitrary_property(), 0..40),
    ) {
        let ascending = filter_listings(
            &collection,
            &Filters { sort: SortOrder::PriceLowHigh, ..Filters::default() },
            None,
            None,
        );
        prop_assert!(ascending
            .properties
            .windows(2)
            .all(|pair| pair[0].price <= pair[1].price));

        let descending = filter_listings(
            &collection,
            &Filters { sort: SortOrder::PriceHighLow, ..Filters::default() },
            None,
            None,
        );
        prop_assert!(descending
            .properties
            .windows(2)
            .all(|pair| pair[0].price >= pair[1].price));
    }

    #[test]
    fn pagination_windows_reconstruct_the_collection(
        collection in prop::collection::vec(arbitrary_property(), 0..50),
    ) {
        let mut pager = Paginator::new(collection.len());
        let mut rebuilt: Vec<Property> = Vec::new();
        loop {
            let window = pager.slice(&collection);
            prop_assert!(window.len() <= pager.page_size());
            rebuilt.extend_from_slice(window);
            if !pager.has_next() {
                break;
            }
            pager.next();
        }
        prop_assert_eq!(rebuilt, collection);
    }
}
