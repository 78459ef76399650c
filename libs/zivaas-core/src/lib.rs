//! Zivaas Core - listings domain logic for the Zivaas property marketplace
//!
//! This library holds everything between the hosted backend and the
//! presentation surfaces: row normalization, the listings
//! filter/sort/paginate engine, wishlist membership tracking, saved
//! filter presets, the EMI calculator and the gateway client itself.
//!
//! # Quick Start
//!
//! ```no_run
//! use zivaas_core::{
//!     filter_listings, normalize_row, Filters, GatewayConfig, Paginator, PropertyGateway,
//!     RestGateway,
//! };
//!
//! # async fn example() -> zivaas_core::Result<()> {
//! let config = GatewayConfig::from_env()?;
//! let gateway = RestGateway::new(&config);
//!
//! // Fetch and normalize the collection
//! let rows = gateway.fetch_properties().await?;
//! let collection: Vec<_> = rows.into_iter().map(normalize_row).collect();
//!
//! // Run the engine and take the first page
//! let outcome = filter_listings(&collection, &Filters::default(), None, None);
//! let pager = Paginator::new(outcome.properties.len());
//! let page = pager.slice(&outcome.properties);
//! println!("showing {} of {} properties", page.len(), collection.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Features
//!
//! - `test-utils`: Enable the in-memory gateway and sample fixtures
//!   (for testing only)

pub mod cache;
pub mod config;
pub mod emi;
pub mod engine;
pub mod error;
pub mod filters;
pub mod gateway;
pub mod models;
pub mod normalize;
pub mod wishlist;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cache::{CacheConfig, ListingsCache};
pub use config::GatewayConfig;
pub use emi::EmiQuote;
pub use engine::{
    filter_listings, sort_listings, AreaFilter, EmptyState, FilterOutcome, Paginator, PriceRange,
};
pub use error::{Result, ZivaasError};
pub use filters::FilterStore;
pub use gateway::{PropertyGateway, RestGateway, UNIQUE_VIOLATION_CODE};
pub use models::{
    Filters, FloorPlan, Landmark, NewProperty, PlanType, Property, PropertyPatch, PropertyType,
    Session, SortOrder, UserProfile, UserRole, WishlistCriteria,
};
pub use normalize::{
    normalize_amenities, normalize_floor_plan, normalize_row, parse_landmarks, NumberOrText,
    OneOrMany, RawFloorPlanRow, RawPropertyRow, RawUserRow,
};
pub use wishlist::{annotate, RemovalGuard};

/// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
