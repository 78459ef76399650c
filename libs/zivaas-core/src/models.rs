//! Data models for Zivaas listings entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Normalized property category
///
/// The backend stores `property_type` as free text; everything the parser
/// does not recognize collapses into `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PropertyType {
    #[serde(rename = "flat")]
    Flat,
    #[serde(rename = "villa")]
    Villa,
    #[serde(rename = "plot")]
    Plot,
    #[serde(rename = "commercial")]
    Commercial,
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl PropertyType {
    /// Parse a free-text category, case-insensitively. Total: unrecognized
    /// or empty input becomes `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "flat" => Self::Flat,
            "villa" => Self::Villa,
            "plot" => Self::Plot,
            "commercial" => Self::Commercial,
            _ => Self::Unknown,
        }
    }

    /// Display label as shown in the listings UI
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flat => "Flat",
            Self::Villa => "Villa",
            Self::Plot => "Plot",
            Self::Commercial => "Commercial",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Account role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "customer")]
    Customer,
    #[serde(rename = "developer")]
    Developer,
}

impl UserRole {
    /// Lowercase label matching the backend `role` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Developer => "developer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listed real-estate unit/project, normalized for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Stable identifier assigned by the backend
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Normalized category
    pub property_type: PropertyType,
    /// Bedroom count derived from the free-text configuration
    pub bhk: u32,
    /// Asking price in rupees; 0 when the backend value was unusable
    pub price: f64,
    /// Display location
    pub location: String,
    /// Free-text lifecycle label ("Ready", "Under Construction", "Upcoming", ...)
    pub status: String,
    /// Construction progress; only `== 0` vs `> 0` carries meaning
    pub progress: f64,
    /// First image URL, never empty (placeholder when the row has none)
    pub image: String,
    /// Developer display name from the joined account row
    pub developer: String,
    /// Developer logo URL, never empty
    pub developer_logo: String,
    /// Carpet area in square feet; 0 when the backend value was unusable
    pub carpet_area: f64,
    /// When the listing was created, if the backend recorded it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listed_at: Option<DateTime<Utc>>,
    /// Wishlist membership; `None` until the tracker has annotated the
    /// collection, which is distinct from `Some(false)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishlisted: Option<bool>,
}

/// Sort applied to the listings page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    /// Preserve the collection's natural order
    #[serde(rename = "")]
    #[default]
    Unsorted,
    #[serde(rename = "priceLowHigh")]
    PriceLowHigh,
    #[serde(rename = "priceHighLow")]
    PriceHighLow,
}

impl SortOrder {
    /// Parse the UI token; anything unrecognized leaves the order alone
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "priceLowHigh" => Self::PriceLowHigh,
            "priceHighLow" => Self::PriceHighLow,
            _ => Self::Unsorted,
        }
    }
}

/// Live filter state owned by the listings page and persisted after every
/// mutation. Empty string fields impose no constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Filters {
    pub location: String,
    pub price: String,
    pub area: String,
    pub property_type: String,
    pub status: String,
    pub sort: SortOrder,
    /// When set, the engine filters on the account's saved criteria and
    /// ignores the fields above (except `sort`, which is also ignored by
    /// the saved-criteria branch itself)
    #[serde(rename = "wishlistCriteria")]
    pub wishlist_criteria: bool,
}

impl Filters {
    /// True when no field constrains the collection
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.wishlist_criteria
            && self.location.is_empty()
            && self.price.is_empty()
            && self.area.is_empty()
            && self.property_type.is_empty()
            && self.status.is_empty()
    }

    /// Reset every field, including the saved-criteria flag
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Build the filter state produced by the "apply saved criteria"
    /// action: the criteria fields are copied in, the current sort is kept
    /// and the saved-criteria flag is raised.
    #[must_use]
    pub fn from_criteria(criteria: &WishlistCriteria, sort: SortOrder) -> Self {
        Self {
            location: criteria.location.clone().unwrap_or_default(),
            price: criteria.price.clone().unwrap_or_default(),
            area: criteria.area.clone().unwrap_or_default(),
            property_type: criteria.property_type.clone().unwrap_or_default(),
            status: criteria.status.clone().unwrap_or_default(),
            sort,
            wishlist_criteria: true,
        }
    }
}

/// A saved filter preset owned by a customer account, stored server-side
/// and re-applied with one action. Matching semantics are identical to the
/// corresponding `Filters` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WishlistCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl WishlistCriteria {
    /// True when no criterion is set; the engine treats an empty preset as
    /// "nothing saved" and falls back to the live filters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        fn unset(field: &Option<String>) -> bool {
            field.as_deref().map_or(true, str::is_empty)
        }
        unset(&self.location)
            && unset(&self.price)
            && unset(&self.area)
            && unset(&self.property_type)
            && unset(&self.status)
    }
}

/// A registered account as read from the backend `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Saved filter preset, if the customer ever stored one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishlist_criteria: Option<WishlistCriteria>,
    /// Comma-joined logo URLs uploaded by developer accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_image: Option<String>,
}

/// Floor plan category shown as detail-page tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlanType {
    #[serde(rename = "residential")]
    Residential,
    #[serde(rename = "commercial")]
    Commercial,
    #[serde(rename = "other")]
    #[default]
    Other,
}

impl PlanType {
    /// Parse the backend `type` column, case-insensitively
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "residential" => Self::Residential,
            "commercial" => Self::Commercial,
            _ => Self::Other,
        }
    }
}

/// One floor plan image attached to a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub plan_type: PlanType,
    pub image: String,
}

/// A nearby landmark parsed from the detail row ("School (2 km)")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub distance: String,
}

/// Session issued by the gateway after credential sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
}

/// Insert payload for a developer creating a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub name: String,
    pub location: String,
    pub price: f64,
    pub carpet_area: f64,
    pub configuration: String,
    pub property_type: String,
    pub status: String,
    /// Comma-joined image URLs as returned by the storage uploads
    pub images: String,
    pub developer_id: Uuid,
}

/// Partial update for an existing listing; `None` fields are untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carpet_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
}
