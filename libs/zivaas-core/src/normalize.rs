//! Boundary normalization of raw gateway rows into display models
//!
//! Every function here is total: malformed backend fields degrade to safe
//! defaults (0, "Unknown", a placeholder URL) and are logged for
//! diagnostics, never surfaced or raised. Row-shape quirks (numeric columns
//! delivered as strings, joined records delivered as one object or a
//! one-element array) are resolved here so nothing downstream branches on
//! shape.

use crate::models::{FloorPlan, Landmark, PlanType, Property, PropertyType};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;
use zivaas_common::{
    first_integer, parse_numeric_string, title_case, DEFAULT_DEVELOPER_LOGO,
    DEFAULT_PROPERTY_IMAGE,
};

/// A backend column that may arrive as a JSON number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Coerce to a finite, non-negative `f64`; `None` when unusable
    #[must_use]
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => parse_numeric_string(s),
        }
    }
}

/// A joined record the backend delivers either as a single object or as a
/// one-element array, depending on the relationship cardinality it infers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapse to the first record, the only one these joins ever carry
    #[must_use]
    pub fn into_first(self) -> Option<T> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(items) => items.into_iter().next(),
        }
    }
}

/// Raw `properties` row as the gateway returns it, joined with the owning
/// developer account
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPropertyRow {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub property_type: Option<String>,
    pub configuration: Option<String>,
    pub price: Option<NumberOrText>,
    pub carpet_area: Option<NumberOrText>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub progress: Option<f64>,
    /// Comma-joined image URLs
    pub images: Option<String>,
    /// Amenity labels as stored, any casing
    pub amenities: Option<Vec<String>>,
    /// Comma-joined "Name (distance)" entries
    pub nearby_landmarks: Option<String>,
    pub developer_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub users: Option<OneOrMany<RawUserRow>>,
}

/// Joined `users` record carried on a property row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawUserRow {
    pub id: Option<Uuid>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub developer_logo: Option<String>,
}

/// Raw `floor_plans` row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFloorPlanRow {
    pub id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub plan_type: Option<String>,
    pub image: Option<String>,
}

/// Convert one raw backend row into a `Property`.
///
/// Numeric fields are always finite and non-negative afterwards; text
/// fields fall back to "Unknown"-style defaults; the image always carries
/// a displayable URL.
#[must_use]
pub fn normalize_row(row: RawPropertyRow) -> Property {
    let id = row.id.unwrap_or_else(|| {
        debug!("property row without id, substituting nil");
        Uuid::nil()
    });

    let price = coerce_amount(row.price.as_ref(), id, "price");
    let carpet_area = coerce_amount(row.carpet_area.as_ref(), id, "carpet_area");

    let bhk = row
        .configuration
        .as_deref()
        .and_then(first_integer)
        .unwrap_or(0);

    let status = row
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let progress = match row.progress {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        _ => derive_progress(status),
    };

    let image = first_image(row.images.as_deref()).unwrap_or_else(|| {
        debug!(property_id = %id, "no usable image URL, using placeholder");
        DEFAULT_PROPERTY_IMAGE.to_string()
    });

    let user = row.users.and_then(OneOrMany::into_first);
    let developer = user
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .filter(|s| !s.trim().is_empty())
        .map_or_else(|| "Unknown Developer".to_string(), str::to_string);
    let developer_logo = user
        .as_ref()
        .and_then(|u| u.developer_logo.as_deref())
        .and_then(|logos| first_image(Some(logos)))
        .unwrap_or_else(|| DEFAULT_DEVELOPER_LOGO.to_string());

    Property {
        id,
        name: row
            .name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unnamed Property".to_string()),
        property_type: PropertyType::parse(row.property_type.as_deref().unwrap_or_default()),
        bhk,
        price,
        location: row
            .location
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        status: status.map_or_else(|| "Unknown".to_string(), str::to_string),
        progress,
        image,
        developer,
        developer_logo,
        carpet_area,
        listed_at: row.created_at,
        wishlisted: None,
    }
}

/// Convert one raw floor-plan row; unusable images fall back to the
/// property placeholder so the detail tabs always render
#[must_use]
pub fn normalize_floor_plan(row: RawFloorPlanRow) -> FloorPlan {
    FloorPlan {
        id: row.id.unwrap_or_else(Uuid::nil),
        property_id: row.property_id.unwrap_or_else(Uuid::nil),
        name: row
            .name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Floor Plan".to_string()),
        plan_type: PlanType::parse(row.plan_type.as_deref().unwrap_or_default()),
        image: row
            .image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PROPERTY_IMAGE.to_string()),
    }
}

/// Parse the comma-joined `nearby_landmarks` column: each entry is
/// "Name (distance)"; a missing distance renders as "N/A"
#[must_use]
pub fn parse_landmarks(raw: &str) -> Vec<Landmark> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let (name, distance) = match entry.split_once('(') {
                Some((name, rest)) => (name.trim(), rest.trim_end_matches(')').trim()),
                None => (entry, ""),
            };
            if name.is_empty() {
                return None;
            }
            Some(Landmark {
                name: name.to_string(),
                distance: if distance.is_empty() {
                    "N/A".to_string()
                } else {
                    distance.to_string()
                },
            })
        })
        .collect()
}

/// Title-case amenity labels and drop blanks
#[must_use]
pub fn normalize_amenities<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|amenity| {
            let trimmed = amenity.as_ref().trim().to_lowercase();
            if trimmed.is_empty() {
                None
            } else {
                Some(title_case(&trimmed))
            }
        })
        .collect()
}

fn coerce_amount(value: Option<&NumberOrText>, id: Uuid, field: &str) -> f64 {
    match value {
        Some(v) => match v.as_amount() {
            Some(n) if n >= 0.0 => n,
            _ => {
                debug!(property_id = %id, field, "unusable numeric value, degrading to 0");
                0.0
            }
        },
        None => 0.0,
    }
}

/// Progress is only meaningful as zero vs non-zero: "Upcoming" (and rows
/// with no status at all) sit at 0, everything else is under way or done
fn derive_progress(status: Option<&str>) -> f64 {
    match status {
        None => 0.0,
        Some(s) if s.eq_ignore_ascii_case("upcoming") => 0.0,
        Some(s) if s.eq_ignore_ascii_case("under construction") => 0.5,
        Some(_) => 1.0,
    }
}

fn first_image(images: Option<&str>) -> Option<String> {
    images
        .and_then(|joined| joined.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
