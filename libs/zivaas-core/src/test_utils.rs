//! Test utilities and mock data for the Zivaas core
//!
//! `sample_properties()` is a fixed 10-property collection sized for the
//! engine and wishlist tests: four "Ready" rows past zero progress, one
//! "Ready" row stuck at zero progress (a data error the Upcoming filter
//! must still catch), two under construction and three upcoming.
//! [`MemoryGateway`] implements the full gateway contract in memory,
//! including the wishlist uniqueness constraint.

use crate::error::{Result, ZivaasError};
use crate::gateway::PropertyGateway;
use crate::models::{
    NewProperty, Property, PropertyPatch, PropertyType, Session, UserProfile, UserRole,
    WishlistCriteria,
};
use crate::normalize::{OneOrMany, RawFloorPlanRow, RawPropertyRow, RawUserRow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Fixed id of the sample customer account
#[must_use]
pub fn sample_customer() -> UserProfile {
    UserProfile {
        id: Uuid::from_u128(100),
        username: "asha".to_string(),
        email: "asha@example.com".to_string(),
        role: UserRole::Customer,
        wishlist_criteria: Some(sample_criteria()),
        developer_logo: None,
        developer_image: None,
    }
}

/// Fixed id of the sample developer account
#[must_use]
pub fn sample_developer() -> UserProfile {
    UserProfile {
        id: Uuid::from_u128(200),
        username: "Skyline Group".to_string(),
        email: "projects@skyline.example".to_string(),
        role: UserRole::Developer,
        wishlist_criteria: None,
        developer_logo: Some("https://cdn.zivaas.in/logos/skyline.png".to_string()),
        developer_image: None,
    }
}

/// The saved preset stored on the sample customer account
#[must_use]
pub fn sample_criteria() -> WishlistCriteria {
    WishlistCriteria {
        location: Some("Pune".to_string()),
        price: Some("5000000-10000000".to_string()),
        ..WishlistCriteria::default()
    }
}

struct Fixture {
    name: &'static str,
    property_type: PropertyType,
    bhk: u32,
    price: f64,
    location: &'static str,
    status: &'static str,
    progress: f64,
    carpet_area: f64,
    developer: &'static str,
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        name: "Skyline Residency",
        property_type: PropertyType::Flat,
        bhk: 3,
        price: 6_500_000.0,
        location: "Pune",
        status: "Ready",
        progress: 1.0,
        carpet_area: 1450.0,
        developer: "Skyline Group",
    },
    Fixture {
        name: "Lakeside Villa",
        property_type: PropertyType::Villa,
        bhk: 4,
        price: 12_000_000.0,
        location: "Pune",
        status: "Ready",
        progress: 1.0,
        carpet_area: 2200.0,
        developer: "Lakeside Estates",
    },
    Fixture {
        name: "Green Acres",
        property_type: PropertyType::Plot,
        bhk: 0,
        price: 3_500_000.0,
        location: "Nashik",
        status: "Ready",
        progress: 1.0,
        carpet_area: 1500.0,
        developer: "Green Acres Developers",
    },
    Fixture {
        name: "Harbor Heights",
        property_type: PropertyType::Flat,
        bhk: 2,
        price: 5_500_000.0,
        location: "Mumbai",
        status: "Ready",
        progress: 1.0,
        carpet_area: 950.0,
        developer: "Harbor Builders",
    },
    Fixture {
        // Status says Ready but progress never moved; the Upcoming
        // filter keys on progress and must still include this row
        name: "Stalled Towers",
        property_type: PropertyType::Flat,
        bhk: 2,
        price: 4_800_000.0,
        location: "Mumbai",
        status: "Ready",
        progress: 0.0,
        carpet_area: 1000.0,
        developer: "Harbor Builders",
    },
    Fixture {
        name: "Crestline Phase II",
        property_type: PropertyType::Flat,
        bhk: 3,
        price: 7_800_000.0,
        location: "Pune",
        status: "Under Construction",
        progress: 0.5,
        carpet_area: 1500.0,
        developer: "Skyline Group",
    },
    Fixture {
        name: "Meadow Court",
        property_type: PropertyType::Villa,
        bhk: 5,
        price: 21_000_000.0,
        location: "Bengaluru",
        status: "Under Construction",
        progress: 0.5,
        carpet_area: 3200.0,
        developer: "Meadow Homes",
    },
    Fixture {
        name: "Sunrise Enclave",
        property_type: PropertyType::Flat,
        bhk: 1,
        price: 2_900_000.0,
        location: "Nashik",
        status: "Upcoming",
        progress: 0.0,
        carpet_area: 600.0,
        developer: "Green Acres Developers",
    },
    Fixture {
        name: "Metro Trade Park",
        property_type: PropertyType::Commercial,
        bhk: 0,
        price: 15_000_000.0,
        location: "Mumbai",
        status: "Upcoming",
        progress: 0.0,
        carpet_area: 5000.0,
        developer: "Harbor Builders",
    },
    Fixture {
        name: "Orchard Gate",
        property_type: PropertyType::Plot,
        bhk: 0,
        price: 9_500_000.0,
        location: "Pune",
        status: "Upcoming",
        progress: 0.0,
        carpet_area: 2400.0,
        developer: "Lakeside Estates",
    },
];

/// Ten normalized properties with stable ids (`Uuid::from_u128(1..=10)`)
#[must_use]
pub fn sample_properties() -> Vec<Property> {
    FIXTURES
        .iter()
        .enumerate()
        .map(|(index, fixture)| Property {
            id: Uuid::from_u128(index as u128 + 1),
            name: fixture.name.to_string(),
            property_type: fixture.property_type,
            bhk: fixture.bhk,
            price: fixture.price,
            location: fixture.location.to_string(),
            status: fixture.status.to_string(),
            progress: fixture.progress,
            image: format!("https://cdn.zivaas.in/img/{}.jpg", index + 1),
            developer: fixture.developer.to_string(),
            developer_logo: format!("https://cdn.zivaas.in/logos/{}.png", index + 1),
            carpet_area: fixture.carpet_area,
            listed_at: None,
            wishlisted: None,
        })
        .collect()
}

/// The same collection as raw gateway rows, for exercising the
/// normalization pipeline end to end
#[must_use]
pub fn sample_raw_rows() -> Vec<RawPropertyRow> {
    sample_properties()
        .into_iter()
        .map(|property| RawPropertyRow {
            id: Some(property.id),
            name: Some(property.name),
            property_type: Some(property.property_type.label().to_string()),
            configuration: (property.bhk > 0).then(|| format!("{} BHK", property.bhk)),
            price: Some(crate::normalize::NumberOrText::Number(property.price)),
            carpet_area: Some(crate::normalize::NumberOrText::Number(property.carpet_area)),
            location: Some(property.location),
            status: Some(property.status),
            progress: Some(property.progress),
            images: Some(property.image),
            amenities: None,
            nearby_landmarks: None,
            developer_id: None,
            created_at: None,
            updated_at: None,
            users: Some(OneOrMany::One(RawUserRow {
                id: None,
                username: Some(property.developer),
                email: None,
                role: Some("developer".to_string()),
                developer_logo: Some(property.developer_logo),
            })),
        })
        .collect()
}

/// In-memory gateway honoring the full contract, including the wishlist
/// uniqueness constraint
#[derive(Debug, Default)]
pub struct MemoryGateway {
    properties: Mutex<Vec<RawPropertyRow>>,
    users: Mutex<HashMap<Uuid, UserProfile>>,
    wishlist: Mutex<Vec<(Uuid, Uuid)>>,
    floor_plans: Mutex<Vec<RawFloorPlanRow>>,
    uploads: Mutex<Vec<String>>,
    fail_next_delete: AtomicBool,
    property_fetches: AtomicUsize,
}

impl MemoryGateway {
    /// Empty gateway
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway seeded with the sample collection, both sample accounts
    /// and two floor plans on the first property
    #[must_use]
    pub fn with_sample_data() -> Self {
        let gateway = Self::new();
        *gateway.properties.lock().unwrap() = sample_raw_rows();

        let mut users = HashMap::new();
        for profile in [sample_customer(), sample_developer()] {
            users.insert(profile.id, profile);
        }
        *gateway.users.lock().unwrap() = users;

        *gateway.floor_plans.lock().unwrap() = vec![
            RawFloorPlanRow {
                id: Some(Uuid::from_u128(901)),
                property_id: Some(Uuid::from_u128(1)),
                name: Some("3 BHK Unit Plan".to_string()),
                plan_type: Some("residential".to_string()),
                image: Some("https://cdn.zivaas.in/plans/1-unit.png".to_string()),
            },
            RawFloorPlanRow {
                id: Some(Uuid::from_u128(902)),
                property_id: Some(Uuid::from_u128(1)),
                name: Some("Site Plan".to_string()),
                plan_type: Some("other".to_string()),
                image: Some("https://cdn.zivaas.in/plans/1-site.png".to_string()),
            },
        ];
        gateway
    }

    /// Make the next wishlist delete fail, for rollback tests
    pub fn fail_next_delete(&self) {
        self.fail_next_delete.store(true, Ordering::SeqCst);
    }

    /// How many times the property collection was fetched (cache tests)
    #[must_use]
    pub fn property_fetch_count(&self) -> usize {
        self.property_fetches.load(Ordering::SeqCst)
    }

    /// Names of every uploaded object
    #[must_use]
    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PropertyGateway for MemoryGateway {
    async fn fetch_properties(&self) -> Result<Vec<RawPropertyRow>> {
        self.property_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.properties.lock().unwrap().clone())
    }

    async fn fetch_property(&self, id: Uuid) -> Result<RawPropertyRow> {
        self.properties
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == Some(id))
            .cloned()
            .ok_or_else(|| ZivaasError::PropertyNotFound { id: id.to_string() })
    }

    async fn fetch_user(&self, user_id: Uuid) -> Result<UserProfile> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ZivaasError::UserNotFound {
                id: user_id.to_string(),
            })
    }

    async fn fetch_wishlist_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .wishlist
            .lock()
            .unwrap()
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, property)| *property)
            .collect())
    }

    async fn insert_wishlist(&self, user_id: Uuid, property_id: Uuid) -> Result<()> {
        let mut wishlist = self.wishlist.lock().unwrap();
        if wishlist.contains(&(user_id, property_id)) {
            return Err(ZivaasError::DuplicateMembership);
        }
        wishlist.push((user_id, property_id));
        Ok(())
    }

    async fn delete_wishlist(&self, user_id: Uuid, property_id: Uuid) -> Result<()> {
        if self.fail_next_delete.swap(false, Ordering::SeqCst) {
            return Err(ZivaasError::gateway("simulated gateway failure"));
        }
        self.wishlist
            .lock()
            .unwrap()
            .retain(|pair| *pair != (user_id, property_id));
        Ok(())
    }

    async fn save_wishlist_criteria(
        &self,
        user_id: Uuid,
        criteria: &WishlistCriteria,
    ) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let profile = users
            .get_mut(&user_id)
            .ok_or_else(|| ZivaasError::UserNotFound {
                id: user_id.to_string(),
            })?;
        profile.wishlist_criteria = Some(criteria.clone());
        Ok(())
    }

    async fn fetch_floor_plans(&self, property_id: Uuid) -> Result<Vec<RawFloorPlanRow>> {
        Ok(self
            .floor_plans
            .lock()
            .unwrap()
            .iter()
            .filter(|plan| plan.property_id == Some(property_id))
            .cloned()
            .collect())
    }

    async fn insert_property(&self, property: &NewProperty) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let developer = self
            .users
            .lock()
            .unwrap()
            .get(&property.developer_id)
            .cloned();
        self.properties.lock().unwrap().push(RawPropertyRow {
            id: Some(id),
            name: Some(property.name.clone()),
            property_type: Some(property.property_type.clone()),
            configuration: Some(property.configuration.clone()),
            price: Some(crate::normalize::NumberOrText::Number(property.price)),
            carpet_area: Some(crate::normalize::NumberOrText::Number(property.carpet_area)),
            location: Some(property.location.clone()),
            status: Some(property.status.clone()),
            progress: None,
            images: Some(property.images.clone()),
            amenities: None,
            nearby_landmarks: None,
            developer_id: Some(property.developer_id),
            created_at: Some(chrono::Utc::now()),
            updated_at: Some(chrono::Utc::now()),
            users: developer.map(|profile| {
                OneOrMany::One(RawUserRow {
                    id: Some(profile.id),
                    username: Some(profile.username),
                    email: Some(profile.email),
                    role: Some(profile.role.as_str().to_string()),
                    developer_logo: profile.developer_logo,
                })
            }),
        });
        Ok(id)
    }

    async fn update_property(&self, id: Uuid, patch: &PropertyPatch) -> Result<()> {
        let mut properties = self.properties.lock().unwrap();
        let row = properties
            .iter_mut()
            .find(|row| row.id == Some(id))
            .ok_or_else(|| ZivaasError::PropertyNotFound { id: id.to_string() })?;

        if let Some(name) = &patch.name {
            row.name = Some(name.clone());
        }
        if let Some(location) = &patch.location {
            row.location = Some(location.clone());
        }
        if let Some(price) = patch.price {
            row.price = Some(crate::normalize::NumberOrText::Number(price));
        }
        if let Some(carpet_area) = patch.carpet_area {
            row.carpet_area = Some(crate::normalize::NumberOrText::Number(carpet_area));
        }
        if let Some(configuration) = &patch.configuration {
            row.configuration = Some(configuration.clone());
        }
        if let Some(property_type) = &patch.property_type {
            row.property_type = Some(property_type.clone());
        }
        if let Some(status) = &patch.status {
            row.status = Some(status.clone());
        }
        if let Some(images) = &patch.images {
            row.images = Some(images.clone());
        }
        Ok(())
    }

    async fn delete_property(&self, id: Uuid) -> Result<()> {
        self.properties
            .lock()
            .unwrap()
            .retain(|row| row.id != Some(id));
        Ok(())
    }

    async fn upload_image(
        &self,
        name: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        self.uploads.lock().unwrap().push(name.to_string());
        Ok(format!("memory://images/{name}"))
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|profile| profile.email == email)
            .map(|profile| Session {
                user_id: profile.id,
                access_token: "test-token".to_string(),
            })
            .ok_or_else(|| ZivaasError::gateway("invalid login credentials"))
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        username: &str,
        role: UserRole,
    ) -> Result<Session> {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            wishlist_criteria: None,
            developer_logo: None,
            developer_image: None,
        };
        let session = Session {
            user_id: profile.id,
            access_token: "test-token".to_string(),
        };
        self.users.lock().unwrap().insert(profile.id, profile);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_row;

    #[test]
    fn test_sample_collection_shape() {
        let properties = sample_properties();
        assert_eq!(properties.len(), 10);

        let ready_in_progress = properties
            .iter()
            .filter(|p| p.status == "Ready" && p.progress > 0.0)
            .count();
        assert_eq!(ready_in_progress, 4);

        let zero_progress = properties.iter().filter(|p| p.progress == 0.0).count();
        assert_eq!(zero_progress, 4);
    }

    #[test]
    fn test_raw_rows_normalize_back_to_samples() {
        let normalized: Vec<Property> =
            sample_raw_rows().into_iter().map(normalize_row).collect();
        assert_eq!(normalized, sample_properties());
    }

    #[tokio::test]
    async fn test_memory_gateway_round_trips() {
        let gateway = MemoryGateway::with_sample_data();
        assert_eq!(gateway.fetch_properties().await.unwrap().len(), 10);

        let customer = sample_customer();
        let fetched = gateway.fetch_user(customer.id).await.unwrap();
        assert_eq!(fetched, customer);

        let plans = gateway.fetch_floor_plans(Uuid::from_u128(1)).await.unwrap();
        assert_eq!(plans.len(), 2);
    }
}
