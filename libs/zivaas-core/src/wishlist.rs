//! Wishlist membership tracking
//!
//! Annotation is a pure cross-reference of the normalized collection
//! against the user's saved ids. Mutations are role-gated to customer
//! accounts and never leave the local annotation claiming something the
//! backend rejected: adds flip the flag only after gateway confirmation,
//! removals are optimistic with an explicit snapshot/commit/rollback
//! guard.

use crate::error::{Result, ZivaasError};
use crate::gateway::PropertyGateway;
use crate::models::{Property, UserProfile, UserRole};
use uuid::Uuid;

/// Stamp every property with whether it appears in the user's wishlist.
/// Pure and total; properties outside `wishlisted_ids` get `Some(false)`,
/// which is distinct from the `None` of an un-annotated collection.
pub fn annotate(properties: &mut [Property], wishlisted_ids: &[Uuid]) {
    for property in properties.iter_mut() {
        property.wishlisted = Some(wishlisted_ids.contains(&property.id));
    }
}

fn require_customer(user: &UserProfile) -> Result<()> {
    if user.role == UserRole::Customer {
        Ok(())
    } else {
        Err(ZivaasError::not_authorized(user.role.as_str()))
    }
}

fn set_flag(properties: &mut [Property], property_id: Uuid, value: bool) {
    if let Some(property) = properties.iter_mut().find(|p| p.id == property_id) {
        property.wishlisted = Some(value);
    }
}

/// Add a property to the user's wishlist.
///
/// The local annotation flips to `true` only after the gateway confirms
/// the insert, so a failed request never shows a false positive.
///
/// # Errors
/// `NotAuthorized` for non-customer accounts, `DuplicateMembership` when
/// the pair already exists, `Gateway` for any other backend failure; the
/// annotation is untouched in every error case
pub async fn add<G>(
    gateway: &G,
    user: &UserProfile,
    properties: &mut [Property],
    property_id: Uuid,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
{
    require_customer(user)?;
    gateway.insert_wishlist(user.id, property_id).await?;
    set_flag(properties, property_id, true);
    Ok(())
}

/// Snapshot of an in-flight optimistic removal: `begin` records the prior
/// annotation and tentatively clears it, `commit` finalizes, `rollback`
/// restores the snapshot
#[derive(Debug)]
#[must_use = "an unresolved removal leaves the tentative state in place"]
pub struct RemovalGuard {
    property_id: Uuid,
    previous: Option<bool>,
}

impl RemovalGuard {
    /// Record the property's current annotation and tentatively mark it
    /// as no longer wishlisted
    pub fn begin(properties: &mut [Property], property_id: Uuid) -> Self {
        let previous = properties
            .iter()
            .find(|p| p.id == property_id)
            .and_then(|p| p.wishlisted);
        set_flag(properties, property_id, false);
        Self {
            property_id,
            previous,
        }
    }

    /// Keep the tentative state; the gateway confirmed the removal
    pub fn commit(self) {}

    /// Restore the annotation recorded at `begin`
    pub fn rollback(self, properties: &mut [Property]) {
        if let Some(property) = properties.iter_mut().find(|p| p.id == self.property_id) {
            property.wishlisted = self.previous;
        }
    }
}

/// Remove a property from the user's wishlist, optimistically.
///
/// The annotation clears immediately; a gateway failure rolls it back to
/// the pre-removal value so the user never observes a persisted-looking
/// false negative.
///
/// # Errors
/// `NotAuthorized` for non-customer accounts (nothing is touched),
/// `Gateway` when the delete fails (the annotation is restored)
pub async fn remove<G>(
    gateway: &G,
    user: &UserProfile,
    properties: &mut [Property],
    property_id: Uuid,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
{
    require_customer(user)?;
    let guard = RemovalGuard::begin(properties, property_id);
    match gateway.delete_wishlist(user.id, property_id).await {
        Ok(()) => {
            guard.commit();
            Ok(())
        }
        Err(err) => {
            guard.rollback(properties);
            Err(err)
        }
    }
}
