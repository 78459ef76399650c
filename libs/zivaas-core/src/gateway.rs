//! Remote data gateway: the hosted backend providing row storage,
//! authentication and object storage
//!
//! The core treats the backend as a black box behind [`PropertyGateway`];
//! [`RestGateway`] is the production implementation against a hosted
//! PostgREST-style service. Raw rows come back as-is and are normalized
//! immediately after fetch by the callers in `cache`/`normalize`, so nothing
//! past this boundary branches on wire shape.

use crate::config::GatewayConfig;
use crate::error::{Result, ZivaasError};
use crate::models::{NewProperty, PropertyPatch, Session, UserProfile, UserRole, WishlistCriteria};
use crate::normalize::{RawFloorPlanRow, RawPropertyRow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;
use zivaas_common::IMAGES_BUCKET;

/// Postgres unique-violation code; a wishlist insert colliding with an
/// existing membership row comes back with this
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Columns requested for the listings read, including the joined
/// developer account
const PROPERTY_SELECT: &str = "id,name,property_type,images,developer_id,price,location,status,\
                               configuration,carpet_area,progress,\
                               users(id,username,email,role,developer_logo)";

/// Detail-page read adds the columns the listings grid never shows
const PROPERTY_DETAIL_SELECT: &str =
    "id,name,property_type,images,developer_id,price,location,status,\
     configuration,carpet_area,progress,amenities,nearby_landmarks,\
     created_at,updated_at,users(id,username,email,role,developer_logo)";

/// Request/response contract the core expects from the hosted backend
#[async_trait]
pub trait PropertyGateway: Send + Sync {
    /// All property rows with their joined developer accounts
    async fn fetch_properties(&self) -> Result<Vec<RawPropertyRow>>;

    /// One property row by id
    async fn fetch_property(&self, id: Uuid) -> Result<RawPropertyRow>;

    /// The account record for a signed-in user
    async fn fetch_user(&self, user_id: Uuid) -> Result<UserProfile>;

    /// Ids of every property the user has wishlisted
    async fn fetch_wishlist_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Insert a (user, property) membership row; duplicate pairs fail
    /// with [`ZivaasError::DuplicateMembership`]
    async fn insert_wishlist(&self, user_id: Uuid, property_id: Uuid) -> Result<()>;

    /// Delete a (user, property) membership row
    async fn delete_wishlist(&self, user_id: Uuid, property_id: Uuid) -> Result<()>;

    /// Persist the user's saved filter preset on their account row
    async fn save_wishlist_criteria(
        &self,
        user_id: Uuid,
        criteria: &WishlistCriteria,
    ) -> Result<()>;

    /// Floor plan rows attached to a property
    async fn fetch_floor_plans(&self, property_id: Uuid) -> Result<Vec<RawFloorPlanRow>>;

    /// Create a listing, returning its assigned id
    async fn insert_property(&self, property: &NewProperty) -> Result<Uuid>;

    /// Apply a partial update to a listing
    async fn update_property(&self, id: Uuid, patch: &PropertyPatch) -> Result<()>;

    /// Remove a listing
    async fn delete_property(&self, id: Uuid) -> Result<()>;

    /// Upload an image to the public bucket, returning its public URL
    async fn upload_image(&self, name: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String>;

    /// Exchange credentials for a session
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Register an account and create its profile row
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
        role: UserRole,
    ) -> Result<Session>;
}

/// Error payload the backend returns for failed row operations
#[derive(Debug, Deserialize)]
struct BackendError {
    code: Option<String>,
    message: Option<String>,
}

/// Token response from the auth endpoint
#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct WishlistRow {
    property_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: Uuid,
}

/// Account row as stored; saved criteria may arrive as a JSON object or,
/// on legacy rows, as a JSON-encoded string
#[derive(Debug, Deserialize)]
struct RawUserProfile {
    id: Uuid,
    username: Option<String>,
    email: Option<String>,
    role: Option<String>,
    wishlist_criteria: Option<serde_json::Value>,
    developer_logo: Option<String>,
    developer_image: Option<String>,
}

impl RawUserProfile {
    fn into_profile(self) -> UserProfile {
        let role = match self.role.as_deref() {
            Some(r) if r.eq_ignore_ascii_case("developer") => UserRole::Developer,
            _ => UserRole::Customer,
        };
        UserProfile {
            id: self.id,
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            role,
            wishlist_criteria: self.wishlist_criteria.and_then(parse_criteria_value),
            developer_logo: self.developer_logo,
            developer_image: self.developer_image,
        }
    }
}

fn parse_criteria_value(value: serde_json::Value) -> Option<WishlistCriteria> {
    match value {
        serde_json::Value::String(raw) => match serde_json::from_str(&raw) {
            Ok(criteria) => Some(criteria),
            Err(err) => {
                debug!(%err, "unreadable saved criteria string, treating as unset");
                None
            }
        },
        other => serde_json::from_value(other).ok(),
    }
}

/// Production gateway against the hosted REST backend
#[derive(Debug, Clone)]
pub struct RestGateway {
    base_url: String,
    api_key: String,
    access_token: Option<String>,
    client: Client,
}

impl RestGateway {
    /// Gateway for the configured backend, initially unauthenticated
    /// (requests carry the anonymous API key)
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            access_token: None,
            client: Client::new(),
        }
    }

    /// Same gateway, authenticated with a session token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn storage_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{name}", self.base_url)
    }

    /// Public URL issued for objects in a public bucket
    #[must_use]
    pub fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{name}", self.base_url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        request.header("apikey", &self.api_key).bearer_auth(bearer)
    }

    /// Convert a non-success response into the error taxonomy; unique
    /// violations become `DuplicateMembership`, everything else `Gateway`
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if let Ok(backend) = serde_json::from_str::<BackendError>(&body) {
            if backend.code.as_deref() == Some(UNIQUE_VIOLATION_CODE) {
                return Err(ZivaasError::DuplicateMembership);
            }
            if let Some(message) = backend.message {
                return Err(ZivaasError::gateway(format!("{status}: {message}")));
            }
        }
        Err(ZivaasError::gateway(format!("{status}: {body}")))
    }
}

#[async_trait]
impl PropertyGateway for RestGateway {
    async fn fetch_properties(&self) -> Result<Vec<RawPropertyRow>> {
        let response = self
            .authed(self.client.get(self.rest_url("properties")))
            .query(&[("select", PROPERTY_SELECT)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn fetch_property(&self, id: Uuid) -> Result<RawPropertyRow> {
        let response = self
            .authed(self.client.get(self.rest_url("properties")))
            .query(&[
                ("select", PROPERTY_DETAIL_SELECT.to_string()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<RawPropertyRow> = Self::check(response).await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ZivaasError::PropertyNotFound { id: id.to_string() })
    }

    async fn fetch_user(&self, user_id: Uuid) -> Result<UserProfile> {
        let response = self
            .authed(self.client.get(self.rest_url("users")))
            .query(&[
                (
                    "select",
                    "id,username,email,role,wishlist_criteria,developer_logo,developer_image"
                        .to_string(),
                ),
                ("id", format!("eq.{user_id}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<RawUserProfile> = Self::check(response).await?.json().await?;
        rows.into_iter()
            .next()
            .map(RawUserProfile::into_profile)
            .ok_or_else(|| ZivaasError::UserNotFound {
                id: user_id.to_string(),
            })
    }

    async fn fetch_wishlist_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let response = self
            .authed(self.client.get(self.rest_url("wishlist")))
            .query(&[
                ("select", "property_id".to_string()),
                ("user_id", format!("eq.{user_id}")),
            ])
            .send()
            .await?;
        let rows: Vec<WishlistRow> = Self::check(response).await?.json().await?;
        Ok(rows.into_iter().map(|row| row.property_id).collect())
    }

    async fn insert_wishlist(&self, user_id: Uuid, property_id: Uuid) -> Result<()> {
        let response = self
            .authed(self.client.post(self.rest_url("wishlist")))
            .header("Prefer", "return=minimal")
            .json(&json!({ "user_id": user_id, "property_id": property_id }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_wishlist(&self, user_id: Uuid, property_id: Uuid) -> Result<()> {
        let response = self
            .authed(self.client.delete(self.rest_url("wishlist")))
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("property_id", format!("eq.{property_id}")),
            ])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn save_wishlist_criteria(
        &self,
        user_id: Uuid,
        criteria: &WishlistCriteria,
    ) -> Result<()> {
        let response = self
            .authed(self.client.patch(self.rest_url("users")))
            .query(&[("id", format!("eq.{user_id}"))])
            .json(&json!({ "wishlist_criteria": criteria }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_floor_plans(&self, property_id: Uuid) -> Result<Vec<RawFloorPlanRow>> {
        let response = self
            .authed(self.client.get(self.rest_url("floor_plans")))
            .query(&[("property_id", format!("eq.{property_id}"))])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn insert_property(&self, property: &NewProperty) -> Result<Uuid> {
        let response = self
            .authed(self.client.post(self.rest_url("properties")))
            .header("Prefer", "return=representation")
            .json(property)
            .send()
            .await?;
        let rows: Vec<InsertedRow> = Self::check(response).await?.json().await?;
        rows.into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| ZivaasError::gateway("insert returned no representation"))
    }

    async fn update_property(&self, id: Uuid, patch: &PropertyPatch) -> Result<()> {
        let response = self
            .authed(self.client.patch(self.rest_url("properties")))
            .query(&[("id", format!("eq.{id}"))])
            .json(patch)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_property(&self, id: Uuid) -> Result<()> {
        let response = self
            .authed(self.client.delete(self.rest_url("properties")))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upload_image(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let response = self
            .authed(self.client.post(self.storage_url(IMAGES_BUCKET, name)))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(self.public_url(IMAGES_BUCKET, name))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .authed(self.client.post(url))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        Ok(Session {
            user_id: auth.user.id,
            access_token: auth.access_token,
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
        role: UserRole,
    ) -> Result<Session> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .authed(self.client.post(url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        let session = Session {
            user_id: auth.user.id,
            access_token: auth.access_token,
        };

        // The auth service only issues credentials; the profile row that
        // the rest of the app reads lives in the users table
        let authed = self.clone().with_access_token(session.access_token.clone());
        let response = authed
            .authed(authed.client.post(authed.rest_url("users")))
            .header("Prefer", "return=minimal")
            .json(&json!({
                "id": session.user_id,
                "username": username,
                "email": email,
                "role": role,
            }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(session)
    }
}
