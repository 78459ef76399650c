//! Zivaas CLI library
//!
//! Command definitions, gateway-backed handlers and writer-generic
//! printers for the `zivaas` binary. Handlers stand in for the web
//! listing pages: they merge persisted filter state, run the engine over
//! the cached collection and render one page of results.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zivaas_common::{format_inr, truncate_string};
use zivaas_core::{
    annotate, filter_listings, normalize_amenities, normalize_floor_plan, normalize_row,
    parse_landmarks, wishlist, EmiQuote, FilterOutcome, FilterStore, Filters, FloorPlan,
    ListingsCache, NewProperty, Paginator, Property, PropertyGateway, PropertyPatch, Result,
    SortOrder, UserRole, WishlistCriteria, ZivaasError,
};

/// Uploads past this size are rejected before touching the gateway
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "zivaas")]
#[command(about = "Browse and manage Zivaas property listings")]
#[command(version)]
pub struct Cli {
    /// Base URL of the hosted backend
    #[arg(long, env = "ZIVAAS_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// Anonymous API key for the backend
    #[arg(long, env = "ZIVAAS_GATEWAY_KEY", hide_env_values = true)]
    pub gateway_key: Option<String>,

    /// Session access token from `zivaas login`
    #[arg(long, env = "ZIVAAS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Where the filter state is persisted
    #[arg(long, env = "ZIVAAS_FILTER_STORE")]
    pub filter_store: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Browse listings with filters, sorting and pagination
    Listings {
        /// Free-text search across name, developer and location
        #[arg(long, short)]
        search: Option<String>,
        /// Location substring, case-insensitive
        #[arg(long)]
        location: Option<String>,
        /// Price bracket token, e.g. "5000000-7000000" or "15000000+"
        #[arg(long)]
        price: Option<String>,
        /// Carpet area token, e.g. "1500" (exact) or "1500+" (at least)
        #[arg(long)]
        area: Option<String>,
        /// Property type: Flat, Villa, Plot or Commercial
        #[arg(long = "type")]
        property_type: Option<String>,
        /// Status: Ready, "Under Construction" or Upcoming
        #[arg(long)]
        status: Option<String>,
        /// Sort: priceLowHigh or priceHighLow
        #[arg(long)]
        sort: Option<String>,
        /// Page to display
        #[arg(long, short)]
        page: Option<usize>,
        /// Filter with your saved wishlist criteria
        #[arg(long)]
        saved_criteria: bool,
        /// Reset persisted filters before applying the flags
        #[arg(long)]
        clear: bool,
        /// Signed-in user id; enables wishlist hearts and saved criteria
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// Show one property with floor plans and an optional EMI quote
    Show {
        /// Property id
        id: Uuid,
        /// Loan amount in rupees; enables the EMI quote
        #[arg(long)]
        loan_amount: Option<f64>,
        /// Annual interest rate percentage
        #[arg(long, default_value_t = 8.5)]
        interest_rate: f64,
        /// Tenure in years
        #[arg(long, default_value_t = 20.0)]
        tenure_years: f64,
    },
    /// List developers and their properties
    Developers {
        /// Filter developers by name, case-insensitive
        name: Option<String>,
    },
    /// Manage a customer wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Save a filter preset on your account
    SaveCriteria {
        /// Signed-in user id
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        area: Option<String>,
        #[arg(long = "type")]
        property_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Manage developer listings
    Property {
        #[command(subcommand)]
        action: PropertyAction,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        username: String,
        /// Account role: customer or developer
        #[arg(long, default_value = "customer")]
        role: String,
    },
    /// Gateway health check
    Health,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum WishlistAction {
    /// Add a property to the wishlist
    Add {
        /// Signed-in user id
        #[arg(long)]
        user: Uuid,
        /// Property to add
        property_id: Uuid,
    },
    /// Remove a property from the wishlist
    Remove {
        /// Signed-in user id
        #[arg(long)]
        user: Uuid,
        /// Property to remove
        property_id: Uuid,
    },
    /// Show wishlisted properties
    List {
        /// Signed-in user id
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PropertyAction {
    /// Create a listing
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        carpet_area: f64,
        /// Configuration text, e.g. "3 BHK"
        #[arg(long, default_value = "")]
        configuration: String,
        #[arg(long = "type")]
        property_type: String,
        #[arg(long)]
        status: String,
        /// Comma-joined image URLs
        #[arg(long, default_value = "")]
        images: String,
        /// Developer account owning the listing
        #[arg(long)]
        developer: Uuid,
    },
    /// Update fields on a listing
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        carpet_area: Option<f64>,
        #[arg(long)]
        configuration: Option<String>,
        #[arg(long = "type")]
        property_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        images: Option<String>,
    },
    /// Delete a listing
    Delete { id: Uuid },
    /// Upload an image and print its public URL
    UploadImage {
        /// Image file to upload
        path: PathBuf,
        /// Developer account the object is filed under
        #[arg(long)]
        developer: Uuid,
    },
}

/// EMI quote inputs for the detail view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanArgs {
    /// Loan amount in rupees
    pub amount: f64,
    /// Annual interest rate percentage
    pub rate: f64,
    /// Tenure in years
    pub years: f64,
}

/// Listings request assembled from the command flags
#[derive(Debug, Clone, Default)]
pub struct ListingsRequest {
    pub search: Option<String>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub area: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub saved_criteria: bool,
    pub clear: bool,
    pub user: Option<Uuid>,
}

/// Browse listings: merge the persisted filter state with the request,
/// run the engine over the cached collection and print one page
///
/// # Errors
/// Returns an error when the gateway or the filter store fails
pub async fn run_listings<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    store: &FilterStore,
    request: &ListingsRequest,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let profile = match request.user {
        Some(user_id) => Some(gateway.fetch_user(user_id).await?),
        None => None,
    };
    let saved_preset = profile.as_ref().and_then(|p| p.wishlist_criteria.clone());

    let filters = store.update(|filters| {
        if request.clear {
            filters.clear();
        }
        if let Some(location) = &request.location {
            filters.location = location.clone();
        }
        if let Some(price) = &request.price {
            filters.price = price.clone();
        }
        if let Some(area) = &request.area {
            filters.area = area.clone();
        }
        if let Some(property_type) = &request.property_type {
            filters.property_type = property_type.clone();
        }
        if let Some(status) = &request.status {
            filters.status = status.clone();
        }
        if let Some(sort) = &request.sort {
            filters.sort = SortOrder::parse(sort);
        }
        if request.saved_criteria {
            // The "apply saved criteria" action copies the preset into the
            // persisted state, keeping only the current sort
            match &saved_preset {
                Some(criteria) => *filters = Filters::from_criteria(criteria, filters.sort),
                None => filters.wishlist_criteria = true,
            }
        }
    })?;

    let mut collection = cache.properties(gateway).await?.as_ref().clone();
    if let Some(profile) = profile.as_ref().filter(|p| p.role == UserRole::Customer) {
        let ids = cache.wishlist_ids(gateway, profile.id).await?;
        annotate(&mut collection, &ids);
    }

    let outcome = filter_listings(
        &collection,
        &filters,
        saved_preset.as_ref(),
        request.search.as_deref(),
    );

    let mut pager = Paginator::new(outcome.properties.len());
    if let Some(page) = request.page {
        pager.set_page(page);
    }
    print_listings(writer, &outcome, &pager, collection.len())
}

/// Print one page of listings, or the appropriate empty-state message
///
/// # Errors
/// Returns an error if writing fails
pub fn print_listings<W: Write>(
    writer: &mut W,
    outcome: &FilterOutcome,
    pager: &Paginator,
    collection_len: usize,
) -> Result<()> {
    if let Some(empty) = outcome.empty_state(collection_len) {
        writeln!(writer, "{}", empty.message())?;
        return Ok(());
    }

    writeln!(writer, "Found {} properties:", outcome.properties.len())?;
    for property in pager.slice(&outcome.properties) {
        writeln!(
            writer,
            "  • {} ({})",
            property.name, property.property_type
        )?;
        if property.bhk > 0 {
            writeln!(
                writer,
                "    {} • {} BHK • {}",
                property.location,
                property.bhk,
                format_inr(property.price)
            )?;
        } else {
            writeln!(
                writer,
                "    {} • {}",
                property.location,
                format_inr(property.price)
            )?;
        }
        writeln!(
            writer,
            "    {} • Built by {}",
            property.status, property.developer
        )?;
        if property.wishlisted == Some(true) {
            writeln!(writer, "    ♥ In your wishlist")?;
        }
        writeln!(writer)?;
    }
    if pager.total_pages() > 1 {
        writeln!(writer, "Page {} of {}", pager.page(), pager.total_pages())?;
    }
    Ok(())
}

/// Show a property detail view with floor plans and an optional EMI quote
///
/// # Errors
/// Returns an error when the property does not exist or the gateway fails
pub async fn run_show<G, W>(
    gateway: &G,
    id: Uuid,
    loan: Option<&LoanArgs>,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let row = gateway.fetch_property(id).await?;
    let amenities = normalize_amenities(row.amenities.clone().unwrap_or_default());
    let landmarks = parse_landmarks(row.nearby_landmarks.as_deref().unwrap_or_default());
    let property = normalize_row(row);
    let plans: Vec<FloorPlan> = gateway
        .fetch_floor_plans(id)
        .await?
        .into_iter()
        .map(normalize_floor_plan)
        .collect();

    writeln!(writer, "{} ({})", property.name, property.property_type)?;
    writeln!(writer, "  Location: {}", property.location)?;
    if property.bhk > 0 {
        writeln!(writer, "  Configuration: {} BHK", property.bhk)?;
    }
    writeln!(writer, "  Price: {}", format_inr(property.price))?;
    writeln!(writer, "  Carpet area: {} sq.ft", property.carpet_area)?;
    writeln!(writer, "  Status: {}", property.status)?;
    writeln!(writer, "  Developer: {}", property.developer)?;
    if let Some(listed_at) = property.listed_at {
        writeln!(writer, "  Listed: {}", listed_at.format("%Y-%m-%d"))?;
    }
    writeln!(writer, "  Image: {}", property.image)?;
    if !amenities.is_empty() {
        writeln!(writer, "  Amenities: {}", amenities.join(", "))?;
    }
    if !landmarks.is_empty() {
        writeln!(writer, "  Nearby:")?;
        for landmark in &landmarks {
            writeln!(writer, "    • {} ({})", landmark.name, landmark.distance)?;
        }
    }
    if !plans.is_empty() {
        writeln!(writer, "  Floor plans:")?;
        for plan in &plans {
            writeln!(writer, "    • {} ({:?}) {}", plan.name, plan.plan_type, plan.image)?;
        }
    }

    if let Some(loan) = loan {
        let quote = EmiQuote::calculate(loan.amount, loan.rate, loan.years)?;
        writeln!(writer)?;
        writeln!(
            writer,
            "EMI for {} at {}% over {} years:",
            format_inr(loan.amount),
            loan.rate,
            loan.years
        )?;
        writeln!(writer, "  Monthly EMI: {}", format_inr(quote.monthly_emi))?;
        writeln!(writer, "  Total payable: {}", format_inr(quote.total_amount))?;
        writeln!(writer, "  Total interest: {}", format_inr(quote.total_interest))?;
    }
    Ok(())
}

/// Group the collection by developer and print each one's portfolio
///
/// # Errors
/// Returns an error when the gateway fails or writing fails
pub async fn run_developers<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    name: Option<&str>,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let collection = cache.properties(gateway).await?;
    let mut by_developer: BTreeMap<&str, Vec<&Property>> = BTreeMap::new();
    for property in collection.iter() {
        by_developer
            .entry(property.developer.as_str())
            .or_default()
            .push(property);
    }
    if let Some(wanted) = name {
        let wanted = wanted.to_lowercase();
        by_developer.retain(|developer, _| developer.to_lowercase().contains(&wanted));
    }

    if by_developer.is_empty() {
        writeln!(writer, "No developers found")?;
        return Ok(());
    }
    writeln!(writer, "Found {} developers:", by_developer.len())?;
    for (developer, properties) in &by_developer {
        writeln!(writer, "  • {} ({} listed)", developer, properties.len())?;
        for property in properties {
            writeln!(
                writer,
                "    - {} • {} • {}",
                truncate_string(&property.name, 40),
                property.location,
                format_inr(property.price)
            )?;
        }
    }
    Ok(())
}

/// Add a property to the user's wishlist; duplicate and authorization
/// rejections are printed, not raised
///
/// # Errors
/// Returns an error for gateway failures other than a duplicate insert
pub async fn run_wishlist_add<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    user_id: Uuid,
    property_id: Uuid,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let profile = gateway.fetch_user(user_id).await?;
    let mut collection = cache.properties(gateway).await?.as_ref().clone();
    match wishlist::add(gateway, &profile, &mut collection, property_id).await {
        Ok(()) => {
            cache.invalidate_wishlist(user_id).await;
            let name = collection
                .iter()
                .find(|p| p.id == property_id)
                .map_or("property", |p| p.name.as_str());
            writeln!(writer, "Added {name} to your wishlist")?;
        }
        Err(err @ (ZivaasError::DuplicateMembership | ZivaasError::NotAuthorized { .. })) => {
            writeln!(writer, "{err}")?;
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// Remove a property from the user's wishlist
///
/// # Errors
/// Returns an error for gateway failures; the optimistic annotation is
/// already rolled back by the tracker when that happens
pub async fn run_wishlist_remove<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    user_id: Uuid,
    property_id: Uuid,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let profile = gateway.fetch_user(user_id).await?;
    let mut collection = cache.properties(gateway).await?.as_ref().clone();
    match wishlist::remove(gateway, &profile, &mut collection, property_id).await {
        Ok(()) => {
            cache.invalidate_wishlist(user_id).await;
            writeln!(writer, "Removed from your wishlist")?;
        }
        Err(err @ ZivaasError::NotAuthorized { .. }) => {
            writeln!(writer, "{err}")?;
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// Print the user's wishlisted properties
///
/// # Errors
/// Returns an error when the gateway fails or writing fails
pub async fn run_wishlist_list<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    user_id: Uuid,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let profile = gateway.fetch_user(user_id).await?;
    if profile.role != UserRole::Customer {
        writeln!(
            writer,
            "{}",
            ZivaasError::not_authorized(profile.role.as_str())
        )?;
        return Ok(());
    }

    let ids = cache.wishlist_ids(gateway, user_id).await?;
    let mut collection = cache.properties(gateway).await?.as_ref().clone();
    annotate(&mut collection, &ids);

    let saved: Vec<&Property> = collection
        .iter()
        .filter(|p| p.wishlisted == Some(true))
        .collect();
    if saved.is_empty() {
        writeln!(writer, "Your wishlist is empty")?;
        return Ok(());
    }
    writeln!(writer, "{} properties in your wishlist:", saved.len())?;
    for property in saved {
        writeln!(
            writer,
            "  • {} • {} • {}",
            property.name,
            property.location,
            format_inr(property.price)
        )?;
    }
    Ok(())
}

/// Persist a filter preset on the user's account
///
/// # Errors
/// Returns an error when the gateway fails or writing fails
pub async fn run_save_criteria<G, W>(
    gateway: &G,
    user_id: Uuid,
    criteria: &WishlistCriteria,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let profile = gateway.fetch_user(user_id).await?;
    if profile.role != UserRole::Customer {
        writeln!(
            writer,
            "{}",
            ZivaasError::not_authorized(profile.role.as_str())
        )?;
        return Ok(());
    }
    gateway.save_wishlist_criteria(user_id, criteria).await?;
    writeln!(writer, "Wishlist criteria saved successfully!")?;
    Ok(())
}

/// Create a listing
///
/// # Errors
/// Returns an error when the gateway rejects the insert
pub async fn run_property_add<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    property: &NewProperty,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let id = gateway.insert_property(property).await?;
    cache.invalidate_properties().await;
    writeln!(writer, "Created listing {id}")?;
    Ok(())
}

/// Update a listing
///
/// # Errors
/// Returns an error when the listing is missing or the gateway fails
pub async fn run_property_update<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    id: Uuid,
    patch: &PropertyPatch,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    gateway.update_property(id, patch).await?;
    cache.invalidate_properties().await;
    writeln!(writer, "Updated listing {id}")?;
    Ok(())
}

/// Delete a listing
///
/// # Errors
/// Returns an error when the gateway fails
pub async fn run_property_delete<G, W>(
    gateway: &G,
    cache: &ListingsCache,
    id: Uuid,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    gateway.delete_property(id).await?;
    cache.invalidate_properties().await;
    writeln!(writer, "Deleted listing {id}")?;
    Ok(())
}

/// Upload an image and print its public URL
///
/// # Errors
/// Returns an error when the upload fails
pub async fn run_upload_image<G, W>(
    gateway: &G,
    name: &str,
    bytes: Vec<u8>,
    content_type: &str,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let url = gateway.upload_image(name, bytes, content_type).await?;
    writeln!(writer, "Uploaded {name}")?;
    writeln!(writer, "Public URL: {url}")?;
    Ok(())
}

/// Sign in and print the session token for subsequent commands
///
/// # Errors
/// Returns an error when the credentials are rejected
pub async fn run_login<G, W>(
    gateway: &G,
    email: &str,
    password: &str,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let session = gateway.sign_in(email, password).await?;
    writeln!(writer, "Signed in as {}", session.user_id)?;
    writeln!(writer, "Access token: {}", session.access_token)?;
    Ok(())
}

/// Register an account and print the issued session
///
/// # Errors
/// Returns an error when registration fails
pub async fn run_signup<G, W>(
    gateway: &G,
    email: &str,
    password: &str,
    username: &str,
    role: UserRole,
    writer: &mut W,
) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    let session = gateway.sign_up(email, password, username, role).await?;
    writeln!(writer, "Registered {username} ({role})")?;
    writeln!(writer, "Signed in as {}", session.user_id)?;
    writeln!(writer, "Access token: {}", session.access_token)?;
    Ok(())
}

/// Perform a health check against the gateway
///
/// # Errors
/// Returns an error if the backend is not reachable
pub async fn run_health<G, W>(gateway: &G, writer: &mut W) -> Result<()>
where
    G: PropertyGateway + ?Sized,
    W: Write,
{
    writeln!(writer, "🔍 Checking gateway connection...")?;
    let properties = gateway.fetch_properties().await?;
    writeln!(writer, "✅ Gateway connection successful!")?;
    writeln!(writer, "   Found {} listed properties", properties.len())?;
    Ok(())
}

/// Map a file extension to the upload content type
///
/// # Errors
/// Returns `ZivaasError::Validation` for non-image extensions
pub fn image_content_type(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => Err(ZivaasError::validation("only image files are allowed")),
    }
}

/// Enforce the upload size cap
///
/// # Errors
/// Returns `ZivaasError::Validation` past the 5MB limit
pub fn check_upload_size(len: u64) -> Result<()> {
    if len > MAX_UPLOAD_BYTES {
        return Err(ZivaasError::validation("file size exceeds the 5MB limit"));
    }
    Ok(())
}

/// Object name an upload is filed under: the developer's id segment plus
/// the original file name
#[must_use]
pub fn object_name(developer_id: Uuid, path: &Path) -> String {
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().to_string());
    format!("{developer_id}/{file_name}")
}

/// Parse the role flag for `signup`
#[must_use]
pub fn parse_role(raw: &str) -> UserRole {
    if raw.eq_ignore_ascii_case("developer") {
        UserRole::Developer
    } else {
        UserRole::Customer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zivaas_core::test_utils::{sample_customer, sample_developer, MemoryGateway};

    fn capture() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    fn rendered(cursor: Cursor<Vec<u8>>) -> String {
        String::from_utf8(cursor.into_inner()).unwrap()
    }

    fn store_in(dir: &TempDir) -> FilterStore {
        FilterStore::new(dir.path().join("zivaas_filters.json"))
    }

    #[test]
    fn test_cli_parses_listings_flags() {
        let cli = Cli::try_parse_from([
            "zivaas",
            "listings",
            "--location",
            "pune",
            "--price",
            "5000000-7000000",
            "--sort",
            "priceLowHigh",
            "--page",
            "2",
            "--saved-criteria",
        ])
        .unwrap();
        match cli.command {
            Commands::Listings {
                location,
                price,
                sort,
                page,
                saved_criteria,
                ..
            } => {
                assert_eq!(location.as_deref(), Some("pune"));
                assert_eq!(price.as_deref(), Some("5000000-7000000"));
                assert_eq!(sort.as_deref(), Some("priceLowHigh"));
                assert_eq!(page, Some(2));
                assert!(saved_criteria);
            }
            _ => panic!("Expected listings command"),
        }
    }

    #[test]
    fn test_cli_parses_show_with_loan() {
        let cli = Cli::try_parse_from([
            "zivaas",
            "show",
            "00000000-0000-0000-0000-000000000001",
            "--loan-amount",
            "5000000",
        ])
        .unwrap();
        match cli.command {
            Commands::Show {
                loan_amount,
                interest_rate,
                tenure_years,
                ..
            } => {
                assert_eq!(loan_amount, Some(5_000_000.0));
                assert_eq!(interest_rate, 8.5);
                assert_eq!(tenure_years, 20.0);
            }
            _ => panic!("Expected show command"),
        }
    }

    #[test]
    fn test_cli_parses_show_without_loan() {
        let cli = Cli::try_parse_from(["zivaas", "show", "00000000-0000-0000-0000-000000000001"])
            .unwrap();
        match cli.command {
            Commands::Show { loan_amount, .. } => assert_eq!(loan_amount, None),
            _ => panic!("Expected show command"),
        }
    }

    #[tokio::test]
    async fn test_run_listings_prints_first_page() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut out = capture();
        run_listings(&gateway, &cache, &store, &ListingsRequest::default(), &mut out)
            .await
            .unwrap();

        let output = rendered(out);
        assert!(output.contains("Found 10 properties:"));
        assert!(output.contains("Skyline Residency"));
        assert!(output.contains("Page 1 of 2"));
    }

    #[tokio::test]
    async fn test_run_listings_applies_and_persists_filters() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let request = ListingsRequest {
            status: Some("Ready".to_string()),
            ..ListingsRequest::default()
        };
        let mut out = capture();
        run_listings(&gateway, &cache, &store, &request, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Found 4 properties:"));

        // The status filter persisted; the next run still applies it
        let mut out = capture();
        run_listings(&gateway, &cache, &store, &ListingsRequest::default(), &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Found 4 properties:"));
        assert_eq!(store.load().status, "Ready");
    }

    #[tokio::test]
    async fn test_run_listings_saved_criteria_and_empty_message() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let customer = sample_customer();

        // Saved criteria on the sample account match three Pune rows
        let request = ListingsRequest {
            saved_criteria: true,
            user: Some(customer.id),
            ..ListingsRequest::default()
        };
        let mut out = capture();
        run_listings(&gateway, &cache, &store, &request, &mut out)
            .await
            .unwrap();
        let output = rendered(out);
        assert!(output.contains("Found 3 properties:"));
        assert!(output.contains("Orchard Gate"));

        // Re-save criteria that match nothing and expect the dedicated
        // empty message
        gateway
            .save_wishlist_criteria(
                customer.id,
                &WishlistCriteria {
                    location: Some("Chennai".to_string()),
                    ..WishlistCriteria::default()
                },
            )
            .await
            .unwrap();
        let mut out = capture();
        run_listings(&gateway, &cache, &store, &request, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("No properties match your saved criteria."));
    }

    #[tokio::test]
    async fn test_run_listings_annotates_wishlist_for_customers() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let customer = sample_customer();

        gateway
            .insert_wishlist(customer.id, Uuid::from_u128(1))
            .await
            .unwrap();
        let request = ListingsRequest {
            user: Some(customer.id),
            ..ListingsRequest::default()
        };
        let mut out = capture();
        run_listings(&gateway, &cache, &store, &request, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("♥ In your wishlist"));
    }

    #[tokio::test]
    async fn test_wishlist_add_duplicate_prints_message() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let customer = sample_customer();
        let target = Uuid::from_u128(2);

        let mut out = capture();
        run_wishlist_add(&gateway, &cache, customer.id, target, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Added Lakeside Villa to your wishlist"));

        let mut out = capture();
        run_wishlist_add(&gateway, &cache, customer.id, target, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("already in your wishlist"));
    }

    #[tokio::test]
    async fn test_wishlist_rejects_developer_accounts() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let developer = sample_developer();

        let mut out = capture();
        run_wishlist_add(&gateway, &cache, developer.id, Uuid::from_u128(1), &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Not authorized"));

        let mut out = capture();
        run_wishlist_list(&gateway, &cache, developer.id, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Not authorized"));
    }

    #[tokio::test]
    async fn test_wishlist_list_round_trip() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let customer = sample_customer();
        let target = Uuid::from_u128(3);

        let mut out = capture();
        run_wishlist_list(&gateway, &cache, customer.id, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Your wishlist is empty"));

        run_wishlist_add(&gateway, &cache, customer.id, target, &mut capture())
            .await
            .unwrap();
        let mut out = capture();
        run_wishlist_list(&gateway, &cache, customer.id, &mut out)
            .await
            .unwrap();
        let output = rendered(out);
        assert!(output.contains("1 properties in your wishlist:"));
        assert!(output.contains("Green Acres"));

        run_wishlist_remove(&gateway, &cache, customer.id, target, &mut capture())
            .await
            .unwrap();
        let mut out = capture();
        run_wishlist_list(&gateway, &cache, customer.id, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Your wishlist is empty"));
    }

    #[tokio::test]
    async fn test_run_show_prints_detail_and_emi() {
        let gateway = MemoryGateway::with_sample_data();
        let loan = LoanArgs {
            amount: 5_000_000.0,
            rate: 8.5,
            years: 20.0,
        };

        let mut out = capture();
        run_show(&gateway, Uuid::from_u128(1), Some(&loan), &mut out)
            .await
            .unwrap();

        let output = rendered(out);
        assert!(output.contains("Skyline Residency (Flat)"));
        assert!(output.contains("Configuration: 3 BHK"));
        assert!(output.contains("Floor plans:"));
        assert!(output.contains("3 BHK Unit Plan"));
        assert!(output.contains("Monthly EMI: ₹43391"));
    }

    #[tokio::test]
    async fn test_run_show_unknown_property_errors() {
        let gateway = MemoryGateway::with_sample_data();
        let mut out = capture();
        let err = run_show(&gateway, Uuid::from_u128(9999), None, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, ZivaasError::PropertyNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_developers_groups_and_filters() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();

        let mut out = capture();
        run_developers(&gateway, &cache, None, &mut out).await.unwrap();
        let output = rendered(out);
        assert!(output.contains("Found 5 developers:"));
        assert!(output.contains("Harbor Builders (3 listed)"));

        let mut out = capture();
        run_developers(&gateway, &cache, Some("skyline"), &mut out)
            .await
            .unwrap();
        let output = rendered(out);
        assert!(output.contains("Found 1 developers:"));
        assert!(output.contains("Skyline Group"));
    }

    #[tokio::test]
    async fn test_save_criteria_persists_on_account() {
        let gateway = MemoryGateway::with_sample_data();
        let customer = sample_customer();
        let criteria = WishlistCriteria {
            location: Some("Nashik".to_string()),
            area: Some("1000+".to_string()),
            ..WishlistCriteria::default()
        };

        let mut out = capture();
        run_save_criteria(&gateway, customer.id, &criteria, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Wishlist criteria saved successfully!"));

        let profile = gateway.fetch_user(customer.id).await.unwrap();
        assert_eq!(profile.wishlist_criteria, Some(criteria));
    }

    #[tokio::test]
    async fn test_property_lifecycle() {
        let gateway = MemoryGateway::with_sample_data();
        let cache = ListingsCache::default();
        let developer = sample_developer();

        let new_property = NewProperty {
            name: "Cedar Court".to_string(),
            location: "Pune".to_string(),
            price: 8_200_000.0,
            carpet_area: 1600.0,
            configuration: "3 BHK".to_string(),
            property_type: "Flat".to_string(),
            status: "Upcoming".to_string(),
            images: String::new(),
            developer_id: developer.id,
        };
        let mut out = capture();
        run_property_add(&gateway, &cache, &new_property, &mut out)
            .await
            .unwrap();
        assert!(rendered(out).contains("Created listing"));
        assert_eq!(gateway.fetch_properties().await.unwrap().len(), 11);

        let id = gateway
            .fetch_properties()
            .await
            .unwrap()
            .into_iter()
            .find(|row| row.name.as_deref() == Some("Cedar Court"))
            .and_then(|row| row.id)
            .unwrap();

        let patch = PropertyPatch {
            status: Some("Under Construction".to_string()),
            ..PropertyPatch::default()
        };
        run_property_update(&gateway, &cache, id, &patch, &mut capture())
            .await
            .unwrap();
        let row = gateway.fetch_property(id).await.unwrap();
        assert_eq!(row.status.as_deref(), Some("Under Construction"));

        run_property_delete(&gateway, &cache, id, &mut capture())
            .await
            .unwrap();
        assert_eq!(gateway.fetch_properties().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_upload_image_prints_public_url() {
        let gateway = MemoryGateway::with_sample_data();
        let developer = sample_developer();
        let name = object_name(developer.id, Path::new("front-elevation.jpg"));

        let mut out = capture();
        run_upload_image(&gateway, &name, vec![0xFF, 0xD8], "image/jpeg", &mut out)
            .await
            .unwrap();
        let output = rendered(out);
        assert!(output.contains("Public URL: memory://images/"));
        assert_eq!(gateway.uploaded_names(), vec![name]);
    }

    #[tokio::test]
    async fn test_login_prints_session() {
        let gateway = MemoryGateway::with_sample_data();
        let mut out = capture();
        run_login(&gateway, "asha@example.com", "secret", &mut out)
            .await
            .unwrap();
        let output = rendered(out);
        assert!(output.contains("Signed in as"));
        assert!(output.contains("Access token: test-token"));
    }

    #[tokio::test]
    async fn test_health_reports_collection_size() {
        let gateway = MemoryGateway::with_sample_data();
        let mut out = capture();
        run_health(&gateway, &mut out).await.unwrap();
        let output = rendered(out);
        assert!(output.contains("Gateway connection successful"));
        assert!(output.contains("10 listed properties"));
    }

    #[test]
    fn test_image_content_type() {
        assert_eq!(
            image_content_type(Path::new("a/photo.JPG")).unwrap(),
            "image/jpeg"
        );
        assert_eq!(
            image_content_type(Path::new("plan.png")).unwrap(),
            "image/png"
        );
        assert!(image_content_type(Path::new("notes.pdf")).is_err());
        assert!(image_content_type(Path::new("noextension")).is_err());
    }

    #[test]
    fn test_check_upload_size() {
        assert!(check_upload_size(1024).is_ok());
        assert!(check_upload_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(check_upload_size(MAX_UPLOAD_BYTES + 1).is_err());
    }

    #[test]
    fn test_object_name_includes_developer_segment() {
        let developer = Uuid::from_u128(200);
        let name = object_name(developer, Path::new("/tmp/logo.png"));
        assert_eq!(name, format!("{developer}/logo.png"));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("developer"), UserRole::Developer);
        assert_eq!(parse_role("Developer"), UserRole::Developer);
        assert_eq!(parse_role("customer"), UserRole::Customer);
        assert_eq!(parse_role("anything"), UserRole::Customer);
    }
}
