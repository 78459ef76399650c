//! Constants shared across the Zivaas listings workspace

/// Number of properties shown per listings page
pub const PAGE_SIZE: usize = 9;

/// Placeholder shown when a property row carries no usable image URL
pub const DEFAULT_PROPERTY_IMAGE: &str = "https://via.placeholder.com/300x300?text=No+Image";

/// Placeholder shown when a developer account has no uploaded logo
pub const DEFAULT_DEVELOPER_LOGO: &str = "https://via.placeholder.com/50?text=Developer";

/// File name of the persisted filter state (the browser build keeps the
/// same payload under a single local-storage entry)
pub const FILTERS_FILENAME: &str = "zivaas_filters.json";

/// Price brackets offered by the listings filter UI
pub const PRICE_BRACKETS: &[&str] = &[
    "0-5000000",
    "5000000-7000000",
    "7000000-10000000",
    "10000000-15000000",
    "15000000+",
];

/// Storage bucket holding uploaded property and profile images
pub const IMAGES_BUCKET: &str = "images";
