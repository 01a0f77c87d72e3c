//! REST API paths and header names

pub const PRODUCTS_ENDPOINT: &str = "/wp-json/wc/v3/products";
pub const PRODUCTS_BATCH_ENDPOINT: &str = "/wp-json/wc/v3/products/batch";
pub const CATEGORIES_ENDPOINT: &str = "/wp-json/wc/v3/products/categories";

/// Total item count exposed on every collection response
pub const TOTAL_COUNT_HEADER: &str = "X-WP-Total";

/// Page size used when listing categories
pub const CATEGORY_PAGE_SIZE: u64 = 10;
