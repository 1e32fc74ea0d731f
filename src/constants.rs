pub const DEFAULT_SOURCE_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

pub const USER_AGENT: &str = "Salesdash/1.0";

pub mod pagination {

    pub const DEFAULT_PAGE: u64 = 1;

    pub const DEFAULT_PER_PAGE: u64 = 10;
}

pub mod histogram {

    /// Inclusive upper bounds of the closed price buckets. Prices above the
    /// last bound land in the open-ended bucket.
    pub const UPPER_BOUNDS: [u32; 9] = [100, 200, 300, 400, 500, 600, 700, 800, 900];

    pub const OPEN_BUCKET_LABEL: &str = "901-above";
}

pub mod messages {

    pub const INITIALIZED: &str = "Database initialized successfully!";

    pub const FETCH_FAILED: &str = "Failed to fetch data from API";

    pub const MONTH_REQUIRED: &str = "Month parameter is required";

    pub const INVALID_MONTH: &str =
        "Invalid month format. Please use full month names (e.g., January).";
}
