#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    /// `None` disables the status filter (`SHOPLYTICS_STATUS_FILTER=all`).
    pub default_status: Option<String>,
    pub default_year: i32,
    pub top_categories: usize,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("SHOPLYTICS_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid SHOPLYTICS_PORT: {e}"))?,
            data_dir: std::env::var("SHOPLYTICS_DATA_DIR")
                .unwrap_or_else(|_| "ecommerce_data/".to_string()),
            default_status: parse_status(
                &std::env::var("SHOPLYTICS_STATUS_FILTER").unwrap_or_default(),
                Some(DEFAULT_STATUS),
            ),
            default_year: std::env::var("SHOPLYTICS_DEFAULT_YEAR")
                .unwrap_or_else(|_| "2023".to_string())
                .parse()
                .map_err(|e| format!("invalid SHOPLYTICS_DEFAULT_YEAR: {e}"))?,
            top_categories: std::env::var("SHOPLYTICS_TOP_CATEGORIES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|e| format!("invalid SHOPLYTICS_TOP_CATEGORIES: {e}"))?,
            cors_origins: std::env::var("SHOPLYTICS_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

pub const DEFAULT_STATUS: &str = "delivered";

/// Resolve a status filter value. `"all"` disables the filter; a blank value
/// falls back to `default`.
pub fn parse_status(raw: &str, default: Option<&str>) -> Option<String> {
    match raw.trim() {
        "" => default.map(str::to_string),
        "all" => None,
        status => Some(status.to_string()),
    }
}
