//! Query-string parsing shared by every data endpoint.

use serde::Deserialize;

use shoplytics_core::config::{parse_status, Config};
use shoplytics_core::dashboard::DashboardRequest;
use shoplytics_core::sales::SalesFilter;

use crate::error::AppError;

/// `?year=&month=&status=&compare_year=`, kept as raw strings so invalid
/// values surface as `validation_error` rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub status: Option<String>,
    pub compare_year: Option<String>,
}

fn is_unset(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("all")
}

pub fn parse_year(raw: Option<&str>, field: &'static str) -> Result<Option<i32>, AppError> {
    match raw {
        None => Ok(None),
        Some(raw) if is_unset(raw) => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::invalid(field, format!("{raw:?} is not a year"))),
    }
}

/// `1`–`12`, or `all`/empty for the whole year.
pub fn parse_month(raw: Option<&str>) -> Result<Option<u32>, AppError> {
    let Some(raw) = raw.filter(|r| !is_unset(r)) else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(Some(month)),
        _ => Err(AppError::invalid(
            "month",
            format!("{raw:?} must be between 1 and 12 or \"all\""),
        )),
    }
}

/// An explicit `status` wins over the configured default; `all` disables it
/// and a blank value keeps the default.
pub fn resolve_status(raw: Option<&str>, default: Option<&str>) -> Option<String> {
    parse_status(raw.unwrap_or_default(), default)
}

impl SalesQuery {
    pub fn filter(&self, config: &Config) -> Result<SalesFilter, AppError> {
        Ok(SalesFilter {
            year: parse_year(self.year.as_deref(), "year")?,
            month: parse_month(self.month.as_deref())?,
            status: resolve_status(self.status.as_deref(), config.default_status.as_deref()),
        })
    }

    pub fn compare_year(&self) -> Result<Option<i32>, AppError> {
        parse_year(self.compare_year.as_deref(), "compare_year")
    }

    pub fn dashboard_request(&self, config: &Config) -> Result<DashboardRequest, AppError> {
        let filter = self.filter(config)?;
        Ok(DashboardRequest {
            year: filter.year,
            month: filter.month,
            status: filter.status,
        })
    }
}
