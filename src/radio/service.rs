use std::fmt;

use tracing::error;

use crate::radio::directory::StationDirectory;
use crate::radio::types::{Selector, StationFilter, StationOrder, StationRecord};

pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// Error returned to callers of [`RadioService`].
///
/// The underlying directory failure is logged, not exposed: invalid filters,
/// network failures and service errors all look the same from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioError {
    Fetch,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => f.write_str("Failed to fetch radio stations"),
        }
    }
}

impl std::error::Error for RadioError {}

/// Station search with the city and tag presets layered on top.
#[derive(Debug, Clone)]
pub struct RadioService<D> {
    directory: D,
}

impl<D: StationDirectory> RadioService<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub async fn stations(&self, filter: StationFilter) -> Result<Vec<StationRecord>, RadioError> {
        self.directory.search(&filter).await.map_err(|err| {
            error!(error = %err, ?filter, "Station search failed");
            RadioError::Fetch
        })
    }

    /// Most-clicked stations in `city`; `limit` defaults to [`DEFAULT_TOP_LIMIT`].
    pub async fn top_by_city(
        &self,
        city: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StationRecord>, RadioError> {
        self.stations(top_by_city_filter(city, limit)).await
    }

    /// Most-voted stations tagged `tag`; `limit` defaults to [`DEFAULT_TOP_LIMIT`].
    pub async fn top_by_tag(
        &self,
        tag: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StationRecord>, RadioError> {
        self.stations(top_by_tag_filter(tag, limit)).await
    }
}

pub fn top_by_city_filter(city: &str, limit: Option<u32>) -> StationFilter {
    StationFilter::new()
        .by(Selector::City)
        .searchterm(city)
        .order(StationOrder::ClickCount)
        .reverse(true)
        .limit(limit.unwrap_or(DEFAULT_TOP_LIMIT))
}

pub fn top_by_tag_filter(tag: &str, limit: Option<u32>) -> StationFilter {
    StationFilter::new()
        .by(Selector::Tag)
        .searchterm(tag)
        .order(StationOrder::Votes)
        .reverse(true)
        .limit(limit.unwrap_or(DEFAULT_TOP_LIMIT))
}

/// The resolved stream URL when the directory provides one, else the declared URL.
pub fn preferred_stream_url(station: &StationRecord) -> &str {
    if station.url_resolved.is_empty() {
        &station.url
    } else {
        &station.url_resolved
    }
}
