use std::fmt;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::RadioSettings;
use crate::radio::types::{StationFilter, StationRecord};

/// The external station-search capability consulted by
/// [`RadioService`](crate::radio::service::RadioService).
#[async_trait]
pub trait StationDirectory: Send + Sync {
    async fn search(&self, filter: &StationFilter) -> Result<Vec<StationRecord>, DirectoryError>;
}

#[derive(Debug)]
pub enum DirectoryError {
    InvalidUrl(String),
    Request(reqwest::Error),
    Api { status: StatusCode, body: String },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(reason) => write!(f, "invalid directory URL: {reason}"),
            Self::Request(source) => write!(f, "directory request failed: {source}"),
            Self::Api { status, body } => write!(f, "directory API error {status}: {body}"),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(source) => Some(source),
            _ => None,
        }
    }
}

/// Radio Browser (`api.radio-browser.info`) JSON API.
#[derive(Debug, Clone)]
pub struct RadioBrowser {
    settings: RadioSettings,
    http: reqwest::Client,
}

impl RadioBrowser {
    pub fn new(settings: RadioSettings) -> Self {
        Self::with_http_client(settings, reqwest::Client::new())
    }

    pub fn with_http_client(settings: RadioSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    /// Resolves `filter` to the request URL:
    /// `json/stations/by<field>/<term>` for field selectors,
    /// `json/stations/<listing>` for ranked listings, and
    /// `json/stations/search` otherwise. Remaining fields become query
    /// parameters.
    pub fn stations_url(&self, filter: &StationFilter) -> Result<Url, DirectoryError> {
        let mut url = Url::parse(&self.settings.api_base)
            .map_err(|err| DirectoryError::InvalidUrl(format!("{}: {err}", self.settings.api_base)))?;

        let mut query: Vec<(String, String)> = Vec::new();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                DirectoryError::InvalidUrl(format!("{} cannot be a base URL", self.settings.api_base))
            })?;
            segments.pop_if_empty().extend(["json", "stations"]);

            match (filter.by, filter.searchterm.as_deref()) {
                (Some(selector), _) if selector.is_listing() => {
                    segments.push(selector.as_str());
                }
                (Some(selector), term) => {
                    segments.push(&format!("by{}", selector.as_str()));
                    if let Some(term) = term {
                        segments.push(term);
                    }
                }
                (None, term) => {
                    segments.push("search");
                    if let Some(term) = term {
                        query.push(("name".to_string(), term.to_string()));
                    }
                }
            }
        }

        if let Some(limit) = filter.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = filter.offset {
            query.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(order) = filter.order {
            query.push(("order".to_string(), order.as_str().to_string()));
        }
        if let Some(reverse) = filter.reverse {
            query.push(("reverse".to_string(), reverse.to_string()));
        }
        for (key, value) in &filter.extra {
            query.push((key.clone(), query_value(value)));
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl StationDirectory for RadioBrowser {
    async fn search(&self, filter: &StationFilter) -> Result<Vec<StationRecord>, DirectoryError> {
        let url = self.stations_url(filter)?;
        debug!(url = %url, "Searching radio stations");

        let response = self
            .http
            .get(url)
            .header(USER_AGENT, &self.settings.user_agent)
            .send()
            .await
            .map_err(DirectoryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api { status, body });
        }

        let stations: Vec<StationRecord> = response.json().await.map_err(DirectoryError::Request)?;
        debug!(count = stations.len(), "Radio stations received");
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::types::{Selector, StationOrder};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn browser(base: &str) -> RadioBrowser {
        RadioBrowser::new(RadioSettings {
            api_base: base.to_string(),
            user_agent: "airwaves-test/1.0".to_string(),
        })
    }

    #[test]
    fn field_selector_becomes_path_segment() {
        let filter = StationFilter::new()
            .by(Selector::City)
            .searchterm("São Paulo")
            .order(StationOrder::ClickCount)
            .reverse(true)
            .limit(5);
        let url = browser("https://de1.api.radio-browser.info/").stations_url(&filter).unwrap();
        assert_eq!(
            url.as_str(),
            "https://de1.api.radio-browser.info/json/stations/bycity/S%C3%A3o%20Paulo?limit=5&order=clickcount&reverse=true"
        );
    }

    #[test]
    fn listing_selector_ignores_searchterm() {
        let filter = StationFilter::new().by(Selector::TopVote).searchterm("x").limit(5);
        let url = browser("https://example.test").stations_url(&filter).unwrap();
        assert_eq!(url.as_str(), "https://example.test/json/stations/topvote?limit=5");
    }

    #[test]
    fn default_filter_is_unfiltered_search() {
        let url = browser("https://example.test").stations_url(&StationFilter::default()).unwrap();
        assert_eq!(url.as_str(), "https://example.test/json/stations/search");
    }

    #[test]
    fn extra_keys_become_query_parameters() {
        let filter = StationFilter::new()
            .searchterm("jazz fm")
            .extra("hidebroken", true)
            .extra("countrycode", "DE");
        let url = browser("https://example.test").stations_url(&filter).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("name".to_string(), "jazz fm".to_string())));
        assert!(pairs.contains(&("hidebroken".to_string(), "true".to_string())));
        assert!(pairs.contains(&("countrycode".to_string(), "DE".to_string())));
    }

    #[test]
    fn invalid_base_is_reported() {
        let err = browser("not a url").stations_url(&StationFilter::default()).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn search_decodes_station_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/stations/bytag/jazz"))
            .and(query_param("order", "votes"))
            .and(header("user-agent", "airwaves-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"stationuuid": "a", "name": "Jazz One", "url": "http://one", "url_resolved": "http://one/live"},
                {"stationuuid": "b", "name": "Jazz Two", "url": "http://two", "url_resolved": ""}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = StationFilter::new()
            .by(Selector::Tag)
            .searchterm("jazz")
            .order(StationOrder::Votes);
        let stations = browser(&server.uri()).search(&filter).await.unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, "Jazz One");
        assert_eq!(stations[1].url, "http://two");
    }

    #[tokio::test]
    async fn search_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = browser(&server.uri()).search(&StationFilter::default()).await.unwrap_err();
        match err {
            DirectoryError::Api { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
