use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which station list a search runs against.
///
/// Field selectors (`tag`, `city`, ...) match `searchterm` against that field;
/// `topclick` and `topvote` are ranked listings that ignore `searchterm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    Tag,
    Country,
    State,
    Language,
    Name,
    City,
    TopClick,
    TopVote,
}

impl Selector {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Country => "country",
            Self::State => "state",
            Self::Language => "language",
            Self::Name => "name",
            Self::City => "city",
            Self::TopClick => "topclick",
            Self::TopVote => "topvote",
        }
    }

    pub fn is_listing(self) -> bool {
        matches!(self, Self::TopClick | Self::TopVote)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tag" => Ok(Self::Tag),
            "country" => Ok(Self::Country),
            "state" => Ok(Self::State),
            "language" => Ok(Self::Language),
            "name" => Ok(Self::Name),
            "city" => Ok(Self::City),
            "topclick" => Ok(Self::TopClick),
            "topvote" => Ok(Self::TopVote),
            other => Err(format!(
                "Invalid selector '{other}'. Supported values: tag, country, state, language, name, city, topclick, topvote."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationOrder {
    Name,
    Votes,
    ClickCount,
    Bitrate,
}

impl StationOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Votes => "votes",
            Self::ClickCount => "clickcount",
            Self::Bitrate => "bitrate",
        }
    }
}

impl fmt::Display for StationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StationOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "votes" => Ok(Self::Votes),
            "clickcount" => Ok(Self::ClickCount),
            "bitrate" => Ok(Self::Bitrate),
            other => Err(format!(
                "Invalid order '{other}'. Supported values: name, votes, clickcount, bitrate."
            )),
        }
    }
}

/// Search filter. Every field is optional; the default filter is an
/// unfiltered search. Keys in `extra` are forwarded without validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<Selector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchterm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<StationOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(mut self, selector: Selector) -> Self {
        self.by = Some(selector);
        self
    }

    pub fn searchterm(mut self, term: impl Into<String>) -> Self {
        self.searchterm = Some(term.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order(mut self, order: StationOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// One station as returned by the directory. Read-only pass-through; unknown
/// fields survive in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationRecord {
    pub stationuuid: String,
    pub name: String,
    pub url: String,
    pub url_resolved: String,
    pub homepage: String,
    pub favicon: String,
    pub tags: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub language: String,
    pub votes: u64,
    pub clickcount: u64,
    pub bitrate: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StationRecord {
    pub fn stream_url(&self) -> &str {
        crate::radio::service::preferred_stream_url(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_serializes_only_present_fields() {
        let filter = StationFilter::new()
            .by(Selector::City)
            .searchterm("Berlin")
            .order(StationOrder::ClickCount)
            .reverse(true)
            .limit(5);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"by": "city", "searchterm": "Berlin", "order": "clickcount", "reverse": true, "limit": 5})
        );
        assert_eq!(serde_json::to_value(StationFilter::default()).unwrap(), json!({}));
    }

    #[test]
    fn unknown_filter_keys_pass_through() {
        let filter: StationFilter = serde_json::from_value(json!({
            "by": "topvote",
            "limit": 5,
            "hidebroken": true
        }))
        .unwrap();
        assert_eq!(filter.by, Some(Selector::TopVote));
        assert_eq!(filter.extra.get("hidebroken"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&filter).unwrap()["hidebroken"], json!(true));
    }

    #[test]
    fn record_tolerates_missing_and_extra_fields() {
        let record: StationRecord = serde_json::from_value(json!({
            "stationuuid": "960e57c5-0601-11e8-ae97-52543be04c81",
            "name": "Radio Eins",
            "url": "http://radioeins.de/stream",
            "votes": 1234,
            "codec": "MP3",
            "geo_lat": 52.5
        }))
        .unwrap();
        assert_eq!(record.name, "Radio Eins");
        assert_eq!(record.url_resolved, "");
        assert_eq!(record.votes, 1234);
        assert_eq!(record.extra.get("codec"), Some(&json!("MP3")));
    }

    #[test]
    fn selector_and_order_parse_from_cli_text() {
        assert_eq!("TopVote".parse::<Selector>(), Ok(Selector::TopVote));
        assert!(Selector::TopClick.is_listing());
        assert!(!Selector::Tag.is_listing());
        assert_eq!("clickcount".parse::<StationOrder>(), Ok(StationOrder::ClickCount));
        assert!("loudness".parse::<StationOrder>().is_err());
    }
}
