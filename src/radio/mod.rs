//! Radio Browser station directory client and service presets.

/// `StationDirectory` collaborator trait and the Radio Browser HTTP client.
pub mod directory;
/// Search facade with city/tag presets and stream URL selection.
pub mod service;
/// Filter and station record types.
pub mod types;

pub use directory::{DirectoryError, RadioBrowser, StationDirectory};
pub use service::{DEFAULT_TOP_LIMIT, RadioError, RadioService, preferred_stream_url};
pub use types::{Selector, StationFilter, StationOrder, StationRecord};
