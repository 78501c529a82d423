//! # Longview Stats
//!
//! Queries the Linode Longview API for one or more API keys and prints a
//! normalized per-host summary (memory, disk, CPU, network, uptime).
//!
//! ## Architecture
//!
//! - **`api`**: the fixed batch request, the [`Transport`] seam, the
//!   reqwest-backed client and the payload validator/decoder
//! - **`record`**: normalization of a validated payload into a
//!   [`HostRecord`]
//! - **`fetch`**: concurrent fan-out over all configured keys
//! - **`render`**: text, table and JSON presentation
//! - **`config`** / **`error`** / **`units`**: configuration loading,
//!   named error kinds, display-string conversions
//!
//! ## Usage
//!
//! ```bash
//! # One block of text per host
//! longview-stats LONGVIEW-API-KEY ANOTHER-KEY
//!
//! # Keys from ./config.json, rendered as tables
//! longview-stats -f -t
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod record;
pub mod render;
pub mod units;

pub use api::{
    HttpTransport,
    Transport,
};
pub use config::Config;
pub use error::Error;
pub use fetch::fetch_all;
pub use record::HostRecord;
pub use render::{
    OutputMode,
    Presenter,
    Theme,
};
