//! TAO Core - shared building blocks
//!
//! Error types, configuration, the switchable log sink and the preference
//! store used by the display, signing and application-config crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod store;

pub use config::{LoggingConfig, ReportConfig, SigningConfig, StoreBackend, StoreConfig, TaoConfig};
pub use error::{Result, TaoError};
pub use logging::{LogLevel, LogSink, RecordingSink, TracingSink};
pub use store::{
    ConfigStore, FileStore, FileStoreProvider, MemoryStore, MemoryStoreProvider, PrefValue,
    StoreProvider,
};

/// TAO Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
