//! Infrastructure layer: configuration, HTTP fetching, HTML parsing and logging

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

pub use config::{AppConfig, ConfigLoader, FetchConfig, LoggingConfig, ServerConfig};
pub use http_client::{
    FetchError, FetchPolicy, IdentityHeaders, IdentityPool, ReqwestTransport, ResilientFetcher,
    Transport, TransportResponse,
};
pub use logging::{get_log_directory, init_logging_with_config, log_system_info};
pub use parsing::{
    ListingParser, ListingSelectors, ParseContext, ParsingConfig, ParsingError, ParsingResult,
    ShopCluesParser, SiteConfig, SnapdealParser,
};
