//! Configuration section definitions.

mod feed;
mod paths;
mod serve;
mod site;

pub use feed::FeedConfig;
pub use paths::PathsConfig;
pub use serve::ServeConfig;
pub use site::SiteInfo;
