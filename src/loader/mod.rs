//! Game catalog and hosting of one game at a time

pub mod catalog;
pub mod host;

pub use catalog::{CatalogError, GameCatalog, GameMetadata, MenuEntry, MenuTarget};
pub use host::{ArcadeHost, HOME_TITLE, HostError, HostedGame};
