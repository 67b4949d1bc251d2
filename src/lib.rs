pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod list;
pub mod query;
pub mod remote;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_guards;

pub use config::Config;
pub use error::{Result, StorefrontError};
pub use list::{FetchOutcome, ListController, ListPage, ListPhase, ListState, PendingFetch};
pub use query::{ListFilters, ListQuery, SortOption};
pub use remote::{ApiClient, ListSource, Resource, ResourceSource};
pub use store::{AppStore, Store};
pub use types::{Category, Locale, Order, OrderItem, OrderStatus, Product, Promotion};
