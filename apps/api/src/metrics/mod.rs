// Connection request persistence and per-user metrics.
// Aggregation is delegated to database procedures; see store.rs.

pub mod handlers;
pub mod store;

pub use store::{ConnectionStore, MetricsSummary, PgConnectionStore};
