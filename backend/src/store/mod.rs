//! Session-scoped table storage.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / page rendering                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │ SessionId
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  SessionStore  - one SessionCache per open session       │
//! │  SessionCache  - tables loaded lazily, at most once      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  TableSource trait                                       │
//! │  - CsvTableSource (files on disk)                        │
//! │  - InMemoryTableSource (prebuilt tables)                 │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod checksum;
pub mod error;
pub mod session;
pub mod source;

pub use checksum::content_etag;
pub use error::{DashboardError, DashboardResult, ErrorContext};
pub use session::{SessionCache, SessionId, SessionStore};
pub use source::{CsvTableSource, InMemoryTableSource, TableSource};
