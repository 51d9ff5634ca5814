//! Persistent build-result cache
//!
//! Memoizes size measurements keyed by the exact set of resolved package
//! versions, so re-measuring an unchanged set skips install-and-bundle.
//!
//! # Lifecycle
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `has` / `get` | Lazily loads the document, read-only |
//! | `set` | Inserts or overwrites, persisted atomically |
//! | `clear` | Drops every entry and deletes the document |
//!
//! Entries never expire. The cache grows until `package-size clear-cache`.

pub mod key;
pub mod record;
pub mod store;

pub use key::CacheKey;
pub use record::SizeRecord;
pub use store::CacheStore;
