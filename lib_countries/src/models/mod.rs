//! # Data Models
//!
//! The shapes that flow through a refresh:
//!
//! - **`CountryFact`** / **`CurrencyFact`**: raw, untrusted country descriptions
//!   as the country source reports them.
//! - **`RateSnapshot`**: currency code to rate, valid for one refresh only.
//! - **`CountryRecord`**: the durable, mergeable representation of a country.
//! - **`RenderSnapshot`**: an immutable copy of the merged record set handed to
//!   the render worker.
//! - **`RefreshSummary`** / **`StatusSummary`**: what callers get back.

/// Stored records and the raw facts they are merged from.
pub mod country;
/// Transient snapshots and summaries.
pub mod snapshot;

pub use country::{name_key, CountryFact, CountryRecord, CurrencyFact};
pub use snapshot::{RateSnapshot, RefreshSummary, RenderSnapshot, StatusSummary};
