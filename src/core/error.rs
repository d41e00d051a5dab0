//! Error handling for matchday.
//!
//! One enumerated error type covers every failure the loading pipeline can
//! produce. The variants mirror where things go wrong:
//!
//! - [`Error::Transport`] - the page could not be fetched at all
//! - [`Error::UnexpectedStatus`] - the site answered with a non-success status
//! - [`Error::Extraction`] - the page arrived but an expected field was missing
//! - [`Error::Cancelled`] - the load was interrupted before or during a fetch
//! - [`Error::PartialLoad`] - a fail-fast fan-out summarizing failed children
//!
//! The type is `Clone` on purpose: coalesced callers waiting on the same
//! in-flight fetch all receive the same error value, and fan-out policies
//! aggregate child results after the join.

use thiserror::Error;

/// The error type for all loading operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The remote page could not be reached.
    #[error("could not fetch {url}: {reason}")]
    Transport {
        /// URL of the failed request.
        url: String,
        /// Underlying transport error, flattened to text so the value stays `Clone`.
        reason: String,
    },

    /// The remote site answered with a non-success status code.
    #[error("unexpected status {status} fetching {url}")]
    UnexpectedStatus {
        /// URL of the failed request.
        url: String,
        /// HTTP status code reported by the site.
        status: u16,
    },

    /// A fetched page did not contain a field the extractor expected.
    #[error("could not find {what} in {url}")]
    Extraction {
        /// URL of the page that was being extracted.
        url: String,
        /// Description of the missing field.
        what: String,
    },

    /// The operation was cancelled before it could complete.
    #[error("load cancelled")]
    Cancelled,

    /// A fail-fast fan-out finished with one or more failed children.
    ///
    /// Successfully loaded children remain in the entity graph; this error
    /// only reports the gap.
    #[error("failed to load {failed} of {total} team(s)")]
    PartialLoad {
        /// Number of child operations that failed.
        failed: usize,
        /// Total number of child operations attempted.
        total: usize,
    },
}

/// Result alias used throughout the loading pipeline.
pub type Result<T> = std::result::Result<T, Error>;
