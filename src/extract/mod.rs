//! Document extraction: fetching league pages and looking up fields.
//!
//! The loading pipeline never touches raw markup directly. It asks a
//! [`DocumentSource`] for the page behind a `(kind, id)` pair and receives a
//! [`Document`], a structured view supporting the handful of field lookups
//! the entity fetchers need (the bold header text, link targets carrying an
//! `id` query parameter, the schedule table rows). Pages are idempotently
//! re-fetchable by `(kind, id)`, which is what makes caching and coalescing
//! by that key sound.
//!
//! [`HttpDocumentSource`] is the production implementation; tests substitute
//! in-memory sources.

mod document;
mod http;

pub use document::{Cell, Document, ScheduleRow};
pub use http::HttpDocumentSource;

pub(crate) use document::id_query_param;

use async_trait::async_trait;

use crate::core::Result;

/// The two kinds of remote resource the league site serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An organization page listing the club's teams.
    Organization,
    /// A team page carrying the schedule table and the organization link.
    Team,
}

impl ResourceKind {
    /// Path of this resource kind on the league site.
    pub fn path(self) -> &'static str {
        match self {
            Self::Organization => "organization.asp",
            Self::Team => "teaminfo.asp",
        }
    }
}

/// Builds the page URL for `(kind, id)` under `base_url`.
pub fn resource_url(base_url: &str, kind: ResourceKind, id: u32) -> String {
    format!("{}/{}?id={}", base_url.trim_end_matches('/'), kind.path(), id)
}

/// A source of league pages, keyed by resource kind and integer ID.
///
/// Implementations signal failures through the shared error taxonomy:
/// transport problems, unexpected statuses, and extraction gaps. They never
/// retry internally - retry policy belongs to callers.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the page for `(kind, id)`.
    async fn fetch(&self, kind: ResourceKind, id: u32) -> Result<Document>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_urls() {
        assert_eq!(
            resource_url("https://leagues.example.com", ResourceKind::Organization, 225),
            "https://leagues.example.com/organization.asp?id=225"
        );
        assert_eq!(
            resource_url("https://leagues.example.com/", ResourceKind::Team, 40),
            "https://leagues.example.com/teaminfo.asp?id=40"
        );
    }
}
