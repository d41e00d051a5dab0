//! Application configuration.
//!
//! A [`Config`] is built once (from CLI flags in production, inline in
//! tests), then passed explicitly to the pieces that need it. Nothing in the
//! crate reads configuration from globals.

use chrono::{Duration, FixedOffset};

use crate::constants;
use crate::league::{OrgId, TeamId};

/// Configuration for one newsletter run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization whose newsletter is generated.
    pub organization_id: OrgId,
    /// Extra team IDs to track beyond the organization's own teams.
    pub roster: Vec<TeamId>,
    /// How far back past results are included.
    pub past_window: Duration,
    /// How far ahead upcoming matches are included.
    pub future_window: Duration,
    /// Base URL of the league site.
    pub base_url: String,
    /// Freshness window for cached organizations and teams.
    pub cache_ttl: std::time::Duration,
    /// Venue-local time zone applied to scraped match dates.
    pub venue_offset: FixedOffset,
    /// Concurrency cap for parallel fan-outs.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization_id: constants::DEFAULT_ORGANIZATION_ID,
            roster: Vec::new(),
            past_window: Duration::days(constants::DEFAULT_WINDOW_DAYS),
            future_window: Duration::days(constants::DEFAULT_WINDOW_DAYS),
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            cache_ttl: constants::CACHE_TTL,
            venue_offset: constants::venue_offset(),
            concurrency: constants::default_parallelism(),
        }
    }
}
