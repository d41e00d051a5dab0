//! Global constants used throughout the matchday codebase.
//!
//! Timeouts, cache lifetimes, and parallelism defaults live here so the
//! numbers that shape runtime behavior stay discoverable in one place.

use std::time::Duration;

use chrono::FixedOffset;

/// Organization loaded when no `--org` flag is given (ASRC).
pub const DEFAULT_ORGANIZATION_ID: u32 = 225;

/// Days of past results and upcoming matches shown by default.
pub const DEFAULT_WINDOW_DAYS: i64 = 10;

/// Base URL of the league site hosting organization and team pages.
pub const DEFAULT_BASE_URL: &str = "https://leagues.ustanorcal.com";

/// Freshness window for cached organizations and teams (10 minutes).
///
/// Entries older than this are reported as misses and replaced by the next
/// successful fetch; they are never swept in the background.
pub const CACHE_TTL: Duration = Duration::from_secs(600);

/// Timeout applied to every page fetch.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Venue-local UTC offset, in hours. Match dates on the league site carry no
/// zone information and are interpreted at this offset (US Pacific).
pub const VENUE_UTC_OFFSET_HOURS: i32 = -8;

/// Minimum number of parallel fetches regardless of CPU count.
///
/// Fetches are I/O-bound, so a floor of 10 keeps small machines busy.
pub const MIN_PARALLELISM: usize = 10;

/// Multiplier applied to CPU core count for default parallelism.
pub const PARALLELISM_CORE_MULTIPLIER: usize = 2;

/// Default CPU core count when detection fails.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Default concurrency for parallel fan-outs: `max(10, 2 x cores)`.
pub fn default_parallelism() -> usize {
    let cores = std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(FALLBACK_CORE_COUNT);
    std::cmp::max(MIN_PARALLELISM, cores * PARALLELISM_CORE_MULTIPLIER)
}

/// The venue-local time zone as a fixed offset.
pub fn venue_offset() -> FixedOffset {
    FixedOffset::east_opt(VENUE_UTC_OFFSET_HOURS * 3600).expect("offset is in range")
}
