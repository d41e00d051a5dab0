//! The loading context: entity fetchers and graph fan-outs.
//!
//! [`Loader`] is explicitly constructed and explicitly passed - never a
//! process-wide singleton - so each test (and each run) gets isolated caches
//! and in-flight tables. Per entity kind it composes, in order:
//!
//! 1. the single-flight group, so concurrent demand for a cold key does one
//!    underlying fetch,
//! 2. the freshness cache, consulted inside the flight so the
//!    check-cache/register-flight/fetch sequence is atomic per key,
//! 3. document extraction, whose successful results (and only those) are
//!    written back to the cache.
//!
//! Fan-outs over graph edges spawn one fetch per child, join, and only then
//! apply their failure policy over the complete result set:
//!
//! - **best-effort** (organization teams, match opponents): failed children
//!   are logged and dropped, the parent operation still succeeds;
//! - the **fail-fast** aggregation over per-team match loading lives one
//!   level up, in [`crate::newsletter::Newsletter::generate`].

use std::sync::Arc;

use chrono::FixedOffset;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::coalesce::Singleflight;
use crate::config::Config;
use crate::core::{Error, Result};
use crate::extract::{DocumentSource, ResourceKind};

use super::team::ScheduleEntry;
use super::{Match, OrgId, Organization, Outcome, Team, TeamId};

/// Shared loading context for one run: document source, freshness caches,
/// single-flight groups, and the cancellation signal.
pub struct Loader {
    source: Arc<dyn DocumentSource>,
    venue: FixedOffset,
    concurrency: usize,
    org_cache: TtlCache<OrgId, Arc<Organization>>,
    team_cache: TtlCache<TeamId, Arc<Team>>,
    org_flights: Singleflight<OrgId, Arc<Organization>>,
    team_flights: Singleflight<TeamId, Arc<Team>>,
    cancel: CancellationToken,
}

impl Loader {
    /// Creates a loader over `source` configured by `config`.
    pub fn new(source: Arc<dyn DocumentSource>, config: &Config) -> Self {
        Self {
            source,
            venue: config.venue_offset,
            concurrency: config.concurrency.max(1),
            org_cache: TtlCache::new(config.cache_ttl),
            team_cache: TtlCache::new(config.cache_ttl),
            org_flights: Singleflight::new(),
            team_flights: Singleflight::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Handle for cancelling this loader's work. Once cancelled, no new
    /// fetches are issued; in-flight ones run to completion or failure.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolves the organization with the given ID.
    ///
    /// Concurrent calls for the same ID share one underlying fetch, and a
    /// fresh cached instance is returned without fetching at all.
    pub async fn organization(&self, id: OrgId) -> Result<Arc<Organization>> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.org_flights
            .run(id, || async move {
                if let Some(org) = self.org_cache.get(&id) {
                    debug!(id, "organization cache hit");
                    return Ok(org);
                }

                let doc = self.source.fetch(ResourceKind::Organization, id).await?;
                let name = doc.first_bold_text().ok_or_else(|| Error::Extraction {
                    url: doc.url().to_string(),
                    what: "organization name".to_string(),
                })?;
                let linked_teams = doc.linked_ids("teaminfo.asp?");
                debug!(id, teams = linked_teams.len(), "organization page loaded");

                let org = Arc::new(Organization::new(id, name, linked_teams));
                self.org_cache.insert(id, org.clone());
                Ok(org)
            })
            .await
    }

    /// Resolves the team with the given ID. Same caching and coalescing
    /// behavior as [`Self::organization`].
    pub async fn team(&self, id: TeamId) -> Result<Arc<Team>> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.team_flights
            .run(id, || async move {
                if let Some(team) = self.team_cache.get(&id) {
                    debug!(id, "team cache hit");
                    return Ok(team);
                }

                let doc = self.source.fetch(ResourceKind::Team, id).await?;
                let team = Arc::new(Team::from_page(id, &doc, self.venue)?);
                debug!(id, rows = team.schedule().len(), "team page loaded");

                self.team_cache.insert(id, team.clone());
                Ok(team)
            })
            .await
    }

    /// Loads every team linked from the organization page, best-effort.
    ///
    /// One fetch is spawned per linked team; after all complete, the
    /// successes are appended to `org` and failures are dropped. A failed
    /// child never fails this operation.
    pub async fn load_teams(&self, org: &Arc<Organization>) {
        let mut seen = std::collections::HashSet::new();
        let mut ids = org.linked_teams().to_vec();
        ids.retain(|id| seen.insert(*id));

        let loaded: Vec<Option<Arc<Team>>> = stream::iter(ids)
            .map(|id| async move {
                match self.team(id).await {
                    Ok(team) => Some(team),
                    Err(err) => {
                        warn!(team_id = id, %err, "dropping team that failed to load");
                        None
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let teams: Vec<Arc<Team>> = loaded.into_iter().flatten().collect();
        for team in &teams {
            if team.org_id() == Some(org.id()) {
                team.set_organization(org);
            }
        }
        org.add_teams(teams);
    }

    /// Resolves the matches for `team`: its own organization back-reference
    /// plus, best-effort, one opponent per schedule row.
    ///
    /// The match list is populated once; calling again after a successful
    /// load is a no-op. A row whose opponent (or the opponent's organization)
    /// cannot be resolved is omitted entirely - no placeholder is recorded.
    /// The call itself fails only when the team's own organization cannot be
    /// resolved or the load was cancelled.
    pub async fn load_matches(&self, team: &Arc<Team>) -> Result<()> {
        if team.matches_loaded() {
            return Ok(());
        }

        let org_id = team.org_id().ok_or_else(|| Error::Extraction {
            url: team.page_url().to_string(),
            what: "organization link".to_string(),
        })?;
        let org = self.organization(org_id).await?;
        team.set_organization(&org);

        let entries = team.schedule().to_vec();
        let resolved: Vec<Option<Match>> = stream::iter(entries)
            .map(|entry| async move {
                match self.resolve_entry(team, entry).await {
                    Ok(m) => Some(m),
                    Err(err) => {
                        warn!(team_id = team.id(), %err, "dropping match with unresolvable opponent");
                        None
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        team.set_matches(resolved.into_iter().flatten().collect());
        Ok(())
    }

    /// Turns one schedule entry into a match by resolving its opponent and
    /// the opponent's organization through the shared fetchers.
    async fn resolve_entry(&self, team: &Arc<Team>, entry: ScheduleEntry) -> Result<Match> {
        let opponent = self.team(entry.opponent).await?;

        // Newsletter lines name the opponent's club, so an opponent without a
        // resolvable organization cannot be rendered.
        if opponent.organization().is_none() {
            let org_id = opponent.org_id().ok_or_else(|| Error::Extraction {
                url: opponent.page_url().to_string(),
                what: "organization link".to_string(),
            })?;
            let opponent_org = self.organization(org_id).await?;
            opponent.set_organization(&opponent_org);
        }

        let (home, visiting) =
            if entry.is_home { (team, &opponent) } else { (&opponent, team) };

        let outcome = entry.outcome.map(|raw| Outcome {
            winning_team: if raw.won { team.id() } else { opponent.id() },
            winner_points: raw.winner_points,
            loser_points: raw.loser_points,
        });

        Ok(Match::new(entry.date, home, visiting, outcome))
    }
}
