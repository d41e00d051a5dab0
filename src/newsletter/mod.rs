//! Top-level orchestration of one newsletter generation.
//!
//! [`Newsletter::generate`] drives the whole load: the organization, its
//! teams, any extra roster teams the caller tracks, and every gathered team's
//! matches. The supplementary edges load best-effort inside
//! [`Loader`](crate::league::Loader); the roster and per-team match loading
//! apply the fail-fast aggregation policy here - every failure is counted
//! after the join and reported as a single [`Error::PartialLoad`], while the
//! children that did load stay in the graph. The caller therefore sees at
//! most one error per generate call and may still render what loaded.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::constants;
use crate::core::{Error, Result};
use crate::league::{Loader, OrgId, Organization, Team, TeamId};

/// One newsletter: the organization of interest, extra tracked teams, and
/// the loaded graph.
pub struct Newsletter {
    org_id: OrgId,
    roster: Vec<TeamId>,
    org: Option<Arc<Organization>>,
}

impl Newsletter {
    /// Creates a newsletter for `org_id`, additionally tracking the teams in
    /// `roster` (which may belong to other organizations).
    pub fn new(org_id: OrgId, roster: Vec<TeamId>) -> Self {
        Self { org_id, roster, org: None }
    }

    /// The loaded organization, populated by [`Self::generate`].
    pub fn organization(&self) -> Option<&Arc<Organization>> {
        self.org.as_ref()
    }

    /// Loads the full entity graph for this newsletter.
    ///
    /// On a [`Error::PartialLoad`] the graph keeps everything that did load;
    /// the caller decides whether to render it anyway.
    pub async fn generate(&mut self, loader: &Loader) -> Result<()> {
        let org = loader.organization(self.org_id).await?;
        self.org = Some(org.clone());

        loader.load_teams(&org).await;
        info!(org = self.org_id, teams = org.teams().len(), "organization teams loaded");

        if !self.roster.is_empty() {
            self.load_roster(loader, &org).await?;
        }

        self.load_all_matches(loader, &org).await
    }

    /// Loads the extra roster teams, fail-fast: successes are appended to the
    /// organization, then any failure count is reported as one error.
    async fn load_roster(&self, loader: &Loader, org: &Arc<Organization>) -> Result<()> {
        let total = self.roster.len();
        let results: Vec<Result<Arc<Team>>> = stream::iter(self.roster.clone())
            .map(|id| loader.team(id))
            .buffer_unordered(constants::default_parallelism())
            .collect()
            .await;

        let mut loaded = Vec::new();
        let mut failed = 0;
        for result in results {
            match result {
                Ok(team) => loaded.push(team),
                Err(err) => {
                    warn!(%err, "roster team failed to load");
                    failed += 1;
                }
            }
        }
        org.add_teams(loaded);

        if failed > 0 {
            return Err(Error::PartialLoad { failed, total });
        }
        Ok(())
    }

    /// Loads matches for every gathered team, fail-fast: all loads run to
    /// completion, teams that loaded keep their matches, and the failure
    /// count is reported as one error.
    async fn load_all_matches(&self, loader: &Loader, org: &Arc<Organization>) -> Result<()> {
        let teams = org.teams();
        let total = teams.len();
        let results: Vec<Result<()>> = stream::iter(teams)
            .map(|team| async move {
                loader.load_matches(&team).await.inspect_err(|err| {
                    warn!(team_id = team.id(), %err, "match loading failed");
                })
            })
            .buffer_unordered(constants::default_parallelism())
            .collect()
            .await;

        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            return Err(Error::PartialLoad { failed, total });
        }
        Ok(())
    }
}
