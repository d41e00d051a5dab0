//! Organizations: clubs owning a set of teams.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use super::{Match, OrgId, Team, TeamId};

/// Short names the initialism rule gets wrong.
const SHORT_NAME_TRANSLATIONS: [(&str, &str); 3] =
    [("BCC", "Courtside"), ("SMTC", "Sunnyvale"), ("VG&CC", "Villages")];

/// A club organization and the teams loaded for it.
///
/// The team list starts empty and is appended to as fan-out fetches complete;
/// teams are never removed once added. All mutation happens behind a lock so
/// concurrent loaders can share one instance.
#[derive(Debug)]
pub struct Organization {
    id: OrgId,
    name: String,
    linked_teams: Vec<TeamId>,
    teams: RwLock<Vec<Arc<Team>>>,
}

impl Organization {
    pub(crate) fn new(id: OrgId, name: String, linked_teams: Vec<TeamId>) -> Self {
        Self { id, name, linked_teams, teams: RwLock::new(Vec::new()) }
    }

    /// The organization's externally assigned ID.
    pub fn id(&self) -> OrgId {
        self.id
    }

    /// Display name as scraped from the organization page.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Team IDs linked from the organization page, in page order.
    pub(crate) fn linked_teams(&self) -> &[TeamId] {
        &self.linked_teams
    }

    /// Snapshot of the teams loaded so far.
    pub fn teams(&self) -> Vec<Arc<Team>> {
        self.teams.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Appends newly loaded teams, skipping IDs already present.
    pub(crate) fn add_teams(&self, incoming: Vec<Arc<Team>>) {
        let mut teams = self.teams.write().unwrap_or_else(PoisonError::into_inner);
        for team in incoming {
            if !teams.iter().any(|existing| existing.id() == team.id()) {
                teams.push(team);
            }
        }
    }

    /// Abbreviated club name used in newsletter lines: the initials of the
    /// name's words (skipping `AND`), with a few fixed translations for
    /// clubs whose initialism is ambiguous.
    pub fn short_name(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter(|word| *word != "AND")
            .filter_map(|word| word.chars().next())
            .collect();

        SHORT_NAME_TRANSLATIONS
            .iter()
            .find(|(from, _)| *from == initials)
            .map_or(initials, |(_, to)| (*to).to_string())
    }

    /// Splits all loaded teams' matches around the current instant.
    ///
    /// See [`Self::matches_in_window_at`].
    pub fn matches_in_window(&self, past: Duration, future: Duration) -> (Vec<Match>, Vec<Match>) {
        self.matches_in_window_at(Utc::now(), past, future)
    }

    /// Splits all loaded teams' matches around `now`.
    ///
    /// Returns `(past, future)`: past matches oldest-first, covering
    /// `[now - past, now]` inclusive on both ends; future matches
    /// soonest-first, covering `(now, now + future)` exclusive of the end.
    /// Matches at the same instant list the organization's home matches
    /// first.
    pub fn matches_in_window_at(
        &self,
        now: DateTime<Utc>,
        past: Duration,
        future: Duration,
    ) -> (Vec<Match>, Vec<Match>) {
        let start = now - past;
        let end = now + future;

        let teams = self.teams();
        let own_teams: HashSet<TeamId> = teams.iter().map(|team| team.id()).collect();

        let mut past_matches = Vec::new();
        let mut future_matches = Vec::new();
        for team in &teams {
            for m in team.matches() {
                let date = m.date().with_timezone(&Utc);
                if date >= start && date <= now {
                    past_matches.push(m.clone());
                } else if date > now && date < end {
                    future_matches.push(m.clone());
                }
            }
        }

        past_matches.sort_by(|a, b| order_home_first(a, b, &own_teams));
        future_matches.sort_by(|a, b| order_home_first(a, b, &own_teams));
        (past_matches, future_matches)
    }
}

impl PartialEq for Organization {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Organization {}

fn order_home_first(a: &Match, b: &Match, own_teams: &HashSet<TeamId>) -> Ordering {
    a.date().cmp(&b.date()).then_with(|| {
        let a_home = a.home_team().is_some_and(|team| own_teams.contains(&team.id()));
        let b_home = b.home_team().is_some_and(|team| own_teams.contains(&team.id()));
        b_home.cmp(&a_home)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(name: &str) -> Organization {
        Organization::new(1, name.to_string(), Vec::new())
    }

    #[test]
    fn short_name_takes_initials_and_skips_and() {
        assert_eq!(org("ALMADEN SWIM AND RACQUET CLUB").short_name(), "ASRC");
    }

    #[test]
    fn short_name_applies_translations() {
        assert_eq!(org("BRAMHALL COUNTRY CLUB").short_name(), "Courtside");
        assert_eq!(org("SUNNYVALE MUNICIPAL TENNIS CENTER").short_name(), "Sunnyvale");
    }

    #[test]
    fn equality_is_by_id() {
        let a = Organization::new(7, "A".into(), Vec::new());
        let b = Organization::new(7, "B".into(), Vec::new());
        let c = Organization::new(8, "A".into(), Vec::new());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
