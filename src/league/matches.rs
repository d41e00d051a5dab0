//! Match records and their per-organization presentation.

use std::sync::{Arc, Weak};

use chrono::{DateTime, FixedOffset};

use super::{Organization, Team, TeamId};

/// A single match between two teams.
///
/// Matches are value-like: they have no identity of their own and live inside
/// the participating teams' schedules. Team references are non-owning; the
/// loader's caches keep the teams alive for the duration of an operation.
#[derive(Debug, Clone)]
pub struct Match {
    date: DateTime<FixedOffset>,
    home: Weak<Team>,
    visiting: Weak<Team>,
    outcome: Option<Outcome>,
}

/// The result of a played match. A match without an outcome is unplayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// ID of the side that won. Comparisons use ID equality.
    pub winning_team: TeamId,
    /// Point total of the winning side.
    pub winner_points: u32,
    /// Point total of the losing side.
    pub loser_points: u32,
}

/// One rendered newsletter line, from the point of view of an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLine {
    /// Venue-local match date and time.
    pub date: DateTime<FixedOffset>,
    /// The organization's own side, e.g. `ASRC 40+ 3.5 Men`.
    pub first: String,
    /// `won 4 - 2` / `lost 2 - 4` from the organization's perspective, when played.
    pub outcome: Option<String>,
    /// `vs.` for home matches, `@` for away matches.
    pub locator: &'static str,
    /// The opposing organization's name, title-cased.
    pub second: String,
}

impl Match {
    pub(crate) fn new(
        date: DateTime<FixedOffset>,
        home: &Arc<Team>,
        visiting: &Arc<Team>,
        outcome: Option<Outcome>,
    ) -> Self {
        Self {
            date,
            home: Arc::downgrade(home),
            visiting: Arc::downgrade(visiting),
            outcome,
        }
    }

    /// Venue-local date and time of the match.
    pub fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }

    /// The home side, if still reachable through the loader's caches.
    pub fn home_team(&self) -> Option<Arc<Team>> {
        self.home.upgrade()
    }

    /// The visiting side, if still reachable through the loader's caches.
    pub fn visiting_team(&self) -> Option<Arc<Team>> {
        self.visiting.upgrade()
    }

    /// The outcome, or `None` for an unplayed match.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Renders this match from the point of view of `org`.
    ///
    /// The side belonging to `org` (by organization ID) is listed first; a
    /// home match reads `vs. <opponent>`, an away match `@ <opponent>`.
    /// Returns `None` when either side or its organization is no longer
    /// resolvable.
    pub fn for_organization(&self, org: &Organization) -> Option<MatchLine> {
        let home = self.home_team()?;
        let visiting = self.visiting_team()?;
        let home_org = home.organization()?;
        let visiting_org = visiting.organization()?;

        let (first, first_org, second_org, locator) = if home_org.id() == org.id() {
            (&home, &home_org, &visiting_org, "vs.")
        } else {
            (&visiting, &visiting_org, &home_org, "@")
        };

        let outcome = self.outcome.as_ref().map(|outcome| {
            if outcome.winning_team == first.id() {
                format!("won {} - {}", outcome.winner_points, outcome.loser_points)
            } else {
                format!("lost {} - {}", outcome.loser_points, outcome.winner_points)
            }
        });

        Some(MatchLine {
            date: self.date,
            first: format!("{} {}", first_org.short_name(), first.short_name()),
            outcome,
            locator,
            second: title_case(second_org.name()),
        })
    }
}

/// Title-cases a name: first letter of each word upper, the rest lower.
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_lowers_then_capitalizes() {
        assert_eq!(title_case("ALMADEN SWIM AND RACQUET CLUB"), "Almaden Swim And Racquet Club");
        assert_eq!(title_case("  sunnyvale  "), "Sunnyvale");
        assert_eq!(title_case(""), "");
    }
}
