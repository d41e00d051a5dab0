//! Teams: schedule extraction and lazily resolved back-references.

use std::sync::{Arc, LazyLock, OnceLock, Weak};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use regex::Regex;

use crate::core::{Error, Result};
use crate::extract::{Document, id_query_param};

use super::{Match, OrgId, Organization, TeamId};

/// Kickoff times appear in free-text notes like `All 3 at 7:30 PM Courts 1-3`.
static KICKOFF_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"at[^\d]+(\d+):(\d\d)\s+([aApP]M)").expect("pattern is valid"));

/// Cell layout of a schedule row on the team page.
const DATE_CELL: usize = 2;
const TIME_CELL: usize = 4;
const OPPONENT_CELL: usize = 5;
const LOCATION_CELL: usize = 6;
const OUTCOME_CELL: usize = 7;

/// A team, its parsed schedule, and its resolved matches.
///
/// The organization back-reference and the match list are each populated at
/// most once; later writes are no-ops. Both are resolved by
/// [`super::Loader`], never by the entity itself.
#[derive(Debug)]
pub struct Team {
    id: TeamId,
    name: String,
    page_url: String,
    org_id: Option<OrgId>,
    schedule: Vec<ScheduleEntry>,
    organization: OnceLock<Weak<Organization>>,
    matches: OnceLock<Vec<Match>>,
}

/// One parsed-but-unresolved schedule row: everything the page says about a
/// match except the opponent entity itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScheduleEntry {
    pub date: DateTime<FixedOffset>,
    pub opponent: TeamId,
    pub is_home: bool,
    pub outcome: Option<RawOutcome>,
}

/// Outcome of a played match as stated on the page, from the perspective of
/// the team whose page it is. Winner and loser points are already assigned by
/// comparing the two totals; `won` tracks only the verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawOutcome {
    pub won: bool,
    pub winner_points: u32,
    pub loser_points: u32,
}

enum OutcomeText {
    Unplayed,
    Played(RawOutcome),
    Malformed,
}

impl Team {
    /// Builds a team from its fetched page.
    ///
    /// Fails only when the page carries no team name; individual schedule
    /// rows that cannot be parsed are skipped.
    pub(crate) fn from_page(id: TeamId, doc: &Document, venue: FixedOffset) -> Result<Self> {
        let name = doc.first_bold_text().ok_or_else(|| Error::Extraction {
            url: doc.url().to_string(),
            what: "team name".to_string(),
        })?;
        let org_id = doc.linked_ids("organization.asp?").first().copied();

        Ok(Self {
            id,
            name,
            page_url: doc.url().to_string(),
            org_id,
            schedule: parse_schedule(doc, venue),
            organization: OnceLock::new(),
            matches: OnceLock::new(),
        })
    }

    /// The team's externally assigned ID.
    pub fn id(&self) -> TeamId {
        self.id
    }

    /// Display name as scraped from the team page.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL the team page was fetched from.
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// ID of the organization linked from the team page, if any.
    pub(crate) fn org_id(&self) -> Option<OrgId> {
        self.org_id
    }

    /// The team's organization, once resolved and still reachable.
    pub fn organization(&self) -> Option<Arc<Organization>> {
        self.organization.get().and_then(Weak::upgrade)
    }

    /// Records the resolved organization. The first write wins; repeated
    /// calls are no-ops.
    pub(crate) fn set_organization(&self, org: &Arc<Organization>) {
        let _ = self.organization.set(Arc::downgrade(org));
    }

    /// The parsed schedule rows awaiting opponent resolution.
    pub(crate) fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    /// The resolved matches, empty until loaded.
    pub fn matches(&self) -> &[Match] {
        self.matches.get().map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn matches_loaded(&self) -> bool {
        self.matches.get().is_some()
    }

    /// Records the resolved matches. The first write wins.
    pub(crate) fn set_matches(&self, matches: Vec<Match>) {
        let _ = self.matches.set(matches);
    }

    /// Abbreviated team name used in newsletter lines: the current year
    /// prefix is dropped and `" & Over"` becomes `"+"`.
    pub fn short_name(&self) -> String {
        let year = Utc::now().year().to_string();
        self.name.replace(&format!("{year} "), "").replace(" & Over", "+")
    }
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Team {}

/// Parses the schedule table into entries, dropping rows that are missing or
/// malformed in any required field.
fn parse_schedule(doc: &Document, venue: FixedOffset) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();

    for row in doc.schedule_rows() {
        if row.cells.len() <= OUTCOME_CELL {
            continue;
        }

        let Ok(date) = NaiveDate::parse_from_str(&row.cells[DATE_CELL].text, "%m/%d/%y") else {
            continue;
        };
        let (hour, minute) = parse_kickoff_time(&row.cells[TIME_CELL].text).unwrap_or((0, 0));
        let Some(naive) = date.and_hms_opt(hour, minute, 0) else {
            continue;
        };
        let Some(date) = naive.and_local_timezone(venue).single() else {
            continue;
        };

        let Some(opponent) = row.cells[OPPONENT_CELL].link.as_deref().and_then(id_query_param)
        else {
            continue;
        };
        let is_home = row.cells[LOCATION_CELL].text == "Home";

        let outcome = match parse_outcome(&row.cells[OUTCOME_CELL].text) {
            OutcomeText::Unplayed => None,
            OutcomeText::Played(outcome) => Some(outcome),
            OutcomeText::Malformed => continue,
        };

        entries.push(ScheduleEntry { date, opponent, is_home, outcome });
    }

    entries
}

/// Pulls a kickoff time out of a free-text schedule note.
///
/// Returns 24-hour `(hour, minute)`: `PM` adds 12 except at 12, and `12:xx AM`
/// maps to hour 0. Notes without a recognizable time yield `None`.
pub(crate) fn parse_kickoff_time(note: &str) -> Option<(u32, u32)> {
    let caps = KICKOFF_TIME.captures(note)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;

    if caps[3].eq_ignore_ascii_case("pm") {
        if hour != 12 {
            hour += 12;
        }
    } else if hour == 12 {
        hour = 0;
    }

    (hour < 24 && minute < 60).then_some((hour, minute))
}

/// Parses an outcome cell like `Won 4-2`.
///
/// Winner and loser points are assigned by comparing the two totals - the
/// higher number is the winner's regardless of which side the verb favors.
fn parse_outcome(text: &str) -> OutcomeText {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 2 {
        return OutcomeText::Unplayed;
    }

    let verb = parts[0];
    let Some((first, second)) = parts[1].split_once('-') else {
        return OutcomeText::Malformed;
    };
    let (Ok(first), Ok(second)) = (first.parse::<u32>(), second.parse::<u32>()) else {
        return OutcomeText::Malformed;
    };

    let (winner_points, loser_points) =
        if first > second { (first, second) } else { (second, first) };

    OutcomeText::Played(RawOutcome { won: verb == "Won", winner_points, loser_points })
}
