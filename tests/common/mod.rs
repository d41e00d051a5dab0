//! Shared test fixtures: an in-memory document source and page builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use matchday::config::Config;
use matchday::core::{Error, Result};
use matchday::extract::{Document, DocumentSource, ResourceKind, resource_url};

pub const BASE_URL: &str = "http://league.invalid";

type Key = (ResourceKind, u32);

/// Scripted in-memory document source.
///
/// Pages are registered up front (or mid-test) per `(kind, id)`; unknown
/// resources answer 404. Every fetch is counted, and an optional gate lets a
/// test hold all fetches open until it releases them.
pub struct FakeSource {
    pages: Mutex<HashMap<Key, Result<String>>>,
    calls: Mutex<HashMap<Key, usize>>,
    gate: Mutex<Option<watch::Receiver<bool>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            gate: Mutex::new(None),
        }
    }

    pub fn insert_organization(&self, id: u32, html: impl Into<String>) {
        self.pages.lock().unwrap().insert((ResourceKind::Organization, id), Ok(html.into()));
    }

    pub fn insert_team(&self, id: u32, html: impl Into<String>) {
        self.pages.lock().unwrap().insert((ResourceKind::Team, id), Ok(html.into()));
    }

    pub fn fail(&self, kind: ResourceKind, id: u32, err: Error) {
        self.pages.lock().unwrap().insert((kind, id), Err(err));
    }

    /// Number of fetches issued for `(kind, id)` so far.
    pub fn calls(&self, kind: ResourceKind, id: u32) -> usize {
        self.calls.lock().unwrap().get(&(kind, id)).copied().unwrap_or(0)
    }

    /// Holds every subsequent fetch until `true` is sent on the returned
    /// channel.
    pub fn hold(&self) -> watch::Sender<bool> {
        let (tx, rx) = watch::channel(false);
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn fetch(&self, kind: ResourceKind, id: u32) -> Result<Document> {
        *self.calls.lock().unwrap().entry((kind, id)).or_insert(0) += 1;

        let gate = self.gate.lock().unwrap().clone();
        if let Some(mut gate) = gate {
            let _ = gate.wait_for(|open| *open).await;
        }

        let url = resource_url(BASE_URL, kind, id);
        let page = self.pages.lock().unwrap().get(&(kind, id)).cloned();
        match page {
            Some(Ok(html)) => Ok(Document::new(url, html)),
            Some(Err(err)) => Err(err),
            None => Err(Error::UnexpectedStatus { url, status: 404 }),
        }
    }
}

/// Config pointed at the fake source, with a UTC venue so test dates are
/// easy to reason about.
pub fn test_config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        venue_offset: chrono::FixedOffset::east_opt(0).unwrap(),
        concurrency: 8,
        ..Config::default()
    }
}

/// An organization page: the club name in the bold header, one link per team.
pub fn org_page(name: &str, team_ids: &[u32]) -> String {
    let links: String = team_ids
        .iter()
        .map(|id| format!(r#"<a href="teaminfo.asp?id={id}">Team {id}</a>"#))
        .collect();
    format!(
        r#"<html><body>
           <table><tr><td><font><b>{name}</b></font></td></tr></table>
           {links}
           </body></html>"#
    )
}

/// Builder for a team page: bold header name, organization link, and
/// schedule rows with the cell layout the extractor expects.
pub struct TeamPage {
    name: String,
    org: Option<u32>,
    rows: Vec<String>,
}

impl TeamPage {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), org: None, rows: Vec::new() }
    }

    pub fn org(mut self, id: u32) -> Self {
        self.org = Some(id);
        self
    }

    /// Adds a schedule row. `date` is `MM/DD/YY`, `note` the free-text time
    /// note, `outcome` e.g. `"Won 4-2"` or `""` for an unplayed match.
    pub fn row(mut self, date: &str, note: &str, opponent: u32, home: bool, outcome: &str) -> Self {
        let location = if home { "Home" } else { "Away" };
        self.rows.push(format!(
            r#"<tr bgcolor="white"><td>{n}</td><td>w</td><td>{date}</td><td>x</td><td>{note}</td><td><a href="teaminfo.asp?id={opponent}">Opponent</a></td><td>{location}</td><td>{outcome}</td></tr>"#,
            n = self.rows.len() + 1,
        ));
        self
    }

    pub fn build(self) -> String {
        let org_link = self
            .org
            .map(|id| format!(r#"<a href="organization.asp?id={id}">Club</a>"#))
            .unwrap_or_default();
        format!(
            r#"<html><body>
               <table><tr><td><b>{name}</b></td></tr></table>
               {org_link}
               <table>{rows}</table>
               </body></html>"#,
            name = self.name,
            rows = self.rows.join("\n"),
        )
    }
}
