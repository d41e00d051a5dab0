//! matchday - newsletter generator for USTA NorCal league matches
//!
//! Loads a club organization, its teams, and every team's match schedule from
//! the league website, then renders the recent and upcoming matches as a
//! console newsletter.
//!
//! # Architecture Overview
//!
//! The league site is slow and rate-limited, and the entity graph is heavily
//! cross-linked (teams reference their organization, matches reference
//! opponent teams, opponents reference their own organizations). The loading
//! pipeline is therefore built around three cooperating pieces:
//!
//! - [`cache`] - per-entity freshness caches with lazy TTL expiration, so a
//!   page is fetched at most once per freshness window
//! - [`coalesce`] - single-flight request coalescing, so concurrent demands
//!   for the same not-yet-cached page share one underlying fetch
//! - [`league`] - the entity model and the [`league::Loader`] context that
//!   composes cache, coalescing, and document extraction into entity
//!   fetchers and parallel fan-outs over the graph's edges
//!
//! Fan-outs follow one of two failure policies: supplementary edges (an
//! organization's team list, the opponent side of each match) are loaded
//! best-effort and failed children are dropped, while the top-level per-team
//! match loading aggregates failures into a single summarized error without
//! discarding the teams that did load. See [`newsletter::Newsletter`].
//!
//! # Core Modules
//!
//! - [`cache`] - TTL key/value store backing the entity fetchers
//! - [`coalesce`] - in-flight request deduplication keyed by resource
//! - [`extract`] - Document Extraction: fetching a page and looking up the
//!   fields the entity fetchers need
//! - [`league`] - `Organization` / `Team` / `Match` entities and the `Loader`
//! - [`newsletter`] - top-level orchestration of one generate operation
//! - [`format`] - rendering the loaded graph as newsletter text
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use matchday::config::Config;
//! use matchday::extract::HttpDocumentSource;
//! use matchday::league::Loader;
//! use matchday::newsletter::Newsletter;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let source = Arc::new(HttpDocumentSource::new(&config.base_url)?);
//! let loader = Loader::new(source, &config);
//!
//! let mut newsletter = Newsletter::new(config.organization_id, config.roster.clone());
//! newsletter.generate(&loader).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod coalesce;
pub mod config;
pub mod constants;
pub mod core;
pub mod extract;
pub mod format;
pub mod league;
pub mod newsletter;
