//! The league entity graph and its loading pipeline.
//!
//! # Entity Graph
//!
//! An [`Organization`] owns a set of [`Team`]s; each team carries the
//! [`Match`]es it participates in, and every match references both sides'
//! teams, which in turn reference their own organizations. The graph is
//! cyclic by construction.
//!
//! Identity is the externally assigned integer ID, and equality is always ID
//! equality - never instance identity. The [`Loader`]'s caches act as the
//! identity table: concurrent loads of the same ID converge on one shared
//! `Arc` instance, and back-references are held as non-owning [`std::sync::Weak`]
//! pointers into that table, so mutations such as appending a newly loaded
//! team to its organization are visible through every reference and no
//! strong reference cycle ever forms.
//!
//! # Loading
//!
//! [`Loader`] composes the document source with a freshness cache and a
//! single-flight group per entity kind, and drives the parallel fan-outs
//! over the graph's edges. See its module documentation for the failure
//! policies involved.

mod loader;
mod matches;
mod organization;
mod team;

pub use loader::Loader;
pub use matches::{Match, MatchLine, Outcome};
pub use organization::Organization;
pub use team::Team;

/// Externally assigned identifier of an organization.
pub type OrgId = u32;

/// Externally assigned identifier of a team.
pub type TeamId = u32;
