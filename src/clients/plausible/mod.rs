//! Plausible Analytics API client.
//!
//! [`PlausibleClient`] wraps the three public Plausible APIs:
//!
//! | Family | Operations | Credential |
//! |---|---|---|
//! | Stats (v2) | `query_stats` | stats key |
//! | Events | `send_event` | none |
//! | Sites (v1) | sites, teams, shared links, goals, guests | sites key |
//!
//! Every operation returns the decoded JSON object on success and a
//! [`PlausibleError`](crate::PlausibleError) otherwise.
//!
//! # Example
//!
//! ```rust,ignore
//! use plausible_api::{PlausibleClient, PlausibleConfig};
//! use plausible_api::clients::{CreateSite, ListParams, PutGoal};
//!
//! let client = PlausibleClient::new(&PlausibleConfig::from_env()?)?;
//!
//! client.create_site(&CreateSite::new("example.com")).await?;
//! client.put_goal(&PutGoal::event("example.com", "Signup")).await?;
//!
//! let sites = client.list_sites(&ListParams::new().limit(10)).await?;
//! ```

mod client;
mod events;
mod goals;
mod guests;
mod models;
mod sites;
mod stats;

pub use client::PlausibleClient;
pub use models::{
    CreateSite, DateRange, Event, GoalType, GuestRole, IncludeOptions, ListParams, Pagination,
    PutGoal, PutGuest, QueryResultRow, SortDirection, StatsQuery, StatsResponse, DEFAULT_TIMEZONE,
};
