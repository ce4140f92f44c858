//! # PodFeed Engine
//!
//! Feed ranking and voting engine for short-lived image polls ("pods").
//!
//! The engine is pure logic plus one shared store: it classifies pods into
//! priority tiers from liveness and the viewer's interaction history,
//! produces a deterministic tie-broken feed order, aggregates raw votes
//! into percentages and winner/tie verdicts, and guarantees at-most-one
//! vote per viewer per pod while keeping interaction state consistent
//! across list virtualization and pull-to-refresh cycles.
//!
//! Persistence, authentication, image handling and presentation live
//! outside this crate, behind the [`PodRepository`] trait.

pub mod aggregate;
pub mod assemble;
pub mod feed;
pub mod lifecycle;
pub mod repository;
pub mod sort;
pub mod store;
pub mod submit;
pub mod tier;

pub use aggregate::{aggregate_votes, count_votes, SignalBand, Verdict};
pub use assemble::{assemble_feed, parse_image_refs, InteractionFlags};
pub use feed::FeedEngine;
pub use lifecycle::{classify_lifecycle, is_effectively_live, Liveness};
pub use repository::PodRepository;
pub use sort::sort_feed;
pub use store::InteractionStore;
pub use submit::{SubmissionPhase, VoteSubmitter, VoteToken};
pub use tier::{classify_tier, tier_for, Tier};
