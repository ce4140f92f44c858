//! # PodFeed Common Library
//!
//! Shared code for the PodFeed engine crates including:
//! - Domain models (pods, votes, comments, feed items)
//! - Common error type
//! - Timestamp parsing and time-left formatting
//! - Configuration loading

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{
    Audience, Comment, FeedItem, InteractionState, Pod, PodKind, PodRow, PodStatus, Vote,
    VoteChoice, VoteCounts, VoteMetadata,
};
