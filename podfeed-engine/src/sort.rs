//! Feed ordering
//!
//! Stable sort by (tier ascending, created_at descending). For any fixed
//! input snapshot the output order is total and deterministic; items equal
//! on both keys keep their assembler order. The sort runs only at explicit
//! load boundaries (mount, tab switch, pull-to-refresh), never after a
//! single vote, so items do not jump mid-interaction.

use crate::tier::tier_for;
use podfeed_common::FeedItem;

/// Sort assembled feed items in place into display order.
pub fn sort_feed(items: &mut Vec<FeedItem>) {
    // Vec::sort_by is stable, preserving assembler order on full ties
    items.sort_by(|a, b| {
        tier_for(a)
            .cmp(&tier_for(b))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
