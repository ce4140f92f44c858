//! Feed priority tiers
//!
//! Every feed item maps to an integer tier (1 highest) from three booleans:
//! effective liveness, has-voted, has-commented. Live pods still awaiting
//! any interaction outrank everything; fully-resolved live pods sink below
//! even ended-unseen pods, because they offer no further action but should
//! not disappear.
//!
//! | is_live | has_voted | has_commented | tier |
//! |---------|-----------|---------------|------|
//! | true    | false     | false         | 1    |
//! | true    | exactly one true          | 2    |
//! | false   | false     | false         | 3    |
//! | false   | exactly one true          | 4    |
//! | false   | true      | true          | 5    |
//! | true    | true      | true          | 6    |

use podfeed_common::FeedItem;

/// Priority tier, 1 (highest) through 6 (lowest)
pub type Tier = u8;

/// Classify a pod into its feed tier. Pure function, no I/O.
pub fn classify_tier(is_live: bool, has_voted: bool, has_commented: bool) -> Tier {
    match (is_live, has_voted, has_commented) {
        (true, false, false) => 1,
        (true, true, true) => 6,
        (true, _, _) => 2,
        (false, false, false) => 3,
        (false, true, true) => 5,
        (false, _, _) => 4,
    }
}

/// Tier for an assembled feed item.
pub fn tier_for(item: &FeedItem) -> Tier {
    classify_tier(item.is_live, item.has_voted, item.has_commented)
}
