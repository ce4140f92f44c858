//! Vote aggregation
//!
//! Turns raw vote records into percentages, winners and ties. Two
//! independent algorithms depending on pod shape:
//!
//! - single-image pods run a 3-way sentiment tally (yes / maybe / no)
//! - multi-image pods tally per 1-based image index, carried on the yes
//!   channel via vote metadata
//!
//! Percentages are independently rounded (`round(100 * n / total)`) and
//! need not sum to 100. A choice wins iff its percentage equals the maximum
//! and the maximum is above zero; two or more winners make a tie. Zero
//! total votes means no winner, no tie, no signal.
//!
//! The at-most-one-vote-per-viewer invariant is enforced upstream, but this
//! module tolerates violations by deduplicating on read (earliest record
//! per voter wins).

use podfeed_common::{Vote, VoteChoice, VoteCounts};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Signal band thresholds (inclusive lower bounds, percent)
const DECISIVE_MIN: u8 = 90;
const STRONG_MIN: u8 = 70;
const LEANING_MIN: u8 = 40;
const FAINT_MIN: u8 = 1;

/// Ordinal strength class of a winning percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalBand {
    NoSignal,
    Faint,
    Leaning,
    Strong,
    Decisive,
}

impl SignalBand {
    /// Band for a winning percentage.
    pub fn from_pct(pct: u8) -> Self {
        if pct >= DECISIVE_MIN {
            SignalBand::Decisive
        } else if pct >= STRONG_MIN {
            SignalBand::Strong
        } else if pct >= LEANING_MIN {
            SignalBand::Leaning
        } else if pct >= FAINT_MIN {
            SignalBand::Faint
        } else {
            SignalBand::NoSignal
        }
    }
}

/// Outcome of aggregating one pod's votes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// No votes, or nothing above zero percent
    NoSignal,
    /// Single-image pod with one leading sentiment
    SentimentWinner {
        choice: VoteChoice,
        pct: u8,
        band: SignalBand,
    },
    /// Single-image pod with two or more equally-leading sentiments
    SentimentTie { choices: Vec<VoteChoice>, pct: u8 },
    /// Multi-image pod with one leading image (1-based index)
    ImageWinner { index: usize, pct: u8, band: SignalBand },
    /// Multi-image pod with two or more equally-leading images
    ImageTie { indices: Vec<usize>, pct: u8 },
}

/// Independently rounded percentage of `count` out of `total`.
pub fn round_pct(count: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 * 100.0) / total as f64).round() as u8
}

/// Tally a pod's raw vote records into counts.
///
/// Deduplicates on voter id first: when multiple records exist for one
/// voter the earliest `created_at` wins, falling back to first-seen on
/// equal timestamps. For multi-image pods (`image_count > 1`) the per-image
/// map is populated from vote metadata; indexes outside `1..=image_count`
/// are ignored.
pub fn count_votes(votes: &[Vote], image_count: usize) -> VoteCounts {
    let mut by_voter: HashMap<Uuid, &Vote> = HashMap::new();
    for vote in votes {
        by_voter
            .entry(vote.voter_id)
            .and_modify(|kept| {
                if vote.created_at < kept.created_at {
                    *kept = vote;
                }
            })
            .or_insert(vote);
    }

    let mut counts = VoteCounts::default();
    let mut per_image: BTreeMap<usize, u64> = BTreeMap::new();

    for vote in by_voter.values().copied() {
        counts.total += 1;
        match vote.choice {
            VoteChoice::Yes => counts.yes += 1,
            VoteChoice::Maybe => counts.maybe += 1,
            VoteChoice::No => counts.no += 1,
        }

        if image_count > 1 {
            if let Some(index) = selected_image_index(vote) {
                if (1..=image_count).contains(&index) {
                    *per_image.entry(index).or_insert(0) += 1;
                }
            }
        }
    }

    if image_count > 1 {
        counts.per_image = Some(per_image);
    }
    counts
}

/// The 1-based image index a vote selected, if any.
///
/// `selected_index` is authoritative; `selected_option` is the 0-based
/// offset kept for older records and is shifted up on fallback.
fn selected_image_index(vote: &Vote) -> Option<usize> {
    let meta = vote.metadata.as_ref()?;
    meta.selected_index
        .map(|i| i as usize)
        .or_else(|| meta.selected_option.map(|o| o as usize + 1))
}

/// Aggregate a pod's votes into a verdict.
///
/// `image_count` selects the algorithm: above one image the tally runs
/// per-image, otherwise 3-way sentiment.
pub fn aggregate_votes(votes: &[Vote], image_count: usize) -> Verdict {
    let counts = count_votes(votes, image_count);
    if image_count > 1 {
        aggregate_images(&counts, image_count)
    } else {
        aggregate_sentiment(&counts)
    }
}

/// 3-way sentiment verdict for single-image pods.
pub fn aggregate_sentiment(counts: &VoteCounts) -> Verdict {
    if counts.total == 0 {
        return Verdict::NoSignal;
    }

    let tallies = [
        (VoteChoice::Yes, round_pct(counts.yes, counts.total)),
        (VoteChoice::Maybe, round_pct(counts.maybe, counts.total)),
        (VoteChoice::No, round_pct(counts.no, counts.total)),
    ];

    let max_pct = tallies.iter().map(|(_, p)| *p).max().unwrap_or(0);
    if max_pct == 0 {
        return Verdict::NoSignal;
    }

    let winners: Vec<VoteChoice> = tallies
        .iter()
        .filter(|(_, p)| *p == max_pct)
        .map(|(c, _)| *c)
        .collect();

    if let [choice] = winners.as_slice() {
        Verdict::SentimentWinner {
            choice: *choice,
            pct: max_pct,
            band: SignalBand::from_pct(max_pct),
        }
    } else {
        Verdict::SentimentTie {
            choices: winners,
            pct: max_pct,
        }
    }
}

/// N-way per-image verdict for multi-image pods.
pub fn aggregate_images(counts: &VoteCounts, image_count: usize) -> Verdict {
    if counts.total == 0 || image_count < 2 {
        return Verdict::NoSignal;
    }

    let empty = BTreeMap::new();
    let per_image = counts.per_image.as_ref().unwrap_or(&empty);

    let tallies: Vec<(usize, u8)> = (1..=image_count)
        .map(|i| {
            let n = per_image.get(&i).copied().unwrap_or(0);
            (i, round_pct(n, counts.total))
        })
        .collect();

    let max_pct = tallies.iter().map(|(_, p)| *p).max().unwrap_or(0);
    if max_pct == 0 {
        return Verdict::NoSignal;
    }

    let winners: Vec<usize> = tallies
        .iter()
        .filter(|(_, p)| *p == max_pct)
        .map(|(i, _)| *i)
        .collect();

    if let [index] = winners.as_slice() {
        Verdict::ImageWinner {
            index: *index,
            pct: max_pct,
            band: SignalBand::from_pct(max_pct),
        }
    } else {
        Verdict::ImageTie {
            indices: winners,
            pct: max_pct,
        }
    }
}
