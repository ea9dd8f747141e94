// Per-category rating distributions for profile insights.

use serde::{Deserialize, Serialize};

use crate::state::ReviewEntry;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCategory {
    Overall,
    Story,
    Acting,
    Directing,
    Cinematography,
    Soundtrack,
    Editing,
    VisualEffects,
    Pacing,
    Rewatchability,
}

impl ReviewCategory {
    pub const ALL: [ReviewCategory; 10] = [
        ReviewCategory::Overall,
        ReviewCategory::Story,
        ReviewCategory::Acting,
        ReviewCategory::Directing,
        ReviewCategory::Cinematography,
        ReviewCategory::Soundtrack,
        ReviewCategory::Editing,
        ReviewCategory::VisualEffects,
        ReviewCategory::Pacing,
        ReviewCategory::Rewatchability,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overall => "Overall",
            Self::Story => "Story",
            Self::Acting => "Acting",
            Self::Directing => "Directing",
            Self::Cinematography => "Cinematography",
            Self::Soundtrack => "Soundtrack",
            Self::Editing => "Editing",
            Self::VisualEffects => "Visual Effects",
            Self::Pacing => "Pacing",
            Self::Rewatchability => "Rewatchability",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub category: ReviewCategory,
    /// counts[0] is the number of 1-ratings, counts[9] the number of 10s
    pub counts: [u32; MAX_RATING as usize],
    pub total: u32,
    pub average: Option<f64>,
}

impl RatingDistribution {
    pub fn count_for(&self, rating: u8) -> u32 {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return 0;
        }
        self.counts[(rating - MIN_RATING) as usize]
    }
}

/// Buckets every review's rating for `category`. Reviews without a rating for
/// the category, or with one outside 1..=10, are skipped.
pub fn rating_distribution(reviews: &[ReviewEntry], category: ReviewCategory) -> RatingDistribution {
    let mut counts = [0u32; MAX_RATING as usize];
    let mut total = 0u32;
    let mut sum = 0u64;

    for rating in reviews.iter().filter_map(|r| r.ratings.get(&category).copied()) {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            continue;
        }
        counts[(rating - MIN_RATING) as usize] += 1;
        total += 1;
        sum += rating as u64;
    }

    let average = if total > 0 { Some(sum as f64 / total as f64) } else { None };

    RatingDistribution { category, counts, total, average }
}

pub fn all_distributions(reviews: &[ReviewEntry]) -> Vec<RatingDistribution> {
    ReviewCategory::ALL
        .iter()
        .map(|c| rating_distribution(reviews, *c))
        .collect()
}
