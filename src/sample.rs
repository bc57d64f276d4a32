use crate::types::Candidate;
use rand::Rng;

/// Upper bound on the evaluation subset.
pub const SAMPLE_LIMIT: usize = 100;

const LOWER_PERCENTILE: f64 = 0.15;
const UPPER_PERCENTILE: f64 = 0.85;

// Zero-indexed, floor-based rank over the ascending sorted lengths.
fn percentile(sorted: &[usize], p: f64) -> usize {
    sorted[(sorted.len() as f64 * p).floor() as usize]
}

/// 15th/85th percentile of content length across the corpus, or `None`
/// for an empty corpus.
pub fn length_band(corpus: &[Candidate]) -> Option<(usize, usize)> {
    if corpus.is_empty() {
        return None;
    }
    let mut lengths: Vec<usize> = corpus.iter().map(|c| c.content.len()).collect();
    lengths.sort_unstable();
    Some((
        percentile(&lengths, LOWER_PERCENTILE),
        percentile(&lengths, UPPER_PERCENTILE),
    ))
}

/// Unbiased in-place shuffle: walk i from the end down to 1, swapping
/// with a uniform pick in [0, i].
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// The middle band of the corpus by content length, shuffled and capped
/// at [`SAMPLE_LIMIT`] entries.
pub fn select_candidates<R: Rng>(corpus: &[Candidate], rng: &mut R) -> Vec<Candidate> {
    let Some((low, high)) = length_band(corpus) else {
        return Vec::new();
    };

    let mut picked: Vec<Candidate> = corpus
        .iter()
        .filter(|c| (low..=high).contains(&c.content.len()))
        .cloned()
        .collect();
    shuffle(&mut picked, rng);
    picked.truncate(SAMPLE_LIMIT);
    picked
}
