//! Random sampling with optional exclusions.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::Dataset;
use crate::error::DatasetResult;

/// Source of randomness for sampling.
///
/// [`Sampler::new`] seeds from the wall clock; tests use [`Sampler::with_seed`].
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::with_seed(nanos as u64)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw up to `n` indices from `0..len`, never drawing one listed in `excluded`.
    ///
    /// Without replacement no index repeats and `n` is capped at the number of eligible indices.
    /// With replacement exactly `n` draws are made, unless nothing is eligible.
    pub fn pick_indices(&mut self, len: usize, n: usize, with_replacement: bool, excluded: &[usize]) -> Vec<usize> {
        let excluded: HashSet<usize> = excluded.iter().copied().collect();
        let mut eligible: Vec<usize> = (0..len).filter(|i| !excluded.contains(i)).collect();
        if eligible.is_empty() {
            return Vec::new();
        }

        if with_replacement {
            return (0..n)
                .map(|_| eligible[self.rng.gen_range(0..eligible.len())])
                .collect();
        }

        // Partial Fisher-Yates: the first `n` slots become the draw, in draw order.
        let n = n.min(eligible.len());
        for k in 0..n {
            let j = self.rng.gen_range(k..eligible.len());
            eligible.swap(k, j);
        }
        eligible.truncate(n);
        eligible
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`random_pick`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pick<T> {
    /// Drawn items, in draw order.
    pub picked: Vec<T>,
    pub picked_idx: Vec<usize>,
    /// Items never drawn (excluded ones included), in original order.
    pub unpicked: Vec<T>,
    pub unpicked_idx: Vec<usize>,
}

/// Draw `n` items from `items`; see [`Sampler::pick_indices`] for the drawing rules.
pub fn random_pick<T: Clone>(
    items: &[T],
    n: usize,
    with_replacement: bool,
    excluded: &[usize],
    sampler: &mut Sampler,
) -> Pick<T> {
    let picked_idx = sampler.pick_indices(items.len(), n, with_replacement, excluded);
    let unpicked_idx = complement(items.len(), &picked_idx);
    Pick {
        picked: picked_idx.iter().map(|&i| items[i].clone()).collect(),
        unpicked: unpicked_idx.iter().map(|&i| items[i].clone()).collect(),
        picked_idx,
        unpicked_idx,
    }
}

/// Rows of a [`Dataset`] split into drawn and undrawn datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSample {
    pub picked: Dataset,
    pub picked_idx: Vec<usize>,
    pub unpicked: Dataset,
    pub unpicked_idx: Vec<usize>,
}

/// Draw `n` rows of `dataset` into a new dataset, the rest into another.
///
/// Both results carry the source's mode and column declarations.
pub fn sample_rows(
    dataset: &Dataset,
    n: usize,
    with_replacement: bool,
    excluded: &[usize],
    sampler: &mut Sampler,
) -> DatasetResult<RowSample> {
    let len = dataset.n_rows();
    let picked_idx = sampler.pick_indices(len, n, with_replacement, excluded);
    let unpicked_idx = complement(len, &picked_idx);

    let collect = |idx: &[usize]| -> DatasetResult<Dataset> {
        let mut out = dataset.empty_like();
        for row in idx.iter().filter_map(|&i| dataset.row_at(i)) {
            out.push_row(row)?;
        }
        Ok(out)
    };

    Ok(RowSample {
        picked: collect(&picked_idx)?,
        unpicked: collect(&unpicked_idx)?,
        picked_idx,
        unpicked_idx,
    })
}

fn complement(len: usize, picked: &[usize]) -> Vec<usize> {
    let picked: HashSet<usize> = picked.iter().copied().collect();
    (0..len).filter(|i| !picked.contains(i)).collect()
}
