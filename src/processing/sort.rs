//! Index-based sorting.
//!
//! Keys are never sorted in place. [`sorted_index`] computes a stable ascending permutation over
//! the keys, and [`sort_by_index`] applies that permutation to any sequence (rows, column records,
//! raw records) that must stay aligned with the keys.

use crate::dataset::Dataset;
use crate::error::{DatasetError, DatasetResult};

/// Sub-ranges at or below this length are sorted by insertion sort.
const INSERTION_SORT_THRESHOLD: usize = 7;

/// Stable ascending permutation of `keys`.
///
/// Position `i` of the result is the index in `keys` of the `i`-th smallest key. Unordered keys
/// (e.g. NaN) keep their relative order.
pub fn sorted_index<T: PartialOrd>(keys: &[T]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..keys.len()).collect();
    let mut buf = vec![0usize; keys.len()];
    merge_sort(keys, &mut idx, &mut buf);
    idx
}

fn merge_sort<T: PartialOrd>(keys: &[T], idx: &mut [usize], buf: &mut [usize]) {
    let len = idx.len();
    if len <= INSERTION_SORT_THRESHOLD {
        insertion_sort(keys, idx);
        return;
    }

    let mid = len / 2;
    {
        let (left, right) = idx.split_at_mut(mid);
        let (buf_left, buf_right) = buf.split_at_mut(mid);
        merge_sort(keys, left, buf_left);
        merge_sort(keys, right, buf_right);
    }

    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < mid && j < len {
        // Take from the right only when strictly smaller; ties keep left-first order.
        if keys[idx[j]] < keys[idx[i]] {
            buf[k] = idx[j];
            j += 1;
        } else {
            buf[k] = idx[i];
            i += 1;
        }
        k += 1;
    }
    buf[k..k + (mid - i)].copy_from_slice(&idx[i..mid]);
    k += mid - i;
    buf[k..k + (len - j)].copy_from_slice(&idx[j..len]);
    idx.copy_from_slice(&buf[..len]);
}

fn insertion_sort<T: PartialOrd>(keys: &[T], idx: &mut [usize]) {
    for i in 1..idx.len() {
        let cur = idx[i];
        let mut j = i;
        while j > 0 && keys[cur] < keys[idx[j - 1]] {
            idx[j] = idx[j - 1];
            j -= 1;
        }
        idx[j] = cur;
    }
}

/// Reorder `items` so that position `i` holds the item previously at `perm[i]`.
///
/// `perm` must be a permutation of `0..items.len()`; otherwise `items` is left untouched and
/// [`DatasetError::InvalidPermutation`] is returned.
pub fn sort_by_index<T>(items: &mut Vec<T>, perm: &[usize]) -> DatasetResult<()> {
    if perm.len() != items.len() {
        return Err(DatasetError::InvalidPermutation {
            message: format!("permutation has {} entries, sequence has {}", perm.len(), items.len()),
        });
    }
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        match seen.get_mut(p) {
            Some(s) if !*s => *s = true,
            Some(_) => {
                return Err(DatasetError::InvalidPermutation {
                    message: format!("index {p} appears more than once"),
                });
            }
            None => {
                return Err(DatasetError::InvalidPermutation {
                    message: format!("index {p} out of range (len={})", perm.len()),
                });
            }
        }
    }

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(perm.iter().filter_map(|&p| slots[p].take()));
    Ok(())
}

/// Sort `dataset` ascending by `column`, keeping every row and column aligned.
///
/// Returns the permutation that was applied.
pub fn sort_by_column(dataset: &mut Dataset, column: usize) -> DatasetResult<Vec<usize>> {
    let keys = dataset.column_values(column)?;
    let perm = sorted_index(&keys);
    dataset.sort_by_index(&perm)?;
    Ok(perm)
}
