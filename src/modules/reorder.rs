// Reordering of ranked entries - pure logic.
// Rank is position, so every operation here only moves elements around.

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

fn check_index(index: usize, len: usize) -> Result<(), ReorderError> {
    if index >= len {
        return Err(ReorderError::IndexOutOfRange { index, len });
    }
    Ok(())
}

pub fn can_move_up(index: usize) -> bool {
    index > 0
}

pub fn can_move_down(index: usize, len: usize) -> bool {
    index + 1 < len
}

/// Swaps `index` with the element above it.
/// Returns `Ok(false)` for the inert move at the top.
pub fn move_up<T>(items: &mut [T], index: usize) -> Result<bool, ReorderError> {
    check_index(index, items.len())?;
    if !can_move_up(index) {
        return Ok(false);
    }
    items.swap(index - 1, index);
    Ok(true)
}

/// Swaps `index` with the element below it.
/// Returns `Ok(false)` for the inert move at the bottom.
pub fn move_down<T>(items: &mut [T], index: usize) -> Result<bool, ReorderError> {
    check_index(index, items.len())?;
    if !can_move_down(index, items.len()) {
        return Ok(false);
    }
    items.swap(index, index + 1);
    Ok(true)
}

/// Removes the element at `old_index` and reinserts it at `new_index`,
/// shifting everything in between by one.
pub fn relocate<T>(items: &mut Vec<T>, old_index: usize, new_index: usize) -> Result<bool, ReorderError> {
    check_index(old_index, items.len())?;
    check_index(new_index, items.len())?;
    if old_index == new_index {
        return Ok(false);
    }
    let item = items.remove(old_index);
    items.insert(new_index, item);
    Ok(true)
}

/// Rebuilds `items` in the order given by `new_order` (a drag-and-drop commit).
/// Returns true if the order changed.
///
/// Ids the caller left out are appended in their previous relative order, so a
/// stale order from the UI can never drop entries. Unknown ids are ignored.
pub fn apply_order<T, K, F>(items: &mut Vec<T>, new_order: &[K], key: F) -> bool
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    if items.is_empty() || new_order.is_empty() {
        return false;
    }

    let old_order: Vec<K> = items.iter().map(&key).collect();

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    let positions: HashMap<K, usize> = old_order
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, k)| (k, i))
        .collect();

    let mut reordered = Vec::with_capacity(slots.len());
    for id in new_order {
        if let Some(&pos) = positions.get(id) {
            if let Some(item) = slots[pos].take() {
                reordered.push(item);
            }
        }
    }
    reordered.extend(slots.into_iter().flatten());

    let changed = reordered.iter().map(&key).ne(old_order.iter().cloned());
    *items = reordered;

    if changed {
        log::debug!("[Reorder] Applied new order of {} entries", items.len());
    }
    changed
}
