use crate::editing::commands::Direction;
use crate::models::{ContentBlock, ContentGroup};

/// Items whose `order` field mirrors their position in a list
pub trait Ordered {
    fn order(&self) -> usize;
    fn set_order(&mut self, order: usize);
}

impl Ordered for ContentGroup {
    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}

impl Ordered for ContentBlock {
    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}

/// Set every item's `order` to its position
pub fn reindex<T: Ordered>(items: &mut [T]) {
    for (position, item) in items.iter_mut().enumerate() {
        item.set_order(position);
    }
}

/// Remove the item at `index` and re-index the rest.
///
/// Returns `None` without touching the list when `index` is out of range.
pub fn remove_ordered<T: Ordered>(items: &mut Vec<T>, index: usize) -> Option<T> {
    if index >= items.len() {
        return None;
    }
    let removed = items.remove(index);
    reindex(items);
    Some(removed)
}

/// Swap the item at `index` with its neighbour in `direction`.
///
/// Returns whether anything moved: moving the first item up or the last item
/// down leaves the list as it was. Callers check `index` beforehand.
pub fn move_ordered<T: Ordered>(items: &mut [T], index: usize, direction: Direction) -> bool {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1).filter(|&i| i < items.len()),
    };
    let Some(target) = target else {
        return false;
    };
    items.swap(index, target);
    reindex(items);
    true
}
