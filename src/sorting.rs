//! Sorting
//!
//! The two sort algorithms used to produce catalog display orderings, plus
//! the comparators they are driven by. Both take a three-way comparator and
//! assume nothing about it beyond the negative/zero/positive contract.
//!
//! Callers wanting to keep the source order sort a copy; nothing here touches
//! data the caller did not pass in.

use std::cmp::Ordering;

use crate::products::Product;

/// In-place partition-exchange sort (quicksort) with a last-element pivot and
/// Lomuto partitioning.
///
/// Average O(n log n); the last-element pivot degrades to O(n²) on already
/// sorted or reverse-sorted input. Catalog views are tens of items, so that
/// worst case is acceptable. Not stable: equal elements may be reordered.
pub fn quicksort<T, F>(items: &mut [T], compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return;
    }

    let pivot = partition(items, compare);

    let (left, rest) = items.split_at_mut(pivot);
    quicksort(left, compare);

    if let Some((_, right)) = rest.split_first_mut() {
        quicksort(right, compare);
    }
}

/// Lomuto partition: everything at most the pivot moves left of it. Returns
/// the pivot's final position.
fn partition<T, F>(items: &mut [T], compare: &F) -> usize
where
    F: Fn(&T, &T) -> Ordering,
{
    let last = items.len() - 1;
    let mut store = 0;

    for probe in 0..last {
        if let (Some(candidate), Some(pivot)) = (items.get(probe), items.get(last)) {
            if compare(candidate, pivot) != Ordering::Greater {
                items.swap(store, probe);
                store += 1;
            }
        }
    }

    items.swap(store, last);
    store
}

/// Merge sort: split at the midpoint, sort both halves, merge.
///
/// O(n log n) guaranteed, not in-place. Stable: when the comparator reports
/// equality the left half's element goes first.
pub fn merge_sort<T, F>(items: &[T], compare: &F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let (left_half, right_half) = items.split_at(items.len() / 2);
    let left = merge_sort(left_half, compare);
    let right = merge_sort(right_half, compare);

    merge(left, right, compare)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, compare: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left_iter = left.into_iter().peekable();
    let mut right_iter = right.into_iter().peekable();

    loop {
        match (left_iter.peek(), right_iter.peek()) {
            // "<= goes left" is what makes the sort stable.
            (Some(l), Some(r)) => {
                let next = if compare(l, r) == Ordering::Greater {
                    right_iter.next()
                } else {
                    left_iter.next()
                };

                if let Some(element) = next {
                    merged.push(element);
                }
            }
            (Some(_), None) => {
                merged.extend(left_iter);
                break;
            }
            (None, _) => {
                merged.extend(right_iter);
                break;
            }
        }
    }

    merged
}

/// Orders products by unit price, cheapest first.
#[must_use]
pub fn by_price_ascending(a: &Product<'_>, b: &Product<'_>) -> Ordering {
    a.price.to_minor_units().cmp(&b.price.to_minor_units())
}

/// Orders products by unit price, most expensive first.
#[must_use]
pub fn by_price_descending(a: &Product<'_>, b: &Product<'_>) -> Ordering {
    b.price.to_minor_units().cmp(&a.price.to_minor_units())
}

/// Orders products by display name.
#[must_use]
pub fn by_name(a: &Product<'_>, b: &Product<'_>) -> Ordering {
    a.name.cmp(&b.name)
}

/// Orders products by category tag.
#[must_use]
pub fn by_category(a: &Product<'_>, b: &Product<'_>) -> Ordering {
    a.category.cmp(&b.category)
}
