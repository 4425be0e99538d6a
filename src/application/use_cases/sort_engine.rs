// ============================================================
// SORT ENGINE
// ============================================================
// Numeric-aware, case-insensitive row ordering

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::csv::Row;

/// Leading decimal number, the way a browser's `parseFloat` reads one
static LEADING_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // ASCII digits only; `\d` would also take other scripts' digits
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("valid number pattern")
});

/// Numeric value of a cell, read from its leading number (`"12 pts"` is 12).
/// `None` unless the prefix is a finite number.
pub fn leading_number(cell: &str) -> Option<f64> {
    LEADING_NUMBER_PATTERN
        .find(cell.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Ascending order of two cells: numerically when both are numbers,
/// otherwise by case-insensitive collation
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => compare_text(a, b),
    }
}

/// Case-insensitive text order in the spirit of a root-locale collation:
/// base letters decide first (`é` sits with `e`, not after `z`), accents
/// break ties, case never does.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    base_letters(a).cmp(&base_letters(b)).then_with(|| {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        a.nfd().cmp(b.nfd())
    })
}

fn base_letters(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Sorted copy of `rows` by one column. Ties keep their input order in both
/// directions; a row without the column sorts as if the cell were empty.
pub fn sort_rows(rows: &[Row], column_index: usize, ascending: bool) -> Vec<Row> {
    let mut compare = |a: &Row, b: &Row| {
        let ordering = compare_cells(cell_at(a, column_index), cell_at(b, column_index));
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    };

    merge_sort_by(rows.to_vec(), &mut compare)
}

fn cell_at(row: &Row, column_index: usize) -> &str {
    row.get(column_index).map(String::as_str).unwrap_or("")
}

// Mixed text/number columns are not a total order, which `slice::sort_by`
// is allowed to panic on. A plain merge sort only needs a consistent answer per pair.
fn merge_sort_by<T>(mut items: Vec<T>, compare: &mut impl FnMut(&T, &T) -> Ordering) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            _ => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged.extend(left);
    merged.extend(right);
    merged
}
