//! Numbered choice lists.
//!
//! Both the repository search and the tag listing show the user a numbered list
//! and accept the number back. A [`SelectionList`] is built once per round from
//! the labels in display order and is never modified afterwards; the next round
//! builds a fresh one.

use crate::error::{DockhandError, Result};


/// An ordered, 1-indexed list of labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionList {
    labels: Vec<String>,
}

impl SelectionList {
    /// Builds a list, assigning display indices in input order starting at 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use libdockhand::selection::SelectionList;
    ///
    /// let list = SelectionList::build(["alpine", "nginx"]);
    /// assert_eq!(list.resolve(2).unwrap(), "nginx");
    /// assert!(list.resolve(3).is_err());
    /// ```
    pub fn build<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Maps a display index back to its label.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::SelectionOutOfRange`] when `index` is outside
    /// `[1, len]`, including every index on an empty list.
    pub fn resolve(&self, index: i64) -> Result<&str> {
        let out_of_range = || DockhandError::selection_out_of_range(index, self.labels.len());

        if index < 1 {
            return Err(out_of_range());
        }
        let position = usize::try_from(index - 1).map_err(|_| out_of_range())?;
        self.labels
            .get(position)
            .map(String::as_str)
            .ok_or_else(out_of_range)
    }

    /// Iterates `(display_index, label)` pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (i + 1, label.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Interprets `input` as a list index if it is purely numeric.
///
/// A leading `-` is accepted so that negative numbers are reported as out of
/// range instead of being taken as a name. Anything else returns `None`.
///
/// # Examples
///
/// ```
/// use libdockhand::selection::parse_index;
///
/// assert_eq!(parse_index("3"), Some(3));
/// assert_eq!(parse_index(" -1 "), Some(-1));
/// assert_eq!(parse_index("nginx"), None);
/// assert_eq!(parse_index("3a"), None);
/// ```
pub fn parse_index(input: &str) -> Option<i64> {
    let input = input.trim();
    let digits = input.strip_prefix('-').unwrap_or(input);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Digit strings too long for i64 are still indices, just unreachable ones.
    Some(input.parse::<i64>().unwrap_or(if input.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}
