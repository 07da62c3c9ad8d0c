//! Group rows by the text of one column.

use std::collections::HashMap;

use crate::error::{DatasetError, DatasetResult};
use crate::types::Row;

/// Insertion-ordered association from a string key to the rows sharing it.
///
/// Iteration follows the order in which each key was first inserted, never lexical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMap {
    index: HashMap<String, usize>,
    groups: Vec<(String, Vec<Row>)>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `row` to the group for `key`, creating the group at the end if it is new.
    pub fn insert(&mut self, key: impl Into<String>, row: Row) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => self.groups[i].1.push(row),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![row]));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Row]> {
        self.index.get(key).map(|&i| self.groups[i].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, rows)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.groups.iter().map(|(k, rows)| (k.as_str(), rows.as_slice()))
    }

    /// The group with the fewest rows; ties go to the earliest group.
    pub fn minority(&self) -> Option<(&str, &[Row])> {
        self.iter().fold(None, |best, cur| match best {
            Some((_, rows)) if rows.len() <= cur.1.len() => best,
            _ => Some(cur),
        })
    }

    /// The group with the most rows; ties go to the earliest group.
    pub fn majority(&self) -> Option<(&str, &[Row])> {
        self.iter().fold(None, |best, cur| match best {
            Some((_, rows)) if rows.len() >= cur.1.len() => best,
            _ => Some(cur),
        })
    }

    pub fn into_groups(self) -> Vec<(String, Vec<Row>)> {
        self.groups
    }
}

/// Drain `rows` front to back into groups keyed by the text of `column`.
///
/// `rows` is empty afterwards. If any row is too short for `column`, nothing is drained and
/// [`DatasetError::ColumnOutOfRange`] is returned.
pub fn group_by_value(rows: &mut Vec<Row>, column: usize) -> DatasetResult<GroupMap> {
    if let Some(short) = rows.iter().find(|r| r.len() <= column) {
        return Err(DatasetError::ColumnOutOfRange {
            column,
            columns: short.len(),
        });
    }

    let mut groups = GroupMap::new();
    for row in rows.drain(..) {
        let key = row[column].to_string();
        groups.insert(key, row);
    }
    Ok(groups)
}
