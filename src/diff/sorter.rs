use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::ConfigurationError;

use super::node::{DiffNode, NodeId};

/// Column a sibling list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Path,
    Kind,
    Size,
    Alloc,
    Files,
    Folders,
}

impl SortField {
    /// All fields, in table column order.
    pub const ALL: [SortField; 6] = [
        SortField::Path,
        SortField::Kind,
        SortField::Size,
        SortField::Alloc,
        SortField::Files,
        SortField::Folders,
    ];

    /// Config/CLI name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Path => "path",
            SortField::Kind => "kind",
            SortField::Size => "size",
            SortField::Alloc => "alloc",
            SortField::Files => "files",
            SortField::Folders => "folders",
        }
    }

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Path => "Path",
            SortField::Kind => "Kind",
            SortField::Size => "Δ Size",
            SortField::Alloc => "Δ Alloc",
            SortField::Files => "Δ Files",
            SortField::Folders => "Δ Folders",
        }
    }

    /// Field for a 1-based column number, as typed on the keyboard.
    pub fn from_column(column: usize) -> Option<Self> {
        column
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

impl FromStr for SortField {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownSortField(s.to_string()))
    }
}

/// Active sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Size,
            ascending: false,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, ascending: bool) -> Self {
        Self { field, ascending }
    }

    /// Column-header click: same field flips direction, a new field
    /// starts ascending.
    pub fn clicked(self, field: SortField) -> Self {
        let ascending = if self.field == field {
            !self.ascending
        } else {
            true
        };
        Self { field, ascending }
    }

    /// Compare two siblings: primary field, then path, then size.
    ///
    /// When ordering by path, folders precede files in both directions.
    pub fn compare(&self, a: &DiffNode, b: &DiffNode) -> Ordering {
        let folders_first = match self.field {
            SortField::Path => b.is_folder.cmp(&a.is_folder),
            _ => Ordering::Equal,
        };
        folders_first.then_with(|| self.compare_directed(a, b))
    }

    fn compare_directed(&self, a: &DiffNode, b: &DiffNode) -> Ordering {
        let primary = match self.field {
            SortField::Path => compare_paths(&a.path, &b.path),
            SortField::Kind => a.kind.as_str().cmp(b.kind.as_str()),
            SortField::Size => a.delta_size.cmp(&b.delta_size),
            SortField::Alloc => a.delta_alloc.cmp(&b.delta_alloc),
            SortField::Files => a.delta_file_count.cmp(&b.delta_file_count),
            SortField::Folders => a.delta_folder_count.cmp(&b.delta_folder_count),
        };

        let mut ordering = primary;
        if ordering == Ordering::Equal && self.field != SortField::Path {
            ordering = compare_paths(&a.path, &b.path);
        }
        if ordering == Ordering::Equal && self.field != SortField::Size {
            ordering = a.delta_size.cmp(&b.delta_size);
        }

        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }

    /// Sort a sibling list of arena handles in place. Stable, so fully
    /// equal nodes keep their fetched order.
    pub fn sort_siblings(&self, siblings: &mut [NodeId], nodes: &[DiffNode]) {
        siblings.sort_by(|a, b| match (nodes.get(a.index()), nodes.get(b.index())) {
            (Some(a), Some(b)) => self.compare(a, b),
            _ => a.cmp(b),
        });
    }
}

/// Case-insensitive path order, falling back to exact comparison so that
/// distinct paths never compare equal.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
