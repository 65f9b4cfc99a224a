//! Diff classification between two layer snapshots

use crate::tree::entry::FileInfo;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Comparison result for one node (or a whole subtree) between two layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DiffType {
    #[default]
    Unchanged = 0,
    Changed = 1,
    Added = 2,
    Removed = 3,
}

impl DiffType {
    /// All variants, in discriminant order
    pub const ALL: [DiffType; 4] = [
        DiffType::Unchanged,
        DiffType::Changed,
        DiffType::Added,
        DiffType::Removed,
    ];

    /// Combine two statuses into one summary status
    ///
    /// Equal inputs are returned unchanged; anything else collapses to
    /// `Changed`. Commutative and associative, so folding a directory's
    /// children gives the same answer in any order.
    pub fn merge(self, other: DiffType) -> DiffType {
        if self == other {
            self
        } else {
            DiffType::Changed
        }
    }

    /// Fold any number of statuses with [`DiffType::merge`]
    ///
    /// An empty input is `Unchanged`.
    pub fn merge_all<I>(statuses: I) -> DiffType
    where
        I: IntoIterator<Item = DiffType>,
    {
        let mut statuses = statuses.into_iter();
        match statuses.next() {
            Some(first) => statuses.fold(first, DiffType::merge),
            None => DiffType::Unchanged,
        }
    }

    /// Classify a pair of entries the caller has already matched by path
    ///
    /// Presence in only one layer is `Added` or `Removed`; presence in both
    /// defers to [`FileInfo::compare`].
    pub fn between(lower: Option<&FileInfo>, upper: Option<&FileInfo>) -> Option<DiffType> {
        match (lower, upper) {
            (Some(lower), Some(upper)) => Some(lower.compare(upper)),
            (None, Some(_)) => Some(DiffType::Added),
            (Some(_), None) => Some(DiffType::Removed),
            (None, None) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffType::Unchanged => "Unchanged",
            DiffType::Changed => "Changed",
            DiffType::Added => "Added",
            DiffType::Removed => "Removed",
        }
    }

    /// Render a raw discriminant, falling back to its numeric form
    pub fn label(raw: u8) -> Cow<'static, str> {
        match DiffType::try_from(raw) {
            Ok(diff) => Cow::Borrowed(diff.as_str()),
            Err(raw) => Cow::Owned(raw.to_string()),
        }
    }
}

impl TryFrom<u8> for DiffType {
    /// The rejected raw value
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        DiffType::ALL.get(raw as usize).copied().ok_or(raw)
    }
}

impl From<DiffType> for u8 {
    fn from(diff: DiffType) -> Self {
        diff as u8
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
