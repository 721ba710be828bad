use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitmask tag identifying drag payload categories.
///
/// Callers define their own single-bit constants and combine them with `|` to
/// build accept filters. A target accepts a drag when the masks intersect.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DragKind(u32);

impl DragKind {
    /// No category; never intersects anything.
    pub const NONE: Self = Self(0);
    /// Value the context carries after a source resets it (all bits set).
    pub const RESET: Self = Self(u32::MAX);

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// "Matches any of": true when at least one category is shared.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True when every category of `other` is present in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DragKind {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DragKind {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DragKind {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<u32> for DragKind {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for DragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DragKind({:#b})", self.0)
    }
}
