//! Character classes for identifier runs.
//!
//! A class is a set of predefined code-point groups plus a string of extra
//! characters. Only basic letter/digit tests are performed; there is no
//! Unicode normalization.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Predefined code-point groups.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ClassFlags: u8 {
        /// `a-z` and `A-Z`.
        const ASCII_LETTERS = 1;
        /// `0-9`.
        const ASCII_DIGITS = 1 << 1;
        /// `_`.
        const UNDERSCORE = 1 << 2;
        /// Any code point with the Unicode `Alphabetic` property.
        const UNICODE_LETTERS = 1 << 3;
        /// Any code point with a Unicode numeric general category.
        const UNICODE_DIGITS = 1 << 4;
    }
}

/// A character predicate expressed as data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharClass {
    pub flags: ClassFlags,
    /// Individual characters accepted in addition to `flags`.
    pub extra: String,
}

impl CharClass {
    pub const fn new(flags: ClassFlags) -> Self {
        CharClass {
            flags,
            extra: String::new(),
        }
    }

    /// Default identifier start: ASCII letters and underscore.
    pub const fn identifier_start() -> Self {
        Self::new(ClassFlags::ASCII_LETTERS.union(ClassFlags::UNDERSCORE))
    }

    /// Default identifier continuation: identifier start plus ASCII digits.
    pub const fn identifier_continue() -> Self {
        Self::new(
            ClassFlags::ASCII_LETTERS
                .union(ClassFlags::UNDERSCORE)
                .union(ClassFlags::ASCII_DIGITS),
        )
    }

    /// Add individual characters to the class.
    #[must_use]
    pub fn with_extra(mut self, chars: &str) -> Self {
        self.extra.push_str(chars);
        self
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        let flags = self.flags;
        (flags.contains(ClassFlags::ASCII_LETTERS) && c.is_ascii_alphabetic())
            || (flags.contains(ClassFlags::ASCII_DIGITS) && c.is_ascii_digit())
            || (flags.contains(ClassFlags::UNDERSCORE) && c == '_')
            || (flags.contains(ClassFlags::UNICODE_LETTERS) && c.is_alphabetic())
            || (flags.contains(ClassFlags::UNICODE_DIGITS) && c.is_numeric())
            || self.extra.contains(c)
    }
}
