//! Column width of characters for layout.

use unicode_width::UnicodeWidthChar;

/// How many columns a character occupies in the flow grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthPolicy {
    /// Every character is one column wide.
    #[default]
    Fixed,
    /// East Asian wide characters take two columns, zero-width ones none.
    Unicode,
}

/// Columns occupied by `c` under `policy`. Tabs are handled by the caller.
#[inline]
#[must_use]
pub fn char_columns(c: char, policy: WidthPolicy) -> u8 {
    match policy {
        WidthPolicy::Fixed => 1,
        WidthPolicy::Unicode => {
            // Fast path: ASCII printable characters are always width 1
            if (' '..='~').contains(&c) {
                return 1;
            }
            UnicodeWidthChar::width(c).map_or(1, |w| w.min(2) as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width() {
        assert_eq!(char_columns('a', WidthPolicy::Fixed), 1);
        assert_eq!(char_columns('漢', WidthPolicy::Fixed), 1);
    }

    #[test]
    fn test_unicode_width() {
        assert_eq!(char_columns('a', WidthPolicy::Unicode), 1);
        assert_eq!(char_columns('漢', WidthPolicy::Unicode), 2);
        assert_eq!(char_columns('\u{0301}', WidthPolicy::Unicode), 0);
    }
}
