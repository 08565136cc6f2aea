//! Character classes shared by search, word motion and folding.

/// Letters and digits.
#[inline]
#[must_use]
pub fn is_alnum(c: char) -> bool {
    c.is_alphanumeric()
}

/// Characters that may appear inside an identifier-like word.
#[inline]
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters that may appear inside a path or qualified name.
#[must_use]
pub fn is_navigable(c: char) -> bool {
    is_alnum(c) || matches!(c, '_' | ':' | '.' | '/' | '\\')
}

/// Simple case folding used by case-insensitive search.
///
/// Characters whose lowercase form expands to several scalars keep their
/// first scalar so that match lengths stay one-to-one.
#[must_use]
pub fn fold_case(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    c.to_lowercase().next().unwrap_or(c)
}
