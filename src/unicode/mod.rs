//! Character classification and display width policies.

mod class;
mod width;

pub use class::{fold_case, is_alnum, is_navigable, is_word_char};
pub use width::{WidthPolicy, char_columns};
