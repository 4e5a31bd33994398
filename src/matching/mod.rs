//! Filter lookup logic: fuzzy scoring and list pagination.

pub mod fuzzy;
pub mod pagination;

pub use fuzzy::{FuzzyMatch, MATCH_THRESHOLD, best_match};
pub use pagination::{PER_PAGE, Page};
