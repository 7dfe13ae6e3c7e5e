//! Tally data model
//!
//! A [`LetterTally`] is an insertion-ordered mapping from a leading letter to
//! a count of distinct entries. The same type serves both as the per-page
//! tally and as the aggregate built across pages. The [`Alphabet`] decides
//! which letters belong to the census.

mod alphabet;
mod letters;

pub use alphabet::{Alphabet, RUSSIAN_UPPERCASE};
pub use letters::LetterTally;
