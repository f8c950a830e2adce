//! Path normalization utilities.

pub mod path;
