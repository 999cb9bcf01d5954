pub mod errors;
pub mod merge;
