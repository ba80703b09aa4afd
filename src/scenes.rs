pub mod cornell;
pub mod grid;
