pub mod rank;
pub mod sparse;
