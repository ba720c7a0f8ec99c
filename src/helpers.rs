pub mod errors;
pub mod validated;
