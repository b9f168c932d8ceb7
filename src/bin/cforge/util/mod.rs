pub mod term;
pub mod text;
