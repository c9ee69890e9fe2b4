pub mod duration;
pub mod validation;
