pub mod sweep;
pub mod tagged;
