pub mod kind;

pub use symhop_error::Error;
