// Router-wide middleware

pub mod cors;

pub use cors::*;
