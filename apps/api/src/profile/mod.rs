pub mod models;
pub mod normalizer;

pub use normalizer::normalize;
