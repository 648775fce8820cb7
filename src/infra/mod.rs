pub mod classifier;
pub mod weather;
