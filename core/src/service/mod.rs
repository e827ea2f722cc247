pub mod aggregation;
pub mod export;
pub mod recorder;
