pub mod overview;
pub mod report;
