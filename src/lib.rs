pub mod extractor;
pub mod report;
pub mod utils;
