pub mod collector;
pub mod pipelines;
pub mod processor;
pub mod progress;
pub mod reporter;
