pub mod advice;
pub mod analyzers;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod output;
pub mod parser;
pub mod records;
pub mod report;
pub mod search;
pub mod segment;
pub mod source;
