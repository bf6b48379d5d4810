pub mod analyzers;
pub mod cleaner;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod report;
