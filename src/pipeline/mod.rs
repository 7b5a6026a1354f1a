pub mod import;
pub mod extraction;
pub mod export;
pub mod indexing;
pub mod processor;
