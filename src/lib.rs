pub mod apply;
pub mod batch;
pub mod cli;
pub mod config;
pub mod datastore;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod fake;
pub mod logging;
pub mod scanner;
pub mod storage;
pub mod submit;
