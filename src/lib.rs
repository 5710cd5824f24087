pub mod cli;
pub mod columns;
pub mod configuration;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod ingest;
pub mod report;
pub mod server;
pub mod store;
