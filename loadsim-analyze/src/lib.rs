pub mod collector;
pub mod config;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod schedule;
pub mod worker;
