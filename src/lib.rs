pub mod batch;
pub mod browser;
pub mod config;
pub mod logging;
pub mod output;
pub mod outreach;
pub mod profile;
pub mod scoring;
