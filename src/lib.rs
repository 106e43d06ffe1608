//! Submission analysis service: flags submissions by upload ordering, builds a
//! word-cloud link from their text and keeps a JSON report for each analysis.

pub mod analysis;
pub mod config;
pub mod error;
pub mod file_storing;
pub mod logging;
pub mod models;
pub mod routes;
pub mod similarity;
pub mod storage;
pub mod word_cloud;
