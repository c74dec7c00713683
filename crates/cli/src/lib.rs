//! # sigflow CLI
//!
//! Loads decoded trace exports into a [`TraceStore`](sigflow_dialog_core::TraceStore)
//! and prints dialogue flows, unanswered requests, statistics, search hits and
//! packet listings as JSON.

pub mod cli;
pub mod config;

pub use crate::config::AppConfig;
