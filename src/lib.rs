//! Blog content API keeping PostgreSQL, a Redis snapshot cache and a search index consistent.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
