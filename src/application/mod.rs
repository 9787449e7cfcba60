//! Application services layer.

pub mod activity;
pub mod cache;
pub mod error;
pub mod indexing;
pub mod pagination;
pub mod posts;
pub mod repos;
pub mod search;
