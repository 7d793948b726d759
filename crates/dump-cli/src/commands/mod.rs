pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod counts;
pub mod edit;
pub mod list;
pub mod onboard;
pub mod show;
pub mod subcategory;
pub mod upload;
pub mod usage;
