pub mod config;
pub mod dom;
pub mod env_loader;
pub mod github_search;
pub mod pagination;
pub mod render;
pub mod search_error;
pub mod validation;
pub mod widget;
