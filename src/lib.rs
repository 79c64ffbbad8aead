pub mod config;
pub mod demo_backend;
pub mod http_cache;
pub mod http_client;
pub mod provider;
pub mod query;
pub mod recommend_fetch;
pub mod render;
pub mod results_export;
pub mod state;
