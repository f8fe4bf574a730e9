pub mod api_client;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod network;
pub mod offline_store;
pub mod service;
pub mod session;
pub mod settings;
pub mod store;
