//! Rocket Reserver Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, the default interceptor chain,
//! and configuration loading.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod interceptors;
pub mod persistence;
pub mod serialization;

pub use adapters::ReqwestTransport;
pub use bootstrap::{BootstrapError, build_network};
pub use self::config::{ClientConfig, ConfigError};
pub use interceptors::{
    DefaultInterceptors, RequestLoggingInterceptor, ResponseCacheInterceptor, RetryInterceptor,
};
pub use persistence::FileCredentialStore;
pub use serialization::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};
