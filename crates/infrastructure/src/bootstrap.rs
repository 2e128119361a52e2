//! Assembles the production network stack from configuration.

use std::sync::Arc;

use rocket_application::{CredentialError, Network, TransportError};
use thiserror::Error;

use crate::adapters::ReqwestTransport;
use crate::config::ClientConfig;
use crate::interceptors::DefaultInterceptors;
use crate::persistence::FileCredentialStore;

/// Errors raised while wiring the network stack.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The transport could not be created.
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    /// The credentials file could not be opened.
    #[error("credential store setup failed: {0}")]
    Credentials(#[from] CredentialError),

    /// No credentials path was configured and no data directory exists.
    #[error("could not determine a location for the credentials file")]
    NoCredentialsPath,
}

/// Builds a [`Network`] with the reqwest transport, the default
/// interceptors and a file-backed credential store.
///
/// # Errors
///
/// Returns an error if any component cannot be created.
pub fn build_network(config: &ClientConfig) -> Result<Network, BootstrapError> {
    let path = config
        .resolved_credentials_path()
        .ok_or(BootstrapError::NoCredentialsPath)?;
    let credentials = FileCredentialStore::open(path)?;
    let transport = ReqwestTransport::new(&config.endpoint, config.timeout_ms, &config.user_agent)?;
    let interceptors = DefaultInterceptors::new(config.max_retries, config.retry_delay());

    tracing::info!(
        endpoint = %transport.endpoint(),
        credentials = %credentials.path().display(),
        "network stack ready"
    );

    Ok(Network::new(
        Arc::new(transport),
        Arc::new(interceptors),
        Arc::new(credentials),
    ))
}
