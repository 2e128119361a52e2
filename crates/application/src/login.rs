//! Login: exchanges an email address for a session token.

use std::sync::Arc;

use rocket_domain::{DomainError, EmailAddress, LoginMutation, SESSION_KEY, Token};
use thiserror::Error;

use crate::ports::{CredentialError, CredentialStore, TransportError};
use crate::session::{RequestHandle, SessionClient};

/// Why a login attempt did not produce a stored session.
#[derive(Debug, Error)]
pub enum LoginFailure {
    /// The server returned no token.
    #[error("login rejected: {}", describe(.0))]
    Rejected(Vec<String>),

    /// The request failed at the transport level.
    #[error("Network Error: {0}")]
    Transport(#[from] TransportError),

    /// The token could not be stored.
    #[error("could not store session: {0}")]
    Credentials(#[from] CredentialError),
}

fn describe(reasons: &[String]) -> String {
    if reasons.is_empty() {
        "no token returned".to_string()
    } else {
        reasons.join("\n")
    }
}

/// Result of a login attempt. On success, carries GraphQL errors that
/// accompanied the token, if any.
pub type LoginOutcome = Result<Vec<String>, LoginFailure>;

/// Logs in and stores the resulting session token.
pub struct LoginService {
    client: Arc<SessionClient>,
    credentials: Arc<dyn CredentialStore>,
}

impl LoginService {
    /// Creates a login service storing tokens in `credentials`.
    #[must_use]
    pub fn new(client: Arc<SessionClient>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Returns true if a session token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.credentials.contains(SESSION_KEY)
    }

    /// Validates `email` and performs the login mutation.
    ///
    /// # Errors
    /// Returns a `DomainError` without issuing a request if the address
    /// is empty or malformed.
    pub fn login<F>(&self, email: &str, completion: F) -> Result<RequestHandle, DomainError>
    where
        F: FnOnce(LoginOutcome) + Send + 'static,
    {
        let email = EmailAddress::parse(email)?;
        let credentials = Arc::clone(&self.credentials);

        Ok(self
            .client
            .perform(&LoginMutation { email }, move |result| {
                let outcome = result.map_err(LoginFailure::from).and_then(|result| {
                    let errors = result.error_messages();
                    match result.data.and_then(|d| d.login) {
                        Some(token) => {
                            credentials.set(SESSION_KEY, Token::new(token))?;
                            tracing::info!("session token stored");
                            Ok(errors)
                        }
                        None => Err(LoginFailure::Rejected(errors)),
                    }
                });
                if let Err(failure) = &outcome {
                    tracing::warn!(%failure, "login failed");
                }
                completion(outcome);
            }))
    }
}
