//! Identity providers behind the session store.

use forsee_core::DomainError;

use crate::error::AuthError;
use crate::user::User;

/// Turns credentials into an identity.
///
/// Implementations are synchronous; the session store owns the simulated
/// latency and the state commit.
pub trait Authenticator: Send + Sync {
    fn sign_in(&self, email: &str, credential: &str) -> Result<User, AuthError>;

    fn sign_up(&self, name: &str, email: &str, credential: &str) -> Result<User, AuthError>;

    fn federated(&self) -> Result<User, AuthError>;
}

/// Local demo provider: any non-empty credentials are accepted and a fresh
/// identity is fabricated for them.
#[derive(Debug, Clone)]
pub struct DemoAuthenticator {
    federated_available: bool,
}

impl DemoAuthenticator {
    pub const FEDERATED_NAME: &'static str = "Demo User";
    pub const FEDERATED_EMAIL: &'static str = "demo@forsee.ai";

    pub fn new() -> Self {
        Self {
            federated_available: true,
        }
    }

    /// A provider whose federated sign-in always rejects.
    pub fn with_federated_outage() -> Self {
        Self {
            federated_available: false,
        }
    }
}

impl Default for DemoAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

fn require_credentials(email: &str, credential: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || credential.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(())
}

impl Authenticator for DemoAuthenticator {
    fn sign_in(&self, email: &str, credential: &str) -> Result<User, AuthError> {
        require_credentials(email, credential)?;
        let email = email.trim();
        Ok(User::new(User::name_from_email(email), email))
    }

    fn sign_up(&self, name: &str, email: &str, credential: &str) -> Result<User, AuthError> {
        require_credentials(email, credential)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty").into());
        }
        Ok(User::new(name, email.trim()))
    }

    fn federated(&self) -> Result<User, AuthError> {
        if !self.federated_available {
            return Err(AuthError::FederatedAuthFailed(
                "identity provider unavailable".to_string(),
            ));
        }
        Ok(User::new(Self::FEDERATED_NAME, Self::FEDERATED_EMAIL))
    }
}
