use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use super::token::DEMO_TOKEN;
use super::AuthError;

/// Demo account accepted by `DemoVerifier::default()`
pub const DEMO_EMAIL: &str = "teacher@example.com";
pub const DEMO_PASSWORD: &str = "password";

/// Checks an email/password pair and issues a session token.
///
/// This is the seam where a real identity provider plugs in.
pub trait CredentialVerifier: Send + Sync {
    fn verify<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<String, AuthError>>;
}

/// Accepts exactly one email/password pair and returns a fixed token.
#[derive(Debug, Clone)]
pub struct DemoVerifier {
    email: String,
    password: String,
    token: String,
    delay: Duration,
}

impl Default for DemoVerifier {
    fn default() -> Self {
        Self::new(DEMO_EMAIL, DEMO_PASSWORD, DEMO_TOKEN)
    }
}

impl DemoVerifier {
    pub fn new(email: &str, password: &str, token: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            token: token.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Simulate network latency before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl CredentialVerifier for DemoVerifier {
    fn verify<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<String, AuthError>> {
        async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if email == self.email && password == self.password {
                debug!(email, "Demo credentials accepted");
                Ok(self.token.clone())
            } else {
                debug!(email, "Demo credentials rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
        .boxed()
    }
}
