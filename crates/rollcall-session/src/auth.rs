//! Authentication hook for verifying client credentials.
//!
//! Rollcall doesn't implement credential verification itself — that
//! belongs to whatever issued the token (a JWT signer, an auth service, a
//! test stub). The [`Authenticator`] trait is the seam: one async method
//! that takes the credential presented at handshake time and returns the
//! verified [`Identity`] or fails.
//!
//! Verification happens exactly once per connection, before the
//! connection enters the registry and before any session interaction, so
//! a slow verifier can never interleave with an in-progress broadcast for
//! that connection.

use rollcall_protocol::Identity;

use crate::SessionError;

/// Verifies a client's credential and returns who they are.
///
/// `Send + Sync + 'static` because the authenticator is shared across all
/// connection-handling tasks for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use rollcall_session::{Authenticator, SessionError};
/// use rollcall_protocol::{Identity, Role};
///
/// /// Accepts `teacher:<id>` and `student:<id>` tokens.
/// /// Only for development and tests — never use this in production.
/// struct PrefixAuthenticator;
///
/// impl Authenticator for PrefixAuthenticator {
///     async fn authenticate(
///         &self,
///         token: &str,
///     ) -> Result<Identity, SessionError> {
///         match token.split_once(':') {
///             Some(("teacher", id)) => Ok(Identity::new(id, Role::Teacher)),
///             Some(("student", id)) => Ok(Identity::new(id, Role::Student)),
///             _ => Err(SessionError::unauthorized("unrecognized token")),
///         }
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Verifies the given credential and returns the subject's identity.
    ///
    /// A connection arriving with no credential is verified with the
    /// empty string, which a real verifier is expected to reject.
    ///
    /// # Returns
    /// - `Ok(Identity)` — verification succeeded; the identity is bound
    ///   to the connection for its whole lifetime.
    /// - `Err(SessionError::Unauthorized)` — the connection must be
    ///   closed without being registered.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}
