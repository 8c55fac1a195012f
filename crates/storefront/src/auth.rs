//! Local session state, the registered user list, and the admin gate.
//!
//! Every operation reports failure through [`AuthState::error`]; nothing
//! here returns an error to the caller. Passwords and the admin passphrase
//! are only ever held as argon2 PHC strings.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use baby_sneakers_core::Email;

pub const INCORRECT_PASSWORD: &str = "Incorrect password";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const USER_EXISTS: &str = "User already exists";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const SIGNUP_FAILED: &str = "An error occurred during signup";

/// Hashing a password failed.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `PasswordError` if the hasher rejects its parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Check a password against a PHC hash. A malformed hash never verifies.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
}

/// Session state, persisted under the `auth` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthState {
    pub is_admin: bool,
    pub is_authenticated: bool,
    pub user: Option<SessionUser>,
    /// Last failure message; empty when there is none.
    pub error: String,
}

/// A locally registered account, persisted under the `users` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub email: String,
    pub password_hash: String,
}

/// Auth container.
#[derive(Debug, Clone, Default)]
pub struct Auth {
    state: AuthState,
    users: Vec<RegisteredUser>,
    admin_passphrase_hash: Option<SecretString>,
}

impl Auth {
    /// Create a signed-out container. Without a passphrase hash the admin
    /// gate rejects every attempt.
    #[must_use]
    pub fn new(admin_passphrase_hash: Option<SecretString>) -> Self {
        Self {
            admin_passphrase_hash,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub fn users(&self) -> &[RegisteredUser] {
        &self.users
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.state.is_admin
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    #[must_use]
    pub fn error(&self) -> &str {
        &self.state.error
    }

    /// Unlock the admin gate.
    ///
    /// A wrong passphrase only sets the error; the session is untouched.
    #[tracing::instrument(skip_all)]
    pub fn login_admin(&mut self, passphrase: &str) -> bool {
        let granted = self
            .admin_passphrase_hash
            .as_ref()
            .is_some_and(|hash| verify_password(passphrase, hash.expose_secret()));

        if granted {
            self.state.is_admin = true;
            self.state.is_authenticated = true;
            self.state.error.clear();
            tracing::info!("Admin gate unlocked");
        } else {
            if self.admin_passphrase_hash.is_none() {
                tracing::warn!("Admin login attempted but no passphrase is configured");
            }
            self.state.error = INCORRECT_PASSWORD.to_string();
        }
        granted
    }

    /// Sign in a registered user.
    #[tracing::instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let email = email.trim();
        let user = self
            .users
            .iter()
            .find(|u| u.email == email && verify_password(password, &u.password_hash));

        match user {
            Some(user) => {
                self.state = AuthState {
                    is_admin: false,
                    is_authenticated: true,
                    user: Some(SessionUser {
                        email: user.email.clone(),
                    }),
                    error: String::new(),
                };
                tracing::info!("User signed in");
                true
            }
            None => {
                tracing::debug!("Login rejected");
                self.state.error = INVALID_CREDENTIALS.to_string();
                false
            }
        }
    }

    /// Register a new user and sign them in.
    ///
    /// A duplicate or malformed email only sets the error.
    #[tracing::instrument(skip(self, password))]
    pub fn signup(&mut self, email: &str, password: &str) -> bool {
        let Ok(email) = Email::parse(email) else {
            self.state.error = INVALID_EMAIL.to_string();
            return false;
        };
        if self.users.iter().any(|u| u.email == email.as_str()) {
            self.state.error = USER_EXISTS.to_string();
            return false;
        }

        let password_hash = match hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(error = %e, "Failed to hash password");
                self.state.error = SIGNUP_FAILED.to_string();
                return false;
            }
        };

        self.users.push(RegisteredUser {
            email: email.as_str().to_string(),
            password_hash,
        });
        self.state = AuthState {
            is_admin: false,
            is_authenticated: true,
            user: Some(SessionUser {
                email: email.into_inner(),
            }),
            error: String::new(),
        };
        tracing::info!("User registered");
        true
    }

    pub fn logout(&mut self) {
        self.state = AuthState::default();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state.error = message.into();
    }

    pub fn clear_error(&mut self) {
        self.state.error.clear();
    }

    /// Replace the session and user list with persisted values.
    pub fn restore(&mut self, state: AuthState, users: Vec<RegisteredUser>) {
        self.state = state;
        self.users = users;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const FIXTURE_PASSPHRASE: &str = "Pesko123";

    fn gated() -> Auth {
        Auth::new(Some(SecretString::from(hash_password(FIXTURE_PASSPHRASE).unwrap())))
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_admin_login() {
        let mut auth = gated();
        auth.set_error("stale");
        assert!(auth.login_admin(FIXTURE_PASSPHRASE));
        assert!(auth.is_admin());
        assert!(auth.is_authenticated());
        assert_eq!(auth.error(), "");
    }

    #[test]
    fn test_wrong_admin_passphrase_keeps_session() {
        let mut auth = gated();
        assert!(!auth.login_admin("pesko123"));
        assert!(!auth.is_admin());
        assert_eq!(auth.error(), INCORRECT_PASSWORD);

        assert!(auth.login_admin(FIXTURE_PASSPHRASE));
        assert!(!auth.login_admin("nope"));
        assert!(auth.is_admin());
        assert_eq!(auth.error(), INCORRECT_PASSWORD);
    }

    #[test]
    fn test_unconfigured_gate_rejects() {
        let mut auth = Auth::new(None);
        assert!(!auth.login_admin(FIXTURE_PASSPHRASE));
        assert_eq!(auth.error(), INCORRECT_PASSWORD);
    }

    #[test]
    fn test_signup_then_login() {
        let mut auth = Auth::new(None);
        assert!(auth.signup("mom@example.com", "secret"));
        assert!(auth.is_authenticated());
        assert!(!auth.is_admin());
        assert_ne!(auth.users()[0].password_hash, "secret");

        auth.logout();
        assert_eq!(auth.state(), &AuthState::default());

        assert!(!auth.login("mom@example.com", "wrong"));
        assert_eq!(auth.error(), INVALID_CREDENTIALS);

        assert!(auth.login(" mom@example.com ", "secret"));
        assert_eq!(auth.state().user.as_ref().unwrap().email, "mom@example.com");
        assert_eq!(auth.error(), "");
    }

    #[test]
    fn test_duplicate_signup_leaves_session() {
        let mut auth = Auth::new(None);
        assert!(auth.signup("dad@example.com", "a"));
        auth.logout();

        assert!(!auth.signup("dad@example.com", "b"));
        assert_eq!(auth.error(), USER_EXISTS);
        assert!(!auth.is_authenticated());
        assert!(auth.state().user.is_none());
        assert_eq!(auth.users().len(), 1);
    }

    #[test]
    fn test_signup_rejects_bad_email() {
        let mut auth = Auth::new(None);
        assert!(!auth.signup("not-an-email", "x"));
        assert_eq!(auth.error(), INVALID_EMAIL);
        assert!(auth.users().is_empty());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = AuthState {
            is_admin: true,
            ..AuthState::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["isAdmin"], true);

        let partial: AuthState = serde_json::from_str(r#"{"isAuthenticated":true}"#).unwrap();
        assert!(partial.is_authenticated);
        assert!(partial.error.is_empty());
    }
}
