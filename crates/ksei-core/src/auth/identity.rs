use std::fmt;

/// Login identity for one AKSes account.
#[derive(Clone)]
pub struct Identity {
    pub username: String,
    pub password: String,
    /// When true the password is plaintext and goes through the challenge
    /// step; when false it already holds the server-issued login hash.
    pub plain_password: bool,
}

impl Identity {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            plain_password: true,
        }
    }

    /// Identity whose password is already the hashed login credential.
    pub fn prehashed(username: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            plain_password: false,
            ..Self::new(username, hashed_password)
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("plain_password", &self.plain_password)
            .finish()
    }
}
