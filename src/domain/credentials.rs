use secrecy::{ExposeSecret, Secret};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

/// Opaque credential handed out by the login endpoint.
#[derive(serde::Deserialize, Clone, Debug)]
#[serde(transparent)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }
}

impl ExposeSecret<String> for BearerToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
#[serde(transparent)]
pub struct PasswordResetToken(Secret<String>);

impl PasswordResetToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }
}

impl ExposeSecret<String> for PasswordResetToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

/// A new account as sent to the registration endpoint.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub password: Secret<String>,
    pub role: super::RoleName,
    pub department_id: i64,
}
