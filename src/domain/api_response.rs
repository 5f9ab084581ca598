use serde::de::IgnoredAny;

/// The envelope every account endpoint answers with.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub error_key: ErrorKey,
    pub data: Option<T>,
}

/// Envelope of endpoints whose payload the suite never looks at.
pub type EmptyResponse = ApiResponse<IgnoredAny>;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(from = "String")]
pub enum ErrorKey {
    NoError,
    InvalidCredentials,
    NotFound,
    NotAuthorized,
    UserNotFound,
    InvalidProperties,
    Other(String),
}

impl ErrorKey {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKey::NoError => "NoError",
            ErrorKey::InvalidCredentials => "InvalidCredentials",
            ErrorKey::NotFound => "NotFound",
            ErrorKey::NotAuthorized => "NotAuthorized",
            ErrorKey::UserNotFound => "UserNotFound",
            ErrorKey::InvalidProperties => "InvalidProperties",
            ErrorKey::Other(key) => key,
        }
    }
}

impl From<String> for ErrorKey {
    fn from(key: String) -> Self {
        match key.as_str() {
            "NoError" => ErrorKey::NoError,
            "InvalidCredentials" => ErrorKey::InvalidCredentials,
            "NotFound" => ErrorKey::NotFound,
            "NotAuthorized" => ErrorKey::NotAuthorized,
            "UserNotFound" => ErrorKey::UserNotFound,
            "InvalidProperties" => ErrorKey::InvalidProperties,
            _ => ErrorKey::Other(key),
        }
    }
}

impl std::fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
