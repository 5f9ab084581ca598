/// Identifier of an account. Depending on the server version it is sent
/// as a JSON string or a number; either way it ends up in URL paths as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(from = "RawUserId")]
pub struct UserId(String);

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(i64),
}

impl From<RawUserId> for UserId {
    fn from(raw: RawUserId) -> Self {
        match raw {
            RawUserId::Text(id) => UserId(id),
            RawUserId::Number(id) => UserId(id.to_string()),
        }
    }
}

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(from = "String")]
pub enum RoleName {
    Guardian,
    Citizen,
    Department,
    Other(String),
}

impl RoleName {
    pub fn as_str(&self) -> &str {
        match self {
            RoleName::Guardian => "Guardian",
            RoleName::Citizen => "Citizen",
            RoleName::Department => "Department",
            RoleName::Other(role) => role,
        }
    }
}

impl From<String> for RoleName {
    fn from(role: String) -> Self {
        match role.as_str() {
            "Guardian" => RoleName::Guardian,
            "Citizen" => RoleName::Citizen,
            "Department" => RoleName::Department,
            _ => RoleName::Other(role),
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of `GET /v1/User` and `GET /v1/User/{id}`.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Option<UserId>,
    pub username: Option<String>,
    pub role_name: Option<RoleName>,
}
