use crate::domain::{
    ApiResponse, BearerToken, CurrentUser, EmptyResponse, PasswordResetToken, Registration, UserId,
};
use crate::utils::error_chain_fmt;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;

#[derive(Clone, Debug)]
pub struct AccountApiClient {
    base_url: String,
    http_client: Client,
}

#[derive(thiserror::Error)]
pub enum ApiClientError {
    #[error("Failed to reach the account API.")]
    Transport(#[from] reqwest::Error),
    #[error("The account API answered HTTP {status} with a body that is not a response envelope.")]
    UnexpectedBody {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl std::fmt::Debug for ApiClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(serde::Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    role: &'a str,
    department_id: i64,
}

#[derive(serde::Serialize)]
struct ResetPasswordRequest<'a> {
    password: &'a str,
    token: &'a str,
}

impl AccountApiClient {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    #[tracing::instrument(name = "Logging in", skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &Secret<String>,
    ) -> Result<ApiResponse<BearerToken>, ApiClientError> {
        let request = self
            .http_client
            .post(self.url("v1/Account/login"))
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            });
        send(request).await
    }

    #[tracing::instrument(name = "Fetching the authenticated user", skip_all)]
    pub async fn current_user(
        &self,
        token: &BearerToken,
    ) -> Result<ApiResponse<CurrentUser>, ApiClientError> {
        let request = self
            .http_client
            .get(self.url("v1/User"))
            .bearer_auth(token.expose_secret());
        send(request).await
    }

    #[tracing::instrument(name = "Fetching a user", skip(self, token))]
    pub async fn user(
        &self,
        token: &BearerToken,
        user_id: &UserId,
    ) -> Result<ApiResponse<CurrentUser>, ApiClientError> {
        let request = self
            .http_client
            .get(self.url(&format!("v1/User/{}", user_id)))
            .bearer_auth(token.expose_secret());
        send(request).await
    }

    /// Registration without a token is a legitimate request: the suite
    /// checks that the server refuses it.
    #[tracing::instrument(
        name = "Registering an account",
        skip(self, token, registration),
        fields(
            username = %registration.username,
            role = %registration.role,
            authorized = token.is_some()
        )
    )]
    pub async fn register(
        &self,
        token: Option<&BearerToken>,
        registration: &Registration,
    ) -> Result<EmptyResponse, ApiClientError> {
        let mut request = self
            .http_client
            .post(self.url("v1/Account/register"))
            .json(&RegisterRequest {
                username: &registration.username,
                password: registration.password.expose_secret(),
                role: registration.role.as_str(),
                department_id: registration.department_id,
            });
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        send(request).await
    }

    #[tracing::instrument(name = "Deleting an account", skip(self, token))]
    pub async fn delete_user(
        &self,
        token: &BearerToken,
        user_id: &UserId,
    ) -> Result<EmptyResponse, ApiClientError> {
        let request = self
            .http_client
            .delete(self.url(&format!("v1/Account/user/{}", user_id)))
            .bearer_auth(token.expose_secret());
        send(request).await
    }

    #[tracing::instrument(name = "Requesting a password reset token", skip(self, token))]
    pub async fn password_reset_token(
        &self,
        token: &BearerToken,
        user_id: &UserId,
    ) -> Result<ApiResponse<PasswordResetToken>, ApiClientError> {
        let request = self
            .http_client
            .get(self.url(&format!(
                "v1/User/{}/Account/password-reset-token",
                user_id
            )))
            .bearer_auth(token.expose_secret());
        send(request).await
    }

    #[tracing::instrument(
        name = "Resetting a password",
        skip(self, token, new_password, reset_token)
    )]
    pub async fn reset_password(
        &self,
        token: &BearerToken,
        user_id: &UserId,
        new_password: &Secret<String>,
        reset_token: &PasswordResetToken,
    ) -> Result<EmptyResponse, ApiClientError> {
        let request = self
            .http_client
            .post(self.url(&format!("v1/User/{}/Account/password", user_id)))
            .bearer_auth(token.expose_secret())
            .json(&ResetPasswordRequest {
                password: new_password.expose_secret(),
                token: reset_token.expose_secret(),
            });
        send(request).await
    }
}

// The envelope is parsed whatever the status code: failures come back as
// 4xx responses carrying `success: false` and an error key.
async fn send<T>(request: RequestBuilder) -> Result<ApiResponse<T>, ApiClientError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    tracing::debug!(status, "Received response from the account API");
    serde_json::from_str(&body).map_err(|source| ApiClientError::UnexpectedBody {
        status,
        body,
        source,
    })
}
