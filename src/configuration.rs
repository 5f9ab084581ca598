use crate::api_client::AccountApiClient;
use crate::domain::Credentials;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub accounts: AccountSettings,
    pub runner: RunnerSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl ApiSettings {
    pub fn client(&self) -> Result<AccountApiClient, reqwest::Error> {
        AccountApiClient::new(self.base_url.clone(), self.timeout())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

/// Accounts the server under test is seeded with, plus what the suite
/// uses for the citizens it registers itself.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct AccountSettings {
    pub guardian: Credentials,
    pub department: Credentials,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub citizen_department_id: i64,
    pub citizen_password: Secret<String>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct RunnerSettings {
    #[serde(default)]
    pub fail_fast: bool,
    #[serde(default)]
    pub report_format: ReportFormat,
}

/// How the binary prints the run report on stdout.
#[derive(serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    read_configuration(environment, None)
}

/// Layers `base.yaml`, the environment file and `APP_*` variables.
/// `variables` replaces the process environment when given.
fn read_configuration(
    environment: Environment,
    variables: Option<config::Map<String, String>>,
) -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;
    let configuration_directory = base_path.join("configuration");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_API__BASE_URL=http://giraf.test/` would set `Settings.api.base_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .source(variables),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The possible environments the suite can run against.
#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Staging,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `staging`.",
                other
            )),
        }
    }
}
