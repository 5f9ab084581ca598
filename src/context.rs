use crate::api_client::AccountApiClient;
use crate::configuration::AccountSettings;
use crate::domain::{BearerToken, PasswordResetToken, Registration, RoleName, UserId};
use crate::sequencer::StepError;

/// What the suite has learned about one account so far.
#[derive(Debug, Default)]
pub struct ActorState {
    pub username: Option<String>,
    pub token: Option<BearerToken>,
    pub id: Option<UserId>,
    pub reset_token: Option<PasswordResetToken>,
}

/// State threaded through the steps of the account scenario.
#[derive(Debug)]
pub struct AccountContext {
    pub client: AccountApiClient,
    pub accounts: AccountSettings,
    pub guardian: ActorState,
    pub citizen1: ActorState,
    pub citizen2: ActorState,
    pub department: ActorState,
}

impl AccountContext {
    pub fn new(client: AccountApiClient, accounts: AccountSettings) -> Self {
        Self {
            client,
            accounts,
            guardian: ActorState::default(),
            citizen1: ActorState::default(),
            citizen2: ActorState::default(),
            department: ActorState::default(),
        }
    }

    pub fn citizen_registration(&self, username: String) -> Registration {
        Registration {
            username,
            password: self.accounts.citizen_password.clone(),
            role: RoleName::Citizen,
            department_id: self.accounts.citizen_department_id,
        }
    }
}

/// Borrow a value an earlier step was supposed to store.
pub fn require<'a, T>(value: &'a Option<T>, what: &'static str) -> Result<&'a T, StepError> {
    value.as_ref().ok_or(StepError::MissingState(what))
}
