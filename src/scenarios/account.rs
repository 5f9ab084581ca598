//! Account endpoints: login, registration, deletion and password reset,
//! exercised as guardian, department and two freshly registered citizens.
use crate::context::{AccountContext, require};
use crate::domain::{ErrorKey, PasswordResetToken, RoleName, unique_username};
use crate::expectations::{expect_data, expect_eq, expect_failure, expect_no_data, expect_success};
use crate::ordered_steps;
use crate::sequencer::{Sequencer, StepError};
use secrecy::Secret;

pub const ACCOUNT_SCENARIO: &str = "account_controller";

const CITIZEN1_PREFIX: &str = "Gunnar";
const CITIZEN2_PREFIX: &str = "Grundenberger";
const WRONG_PASSWORD: &str = "this-wont-work";
pub const UNKNOWN_USERNAME: &str = "this-wont-work-either";
const NEW_PASSWORD: &str = "brand-new-password";
const INVALID_RESET_TOKEN: &str = "invalid-token";

pub fn account_controller() -> Sequencer<AccountContext> {
    ordered_steps![
        AccountContext;
        login_as_guardian,
        get_guardian_id,
        register_citizen2,
        login_as_citizen2,
        get_citizen2_id,
        get_username_with_auth,
        login_with_invalid_password_should_fail,
        login_with_invalid_username_should_fail,
        register_citizen1_without_auth_should_fail,
        register_citizen1,
        login_as_citizen1,
        get_citizen1_id,
        get_citizen1_username,
        get_citizen1_role,
        login_as_department,
        delete_guardian_with_citizen2_should_fail,
        delete_citizen2,
        login_as_deleted_citizen2_should_fail,
        use_deleted_citizen2_token_should_fail,
        get_citizen1_reset_token,
        reset_citizen1_password,
        reset_citizen2_password_with_citizen1_token_should_fail,
        reset_citizen1_password_with_invalid_token_should_fail,
    ]
}

async fn login_as_guardian(ctx: &mut AccountContext) -> Result<(), StepError> {
    let guardian = &ctx.accounts.guardian;
    let response = ctx
        .client
        .login(&guardian.username, &guardian.password)
        .await?;
    expect_success(&response)?;
    ctx.guardian.token = Some(expect_data(response, "guardian token")?);
    Ok(())
}

async fn get_guardian_id(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.guardian.token, "guardian token")?;
    let response = ctx.client.current_user(token).await?;
    expect_success(&response)?;
    let user = expect_data(response, "guardian")?;
    ctx.guardian.id = Some(user.id.ok_or_else(|| expectation("the guardian id"))?);
    Ok(())
}

async fn register_citizen2(ctx: &mut AccountContext) -> Result<(), StepError> {
    let username = unique_username(CITIZEN2_PREFIX);
    ctx.citizen2.username = Some(username.clone());
    let registration = ctx.citizen_registration(username);
    let token = require(&ctx.guardian.token, "guardian token")?;
    let response = ctx.client.register(Some(token), &registration).await?;
    expect_success(&response)
}

async fn login_as_citizen2(ctx: &mut AccountContext) -> Result<(), StepError> {
    let username = require(&ctx.citizen2.username, "citizen2 username")?;
    let response = ctx
        .client
        .login(username, &ctx.accounts.citizen_password)
        .await?;
    expect_success(&response)?;
    ctx.citizen2.token = Some(expect_data(response, "citizen2 token")?);
    Ok(())
}

async fn get_citizen2_id(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.citizen2.token, "citizen2 token")?;
    let response = ctx.client.current_user(token).await?;
    expect_success(&response)?;
    let user = expect_data(response, "citizen2")?;
    ctx.citizen2.id = Some(user.id.ok_or_else(|| expectation("the citizen2 id"))?);
    Ok(())
}

async fn get_username_with_auth(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.guardian.token, "guardian token")?;
    let response = ctx.client.current_user(token).await?;
    expect_success(&response)?;
    let user = expect_data(response, "guardian")?;
    let username = user.username.ok_or_else(|| expectation("the guardian username"))?;
    expect_eq(
        "the guardian username",
        ctx.accounts.guardian.username.as_str(),
        username.as_str(),
    )
}

async fn login_with_invalid_password_should_fail(
    ctx: &mut AccountContext,
) -> Result<(), StepError> {
    let response = ctx
        .client
        .login(
            &ctx.accounts.guardian.username,
            &Secret::new(WRONG_PASSWORD.to_string()),
        )
        .await?;
    expect_failure(&response, ErrorKey::InvalidCredentials)?;
    expect_no_data(&response)
}

async fn login_with_invalid_username_should_fail(
    ctx: &mut AccountContext,
) -> Result<(), StepError> {
    let response = ctx
        .client
        .login(UNKNOWN_USERNAME, &ctx.accounts.guardian.password)
        .await?;
    expect_failure(&response, ErrorKey::InvalidCredentials)?;
    expect_no_data(&response)
}

async fn register_citizen1_without_auth_should_fail(
    ctx: &mut AccountContext,
) -> Result<(), StepError> {
    let username = unique_username(CITIZEN1_PREFIX);
    ctx.citizen1.username = Some(username.clone());
    let registration = ctx.citizen_registration(username);
    let response = ctx.client.register(None, &registration).await?;
    expect_failure(&response, ErrorKey::NotFound)
}

async fn register_citizen1(ctx: &mut AccountContext) -> Result<(), StepError> {
    let username = require(&ctx.citizen1.username, "citizen1 username")?.clone();
    let registration = ctx.citizen_registration(username);
    let token = require(&ctx.guardian.token, "guardian token")?;
    let response = ctx.client.register(Some(token), &registration).await?;
    expect_success(&response)
}

async fn login_as_citizen1(ctx: &mut AccountContext) -> Result<(), StepError> {
    let username = require(&ctx.citizen1.username, "citizen1 username")?;
    let response = ctx
        .client
        .login(username, &ctx.accounts.citizen_password)
        .await?;
    expect_success(&response)?;
    ctx.citizen1.token = Some(expect_data(response, "citizen1 token")?);
    Ok(())
}

async fn get_citizen1_id(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.citizen1.token, "citizen1 token")?;
    let response = ctx.client.current_user(token).await?;
    expect_success(&response)?;
    let user = expect_data(response, "citizen1")?;
    ctx.citizen1.id = Some(user.id.ok_or_else(|| expectation("the citizen1 id"))?);
    Ok(())
}

async fn get_citizen1_username(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.citizen1.token, "citizen1 token")?;
    let expected = require(&ctx.citizen1.username, "citizen1 username")?;
    let response = ctx.client.current_user(token).await?;
    expect_success(&response)?;
    let user = expect_data(response, "citizen1")?;
    expect_eq(
        "the citizen1 username",
        &Some(expected),
        &user.username.as_ref(),
    )
}

async fn get_citizen1_role(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.citizen1.token, "citizen1 token")?;
    let response = ctx.client.current_user(token).await?;
    expect_success(&response)?;
    let user = expect_data(response, "citizen1")?;
    expect_eq(
        "the citizen1 role",
        &Some(RoleName::Citizen),
        &user.role_name,
    )
}

async fn login_as_department(ctx: &mut AccountContext) -> Result<(), StepError> {
    let department = &ctx.accounts.department;
    let response = ctx
        .client
        .login(&department.username, &department.password)
        .await?;
    expect_success(&response)?;
    ctx.department.token = Some(expect_data(response, "department token")?);
    Ok(())
}

async fn delete_guardian_with_citizen2_should_fail(
    ctx: &mut AccountContext,
) -> Result<(), StepError> {
    let token = require(&ctx.citizen2.token, "citizen2 token")?;
    let guardian_id = require(&ctx.guardian.id, "guardian id")?;
    let response = ctx.client.delete_user(token, guardian_id).await?;
    expect_failure(&response, ErrorKey::NotFound)
}

async fn delete_citizen2(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.guardian.token, "guardian token")?;
    let citizen2_id = require(&ctx.citizen2.id, "citizen2 id")?;
    let response = ctx.client.delete_user(token, citizen2_id).await?;
    expect_success(&response)
}

async fn login_as_deleted_citizen2_should_fail(ctx: &mut AccountContext) -> Result<(), StepError> {
    let username = require(&ctx.citizen2.username, "citizen2 username")?;
    let response = ctx
        .client
        .login(username, &ctx.accounts.citizen_password)
        .await?;
    expect_failure(&response, ErrorKey::InvalidCredentials)?;
    expect_no_data(&response)
}

async fn use_deleted_citizen2_token_should_fail(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.citizen2.token, "citizen2 token")?;
    let guardian_id = require(&ctx.guardian.id, "guardian id")?;
    let response = ctx.client.user(token, guardian_id).await?;
    expect_failure(&response, ErrorKey::NotAuthorized)?;
    expect_no_data(&response)
}

async fn get_citizen1_reset_token(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.guardian.token, "guardian token")?;
    let citizen1_id = require(&ctx.citizen1.id, "citizen1 id")?;
    let response = ctx.client.password_reset_token(token, citizen1_id).await?;
    expect_success(&response)?;
    ctx.citizen1.reset_token = Some(expect_data(response, "citizen1 reset token")?);
    Ok(())
}

async fn reset_citizen1_password(ctx: &mut AccountContext) -> Result<(), StepError> {
    let token = require(&ctx.guardian.token, "guardian token")?;
    let citizen1_id = require(&ctx.citizen1.id, "citizen1 id")?;
    let reset_token = require(&ctx.citizen1.reset_token, "citizen1 reset token")?;
    let response = ctx
        .client
        .reset_password(token, citizen1_id, &new_password(), reset_token)
        .await?;
    expect_success(&response)
}

// The reset token belongs to citizen1, and citizen2 no longer exists.
async fn reset_citizen2_password_with_citizen1_token_should_fail(
    ctx: &mut AccountContext,
) -> Result<(), StepError> {
    let token = require(&ctx.guardian.token, "guardian token")?;
    let citizen2_id = require(&ctx.citizen2.id, "citizen2 id")?;
    let reset_token = require(&ctx.citizen1.reset_token, "citizen1 reset token")?;
    let response = ctx
        .client
        .reset_password(token, citizen2_id, &new_password(), reset_token)
        .await?;
    expect_failure(&response, ErrorKey::UserNotFound)
}

async fn reset_citizen1_password_with_invalid_token_should_fail(
    ctx: &mut AccountContext,
) -> Result<(), StepError> {
    let token = require(&ctx.guardian.token, "guardian token")?;
    let citizen1_id = require(&ctx.citizen1.id, "citizen1 id")?;
    let response = ctx
        .client
        .reset_password(
            token,
            citizen1_id,
            &new_password(),
            &PasswordResetToken::new(INVALID_RESET_TOKEN),
        )
        .await?;
    expect_failure(&response, ErrorKey::InvalidProperties)
}

fn new_password() -> Secret<String> {
    Secret::new(NEW_PASSWORD.to_string())
}

fn expectation(what: &str) -> StepError {
    StepError::Expectation(format!("Expected the response to carry {what}."))
}
