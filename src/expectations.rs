//! Checks on the response envelope. A mismatch fails the current step
//! with a message naming what was expected and what came back.
use crate::domain::{ApiResponse, ErrorKey};
use crate::sequencer::StepError;

pub fn expect_success<T>(response: &ApiResponse<T>) -> Result<(), StepError> {
    if response.success && response.error_key == ErrorKey::NoError {
        return Ok(());
    }
    Err(StepError::Expectation(format!(
        "Expected a successful response with error key `NoError`, got success={} and `{}`.",
        response.success, response.error_key
    )))
}

pub fn expect_failure<T>(response: &ApiResponse<T>, expected: ErrorKey) -> Result<(), StepError> {
    if !response.success && response.error_key == expected {
        return Ok(());
    }
    Err(StepError::Expectation(format!(
        "Expected a failed response with error key `{}`, got success={} and `{}`.",
        expected, response.success, response.error_key
    )))
}

pub fn expect_data<T>(response: ApiResponse<T>, what: &str) -> Result<T, StepError> {
    response.data.ok_or_else(|| {
        StepError::Expectation(format!("Expected the response to carry the {what}."))
    })
}

pub fn expect_no_data<T>(response: &ApiResponse<T>) -> Result<(), StepError> {
    match response.data {
        None => Ok(()),
        Some(_) => Err(StepError::Expectation(
            "Expected the response data to be null.".into(),
        )),
    }
}

pub fn expect_eq<T>(what: &str, expected: &T, actual: &T) -> Result<(), StepError>
where
    T: PartialEq + std::fmt::Debug + ?Sized,
{
    if expected == actual {
        return Ok(());
    }
    Err(StepError::Expectation(format!(
        "Expected {what} to be {expected:?}, got {actual:?}."
    )))
}
