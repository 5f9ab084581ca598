mod account;

pub use account::{ACCOUNT_SCENARIO, UNKNOWN_USERNAME, account_controller};
