use thiserror::Error;

/// Problems coercing a line of user input into the type a prompt expects.
/// These never reach the store; the console reports them and asks again.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a number.")]
    InvalidNumber(String),
    #[error("'{0}' is not a whole number.")]
    InvalidInteger(String),
    #[error("'{0}' is not one of the menu options (1-7).")]
    InvalidChoice(String),
}
