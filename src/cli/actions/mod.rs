pub mod login;

use anyhow::Result;
use std::process::ExitCode;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
}

impl Action {
    /// Execute the action.
    ///
    /// # Errors
    /// Returns an error if the action fails to execute.
    pub async fn execute(self) -> Result<ExitCode> {
        match self {
            Self::Login(args) => login::execute(args).await,
        }
    }
}
