use thiserror::Error;

use crate::config::ConfigError;
use crate::jwt::claims::ClaimsError;
use crate::jwt::error::TokenError;

pub mod decode;
pub mod encode;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("configuring secret: `{0}`")]
    Config(#[from] ConfigError),
    #[error("building claims: `{0}`")]
    Claims(#[from] ClaimsError),
    #[error("{0}")]
    Token(#[from] TokenError),
    #[error("printing claims: `{0}`")]
    Output(String),
}
