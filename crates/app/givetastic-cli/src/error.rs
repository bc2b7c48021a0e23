use givetastic_core::access::AccessError;
use givetastic_core::auth::AuthError;
use givetastic_core::config::ConfigError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("{}", .0)]
    Access(#[from] AccessError),

    #[error("{}", .0)]
    Auth(#[from] AuthError),

    #[error("Store::{}", .0)]
    Store(#[from] ConfigError),
}
