use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlgovizError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type AlgovizResult<T> = Result<T, AlgovizError>;
