use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("entry with idx already exists")]
    EntryAlreadyExists,

    #[error("codec error {0}")]
    CodecError(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for DbError {
    fn from(value: anyhow::Error) -> Self {
        Self::Other(value.to_string())
    }
}
