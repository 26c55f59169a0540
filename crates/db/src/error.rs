#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid watermark value: {0}")]
    InvalidWatermark(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
