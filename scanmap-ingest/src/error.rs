use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("source unavailable: {0}")]
    Source(String),

    #[error("query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("ingest worker panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, IngestError>;
