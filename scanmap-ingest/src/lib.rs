pub mod error;
pub mod ingestor;
pub mod session;
pub mod source;
pub mod sqlite;
pub mod worker;

pub use error::{IngestError, Result};
pub use ingestor::{ingest, CancelFlag, IngestOptions, IngestOutcome, IngestStats, Progress};
pub use session::{Dataset, LoadStatus, Session, Snapshot};
pub use source::{MemorySource, NetworkRow, ObservationRow, QuerySource};
pub use sqlite::SqliteSource;
pub use worker::{spawn_ingest, IngestHandle};
