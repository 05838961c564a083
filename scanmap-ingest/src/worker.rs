use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::error::{IngestError, Result};
use crate::ingestor::{ingest, CancelFlag, IngestOptions, IngestOutcome, Progress};
use crate::source::QuerySource;

pub struct IngestHandle {
    cancel: CancelFlag,
    progress: mpsc::Receiver<Progress>,
    join: JoinHandle<Result<IngestOutcome>>,
}

pub fn spawn_ingest<S>(mut source: S, opts: IngestOptions) -> IngestHandle
where
    S: QuerySource + Send + 'static,
{
    let cancel = CancelFlag::new();
    let (tx, rx) = mpsc::channel::<Progress>();
    let worker_cancel = cancel.clone();
    let join = thread::spawn(move || {
        // A dropped receiver only means nobody is watching progress any more.
        ingest(&mut source, &worker_cancel, opts, &mut |p| {
            let _ = tx.send(p);
        })
    });
    IngestHandle {
        cancel,
        progress: rx,
        join,
    }
}

impl IngestHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn progress(&self) -> &mpsc::Receiver<Progress> {
        &self.progress
    }

    pub fn try_progress(&self) -> Vec<Progress> {
        self.progress.try_iter().collect()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn wait(self) -> Result<IngestOutcome> {
        match self.join.join() {
            Ok(result) => result,
            Err(_) => {
                warn!("ingest worker panicked");
                Err(IngestError::WorkerPanicked)
            }
        }
    }
}
