//! Background network jobs.
//!
//! Each job runs the blocking client on its own thread and reports back over
//! a channel drained once per frame. Reads carry the generation stamp they
//! were issued with so stale answers can be dropped.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::models::catalog::BacklogCard;
use crate::models::schedule::ScheduleEntry;
use crate::models::trip::{Trip, TripLeg};
use crate::services::api::client::RestClient;
use crate::services::api::ApiResult;
use crate::services::catalog::EventCatalog;
use crate::services::lock_in::LockInCommand;
use crate::services::sync::SaveRequest;

pub(super) enum JobResult {
    Trips(ApiResult<Vec<Trip>>),
    Catalog(ApiResult<EventCatalog>),
    Legs {
        stamp: u64,
        result: ApiResult<Vec<TripLeg>>,
    },
    Schedule {
        stamp: u64,
        trip_id: i64,
        result: ApiResult<Vec<ScheduleEntry>>,
    },
    Saved {
        request: SaveRequest,
        result: ApiResult<Vec<ScheduleEntry>>,
    },
    LockIn {
        command: LockInCommand,
        result: ApiResult<BacklogCard>,
    },
}

pub(super) struct JobRunner {
    api: Option<RestClient>,
    tx: Sender<JobResult>,
    rx: Receiver<JobResult>,
    pending: usize,
}

impl JobRunner {
    pub fn new(api: Option<RestClient>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.api.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    /// Run `job` on a worker thread. Returns false when there is no client.
    pub fn spawn<F>(&mut self, ctx: &egui::Context, job: F) -> bool
    where
        F: FnOnce(&RestClient) -> JobResult + Send + 'static,
    {
        let Some(api) = self.api.clone() else {
            return false;
        };
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.pending += 1;

        thread::spawn(move || {
            let _ = tx.send(job(&api));
            ctx.request_repaint();
        });
        true
    }

    /// Everything finished since the last frame.
    pub fn poll(&mut self) -> Vec<JobResult> {
        let mut finished = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(result) => {
                    self.pending = self.pending.saturating_sub(1);
                    finished.push(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        finished
    }
}
