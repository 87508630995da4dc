//! Runs a [`GallerySession`] on its own task, driven by events.
//!
//! Query text is debounced before it reaches the session; everything else is
//! applied as it arrives. Each fresh result is published on a `watch`
//! channel, so subscribers only ever see the latest filter's result.

use crate::debounce::debounce;
use crate::session::{GallerySession, ScrollPosition, SessionStats};
use anyhow::{Context, Result};
use search::{FilterSpec, ResultPage};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 64;

/// Input to a running gallery service
#[derive(Debug, Clone)]
pub enum GalleryEvent {
    /// Free-text query as typed; debounced
    Query(String),
    /// Replace the whole filter (toggles, dropdowns, clear all)
    Filter(FilterSpec),
    LoadMore,
    Scroll(ScrollPosition),
}

/// What subscribers see after every change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GallerySnapshot {
    pub generation: u64,
    pub filter: FilterSpec,
    pub result: ResultPage,
}

impl GallerySnapshot {
    fn of(session: &GallerySession) -> Self {
        Self {
            generation: session.generation(),
            filter: session.filter().clone(),
            result: session.result().clone(),
        }
    }
}

pub struct GalleryService;

impl GalleryService {
    /// Move `session` onto a new task.
    ///
    /// The task runs until every [`GalleryHandle`] sender is gone, then closes
    /// the session.
    pub fn spawn(session: GallerySession, quiet: Duration) -> GalleryHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(GallerySnapshot::of(&session));

        let task = tokio::spawn(run(session, event_rx, snapshot_tx, quiet));

        GalleryHandle {
            events: event_tx,
            snapshots: snapshot_rx,
            task,
        }
    }
}

/// Client side of a running service
pub struct GalleryHandle {
    events: mpsc::Sender<GalleryEvent>,
    snapshots: watch::Receiver<GallerySnapshot>,
    task: JoinHandle<SessionStats>,
}

impl GalleryHandle {
    pub async fn send(&self, event: GalleryEvent) -> Result<()> {
        self.events
            .send(event)
            .await
            .context("Gallery service has stopped")
    }

    pub async fn set_query(&self, query: impl Into<String>) -> Result<()> {
        self.send(GalleryEvent::Query(query.into())).await
    }

    pub async fn set_filter(&self, filter: FilterSpec) -> Result<()> {
        self.send(GalleryEvent::Filter(filter)).await
    }

    pub async fn load_more(&self) -> Result<()> {
        self.send(GalleryEvent::LoadMore).await
    }

    pub async fn scroll(&self, position: ScrollPosition) -> Result<()> {
        self.send(GalleryEvent::Scroll(position)).await
    }

    /// A new receiver of result snapshots
    pub fn subscribe(&self) -> watch::Receiver<GallerySnapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot
    pub fn latest(&self) -> GallerySnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop sending events, let pending input drain, and collect the
    /// session's stats
    pub async fn shutdown(self) -> Result<SessionStats> {
        drop(self.events);
        self.task.await.context("Gallery service task failed")
    }
}

async fn run(
    session: GallerySession,
    events: mpsc::Receiver<GalleryEvent>,
    snapshots: watch::Sender<GallerySnapshot>,
    quiet: Duration,
) -> SessionStats {
    let (raw_query_tx, raw_query_rx) = mpsc::channel(EVENT_BUFFER);
    let (query_tx, queries) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(debounce(raw_query_rx, query_tx, quiet));

    drive(session, events, snapshots, raw_query_tx, queries).await
}

/// Event loop of [`run`], fed by an already running query debouncer
async fn drive(
    mut session: GallerySession,
    mut events: mpsc::Receiver<GalleryEvent>,
    snapshots: watch::Sender<GallerySnapshot>,
    raw_query_tx: mpsc::Sender<(u64, String)>,
    mut queries: mpsc::Receiver<(u64, String)>,
) -> SessionStats {
    // Queries travel through the debouncer tagged with the filter epoch they
    // were typed under. A `Filter` event bumps the epoch, so a query typed
    // before it can never overwrite it.
    let mut raw_query_tx = Some(raw_query_tx);
    let mut events_open = true;
    let mut queries_open = true;
    let mut filter_epoch = 0u64;

    info!("Gallery service started");

    while events_open || queries_open {
        let changed = tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(GalleryEvent::Query(text)) => match &raw_query_tx {
                    Some(tx) => match tx.send((filter_epoch, text)).await {
                        Ok(()) => false,
                        Err(mpsc::error::SendError((_, text))) => {
                            warn!("Query debouncer stopped, applying queries immediately");
                            raw_query_tx = None;
                            apply_query(&mut session, text)
                        }
                    },
                    None => apply_query(&mut session, text),
                },
                Some(GalleryEvent::Filter(filter)) => {
                    filter_epoch += 1;
                    let before = session.generation();
                    session.apply_filter(filter);
                    session.generation() != before
                }
                Some(GalleryEvent::LoadMore) => session.load_more().is_some(),
                Some(GalleryEvent::Scroll(position)) => session.on_scroll(position).is_some(),
                None => {
                    debug!("Event channel closed, flushing pending query");
                    events_open = false;
                    raw_query_tx = None;
                    false
                }
            },
            query = queries.recv(), if queries_open => match query {
                Some((epoch, text)) if epoch == filter_epoch => apply_query(&mut session, text),
                Some((_, text)) => {
                    debug!("Dropping query {text:?} typed before the latest filter");
                    false
                }
                None => {
                    queries_open = false;
                    false
                }
            },
        };

        if changed {
            snapshots.send_replace(GallerySnapshot::of(&session));
        }
    }

    session.close()
}

/// Apply typed text; true when the filter actually changed
fn apply_query(session: &mut GallerySession, text: String) -> bool {
    let before = session.generation();
    session.set_query(text);
    session.generation() != before
}
