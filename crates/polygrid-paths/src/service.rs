//! Background path searches with callbacks delivered on the caller's tick.
//!
//! [`PathService`] owns one worker thread. Requests are queued from any
//! thread through a [`Requester`]; the worker runs them one at a time and
//! queues the results. Callbacks only run inside [`PathService::pump`], on
//! whichever thread calls it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use polygrid_core::Vec3;

use crate::error::PathError;
use crate::finder::PathFinder;
use crate::reach::ReachTree;
use crate::simplify::simplify_path;
use crate::traits::Topology;

/// Completion callback of one request.
pub type Callback = Box<dyn FnOnce(PathResponse) + Send + 'static>;

/// Configuration for [`PathService::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceConfig {
    /// Requests that may wait for the worker before submissions fail with
    /// [`PathError::QueueFull`]. Zero is treated as one.
    pub queue_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { queue_capacity: 64 }
    }
}

// ---------------------------------------------------------------------------
// Requests and responses
// ---------------------------------------------------------------------------

/// What a request asks for. Points are in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    /// Shortest path between the tiles under two points.
    Path { start: Vec3, target: Vec3 },
    /// Reachability tree rooted at the tile under a point.
    Reach { target: Vec3 },
}

impl Query {
    pub fn target(&self) -> Vec3 {
        match *self {
            Self::Path { target, .. } | Self::Reach { target } => target,
        }
    }
}

/// A found path.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    pub start: usize,
    /// Tiles from start to target, both included.
    pub tiles: Vec<usize>,
    /// World-space waypoints at every change of direction.
    pub waypoints: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Path(FoundPath),
    /// Both tiles exist but the target cannot be reached.
    NoPath,
    Reach(ReachTree),
}

/// Result of one request, handed to its callback.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResponse {
    /// Id returned when the request was submitted.
    pub id: u64,
    pub query: Query,
    /// Tile under the query's target point, when it was resolved.
    pub target: Option<usize>,
    pub result: Result<Outcome, PathError>,
}

struct Request<G> {
    id: u64,
    query: Query,
    grid: Arc<RwLock<G>>,
    callback: Callback,
}

enum Job<G> {
    Run(Request<G>),
    Stop,
}

struct Done {
    response: PathResponse,
    callback: Callback,
}

// ---------------------------------------------------------------------------
// Requester
// ---------------------------------------------------------------------------

/// Cloneable submission handle. Usable from any thread.
///
/// A requester can outlive its [`PathService`]. Once the service is dropped,
/// submissions fail with [`PathError::Disconnected`]; a request that races
/// the shutdown may instead be accepted and then discarded without its
/// callback ever running.
pub struct Requester<G> {
    jobs: SyncSender<Job<G>>,
    next_id: Arc<AtomicU64>,
}

impl<G> Clone for Requester<G> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl<G: Topology + Send + Sync + 'static> Requester<G> {
    /// Queue a search for the path from the tile under `start` to the tile
    /// under `target`. Returns the request id.
    pub fn submit_path(
        &self,
        grid: &Arc<RwLock<G>>,
        start: Vec3,
        target: Vec3,
        callback: impl FnOnce(PathResponse) + Send + 'static,
    ) -> Result<u64, PathError> {
        self.submit(grid, Query::Path { start, target }, Box::new(callback))
    }

    /// Queue a reachability tree rooted at the tile under `target`.
    pub fn submit_reachability(
        &self,
        grid: &Arc<RwLock<G>>,
        target: Vec3,
        callback: impl FnOnce(PathResponse) + Send + 'static,
    ) -> Result<u64, PathError> {
        self.submit(grid, Query::Reach { target }, Box::new(callback))
    }

    fn submit(
        &self,
        grid: &Arc<RwLock<G>>,
        query: Query,
        callback: Callback,
    ) -> Result<u64, PathError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let job = Job::Run(Request {
            id,
            query,
            grid: grid.clone(),
            callback,
        });
        match self.jobs.try_send(job) {
            Ok(()) => Ok(id),
            Err(TrySendError::Full(_)) => {
                log::warn!("path request {id} rejected: queue is full");
                Err(PathError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(PathError::Disconnected),
        }
    }
}

// ---------------------------------------------------------------------------
// PathService
// ---------------------------------------------------------------------------

/// Owner of the worker thread and the response queue.
///
/// Dropping the service stops the worker after the requests already queued
/// and joins it. Responses that were not pumped by then are discarded
/// without running their callbacks.
pub struct PathService<G> {
    requester: Requester<G>,
    done: Receiver<Done>,
    thread: Option<JoinHandle<()>>,
}

impl<G: Topology + Send + Sync + 'static> PathService<G> {
    /// Start the worker thread.
    pub fn new(config: ServiceConfig) -> std::io::Result<Self> {
        let (jobs, job_rx) = mpsc::sync_channel(config.queue_capacity.max(1));
        let (done_tx, done) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("polygrid-paths".to_owned())
            .spawn(move || run_worker(job_rx, done_tx))?;

        Ok(Self {
            requester: Requester {
                jobs,
                next_id: Arc::new(AtomicU64::new(0)),
            },
            done,
            thread: Some(thread),
        })
    }

    /// A handle for submitting from other threads.
    pub fn requester(&self) -> Requester<G> {
        self.requester.clone()
    }

    /// See [`Requester::submit_path`].
    pub fn submit_path(
        &self,
        grid: &Arc<RwLock<G>>,
        start: Vec3,
        target: Vec3,
        callback: impl FnOnce(PathResponse) + Send + 'static,
    ) -> Result<u64, PathError> {
        self.requester.submit_path(grid, start, target, callback)
    }

    /// See [`Requester::submit_reachability`].
    pub fn submit_reachability(
        &self,
        grid: &Arc<RwLock<G>>,
        target: Vec3,
        callback: impl FnOnce(PathResponse) + Send + 'static,
    ) -> Result<u64, PathError> {
        self.requester.submit_reachability(grid, target, callback)
    }

    /// Run the callbacks of every finished request. Never blocks.
    ///
    /// Returns the number of callbacks run.
    pub fn pump(&self) -> usize {
        let mut count = 0;
        while let Ok(done) = self.done.try_recv() {
            (done.callback)(done.response);
            count += 1;
        }
        count
    }

    /// Like [`pump`](Self::pump), but first waits up to `timeout` for a
    /// response when none is ready.
    pub fn pump_wait(&self, timeout: Duration) -> usize {
        match self.done.recv_timeout(timeout) {
            Ok(done) => {
                (done.callback)(done.response);
                1 + self.pump()
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => 0,
        }
    }
}

impl<G> Drop for PathService<G> {
    fn drop(&mut self) {
        // Other requesters may still hold the channel open.
        let _ = self.requester.jobs.send(Job::Stop);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

fn run_worker<G: Topology>(jobs: Receiver<Job<G>>, done: Sender<Done>) {
    log::debug!("path worker started");
    let mut finder = PathFinder::new();

    for job in jobs.iter() {
        let Job::Run(request) = job else {
            break;
        };
        let Request {
            id,
            query,
            grid,
            callback,
        } = request;

        let (target, result) = serve(&mut finder, &grid, &query);
        if let Err(e) = &result {
            log::error!("path request {id} failed: {e}");
        }

        let response = PathResponse {
            id,
            query,
            target,
            result,
        };
        if done.send(Done { response, callback }).is_err() {
            log::warn!("dropping response to path request {id}: nobody is pumping");
        }
    }

    log::debug!("path worker stopped");
}

fn serve<G: Topology>(
    finder: &mut PathFinder,
    grid: &RwLock<G>,
    query: &Query,
) -> (Option<usize>, Result<Outcome, PathError>) {
    let Ok(grid) = grid.read() else {
        return (None, Err(PathError::GridUnavailable));
    };
    let point = query.target();

    let mut target = None;
    let run = panic::catch_unwind(AssertUnwindSafe(|| {
        let tile = grid.tile_at(point).ok_or(PathError::NoTile { point })?;
        target = Some(tile);
        search(finder, &*grid, query, tile)
    }));
    let result = run.unwrap_or_else(|payload| {
        // Scratch may be half written.
        *finder = PathFinder::new();
        Err(PathError::SearchPanicked(panic_message(payload.as_ref())))
    });
    (target, result)
}

fn search<G: Topology + ?Sized>(
    finder: &mut PathFinder,
    grid: &G,
    query: &Query,
    target: usize,
) -> Result<Outcome, PathError> {
    match *query {
        Query::Path { start, .. } => {
            let start_tile = grid
                .tile_at(start)
                .ok_or(PathError::NoTile { point: start })?;
            Ok(match finder.find_path(grid, start_tile, target) {
                Some(tiles) => {
                    let waypoints = simplify_path(grid, &tiles);
                    Outcome::Path(FoundPath {
                        start: start_tile,
                        tiles,
                        waypoints,
                    })
                }
                None => Outcome::NoPath,
            })
        }
        Query::Reach { .. } => Ok(Outcome::Reach(finder.reachability(grid, target)?)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
