//! Fire-and-forget score submission.
//!
//! Submissions run on a worker thread so a slow or broken backend never holds up
//! the simulation. The game polls the [`ScoreDispatcher`] between ticks. Results
//! arriving after the timeout are discarded and nothing is retried.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PersistenceError;

/// How many entries the in-memory leaderboard keeps.
pub const LEADERBOARD_SIZE: usize = 10;

/// A finished game's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: u32,
    pub player_name: String,
    pub max_level_reached: u8,
}

/// Somewhere scores can be stored.
///
/// Implementations may block; they are always called off the simulation thread.
pub trait ScoreRepository: Send + Sync {
    fn submit_score(&self, submission: &ScoreSubmission) -> Result<(), PersistenceError>;
}

/// A process-local top-ten table.
#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    entries: Mutex<Vec<ScoreSubmission>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, best score first. Equal scores keep their submission order.
    pub fn top(&self) -> Vec<ScoreSubmission> {
        self.entries.lock().clone()
    }

    pub fn best(&self) -> Option<ScoreSubmission> {
        self.entries.lock().first().cloned()
    }
}

impl ScoreRepository for InMemoryLeaderboard {
    fn submit_score(&self, submission: &ScoreSubmission) -> Result<(), PersistenceError> {
        if submission.player_name.trim().is_empty() {
            return Err(PersistenceError::Rejected("player name is empty".to_string()));
        }

        let mut entries = self.entries.lock();
        let index = entries.partition_point(|entry| entry.score >= submission.score);
        entries.insert(index, submission.clone());
        entries.truncate(LEADERBOARD_SIZE);
        Ok(())
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Submitted(ScoreSubmission),
    Failed {
        submission: ScoreSubmission,
        error: PersistenceError,
    },
}

struct PendingSubmission {
    submission: ScoreSubmission,
    started: Instant,
    receiver: Receiver<Result<(), PersistenceError>>,
}

/// Hands submissions to worker threads and collects their outcomes without blocking.
pub struct ScoreDispatcher {
    repository: Arc<dyn ScoreRepository>,
    timeout: Duration,
    pending: Vec<PendingSubmission>,
}

impl ScoreDispatcher {
    pub fn new(repository: Arc<dyn ScoreRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
            pending: Vec::new(),
        }
    }

    /// Starts submitting `submission` in the background.
    ///
    /// Returns the outcome right away only when no worker could be started.
    pub fn submit(&mut self, submission: ScoreSubmission) -> Option<SubmissionOutcome> {
        let (sender, receiver) = mpsc::channel();
        let repository = Arc::clone(&self.repository);
        let payload = submission.clone();

        let spawned = thread::Builder::new()
            .name("score-submit".to_string())
            .spawn(move || {
                let result = repository.submit_score(&payload);
                // The dispatcher may have given up on us already
                let _ = sender.send(result);
            });

        match spawned {
            Ok(_) => {
                debug!(score = submission.score, player = %submission.player_name, "Score submission started");
                self.pending.push(PendingSubmission {
                    submission,
                    started: Instant::now(),
                    receiver,
                });
                None
            }
            Err(error) => {
                let error = PersistenceError::Unavailable(error.to_string());
                warn!(score = submission.score, %error, "Could not start score submission");
                Some(SubmissionOutcome::Failed { submission, error })
            }
        }
    }

    /// Collects every submission that finished or timed out since the last poll.
    pub fn poll(&mut self) -> Vec<SubmissionOutcome> {
        let timeout = self.timeout;
        let mut finished = Vec::new();

        self.pending.retain(|pending| {
            let result = match pending.receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Disconnected) => {
                    Err(PersistenceError::Unavailable("submission worker exited".to_string()))
                }
                Err(TryRecvError::Empty) if pending.started.elapsed() >= timeout => {
                    Err(PersistenceError::TimedOut(timeout.as_millis() as u64))
                }
                Err(TryRecvError::Empty) => return true,
            };

            let submission = pending.submission.clone();
            finished.push(match result {
                Ok(()) => {
                    info!(score = submission.score, player = %submission.player_name, "Score submitted");
                    SubmissionOutcome::Submitted(submission)
                }
                Err(error) => {
                    warn!(score = submission.score, %error, "Score submission failed");
                    SubmissionOutcome::Failed { submission, error }
                }
            });
            false
        });

        finished
    }

    /// Submissions still waiting on their worker.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
