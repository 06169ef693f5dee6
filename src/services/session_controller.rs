//! One timed question: `Idle -> CountingDown -> Locked`.
//!
//! The countdown runs as a spawned task. All session state sits behind one
//! mutex and every event is sent while that mutex is held, so once
//! `submit_answer` or `cancel` has returned no tick or expiry can be observed.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use uuid::Uuid;

use crate::{
    config::CountdownConfig,
    errors::{AppError, AppResult},
    models::domain::{QuestionRecord, SessionEvent, SessionOutcome, SessionState},
};

enum Phase {
    Idle,
    CountingDown {
        correct_answer: String,
        started_at: DateTime<Utc>,
    },
    Locked {
        outcome: Option<SessionOutcome>,
    },
}

struct Shared {
    phase: Phase,
    events: UnboundedSender<SessionEvent>,
}

impl Shared {
    fn emit(&self, event: SessionEvent) {
        // The host may have stopped listening; the session still completes.
        let _ = self.events.send(event);
    }

    fn lock_with(&mut self, outcome: Option<SessionOutcome>) {
        if let Some(outcome) = outcome.clone() {
            self.emit(SessionEvent::Finished(outcome));
        }
        self.phase = Phase::Locked { outcome };
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SessionController {
    id: Uuid,
    countdown: CountdownConfig,
    shared: Arc<Mutex<Shared>>,
    timer: Option<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(countdown: CountdownConfig) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            id: Uuid::new_v4(),
            countdown,
            shared: Arc::new(Mutex::new(Shared {
                phase: Phase::Idle,
                events,
            })),
            timer: None,
        };
        (controller, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        match lock(&self.shared).phase {
            Phase::Idle => SessionState::Idle,
            Phase::CountingDown { .. } => SessionState::CountingDown,
            Phase::Locked { .. } => SessionState::Locked,
        }
    }

    /// The outcome once locked by an answer or by expiry; `None` otherwise,
    /// including after a teardown `cancel`.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match &lock(&self.shared).phase {
            Phase::Locked { outcome } => outcome.clone(),
            _ => None,
        }
    }

    /// Begin the countdown for `question`. Must be called inside a tokio runtime.
    pub fn start(&mut self, question: &QuestionRecord) -> AppResult<()> {
        let correct_answer = question
            .resolve_correct_answer()
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "correct answer '{}' does not match any option",
                    question.correct_answer
                ))
            })?
            .to_string();

        {
            let mut shared = lock(&self.shared);
            if !matches!(shared.phase, Phase::Idle) {
                return Err(AppError::InvalidState(
                    "a session controller can only be started once".to_string(),
                ));
            }
            shared.phase = Phase::CountingDown {
                correct_answer,
                started_at: Utc::now(),
            };
        }

        log::debug!(
            "Session {} counting down {:?} in {:?} steps",
            self.id,
            self.countdown.total,
            self.countdown.tick
        );
        self.timer = Some(tokio::spawn(run_countdown(
            self.shared.clone(),
            self.id,
            self.countdown,
        )));
        Ok(())
    }

    /// Lock the session with `selected` as the answer. Returns `None` when the
    /// session is not counting down, so repeated submissions are harmless.
    pub fn submit_answer(&mut self, selected: &str) -> Option<SessionOutcome> {
        let outcome = {
            let mut shared = lock(&self.shared);
            let Phase::CountingDown {
                correct_answer,
                started_at,
            } = &shared.phase
            else {
                log::debug!("Session {} ignored answer outside countdown", self.id);
                return None;
            };
            let outcome = SessionOutcome::answered(self.id, selected, correct_answer, *started_at);
            shared.lock_with(Some(outcome.clone()));
            outcome
        };

        self.stop_timer();
        log::info!(
            "Session {} answered, correct: {}",
            self.id,
            outcome.is_correct
        );
        Some(outcome)
    }

    /// Teardown for an owner that is going away. No further events are sent.
    pub fn cancel(&mut self) {
        {
            let mut shared = lock(&self.shared);
            if matches!(shared.phase, Phase::CountingDown { .. }) {
                shared.lock_with(None);
                log::debug!("Session {} cancelled during countdown", self.id);
            }
        }
        self.stop_timer();
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("countdown", &self.countdown)
            .finish()
    }
}

/// Whole ticks left, rounded up so the unit about to elapse is still shown.
fn remaining_units(remaining: Duration, tick: Duration) -> u32 {
    let tick = tick.as_nanos().max(1);
    remaining.as_nanos().div_ceil(tick) as u32
}

async fn run_countdown(shared: Arc<Mutex<Shared>>, id: Uuid, countdown: CountdownConfig) {
    let started = Instant::now();
    let deadline = started + countdown.total;
    let mut ticker = time::interval(countdown.tick.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = time::sleep_until(deadline) => {
                let mut guard = lock(&shared);
                let Phase::CountingDown { correct_answer, started_at } = &guard.phase else {
                    return;
                };
                let outcome = SessionOutcome::expired(id, correct_answer, *started_at);
                guard.lock_with(Some(outcome));
                log::info!("Session {} timed out", id);
                return;
            }
            _ = ticker.tick() => {
                let guard = lock(&shared);
                if !matches!(guard.phase, Phase::CountingDown { .. }) {
                    return;
                }
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    continue;
                }
                guard.emit(SessionEvent::Tick {
                    remaining: remaining_units(remaining, countdown.tick),
                });
            }
        }
    }
}
