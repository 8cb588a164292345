//! Typing sequencer — drives [`TypingState`] runs with tokio timers.
//!
//! Each run owns one background task.  The task and the [`Sequencer`] share
//! the run state behind a mutex together with a generation counter; the task
//! re-checks its generation under the lock before every mutation, and events
//! are sent while that lock is held.  Cancelling or restarting bumps the
//! generation under the same lock, so a timer that was already in flight
//! wakes up to find itself stale and does nothing.
//!
//! `step_interval` is a target cadence.  Actual spacing depends on the tokio
//! timer wheel (millisecond granularity) and host scheduling.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::error::SequencerError;
use crate::core::typing::{
    RunHandle, SequencerConfig, StepOutcome, Timing, TypingSnapshot, TypingState,
};

/// Notification pushed to the owner of a [`Sequencer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerEvent {
    pub handle: RunHandle,
    /// Generation of the run that emitted the event.
    pub generation: u64,
    pub kind: SequencerEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEventKind {
    /// The start delay elapsed and revealing began.
    Started,
    /// One more character is visible.
    Revealed(TypingSnapshot),
    /// The whole target is visible.  Sent exactly once per completed run.
    Completed(TypingSnapshot),
}

struct RunShared {
    generation: u64,
    state: TypingState,
}

type SharedRun = Arc<Mutex<RunShared>>;

struct RunSlot {
    shared: SharedRun,
    task: Option<JoinHandle<()>>,
}

fn lock(shared: &SharedRun) -> MutexGuard<'_, RunShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of typing runs.  Must be used from inside a tokio runtime.
pub struct Sequencer {
    slots: HashMap<RunHandle, RunSlot>,
    next_id: u64,
    tx: mpsc::UnboundedSender<SequencerEvent>,
}

impl Sequencer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SequencerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sequencer = Self {
            slots: HashMap::new(),
            next_id: 0,
            tx,
        };
        (sequencer, rx)
    }

    /// Begin a new run.  Bad timing is rejected before anything is scheduled.
    pub fn start(&mut self, config: SequencerConfig) -> Result<RunHandle, SequencerError> {
        let timing = config.validate()?;

        self.next_id += 1;
        let handle = RunHandle::from_raw(self.next_id);
        let shared = Arc::new(Mutex::new(RunShared {
            generation: 0,
            state: TypingState::new(String::new(), config.show_cursor),
        }));

        let task = launch(handle, &shared, &config, timing, &self.tx);
        self.slots.insert(handle, RunSlot { shared, task });
        tracing::debug!(%handle, chars = config.target_text.chars().count(), "typing run started");
        Ok(handle)
    }

    /// Stop a run, freezing whatever has been revealed.  Idempotent.
    pub fn cancel(&mut self, handle: RunHandle) {
        let Some(slot) = self.slots.get_mut(&handle) else {
            tracing::debug!(%handle, "cancel ignored: unknown run");
            return;
        };
        cancel_slot(handle, slot);
    }

    /// Replace the run behind `handle` with a fresh one.  The handle stays
    /// valid.  On a configuration error the current run is left untouched.
    pub fn restart(
        &mut self,
        handle: RunHandle,
        config: SequencerConfig,
    ) -> Result<(), SequencerError> {
        let timing = config.validate()?;
        let slot = self
            .slots
            .get_mut(&handle)
            .ok_or(SequencerError::UnknownRun(handle))?;

        if let Some(task) = slot.task.take() {
            task.abort();
        }
        slot.task = launch(handle, &slot.shared, &config, timing, &self.tx);
        tracing::debug!(%handle, "typing run restarted");
        Ok(())
    }

    /// Cancel a run and forget its handle (the hosting view went away).
    pub fn release(&mut self, handle: RunHandle) {
        match self.slots.remove(&handle) {
            Some(mut slot) => cancel_slot(handle, &mut slot),
            None => tracing::debug!(%handle, "release ignored: unknown run"),
        }
    }

    pub fn cancel_all(&mut self) {
        for (&handle, slot) in self.slots.iter_mut() {
            cancel_slot(handle, slot);
        }
    }

    /// Current observable state of a run.
    pub fn snapshot(&self, handle: RunHandle) -> Option<TypingSnapshot> {
        self.slots
            .get(&handle)
            .map(|slot| lock(&slot.shared).state.snapshot())
    }

    /// `false` for events from a run that has since been cancelled,
    /// restarted or released.
    pub fn is_current(&self, event: &SequencerEvent) -> bool {
        self.slots
            .get(&event.handle)
            .is_some_and(|slot| lock(&slot.shared).generation == event.generation)
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn cancel_slot(handle: RunHandle, slot: &mut RunSlot) {
    {
        let mut run = lock(&slot.shared);
        if run.state.cancel() {
            run.generation = run.generation.wrapping_add(1);
            tracing::debug!(%handle, revealed = run.state.cursor_position(), "typing run cancelled");
        }
    }
    if let Some(task) = slot.task.take() {
        task.abort();
    }
}

/// Reset the shared state for a new generation and schedule its task.
///
/// The reset happens under the lock, before the new task exists, so no timer
/// of the previous generation can touch the new state.
fn launch(
    handle: RunHandle,
    shared: &SharedRun,
    config: &SequencerConfig,
    timing: Timing,
    tx: &mpsc::UnboundedSender<SequencerEvent>,
) -> Option<JoinHandle<()>> {
    let generation = {
        let mut run = lock(shared);
        run.generation = run.generation.wrapping_add(1);
        run.state = TypingState::new(config.target_text.clone(), config.show_cursor);
        let generation = run.generation;

        if run.state.unit_count() == 0 {
            // Nothing to type: finish now, whatever the delay.
            run.state.begin_reveal();
            let _ = tx.send(SequencerEvent {
                handle,
                generation,
                kind: SequencerEventKind::Completed(run.state.snapshot()),
            });
            return None;
        }

        if timing.start_delay.is_zero() {
            run.state.begin_reveal();
            let _ = tx.send(SequencerEvent {
                handle,
                generation,
                kind: SequencerEventKind::Started,
            });
        } else {
            run.state.begin_delay();
        }
        generation
    };

    let shared = Arc::clone(shared);
    let tx = tx.clone();
    Some(tokio::spawn(drive(handle, generation, shared, timing, tx)))
}

async fn drive(
    handle: RunHandle,
    generation: u64,
    shared: SharedRun,
    timing: Timing,
    tx: mpsc::UnboundedSender<SequencerEvent>,
) {
    let send = |kind| {
        let _ = tx.send(SequencerEvent {
            handle,
            generation,
            kind,
        });
    };

    if !timing.start_delay.is_zero() {
        tokio::time::sleep(timing.start_delay).await;
        let mut run = lock(&shared);
        if run.generation != generation {
            return;
        }
        run.state.begin_reveal();
        send(SequencerEventKind::Started);
    }

    loop {
        {
            let mut run = lock(&shared);
            if run.generation != generation {
                return;
            }
            match run.state.step() {
                StepOutcome::Revealed(_) => {
                    send(SequencerEventKind::Revealed(run.state.snapshot()));
                }
                StepOutcome::Completed => {
                    let snapshot = run.state.snapshot();
                    send(SequencerEventKind::Revealed(snapshot.clone()));
                    send(SequencerEventKind::Completed(snapshot));
                    tracing::debug!(%handle, "typing run complete");
                    return;
                }
                StepOutcome::Inert => return,
            }
        }
        pause(timing.step_interval).await;
    }
}

/// Wait between two reveals.  A zero interval still yields to the scheduler.
async fn pause(interval: Duration) {
    if interval.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(interval).await;
    }
}
