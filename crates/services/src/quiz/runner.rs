use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::engine::QuizEngine;
use super::intent::{Intent, Transition};
use super::snapshot::QuizSnapshot;
use crate::error::RunnerError;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 32;

enum RunnerCommand {
    Dispatch {
        intent: Intent,
        reply: oneshot::Sender<Transition>,
    },
    Shutdown,
}

/// Events produced by the runner's own timer tasks.
#[derive(Debug, Clone, Copy)]
enum TimerEvent {
    Tick { epoch: u64 },
    Advance { ticket: u64 },
}

/// Handle used by a presentation layer to drive a running quiz.
#[derive(Debug, Clone)]
pub struct QuizHandle {
    commands: mpsc::Sender<RunnerCommand>,
    snapshots: watch::Receiver<QuizSnapshot>,
}

impl QuizHandle {
    /// Send an intent and wait until the engine has processed it.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Closed` if the runner has stopped.
    pub async fn dispatch(&self, intent: Intent) -> Result<Transition, RunnerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(RunnerCommand::Dispatch { intent, reply })
            .await
            .map_err(|_| RunnerError::Closed)?;
        response.await.map_err(|_| RunnerError::Closed)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every state change, including clock-driven ones.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.snapshots.clone()
    }

    /// # Errors
    ///
    /// Returns `RunnerError::Closed` if the runner already stopped.
    pub async fn shutdown(&self) -> Result<(), RunnerError> {
        self.commands
            .send(RunnerCommand::Shutdown)
            .await
            .map_err(|_| RunnerError::Closed)
    }
}

impl std::fmt::Debug for RunnerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch { intent, .. } => f.debug_tuple("Dispatch").field(intent).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Owns a [`QuizEngine`] on a tokio task and plays the Clock for it.
///
/// Intents and timer events are handled one at a time. After each one the
/// runner reconciles its timer tasks with what the engine asks for: the
/// one-second ticker follows `timer_epoch`/`timer_active`, and the deferred
/// advance follows `pending_advance`. Superseded tasks are aborted, and any
/// event they managed to send is dropped by epoch or ticket check.
pub struct QuizRunner {
    engine: QuizEngine,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    ticker: Option<(u64, JoinHandle<()>)>,
    advance: Option<(u64, JoinHandle<()>)>,
    snapshots: watch::Sender<QuizSnapshot>,
}

impl QuizRunner {
    /// Spawn the runner on the current tokio runtime.
    ///
    /// The returned join handle resolves to the engine once the runner stops.
    #[must_use]
    pub fn spawn(engine: QuizEngine) -> (QuizHandle, JoinHandle<QuizEngine>) {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(engine.snapshot());

        let runner = Self {
            engine,
            timer_tx,
            ticker: None,
            advance: None,
            snapshots: snapshots_tx,
        };
        let task = tokio::spawn(runner.run(commands_rx, timer_rx));

        (
            QuizHandle {
                commands: commands_tx,
                snapshots: snapshots_rx,
            },
            task,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<RunnerCommand>,
        mut timers: mpsc::UnboundedReceiver<TimerEvent>,
    ) -> QuizEngine {
        self.reconcile();
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(RunnerCommand::Dispatch { intent, reply }) => {
                        let transition = self.engine.dispatch(intent);
                        self.after_event(transition);
                        // The caller may have given up waiting; that is fine.
                        let _ = reply.send(transition);
                    }
                    Some(RunnerCommand::Shutdown) | None => break,
                },
                Some(event) = timers.recv() => {
                    let transition = self.handle_timer(event);
                    self.after_event(transition);
                }
            }
        }

        self.cancel_all();
        debug!("quiz runner stopped");
        self.engine
    }

    fn handle_timer(&mut self, event: TimerEvent) -> Transition {
        match event {
            TimerEvent::Tick { epoch } => {
                if epoch != self.engine.timer_epoch() {
                    trace!(
                        epoch,
                        current = self.engine.timer_epoch(),
                        "stale tick dropped"
                    );
                    return Transition::Ignored;
                }
                self.engine.dispatch(Intent::Tick)
            }
            TimerEvent::Advance { ticket } => {
                if self.advance.as_ref().is_some_and(|(id, _)| *id == ticket) {
                    self.advance = None;
                }
                self.engine.fire_advance(ticket)
            }
        }
    }

    fn after_event(&mut self, transition: Transition) {
        self.reconcile();
        if transition.is_applied() {
            self.snapshots.send_replace(self.engine.snapshot());
        }
    }

    fn reconcile(&mut self) {
        let wanted_tick = self
            .engine
            .timer_active()
            .then(|| self.engine.timer_epoch());
        if self.ticker.as_ref().map(|(epoch, _)| *epoch) != wanted_tick {
            if let Some((epoch, task)) = self.ticker.take() {
                trace!(epoch, "ticker cancelled");
                task.abort();
            }
            if let Some(epoch) = wanted_tick {
                self.ticker = Some((epoch, spawn_ticker(epoch, self.timer_tx.clone())));
            }
        }

        let wanted_advance = self.engine.pending_advance().map(|ticket| ticket.id);
        if self.advance.as_ref().map(|(id, _)| *id) != wanted_advance {
            if let Some((ticket, task)) = self.advance.take() {
                trace!(ticket, "auto-advance cancelled");
                task.abort();
            }
            if let Some(ticket) = wanted_advance {
                let delay = self.engine.settings().feedback_delay();
                self.advance = Some((
                    ticket,
                    spawn_advance(ticket, delay, self.timer_tx.clone()),
                ));
            }
        }
    }

    fn cancel_all(&mut self) {
        if let Some((_, task)) = self.ticker.take() {
            task.abort();
        }
        if let Some((_, task)) = self.advance.take() {
            task.abort();
        }
    }
}

fn spawn_ticker(epoch: u64, tx: mpsc::UnboundedSender<TimerEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tx.send(TimerEvent::Tick { epoch }).is_err() {
                break;
            }
        }
    })
}

fn spawn_advance(
    ticket: u64,
    delay: Duration,
    tx: mpsc::UnboundedSender<TimerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(TimerEvent::Advance { ticket });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuizPhase;
    use quiz_core::model::{LockReason, Question, QuestionSet, QuizSettings};
    use quiz_core::time::fixed_clock;

    fn engine() -> QuizEngine {
        let questions = QuestionSet::new(vec![
            Question::single_choice("Pick A", ["A", "B"], "A", 10).unwrap(),
            Question::fill_blank("Type x", "x", Vec::<String>::new(), 5).unwrap(),
            Question::single_choice("Pick C", ["C", "D"], "C", 5).unwrap(),
        ])
        .unwrap();
        QuizEngine::new(questions, QuizSettings::default(), fixed_clock())
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn welcome_phase_does_not_tick() {
        let (handle, _task) = QuizRunner::spawn(engine());
        sleep_ms(5_500).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, QuizPhase::Welcome);
        assert_eq!(snapshot.time_remaining, 15);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_times_out_then_auto_advances() {
        let (handle, _task) = QuizRunner::spawn(engine());
        handle.dispatch(Intent::Start).await.unwrap();

        sleep_ms(3_500).await;
        assert_eq!(handle.snapshot().time_remaining, 12);

        sleep_ms(12_000).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.time_remaining, 0);
        assert!(snapshot.feedback_visible);
        assert_eq!(snapshot.lock.map(|l| l.reason), Some(LockReason::TimedOut));
        assert_eq!(snapshot.score, 0);

        sleep_ms(2_000).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.time_remaining, 15);
        assert!(!snapshot.feedback_visible);

        sleep_ms(1_000).await;
        assert_eq!(handle.snapshot().time_remaining, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_navigation_cancels_pending_auto_advance() {
        let (handle, _task) = QuizRunner::spawn(engine());
        handle.dispatch(Intent::Start).await.unwrap();
        handle
            .dispatch(Intent::SelectSingleChoice("A".into()))
            .await
            .unwrap();
        assert_eq!(handle.snapshot().score, 10);

        sleep_ms(1_000).await;
        handle.dispatch(Intent::GoToNext).await.unwrap();
        assert_eq!(handle.snapshot().current_index, 1);

        sleep_ms(1_500).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.time_remaining, 14);
    }

    #[tokio::test(start_paused = true)]
    async fn locked_question_stops_the_clock() {
        let (handle, _task) = QuizRunner::spawn(engine());
        handle.dispatch(Intent::Start).await.unwrap();
        sleep_ms(2_500).await;
        handle
            .dispatch(Intent::SelectSingleChoice("B".into()))
            .await
            .unwrap();
        assert_eq!(handle.snapshot().time_remaining, 13);

        sleep_ms(1_000).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.time_remaining, 13);

        sleep_ms(1_200).await;
        assert_eq!(handle.snapshot().current_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_stops_all_timers() {
        let (handle, task) = QuizRunner::spawn(engine());
        handle.dispatch(Intent::Start).await.unwrap();
        handle
            .dispatch(Intent::SelectSingleChoice("A".into()))
            .await
            .unwrap();
        handle.dispatch(Intent::FinishNow).await.unwrap();

        sleep_ms(30_000).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, QuizPhase::Results);
        let summary = snapshot.summary.unwrap();
        assert_eq!(summary.score(), 10);
        assert_eq!(summary.correct_count(), 1);

        handle.shutdown().await.unwrap();
        let engine = task.await.unwrap();
        assert_eq!(engine.phase(), QuizPhase::Results);
        assert_eq!(
            handle.dispatch(Intent::Start).await.unwrap_err(),
            RunnerError::Closed
        );
    }
}
