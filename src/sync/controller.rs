//! PanelController: poll loop and command dispatch
//!
//! A single tokio task owns the `SyncState`. Poll ticks, user actions and
//! finished requests are all handled inside that task, so state changes never
//! race each other. Requests themselves run in a `JoinSet` owned by the task:
//! a slow request never delays the next tick, and stopping the task aborts
//! whatever is still in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{self, Instant};

use super::state::{DeviceCommand, SyncState, UserAction};
use super::view::PanelView;
use crate::config::PanelConfig;
use crate::error::{SyncError, TransportError};
use crate::models::DeviceSnapshot;
use crate::robot::{CommandOutcome, DeviceApi};

/// Owner of the synchronization task. Dropping it aborts the task.
pub struct PanelController {
    handle: PanelHandle,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// Cheap, cloneable access for the presentation layer
#[derive(Clone)]
pub struct PanelHandle {
    actions: mpsc::UnboundedSender<UserAction>,
    view: watch::Receiver<PanelView>,
}

impl PanelController {
    /// Start syncing: one fetch right away, then one every `poll_interval`.
    pub fn mount(api: Arc<dyn DeviceApi>, poll_interval: Duration) -> Self {
        let state = SyncState::new();
        let (view_tx, view_rx) = watch::channel(state.view());
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = SyncWorker {
            api,
            state,
            view: view_tx,
            in_flight: JoinSet::new(),
        };
        let task = tokio::spawn(worker.run(poll_interval, action_rx, shutdown_rx));

        Self {
            handle: PanelHandle {
                actions: action_tx,
                view: view_rx,
            },
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn from_config(api: Arc<dyn DeviceApi>, config: &PanelConfig) -> Self {
        Self::mount(api, config.poll_interval())
    }

    pub fn handle(&self) -> PanelHandle {
        self.handle.clone()
    }

    /// Cancel the poll timer and wait for the task to exit
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("[Sync] Poll task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PanelController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl PanelHandle {
    /// Queue a user action. The control state changes before the matching
    /// request is sent.
    ///
    /// Returns once the action is queued, not once it is applied, so an
    /// immediate `view()` may still show the previous settings. Wait on
    /// `subscribe()` to observe the change.
    pub fn dispatch(&self, action: UserAction) -> Result<(), SyncError> {
        self.actions.send(action).map_err(|_| SyncError::Stopped)
    }

    pub fn view(&self) -> PanelView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelView> {
        self.view.clone()
    }
}

// ============================================================================
// Worker
// ============================================================================

enum Completion {
    Poll(Result<Option<DeviceSnapshot>, TransportError>),
    Command(DeviceCommand, Result<CommandOutcome, TransportError>),
}

struct SyncWorker {
    api: Arc<dyn DeviceApi>,
    state: SyncState,
    view: watch::Sender<PanelView>,
    in_flight: JoinSet<Completion>,
}

impl SyncWorker {
    async fn run(
        mut self,
        poll_interval: Duration,
        mut actions: mpsc::UnboundedReceiver<UserAction>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        tracing::info!(
            "[Sync] Starting poll loop (interval: {} ms)",
            poll_interval.as_millis()
        );

        self.spawn_fetch();

        // Ticks keep their wall-clock schedule whether or not earlier fetches finished
        let mut timer = time::interval_at(Instant::now() + poll_interval, poll_interval);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => break,
                Some(joined) = self.in_flight.join_next() => self.handle_completion(joined),
                Some(action) = actions.recv() => self.handle_action(action),
                _ = timer.tick() => self.spawn_fetch(),
            }
        }

        let pending = self.in_flight.len();
        self.in_flight.shutdown().await;
        tracing::info!("[Sync] Poll loop stopped ({} requests aborted)", pending);
    }

    fn spawn_fetch(&mut self) {
        let api = Arc::clone(&self.api);
        self.in_flight
            .spawn(async move { Completion::Poll(api.fetch_state().await) });
    }

    fn handle_action(&mut self, action: UserAction) {
        let command = self.state.apply_action(action);
        self.publish();

        let api = Arc::clone(&self.api);
        self.in_flight.spawn(async move {
            let result = send_command(api.as_ref(), command).await;
            Completion::Command(command, result)
        });
    }

    fn handle_completion(&mut self, joined: Result<Completion, JoinError>) {
        match joined {
            Ok(Completion::Poll(result)) => {
                if self.state.apply_poll(result) {
                    self.publish();
                }
            }
            Ok(Completion::Command(command, result)) => {
                self.state.apply_outcome(command, result);
                self.publish();
            }
            Err(e) => tracing::warn!("[Sync] Request task failed: {}", e),
        }
    }

    fn publish(&self) {
        let next = self.state.view();
        self.view.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

async fn send_command(
    api: &dyn DeviceApi,
    command: DeviceCommand,
) -> Result<CommandOutcome, TransportError> {
    match command {
        DeviceCommand::SwitchPower => api.switch_power().await,
        DeviceCommand::Reset => api.reset().await,
        DeviceCommand::SetFan { mode, speed } => api.set_fan_config(mode, speed).await,
    }
}
