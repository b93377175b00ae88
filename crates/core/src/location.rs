// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Polling a device location provider.
//!
//! A [`LocationTracker`] drives a [`LocationProvider`] on a background tokio
//! task and reports what happens as [`LocationEvent`]s on a
//! [`TrackerHandle`]. The tracker never touches the hunt manager; the owner
//! of the handle calls
//! [`HuntManager::target_location_reached`](crate::HuntManager::target_location_reached)
//! when it sees [`LocationEvent::TargetReached`].

use crate::settings::TrackerSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use treasure_hunt_domain::{Coordinates, Location, is_target_reached};

/// Step between status checks while the provider initializes.
const INIT_POLL_STEP: Duration = Duration::from_secs(1);

/// Shortest allowed polling interval.
const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(10);

/// State reported by a location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationStatus {
    /// Not running.
    Stopped,
    /// Started but not yet delivering positions.
    Initializing,
    /// Delivering positions.
    Running,
    /// Could not start.
    Failed,
}

/// A source of device positions, such as a GPS receiver.
pub trait LocationProvider: Send + Sync {
    /// Returns false if the user has turned location services off.
    fn is_enabled_by_user(&self) -> bool;

    /// Starts delivering positions.
    fn start(&self, desired_accuracy_meters: f64, update_distance_meters: f64);

    /// The provider's current state.
    fn status(&self) -> LocationStatus;

    /// The most recent position, if any has been fixed.
    fn last_known_position(&self) -> Option<Coordinates>;

    /// Stops delivering positions and releases the device.
    fn stop(&self);
}

/// Progress reported by a running tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEvent {
    /// Location services are off; the provider was not started.
    DisabledByUser,
    /// The provider was asked to start.
    Starting,
    /// The provider is delivering positions.
    Started,
    /// The provider failed or did not finish initializing in time.
    NotStarted,
    /// A position fix.
    Position(Coordinates),
    /// The watched target was reached.
    TargetReached,
    /// The target was not reached within the run time.
    TimedOut,
    /// The provider was released. Always the last event once started.
    Stopped,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    WatchTarget(Location),
    FollowPosition,
}

/// Spawns tracking sessions against a shared provider.
pub struct LocationTracker {
    provider: Arc<dyn LocationProvider>,
    settings: TrackerSettings,
}

impl LocationTracker {
    /// Creates a tracker for `provider`.
    #[must_use]
    pub const fn new(provider: Arc<dyn LocationProvider>, settings: TrackerSettings) -> Self {
        Self { provider, settings }
    }

    /// Watches for the player to reach `target`.
    ///
    /// Polls every `update_interval` for at most `run_time`. Must be called
    /// from within a tokio runtime.
    #[must_use]
    pub fn watch_target(&self, target: Location) -> TrackerHandle {
        info!(
            "Watching for target at {}, {} (radius {} m)",
            target.latitude, target.longitude, target.radius
        );
        self.spawn(Mode::WatchTarget(target))
    }

    /// Reports the current position every `update_interval` until stopped.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn follow_position(&self) -> TrackerHandle {
        info!("Following current position");
        self.spawn(Mode::FollowPosition)
    }

    fn spawn(&self, mode: Mode) -> TrackerHandle {
        let (cancel, cancel_rx) = watch::channel(false);
        let (events_tx, events) = mpsc::unbounded_channel();
        let task: JoinHandle<()> = tokio::spawn(run_tracker(
            Arc::clone(&self.provider),
            self.settings,
            mode,
            cancel_rx,
            events_tx,
        ));
        TrackerHandle {
            cancel,
            events,
            task,
        }
    }
}

/// Owner's end of a tracking session.
///
/// Dropping the handle stops the session.
pub struct TrackerHandle {
    cancel: watch::Sender<bool>,
    events: mpsc::UnboundedReceiver<LocationEvent>,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    /// Asks the session to stop. It releases the provider and reports
    /// [`LocationEvent::Stopped`].
    pub fn stop(&self) {
        self.cancel.send_replace(true);
    }

    /// Waits for the next event; `None` once the session has ended and all
    /// events were read.
    pub async fn next_event(&mut self) -> Option<LocationEvent> {
        self.events.recv().await
    }

    /// Returns the next event without waiting.
    pub fn try_next_event(&mut self) -> Option<LocationEvent> {
        self.events.try_recv().ok()
    }

    /// Returns true once the background task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

fn emit(events: &mpsc::UnboundedSender<LocationEvent>, event: LocationEvent) {
    debug!(?event, "Location event");
    if events.send(event).is_err() {
        debug!("Tracker handle dropped; discarding location event");
    }
}

async fn run_tracker(
    provider: Arc<dyn LocationProvider>,
    settings: TrackerSettings,
    mode: Mode,
    mut cancel: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<LocationEvent>,
) {
    if !provider.is_enabled_by_user() {
        warn!("Location services are disabled");
        emit(&events, LocationEvent::DisabledByUser);
        return;
    }

    provider.start(
        settings.desired_accuracy_meters,
        settings.update_distance_meters,
    );
    emit(&events, LocationEvent::Starting);

    tokio::select! {
        biased;
        () = cancelled(&mut cancel) => {
            debug!("Location tracking cancelled");
        }
        () = drive(provider.as_ref(), &settings, mode, &events) => {}
    }

    provider.stop();
    info!("Location provider stopped");
    emit(&events, LocationEvent::Stopped);
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|stop| *stop).await.is_err() {
        debug!("Tracker handle dropped");
    }
}

async fn drive(
    provider: &dyn LocationProvider,
    settings: &TrackerSettings,
    mode: Mode,
    events: &mpsc::UnboundedSender<LocationEvent>,
) {
    tokio::time::sleep(settings.startup_delay).await;
    if !wait_for_start(provider, settings.init_wait).await {
        warn!("Location provider did not start: {:?}", provider.status());
        emit(events, LocationEvent::NotStarted);
        return;
    }
    emit(events, LocationEvent::Started);

    let interval: Duration = settings.update_interval.max(MIN_UPDATE_INTERVAL);
    match mode {
        Mode::WatchTarget(target) => {
            let watch = watch_target(provider, interval, target, events);
            if tokio::time::timeout(settings.run_time, watch).await.is_err() {
                info!("Target not reached within {:?}", settings.run_time);
                emit(events, LocationEvent::TimedOut);
            }
        }
        Mode::FollowPosition => follow_position(provider, interval, events).await,
    }
}

async fn wait_for_start(provider: &dyn LocationProvider, init_wait: Duration) -> bool {
    let mut waited: Duration = Duration::ZERO;
    loop {
        match provider.status() {
            LocationStatus::Running => return true,
            LocationStatus::Initializing if waited < init_wait => {
                tokio::time::sleep(INIT_POLL_STEP).await;
                waited += INIT_POLL_STEP;
            }
            _ => return false,
        }
    }
}

async fn watch_target(
    provider: &dyn LocationProvider,
    interval: Duration,
    target: Location,
    events: &mpsc::UnboundedSender<LocationEvent>,
) {
    let mut ticker: tokio::time::Interval = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(position) = provider.last_known_position() else {
            continue;
        };
        emit(events, LocationEvent::Position(position));
        if is_target_reached(position, &target) {
            info!(
                "Target reached at {}, {}",
                position.latitude, position.longitude
            );
            emit(events, LocationEvent::TargetReached);
            return;
        }
    }
}

async fn follow_position(
    provider: &dyn LocationProvider,
    interval: Duration,
    events: &mpsc::UnboundedSender<LocationEvent>,
) {
    let mut ticker: tokio::time::Interval = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Some(position) = provider.last_known_position() {
            emit(events, LocationEvent::Position(position));
        }
    }
}
