//! The approach animation as a cancellable task.
//!
//! A vehicle moves along a [`RoutePath`] by a fixed progress step per frame.
//! Each frame reports the vehicle position and what the user would see.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::approach::{ApproachTracker, ApproachUpdate};
use crate::distance::GeoPoint;
use crate::route::RoutePath;

/// Progress advanced per frame, in route segments.
pub const DEFAULT_STEP: f64 = 0.005;

/// Where the demo vehicle starts, behind the user.
pub const DEMO_VEHICLE_START: GeoPoint = GeoPoint::from_lng_lat([77.205, 28.600]);

/// The demo user location.
pub const DEMO_USER_LOCATION: GeoPoint = GeoPoint::new(28.6139, 77.209);

/// One animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApproachFrame {
    /// Frame number, starting at 0.
    pub frame: u64,
    /// Vehicle position.
    pub position: GeoPoint,
    /// The user's view for this frame.
    pub update: ApproachUpdate,
}

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// The vehicle reached the end of the route.
    Completed { frames: u64 },
    /// The cancellation token fired first.
    Cancelled { frames: u64 },
}

/// A vehicle approaching a fixed user location.
#[derive(Debug, Clone)]
pub struct ApproachSimulation {
    route: RoutePath,
    user: GeoPoint,
    step: f64,
    frame: u64,
    tracker: ApproachTracker,
}

impl ApproachSimulation {
    /// Simulate `route` towards `user` with the default step.
    pub fn new(route: RoutePath, user: GeoPoint) -> Self {
        Self {
            route,
            user,
            step: DEFAULT_STEP,
            frame: 0,
            tracker: ApproachTracker::new(),
        }
    }

    /// The demo scenario: a straight route from behind the user to the user.
    pub fn demo(segments: usize) -> Self {
        Self::new(
            RoutePath::straight(DEMO_VEHICLE_START, DEMO_USER_LOCATION, segments),
            DEMO_USER_LOCATION,
        )
    }

    /// Override the per-frame progress step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = if step > 0.0 { step } else { DEFAULT_STEP };
        self
    }

    /// Access the tracker, e.g. to dismiss the banner or mute sound.
    pub fn tracker_mut(&mut self) -> &mut ApproachTracker {
        &mut self.tracker
    }

    /// Advance one frame. `None` once the route is finished.
    pub fn next_frame(&mut self) -> Option<ApproachFrame> {
        let progress = self.frame as f64 * self.step;
        let position = self.route.position_at(progress)?;
        let update = self.tracker.observe(position.distance_to(&self.user));
        let frame = ApproachFrame {
            frame: self.frame,
            position,
            update,
        };
        self.frame += 1;
        Some(frame)
    }

    /// Run until the route ends or `cancel` fires, emitting one frame per
    /// `frame_interval`. Frames are dropped if the receiver is gone.
    pub async fn run(
        mut self,
        frame_interval: Duration,
        cancel: CancellationToken,
        frames: mpsc::Sender<ApproachFrame>,
    ) -> SimulationOutcome {
        let mut ticker = tokio::time::interval(frame_interval);
        info!(
            route_points = self.route.points().len(),
            step = self.step,
            "Approach simulation started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(frames = self.frame, "Approach simulation cancelled");
                    return SimulationOutcome::Cancelled { frames: self.frame };
                }
                _ = ticker.tick() => {
                    let Some(frame) = self.next_frame() else {
                        info!(frames = self.frame, "Emergency vehicle has passed safely");
                        return SimulationOutcome::Completed { frames: self.frame };
                    };
                    if let Some(tier) = frame.update.notification {
                        debug!(distance_m = frame.update.distance_m, tier = ?tier, "Proximity notification");
                    }
                    let _ = frames.send(frame).await;
                }
            }
        }
    }

    /// Spawn [`Self::run`] on the runtime.
    pub fn spawn(
        self,
        frame_interval: Duration,
        cancel: CancellationToken,
    ) -> (JoinHandle<SimulationOutcome>, mpsc::Receiver<ApproachFrame>) {
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(self.run(frame_interval, cancel, tx));
        (handle, rx)
    }
}
