//! Mock fleet around the user with timed geofence notifications.
//!
//! This is a demonstration, not proximity detection: on every trigger tick a
//! random vehicle that has not been notified yet is marked notified, whatever
//! its distance. Vehicles jitter around their base position on a separate
//! tick. Only the five most recent events are kept.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::distance::GeoPoint;

/// Geofence radius in degrees.
pub const GEOFENCE_RADIUS_DEGREES: f64 = 0.003;
/// Meters per degree used to display the radius.
pub const METERS_PER_DEGREE: f64 = 111_000.0;
/// Number of events kept in the log.
pub const EVENT_LOG_CAPACITY: usize = 5;
/// Maximum jitter applied to each coordinate, in degrees.
pub const JITTER_DEGREES: f64 = 0.00015;
/// Interval between notification triggers.
pub const TRIGGER_INTERVAL: Duration = Duration::from_secs(3);
/// Interval between position jitters.
pub const JITTER_INTERVAL: Duration = Duration::from_secs(2);

/// Vehicle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Emergency,
    Civilian,
}

impl VehicleKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Civilian => "Civilian",
        }
    }
}

/// One vehicle of the mock fleet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockVehicle {
    pub id: String,
    pub kind: VehicleKind,
    /// Anchor the jitter is applied around.
    pub base: GeoPoint,
    /// Current (jittered) position.
    pub position: GeoPoint,
    pub notified: bool,
}

impl MockVehicle {
    fn new(id: &str, kind: VehicleKind, base: GeoPoint) -> Self {
        Self {
            id: id.to_string(),
            kind,
            base,
            position: base,
            notified: false,
        }
    }
}

/// A logged notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeofenceEvent {
    pub vehicle_id: String,
    pub kind: VehicleKind,
    pub message: String,
    /// Distance from the user when notified, in whole meters.
    pub distance_m: u64,
    pub at: DateTime<Utc>,
}

/// The simulated geofence around `center`.
#[derive(Debug, Clone)]
pub struct GeofenceSimulator {
    center: GeoPoint,
    vehicles: Vec<MockVehicle>,
    events: VecDeque<GeofenceEvent>,
    rng: StdRng,
}

impl GeofenceSimulator {
    /// The standard eight-vehicle fleet around `center`, with OS randomness.
    pub fn new(center: GeoPoint) -> Self {
        Self::with_rng(center, StdRng::from_os_rng())
    }

    /// Same fleet with a deterministic seed.
    pub fn seeded(center: GeoPoint, seed: u64) -> Self {
        Self::with_rng(center, StdRng::seed_from_u64(seed))
    }

    fn with_rng(center: GeoPoint, rng: StdRng) -> Self {
        Self {
            center,
            vehicles: mock_fleet(center),
            events: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            rng,
        }
    }

    /// The geofence radius in meters.
    pub fn radius_meters() -> f64 {
        GEOFENCE_RADIUS_DEGREES * METERS_PER_DEGREE
    }

    /// The fleet.
    pub fn vehicles(&self) -> &[MockVehicle] {
        &self.vehicles
    }

    /// Most recent events, newest first.
    pub fn events(&self) -> impl Iterator<Item = &GeofenceEvent> {
        self.events.iter()
    }

    /// Whether every vehicle has been notified.
    pub fn all_notified(&self) -> bool {
        self.vehicles.iter().all(|v| v.notified)
    }

    /// Notify one random unnotified vehicle. `None` when none are left.
    pub fn trigger(&mut self) -> Option<GeofenceEvent> {
        let pending: Vec<usize> = self
            .vehicles
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.notified)
            .map(|(i, _)| i)
            .collect();
        if pending.is_empty() {
            return None;
        }

        let index = pending[self.rng.random_range(0..pending.len())];
        let center = self.center;
        let vehicle = &mut self.vehicles[index];
        vehicle.notified = true;

        let distance_m = vehicle.position.distance_to(&center).round() as u64;
        let messages = [
            format!("{} vehicle {} notified", vehicle.kind.label(), vehicle.id),
            format!("Alert sent to {} ({distance_m}m away)", vehicle.id),
            format!(
                "Geofence triggered: {} received emergency protocol",
                vehicle.id
            ),
            format!("Vehicle {} - Route clearance requested", vehicle.id),
        ];
        let message = messages[self.rng.random_range(0..messages.len())].clone();

        let event = GeofenceEvent {
            vehicle_id: vehicle.id.clone(),
            kind: vehicle.kind,
            message,
            distance_m,
            at: Utc::now(),
        };
        self.events.push_front(event.clone());
        self.events.truncate(EVENT_LOG_CAPACITY);
        Some(event)
    }

    /// Move every vehicle to a random point within the jitter box around its
    /// base, rounded to seven decimals.
    pub fn jitter(&mut self) {
        for vehicle in &mut self.vehicles {
            let d_lat = self.rng.random_range(-JITTER_DEGREES..JITTER_DEGREES);
            let d_lon = self.rng.random_range(-JITTER_DEGREES..JITTER_DEGREES);
            let moved = vehicle.base.offset(d_lat, d_lon);
            vehicle.position = GeoPoint::new(round7(moved.latitude), round7(moved.longitude));
        }
    }

    /// Run the trigger and jitter timers until `cancel` fires or every
    /// vehicle has been notified. Returns the final state.
    pub async fn run(
        mut self,
        cancel: CancellationToken,
        events: mpsc::Sender<GeofenceEvent>,
    ) -> Self {
        let mut trigger_tick = tokio::time::interval(TRIGGER_INTERVAL);
        let mut jitter_tick = tokio::time::interval(JITTER_INTERVAL);
        // Both intervals fire immediately; skip that so the first trigger
        // happens one period after start.
        trigger_tick.tick().await;
        jitter_tick.tick().await;

        info!(
            vehicles = self.vehicles.len(),
            radius_m = Self::radius_meters(),
            "Geofence simulation started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Geofence simulation cancelled");
                    break;
                }
                _ = trigger_tick.tick() => {
                    if let Some(event) = self.trigger() {
                        info!(vehicle = %event.vehicle_id, "{}", event.message);
                        let _ = events.send(event).await;
                    }
                    if self.all_notified() {
                        info!("All vehicles notified");
                        break;
                    }
                }
                _ = jitter_tick.tick() => self.jitter(),
            }
        }
        self
    }
}

fn round7(value: f64) -> f64 {
    (value * 1e7).round() / 1e7
}

/// Eight vehicles at fixed offsets from `center`.
pub fn mock_fleet(center: GeoPoint) -> Vec<MockVehicle> {
    use VehicleKind::{Civilian, Emergency};
    [
        ("EV001", Emergency, 0.0005, 0.0008),
        ("CV001", Civilian, 0.0012, 0.0015),
        ("CV002", Civilian, -0.0008, 0.001),
        ("CV003", Civilian, -0.001, -0.0012),
        ("CV004", Civilian, 0.002, -0.0005),
        ("EV002", Emergency, -0.0015, 0.002),
        ("CV005", Civilian, 0.0008, -0.002),
        ("EV003", Emergency, -0.0005, -0.0008),
    ]
    .into_iter()
    .map(|(id, kind, d_lat, d_lon)| MockVehicle::new(id, kind, center.offset(d_lat, d_lon)))
    .collect()
}
