//! Terminal front end for the proximity simulations.

use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use resqroute_core::error::AppError;
use resqroute_geo::simulation::DEMO_USER_LOCATION;
use resqroute_geo::{
    ApproachFrame, ApproachSimulation, GeoPoint, GeofenceSimulator, MockVehicle,
    SimulationOutcome, haversine_meters,
};

use crate::output::{self, OutputFormat};

/// Arguments for the simulate command
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Simulation to run
    #[command(subcommand)]
    pub command: SimulateCommand,
}

/// Simulation subcommands
#[derive(Debug, Subcommand)]
pub enum SimulateCommand {
    /// Great-circle distance between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
    /// An emergency vehicle driving towards the user
    Approach {
        /// Straight-line segments in the demo route
        #[arg(long, default_value_t = 1)]
        segments: usize,
        /// Route progress per frame
        #[arg(long, default_value_t = resqroute_geo::simulation::DEFAULT_STEP)]
        step: f64,
        /// Milliseconds between frames
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },
    /// A mock fleet inside a geofence being notified one by one
    Geofence {
        /// Geofence center latitude
        #[arg(long, allow_negative_numbers = true, default_value_t = DEMO_USER_LOCATION.latitude)]
        latitude: f64,
        /// Geofence center longitude
        #[arg(long, allow_negative_numbers = true, default_value_t = DEMO_USER_LOCATION.longitude)]
        longitude: f64,
        /// Fixed RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Fleet display row
#[derive(Debug, Serialize, Tabled)]
struct VehicleRow {
    id: String,
    kind: String,
    latitude: String,
    longitude: String,
    distance_m: u64,
    notified: bool,
}

impl VehicleRow {
    fn new(vehicle: &MockVehicle, center: GeoPoint) -> Self {
        Self {
            id: vehicle.id.clone(),
            kind: format!("{:?}", vehicle.kind),
            latitude: format!("{:.6}", vehicle.position.latitude),
            longitude: format!("{:.6}", vehicle.position.longitude),
            distance_m: vehicle.position.distance_to(&center).round() as u64,
            notified: vehicle.notified,
        }
    }
}

/// Execute simulation commands
pub async fn execute(args: &SimulateArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        SimulateCommand::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let meters = haversine_meters(*lat1, *lon1, *lat2, *lon2);
            match format {
                OutputFormat::Json => output::print_json_line(&serde_json::json!({
                    "meters": meters,
                    "kilometers": meters / 1000.0,
                })),
                OutputFormat::Table => {
                    output::print_kv("Distance (m)", &format!("{:.1}", meters));
                    output::print_kv("Distance (km)", &format!("{:.3}", meters / 1000.0));
                }
            }
        }
        SimulateCommand::Approach {
            segments,
            step,
            interval_ms,
        } => {
            let cancel = cancel_on_ctrl_c();
            let simulation = ApproachSimulation::demo(*segments).with_step(*step);
            let (handle, mut frames) =
                simulation.spawn(Duration::from_millis(*interval_ms), cancel);

            while let Some(frame) = frames.recv().await {
                print_frame(&frame, format);
            }

            let outcome = handle
                .await
                .map_err(|e| AppError::internal(format!("Simulation task failed: {}", e)))?;
            match outcome {
                SimulationOutcome::Completed { frames } => output::print_success(&format!(
                    "Emergency vehicle has passed safely ({} frames)",
                    frames
                )),
                SimulationOutcome::Cancelled { frames } => {
                    output::print_warning(&format!("Cancelled after {} frames", frames))
                }
            }
        }
        SimulateCommand::Geofence {
            latitude,
            longitude,
            seed,
        } => {
            let center = GeoPoint::new(*latitude, *longitude);
            let simulator = match seed {
                Some(seed) => GeofenceSimulator::seeded(center, *seed),
                None => GeofenceSimulator::new(center),
            };
            output::print_kv(
                "Geofence radius (m)",
                &format!("{:.0}", GeofenceSimulator::radius_meters()),
            );

            let cancel = cancel_on_ctrl_c();
            let (tx, mut events) = mpsc::channel(16);
            let handle = tokio::spawn(simulator.run(cancel, tx));

            while let Some(event) = events.recv().await {
                match format {
                    OutputFormat::Json => output::print_json_line(&event),
                    OutputFormat::Table => println!(
                        "[{}] {} ({} m)",
                        event.at.format("%H:%M:%S"),
                        event.message,
                        event.distance_m
                    ),
                }
            }

            let finished = handle
                .await
                .map_err(|e| AppError::internal(format!("Simulation task failed: {}", e)))?;
            let rows: Vec<VehicleRow> = finished
                .vehicles()
                .iter()
                .map(|v| VehicleRow::new(v, center))
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn print_frame(frame: &ApproachFrame, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json_line(frame),
        OutputFormat::Table => {
            let banner = frame
                .update
                .notification
                .map(|tier| format!("  {}", tier.message()))
                .unwrap_or_default();
            println!(
                "#{:<4} {:>6} m  {:?}{}",
                frame.frame, frame.update.distance_m, frame.update.direction, banner
            );
        }
    }
}

/// A token cancelled by the first Ctrl+C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}
