//! Station subcommands.

use std::io::{self, Write};

use evcharge_client::EvChargeApp;
use evcharge_core::models::Station;

use crate::fmt::{station_line, write_station_detail};

#[derive(clap::Subcommand, Debug)]
pub enum StationAction {
    /// Stations around a position.
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        radius_km: Option<f64>,
    },
    Show {
        id: String,
    },
}

pub async fn run(action: StationAction, app: &EvChargeApp) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        StationAction::Nearby {
            lat,
            lng,
            radius_km,
        } => {
            let resp = app
                .api()
                .nearby_stations(lat, lng, radius_km)
                .await
                .into_result()?;
            let stations: Vec<Station> = resp.decode()?;
            if stations.is_empty() {
                writeln!(out, "No stations nearby")?;
            }
            for station in &stations {
                writeln!(out, "{}", station_line(station))?;
            }
        }
        StationAction::Show { id } => {
            let resp = app.api().station(&id).await.into_result()?;
            let station: Station = resp.decode()?;
            write_station_detail(&mut out, &station)?;
        }
    }
    Ok(())
}
