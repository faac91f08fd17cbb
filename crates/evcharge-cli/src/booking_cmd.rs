//! Booking subcommands.

use std::io::{self, Write};

use anyhow::Context;

use evcharge_client::EvChargeApp;
use evcharge_core::models::{BookingItem, BookingRequest};

use crate::fmt::{booking_line, write_booking_detail};

#[derive(clap::Subcommand, Debug)]
pub enum BookingAction {
    /// Show one booking.
    Show {
        id: String,
        /// Skip the cache and fetch from the server.
        #[arg(long)]
        refresh: bool,
    },
    /// List the logged-in owner's bookings.
    Mine {
        /// Show what is cached without contacting the server.
        #[arg(long)]
        offline: bool,
    },
    /// Upcoming bookings at a station (defaults to the operator's station).
    Upcoming {
        #[arg(long)]
        station: Option<String>,
    },
    /// Reserve a slot.
    Create {
        #[arg(long)]
        station: String,
        #[arg(long)]
        slot: String,
        /// ISO-8601 start time.
        #[arg(long)]
        start: String,
        /// ISO-8601 end time.
        #[arg(long)]
        end: String,
    },
    Cancel {
        id: String,
    },
    /// Operator: start charging for a booking.
    Start {
        id: String,
    },
    /// Operator: complete a charging session.
    Finalize {
        id: String,
    },
}

pub async fn run(action: BookingAction, app: &EvChargeApp) -> anyhow::Result<()> {
    let service = app.bookings();
    let mut out = io::stdout();
    match action {
        BookingAction::Show { id, refresh } => {
            let booking = service.booking(&id, refresh).await?;
            write_booking_detail(&mut out, &booking)?;
        }
        BookingAction::Mine { offline } => {
            let owner = current_user_id(app).await?;
            let bookings = if offline {
                service.cached_owner_bookings(&owner).await
            } else {
                service.owner_bookings(&owner).await?
            };
            write_list(&mut out, &bookings)?;
        }
        BookingAction::Upcoming { station } => {
            let station = match station {
                Some(s) => s,
                None => app
                    .auth()
                    .current_operator()
                    .await
                    .map(|op| op.station_id)
                    .context("No station assigned. Use --station <id>")?,
            };
            let bookings = service.upcoming_for_station(&station).await?;
            write_list(&mut out, &bookings)?;
        }
        BookingAction::Create {
            station,
            slot,
            start,
            end,
        } => {
            let request = BookingRequest {
                station_id: station,
                slot_id: slot,
                owner_id: current_user_id(app).await?,
                start_time: start,
                end_time: end,
            };
            let booking = service.create(&request).await?;
            writeln!(out, "Booking created")?;
            write_booking_detail(&mut out, &booking)?;
        }
        BookingAction::Cancel { id } => {
            let updated = service.cancel(&id).await?;
            report_transition(&mut out, &id, "cancelled", updated.as_ref())?;
        }
        BookingAction::Start { id } => {
            let updated = service.start_charging(&id).await?;
            report_transition(&mut out, &id, "charging", updated.as_ref())?;
        }
        BookingAction::Finalize { id } => {
            let updated = service.finalize(&id).await?;
            report_transition(&mut out, &id, "finalized", updated.as_ref())?;
        }
    }
    Ok(())
}

async fn current_user_id(app: &EvChargeApp) -> anyhow::Result<String> {
    app.auth()
        .current_user()
        .await
        .map(|u| u.user_id)
        .context("Not logged in. Run `evcharge auth login` first")
}

fn write_list(out: &mut impl Write, bookings: &[BookingItem]) -> io::Result<()> {
    if bookings.is_empty() {
        return writeln!(out, "No bookings");
    }
    for b in bookings {
        writeln!(out, "{}", booking_line(b))?;
    }
    Ok(())
}

fn report_transition(
    out: &mut impl Write,
    id: &str,
    verb: &str,
    updated: Option<&BookingItem>,
) -> io::Result<()> {
    match updated {
        Some(b) => writeln!(out, "Booking {id} is now {}", b.status),
        None => writeln!(out, "Booking {id} {verb}"),
    }
}
