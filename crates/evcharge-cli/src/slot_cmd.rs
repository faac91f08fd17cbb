//! Slot subcommands.

use std::io::{self, Write};

use evcharge_client::EvChargeApp;
use evcharge_core::models::{Slot, SlotStatus};

use crate::fmt::slot_line;

#[derive(clap::Subcommand, Debug)]
pub enum SlotAction {
    /// List the slots of a station.
    List { station: String },
    /// Operator: change a slot's status.
    SetStatus {
        slot: String,
        /// Available, Booked, Charging, Maintenance or OutOfOrder.
        status: SlotStatus,
    },
}

pub async fn run(action: SlotAction, app: &EvChargeApp) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        SlotAction::List { station } => {
            let resp = app.api().station_slots(&station).await.into_result()?;
            let slots: Vec<Slot> = resp.decode()?;
            if slots.is_empty() {
                writeln!(out, "No slots")?;
            }
            for slot in &slots {
                writeln!(out, "{}", slot_line(slot))?;
            }
        }
        SlotAction::SetStatus { slot, status } => {
            app.api()
                .update_slot_status(&slot, status)
                .await
                .into_result()?;
            writeln!(out, "Slot {slot} set to {status}")?;
        }
    }
    Ok(())
}
