//! `EVCharge` CLI Library
//!
//! Subcommands for the `evcharge` binary. Each `*_cmd` module owns one
//! command group and talks to the backend through an
//! [`evcharge_client::EvChargeApp`].

pub mod auth_cmd;
pub mod booking_cmd;
pub mod fmt;
pub mod notification_cmd;
pub mod overrides;
pub mod slot_cmd;
pub mod station_cmd;
