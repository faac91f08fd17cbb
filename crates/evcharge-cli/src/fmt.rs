//! Output formatting helpers.

use std::io::{self, Write};

use evcharge_core::models::{BookingItem, Notification, Operator, Slot, Station, User};

pub fn write_user_detail(w: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(w, "  Name:     {}", user.full_name)?;
    writeln!(w, "  Email:    {}", user.email)?;
    writeln!(w, "  ID:       {}", user.user_id)?;
    writeln!(w, "  Role:     {}", user.role)?;
    if !user.is_active {
        writeln!(w, "  Active:   no")?;
    }
    Ok(())
}

pub fn write_operator_detail(w: &mut impl Write, op: &Operator) -> io::Result<()> {
    match &op.station_name {
        Some(name) => writeln!(w, "  Station:  {name} ({})", op.station_id)?,
        None => writeln!(w, "  Station:  {}", op.station_id)?,
    }
    if let Some(location) = &op.station_location {
        writeln!(w, "  Location: {location}")?;
    }
    Ok(())
}

pub fn write_booking_detail(w: &mut impl Write, b: &BookingItem) -> io::Result<()> {
    writeln!(w, "  Booking:  {}", b.booking_id)?;
    writeln!(w, "  Status:   {}", b.status)?;
    match &b.station_name {
        Some(name) => writeln!(w, "  Station:  {name} ({})", b.station_id)?,
        None => writeln!(w, "  Station:  {}", b.station_id)?,
    }
    match b.slot_number {
        Some(n) => writeln!(w, "  Slot:     #{n} ({})", b.slot_id)?,
        None => writeln!(w, "  Slot:     {}", b.slot_id)?,
    }
    writeln!(w, "  Owner:    {}", b.owner_id)?;
    writeln!(w, "  From:     {}", b.start_time)?;
    writeln!(w, "  To:       {}", b.end_time)?;
    if let Some(qr) = &b.qr {
        writeln!(w, "  QR:       {}", qr.code)?;
        if let Some(expires) = &qr.expires_at {
            writeln!(w, "  QR until: {expires}")?;
        }
    }
    Ok(())
}

/// One line per booking: id, status, window, station.
pub fn booking_line(b: &BookingItem) -> String {
    format!(
        "{:<12} {:<10} {} -> {}  {}",
        b.booking_id,
        b.status.as_str(),
        b.start_time,
        b.end_time,
        b.station_name.as_deref().unwrap_or(&b.station_id)
    )
}

pub fn slot_line(s: &Slot) -> String {
    format!(
        "#{:<3} {:<12} {:<12} {}",
        s.number,
        s.slot_id,
        s.status.as_str(),
        s.connector_type.as_deref().unwrap_or("-")
    )
}

pub fn station_line(s: &Station) -> String {
    let distance = s
        .distance_km
        .map_or_else(|| "-".to_string(), |d| format!("{d:.1} km"));
    let free = match (s.available_slots, s.total_slots) {
        (Some(a), Some(t)) => format!("{a}/{t} free"),
        (Some(a), None) => format!("{a} free"),
        _ => String::new(),
    };
    format!("{:<12} {:<9} {}  {}", s.station_id, distance, s.name, free)
        .trim_end()
        .to_string()
}

pub fn write_station_detail(w: &mut impl Write, s: &Station) -> io::Result<()> {
    writeln!(w, "  Station:  {} ({})", s.name, s.station_id)?;
    if let Some(address) = &s.location.address {
        writeln!(w, "  Address:  {address}")?;
    }
    writeln!(
        w,
        "  Position: {:.5}, {:.5}",
        s.location.latitude, s.location.longitude
    )?;
    if let Some(kind) = &s.charger_type {
        writeln!(w, "  Charger:  {kind}")?;
    }
    if let (Some(a), Some(t)) = (s.available_slots, s.total_slots) {
        writeln!(w, "  Slots:    {a}/{t} free")?;
    }
    Ok(())
}

pub fn notification_line(n: &Notification) -> String {
    let marker = if n.is_read { ' ' } else { '*' };
    if n.title.is_empty() {
        format!("{marker} {:<12} {}", n.id, n.message)
    } else {
        format!("{marker} {:<12} {}: {}", n.id, n.title, n.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use evcharge_core::models::{BookingStatus, SlotStatus, StationLocation};

    use super::*;

    fn booking() -> BookingItem {
        BookingItem {
            booking_id: "b1".into(),
            station_id: "st-1".into(),
            station_name: Some("Colombo 03".into()),
            slot_id: "sl-1".into(),
            slot_number: Some(2),
            owner_id: "199012345678".into(),
            status: BookingStatus::Approved,
            start_time: "09:00".into(),
            end_time: "10:00".into(),
            qr: None,
            created_at: None,
        }
    }

    #[test]
    fn booking_line_prefers_station_name() {
        let line = booking_line(&booking());
        assert!(line.starts_with("b1"));
        assert!(line.contains("Approved"));
        assert!(line.ends_with("Colombo 03"));

        let mut b = booking();
        b.station_name = None;
        assert!(booking_line(&b).ends_with("st-1"));
    }

    #[test]
    fn booking_detail_lists_slot_number() {
        let mut out = Vec::new();
        write_booking_detail(&mut out, &booking()).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Slot:     #2 (sl-1)"));
        assert!(!text.contains("QR"));
    }

    #[test]
    fn station_line_shows_distance_and_free_slots() {
        let station = Station {
            station_id: "st-1".into(),
            name: "Colombo 03".into(),
            location: StationLocation {
                address: None,
                latitude: 6.9,
                longitude: 79.85,
            },
            charger_type: None,
            total_slots: Some(4),
            available_slots: Some(1),
            distance_km: Some(2.345),
        };
        let line = station_line(&station);
        assert!(line.contains("2.3 km"));
        assert!(line.ends_with("1/4 free"));
    }

    #[test]
    fn slot_line_falls_back_for_missing_connector() {
        let slot = Slot {
            slot_id: "sl-1".into(),
            station_id: "st-1".into(),
            number: 1,
            connector_type: None,
            status: SlotStatus::OutOfOrder,
        };
        assert!(slot_line(&slot).contains("OutOfOrder"));
        assert!(slot_line(&slot).ends_with('-'));
    }

    #[test]
    fn unread_notifications_are_marked() {
        let mut n = Notification {
            id: "n1".into(),
            title: String::new(),
            message: "Booking approved".into(),
            kind: None,
            booking_id: None,
            created_at: None,
            is_read: false,
        };
        assert!(notification_line(&n).starts_with('*'));
        n.is_read = true;
        assert!(notification_line(&n).starts_with(' '));
    }
}
