use chrono::{Duration, Local};

/// Available appointment slots: every half hour from 9:00 AM to 5:00 PM.
pub fn time_slots() -> Vec<String> {
    let mut slots = Vec::new();
    for hour in 9..=17u32 {
        let hour_formatted = if hour % 12 == 0 { 12 } else { hour % 12 };
        let period = if hour < 12 { "AM" } else { "PM" };

        slots.push(format!("{}:00 {}", hour_formatted, period));
        if hour != 17 {
            slots.push(format!("{}:30 {}", hour_formatted, period));
        }
    }
    slots
}

/// Parses the hour out of a slot label ("2:00 PM") or 24h input ("14:30").
pub fn slot_hour(time: &str) -> Option<u32> {
    let time = time.trim();
    let (clock, period) = match time.split_once(' ') {
        Some((clock, period)) => (clock, Some(period.trim())),
        None => (time, None),
    };

    let hour: u32 = clock.split(':').next()?.parse().ok()?;
    let minute: u32 = match clock.split(':').nth(1) {
        Some(m) => m.parse().ok()?,
        None => return None,
    };
    if minute > 59 {
        return None;
    }

    match period {
        Some(p) if p.eq_ignore_ascii_case("PM") => {
            if hour == 0 || hour > 12 {
                None
            } else if hour == 12 {
                Some(12)
            } else {
                Some(hour + 12)
            }
        }
        Some(p) if p.eq_ignore_ascii_case("AM") => {
            if hour == 0 || hour > 12 {
                None
            } else if hour == 12 {
                Some(0)
            } else {
                Some(hour)
            }
        }
        Some(_) => None,
        None => {
            if hour > 23 {
                None
            } else {
                Some(hour)
            }
        }
    }
}

pub fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn tomorrow_iso() -> String {
    (Local::now().date_naive() + Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_grid_runs_nine_to_five() {
        let slots = time_slots();
        assert_eq!(slots.first().unwrap(), "9:00 AM");
        assert_eq!(slots.last().unwrap(), "5:00 PM");
        // Half-hour grid without a 5:30 PM slot.
        assert_eq!(slots.len(), 17);
        assert!(!slots.contains(&"5:30 PM".to_string()));
        assert!(slots.contains(&"12:30 PM".to_string()));
    }

    #[test]
    fn slot_hour_parses_both_formats() {
        assert_eq!(slot_hour("9:00 AM"), Some(9));
        assert_eq!(slot_hour("12:00 PM"), Some(12));
        assert_eq!(slot_hour("12:30 AM"), Some(0));
        assert_eq!(slot_hour("2:00 PM"), Some(14));
        assert_eq!(slot_hour("14:30"), Some(14));
        assert_eq!(slot_hour("garbage"), None);
        assert_eq!(slot_hour("25:00"), None);
        assert_eq!(slot_hour("13:00 PM"), None);
    }
}
