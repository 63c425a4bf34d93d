//! # Record Cards
//!
//! Plain-text renderings of records. The menu prints them when listing, and
//! the store hands the `New*` cards to the confirm hook before inserting.
//!
//! ```text
//! [SERVICE ID#1]
//! SERVICE AT 57 apple ln, hicksville, NY 11801 [PROPERTY ID#1] ON 2024-08-05
//! MOW..........YES |   LEAF BLOW....NO  |   SEED...........NO
//! FERTILIZER...YES |   MULCH........NO  |   TREE REMOVAL...YES
//! TREE TRIM....NO  |   POWER WASH...NO  |   SNOW PLOW......NO
//! NOTES: dead tree on property, ask client for removal
//! COST......................$400.00
//! ```

use std::fmt;

use crate::types::{
    CityRecord, ClientRecord, NewCity, NewClient, NewProperty, NewService, PropertyRecord,
    ServiceRecord, ServiceTasks,
};
use crate::validation::format_phone;

/// Leader widths per grid column, so the YES/NO words line up.
const LEADER_WIDTHS: [usize; 3] = [13, 13, 15];

impl fmt::Display for ServiceTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.flags();
        for row in 0..3 {
            let cells: Vec<String> = (0..3)
                .map(|col| {
                    let i = row * 3 + col;
                    let word = if flags[i] { "YES" } else { "NO " };
                    format!(
                        "{:.<width$}{}",
                        ServiceTasks::LABELS[i],
                        word,
                        width = LEADER_WIDTHS[col]
                    )
                })
                .collect();
            writeln!(f, "{}", cells.join(" |   ").trim_end())?;
        }
        Ok(())
    }
}

fn notes_line(notes: Option<&str>) -> &str {
    notes.unwrap_or("none")
}

// =============================================================================
// List Cards
// =============================================================================

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[CLIENT ID#{}]", self.id)?;
        writeln!(f, "NAME: {} {}", self.first_name, self.last_name)?;
        writeln!(f, "PHONE: {}", format_phone(&self.phone))?;
        write!(f, "EMAIL: {}", self.email)
    }
}

impl fmt::Display for CityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[CITY ID#{}]", self.id)?;
        write!(
            f,
            "CITY: {} | STATE: {} [STATE ID#{}] | ZIP: {}",
            self.name, self.state_name, self.state_id, self.zip
        )
    }
}

impl fmt::Display for PropertyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[PROPERTY ID#{}]", self.id)?;
        writeln!(
            f,
            "ADDRESS: {} | CITY: {} {} [CITY ID#{}] | STATE: {}",
            self.address, self.city_name, self.zip, self.city_id, self.state_abbreviation
        )?;
        write!(
            f,
            "OWNER: {} {} [OWNER ID#{}]",
            self.first_name, self.last_name, self.client_id
        )
    }
}

impl fmt::Display for ServiceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[SERVICE ID#{}]", self.id)?;
        match (self.property_id, &self.address) {
            (Some(property_id), Some(address)) => writeln!(
                f,
                "SERVICE AT {}, {}, {} {} [PROPERTY ID#{}] ON {}",
                address,
                self.city_name.as_deref().unwrap_or(""),
                self.state_abbreviation.as_deref().unwrap_or(""),
                self.zip.as_deref().unwrap_or(""),
                property_id,
                self.service_date
            )?,
            _ => writeln!(f, "SERVICE AT REMOVED PROPERTY ON {}", self.service_date)?,
        }
        write!(f, "{}", self.tasks)?;
        writeln!(f, "NOTES: {}", notes_line(self.notes.as_deref()))?;
        write!(f, "COST......................${}", self.cost)
    }
}

// =============================================================================
// Confirm Cards
// =============================================================================

impl fmt::Display for NewClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[CLIENT '{} {}']", self.first_name, self.last_name)?;
        writeln!(f, "PHONE: {}", format_phone(&self.phone))?;
        write!(f, "EMAIL: {}", self.email)
    }
}

impl fmt::Display for NewCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[CITY '{}']", self.name)?;
        writeln!(f, "ZIP {}", self.zip)?;
        write!(f, "STATE ID#{}", self.state_id)
    }
}

impl fmt::Display for NewProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[PROPERTY AT {}]", self.address)?;
        writeln!(f, "OWNED BY CLIENT ID #{}", self.client_id)?;
        write!(f, "ADDRESS IS IN CITY #{}", self.city_id)
    }
}

impl fmt::Display for NewService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[SERVICE AT PROPERTY ID#{} ON {}]",
            self.property_id, self.date
        )?;
        write!(f, "{}", self.tasks)?;
        writeln!(f, "NOTES: {}", notes_line(self.notes.as_deref()))?;
        write!(f, "COST......................${}", self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Cost;
    use chrono::NaiveDate;

    #[test]
    fn test_client_card_formats_phone() {
        let client = ClientRecord {
            id: 1,
            first_name: "luis".into(),
            last_name: "jaco".into(),
            phone: "1234567890".into(),
            email: "luisjaco@fake.com".into(),
        };
        let card = client.to_string();
        assert!(card.starts_with("[CLIENT ID#1]"));
        assert!(card.contains("PHONE: (123) 456-7890"));
    }

    #[test]
    fn test_task_grid() {
        let tasks = ServiceTasks::from_flags([
            true, false, false, true, false, true, false, false, false,
        ]);
        let grid = tasks.to_string();
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("MOW..........YES |"));
        assert!(lines[1].ends_with("TREE REMOVAL...YES"));
        assert!(lines[2].ends_with("SNOW PLOW......NO"));
        assert_eq!(lines[1], "FERTILIZER...YES |   MULCH........NO  |   TREE REMOVAL...YES");
    }

    #[test]
    fn test_service_card_cost_and_orphan() {
        let record = ServiceRecord {
            id: 2,
            property_id: None,
            address: None,
            city_name: None,
            zip: None,
            state_abbreviation: None,
            service_date: NaiveDate::from_ymd_opt(2024, 8, 13).unwrap(),
            cost: Cost::from_cents(9_000).unwrap(),
            tasks: ServiceTasks::default(),
            notes: None,
        };
        let card = record.to_string();
        assert!(card.contains("SERVICE AT REMOVED PROPERTY ON 2024-08-13"));
        assert!(card.contains("NOTES: none"));
        assert!(card.ends_with("$90.00"));
    }

    #[test]
    fn test_new_service_card() {
        let service = NewService::new(
            1,
            NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
            ServiceTasks::default(),
            Cost::from_cents(40_000).unwrap(),
            "dead tree",
        );
        let card = service.to_string();
        assert!(card.starts_with("[SERVICE AT PROPERTY ID#1 ON 2024-08-05]"));
        assert!(card.contains("NOTES: dead tree"));
        assert!(card.ends_with("$400.00"));
    }
}
