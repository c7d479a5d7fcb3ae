//! Grouping schedules by country, then origin port.
//!
//! Grouping is stable: group order is country name, then origin name
//! (case-insensitive), and rows inside a group keep their original
//! relative order. Re-running on the same input yields the same output.

use freightdeck_core::domain::Schedule;

/// All schedules departing one origin port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortGroup {
    pub country: String,
    pub origin: String,
    pub rows: Vec<Schedule>,
}

impl PortGroup {
    /// File-name stem for single-port exports, e.g. `germany_hamburg`.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            sanitize(&self.country),
            sanitize(&self.origin)
        )
    }
}

/// Group by (country, origin), sorted by country name then origin name.
pub fn group_by_port(rows: &[Schedule]) -> Vec<PortGroup> {
    let mut groups: Vec<PortGroup> = Vec::new();
    for row in rows {
        match groups
            .iter_mut()
            .find(|g| g.country == row.country_name && g.origin == row.origin_name)
        {
            Some(group) => group.rows.push(row.clone()),
            None => groups.push(PortGroup {
                country: row.country_name.clone(),
                origin: row.origin_name.clone(),
                rows: vec![row.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| {
        (a.country.to_lowercase(), a.origin.to_lowercase())
            .cmp(&(b.country.to_lowercase(), b.origin.to_lowercase()))
    });
    groups
}

/// Lowercase and replace anything awkward in a file name with underscores.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use freightdeck_core::domain::Schedule;

    fn row(id: &str, country: &str, origin: &str) -> Schedule {
        let d = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        Schedule {
            id: id.into(),
            vessel_id: "v1".into(),
            vessel_name: "MAERSK ONE".into(),
            voyage: "012E".into(),
            port_id: "p1".into(),
            origin_name: origin.into(),
            transit_name: "Dubai".into(),
            country_name: country.into(),
            cfs_closing: d,
            fcl_closing: d,
            etd: d,
            eta_transit: d,
            destination: "Europe".into(),
            destination_eta: d,
            transit_days: 20,
        }
    }

    #[test]
    fn groups_sorted_by_country_then_origin() {
        let rows = vec![
            row("a", "Netherlands", "Rotterdam"),
            row("b", "Germany", "Hamburg"),
            row("c", "Germany", "Bremerhaven"),
        ];
        let groups = group_by_port(&rows);
        let keys: Vec<(&str, &str)> = groups
            .iter()
            .map(|g| (g.country.as_str(), g.origin.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Germany", "Bremerhaven"),
                ("Germany", "Hamburg"),
                ("Netherlands", "Rotterdam"),
            ]
        );
    }

    #[test]
    fn rows_keep_original_relative_order_within_group() {
        let rows = vec![
            row("first", "Germany", "Hamburg"),
            row("other", "Netherlands", "Rotterdam"),
            row("second", "Germany", "Hamburg"),
            row("third", "Germany", "Hamburg"),
        ];
        let groups = group_by_port(&rows);
        let hamburg = groups
            .iter()
            .find(|g| g.origin == "Hamburg")
            .expect("hamburg group");
        let ids: Vec<&str> = hamburg.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn regrouping_is_deterministic() {
        let rows = vec![
            row("a", "Netherlands", "Rotterdam"),
            row("b", "Germany", "Hamburg"),
            row("c", "Belgium", "Antwerp"),
            row("d", "Germany", "Hamburg"),
        ];
        assert_eq!(group_by_port(&rows), group_by_port(&rows));
    }

    #[test]
    fn sort_is_case_insensitive() {
        let rows = vec![row("a", "germany", "hamburg"), row("b", "Belgium", "Antwerp")];
        let groups = group_by_port(&rows);
        assert_eq!(groups[0].country, "Belgium");
        assert_eq!(groups[1].country, "germany");
    }

    #[test]
    fn file_stem_is_filesystem_safe() {
        let g = PortGroup {
            country: "Côte d'Ivoire".into(),
            origin: "San-Pédro".into(),
            rows: vec![],
        };
        let stem = g.file_stem();
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }
}
