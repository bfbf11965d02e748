//! Built-in simulated request tables

use super::RequestRecord;
use serde::{Deserialize, Serialize};

/// The two hardcoded six-row tables.
///
/// Both share IPs, timestamps, user agents, honeypot flags and ground truth;
/// they differ only in the query-field counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableVariant {
    /// Query-field counts `[1, 2, 4, 1, 3, 1]`
    Scatter,
    /// Query-field counts `[1, 2, 14, 3, 4, 0]`
    BoxPlot,
}

const IPS: [&str; 6] = [
    "192.168.0.1",
    "192.168.0.2",
    "192.168.0.3",
    "192.168.0.4",
    "192.168.0.5",
    "192.168.5.7",
];
const TIMESTAMPS: [i64; 6] = [1, 2, 3000, 4, 1000, 3];
const USER_AGENTS: [i64; 6] = [1, 1, 1, 2, 2, 1];
const HONEYPOT: [i64; 6] = [0, 1, 0, 0, 1, 0];
const TRUE_LABELS: [i64; 6] = [0, 0, 1, 0, 1, 0];

impl TableVariant {
    pub fn query_fields(&self) -> [i64; 6] {
        match self {
            TableVariant::Scatter => [1, 2, 4, 1, 3, 1],
            TableVariant::BoxPlot => [1, 2, 14, 3, 4, 0],
        }
    }

    /// Labelled records for this variant
    pub fn records(&self) -> Vec<RequestRecord> {
        let query_fields = self.query_fields();
        (0..IPS.len())
            .map(|i| {
                RequestRecord::new(
                    IPS[i],
                    TIMESTAMPS[i],
                    USER_AGENTS[i],
                    query_fields[i],
                    HONEYPOT[i],
                )
                .with_true_label(TRUE_LABELS[i])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_differ_only_in_query_field() {
        let a = TableVariant::Scatter.records();
        let b = TableVariant::BoxPlot.records();

        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra.ip_address, rb.ip_address);
            assert_eq!(ra.timestamp, rb.timestamp);
            assert_eq!(ra.true_label, rb.true_label);
        }
        assert_ne!(
            TableVariant::Scatter.query_fields(),
            TableVariant::BoxPlot.query_fields()
        );
    }

    #[test]
    fn test_two_anomalies_in_ground_truth() {
        let anomalous: Vec<String> = TableVariant::Scatter
            .records()
            .into_iter()
            .filter(|r| r.true_label == Some(1))
            .map(|r| r.ip_address)
            .collect();
        assert_eq!(anomalous, vec!["192.168.0.3", "192.168.0.5"]);
    }
}
