use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Device identifier → ordered raw log lines.
pub type DeviceLines = BTreeMap<String, Vec<String>>;

/// Everything scanned out of one archive: pool-connection lines and power
/// on/off lines, keyed by device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBundle {
    #[serde(default)]
    pub connection_lines: DeviceLines,
    #[serde(default)]
    pub power_lines: DeviceLines,
}

/// Canonical archive key → bundle; one collection per user.
pub type Collection = BTreeMap<String, LogBundle>;

impl LogBundle {
    pub fn connection_line_count(&self) -> usize {
        self.connection_lines.values().map(Vec::len).sum()
    }

    pub fn power_line_count(&self) -> usize {
        self.power_lines.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::LogBundle;

    #[test]
    fn bundle_serializes_with_camel_case_mappings() {
        let mut bundle = LogBundle::default();
        bundle
            .connection_lines
            .insert("miner-1".to_string(), vec!["a stratum+tcp b".to_string()]);
        bundle
            .power_lines
            .insert("miner-1".to_string(), vec!["power on".to_string()]);

        let json = serde_json::to_value(&bundle).expect("serialize");
        assert!(json.get("connectionLines").is_some());
        assert!(json.get("powerLines").is_some());
    }
}
