//! Opcode list lookup for the packet signal source.
//!
//! The list is the community-maintained JSON document of per-region opcode
//! tables. Fetching it is the caller's business; this module only parses.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const GLOBAL_REGION: &str = "Global";
pub const SERVER_ZONE_IPC_TYPE: &str = "ServerZoneIpcType";
pub const EVENT_PLAY: &str = "EventPlay";

#[derive(Debug, Clone, Deserialize)]
pub struct OpcodeRegion {
    #[serde(default, alias = "Version")]
    pub version: Option<String>,
    #[serde(default, alias = "Region")]
    pub region: Option<String>,
    #[serde(default, alias = "Lists")]
    pub lists: Option<HashMap<String, Vec<OpcodeEntry>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpcodeEntry {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Opcode")]
    pub opcode: u16,
}

/// Find the `EventPlay` server opcode for `region` in an opcode list document.
pub fn find_event_play_opcode(json: &str, region: &str) -> Result<u16> {
    let regions: Vec<OpcodeRegion> = serde_json::from_str(json)?;
    if regions.is_empty() {
        return Err(Error::opcode_list("No regions found in opcode list"));
    }

    let lists = regions
        .iter()
        .find(|r| r.region.as_deref() == Some(region))
        .and_then(|r| r.lists.as_ref())
        .ok_or_else(|| Error::opcode_list(format!("No {} region found in opcode list", region)))?;

    let server_zone = lists.get(SERVER_ZONE_IPC_TYPE).ok_or_else(|| {
        Error::opcode_list(format!("No {} in opcode list", SERVER_ZONE_IPC_TYPE))
    })?;

    let event_play = server_zone
        .iter()
        .find(|entry| entry.name == EVENT_PLAY)
        .ok_or_else(|| {
            Error::opcode_list(format!(
                "No {} opcode in {}",
                EVENT_PLAY, SERVER_ZONE_IPC_TYPE
            ))
        })?;

    debug!("Found {} opcode {:04X}", EVENT_PLAY, event_play.opcode);
    Ok(event_play.opcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"[
        {"version": "2024.01.01", "region": "CN", "lists": {
            "ServerZoneIpcType": [{"name": "EventPlay", "opcode": 17}]
        }},
        {"version": "2024.01.01", "region": "Global", "lists": {
            "ServerZoneIpcType": [
                {"name": "ActorControl", "opcode": 100},
                {"name": "EventPlay", "opcode": 905}
            ],
            "ClientZoneIpcType": [{"name": "EventPlay", "opcode": 1}]
        }}
    ]"#;

    #[test]
    fn test_finds_global_event_play() {
        assert_eq!(find_event_play_opcode(DOCUMENT, GLOBAL_REGION).unwrap(), 905);
        assert_eq!(find_event_play_opcode(DOCUMENT, "CN").unwrap(), 17);
    }

    #[test]
    fn test_accepts_pascal_case_keys() {
        let json = r#"[{"Version": "x", "Region": "Global", "Lists": {
            "ServerZoneIpcType": [{"Name": "EventPlay", "Opcode": 42}]
        }}]"#;
        assert_eq!(find_event_play_opcode(json, GLOBAL_REGION).unwrap(), 42);
    }

    #[test]
    fn test_each_missing_level_is_an_error() {
        let cases = [
            ("[]", "No regions"),
            (r#"[{"region": "KR", "lists": {}}]"#, "No Global region"),
            (r#"[{"region": "Global"}]"#, "No Global region"),
            (r#"[{"region": "Global", "lists": {}}]"#, "No ServerZoneIpcType"),
            (
                r#"[{"region": "Global", "lists": {"ServerZoneIpcType": []}}]"#,
                "No EventPlay opcode",
            ),
        ];

        for (json, expected) in cases {
            let err = find_event_play_opcode(json, GLOBAL_REGION).unwrap_err();
            assert!(err.to_string().contains(expected), "{}: {}", json, err);
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            find_event_play_opcode("{", GLOBAL_REGION),
            Err(Error::Json(_))
        ));
    }
}
