use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::planner::TransportMode;

/// One requested edit to an existing itinerary.
///
/// Instructions are produced by an external intent classifier and consumed
/// exactly once by the mutation engine. Each variant carries only the fields
/// its handler needs; the `action` tag selects the variant on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ChangeInstruction {
    /// Insert a new activity, positioned after an anchor activity when given
    #[serde(rename_all = "camelCase")]
    Add {
        day: u32,
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after_activity_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lat: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lng: Option<f64>,
    },
    /// Remove the first activity matching the location; no-op when none match
    Remove { day: u32, location: String },
    /// Overwrite a matched activity's description, or add a new activity
    Modify {
        day: u32,
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// Swap a matched activity for another place, keeping its slot
    #[serde(rename_all = "camelCase")]
    Replace {
        day: u32,
        /// The new place
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_location: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_location: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lat: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lng: Option<f64>,
    },
    /// Change the transport mode for one segment or the whole day
    #[serde(rename_all = "camelCase")]
    Transport {
        day: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<TransportMode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_location: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to_location: Option<String>,
    },
    /// Rebuild the targeted day from scratch, leaving other days untouched
    Regenerate { day: u32 },
}

impl ChangeInstruction {
    /// The 1-based day this instruction targets
    pub fn day(&self) -> u32 {
        match self {
            ChangeInstruction::Add { day, .. }
            | ChangeInstruction::Remove { day, .. }
            | ChangeInstruction::Modify { day, .. }
            | ChangeInstruction::Replace { day, .. }
            | ChangeInstruction::Transport { day, .. }
            | ChangeInstruction::Regenerate { day } => *day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tag_round_trip() {
        let raw = r#"{"action": "transport", "day": 1, "details": "도보로 이동할래요", "fromLocation": "A", "toLocation": "B"}"#;
        let parsed: ChangeInstruction = serde_json::from_str(raw).unwrap();
        match &parsed {
            ChangeInstruction::Transport {
                day,
                mode,
                from_location,
                ..
            } => {
                assert_eq!(*day, 1);
                assert!(mode.is_none());
                assert_eq!(from_location.as_deref(), Some("A"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
        let encoded = serde_json::to_value(&parsed).unwrap();
        assert_eq!(encoded["action"], "transport");
    }

    #[test]
    fn test_regenerate_minimal_payload() {
        let parsed: ChangeInstruction =
            serde_json::from_str(r#"{"action": "regenerate", "day": 2}"#).unwrap();
        assert_eq!(parsed.day(), 2);
    }
}
