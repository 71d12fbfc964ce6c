use crate::error::AdweaveError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sponsored video creative.
///
/// Field names follow the catalog service's wire format so payloads
/// round-trip without a mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL of the ad creative (progressive MP4 or HLS playlist)
    pub video_url: String,
    pub is_skippable: bool,
    /// Seconds of real time before a skippable ad may be skipped (>= 1)
    #[serde(rename = "skip_after_seconds")]
    pub skip_after_secs: u32,
    /// Nominal creative duration in seconds
    #[serde(rename = "duration")]
    pub duration_secs: u32,
}

/// Placement class as it appears on the wire and in impression records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementClass {
    PreRoll,
    MidRoll,
    PostRoll,
}

impl PlacementClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementClass::PreRoll => "pre-roll",
            PlacementClass::MidRoll => "mid-roll",
            PlacementClass::PostRoll => "post-roll",
        }
    }
}

impl std::fmt::Display for PlacementClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Airing rule for a placement.
///
/// The time offset exists only for mid-rolls, so "mid-roll without an
/// offset" is unrepresentable once a payload has been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    PreRoll,
    MidRoll { offset_secs: u32 },
    PostRoll,
}

impl PlacementKind {
    pub fn class(&self) -> PlacementClass {
        match self {
            PlacementKind::PreRoll => PlacementClass::PreRoll,
            PlacementKind::MidRoll { .. } => PlacementClass::MidRoll,
            PlacementKind::PostRoll => PlacementClass::PostRoll,
        }
    }

    /// Mid-roll offset in seconds, if any
    pub fn offset_secs(&self) -> Option<u32> {
        match self {
            PlacementKind::MidRoll { offset_secs } => Some(*offset_secs),
            _ => None,
        }
    }
}

/// Binding of one ad to one content item with a rule for when it airs.
///
/// Deserialization goes through [`PlacementWire`] so malformed
/// combinations (mid-roll without `time_offset`, offsets on pre/post)
/// are rejected at the edge instead of checked at scheduling time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlacementWire", into = "PlacementWire")]
pub struct Placement {
    pub kind: PlacementKind,
    pub ad: Ad,
}

impl Placement {
    pub fn new(kind: PlacementKind, ad: Ad) -> Self {
        Self { kind, ad }
    }
}

/// Catalog service wire form of a placement
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlacementWire {
    placement_type: PlacementClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_offset: Option<u32>,
    ad: Ad,
}

impl TryFrom<PlacementWire> for Placement {
    type Error = AdweaveError;

    fn try_from(wire: PlacementWire) -> Result<Self, Self::Error> {
        let kind = match (wire.placement_type, wire.time_offset) {
            (PlacementClass::PreRoll, None) => PlacementKind::PreRoll,
            (PlacementClass::MidRoll, Some(offset_secs)) => PlacementKind::MidRoll { offset_secs },
            (PlacementClass::PostRoll, None) => PlacementKind::PostRoll,
            (PlacementClass::MidRoll, None) => {
                return Err(AdweaveError::InvalidPlacement(format!(
                    "mid-roll placement for ad {} is missing time_offset",
                    wire.ad.id
                )));
            }
            (class, Some(offset)) => {
                return Err(AdweaveError::InvalidPlacement(format!(
                    "time_offset {} is only valid for mid-roll placements (got {})",
                    offset, class
                )));
            }
        };
        Ok(Placement { kind, ad: wire.ad })
    }
}

impl From<Placement> for PlacementWire {
    fn from(placement: Placement) -> Self {
        PlacementWire {
            placement_type: placement.kind.class(),
            time_offset: placement.kind.offset_secs(),
            ad: placement.ad,
        }
    }
}

/// Immutable record of one ad airing outcome.
///
/// Created once when an airing ends (completion, skip, or media fault),
/// then handed to the recorder. Never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Impression {
    pub ad_id: String,
    pub content_id: String,
    pub placement_type: PlacementClass,
    /// Seconds watched before the airing ended
    pub watched_seconds: u32,
    /// True only when the creative played to natural completion
    pub completed: bool,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ad(id: &str) -> Ad {
        Ad {
            id: id.to_string(),
            title: format!("Ad {}", id),
            description: None,
            video_url: format!("https://ads.example.com/{}.mp4", id),
            is_skippable: true,
            skip_after_secs: 5,
            duration_secs: 15,
        }
    }

    #[test]
    fn test_deserialize_mid_roll_with_offset() {
        let json = r#"{
            "placement_type": "mid-roll",
            "time_offset": 30,
            "ad": {
                "id": "ad-1",
                "title": "Mid-roll ad",
                "video_url": "https://ads.example.com/ad-1.mp4",
                "is_skippable": false,
                "skip_after_seconds": 5,
                "duration": 10
            }
        }"#;

        let placement: Placement = serde_json::from_str(json).unwrap();
        assert_eq!(placement.kind, PlacementKind::MidRoll { offset_secs: 30 });
        assert_eq!(placement.ad.id, "ad-1");
        assert!(!placement.ad.is_skippable);
    }

    #[test]
    fn test_deserialize_pre_roll_without_offset() {
        let json = r#"{
            "placement_type": "pre-roll",
            "ad": {
                "id": "ad-2",
                "title": "Pre-roll ad",
                "description": "A fine beverage",
                "video_url": "https://ads.example.com/ad-2.mp4",
                "is_skippable": true,
                "skip_after_seconds": 5,
                "duration": 15
            }
        }"#;

        let placement: Placement = serde_json::from_str(json).unwrap();
        assert_eq!(placement.kind, PlacementKind::PreRoll);
        assert_eq!(placement.ad.description.as_deref(), Some("A fine beverage"));
    }

    #[test]
    fn test_mid_roll_without_offset_rejected() {
        let json = r#"{
            "placement_type": "mid-roll",
            "ad": {
                "id": "ad-3",
                "title": "Broken",
                "video_url": "https://ads.example.com/ad-3.mp4",
                "is_skippable": false,
                "skip_after_seconds": 5,
                "duration": 10
            }
        }"#;

        let result: Result<Placement, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_offset_on_post_roll_rejected() {
        let json = r#"{
            "placement_type": "post-roll",
            "time_offset": 10,
            "ad": {
                "id": "ad-4",
                "title": "Broken",
                "video_url": "https://ads.example.com/ad-4.mp4",
                "is_skippable": false,
                "skip_after_seconds": 5,
                "duration": 10
            }
        }"#;

        let result: Result<Placement, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trips_wire_shape() {
        let placement = Placement::new(
            PlacementKind::MidRoll { offset_secs: 45 },
            test_ad("ad-5"),
        );

        let json = serde_json::to_value(&placement).unwrap();
        assert_eq!(json["placement_type"], "mid-roll");
        assert_eq!(json["time_offset"], 45);
        assert_eq!(json["ad"]["skip_after_seconds"], 5);
        assert_eq!(json["ad"]["duration"], 15);

        let back: Placement = serde_json::from_value(json).unwrap();
        assert_eq!(back, placement);
    }

    #[test]
    fn test_placement_class_labels() {
        assert_eq!(PlacementClass::PreRoll.as_str(), "pre-roll");
        assert_eq!(PlacementClass::MidRoll.as_str(), "mid-roll");
        assert_eq!(PlacementClass::PostRoll.as_str(), "post-roll");
    }
}
