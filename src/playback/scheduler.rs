use crate::ad::placement::{Placement, PlacementKind};
use std::collections::HashSet;

/// Window around a mid-roll offset within which a time update matches.
///
/// Playback time updates arrive at irregular, coarse intervals
/// (typically every 200–500 ms), so an exact-equality match could step
/// straight over an offset.
pub const MID_ROLL_TOLERANCE_SECS: f64 = 1.0;

/// Where the session is when it asks for a scheduling decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulePoint {
    /// Content locator assigned, nothing played yet
    Start,
    /// Content surface reported a time update
    Progress { elapsed_secs: f64 },
    /// Content surface reported natural end of playback
    Ended,
}

/// Which placements have already aired this session.
///
/// Aired offsets are sticky: seeking backward across a mid-roll offset
/// never re-airs it, and once anything has aired the pre-roll window is
/// closed for good.
#[derive(Debug, Clone, Default)]
pub struct AiredPlacements {
    any: bool,
    offsets: HashSet<u32>,
}

impl AiredPlacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a finished airing
    pub fn mark(&mut self, kind: &PlacementKind) {
        self.any = true;
        if let PlacementKind::MidRoll { offset_secs } = kind {
            self.offsets.insert(*offset_secs);
        }
    }

    pub fn any_aired(&self) -> bool {
        self.any
    }

    pub fn offset_aired(&self, offset_secs: u32) -> bool {
        self.offsets.contains(&offset_secs)
    }

    /// Aired mid-roll offsets, sorted for stable output
    pub fn aired_offsets(&self) -> Vec<u32> {
        let mut offsets: Vec<u32> = self.offsets.iter().copied().collect();
        offsets.sort_unstable();
        offsets
    }
}

/// Decide the next placement that should begin airing, if any.
///
/// Pure function over the placement list, the current schedule point,
/// and the aired state; identical inputs always produce the identical
/// decision. Ties resolve to the first placement in catalog order.
///
/// Rules, in priority order:
/// 1. Before anything has aired, the first pre-roll wins. At most one
///    pre-roll airs per session; later pre-rolls are unreachable.
/// 2. On progress, the first not-yet-aired mid-roll whose offset lies
///    within [`MID_ROLL_TOLERANCE_SECS`] of the elapsed time wins.
/// 3. On content end, the first post-roll wins.
pub fn next_placement<'a>(
    placements: &'a [Placement],
    point: SchedulePoint,
    aired: &AiredPlacements,
) -> Option<&'a Placement> {
    if !aired.any_aired() {
        if let Some(pre_roll) = placements
            .iter()
            .find(|p| p.kind == PlacementKind::PreRoll)
        {
            return Some(pre_roll);
        }
    }

    match point {
        SchedulePoint::Start => None,
        SchedulePoint::Progress { elapsed_secs } => placements.iter().find(|p| match p.kind {
            PlacementKind::MidRoll { offset_secs } => {
                !aired.offset_aired(offset_secs)
                    && (elapsed_secs - f64::from(offset_secs)).abs() <= MID_ROLL_TOLERANCE_SECS
            }
            _ => false,
        }),
        SchedulePoint::Ended => placements
            .iter()
            .find(|p| p.kind == PlacementKind::PostRoll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad::placement::Ad;

    fn test_ad(id: &str) -> Ad {
        Ad {
            id: id.to_string(),
            title: format!("Ad {}", id),
            description: None,
            video_url: format!("https://ads.example.com/{}.mp4", id),
            is_skippable: false,
            skip_after_secs: 5,
            duration_secs: 10,
        }
    }

    fn placement(kind: PlacementKind, id: &str) -> Placement {
        Placement::new(kind, test_ad(id))
    }

    #[test]
    fn test_pre_roll_before_anything_aired() {
        let placements = vec![
            placement(PlacementKind::MidRoll { offset_secs: 30 }, "mid"),
            placement(PlacementKind::PreRoll, "pre"),
        ];
        let aired = AiredPlacements::new();

        let next = next_placement(&placements, SchedulePoint::Start, &aired).unwrap();
        assert_eq!(next.ad.id, "pre");
    }

    #[test]
    fn test_only_first_pre_roll_is_reachable() {
        let placements = vec![
            placement(PlacementKind::PreRoll, "pre-1"),
            placement(PlacementKind::PreRoll, "pre-2"),
        ];
        let mut aired = AiredPlacements::new();

        let first = next_placement(&placements, SchedulePoint::Start, &aired).unwrap();
        assert_eq!(first.ad.id, "pre-1");
        aired.mark(&first.kind);

        // Once anything has aired, no pre-roll is ever returned again
        assert!(next_placement(&placements, SchedulePoint::Start, &aired).is_none());
        assert!(
            next_placement(
                &placements,
                SchedulePoint::Progress { elapsed_secs: 5.0 },
                &aired
            )
            .is_none()
        );
    }

    #[test]
    fn test_no_pre_roll_means_no_start_decision() {
        let placements = vec![placement(PlacementKind::MidRoll { offset_secs: 30 }, "mid")];
        let aired = AiredPlacements::new();

        assert!(next_placement(&placements, SchedulePoint::Start, &aired).is_none());
    }

    #[test]
    fn test_mid_roll_matches_within_tolerance() {
        let placements = vec![placement(PlacementKind::MidRoll { offset_secs: 30 }, "mid")];
        let mut aired = AiredPlacements::new();
        aired.mark(&PlacementKind::PreRoll);

        // Coarse time updates land near the offset, not on it
        for elapsed in [29.0, 29.6, 30.0, 30.4, 31.0] {
            let hit = next_placement(
                &placements,
                SchedulePoint::Progress {
                    elapsed_secs: elapsed,
                },
                &aired,
            );
            assert!(hit.is_some(), "expected match at {}s", elapsed);
        }

        for elapsed in [0.0, 28.9, 31.1, 60.0] {
            let miss = next_placement(
                &placements,
                SchedulePoint::Progress {
                    elapsed_secs: elapsed,
                },
                &aired,
            );
            assert!(miss.is_none(), "expected no match at {}s", elapsed);
        }
    }

    #[test]
    fn test_aired_mid_roll_offset_is_sticky() {
        let placements = vec![placement(PlacementKind::MidRoll { offset_secs: 30 }, "mid")];
        let mut aired = AiredPlacements::new();
        aired.mark(&PlacementKind::MidRoll { offset_secs: 30 });

        // Seeking backward across 30s must not re-air the placement
        let hit = next_placement(
            &placements,
            SchedulePoint::Progress { elapsed_secs: 30.2 },
            &aired,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_duplicate_offsets_resolve_by_catalog_order_once() {
        let placements = vec![
            placement(PlacementKind::MidRoll { offset_secs: 30 }, "mid-a"),
            placement(PlacementKind::MidRoll { offset_secs: 30 }, "mid-b"),
        ];
        let mut aired = AiredPlacements::new();
        aired.mark(&PlacementKind::PreRoll);

        let first = next_placement(
            &placements,
            SchedulePoint::Progress { elapsed_secs: 30.0 },
            &aired,
        )
        .unwrap();
        assert_eq!(first.ad.id, "mid-a");
        aired.mark(&first.kind);

        // The duplicate shares the offset, so it is never scheduled
        let second = next_placement(
            &placements,
            SchedulePoint::Progress { elapsed_secs: 30.0 },
            &aired,
        );
        assert!(second.is_none());
    }

    #[test]
    fn test_distinct_offsets_air_independently() {
        let placements = vec![
            placement(PlacementKind::MidRoll { offset_secs: 30 }, "mid-30"),
            placement(PlacementKind::MidRoll { offset_secs: 90 }, "mid-90"),
        ];
        let mut aired = AiredPlacements::new();
        aired.mark(&PlacementKind::MidRoll { offset_secs: 30 });

        let next = next_placement(
            &placements,
            SchedulePoint::Progress { elapsed_secs: 90.3 },
            &aired,
        )
        .unwrap();
        assert_eq!(next.ad.id, "mid-90");
    }

    #[test]
    fn test_post_roll_only_on_ended() {
        let placements = vec![placement(PlacementKind::PostRoll, "post")];
        let mut aired = AiredPlacements::new();
        aired.mark(&PlacementKind::MidRoll { offset_secs: 30 });

        assert!(
            next_placement(
                &placements,
                SchedulePoint::Progress {
                    elapsed_secs: 1000.0
                },
                &aired
            )
            .is_none()
        );

        let next = next_placement(&placements, SchedulePoint::Ended, &aired).unwrap();
        assert_eq!(next.ad.id, "post");
    }

    #[test]
    fn test_first_post_roll_wins() {
        let placements = vec![
            placement(PlacementKind::PostRoll, "post-1"),
            placement(PlacementKind::PostRoll, "post-2"),
        ];
        let mut aired = AiredPlacements::new();
        aired.mark(&PlacementKind::PreRoll);

        let next = next_placement(&placements, SchedulePoint::Ended, &aired).unwrap();
        assert_eq!(next.ad.id, "post-1");
    }

    #[test]
    fn test_empty_catalog_schedules_nothing() {
        let aired = AiredPlacements::new();
        assert!(next_placement(&[], SchedulePoint::Start, &aired).is_none());
        assert!(
            next_placement(&[], SchedulePoint::Progress { elapsed_secs: 30.0 }, &aired).is_none()
        );
        assert!(next_placement(&[], SchedulePoint::Ended, &aired).is_none());
    }

    #[test]
    fn test_aired_offsets_sorted() {
        let mut aired = AiredPlacements::new();
        aired.mark(&PlacementKind::MidRoll { offset_secs: 90 });
        aired.mark(&PlacementKind::MidRoll { offset_secs: 30 });
        assert_eq!(aired.aired_offsets(), vec![30, 90]);
    }
}
