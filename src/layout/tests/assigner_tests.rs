//! Tests for 2x2 slot assignment

extern crate std;

use std::collections::HashSet;
use crate::errors::PanelError;
use crate::layout::{AssignmentMethod, FallbackReason, RegionSelector, Slot, SlotAssigner};
use super::test_utils::{region_at, unplaced};

fn assigned_indices(assignment: &crate::layout::SlotAssignment) -> Vec<(Slot, usize)> {
    assignment.entries().iter().map(|(s, r)| (*s, r.source_index())).collect()
}

#[test]
fn test_clean_grid_reading_order() {
    // Centers (100,100), (500,100), (100,400), (500,400) on an 800x600 page,
    // handed over in an area order unrelated to position
    let regions = vec![
        region_at(500.0, 400.0, 9000.0, 3),
        region_at(100.0, 400.0, 8000.0, 2),
        region_at(500.0, 100.0, 7000.0, 1),
        region_at(100.0, 100.0, 6000.0, 0),
    ];

    let assignment = SlotAssigner::new().assign(regions, 600.0).unwrap();
    std::assert_eq!(assignment.method(), AssignmentMethod::Geometric);
    std::assert_eq!(assigned_indices(&assignment), vec![
        (Slot::Before, 0),
        (Slot::During1, 1),
        (Slot::During2, 2),
        (Slot::After, 3),
    ]);
}

#[test]
fn test_clean_grid_is_deterministic() {
    let build = || vec![
        region_at(620.0, 450.0, 5000.0, 0),
        region_at(180.0, 140.0, 4000.0, 1),
        region_at(200.0, 460.0, 3000.0, 2),
        region_at(600.0, 120.0, 2000.0, 3),
    ];

    let first = assigned_indices(&SlotAssigner::new().assign(build(), 600.0).unwrap());
    for _ in 0..5 {
        let again = assigned_indices(&SlotAssigner::new().assign(build(), 600.0).unwrap());
        std::assert_eq!(again, first);
    }
    std::assert_eq!(first, vec![
        (Slot::Before, 1),
        (Slot::During1, 3),
        (Slot::During2, 2),
        (Slot::After, 0),
    ]);
}

#[test]
fn test_three_upper_one_lower_falls_back() {
    let regions = vec![
        region_at(100.0, 100.0, 9000.0, 0),
        region_at(400.0, 100.0, 8000.0, 1),
        region_at(700.0, 100.0, 7000.0, 2),
        region_at(400.0, 450.0, 6000.0, 3),
    ];

    let assignment = SlotAssigner::new().assign(regions, 600.0).unwrap();
    std::assert_eq!(assignment.method(), AssignmentMethod::OrderFallback {
        reason: FallbackReason::NotTwoByTwo { upper: 3, lower: 1 },
    });
    std::assert_eq!(assigned_indices(&assignment), vec![
        (Slot::Before, 0),
        (Slot::During1, 1),
        (Slot::During2, 2),
        (Slot::After, 3),
    ]);
}

#[test]
fn test_single_row_falls_back() {
    let regions = (0..4).map(|i| region_at(100.0 + 150.0 * i as f64, 500.0, 1000.0 - i as f64, i)).collect();
    let assignment = SlotAssigner::new().assign(regions, 600.0).unwrap();
    std::assert!(assignment.method().is_fallback());
}

#[test]
fn test_center_on_midline_counts_as_lower() {
    let regions = vec![
        region_at(100.0, 100.0, 900.0, 0),
        region_at(500.0, 100.0, 800.0, 1),
        region_at(100.0, 300.0, 700.0, 2),
        region_at(500.0, 300.0, 600.0, 3),
    ];
    let assignment = SlotAssigner::new().assign(regions, 600.0).unwrap();
    std::assert_eq!(assignment.method(), AssignmentMethod::Geometric);
    std::assert_eq!(assignment.get(Slot::During2).unwrap().source_index(), 2);
}

#[test]
fn test_unknown_placement_skips_geometry() {
    let regions = vec![
        region_at(100.0, 100.0, 9000.0, 0),
        unplaced(8000, 1),
        region_at(100.0, 400.0, 7000.0, 2),
        region_at(500.0, 400.0, 6000.0, 3),
    ];
    let assignment = SlotAssigner::new().assign(regions, 600.0).unwrap();
    std::assert_eq!(assignment.method(), AssignmentMethod::OrderFallback {
        reason: FallbackReason::UnknownPlacement,
    });
    std::assert_eq!(assignment.get(Slot::During1).unwrap().source_index(), 1);
}

#[test]
fn test_equal_centers_keep_area_order() {
    // Both upper regions share a center; the first in area order takes the left slot
    let regions = vec![
        region_at(300.0, 100.0, 9000.0, 0),
        region_at(300.0, 100.0, 8000.0, 1),
        region_at(100.0, 400.0, 7000.0, 2),
        region_at(500.0, 400.0, 6000.0, 3),
    ];
    let assignment = SlotAssigner::new().assign(regions, 600.0).unwrap();
    std::assert_eq!(assignment.get(Slot::Before).unwrap().source_index(), 0);
    std::assert_eq!(assignment.get(Slot::During1).unwrap().source_index(), 1);
}

#[test]
fn test_every_layout_is_a_bijection() {
    let positions = [
        (100.0, 100.0), (500.0, 100.0), (100.0, 450.0), (500.0, 450.0),
        (300.0, 299.0), (300.0, 300.0), (700.0, 10.0), (10.0, 590.0),
    ];

    // Every choice of four positions, including all row splits
    for a in 0..positions.len() {
        for b in (a + 1)..positions.len() {
            for c in (b + 1)..positions.len() {
                for d in (c + 1)..positions.len() {
                    let regions = [a, b, c, d].iter().enumerate()
                        .map(|(i, &p)| region_at(positions[p].0, positions[p].1, 1000.0 - i as f64, i))
                        .collect();
                    let assignment = SlotAssigner::new().assign(regions, 600.0).unwrap();

                    let slots: HashSet<Slot> = assignment.entries().iter().map(|(s, _)| *s).collect();
                    let sources: HashSet<usize> = assignment.entries().iter().map(|(_, r)| r.source_index()).collect();
                    std::assert_eq!(slots.len(), 4);
                    std::assert_eq!(sources.len(), 4);
                }
            }
        }
    }
}

#[test]
fn test_selected_then_assigned() {
    // Six candidates: two decorations smaller than the four photos
    let candidates = vec![
        region_at(700.0, 20.0, 300.0, 0),
        region_at(150.0, 150.0, 20000.0, 1),
        region_at(550.0, 150.0, 21000.0, 2),
        region_at(50.0, 580.0, 250.0, 3),
        region_at(150.0, 450.0, 19000.0, 4),
        region_at(550.0, 450.0, 22000.0, 5),
    ];
    let selected = RegionSelector::new(4).select(candidates).unwrap();
    let assignment = SlotAssigner::new().assign(selected, 600.0).unwrap();
    std::assert_eq!(assigned_indices(&assignment), vec![
        (Slot::Before, 1),
        (Slot::During1, 2),
        (Slot::During2, 4),
        (Slot::After, 5),
    ]);
}

#[test]
fn test_wrong_region_count_is_rejected() {
    let three = (0..3).map(|i| region_at(100.0, 100.0, 10.0, i)).collect();
    std::assert!(std::matches!(
        SlotAssigner::new().assign(three, 600.0),
        Err(PanelError::InsufficientRegions { found: 3, required: 4 })
    ));

    let five = (0..5).map(|i| region_at(100.0, 100.0, 10.0, i)).collect();
    std::assert!(SlotAssigner::new().assign(five, 600.0).is_err());
}

#[test]
fn test_method_serializes_with_reason() {
    let method = AssignmentMethod::OrderFallback {
        reason: FallbackReason::NotTwoByTwo { upper: 3, lower: 1 },
    };
    let json = serde_json::to_value(method).unwrap();
    std::assert_eq!(json["method"], "order_fallback");
    std::assert_eq!(json["reason"]["not_two_by_two"]["upper"], 3);

    let json = serde_json::to_value(AssignmentMethod::Geometric).unwrap();
    std::assert_eq!(json["method"], "geometric");
}
