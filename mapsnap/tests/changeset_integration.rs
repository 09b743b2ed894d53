//! Integration tests for drawable change detection.
//!
//! Simulates a route planner repainting stops as the user edits and
//! selects them.
//!
//! Run with: `cargo test --test changeset_integration`

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use mapsnap::{ChangeSetEngine, Colour, DrawableObject, Geometry, GroupMatching, LatLong};

fn stop(id: i64, label: &str) -> DrawableObject {
    DrawableObject::point(id, 52.0 + id as f64 * 0.01, 13.4).with_label(label)
}

fn ids(changes: &[DrawableObject]) -> Vec<i64> {
    let mut ids: Vec<i64> = changes.iter().map(|d| d.global_row_id).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_editing_session() {
    let engine = ChangeSetEngine::new();
    let mut stops: Vec<DrawableObject> = (1..=5).map(|id| stop(id, "pending")).collect();

    assert_eq!(ids(&engine.update_objects(&stops)), vec![1, 2, 3, 4, 5]);
    assert!(engine.update_objects(&stops).is_empty());

    // Mark stop 3 delivered, drop stop 5, add stop 6
    stops[2] = stops[2].clone().with_label("delivered");
    stops.pop();
    stops.push(stop(6, "pending"));

    let changes = engine.update_objects(&stops);
    assert_eq!(ids(&changes), vec![3, 3, 5, 6]);

    engine.update_selected(&[3].into_iter().collect());
    let changes = engine.update_selected(&[3, 6].into_iter().collect());
    assert_eq!(ids(&changes), vec![6]);
    assert!(engine.update_selected(&[3, 6].into_iter().collect()).is_empty());
}

#[test]
fn test_geometry_compared_by_identity() {
    let engine = ChangeSetEngine::new();
    let route = vec![LatLong::new(52.0, 13.0), LatLong::new(52.1, 13.2)];
    let shared = Arc::new(Geometry::LineString(route.clone()));

    let a = DrawableObject::shape(9, Arc::clone(&shared)).with_colour(Colour::from_rgba(0, 0, 255, 255));
    engine.update_objects(std::slice::from_ref(&a));

    let same_reference = a.clone();
    assert!(engine.update_objects(std::slice::from_ref(&same_reference)).is_empty());

    // Structurally equal but a different allocation
    let rebuilt = DrawableObject {
        geometry: Some(Arc::new(Geometry::LineString(route))),
        ..a.clone()
    };
    assert_eq!(engine.update_objects(std::slice::from_ref(&rebuilt)).len(), 2);
}

#[test]
fn test_matching_modes_diverge_on_identical_groups() {
    let group = vec![stop(4, "leg"), stop(4, "leg")];

    let literal = ChangeSetEngine::new();
    assert_eq!(literal.matching(), GroupMatching::Literal);
    literal.update_objects(&group);
    assert_eq!(literal.update_objects(&group).len(), 4);

    let equality = ChangeSetEngine::with_matching(GroupMatching::Equality);
    equality.update_objects(&group);
    assert!(equality.update_objects(&group).is_empty());
}

#[test]
fn test_concurrent_callers_are_serialized() {
    let engine = Arc::new(ChangeSetEngine::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let objects: Vec<DrawableObject> = (0..50).map(|id| stop(id, "x")).collect();
                for _ in 0..10 {
                    engine.update_objects(&objects);
                    let selected: HashSet<i64> = (t..t + 3).collect();
                    engine.update_selected(&selected);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let objects: Vec<DrawableObject> = (0..50).map(|id| stop(id, "x")).collect();
    assert!(engine.update_objects(&objects).is_empty());
    assert_eq!(engine.current_group(49).unwrap().len(), 1);
}
