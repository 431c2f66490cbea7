//! End-to-end checks against the public API, one per documented scenario.
//! Where a module's own unit tests already exercise the same numbers from
//! inside the crate, these drive the same scenario through
//! [`raster_layout::LayoutDocument`] and [`raster_layout::LayoutCache`] to
//! confirm the public surface wires the engines together correctly.

use raster_layout::cache::LayoutCache;
use raster_layout::node_tree::NodeId;
use raster_layout::style::{
    AutoValue, Display, FlexContainerStyle, FlexDirection, GridContainerStyle, JustifyContent,
    Position, Sides, SizeConstraints,
};
use raster_layout::{LayoutDocument, Viewport};

fn px(value: f32) -> AutoValue {
    AutoValue::px(value)
}

#[test]
fn absolute_child_anchors_to_its_relative_positioned_parent() {
    let mut doc = LayoutDocument::new();
    let root = doc.push();
    let parent = doc.push();
    let child = doc.push();
    doc.append_child(root, parent);
    doc.append_child(parent, child);

    doc.set_size(root, SizeConstraints { width: px(800.0), height: px(600.0), ..Default::default() });
    doc.set_position(parent, Position::Relative);
    doc.set_size(parent, SizeConstraints { width: px(400.0), height: px(300.0), ..Default::default() });

    doc.set_position(child, Position::Absolute);
    doc.set_size(child, SizeConstraints { width: px(50.0), height: px(50.0), ..Default::default() });
    doc.set_offsets(child, Sides { top: px(10.0), right: AutoValue::AUTO, bottom: AutoValue::AUTO, left: px(20.0) });

    doc.compute_layout(Viewport::new(800.0, 600.0));

    let parent_g = doc.geometry(parent);
    let child_g = doc.geometry(child);
    assert_eq!(child_g.x, parent_g.x + 20.0);
    assert_eq!(child_g.y, parent_g.y + 10.0);
}

#[test]
fn float_left_then_cleared_sibling_drops_below_it() {
    let mut doc = LayoutDocument::new();
    let root = doc.push();
    let floated = doc.push();
    let cleared = doc.push();
    doc.append_child(root, floated);
    doc.append_child(root, cleared);

    doc.set_size(root, SizeConstraints { width: px(400.0), height: px(400.0), ..Default::default() });
    doc.set_float(floated, raster_layout::style::Float::Left);
    doc.set_size(floated, SizeConstraints { width: px(100.0), height: px(120.0), ..Default::default() });
    doc.set_clear(cleared, raster_layout::style::Clear::Left);
    doc.set_size(cleared, SizeConstraints { width: px(100.0), height: px(40.0), ..Default::default() });

    doc.compute_layout(Viewport::new(400.0, 400.0));

    let floated_g = doc.geometry(floated);
    let cleared_g = doc.geometry(cleared);
    assert!(cleared_g.y >= floated_g.y + floated_g.height);
}

#[test]
fn flex_row_space_between_lays_out_three_equal_children() {
    let mut doc = LayoutDocument::new();
    let container = doc.push();
    let children: Vec<NodeId> = (0..3).map(|_| doc.push()).collect();
    for &c in &children {
        doc.append_child(container, c);
        doc.set_size(c, SizeConstraints { width: px(100.0), height: px(40.0), ..Default::default() });
    }

    doc.set_display(container, Display::Flex);
    doc.set_flex_container(container, FlexContainerStyle {
        flex_direction: FlexDirection::Row,
        justify_content: JustifyContent::SpaceBetween,
        ..Default::default()
    });
    doc.set_size(container, SizeConstraints { width: px(600.0), height: px(100.0), ..Default::default() });

    doc.compute_layout(Viewport::new(600.0, 100.0));
    doc.compute_flexbox_layout(container).unwrap();

    let xs: Vec<f32> = children.iter().map(|&c| doc.geometry(c).x).collect();
    assert_eq!(xs, vec![0.0, 250.0, 500.0]);
}

#[test]
fn grid_with_six_children_fills_a_3x2_grid_row_major() {
    let mut doc = LayoutDocument::new();
    let container = doc.push();
    let children: Vec<NodeId> = (0..6).map(|_| doc.push()).collect();
    for &c in &children {
        doc.append_child(container, c);
    }

    doc.set_display(container, Display::Grid);
    doc.set_grid_container(container, GridContainerStyle { grid_cols: 3, grid_rows: 2 });
    doc.set_size(container, SizeConstraints { width: px(300.0), height: px(200.0), ..Default::default() });

    doc.compute_layout(Viewport::new(300.0, 200.0));
    doc.compute_grid_layout(container).unwrap();

    let expected = [
        (0.0, 0.0), (100.0, 0.0), (200.0, 0.0),
        (0.0, 100.0), (100.0, 100.0), (200.0, 100.0),
    ];
    for (&id, (ex, ey)) in children.iter().zip(expected.iter()) {
        let g = doc.geometry(id);
        assert_eq!((g.x, g.y), (*ex, *ey));
    }
}

#[test]
fn invalidating_a_subtree_removes_only_its_cached_descendants() {
    let cache = LayoutCache::with_capacity(8);
    cache.put(NodeId::new(1), 0.0, 0.0, 10.0, 10.0, None, vec![NodeId::new(2), NodeId::new(3)]);
    cache.put(NodeId::new(2), 0.0, 0.0, 10.0, 10.0, Some(NodeId::new(1)), vec![NodeId::new(4)]);
    cache.put(NodeId::new(3), 0.0, 0.0, 10.0, 10.0, Some(NodeId::new(1)), vec![]);
    cache.put(NodeId::new(4), 0.0, 0.0, 10.0, 10.0, Some(NodeId::new(2)), vec![]);

    cache.invalidate_subtree(NodeId::new(2));

    assert!(cache.has(NodeId::new(1)));
    assert!(cache.has(NodeId::new(3)));
    assert!(!cache.has(NodeId::new(2)));
    assert!(!cache.has(NodeId::new(4)));
}

#[test]
fn cache_at_capacity_evicts_the_least_recently_touched_entry() {
    let cache = LayoutCache::with_capacity(3);
    cache.put(NodeId::new(1), 0.0, 0.0, 1.0, 1.0, None, vec![]);
    cache.put(NodeId::new(2), 0.0, 0.0, 1.0, 1.0, None, vec![]);
    cache.put(NodeId::new(3), 0.0, 0.0, 1.0, 1.0, None, vec![]);
    assert!(cache.get(NodeId::new(1)).is_some());

    cache.put(NodeId::new(4), 0.0, 0.0, 1.0, 1.0, None, vec![]);

    assert!(cache.has(NodeId::new(1)));
    assert!(!cache.has(NodeId::new(2)));
    assert!(cache.has(NodeId::new(3)));
    assert!(cache.has(NodeId::new(4)));
}
