//! The flexbox engine (spec §4.2): single-axis flex sizing, main-axis
//! justification and cross-axis alignment over one container's direct
//! in-flow children. Grounded in `azul-layout`'s vendored `algo.rs` (the
//! `stretch` flex solver) for the overall shape of the problem — flex base
//! sizes, a grow/shrink free-space distribution pass, then a separate
//! justify/align placement pass — but deliberately single-pass throughout,
//! matching spec §4.2's "single-pass is acceptable; iterating is not
//! required" rather than `algo.rs`'s iterate-to-fixpoint loop.

use crate::layout_table::{Geometry, LayoutTable};
use crate::node_tree::{NodeId, NodeTree};
use crate::style::{
    AlignContent, AlignItems, Display, FlexDirection, FlexWrap, JustifyContent, Sides, StyleTable,
};
use crate::error::LayoutError;

/// `Sides<f32>` (top/right/bottom/left) doesn't carry a `FlexDirection`
/// itself, so margin/padding sums along an axis are read out by hand here.
fn sides_main(s: Sides<f32>, dir: FlexDirection) -> f32 {
    if dir.is_row() { s.left + s.right } else { s.top + s.bottom }
}

fn sides_cross(s: Sides<f32>, dir: FlexDirection) -> f32 {
    if dir.is_row() { s.top + s.bottom } else { s.left + s.right }
}

fn sides_main_start(s: Sides<f32>, dir: FlexDirection) -> f32 {
    if dir.is_row() { s.left } else { s.top }
}

fn sides_cross_start(s: Sides<f32>, dir: FlexDirection) -> f32 {
    if dir.is_row() { s.top } else { s.left }
}

struct Item {
    id: NodeId,
    main: f32,
    cross: f32,
    min_main: Option<f32>,
    max_main: Option<f32>,
    min_cross: Option<f32>,
    max_cross: Option<f32>,
    margin: Sides<f32>,
    padding: Sides<f32>,
    flex_grow: f32,
    flex_shrink: f32,
    align_self: Option<AlignItems>,
    target_main: f32,
    target_cross: f32,
    main_offset: f32,
    cross_offset: f32,
}

fn outer_main(item: &Item, dir: FlexDirection) -> f32 {
    item.target_main + sides_main(item.margin, dir)
}

fn build_items(tree: &NodeTree, style: &StyleTable, layout: &LayoutTable, container: NodeId, dir: FlexDirection) -> Vec<Item> {
    let mut children: Vec<NodeId> = tree
        .children(container)
        .filter(|&c| style.display(c) != Display::None)
        .filter(|&c| style.position(c).is_in_flow())
        .collect();
    if dir.is_reverse() {
        children.reverse();
    }

    children
        .into_iter()
        .map(|id| {
            let size = style.size(id);
            let margin = style.margin(id);
            let padding = style.padding(id);
            let item_style = style.flex_item(id);
            let (main, cross) = if dir.is_row() {
                (size.width.resolved().unwrap_or(0.0), size.height.resolved().unwrap_or(0.0))
            } else {
                (size.height.resolved().unwrap_or(0.0), size.width.resolved().unwrap_or(0.0))
            };
            let main = if main == 0.0 { item_style.flex_basis.resolved().unwrap_or(0.0) } else { main };
            let (min_main, max_main, min_cross, max_cross) = if dir.is_row() {
                (size.min_width.resolved(), size.max_width.resolved(), size.min_height.resolved(), size.max_height.resolved())
            } else {
                (size.min_height.resolved(), size.max_height.resolved(), size.min_width.resolved(), size.max_width.resolved())
            };
            Item {
                id,
                main,
                cross,
                min_main,
                max_main,
                min_cross,
                max_cross,
                margin,
                padding,
                flex_grow: item_style.flex_grow,
                flex_shrink: item_style.flex_shrink,
                align_self: item_style.align_self,
                target_main: main,
                target_cross: cross,
                main_offset: 0.0,
                cross_offset: 0.0,
            }
        })
        .collect()
}

/// Splits items into lines per `flex_wrap` (spec §4.2 step 2): `nowrap`
/// keeps one line; `wrap`/`wrap-reverse` break a line once the next item
/// would push its summed outer main size past `main_size`.
fn collect_lines(items: Vec<Item>, wrap: FlexWrap, dir: FlexDirection, main_size: f32) -> Vec<Vec<Item>> {
    if wrap == FlexWrap::NoWrap || items.is_empty() {
        return vec![items];
    }
    let mut lines = vec![];
    let mut current = vec![];
    let mut line_length = 0.0_f32;
    for item in items {
        let outer = outer_main(&item, dir);
        if !current.is_empty() && line_length + outer > main_size {
            lines.push(std::mem::take(&mut current));
            line_length = 0.0;
        }
        line_length += outer;
        current.push(item);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Distributes free space among a line's flexible items (spec §4.2 edge
/// cases: grow/shrink proportionally, then clamp to `[min, max]` and
/// redistribute the residual once — no fixed-point iteration).
fn resolve_flexible_lengths(line: &mut [Item], dir: FlexDirection, main_size: f32) {
    let sum_outer: f32 = line.iter().map(|i| outer_main(i, dir)).sum();
    let free_space = main_size - sum_outer;

    if free_space > 0.0 {
        let sum_grow: f32 = line.iter().map(|i| i.flex_grow).sum();
        if sum_grow > 0.0 {
            for item in line.iter_mut() {
                item.target_main = item.main + free_space * (item.flex_grow / sum_grow);
            }
        }
    } else if free_space < 0.0 {
        let sum_weighted: f32 = line.iter().map(|i| i.flex_shrink * i.main).sum();
        if sum_weighted > 0.0 {
            for item in line.iter_mut() {
                let weight = item.flex_shrink * item.main;
                item.target_main = item.main + free_space * (weight / sum_weighted);
            }
        }
    }

    let mut total_violation = 0.0_f32;
    let mut unclamped_count = 0usize;
    for item in line.iter_mut() {
        let mut clamped = item.target_main;
        if let Some(min) = item.min_main {
            clamped = clamped.max(min);
        }
        if let Some(max) = item.max_main {
            clamped = clamped.min(max);
        }
        clamped = clamped.max(0.0);
        let violated = clamped != item.target_main;
        total_violation += clamped - item.target_main;
        item.target_main = clamped;
        if !violated {
            unclamped_count += 1;
        }
    }
    if total_violation != 0.0 && unclamped_count > 0 {
        let adjustment = -total_violation / unclamped_count as f32;
        for item in line.iter_mut() {
            let clamped_already = item.min_main.map_or(false, |m| item.target_main <= m) || item.max_main.map_or(false, |m| item.target_main >= m);
            if !clamped_already {
                item.target_main += adjustment;
            }
        }
    }
}

/// Main-axis `justify-content` distribution (spec §4.2 step 3): returns
/// `(leading_space, gap)` so the caller can walk items left-to-right adding
/// `gap` between each.
fn justify_offsets(justify: JustifyContent, n: usize, free_space: f32) -> (f32, f32) {
    if n == 0 {
        return (0.0, 0.0);
    }
    match justify {
        JustifyContent::Start => (0.0, 0.0),
        JustifyContent::End => (free_space, 0.0),
        JustifyContent::Center => (free_space / 2.0, 0.0),
        JustifyContent::SpaceBetween => {
            if n > 1 {
                (0.0, free_space / (n - 1) as f32)
            } else {
                (0.0, 0.0)
            }
        }
        JustifyContent::SpaceAround => (free_space / n as f32 / 2.0, free_space / n as f32),
        JustifyContent::SpaceEvenly => (free_space / (n + 1) as f32, free_space / (n + 1) as f32),
    }
}

/// `align-content` distribution across lines (spec §4.2 step 5); `Stretch`
/// is handled by the caller growing each line's cross size instead of
/// offsetting it.
fn align_content_offsets(align: AlignContent, n: usize, free_space: f32) -> (f32, f32) {
    match align {
        AlignContent::Start | AlignContent::Stretch => (0.0, 0.0),
        AlignContent::End => (free_space, 0.0),
        AlignContent::Center => (free_space / 2.0, 0.0),
        AlignContent::SpaceBetween => {
            if n > 1 {
                (0.0, free_space / (n - 1) as f32)
            } else {
                (0.0, 0.0)
            }
        }
        AlignContent::SpaceAround => (free_space / n as f32 / 2.0, free_space / n as f32),
    }
}

/// Computes `x, y, width, height` for one flex container's direct in-flow
/// children (spec §4.2). Absolutely/fixed-positioned children are left to
/// [`crate::normal_flow::compute_layout`]. Returns
/// [`LayoutError::NotAContainer`] if `container_id`'s `display` is not a
/// flex kind.
pub fn compute_flexbox_layout(
    tree: &NodeTree,
    style: &StyleTable,
    layout: &mut LayoutTable,
    container_id: NodeId,
) -> Result<(), LayoutError> {
    if !style.display(container_id).is_flex_container() {
        return Err(LayoutError::NotAContainer(container_id));
    }

    let fc = style.flex_container(container_id);
    let dir = fc.flex_direction;
    let container_g = layout.geometry(container_id);
    let container_padding = style.padding(container_id);

    let main_size = if dir.is_row() { container_g.content_width } else { container_g.content_height };
    let cross_size = if dir.is_row() { container_g.content_height } else { container_g.content_width };

    let items = build_items(tree, style, layout, container_id, dir);
    if items.is_empty() {
        #[cfg(feature = "logging")]
        log::trace!("flex container {:?} has no in-flow children", container_id);
        return Ok(());
    }

    let mut lines = collect_lines(items, fc.flex_wrap, dir, main_size);
    #[cfg(feature = "logging")]
    if lines.len() > 1 {
        log::debug!("flex container {:?} wrapped into {} lines", container_id, lines.len());
    }

    for line in lines.iter_mut() {
        resolve_flexible_lengths(line, dir, main_size);

        let used_main: f32 = line.iter().map(|i| outer_main(i, dir)).sum();
        let remaining = main_size - used_main;
        let (lead, gap) = justify_offsets(fc.justify_content, line.len(), remaining);
        let mut cursor = lead;
        for item in line.iter_mut() {
            item.main_offset = cursor + sides_main_start(item.margin, dir);
            cursor += outer_main(item, dir) + gap;
        }
    }

    // Cross size per line (spec §4.2 step 4/5): a single nowrap line fills
    // the container's cross size; wrapped lines size to their tallest item.
    let single_line = lines.len() == 1;
    let mut line_cross_sizes: Vec<f32> = lines
        .iter()
        .map(|line| {
            if single_line {
                cross_size
            } else {
                line.iter()
                    .map(|i| i.cross + sides_cross(i.margin, dir))
                    .fold(0.0_f32, f32::max)
            }
        })
        .collect();

    if fc.align_content == AlignContent::Stretch && !single_line {
        let total: f32 = line_cross_sizes.iter().sum();
        let remaining = cross_size - total;
        if remaining > 0.0 {
            let add = remaining / line_cross_sizes.len() as f32;
            for size in line_cross_sizes.iter_mut() {
                *size += add;
            }
        }
    }

    let total_cross: f32 = line_cross_sizes.iter().sum();
    let cross_free = cross_size - total_cross;
    let (lead, gap) = align_content_offsets(fc.align_content, lines.len(), cross_free);
    let mut line_cursor = lead;
    let mut line_cross_offsets = Vec::with_capacity(lines.len());
    for &line_size in line_cross_sizes.iter() {
        line_cross_offsets.push(line_cursor);
        line_cursor += line_size + gap;
    }

    for (line, line_cross) in lines.iter_mut().zip(line_cross_sizes.iter()) {
        for item in line.iter_mut() {
            let align = item.align_self.unwrap_or(fc.align_items);
            let outer_cross = item.cross + sides_cross(item.margin, dir);
            match align {
                AlignItems::Start | AlignItems::Baseline => {
                    item.cross_offset = sides_cross_start(item.margin, dir);
                }
                AlignItems::End => {
                    item.cross_offset = line_cross - outer_cross + sides_cross_start(item.margin, dir);
                }
                AlignItems::Center => {
                    item.cross_offset = (line_cross - outer_cross) / 2.0 + sides_cross_start(item.margin, dir);
                }
                AlignItems::Stretch => {
                    let mut stretched = line_cross - sides_cross(item.margin, dir);
                    if let Some(min) = item.min_cross {
                        stretched = stretched.max(min);
                    }
                    if let Some(max) = item.max_cross {
                        stretched = stretched.min(max);
                    }
                    item.target_cross = stretched.max(0.0);
                    item.cross_offset = sides_cross_start(item.margin, dir);
                }
            }
        }
    }

    for (line, &line_cross_offset) in lines.iter().zip(line_cross_offsets.iter()) {
        for item in line.iter() {
            let main_start = if dir.is_row() {
                container_g.x + container_padding.left
            } else {
                container_g.y + container_padding.top
            };
            let cross_start = if dir.is_row() {
                container_g.y + container_padding.top
            } else {
                container_g.x + container_padding.left
            };

            let main = main_start + item.main_offset;
            let cross = cross_start + line_cross_offset + item.cross_offset;

            let (x, y, width, height) = if dir.is_row() {
                (main, cross, item.target_main, item.target_cross)
            } else {
                (cross, main, item.target_cross, item.target_main)
            };

            let content_width = (width - item.padding.left - item.padding.right).max(0.0);
            let content_height = (height - item.padding.top - item.padding.bottom).max(0.0);

            layout.set_geometry(item.id, Geometry { x, y, width, height, content_width, content_height });
            layout.clear_dirty(item.id);
            #[cfg(feature = "logging")]
            log::trace!("flex item {:?} placed at ({}, {})", item.id, x, y);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AlignItems, AutoValue, FlexContainerStyle, JustifyContent, Position, SizeConstraints};

    fn container_with_children(n: usize) -> (NodeTree, StyleTable, LayoutTable, NodeId) {
        let mut tree = NodeTree::new();
        let container = tree.push();
        for _ in 0..n {
            let child = tree.push();
            tree.append_child(container, child);
        }
        let mut style = StyleTable::new();
        style.resize(1 + n);
        let mut layout = LayoutTable::new();
        layout.resize(1 + n);
        (tree, style, layout, container)
    }

    #[test]
    fn not_a_container_is_rejected() {
        let (tree, style, mut layout, container) = container_with_children(0);
        let err = compute_flexbox_layout(&tree, &style, &mut layout, container).unwrap_err();
        assert_eq!(err, LayoutError::NotAContainer(container));
    }

    #[test]
    fn zero_children_completes_without_error() {
        let (tree, mut style, mut layout, container) = container_with_children(0);
        style.set_display(container, Display::Flex);
        assert!(compute_flexbox_layout(&tree, &style, &mut layout, container).is_ok());
    }

    /// Scenario S3 (spec §8): row, space-between, center, 3 fixed children.
    #[test]
    fn row_space_between_center_matches_scenario() {
        let (tree, mut style, mut layout, container) = container_with_children(3);
        style.set_display(container, Display::Flex);
        style.set_flex_container(container, FlexContainerStyle {
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            ..Default::default()
        });
        layout.set_geometry(container, Geometry {
            x: 0.0, y: 0.0, width: 600.0, height: 100.0, content_width: 600.0, content_height: 100.0,
        });

        for i in 0..3 {
            let child = NodeId::new(i as u32 + 2);
            style.set_size(child, SizeConstraints { width: AutoValue::px(100.0), height: AutoValue::px(40.0), ..Default::default() });
        }

        compute_flexbox_layout(&tree, &style, &mut layout, container).unwrap();

        let xs: Vec<f32> = (0..3).map(|i| layout.geometry(NodeId::new(i + 2)).x).collect();
        assert_eq!(xs, vec![0.0, 250.0, 500.0]);
        for i in 0..3 {
            assert_eq!(layout.geometry(NodeId::new(i + 2)).y, 30.0);
        }
    }

    #[test]
    fn stretch_fills_cross_axis_single_line() {
        let (tree, mut style, mut layout, container) = container_with_children(1);
        style.set_display(container, Display::Flex);
        layout.set_geometry(container, Geometry {
            x: 0.0, y: 0.0, width: 200.0, height: 80.0, content_width: 200.0, content_height: 80.0,
        });
        let child = NodeId::new(2);
        style.set_size(child, SizeConstraints { width: AutoValue::px(50.0), ..Default::default() });

        compute_flexbox_layout(&tree, &style, &mut layout, container).unwrap();
        assert_eq!(layout.geometry(child).height, 80.0);
    }

    #[test]
    fn absolute_children_are_skipped() {
        let (tree, mut style, mut layout, container) = container_with_children(1);
        style.set_display(container, Display::Flex);
        layout.set_geometry(container, Geometry { x: 0.0, y: 0.0, width: 100.0, height: 100.0, content_width: 100.0, content_height: 100.0 });
        let child = NodeId::new(2);
        style.set_position(child, Position::Absolute);
        compute_flexbox_layout(&tree, &style, &mut layout, container).unwrap();
        assert_eq!(layout.geometry(child), Geometry::default());
    }
}
