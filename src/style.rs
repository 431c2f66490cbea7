//! The style table: a structure-of-arrays of resolved style *inputs* per
//! node id (spec §3). Fields are grouped into small `Copy` records (box
//! model, size constraints, flex/grid container inputs, ...) and each group
//! lives in its own `Vec`, indexed in lockstep by [`NodeId`] — the same
//! "array of small records instead of one giant record" split
//! `azul-layout`'s own `Style` struct does for `main_*`/`cross_*` accessors,
//! taken one level further so that passes touching only one group (e.g. the
//! grid engine never looks at border colors) don't drag unrelated fields
//! through cache.

use crate::node_tree::NodeId;

/// A value plus whether it should be treated as `auto` instead. Used for
/// position offsets (`top`/`right`/`bottom`/`left`) and for the six size
/// fields (spec §3: "each as (value: float, auto: bool)").
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AutoValue {
    pub value: f32,
    pub auto: bool,
}

impl AutoValue {
    pub const fn px(value: f32) -> Self {
        AutoValue { value, auto: false }
    }

    pub const AUTO: AutoValue = AutoValue { value: 0.0, auto: true };

    #[inline]
    pub fn resolved(self) -> Option<f32> {
        if self.auto {
            None
        } else {
            Some(self.value)
        }
    }
}

/// Unset (`..Default::default()`) means "no constraint," not "clamp to
/// exactly 0" — an explicit `AUTO`, not a zero `px`.
impl Default for AutoValue {
    fn default() -> Self {
        AutoValue::AUTO
    }
}

/// Four same-typed values, one per box side. Used for margin, padding,
/// border width, border style, border color and position offsets.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Sides<T> {
    pub fn uniform(v: T) -> Self {
        Sides { top: v, right: v, bottom: v, left: v }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Display {
    None,
    Block,
    Inline,
    InlineBlock,
    Table,
    TableCell,
    TableRow,
    Flex,
    InlineFlex,
    Grid,
    InlineGrid,
}

impl Default for Display {
    fn default() -> Self {
        Display::Block
    }
}

impl Display {
    pub fn is_flex_container(self) -> bool {
        matches!(self, Display::Flex | Display::InlineFlex)
    }

    pub fn is_grid_container(self) -> bool {
        matches!(self, Display::Grid | Display::InlineGrid)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Default for Position {
    fn default() -> Self {
        Position::Static
    }
}

impl Position {
    /// An "in-flow" node per the glossary: static or relative, handled by
    /// normal block flow rather than float placement or containing-block
    /// anchoring.
    #[inline]
    pub fn is_in_flow(self) -> bool {
        matches!(self, Position::Static | Position::Relative)
    }

    #[inline]
    pub fn establishes_containing_block(self) -> bool {
        !matches!(self, Position::Static)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Float {
    None,
    Left,
    Right,
}

impl Default for Float {
    fn default() -> Self {
        Float::None
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Clear {
    None,
    Left,
    Right,
    Both,
}

impl Default for Clear {
    fn default() -> Self {
        Clear::None
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Overflow {
    Visible,
    Hidden,
}

impl Default for Overflow {
    fn default() -> Self {
        Overflow::Visible
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    None,
    Solid,
    Dotted,
    Dashed,
}

impl Default for BorderStyle {
    fn default() -> Self {
        BorderStyle::None
    }
}

/// 8-bit-per-channel RGBA color, mirroring `azul_css::ColorU`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ColorU {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FlexDirection {
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl Default for FlexDirection {
    fn default() -> Self {
        FlexDirection::Row
    }
}

impl FlexDirection {
    #[inline]
    pub fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    #[inline]
    pub fn is_reverse(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FlexWrap {
    NoWrap,
    Wrap,
    WrapReverse,
}

impl Default for FlexWrap {
    fn default() -> Self {
        FlexWrap::NoWrap
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum JustifyContent {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl Default for JustifyContent {
    fn default() -> Self {
        JustifyContent::Start
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AlignItems {
    Start,
    End,
    Center,
    Stretch,
    Baseline,
}

impl Default for AlignItems {
    fn default() -> Self {
        AlignItems::Stretch
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AlignContent {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    Stretch,
}

impl Default for AlignContent {
    fn default() -> Self {
        AlignContent::Stretch
    }
}

/// The six intrinsic-size fields, each with its own auto flag (spec §3).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SizeConstraints {
    pub width: AutoValue,
    pub height: AutoValue,
    pub min_width: AutoValue,
    pub max_width: AutoValue,
    pub min_height: AutoValue,
    pub max_height: AutoValue,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Background {
    pub color: ColorU,
    pub has_background: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FlexContainerStyle {
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
}

/// Flex item inputs, read by the flexbox engine off the child's own style
/// record rather than the parent's container record.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlexItemStyle {
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: AutoValue,
    pub align_self: Option<AlignItems>,
}

impl Default for FlexItemStyle {
    fn default() -> Self {
        FlexItemStyle {
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: AutoValue::AUTO,
            align_self: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GridContainerStyle {
    pub grid_cols: u32,
    pub grid_rows: u32,
}

impl GridContainerStyle {
    pub fn clamped(self) -> Self {
        GridContainerStyle {
            grid_cols: self.grid_cols.max(1),
            grid_rows: self.grid_rows.max(1),
        }
    }
}

/// The style table proper: one parallel `Vec` per field group, all indexed
/// by the same [`NodeId`]. `resize`/`push` keep every group the same length.
#[derive(Debug, Default, Clone)]
pub struct StyleTable {
    display: Vec<Display>,
    position: Vec<Position>,
    offsets: Vec<Sides<AutoValue>>,
    z_index: Vec<i32>,
    float: Vec<Float>,
    clear: Vec<Clear>,
    margin: Vec<Sides<f32>>,
    padding: Vec<Sides<f32>>,
    border_width: Vec<Sides<f32>>,
    border_style: Vec<Sides<BorderStyle>>,
    border_color: Vec<Sides<ColorU>>,
    size: Vec<SizeConstraints>,
    background: Vec<Background>,
    visibility: Vec<bool>,
    overflow: Vec<Overflow>,
    flex_container: Vec<FlexContainerStyle>,
    flex_item: Vec<FlexItemStyle>,
    grid_container: Vec<GridContainerStyle>,
}

macro_rules! field_accessors {
    ($get:ident, $get_mut:ident, $set:ident, $field:ident, $ty:ty) => {
        #[inline]
        pub fn $get(&self, id: NodeId) -> $ty {
            self.$field.get(Self::index(id)).copied().unwrap_or_default()
        }

        #[inline]
        pub fn $get_mut(&mut self, id: NodeId) -> Option<&mut $ty> {
            self.$field.get_mut(Self::index(id))
        }

        /// Idempotent setter: out-of-range ids are a silent no-op (spec §7).
        /// Returns whether the value actually changed, so callers building
        /// a "set + mark dirty" wrapper can skip the dirty write on a no-op.
        #[inline]
        pub fn $set(&mut self, id: NodeId, value: $ty) -> bool {
            match self.$field.get_mut(Self::index(id)) {
                Some(slot) if *slot != value => {
                    *slot = value;
                    true
                }
                _ => false,
            }
        }
    };
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn index(id: NodeId) -> usize {
        (id.get() - 1) as usize
    }

    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    /// Resizes every field group to `n` entries, new entries getting their
    /// type's `Default` (spec §6: "Create/resize to N nodes; reset fields
    /// to defaults").
    pub fn resize(&mut self, n: usize) {
        self.display.resize(n, Display::default());
        self.position.resize(n, Position::default());
        self.offsets.resize(n, Sides::default());
        self.z_index.resize(n, 0);
        self.float.resize(n, Float::default());
        self.clear.resize(n, Clear::default());
        self.margin.resize(n, Sides::default());
        self.padding.resize(n, Sides::default());
        self.border_width.resize(n, Sides::default());
        self.border_style.resize(n, Sides::default());
        self.border_color.resize(n, Sides::default());
        self.size.resize(n, SizeConstraints::default());
        self.background.resize(n, Background::default());
        self.visibility.resize(n, true);
        self.overflow.resize(n, Overflow::default());
        self.flex_container.resize(n, FlexContainerStyle::default());
        self.flex_item.resize(n, FlexItemStyle::default());
        self.grid_container.resize(n, GridContainerStyle::default());
    }

    field_accessors!(display, display_mut, set_display, display, Display);
    field_accessors!(position, position_mut, set_position, position, Position);
    field_accessors!(offsets, offsets_mut, set_offsets, offsets, Sides<AutoValue>);
    field_accessors!(z_index, z_index_mut, set_z_index, z_index, i32);
    field_accessors!(float, float_mut, set_float, float, Float);
    field_accessors!(clear, clear_mut, set_clear, clear, Clear);
    field_accessors!(margin, margin_mut, set_margin, margin, Sides<f32>);
    field_accessors!(padding, padding_mut, set_padding, padding, Sides<f32>);
    field_accessors!(border_width, border_width_mut, set_border_width, border_width, Sides<f32>);
    field_accessors!(border_style, border_style_mut, set_border_style, border_style, Sides<BorderStyle>);
    field_accessors!(border_color, border_color_mut, set_border_color, border_color, Sides<ColorU>);
    field_accessors!(size, size_mut, set_size, size, SizeConstraints);
    field_accessors!(background, background_mut, set_background, background, Background);
    field_accessors!(visibility, visibility_mut, set_visibility, visibility, bool);
    field_accessors!(overflow, overflow_mut, set_overflow, overflow, Overflow);
    field_accessors!(flex_container, flex_container_mut, set_flex_container, flex_container, FlexContainerStyle);
    field_accessors!(flex_item, flex_item_mut, set_flex_item, flex_item, FlexItemStyle);

    /// Grid container setter clamps `cols`/`rows` to at least 1 (spec §3:
    /// "counts, >= 1") and logs when it had to.
    pub fn set_grid_container(&mut self, id: NodeId, value: GridContainerStyle) -> bool {
        let clamped = value.clamped();
        #[cfg(feature = "logging")]
        if clamped != value {
            log::warn!(
                "grid_cols/grid_rows on node {:?} clamped from ({}, {}) to ({}, {})",
                id, value.grid_cols, value.grid_rows, clamped.grid_cols, clamped.grid_rows
            );
        }
        match self.grid_container.get_mut(Self::index(id)) {
            Some(slot) if *slot != clamped => {
                *slot = clamped;
                true
            }
            _ => false,
        }
    }

    pub fn grid_container(&self, id: NodeId) -> GridContainerStyle {
        self.grid_container
            .get(Self::index(id))
            .copied()
            .unwrap_or_default()
            .clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_fills_defaults() {
        let mut t = StyleTable::new();
        t.resize(3);
        assert_eq!(t.len(), 3);
        assert_eq!(t.display(NodeId::new(1)), Display::Block);
        assert_eq!(t.visibility(NodeId::new(1)), true);
    }

    #[test]
    fn setters_are_idempotent_and_report_change() {
        let mut t = StyleTable::new();
        t.resize(1);
        let id = NodeId::new(1);
        assert!(t.set_display(id, Display::Flex));
        assert!(!t.set_display(id, Display::Flex));
        assert_eq!(t.display(id), Display::Flex);
    }

    #[test]
    fn out_of_range_setter_is_silent_no_op() {
        let mut t = StyleTable::new();
        t.resize(1);
        let bogus = NodeId::new(7);
        assert!(!t.set_display(bogus, Display::Flex));
        assert_eq!(t.display(bogus), Display::default());
    }

    /// An unset `min`/`max` must mean "no constraint," not "clamp to 0" —
    /// `SizeConstraints { width: px(100.0), ..Default::default() }` is the
    /// pattern the engines' own tests build size inputs with.
    #[test]
    fn unset_auto_value_is_auto_not_zero() {
        assert_eq!(AutoValue::default(), AutoValue::AUTO);
        assert_eq!(AutoValue::default().resolved(), None);

        let size = SizeConstraints { width: AutoValue::px(100.0), ..Default::default() };
        assert_eq!(size.max_width.resolved(), None);
        assert_eq!(size.min_width.resolved(), None);
    }

    #[test]
    fn grid_container_clamps_to_at_least_one() {
        let mut t = StyleTable::new();
        t.resize(1);
        let id = NodeId::new(1);
        t.set_grid_container(id, GridContainerStyle { grid_cols: 0, grid_rows: 0 });
        assert_eq!(t.grid_container(id), GridContainerStyle { grid_cols: 1, grid_rows: 1 });
    }
}
