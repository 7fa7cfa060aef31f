// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout props: the validated, typed form of a node's style bag.
//!
//! The engine never looks at a dynamic property map in the hot path; a
//! [`LayoutProps`] is resolved once (responsive maps collapsed, percentages
//! still symbolic) before a node enters [`crate::solve`].

use alloc::string::String;

/// A width/height/flex-basis value before resolution against a parent bound.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Size {
    /// An explicit non-negative cell count.
    Cells(i32),
    /// A percentage of the parent's inner (content-box) size, floored to cells.
    Percent(i32),
    /// Natural size, computed from content/children.
    Auto,
    /// The parent's full inner size on this axis.
    Full,
}

impl Default for Size {
    fn default() -> Self {
        Self::Auto
    }
}

impl Size {
    /// Parse the legacy string syntax (`"42"`, `"50%"`, `"auto"`, `"full"`).
    ///
    /// Returns `Err` with a deterministic detail string on unparseable input,
    /// matching the `INVALID_PROPS` error taxonomy.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if s.eq_ignore_ascii_case("full") {
            return Ok(Self::Full);
        }
        if let Some(pct) = s.strip_suffix('%') {
            return pct
                .parse::<i32>()
                .map(Self::Percent)
                .map_err(|_| alloc::format!("size: invalid percent literal {s:?}"));
        }
        s.parse::<i32>()
            .map(Self::Cells)
            .map_err(|_| alloc::format!("size: unparseable size {s:?}"))
    }

    /// Resolve to an absolute cell count given the parent's inner extent and
    /// this node's natural (intrinsic) size on the same axis.
    #[must_use]
    pub fn resolve(&self, parent_inner: i32, natural: i32) -> i32 {
        match *self {
            Self::Cells(n) => n.max(0),
            Self::Percent(p) => ((i64::from(parent_inner) * i64::from(p.max(0))) / 100) as i32,
            Self::Auto => natural.max(0),
            Self::Full => parent_inner.max(0),
        }
    }
}

/// Main-axis direction for a stack container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MainAxis {
    /// Children laid out left to right; main axis is width.
    Row,
    /// Children laid out top to bottom; main axis is height.
    Column,
}

/// Cross-axis alignment within a stack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Align to the start of the cross axis.
    #[default]
    Start,
    /// Center on the cross axis.
    Center,
    /// Align to the end of the cross axis.
    End,
    /// Stretch to fill the cross axis, forcing the cross size on children
    /// whose own cross constraint is unresolved.
    Stretch,
}

/// Main-axis distribution of leftover space within a stack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Justify {
    /// Pack children at the start.
    #[default]
    Start,
    /// Center the packed run of children.
    Center,
    /// Pack children at the end.
    End,
    /// Equal gaps strictly between children (none at the edges).
    Between,
    /// Equal gaps around each child, edges get half a gap.
    Around,
    /// Fully equal gaps, including the edges.
    Evenly,
}

/// Overflow handling for one axis of a container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Content may render outside the container; no clip metadata.
    #[default]
    Visible,
    /// Content is clipped to the container; no scroll offset is honored.
    Hidden,
    /// Content is clipped and `scrollX`/`scrollY` shift descendants.
    Scroll,
}

/// Border line style. `None` draws no border and consumes no cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BorderStyle {
    /// No border.
    #[default]
    None,
    /// Single-line box border.
    Single,
    /// Double-line box border.
    Double,
    /// Single-line border with rounded corners.
    Rounded,
    /// Heavy (bold) single-line border.
    Heavy,
    /// Dashed single-line border.
    Dashed,
    /// Dashed heavy-line border.
    HeavyDashed,
}

/// Per-side border suppression; `true` means the side is drawn (subject to
/// [`BorderStyle`] being active at all).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BorderSides {
    /// Top edge is drawn.
    pub top: bool,
    /// Right edge is drawn.
    pub right: bool,
    /// Bottom edge is drawn.
    pub bottom: bool,
    /// Left edge is drawn.
    pub left: bool,
}

impl Default for BorderSides {
    fn default() -> Self {
        Self { top: true, right: true, bottom: true, left: true }
    }
}

/// A node's border: style plus which sides are active.
///
/// An active side consumes exactly one cell in the layout box model; a
/// suppressed side consumes zero even when `style != None`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Border {
    /// Line style; `None` disables the border entirely.
    pub style: BorderStyle,
    /// Which sides participate, when `style != None`.
    pub sides: BorderSides,
}

impl Border {
    /// Cells consumed on the left/top edge pair `(left, top)`.
    #[must_use]
    pub const fn leading(&self) -> (i32, i32) {
        if matches!(self.style, BorderStyle::None) {
            return (0, 0);
        }
        (self.sides.left as i32, self.sides.top as i32)
    }

    /// Cells consumed on the right/bottom edge pair `(right, bottom)`.
    #[must_use]
    pub const fn trailing(&self) -> (i32, i32) {
        if matches!(self.style, BorderStyle::None) {
            return (0, 0);
        }
        (self.sides.right as i32, self.sides.bottom as i32)
    }
}

/// Non-negative per-side insets used for both margin and padding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeInsets {
    /// Top inset, in cells.
    pub top: i32,
    /// Right inset, in cells.
    pub right: i32,
    /// Bottom inset, in cells.
    pub bottom: i32,
    /// Left inset, in cells.
    pub left: i32,
}

impl EdgeInsets {
    /// Build insets from the `m`/`mx`/`my`/`mt`/`mr`/`mb`/`ml`-style shorthand
    /// precedence: per-side values override axis values, which override the
    /// uniform value.
    #[must_use]
    pub fn from_shorthand(
        all: Option<i32>,
        x: Option<i32>,
        y: Option<i32>,
        top: Option<i32>,
        right: Option<i32>,
        bottom: Option<i32>,
        left: Option<i32>,
    ) -> Self {
        let base = all.unwrap_or(0);
        let bx = x.unwrap_or(base);
        let by = y.unwrap_or(base);
        Self {
            top: top.unwrap_or(by),
            right: right.unwrap_or(bx),
            bottom: bottom.unwrap_or(by),
            left: left.unwrap_or(bx),
        }
    }

    /// Returns `true` if every side is non-negative.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.top >= 0 && self.right >= 0 && self.bottom >= 0 && self.left >= 0
    }

    /// Total horizontal inset (`left + right`).
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Total vertical inset (`top + bottom`).
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// Whether a node participates in normal flow or is positioned absolutely
/// against its parent's content rect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PositionMode {
    /// Participates in stack/grid flow.
    #[default]
    Static,
    /// Positioned against the parent content rect via [`AbsoluteInsets`],
    /// ignored by the flow solver entirely.
    Absolute,
}

/// `top`/`right`/`bottom`/`left` offsets for an absolutely positioned node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AbsoluteInsets {
    /// Offset from the parent content rect's top edge.
    pub top: Option<i32>,
    /// Offset from the parent content rect's right edge.
    pub right: Option<i32>,
    /// Offset from the parent content rect's bottom edge.
    pub bottom: Option<i32>,
    /// Offset from the parent content rect's left edge.
    pub left: Option<i32>,
}

/// 1-based explicit grid placement for a child of a grid container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridPlacement {
    /// 1-based explicit column, or `None` for auto-placement.
    pub column: Option<i32>,
    /// 1-based explicit row, or `None` for auto-placement.
    pub row: Option<i32>,
    /// Number of columns spanned, clamped to the remaining track count.
    pub col_span: i32,
    /// Number of rows spanned, clamped to the remaining track count.
    pub row_span: i32,
}

impl GridPlacement {
    /// A default placement: auto column/row, span 1x1.
    #[must_use]
    pub const fn auto() -> Self {
        Self { column: None, row: None, col_span: 1, row_span: 1 }
    }
}

/// A single grid track definition. Only fixed integer widths are supported at
/// the conformance level this engine targets; `Auto` tracks share the remainder
/// evenly via the same deterministic distribution routine as flex grow.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GridTrack {
    /// A fixed cell width/height.
    Fixed(i32),
    /// Shares the leftover space evenly with other `Auto` tracks.
    Auto,
}

/// The fully resolved, validated style bag for one layout node.
#[derive(Clone, Debug)]
pub struct LayoutProps {
    /// Width on the cross or main axis, depending on container orientation.
    pub width: Size,
    /// Height on the cross or main axis, depending on container orientation.
    pub height: Size,
    /// Minimum width, default 0.
    pub min_width: i32,
    /// Minimum height, default 0.
    pub min_height: i32,
    /// Maximum width, default `i32::MAX`.
    pub max_width: i32,
    /// Maximum height, default `i32::MAX`.
    pub max_height: i32,
    /// Flex grow weight; 0 means the node does not participate in growth.
    pub flex: u32,
    /// Flex shrink weight; 0 means the node never shrinks below its basis.
    pub flex_shrink: u32,
    /// Initial main-axis size before growth/shrink is applied.
    pub flex_basis: Option<Size>,
    /// Width/height ratio (`width / height`); used only when exactly one of
    /// width/height is otherwise unresolved.
    pub aspect_ratio: Option<f64>,
    /// Outer margin.
    pub margin: EdgeInsets,
    /// Inner padding.
    pub padding: EdgeInsets,
    /// Border style and active sides.
    pub border: Border,
    /// Gap between siblings (stack) or grid cells.
    pub gap: i32,
    /// Cross-axis alignment (stacks only).
    pub align: Align,
    /// Main-axis justification (stacks only).
    pub justify: Justify,
    /// Horizontal overflow handling.
    pub overflow_x: Overflow,
    /// Vertical overflow handling.
    pub overflow_y: Overflow,
    /// Requested horizontal scroll offset, clamped during layout.
    pub scroll_x: i32,
    /// Requested vertical scroll offset, clamped during layout.
    pub scroll_y: i32,
    /// Flow participation.
    pub position: PositionMode,
    /// Absolute offsets, consulted only when `position == Absolute`.
    pub absolute: AbsoluteInsets,
    /// Placement within a grid parent; ignored by stack parents.
    pub grid_placement: GridPlacement,
}

impl Default for LayoutProps {
    fn default() -> Self {
        Self {
            width: Size::Auto,
            height: Size::Auto,
            min_width: 0,
            min_height: 0,
            max_width: i32::MAX,
            max_height: i32::MAX,
            flex: 0,
            flex_shrink: 0,
            flex_basis: None,
            aspect_ratio: None,
            margin: EdgeInsets::default(),
            padding: EdgeInsets::default(),
            border: Border::default(),
            gap: 0,
            align: Align::default(),
            justify: Justify::default(),
            overflow_x: Overflow::default(),
            overflow_y: Overflow::default(),
            scroll_x: 0,
            scroll_y: 0,
            position: PositionMode::default(),
            absolute: AbsoluteInsets::default(),
            grid_placement: GridPlacement::auto(),
        }
    }
}

impl LayoutProps {
    /// Validate invariants that must fail the whole frame
    /// with `INVALID_PROPS` rather than silently clamping.
    pub fn validate(&self) -> Result<(), String> {
        if !self.margin.is_valid() {
            return Err(alloc::format!("margin: negative inset {:?}", self.margin));
        }
        if !self.padding.is_valid() {
            return Err(alloc::format!("padding: negative inset {:?}", self.padding));
        }
        if self.gap < 0 {
            return Err(alloc::format!("gap: negative value {}", self.gap));
        }
        if self.min_width < 0 || self.min_height < 0 {
            return Err(alloc::format!(
                "minWidth/minHeight: negative value ({}, {})",
                self.min_width,
                self.min_height
            ));
        }
        if self.max_width < self.min_width || self.max_height < self.min_height {
            return Err(String::from("max*: smaller than the corresponding min*"));
        }
        if let Some(ratio) = self.aspect_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(alloc::format!("aspectRatio: must be a positive finite real, got {ratio}"));
            }
        }
        if self.grid_placement.col_span < 1 || self.grid_placement.row_span < 1 {
            return Err(String::from("colSpan/rowSpan: must be >= 1"));
        }
        Ok(())
    }
}
