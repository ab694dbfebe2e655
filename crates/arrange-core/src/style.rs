//! Per-element and per-container layout style values.
//!
//! Every enum here maps to a stable integer so that hosts handing us raw
//! values go through [`TryFrom<i32>`], which rejects out-of-range input with
//! [`LayoutError::InvalidEnumValue`].

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

macro_rules! int_enum {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stable integer value of this variant.
            #[must_use]
            pub const fn value(self) -> i32 {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = LayoutError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(LayoutError::InvalidEnumValue {
                        type_name: stringify!($name),
                        value,
                    }),
                }
            }
        }
    };
}

// =============================================================================
// Anchoring and docking
// =============================================================================

/// The container edges an element keeps a fixed distance from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorStyles {
    /// Anchored to the top edge
    pub top: bool,
    /// Anchored to the bottom edge
    pub bottom: bool,
    /// Anchored to the left edge
    pub left: bool,
    /// Anchored to the right edge
    pub right: bool,
}

impl AnchorStyles {
    /// Not anchored to any edge (centered on both axes).
    pub const NONE: Self = Self::new(false, false, false, false);
    /// Top edge only.
    pub const TOP: Self = Self::new(true, false, false, false);
    /// Bottom edge only.
    pub const BOTTOM: Self = Self::new(false, true, false, false);
    /// Left edge only.
    pub const LEFT: Self = Self::new(false, false, true, false);
    /// Right edge only.
    pub const RIGHT: Self = Self::new(false, false, false, true);
    /// The default anchoring.
    pub const TOP_LEFT: Self = Self::new(true, false, true, false);
    /// All four edges.
    pub const ALL: Self = Self::new(true, true, true, true);

    /// Create from the four edge flags.
    #[must_use]
    pub const fn new(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Edge-wise union.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self::new(
            self.top || other.top,
            self.bottom || other.bottom,
            self.left || other.left,
            self.right || other.right,
        )
    }

    /// True when every edge set in `other` is also set here.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.top || !other.top)
            && (self.bottom || !other.bottom)
            && (self.left || !other.left)
            && (self.right || !other.right)
    }

    /// Anchored both left and right.
    #[must_use]
    pub const fn stretches_horizontally(self) -> bool {
        self.left && self.right
    }

    /// Anchored both top and bottom.
    #[must_use]
    pub const fn stretches_vertically(self) -> bool {
        self.top && self.bottom
    }

    /// Anchored to neither left nor right.
    #[must_use]
    pub const fn is_horizontally_free(self) -> bool {
        !self.left && !self.right
    }

    /// Anchored to neither top nor bottom.
    #[must_use]
    pub const fn is_vertically_free(self) -> bool {
        !self.top && !self.bottom
    }

    /// Bitmask form: top = 1, bottom = 2, left = 4, right = 8.
    #[must_use]
    pub const fn bits(self) -> u8 {
        (self.top as u8) | (self.bottom as u8) << 1 | (self.left as u8) << 2 | (self.right as u8) << 3
    }
}

impl Default for AnchorStyles {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

impl BitOr for AnchorStyles {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.with(rhs)
    }
}

impl TryFrom<u8> for AnchorStyles {
    type Error = LayoutError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits > 0x0F {
            return Err(LayoutError::InvalidEnumValue {
                type_name: "AnchorStyles",
                value: i32::from(bits),
            });
        }
        Ok(Self::new(
            bits & 1 != 0,
            bits & 2 != 0,
            bits & 4 != 0,
            bits & 8 != 0,
        ))
    }
}

/// The edge (or fill area) a docked element claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockStyle {
    /// Not docked; anchoring applies
    #[default]
    None,
    /// Full-width strip along the top
    Top,
    /// Full-width strip along the bottom
    Bottom,
    /// Full-height strip along the left
    Left,
    /// Full-height strip along the right
    Right,
    /// Whatever area remains
    Fill,
}

int_enum!(DockStyle {
    None = 0,
    Top = 1,
    Bottom = 2,
    Left = 3,
    Right = 4,
    Fill = 5,
});

impl DockStyle {
    /// The anchor equivalent of a dock setting, used to align docked
    /// elements inside flow rows and table cells.
    #[must_use]
    pub const fn to_anchor(self) -> AnchorStyles {
        match self {
            Self::None => AnchorStyles::TOP_LEFT,
            Self::Top => AnchorStyles::new(true, false, true, true),
            Self::Bottom => AnchorStyles::new(false, true, true, true),
            Self::Left => AnchorStyles::new(true, true, true, false),
            Self::Right => AnchorStyles::new(true, true, false, true),
            Self::Fill => AnchorStyles::ALL,
        }
    }
}

impl FromStr for DockStyle {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "fill" => Ok(Self::Fill),
            _ => Err(LayoutError::UnknownName {
                type_name: "DockStyle",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Fill => "fill",
        };
        f.write_str(name)
    }
}

/// Which components of a bounds change were explicitly requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundsSpecified {
    /// X was requested
    pub x: bool,
    /// Y was requested
    pub y: bool,
    /// Width was requested
    pub width: bool,
    /// Height was requested
    pub height: bool,
}

impl BoundsSpecified {
    /// Engine-derived placement; nothing was requested.
    pub const NONE: Self = Self::new(false, false, false, false);
    /// Location only.
    pub const LOCATION: Self = Self::new(true, true, false, false);
    /// Size only.
    pub const SIZE: Self = Self::new(false, false, true, true);
    /// Everything.
    pub const ALL: Self = Self::new(true, true, true, true);

    /// Create from the four component flags.
    #[must_use]
    pub const fn new(x: bool, y: bool, width: bool, height: bool) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when no component was requested.
    #[must_use]
    pub const fn is_none(self) -> bool {
        !(self.x || self.y || self.width || self.height)
    }
}

impl BitOr for BoundsSpecified {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::new(
            self.x || rhs.x,
            self.y || rhs.y,
            self.width || rhs.width,
            self.height || rhs.height,
        )
    }
}

/// How an auto-sized element reacts when its preferred size shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSizeMode {
    /// Snap exactly to the preferred size
    GrowAndShrink,
    /// Grow to the preferred size, never shrink
    #[default]
    GrowOnly,
}

int_enum!(AutoSizeMode {
    GrowAndShrink = 0,
    GrowOnly = 1,
});

// =============================================================================
// Flow
// =============================================================================

/// Packing direction of a flow container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    /// Rows, filled left to right
    #[default]
    LeftToRight,
    /// Columns, filled top to bottom
    TopDown,
    /// Rows, filled right to left
    RightToLeft,
    /// Columns, filled bottom to top
    BottomUp,
}

int_enum!(FlowDirection {
    LeftToRight = 0,
    TopDown = 1,
    RightToLeft = 2,
    BottomUp = 3,
});

impl FlowDirection {
    /// True for the column-producing directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::TopDown | Self::BottomUp)
    }

    /// True for the directions that fill from the trailing edge.
    #[must_use]
    pub const fn is_mirrored(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomUp)
    }
}

impl FromStr for FlowDirection {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "lefttoright" => Ok(Self::LeftToRight),
            "topdown" => Ok(Self::TopDown),
            "righttoleft" => Ok(Self::RightToLeft),
            "bottomup" => Ok(Self::BottomUp),
            _ => Err(LayoutError::UnknownName {
                type_name: "FlowDirection",
                name: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// How a table row or column is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeType {
    /// Sized to its content
    #[default]
    AutoSize,
    /// Fixed pixel size
    Absolute,
    /// Share of the space left after absolute and auto strips
    Percent,
}

int_enum!(SizeType {
    AutoSize = 0,
    Absolute = 1,
    Percent = 2,
});

/// Sizing hint for one table row or column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TableStyle {
    /// Sizing mode
    pub size_type: SizeType,
    /// Pixels for [`SizeType::Absolute`], percentage for [`SizeType::Percent`]
    #[serde(default)]
    pub size: f32,
}

impl TableStyle {
    /// A strip sized to its content.
    #[must_use]
    pub const fn auto_size() -> Self {
        Self {
            size_type: SizeType::AutoSize,
            size: 0.0,
        }
    }

    /// A fixed-size strip.
    #[must_use]
    pub const fn absolute(pixels: f32) -> Self {
        Self {
            size_type: SizeType::Absolute,
            size: pixels,
        }
    }

    /// A strip taking `percent` of the free space.
    #[must_use]
    pub const fn percent(percent: f32) -> Self {
        Self {
            size_type: SizeType::Percent,
            size: percent,
        }
    }
}

/// How a table grows when more cells are needed than it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableGrowStyle {
    /// Never grow; placing too many children is an error
    FixedSize,
    /// Add rows, keeping the column count
    #[default]
    AddRows,
    /// Add columns, keeping the row count
    AddColumns,
}

int_enum!(TableGrowStyle {
    FixedSize = 0,
    AddRows = 1,
    AddColumns = 2,
});

/// Border drawn around and between table cells. Only its width matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellBorderStyle {
    /// No border
    #[default]
    None,
    /// Single line
    Single,
    /// Sunken
    Inset,
    /// Double sunken
    InsetDouble,
    /// Raised
    Outset,
    /// Double raised
    OutsetDouble,
    /// Raised, partial
    OutsetPartial,
}

int_enum!(CellBorderStyle {
    None = 0,
    Single = 1,
    Inset = 2,
    InsetDouble = 3,
    Outset = 4,
    OutsetDouble = 5,
    OutsetPartial = 6,
});

impl CellBorderStyle {
    /// Pixel width of one border line.
    #[must_use]
    pub const fn border_width(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Single => 1,
            Self::Inset | Self::Outset => 2,
            Self::InsetDouble | Self::OutsetDouble | Self::OutsetPartial => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dock_try_from_rejects_out_of_range() {
        assert_eq!(DockStyle::try_from(5), Ok(DockStyle::Fill));
        assert_eq!(
            DockStyle::try_from(6),
            Err(LayoutError::InvalidEnumValue {
                type_name: "DockStyle",
                value: 6
            })
        );
        assert!(DockStyle::try_from(-1).is_err());
    }

    #[test]
    fn test_int_enum_values_round_trip() {
        for &dir in FlowDirection::ALL {
            assert_eq!(FlowDirection::try_from(dir.value()), Ok(dir));
        }
        for &style in CellBorderStyle::ALL {
            assert_eq!(CellBorderStyle::try_from(style.value()), Ok(style));
        }
    }

    #[test]
    fn test_dock_to_anchor_table() {
        assert_eq!(DockStyle::None.to_anchor(), AnchorStyles::TOP_LEFT);
        assert_eq!(
            DockStyle::Top.to_anchor(),
            AnchorStyles::TOP | AnchorStyles::LEFT | AnchorStyles::RIGHT
        );
        assert!(DockStyle::Left.to_anchor().stretches_vertically());
        assert!(!DockStyle::Left.to_anchor().right);
        assert_eq!(DockStyle::Fill.to_anchor(), AnchorStyles::ALL);
    }

    #[test]
    fn test_dock_from_str() {
        assert_eq!("Fill".parse::<DockStyle>(), Ok(DockStyle::Fill));
        assert!("middle".parse::<DockStyle>().is_err());
        assert_eq!(DockStyle::Bottom.to_string(), "bottom");
    }

    #[test]
    fn test_flow_direction_from_str() {
        assert_eq!(
            "right-to-left".parse::<FlowDirection>(),
            Ok(FlowDirection::RightToLeft)
        );
        assert_eq!("TopDown".parse::<FlowDirection>(), Ok(FlowDirection::TopDown));
        assert!(FlowDirection::BottomUp.is_vertical());
        assert!(FlowDirection::BottomUp.is_mirrored());
        assert!(!FlowDirection::TopDown.is_mirrored());
    }

    #[test]
    fn test_anchor_bits_round_trip() {
        let a = AnchorStyles::BOTTOM | AnchorStyles::RIGHT;
        assert_eq!(a.bits(), 0b1010);
        assert_eq!(AnchorStyles::try_from(a.bits()), Ok(a));
        assert!(AnchorStyles::try_from(0x10).is_err());
    }

    #[test]
    fn test_anchor_contains() {
        assert!(AnchorStyles::ALL.contains(AnchorStyles::TOP_LEFT));
        assert!(!AnchorStyles::TOP.contains(AnchorStyles::TOP_LEFT));
        assert!(AnchorStyles::NONE.is_horizontally_free());
    }

    #[test]
    fn test_border_widths() {
        assert_eq!(CellBorderStyle::None.border_width(), 0);
        assert_eq!(CellBorderStyle::Single.border_width(), 1);
        assert_eq!(CellBorderStyle::Outset.border_width(), 2);
        assert_eq!(CellBorderStyle::OutsetPartial.border_width(), 3);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AnchorStyles::default(), AnchorStyles::TOP_LEFT);
        assert_eq!(AutoSizeMode::default(), AutoSizeMode::GrowOnly);
        assert_eq!(TableGrowStyle::default(), TableGrowStyle::AddRows);
        assert!(BoundsSpecified::default().is_none());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&FlowDirection::RightToLeft).unwrap();
        assert_eq!(json, "\"right_to_left\"");
        let style: TableStyle =
            serde_json::from_str(r#"{"size_type":"percent","size":30.0}"#).unwrap();
        assert_eq!(style, TableStyle::percent(30.0));
    }
}
