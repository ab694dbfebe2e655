//! Integer geometric primitives: Point, Size, Rect, Padding.
//!
//! All arithmetic that can reach the unbounded sentinel ([`Size::UNBOUNDED`])
//! saturates instead of wrapping.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Swap the x and y coordinates.
    #[must_use]
    pub const fn flip(self) -> Self {
        Self::new(self.y, self.x)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// A 2D size with width and height.
///
/// A proposed size of zero on an axis means "unconstrained on that axis"; see
/// [`Size::zero_to_unbounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// The unbounded constraint on both axes.
    pub const UNBOUNDED: Self = Self {
        width: i32::MAX,
        height: i32::MAX,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero or negative.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Swap width and height.
    #[must_use]
    pub const fn flip(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Swap width and height when `condition` holds.
    #[must_use]
    pub const fn flip_if(self, condition: bool) -> Self {
        if condition {
            self.flip()
        } else {
            self
        }
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Replace zero components with `i32::MAX`.
    #[must_use]
    pub const fn zero_to_unbounded(self) -> Self {
        Self::new(
            if self.width == 0 { i32::MAX } else { self.width },
            if self.height == 0 { i32::MAX } else { self.height },
        )
    }

    /// Clamp negative components to zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self::new(self.width.max(0), self.height.max(0))
    }

    /// Apply minimum/maximum limits. A zero maximum component means "no limit".
    /// The minimum wins when the two conflict.
    #[must_use]
    pub fn constrain(self, min: Self, max: Self) -> Self {
        let mut size = self;
        if max.width > 0 {
            size.width = size.width.min(max.width);
        }
        if max.height > 0 {
            size.height = size.height.min(max.height);
        }
        size.union(min)
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.width.saturating_add(rhs.width),
            self.height.saturating_add(rhs.height),
        )
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            self.width.saturating_sub(rhs.width),
            self.height.saturating_sub(rhs.height),
        )
    }
}

/// Interior or exterior insets of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Padding {
    /// Left inset
    pub left: i32,
    /// Top inset
    pub top: i32,
    /// Right inset
    pub right: i32,
    /// Bottom inset
    pub bottom: i32,
}

impl Padding {
    /// No padding.
    pub const ZERO: Self = Self::all(0);

    /// Create padding from four sides.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same inset on all four sides.
    #[must_use]
    pub const fn all(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Left plus right.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Top plus bottom.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Total inset as a size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.horizontal(), self.vertical())
    }

    /// Exchange the horizontal and vertical sides (left with top, right with bottom).
    #[must_use]
    pub const fn flip(self) -> Self {
        Self::new(self.top, self.left, self.bottom, self.right)
    }

    /// Clamp negative sides to zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self::new(
            self.left.max(0),
            self.top.max(0),
            self.right.max(0),
            self.bottom.max(0),
        )
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: i32,
    /// Y position of top-left corner
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from a location and a size.
    #[must_use]
    pub const fn from_parts(location: Point, size: Size) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    /// Create from size at origin.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// True when either dimension is zero or negative.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Copy with a different location.
    #[must_use]
    pub const fn with_location(self, location: Point) -> Self {
        Self::from_parts(location, self.size())
    }

    /// Copy with a different size.
    #[must_use]
    pub const fn with_size(self, size: Size) -> Self {
        Self::from_parts(self.location(), size)
    }

    /// Translate by an offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Check if a point is inside (right and bottom edges exclusive).
    #[must_use]
    pub const fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check if `other` lies entirely within this rectangle.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if two rectangles share any area.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// The overlapping area, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// The smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Grow outward by `padding` (used to add a margin around bounds).
    #[must_use]
    pub const fn inflate(self, padding: Padding) -> Self {
        Self::new(
            self.x - padding.left,
            self.y - padding.top,
            self.width.saturating_add(padding.horizontal()),
            self.height.saturating_add(padding.vertical()),
        )
    }

    /// Shrink inward by `padding` (used to derive a display rectangle).
    #[must_use]
    pub const fn deflate(self, padding: Padding) -> Self {
        Self::new(
            self.x + padding.left,
            self.y + padding.top,
            self.width.saturating_sub(padding.horizontal()),
            self.height.saturating_sub(padding.vertical()),
        )
    }

    /// Swap the axes of location and size.
    #[must_use]
    pub const fn flip(self) -> Self {
        Self::new(self.y, self.x, self.height, self.width)
    }

    /// Swap the axes when `condition` holds.
    #[must_use]
    pub const fn flip_if(self, condition: bool) -> Self {
        if condition {
            self.flip()
        } else {
            self
        }
    }

    /// Clamp width and height to be non-negative.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self::new(self.x, self.y, self.width.max(0), self.height.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.location(), Point::new(10, 20));
        assert_eq!(r.size(), Size::new(30, 40));
    }

    #[test]
    fn test_rect_right_saturates_at_unbounded() {
        let r = Rect::new(10, 0, i32::MAX, 5);
        assert_eq!(r.right(), i32::MAX);
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersection(&Rect::new(10, 0, 5, 5)), None);
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 5, 5, 20);
        assert_eq!(a.union(&b), Rect::new(0, 0, 25, 25));
    }

    #[test]
    fn test_inflate_deflate_padding() {
        let p = Padding::new(1, 2, 3, 4);
        let r = Rect::new(10, 10, 100, 50);
        assert_eq!(r.deflate(p), Rect::new(11, 12, 96, 44));
        assert_eq!(r.deflate(p).inflate(p), r);
    }

    #[test]
    fn test_flip() {
        assert_eq!(Rect::new(1, 2, 3, 4).flip(), Rect::new(2, 1, 4, 3));
        assert_eq!(Padding::new(1, 2, 3, 4).flip(), Padding::new(2, 1, 4, 3));
        assert_eq!(Size::new(5, 6).flip_if(false), Size::new(5, 6));
    }

    #[test]
    fn test_zero_to_unbounded() {
        assert_eq!(Size::new(0, 7).zero_to_unbounded(), Size::new(i32::MAX, 7));
        assert_eq!(Size::ZERO.zero_to_unbounded(), Size::UNBOUNDED);
    }

    #[test]
    fn test_constrain_zero_max_is_unlimited() {
        let s = Size::new(500, 500);
        assert_eq!(s.constrain(Size::ZERO, Size::ZERO), s);
        assert_eq!(
            s.constrain(Size::ZERO, Size::new(100, 0)),
            Size::new(100, 500)
        );
        // minimum wins over a smaller maximum
        assert_eq!(
            Size::new(10, 10).constrain(Size::new(50, 0), Size::new(20, 0)),
            Size::new(50, 10)
        );
    }

    #[test]
    fn test_size_add_saturates() {
        assert_eq!(Size::UNBOUNDED + Size::new(1, 1), Size::UNBOUNDED);
    }

    proptest! {
        #[test]
        fn prop_flip_is_involution(x in -1000i32..1000, y in -1000i32..1000, w in 0i32..1000, h in 0i32..1000) {
            let r = Rect::new(x, y, w, h);
            prop_assert_eq!(r.flip().flip(), r);
        }

        #[test]
        fn prop_union_contains_both(
            ax in -500i32..500, ay in -500i32..500, aw in 0i32..500, ah in 0i32..500,
            bx in -500i32..500, by in -500i32..500, bw in 0i32..500, bh in 0i32..500,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            let u = a.union(&b);
            prop_assert!(u.contains(&a));
            prop_assert!(u.contains(&b));
        }

        #[test]
        fn prop_intersection_is_inside_both(
            ax in -500i32..500, ay in -500i32..500, aw in 1i32..500, ah in 1i32..500,
            bx in -500i32..500, by in -500i32..500, bw in 1i32..500, bh in 1i32..500,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            if let Some(i) = a.intersection(&b) {
                prop_assert!(a.contains(&i));
                prop_assert!(b.contains(&i));
                prop_assert!(i.width > 0 && i.height > 0);
            }
        }
    }
}
