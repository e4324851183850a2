//! Collision categories
//!
//! Every body carries three masks:
//! - `category`: what the body is
//! - `contact`: which categories raise a contact-begin notification
//! - `collision`: which categories it physically bounces off
//!
//! World edges other than the bottom are unclassified and carry
//! `CategoryMask::ALL`, so anything that collides with "something" collides
//! with them too.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// The four disjoint collision categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Ball,
    Bumper,
    Flipper,
    Bottom,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Ball,
        Category::Bumper,
        Category::Flipper,
        Category::Bottom,
    ];

    #[inline]
    pub const fn bit(self) -> u32 {
        match self {
            Category::Ball => 1 << 0,
            Category::Bumper => 1 << 1,
            Category::Flipper => 1 << 2,
            Category::Bottom => 1 << 3,
        }
    }

    #[inline]
    pub const fn mask(self) -> CategoryMask {
        CategoryMask(self.bit())
    }
}

/// A set of categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryMask(u32);

impl CategoryMask {
    pub const NONE: CategoryMask = CategoryMask(0);
    /// Member of every category (unclassified bodies such as side walls)
    pub const ALL: CategoryMask = CategoryMask(u32::MAX);

    pub const BALL: CategoryMask = Category::Ball.mask();
    pub const BUMPER: CategoryMask = Category::Bumper.mask();
    pub const FLIPPER: CategoryMask = Category::Flipper.mask();
    pub const BOTTOM: CategoryMask = Category::Bottom.mask();

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        CategoryMask(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn union(self, other: CategoryMask) -> Self {
        CategoryMask(self.0 | other.0)
    }

    #[inline]
    pub const fn intersects(self, other: CategoryMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Category> for CategoryMask {
    fn from(category: Category) -> Self {
        category.mask()
    }
}

impl BitOr for CategoryMask {
    type Output = CategoryMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOr<Category> for CategoryMask {
    type Output = CategoryMask;

    fn bitor(self, rhs: Category) -> Self::Output {
        self.union(rhs.mask())
    }
}

impl BitOr for Category {
    type Output = CategoryMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.mask().union(rhs.mask())
    }
}

impl BitOrAssign for CategoryMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CategoryMask {
    type Output = CategoryMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        CategoryMask(self.0 & rhs.0)
    }
}

/// Category/contact/collision masks of one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyFilter {
    pub category: CategoryMask,
    pub contact: CategoryMask,
    pub collision: CategoryMask,
}

impl BodyFilter {
    /// A body that bounces off everything and reports nothing
    pub const fn passive(category: CategoryMask) -> Self {
        Self {
            category,
            contact: CategoryMask::NONE,
            collision: CategoryMask::ALL,
        }
    }

    /// Ball: reports bumpers and the bottom edge, bounces off bumpers,
    /// flippers, the bottom edge and (via their ALL category) the side walls
    pub const fn ball() -> Self {
        Self {
            category: CategoryMask::BALL,
            contact: CategoryMask::BUMPER.union(CategoryMask::BOTTOM),
            collision: CategoryMask::BUMPER
                .union(CategoryMask::FLIPPER)
                .union(CategoryMask::BOTTOM),
        }
    }

    pub const fn bumper() -> Self {
        Self::passive(CategoryMask::BUMPER)
    }

    pub const fn flipper() -> Self {
        Self::passive(CategoryMask::FLIPPER)
    }

    pub const fn bottom_edge() -> Self {
        Self::passive(CategoryMask::BOTTOM)
    }

    pub const fn side_edge() -> Self {
        Self::passive(CategoryMask::ALL)
    }

    /// Whether a contact between the two bodies raises a notification
    pub fn reports_contact_with(&self, other: &BodyFilter) -> bool {
        self.contact.intersects(other.category) || other.contact.intersects(self.category)
    }

    /// Whether the two bodies physically repel each other
    pub fn collides_with(&self, other: &BodyFilter) -> bool {
        self.collision.intersects(other.category) || other.collision.intersects(self.category)
    }
}

/// Pairwise notification table for the four categories
///
/// Entry `(a, b, true)` means a body of category `a` touching a body of
/// category `b` raises a contact-begin event under the default filters.
pub fn contact_table() -> Vec<(Category, Category, bool)> {
    let filter_of = |c: Category| match c {
        Category::Ball => BodyFilter::ball(),
        Category::Bumper => BodyFilter::bumper(),
        Category::Flipper => BodyFilter::flipper(),
        Category::Bottom => BodyFilter::bottom_edge(),
    };
    let mut table = Vec::with_capacity(16);
    for a in Category::ALL {
        for b in Category::ALL {
            table.push((a, b, filter_of(a).reports_contact_with(&filter_of(b))));
        }
    }
    table
}
