// Box-score categories and the fixed per-category value container.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// The ten statistical categories a player's best skill is chosen from.
///
/// Declaration order is the canonical order: it drives CSV column lookup,
/// iteration in [`Category::ALL`], and arg-max tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "FG_PCT")]
    FieldGoalPct,
    #[serde(rename = "FG3_PCT")]
    ThreePointPct,
    #[serde(rename = "FT_PCT")]
    FreeThrowPct,
    #[serde(rename = "REB")]
    Rebounds,
    #[serde(rename = "AST")]
    Assists,
    #[serde(rename = "STL")]
    Steals,
    #[serde(rename = "BLK")]
    Blocks,
    #[serde(rename = "TOV")]
    Turnovers,
    #[serde(rename = "PF")]
    PersonalFouls,
    #[serde(rename = "PTS")]
    Points,
}

impl Category {
    /// Every category, in canonical order.
    pub const ALL: [Category; 10] = [
        Category::FieldGoalPct,
        Category::ThreePointPct,
        Category::FreeThrowPct,
        Category::Rebounds,
        Category::Assists,
        Category::Steals,
        Category::Blocks,
        Category::Turnovers,
        Category::PersonalFouls,
        Category::Points,
    ];

    /// The category code, which is also the CSV column header.
    pub fn code(&self) -> &'static str {
        match self {
            Category::FieldGoalPct => "FG_PCT",
            Category::ThreePointPct => "FG3_PCT",
            Category::FreeThrowPct => "FT_PCT",
            Category::Rebounds => "REB",
            Category::Assists => "AST",
            Category::Steals => "STL",
            Category::Blocks => "BLK",
            Category::Turnovers => "TOV",
            Category::PersonalFouls => "PF",
            Category::Points => "PTS",
        }
    }

    /// Parse a category code, ignoring case and surrounding whitespace.
    pub fn from_code(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Category::ALL.into_iter().find(|c| c.code() == upper)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One value per category, indexed by [`Category`].
///
/// Replaces by-name column access: a lookup is an array index, so a
/// category with no value is a `None` in the slot, never a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryValues<T> {
    values: [T; 10],
}

impl<T> CategoryValues<T> {
    /// Build a container by evaluating `f` once per category, in canonical order.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        CategoryValues {
            values: Category::ALL.map(&mut f),
        }
    }

    /// Iterate `(category, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.values.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> CategoryValues<U> {
        CategoryValues::from_fn(|c| f(c, &self.values[c.slot()]))
    }
}

impl<T> Index<Category> for CategoryValues<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.values[category.slot()]
    }
}

impl<T> IndexMut<Category> for CategoryValues<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.values[category.slot()]
    }
}
