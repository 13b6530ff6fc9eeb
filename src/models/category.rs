use serde::{Deserialize, Serialize};

/// A planning category on the dashboard.
///
/// The set is closed: milestones and weekly tasks are always filed under one
/// of these, and every resourcing table carries a column for each of them.
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Materials,
    Fabrication,
    Durability,
    ScaleUp,
    Operations,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Materials,
        Self::Fabrication,
        Self::Durability,
        Self::ScaleUp,
        Self::Operations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Materials => "Materials",
            Self::Fabrication => "Fabrication",
            Self::Durability => "Durability",
            Self::ScaleUp => "ScaleUp",
            Self::Operations => "Operations",
        }
    }

    /// Parse a category name. Matching ignores ASCII case so that URL paths
    /// like `/categories/scaleup` resolve.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The team members a dashboard tracks.
///
/// The roster is fixed for the lifetime of a process. Resourcing tables are
/// pre-populated with one row per roster member so renderers never need a
/// sparse lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    people: Vec<String>,
}

pub const DEFAULT_PEOPLE: [&str; 7] = [
    "Allison",
    "Christian",
    "Cyril",
    "Mike",
    "Ryszard",
    "SamL",
    "SamW",
];

impl Roster {
    /// Build a roster from names, trimming whitespace and dropping blanks and
    /// duplicates while keeping first-seen order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut people: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !people.iter().any(|p| p == name) {
                people.push(name.to_string());
            }
        }
        Self { people }
    }

    pub fn people(&self) -> &[String] {
        &self.people
    }

    pub fn contains(&self, name: &str) -> bool {
        self.people.iter().any(|p| p == name)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_PEOPLE)
    }
}
