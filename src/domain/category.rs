//! Sensitive information categories
//!
//! The eight shipped categories form a closed enum, but everything downstream of
//! detection (findings, targets, the requested [`CategorySet`]) is keyed by name so new
//! categories can be introduced through a custom rule library without a schema change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Built-in sensitive information categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Personal names (model-sourced)
    Person,
    /// Singapore NRIC / FIN identity numbers
    NricFin,
    /// Medical Council registration numbers
    McrNo,
    /// Email addresses
    Email,
    /// Local and international phone numbers
    Phone,
    /// Postal addresses (heuristic and model-sourced)
    Address,
    /// Dates of birth
    Date,
    /// Generic medical/insurance identifiers
    IdNumber,
}

impl Category {
    /// All built-in categories in canonical order
    pub const ALL: [Category; 8] = [
        Category::Person,
        Category::NricFin,
        Category::McrNo,
        Category::Email,
        Category::Phone,
        Category::Address,
        Category::Date,
        Category::IdNumber,
    ];

    /// Category name as used in configuration and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::NricFin => "NRIC/FIN",
            Self::McrNo => "MCR no.",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Address => "ADDRESS",
            Self::Date => "DATE",
            Self::IdNumber => "ID_NUMBER",
        }
    }

    /// Label drawn over the redacted region, e.g. `<PERSON>`
    pub fn label(&self) -> String {
        format_label(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// Wrap a category name into the rendered label form
pub fn format_label(name: &str) -> String {
    format!("<{name}>")
}

/// The set of category names a caller wants detected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<String>);

impl CategorySet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing all eight built-in categories
    pub fn all() -> Self {
        Category::ALL.iter().map(Category::as_str).collect()
    }

    /// Parse a comma-separated list such as `PERSON,EMAIL,MCR no.`
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn contains_category(&self, category: Category) -> bool {
        self.contains(category.as_str())
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Names that are neither a built-in category nor one of `extra_names`
    pub fn unrecognised<'a>(&'a self, extra_names: &[&str]) -> Vec<&'a str> {
        self.iter()
            .filter(|name| name.parse::<Category>().is_err() && !extra_names.contains(name))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
