use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free collection of profile identifiers.
///
/// Invariants:
/// - No identifier appears twice.
/// - Insertion order is preserved; re-inserting an existing identifier does
///   not move it (first-seen wins position).
///
/// Identifiers are accepted verbatim. No URI validation is performed.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ProfileSet {
    profiles: IndexSet<String>,
}

impl ProfileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `profile` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, profile: impl Into<String>) -> bool {
        self.profiles.insert(profile.into())
    }

    /// Append every profile not already present, keeping first-seen order.
    ///
    /// Returns how many identifiers were added.
    pub fn merge<I, S>(&mut self, profiles: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for profile in profiles {
            if self.insert(profile) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, profile: &str) -> bool {
        self.profiles.contains(profile)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.profiles.iter().cloned().collect()
    }
}

// Equality is order-sensitive, unlike `IndexSet`'s own set equality.
impl PartialEq for ProfileSet {
    fn eq(&self, other: &Self) -> bool {
        self.profiles.iter().eq(other.profiles.iter())
    }
}

impl From<Vec<String>> for ProfileSet {
    fn from(profiles: Vec<String>) -> Self {
        profiles.into_iter().collect()
    }
}

impl From<ProfileSet> for Vec<String> {
    fn from(set: ProfileSet) -> Self {
        set.profiles.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ProfileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.merge(iter);
        set
    }
}

impl<'a> IntoIterator for &'a ProfileSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}
