//! Placeholder addresses that are never sent to the maps provider.

use std::collections::HashSet;

/// Placeholders rejected when no override is configured.
pub const DEFAULT_REJECTED_ADDRESSES: &[&str] = &[
    "khách sạn",
    "nhà hàng",
    "quán ăn",
    "quán cà phê",
    "chưa xác định",
    "tùy chọn",
    "tự do",
    "hotel",
    "restaurant",
    "cafe",
    "optional",
    "to be decided",
    "to be determined",
    "tbd",
    "n/a",
    "free time",
];

/// Case- and whitespace-insensitive set of placeholder addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRejectList {
    entries: HashSet<String>,
}

impl Default for AddressRejectList {
    fn default() -> Self {
        Self::new(DEFAULT_REJECTED_ADDRESSES.iter().copied())
    }
}

impl AddressRejectList {
    /// List rejecting exactly `entries`. Blank entries are ignored.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| canonical(entry.as_ref()))
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    /// Parse a comma-separated override.
    ///
    /// ```
    /// use waypoint::domain::geocoding::AddressRejectList;
    ///
    /// let list = AddressRejectList::from_csv("Hostel, somewhere ,,");
    /// assert!(list.is_rejected("  HOSTEL "));
    /// assert!(!list.is_rejected("hotel"));
    /// ```
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Whether `address` is blank or a known placeholder.
    pub fn is_rejected(&self, address: &str) -> bool {
        let key = canonical(address);
        key.is_empty() || self.entries.contains(&key)
    }

    /// Number of configured placeholders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no placeholders are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn canonical(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|ch: char| ch.is_ascii_punctuation() && ch != '/')
        .to_lowercase()
}
