//! Classification dictionary: one `[a-z0-9]` character to one classification name.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::FlexError;

const DEFAULT_ENTRIES: [(char, &str); 36] = [
    ('a', "alert"),
    ('b', "blue"),
    ('c', "caution"),
    ('d', "danger"),
    ('e', "error"),
    ('f', "framed"),
    ('g', "green"),
    ('h', "horizontal"),
    ('i', "info"),
    ('j', "jumbo"),
    ('k', "kindle"),
    ('l', "lokum"),
    ('m', "menu"),
    ('n', "note"),
    ('o', "ordinary"),
    ('p', "pack"),
    ('q', "quantity"),
    ('r', "red"),
    ('s', "success"),
    ('t', "tip"),
    ('u', "unified"),
    ('v', "verticle"),
    ('w', "warning"),
    ('x', "xray"),
    ('y', "yellow"),
    ('z', "zigzag"),
    ('0', "type-0"),
    ('1', "type-1"),
    ('2', "type-2"),
    ('3', "type-3"),
    ('4', "type-4"),
    ('5', "type-5"),
    ('6', "type-6"),
    ('7', "type-7"),
    ('8', "type-8"),
    ('9', "type-9"),
];

static BUILT_IN: Lazy<Dictionary> = Lazy::new(|| Dictionary {
    entries: DEFAULT_ENTRIES
        .iter()
        .map(|(key, name)| (*key, (*name).to_string()))
        .collect(),
});

/// Whether `key` may appear in a dictionary.
pub fn is_valid_key(key: char) -> bool {
    key.is_ascii_lowercase() || key.is_ascii_digit()
}

/// Immutable character-to-classification mapping.
///
/// Entries with an empty name are kept but treated as unmapped, so an override
/// can switch a built-in character off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    entries: BTreeMap<char, String>,
}

impl Dictionary {
    /// The built-in dictionary.
    pub fn built_in() -> &'static Dictionary {
        &BUILT_IN
    }

    /// A dictionary without any mapped character.
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Merges `overrides` onto the built-in table, key by key.
    ///
    /// An empty override map yields the built-in table unchanged.
    pub fn with_overrides<I>(overrides: I) -> Result<Self, FlexError>
    where
        I: IntoIterator<Item = (char, String)>,
    {
        let mut dictionary = Self::built_in().clone();
        for (key, name) in overrides {
            if !is_valid_key(key) {
                return Err(FlexError::InvalidDictionaryKey(key.to_string()));
            }
            dictionary.entries.insert(key, name);
        }
        Ok(dictionary)
    }

    /// Same as [`Dictionary::with_overrides`] for string keys read from configuration.
    pub fn from_string_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, FlexError> {
        let mut parsed = Vec::with_capacity(overrides.len());
        for (key, name) in overrides {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if is_valid_key(ch) => parsed.push((ch, name.clone())),
                _ => return Err(FlexError::InvalidDictionaryKey(key.clone())),
            }
        }
        Self::with_overrides(parsed)
    }

    /// Classification mapped to `key`, `None` when absent or explicitly empty.
    pub fn get(&self, key: char) -> Option<&str> {
        self.entries
            .get(&key)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Whether `key` resolves to a classification.
    pub fn contains(&self, key: char) -> bool {
        self.get(key).is_some()
    }

    /// Mapped entries in key order, skipping unmapped ones.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.entries
            .iter()
            .filter(|(_, name)| !name.is_empty())
            .map(|(key, name)| (*key, name.as_str()))
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::built_in().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_covers_every_key() {
        let dictionary = Dictionary::built_in();
        for key in ('a'..='z').chain('0'..='9') {
            assert!(dictionary.contains(key), "missing {key}");
        }
        assert_eq!(dictionary.iter().count(), 36);
        assert_eq!(dictionary.get('w'), Some("warning"));
        assert_eq!(dictionary.get('7'), Some("type-7"));
        assert_eq!(dictionary.get('A'), None);
    }

    #[test]
    fn overrides_merge_per_key() {
        let dictionary = Dictionary::with_overrides([('s', "solid".to_string())]).unwrap();
        assert_eq!(dictionary.get('s'), Some("solid"));
        assert_eq!(dictionary.get('w'), Some("warning"));
        // The shared default stays untouched.
        assert_eq!(Dictionary::built_in().get('s'), Some("success"));
    }

    #[test]
    fn empty_override_unmaps_a_key() {
        let dictionary = Dictionary::with_overrides([('w', String::new())]).unwrap();
        assert_eq!(dictionary.get('w'), None);
        assert!(!dictionary.contains('w'));
        assert_eq!(dictionary.iter().count(), 35);
    }

    #[test]
    fn empty_dictionary_maps_nothing() {
        let dictionary = Dictionary::empty();
        assert_eq!(dictionary.iter().count(), 0);
        assert_eq!(dictionary.get('w'), None);
        assert!(!dictionary.contains('0'));
    }

    #[test]
    fn empty_override_map_keeps_defaults() {
        let dictionary = Dictionary::with_overrides(Vec::new()).unwrap();
        assert_eq!(&dictionary, Dictionary::built_in());
    }

    #[test]
    fn invalid_keys_are_rejected() {
        assert!(matches!(
            Dictionary::with_overrides([('A', "upper".to_string())]),
            Err(FlexError::InvalidDictionaryKey(key)) if key == "A"
        ));

        let mut overrides = BTreeMap::new();
        overrides.insert("ab".to_string(), "two".to_string());
        assert!(Dictionary::from_string_overrides(&overrides).is_err());

        let mut overrides = BTreeMap::new();
        overrides.insert("|".to_string(), "separator".to_string());
        assert!(Dictionary::from_string_overrides(&overrides).is_err());
    }

    #[test]
    fn string_overrides_parse_single_chars() {
        let mut overrides = BTreeMap::new();
        overrides.insert("s".to_string(), "solid".to_string());
        overrides.insert("0".to_string(), "zero".to_string());
        let dictionary = Dictionary::from_string_overrides(&overrides).unwrap();
        assert_eq!(dictionary.get('s'), Some("solid"));
        assert_eq!(dictionary.get('0'), Some("zero"));
    }
}
