/// Character and map registries: static key → descriptor tables loaded once
/// from JSON embedded at build time, read-only for the process lifetime.
/// Lookups never fail; a miss is an `Option::None`, and the `resolve`
/// helpers fall back rather than error because the game's content updates
/// outpace these tables.
use crate::Character;
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;

const CHARACTERS_JSON: &str = include_str!("../data/characters.json");
const MAPS_JSON: &str = include_str!("../data/maps.json");

#[derive(Debug, Deserialize, Clone)]
struct CharacterEntry {
    name: String,
    slug: String,
    emote: String,
}

/// Registry of playable characters, keyed by the backend's short key
/// (e.g. "BugsBunny"). Slug and name lookups are case-insensitive linear
/// scans; the table holds a few dozen entries.
#[derive(Debug, Clone)]
pub struct CharacterRegistry {
    characters: Vec<(String, Character)>,
}

impl Default for CharacterRegistry {
    fn default() -> Self {
        // The embedded table is part of the crate; a parse failure here is
        // a build defect, not a runtime condition.
        Self::from_json(CHARACTERS_JSON).unwrap_or(Self { characters: Vec::new() })
    }
}

impl CharacterRegistry {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, CharacterEntry> = serde_json::from_str(json)?;
        let mut characters: Vec<(String, Character)> = entries
            .into_iter()
            .map(|(key, e)| {
                (key, Character { name: e.name, slug: e.slug, emote: e.emote })
            })
            .collect();
        characters.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(Self { characters })
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn lookup_by_key(&self, key: &str) -> Option<&Character> {
        let key = key.trim();
        self.characters.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn lookup_by_slug(&self, slug: &str) -> Option<&Character> {
        let slug = slug.trim().to_lowercase();
        self.characters
            .iter()
            .map(|(_, c)| c)
            .find(|c| c.slug.to_lowercase() == slug)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&Character> {
        let name = name.trim().to_lowercase();
        self.characters
            .iter()
            .map(|(_, c)| c)
            .find(|c| c.name.to_lowercase() == name)
    }

    pub fn slug_from_name(&self, name: &str) -> Option<&str> {
        self.lookup_by_name(name).map(|c| c.slug.as_str())
    }

    pub fn emote_from_slug(&self, slug: &str) -> Option<&str> {
        self.lookup_by_slug(slug).map(|c| c.emote.as_str())
    }

    /// Slug lookup that never misses: unknown slugs yield a placeholder
    /// carrying the raw slug, mirroring the map fallback rule.
    pub fn resolve(&self, slug: &str) -> Character {
        match self.lookup_by_slug(slug) {
            Some(c) => c.clone(),
            None => {
                warn!("unknown character slug {slug:?}, using placeholder");
                Character {
                    name: slug.to_owned(),
                    slug: slug.to_owned(),
                    emote: String::new(),
                }
            }
        }
    }
}

/// Flat map-key → display-name table.
#[derive(Debug, Clone)]
pub struct MapRegistry {
    maps: HashMap<String, String>,
}

impl Default for MapRegistry {
    fn default() -> Self {
        Self::from_json(MAPS_JSON).unwrap_or(Self { maps: HashMap::new() })
    }
}

impl MapRegistry {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self { maps: serde_json::from_str(json)? })
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.maps.get(key.trim()).map(String::as_str)
    }

    /// Display name for a map key, falling back to the raw key itself.
    /// New maps ship faster than this table updates.
    pub fn resolve(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(name) => name.to_owned(),
            None => {
                warn!("unknown map key {key:?}, passing it through");
                key.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_character_table_parses() {
        let registry = CharacterRegistry::default();
        assert!(registry.len() >= 20, "embedded table should be populated");
    }

    #[test]
    fn key_lookup_is_exact_but_trimmed() {
        let registry = CharacterRegistry::default();
        assert!(registry.lookup_by_key(" Batman ").is_some());
        assert!(registry.lookup_by_key("batman").is_none());
    }

    #[test]
    fn slug_lookup_is_case_insensitive_and_trimmed() {
        let registry = CharacterRegistry::default();
        let c = registry.lookup_by_slug("  CHARACTER_BATMAN ").expect("batman by slug");
        assert_eq!(c.name, "Batman");
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let registry = CharacterRegistry::default();
        let c = registry.lookup_by_name("harley quinn").expect("harley by name");
        assert_eq!(c.slug, "character_harleyquinn");
        assert_eq!(registry.slug_from_name("HARLEY QUINN"), Some("character_harleyquinn"));
    }

    #[test]
    fn misses_return_none_not_error() {
        let registry = CharacterRegistry::default();
        assert!(registry.lookup_by_slug("character_nobody").is_none());
        assert!(registry.lookup_by_name("Nobody").is_none());
        assert!(registry.emote_from_slug("character_nobody").is_none());
    }

    #[test]
    fn resolve_falls_back_to_placeholder() {
        let registry = CharacterRegistry::default();
        let c = registry.resolve("character_future_dlc");
        assert_eq!(c.slug, "character_future_dlc");
        assert_eq!(c.name, "character_future_dlc");
        assert!(c.emote.is_empty());
    }

    #[test]
    fn map_lookup_hits_and_misses() {
        let maps = MapRegistry::default();
        assert_eq!(maps.lookup("Map_BatCave"), Some("Batcave"));
        assert!(maps.lookup("Map_Arena1").is_none());
    }

    #[test]
    fn map_resolve_falls_back_to_raw_key() {
        let maps = MapRegistry::default();
        assert_eq!(maps.resolve("Map_TreeFort"), "Tree Fort");
        assert_eq!(maps.resolve("Map_Arena1"), "Map_Arena1");
    }
}
