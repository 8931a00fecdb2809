//! Entity Cache Layer
//!
//! Session-lifetime keyed caches for resolved records and derived lookups.
//! No eviction and no expiry: upstream data is immutable for the session, so
//! a stored entry stays valid until the process exits. Writes are idempotent
//! (the same key always resolves to an equivalent record), which makes
//! concurrent duplicate writes from racing fetch completions safe.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::model::{DamageRelations, Language, PokemonDetail};

/// In-memory cache shared by the acquisition layer. Constructed once by the
/// composition root and passed by `Arc` to every consumer.
#[derive(Debug, Default)]
pub struct EntityCache {
    details: Mutex<HashMap<u32, PokemonDetail>>,
    relations: Mutex<HashMap<String, DamageRelations>>,
    ability_names: Mutex<HashMap<(String, Language), String>>,
    species_names: Mutex<HashMap<String, String>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detail(&self, id: u32) -> Option<PokemonDetail> {
        self.details.lock().unwrap().get(&id).cloned()
    }

    pub fn put_detail(&self, detail: PokemonDetail) {
        self.details.lock().unwrap().insert(detail.id, detail);
    }

    pub fn relations(&self, type_name: &str) -> Option<DamageRelations> {
        self.relations.lock().unwrap().get(type_name).cloned()
    }

    pub fn put_relations(&self, type_name: &str, relations: DamageRelations) {
        self.relations
            .lock()
            .unwrap()
            .insert(type_name.to_string(), relations);
    }

    /// Localized ability name, partitioned by language.
    pub fn ability_translation(&self, ability: &str, lang: Language) -> Option<String> {
        self.ability_names
            .lock()
            .unwrap()
            .get(&(ability.to_string(), lang))
            .cloned()
    }

    pub fn put_ability_translation(&self, ability: &str, lang: Language, translated: String) {
        self.ability_names
            .lock()
            .unwrap()
            .insert((ability.to_string(), lang), translated);
    }

    /// Display name keyed by species reference, used when localizing
    /// evolution trees.
    pub fn species_name(&self, raw: &str) -> Option<String> {
        self.species_names.lock().unwrap().get(raw).cloned()
    }

    pub fn put_species_name(&self, raw: &str, display: String) {
        self.species_names
            .lock()
            .unwrap()
            .insert(raw.to_string(), display);
    }

    pub fn detail_count(&self) -> usize {
        self.details.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Stats;

    fn make_detail(id: u32) -> PokemonDetail {
        PokemonDetail {
            id,
            name_fr: "Pikachu".to_string(),
            name_en: "Pikachu".to_string(),
            types: vec!["electric".to_string()],
            stats: Stats::default(),
            abilities: vec!["static".to_string()],
            generation: "I".to_string(),
            region: "Kanto".to_string(),
            height: 4,
            weight: 60,
            evolution_url: String::new(),
            description_fr: String::new(),
            description_en: String::new(),
            sprite_default: None,
            sprite_artwork: None,
        }
    }

    #[test]
    fn test_detail_roundtrip() {
        let cache = EntityCache::new();
        assert!(cache.detail(25).is_none());

        cache.put_detail(make_detail(25));
        assert_eq!(cache.detail(25).unwrap().id, 25);
        assert_eq!(cache.detail_count(), 1);
    }

    #[test]
    fn test_duplicate_write_is_idempotent() {
        let cache = EntityCache::new();
        cache.put_detail(make_detail(25));
        cache.put_detail(make_detail(25));
        assert_eq!(cache.detail_count(), 1);
    }

    #[test]
    fn test_ability_translation_partitioned_by_language() {
        let cache = EntityCache::new();
        cache.put_ability_translation("static", Language::Fr, "Statik".to_string());

        assert_eq!(
            cache.ability_translation("static", Language::Fr).as_deref(),
            Some("Statik")
        );
        assert!(cache.ability_translation("static", Language::En).is_none());
    }

    #[test]
    fn test_species_name_lookup() {
        let cache = EntityCache::new();
        assert!(cache.species_name("charmander").is_none());
        cache.put_species_name("charmander", "Salamèche".to_string());
        assert_eq!(
            cache.species_name("charmander").as_deref(),
            Some("Salamèche")
        );
    }
}
