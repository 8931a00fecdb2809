//! Pokédex Data Model
//!
//! Core types shared by the acquisition layer, the filter engine and the
//! pagination loader. Remote wire shapes live in `core::api` and never leak
//! past it; everything here is the normalized session model.

use serde::{Deserialize, Serialize};

// ============================================================================
// Settings
// ============================================================================

/// Display language. Selects which localized name/description field is read;
/// filtering and ranking logic is otherwise language-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
}

impl Default for Language {
    fn default() -> Self {
        Language::Fr
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Fr => write!(f, "fr"),
            Language::En => write!(f, "en"),
        }
    }
}

/// Sprite rendering mode. Opaque to the engine; selects which image
/// reference a consumer reads off a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    Artwork,
    Legacy,
}

impl Default for ImageMode {
    fn default() -> Self {
        ImageMode::Artwork
    }
}

// ============================================================================
// Catalog Records
// ============================================================================

/// Lightweight catalog record. One per Pokémon, created by the bulk catalog
/// load and immutable for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u32,
    pub name_fr: String,
    pub name_en: String,
    /// Category tags (type names). Empty when the catalog came from the
    /// fallback listing source.
    pub types: Vec<String>,
    pub abilities_fr: Vec<String>,
    pub abilities_en: Vec<String>,
}

impl PokemonSummary {
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Fr => &self.name_fr,
            Language::En => &self.name_en,
        }
    }

    pub fn abilities(&self, lang: Language) -> &[String] {
        match lang {
            Language::Fr => &self.abilities_fr,
            Language::En => &self.abilities_en,
        }
    }
}

/// Six-stat block from the technical record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

/// Full record, merged from the technical and species resources. Stored in
/// the entity cache on first fetch and never invalidated within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name_fr: String,
    pub name_en: String,
    /// Ordered as the technical record lists them (slot order).
    pub types: Vec<String>,
    pub stats: Stats,
    /// Raw ability identifiers; localized on demand through the
    /// ability-translation cache.
    pub abilities: Vec<String>,
    pub generation: String,
    pub region: String,
    pub height: u32,
    pub weight: u32,
    pub evolution_url: String,
    pub description_fr: String,
    pub description_en: String,
    pub sprite_default: Option<String>,
    pub sprite_artwork: Option<String>,
}

impl PokemonDetail {
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Fr => &self.name_fr,
            Language::En => &self.name_en,
        }
    }

    pub fn description(&self, lang: Language) -> &str {
        match lang {
            Language::Fr => &self.description_fr,
            Language::En => &self.description_en,
        }
    }

    pub fn sprite(&self, mode: ImageMode) -> Option<&str> {
        match mode {
            ImageMode::Artwork => self.sprite_artwork.as_deref(),
            ImageMode::Legacy => self.sprite_default.as_deref(),
        }
    }
}

// ============================================================================
// Page Entries
// ============================================================================

/// A rendered page slot: either the lightweight catalog record (shown
/// immediately) or the fully resolved detail that replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageEntry {
    Lite(PokemonSummary),
    Full(PokemonDetail),
}

impl PageEntry {
    pub fn id(&self) -> u32 {
        match self {
            PageEntry::Lite(s) => s.id,
            PageEntry::Full(d) => d.id,
        }
    }

    pub fn name(&self, lang: Language) -> &str {
        match self {
            PageEntry::Lite(s) => s.name(lang),
            PageEntry::Full(d) => d.name(lang),
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, PageEntry::Full(_))
    }
}

/// Page position handed to the observer with every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

// ============================================================================
// Filters
// ============================================================================

/// Current filter selection. `None` on an axis means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub type_filter: Option<String>,
    pub gen_filter: Option<String>,
    pub search_text: String,
}

// ============================================================================
// Derived Relationships
// ============================================================================

/// Damage relations for one attacking type, normalized to bare type names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRelations {
    pub double_damage_to: Vec<String>,
    pub half_damage_to: Vec<String>,
    pub no_damage_to: Vec<String>,
}

/// One node of an evolution tree. `name` starts as the raw species
/// identifier and is rewritten by the localization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub evolves_to: Vec<EvolutionNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summary(id: u32) -> PokemonSummary {
        PokemonSummary {
            id,
            name_fr: "Salamèche".to_string(),
            name_en: "Charmander".to_string(),
            types: vec!["fire".to_string()],
            abilities_fr: vec!["Brasier".to_string()],
            abilities_en: vec!["Blaze".to_string()],
        }
    }

    #[test]
    fn test_summary_language_selection() {
        let s = make_summary(4);
        assert_eq!(s.name(Language::Fr), "Salamèche");
        assert_eq!(s.name(Language::En), "Charmander");
        assert_eq!(s.abilities(Language::En), &["Blaze".to_string()]);
    }

    #[test]
    fn test_page_entry_discriminant() {
        let entry = PageEntry::Lite(make_summary(4));
        assert_eq!(entry.id(), 4);
        assert!(!entry.is_full());
        match entry {
            PageEntry::Lite(s) => assert_eq!(s.id, 4),
            PageEntry::Full(_) => panic!("expected a lite entry"),
        }
    }

    #[test]
    fn test_language_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Fr).unwrap(), "\"fr\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }
}
