//! Data Acquisition Layer
//!
//! Resolves external identifiers and URLs into typed records, insulating the
//! engine from the remote schema. The catalog prefers a batched GraphQL
//! strategy and falls back to the plain paginated listing; per-entity details
//! merge the technical and species resources; list-style lookups degrade to
//! documented defaults instead of failing, since they feed filter population.

pub mod bulk;
pub mod error;
pub mod names;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::core::cache::EntityCache;
use crate::core::model::{
    DamageRelations, EvolutionNode, Language, PokemonDetail, PokemonSummary, Stats,
};

pub use error::{ApiError, Result};

/// Trailing numeric segment of a resource URL (`.../pokemon/132/` -> 132).
static TRAILING_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(\d+)/?$").unwrap());

const DESCRIPTION_FALLBACK: &str = "Description non disponible.";

/// Minimal filter lists used when the remote listing endpoints are down.
static FALLBACK_TYPES: &[&str] = &["normal", "fire", "water", "grass", "electric"];
static FALLBACK_GENERATIONS: &[&str] = &[
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

fn parse_trailing_id(url: &str) -> Option<u32> {
    TRAILING_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ============================================================================
// Engine Seam
// ============================================================================

/// The acquisition surface the controller consumes. Tests substitute a
/// scripted implementation to drive ranking and staleness scenarios without
/// a network.
#[async_trait]
pub trait PokedexApi: Send + Sync {
    /// Full summary catalog; best-effort, never fails.
    async fn fetch_catalog(&self) -> Vec<PokemonSummary>;

    /// Full record for one id, cache-first.
    async fn fetch_detail(&self, id: u32) -> Result<PokemonDetail>;

    /// Ids carrying the given type tag; empty on failure.
    async fn ids_by_type(&self, type_name: &str) -> Vec<u32>;

    /// Ids introduced by the given generation; empty on failure.
    async fn ids_by_generation(&self, gen: &str) -> Vec<u32>;

    /// Type tags for filter population; falls back to a minimal default.
    async fn type_list(&self) -> Vec<String>;

    /// Generation tokens for filter population; falls back to a default.
    async fn generation_list(&self) -> Vec<String>;
}

// ============================================================================
// Wire Shapes (REST)
// ============================================================================

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    results: Vec<NamedRef>,
}

#[derive(Debug, Deserialize)]
struct PokemonResource {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    species: ResourceRef,
    stats: Vec<StatSlot>,
    types: Vec<TypeSlot>,
    abilities: Vec<AbilitySlot>,
    sprites: SpriteSet,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceRef {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedRef,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    type_ref: NamedRef,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedRef,
}

#[derive(Debug, Default, Deserialize)]
struct SpriteSet {
    front_default: Option<String>,
    #[serde(default)]
    other: OtherSprites,
}

#[derive(Debug, Default, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: ArtworkSprite,
}

#[derive(Debug, Default, Deserialize)]
struct ArtworkSprite {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpeciesResource {
    #[serde(default)]
    names: Vec<LocalizedName>,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorText>,
    generation: Option<NamedRef>,
    #[serde(default)]
    evolution_chain: ResourceRef,
}

#[derive(Debug, Deserialize)]
struct LocalizedName {
    name: String,
    language: NamedRef,
}

#[derive(Debug, Deserialize)]
struct FlavorText {
    flavor_text: String,
    language: NamedRef,
}

#[derive(Debug, Deserialize)]
struct TypeResource {
    #[serde(default)]
    damage_relations: RelationsWire,
    #[serde(default)]
    pokemon: Vec<TypeMember>,
}

#[derive(Debug, Default, Deserialize)]
struct RelationsWire {
    #[serde(default)]
    double_damage_to: Vec<NamedRef>,
    #[serde(default)]
    half_damage_to: Vec<NamedRef>,
    #[serde(default)]
    no_damage_to: Vec<NamedRef>,
}

#[derive(Debug, Deserialize)]
struct TypeMember {
    pokemon: NamedRef,
}

#[derive(Debug, Deserialize)]
struct GenerationResource {
    #[serde(default)]
    pokemon_species: Vec<NamedRef>,
}

#[derive(Debug, Deserialize)]
struct AbilityResource {
    #[serde(default)]
    names: Vec<LocalizedName>,
}

#[derive(Debug, Deserialize)]
struct ChainResponse {
    chain: ChainLink,
}

#[derive(Debug, Deserialize)]
struct ChainLink {
    species: NamedRef,
    #[serde(default)]
    evolves_to: Vec<ChainLink>,
}

// ============================================================================
// Client
// ============================================================================

/// Concrete acquisition client over the public Pokémon API.
pub struct PokeApi {
    client: reqwest::Client,
    config: ApiConfig,
    cache: Arc<EntityCache>,
}

impl PokeApi {
    pub fn new(config: ApiConfig, cache: Arc<EntityCache>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<EntityCache> {
        &self.cache
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::SourceUnavailable(format!(
                "{url} returned {status}"
            )));
        }
        Ok(response.json().await?)
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Simple paginated listing: id/name pairs only, empty type/ability
    /// data. Best-effort; an unreachable source yields an empty catalog.
    async fn fetch_catalog_fallback(&self) -> Vec<PokemonSummary> {
        let url = format!("{}/pokemon?limit=1500", self.config.rest_base);
        let listing: ListingResponse = match self.get_json(&url).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("fallback catalog listing failed: {e}");
                return Vec::new();
            }
        };

        listing
            .results
            .into_iter()
            .filter_map(|entry| {
                let id = parse_trailing_id(&entry.url)?;
                Some(PokemonSummary {
                    id,
                    name_fr: entry.name.clone(),
                    name_en: entry.name,
                    types: Vec::new(),
                    abilities_fr: Vec::new(),
                    abilities_en: Vec::new(),
                })
            })
            .collect()
    }

    pub async fn fetch_catalog(&self) -> Vec<PokemonSummary> {
        match bulk::fetch_bulk_catalog(&self.client, &self.config.graphql_url).await {
            Ok(catalog) => {
                debug!("bulk catalog loaded: {} entries", catalog.len());
                catalog
            }
            Err(e) => {
                warn!("bulk catalog failed ({e}), using paginated fallback");
                self.fetch_catalog_fallback().await
            }
        }
    }

    // ------------------------------------------------------------------
    // Details
    // ------------------------------------------------------------------

    pub async fn fetch_detail(&self, id: u32) -> Result<PokemonDetail> {
        if let Some(cached) = self.cache.detail(id) {
            return Ok(cached);
        }

        let url = format!("{}/pokemon/{id}", self.config.rest_base);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::NotFound {
                id,
                status: status.as_u16(),
            });
        }
        let pokemon: PokemonResource = response.json().await?;

        if pokemon.species.url.is_empty() {
            return Err(ApiError::MissingReference(format!(
                "pokemon {id} has no species reference"
            )));
        }
        let species: SpeciesResource = self.get_json(&pokemon.species.url).await?;

        let detail = merge_detail(pokemon, species);
        self.cache.put_detail(detail.clone());
        Ok(detail)
    }

    // ------------------------------------------------------------------
    // Evolution
    // ------------------------------------------------------------------

    pub async fn fetch_evolution_tree(&self, url: &str) -> Result<EvolutionNode> {
        if url.is_empty() {
            return Err(ApiError::MissingReference(
                "empty evolution chain reference".to_string(),
            ));
        }

        let chain: ChainResponse = self.get_json(url).await?;
        Ok(self.build_chain(&chain.chain))
    }

    fn build_chain(&self, link: &ChainLink) -> EvolutionNode {
        let id = parse_trailing_id(&link.species.url).unwrap_or(0);
        EvolutionNode {
            id,
            name: link.species.name.clone(),
            image: format!("{}/sprites/pokemon/{id}.png", self.config.sprite_base),
            evolves_to: link.evolves_to.iter().map(|l| self.build_chain(l)).collect(),
        }
    }

    /// Rewrite every node's raw species identifier with its localized
    /// display name: one traversal collects the nodes, all lookups run
    /// concurrently, a second pass applies the results. A failed lookup
    /// keeps the raw name.
    pub async fn localize_evolution_tree(&self, root: &mut EvolutionNode, lang: Language) {
        let mut pending: Vec<(u32, String)> = Vec::new();
        collect_nodes(root, &mut pending);

        let lookups = pending
            .iter()
            .map(|(id, raw)| self.species_display_name(*id, raw, lang));
        let resolved = futures::future::join_all(lookups).await;

        let names: std::collections::HashMap<u32, String> = pending
            .iter()
            .zip(resolved)
            .map(|((id, _), name)| (*id, name))
            .collect();

        apply_names(root, &names);
    }

    /// Localized display name for a species, keyed in the cache by the
    /// stable id and language (node names get rewritten, ids never do).
    async fn species_display_name(&self, id: u32, raw: &str, lang: Language) -> String {
        let key = format!("{id}-{lang}");
        if let Some(cached) = self.cache.species_name(&key) {
            return cached;
        }

        let url = format!("{}/pokemon-species/{id}", self.config.rest_base);
        let species: SpeciesResource = match self.get_json(&url).await {
            Ok(species) => species,
            Err(e) => {
                debug!("species name lookup failed for {raw}: {e}");
                return raw.to_string();
            }
        };

        let display = localized_name(&species.names, lang)
            .unwrap_or_else(|| names::title_case_identifier(raw));
        self.cache.put_species_name(&key, display.clone());
        display
    }

    // ------------------------------------------------------------------
    // Derived Relationships & Lists
    // ------------------------------------------------------------------

    pub async fn type_relations(&self, type_name: &str) -> Result<DamageRelations> {
        if let Some(cached) = self.cache.relations(type_name) {
            return Ok(cached);
        }

        let url = format!("{}/type/{type_name}", self.config.rest_base);
        let resource: TypeResource = self.get_json(&url).await?;
        let relations = DamageRelations {
            double_damage_to: resource
                .damage_relations
                .double_damage_to
                .into_iter()
                .map(|r| r.name)
                .collect(),
            half_damage_to: resource
                .damage_relations
                .half_damage_to
                .into_iter()
                .map(|r| r.name)
                .collect(),
            no_damage_to: resource
                .damage_relations
                .no_damage_to
                .into_iter()
                .map(|r| r.name)
                .collect(),
        };

        self.cache.put_relations(type_name, relations.clone());
        Ok(relations)
    }

    pub async fn ids_by_type(&self, type_name: &str) -> Vec<u32> {
        let url = format!("{}/type/{type_name}", self.config.rest_base);
        match self.get_json::<TypeResource>(&url).await {
            Ok(resource) => resource
                .pokemon
                .into_iter()
                .filter_map(|member| parse_trailing_id(&member.pokemon.url))
                .collect(),
            Err(e) => {
                warn!("type id-set lookup failed for {type_name}: {e}");
                Vec::new()
            }
        }
    }

    pub async fn ids_by_generation(&self, gen: &str) -> Vec<u32> {
        // Accepts "generation-i" as well as a bare "I".
        let mut query = gen.to_lowercase();
        if !query.starts_with("generation-") {
            query = format!("generation-{query}");
        }

        let url = format!("{}/generation/{query}", self.config.rest_base);
        match self.get_json::<GenerationResource>(&url).await {
            Ok(resource) => resource
                .pokemon_species
                .into_iter()
                .filter_map(|species| parse_trailing_id(&species.url))
                .collect(),
            Err(e) => {
                warn!("generation id-set lookup failed for {gen}: {e}");
                Vec::new()
            }
        }
    }

    pub async fn type_list(&self) -> Vec<String> {
        let url = format!("{}/type", self.config.rest_base);
        match self.get_json::<ListingResponse>(&url).await {
            Ok(listing) => listing
                .results
                .into_iter()
                .map(|t| t.name)
                .filter(|name| name != "unknown" && name != "shadow")
                .collect(),
            Err(e) => {
                warn!("type list failed ({e}), using fallback");
                FALLBACK_TYPES.iter().map(|t| t.to_string()).collect()
            }
        }
    }

    pub async fn generation_list(&self) -> Vec<String> {
        let url = format!("{}/generation", self.config.rest_base);
        match self.get_json::<ListingResponse>(&url).await {
            Ok(listing) => listing
                .results
                .into_iter()
                .map(|g| names::roman_generation_token(&g.name))
                .collect(),
            Err(e) => {
                warn!("generation list failed ({e}), using fallback");
                FALLBACK_GENERATIONS.iter().map(|g| g.to_string()).collect()
            }
        }
    }

    /// Defensive effectiveness profile for a type combination: resolves the
    /// damage relations of every known attacking type (cache-first,
    /// concurrent) and folds them into weakness/resistance/immunity buckets.
    pub async fn defensive_effectiveness(
        &self,
        defender_types: &[String],
    ) -> crate::core::typecalc::Effectiveness {
        let attackers = self.type_list().await;

        let fetches = attackers.iter().map(|t| self.type_relations(t));
        let resolved = futures::future::join_all(fetches).await;

        let relations: std::collections::HashMap<String, DamageRelations> = attackers
            .into_iter()
            .zip(resolved)
            .filter_map(|(attacker, result)| match result {
                Ok(relations) => Some((attacker, relations)),
                Err(e) => {
                    debug!("relations lookup failed for {attacker}: {e}");
                    None
                }
            })
            .collect();

        crate::core::typecalc::effectiveness(&relations, defender_types)
    }

    /// Localized ability name, cached by (ability, language). Falls back to
    /// the raw identifier without caching, so a transient failure retries on
    /// the next lookup.
    pub async fn ability_translation(&self, ability: &str, lang: Language) -> String {
        if let Some(cached) = self.cache.ability_translation(ability, lang) {
            return cached;
        }

        let url = format!("{}/ability/{ability}", self.config.rest_base);
        let resource: AbilityResource = match self.get_json(&url).await {
            Ok(resource) => resource,
            Err(_) => return ability.to_string(),
        };

        let translated =
            localized_name(&resource.names, lang).unwrap_or_else(|| ability.to_string());
        self.cache
            .put_ability_translation(ability, lang, translated.clone());
        translated
    }
}

#[async_trait]
impl PokedexApi for PokeApi {
    async fn fetch_catalog(&self) -> Vec<PokemonSummary> {
        PokeApi::fetch_catalog(self).await
    }

    async fn fetch_detail(&self, id: u32) -> Result<PokemonDetail> {
        PokeApi::fetch_detail(self, id).await
    }

    async fn ids_by_type(&self, type_name: &str) -> Vec<u32> {
        PokeApi::ids_by_type(self, type_name).await
    }

    async fn ids_by_generation(&self, gen: &str) -> Vec<u32> {
        PokeApi::ids_by_generation(self, gen).await
    }

    async fn type_list(&self) -> Vec<String> {
        PokeApi::type_list(self).await
    }

    async fn generation_list(&self) -> Vec<String> {
        PokeApi::generation_list(self).await
    }
}

// ============================================================================
// Merging Helpers
// ============================================================================

fn localized_name(entries: &[LocalizedName], lang: Language) -> Option<String> {
    let tag = lang.to_string();
    entries
        .iter()
        .find(|entry| entry.language.name == tag)
        .map(|entry| entry.name.clone())
}

fn flavor_text(entries: &[FlavorText], lang: Language) -> String {
    let tag = lang.to_string();
    entries
        .iter()
        .find(|entry| entry.language.name == tag)
        .map(|entry| entry.flavor_text.replace(['\n', '\u{c}'], " "))
        .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string())
}

fn stat_value(stats: &[StatSlot], name: &str) -> u32 {
    stats
        .iter()
        .find(|slot| slot.stat.name == name)
        .map_or(0, |slot| slot.base_stat)
}

fn merge_detail(pokemon: PokemonResource, species: SpeciesResource) -> PokemonDetail {
    let base_fr =
        localized_name(&species.names, Language::Fr).unwrap_or_else(|| pokemon.name.clone());
    let name_fr = names::format_variant_name(&pokemon.name, &base_fr);
    let name_en = names::title_case_identifier(&pokemon.name);

    let gen_api_name = species
        .generation
        .as_ref()
        .map_or("generation-i", |g| g.name.as_str());
    let generation = names::roman_generation_token(gen_api_name);
    let region = names::region_for_generation(&generation);

    PokemonDetail {
        id: pokemon.id,
        name_fr,
        name_en,
        types: pokemon
            .types
            .into_iter()
            .map(|slot| slot.type_ref.name)
            .collect(),
        stats: Stats {
            hp: stat_value(&pokemon.stats, "hp"),
            attack: stat_value(&pokemon.stats, "attack"),
            defense: stat_value(&pokemon.stats, "defense"),
            special_attack: stat_value(&pokemon.stats, "special-attack"),
            special_defense: stat_value(&pokemon.stats, "special-defense"),
            speed: stat_value(&pokemon.stats, "speed"),
        },
        abilities: pokemon
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        generation,
        region,
        height: pokemon.height,
        weight: pokemon.weight,
        evolution_url: species.evolution_chain.url,
        description_fr: flavor_text(&species.flavor_text_entries, Language::Fr),
        description_en: flavor_text(&species.flavor_text_entries, Language::En),
        sprite_default: pokemon.sprites.front_default,
        sprite_artwork: pokemon.sprites.other.official_artwork.front_default,
    }
}

fn collect_nodes(node: &EvolutionNode, out: &mut Vec<(u32, String)>) {
    out.push((node.id, node.name.clone()));
    for child in &node.evolves_to {
        collect_nodes(child, out);
    }
}

fn apply_names(node: &mut EvolutionNode, names: &std::collections::HashMap<u32, String>) {
    if let Some(name) = names.get(&node.id) {
        node.name = name.clone();
    }
    for child in &mut node.evolves_to {
        apply_names(child, names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trailing_id() {
        assert_eq!(
            parse_trailing_id("https://pokeapi.co/api/v2/pokemon/132/"),
            Some(132)
        );
        assert_eq!(
            parse_trailing_id("https://pokeapi.co/api/v2/pokemon-species/6"),
            Some(6)
        );
        assert_eq!(parse_trailing_id("https://pokeapi.co/api/v2/pokemon/"), None);
    }

    #[test]
    fn test_flavor_text_cleanup_and_fallback() {
        let entries = vec![FlavorText {
            flavor_text: "Crache du\nfeu.\u{c}Vit dans les volcans.".to_string(),
            language: NamedRef {
                name: "fr".to_string(),
                url: String::new(),
            },
        }];

        assert_eq!(
            flavor_text(&entries, Language::Fr),
            "Crache du feu. Vit dans les volcans."
        );
        assert_eq!(flavor_text(&entries, Language::En), DESCRIPTION_FALLBACK);
    }

    #[test]
    fn test_merge_detail_variant_name_and_stats() {
        let pokemon: PokemonResource = serde_json::from_value(serde_json::json!({
            "id": 10034,
            "name": "charizard-mega-x",
            "height": 17,
            "weight": 1105,
            "species": { "url": "https://pokeapi.co/api/v2/pokemon-species/6/" },
            "stats": [
                { "base_stat": 78, "stat": { "name": "hp" } },
                { "base_stat": 130, "stat": { "name": "attack" } },
                { "base_stat": 111, "stat": { "name": "defense" } },
                { "base_stat": 130, "stat": { "name": "special-attack" } },
                { "base_stat": 85, "stat": { "name": "special-defense" } },
                { "base_stat": 100, "stat": { "name": "speed" } }
            ],
            "types": [
                { "type": { "name": "fire" } },
                { "type": { "name": "dragon" } }
            ],
            "abilities": [ { "ability": { "name": "tough-claws" } } ],
            "sprites": { "front_default": null, "other": {} }
        }))
        .unwrap();

        let species: SpeciesResource = serde_json::from_value(serde_json::json!({
            "names": [
                { "name": "Dracaufeu", "language": { "name": "fr" } },
                { "name": "Charizard", "language": { "name": "en" } }
            ],
            "flavor_text_entries": [],
            "generation": { "name": "generation-vi" },
            "evolution_chain": { "url": "https://pokeapi.co/api/v2/evolution-chain/2/" }
        }))
        .unwrap();

        let detail = merge_detail(pokemon, species);
        assert_eq!(detail.name_fr, "Méga-Dracaufeu X");
        assert_eq!(detail.name_en, "Charizard Mega X");
        assert_eq!(detail.stats.attack, 130);
        assert_eq!(detail.generation, "VI");
        assert_eq!(detail.region, "Kalos");
    }

    #[test]
    fn test_evolution_name_application() {
        let mut root = EvolutionNode {
            id: 1,
            name: "bulbasaur".to_string(),
            image: String::new(),
            evolves_to: vec![EvolutionNode {
                id: 2,
                name: "ivysaur".to_string(),
                image: String::new(),
                evolves_to: Vec::new(),
            }],
        };

        let mut names = std::collections::HashMap::new();
        names.insert(1, "Bulbizarre".to_string());
        names.insert(2, "Herbizarre".to_string());
        apply_names(&mut root, &names);

        assert_eq!(root.name, "Bulbizarre");
        assert_eq!(root.evolves_to[0].name, "Herbizarre");
    }
}
