//! Bulk Catalog Source
//!
//! Preferred catalog strategy: three batched GraphQL queries (localized
//! species names, localized ability names, per-Pokémon type/ability
//! associations) merged client-side into summaries. Any failure here is
//! reported to the caller, which falls back to the paginated listing source.

use std::collections::HashMap;

use serde::Deserialize;

use crate::core::api::error::{ApiError, Result};
use crate::core::api::names::{format_variant_name, title_case_identifier};
use crate::core::model::PokemonSummary;

const SPECIES_NAMES_QUERY: &str = r#"
query SpeciesNames {
  pokemon_v2_pokemonspeciesname(where: {pokemon_v2_language: {name: {_eq: "fr"}}}) {
    pokemon_species_id
    name
  }
}"#;

const ABILITY_NAMES_QUERY: &str = r#"
query AbilityNames {
  pokemon_v2_abilityname(where: {pokemon_v2_language: {name: {_in: ["fr", "en"]}}}) {
    ability_id
    name
    pokemon_v2_language { name }
  }
}"#;

const POKEMON_ASSOCIATIONS_QUERY: &str = r#"
query PokemonAssociations {
  pokemon_v2_pokemon {
    id
    name
    pokemon_species_id
    pokemon_v2_pokemontypes { pokemon_v2_type { name } }
    pokemon_v2_pokemonabilities { ability_id }
  }
}"#;

// ============================================================================
// Wire Shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SpeciesNamesData {
    #[serde(rename = "pokemon_v2_pokemonspeciesname")]
    rows: Vec<SpeciesNameRow>,
}

#[derive(Debug, Deserialize)]
struct SpeciesNameRow {
    pokemon_species_id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AbilityNamesData {
    #[serde(rename = "pokemon_v2_abilityname")]
    rows: Vec<AbilityNameRow>,
}

#[derive(Debug, Deserialize)]
struct AbilityNameRow {
    ability_id: u32,
    name: String,
    #[serde(rename = "pokemon_v2_language")]
    language: LanguageRef,
}

#[derive(Debug, Deserialize)]
struct LanguageRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AssociationsData {
    #[serde(rename = "pokemon_v2_pokemon")]
    rows: Vec<PokemonRow>,
}

#[derive(Debug, Deserialize)]
struct PokemonRow {
    id: u32,
    name: String,
    pokemon_species_id: u32,
    #[serde(rename = "pokemon_v2_pokemontypes", default)]
    types: Vec<TypeSlot>,
    #[serde(rename = "pokemon_v2_pokemonabilities", default)]
    abilities: Vec<AbilitySlot>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "pokemon_v2_type")]
    type_ref: TypeRef,
}

#[derive(Debug, Deserialize)]
struct TypeRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    ability_id: u32,
}

// ============================================================================
// Queries
// ============================================================================

async fn run_query<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    endpoint: &str,
    query: &str,
) -> Result<T> {
    let response = client
        .post(endpoint)
        .json(&serde_json::json!({ "query": query }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::SourceUnavailable(format!(
            "graphql endpoint returned {status}"
        )));
    }

    let envelope: GraphQlEnvelope<T> = response.json().await?;
    envelope
        .data
        .ok_or_else(|| ApiError::SourceUnavailable("graphql response had no data".to_string()))
}

/// Load the full catalog through the batched GraphQL strategy.
pub(super) async fn fetch_bulk_catalog(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<Vec<PokemonSummary>> {
    let (species, abilities, associations) = futures::try_join!(
        run_query::<SpeciesNamesData>(client, endpoint, SPECIES_NAMES_QUERY),
        run_query::<AbilityNamesData>(client, endpoint, ABILITY_NAMES_QUERY),
        run_query::<AssociationsData>(client, endpoint, POKEMON_ASSOCIATIONS_QUERY),
    )?;

    let species_fr: HashMap<u32, String> = species
        .rows
        .into_iter()
        .map(|row| (row.pokemon_species_id, row.name))
        .collect();

    let mut ability_fr: HashMap<u32, String> = HashMap::new();
    let mut ability_en: HashMap<u32, String> = HashMap::new();
    for row in abilities.rows {
        match row.language.name.as_str() {
            "fr" => {
                ability_fr.insert(row.ability_id, row.name);
            }
            "en" => {
                ability_en.insert(row.ability_id, row.name);
            }
            _ => {}
        }
    }

    let mut summaries: Vec<PokemonSummary> = associations
        .rows
        .into_iter()
        .map(|row| {
            let base_fr = species_fr
                .get(&row.pokemon_species_id)
                .cloned()
                .unwrap_or_else(|| title_case_identifier(&row.name));

            let abilities_of = |table: &HashMap<u32, String>| {
                row.abilities
                    .iter()
                    .filter_map(|slot| table.get(&slot.ability_id).cloned())
                    .collect::<Vec<_>>()
            };

            PokemonSummary {
                id: row.id,
                name_fr: format_variant_name(&row.name, &base_fr),
                name_en: title_case_identifier(&row.name),
                types: row.types.into_iter().map(|slot| slot.type_ref.name).collect(),
                abilities_fr: abilities_of(&ability_fr),
                abilities_en: abilities_of(&ability_en),
            }
        })
        .collect();

    summaries.sort_by_key(|s| s.id);

    if summaries.is_empty() {
        return Err(ApiError::SourceUnavailable(
            "graphql catalog came back empty".to_string(),
        ));
    }

    Ok(summaries)
}
