//! Type Effectiveness
//!
//! Defensive multipliers computed from fetched damage relations. For every
//! attacking type, the factors against each of the defender's types multiply
//! together (2.0, 0.5 or 0.0 from the relation sets, 1.0 otherwise), then the
//! results are bucketed into weaknesses, resistances and immunities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::model::DamageRelations;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMultiplier {
    pub type_name: String,
    pub value: f32,
}

/// Defensive profile of a type combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effectiveness {
    /// Multiplier > 1, sorted most severe first (x4 before x2).
    pub weak: Vec<TypeMultiplier>,
    /// 0 < multiplier < 1, sorted most resistant first (x0.25 before x0.5).
    pub resist: Vec<TypeMultiplier>,
    pub immune: Vec<TypeMultiplier>,
}

fn factor_against(relations: &DamageRelations, defender: &str) -> f32 {
    if relations.no_damage_to.iter().any(|t| t == defender) {
        0.0
    } else if relations.double_damage_to.iter().any(|t| t == defender) {
        2.0
    } else if relations.half_damage_to.iter().any(|t| t == defender) {
        0.5
    } else {
        1.0
    }
}

/// Compute the defensive profile of `defender_types` given the damage
/// relations of every attacking type.
pub fn effectiveness(
    relations_by_type: &HashMap<String, DamageRelations>,
    defender_types: &[String],
) -> Effectiveness {
    let mut result = Effectiveness::default();

    for (attacker, relations) in relations_by_type {
        let multiplier: f32 = defender_types
            .iter()
            .map(|defender| factor_against(relations, defender))
            .product();

        let entry = TypeMultiplier {
            type_name: attacker.clone(),
            value: multiplier,
        };

        if multiplier == 0.0 {
            result.immune.push(entry);
        } else if multiplier > 1.0 {
            result.weak.push(entry);
        } else if multiplier < 1.0 {
            result.resist.push(entry);
        }
    }

    // Severity first, then name for a stable order.
    result.weak.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.type_name.cmp(&b.type_name))
    });
    result.resist.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.type_name.cmp(&b.type_name))
    });
    result.immune.sort_by(|a, b| a.type_name.cmp(&b.type_name));

    result
}
