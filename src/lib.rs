/// Pokédex Engine
///
/// Core library providing catalog acquisition with layered caching,
/// relevance-ranked search and filtering, and progressive page loading
/// with stale-result rejection.

pub mod config;
pub mod core;

pub use crate::core::api::{ApiError, PokeApi, PokedexApi};
pub use crate::core::cache::EntityCache;
pub use crate::core::dex::{DexObserver, NullObserver, PokedexController};
pub use crate::core::model::{
    EvolutionNode, ImageMode, Language, PageEntry, PageInfo, PokemonDetail, PokemonSummary,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
