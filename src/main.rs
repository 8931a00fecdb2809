//! Command-line driver: loads the catalog, applies an optional search query
//! from argv and prints the first result page. Stands in for the rendering
//! collaborator the engine is normally wired to.

use std::sync::Arc;

use pokedex_engine::config::AppConfig;
use pokedex_engine::core::dex::DEFAULT_PAGE_SIZE;
use pokedex_engine::core::logging;
use pokedex_engine::{
    DexObserver, EntityCache, Language, PageEntry, PageInfo, PokeApi, PokedexController,
};

struct ConsoleView {
    language: Language,
}

impl DexObserver for ConsoleView {
    fn page_rendered(&self, entries: &[PageEntry], info: &PageInfo) {
        println!(
            "--- page {}/{} ({} results) ---",
            info.page, info.total_pages, info.total_results
        );
        for entry in entries {
            let marker = if entry.is_full() { "*" } else { " " };
            println!("{marker} #{:04} {}", entry.id(), entry.name(self.language));
        }
    }

    fn empty_results(&self, empty: bool) {
        if empty {
            println!("no results");
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init();

    let config = AppConfig::load();
    let cache = Arc::new(EntityCache::new());
    let api = Arc::new(PokeApi::new(config.api.clone(), cache));
    let view = Arc::new(ConsoleView {
        language: config.language,
    });

    let controller = PokedexController::with_page_size(
        api,
        view,
        if config.page_size > 0 {
            config.page_size
        } else {
            DEFAULT_PAGE_SIZE
        },
    );
    controller.initialize().await;

    if let Some(query) = std::env::args().nth(1) {
        controller.set_search_text(&query).await;
    }
}
