//! Stale-result rejection: a detail batch that resolves after a newer
//! navigation must never overwrite the newer page.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use pokedex_engine::core::api::{PokedexApi, Result as ApiResult};
use pokedex_engine::core::model::Stats;
use pokedex_engine::{
    DexObserver, PageEntry, PageInfo, PokedexController, PokemonDetail, PokemonSummary,
};

fn make_summary(id: u32) -> PokemonSummary {
    PokemonSummary {
        id,
        name_fr: format!("mon{id}"),
        name_en: format!("mon{id}"),
        types: Vec::new(),
        abilities_fr: Vec::new(),
        abilities_en: Vec::new(),
    }
}

fn make_detail(id: u32) -> PokemonDetail {
    PokemonDetail {
        id,
        name_fr: format!("mon{id}"),
        name_en: format!("mon{id}"),
        types: Vec::new(),
        stats: Stats::default(),
        abilities: Vec::new(),
        generation: "I".to_string(),
        region: "Kanto".to_string(),
        height: 0,
        weight: 0,
        evolution_url: String::new(),
        description_fr: String::new(),
        description_en: String::new(),
        sprite_default: None,
        sprite_artwork: None,
    }
}

/// Source whose detail fetches for a chosen id set block until released.
struct GatedApi {
    catalog: Vec<PokemonSummary>,
    gated_ids: HashSet<u32>,
    gate: Notify,
}

#[async_trait]
impl PokedexApi for GatedApi {
    async fn fetch_catalog(&self) -> Vec<PokemonSummary> {
        self.catalog.clone()
    }

    async fn fetch_detail(&self, id: u32) -> ApiResult<PokemonDetail> {
        if self.gated_ids.contains(&id) {
            self.gate.notified().await;
        }
        Ok(make_detail(id))
    }

    async fn ids_by_type(&self, _type_name: &str) -> Vec<u32> {
        Vec::new()
    }

    async fn ids_by_generation(&self, _gen: &str) -> Vec<u32> {
        Vec::new()
    }

    async fn type_list(&self) -> Vec<String> {
        Vec::new()
    }

    async fn generation_list(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Default)]
struct RenderLog {
    renders: Mutex<Vec<(usize, bool)>>,
}

impl DexObserver for RenderLog {
    fn page_rendered(&self, entries: &[PageEntry], info: &PageInfo) {
        let full = !entries.is_empty() && entries.iter().all(|e| e.is_full());
        self.renders.lock().unwrap().push((info.page, full));
    }

    fn empty_results(&self, _empty: bool) {}
}

#[tokio::test]
async fn stale_page_batch_is_discarded() {
    // 60 entries, 3 pages of 20. Page 2 ids (21..=40) are gated.
    let catalog: Vec<PokemonSummary> = (1..=60).map(make_summary).collect();
    let api = Arc::new(GatedApi {
        catalog,
        gated_ids: (21..=40).collect(),
        gate: Notify::new(),
    });
    let observer = Arc::new(RenderLog::default());
    let controller = Arc::new(PokedexController::new(api.clone(), observer.clone()));

    controller.initialize().await;

    // Start navigating to page 2; its detail fan-out blocks on the gate.
    let slow = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.navigate_to_page(2).await })
    };
    tokio::task::yield_now().await;

    // Navigate to page 3 while page 2 is still in flight.
    controller.navigate_to_page(3).await;
    assert_eq!(controller.current_page(), 3);
    let entries = controller.current_entries();
    assert!(entries.iter().all(|e| e.is_full()));
    assert!(entries.iter().all(|e| (41..=60).contains(&e.id())));

    // Release page 2's fetches; its batch must be discarded silently.
    api.gate.notify_waiters();
    slow.await.unwrap();

    let entries = controller.current_entries();
    assert!(
        entries.iter().all(|e| (41..=60).contains(&e.id())),
        "stale page-2 records must not overwrite page 3"
    );

    // Render log: no full render for page 2 ever happened, and the last
    // full render is page 3's.
    let renders = observer.renders.lock().unwrap();
    assert!(!renders.iter().any(|(page, full)| *page == 2 && *full));
    let last_full = renders.iter().rev().find(|(_, full)| *full).unwrap();
    assert_eq!(last_full.0, 3);
}

#[tokio::test]
async fn filter_change_discards_in_flight_page() {
    // All of page 1 is gated; a search applied while the batch is in
    // flight must win.
    let catalog: Vec<PokemonSummary> = (1..=30).map(make_summary).collect();
    let api = Arc::new(GatedApi {
        catalog,
        gated_ids: (1..=20).collect(),
        gate: Notify::new(),
    });
    let observer = Arc::new(RenderLog::default());
    let controller = Arc::new(PokedexController::new(api.clone(), observer.clone()));

    // initialize() itself would block on page 1's gated ids, so run it as
    // a task and change filters while it waits.
    let init = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.initialize().await })
    };
    tokio::task::yield_now().await;

    // "25" matches only the exact id 25, which is not gated.
    controller.set_search_text("25").await;
    assert_eq!(controller.filtered_ids(), vec![25]);

    api.gate.notify_waiters();
    init.await.unwrap();

    let entries = controller.current_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id(), 25);
    assert!(entries[0].is_full());
}
