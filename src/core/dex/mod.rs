//! Pokédex Controller
//!
//! Drives filtering, ranking and progressive page loading over the summary
//! catalog. The rendering collaborator registers as an observer and receives
//! one synchronous lightweight render per navigation, followed by at most one
//! asynchronous full render once the page's detail fetches settle.
//!
//! Staleness is handled with a request-generation counter: every navigation
//! bumps it, and a detail batch that completes under an outdated counter is
//! discarded without touching the observer. In-flight requests are never
//! aborted at the transport level.

pub mod filter;
pub mod pager;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::core::api::names::normalize_text;
use crate::core::api::PokedexApi;
use crate::core::model::{
    FilterState, ImageMode, Language, PageEntry, PageInfo, PokemonSummary,
};
use pager::PageWindow;

pub const DEFAULT_PAGE_SIZE: usize = 20;

// ============================================================================
// Observer
// ============================================================================

/// Rendering collaborator interface. Implementations must tolerate being
/// called from any task; callbacks are never invoked while internal locks
/// are held.
pub trait DexObserver: Send + Sync {
    /// A page is ready to draw. Called once with lite entries immediately on
    /// navigation, and at most once more with resolved entries.
    fn page_rendered(&self, entries: &[PageEntry], info: &PageInfo);

    /// The filtered set became empty (or stopped being empty).
    fn empty_results(&self, empty: bool);
}

/// Observer that ignores everything; useful headless.
pub struct NullObserver;

impl DexObserver for NullObserver {
    fn page_rendered(&self, _entries: &[PageEntry], _info: &PageInfo) {}
    fn empty_results(&self, _empty: bool) {}
}

// ============================================================================
// Controller
// ============================================================================

struct ControllerState {
    catalog: Arc<Vec<PokemonSummary>>,
    available_types: Vec<String>,
    available_generations: Vec<String>,
    filters: FilterState,
    filtered_ids: Vec<u32>,
    window: PageWindow,
    request_seq: u64,
    language: Language,
    image_mode: ImageMode,
    current_entries: Vec<PageEntry>,
}

pub struct PokedexController {
    api: Arc<dyn PokedexApi>,
    observer: Arc<dyn DexObserver>,
    state: Mutex<ControllerState>,
}

impl PokedexController {
    pub fn new(api: Arc<dyn PokedexApi>, observer: Arc<dyn DexObserver>) -> Self {
        Self::with_page_size(api, observer, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(
        api: Arc<dyn PokedexApi>,
        observer: Arc<dyn DexObserver>,
        page_size: usize,
    ) -> Self {
        Self {
            api,
            observer,
            state: Mutex::new(ControllerState {
                catalog: Arc::new(Vec::new()),
                available_types: Vec::new(),
                available_generations: Vec::new(),
                filters: FilterState::default(),
                filtered_ids: Vec::new(),
                window: PageWindow::new(page_size),
                request_seq: 0,
                language: Language::default(),
                image_mode: ImageMode::default(),
                current_entries: Vec::new(),
            }),
        }
    }

    /// Load the catalog and the filter lists, then render the first page.
    /// The catalog is fetched exactly once per session.
    pub async fn initialize(&self) {
        let (types, generations, catalog) = tokio::join!(
            self.api.type_list(),
            self.api.generation_list(),
            self.api.fetch_catalog()
        );

        {
            let mut st = self.state.lock().unwrap();
            st.available_types = types;
            st.available_generations = generations;
            st.filtered_ids = catalog.iter().map(|s| s.id).collect();
            st.window.reset(st.filtered_ids.len());
            st.catalog = Arc::new(catalog);
        }

        self.navigate_to_page(1).await;
    }

    // ------------------------------------------------------------------
    // Exposed UI surface
    // ------------------------------------------------------------------

    pub async fn set_search_text(&self, text: &str) {
        self.state.lock().unwrap().filters.search_text = text.to_string();
        self.apply_filters().await;
    }

    /// `None` clears the axis ("all").
    pub async fn set_type_filter(&self, tag: Option<String>) {
        self.state.lock().unwrap().filters.type_filter = tag;
        self.apply_filters().await;
    }

    /// `None` clears the axis ("all").
    pub async fn set_gen_filter(&self, key: Option<String>) {
        self.state.lock().unwrap().filters.gen_filter = key;
        self.apply_filters().await;
    }

    pub async fn next_page(&self) {
        let page = self.state.lock().unwrap().window.current() + 1;
        self.navigate_to_page(page).await;
    }

    pub async fn prev_page(&self) {
        let page = self.state.lock().unwrap().window.current().saturating_sub(1);
        self.navigate_to_page(page).await;
    }

    /// Settings only change which localized fields are read; the current
    /// page is re-rendered from held records without refetching.
    pub fn set_settings(&self, language: Language, image_mode: ImageMode) {
        let (entries, info) = {
            let mut st = self.state.lock().unwrap();
            st.language = language;
            st.image_mode = image_mode;
            (st.current_entries.clone(), st.window.info())
        };
        self.observer.page_rendered(&entries, &info);
    }

    pub fn available_types(&self) -> Vec<String> {
        self.state.lock().unwrap().available_types.clone()
    }

    pub fn available_generations(&self) -> Vec<String> {
        self.state.lock().unwrap().available_generations.clone()
    }

    pub fn filtered_ids(&self) -> Vec<u32> {
        self.state.lock().unwrap().filtered_ids.clone()
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().unwrap().window.current()
    }

    pub fn page_info(&self) -> PageInfo {
        self.state.lock().unwrap().window.info()
    }

    pub fn current_entries(&self) -> Vec<PageEntry> {
        self.state.lock().unwrap().current_entries.clone()
    }

    pub fn language(&self) -> Language {
        self.state.lock().unwrap().language
    }

    pub fn image_mode(&self) -> ImageMode {
        self.state.lock().unwrap().image_mode
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Recompute the ranked id list from the full catalog and the current
    /// filter state, then reset to page 1.
    pub async fn apply_filters(&self) {
        let (catalog, filters, language) = {
            let st = self.state.lock().unwrap();
            (st.catalog.clone(), st.filters.clone(), st.language)
        };

        let mut candidates: Vec<&PokemonSummary> = catalog.iter().collect();

        if let Some(tag) = &filters.type_filter {
            let id_set: HashSet<u32> = self.api.ids_by_type(tag).await.into_iter().collect();
            candidates.retain(|s| id_set.contains(&s.id));
        }

        if let Some(key) = &filters.gen_filter {
            let id_set: HashSet<u32> =
                self.api.ids_by_generation(key).await.into_iter().collect();
            candidates.retain(|s| id_set.contains(&s.id));
        }

        let query = normalize_text(&filters.search_text);
        let ranked: Vec<u32> = if query.is_empty() {
            let mut ids: Vec<u32> = candidates.iter().map(|s| s.id).collect();
            ids.sort_unstable();
            ids
        } else {
            filter::rank(candidates.into_iter(), &query, language)
        };

        let empty = ranked.is_empty();
        {
            let mut st = self.state.lock().unwrap();
            st.window.reset(ranked.len());
            st.filtered_ids = ranked;
        }

        self.observer.empty_results(empty);
        self.navigate_to_page(1).await;
    }

    // ------------------------------------------------------------------
    // Progressive page loading
    // ------------------------------------------------------------------

    /// Render the requested page: lite entries synchronously from the
    /// catalog, then a settle-all detail fan-out whose result is applied
    /// only if no newer navigation has started in the meantime.
    pub async fn navigate_to_page(&self, page: usize) {
        let (my_seq, page_ids, lite_entries, info) = {
            let mut st = self.state.lock().unwrap();
            st.window.go_to(page);
            st.request_seq += 1;
            let my_seq = st.request_seq;

            let (start, end) = st.window.slice_bounds();
            let page_ids: Vec<u32> = st.filtered_ids[start..end].to_vec();

            let catalog = st.catalog.clone();
            let lite_entries: Vec<PageEntry> = page_ids
                .iter()
                .filter_map(|id| {
                    catalog
                        .iter()
                        .find(|s| s.id == *id)
                        .map(|s| PageEntry::Lite(s.clone()))
                })
                .collect();

            st.current_entries = lite_entries.clone();
            (my_seq, page_ids, lite_entries, st.window.info())
        };

        self.observer.page_rendered(&lite_entries, &info);

        if page_ids.is_empty() {
            return;
        }

        // Settle-all fan-out: one failed id degrades that slot to its lite
        // entry rather than blanking the page.
        let results =
            futures::future::join_all(page_ids.iter().map(|id| self.api.fetch_detail(*id))).await;

        let resolved: Vec<PageEntry> = page_ids
            .iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(detail) => Some(PageEntry::Full(detail)),
                Err(e) => {
                    debug!("detail fetch for {id} failed: {e}");
                    lite_entries.iter().find(|entry| entry.id() == *id).cloned()
                }
            })
            .collect();

        {
            let mut st = self.state.lock().unwrap();
            if st.request_seq != my_seq {
                debug!(
                    "discarding stale page batch (seq {my_seq} != {})",
                    st.request_seq
                );
                return;
            }
            st.current_entries = resolved.clone();
        }

        self.observer.page_rendered(&resolved, &info);
    }
}
