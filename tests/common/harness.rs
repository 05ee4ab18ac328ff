//! A view wired to in-memory collaborators

use std::rc::Rc;

use viewtree::application::events::ChangeHub;
use viewtree::domain::value_objects::ViewKind;
use viewtree::infrastructure::{FixtureRepositoryService, MemoryStateStore, RecordingHost};
use viewtree::{NodeRef, ViewServices, ViewTree, ViewsConfig};

pub struct Harness {
    pub tree: ViewTree,
    pub git: Rc<FixtureRepositoryService>,
    pub host: Rc<RecordingHost>,
    pub hub: Rc<ChangeHub>,
    pub state: Rc<MemoryStateStore>,
}

impl Harness {
    pub fn new(view: ViewKind, config: ViewsConfig, json: &str) -> Self {
        Self::with_state(view, config, json, MemoryStateStore::new())
    }

    pub fn with_state(view: ViewKind, config: ViewsConfig, json: &str, state: MemoryStateStore) -> Self {
        let git = FixtureRepositoryService::from_json(json).expect("fixture should parse");
        Self::with_service(view, config, git, state)
    }

    /// Harness over a service built elsewhere, e.g. from a snapshot file
    pub fn with_service(
        view: ViewKind,
        config: ViewsConfig,
        git: FixtureRepositoryService,
        state: MemoryStateStore,
    ) -> Self {
        let git = Rc::new(git);
        let host = Rc::new(RecordingHost::new());
        let hub = ChangeHub::new();
        let state = Rc::new(state);
        let services = ViewServices {
            git: git.clone(),
            host: host.clone(),
            hub: hub.clone(),
            state: Some(state.clone()),
        };
        Self {
            tree: ViewTree::new(view, config, services),
            git,
            host,
            hub,
            state,
        }
    }

    /// Top-level rows
    pub fn rows(&self) -> Vec<NodeRef> {
        self.tree.get_children(None).expect("top-level rows")
    }
}

/// Config with the given page size and no tracking rows
pub fn paged_config(page: usize) -> ViewsConfig {
    let mut config = ViewsConfig::default();
    config.page_item_limit = page;
    config.default_item_limit = page;
    config.max_list_items = page;
    config.commits.show_tracking = false;
    config
}

/// Shas of the commit rows among `nodes`
pub fn commit_shas(nodes: &[NodeRef]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| n.commit_sha().map(str::to_string))
        .collect()
}

pub fn has_load_more(nodes: &[NodeRef]) -> bool {
    nodes.iter().any(|n| n.kind().name() == "load-more")
}
