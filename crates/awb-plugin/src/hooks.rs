//! Hook system for the plugin host.
//!
//! This module provides:
//! - `FilterRegistry<T>` - named pipelines of value transforms
//! - `ActionRegistry` - callbacks fired at fixed lifecycle points
//! - `HookRegistry` - the registries a host exposes to plugins
//!
//! ## Execution Order
//!
//! Within one hook name, callbacks run by ascending priority, and in
//! registration order among equal priorities.
//!
//! Filters receive the current value and return the next one; the input is
//! never mutated in place, so every step of a pipeline is inspectable.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use awb_core::Schema;

use crate::host::HookContext;
use crate::menu::MenuSettings;

/// Priority used when a caller has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Global counter for generating unique hook IDs.
static HOOK_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique hook ID.
fn generate_hook_id() -> String {
    let id = HOOK_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("hook:{}", id)
}

/// Lifecycle points at which actions fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Early initialization, every request.
    Init,
    /// Admin requests, after `Init`.
    AdminInit,
    /// Admin requests, after `AdminInit`; menu pages are added here.
    AdminMenu,
    /// End of a public page render.
    Footer,
}

type FilterFn<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
type ActionFn = Arc<dyn Fn(&HookContext<'_>) + Send + Sync>;

struct Entry<F> {
    id: String,
    priority: i32,
    callback: F,
}

/// Insert keeping the list sorted by priority, after equal priorities.
fn insert_ordered<F>(list: &mut Vec<Entry<F>>, entry: Entry<F>) {
    let pos = list
        .iter()
        .position(|e| e.priority > entry.priority)
        .unwrap_or(list.len());
    list.insert(pos, entry);
}

/// Remove an entry by id from any list in the map.
fn remove_by_id<K, F>(map: &mut HashMap<K, Vec<Entry<F>>>, id: &str) -> bool {
    for list in map.values_mut() {
        if let Some(pos) = list.iter().position(|e| e.id == id) {
            list.remove(pos);
            return true;
        }
    }
    false
}

// =============================================================================
// Filters
// =============================================================================

/// Named filter pipelines over values of type `T`.
pub struct FilterRegistry<T> {
    filters: RwLock<HashMap<String, Vec<Entry<FilterFn<T>>>>>,
}

impl<T> FilterRegistry<T> {
    /// Create a new empty filter registry.
    pub fn new() -> Self {
        Self {
            filters: RwLock::new(HashMap::new()),
        }
    }

    /// Add a transform to the pipeline named `name`.
    ///
    /// Returns the hook ID for later removal.
    pub fn add<F>(&self, name: &str, priority: i32, filter: F) -> String
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        let id = generate_hook_id();
        let entry = Entry {
            id: id.clone(),
            priority,
            callback: Arc::new(filter) as FilterFn<T>,
        };
        insert_ordered(self.filters.write().entry(name.to_string()).or_default(), entry);
        tracing::debug!("Added filter '{}' at priority {} (id: {})", name, priority, id);
        id
    }

    /// Remove a filter by ID.
    ///
    /// Returns true if the filter was found and removed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = remove_by_id(&mut self.filters.write(), id);
        if removed {
            tracing::debug!("Removed filter (id: {})", id);
        }
        removed
    }

    /// Run `value` through every filter registered under `name`.
    ///
    /// The chain is snapshotted first, so filters may register further
    /// filters without deadlocking; those take effect on the next run.
    pub fn apply(&self, name: &str, value: T) -> T {
        let chain: Vec<FilterFn<T>> = match self.filters.read().get(name) {
            Some(list) => list.iter().map(|e| Arc::clone(&e.callback)).collect(),
            None => return value,
        };
        tracing::debug!("Applying {} filter(s) for '{}'", chain.len(), name);
        chain.iter().fold(value, |acc, filter| filter(acc))
    }

    /// Check if any filters are registered under `name`.
    pub fn has_filters(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// Get the count of filters registered under `name`.
    pub fn count(&self, name: &str) -> usize {
        self.filters.read().get(name).map_or(0, Vec::len)
    }
}

impl<T> Default for FilterRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Callbacks fired at lifecycle points.
#[derive(Default)]
pub struct ActionRegistry {
    actions: RwLock<HashMap<LifecycleEvent, Vec<Entry<ActionFn>>>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `event`. Returns the hook ID.
    pub fn add<F>(&self, event: LifecycleEvent, priority: i32, action: F) -> String
    where
        F: Fn(&HookContext<'_>) + Send + Sync + 'static,
    {
        let id = generate_hook_id();
        let entry = Entry {
            id: id.clone(),
            priority,
            callback: Arc::new(action) as ActionFn,
        };
        insert_ordered(self.actions.write().entry(event).or_default(), entry);
        tracing::debug!("Added action for {:?} at priority {} (id: {})", event, priority, id);
        id
    }

    /// Remove an action by ID.
    pub fn remove(&self, id: &str) -> bool {
        remove_by_id(&mut self.actions.write(), id)
    }

    /// Fire every callback registered for `event`, in order.
    pub fn run(&self, event: LifecycleEvent, ctx: &HookContext<'_>) {
        let chain: Vec<ActionFn> = match self.actions.read().get(&event) {
            Some(list) => list.iter().map(|e| Arc::clone(&e.callback)).collect(),
            None => return,
        };
        tracing::debug!("Running {} action(s) for {:?}", chain.len(), event);
        for action in chain {
            action(ctx);
        }
    }

    /// Get the count of actions registered for `event`.
    pub fn count(&self, event: LifecycleEvent) -> usize {
        self.actions.read().get(&event).map_or(0, Vec::len)
    }
}

// =============================================================================
// Hook Registry
// =============================================================================

/// Every extension point a host exposes.
#[derive(Default)]
pub struct HookRegistry {
    schema: FilterRegistry<Schema>,
    menu: FilterRegistry<MenuSettings>,
    links: FilterRegistry<Vec<String>>,
    actions: ActionRegistry,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters over settings schemas (`<token>_settings_fields`).
    pub fn schema_filters(&self) -> &FilterRegistry<Schema> {
        &self.schema
    }

    /// Filters over admin menu placement (`<prefix>menu_settings`).
    pub fn menu_filters(&self) -> &FilterRegistry<MenuSettings> {
        &self.menu
    }

    /// Filters over plugin-list action links.
    pub fn link_filters(&self) -> &FilterRegistry<Vec<String>> {
        &self.links
    }

    /// Lifecycle actions.
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }
}
