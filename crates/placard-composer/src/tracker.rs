//! Composer context tracker.
//!
//! [`ComposerTracker`] owns the current [`ComposerContext`] and turns each
//! event into exactly one resolution. Every accepted event takes the next
//! [`ContextVersion`]; a result is published only if its version is still
//! the latest when it completes and is newer than anything already
//! published. With synchronous lookups that always holds. With async
//! lookups it means a slow resolution for an old context is dropped instead
//! of overwriting the placeholder of a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use placard_core::{AsyncCategoryLookup, CategoryLookup, ComposerContext, ContextVersion, Placeholder};
use placard_resolve::{resolve, resolve_async};
use placard_settings::ConfigurationStore;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::emitter::{PlaceholderEmitter, PlaceholderUpdate};
use crate::events::{ComposerEvent, Transition, apply_event};

/// A context change waiting for its resolution.
#[derive(Clone, Copy, Debug)]
struct Ticket {
    version: ContextVersion,
    context: ComposerContext,
}

/// Tracks composer context and publishes the resolved placeholder.
pub struct ComposerTracker {
    store: Arc<ConfigurationStore>,
    context: Mutex<Option<ComposerContext>>,
    latest: AtomicU64,
    published: RwLock<Option<PlaceholderUpdate>>,
    emitter: PlaceholderEmitter,
}

impl ComposerTracker {
    /// Create a tracker resolving against `store`'s current snapshot.
    pub fn new(store: Arc<ConfigurationStore>) -> Self {
        Self::with_emitter(store, PlaceholderEmitter::new())
    }

    /// Create a tracker publishing through `emitter`.
    pub fn with_emitter(store: Arc<ConfigurationStore>, emitter: PlaceholderEmitter) -> Self {
        Self {
            store,
            context: Mutex::new(None),
            latest: AtomicU64::new(ContextVersion::INITIAL.get()),
            published: RwLock::new(None),
            emitter,
        }
    }

    /// Apply `event`, resolve synchronously, and publish.
    ///
    /// Returns the published update, or `None` when the event closed the
    /// composer, was ignored, or was superseded.
    pub fn handle(
        &self,
        event: ComposerEvent,
        lookup: &impl CategoryLookup,
    ) -> Option<PlaceholderUpdate> {
        let ticket = self.begin(event)?;
        let snapshot = self.store.snapshot();
        let placeholder = resolve(&ticket.context, &snapshot, lookup);
        self.complete(ticket, placeholder)
    }

    /// Apply `event` and resolve with a lookup that may fetch.
    ///
    /// The context and its version are fixed before the first await; if
    /// another event is handled meanwhile, this result is discarded.
    pub async fn handle_async(
        &self,
        event: ComposerEvent,
        lookup: &dyn AsyncCategoryLookup,
    ) -> Option<PlaceholderUpdate> {
        let ticket = self.begin(event)?;
        let snapshot = self.store.snapshot();
        let resolution = resolve_async(&ticket.context, &snapshot, lookup).await;
        self.complete(ticket, resolution.placeholder)
    }

    /// Re-resolve the open composer after the configuration was replaced.
    ///
    /// Counts as a context change: it takes a new version.
    pub fn refresh(&self, lookup: &impl CategoryLookup) -> Option<PlaceholderUpdate> {
        let ticket = {
            let context = self.context.lock();
            let current = (*context)?;
            Ticket {
                version: self.next_version(),
                context: current,
            }
        };
        let snapshot = self.store.snapshot();
        let placeholder = resolve(&ticket.context, &snapshot, lookup);
        self.complete(ticket, placeholder)
    }

    /// The context the composer currently targets.
    pub fn context(&self) -> Option<ComposerContext> {
        *self.context.lock()
    }

    /// Version of the most recent context change.
    pub fn latest_version(&self) -> ContextVersion {
        ContextVersion::new(self.latest.load(Ordering::Acquire))
    }

    /// The update the render surface should currently show.
    pub fn current(&self) -> Option<PlaceholderUpdate> {
        self.published.read().clone()
    }

    /// Text for the render surface, or `default` without an override.
    pub fn display_text(&self, default: &str) -> String {
        self.published
            .read()
            .as_ref()
            .map_or(default, |u| u.placeholder.or_default(default))
            .to_owned()
    }

    /// Subscribe to published updates.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaceholderUpdate> {
        self.emitter.subscribe()
    }

    fn next_version(&self) -> ContextVersion {
        ContextVersion::new(self.latest.fetch_add(1, Ordering::AcqRel)).next()
    }

    /// Apply the event to the context and, if it changed, issue a ticket.
    fn begin(&self, event: ComposerEvent) -> Option<Ticket> {
        let mut context = self.context.lock();
        match apply_event(*context, event) {
            Transition::Changed(next) => {
                *context = Some(next);
                let version = self.next_version();
                debug!(event = event.name(), %version, ?next, "composer context changed");
                Some(Ticket {
                    version,
                    context: next,
                })
            }
            Transition::Cleared => {
                *context = None;
                let version = self.next_version();
                *self.published.write() = None;
                debug!(%version, "composer closed");
                None
            }
            Transition::Ignored => {
                debug!(event = event.name(), "no open composer, ignoring event");
                None
            }
        }
    }

    /// Publish the result for `ticket` unless a newer context exists.
    fn complete(&self, ticket: Ticket, placeholder: Placeholder) -> Option<PlaceholderUpdate> {
        let mut published = self.published.write();

        let latest = self.latest_version();
        let already_newer = published
            .as_ref()
            .is_some_and(|p| p.version >= ticket.version);
        if ticket.version != latest || already_newer {
            debug!(
                version = %ticket.version,
                %latest,
                "discarding stale placeholder resolution"
            );
            return None;
        }

        let update = PlaceholderUpdate {
            version: ticket.version,
            context: ticket.context,
            placeholder,
        };
        *published = Some(update.clone());
        drop(published);

        info!(
            version = %update.version,
            category_id = ?update.context.category_id.map(|c| c.get()),
            mode = %update.context.mode,
            is_override = update.placeholder.is_override(),
            "placeholder published"
        );
        let _ = self.emitter.emit(update.clone());
        Some(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use placard_core::{CategoryId, CategoryTree, ComposerMode};
    use placard_settings::{ConfigurationSet, PlaceholderRule};
    use tokio::sync::{Notify, Semaphore};

    fn id(raw: u64) -> CategoryId {
        CategoryId::new(raw)
    }

    fn rule(ids: &[u64], topic: &str, reply: &str) -> PlaceholderRule {
        PlaceholderRule::new(
            ids.iter().copied().map(id),
            Some(topic.to_owned()),
            Some(reply.to_owned()),
        )
        .unwrap()
    }

    fn tracker_with(rules: Vec<PlaceholderRule>, inherit: bool) -> ComposerTracker {
        let store = Arc::new(ConfigurationStore::new(ConfigurationSet::new(rules, inherit)));
        ComposerTracker::new(store)
    }

    fn family() -> CategoryTree {
        let mut tree = CategoryTree::new();
        tree.insert(id(11), Some(id(10)));
        tree
    }

    #[test]
    fn new_topic_then_reply_elsewhere() {
        let tracker = tracker_with(
            vec![rule(&[1], "New topic specific placeholder", "Reply specific placeholder")],
            false,
        );
        let tree = family();

        let first = tracker.handle(ComposerEvent::open_new_topic(id(1)), &tree).unwrap();
        assert_eq!(first.placeholder, "New topic specific placeholder");

        // Minimize the draft, navigate to a topic in the same category, reply.
        let second = tracker.handle(ComposerEvent::open_reply(id(1)), &tree).unwrap();
        assert_eq!(second.placeholder, "Reply specific placeholder");
        assert!(second.version > first.version);
        assert_eq!(tracker.current(), Some(second));
    }

    #[test]
    fn no_leakage_between_contexts() {
        let tracker = tracker_with(vec![rule(&[1], "T1", "R1")], false);
        let tree = CategoryTree::new();

        let _ = tracker.handle(ComposerEvent::open_new_topic(id(1)), &tree);
        let update = tracker.handle(ComposerEvent::open_reply(id(2)), &tree).unwrap();
        assert_eq!(update.placeholder, "");
        assert_eq!(tracker.display_text("Type here or paste"), "Type here or paste");
    }

    #[test]
    fn mode_and_category_switches_resolve_once_each() {
        let tracker = tracker_with(vec![rule(&[10], "PT", "PR"), rule(&[20], "T20", "R20")], true);
        let tree = family();
        let mut rx = tracker.subscribe();

        let _ = tracker.handle(ComposerEvent::open_new_topic(id(11)), &tree);
        let _ = tracker.handle(ComposerEvent::ModeChanged { mode: ComposerMode::Reply }, &tree);
        let _ = tracker.handle(
            ComposerEvent::CategoryChanged { category_id: Some(id(20)) },
            &tree,
        );

        let texts: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|u| u.placeholder.into_string())
            .collect();
        assert_eq!(texts, vec!["PT", "PR", "R20"]);
        assert_eq!(tracker.latest_version(), ContextVersion::new(3));
    }

    #[test]
    fn events_without_open_composer_are_ignored() {
        let tracker = tracker_with(vec![rule(&[1], "T", "R")], false);
        let tree = CategoryTree::new();

        assert!(
            tracker
                .handle(ComposerEvent::ModeChanged { mode: ComposerMode::Reply }, &tree)
                .is_none()
        );
        assert_eq!(tracker.latest_version(), ContextVersion::INITIAL);
        assert!(tracker.current().is_none());
    }

    #[test]
    fn close_clears_published_value() {
        let tracker = tracker_with(vec![rule(&[1], "T", "R")], false);
        let tree = CategoryTree::new();

        let _ = tracker.handle(ComposerEvent::open_new_topic(id(1)), &tree);
        assert!(tracker.handle(ComposerEvent::Closed, &tree).is_none());
        assert!(tracker.current().is_none());
        assert!(tracker.context().is_none());

        // A mode switch after close has nothing to apply to.
        assert!(
            tracker
                .handle(ComposerEvent::ModeChanged { mode: ComposerMode::Reply }, &tree)
                .is_none()
        );
    }

    #[test]
    fn refresh_picks_up_replaced_configuration() {
        let store = Arc::new(ConfigurationStore::new(ConfigurationSet::new(
            vec![rule(&[1], "before", "before")],
            false,
        )));
        let tracker = ComposerTracker::new(Arc::clone(&store));
        let tree = CategoryTree::new();

        let _ = tracker.handle(ComposerEvent::open_new_topic(id(1)), &tree);
        let _ = store.replace(ConfigurationSet::new(vec![rule(&[1], "after", "after")], false));

        let update = tracker.refresh(&tree).unwrap();
        assert_eq!(update.placeholder, "after");
        assert_eq!(tracker.display_text("default"), "after");
    }

    #[test]
    fn refresh_without_open_composer_is_noop() {
        let tracker = tracker_with(Vec::new(), false);
        assert!(tracker.refresh(&CategoryTree::new()).is_none());
        assert_eq!(tracker.latest_version(), ContextVersion::INITIAL);
    }

    /// Lookup that blocks every parent query until the gate opens.
    struct GatedLookup {
        tree: CategoryTree,
        entered: Notify,
        gate: Semaphore,
    }

    #[async_trait]
    impl AsyncCategoryLookup for GatedLookup {
        async fn parent_of(&self, id: CategoryId) -> Option<CategoryId> {
            self.entered.notify_one();
            drop(self.gate.acquire().await);
            CategoryLookup::parent_of(&self.tree, id)
        }
    }

    #[tokio::test]
    async fn stale_async_resolution_is_discarded() {
        let tracker = Arc::new(tracker_with(
            vec![rule(&[10], "PT", "PR"), rule(&[2], "T2", "R2")],
            true,
        ));
        let gated = Arc::new(GatedLookup {
            tree: family(),
            entered: Notify::new(),
            gate: Semaphore::new(0),
        });

        let slow = {
            let tracker = Arc::clone(&tracker);
            let gated = Arc::clone(&gated);
            tokio::spawn(async move {
                tracker
                    .handle_async(ComposerEvent::open_new_topic(id(11)), gated.as_ref())
                    .await
            })
        };

        // The slow resolution has taken its version and is waiting on the lookup.
        gated.entered.notified().await;

        let fast = tracker
            .handle(ComposerEvent::open_reply(id(2)), &family())
            .unwrap();
        assert_eq!(fast.placeholder, "R2");

        gated.gate.add_permits(1);
        let stale = slow.await.unwrap();
        assert!(stale.is_none());

        let current = tracker.current().unwrap();
        assert_eq!(current.version, fast.version);
        assert_eq!(current.placeholder, "R2");
    }

    #[tokio::test]
    async fn async_resolution_publishes_when_current() {
        let tracker = tracker_with(vec![rule(&[10], "PT", "PR")], true);
        let tree = family();

        let update = tracker
            .handle_async(ComposerEvent::open_new_topic(id(11)), &tree)
            .await
            .unwrap();
        assert_eq!(update.placeholder, "PT");
        assert_eq!(tracker.current(), Some(update));
    }
}
