//! The load, normalize, render cycle plus the action dispatcher.
//!
//! Every mutation is a read-modify-write of the whole stored collection
//! followed by a fresh load, so the view never drifts from what is
//! persisted. Dispatch takes `&mut self`, which serializes mutations: each
//! operation's load observes the previous operation's save.

use crate::error::Result;
use crate::operations;
use crate::record::{ItemType, Record, UriScheme};
use crate::store::{KeyValueStore, LoadReport, RecordStore};
use crate::view::{AppState, View, render};

/// A user intent, as produced by a presentation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add,
    Delete { order: u32 },
    MoveToTop { order: u32 },
    Move { from: u32, to: u32 },
    Retype { order: u32, kind: ItemType },
    ToggleMask { order: u32 },
    /// Keystroke-level edit; stored verbatim.
    EditContent { order: u32, text: String },
    /// Focus left the content field; apply type prefixing.
    CommitContent { order: u32 },
    EditNote { order: u32, text: String },
    Search { query: String },
}

/// What an action did, for shells that report back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Added { order: u32 },
    Deleted(Record),
    Moved { order: u32 },
    Retyped { kind: ItemType },
    MaskToggled { masked: bool },
    ContentSaved { content: String },
    NoteSaved,
    Searched { matches: usize },
}

pub struct Reconciler<S> {
    store: RecordStore<S>,
    state: AppState,
    uri: UriScheme,
}

impl<S: KeyValueStore> Reconciler<S> {
    pub fn new(store: RecordStore<S>, uri: UriScheme) -> Self {
        Self { store, state: AppState::default(), uri }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn uri(&self) -> &UriScheme {
        &self.uri
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn view(&self) -> View {
        render(&self.state, &self.uri)
    }

    /// Reload from the store and re-render with `query`.
    pub fn refresh(&mut self, query: &str) -> Result<View> {
        self.state.query = query.trim().to_string();
        let mut items = self.store.load()?;
        operations::sort_by_order(&mut items);
        self.state.items = items;
        Ok(self.view())
    }

    /// Force a load and report whether stored data had to be upgraded.
    pub fn migrate(&mut self) -> Result<LoadReport> {
        let (mut items, report) = self.store.load_with_report()?;
        operations::sort_by_order(&mut items);
        self.state.items = items;
        Ok(report)
    }

    /// Look up a record in the last refreshed state.
    pub fn item(&self, order: u32) -> Option<&Record> {
        self.state.items.iter().find(|r| r.order == order)
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Effect> {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Add => self.mutate(|items, _| {
                Ok(Effect::Added { order: operations::add(items) })
            }),
            Action::Delete { order } => self.mutate(|items, _| {
                operations::delete(items, order).map(Effect::Deleted)
            }),
            Action::MoveToTop { order } => self.mutate(|items, _| {
                operations::move_to_top(items, order)?;
                Ok(Effect::Moved { order: 0 })
            }),
            Action::Move { from, to } => self.mutate(|items, _| {
                let order = operations::move_item(items, from, to)?;
                Ok(Effect::Moved { order })
            }),
            Action::Retype { order, kind } => self.mutate(|items, _| {
                operations::retype(items, order, kind)?;
                Ok(Effect::Retyped { kind })
            }),
            Action::ToggleMask { order } => self.mutate(|items, _| {
                let masked = operations::toggle_mask(items, order)?;
                Ok(Effect::MaskToggled { masked })
            }),
            Action::EditContent { order, text } => self.mutate(|items, _| {
                operations::edit_content(items, order, &text)?;
                Ok(Effect::ContentSaved { content: text.clone() })
            }),
            Action::CommitContent { order } => self.mutate(|items, uri| {
                let content = operations::commit_content(items, order, uri)?;
                Ok(Effect::ContentSaved { content })
            }),
            Action::EditNote { order, text } => self.mutate(|items, _| {
                operations::edit_note(items, order, &text)?;
                Ok(Effect::NoteSaved)
            }),
            Action::Search { query } => {
                let view = self.refresh(&query)?;
                Ok(Effect::Searched { matches: view.match_count() })
            }
        }
    }

    /// Apply actions strictly in sequence, stopping at the first error.
    pub fn dispatch_all(
        &mut self,
        actions: impl IntoIterator<Item = Action>,
    ) -> Result<Vec<Effect>> {
        actions.into_iter().map(|action| self.dispatch(action)).collect()
    }

    fn mutate<T>(
        &mut self,
        apply: impl FnOnce(&mut Vec<Record>, &UriScheme) -> Result<T>,
    ) -> Result<T> {
        let mut items = self.store.load()?;
        operations::sort_by_order(&mut items);
        let out = apply(&mut items, &self.uri)?;
        operations::renumber(&mut items);
        self.store.save(&items)?;
        let query = self.state.query.clone();
        self.refresh(&query)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{COLLECTION_KEY, JsonFileStore, MemoryStore};
    use crate::view::ViewStatus;
    use tempfile::tempdir;

    fn memory() -> Reconciler<MemoryStore> {
        Reconciler::new(RecordStore::new(MemoryStore::new()), UriScheme::new("scheme"))
    }

    #[test]
    fn test_add_commit_add_delete_scenario() {
        let mut shelf = memory();
        shelf.dispatch(Action::Add).unwrap();
        assert_eq!(shelf.state().items.len(), 1);
        assert_eq!(shelf.state().items[0].order, 0);
        assert_eq!(shelf.state().items[0].content, "");

        shelf
            .dispatch_all([
                Action::Retype { order: 0, kind: ItemType::Video },
                Action::EditContent { order: 0, text: "12345".to_string() },
                Action::CommitContent { order: 0 },
            ])
            .unwrap();
        assert_eq!(shelf.state().items[0].content, "scheme://video/12345");

        shelf.dispatch(Action::Add).unwrap();
        assert_eq!(shelf.state().items[1].content, "scheme://video/12345");
        assert_eq!(shelf.state().items[1].order, 1);
        assert_eq!(shelf.state().items[0].order, 0);

        let effect = shelf.dispatch(Action::Delete { order: 1 }).unwrap();
        assert!(matches!(effect, Effect::Deleted(r) if r.content == "scheme://video/12345"));
        assert_eq!(shelf.state().items.len(), 1);
        assert_eq!(shelf.state().items[0].order, 0);
        assert_eq!(shelf.state().items[0].content, "");
    }

    #[test]
    fn test_mask_persists_across_reload() {
        let dir = tempdir().unwrap();
        let open = || {
            Reconciler::new(
                RecordStore::new(JsonFileStore::in_dir(dir.path())),
                UriScheme::default(),
            )
        };
        let mut first = open();
        first.dispatch(Action::Add).unwrap();
        let effect = first.dispatch(Action::ToggleMask { order: 0 }).unwrap();
        assert_eq!(effect, Effect::MaskToggled { masked: true });

        let mut second = open();
        second.refresh("").unwrap();
        assert!(second.item(0).unwrap().masked);
    }

    #[test]
    fn test_search_keeps_query_across_mutations_and_never_writes() {
        let mut shelf = memory();
        shelf
            .dispatch_all([
                Action::Add,
                Action::EditNote { order: 0, text: "foobar".to_string() },
                Action::Add,
                Action::EditNote { order: 0, text: "baz".to_string() },
            ])
            .unwrap();
        let before = shelf.store().backend().get(COLLECTION_KEY).unwrap();

        let effect = shelf.dispatch(Action::Search { query: "FOO".to_string() }).unwrap();
        assert_eq!(effect, Effect::Searched { matches: 1 });
        assert_eq!(shelf.store().backend().get(COLLECTION_KEY).unwrap(), before);

        shelf.dispatch(Action::Add).unwrap();
        let view = shelf.view();
        assert_eq!(view.query.as_deref(), Some("FOO"));
        assert_eq!(view.match_count(), 1);
        assert_eq!(view.total, 3);
    }

    #[test]
    fn test_sequential_edits_are_not_lost() {
        let mut shelf = memory();
        shelf.dispatch_all([Action::Add, Action::Add]).unwrap();
        shelf
            .dispatch_all([
                Action::EditNote { order: 0, text: "first".to_string() },
                Action::EditNote { order: 1, text: "second".to_string() },
            ])
            .unwrap();
        let notes: Vec<&str> =
            shelf.state().items.iter().map(|r| r.note.as_str()).collect();
        assert_eq!(notes, vec!["first", "second"]);
    }

    #[test]
    fn test_failed_action_leaves_store_untouched() {
        let mut shelf = memory();
        shelf.dispatch(Action::Add).unwrap();
        let before = shelf.store().backend().get(COLLECTION_KEY).unwrap();
        assert!(shelf.dispatch(Action::Delete { order: 3 }).is_err());
        assert_eq!(shelf.store().backend().get(COLLECTION_KEY).unwrap(), before);
    }

    #[test]
    fn test_empty_view_after_deleting_everything() {
        let mut shelf = memory();
        shelf.dispatch(Action::Add).unwrap();
        shelf.dispatch(Action::Delete { order: 0 }).unwrap();
        assert_eq!(shelf.view().status, ViewStatus::Empty);
    }
}
