//! Pure rendering from application state to a view description.
//! Shells draw a `View`; they never read the store themselves.

use crate::record::{ItemType, Record, UriScheme};
use crate::search::{Span, filter, highlight};

/// State owned by the reconciler: the last loaded collection (sorted by
/// order) and the active search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub items: Vec<Record>,
    pub query: String,
}

impl AppState {
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing stored at all.
    Empty,
    /// Items exist but none match the query.
    NoMatches,
    Items,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub order: u32,
    pub kind: ItemType,
    pub content: Vec<Span>,
    pub raw_content: String,
    /// What the QR code encodes; `None` until content is typed.
    pub payload: Option<String>,
    pub note: Vec<Span>,
    pub masked: bool,
}

impl ItemView {
    pub fn mask_label(&self) -> &'static str {
        if self.masked { "Unmask" } else { "Mask" }
    }

    pub fn has_code(&self) -> bool {
        self.payload.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub status: ViewStatus,
    pub query: Option<String>,
    pub total: usize,
    pub items: Vec<ItemView>,
}

impl View {
    pub fn match_count(&self) -> usize {
        self.items.len()
    }
}

pub fn render(state: &AppState, uri: &UriScheme) -> View {
    let query = state.query.trim();
    let visible = filter(&state.items, query);
    let status = if state.items.is_empty() {
        ViewStatus::Empty
    } else if visible.is_empty() {
        ViewStatus::NoMatches
    } else {
        ViewStatus::Items
    };

    let items = visible
        .iter()
        .map(|r| ItemView {
            order: r.order,
            kind: r.kind,
            content: highlight(&r.content, query),
            raw_content: r.content.clone(),
            payload: uri.qr_payload(r.kind, &r.content),
            note: highlight(&r.note, query),
            masked: r.masked,
        })
        .collect();

    View {
        status,
        query: state.has_query().then(|| query.to_string()),
        total: state.items.len(),
        items,
    }
}
