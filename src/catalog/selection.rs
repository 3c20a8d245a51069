//! Category selection.
//!
//! The catalog UI presents category chips that look multi-select but
//! are single-select with click-to-toggle: picking a new category
//! replaces the old one, picking the current one clears it. The
//! selection is page-session state only and is never persisted.

/// At most one selected category, structurally enforced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    One(String),
}

impl Selection {
    /// Applies a click on `name`: toggles off when it is already the
    /// selection, replaces otherwise.
    pub fn toggle(&mut self, name: &str) {
        *self = match self {
            Selection::One(current) if current.as_str() == name => Selection::None,
            _ => Selection::One(name.to_owned()),
        };
    }

    /// Replaces the selection wholesale. Only the first name is kept;
    /// an empty slice clears.
    pub fn replace(&mut self, names: &[String]) {
        *self = match names.first() {
            Some(name) => Selection::One(name.clone()),
            None => Selection::None,
        };
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            Selection::None => None,
            Selection::One(name) => Some(name),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// Current category filter of a catalog page.
#[derive(Debug, Default)]
pub struct CategoryFilter {
    selection: Selection,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a category click (toggle semantics).
    pub fn select(&mut self, name: &str) {
        self.selection.toggle(name);
    }

    /// Mirrors a "set selected categories" call from the page layer.
    ///
    /// Callers always pass zero or one name. Passing the name that is
    /// already selected clears the selection (the click-to-toggle
    /// contract); passing a different one replaces it; an empty slice
    /// clears.
    pub fn set_selected(&mut self, names: &[String]) {
        match names.first() {
            Some(name) => self.selection.toggle(name),
            None => self.selection = Selection::None,
        }
    }

    pub fn clear(&mut self) {
        self.selection = Selection::None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.as_option()
    }

    /// Selected categories as a list, for callers that speak the
    /// original array shape. Holds zero or one element.
    pub fn selected_names(&self) -> Vec<String> {
        self.selection
            .as_option()
            .map(|name| vec![name.to_owned()])
            .unwrap_or_default()
    }

    /// Whether an item tagged with `category` passes the filter.
    pub fn matches(&self, category: &str) -> bool {
        match self.selection.as_option() {
            Some(selected) => selected == category,
            None => true,
        }
    }
}
