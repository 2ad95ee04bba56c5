use serde::Serialize;

use crate::middleware::Notice;

/// A row that can be matched by the screen's search box.
pub trait Searchable {
    /// The displayed fields the search box looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any search field. `needle`
    /// is already lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Loading,
    Ready,
}

/// Rows fetched for one screen plus its search text. Filtering always
/// runs over the full fetched set.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    noun: &'static str,
    phase: LoadPhase,
    rows: Vec<T>,
    search: String,
    notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct ListView<'a, T: Serialize> {
    pub phase: LoadPhase,
    pub search: &'a str,
    pub total: usize,
    pub rows: Vec<&'a T>,
    /// Loading text, or the empty-state text when nothing is shown.
    pub message: Option<String>,
    pub notice: Option<&'a Notice>,
}

impl<T: Searchable + Serialize> ListState<T> {
    pub fn loading(noun: &'static str) -> Self {
        Self {
            noun,
            phase: LoadPhase::Loading,
            rows: Vec::new(),
            search: String::new(),
            notice: None,
        }
    }

    pub fn loaded(mut self, rows: Vec<T>) -> Self {
        self.rows = rows;
        self.phase = LoadPhase::Ready;
        self
    }

    /// The fetch failed: keep what was there and surface a notice.
    pub fn failed(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self.phase = LoadPhase::Ready;
        self
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        if let Some(search) = search {
            self.set_search(search);
        }
        self
    }

    pub fn filtered(&self) -> Vec<&T> {
        if self.search.is_empty() {
            return self.rows.iter().collect();
        }
        let needle = self.search.to_lowercase();
        self.rows.iter().filter(|row| row.matches(&needle)).collect()
    }

    pub fn view(&self) -> ListView<'_, T> {
        let rows = self.filtered();
        let message = match self.phase {
            LoadPhase::Loading => Some(format!("Loading {}...", self.noun)),
            LoadPhase::Ready if !rows.is_empty() => None,
            LoadPhase::Ready if self.search.is_empty() => Some(format!("No {} found.", self.noun)),
            LoadPhase::Ready => Some(format!("No {} found. Try adjusting your search.", self.noun)),
        };

        ListView {
            phase: self.phase,
            search: &self.search,
            total: self.rows.len(),
            rows,
            message,
            notice: self.notice.as_ref(),
        }
    }
}
