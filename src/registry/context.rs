use crate::field::TabIndexStart;

/// Counters shared by every registration batch run against one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationContext {
    field_count: usize,
    last_tab_index: i32,
    batch_start: i32,
}

impl Default for RegistrationContext {
    fn default() -> Self {
        Self {
            field_count: 0,
            last_tab_index: -1,
            batch_start: 0,
        }
    }
}

impl RegistrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Highest tab index issued so far, `-1` before any.
    pub fn last_tab_index(&self) -> i32 {
        self.last_tab_index
    }

    /// Fixes the index the next batch counts from.
    pub fn begin_batch(&mut self, requested: TabIndexStart) {
        self.batch_start = match requested {
            TabIndexStart::At(index) => index,
            TabIndexStart::Continue | TabIndexStart::Disabled => self.last_tab_index + 1,
        };
    }

    /// Tab index for the field at `position` in the current batch, or `None` when disabled.
    pub fn tab_index_for(&self, start: TabIndexStart, position: usize) -> Option<i32> {
        let base = match start {
            TabIndexStart::Disabled => return None,
            TabIndexStart::At(index) => index,
            TabIndexStart::Continue => self.batch_start,
        };
        Some(base.saturating_add(i32::try_from(position).unwrap_or(i32::MAX)))
    }

    pub(crate) fn record_tab_index(&mut self, index: i32) {
        self.last_tab_index = self.last_tab_index.max(index);
    }

    pub(crate) fn count_field(&mut self) {
        self.field_count += 1;
    }
}
