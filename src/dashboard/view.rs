use crate::dashboard::selection::Selection;
use crate::dashboard::sort::SortState;
use crate::domain::subscriber::Subscriber;

/// The subscribers currently visible in the table, in display order.
/// Derived from the raw collection; thrown away and rebuilt on every filter
/// or sort change.
#[derive(Debug, Default)]
pub struct FilteredView {
    rows: Vec<Subscriber>,
}

/// One table row as handed to the renderer: selection is resolved to a flag
/// here, at render time, so stored selections never reference positions.
#[derive(Debug)]
pub struct TableRow<'a> {
    pub selected: bool,
    pub subscriber: &'a Subscriber,
}

impl FilteredView {
    pub(crate) fn new(rows: Vec<Subscriber>) -> FilteredView {
        FilteredView { rows }
    }

    pub fn rows(&self) -> &[Subscriber] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Subscriber> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort_by(&mut self, state: &SortState) {
        // Vec::sort_by is stable, so equal keys keep their relative order
        self.rows.sort_by(|a, b| state.compare(a, b));
    }

    pub fn table_rows(&self, selection: &Selection) -> Vec<TableRow<'_>> {
        self.rows
            .iter()
            .map(|subscriber| TableRow {
                selected: selection.contains(&subscriber.key()),
                subscriber,
            })
            .collect()
    }
}
