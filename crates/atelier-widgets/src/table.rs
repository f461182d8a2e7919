#![forbid(unsafe_code)]

//! Data table: sortable columns, row selection, loading skeleton.
//!
//! The table never mutates the caller's rows. Sorting produces an index
//! permutation over the supplied slice; clearing the sort restores the
//! slice's own order. Selection is keyed by row id, not index, so it
//! survives re-sorting and refetches.
//!
//! Hit regions: header cells carry the column index, body rows carry the
//! index into the supplied row slice (after sorting), so a mouse click
//! maps straight back to the caller's data.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use atelier_core::geometry::Rect;
use atelier_render::{Frame, HitId, HitRegion};
use atelier_style::{Style, theme};

use crate::block::Alignment;
use crate::responsive::Breakpoint;
use crate::{StatefulWidget, draw_text_span, set_style_area};

/// Hit region for header cells; hit data is the visible column index.
pub const TABLE_HIT_HEADER: HitRegion = HitRegion::Custom(20);
/// Hit region for body rows; hit data is the index into the row slice.
pub const TABLE_HIT_ROW: HitRegion = HitRegion::Custom(21);
/// Hit region for the select-all checkbox in the header.
pub const TABLE_HIT_SELECT_ALL: HitRegion = HitRegion::Custom(22);

/// A cell's comparable, displayable value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n:.2}")
                }
            }
            Self::Empty => String::from("\u{2014}"),
        }
    }

    /// Total order for sorting. Empty sorts first, then numbers, then
    /// text (case-insensitive).
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Empty, Self::Empty) => Ordering::Equal,
            (Self::Empty, _) => Ordering::Less,
            (_, Self::Empty) => Ordering::Greater,
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn indicator(self) -> char {
        match self {
            Self::Ascending => '▲',
            Self::Descending => '▼',
        }
    }
}

/// Which rows a select-all gesture covers. Always passed explicitly so
/// call sites say what "all" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllScope {
    CurrentPage,
}

type Accessor<R> = fn(&R) -> CellValue;

/// Column definition for row type `R`.
pub struct Column<R> {
    key: &'static str,
    title: &'static str,
    accessor: Accessor<R>,
    sortable: bool,
    width: Option<u16>,
    align: Alignment,
    min_breakpoint: Breakpoint,
}

impl<R> Column<R> {
    pub fn new(key: &'static str, title: &'static str, accessor: Accessor<R>) -> Self {
        Self {
            key,
            title,
            accessor,
            sortable: false,
            width: None,
            align: Alignment::Left,
            min_breakpoint: Breakpoint::Mobile,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Fixed width in columns. Unset columns share the leftover space.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Hide this column below the given breakpoint.
    pub fn min_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.min_breakpoint = breakpoint;
        self
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Narrowest breakpoint at which this column is shown.
    #[must_use]
    pub fn visible_from(&self) -> Breakpoint {
        self.min_breakpoint
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

/// Sort, selection, and cursor state. Keyed by row id.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    sort: Option<(&'static str, SortDirection)>,
    selection: BTreeSet<String>,
    cursor: usize,
}

impl TableState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sort(&self) -> Option<(&'static str, SortDirection)> {
        self.sort
    }

    /// Cycle the sort for a column: ascending, then descending, then
    /// back to unsorted. Sorting a different column starts at ascending.
    pub fn toggle_sort(&mut self, key: &'static str) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == key => {
                Some((key, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == key => None,
            _ => Some((key, SortDirection::Ascending)),
        };
    }

    /// Index permutation of `rows` under the current sort. With no sort
    /// active this is the identity, so the caller's original order shows
    /// through untouched.
    #[must_use]
    pub fn sorted_indices<R>(&self, rows: &[R], columns: &[Column<R>]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        let Some((key, direction)) = self.sort else {
            return indices;
        };
        let Some(column) = columns.iter().find(|col| col.key == key) else {
            return indices;
        };

        indices.sort_by(|&a, &b| {
            let ord = (column.accessor)(&rows[a]).compare(&(column.accessor)(&rows[b]));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        indices
    }

    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.selection.contains(key)
    }

    #[must_use]
    pub fn selected_keys(&self) -> impl Iterator<Item = &str> {
        self.selection.iter().map(String::as_str)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn toggle_selected(&mut self, key: &str) {
        if !self.selection.remove(key) {
            self.selection.insert(key.to_owned());
        }
    }

    /// Select every key in `page_keys`. If all of them are already
    /// selected, deselect them instead. Keys outside the slice are
    /// never touched.
    pub fn toggle_select_all<'k>(
        &mut self,
        scope: SelectAllScope,
        page_keys: impl IntoIterator<Item = &'k str>,
    ) {
        let SelectAllScope::CurrentPage = scope;
        let keys: Vec<&str> = page_keys.into_iter().collect();
        if keys.is_empty() {
            return;
        }
        if keys.iter().all(|key| self.selection.contains(*key)) {
            for key in keys {
                self.selection.remove(key);
            }
        } else {
            for key in keys {
                self.selection.insert(key.to_owned());
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize, row_count: usize) {
        if row_count == 0 {
            self.cursor = 0;
            return;
        }
        let max = row_count - 1;
        self.cursor = self
            .cursor
            .min(max)
            .saturating_add_signed(delta)
            .min(max);
    }
}

/// The table widget. Borrows columns and the current page of rows.
pub struct Table<'a, R> {
    columns: &'a [Column<R>],
    rows: &'a [R],
    row_key: fn(&R) -> String,
    hit_id: HitId,
    breakpoint: Breakpoint,
    selectable: bool,
    loading: bool,
    skeleton_rows: u16,
    empty_text: &'a str,
}

impl<'a, R> Table<'a, R> {
    pub fn new(columns: &'a [Column<R>], rows: &'a [R], row_key: fn(&R) -> String) -> Self {
        Self {
            columns,
            rows,
            row_key,
            hit_id: HitId::new(0),
            breakpoint: Breakpoint::Desktop,
            selectable: false,
            loading: false,
            skeleton_rows: 5,
            empty_text: "No records",
        }
    }

    /// Identifier attached to this table's hit regions.
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = id;
        self
    }

    pub fn breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    /// Show the selection column and select-all header checkbox.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Render placeholder rows instead of data.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn skeleton_rows(mut self, rows: u16) -> Self {
        self.skeleton_rows = rows;
        self
    }

    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }

    fn visible_columns(&self) -> Vec<&Column<R>> {
        self.columns
            .iter()
            .filter(|col| self.breakpoint >= col.min_breakpoint)
            .collect()
    }

    fn column_widths(&self, columns: &[&Column<R>], total: u16) -> Vec<u16> {
        let gaps = columns.len().saturating_sub(1) as u16;
        let available = total.saturating_sub(gaps);
        let fixed: u16 = columns.iter().filter_map(|col| col.width).sum();
        let flex_count = columns.iter().filter(|col| col.width.is_none()).count() as u16;
        let flex_each = if flex_count > 0 {
            available.saturating_sub(fixed) / flex_count
        } else {
            0
        };
        columns
            .iter()
            .map(|col| col.width.unwrap_or(flex_each))
            .collect()
    }

    fn draw_aligned(
        frame: &mut Frame,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        align: Alignment,
        style: Style,
    ) {
        use unicode_width::UnicodeWidthStr;
        let text_width = (UnicodeWidthStr::width(text) as u16).min(width);
        let offset = match align {
            Alignment::Left => 0,
            Alignment::Center => (width - text_width) / 2,
            Alignment::Right => width - text_width,
        };
        draw_text_span(frame, x + offset, y, text, style, x + width);
    }
}

impl<R> StatefulWidget for Table<'_, R> {
    type State = TableState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.is_empty() || area.height < 2 {
            return;
        }

        let columns = self.visible_columns();
        if columns.is_empty() {
            return;
        }

        let select_width: u16 = if self.selectable { 4 } else { 0 };
        let widths = self.column_widths(&columns, area.width.saturating_sub(select_width));

        // Header row.
        let header_y = area.y;
        let mut x = area.x;
        if self.selectable {
            let page_keys: Vec<String> = self.rows.iter().map(self.row_key).collect();
            let all_selected =
                !page_keys.is_empty() && page_keys.iter().all(|key| state.is_selected(key));
            let mark = if all_selected { "[x]" } else { "[ ]" };
            draw_text_span(frame, x, header_y, mark, theme::table_header(), area.right());
            frame.register_hit(
                Rect::new(x, header_y, 3, 1),
                self.hit_id,
                TABLE_HIT_SELECT_ALL,
                0,
            );
            x += select_width;
        }
        for (i, (column, width)) in columns.iter().zip(&widths).enumerate() {
            if *width == 0 {
                continue;
            }
            let mut title = column.title.to_owned();
            if let Some((key, direction)) = state.sort
                && key == column.key
            {
                title.push(' ');
                title.push(direction.indicator());
            }
            Self::draw_aligned(
                frame,
                x,
                header_y,
                *width,
                &title,
                column.align,
                theme::table_header(),
            );
            if column.sortable {
                frame.register_hit(
                    Rect::new(x, header_y, *width, 1),
                    self.hit_id,
                    TABLE_HIT_HEADER,
                    i as u32,
                );
            }
            x += width + 1;
        }

        let body = Rect::new(area.x, area.y + 1, area.width, area.height - 1);

        if self.loading {
            self.render_skeleton(body, frame, &widths, select_width);
            return;
        }

        if self.rows.is_empty() {
            let y = body.y + body.height / 2;
            Self::draw_aligned(
                frame,
                body.x,
                y,
                body.width,
                self.empty_text,
                Alignment::Center,
                theme::placeholder(),
            );
            return;
        }

        let order = state.sorted_indices(self.rows, self.columns);
        state.move_cursor(0, order.len());

        for (visible_row, &row_index) in order.iter().enumerate() {
            let y = body.y + visible_row as u16;
            if y >= body.bottom() {
                break;
            }
            let row = &self.rows[row_index];
            let key = (self.row_key)(row);
            let selected = state.is_selected(&key);
            let under_cursor = visible_row == state.cursor;

            let row_rect = Rect::new(area.x, y, area.width, 1);
            if under_cursor {
                set_style_area(&mut frame.buffer, row_rect, Style::new().bg(theme::SURFACE));
            }

            let base = if selected {
                Style::new().fg(theme::PRIMARY)
            } else {
                Style::default()
            };

            let mut x = area.x;
            if self.selectable {
                let mark = if selected { "[x]" } else { "[ ]" };
                draw_text_span(frame, x, y, mark, base, area.right());
                x += select_width;
            }
            for (column, width) in columns.iter().zip(&widths) {
                if *width == 0 {
                    continue;
                }
                let value = (column.accessor)(row);
                let style = if matches!(value, CellValue::Empty) {
                    base.patch(theme::placeholder())
                } else {
                    base
                };
                Self::draw_aligned(frame, x, y, *width, &value.display(), column.align, style);
                x += width + 1;
            }

            frame.register_hit(row_rect, self.hit_id, TABLE_HIT_ROW, row_index as u32);
        }
    }
}

impl<R> Table<'_, R> {
    fn render_skeleton(&self, body: Rect, frame: &mut Frame, widths: &[u16], select_width: u16) {
        let style = theme::placeholder();
        for row in 0..self.skeleton_rows.min(body.height) {
            let y = body.y + row;
            let mut x = body.x + select_width;
            for width in widths {
                if *width == 0 {
                    continue;
                }
                let bar = "░".repeat((*width as usize).saturating_sub(1).max(1));
                draw_text_span(frame, x, y, &bar, style, x + width);
                x += width + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Part {
        id: u32,
        name: String,
        karat: Option<f64>,
    }

    fn part(id: u32, name: &str, karat: Option<f64>) -> Part {
        Part {
            id,
            name: name.to_owned(),
            karat,
        }
    }

    fn columns() -> Vec<Column<Part>> {
        vec![
            Column::new("name", "Name", |p: &Part| CellValue::Text(p.name.clone())).sortable(),
            Column::new("karat", "Karat", |p: &Part| {
                p.karat.map_or(CellValue::Empty, CellValue::Number)
            })
            .sortable()
            .width(8),
        ]
    }

    fn key(p: &Part) -> String {
        p.id.to_string()
    }

    fn sample_rows() -> Vec<Part> {
        vec![
            part(1, "Clasp", Some(18.0)),
            part(2, "band", Some(14.0)),
            part(3, "Bail", None),
        ]
    }

    #[test]
    fn sort_cycle_asc_desc_none() {
        let mut state = TableState::new();
        state.toggle_sort("name");
        assert_eq!(state.sort(), Some(("name", SortDirection::Ascending)));
        state.toggle_sort("name");
        assert_eq!(state.sort(), Some(("name", SortDirection::Descending)));
        state.toggle_sort("name");
        assert_eq!(state.sort(), None);
    }

    #[test]
    fn sorting_other_column_restarts_at_ascending() {
        let mut state = TableState::new();
        state.toggle_sort("name");
        state.toggle_sort("name");
        state.toggle_sort("karat");
        assert_eq!(state.sort(), Some(("karat", SortDirection::Ascending)));
    }

    #[test]
    fn cleared_sort_restores_input_order() {
        let rows = sample_rows();
        let cols = columns();
        let mut state = TableState::new();
        state.toggle_sort("name");
        state.toggle_sort("name");
        state.toggle_sort("name");
        assert_eq!(state.sorted_indices(&rows, &cols), vec![0, 1, 2]);
    }

    #[test]
    fn text_sort_is_case_insensitive() {
        let rows = sample_rows();
        let cols = columns();
        let mut state = TableState::new();
        state.toggle_sort("name");
        // Bail, band, Clasp
        assert_eq!(state.sorted_indices(&rows, &cols), vec![2, 1, 0]);
    }

    #[test]
    fn empty_cells_sort_first_ascending() {
        let rows = sample_rows();
        let cols = columns();
        let mut state = TableState::new();
        state.toggle_sort("karat");
        assert_eq!(state.sorted_indices(&rows, &cols), vec![2, 1, 0]);
    }

    #[test]
    fn select_all_covers_exactly_the_page() {
        let mut state = TableState::new();
        state.toggle_selected("99");
        state.toggle_select_all(SelectAllScope::CurrentPage, ["1", "2"]);
        assert!(state.is_selected("1"));
        assert!(state.is_selected("2"));
        assert!(state.is_selected("99"));
        assert_eq!(state.selected_count(), 3);
    }

    #[test]
    fn select_all_when_all_selected_deselects_page_only() {
        let mut state = TableState::new();
        state.toggle_selected("99");
        state.toggle_select_all(SelectAllScope::CurrentPage, ["1", "2"]);
        state.toggle_select_all(SelectAllScope::CurrentPage, ["1", "2"]);
        assert!(!state.is_selected("1"));
        assert!(!state.is_selected("2"));
        assert!(state.is_selected("99"));
    }

    #[test]
    fn select_all_on_empty_page_is_noop() {
        let mut state = TableState::new();
        state.toggle_select_all(SelectAllScope::CurrentPage, std::iter::empty());
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn selection_survives_sorting() {
        let mut state = TableState::new();
        state.toggle_selected("2");
        state.toggle_sort("name");
        assert!(state.is_selected("2"));
    }

    #[test]
    fn responsive_hides_narrow_columns() {
        let cols = vec![
            Column::new("a", "A", |_: &Part| CellValue::Empty),
            Column::new("b", "B", |_: &Part| CellValue::Empty)
                .min_breakpoint(Breakpoint::Desktop),
        ];
        let rows = sample_rows();
        let table = Table::new(&cols, &rows, key).breakpoint(Breakpoint::Tablet);
        assert_eq!(table.visible_columns().len(), 1);
        let table = Table::new(&cols, &rows, key).breakpoint(Breakpoint::Desktop);
        assert_eq!(table.visible_columns().len(), 2);
    }

    #[test]
    fn renders_header_and_rows() {
        let cols = columns();
        let rows = sample_rows();
        let mut state = TableState::new();
        let mut frame = Frame::new(40, 6);
        Table::new(&cols, &rows, key).render(Rect::new(0, 0, 40, 6), &mut frame, &mut state);

        let header: String = (0..10).map(|x| frame.buffer.get(x, 0).unwrap().ch).collect();
        assert!(header.contains("Name"));
        let row1: String = (0..10).map(|x| frame.buffer.get(x, 1).unwrap().ch).collect();
        assert!(row1.contains("Clasp"));
    }

    #[test]
    fn loading_renders_skeleton_not_rows() {
        let cols = columns();
        let rows = sample_rows();
        let mut state = TableState::new();
        let mut frame = Frame::new(40, 6);
        Table::new(&cols, &rows, key)
            .loading(true)
            .render(Rect::new(0, 0, 40, 6), &mut frame, &mut state);

        let row1: String = (0..40).map(|x| frame.buffer.get(x, 1).unwrap().ch).collect();
        assert!(row1.contains('░'));
        assert!(!row1.contains("Clasp"));
    }

    #[test]
    fn empty_rows_render_empty_text() {
        let cols = columns();
        let rows: Vec<Part> = Vec::new();
        let mut state = TableState::new();
        let mut frame = Frame::new(40, 6);
        Table::new(&cols, &rows, key)
            .empty_text("No parts yet")
            .render(Rect::new(0, 0, 40, 6), &mut frame, &mut state);

        let body: String = (0..6)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .map(|(x, y)| frame.buffer.get(x, y).unwrap().ch)
            .collect();
        assert!(body.contains("No parts yet"));
    }

    #[test]
    fn row_hit_carries_source_index() {
        let cols = columns();
        let rows = sample_rows();
        let mut state = TableState::new();
        state.toggle_sort("name");
        let mut frame = Frame::new(40, 6);
        Table::new(&cols, &rows, key).render(Rect::new(0, 0, 40, 6), &mut frame, &mut state);

        // First body row is "Bail" (source index 2) under the name sort.
        let (_, region, data) = frame.hit_test(1, 1).expect("row should be hittable");
        assert_eq!(region, TABLE_HIT_ROW);
        assert_eq!(data, 2);
    }

    #[test]
    fn header_hit_only_on_sortable_columns() {
        let cols = vec![
            Column::new("a", "A", |_: &Part| CellValue::Empty).sortable(),
            Column::new("b", "B", |_: &Part| CellValue::Empty),
        ];
        let rows = sample_rows();
        let mut state = TableState::new();
        let mut frame = Frame::new(40, 6);
        Table::new(&cols, &rows, key).render(Rect::new(0, 0, 40, 6), &mut frame, &mut state);

        let (_, region, data) = frame.hit_test(0, 0).expect("sortable header is hittable");
        assert_eq!(region, TABLE_HIT_HEADER);
        assert_eq!(data, 0);
    }

    proptest! {
        #[test]
        fn sort_is_a_permutation(names in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
            let rows: Vec<Part> = names
                .iter()
                .enumerate()
                .map(|(i, name)| part(i as u32, name, None))
                .collect();
            let cols = columns();
            let mut state = TableState::new();
            state.toggle_sort("name");
            let order = state.sorted_indices(&rows, &cols);

            let mut seen = order.clone();
            seen.sort_unstable();
            let expected: Vec<usize> = (0..rows.len()).collect();
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn full_cycle_is_identity(names in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
            let rows: Vec<Part> = names
                .iter()
                .enumerate()
                .map(|(i, name)| part(i as u32, name, None))
                .collect();
            let cols = columns();
            let mut state = TableState::new();
            for _ in 0..3 {
                state.toggle_sort("name");
            }
            let identity: Vec<usize> = (0..rows.len()).collect();
            prop_assert_eq!(state.sorted_indices(&rows, &cols), identity);
        }
    }
}
