#![forbid(unsafe_code)]

//! Resource pages.
//!
//! Every backend entity gets the same page shell: a sortable, selectable
//! data table over the current page of rows, a paginator, and commands
//! for the app layer to open form or confirmation modals. Pages never
//! talk to the network; they emit [`PageCommand`]s and the app feeds
//! fetch results back through [`PageView::apply_fetch`].
//!
//! Keys: arrows or `j`/`k` move the cursor, `Space` toggles selection,
//! `a` selects the page, `n`/`e`/`d` create, edit, and delete, `r`
//! reloads past the cache, `Left`/`Right` switch pages.

pub mod confirm;
pub mod resources;

use atelier_client::{ApiError, ListParams, Paged};
use atelier_core::event::{Event, KeyCode, MouseButton, MouseEvent, MouseEventKind};
use atelier_core::geometry::Rect;
use atelier_render::{Frame, HitData, HitId, HitRegion};
use atelier_style::{Style, theme};
use atelier_widgets::modal::FormModalEntry;
use atelier_widgets::pagination::{PAGER_HIT_NEXT, PAGER_HIT_PREV, PAGER_HIT_SIZE};
use atelier_widgets::table::{TABLE_HIT_HEADER, TABLE_HIT_ROW, TABLE_HIT_SELECT_ALL};
use atelier_widgets::{
    Breakpoint, Column, Paginator, PaginationState, Paragraph, SelectAllScope, StatefulWidget,
    Table, TableState, Widget,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::forms::FormMode;
use confirm::ConfirmModal;

/// Hit id for the active page's table.
pub const PAGE_TABLE_HIT: HitId = HitId::new(1);
/// Hit id for the active page's paginator.
pub const PAGE_PAGER_HIT: HitId = HitId::new(2);

/// A backend entity the app can list (and usually mutate).
pub trait Resource: DeserializeOwned + Send + 'static {
    /// API route segment, e.g. `companies`.
    const ROUTE: &'static str;
    /// Page heading, e.g. `Companies`.
    const TITLE: &'static str;
    /// Noun for confirmation copy, e.g. `company`.
    const SINGULAR: &'static str;
    /// Read-only resources render without selection or mutations.
    const CAN_MUTATE: bool = true;

    fn id(&self) -> i64;

    fn columns() -> Vec<Column<Self>>
    where
        Self: Sized;

    /// The entity's form modal, or `None` for read-only resources.
    fn form(mode: FormMode<'_, Self>) -> Option<FormModalEntry>
    where
        Self: Sized;
}

/// Stable row key: the entity id.
pub fn row_key<R: Resource>(row: &R) -> String {
    row.id().to_string()
}

/// A mutation the app should run when the modal resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationIntent {
    Create { resource: &'static str },
    Update { resource: &'static str, id: i64 },
    Delete { resource: &'static str, ids: Vec<i64> },
}

/// What a page asks the app layer to do.
pub enum PageCommand {
    None,
    /// Fetch the current page through the cache.
    Fetch,
    /// Invalidate this resource's cached pages, then fetch.
    Reload,
    OpenForm {
        entry: Box<FormModalEntry>,
        intent: MutationIntent,
    },
    OpenConfirm {
        modal: Box<ConfirmModal>,
        intent: MutationIntent,
    },
}

/// Object-safe page interface the app loop drives.
pub trait PageView: Send {
    fn title(&self) -> &'static str;
    fn route(&self) -> &'static str;
    fn list_params(&self) -> ListParams;
    fn mark_loading(&mut self);
    fn clear_selection(&mut self);
    fn apply_fetch(&mut self, result: Result<Paged<serde_json::Value>, ApiError>);
    fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
    ) -> PageCommand;
    fn render(&mut self, area: Rect, frame: &mut Frame);
}

/// Generic page over a [`Resource`].
pub struct ResourcePage<R: Resource> {
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    table: TableState,
    pager: PaginationState,
    loading: bool,
    error: Option<String>,
    breakpoint: Breakpoint,
    table_area: Rect,
}

impl<R: Resource> ResourcePage<R> {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            columns: R::columns(),
            rows: Vec::new(),
            table: TableState::new(),
            pager: PaginationState::new(page_size),
            loading: true,
            error: None,
            breakpoint: Breakpoint::Desktop,
            table_area: Rect::new(0, 0, 0, 0),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn table_state(&self) -> &TableState {
        &self.table
    }

    #[must_use]
    pub fn pager(&self) -> &PaginationState {
        &self.pager
    }

    fn page_keys(&self) -> Vec<String> {
        self.rows.iter().map(row_key).collect()
    }

    /// Row under the cursor, honoring the active sort.
    fn cursor_row(&self) -> Option<&R> {
        let order = self.table.sorted_indices(&self.rows, &self.columns);
        order.get(self.table.cursor()).map(|&i| &self.rows[i])
    }

    fn open_create(&self) -> PageCommand {
        match R::form(FormMode::Create) {
            Some(entry) => PageCommand::OpenForm {
                entry: Box::new(entry),
                intent: MutationIntent::Create { resource: R::ROUTE },
            },
            None => PageCommand::None,
        }
    }

    fn open_edit(&self) -> PageCommand {
        let Some(row) = self.cursor_row() else {
            return PageCommand::None;
        };
        match R::form(FormMode::Edit(row)) {
            Some(entry) => PageCommand::OpenForm {
                entry: Box::new(entry),
                intent: MutationIntent::Update {
                    resource: R::ROUTE,
                    id: row.id(),
                },
            },
            None => PageCommand::None,
        }
    }

    /// Delete the selection, or the cursor row when nothing is selected.
    fn open_delete(&self) -> PageCommand {
        if !R::CAN_MUTATE {
            return PageCommand::None;
        }
        let ids: Vec<i64> = if self.table.selected_count() > 0 {
            self.table
                .selected_keys()
                .filter_map(|key| key.parse().ok())
                .collect()
        } else {
            self.cursor_row().map(R::id).into_iter().collect()
        };
        if ids.is_empty() {
            return PageCommand::None;
        }
        let message = if ids.len() == 1 {
            format!("Delete this {}? This cannot be undone.", R::SINGULAR)
        } else {
            format!(
                "Delete {} {}s? This cannot be undone.",
                ids.len(),
                R::SINGULAR
            )
        };
        PageCommand::OpenConfirm {
            modal: Box::new(ConfirmModal::new(format!("Delete {}", R::TITLE), message)),
            intent: MutationIntent::Delete {
                resource: R::ROUTE,
                ids,
            },
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> PageCommand {
        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.table.move_cursor(1, self.rows.len());
                PageCommand::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.table.move_cursor(-1, self.rows.len());
                PageCommand::None
            }
            KeyCode::Left if self.pager.has_prev() => {
                self.pager.prev_page();
                PageCommand::Fetch
            }
            KeyCode::Right if self.pager.has_next() => {
                self.pager.next_page();
                PageCommand::Fetch
            }
            KeyCode::Char(' ') if R::CAN_MUTATE => {
                if let Some(key) = self.cursor_row().map(row_key) {
                    self.table.toggle_selected(&key);
                }
                PageCommand::None
            }
            KeyCode::Char('a') if R::CAN_MUTATE => {
                let keys = self.page_keys();
                self.table
                    .toggle_select_all(SelectAllScope::CurrentPage, keys.iter().map(String::as_str));
                PageCommand::None
            }
            KeyCode::Char('n') => self.open_create(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
            KeyCode::Char('d') | KeyCode::Delete => self.open_delete(),
            KeyCode::Char('r') => PageCommand::Reload,
            _ => PageCommand::None,
        }
    }

    fn handle_hit(
        &mut self,
        mouse: &MouseEvent,
        id: HitId,
        region: HitRegion,
        data: HitData,
    ) -> PageCommand {
        if id == PAGE_TABLE_HIT {
            match region {
                TABLE_HIT_HEADER => {
                    let visible: Vec<&Column<R>> = self
                        .columns
                        .iter()
                        .filter(|col| self.breakpoint >= col.visible_from())
                        .collect();
                    if let Some(column) = visible.get(data as usize)
                        && column.is_sortable()
                    {
                        self.table.toggle_sort(column.key());
                    }
                }
                TABLE_HIT_SELECT_ALL => {
                    let keys = self.page_keys();
                    self.table.toggle_select_all(
                        SelectAllScope::CurrentPage,
                        keys.iter().map(String::as_str),
                    );
                }
                TABLE_HIT_ROW => {
                    let index = data as usize;
                    let order = self.table.sorted_indices(&self.rows, &self.columns);
                    if let Some(pos) = order.iter().position(|&i| i == index) {
                        let delta = pos as isize - self.table.cursor() as isize;
                        self.table.move_cursor(delta, order.len());
                    }
                    // A click in the checkbox gutter toggles selection.
                    if R::CAN_MUTATE
                        && mouse.column < self.table_area.x + 4
                        && let Some(row) = self.rows.get(index)
                    {
                        self.table.toggle_selected(&row_key(row));
                    }
                }
                _ => {}
            }
            return PageCommand::None;
        }
        if id == PAGE_PAGER_HIT {
            match region {
                PAGER_HIT_PREV => {
                    self.pager.prev_page();
                    return PageCommand::Fetch;
                }
                PAGER_HIT_NEXT => {
                    self.pager.next_page();
                    return PageCommand::Fetch;
                }
                PAGER_HIT_SIZE => {
                    self.pager.set_page_size(data as usize);
                    return PageCommand::Fetch;
                }
                _ => {}
            }
        }
        PageCommand::None
    }
}

impl<R: Resource> PageView for ResourcePage<R> {
    fn title(&self) -> &'static str {
        R::TITLE
    }

    fn route(&self) -> &'static str {
        R::ROUTE
    }

    fn list_params(&self) -> ListParams {
        ListParams::new(self.pager.current(), self.pager.page_size())
    }

    fn mark_loading(&mut self) {
        self.loading = true;
    }

    fn clear_selection(&mut self) {
        self.table.clear_selection();
    }

    fn apply_fetch(&mut self, result: Result<Paged<serde_json::Value>, ApiError>) {
        self.loading = false;
        match result {
            Ok(page) => {
                let mut rows = Vec::with_capacity(page.items.len());
                for item in page.items {
                    match serde_json::from_value::<R>(item) {
                        Ok(row) => rows.push(row),
                        Err(err) => warn!(resource = R::ROUTE, %err, "skipping malformed row"),
                    }
                }
                self.rows = rows;
                self.pager.set_total(page.total);
                self.table.move_cursor(0, self.rows.len());
                self.error = None;
            }
            Err(err) => {
                // Keep the previous rows visible behind the error line.
                self.error = Some(err.to_string());
            }
        }
    }

    fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
    ) -> PageCommand {
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key.code),
            Event::Mouse(
                mouse @ MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    ..
                },
            ) => match hit {
                Some((id, region, data)) => self.handle_hit(mouse, id, region, data),
                None => PageCommand::None,
            },
            _ => PageCommand::None,
        }
    }

    fn render(&mut self, area: Rect, frame: &mut Frame) {
        if area.is_empty() || area.height < 4 {
            return;
        }
        self.breakpoint = Breakpoint::from_width(area.width);

        Paragraph::new(R::TITLE)
            .style(Style::new().bold())
            .render(Rect::new(area.x, area.y, area.width, 1), frame);
        if self.table.selected_count() > 0 {
            let label = format!("{} selected", self.table.selected_count());
            Paragraph::new(&label)
                .style(Style::new().fg(theme::PRIMARY))
                .alignment(atelier_widgets::block::Alignment::Right)
                .render(Rect::new(area.x, area.y, area.width, 1), frame);
        }

        let mut y = area.y + 2;
        if let Some(error) = &self.error {
            Paragraph::new(error)
                .style(theme::error_banner())
                .render(Rect::new(area.x, y, area.width, 1), frame);
            y += 2;
        }

        let pager_y = area.bottom() - 1;
        let table_area = Rect::new(area.x, y, area.width, pager_y.saturating_sub(y + 1));
        self.table_area = table_area;

        let empty = format!("No {}s", R::SINGULAR);
        Table::new(&self.columns, &self.rows, row_key::<R>)
            .hit_id(PAGE_TABLE_HIT)
            .breakpoint(self.breakpoint)
            .selectable(R::CAN_MUTATE)
            .loading(self.loading)
            .empty_text(&empty)
            .render(table_area, frame, &mut self.table);

        Paginator::new(PAGE_PAGER_HIT).render(
            Rect::new(area.x, pager_y, area.width, 1),
            frame,
            &mut self.pager,
        );
    }
}
