#![forbid(unsafe_code)]

//! The application event loop.
//!
//! [`App`] owns the page list, the modal stack, the focus trap
//! bookkeeping, and the channel that async work reports back on. All
//! network calls run on the tokio runtime and send an [`AppMsg`] when
//! they finish; the loop itself never blocks on the network.
//!
//! Event routing: when the modal stack is non-empty every input goes to
//! the top modal and nothing else. Pages only see events while no modal
//! is open. `Ctrl+C` quits from anywhere.
//!
//! Invariants:
//! - Focus trap depth always equals modal stack depth.
//! - A submitting modal stays open until its async work resolves; the
//!   loop pops it on success and writes the error into it on failure.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use atelier_client::{ApiClient, ApiError, AuthResponse, AuthStore, Paged, QueryClient};
use atelier_core::event::{Event, KeyCode, KeyEvent, Modifiers};
use atelier_core::geometry::Rect;
use atelier_core::terminal_session::{SessionOptions, TerminalSession};
use atelier_render::{Frame, HitData, HitId, HitRegion};
use atelier_style::{Style, theme};
use atelier_widgets::block::Alignment;
use atelier_widgets::modal::{ModalId, ModalOutcome, ModalStack, StackModal, StackResult};
use atelier_widgets::{FocusManager, Paragraph, ToastCenter, Widget};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::config::AppConfig;
use crate::forms;
use crate::pages::{MutationIntent, PageCommand, PageView, ResourcePage};
use crate::painter::Painter;

/// Hit id for the page tabs in the nav bar; hit data is the page index.
pub const NAV_HIT: HitId = HitId::new(3);

const TICK: Duration = Duration::from_millis(50);

/// Why a modal is on the stack, so its outcome can be acted on.
#[derive(Debug, Clone)]
enum ModalSource {
    Mutation(MutationIntent),
    Login,
}

/// Completion of an async task, delivered over the app channel.
enum AppMsg {
    Fetched {
        route: &'static str,
        result: Result<Paged<Value>, ApiError>,
    },
    MutationDone {
        modal: ModalId,
        intent: MutationIntent,
        result: Result<(), ApiError>,
    },
    LoggedIn {
        modal: ModalId,
        result: Result<AuthResponse, ApiError>,
    },
}

pub struct App {
    api: Arc<ApiClient>,
    query: Arc<QueryClient>,
    auth: AuthStore,
    pages: Vec<Box<dyn PageView>>,
    active: usize,
    modals: ModalStack,
    modal_sources: HashMap<ModalId, ModalSource>,
    focus: FocusManager,
    toasts: ToastCenter,
    tx: mpsc::UnboundedSender<AppMsg>,
    rx: mpsc::UnboundedReceiver<AppMsg>,
    runtime: tokio::runtime::Handle,
    frame: Frame,
    dirty: bool,
    should_quit: bool,
}

fn default_pages(page_size: usize) -> Vec<Box<dyn PageView>> {
    use atelier_client::{
        Address, Company, Contact, Department, LookupValue, Metal, MetalDeposit, Order, Role,
        Supply,
    };
    vec![
        Box::new(ResourcePage::<Company>::new(page_size)),
        Box::new(ResourcePage::<Contact>::new(page_size)),
        Box::new(ResourcePage::<Order>::new(page_size)),
        Box::new(ResourcePage::<Metal>::new(page_size)),
        Box::new(ResourcePage::<MetalDeposit>::new(page_size)),
        Box::new(ResourcePage::<Supply>::new(page_size)),
        Box::new(ResourcePage::<Role>::new(page_size)),
        Box::new(ResourcePage::<Department>::new(page_size)),
        Box::new(ResourcePage::<LookupValue>::new(page_size)),
        Box::new(ResourcePage::<Address>::new(page_size)),
    ]
}

impl App {
    pub fn new(
        config: &AppConfig,
        api: Arc<ApiClient>,
        auth: AuthStore,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let query = Arc::new(QueryClient::new(Arc::clone(&api)));
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            query,
            auth,
            pages: default_pages(config.page_size),
            active: 0,
            modals: ModalStack::new(),
            modal_sources: HashMap::new(),
            focus: FocusManager::new(),
            toasts: ToastCenter::new(),
            tx,
            rx,
            runtime,
            frame: Frame::new(0, 0),
            dirty: true,
            should_quit: false,
        }
    }

    /// Restore the persisted session or demand a login.
    pub fn bootstrap(&mut self) {
        if self.auth.is_authenticated() {
            self.api.set_token(self.auth.token().map(str::to_string));
            if let Some(user) = self.auth.user() {
                info!(email = %user.email, "session restored");
            }
            self.spawn_fetch(self.active);
        } else {
            self.open_login();
        }
    }

    /// Block on the terminal until the user quits.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let session = TerminalSession::new(SessionOptions::full_screen())?;
        let (width, height) = session.size()?;
        self.frame.resize(width, height);
        session.hide_cursor()?;
        let mut painter = Painter::new(io::stdout());

        while !self.should_quit {
            while let Ok(msg) = self.rx.try_recv() {
                self.on_message(msg);
            }

            if session.poll_event(TICK)? {
                while let Some(event) = session.read_event()? {
                    self.on_event(&event);
                    if !session.poll_event(Duration::ZERO)? {
                        break;
                    }
                }
            }

            let now = Instant::now();
            if self.modals.on_tick(now) {
                self.dirty = true;
            }
            if self.toasts.prune(now) {
                self.dirty = true;
            }

            if self.dirty {
                self.render();
                painter.present(&self.frame)?;
                self.dirty = false;
            }
        }
        session.show_cursor()?;
        Ok(())
    }

    fn on_event(&mut self, event: &Event) {
        self.dirty = true;
        if let Event::Resize(width, height) = event {
            self.frame.resize(*width, *height);
            return;
        }
        if let Event::Key(key) = event
            && is_quit_chord(key)
        {
            self.should_quit = true;
            return;
        }

        let hit = match event {
            Event::Mouse(mouse) => self.frame.hit_test(mouse.column, mouse.row),
            _ => None,
        };

        if !self.modals.is_empty() {
            if let Some(result) = self.modals.handle_event(event, hit) {
                self.on_stack_result(result);
            }
            return;
        }

        if self.handle_global(event, hit) {
            return;
        }
        let command = self.pages[self.active].handle_event(event, hit);
        self.run_command(command);
    }

    /// App-level bindings that fire only while no modal is open.
    fn handle_global(&mut self, event: &Event, hit: Option<(HitId, HitRegion, HitData)>) -> bool {
        if let Some((NAV_HIT, HitRegion::Content, index)) = hit
            && matches!(event, Event::Mouse(_))
        {
            self.activate_page(index as usize);
            return true;
        }
        let Event::Key(key) = event else {
            return false;
        };
        if !key.is_press() {
            return false;
        }
        if key.modifiers.contains(Modifiers::CONTROL) {
            if key.code == KeyCode::Char('l') {
                self.logout();
                return true;
            }
            return false;
        }
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Char(ch @ '1'..='9') => {
                self.activate_page(ch as usize - '1' as usize);
                true
            }
            KeyCode::Char('0') => {
                self.activate_page(9);
                true
            }
            KeyCode::Char('[') => {
                let previous = (self.active + self.pages.len() - 1) % self.pages.len();
                self.activate_page(previous);
                true
            }
            KeyCode::Char(']') => {
                self.activate_page((self.active + 1) % self.pages.len());
                true
            }
            _ => false,
        }
    }

    fn activate_page(&mut self, index: usize) {
        if index >= self.pages.len() {
            return;
        }
        self.active = index;
        // The cache answers instantly when the page is still fresh.
        self.spawn_fetch(index);
    }

    fn run_command(&mut self, command: PageCommand) {
        match command {
            PageCommand::None => {}
            PageCommand::Fetch => self.spawn_fetch(self.active),
            PageCommand::Reload => {
                let route = self.pages[self.active].route();
                self.query.invalidate(&[route]);
                self.spawn_fetch(self.active);
            }
            PageCommand::OpenForm { entry, intent } => {
                self.open_modal(entry, ModalSource::Mutation(intent));
            }
            PageCommand::OpenConfirm { modal, intent } => {
                self.open_modal(modal, ModalSource::Mutation(intent));
            }
        }
    }

    fn open_modal(&mut self, modal: Box<dyn StackModal>, source: ModalSource) -> ModalId {
        let id = self.modals.push(modal);
        self.focus.push_trap();
        self.modal_sources.insert(id, source);
        id
    }

    fn close_modal(&mut self, id: ModalId) {
        if self.modals.pop_id(id).is_some() {
            self.focus.pop_trap();
        }
        self.modal_sources.remove(&id);
    }

    fn open_login(&mut self) {
        self.open_modal(Box::new(forms::login::modal()), ModalSource::Login);
    }

    fn logout(&mut self) {
        if let Err(err) = self.auth.logout() {
            warn!(%err, "could not clear the session file");
        }
        self.api.set_token(None);
        self.query.clear();
        for _ in self.modals.pop_all() {
            self.focus.pop_trap();
        }
        self.modal_sources.clear();
        self.toasts.info("Signed out", Instant::now());
        self.open_login();
    }

    fn on_stack_result(&mut self, result: StackResult) {
        if result.closed {
            debug!(id = result.id.id(), "modal closed");
            self.focus.pop_trap();
            self.modal_sources.remove(&result.id);
            return;
        }
        // Emitted without closing: the modal is waiting on async work.
        let Some(source) = self.modal_sources.get(&result.id).cloned() else {
            return;
        };
        match (result.outcome, source) {
            (ModalOutcome::Submitted(payload), ModalSource::Login) => {
                self.spawn_login(result.id, payload);
            }
            (ModalOutcome::Submitted(payload), ModalSource::Mutation(intent)) => {
                self.spawn_mutation(result.id, intent, payload);
            }
            (ModalOutcome::Confirmed, ModalSource::Mutation(intent)) => {
                self.spawn_mutation(result.id, intent, String::new());
            }
            _ => {}
        }
    }

    fn on_message(&mut self, msg: AppMsg) {
        self.dirty = true;
        match msg {
            AppMsg::Fetched { route, result } => {
                if let Some(page) = self.pages.iter_mut().find(|page| page.route() == route) {
                    page.apply_fetch(result);
                }
            }
            AppMsg::MutationDone {
                modal,
                intent,
                result,
            } => self.on_mutation_done(modal, intent, result),
            AppMsg::LoggedIn { modal, result } => self.on_logged_in(modal, result),
        }
    }

    fn on_mutation_done(
        &mut self,
        modal: ModalId,
        intent: MutationIntent,
        result: Result<(), ApiError>,
    ) {
        match result {
            Ok(()) => {
                self.close_modal(modal);
                let (resource, message, deleted) = match &intent {
                    MutationIntent::Create { resource } => (*resource, String::from("Created"), false),
                    MutationIntent::Update { resource, .. } => {
                        (*resource, String::from("Changes saved"), false)
                    }
                    MutationIntent::Delete { resource, ids } => {
                        let message = if ids.len() == 1 {
                            String::from("Deleted")
                        } else {
                            format!("Deleted {} items", ids.len())
                        };
                        (*resource, message, true)
                    }
                };
                self.toasts.success(message, Instant::now());
                if let Some(index) = self.pages.iter().position(|page| page.route() == resource) {
                    if deleted {
                        self.pages[index].clear_selection();
                    }
                    self.spawn_fetch(index);
                }
            }
            Err(err) => {
                // The modal stays open and shows the failure inline.
                if let Some(active) = self.modals.get_mut(modal) {
                    active.set_submitting(false);
                    active.set_api_error(Some(err.to_string()));
                }
            }
        }
    }

    fn on_logged_in(&mut self, modal: ModalId, result: Result<AuthResponse, ApiError>) {
        match result {
            Ok(auth) => {
                self.api.set_token(Some(auth.token.clone()));
                let email = auth.user.email.clone();
                if let Err(err) = self.auth.set_auth(auth) {
                    // Keep the in-memory session even if the disk write failed.
                    self.toasts
                        .error(format!("Session not saved: {err}"), Instant::now());
                }
                self.close_modal(modal);
                self.toasts
                    .success(format!("Signed in as {email}"), Instant::now());
                self.spawn_fetch(self.active);
            }
            Err(err) => {
                if let Some(active) = self.modals.get_mut(modal) {
                    active.set_submitting(false);
                    active.set_api_error(Some(err.to_string()));
                }
            }
        }
    }

    fn spawn_fetch(&mut self, index: usize) {
        let Some(page) = self.pages.get_mut(index) else {
            return;
        };
        page.mark_loading();
        let route = page.route();
        let params = page.list_params();
        let query = Arc::clone(&self.query);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = query.fetch_list::<Value>(route, &params).await;
            let _ = tx.send(AppMsg::Fetched { route, result });
        });
        self.dirty = true;
    }

    fn spawn_mutation(&mut self, modal: ModalId, intent: MutationIntent, payload: String) {
        if let Some(active) = self.modals.get_mut(modal) {
            active.set_submitting(true);
        }
        let query = Arc::clone(&self.query);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = run_mutation(&query, &intent, &payload).await;
            let _ = tx.send(AppMsg::MutationDone {
                modal,
                intent,
                result,
            });
        });
    }

    fn spawn_login(&mut self, modal: ModalId, payload: String) {
        if let Some(active) = self.modals.get_mut(modal) {
            active.set_submitting(true);
        }
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = async {
                let creds: Value = serde_json::from_str(&payload)?;
                let email = creds["email"].as_str().unwrap_or_default();
                let password = creds["password"].as_str().unwrap_or_default();
                api.login(email, password).await
            }
            .await;
            let _ = tx.send(AppMsg::LoggedIn { modal, result });
        });
    }

    fn render(&mut self) {
        self.frame.begin();
        self.focus.begin_frame();
        let screen = self.frame.area();
        if screen.is_empty() {
            return;
        }

        self.render_nav(Rect::new(0, 0, screen.width, 1));
        if screen.height > 3 {
            let page_area = Rect::new(0, 2, screen.width, screen.height - 3);
            self.pages[self.active].render(page_area, &mut self.frame);
        }
        self.render_status(Rect::new(0, screen.height - 1, screen.width, 1));

        self.modals.render(&mut self.frame, screen);
        // Toasts paint last so they stay visible over any modal.
        self.toasts.render(screen, &mut self.frame);
    }

    fn render_nav(&mut self, area: Rect) {
        let mut x = area.x;
        for (index, page) in self.pages.iter().enumerate() {
            let label = format!(" {} {} ", (index + 1) % 10, page.title());
            let width = label.chars().count() as u16;
            if x + width > area.right() {
                break;
            }
            let segment = Rect::new(x, area.y, width, 1);
            let style = if index == self.active {
                Style::new().fg(theme::PRIMARY).bold()
            } else {
                Style::new().fg(theme::MUTED)
            };
            Paragraph::new(&label).style(style).render(segment, &mut self.frame);
            self.frame
                .register_hit(segment, NAV_HIT, HitRegion::Content, index as HitData);
            x += width + 1;
        }
    }

    fn render_status(&mut self, area: Rect) {
        let hints = " q quit  n new  e edit  d delete  r reload  ←/→ page  ^L sign out";
        Paragraph::new(hints)
            .style(Style::new().fg(theme::MUTED))
            .render(area, &mut self.frame);
        if let Some(user) = self.auth.user() {
            let who = format!("{} ", user.email);
            Paragraph::new(&who)
                .style(Style::new().fg(theme::MUTED))
                .alignment(Alignment::Right)
                .render(area, &mut self.frame);
        }
    }
}

fn is_quit_chord(key: &KeyEvent) -> bool {
    key.is_press() && key.code == KeyCode::Char('c') && key.modifiers.contains(Modifiers::CONTROL)
}

async fn run_mutation(
    query: &QueryClient,
    intent: &MutationIntent,
    payload: &str,
) -> Result<(), ApiError> {
    match intent {
        MutationIntent::Create { resource } => {
            let body: Value = serde_json::from_str(payload)?;
            query.create::<Value, Value>(resource, &body).await?;
            Ok(())
        }
        MutationIntent::Update { resource, id } => {
            let body: Value = serde_json::from_str(payload)?;
            query.update::<Value, Value>(resource, *id, &body).await?;
            Ok(())
        }
        MutationIntent::Delete { resource, ids } => {
            // Sequential so the first failure stops the batch.
            for id in ids {
                query.delete(resource, *id).await?;
            }
            Ok(())
        }
    }
}
