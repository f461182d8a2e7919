#![forbid(unsafe_code)]

//! Backend-independent input events.
//!
//! Widgets and the application loop consume these types rather than
//! crossterm's, so only the terminal session touches the backend. Key
//! release/repeat events are preserved so widgets can ignore them
//! explicitly (only `Press` triggers actions).

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CONTROL = 0b0000_0010;
        const ALT = 0b0000_0100;
    }
}

/// A key identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    /// Shift+Tab as reported by the terminal.
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// Press/repeat/release discriminator for key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// A key press with modifiers.
    pub const fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }

    /// Whether this is a press (not a repeat or release).
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press)
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event at a cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A mouse event with no modifiers.
    pub const fn new(kind: MouseEventKind, column: u16, row: u16) -> Self {
        Self {
            kind,
            column,
            row,
            modifiers: Modifiers::empty(),
        }
    }
}

/// A terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste payload.
    Paste(String),
    FocusGained,
    FocusLost,
}

#[cfg(not(target_arch = "wasm32"))]
impl Event {
    /// Convert a crossterm event. Returns `None` for events with no
    /// counterpart (e.g. unsupported key codes).
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event as ct;
        match event {
            ct::Event::Key(key) => {
                let code = match key.code {
                    ct::KeyCode::Char(c) => KeyCode::Char(c),
                    ct::KeyCode::Enter => KeyCode::Enter,
                    ct::KeyCode::Esc => KeyCode::Escape,
                    ct::KeyCode::Tab => KeyCode::Tab,
                    ct::KeyCode::BackTab => KeyCode::BackTab,
                    ct::KeyCode::Backspace => KeyCode::Backspace,
                    ct::KeyCode::Delete => KeyCode::Delete,
                    ct::KeyCode::Left => KeyCode::Left,
                    ct::KeyCode::Right => KeyCode::Right,
                    ct::KeyCode::Up => KeyCode::Up,
                    ct::KeyCode::Down => KeyCode::Down,
                    ct::KeyCode::Home => KeyCode::Home,
                    ct::KeyCode::End => KeyCode::End,
                    ct::KeyCode::PageUp => KeyCode::PageUp,
                    ct::KeyCode::PageDown => KeyCode::PageDown,
                    ct::KeyCode::F(n) => KeyCode::F(n),
                    _ => return None,
                };
                let kind = match key.kind {
                    ct::KeyEventKind::Press => KeyEventKind::Press,
                    ct::KeyEventKind::Repeat => KeyEventKind::Repeat,
                    ct::KeyEventKind::Release => KeyEventKind::Release,
                };
                Some(Event::Key(KeyEvent {
                    code,
                    modifiers: convert_modifiers(key.modifiers),
                    kind,
                }))
            }
            ct::Event::Mouse(mouse) => {
                let kind = match mouse.kind {
                    ct::MouseEventKind::Down(b) => MouseEventKind::Down(convert_button(b)?),
                    ct::MouseEventKind::Up(b) => MouseEventKind::Up(convert_button(b)?),
                    ct::MouseEventKind::Drag(_) | ct::MouseEventKind::Moved => {
                        MouseEventKind::Moved
                    }
                    ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
                    ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
                    ct::MouseEventKind::ScrollLeft | ct::MouseEventKind::ScrollRight => {
                        return None;
                    }
                };
                Some(Event::Mouse(MouseEvent {
                    kind,
                    column: mouse.column,
                    row: mouse.row,
                    modifiers: convert_modifiers(mouse.modifiers),
                }))
            }
            ct::Event::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
            ct::Event::Paste(text) => Some(Event::Paste(text)),
            ct::Event::FocusGained => Some(Event::FocusGained),
            ct::Event::FocusLost => Some(Event::FocusLost),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn convert_modifiers(modifiers: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;
    let mut out = Modifiers::empty();
    if modifiers.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CONTROL;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    out
}

#[cfg(not(target_arch = "wasm32"))]
fn convert_button(button: crossterm::event::MouseButton) -> Option<MouseButton> {
    use crossterm::event::MouseButton as Ct;
    match button {
        Ct::Left => Some(MouseButton::Left),
        Ct::Right => Some(MouseButton::Right),
        Ct::Middle => Some(MouseButton::Middle),
    }
}
