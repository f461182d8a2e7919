#![forbid(unsafe_code)]

//! Form controls: text input, checkbox, select.
//!
//! Each control is a stateful widget plus a `handle_key` on its state.
//! Controls do not own focus; the containing form decides which control
//! receives keys and renders it with the focused style.

use atelier_core::event::{KeyCode, KeyEvent};
use atelier_core::geometry::Rect;
use atelier_render::Frame;
use atelier_style::{Style, theme};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{StatefulWidget, draw_text_span};

/// Editable single-line text state. The cursor is a grapheme index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    value: String,
    cursor: usize,
}

impl TextInputState {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.graphemes(true).count();
        Self { value, cursor }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the content and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.grapheme_count();
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn byte_offset(&self, grapheme_index: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }

    /// Apply a key. Returns true if the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(
                atelier_core::event::Modifiers::CONTROL | atelier_core::event::Modifiers::ALT,
            ) =>
            {
                let offset = self.byte_offset(self.cursor);
                self.value.insert(offset, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace if self.cursor > 0 => {
                let start = self.byte_offset(self.cursor - 1);
                let end = self.byte_offset(self.cursor);
                self.value.replace_range(start..end, "");
                self.cursor -= 1;
                true
            }
            KeyCode::Delete if self.cursor < self.grapheme_count() => {
                let start = self.byte_offset(self.cursor);
                let end = self.byte_offset(self.cursor + 1);
                self.value.replace_range(start..end, "");
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.grapheme_count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.grapheme_count();
                false
            }
            _ => false,
        }
    }
}

/// Single-line text box.
#[derive(Debug, Clone, Default)]
pub struct TextInput<'a> {
    placeholder: &'a str,
    focused: bool,
    masked: bool,
    style: Style,
}

impl<'a> TextInput<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Render every grapheme as a bullet (password entry).
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for TextInput<'_> {
    type State = TextInputState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let style = if self.focused {
            self.style.patch(Style::new().underline())
        } else {
            self.style
        };

        if state.value.is_empty() && !self.placeholder.is_empty() {
            draw_text_span(
                frame,
                area.x,
                area.y,
                self.placeholder,
                style.patch(theme::placeholder()),
                area.right(),
            );
        } else if self.masked {
            let bullets = "\u{2022}".repeat(state.value.graphemes(true).count());
            draw_text_span(frame, area.x, area.y, &bullets, style, area.right());
        } else {
            // Scroll so the cursor stays visible in narrow fields.
            let cursor_cols = state
                .value
                .graphemes(true)
                .take(state.cursor)
                .map(|g| UnicodeWidthStr::width(g))
                .sum::<usize>();
            let skip_cols = cursor_cols.saturating_sub(area.width.saturating_sub(1) as usize);
            let mut skipped = 0usize;
            let visible: String = state
                .value
                .graphemes(true)
                .skip_while(|g| {
                    if skipped < skip_cols {
                        skipped += UnicodeWidthStr::width(*g);
                        true
                    } else {
                        false
                    }
                })
                .collect();
            draw_text_span(frame, area.x, area.y, &visible, style, area.right());
        }

        if self.focused {
            let cursor_cols = state
                .value
                .graphemes(true)
                .take(state.cursor)
                .map(|g| UnicodeWidthStr::width(g))
                .sum::<usize>() as u16;
            let x = (area.x + cursor_cols.min(area.width.saturating_sub(1))).min(area.right() - 1);
            frame.set_cursor(x, area.y);
        }
    }
}

/// Checkbox state, toggled with Space or Enter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckboxState {
    pub checked: bool,
}

impl CheckboxState {
    #[must_use]
    pub fn new(checked: bool) -> Self {
        Self { checked }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.checked = !self.checked;
                true
            }
            _ => false,
        }
    }
}

/// `[x] label` checkbox.
#[derive(Debug, Clone, Default)]
pub struct Checkbox<'a> {
    label: &'a str,
    focused: bool,
    style: Style,
}

impl<'a> Checkbox<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            focused: false,
            style: Style::default(),
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for Checkbox<'_> {
    type State = CheckboxState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let mark = if state.checked { "[x]" } else { "[ ]" };
        let style = if self.focused {
            self.style.patch(theme::focused())
        } else {
            self.style
        };
        let after = draw_text_span(frame, area.x, area.y, mark, style, area.right());
        if !self.label.is_empty() {
            draw_text_span(frame, after + 1, area.y, self.label, self.style, area.right());
        }
    }
}

/// Select state: a fixed option list with one chosen entry.
/// Left/Right (or Up/Down) cycle through options without wrapping past
/// the ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectState {
    options: Vec<String>,
    selected: usize,
}

impl SelectState {
    #[must_use]
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: 0,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Select the option with this exact value, if present.
    pub fn select_value(&mut self, value: &str) {
        if let Some(index) = self.options.iter().position(|opt| opt == value) {
            self.selected = index;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Up if self.selected > 0 => {
                self.selected -= 1;
                true
            }
            KeyCode::Right | KeyCode::Down
                if self.selected + 1 < self.options.len() =>
            {
                self.selected += 1;
                true
            }
            _ => false,
        }
    }
}

/// `< value >` option cycler.
#[derive(Debug, Clone, Default)]
pub struct Select {
    focused: bool,
    style: Style,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for Select {
    type State = SelectState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let value = state.selected().unwrap_or("");
        let style = if self.focused {
            self.style.patch(theme::focused())
        } else {
            self.style
        };
        let text = format!("\u{2039} {value} \u{203A}");
        draw_text_span(frame, area.x, area.y, &text, style, area.right());
    }
}
