use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::PlayerField;

/// Where keyboard input goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Form(PlayerField),
    Table,
}

impl Default for Focus {
    fn default() -> Self {
        Focus::Table
    }
}

impl Focus {
    /// Tab order: Name, Team, Position, then the table.
    pub(crate) fn next(self) -> Self {
        match self {
            Focus::Form(PlayerField::Name) => Focus::Form(PlayerField::Team),
            Focus::Form(PlayerField::Team) => Focus::Form(PlayerField::Position),
            Focus::Form(PlayerField::Position) => Focus::Table,
            Focus::Table => Focus::Form(PlayerField::Name),
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Focus::Form(PlayerField::Name) => Focus::Table,
            Focus::Form(PlayerField::Team) => Focus::Form(PlayerField::Name),
            Focus::Form(PlayerField::Position) => Focus::Form(PlayerField::Team),
            Focus::Table => Focus::Form(PlayerField::Position),
        }
    }

    pub(crate) fn field(self) -> Option<PlayerField> {
        match self {
            Focus::Form(field) => Some(field),
            Focus::Table => None,
        }
    }
}

/// New field value after typing `ch`, or `None` when the character is not
/// accepted.
pub(crate) fn push_char(current: &str, ch: char) -> Option<String> {
    if ch.is_control() {
        return None;
    }
    let mut value = current.to_string();
    value.push(ch);
    Some(value)
}

/// New field value after a backspace, or `None` when there is nothing to
/// remove.
pub(crate) fn backspace(current: &str) -> Option<String> {
    let mut value = current.to_string();
    value.pop().map(|_| value)
}

/// Render one labeled input line. Empty inputs show a `<required>` hint.
pub(crate) fn build_line(field: PlayerField, value: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<required>".to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(label_prefix(field)),
        Span::styled(display, style),
    ])
}

/// Submit button, labeled by what Enter will do.
pub(crate) fn submit_line(editing: bool, focused: bool) -> Line<'static> {
    let label = if editing { "[ Update ]" } else { "[ Create ]" };
    let mut style = Style::default()
        .fg(Color::Black)
        .bg(if editing { Color::Blue } else { Color::Green });
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    Line::from(vec![
        Span::raw(" ".repeat(label_width())),
        Span::styled(label, style),
    ])
}

/// `"Name:     "` style prefix, padded so the inputs line up.
pub(crate) fn label_prefix(field: PlayerField) -> String {
    format!("{:<width$}", format!("{}:", field.label()), width = label_width())
}

fn label_width() -> usize {
    PlayerField::ALL
        .iter()
        .map(|field| field.label().len() + 2)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_cycles_through_form_and_table() {
        let mut focus = Focus::Table;
        let mut seen = Vec::new();
        for _ in 0..4 {
            focus = focus.next();
            seen.push(focus);
        }
        assert_eq!(
            seen,
            vec![
                Focus::Form(PlayerField::Name),
                Focus::Form(PlayerField::Team),
                Focus::Form(PlayerField::Position),
                Focus::Table,
            ]
        );
        assert_eq!(Focus::Table.previous(), Focus::Form(PlayerField::Position));
        assert_eq!(Focus::Form(PlayerField::Name).previous(), Focus::Table);
    }

    #[test]
    fn editing_helpers_respect_control_characters() {
        assert_eq!(push_char("An", 'n'), Some("Ann".to_string()));
        assert_eq!(push_char("An", '\u{7}'), None);
        assert_eq!(backspace("Ann"), Some("An".to_string()));
        assert_eq!(backspace(""), None);
    }

    #[test]
    fn prefixes_line_up() {
        assert_eq!(label_prefix(PlayerField::Name), "Name:     ");
        assert_eq!(label_prefix(PlayerField::Position), "Position: ");
    }
}
