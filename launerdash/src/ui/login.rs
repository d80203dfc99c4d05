//! Login form: state, key handling and drawing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::theme::ACCENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
    pub busy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit,
    Quit,
}

impl LoginForm {
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            focus: LoginField::Password,
            ..Self::default()
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

pub fn login_handle_key(form: &mut LoginForm, k: KeyEvent) -> LoginAction {
    if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('c')) {
        return LoginAction::Quit;
    }
    match k.code {
        KeyCode::Esc => return LoginAction::Quit,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_focus(),
        KeyCode::Enter => {
            // Enter on the username moves on, like a form's next field
            if form.focus == LoginField::Username && form.password.is_empty() {
                form.focus = LoginField::Password;
            } else if !form.busy {
                return LoginAction::Submit;
            }
        }
        KeyCode::Backspace => {
            form.field_mut().pop();
        }
        KeyCode::Char(c) => form.field_mut().push(c),
        _ => {}
    }
    LoginAction::None
}

pub fn draw_login(f: &mut ratatui::Frame<'_>, area: Rect, form: &LoginForm) {
    let card = centered(area, 44, 11);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Login ");
    f.render_widget(block, card);

    let inner = Rect {
        x: card.x + 2,
        y: card.y + 1,
        width: card.width.saturating_sub(4),
        height: card.height.saturating_sub(2),
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // username
            Constraint::Length(3), // password
            Constraint::Length(1), // status
            Constraint::Min(0),
        ])
        .split(inner);

    let masked = "*".repeat(form.password.chars().count());
    draw_field(f, rows[0], "Username", &form.username, form.focus == LoginField::Username);
    draw_field(f, rows[1], "Password", &masked, form.focus == LoginField::Password);

    let status = if form.busy {
        Line::from(Span::styled("Signing in...", Style::default().fg(Color::Yellow)))
    } else if let Some(err) = &form.error {
        Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red)))
    } else {
        Line::from(Span::styled(
            "Enter to sign in, Tab to switch, Esc to quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(status), rows[2]);
}

fn draw_field(f: &mut ratatui::Frame<'_>, area: Rect, label: &str, value: &str, focused: bool) {
    let style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if focused { "▏" } else { "" };
    let p = Paragraph::new(format!("{value}{cursor}"))
        .block(Block::default().borders(Borders::ALL).border_style(style).title(label.to_string()));
    f.render_widget(p, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
