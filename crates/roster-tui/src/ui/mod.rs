//! TUI rendering: orchestrates all panes.

pub mod confirm_delete;
pub mod contact_detail;
pub mod contact_form;
pub mod contact_table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Clear, Paragraph},
};

use crate::{
  app::{App, Mode},
  crud::Operation,
  modal::Modal,
  notice::Level,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  contact_table::draw(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Some(modal) = app.modal.active() {
    draw_modal(f, rows[1], app, modal);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " roster  [n] new  [/] search  [r] refresh  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Modals ───────────────────────────────────────────────────────────────────

fn draw_modal<S>(f: &mut Frame, body: Rect, app: &App<S>, modal: &Modal) {
  match modal {
    Modal::Create | Modal::Edit(_) => {
      let Some(form) = &app.form else {
        return;
      };
      let area = centered(body, 70, 22);
      f.render_widget(Clear, area);
      let saving = app
        .form_operation()
        .is_some_and(|op| app.crud.is_loading(op));
      contact_form::draw(f, area, modal.title(), form, saving);
    }
    Modal::View(contact) => {
      let area = centered(body, 60, 14);
      f.render_widget(Clear, area);
      contact_detail::draw(f, area, contact);
    }
    Modal::Delete(contact) => {
      let area = centered(body, 56, 6);
      f.render_widget(Clear, area);
      confirm_delete::draw(f, area, contact, app.crud.is_loading(Operation::Delete));
    }
  }
}

/// A `width`×`height` box centred in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  cell
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match (app.modal.active(), app.mode) {
    (Some(Modal::Create | Modal::Edit(_)), _) => (
      "FORM",
      "Tab/↓ next  Shift-Tab/↑ prev  ←→ choose  Space toggle  Enter save  Esc cancel",
    ),
    (Some(Modal::View(_)), _) => ("VIEW", "e edit  Esc close"),
    (Some(Modal::Delete(_)), _) => ("DELETE", "y confirm  n cancel"),
    (None, Mode::Search) => ("SEARCH", "Type to search  Enter keep  Esc clear"),
    (None, Mode::Filter(_)) => ("FILTER", "Type to filter column  Enter keep  Esc clear"),
    (None, Mode::Normal) => (
      "NORMAL",
      "↑↓/jk rows  ←→/hl columns  s sort  f filter  Enter view  e edit  d delete",
    ),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  // A live notice takes the place of the key hints.
  let hint_span = match app.notices.latest() {
    Some(notice) => {
      let color = match notice.level {
        Level::Success => Color::Green,
        Level::Error => Color::Red,
        Level::Info => Color::Yellow,
      };
      Span::styled(format!("  {}", notice.message), Style::default().fg(color))
    }
    None => Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray)),
  };

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
