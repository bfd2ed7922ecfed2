//! Contacts table, the main pane.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::{
  app::{App, Mode},
  crud::Operation,
  table::{Column, SortDirection},
};

const WIDTHS: [Constraint; 6] = [
  Constraint::Percentage(15),
  Constraint::Percentage(15),
  Constraint::Percentage(28),
  Constraint::Percentage(10),
  Constraint::Percentage(12),
  Constraint::Percentage(20),
];

/// Render the contacts table into `area`.
pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let rows = app.visible_rows();
  let total = app.contacts.len();

  // Title with count.
  let title = if app.table.is_narrowed() {
    format!(" Contacts ({}/{}) ", rows.len(), total)
  } else {
    format!(" Contacts ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Search / filter bar along the bottom of the pane.
  if let Some(bar) = input_bar(app)
    && inner.height > 2
  {
    let bar_area = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height = inner.height.saturating_sub(1);
    f.render_widget(Paragraph::new(bar), bar_area);
  }

  if !app.loaded {
    let text = match app.crud.load_error() {
      Some(err) => Span::styled(err.to_string(), Style::default().fg(Color::Red)),
      None if app.crud.is_loading(Operation::Load) => Span::styled(
        "Loading contacts…",
        Style::default().fg(Color::DarkGray),
      ),
      None => Span::styled("No data.", Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(Line::from(text)), inner);
    return;
  }

  let focused = app.focused_column();
  let header = Row::new(Column::ALL.iter().map(|&col| {
    let arrow = match app.table.sort_direction(col) {
      Some(SortDirection::Ascending) => " ▲",
      Some(SortDirection::Descending) => " ▼",
      None => "",
    };
    let funnel = if app.table.filter(col).is_some() { " ⧩" } else { "" };
    let mut style = Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD);
    if col == focused {
      style = style.add_modifier(Modifier::UNDERLINED);
    }
    Cell::from(format!("{}{arrow}{funnel}", col.title())).style(style)
  }));

  let body: Vec<Row> = rows
    .iter()
    .map(|contact| {
      Row::new(Column::ALL.iter().map(|col| {
        let text = col.cell_text(contact);
        let style = match col {
          Column::Status if contact.is_active => Style::default().fg(Color::Green),
          Column::Status => Style::default().fg(Color::DarkGray),
          _ => Style::default(),
        };
        Cell::from(text).style(style)
      }))
    })
    .collect();

  if body.is_empty() {
    let msg = if app.table.is_narrowed() {
      "No contacts match."
    } else {
      "No contacts yet. Press n to create one."
    };
    f.render_widget(
      Table::new(Vec::<Row>::new(), WIDTHS).header(header),
      inner,
    );
    if inner.height > 2 {
      let hint_area = Rect {
        y: inner.y + 2,
        height: 1,
        ..inner
      };
      f.render_widget(
        Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
        hint_area,
      );
    }
    return;
  }

  // Scrollable table with cursor tracking.
  let mut state = ratatui::widgets::TableState::default();
  state.select(Some(app.row_cursor));

  f.render_stateful_widget(
    Table::new(body, WIDTHS)
      .header(header)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    inner,
    &mut state,
  );
}

fn input_bar<S>(app: &App<S>) -> Option<Line<'static>> {
  let style = Style::default().fg(Color::Yellow);
  let line = match app.mode {
    Mode::Search => Line::styled(format!("/{}_", app.table.search()), style),
    Mode::Filter(col) => Line::styled(
      format!("{} contains: {}_", col.title(), app.table.filter(col).unwrap_or_default()),
      style,
    ),
    Mode::Normal if !app.table.search().is_empty() => {
      Line::styled(format!("/{}", app.table.search()), style)
    }
    Mode::Normal => return None,
  };
  Some(line)
}
