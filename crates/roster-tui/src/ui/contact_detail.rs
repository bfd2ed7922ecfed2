//! Contact details modal.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use roster_core::Contact;

/// Render `contact` read-only into `area`.
pub fn draw(f: &mut Frame, area: Rect, contact: &Contact) {
  let block = Block::default()
    .title(format!(" {} ", contact.full_name()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let yes_no = |b: bool| if b { "Yes" } else { "No" };
  let stamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
    t.map(|t| t.format("%m/%d/%Y %H:%M").to_string())
      .unwrap_or_else(|| "-".to_string())
  };

  let rows: [(&str, String); 10] = [
    ("First Name", contact.first_name.clone()),
    ("Last Name", contact.last_name.clone()),
    ("Email", contact.email.clone()),
    ("Role", contact.role.to_string()),
    ("Gender", contact.gender.to_string()),
    ("Birth Date", contact.birth_date_text()),
    ("Status", contact.status_text().to_string()),
    ("Newsletter", yes_no(contact.newsletter).to_string()),
    ("Created", stamp(contact.created_at)),
    ("Updated", stamp(contact.updated_at)),
  ];

  let mut lines: Vec<Line> = rows
    .into_iter()
    .map(|(label, value)| {
      Line::from(vec![
        Span::styled(
          format!("{label:<14}"),
          Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
      ])
    })
    .collect();

  lines.push(Line::from(""));
  lines.push(Line::from(vec![Span::styled(
    "[e] edit  [Esc] close",
    Style::default().fg(Color::DarkGray),
  )]));

  f.render_widget(Paragraph::new(lines), inner);
}
