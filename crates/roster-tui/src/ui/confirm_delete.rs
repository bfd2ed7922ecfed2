//! Delete confirmation modal.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use roster_core::Contact;

pub fn draw(f: &mut Frame, area: Rect, contact: &Contact, deleting: bool) {
  let block = Block::default()
    .title(" Delete Contact ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let actions = if deleting {
    Line::from(Span::styled("Deleting…", Style::default().fg(Color::DarkGray)))
  } else {
    Line::from(vec![
      Span::styled(
        "[y] Delete",
        Style::default()
          .fg(Color::Red)
          .add_modifier(Modifier::BOLD),
      ),
      Span::styled("  [n] Cancel", Style::default().fg(Color::DarkGray)),
    ])
  };

  let lines = vec![
    Line::from(vec![
      Span::raw("Are you sure you want to delete "),
      Span::styled(contact.full_name(), Style::default().add_modifier(Modifier::BOLD)),
      Span::raw("?"),
    ]),
    Line::from("This action cannot be undone."),
    Line::from(""),
    actions,
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
