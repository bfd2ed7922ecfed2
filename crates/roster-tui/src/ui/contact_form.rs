//! Create/edit form modal.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use roster_core::{Field, Gender, Role};
use strum::IntoEnumIterator;

use crate::form::FormState;

/// Render `form` into `area`. `saving` disables the submit hint.
pub fn draw(f: &mut Frame, area: Rect, title: &str, form: &FormState, saving: bool) {
  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();
  for field in Field::ALL {
    let focused = form.focus == field;
    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };
    let marker = if field.is_required() { "*" } else { " " };

    let mut spans = vec![
      Span::styled(if focused { "› " } else { "  " }, label_style),
      Span::styled(format!("{:<24}", format!("{}{marker}", field.label())), label_style),
    ];
    spans.extend(value_spans(form, field, focused));
    lines.push(Line::from(spans));

    if let Some(err) = form.error(field) {
      lines.push(Line::from(Span::styled(
        format!("    {err}"),
        Style::default().fg(Color::Red),
      )));
    }
  }

  lines.push(Line::from(""));
  let submit = if saving {
    Span::styled("Saving…", Style::default().fg(Color::DarkGray))
  } else if form.is_edit {
    Span::styled("[Enter] Update", Style::default().fg(Color::Green))
  } else {
    Span::styled("[Enter] Create", Style::default().fg(Color::Green))
  };
  lines.push(Line::from(vec![
    submit,
    Span::styled("  [Esc] Cancel", Style::default().fg(Color::DarkGray)),
  ]));

  f.render_widget(Paragraph::new(lines), inner);
}

fn value_spans(form: &FormState, field: Field, focused: bool) -> Vec<Span<'static>> {
  let plain = Style::default();
  match field {
    Field::Role => options(Role::iter(), form.draft.role, focused),
    Field::Gender => options(Gender::iter(), form.draft.gender, focused),
    Field::IsActive | Field::Newsletter => vec![Span::styled(form.value_text(field), plain)],
    _ => {
      let mut text = form.value_text(field);
      if focused {
        text.push('_');
      } else if field == Field::BirthDate && text.is_empty() {
        return vec![Span::styled("MM/DD/YYYY", Style::default().fg(Color::DarkGray))];
      }
      vec![Span::styled(text, plain)]
    }
  }
}

/// All choices, with the selected one highlighted.
fn options<T>(all: impl Iterator<Item = T>, selected: Option<T>, focused: bool) -> Vec<Span<'static>>
where
  T: PartialEq + std::fmt::Display,
{
  let mut spans = Vec::new();
  if focused {
    spans.push(Span::styled("◂ ", Style::default().fg(Color::DarkGray)));
  }
  for option in all {
    let style = if Some(&option) == selected.as_ref() {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled(format!(" {option} "), style));
    spans.push(Span::raw(" "));
  }
  if focused {
    spans.push(Span::styled("▸", Style::default().fg(Color::DarkGray)));
  }
  spans
}
