use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{
    dom::{Document, ElementId},
    field::{FieldController, InputKind},
    session::Session,
};

use super::focus::{self, input_kind};

pub(crate) struct ViewContext<'a> {
    pub session: &'a Session,
    pub focused: Option<ElementId>,
    pub option_cursor: usize,
    pub title: &'a str,
    pub status_message: &'a str,
    pub help: Option<&'a str>,
}

pub(crate) fn draw(frame: &mut Frame<'_>, ctx: ViewContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(frame.area());

    render_fields(frame, chunks[0], &ctx);
    render_footer(frame, chunks[1], &ctx);
}

fn render_fields(frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
    let fields = focus::ordered_fields(ctx.session);
    if fields.is_empty() {
        let placeholder = Paragraph::new("No vanishing fields in document")
            .block(Block::default().borders(Borders::ALL).title(ctx.title.to_string()));
        frame.render_widget(placeholder, area);
        return;
    }

    let content_width = area.width.saturating_sub(4).max(1) as usize;
    let items: Vec<ListItem<'static>> = fields
        .into_iter()
        .map(|field| {
            let lines = if field.is_opened() {
                open_field_lines(ctx, field, content_width)
            } else {
                closed_field_lines(ctx, field, content_width)
            };
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(ctx.title.to_string()),
    );
    frame.render_widget(list, area);
}

fn closed_field_lines(
    ctx: &ViewContext<'_>,
    field: &FieldController,
    width: usize,
) -> Vec<Line<'static>> {
    let focused = ctx.focused == Some(focus::resting_element(field));
    let content = field
        .label()
        .map(|label| label.content().to_string())
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| format!("({})", field.identifier()));

    let mut style = if field.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    if focused {
        style = style.add_modifier(Modifier::BOLD).bg(Color::DarkGray);
    }

    let marker = if focused { "» " } else { "  " };
    let wrapped = wrap(&content, width.saturating_sub(4).max(1));
    let mut lines = Vec::with_capacity(wrapped.len());
    for (idx, segment) in wrapped.into_iter().enumerate() {
        let prefix = if idx == 0 { marker } else { "  " };
        let mut spans = vec![
            Span::raw(prefix.to_string()),
            Span::styled(segment.into_owned(), style),
        ];
        if idx == 0 && field.is_changed() {
            spans.push(Span::styled(" *", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn open_field_lines(
    ctx: &ViewContext<'_>,
    field: &FieldController,
    width: usize,
) -> Vec<Line<'static>> {
    let doc = ctx.session.document();
    let mut lines = vec![Line::from(vec![
        Span::raw("▾ ".to_string()),
        Span::styled(
            field.identifier().to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    let names: Vec<(ElementId, String)> = field
        .inputs()
        .iter()
        .map(|input| (*input, input_name(doc, *input)))
        .collect();
    let name_width = names
        .iter()
        .map(|(_, name)| name.width())
        .max()
        .unwrap_or(0);

    for (input, name) in names {
        let focused = ctx.focused == Some(input);
        let marker = if focused { "  » " } else { "    " };
        let padding = " ".repeat(name_width.saturating_sub(name.width()));
        let value = render_input(doc, input, focused.then_some(ctx.option_cursor));
        let value_width = width.saturating_sub(name_width + 6).max(1);
        let value_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        for (idx, segment) in wrap(&value, value_width).into_iter().enumerate() {
            let lead = if idx == 0 {
                format!("{marker}{name}{padding}: ")
            } else {
                " ".repeat(marker.width() + name_width + 2)
            };
            lines.push(Line::from(vec![
                Span::raw(lead),
                Span::styled(segment.into_owned(), value_style),
            ]));
        }
    }
    lines
}

fn input_name(doc: &Document, input: ElementId) -> String {
    doc.get(input)
        .and_then(|node| node.attribute("name").or(node.html_id()))
        .unwrap_or("input")
        .to_string()
}

fn render_input(doc: &Document, input: ElementId, option_cursor: Option<usize>) -> String {
    let Some(node) = doc.get(input) else {
        return String::new();
    };
    match input_kind(doc, input) {
        Some(InputKind::Checkbox) => {
            format!("[{}] {}", if node.is_checked() { "x" } else { " " }, node.value())
        }
        Some(InputKind::Radio) => {
            format!("({}) {}", if node.is_checked() { "•" } else { " " }, node.value())
        }
        Some(InputKind::File) => node.files().join(", "),
        Some(InputKind::Select { multiple: false }) => {
            let selected = doc.selected_values(input);
            format!("< {} >", selected.first().map(String::as_str).unwrap_or(""))
        }
        Some(InputKind::Select { multiple: true }) => doc
            .options_of(input)
            .iter()
            .enumerate()
            .filter_map(|(idx, option)| doc.get(*option).map(|node| (idx, node)))
            .map(|(idx, option)| {
                let mark = if option.is_selected() { "x" } else { " " };
                let cursor = if option_cursor == Some(idx) { ">" } else { "" };
                format!("{cursor}[{mark}] {}", option.option_value())
            })
            .collect::<Vec<_>>()
            .join("  "),
        Some(InputKind::Text | InputKind::TextArea) | None => node.value().to_string(),
    }
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let changed = ctx
        .session
        .registry()
        .fields()
        .filter(|field| field.is_changed())
        .count();
    let mut status = ctx.status_message.to_string();
    if changed > 0 {
        status.push_str(&format!(" • {changed} changed"));
    }

    let status_widget = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status_widget, chunks[0]);

    let help_widget = Paragraph::new(ctx.help.unwrap_or(" ").to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Keys"));
    frame.render_widget(help_widget, chunks[1]);
}
