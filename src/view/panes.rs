//! Rendering logic for each TUI pane

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::controller::{Controller, ExecutionView, NoticeKind, UiMode};
use crate::protocol::quality_message;
use crate::view::theme::{DEFAULT_THEME, feedback_color, feedback_marker, score_color};

/// Render the editor pane with gutter, selection and cursor.
pub fn render_editor(frame: &mut Frame, area: Rect, app: &mut Controller) {
    let focused = matches!(app.mode, UiMode::Edit);
    let border_style = if focused {
        Style::default().fg(DEFAULT_THEME.border_focused)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let marker = if app.document.modified { " [+]" } else { "" };
    let block = Block::default()
        .title(format!(" {}{} ", app.display_filename(), marker))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let (total_lines, _) = app.document.stats();
    let gutter_width = if app.config.show_line_numbers {
        (total_lines.to_string().len().max(2) + 1) as u16
    } else {
        0
    };
    let content_width = inner.width.saturating_sub(gutter_width).max(1) as usize;
    let height = inner.height as usize;

    // Keep the cursor inside the viewport.
    let (cursor_line, _) = app.document.cursor_position();
    let line_start = app.document.line_start(app.document.cursor);
    let cursor_x = app.document.text[line_start..app.document.cursor].width();
    if cursor_line < app.scroll_row {
        app.scroll_row = cursor_line;
    }
    if cursor_line >= app.scroll_row + height {
        app.scroll_row = cursor_line + 1 - height;
    }
    if cursor_x < app.scroll_col {
        app.scroll_col = cursor_x;
    }
    if cursor_x >= app.scroll_col + content_width {
        app.scroll_col = cursor_x + 1 - content_width;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(gutter_width), Constraint::Min(1)])
        .split(inner);

    let selection = app.document.selection();
    let mut numbers: Vec<Line> = Vec::new();
    let mut lines: Vec<Line> = Vec::new();
    let mut offset = 0usize;
    for (index, raw) in app.document.text.split('\n').enumerate() {
        let line_end = offset + raw.len();
        if index >= app.scroll_row && index < app.scroll_row + height {
            if gutter_width > 0 {
                numbers.push(Line::from(Span::styled(
                    format!("{:>w$} ", index + 1, w = gutter_width as usize - 1),
                    Style::default().fg(DEFAULT_THEME.gutter),
                )));
            }
            lines.push(editor_line(raw, offset, selection));
        }
        offset = line_end + 1;
    }

    if gutter_width > 0 {
        frame.render_widget(Paragraph::new(numbers), chunks[0]);
    }
    if app.document.text.is_empty() {
        let hint = Paragraph::new("# Escribe tu código Python aquí...")
            .style(Style::default().fg(DEFAULT_THEME.muted));
        frame.render_widget(hint, chunks[1]);
    } else {
        let editor = Paragraph::new(lines).scroll((0, app.scroll_col as u16));
        frame.render_widget(editor, chunks[1]);
    }

    if focused {
        let x = chunks[1].x + (cursor_x - app.scroll_col) as u16;
        let y = chunks[1].y + (cursor_line - app.scroll_row) as u16;
        frame.set_cursor_position((x, y));
    }
}

// Splits one visual line into plain/selected/plain spans.
fn editor_line(raw: &str, line_offset: usize, selection: Option<(usize, usize)>) -> Line<'_> {
    if let Some((start, end)) = selection {
        let a = start.saturating_sub(line_offset).min(raw.len());
        let b = end.saturating_sub(line_offset).min(raw.len());
        if a < b {
            return Line::from(vec![
                Span::raw(&raw[..a]),
                Span::styled(&raw[a..b], Style::default().bg(DEFAULT_THEME.selection_bg)),
                Span::raw(&raw[b..]),
            ]);
        }
    }
    Line::from(raw)
}

/// Render the analysis column: metrics, score, feedback, and (while visible)
/// the execution output.
pub fn render_results(frame: &mut Frame, area: Rect, app: &Controller) {
    let exec_height = app.execution.as_ref().map(|view| {
        let rows = view.text().lines().count().max(1) as u16;
        rows.min(8) + 2
    });
    let mut constraints = vec![
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Min(3),
    ];
    if let Some(height) = exec_height {
        constraints.push(Constraint::Length(height));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_metrics(frame, chunks[0], app);
    render_score(frame, chunks[1], app);
    render_feedback(frame, chunks[2], app);
    if let Some(view) = &app.execution {
        render_execution(frame, chunks[3], view);
    }
}

fn metric_line(label: &str, value: u32) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<18}"),
            Style::default().fg(DEFAULT_THEME.muted),
        ),
        Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

// Metrics sit at zero until an analysis lands, matching the reset state.
fn render_metrics(frame: &mut Frame, area: Rect, app: &Controller) {
    let block = Block::default()
        .title(" Métricas ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let metrics = app.analysis.as_ref().map(|a| a.metrics).unwrap_or_default();
    let paragraph = Paragraph::new(vec![
        metric_line("Líneas de código", metrics.code_lines),
        metric_line("Funciones", metrics.functions),
        metric_line("Clases", metrics.classes),
        metric_line("Complejidad", metrics.complexity),
    ])
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_score(frame: &mut Frame, area: Rect, app: &Controller) {
    let block = Block::default()
        .title(" Puntuación ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    match &app.analysis {
        Some(analysis) => {
            let color = score_color(analysis.score);
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(color).bg(DEFAULT_THEME.bar_bg))
                .ratio((analysis.score / 100.0).clamp(0.0, 1.0))
                .label(format!("{:.0}%", analysis.score));
            frame.render_widget(gauge, rows[0]);
            let verdict =
                Paragraph::new(quality_message(analysis.score)).style(Style::default().fg(color));
            frame.render_widget(verdict, rows[1]);
        }
        None => {
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(DEFAULT_THEME.muted).bg(DEFAULT_THEME.bar_bg))
                .ratio(0.0)
                .label("0%");
            frame.render_widget(gauge, rows[0]);
            let verdict = Paragraph::new("Esperando análisis...")
                .style(Style::default().fg(DEFAULT_THEME.muted));
            frame.render_widget(verdict, rows[1]);
        }
    }
}

/// Tips shown in the suggestions list before any analysis has run.
const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "Usa nombres descriptivos para variables y funciones",
    "Agrega docstrings para documentar tu código",
    "Implementa manejo de errores con try/except",
];

fn render_feedback(frame: &mut Frame, area: Rect, app: &Controller) {
    let block = Block::default()
        .title(" Resultados ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));
    let muted = Style::default().fg(DEFAULT_THEME.muted);

    let mut lines: Vec<Line> = Vec::new();
    match &app.analysis {
        Some(analysis) if !analysis.feedback.is_empty() => {
            for item in &analysis.feedback {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} ", feedback_marker(item.kind)),
                        Style::default().fg(feedback_color(item.kind)),
                    ),
                    Span::styled(item.message.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
                ]));
            }
        }
        Some(_) => lines.push(Line::from(Span::styled("No hay feedback disponible", muted))),
        None => lines.push(Line::from(Span::styled(
            "Escribe código o carga un archivo .py para obtener feedback detallado",
            muted,
        ))),
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Sugerencias",
        Style::default()
            .fg(DEFAULT_THEME.accent)
            .add_modifier(Modifier::BOLD),
    )));
    match &app.analysis {
        Some(analysis) if !analysis.suggestions.is_empty() => {
            for suggestion in &analysis.suggestions {
                lines.push(suggestion_line(suggestion));
            }
        }
        Some(_) => lines.push(Line::from(Span::styled("No hay sugerencias adicionales", muted))),
        None => lines.extend(DEFAULT_SUGGESTIONS.iter().map(|tip| suggestion_line(tip))),
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn suggestion_line(text: &str) -> Line<'_> {
    Line::from(vec![
        Span::styled("→ ", Style::default().fg(DEFAULT_THEME.accent)),
        Span::styled(text, Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

fn render_execution(frame: &mut Frame, area: Rect, view: &ExecutionView) {
    let (title, color) = if view.failed() {
        (" Ejecución (error) ", DEFAULT_THEME.error)
    } else {
        (" Ejecución ", DEFAULT_THEME.success)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let style = if view.failed() {
        Style::default().fg(DEFAULT_THEME.error)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };
    let paragraph = Paragraph::new(view.text())
        .style(style)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &Controller) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let bar_style = Style::default()
        .bg(DEFAULT_THEME.bar_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.bar_bg)
        .fg(DEFAULT_THEME.muted);

    let (total_lines, total_chars) = app.document.stats();
    let (row, col) = app.document.cursor_position();
    let marker = if app.document.modified { " [+]" } else { "" };
    let left_spans = vec![
        Span::styled(
            format!(" {}{} ", app.display_filename(), marker),
            Style::default()
                .bg(DEFAULT_THEME.accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" Ln {}, Col {} ", row + 1, col + 1), bar_style),
        Span::styled("│", sep_style),
        Span::styled(format!(" Líneas: {total_lines} "), bar_style),
        Span::styled("│", sep_style),
        Span::styled(format!(" Caracteres: {total_chars} "), bar_style),
    ];
    let left = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.bar_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.key_bg).fg(Color::Black);
    let desc_style = bar_style;
    let mut right_spans = vec![
        Span::styled(" ^A ", key_style),
        Span::styled(" analizar ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ^↵ ", key_style),
        Span::styled(" ejecutar ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ^P ", key_style),
        Span::styled(" ejemplos ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ^Q ", key_style),
        Span::styled(" salir ", desc_style),
    ];
    if app.config.check_connection {
        let (dot_color, dot_label) = match app.online {
            Some(true) => (DEFAULT_THEME.success, "conectado"),
            Some(false) => (DEFAULT_THEME.error, "sin conexión"),
            None => (DEFAULT_THEME.muted, "verificando"),
        };
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            format!(" ● {dot_label} "),
            Style::default().bg(DEFAULT_THEME.bar_bg).fg(dot_color),
        ));
    }
    if app.busy {
        right_spans.push(Span::styled(
            " analizando… ",
            Style::default()
                .bg(DEFAULT_THEME.bar_bg)
                .fg(DEFAULT_THEME.warning)
                .add_modifier(Modifier::BOLD),
        ));
    }
    let right = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.bar_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right, layout[1]);
}

/// Render the filename prompt overlay.
pub fn render_open_prompt(frame: &mut Frame, app: &Controller) {
    let area = centered_rect(60, 3, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Abrir archivo (.py, .txt) ")
        .title_bottom(" Enter abrir · Esc cancelar ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(app.prompt_input.as_str()), inner);
    if inner.width > 0 {
        let x = inner.x + (app.prompt_input.width() as u16).min(inner.width - 1);
        frame.set_cursor_position((x, inner.y));
    }
}

/// Render the example picker overlay. Known examples get a title and
/// description row; anything else the server sends is listed by key.
pub fn render_example_picker(frame: &mut Frame, app: &Controller) {
    let height = (app.store.len() as u16 * 2 + 2).clamp(4, 14);
    let area = centered_rect(50, height, frame.area());
    frame.render_widget(Clear, area);
    let origin = if app.store.is_from_server() {
        "servidor"
    } else {
        "local"
    };
    let block = Block::default()
        .title(format!(" Ejemplos ({origin}) "))
        .title_bottom(" ↑/↓ mover · Enter cargar · Esc cerrar ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_focused));

    // Two rows per entry inside the borders; skip so the selection stays
    // visible when the server sends more examples than fit.
    let visible = (height.saturating_sub(2) / 2).max(1) as usize;
    let skip = app.picker_index.saturating_sub(visible - 1);
    let mut items: Vec<ListItem> = app
        .store
        .keys()
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(index, key)| {
            let selected = index == app.picker_index;
            let title_style = if selected {
                Style::default()
                    .bg(DEFAULT_THEME.selection_bg)
                    .fg(DEFAULT_THEME.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            let detail_style = if selected {
                Style::default()
                    .bg(DEFAULT_THEME.selection_bg)
                    .fg(DEFAULT_THEME.fg)
            } else {
                Style::default().fg(DEFAULT_THEME.muted)
            };
            let rows = match app.store.info(key) {
                Some(info) => vec![
                    Line::styled(format!(" {} ({}) ", info.title, info.difficulty), title_style),
                    Line::styled(format!("   {} ", info.description), detail_style),
                ],
                None => vec![
                    Line::styled(format!(" {key} "), title_style),
                    Line::styled("   (ejemplo del servidor) ".to_string(), detail_style),
                ],
            };
            ListItem::new(rows)
        })
        .collect();
    if app.store.is_empty() {
        items.push(
            ListItem::new(" (sin ejemplos) ").style(Style::default().fg(DEFAULT_THEME.muted)),
        );
    }
    frame.render_widget(List::new(items).block(block), area);
}

/// Render active notices stacked in the top-right corner.
pub fn render_notices(frame: &mut Frame, app: &Controller) {
    let area = frame.area();
    for (index, notice) in app.notices.iter().enumerate() {
        let text = format!(" {} ", notice.message);
        let width = (text.as_str().width() as u16).min(area.width.saturating_sub(2));
        let y = area.y + 1 + index as u16;
        if y + 1 >= area.bottom() || width == 0 {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width + 1),
            y,
            width,
            height: 1,
        };
        let style = match notice.kind {
            NoticeKind::Success => Style::default().bg(DEFAULT_THEME.success).fg(Color::Black),
            NoticeKind::Error => Style::default().bg(DEFAULT_THEME.error).fg(Color::Black),
            NoticeKind::Info => Style::default().bg(DEFAULT_THEME.accent).fg(Color::Black),
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(text).style(style.add_modifier(Modifier::BOLD)),
            rect,
        );
    }
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = ((area.width as u32 * percent_x as u32 / 100) as u16)
        .max(20)
        .min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
