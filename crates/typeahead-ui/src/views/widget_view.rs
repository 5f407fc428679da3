use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::input::cursor_offset;
use crate::model::WidgetState;
use crate::render::DropdownContent;

/// Columns taken by the input box borders.
pub const INPUT_CHROME: u16 = 2;

const TRIGGER_TEXT: &str = "Press / to search";

pub fn draw(frame: &mut Frame, state: &WidgetState) {
    let [top, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if state.trigger_visible() {
        draw_trigger(frame, top);
    } else {
        draw_input(frame, state, top);
        if state.dropdown.is_visible() {
            draw_dropdown(frame, state, body);
        }
    }
    draw_help(frame, state, footer);
}

fn draw_trigger(frame: &mut Frame, area: Rect) {
    let trigger = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(TRIGGER_TEXT, Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(trigger, area);
}

fn draw_input(frame: &mut Frame, state: &WidgetState, area: Rect) {
    let border_style = if state.input_focused() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if state.input.expanded {
        " Search (expanded) "
    } else {
        " Search "
    };

    let input = Paragraph::new(state.input.value.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(input, area);

    if state.input_focused() {
        let offset = cursor_offset(&state.input.value) as u16;
        let max_x = area.x + area.width.saturating_sub(INPUT_CHROME);
        let cursor_x = (area.x + 1 + offset).min(max_x);
        frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_dropdown(frame: &mut Frame, state: &WidgetState, area: Rect) {
    let dropdown = &state.dropdown;
    let width = (dropdown.width() + INPUT_CHROME).min(area.width);
    let area = Rect { width, ..area };
    let block = Block::default().borders(Borders::ALL).title(" Results ");

    match dropdown.content() {
        DropdownContent::Rows(rows) => {
            let items: Vec<ListItem> = rows
                .iter()
                .map(|rendered| ListItem::new(rendered.row.label.as_str()))
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            let mut list_state = ListState::default().with_selected(state.focus_index());
            frame.render_stateful_widget(list, area, &mut list_state);
        }
        DropdownContent::Placeholder(text) => {
            let placeholder = Paragraph::new(Span::styled(
                text.as_str(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
            .block(block);
            frame.render_widget(placeholder, area);
        }
        DropdownContent::Nothing => {}
    }
}

fn draw_help(frame: &mut Frame, state: &WidgetState, area: Rect) {
    let help = if state.trigger_visible() {
        " / open   Ctrl+C quit"
    } else {
        " ↑/↓ move   Enter open link   Tab blur/focus   Esc close   Ctrl+C quit"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
