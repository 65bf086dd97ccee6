//! Help overlay rendering

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Key binding reference drawn over the dashboard
pub fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let overlay_width = (area.width as f32 * 0.6).min(56.0) as u16;
    let overlay_height = (area.height as f32 * 0.8).min(24.0) as u16;

    let overlay_area = centered_rect(overlay_width, overlay_height, area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    frame.render_widget(Paragraph::new(help_lines()), inner);
}

fn help_lines() -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);
    let desc_style = Style::default().fg(Color::White);

    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), key_style),
            Span::styled(desc, desc_style),
        ])
    };

    vec![
        Line::from(Span::styled("Global", section_style)),
        entry("Q", "Quit"),
        entry("?", "Toggle help overlay"),
        entry("P", "Show / hide dashboard"),
        Line::from(""),
        Line::from(Span::styled("Monitoring", section_style)),
        entry("R", "Reset frame statistics"),
        entry("M", "Toggle reduced-motion preference"),
        entry("D", "Re-detect device"),
        entry("E", "Export performance report"),
        entry("I", "Import latest report override"),
        Line::from(""),
        Line::from(Span::styled("Manual Override", section_style)),
        entry("O", "Enable / disable override"),
        entry("↑ ↓", "Select setting"),
        entry("← → + -", "Adjust value"),
        entry("Space", "Step / toggle value"),
        Line::from(""),
        Line::from(Span::styled(
            "       [Press ? or Esc to close]",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
