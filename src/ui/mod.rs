//! UI module
//!
//! Performance dashboard rendering using Ratatui.

mod help;
mod widgets;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::capabilities::CapabilitySource;
use crate::frame_monitor::PerformanceLevel;
use crate::state::DashboardState;

const MIN_WIDTH: u16 = 48;
const MIN_HEIGHT: u16 = 16;

/// Draw the dashboard for one frame
pub fn render<S: CapabilitySource>(frame: &mut Frame, state: &DashboardState<S>) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_size_warning(frame, area);
        return;
    }

    let [title_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .areas(area);

    render_title_bar(frame, title_area, state);
    if state.show_dashboard {
        render_main_content(frame, body_area, state);
    } else {
        render_collapsed(frame, body_area);
    }
    render_status_bar(frame, status_area, state);

    if state.show_help {
        help::render_help_overlay(frame, area);
    }
}

/// Color used for a performance tier badge
pub fn level_color(level: PerformanceLevel) -> Color {
    match level {
        PerformanceLevel::Excellent => Color::Green,
        PerformanceLevel::Good => Color::Blue,
        PerformanceLevel::Fair => Color::Yellow,
        PerformanceLevel::Poor => Color::Red,
    }
}

fn render_size_warning(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Window is {}x{}, need at least {}x{}",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    let warning = Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .block(Block::bordered());
    frame.render_widget(warning, area);
}

fn render_collapsed(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new("Dashboard hidden, press [P] to show")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::bordered());
    frame.render_widget(hint, area);
}

/// Render the title bar
fn render_title_bar<S: CapabilitySource>(frame: &mut Frame, area: Rect, state: &DashboardState<S>) {
    let level = state.context.frame_statistics().performance_level;

    let title = Line::from(vec![
        Span::styled(
            " motion-governor ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            level.name(),
            Style::default()
                .fg(level_color(level))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(40)
                .saturating_sub(level.name().len()),
        )),
        Span::styled("[?]", Style::default().fg(Color::Green)),
        Span::raw(" Help  "),
        Span::styled("[Q]", Style::default().fg(Color::Red)),
        Span::raw(" Quit "),
    ]);

    let title_widget = Paragraph::new(title)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(title_widget, area);
}

/// Render the main content area
fn render_main_content<S: CapabilitySource>(frame: &mut Frame, area: Rect, state: &DashboardState<S>) {
    // Stack the columns on narrow terminals
    let direction = if area.width >= 80 {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };

    let columns = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let [stats_area, device_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Min(5)]).areas(columns[0]);

    render_panel(frame, stats_area, " Frame Rate ", |f, inner| {
        widgets::render_frame_stats(f, inner, state)
    });
    render_panel(frame, device_area, " Device ", |f, inner| {
        widgets::render_device(f, inner, state)
    });

    let title = if state.override_active() {
        " Settings (manual) "
    } else {
        " Settings (adaptive) "
    };
    render_panel(frame, columns[1], title, |f, inner| {
        widgets::render_settings(f, inner, state)
    });
}

fn render_panel<F>(frame: &mut Frame, area: Rect, title: &str, body: F)
where
    F: FnOnce(&mut Frame, Rect),
{
    let block = Block::bordered()
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    body(frame, inner);
}

/// Render the status bar
fn render_status_bar<S: CapabilitySource>(frame: &mut Frame, area: Rect, state: &DashboardState<S>) {
    let status_color = if state.status_is_error {
        Color::Red
    } else {
        Color::White
    };

    let stats = state.context.frame_statistics();
    let perf_info = format!(
        "FPS: {:>3} │ Drops: {:>4} │ Alerts: {}",
        stats.current_fps,
        stats.frame_drops,
        state.context.alert_count()
    );

    // Calculate spacing
    let spacing = (area.width as usize)
        .saturating_sub(state.status_message.len())
        .saturating_sub(perf_info.len())
        .saturating_sub(2);

    let status = Line::from(vec![
        Span::raw(" "),
        Span::styled(&state.status_message, Style::default().fg(status_color)),
        Span::raw(" ".repeat(spacing)),
        Span::styled(&perf_info, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
    ]);

    let widget = Paragraph::new(status)
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(widget, area);
}
