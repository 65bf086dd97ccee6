//! Dashboard panel widgets

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::capabilities::CapabilitySource;
use crate::props::{AnimationKind, KindProps};
use crate::state::{DashboardState, OverrideField};

use super::level_color;

/// Render the frame statistics panel
pub fn render_frame_stats<S: CapabilitySource>(frame: &mut Frame, area: Rect, state: &DashboardState<S>) {
    let stats = state.context.frame_statistics();
    let report = state.context.performance_report();

    let fps_color = |fps: u32| match fps {
        55.. => Color::Green,
        45..=54 => Color::Blue,
        30..=44 => Color::Yellow,
        _ => Color::Red,
    };

    let drops_color = if stats.frame_drops > 10 {
        Color::Red
    } else {
        Color::Green
    };

    let lines = vec![
        stat_line("Current", stats.current_fps.to_string(), fps_color(stats.current_fps)),
        stat_line("Average", stats.average_fps.to_string(), fps_color(stats.average_fps)),
        stat_line("Smoothed", report.average_fps.to_string(), fps_color(report.average_fps)),
        stat_line(
            "Min / Max",
            format!("{} / {}", stats.min_fps, stats.max_fps),
            Color::White,
        ),
        stat_line("Frame Drops", stats.frame_drops.to_string(), drops_color),
        stat_line(
            "Level",
            stats.performance_level.name().to_string(),
            level_color(stats.performance_level),
        ),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Render device capabilities and recommendations
pub fn render_device<S: CapabilitySource>(frame: &mut Frame, area: Rect, state: &DashboardState<S>) {
    let caps = state.context.capabilities();
    let yes_no = |b: bool| if b { "Yes" } else { "No" }.to_string();

    let mut lines = vec![
        stat_line("Mobile", yes_no(caps.is_mobile), Color::White),
        stat_line("Low-end", yes_no(caps.is_low_end), Color::White),
        stat_line("Reduced Motion", yes_no(caps.prefers_reduced_motion), Color::White),
        stat_line(
            "Max Animated",
            caps.max_animated_elements().to_string(),
            Color::White,
        ),
        stat_line(
            "Base Duration",
            format!("{:.1}s", caps.base_animation_duration()),
            Color::White,
        ),
        Line::from(""),
    ];

    let report = state.context.performance_report();
    if report.recommendations.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No recommendations",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for rec in report.recommendations {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(Color::Yellow)),
            Span::styled(rec, Style::default().fg(Color::White)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Render the settings panel with the override editor
pub fn render_settings<S: CapabilitySource>(frame: &mut Frame, area: Rect, state: &DashboardState<S>) {
    let settings = state.context.adaptive_settings();
    let editing = state.override_active();

    let mut lines = vec![
        stat_line(
            "Complexity",
            settings.animation_complexity.name().to_string(),
            Color::Cyan,
        ),
        stat_line(
            "Stagger",
            format!("{:.2}s", settings.stagger_delay),
            Color::White,
        ),
    ];

    for field in OverrideField::all() {
        lines.push(create_setting_line(
            field.name(),
            &field.value(settings),
            editing && *field == state.selected_field,
            editing.then_some("[←/→]"),
        ));
    }

    lines.push(Line::from(""));
    for kind in AnimationKind::all() {
        let props = state.context.optimized_props(*kind);
        let detail = match props.detail {
            KindProps::Text(t) => format!("split {}", t.enable_split),
            KindProps::Card(c) => format!("hover {} 3d {}", c.enable_hover, c.enable_3d),
            KindProps::Background(b) => format!("blur {} particles {}", b.enable_blur, b.particle_count),
            KindProps::Particle(p) => format!("{} enabled {}", p.count, p.enabled),
        };
        let animate = if props.should_animate { "animate" } else { "static" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", kind.name()), Style::default().fg(Color::Green)),
            Span::styled(
                format!("{} {:.1}s │ {}", animate, props.duration, detail),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(create_action_line("[O]", "Toggle manual override"));
    lines.push(create_action_line("[M]", "Toggle reduced motion"));
    lines.push(create_action_line("[E]", "Export report"));
    lines.push(create_action_line("[I]", "Import latest report"));

    frame.render_widget(Paragraph::new(lines), area);
}

fn stat_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<15}", label), Style::default().fg(Color::White)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Create a setting line with label, value, and optional hint
fn create_setting_line(
    label: &str,
    value: &str,
    is_selected: bool,
    hint: Option<&str>,
) -> Line<'static> {
    let indicator = if is_selected { "▸" } else { " " };
    let indicator_style = Style::default().fg(Color::Cyan);

    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let value_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!("{} ", indicator), indicator_style),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(value.to_string(), value_style),
    ];

    if let Some(hint_text) = hint.filter(|_| is_selected) {
        spans.push(Span::styled(
            format!(" {}", hint_text),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Create an action line (button-like)
fn create_action_line(key: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(key.to_string(), Style::default().fg(Color::Green)),
        Span::styled(format!(" {}", label), Style::default().fg(Color::White)),
    ])
}
