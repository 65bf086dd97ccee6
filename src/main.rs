//! Main entry point for motion-governor

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    panic,
    path::PathBuf,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use motion_governor::{
    capabilities::CapabilitySource,
    config::Config,
    context::PerformanceContext,
    frame_monitor::FrameMonitor,
    input::handle_event,
    scheduler::{FrameLoop, FrameScheduler, ManualScheduler, SystemScheduler},
    state::DashboardState,
    ui,
};

/// Adaptive animation governor with a terminal performance overlay
#[derive(Parser, Debug)]
#[command(name = "motion-governor", version, about)]
struct Args {
    /// Run without the dashboard and print the final report as JSON
    #[arg(long)]
    headless: bool,

    /// Number of frames to sample in headless mode
    #[arg(long, default_value_t = 300)]
    frames: usize,

    /// Replay synthetic frames of this duration instead of the wall clock
    #[arg(long)]
    frame_ms: Option<f64>,

    /// Viewport width in pixels used for mobile / low-end classification
    #[arg(long, env = "MOTION_VIEWPORT_WIDTH")]
    viewport_width: Option<u32>,

    /// User agent used for mobile classification
    #[arg(long)]
    user_agent: Option<String>,

    /// Force the reduced-motion preference on
    #[arg(long)]
    reduced_motion: bool,

    /// Rolling window size in frames
    #[arg(long)]
    sample_size: Option<usize>,

    /// Target refresh rate for the frame clock
    #[arg(long)]
    target_fps: Option<u32>,

    /// Write the final report into this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// Start with the manual override saved in an exported report
    #[arg(long, value_name = "REPORT")]
    import: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration, then let flags override it
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring unreadable config: {}", e);
            Config::default()
        }
    };
    apply_args(&mut config, &args);
    config.validate()?;

    init_logging(&args, &config)?;

    let mut context = PerformanceContext::new(config.capability_source());
    if let Some(path) = &args.import {
        context
            .import_from(path)
            .with_context(|| format!("importing {}", path.display()))?;
    }
    let monitor = FrameMonitor::new(config.monitor.sample_size);

    if args.headless {
        return match args.frame_ms {
            Some(frame_ms) => {
                let scheduler = ManualScheduler::from_deltas(0.0, vec![frame_ms; args.frames]);
                run_headless(context, monitor, scheduler, &args, &config)
            }
            None => {
                let scheduler = SystemScheduler::new(config.monitor.target_fps)?;
                run_headless(context, monitor, scheduler, &args, &config)
            }
        };
    }

    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let scheduler = SystemScheduler::new(config.monitor.target_fps)?;
    let mut state = DashboardState::new(config, context);

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut state, monitor, scheduler);
    cleanup_terminal(terminal)?;

    if let Some(path) = &state.last_export {
        println!("Last report: {}", path.display());
    }

    result
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(width) = args.viewport_width {
        config.device.viewport_width = Some(width);
    }
    if let Some(agent) = &args.user_agent {
        config.device.user_agent = Some(agent.clone());
    }
    if args.reduced_motion {
        config.device.prefers_reduced_motion = Some(true);
    }
    if let Some(size) = args.sample_size {
        config.monitor.sample_size = size;
    }
    if let Some(fps) = args.target_fps {
        config.monitor.target_fps = fps;
    }
    if let Some(dir) = &args.export {
        config.overlay.export_dir = Some(dir.clone());
    }
}

/// Log to stderr in headless mode, to a file while the dashboard owns the
/// terminal
fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("motion_governor={},warn", log_level)));

    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .init();
    } else {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    }

    Ok(())
}

/// Sample frames without a UI and print the report
fn run_headless<S, F>(
    mut context: PerformanceContext<S>,
    monitor: FrameMonitor,
    scheduler: F,
    args: &Args,
    config: &Config,
) -> Result<()>
where
    S: CapabilitySource,
    F: FrameScheduler,
{
    let (mut frame_loop, cancel) = FrameLoop::start(monitor, scheduler);
    if args.frames == 0 {
        cancel.cancel();
    }

    let mut frames = 0;
    frame_loop.run(|stats| {
        context.on_frame(stats);
        frames += 1;
        if frames >= args.frames {
            cancel.cancel();
        }
    });
    info!(frames, "headless sampling finished");

    let export = context.export_report();
    println!("{}", export.to_json()?);

    if args.export.is_some() {
        let path = export.write_to_dir(&config.export_dir())?;
        eprintln!("Saved report to {}", path.display());
    }

    Ok(())
}

/// Set up the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main event loop - each pass renders one frame, handles input, and feeds
/// the frame timing back into the governor
fn run_event_loop<S: CapabilitySource>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut DashboardState<S>,
    monitor: FrameMonitor,
    scheduler: SystemScheduler,
) -> Result<()> {
    let (mut frame_loop, cancel) = FrameLoop::start(monitor, scheduler);

    loop {
        terminal.draw(|frame| ui::render(frame, state))?;

        // Drain input without blocking; the scheduler paces the loop
        while event::poll(Duration::ZERO)? {
            handle_event(event::read()?, state)?;
        }

        if state.reset_requested {
            state.reset_requested = false;
            state.context.reset_metrics(frame_loop.monitor_mut());
        }

        if state.should_quit {
            cancel.cancel();
        }

        let ticking = frame_loop.pump(|stats| {
            if let Some(alert) = state.context.on_frame(stats) {
                state.set_status(
                    &format!("Low performance: {:.0} FPS, reducing animations", alert.smoothed_fps),
                    true,
                );
            }
        });

        if !ticking {
            break;
        }
    }

    Ok(())
}
