//! WidgetInc helper command-line tool.
//!
//! Locates the WidgetInc window, reports its playable area, tracks the cursor
//! in grid coordinates for authoring frame definitions, and checks the frame
//! database.

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

use widgetinc_helper::automation::StopFlag;
use widgetinc_helper::config::{self, HelperConfig};
use widgetinc_helper::frames::{FrameDatabase, resolve_frame};
use widgetinc_helper::geometry::{self, ClientRect, PlayableArea};
use widgetinc_helper::window;
use widgetinc_helper::{GameWindow, WindowError, log, paths};

const USAGE: &str = "\
Usage: widgetinc-helper <command>

Commands:
  locate              Find the game window and print its playable area
  track [samples]     Log the grid cell under the cursor until interrupted
  frames [path]       Load and validate the frame database
  resolve <frame-id>  Print screen coordinates for a frame's points";

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    // Ensure output directories exist
    paths::ensure_directories()?;

    config::init_config();
    let config = config::get_config();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("locate") => locate(config),
        Some("track") => {
            let samples = args
                .get(1)
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("samples must be a positive number")?;
            track(config, samples)
        }
        Some("frames") => list_frames(config, args.get(1).map(PathBuf::from)),
        Some("resolve") => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow!("resolve needs a frame id\n\n{}", USAGE))?;
            resolve(config, id)
        }
        Some("help") | Some("--help") | Some("-h") | None => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => Err(anyhow!("Unknown command \"{}\"\n\n{}", other, USAGE)),
    }
}

fn game_window(config: &HelperConfig) -> GameWindow {
    GameWindow::from_config(window::native_desktop(), config)
}

fn describe_area(client: &ClientRect, area: &PlayableArea) {
    log(&format!(
        "Client area: ({}, {}) {}x{}",
        client.x, client.y, client.width, client.height
    ));
    log(&format!(
        "Playable area: ({}, {}) {}x{}, pixel size {:.4}",
        area.x,
        area.y,
        area.width,
        area.height,
        geometry::pixel_size(area)
    ));
}

fn locate(config: &HelperConfig) -> Result<()> {
    let game = game_window(config);
    let handle = game.resolve_window()?;
    log(&format!("Found window {} for \"{}\"", handle, game.title()));

    let client = game.client_rect()?;
    let area = PlayableArea::compute(&client);
    describe_area(&client, &area);
    if area.is_degenerate() {
        log("Playable area is empty. Is the window minimized?");
    }
    Ok(())
}

/// Polls the cursor and logs its grid cell whenever it changes.
fn track(config: &HelperConfig, samples: Option<u64>) -> Result<()> {
    let game = game_window(config);
    let stop = StopFlag::new();
    let mut last = None;
    let mut taken = 0u64;

    log("Tracking cursor. Press Ctrl+C to stop.");
    while stop.should_continue() {
        match game.cursor_position() {
            Ok(Some(position)) => {
                if last != Some(position.grid) {
                    log(&format!(
                        "Grid ({}, {})  {:.1}% x {:.1}%",
                        position.grid.grid_x,
                        position.grid.grid_y,
                        position.x_percent,
                        position.y_percent
                    ));
                    last = Some(position.grid);
                }
            }
            Ok(None) => last = None,
            Err(e) => match e.downcast_ref::<WindowError>() {
                // Game not running yet; keep polling
                Some(WindowError::NotFound { .. }) | Some(WindowError::Invalid { .. }) => {
                    last = None
                }
                None => return Err(e),
            },
        }

        taken += 1;
        if samples.is_some_and(|limit| taken >= limit) {
            stop.request_stop();
        }
        stop.sleep(config.track_interval());
    }
    Ok(())
}

fn load_database(config: &HelperConfig, path: Option<PathBuf>) -> Result<FrameDatabase> {
    let path = path.unwrap_or_else(|| config.frames_database_path());
    FrameDatabase::load(&path)
        .with_context(|| format!("Failed to load frame database {}", path.display()))
}

fn list_frames(config: &HelperConfig, path: Option<PathBuf>) -> Result<()> {
    let db = load_database(config, path)?;
    for frame in db.frames() {
        log(&format!(
            "{:>6}  {:<30} {} interactions, {} buttons, {} colors, {} boxes",
            frame.id,
            frame.name,
            frame.interactions.len(),
            frame.buttons.len(),
            frame.colors.len(),
            frame.bbox.len()
        ));
    }
    log(&format!("{} frames OK", db.len()));
    Ok(())
}

fn resolve(config: &HelperConfig, id: &str) -> Result<()> {
    let db = load_database(config, None)?;
    let frame = db
        .frame(id)
        .ok_or_else(|| anyhow!("Frame \"{}\" is not in the database", id))?;

    let game = game_window(config);
    let client = game.client_rect()?;
    let area = PlayableArea::compute(&client);
    describe_area(&client, &area);

    let resolved = resolve_frame(frame, &area);
    log(&format!("Frame {} \"{}\"", resolved.id, resolved.name));
    for (name, points) in &resolved.interactions {
        let points: Vec<String> = points
            .iter()
            .map(|p| format!("({}, {})", p.x, p.y))
            .collect();
        log(&format!("  interaction {}: {}", name, points.join(" ")));
    }
    for (name, button) in &resolved.buttons {
        log(&format!(
            "  button {}: ({}, {}) {}",
            name, button.screen.x, button.screen.y, button.color
        ));
    }
    for (name, screen_box) in &resolved.bbox {
        log(&format!(
            "  bbox {}: ({}, {}) - ({}, {})",
            name,
            screen_box.top_left.x,
            screen_box.top_left.y,
            screen_box.bottom_right.x,
            screen_box.bottom_right.y
        ));
    }
    Ok(())
}
