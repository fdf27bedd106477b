mod store;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use canvas::engine::{Action, EngineCore, RESET_PROMPT, export_file_name};
use canvas::error::CoverError;
use canvas::input::{Button, InputEvent};
use canvas::paint::record;
use canvas::persist;
use canvas::raster::Raster;
use canvas::render::draw;
use canvas::state::{Field, FieldValue};
use canvas::viewport::{DisplayRect, Point};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::store::FileStorage;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue { field: Field, value: String },
    #[error("reset declined")]
    ResetDeclined,
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Cover(#[from] CoverError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "playlist-cover", about = "Design a playlist cover and export it as PNG")]
struct Cli {
    /// Directory holding the saved cover state.
    #[arg(long, env = "COVER_STORE_DIR", default_value = ".cover")]
    store_dir: PathBuf,

    /// Extra directory of font files for rendering.
    #[arg(long, env = "COVER_FONT_DIR")]
    font_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the saved state.
    Show,
    /// Change one field, e.g. `set textContent "Road Trip"`.
    Set { field: String, value: String },
    /// Pick a random background.
    Randomize {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Restore every field to its default.
    Reset {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Drag the text with a pointer, in display coordinates.
    Drag {
        #[arg(long, value_parser = parse_point)]
        from: Point,
        #[arg(long, value_parser = parse_point)]
        to: Point,
        /// Displayed canvas size as `WxH`.
        #[arg(long, value_parser = parse_size, default_value = "512x512")]
        display: (f64, f64),
    },
    /// Render the cover to PNG.
    Render {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the drawing calls as JSON instead of writing pixels.
        #[arg(long, default_value_t = false)]
        display_list: bool,
    },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let storage = FileStorage::new(cli.store_dir);
    debug!(dir = %storage.dir().display(), "using store");

    match cli.command {
        Command::Show => {
            let state = persist::load(&storage);
            print_json(&serde_json::from_str(&persist::encode(&state)?)?)
        }
        Command::Set { field, value } => {
            let field = field.parse::<Field>().map_err(|e| CliError::UnknownField(e.0))?;
            let mut host = Host::open(storage, cli.font_dir, Box::new(io::stdin().lock()), seed_now());
            host.set(field, value)
        }
        Command::Randomize { seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            let mut host = Host::open(storage, cli.font_dir, Box::new(io::stdin().lock()), seed);
            host.dispatch(InputEvent::ButtonPressed(Button::Randomize))
        }
        Command::Reset { yes } => {
            let mut host = Host::open(storage, cli.font_dir, Box::new(io::stdin().lock()), seed_now());
            host.assume_yes = yes;
            host.dispatch(InputEvent::ButtonPressed(Button::Reset))
        }
        Command::Drag { from, to, display } => {
            let mut host = Host::open(storage, cli.font_dir, Box::new(io::stdin().lock()), seed_now());
            host.drag(from, to, DisplayRect::new(0.0, 0.0, display.0, display.1))
        }
        Command::Render { out, display_list: true } => {
            let state = persist::load(&storage);
            let commands = serde_json::to_value(record(&state))?;
            match out {
                Some(path) => fs::write(path, serde_json::to_string_pretty(&commands)?)?,
                None => print_json(&commands)?,
            }
            Ok(())
        }
        Command::Render { out, display_list: false } => {
            let mut host = Host::open(storage, cli.font_dir, Box::new(io::stdin().lock()), seed_now());
            host.out = out;
            host.dispatch(InputEvent::ButtonPressed(Button::Download))
        }
    }
}

/// Runs engine events against the file store and carries out their actions.
struct Host {
    core: EngineCore,
    storage: FileStorage,
    raster: Raster,
    input: Box<dyn BufRead>,
    assume_yes: bool,
    out: Option<PathBuf>,
}

impl Host {
    fn open(storage: FileStorage, font_dir: Option<PathBuf>, input: Box<dyn BufRead>, seed: u64) -> Self {
        let mut raster = Raster::new();
        if let Some(dir) = font_dir {
            raster.load_font_dir(&dir);
        }
        let state = persist::load(&storage);
        Self { core: EngineCore::new(state, seed), storage, raster, input, assume_yes: false, out: None }
    }

    fn set(&mut self, field: Field, value: String) -> Result<(), CliError> {
        let actions = self.handle(InputEvent::FieldChanged { field, value: FieldValue::Text(value.clone()) });
        if actions.is_empty() {
            return Err(CliError::InvalidValue { field, value });
        }
        self.perform_all(actions)?;
        info!(%field, "field updated");
        Ok(())
    }

    fn drag(&mut self, from: Point, to: Point, display: DisplayRect) -> Result<(), CliError> {
        self.core.set_display_rect(display);
        let grabbed = self.handle(InputEvent::PointerDown(from));
        if !self.core.state.is_dragging() {
            info!(x = from.x, y = from.y, "pointer missed the text; nothing moved");
            return Ok(());
        }
        self.perform_all(grabbed)?;
        self.dispatch(InputEvent::PointerMove(to))?;
        self.dispatch(InputEvent::PointerUp)?;
        info!(x = self.core.state.pos_x, y = self.core.state.pos_y, "text moved");
        Ok(())
    }

    fn dispatch(&mut self, event: InputEvent) -> Result<(), CliError> {
        let actions = self.handle(event);
        self.perform_all(actions)
    }

    fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        self.core.handle(event, &mut self.raster)
    }

    fn perform_all(&mut self, actions: Vec<Action>) -> Result<(), CliError> {
        for action in actions {
            self.perform(action)?;
        }
        Ok(())
    }

    fn perform(&mut self, action: Action) -> Result<(), CliError> {
        match action {
            Action::RenderNeeded | Action::SetCursor(_) => {
                debug!(?action, "no display attached");
                Ok(())
            }
            Action::Persist => {
                if let Err(e) = persist::save(&mut self.storage, &self.core.state) {
                    warn!(error = %e, "state not saved");
                }
                Ok(())
            }
            Action::ConfirmReset => {
                if !self.assume_yes && !self.confirm(RESET_PROMPT)? {
                    return Err(CliError::ResetDeclined);
                }
                self.dispatch(InputEvent::ResetConfirmed)?;
                info!("state reset");
                Ok(())
            }
            Action::Export => self.export(),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, CliError> {
        eprint!("{prompt} [y/N] ");
        io::stderr().flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
    }

    fn export(&mut self) -> Result<(), CliError> {
        let Ok(()) = draw(&mut self.raster, &self.core.state);
        let png = self.raster.encode_png()?;
        let path = self.out.clone().unwrap_or_else(|| PathBuf::from(export_file_name(now_millis())));
        fs::write(&path, png)?;
        info!(path = %path.display(), "cover written");
        Ok(())
    }
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected X,Y, got {raw:?}"))?;
    let coord = |s: &str| s.trim().parse::<f64>().map_err(|e| format!("{s:?}: {e}"));
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn parse_size(raw: &str) -> Result<(f64, f64), String> {
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(|| format!("expected WxH, got {raw:?}"))?;
    let side = |s: &str| match s.trim().parse::<f64>() {
        Ok(v) if v > 0.0 => Ok(v),
        Ok(v) => Err(format!("size must be positive, got {v}")),
        Err(e) => Err(format!("{s:?}: {e}")),
    };
    Ok((side(w)?, side(h)?))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn now_millis() -> u64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(duration.as_millis()).unwrap_or(0)
}

fn seed_now() -> u64 {
    now_millis()
}
