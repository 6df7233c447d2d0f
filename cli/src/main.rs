mod gateway;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use canvas::{
    CanvasItem, GenerationGateway, PersistenceEvent, PersistenceGateway, Position, Workspace, WorkspaceError,
};

use crate::gateway::HttpGateway;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("no image on the canvas with url {0}")]
    UnknownImage(String),
    #[error("{failed} of {total} storage requests failed")]
    Persistence { failed: usize, total: usize },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "canvas-cli", about = "Drive a prompt canvas from the terminal")]
struct Cli {
    #[arg(long, env = "CANVAS_BASE_URL", default_value = "http://127.0.0.1:3002")]
    base_url: String,

    /// Canvas width used for grid layout and drag bounds.
    #[arg(long, env = "CANVAS_VIEWPORT_WIDTH", default_value_t = 1280.0)]
    viewport_width: f64,

    #[arg(long, env = "CANVAS_VIEWPORT_HEIGHT", default_value_t = 800.0)]
    viewport_height: f64,

    /// Log at debug level on stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the server is up.
    Ping,
    /// Print every saved item.
    List,
    /// Generate an image for a prompt and place it at the spawn point.
    Generate {
        prompt: String,
        /// Leave the new item unsaved.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Generate four variations around an existing image.
    Vary {
        image_url: String,
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Preview a duplicate of an image: prints the copy and its offset
    /// position without saving it. A saved duplicate would share the
    /// original's image url and so overwrite the original's row.
    #[command(name = "duplicate", visible_alias = "preview-duplicate")]
    Duplicate { image_url: String },
    /// Drag an image to a new top-left position and save it.
    Move { image_url: String, x: f64, y: f64 },
    /// Remove an image from the canvas and from storage.
    Delete { image_url: String },
    /// Pack every image into a grid sized to the viewport and save the result.
    Arrange,
    /// Delete every stored image.
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    validate_base_url(&cli.base_url)?;

    let http = HttpGateway::new(&cli.base_url)?;
    match cli.command {
        Command::Ping => run_ping(&http).await,
        Command::Clear => run_clear(&http).await,
        command => {
            let mut ws = open_workspace(&http, cli.viewport_width, cli.viewport_height).await;
            run_workspace(&mut ws, command).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn validate_base_url(base_url: &str) -> Result<(), CliError> {
    let rest = base_url
        .strip_prefix("http://")
        .or_else(|| base_url.strip_prefix("https://"))
        .ok_or_else(|| CliError::InvalidBaseUrl(base_url.to_owned()))?;
    if rest.trim_matches('/').is_empty() {
        return Err(CliError::InvalidBaseUrl(base_url.to_owned()));
    }
    Ok(())
}

async fn open_workspace(http: &HttpGateway, width: f64, height: f64) -> Workspace {
    let persistence: Arc<dyn PersistenceGateway> = Arc::new(http.clone());
    let generation: Arc<dyn GenerationGateway> = Arc::new(http.clone());
    let mut ws = Workspace::new(persistence, generation);
    ws.set_viewport(width, height);
    ws.load().await;
    ws
}

async fn run_ping(http: &HttpGateway) -> Result<(), CliError> {
    let response = reqwest::get(http.url("/healthz")).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_clear(http: &HttpGateway) -> Result<(), CliError> {
    let response = reqwest::Client::new()
        .delete(http.url("/api/images"))
        .send()
        .await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);
    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), message: value.to_string() });
    }
    print_json(&value)
}

async fn run_workspace(ws: &mut Workspace, command: Command) -> Result<(), CliError> {
    match command {
        Command::List => print_json(&serde_json::to_value(&*ws.snapshot())?),
        Command::Generate { prompt, no_save } => {
            let item = ws.generate(&prompt).await?;
            if !no_save {
                ws.save(&item.image_url);
                settle(ws).await?;
            }
            print_items(ws, std::slice::from_ref(&item))
        }
        Command::Vary { image_url, no_save } => {
            let added = ws.generate_variations(&image_url).await?;
            if !no_save {
                for item in &added {
                    ws.save(&item.image_url);
                }
                settle(ws).await?;
            }
            print_items(ws, &added)
        }
        Command::Duplicate { image_url } => {
            let copy = ws
                .duplicate(&image_url)
                .ok_or_else(|| CliError::UnknownImage(image_url.clone()))?;
            print_json(&json!({ "preview": true, "saved": false, "item": copy }))
        }
        Command::Move { image_url, x, y } => {
            let landed = drag_to(ws, &image_url, Position::new(x, y))?;
            ws.save(&image_url);
            settle(ws).await?;
            print_json(&json!({ "imageUrl": image_url, "position": landed }))
        }
        Command::Delete { image_url } => {
            let removed = ws.delete(&image_url);
            if removed.is_empty() {
                return Err(CliError::UnknownImage(image_url));
            }
            settle(ws).await?;
            print_json(&json!({ "deleted": removed.len() }))
        }
        Command::Arrange => {
            let arrangement = ws.arrange_grid();
            // No transition to wait for in a terminal.
            ws.layout_settled();
            settle(ws).await?;
            print_json(&json!({
                "columns": arrangement.columns,
                "rows": arrangement.rows,
                "containerHeight": arrangement.container_height,
                "items": &*ws.snapshot(),
            }))
        }
        Command::Ping | Command::Clear => Ok(()),
    }
}

/// Move an item the way a pointer would: grab it just inside its corner and
/// drag by the offset to `target`. Returns where it landed after clamping.
fn drag_to(ws: &mut Workspace, image_url: &str, target: Position) -> Result<Position, CliError> {
    let start = ws
        .store()
        .get(image_url)
        .map(|item| item.position)
        .ok_or_else(|| CliError::UnknownImage(image_url.to_owned()))?;
    let grab = start.offset(1.0, 1.0);
    if !ws.pointer_down(image_url, grab) {
        return Err(CliError::UnknownImage(image_url.to_owned()));
    }
    let (dx, dy) = target.delta_from(start);
    let landed = ws.pointer_move(image_url, grab.offset(dx, dy)).unwrap_or(start);
    ws.pointer_up(image_url);
    Ok(landed)
}

/// Wait for outstanding storage calls; fail if any of them did.
async fn settle(ws: &mut Workspace) -> Result<(), CliError> {
    let events = ws.flush_persistence().await;
    let failed = events
        .iter()
        .filter(|event| match event {
            PersistenceEvent::Saved { result, .. } => result.is_err(),
            PersistenceEvent::Deleted { result, .. } => result.is_err(),
        })
        .count();
    if failed > 0 {
        return Err(CliError::Persistence { failed, total: events.len() });
    }
    Ok(())
}

/// Print items as they now stand in the store (with any ids saves assigned).
fn print_items(ws: &Workspace, items: &[CanvasItem]) -> Result<(), CliError> {
    let current: Vec<&CanvasItem> = items
        .iter()
        .filter_map(|item| ws.store().get(&item.image_url))
        .collect();
    print_json(&serde_json::to_value(current)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
