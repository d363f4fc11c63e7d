//! Entry point for the qh-preview binary.
//!
//! Runs the quickhelp pipeline for a single documentation file and prints
//! the popup the editor would show.

mod args;
mod preview;
mod tracing_setup;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use helix_quickhelp::{
    CompletionEvent, PopupState, QuickhelpCommand, QuickhelpConfig, QuickhelpController,
    SessionContext, TokioIdleTimer,
};
use ropey::Rope;

use crate::preview::{FileEngine, TextSurface};

/// How long to wait for the popup before giving up.
const SHOW_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    let config = QuickhelpConfig::load_default().unwrap_or_else(|err| {
        eprintln!("Warning: failed to load quickhelp.toml: {err}");
        eprintln!("Using default configuration");
        QuickhelpConfig::default()
    });

    tracing_setup::init(&config.logging);

    let args = args::parse_args()?;
    log::info!("Previewing {}", args.doc_file.display());

    let mut popup = config.popup;
    if let Some(max_lines) = args.max_lines {
        popup.max_lines = Some(max_lines);
    }
    if args.markdown {
        popup.render_markdown = true;
    }

    let file = File::open(&args.doc_file)
        .with_context(|| format!("cannot open {}", args.doc_file.display()))?;
    let text = Rope::from_reader(BufReader::new(file))?;
    let label = args
        .doc_file
        .file_name()
        .map_or_else(|| "docs".to_string(), |name| name.to_string_lossy().into_owned());

    // The idle timer spawns its tasks on this runtime
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let (command_tx, command_rx) = mpsc::channel::<QuickhelpCommand>();
    let mut timer = TokioIdleTimer::new(command_tx.clone());
    let mut engine = FileEngine::new(label, text);
    let mut surface = TextSurface::new(args.row, args.height);
    let mut controller = QuickhelpController::new(popup);

    let _ = command_tx.send(CompletionEvent::ManualTrigger.into());
    loop {
        let command = command_rx
            .recv_timeout(SHOW_TIMEOUT)
            .context("timed out waiting for the quickhelp timer")?;
        let mut cx = SessionContext::new(&mut engine, &mut surface, &mut timer);
        controller.process(command, &mut cx);
        if controller.state() != PopupState::TimerArmed {
            break;
        }
    }

    let Some(rendered) = surface.render() else {
        bail!("no documentation to show for {}", args.doc_file.display());
    };
    write!(io::stdout().lock(), "{rendered}")?;

    let mut cx = SessionContext::new(&mut engine, &mut surface, &mut timer);
    controller.handle_event(CompletionEvent::MenuHidden, &mut cx);
    Ok(())
}
