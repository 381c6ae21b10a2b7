use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pte::logging::{self, LogConfig};
use pte::{load_config, Editor, ModeMachine, Terminal};

/// A small modal text editor
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// File to open
    file: Option<PathBuf>,

    /// Write logs to this file instead of the default location
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let settings = load_config();

    let log_guard = logging::init(LogConfig {
        log_file_path: args.log_file,
        default_level: settings.log.level.clone(),
    })?;
    tracing::info!(
        "Starting pte {}, logging to '{}'",
        env!("CARGO_PKG_VERSION"),
        log_guard.log_file.display()
    );

    let poll_timeout = Duration::from_millis(settings.editor.poll_timeout_ms);
    let mut editor = Editor::new(settings);

    // Open file from command line argument if provided
    match args.file {
        Some(path) => {
            if !editor.load_file(&path) {
                // Start editing the new file; the first save creates it
                editor.buffers.load_empty_buffer();
                if let Some(buffer) = editor.buffers.active_buffer_mut() {
                    buffer.document.path = Some(path);
                }
            }
        }
        None => editor.buffers.load_empty_buffer(),
    }

    // Initialize terminal
    let mut terminal = Terminal::new()?;
    let mut keys = terminal.keys(poll_timeout);

    let mut machine = ModeMachine::new(editor);
    let result = machine.run(&mut keys, &mut terminal);

    // Restore the terminal before anything else is reported
    drop(terminal);
    if let Err(e) = &result {
        tracing::error!("Editor stopped: {:#}", e);
    }
    tracing::info!("Exiting");
    result
}
