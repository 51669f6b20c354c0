mod state;

use chisel_draft::{mutate, Draft};
use clap::Parser;
use state::{starter_board, Board, BoardDraft, Task};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "chisel-demo")]
struct Args {
    #[arg(long, env = "CHISEL_BOARD", default_value = "./board.json")]
    board: PathBuf,

    /// Rename the board.
    #[arg(long, value_name = "NAME")]
    rename: Option<String>,

    /// Append a task with the given title.
    #[arg(long, value_name = "TITLE")]
    add_task: Vec<String>,

    /// Retitle the task at INDEX.
    #[arg(long, value_name = "INDEX:TITLE")]
    retitle: Vec<String>,

    /// Append a note to the task at INDEX.
    #[arg(long, value_name = "INDEX:TEXT")]
    note: Vec<String>,

    /// Mark the task at the given index done.
    #[arg(long, value_name = "INDEX")]
    close: Vec<usize>,

    /// Set a label.
    #[arg(long, value_name = "KEY=VALUE")]
    label: Vec<String>,

    /// Remove a label.
    #[arg(long, value_name = "KEY")]
    unlabel: Vec<String>,

    /// Add a crew member.
    #[arg(long, value_name = "NAME")]
    join: Vec<String>,

    /// Remove a crew member.
    #[arg(long, value_name = "NAME")]
    leave: Vec<String>,
}

fn load_board(path: &Path) -> Board {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no board file yet, starting fresh");
            return starter_board();
        }
        Err(e) => {
            eprintln!("failed to read board {}: {e}", path.display());
            std::process::exit(2);
        }
    };
    match serde_json::from_str(&raw) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("failed to parse board (JSON): {e}");
            std::process::exit(2);
        }
    }
}

fn save_board(path: &Path, board: &Board) {
    let raw = match serde_json::to_string_pretty(board) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("failed to encode board: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = std::fs::write(path, raw) {
        eprintln!("failed to write board {}: {e}", path.display());
        std::process::exit(2);
    }
}

fn split_indexed(flag: &str, raw: &str) -> (usize, String) {
    let parsed = raw
        .split_once(':')
        .and_then(|(index, text)| Some((index.parse::<usize>().ok()?, text.to_string())));
    match parsed {
        Some(pair) => pair,
        None => {
            eprintln!("bad {flag} {raw:?}, expected INDEX:TEXT");
            std::process::exit(2);
        }
    }
}

fn split_label(raw: &str) -> (String, String) {
    match raw.split_once('=') {
        Some((key, value)) => (key.to_string(), value.to_string()),
        None => {
            eprintln!("bad label {raw:?}, expected KEY=VALUE");
            std::process::exit(2);
        }
    }
}

fn apply_edits(draft: &mut BoardDraft, args: &Args) {
    if let Some(name) = &args.rename {
        info!(from = draft.name(), to = %name, "renaming board");
        draft.set_name(name.clone());
    }

    for title in &args.add_task {
        info!(%title, "adding task");
        draft.tasks().push_value(Task::new(title));
    }

    for raw in &args.retitle {
        let (index, title) = split_indexed("retitle", raw);
        match draft.tasks().get_at(index) {
            Ok(task) => {
                info!(index, from = task.title(), to = %title, "retitling task");
                task.set_title(title);
            }
            Err(e) => warn!(%e, "skipping retitle"),
        }
    }

    for raw in &args.note {
        let (index, text) = split_indexed("note", raw);
        match draft.tasks().get_at(index) {
            Ok(task) => {
                info!(index, title = task.title(), %text, "appending note");
                task.notes().push_value(text);
            }
            Err(e) => warn!(%e, "skipping note"),
        }
    }

    for &index in &args.close {
        match draft.tasks().get_at(index) {
            // Closing a task that is already done would still mark the
            // draft dirty and rewrite the file, so skip it up front.
            Ok(task) if task.done() => warn!(index, title = task.title(), "task already done"),
            Ok(task) => {
                info!(index, title = task.title(), "closing task");
                task.set_done(true);
            }
            Err(e) => warn!(%e, "skipping close"),
        }
    }

    for raw in &args.label {
        let (key, value) = split_label(raw);
        info!(%key, %value, "setting label");
        draft.labels().insert_value(key, value);
    }

    for key in &args.unlabel {
        // Removing through the key view only marks the draft on a hit,
        // so a miss here never forces a rewrite.
        if draft.labels().keys().remove(key) {
            info!(%key, "removing label");
        } else {
            warn!(%key, "label not present");
        }
    }

    // Set inserts and removals mark the draft hit or miss, so a no-op
    // join or leave would force a rewrite. Gate on membership instead.
    let mut members = draft.base().crew.clone();

    for name in &args.join {
        if members.insert(name.clone()) {
            info!(%name, "crew member joined");
            draft.crew().insert_value(name.clone());
        } else {
            warn!(%name, "already on the crew");
        }
    }

    for name in &args.leave {
        if members.remove(name) {
            info!(%name, "crew member left");
            draft.crew().remove_value(name);
        } else {
            warn!(%name, "not on the crew");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let board = load_board(&args.board);

    let draft = mutate(board, |draft| apply_edits(draft, &args));
    if !draft.is_dirty() {
        info!("nothing changed, board left as-is");
        return;
    }

    let board = draft.freeze();
    save_board(&args.board, &board);
    info!(
        path = %args.board.display(),
        tasks = board.tasks.len(),
        open = board.tasks.iter().filter(|task| !task.done).count(),
        "board saved"
    );
}
