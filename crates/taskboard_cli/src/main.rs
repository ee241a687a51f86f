//! Line-driven task board.
//!
//! # Responsibility
//! - Mount the board on an in-memory document and drive it from stdin.
//! - Route every change through the same submit/drag events a UI would send.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use taskboard_core::{
    core_version, default_log_level, init_logging, Board, BoardConfig, Component, DataTransfer,
    EntityId, EntityStatus, EventKind, HostEvent, MemoryDocument, ObservableStore, RawSubmission,
    RenderHost,
};

const HELP: &str = "\
commands:
  add <title> | <description> | <people>   submit the form
  drag <id> <active|finished>              drag an item onto a list
  show                                     print the document
  list                                     print the store as JSON
  help                                     print this help
  quit                                     exit";

#[derive(Parser)]
#[command(name = "taskboard", about = "Drag work items between active and finished lists", version)]
struct Cli {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for log files (overrides the config file; default stderr)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

struct Session {
    document: MemoryDocument,
    store: Rc<ObservableStore>,
    board: Board,
}

impl Session {
    fn start(config: &BoardConfig) -> Result<Self, String> {
        let document = MemoryDocument::with_board_templates();
        let host: Rc<dyn RenderHost> = Rc::new(document.clone());
        let store = Rc::new(ObservableStore::new());
        let board = Board::mount(host, Rc::clone(&store), config.rules.clone())
            .map_err(|err| format!("failed to mount board: {err}"))?;
        Ok(Self {
            document,
            store,
            board,
        })
    }

    fn add(&self, args: &str) -> Result<(), String> {
        let mut parts = args.splitn(3, '|').map(str::trim);
        let raw = RawSubmission {
            title: parts.next().unwrap_or_default().to_string(),
            description: parts.next().unwrap_or_default().to_string(),
            assignee_count: parts.next().unwrap_or_default().to_string(),
        };
        self.board.form.fill(&raw).map_err(|err| err.to_string())?;
        let mut event = HostEvent::new(EventKind::Submit);
        self.document
            .dispatch(self.board.form.mount().element(), &mut event)
            .map_err(|err| err.to_string())
    }

    fn drag(&self, args: &str) -> Result<(), String> {
        let mut parts = args.split_whitespace();
        let (Some(id), Some(status)) = (parts.next(), parts.next()) else {
            return Err("usage: drag <id> <active|finished>".to_string());
        };
        let id: EntityId = id.parse().map_err(|err| format!("invalid id `{id}`: {err}"))?;
        let target = EntityStatus::parse(status).map_err(|err| err.to_string())?;
        let item = self
            .document
            .element_by_id(&id.to_string())
            .map_err(|err| err.to_string())?;
        let list = self
            .board
            .list(target)
            .list_element()
            .map_err(|err| err.to_string())?;

        let mut start = HostEvent::with_transfer(EventKind::DragStart, DataTransfer::new());
        self.document
            .dispatch(item, &mut start)
            .map_err(|err| err.to_string())?;
        let transfer = start.transfer.unwrap_or_default();

        let mut over = HostEvent::with_transfer(EventKind::DragOver, transfer.clone());
        self.document
            .dispatch(list, &mut over)
            .map_err(|err| err.to_string())?;
        if !over.default_prevented() {
            return Err("target list refused the drag".to_string());
        }

        let mut dropped = HostEvent::with_transfer(EventKind::Drop, transfer);
        self.document
            .dispatch(list, &mut dropped)
            .map_err(|err| err.to_string())?;
        // An accepted drop re-renders both lists and frees the source item.
        if !self.document.is_attached(item) {
            return Ok(());
        }
        let mut end = HostEvent::new(EventKind::DragEnd);
        self.document
            .dispatch(item, &mut end)
            .map_err(|err| err.to_string())
    }

    fn handle(&self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));
        let result = match command {
            "" => Ok(()),
            "add" => self.add(args),
            "drag" => self.drag(args),
            "show" => write!(out, "{}", self.document.outline()).map_err(|err| err.to_string()),
            "list" => serde_json::to_string_pretty(&self.store.snapshot())
                .map_err(|err| err.to_string())
                .and_then(|json| writeln!(out, "{json}").map_err(|err| err.to_string())),
            "help" => writeln!(out, "{HELP}").map_err(|err| err.to_string()),
            "quit" | "exit" => return Ok(false),
            other => Err(format!("unknown command `{other}`; try `help`")),
        };

        if let Err(message) = result {
            writeln!(out, "error: {message}")?;
        }
        for notice in self.document.take_notices() {
            writeln!(out, "notice: {notice}")?;
        }
        Ok(true)
    }
}

fn banner() -> String {
    format!("taskboard {} (type `help`)", core_version())
}

fn load_config(cli: &Cli) -> Result<BoardConfig, String> {
    let mut config = match &cli.config {
        Some(path) => BoardConfig::load(path).map_err(|err| err.to_string())?,
        None => BoardConfig::default(),
    };
    if cli.log_level.is_some() {
        config.log_level = cli.log_level.clone();
    }
    if cli.log_dir.is_some() {
        config.log_dir = cli.log_dir.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;
    let level = config
        .log_level
        .as_deref()
        .unwrap_or_else(|| default_log_level());
    init_logging(level, config.log_dir.as_deref())?;

    let session = Session::start(&config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", banner())
        .map_err(|err| err.to_string())?;

    for line in stdin.lock().lines() {
        let line = line.map_err(|err| format!("failed to read stdin: {err}"))?;
        let keep_going = session
            .handle(line.trim(), &mut stdout)
            .map_err(|err| format!("failed to write output: {err}"))?;
        if !keep_going {
            break;
        }
    }
    log::info!(
        "event=session_end module=cli status=ok entities={}",
        session.store.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("taskboard: {message}");
            ExitCode::FAILURE
        }
    }
}
