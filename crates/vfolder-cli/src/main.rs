//! vfolder — prints or edits the virtual folder tree.
//!
//! This binary loads the configuration, initialises logging, opens the
//! store and either prints the tree or applies a single add/remove before
//! printing it.

mod render;

use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;
use vfolder_core::config::settings::LogConfig;
use vfolder_core::{Command, Config, Event, GlyphResolver, Store};

const USAGE: &str = "usage: vfolder [add <dir-key> <file-path> | remove <file-key>]";

/// What the process was asked to do.
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Show,
    Add { dir_key: String, path: String },
    Remove { file_key: String },
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    match args {
        [] => Ok(Invocation::Show),
        [cmd, dir_key, path] if cmd == "add" => Ok(Invocation::Add {
            dir_key: dir_key.clone(),
            path: path.clone(),
        }),
        [cmd, file_key] if cmd == "remove" => Ok(Invocation::Remove {
            file_key: file_key.clone(),
        }),
        _ => bail!(USAGE),
    }
}

/// Logs go to a file so they never mix with the printed tree.
fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let path = log
        .file
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("vfolder.log"));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.level))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}

/// Resolves `path` against `cwd` to the absolute path of an existing file.
fn absolute_file(cwd: &Path, path: &str) -> anyhow::Result<String> {
    let resolved = fs::canonicalize(cwd.join(path))
        .with_context(|| format!("cannot add {path}: no such file"))?;
    if !resolved.is_file() {
        bail!("cannot add {path}: not a file");
    }
    resolved
        .into_os_string()
        .into_string()
        .map_err(|_| anyhow::anyhow!("cannot add {path}: path is not valid UTF-8"))
}

fn apply(store: &mut Store, invocation: Invocation, cwd: &Path) -> anyhow::Result<()> {
    let command = match invocation {
        Invocation::Show => return Ok(()),
        Invocation::Add { dir_key, path } => {
            let parent = store
                .tree()
                .find_by_key(&dir_key)
                .with_context(|| format!("no entity with key {dir_key}"))?;
            let path = absolute_file(cwd, &path)?;
            Command::AddFile { parent, path }
        }
        Invocation::Remove { file_key } => {
            let id = store
                .tree()
                .find_by_key(&file_key)
                .with_context(|| format!("no entity with key {file_key}"))?;
            Command::RemoveFile(id)
        }
    };

    match store.dispatch(command) {
        Event::OperationFailed { operation, error } => bail!("{operation} failed: {error}"),
        Event::FileRemoved {
            removed_from_document: false,
            ..
        } => {
            eprintln!("warning: entry was not present in the document");
            Ok(())
        }
        _ => Ok(()),
    }
}

fn main() -> anyhow::Result<()> {
    let config_path = env::var_os("VFOLDER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("vfolder.toml"));
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    init_tracing(&config.log)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = parse_args(&args)?;
    tracing::debug!(?invocation, "starting");

    let mut store = Store::new(&config, GlyphResolver)
        .load()
        .with_context(|| format!("failed to open {}", config.store.document_path.display()))?;
    let cwd = env::current_dir().context("cannot read the working directory")?;
    apply(&mut store, invocation, &cwd)?;

    print!("{}", render::render_tree(&store));
    Ok(())
}
