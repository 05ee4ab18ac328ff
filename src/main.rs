//! Viewtree CLI - render Git sidebar views from a repository snapshot
//!
//! Usage: viewtree [--fixture FILE] [--state FILE] <COMMAND>
//!
//! Commands:
//!   show     Render a view as indented text
//!   find     Reveal a commit in the commits view
//!   history  Show the history of a file or line range
//!   compare  Compare two refs in the search-and-compare view
//!   search   Search commit messages
//!   pins     List pinned results
//!   unpin    Remove a pin
//!   watch    Re-render a view whenever the snapshot changes

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use viewtree::application::events::{ChangeHub, Debouncer};
use viewtree::config::ViewsConfig;
use viewtree::domain::entities::{NamedRef, SearchPattern};
use viewtree::domain::ports::{RepositoryService, RevealOptions, StateStore};
use viewtree::domain::value_objects::{
    CancellationToken, ChangeEvent, EditorSubject, LineRange, RepositoryChange,
    RepositoryChangeEvent, ViewKind,
};
use viewtree::infrastructure::{FixtureRepositoryService, JsonStateStore, RecordingHost};
use viewtree::ui::{render_view, RenderOptions};
use viewtree::{ViewServices, ViewTree};

/// Viewtree - lazy, paged Git tree views
#[derive(Parser, Debug)]
#[command(name = "viewtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository snapshot (JSON)
    #[arg(long, default_value = "viewtree.json")]
    fixture: PathBuf,

    /// Workspace state file holding pins
    #[arg(long, default_value = ".viewtree/state.json")]
    state: PathBuf,

    /// Use ASCII glyphs instead of Unicode
    #[arg(long)]
    ascii: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a view as indented text
    Show {
        /// commits, branches, remotes, stashes or search-and-compare
        view: String,

        /// Levels of rows to render
        #[arg(short, long, default_value_t = 3)]
        depth: usize,
    },

    /// Reveal a commit in the commits view, loading pages as needed
    Find {
        sha: String,

        /// Repository path (defaults to the first repository)
        #[arg(long)]
        repo: Option<String>,
    },

    /// Show the history of a file, or of a line range with --line
    History {
        path: String,

        #[arg(long)]
        repo: Option<String>,

        /// Line range, e.g. 10-20
        #[arg(long)]
        line: Option<String>,

        /// Revision to show the history from
        #[arg(long)]
        sha: Option<String>,

        #[arg(short, long, default_value_t = 2)]
        depth: usize,
    },

    /// Compare two refs (commits in REF1 that are not in REF2)
    Compare {
        repo: String,
        ref1: String,
        ref2: String,

        /// Pin the result
        #[arg(long)]
        pin: bool,
    },

    /// Search commit messages
    Search {
        repo: String,
        pattern: String,

        /// Every term must match
        #[arg(long)]
        match_all: bool,

        #[arg(long)]
        match_case: bool,

        #[arg(long)]
        pin: bool,
    },

    /// List pinned results
    Pins,

    /// Remove a pin by id
    Unpin { id: String },

    /// Re-render a view whenever the snapshot file changes
    Watch {
        #[arg(default_value = "commits")]
        view: String,

        #[arg(short, long, default_value_t = 3)]
        depth: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let project_root = std::env::current_dir().ok();
    let config = ViewsConfig::load_or_default(project_root.as_deref());
    let git = Rc::new(
        FixtureRepositoryService::from_path(&cli.fixture)
            .with_context(|| format!("failed to load {}", cli.fixture.display()))?,
    );
    let render = |depth: usize| RenderOptions {
        depth,
        unicode: !cli.ascii,
    };

    match cli.command {
        Commands::Show { ref view, depth } => {
            let kind = parse_view(view)?;
            let (tree, _) = open_view(kind, &config, &git, Some(&cli.state))?;
            print!("{}", render_view(&tree, &render(depth))?);
        }
        Commands::Find { ref sha, ref repo } => {
            cmd_find(&config, &git, sha, repo.as_deref(), render(3))?;
        }
        Commands::History {
            ref path,
            ref repo,
            ref line,
            ref sha,
            depth,
        } => {
            let repo = resolve_repo(git.as_ref(), repo.as_deref())?;
            let mut subject = EditorSubject::file(repo, path.as_str());
            let kind = match line {
                Some(line) => {
                    let range = LineRange::parse(line)
                        .with_context(|| format!("invalid line range '{line}'"))?;
                    subject = subject.with_selection(range);
                    ViewKind::LineHistory
                }
                None => ViewKind::FileHistory,
            };
            if let Some(sha) = sha {
                subject = subject.at_revision(sha.as_str());
            }
            let (tree, _) = open_view(kind, &config, &git, None)?;
            tree.track(Some(subject))?;
            print!("{}", render_view(&tree, &render(depth))?);
        }
        Commands::Compare {
            ref repo,
            ref ref1,
            ref ref2,
            pin,
        } => {
            let (tree, _) = open_view(ViewKind::SearchAndCompare, &config, &git, Some(&cli.state))?;
            let node = tree.compare(repo, NamedRef::new(ref1.as_str()), NamedRef::new(ref2.as_str()))?;
            if pin {
                tree.pin(&node)?;
            }
            print!("{}", render_view(&tree, &render(2))?);
        }
        Commands::Search {
            ref repo,
            ref pattern,
            match_all,
            match_case,
            pin,
        } => {
            let (tree, _) = open_view(ViewKind::SearchAndCompare, &config, &git, Some(&cli.state))?;
            let mut search = SearchPattern::new(pattern.as_str());
            search.match_all = match_all;
            search.match_case = match_case;
            let node = tree.search(repo, search, None)?;
            if pin {
                tree.pin(&node)?;
            }
            print!("{}", render_view(&tree, &render(2))?);
        }
        Commands::Pins => {
            let (tree, _) = open_view(ViewKind::SearchAndCompare, &config, &git, Some(&cli.state))?;
            let pinned = tree.pinned()?;
            if pinned.is_empty() {
                println!("No pinned results.");
            }
            for (id, item) in pinned {
                println!("{id}  {}  {}", item.repo_path(), describe_pin(&item));
            }
        }
        Commands::Unpin { ref id } => {
            let (tree, _) = open_view(ViewKind::SearchAndCompare, &config, &git, Some(&cli.state))?;
            if !tree.unpin_by_id(id)? {
                bail!("no pin with id {id}");
            }
            println!("Unpinned {id}");
        }
        Commands::Watch { ref view, depth } => {
            let kind = parse_view(view)?;
            cmd_watch(kind, &config, &git, &cli.state, &cli.fixture, render(depth))?;
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_view(view: &str) -> Result<ViewKind> {
    ViewKind::parse(view).with_context(|| format!("unknown view '{view}'"))
}

fn open_view(
    kind: ViewKind,
    config: &ViewsConfig,
    git: &Rc<FixtureRepositoryService>,
    state: Option<&Path>,
) -> Result<(ViewTree, Rc<RecordingHost>)> {
    let host = Rc::new(RecordingHost::new());
    let state: Option<Rc<dyn StateStore>> = match state {
        Some(path) => Some(Rc::new(
            JsonStateStore::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => None,
    };
    let services = ViewServices {
        git: git.clone(),
        host: host.clone(),
        hub: ChangeHub::new(),
        state,
    };
    Ok((ViewTree::new(kind, config.clone(), services), host))
}

fn resolve_repo(git: &dyn RepositoryService, repo: Option<&str>) -> Result<String> {
    if let Some(repo) = repo {
        return Ok(repo.to_string());
    }
    let repositories = git.repositories()?;
    match repositories.into_iter().next() {
        Some(first) => Ok(first.path),
        None => bail!("the snapshot contains no repositories"),
    }
}

fn describe_pin(item: &viewtree::domain::entities::PinnedItem) -> String {
    use viewtree::domain::entities::PinnedItem;
    match item {
        PinnedItem::Comparison { ref1, ref2, .. } => {
            format!("compare {} with {}", ref1.display(), ref2.display())
        }
        PinnedItem::Search { labels, .. } => format!("search {}", labels.query_label),
    }
}

fn cmd_find(
    config: &ViewsConfig,
    git: &Rc<FixtureRepositoryService>,
    sha: &str,
    repo: Option<&str>,
    options: RenderOptions,
) -> Result<()> {
    let repo = resolve_repo(git.as_ref(), repo)?;
    let (tree, host) = open_view(ViewKind::Commits, config, git, None)?;

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install Ctrl+C handler")?;

    match tree.reveal_commit(&repo, sha, RevealOptions::selected(), Some(&token))? {
        Some(node) => {
            println!("Found {}", node.id());
            for id in host.revealed_ids() {
                debug!(id, "revealed");
            }
            print!("{}", render_view(&tree, &options)?);
        }
        None if token.is_cancelled() => println!("Search cancelled."),
        None => println!("Commit {sha} was not found on the current branch of {repo}."),
    }
    Ok(())
}

fn cmd_watch(
    kind: ViewKind,
    config: &ViewsConfig,
    git: &Rc<FixtureRepositoryService>,
    state: &Path,
    fixture: &Path,
    options: RenderOptions,
) -> Result<()> {
    let (tree, host) = open_view(kind, config, git, Some(state))?;
    print!("{}", render_view(&tree, &options)?);

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if event.kind.is_modify() || event.kind.is_create() {
                    let _ = tx.send(());
                }
            }
        },
        Config::default(),
    )
    .context("failed to start file watcher")?;
    watcher
        .watch(fixture, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", fixture.display()))?;
    info!(path = %fixture.display(), "watching snapshot");
    eprintln!("Watching {} (Ctrl+C to stop)", fixture.display());

    let mut pending = Debouncer::new(Duration::from_millis(config.debounce_ms));
    host.take_changes();
    while running.load(Ordering::SeqCst) {
        if rx.recv_timeout(Duration::from_millis(50)).is_ok() {
            pending.push((), Instant::now());
        }

        if pending.poll(Instant::now()).is_some() {
            git.reload()
                .with_context(|| format!("failed to reload {}", fixture.display()))?;
            for repo in git.repositories()? {
                let event = RepositoryChangeEvent::new(repo.path, [RepositoryChange::Unknown]);
                let notified = tree.context().hub().publish(&ChangeEvent::Repository(event));
                debug!(notified, "published repository change");
            }
        }
        tree.tick();

        if !host.take_changes().is_empty() {
            println!();
            print!("{}", render_view(&tree, &options)?);
        }
    }
    eprintln!("Stopped watching.");
    Ok(())
}
