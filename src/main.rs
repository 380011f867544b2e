use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use spanav::config::Config;
use spanav::error::{NavError, NavResult};
use spanav::history::MemoryHistory;
use spanav::history::MemorySessionStore;
use spanav::logging::init_logging;
use spanav::page::{Directory, DirectoryContent, NavContext, Page, PageDirection, PageRef};
use spanav::spa::Spa;

/// Replays locations against a small demo page tree and prints how each one resolves.
#[derive(Debug, Parser)]
#[command(name = "spanav", version)]
struct Cli {
    /// Config file; defaults to $SPANAV_CONFIG_PATH or the XDG location.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Origin the in-memory history starts at.
    #[arg(long, default_value = "https://demo.local/")]
    origin: String,
    /// Log resolver activity to stderr.
    #[arg(short, long)]
    verbose: bool,
    /// Paths such as `/docs/intro?lang=en`, or `back`, `forward`, `reload`.
    #[arg(required = true)]
    steps: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Returns whether every step resolved.
async fn run(cli: Cli) -> NavResult<bool> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let history = Arc::new(MemoryHistory::new(&cli.origin)?);
    let root = Arc::new(demo_tree()?);
    let spa = Spa::new(
        root.clone(),
        history.clone(),
        Arc::new(MemorySessionStore::new()),
        config,
    );

    let mut all_resolved = true;
    for step in &cli.steps {
        let outcome = match step.as_str() {
            "back" => match history.back() {
                Some(pop) => spa.invalidate_location(Some(pop)).await,
                None => Err(NavError::invalid_argument("history back is empty")),
            },
            "forward" => match history.forward() {
                Some(pop) => spa.invalidate_location(Some(pop)).await,
                None => Err(NavError::invalid_argument("history forward is empty")),
            },
            "reload" => spa.invalidate_location(None).await,
            path => spa.navigate(path).await,
        };

        match outcome {
            Ok(direction) => println!(
                "{step:<28} {:<9} #{:<3} {}",
                direction_label(direction),
                spa.current_sequence().unwrap_or(0),
                active_trail(&PageRef::Directory(root.clone())),
            ),
            Err(err) => {
                all_resolved = false;
                println!("{step:<28} error: {err}");
            }
        }
    }
    Ok(all_resolved)
}

fn direction_label(direction: PageDirection) -> &'static str {
    match direction {
        PageDirection::None => "none",
        PageDirection::Forward => "forward",
        PageDirection::Backward => "backward",
    }
}

fn active_trail(root: &PageRef) -> String {
    let mut titles = vec![root.title()];
    let mut cursor = root.clone();
    while let PageRef::Directory(directory) = &cursor {
        let Some(child) = directory.current_page() else {
            break;
        };
        titles.push(child.title());
        cursor = child;
    }
    titles.join(" > ")
}

struct StaticPage {
    title: &'static str,
}

impl Page for StaticPage {
    fn title(&self) -> String {
        self.title.to_string()
    }

    fn load<'a>(&'a self, ctx: NavContext<'a>) -> BoxFuture<'a, NavResult<()>> {
        async move {
            tracing::debug!(page = self.title, args = ctx.args.len(), "static page loaded");
            Ok(())
        }
        .boxed()
    }

    fn unload(&self) -> BoxFuture<'_, NavResult<()>> {
        async { Ok(()) }.boxed()
    }
}

struct TitledIndex(&'static str);

impl DirectoryContent for TitledIndex {
    fn title(&self) -> String {
        self.0.to_string()
    }

    fn load_index<'a>(&'a self, _ctx: NavContext<'a>) -> BoxFuture<'a, NavResult<()>> {
        async { Ok(()) }.boxed()
    }
}

fn static_page(title: &'static str) -> impl Fn() -> std::future::Ready<NavResult<PageRef>> {
    move || std::future::ready(Ok(PageRef::terminal(StaticPage { title })))
}

fn demo_tree() -> NavResult<Directory> {
    let root = Directory::new(TitledIndex("Home"));
    root.register_sub_page(&["profile", "me"], static_page("Profile"))?;
    root.register_uncached_sub_page(&["settings", "prefs"], static_page("Settings"))?;
    root.register_sub_page(&["docs", "help"], || async {
        let docs = Directory::new(TitledIndex("Docs"));
        docs.register_sub_page(&["intro", "getting-started"], static_page("Introduction"))?;
        docs.register_sub_page(&["api"], static_page("API Reference"))?;
        Ok::<_, NavError>(PageRef::directory(docs))
    })?;
    Ok(root)
}
