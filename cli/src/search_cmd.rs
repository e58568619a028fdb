use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use catalog_nav_search::Catalog;
use catalog_nav_search::FilterMode;
use catalog_nav_search::FilterOutcome;
use catalog_nav_search::IndexLoadError;
use catalog_nav_search::IndexLoader;
use catalog_nav_search::IndexSource;
use catalog_nav_search::NavTree;
use catalog_nav_search::SearchConfig;
use catalog_nav_search::SearchIndex;
use catalog_nav_search::SearchWidget;
use catalog_nav_search::Theme;
use catalog_nav_search::theme;
use clap::Args;
use clap::ValueEnum;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::task::JoinError;
use tracing::debug;
use tracing::error;
use url::Url;

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Catalog JSON the navigation tree is built from.
    #[arg(long, value_name = "PATH", global = true, default_value = "catalog.json")]
    pub catalog: PathBuf,

    /// Index location (URL or path). Overrides `index` from the config.
    #[arg(long, value_name = "LOCATION", global = true)]
    pub index: Option<String>,

    /// URL of the page the widget lives on; relative index locations are
    /// resolved against it.
    #[arg(long = "page-url", value_name = "URL", global = true)]
    pub page_url: Option<Url>,

    /// Search settings in TOML.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    #[arg(long, value_enum, global = true)]
    pub theme: Option<ThemeArg>,

    /// Never load the index; every query uses substring matching.
    #[arg(long = "no-index", global = true)]
    pub no_index: bool,

    #[arg(long = "format", value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct QueryCommand {
    /// Query text, as typed into the search box.
    #[arg(value_name = "QUERY", num_args = 0.., trailing_var_arg = true)]
    pub query: Vec<String>,
}

#[derive(Debug, Args)]
pub struct InteractiveCommand {}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

type LoadResult = Result<Result<SearchIndex, IndexLoadError>, JoinError>;

struct Session {
    widget: SearchWidget,
    loader: Option<Result<IndexLoader, IndexLoadError>>,
    format: OutputFormat,
}

fn prepare(args: SourceArgs) -> Result<Session> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("load search config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(index) = args.index {
        config.index = index;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(theme) = args.theme {
        config.theme = theme.into();
    }
    config.validate().context("validate search settings")?;
    theme::install(config.theme);

    let catalog = Catalog::load(&args.catalog)
        .with_context(|| format!("load catalog {}", args.catalog.display()))?;
    let tree = NavTree::from_catalog(&catalog);
    debug!(
        "navigation has {} groups and {} nodes",
        tree.groups().len(),
        tree.nodes().len()
    );
    let widget = SearchWidget::with_options(tree, config.matcher_options());

    let loader = if args.no_index {
        None
    } else {
        let http = reqwest::Client::builder()
            .build()
            .context("build HTTP client")?;
        Some(
            IndexSource::resolve(&config.index, args.page_url.as_ref())
                .map(|source| IndexLoader::new(source, http)),
        )
    };

    Ok(Session {
        widget,
        loader,
        format: args.output_format,
    })
}

pub async fn run_query(args: SourceArgs, cmd: QueryCommand) -> Result<()> {
    let Session {
        mut widget,
        loader,
        format,
    } = prepare(args)?;
    match loader {
        Some(Ok(loader)) => settle(&mut widget, loader.spawn().await),
        Some(Err(err)) => widget.index_loaded(Err(err)),
        None => {}
    }
    widget.input(&cmd.query.join(" "));
    emit(&widget, format)
}

pub async fn run_interactive(args: SourceArgs, _cmd: InteractiveCommand) -> Result<()> {
    let Session {
        mut widget,
        loader,
        format,
    } = prepare(args)?;
    let mut pending = match loader {
        Some(Ok(loader)) => Some(loader.spawn()),
        Some(Err(err)) => {
            widget.index_loaded(Err(err));
            None
        }
        None => None,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let load = async {
            match pending.as_mut() {
                Some(handle) => handle.await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            joined = load => {
                pending = None;
                settle(&mut widget, joined);
                if widget.last_outcome().mode != FilterMode::Reset {
                    widget.refresh();
                    emit(&widget, format)?;
                }
            }
            line = lines.next_line() => {
                match line.context("read input event")? {
                    Some(line) => {
                        widget.input(&line);
                        emit(&widget, format)?;
                    }
                    None => break,
                }
            }
        }
    }
    Ok(())
}

fn settle(widget: &mut SearchWidget, joined: LoadResult) {
    match joined {
        Ok(result) => widget.index_loaded(result),
        // The widget keeps answering with substring matching.
        Err(err) => error!("index loader task did not finish: {err}"),
    }
}

fn emit(widget: &SearchWidget, format: OutputFormat) -> Result<()> {
    let projection = widget.projection();
    match format {
        OutputFormat::Json => {
            let line = serde_json::to_string(&projection).context("serialize navigation")?;
            println!("{line}");
        }
        OutputFormat::Text => {
            println!("{}", summary(widget.last_outcome()));
            print!("{}", projection.to_text());
        }
    }
    Ok(())
}

fn summary(outcome: &FilterOutcome) -> String {
    let visible = outcome.visible;
    let query = &outcome.query;
    match outcome.mode {
        FilterMode::Reset => format!("showing all {visible} entries"),
        FilterMode::IndexMatched => match outcome.hits.first() {
            Some(best) => format!(
                "{visible} visible for \"{query}\" (index, best: {})",
                best.name
            ),
            None => format!("{visible} visible for \"{query}\" (index)"),
        },
        FilterMode::Fallback => format!("{visible} visible for \"{query}\" (substring)"),
    }
}
