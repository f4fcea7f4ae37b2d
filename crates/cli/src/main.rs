use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use pagechunk_core::{
    DefaultFetcher, FetchedPage, Pipeline, RenderMode, RenderingEngine, ResultCache, ScrapeConfig, ScrapeOutput,
    ScrapeRequest, ScrapeResult,
};
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{
    format_size, print_banner, print_field, print_info, print_result_summary, print_step, print_success, print_timing,
    print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const STEPS: usize = 3;

/// Turn a web page into frontmatter Markdown and overlapping chunks
#[derive(Parser, Debug)]
#[command(name = "pagechunk")]
#[command(author = "PageChunk Contributors")]
#[command(version)]
#[command(about = "Turn a web page into frontmatter Markdown and overlapping chunks", long_about = None)]
struct Args {
    /// Page URL (with --html, the URL the HTML was served from)
    #[arg(value_name = "URL", required_unless_present = "completions")]
    url: Option<String>,

    /// Render the page in a headless browser instead of a plain GET
    #[arg(long)]
    render: bool,

    /// Target words per chunk (0 uses the default)
    #[arg(short, long, default_value_t = 1000, value_name = "NUM")]
    target_words: usize,

    /// Print the composed Markdown instead of JSON
    #[arg(long)]
    raw: bool,

    /// Process this HTML file ("-" for stdin) instead of fetching; skips robots.txt and the cache
    #[arg(long, value_name = "FILE")]
    html: Option<String>,

    /// Directory holding cached results
    #[arg(long, default_value = ".cache", value_name = "DIR")]
    cache_dir: PathBuf,

    /// Neither read nor write the cache
    #[arg(long)]
    no_cache: bool,

    /// Fetch/render timeout in seconds
    #[arg(long, default_value_t = 20, value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    completions: Option<Shell>,
}

impl Args {
    fn scrape_config(&self) -> ScrapeConfig {
        let mut builder = ScrapeConfig::builder().fetch_timeout(Duration::from_secs(self.timeout));
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        builder.build()
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn read_html(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read file: {}", source))
    }
}

fn into_output(result: ScrapeResult, raw: bool) -> ScrapeOutput {
    if raw { ScrapeOutput::Markdown(result.md) } else { ScrapeOutput::Json(Box::new(result)) }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "pagechunk", &mut io::stdout());
        return Ok(());
    }

    init_logging(args.verbose);
    let started = Instant::now();

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let config = args.scrape_config();
    let url = args.url.as_deref().unwrap_or_default();
    let request = ScrapeRequest::new(
        url,
        RenderMode::from_flag(args.render),
        args.target_words,
        args.raw,
        config.default_target_words,
    )?;

    let output = match &args.html {
        Some(source) => {
            if args.verbose {
                print_step(1, STEPS, &format!("Reading HTML from {}", source.bright_white()));
            }
            let html = read_html(source)?;
            if args.verbose {
                print_field("Size", &format_size(html.len()));
                print_step(2, STEPS, "Extracting, converting and chunking");
            }

            let fetcher = DefaultFetcher::new(&config)?.shared();
            let pipeline = Pipeline::new(config, fetcher)?;
            let page = FetchedPage { html, final_url: request.url().clone(), status_code: 200 };
            let result = pipeline.process_page(&page, request.target_words())?;
            if args.verbose {
                print_result_summary(&result);
            }
            into_output(result, request.raw_output())
        }
        None => {
            if args.verbose {
                print_step(1, STEPS, "Preparing fetcher");
            }

            let engine = if args.render {
                if args.verbose {
                    print_info("Launching headless browser");
                }
                let engine = RenderingEngine::launch(&config).await.context("Failed to launch headless browser")?;
                Some(Arc::new(engine))
            } else {
                None
            };

            let mut fetcher = DefaultFetcher::new(&config)?;
            if let Some(engine) = &engine {
                fetcher = fetcher.with_engine(Arc::clone(engine));
            }

            let mut pipeline = Pipeline::new(config, fetcher.shared())?;
            if args.no_cache {
                if args.verbose {
                    print_warning("Cache disabled");
                }
            } else {
                pipeline = pipeline.with_cache(ResultCache::new(&args.cache_dir));
            }

            if args.verbose {
                print_step(2, STEPS, &format!("Scraping {}", request.url().as_str().bright_white().underline()));
            }
            let output = pipeline.run(&request).await;
            drop(pipeline);

            if let Some(engine) = engine
                && let Ok(engine) = Arc::try_unwrap(engine)
            {
                engine.shutdown().await;
            }

            let output = output?;
            if args.verbose
                && let ScrapeOutput::Json(result) = &output
            {
                print_result_summary(result);
            }
            output
        }
    };

    let rendered = match output {
        ScrapeOutput::Json(result) => {
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        }
        ScrapeOutput::Markdown(md) => md,
    };

    if args.verbose {
        print_step(3, STEPS, "Writing output");
        print_timing("Elapsed", started.elapsed());
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, rendered).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", rendered);
        }
    }

    Ok(())
}
