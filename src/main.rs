use breviary::generate::GenerateInput;
use breviary::load::LoadMode;
use breviary::{config, generate, load, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build version: the package version on a release tag, otherwise
/// `dev@<short git hash>`. Both env vars come from the build script.
fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        // One leaked allocation for the lifetime of the process.
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "breviary")]
#[command(about = "Static site generator for the dubia.cc article archive")]
#[command(long_about = "\
Static site generator for the dubia.cc article archive

The content tree is the data source. Each article is a pre-parsed JSON
document under its language and slug; the catalog, author directory, and
devotional table are single JSON files beside it.

Content structure:

  content/
  ├── articles/
  │   ├── de/
  │   │   └── rosenkranz/
  │   │       └── index.md.json    # pre-parsed article document
  │   └── en/
  │       └── rosary/
  │           └── index.md.json
  ├── tags.json                    # tag catalog, featured groups, curated pages
  ├── authors.json                 # author directory
  └── mysteries.json               # devotional table for the rosary pages

Each language gets its article pages plus generated topics, newest,
authors, curated, and home pages, and a search index. Development builds
tolerate article directories whose index.md.json is still missing;
production builds reject them.

Run 'breviary gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source root holding config.toml and the content directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the full site: load content, render every page, write output
    Build {
        /// Resolve links against the production root href and reject
        /// incomplete article directories
        #[arg(long)]
        production: bool,
    },
    /// Load and render everything in memory without writing output
    Check {
        /// Apply production rules: reject incomplete article directories
        #[arg(long)]
        production: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { production } => {
            let config = config::load_config(&cli.source)?;
            init_thread_pool(&config.processing);

            let mode = if production {
                LoadMode::Production
            } else {
                LoadMode::Development
            };
            let content = cli.source.join(&config.content_root);

            println!("==> Loading {}", content.display());
            let loaded = load::load_articles(&content.join("articles"), mode)?;
            let catalog = load::load_catalog(&content)?;
            let authors = load::load_authors(&content)?;
            let devotional = load::load_devotional(&content)?;
            let load_warnings: Vec<String> =
                loaded.warnings.iter().map(ToString::to_string).collect();

            println!("==> Generating {} articles", loaded.article_count());
            let mut site = generate::generate(&GenerateInput {
                articles: &loaded,
                catalog: &catalog,
                authors: &authors,
                devotional: &devotional,
                config: &config,
                production,
                version: version_string(),
            })?;
            let mut warnings = load_warnings;
            warnings.append(&mut site.warnings);
            site.warnings = warnings;

            println!("==> Writing {}", cli.output.display());
            generate::write_site(&site, &cli.output)?;
            output::print_build_output(&site);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check { production } => {
            let config = config::load_config(&cli.source)?;
            init_thread_pool(&config.processing);
            let content = cli.source.join(&config.content_root);

            let mode = if production {
                LoadMode::Production
            } else {
                LoadMode::Development
            };

            println!("==> Checking {}", content.display());
            let loaded = load::load_articles(&content.join("articles"), mode)?;
            let catalog = load::load_catalog(&content)?;
            let authors = load::load_authors(&content)?;
            let devotional = load::load_devotional(&content)?;

            let site = generate::generate(&GenerateInput {
                articles: &loaded,
                catalog: &catalog,
                authors: &authors,
                devotional: &devotional,
                config: &config,
                production,
                version: version_string(),
            })?;
            for warning in &loaded.warnings {
                println!("warning: {warning}");
            }
            for line in output::format_warning_lines(&site.warnings) {
                println!("{}", line);
            }
            output::print_check_output(loaded.article_count(), site.page_count());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
