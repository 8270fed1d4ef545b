use anyhow::{bail, Result}; // Use anyhow for easy error handling in the binary
use clap::Parser;
use log::{debug, error, info, LevelFilter};
use std::path::PathBuf;
use vaultsite_lib::build_site;

mod config_loader;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Publishes a Markdown vault as a static HTML site with a nested link index.",
    long_about = "Vaultsite walks a vault directory, converts every Markdown document to HTML under the output directory (mirroring the vault's layout), and renders an index.html listing all pages as nested links grouped by directory.\n\nSettings are read from <config dir>/vaultsite/config.toml, then <vault>/.vaultsite.toml, then --config, with command line flags taking precedence. Patterns in <vault>/.vaultsiteignore are excluded."
)]
struct Cli {
    /// Path to the vault to publish.
    /// If not provided, the current working directory is used.
    #[arg(index = 1)]
    vault_path: Option<PathBuf>,

    /// Directory to write the site to. Defaults to 'ghpages' inside the vault.
    #[arg(short = 'o', long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Directory containing index.html (and optionally page.html).
    /// Defaults to 'jinjatemplates' inside the vault.
    #[arg(short = 't', long = "templates", value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Text shown on the landing page.
    #[arg(short = 'd', long)]
    description: Option<String>,

    /// Extension of the documents to publish, without the dot.
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,

    /// Add patterns to exclude files or directories. Can be used multiple times.
    /// Uses .gitignore glob syntax. Examples: -e "drafts/" -e "*.private.md"
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude_patterns: Vec<String>,

    /// Stop at the first document that fails instead of publishing the rest.
    #[arg(long)]
    fail_fast: bool,

    /// Read settings from this TOML file (applied after the global and vault config).
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,

    /// Ignore all config and ignore files.
    #[arg(long)]
    no_config: bool,

    /// Enable verbose output. Use -v for info, -vv for debug, -vvv for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[cfg(test)]
impl Cli {
    pub(crate) fn test_default() -> Self {
        Self {
            vault_path: None,
            output: None,
            templates: None,
            description: None,
            extension: None,
            exclude_patterns: Vec::new(),
            fail_fast: false,
            config_path: None,
            no_config: false,
            verbose: 0,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --- Initialize Logging ---
    let log_level = match cli.verbose {
        0 => LevelFilter::Warn,  // Default: Show warnings and errors
        1 => LevelFilter::Info,  // -v: Show info, warnings, errors
        2 => LevelFilter::Debug, // -vv: Show debug, info, warnings, errors
        _ => LevelFilter::Trace, // -vvv and more: Show everything
    };

    env_logger::Builder::new().filter_level(log_level).init();

    info!("Log level set to: {}", log_level);
    debug!("Parsed arguments: {:?}", cli);

    // --- Determine Vault Path ---
    let vault_path = cli.vault_path.clone().unwrap_or_else(|| PathBuf::from("."));
    info!("Vault path determined as: {:?}", vault_path);

    let config = config_loader::build_site_config(&cli, &vault_path)?;

    // --- Call Library ---
    let report = match build_site(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("Error during site build: {}", e);
            return Err(e.into());
        }
    };

    if !report.is_success() {
        for failure in &report.failures {
            error!("{}: {}", failure.path.display(), failure.error);
        }
        bail!(
            "{} document(s) failed to publish; index written to {}",
            report.failures.len(),
            report.index_path.display()
        );
    }

    info!(
        "Published {} documents ({} collisions); index at {}",
        report.documents_written,
        report.collisions.len(),
        report.index_path.display()
    );
    Ok(())
}
