use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use log::debug;
use serde::Deserialize;

use vaultsite_lib::{normalize_glob, SiteConfig, DEFAULT_DESCRIPTION, DEFAULT_EXTENSION};

use crate::Cli;

pub const DEFAULT_OUTPUT_DIR: &str = "ghpages";
pub const DEFAULT_TEMPLATE_DIR: &str = "jinjatemplates";
pub const LOCAL_CONFIG_FILE: &str = ".vaultsite.toml";
pub const LOCAL_IGNORE_FILE: &str = ".vaultsiteignore";

/// Resolves the final `SiteConfig` from built-in defaults, config files and
/// command line flags, in increasing order of precedence:
///
/// 1. defaults (output and templates inside the vault)
/// 2. `<config dir>/vaultsite/config.toml` and `<config dir>/vaultsite/ignore`
/// 3. `<vault>/.vaultsite.toml` and `<vault>/.vaultsiteignore`
/// 4. `--config <path>`
/// 5. command line flags
///
/// Exclude patterns accumulate across all sources instead of overriding.
pub fn build_site_config(cli: &Cli, vault_path: &Path) -> Result<SiteConfig> {
    let mut settings = Settings::default();
    let mut patterns = PatternAccumulator::default();

    if !cli.no_config {
        if let Some(base_dirs) = BaseDirs::new() {
            let config_dir = base_dirs.config_dir().join("vaultsite");
            apply_config_file(&config_dir.join("config.toml"), &mut settings, &mut patterns)?;
            apply_ignore_file(&config_dir.join("ignore"), &mut patterns)?;
        } else {
            debug!("No base directories available; skipping global config search");
        }

        apply_config_file(
            &vault_path.join(LOCAL_CONFIG_FILE),
            &mut settings,
            &mut patterns,
        )?;
        apply_ignore_file(&vault_path.join(LOCAL_IGNORE_FILE), &mut patterns)?;

        if let Some(explicit_path) = cli.config_path.as_ref() {
            if !explicit_path.exists() {
                bail!("Config file {:?} does not exist", explicit_path);
            }
            apply_config_file(explicit_path, &mut settings, &mut patterns)?;
        }
    } else if let Some(explicit_path) = cli.config_path.as_ref() {
        debug!(
            "--no-config specified; skipping explicitly requested config file {:?}",
            explicit_path
        );
    }

    // CLI overrides (highest precedence)
    if let Some(output) = &cli.output {
        settings.output = Some(output.clone());
    }
    if let Some(templates) = &cli.templates {
        settings.templates = Some(templates.clone());
    }
    if let Some(description) = &cli.description {
        settings.description = Some(description.clone());
    }
    if let Some(extension) = &cli.extension {
        settings.extension = Some(extension.clone());
    }
    if cli.fail_fast {
        settings.fail_fast = Some(true);
    }
    // Support comma-separated patterns (e.g. -e "drafts/,*.private.md")
    for raw in &cli.exclude_patterns {
        for part in raw.split(',') {
            patterns.push(part);
        }
    }

    let extension = settings
        .extension
        .map(|ext| ext.trim_start_matches('.').to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    if extension.is_empty() || extension.contains(['/', '\\']) {
        bail!("Invalid document extension '{}'", extension);
    }

    let mut config = SiteConfig::new(
        vault_path,
        settings
            .output
            .unwrap_or_else(|| vault_path.join(DEFAULT_OUTPUT_DIR)),
        settings
            .templates
            .unwrap_or_else(|| vault_path.join(DEFAULT_TEMPLATE_DIR)),
    );
    config.description = settings
        .description
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    config.extension = extension;
    config.exclude_patterns = patterns.into_vec();
    config.fail_fast = settings.fail_fast.unwrap_or(false);

    debug!("Resolved site config: {:?}", config);
    Ok(config)
}

#[derive(Debug, Default)]
struct Settings {
    output: Option<PathBuf>,
    templates: Option<PathBuf>,
    description: Option<String>,
    extension: Option<String>,
    fail_fast: Option<bool>,
}

#[derive(Debug, Default)]
struct PatternAccumulator {
    patterns: Vec<String>,
    seen: HashSet<String>,
}

impl PatternAccumulator {
    fn push<S: AsRef<str>>(&mut self, pattern: S) {
        let normalized = normalize_glob(pattern.as_ref());
        if normalized.is_empty() {
            return;
        }
        if self.seen.insert(normalized.clone()) {
            debug!("Adding exclude pattern: {}", normalized);
            self.patterns.push(normalized);
        } else {
            debug!("Skipping duplicate exclude pattern: {}", normalized);
        }
    }

    fn merge<I>(&mut self, iter: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for item in iter {
            self.push(item);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.patterns
    }
}

fn apply_config_file(
    path: &Path,
    settings: &mut Settings,
    patterns: &mut PatternAccumulator,
) -> Result<()> {
    if !path.exists() {
        debug!("Config file {:?} not found; skipping", path);
        return Ok(());
    }

    debug!("Loading config from {:?}", path);
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;

    let parsed: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;

    if let Some(site_section) = parsed.site {
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        apply_site_section(site_section, base_dir, settings, patterns);
    }

    Ok(())
}

fn apply_site_section(
    section: SiteSection,
    base_dir: &Path,
    settings: &mut Settings,
    patterns: &mut PatternAccumulator,
) {
    // Relative paths are relative to the file that names them.
    if let Some(output) = section.output {
        settings.output = Some(base_dir.join(output));
    }
    if let Some(templates) = section.templates {
        settings.templates = Some(base_dir.join(templates));
    }
    if let Some(value) = section.description {
        settings.description = Some(value);
    }
    if let Some(value) = section.extension {
        settings.extension = Some(value);
    }
    if let Some(value) = section.fail_fast {
        settings.fail_fast = Some(value);
    }
    if let Some(values) = section.exclude {
        patterns.merge(values);
    }
}

fn apply_ignore_file(path: &Path, patterns: &mut PatternAccumulator) -> Result<()> {
    if !path.exists() {
        debug!("Ignore file {:?} not found; skipping", path);
        return Ok(());
    }

    debug!("Loading ignore patterns from {:?}", path);
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ignore file {:?}", path))?;

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        patterns.push(trimmed);
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    site: Option<SiteSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteSection {
    output: Option<PathBuf>,
    templates: Option<PathBuf>,
    description: Option<String>,
    extension: Option<String>,
    exclude: Option<Vec<String>>,
    fail_fast: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use anyhow::Result;
    use std::env;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set_path(key: &'static str, path: &Path) -> Self {
            let prev = env::var(key).ok();
            env::set_var(key, path);
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(ref value) = self.prev {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn isolate_env(root: &Path) -> Vec<EnvGuard> {
        let home = root.join("home");
        let xdg = root.join("xdg_config");
        let appdata = root.join("appdata");
        for dir in [&home, &xdg, &appdata] {
            let _ = fs::create_dir_all(dir);
        }

        vec![
            EnvGuard::set_path("HOME", &home),
            EnvGuard::set_path("XDG_CONFIG_HOME", &xdg),
            EnvGuard::set_path("APPDATA", &appdata),
            EnvGuard::set_path("USERPROFILE", &home),
        ]
    }

    #[test]
    fn defaults_live_inside_the_vault() -> Result<()> {
        let temp = tempdir()?;
        let vault = temp.path().join("vault");
        fs::create_dir_all(&vault)?;
        let _guards = isolate_env(temp.path());

        let config = build_site_config(&Cli::test_default(), &vault)?;

        assert_eq!(config.vault_path, vault);
        assert_eq!(config.output_path, vault.join(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.template_path, vault.join(DEFAULT_TEMPLATE_DIR));
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(config.extension, "md");
        assert!(config.exclude_patterns.is_empty());
        assert!(!config.fail_fast);
        Ok(())
    }

    #[test]
    fn local_config_merges_with_cli_overrides() -> Result<()> {
        let temp = tempdir()?;
        let vault = temp.path().join("vault");
        fs::create_dir_all(&vault)?;
        let _guards = isolate_env(temp.path());

        fs::write(
            vault.join(LOCAL_CONFIG_FILE),
            r#"
[site]
output = "../public"
templates = "theme"
description = "From the vault config"
extension = ".markdown"
exclude = ["drafts/"]
fail_fast = true
"#,
        )?;
        fs::write(vault.join(LOCAL_IGNORE_FILE), "# comment\nprivate/\n\n")?;

        let mut cli = Cli::test_default();
        cli.description = Some("From the command line".to_string());
        cli.exclude_patterns = vec!["*.tmp.md,./scratch/".to_string()];

        let config = build_site_config(&cli, &vault)?;

        assert_eq!(config.output_path, vault.join("../public"));
        assert_eq!(config.template_path, vault.join("theme"));
        assert_eq!(config.description, "From the command line");
        assert_eq!(config.extension, "markdown");
        assert!(config.fail_fast);

        let patterns: HashSet<_> = config.exclude_patterns.iter().cloned().collect();
        assert!(patterns.contains("drafts/"));
        assert!(patterns.contains("private/"));
        assert!(patterns.contains("*.tmp.md"));
        assert!(patterns.contains("scratch/"));
        assert_eq!(patterns.len(), 4);
        Ok(())
    }

    #[test]
    fn explicit_config_beats_vault_config() -> Result<()> {
        let temp = tempdir()?;
        let vault = temp.path().join("vault");
        fs::create_dir_all(&vault)?;
        let _guards = isolate_env(temp.path());

        fs::write(
            vault.join(LOCAL_CONFIG_FILE),
            "[site]\noutput = \"local-out\"\ndescription = \"local\"\n",
        )?;
        let explicit = temp.path().join("ci.toml");
        fs::write(&explicit, "[site]\noutput = \"ci-out\"\n")?;

        let mut cli = Cli::test_default();
        cli.config_path = Some(explicit.clone());
        cli.templates = Some(PathBuf::from("/srv/templates"));

        let config = build_site_config(&cli, &vault)?;

        assert_eq!(config.output_path, temp.path().join("ci-out"));
        assert_eq!(config.description, "local");
        assert_eq!(config.template_path, PathBuf::from("/srv/templates"));
        Ok(())
    }

    #[test]
    fn no_config_skips_files() -> Result<()> {
        let temp = tempdir()?;
        let vault = temp.path().join("vault");
        fs::create_dir_all(&vault)?;
        let _guards = isolate_env(temp.path());

        fs::write(vault.join(LOCAL_CONFIG_FILE), "[site]\nfail_fast = true\n")?;
        fs::write(vault.join(LOCAL_IGNORE_FILE), "private/\n")?;

        let mut cli = Cli::test_default();
        cli.no_config = true;
        cli.config_path = Some(temp.path().join("missing.toml"));

        let config = build_site_config(&cli, &vault)?;

        assert!(!config.fail_fast);
        assert!(config.exclude_patterns.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_unknown_keys_and_missing_explicit_config() -> Result<()> {
        let temp = tempdir()?;
        let vault = temp.path().join("vault");
        fs::create_dir_all(&vault)?;
        let _guards = isolate_env(temp.path());

        let mut cli = Cli::test_default();
        cli.config_path = Some(temp.path().join("missing.toml"));
        assert!(build_site_config(&cli, &vault).is_err());

        fs::write(vault.join(LOCAL_CONFIG_FILE), "[site]\nouptut = \"typo\"\n")?;
        assert!(build_site_config(&Cli::test_default(), &vault).is_err());
        Ok(())
    }

    #[test]
    fn empty_extension_is_rejected() -> Result<()> {
        let temp = tempdir()?;
        let vault = temp.path().join("vault");
        fs::create_dir_all(&vault)?;
        let _guards = isolate_env(temp.path());

        let mut cli = Cli::test_default();
        cli.extension = Some(".".to_string());

        assert!(build_site_config(&cli, &vault).is_err());
        Ok(())
    }
}
