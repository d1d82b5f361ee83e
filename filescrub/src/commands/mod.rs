// filescrub/src/commands/mod.rs
//! Subcommand implementations and the plumbing they share: building the
//! pattern registry from CLI arguments, choosing the active patterns, and
//! reading and writing files.

pub mod patterns;
pub mod sanitize;
pub mod scan;

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use filescrub_core::{PatternConfig, PatternRegistry, PatternSpec, RegistrationMode};

use crate::cli::PatternArgs;

/// Display name used for stdin/stdout in messages and reports.
pub const STDIN_NAME: &str = "<stdin>";
pub const STDOUT_NAME: &str = "<stdout>";

/// Builds the registry: built-ins (unless disabled), then the patterns file,
/// then `--named-pattern`, then `--pattern` values, in that priority order.
pub fn build_registry(args: &PatternArgs) -> Result<PatternRegistry> {
    let mut registry = if args.no_builtins {
        PatternRegistry::new()
    } else {
        PatternRegistry::with_builtins().context("Failed to load built-in patterns")?
    };

    let mut specs = Vec::new();
    if let Some(path) = &args.patterns_file {
        specs.extend(PatternConfig::load_from_file(path)?.patterns);
    }
    for named in &args.named_patterns {
        specs.push(PatternSpec::new(&named.id, &named.expression, "Command-line pattern"));
    }
    for (i, expression) in args.patterns.iter().enumerate() {
        specs.push(PatternSpec::new(format!("custom_{}", i + 1), expression, "Command-line pattern"));
    }

    let mode = if args.skip_invalid {
        RegistrationMode::SkipInvalid
    } else {
        RegistrationMode::FailFast
    };
    let skipped = registry
        .register_all(specs, mode, args.overwrite)
        .context("Failed to register user patterns")?;
    if !skipped.is_empty() {
        warn!("{} user pattern(s) were skipped.", skipped.len());
    }

    debug!("Registry holds {} pattern(s).", registry.len());
    Ok(registry)
}

/// Resolves `--enable` / `--disable` into the ids to run, in registry order.
///
/// Every id named in either list must be registered.
pub fn active_ids(registry: &PatternRegistry, args: &PatternArgs) -> Result<Vec<String>> {
    let selected: Vec<String> = if args.enable.is_empty() {
        registry.ids().map(str::to_string).collect()
    } else {
        registry
            .resolve(&args.enable)
            .context("Invalid --enable list")?
            .into_iter()
            .map(|d| d.id().to_string())
            .collect()
    };

    registry.resolve(&args.disable).context("Invalid --disable list")?;
    let active: Vec<String> = selected
        .into_iter()
        .filter(|id| !args.disable.iter().any(|d| d == id))
        .collect();

    if active.is_empty() {
        warn!("No patterns are active; input will pass through unchanged.");
    } else {
        debug!("Active patterns: {}", active.join(", "));
    }
    Ok(active)
}

/// Checks that `path` names an existing regular file.
pub fn validate_input_path(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Input file does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("Input path is not a regular file: {}", path.display());
    }
    Ok(())
}

/// Reads the whole input as UTF-8 text from `path` or stdin.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            validate_input_path(path)?;
            info!("Reading input from file: {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            info!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Writes `content` to `path`, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write output file: {}", path.display()))
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer.write_all(content.as_bytes()).context("Failed to write to stdout")?;
            writer.flush().context("Failed to flush stdout")
        }
    }
}

/// Whether `input` and `output` name the same existing file.
pub fn same_file(input: &Path, output: &Path) -> bool {
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Creates a temporary file beside `path` that [`commit_temp`] can later move
/// over it.
///
/// When `path` exists the temporary file takes its permissions. Dropping the
/// returned file without committing it deletes it.
pub fn temp_file_for(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::Builder::new()
        .prefix(".filescrub")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }
    debug!("Writing through temporary file {}", tmp.path().display());
    Ok(tmp)
}

/// Replaces `path` with `content` by writing a temporary sibling and renaming it.
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let mut tmp = temp_file_for(path)?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.flush())
        .with_context(|| format!("Failed to write temporary file: {}", tmp.path().display()))?;
    commit_temp(tmp, path)
}

/// Renames a finished temporary file over `path`. On failure the temporary
/// file is removed.
pub fn commit_temp(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Display name for an optional path.
pub fn display_name(path: Option<&Path>, fallback: &str) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::NamedPattern;
    use std::io::Write as _;

    #[test_log::test]
    fn registry_orders_user_patterns_after_builtins() {
        let args = PatternArgs {
            patterns: vec!["ACCT-[0-9]+".into(), "REF[0-9]{3}".into()],
            named_patterns: vec![NamedPattern { id: "ticket".into(), expression: "TCK-[0-9]+".into() }],
            ..Default::default()
        };
        let registry = build_registry(&args).unwrap();
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["credit_card", "email", "us_ssn", "ticket", "custom_1", "custom_2"]);
    }

    #[test]
    fn patterns_file_is_loaded_and_can_overwrite() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "email\t[a-z]+@corp\\.test\tCorporate mail").unwrap();

        let mut args = PatternArgs { patterns_file: Some(file.path().to_path_buf()), ..Default::default() };
        assert!(build_registry(&args).is_err());

        args.overwrite = true;
        let registry = build_registry(&args).unwrap();
        assert_eq!(registry.get("email").unwrap().description(), "Corporate mail");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn invalid_cli_pattern_fails_unless_skipped() {
        let mut args = PatternArgs { patterns: vec!["x*".into()], no_builtins: true, ..Default::default() };
        let err = build_registry(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("custom_1"));

        args.skip_invalid = true;
        assert!(build_registry(&args).unwrap().is_empty());
    }

    #[test]
    fn enable_and_disable_select_patterns() {
        let registry = PatternRegistry::with_builtins().unwrap();
        let args = PatternArgs {
            enable: vec!["us_ssn".into(), "credit_card".into()],
            disable: vec!["us_ssn".into()],
            ..Default::default()
        };
        assert_eq!(active_ids(&registry, &args).unwrap(), vec!["credit_card"]);

        let args = PatternArgs { disable: vec!["email".into()], ..Default::default() };
        assert_eq!(active_ids(&registry, &args).unwrap(), vec!["credit_card", "us_ssn"]);
    }

    #[test]
    fn unknown_ids_in_selection_are_errors() {
        let registry = PatternRegistry::with_builtins().unwrap();
        let args = PatternArgs { enable: vec!["phone".into()], ..Default::default() };
        assert!(format!("{:#}", active_ids(&registry, &args).unwrap_err()).contains("phone"));
        let args = PatternArgs { disable: vec!["fax".into()], ..Default::default() };
        assert!(active_ids(&registry, &args).is_err());
    }

    #[test]
    fn input_path_must_be_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_input_path(&dir.path().join("missing.txt")).is_err());
        assert!(validate_input_path(dir.path()).is_err());
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "old").unwrap();
        write_atomically(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn uncommitted_temp_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "old").unwrap();

        let mut tmp = temp_file_for(&path).unwrap();
        tmp.write_all(b"partial").unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
        drop(tmp);

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.txt");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomically(&path, "new").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn same_file_sees_through_path_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "x").unwrap();
        let other = dir.path().join("other.txt");

        assert!(same_file(&path, &dir.path().join(".").join("data.txt")));
        assert!(!same_file(&path, &other));
        fs::write(&other, "x").unwrap();
        assert!(!same_file(&path, &other));
    }
}
