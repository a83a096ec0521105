//! lockpack: passphrase-based file encryption
//!
//! Commands:
//!   lock <file>    - seal a file into a .lpk container
//!   unlock <file>  - open a .lpk container back into the original bytes
//!
//! The passphrase is prompted without echo (twice for lock). For scripted
//! use it can come from the first line of a file via --passphrase-file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use tracing::info;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "lockpack",
    version,
    about = "Passphrase-based authenticated file encryption",
    long_about = "lockpack: seal a file under a passphrase into a self-contained container.\n\
                  Anyone holding the container and the passphrase can open it; nobody else can."
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOCKPACK_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "LOCKPACK_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file into a container
    Lock {
        /// File to encrypt
        input: PathBuf,

        /// Output path (default: <input>.lpk)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Overwrite the output file if it already exists
        #[arg(long)]
        force: bool,

        /// Read the passphrase from the first line of this file instead of prompting
        #[arg(long)]
        passphrase_file: Option<PathBuf>,
    },

    /// Decrypt a container back into the original file
    Unlock {
        /// Container to decrypt
        input: PathBuf,

        /// Output path (default: <input> minus its .lpk suffix)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Overwrite the output file if it already exists
        #[arg(long)]
        force: bool,

        /// Read the passphrase from the first line of this file instead of prompting
        #[arg(long)]
        passphrase_file: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log, &cli.log_format);

    match cli.command {
        Commands::Lock { input, output, force, passphrase_file } => {
            cmd_lock(&input, output.as_deref(), force, passphrase_file.as_deref()).await
        }
        Commands::Unlock { input, output, force, passphrase_file } => {
            cmd_unlock(&input, output.as_deref(), force, passphrase_file.as_deref()).await
        }
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

// ── `lockpack lock` ───────────────────────────────────────────────────────────

async fn cmd_lock(
    input: &Path,
    output: Option<&Path>,
    force: bool,
    passphrase_file: Option<&Path>,
) -> Result<()> {
    let output = match output {
        Some(p) => p.to_path_buf(),
        None => default_locked_path(input),
    };
    check_overwrite(&output, force)?;

    let plaintext = tokio::fs::read(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;
    let passphrase = obtain_passphrase(passphrase_file, true)?;

    info!(input = %input.display(), bytes = plaintext.len(), "encrypting");

    // The fixed-cost KDF takes long enough to matter; keep it off the
    // async worker threads.
    let container =
        tokio::task::spawn_blocking(move || lockpack_core::encrypt(&plaintext, &passphrase))
            .await
            .context("encryption task failed")??;

    tokio::fs::write(&output, &container)
        .await
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Locked {} → {} ({} bytes)",
        input.display(),
        output.display(),
        container.len()
    );
    Ok(())
}

// ── `lockpack unlock` ─────────────────────────────────────────────────────────

async fn cmd_unlock(
    input: &Path,
    output: Option<&Path>,
    force: bool,
    passphrase_file: Option<&Path>,
) -> Result<()> {
    let output = match output {
        Some(p) => p.to_path_buf(),
        None => default_unlocked_path(input)?,
    };
    check_overwrite(&output, force)?;

    let container = tokio::fs::read(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;
    let passphrase = obtain_passphrase(passphrase_file, false)?;

    info!(input = %input.display(), bytes = container.len(), "decrypting");

    let plaintext =
        tokio::task::spawn_blocking(move || lockpack_core::decrypt(&container, &passphrase))
            .await
            .context("decryption task failed")??;

    tokio::fs::write(&output, &plaintext)
        .await
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Unlocked {} → {} ({} bytes)",
        input.display(),
        output.display(),
        plaintext.len()
    );
    Ok(())
}

// ── Passphrase sourcing ───────────────────────────────────────────────────────

fn obtain_passphrase(passphrase_file: Option<&Path>, confirm: bool) -> Result<SecretString> {
    if let Some(path) = passphrase_file {
        return read_passphrase_file(path);
    }

    let first = rpassword::prompt_password("Passphrase: ").context("reading passphrase")?;
    if confirm {
        let second = rpassword::prompt_password("Confirm passphrase: ")
            .context("reading passphrase confirmation")?;
        if first != second {
            bail!("passphrases do not match");
        }
    }
    if first.is_empty() {
        bail!("passphrase must not be empty");
    }

    Ok(SecretString::from(first))
}

/// First line of the file, without its line ending.
fn read_passphrase_file(path: &Path) -> Result<SecretString> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading passphrase file {}", path.display()))?;

    let line = content.lines().next().unwrap_or("");
    if line.is_empty() {
        bail!("passphrase file is empty: {}", path.display());
    }

    Ok(SecretString::from(line))
}

// ── Output path helpers ───────────────────────────────────────────────────────

/// `report.pdf` → `report.pdf.lpk`
fn default_locked_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".lpk");
    PathBuf::from(name)
}

/// `report.pdf.lpk` → `report.pdf`; anything else needs an explicit output
fn default_unlocked_path(input: &Path) -> Result<PathBuf> {
    match input.extension().and_then(|e| e.to_str()) {
        Some("lpk") => Ok(input.with_extension("")),
        _ => bail!(
            "cannot derive an output name from {} (no .lpk suffix): pass --output",
            input.display()
        ),
    }
}

fn check_overwrite(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "output already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_locked_path_appends_suffix() {
        assert_eq!(
            default_locked_path(Path::new("report.pdf")),
            PathBuf::from("report.pdf.lpk")
        );
        assert_eq!(
            default_locked_path(Path::new("archive")),
            PathBuf::from("archive.lpk")
        );
    }

    #[test]
    fn test_default_unlocked_path_strips_suffix() {
        assert_eq!(
            default_unlocked_path(Path::new("report.pdf.lpk")).unwrap(),
            PathBuf::from("report.pdf")
        );
    }

    #[test]
    fn test_default_unlocked_path_requires_suffix() {
        assert!(default_unlocked_path(Path::new("report.bin")).is_err());
        assert!(default_unlocked_path(Path::new("noextension")).is_err());
    }

    #[test]
    fn test_read_passphrase_file_takes_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass");
        std::fs::write(&path, "hunter2\ntrailing junk\n").unwrap();

        let passphrase = read_passphrase_file(&path).unwrap();
        assert_eq!(passphrase.expose_secret(), "hunter2");
    }

    #[test]
    fn test_read_passphrase_file_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass");
        std::fs::write(&path, "\n").unwrap();

        assert!(read_passphrase_file(&path).is_err());
    }

    #[test]
    fn test_check_overwrite_guard() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("out.lpk");
        std::fs::write(&existing, b"occupied").unwrap();

        assert!(check_overwrite(&existing, false).is_err());
        assert!(check_overwrite(&existing, true).is_ok());
        assert!(check_overwrite(&dir.path().join("fresh.lpk"), false).is_ok());
    }
}
