//! Docstore CLI - write and read named documents, optionally encrypted.
//!
//! This is the command-line interface for Docstore. It is thin glue over
//! the two core operations, write and read, on either backend.

mod cli;
mod config;
mod constants;
mod errors;
mod helpers;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use docstore_core::{
    DocstoreError, DocumentStore, EncryptedFilesystemStore, FilesystemStore, PassphraseStore,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, InitConfigArgs, ReadArgs, WriteArgs};
use crate::config::{default_config_path, load_config, write_config, DocstoreConfig};
use crate::constants::LOG_ENV;
use crate::errors::CliError;
use crate::helpers::{prompt_passphrase, read_document_input, resolve_root, write_document_output};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        exit_with(err);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn exit_with(err: anyhow::Error) -> ! {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        cli_err.exit();
    }
    if let Some(mapped) = err
        .downcast_ref::<DocstoreError>()
        .and_then(CliError::from_core)
    {
        mapped.exit();
    }
    eprintln!("Error: {:#}", err);
    std::process::exit(1)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Write(args) => write_command(&cli, args),
        Commands::Read(args) => read_command(&cli, args),
        Commands::InitConfig(args) => init_config_command(&cli, args),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "docstore", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load(cli: &Cli) -> anyhow::Result<(PathBuf, DocstoreConfig)> {
    let config = load_config(cli.config.as_deref().map(Path::new))?;
    let root = resolve_root(cli.root.as_deref(), config.store.root.as_deref())?;
    tracing::debug!(root = %root.display(), format = %config.store.format, "resolved store");
    Ok((root, config))
}

fn write_command(cli: &Cli, args: &WriteArgs) -> anyhow::Result<()> {
    let (root, config) = load(cli)?;
    let data = read_document_input(args.input.as_deref())?;

    let location = if args.plain {
        FilesystemStore::new(root).write(&args.name, &data)?
    } else {
        let store = EncryptedFilesystemStore::with_config(root, config.store_config())?;
        let passphrase = prompt_passphrase(args.no_input, true)?;
        store.write(&args.name, &data, &passphrase)?
    };

    if !cli.quiet {
        println!("Stored {}", location.display());
    }
    Ok(())
}

fn read_command(cli: &Cli, args: &ReadArgs) -> anyhow::Result<()> {
    let (root, config) = load(cli)?;

    let data = if args.plain {
        FilesystemStore::new(root).read(&args.name)?
    } else {
        let store = EncryptedFilesystemStore::with_config(root, config.store_config())?;
        let passphrase = prompt_passphrase(args.no_input, false)?;
        store.read(&args.name, &passphrase)?
    };

    write_document_output(args.output.as_deref(), &data)
}

fn init_config_command(cli: &Cli, args: &InitConfigArgs) -> anyhow::Result<()> {
    let path = match cli.config.as_deref() {
        Some(path) => PathBuf::from(path),
        None => default_config_path()?,
    };
    if path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}. Use --force to replace it.",
            path.display()
        ))
        .into());
    }

    let config = DocstoreConfig::new(
        cli.root.as_deref().map(PathBuf::from),
        args.format.into(),
        args.work_factor,
    );
    config.store_config().validate()?;
    write_config(&path, &config)?;

    if !cli.quiet {
        println!("Wrote config to {}", path.display());
    }
    Ok(())
}
