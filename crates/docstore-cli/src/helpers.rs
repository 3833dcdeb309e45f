use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::constants::PASSPHRASE_ENV;
use crate::errors::CliError;

/// Read the passphrase from DOCSTORE_PASSPHRASE, or prompt for it.
///
/// `confirm` asks twice, for writes.
pub fn prompt_passphrase(no_input: bool, confirm: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
        return Ok(Zeroizing::new(value));
    }

    let interactive = io::stdin().is_terminal() && !no_input;
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ))
        .into());
    }

    let mut prompt = Password::new().with_prompt("Passphrase");
    if confirm {
        prompt = prompt.with_confirmation("Confirm passphrase", "Passphrases do not match");
    }
    let passphrase = prompt
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
    Ok(Zeroizing::new(passphrase))
}

/// Document bytes from a file, or stdin when no file is given.
pub fn read_document_input(input: Option<&str>) -> anyhow::Result<Vec<u8>> {
    match input {
        Some(path) => std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read input {}: {}", path, e)),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}

/// Write document bytes to a file, or stdout when no file is given.
pub fn write_document_output(output: Option<&str>, data: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, data)
            .map_err(|e| anyhow::anyhow!("Failed to write output {}: {}", path, e)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Resolve the store root from the flag or config and check that it exists.
pub fn resolve_root(flag: Option<&str>, configured: Option<&str>) -> anyhow::Result<PathBuf> {
    let root = flag.or(configured).ok_or_else(|| {
        CliError::invalid_input(
            "No store root provided. Use --root, DOCSTORE_ROOT, or set [store] root in the config.",
        )
    })?;
    let root = Path::new(root);
    if !root.is_dir() {
        return Err(CliError::not_found(
            format!("Store root {} does not exist", root.display()),
            "Create the directory first; docstore does not create it.",
        )
        .into());
    }
    Ok(root.to_path_buf())
}
