use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use docstore_core::{EnvelopeFormat, VERSION};

/// Docstore - store named documents in a directory, optionally encrypted under a passphrase
#[derive(Parser)]
#[command(name = "docstore")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store root directory (must already exist)
    #[arg(short, long, global = true, env = "DOCSTORE_ROOT")]
    pub root: Option<String>,

    /// Config file path
    #[arg(long, global = true, env = "DOCSTORE_CONFIG")]
    pub config: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a new document (never overwrites an encrypted document)
    Write(WriteArgs),

    /// Print or save a stored document
    Read(ReadArgs),

    /// Write a default config file
    InitConfig(InitConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `write` command
#[derive(Args)]
pub struct WriteArgs {
    /// Document name, relative to the store root
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Read the document from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<String>,

    /// Store without encryption
    #[arg(long)]
    pub plain: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `read` command
#[derive(Args)]
pub struct ReadArgs {
    /// Document name, relative to the store root
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Write the document to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Read an unencrypted document
    #[arg(long)]
    pub plain: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `init-config` command
#[derive(Args)]
pub struct InitConfigArgs {
    /// Envelope format for new documents
    #[arg(long, value_enum, default_value_t = FormatArg::Native)]
    pub format: FormatArg,

    /// Key derivation work factor (log2 cost)
    #[arg(long)]
    pub work_factor: Option<u8>,

    /// Replace an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum FormatArg {
    Native,
    Age,
}

impl From<FormatArg> for EnvelopeFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Native => EnvelopeFormat::Native,
            FormatArg::Age => EnvelopeFormat::Age,
        }
    }
}
