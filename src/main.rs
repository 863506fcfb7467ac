//! Command-line interface for panphylo.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use panphylo::{
    convert, fetch_source, write_output, Ascertainment, ColumnSpec, Format, Options, SlugLevel,
};

#[derive(Parser)]
#[command(name = "panphylo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert phylogenetic character-matrix data between tabular, NEXUS, and PHYLIP formats")]
struct Cli {
    /// Input file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Output file, or `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Character encoding of the input (`auto` to detect)
    #[arg(short, long, default_value = "auto")]
    encoding: String,

    /// Input format (`auto` to detect from the content)
    #[arg(short, long, default_value = "auto")]
    from: String,

    /// Output format (`auto` to detect from the output extension)
    #[arg(short, long, default_value = "auto")]
    to: String,

    /// Input column for taxa (tabular input only; inferred when unset)
    #[arg(long = "i-taxa")]
    input_taxa: Option<String>,

    /// Input column for characters (tabular input only; inferred when unset)
    #[arg(long = "i-char")]
    input_chars: Option<String>,

    /// Input column for states (tabular input only; inferred when unset)
    #[arg(long = "i-state")]
    input_states: Option<String>,

    /// Output column for taxa (tabular output only)
    #[arg(long = "o-taxa")]
    output_taxa: Option<String>,

    /// Output column for characters (tabular output only)
    #[arg(long = "o-char")]
    output_chars: Option<String>,

    /// Output column for states (tabular output only)
    #[arg(long = "o-state")]
    output_states: Option<String>,

    /// Level of slugging for taxa labels (none, simple, full)
    #[arg(long, default_value = "simple")]
    slug_taxa: String,

    /// Level of slugging for character labels (none, simple, full)
    #[arg(long, default_value = "simple")]
    slug_chars: String,

    /// Binarize the data into presence/absence characters
    #[arg(short, long)]
    binarize: bool,

    /// Ascertainment correction when binarizing (default, true, false)
    #[arg(long, default_value = "default")]
    ascertainment: String,

    /// Logging level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

impl Cli {
    fn options(&self) -> Result<Options> {
        let from = match self.from.as_str() {
            "auto" => None,
            name => Some(name.parse::<Format>()?),
        };
        let to = match self.to.as_str() {
            "auto" => Format::from_path(&self.output)?,
            name => name.parse::<Format>()?,
        };

        Ok(Options {
            from,
            to,
            input_columns: ColumnSpec {
                taxa: self.input_taxa.clone(),
                characters: self.input_chars.clone(),
                states: self.input_states.clone(),
            },
            output_columns: ColumnSpec {
                taxa: self.output_taxa.clone(),
                characters: self.output_chars.clone(),
                states: self.output_states.clone(),
            },
            slug_taxa: self.slug_taxa.parse::<SlugLevel>()?,
            slug_chars: self.slug_chars.parse::<SlugLevel>()?,
            binarize: self.binarize,
            ascertainment: self.ascertainment.parse::<Ascertainment>()?,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so that `-` output stays clean on stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.verbosity));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let options = cli.options()?;
    let source = fetch_source(&cli.input, &cli.encoding)?;
    let converted = convert(&source, &options)?;
    write_output(&cli.output, &converted)?;

    Ok(())
}
