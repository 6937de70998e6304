use anyhow::{Context, Result};
use clap::Parser;
use goraster::{encode, ImageRows, DEFAULT_THRESHOLD};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::PathBuf;

/// Convert a bilevel image into a GraphOn terminal raster download.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Input image (PBM or any format the image crate decodes), stdin if omitted
    input: Option<PathBuf>,

    /// Output file, stdout if omitted
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,

    /// Pixels with a luma below this are black
    #[clap(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let source = match &args.input {
        Some(path) => ImageRows::open(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut bytes = vec![];
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("cannot read stdin")?;
            ImageRows::from_bytes(&bytes).context("cannot read stdin")?
        }
    };
    let mut source = source.with_threshold(args.threshold);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            encode(&mut source, BufWriter::new(file))?;
        }
        None => {
            encode(&mut source, BufWriter::new(io::stdout().lock()))?;
        }
    }
    info!("raster download written");
    Ok(())
}
