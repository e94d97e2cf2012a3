use handshake_sir::{logging::enable_logging, params::Params, runner::run, HandshakeError};
use std::path::PathBuf;

const OUTPUT_DIR: &str = "output";

/// `handshake [params.json] [output_dir]`
fn main() -> Result<(), HandshakeError> {
    enable_logging()?;

    let mut args = std::env::args().skip(1);
    let params = match args.next() {
        Some(path) => Params::from_json_file(path)?,
        None => Params::default(),
    };
    let output_dir = args.next().map_or_else(|| PathBuf::from(OUTPUT_DIR), PathBuf::from);

    run(params, output_dir)?;
    Ok(())
}
