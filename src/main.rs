use clap::Parser;

use spandrel::error::SpandrelError;
use spandrel::{reader, translator, writer};

/// Translates a parametric box-girder bridge model into FE input text.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the bridge model XML export
    model: String,

    /// Path the FE input text is written to
    output: String,

    /// Optional JSON settings file
    #[arg(short, long)]
    settings: Option<String>,
}

fn run(args: &Args) -> Result<(), SpandrelError> {
    let settings = match &args.settings {
        Some(path) => reader::load_settings(path)?,
        None => reader::Settings::default(),
    };

    let model = reader::load_model(&args.model, settings.angle_unit)?;
    let fe = translator::translate(&model, &settings)?;
    writer::write_fe_model(&fe, &args.output)
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(&args) {
        println!("error: {}", err);
        std::process::exit(1)
    }
}
