use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Compiles a `.elem` single-file component into an ES module.
#[derive(Debug, Parser)]
#[command(name = "elemc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the `.elem` source file.
    path: PathBuf,

    /// Write the generated module here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override the derived exported class name.
    #[arg(long)]
    name: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let module = match elem_compiler::build(&args.path, args.name.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.out {
        Some(out) => {
            if let Err(e) = std::fs::write(&out, &module) {
                eprintln!("error: failed to write {}: {e}", out.display());
                return ExitCode::FAILURE;
            }
        }
        None => {
            use std::io::Write;
            if let Err(e) = std::io::stdout().write_all(&module) {
                eprintln!("error: failed to write to stdout: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
