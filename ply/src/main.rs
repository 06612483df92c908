use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, MietteHandlerOpts, Result};
use ply_codegen::Options;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

mod driver;

#[derive(Parser)]
#[command(
    name = "ply",
    version,
    about = "Generic collection operations for a generics-free host language",
    long_about = "Ply specializes the generic collection calls of .ply files into plain host code: \
                  monomorphized helpers, fused filter/map/reduce pipelines and folded constants."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Specialize a package and write the rewritten sources
    Build {
        /// Source files of one package (.ply files are rewritten)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Directory for the outputs; printed to stdout when absent
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Type-check a package without generating code
    Check {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Specialize a package, re-check the output and run its main function
    Run {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

fn main() {
    setup_miette_handler();
    setup_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Build { files, output }) => handle_build_command(&files, output),
        Some(Commands::Check { files }) => handle_check_command(&files),
        Some(Commands::Run { files }) => handle_run_command(&files),
        None => {
            Cli::parse_from(["ply", "--help"]);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{:?}", e);
        process::exit(1);
    }
}

fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .color(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

/// Install a subscriber only when `RUST_LOG` is set, e.g. `RUST_LOG=ply_codegen=debug`
fn setup_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn handle_build_command(files: &[PathBuf], output: Option<PathBuf>) -> Result<()> {
    let sources = driver::read_sources(files)?;
    let outputs = driver::build(&sources, &Options::default())?;
    match output {
        Some(dir) => {
            for path in driver::write_outputs(&outputs, &dir)? {
                println!("wrote {}", path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            driver::print_outputs(&outputs, &mut stdout)?;
            stdout.flush().into_diagnostic()?;
        }
    }
    Ok(())
}

fn handle_check_command(files: &[PathBuf]) -> Result<()> {
    let sources = driver::read_sources(files)?;
    let expressions = driver::check(&sources)?;
    println!("ok: {} files, {} expressions checked", sources.len(), expressions);
    Ok(())
}

fn handle_run_command(files: &[PathBuf]) -> Result<()> {
    let sources = driver::read_sources(files)?;
    let mut stdout = io::stdout().lock();
    driver::run(&sources, &Options::default(), &mut stdout)
}

#[cfg(test)]
mod tests;
