//! kleebuild CLI

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};

use kleebuild_core::compile::Fontmake;
use kleebuild_core::pipeline::{self, BuildLayout};
use kleebuild_core::report::{write_json_pretty, write_plain};

/// CLI entrypoint for kleebuild.
#[derive(Debug, Parser)]
#[command(
    name = "kleebuild",
    about = "Build and post-process Klee One OTF releases"
)]
pub struct Cli {
    /// Build root holding sources/ (defaults to the current directory)
    #[arg(value_hint = ValueHint::DirPath, default_value = ".")]
    root: PathBuf,

    /// Compiler executable to run instead of `fontmake` from PATH
    #[arg(long = "fontmake", value_hint = ValueHint::FilePath)]
    fontmake: Option<PathBuf>,

    /// Emit the build report as prettified JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

/// Parse CLI args and run the build.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

fn execute(cli: Cli) -> Result<()> {
    let layout = BuildLayout::new(&cli.root);

    let mut compiler = Fontmake::new(layout.root());
    if let Some(program) = &cli.fontmake {
        compiler = compiler.with_program(program);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let report = pipeline::run(&layout, &compiler, &mut handle)?;

    if cli.json {
        write_json_pretty(&report, &mut handle)?;
    } else {
        write_plain(&report, &mut handle)?;
    }

    Ok(())
}
