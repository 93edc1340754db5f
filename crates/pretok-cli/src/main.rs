//! `pretok` - cache a translation unit's raw tokens into a PTH file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pretok_core::{LangOptions, Preprocessor, SourceManager};
use pretok_writer::cache_tokens;

#[derive(Parser)]
#[command(name = "pretok", bin_name = "pretok")]
#[command(about = "Cache lexer tokens of a C translation unit into a .pth file")]
struct Cli {
    /// Main source file
    #[arg(value_name = "SOURCE")]
    input: PathBuf,

    /// Output file (defaults to the source path with a .pth extension)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Add a directory to the include search path
    #[arg(short = 'I', value_name = "DIR", action = clap::ArgAction::Append)]
    include: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The writer only caches files with absolute paths; canonicalize the
    // entry point so the whole unit qualifies.
    let input = match cli.input.canonicalize() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("error: cannot open {}: {err}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };
    let output = cli
        .output
        .unwrap_or_else(|| input.with_extension("pth"));

    let mut sm = SourceManager::new();
    let main_id = match sm.load_file(&input) {
        Ok(id) => id,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", input.display());
            return ExitCode::FAILURE;
        }
    };

    let mut pp = Preprocessor::new(sm, main_id, LangOptions::default());
    for dir in cli.include {
        pp.add_include_dir(dir);
    }

    if let Err(err) = cache_tokens(&mut pp, &output) {
        eprintln!("error: {err}");
        // Don't leave a partial cache behind.
        let _ = std::fs::remove_file(&output);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
