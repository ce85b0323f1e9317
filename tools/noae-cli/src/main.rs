mod logger;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use log::{error, info, LevelFilter};
use miette::{miette, IntoDiagnostic, Result};
use noae::DecodeOptions;

/// Files picked up by directory mode unless `--suffix` says otherwise.
const DEFAULT_SUFFIX: &str = ".xml.e";

#[derive(Parser, Debug)]
#[command(name = "noae")]
#[command(about = "Decrypt and decompress NoA asset containers", author, version, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "dir"])))]
struct Cli {
    /// Container to decode; the output is written next to it without its last extension
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Decode every matching container below IN_DIR into OUT_DIR
    #[arg(short, long, num_args = 2, value_names = ["IN_DIR", "OUT_DIR"])]
    dir: Option<Vec<PathBuf>>,
    /// File name suffix selected in directory mode
    #[arg(long, default_value = DEFAULT_SUFFIX, value_name = "SUFFIX")]
    suffix: String,
    /// Overwrite existing outputs without asking
    #[arg(short = 'F', long, default_value_t = false)]
    force: bool,
    /// Skip trailer checksum verification
    #[arg(long, default_value_t = false)]
    no_verify: bool,
    /// Fail when the header size hint disagrees with the stream
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Print debugging information for every pipeline stage
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    let stdout = console::Term::stdout();
    let opts = DecodeOptions {
        verify_checksums: !cli.no_verify,
        strict_size_hint: cli.strict,
    };

    if let Some(file) = cli.file {
        command_file(&stdout, &file, &opts, cli.force)?;
    } else if let Some(dirs) = cli.dir {
        command_dir(&stdout, &dirs[0], &dirs[1], &cli.suffix, &opts, cli.force)?;
    }

    Ok(())
}

fn command_file(
    stdout: &console::Term,
    file: &Path,
    opts: &DecodeOptions,
    force: bool,
) -> Result<()> {
    let output = output_path(file)
        .ok_or_else(|| miette!("\"{}\" has no extension to strip", file.display()))?;

    if !force && output.exists() && !confirm_overwrite(&output)? {
        return Ok(());
    }

    stdout
        .write_line(&format!("Decoding to {}", output.display()))
        .into_diagnostic()?;
    let size = decode_file(file, &output, opts)?;
    stdout
        .write_line(&format!("Done! {size} bytes written"))
        .into_diagnostic()?;

    Ok(())
}

fn command_dir(
    stdout: &console::Term,
    in_dir: &Path,
    out_dir: &Path,
    suffix: &str,
    opts: &DecodeOptions,
    force: bool,
) -> Result<()> {
    if !in_dir.is_dir() {
        return Err(miette!("\"{}\" is not a directory", in_dir.display()));
    }

    let targets = batch_targets(in_dir, out_dir, suffix)?;
    let bar = indicatif::ProgressBar::new(targets.len() as u64);
    bar.set_style(get_bar_style()?);

    let mut decoded = 0usize;
    let mut failed = 0usize;
    for (input, output) in &targets {
        let relative = input.strip_prefix(in_dir).unwrap_or(input);
        bar.set_message(relative.display().to_string());

        if !force && output.exists() && !bar.suspend(|| confirm_overwrite(output))? {
            bar.inc(1);
            continue;
        }

        match decode_file(input, output, opts) {
            Ok(size) => {
                info!("{} -> {} ({size} bytes)", input.display(), output.display());
                decoded += 1;
            }
            Err(report) => {
                error!("{}: {report}", relative.display());
                bar.println(format!("! {}: {report}", relative.display()));
                failed += 1;
            }
        }
        bar.inc(1);
    }

    bar.finish();

    let text = format!(
        "Total files: {};\nDecoded: {decoded};\nFailed: {failed};",
        targets.len()
    );
    stdout.write_line(&text).into_diagnostic()?;

    if failed > 0 {
        return Err(miette!("{failed} of {} files failed to decode", targets.len()));
    }
    Ok(())
}

/// Input path without its last extension; `None` if there is nothing to strip.
fn output_path(input: &Path) -> Option<PathBuf> {
    input.extension()?;
    Some(input.with_extension(""))
}

/// Pair every file below `in_dir` ending in `suffix` with its output path,
/// keeping the directory structure relative to `in_dir`.
fn batch_targets(in_dir: &Path, out_dir: &Path, suffix: &str) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    common::collect_files_recursive(in_dir, &mut files);
    files.sort();

    let mut targets = Vec::new();
    for input in files {
        let matches = input
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if !matches {
            continue;
        }

        let relative = input.strip_prefix(in_dir).into_diagnostic()?;
        let Some(output) = output_path(&out_dir.join(relative)) else {
            continue;
        };
        targets.push((input, output));
    }

    Ok(targets)
}

fn decode_file(input: &Path, output: &Path, opts: &DecodeOptions) -> Result<usize> {
    let bytes = fs::read(input).into_diagnostic()?;
    let decoded = noae::decode_with(&bytes, opts)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let mut file = fs::File::create(output).into_diagnostic()?;
    common::OutputBuffer::write_exact(&mut file, &decoded).into_diagnostic()?;

    Ok(decoded.len())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    let message = format!("File \"{}\" exists. Overwrite it?", path.display());
    dialoguer::Confirm::new()
        .with_prompt(message)
        .interact()
        .into_diagnostic()
}

fn get_bar_style() -> Result<indicatif::ProgressStyle> {
    Ok(
        indicatif::ProgressStyle::with_template("[{bar:32}] {pos:>7}/{len:7} {msg}")
            .into_diagnostic()?
            .progress_chars("=>-"),
    )
}
