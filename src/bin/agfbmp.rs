use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use agfbmp::batch::{BatchPlan, Mode};
use agfbmp::{Limits, PackOptions, PaletteMode, Unstoppable};
use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// Convert AGF images to BMP and back. Set RUST_LOG=debug for details.
struct TopLevel {
    /// worker threads for directory inputs [default: one per core]
    #[argh(option, short = 'j')]
    jobs: Option<usize>,

    /// refuse images with more pixels than this
    #[argh(option)]
    max_pixels: Option<u64>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Unpack(UnpackCmd),
    Pack(PackCmd),
    Repack(RepackCmd),
}

#[derive(FromArgs, Debug)]
/// Unpack AGF file(s) into BMP
#[argh(subcommand, name = "unpack")]
struct UnpackCmd {
    /// AGF file or directory of AGF files
    #[argh(positional)]
    input: PathBuf,

    /// output file or directory [default: X.BMP or <dir>_BMP]
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(FromArgs, Debug)]
/// Pack BMP file(s) into AGF using the original AGF files
#[argh(subcommand, name = "pack")]
struct PackCmd {
    /// BMP file or directory of BMP files
    #[argh(positional)]
    input: PathBuf,

    /// output file or directory [default: X.AGF or <dir>_X_AGF]
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// original AGF file or directory [default: X.AGF or sibling AGF dir]
    #[argh(option)]
    original: Option<PathBuf>,

    /// build 8-bit palettes from scratch instead of reusing the original
    #[argh(switch)]
    fresh_palette: bool,

    /// compress sections when that makes them smaller
    #[argh(switch)]
    compress: bool,
}

#[derive(FromArgs, Debug)]
/// Unpack AGF file(s) to BMP, then pack them back
#[argh(subcommand, name = "repack")]
struct RepackCmd {
    /// AGF file or directory of AGF files
    #[argh(positional)]
    input: PathBuf,

    /// output file or directory [default: X_X.AGF or <dir>_X_AGF]
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// build 8-bit palettes from scratch instead of reusing the original
    #[argh(switch)]
    fresh_palette: bool,

    /// compress sections when that makes them smaller
    #[argh(switch)]
    compress: bool,
}

fn pack_options(fresh_palette: bool, compress: bool) -> PackOptions {
    PackOptions {
        palette_mode: if fresh_palette {
            PaletteMode::Fresh
        } else {
            PaletteMode::Reuse
        },
        compress,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli: TopLevel = argh::from_env();

    if let Some(threads) = cli.jobs {
        #[cfg(feature = "multithreaded")]
        {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads);
            if let Err(e) = pool.build_global() {
                log::warn!("could not configure {threads} worker threads: {e}");
            }
        }
        #[cfg(not(feature = "multithreaded"))]
        {
            log::warn!("--jobs {threads} ignored: built without the multithreaded feature");
        }
    }

    let (mode, input, output, original, options) = match cli.command {
        Command::Unpack(cmd) => (Mode::Unpack, cmd.input, cmd.output, None, PackOptions::default()),
        Command::Pack(cmd) => (
            Mode::Pack,
            cmd.input,
            cmd.output,
            cmd.original,
            pack_options(cmd.fresh_palette, cmd.compress),
        ),
        Command::Repack(cmd) => (
            Mode::Repack,
            cmd.input,
            cmd.output,
            None,
            pack_options(cmd.fresh_palette, cmd.compress),
        ),
    };

    let plan = match BatchPlan::new(mode, &input, output.as_deref(), original.as_deref()) {
        Ok(plan) => plan.with_options(options),
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(1);
        }
    };
    let plan = match cli.max_pixels {
        Some(max) => plan.with_limits(Limits {
            max_pixels: Some(max),
            ..Limits::default()
        }),
        None => plan,
    };

    log::info!(
        "{:?}: {} -> {}",
        plan.mode(),
        input.display(),
        plan.output().display()
    );
    let start = Instant::now();
    let report = plan.run(&Unstoppable);

    if !plan.is_file_mode() {
        log::info!(
            "completed in {:.2?}: {} converted, {} failed",
            start.elapsed(),
            report.processed,
            report.failed
        );
    }
    ExitCode::from(report.exit_code())
}
