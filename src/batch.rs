//! Batch planning and execution over files or directories.
//!
//! A [`BatchPlan`] resolves the input, output, original-AGF and intermediate
//! paths up front; [`BatchPlan::run`] then processes each [`Job`]
//! independently. Per-file failures are logged and counted, never fatal.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use enough::Stop;
#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

use crate::error::AgfError;
use crate::fs::{pack_file, read_context, repack_file, unpack_file};
use crate::limits::Limits;
use crate::pack::PackOptions;

const AGF_EXT: &str = "AGF";
const BMP_EXT: &str = "BMP";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// AGF to BMP.
    Unpack,
    /// BMP to AGF, against the original AGF files.
    Pack,
    /// AGF to an intermediate BMP and back to AGF.
    Repack,
}

impl Mode {
    fn input_extension(self) -> &'static str {
        match self {
            Mode::Pack => BMP_EXT,
            Mode::Unpack | Mode::Repack => AGF_EXT,
        }
    }

    fn output_extension(self) -> &'static str {
        match self {
            Mode::Unpack => BMP_EXT,
            Mode::Pack | Mode::Repack => AGF_EXT,
        }
    }
}

/// Errors that prevent a batch from being planned at all.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlanError {
    #[error("input file or directory does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("original AGF path and output path cannot be the same: {}", .0.display())]
    OriginalIsOutput(PathBuf),

    #[error("original AGF directory does not exist: {}", .0.display())]
    MissingOriginalDirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One file to process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Pack only. `None` when no original AGF was found for the input.
    pub original: Option<PathBuf>,
    /// Repack only.
    pub intermediate: Option<PathBuf>,
}

/// Outcome counts of [`BatchPlan::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    /// Jobs not started because the stop token fired.
    pub skipped: usize,
}

impl BatchReport {
    /// Process exit code: the failure count, saturated to 255.
    pub fn exit_code(&self) -> u8 {
        self.failed.min(usize::from(u8::MAX)) as u8
    }
}

#[derive(Clone, Debug)]
pub struct BatchPlan {
    mode: Mode,
    file_mode: bool,
    output: PathBuf,
    jobs: Vec<Job>,
    options: PackOptions,
    limits: Option<Limits>,
}

impl BatchPlan {
    /// Resolve paths for `input`, a single file or a directory.
    ///
    /// Without `output`, file mode writes next to the input (`X.BMP`,
    /// `X.AGF`, or `X_X.AGF` for repack) and directory mode into a sibling
    /// directory (`<dir>_BMP` or `<dir>_X_AGF`). Pack's originals default to
    /// `X.AGF` beside the input file, or to the sibling directory `AGF`.
    pub fn new(
        mode: Mode,
        input: &Path,
        output: Option<&Path>,
        original: Option<&Path>,
    ) -> Result<Self, PlanError> {
        let input: PathBuf = input.components().collect();
        let file_mode = if input.is_file() {
            true
        } else if input.is_dir() {
            false
        } else {
            return Err(PlanError::MissingInput(input));
        };

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => match (mode, file_mode) {
                (Mode::Unpack, true) => replace_extension(&input, ".BMP"),
                (Mode::Pack, true) => replace_extension(&input, ".AGF"),
                (Mode::Repack, true) => replace_extension(&input, "_X.AGF"),
                (Mode::Unpack, false) => with_suffix(&input, "_BMP"),
                (Mode::Pack | Mode::Repack, false) => with_suffix(&input, "_X_AGF"),
            },
        };

        let original = match (mode, original) {
            (Mode::Pack, Some(path)) => Some(path.to_path_buf()),
            (Mode::Pack, None) if file_mode => Some(replace_extension(&input, ".AGF")),
            (Mode::Pack, None) => Some(
                input
                    .parent()
                    .map_or_else(|| PathBuf::from(AGF_EXT), |p| p.join(AGF_EXT)),
            ),
            _ => None,
        };
        if let Some(original) = &original {
            if *original == output {
                return Err(PlanError::OriginalIsOutput(output));
            }
        }

        let intermediate = (mode == Mode::Repack).then(|| match file_mode {
            true => replace_extension(&input, "_X.BMP"),
            false => with_suffix(&input, "_X_BMP"),
        });

        let jobs = if file_mode {
            vec![Job {
                input,
                output: output.clone(),
                original,
                intermediate,
            }]
        } else {
            plan_directory(
                mode,
                &input,
                &output,
                original.as_deref(),
                intermediate.as_deref(),
            )?
        };

        Ok(Self {
            mode,
            file_mode,
            output,
            jobs,
            options: PackOptions::default(),
            limits: None,
        })
    }

    pub fn with_options(mut self, options: PackOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_file_mode(&self) -> bool {
        self.file_mode
    }

    /// The output file, or the output directory in directory mode.
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Process every job, in parallel with the `multithreaded` feature.
    ///
    /// `stop` is checked before each job starts; jobs already running
    /// finish.
    pub fn run<S: Stop + Sync>(&self, stop: &S) -> BatchReport {
        let total = self.jobs.len();
        let width = total.to_string().len();
        let processed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);

        let process = |(index, job): (usize, &Job)| {
            if stop.check().is_err() {
                skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
            if total > 1 {
                log::info!(
                    "[{:0width$}/{total}] {:?}: {}",
                    index + 1,
                    self.mode,
                    job.input.display()
                );
            }
            match self.run_job(job, stop) {
                Ok(()) => {
                    processed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    log::error!("{}: {e}", job.input.display());
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        };

        #[cfg(feature = "multithreaded")]
        self.jobs.par_iter().enumerate().for_each(process);
        #[cfg(not(feature = "multithreaded"))]
        self.jobs.iter().enumerate().for_each(process);

        let report = BatchReport {
            processed: processed.into_inner(),
            failed: failed.into_inner(),
            skipped: skipped.into_inner(),
        };
        if report.skipped > 0 {
            log::warn!("stopped early, {} files not processed", report.skipped);
        }
        report
    }

    fn run_job(&self, job: &Job, stop: &dyn Stop) -> Result<(), AgfError> {
        let limits = self.limits.as_ref();
        match self.mode {
            Mode::Unpack => unpack_file(&job.input, &job.output, limits, stop).map(drop),
            Mode::Pack => {
                let original = job
                    .original
                    .as_deref()
                    .filter(|p| p.is_file())
                    .ok_or(AgfError::MissingOriginalContainer)?;
                let context = read_context(original, limits, stop)?;
                pack_file(&job.input, &context, &job.output, self.options, stop)
            }
            Mode::Repack => {
                let intermediate = job.intermediate.as_deref().ok_or_else(|| {
                    AgfError::InvalidData("repack job without an intermediate path".into())
                })?;
                repack_file(
                    &job.input,
                    intermediate,
                    &job.output,
                    self.options,
                    limits,
                    stop,
                )
            }
        }
    }
}

/// `dir/name.ext` to `dir/name<suffix>`.
fn replace_extension(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// `dir` to `dir<suffix>`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Files directly in `dir` with extension `ext` (any case), sorted.
fn list_files(dir: &Path, ext: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn stem_key(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase()
}

fn plan_directory(
    mode: Mode,
    input: &Path,
    output: &Path,
    original: Option<&Path>,
    intermediate: Option<&Path>,
) -> Result<Vec<Job>, PlanError> {
    let originals = match original {
        Some(dir) if dir.is_dir() => list_files(dir, AGF_EXT)?
            .into_iter()
            .map(|p| (stem_key(&p), p))
            .collect::<HashMap<_, _>>(),
        Some(dir) => return Err(PlanError::MissingOriginalDirectory(dir.to_path_buf())),
        None => HashMap::new(),
    };

    let files = list_files(input, mode.input_extension())?;
    let jobs = files
        .into_iter()
        .map(|file| {
            let stem = file.file_stem().unwrap_or_default();
            let named = |ext: &str| {
                let mut name = stem.to_os_string();
                name.push(".");
                name.push(ext);
                name
            };
            let original = match mode {
                Mode::Pack => {
                    let found = originals.get(&stem_key(&file)).cloned();
                    if found.is_none() {
                        log::error!("did not find an original AGF for {}", file.display());
                    }
                    found
                }
                _ => None,
            };
            Job {
                output: output.join(named(mode.output_extension())),
                intermediate: intermediate.map(|dir| dir.join(named(BMP_EXT))),
                original,
                input: file,
            }
        })
        .collect::<Vec<_>>();
    log::info!(
        "{} {} files found in {}",
        jobs.len(),
        mode.input_extension(),
        input.display()
    );
    Ok(jobs)
}
