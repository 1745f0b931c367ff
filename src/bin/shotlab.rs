use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shotlab", version)]
struct Cli {
    /// Log debug output (overrides SHOTLAB_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile one shot job and publish its color config.
    Compile(CompileArgs),
    /// Print the parsed operators of an effect file.
    Inspect(InspectArgs),
    /// Compile many shot jobs in parallel.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Shot job JSON.
    job: PathBuf,

    /// Compile and report without writing the color config.
    #[arg(long)]
    dry_run: bool,

    /// Probe `geometry.source_media` with `ffprobe` when the job gives no source size.
    #[arg(long)]
    probe: bool,

    /// Also write the JSON report here.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Effect JSON exported by the authoring tool.
    effect: PathBuf,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Shot job JSON files.
    #[arg(required = true)]
    jobs: Vec<PathBuf>,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    probe: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SHOTLAB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))
}

fn compile_job(path: &Path, probe: bool, dry_run: bool) -> anyhow::Result<shotlab::CompiledShot> {
    let job = shotlab::ShotJob::from_path(path)
        .with_context(|| format!("load job '{}'", path.display()))?;
    let ffprobe = FfprobeProbe;
    let probe: Option<&dyn shotlab::MediaProbe> = if probe { Some(&ffprobe) } else { None };
    let shot = shotlab::compile_shot(&job, probe)
        .with_context(|| format!("compile job '{}'", path.display()))?;
    if !dry_run && let Some(written) = shot.publish()? {
        eprintln!("wrote {}", written.display());
    }
    Ok(shot)
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let shot = compile_job(&args.job, args.probe, args.dry_run)?;
    let report = serde_json::to_string_pretty(&shot.report()).context("serialize report")?;
    if let Some(out) = &args.report {
        std::fs::write(out, &report)
            .with_context(|| format!("write report '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    println!("{report}");
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let graph = shotlab::EffectGraph::from_path(&args.effect)
        .with_context(|| format!("parse effect '{}'", args.effect.display()))?;
    let color = graph.color_operators()?;
    let geometry = graph.geometry_operators()?;
    let skipped: Vec<String> = graph
        .skipped
        .iter()
        .map(|s| format!("{}: {}", s.node, s.reason))
        .collect();
    let out = serde_json::json!({
        "color": color,
        "geometry": geometry,
        "skipped": skipped,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        anyhow::ensure!(n >= 1, "--threads must be >= 1");
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("build thread pool")?;

    let results: Vec<(PathBuf, anyhow::Result<shotlab::CompiledShot>)> = pool.install(|| {
        args.jobs
            .par_iter()
            .map(|job| (job.clone(), compile_job(job, args.probe, args.dry_run)))
            .collect()
    });

    let mut failed = 0usize;
    for (job, result) in &results {
        match result {
            Ok(shot) => eprintln!(
                "ok {} ({} instructions)",
                job.display(),
                shot.instructions.len()
            ),
            Err(e) => {
                failed += 1;
                eprintln!("failed {}: {e:#}", job.display());
            }
        }
    }
    anyhow::ensure!(failed == 0, "{failed} of {} jobs failed", results.len());
    Ok(())
}

/// `ffprobe`-backed [`shotlab::MediaProbe`].
struct FfprobeProbe;

impl shotlab::MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> shotlab::ShotResult<shotlab::ProbeInfo> {
        #[derive(serde::Deserialize)]
        struct ProbeTags {
            timecode: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeStream {
            codec_type: Option<String>,
            width: Option<u32>,
            height: Option<u32>,
            r_frame_rate: Option<String>,
            sample_aspect_ratio: Option<String>,
            tags: Option<ProbeTags>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            streams: Vec<ProbeStream>,
        }

        let out = std::process::Command::new("ffprobe")
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .map_err(|e| shotlab::ShotError::io(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(shotlab::ShotError::io(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
            .map_err(|e| shotlab::ShotError::parse(format!("ffprobe json parse failed: {e}")))?;
        let stream = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| shotlab::ShotError::missing_dimensions("no video stream found"))?;
        let width = stream
            .width
            .ok_or_else(|| shotlab::ShotError::missing_dimensions("missing width from ffprobe"))?;
        let height = stream
            .height
            .ok_or_else(|| shotlab::ShotError::missing_dimensions("missing height from ffprobe"))?;

        let defaults = shotlab::ProbeInfo::default();
        Ok(shotlab::ProbeInfo {
            width,
            height,
            display_width: None,
            display_height: None,
            fps: stream
                .r_frame_rate
                .as_deref()
                .and_then(|r| parse_ratio(r, '/'))
                .unwrap_or(defaults.fps),
            par: stream
                .sample_aspect_ratio
                .as_deref()
                .and_then(|r| parse_ratio(r, ':'))
                .unwrap_or(defaults.par),
            timecode: stream
                .tags
                .as_ref()
                .and_then(|t| t.timecode.clone())
                .unwrap_or(defaults.timecode),
            channels: defaults.channels,
        })
    }
}

fn parse_ratio(s: &str, sep: char) -> Option<f64> {
    let (num, den) = s.split_once(sep)?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    (den != 0.0 && num > 0.0).then(|| num / den)
}
