mod config;

use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use dialoguer::Input;

use framereel_core::collection::infrastructure::directory_collector::collect_images;
use framereel_core::document::infrastructure::docx_writer::DocxDocumentWriter;
use framereel_core::pipeline::assemble_video_use_case::{AssembleVideoUseCase, AssemblyReport};
use framereel_core::pipeline::emit_document_use_case::{EmissionReport, EmitDocumentUseCase};
use framereel_core::pipeline::pipeline_logger::LogPipelineLogger;
use framereel_core::pipeline::sample_frames_use_case::SampleFramesUseCase;
use framereel_core::shared::error::PipelineError;
use framereel_core::shared::frame_duration::FrameDuration;
use framereel_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use framereel_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use framereel_core::video::infrastructure::image_file_reader::ImageFileReader;
use framereel_core::video::infrastructure::image_file_writer::ImageFileWriter;

use config::Config;

/// Turn image folders into videos and videos into illustrated documents.
#[derive(Parser)]
#[command(name = "framereel")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory that relative inputs and outputs resolve against
    /// (default: the directory containing this executable).
    #[arg(long, global = true)]
    working_dir: Option<PathBuf>,

    /// JSON file with sample_count, video_name, document_name and codec.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Exit immediately instead of waiting for Enter.
    #[arg(long, global = true)]
    no_pause: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble the images of a directory into a video.
    Assemble {
        /// Seconds each image stays on screen (prompted for when omitted).
        #[arg(long)]
        frame_duration: Option<f64>,

        /// Directory holding the images (default: working directory).
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output video file.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Sample evenly spaced frames of a video into a Word document.
    Sample {
        /// Input video file.
        #[arg(long)]
        video: Option<PathBuf>,

        /// Output .docx file.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of frames to extract.
        #[arg(long)]
        sample_count: Option<usize>,
    },
}

#[derive(Debug, PartialEq)]
struct AssembleSettings {
    dir: PathBuf,
    output: PathBuf,
    frame_duration: Option<FrameDuration>,
    codec: String,
}

#[derive(Debug, PartialEq)]
struct SampleSettings {
    video: PathBuf,
    output: PathBuf,
    sample_count: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let pause = !cli.no_pause && std::io::stdin().is_terminal();

    let code = match run(cli) {
        Ok(status) => {
            println!("{status}");
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };

    if pause {
        wait_for_enter();
    }
    process::exit(code);
}

/// Runs the selected pipeline and returns the status line to print.
fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let working_dir = resolve_working_dir(cli.working_dir)?;
    log::debug!("Working directory: {}", working_dir.display());

    match cli.command {
        Command::Assemble {
            frame_duration,
            dir,
            output,
        } => {
            let settings = resolve_assemble(&working_dir, &config, frame_duration, dir, output)?;
            run_assemble(settings)
        }
        Command::Sample {
            video,
            output,
            sample_count,
        } => {
            let settings = resolve_sample(&working_dir, &config, video, output, sample_count)?;
            run_sample(settings)
        }
    }
}

fn run_assemble(settings: AssembleSettings) -> Result<String, Box<dyn std::error::Error>> {
    let sequence = collect_images(&settings.dir)?;

    let frame_duration = match settings.frame_duration {
        Some(duration) => duration,
        None => prompt_frame_duration()?,
    };

    let mut use_case = AssembleVideoUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(FfmpegWriter::new()),
        Box::new(LogPipelineLogger::default()),
    )
    .with_codec(settings.codec);

    let report = use_case.execute(&sequence, frame_duration, &settings.output)?;
    if !report.warnings.is_empty() {
        log::warn!("Skipped {} unreadable images", report.warnings.len());
    }
    Ok(assembly_status(&report))
}

fn assembly_status(report: &AssemblyReport) -> String {
    format!(
        "Video saved as {} ({} frames, {} skipped, {}, {})",
        report.output.display(),
        report.frames_written,
        report.warnings.len(),
        report.resolution,
        report.frame_rate
    )
}

fn run_sample(settings: SampleSettings) -> Result<String, Box<dyn std::error::Error>> {
    let mut sampler = SampleFramesUseCase::new(
        Box::new(FfmpegReader::new()),
        Box::new(LogPipelineLogger::default()),
    );
    let mut emitter = EmitDocumentUseCase::new(
        Box::new(DocxDocumentWriter::new()),
        Box::new(ImageFileWriter::new()),
        std::env::temp_dir(),
        Box::new(LogPipelineLogger::default()),
    );

    let sampled = sampler.execute(&settings.video, settings.sample_count, |sample| {
        emitter.append(sample)
    })?;
    let report = emitter.finish(&settings.output)?;

    let skipped = sampled.warnings.len() + report.warnings.len();
    if skipped > 0 {
        log::warn!("Skipped {skipped} frames");
    }
    Ok(document_status(&report, skipped))
}

/// `skipped` counts frames lost to seek or embed failures.
fn document_status(report: &EmissionReport, skipped: usize) -> String {
    format!(
        "Document saved as {} ({} frames, {} skipped)",
        report.output.display(),
        report.blocks_written,
        skipped
    )
}

fn resolve_working_dir(flag: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = match flag {
        Some(dir) => dir,
        None => std::env::current_exe()?
            .parent()
            .ok_or("Cannot determine the executable's directory")?
            .to_path_buf(),
    };
    if !dir.is_dir() {
        return Err(format!("Working directory not found: {}", dir.display()).into());
    }
    Ok(dir)
}

/// Flags win over the config file, which wins over built-in defaults.
/// Relative paths resolve against `working_dir`.
fn resolve_assemble(
    working_dir: &Path,
    config: &Config,
    frame_duration: Option<f64>,
    dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<AssembleSettings, Box<dyn std::error::Error>> {
    let frame_duration = frame_duration.map(FrameDuration::new).transpose()?;
    let dir = dir.map_or_else(|| working_dir.to_path_buf(), |d| working_dir.join(d));
    let output = working_dir.join(output.unwrap_or_else(|| PathBuf::from(&config.video_name)));

    Ok(AssembleSettings {
        dir,
        output,
        frame_duration,
        codec: config.codec.clone(),
    })
}

fn resolve_sample(
    working_dir: &Path,
    config: &Config,
    video: Option<PathBuf>,
    output: Option<PathBuf>,
    sample_count: Option<usize>,
) -> Result<SampleSettings, Box<dyn std::error::Error>> {
    let sample_count = sample_count.unwrap_or(config.sample_count);
    if sample_count == 0 {
        return Err(PipelineError::InvalidSampleCount.into());
    }
    let video = working_dir.join(video.unwrap_or_else(|| PathBuf::from(&config.video_name)));
    let output =
        working_dir.join(output.unwrap_or_else(|| PathBuf::from(&config.document_name)));

    Ok(SampleSettings {
        video,
        output,
        sample_count,
    })
}

fn prompt_frame_duration() -> Result<FrameDuration, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt("Enter the duration of each frame in seconds (e.g. 0.1 for 100 ms)")
        .validate_with(|s: &String| FrameDuration::parse(s).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;
    Ok(FrameDuration::parse(&input)?)
}

fn wait_for_enter() {
    println!("Press Enter to exit...");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
