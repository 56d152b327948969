// SPDX-License-Identifier: MPL-2.0
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clipcut::app::{config, Selection, Session};
use clipcut::domain::{ExportFormat, ExportQuality};
use clipcut::error::{AccessError, Result};
use clipcut::format::{format_file_size, format_time};
use clipcut::infrastructure::{init_ffmpeg, FfmpegFrameSource};
use clipcut::media::{placeholder, VideoDescriptor};

const HELP: &str = "\
clipcut - browse, trim and export video clips

USAGE:
  clipcut [OPTIONS] <DIRECTORY>

OPTIONS:
  --config-dir <DIR>        Read settings.toml from DIR
  --thumbnails <DIR>        Write one JPEG thumbnail per clip into DIR
  --select <NAME>           Open the clip with this file name
  --yes                     Open large clips without asking
  --trim <START>:<END>      Trim range in milliseconds
  --quality <QUALITY>       light, medium or strong
  --format <FORMAT>         mp4 or gif
  --export                  Run the export of the selected clip
  --diagnostics <FILE>      Write a JSON diagnostics report
  -h, --help                Print this help
";

struct Args {
    directory: PathBuf,
    config_dir: Option<PathBuf>,
    thumbnails: Option<PathBuf>,
    select: Option<String>,
    yes: bool,
    trim: Option<(f64, f64)>,
    quality: Option<ExportQuality>,
    format: Option<ExportFormat>,
    export: bool,
    diagnostics: Option<PathBuf>,
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let parsed = Args {
        config_dir: args.opt_value_from_str("--config-dir")?,
        thumbnails: args.opt_value_from_str("--thumbnails")?,
        select: args.opt_value_from_str("--select")?,
        yes: args.contains("--yes"),
        trim: args.opt_value_from_fn("--trim", parse_trim)?,
        quality: args.opt_value_from_str("--quality")?,
        format: args.opt_value_from_str("--format")?,
        export: args.contains("--export"),
        diagnostics: args.opt_value_from_str("--diagnostics")?,
        directory: args.free_from_str()?,
    };
    let rest = args.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {rest:?}"),
        });
    }
    Ok(Some(parsed))
}

fn parse_trim(value: &str) -> std::result::Result<(f64, f64), String> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| format!("expected <START>:<END>, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid trim bound '{s}': {e}"))
    };
    Ok((parse(start)?, parse(end)?))
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_ffmpeg() {
        eprintln!("An error occurred: {e}");
        return ExitCode::FAILURE;
    }

    let (config, warning) = config::load_with_override(args.config_dir.clone());
    if let Some(warning) = warning {
        eprintln!("warning: {warning}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("An error occurred: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(config, Arc::new(FfmpegFrameSource::new()));
    let outcome = runtime.block_on(run(&mut session, &args));
    if let Err(e) = &outcome {
        session.report_unexpected(e);
    }
    print_notifications(&session);

    if let Some(path) = &args.diagnostics {
        match session.export_diagnostics(path) {
            Ok(written) => println!("Diagnostics written to {}", written.display()),
            Err(e) => eprintln!("An error occurred: {e}"),
        }
    }

    if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(session: &mut Session, args: &Args) -> Result<()> {
    session
        .open_library(&args.directory, |done, total| {
            eprint!("\rGenerating thumbnails {done}/{total}");
            if done == total {
                eprintln!();
            }
        })
        .await?;
    print_notifications(session);
    print_library(&session.store().state().video_library);

    if let Some(dir) = &args.thumbnails {
        write_thumbnails(session, dir)?;
    }

    let Some(name) = &args.select else {
        return Ok(());
    };
    let index = session
        .store()
        .state()
        .video_library
        .iter()
        .position(|video| &video.name == name)
        .ok_or_else(|| AccessError::NotFound(args.directory.join(name)))?;

    let selection = session.select_video(index, |_| args.yes).await?;
    print_notifications(session);
    match selection {
        Selection::Selected => {}
        Selection::Blocked => return Ok(()),
        Selection::Declined => {
            println!("Skipped {name}; pass --yes to open large clips");
            return Ok(());
        }
    }

    if let Some(quality) = args.quality {
        session.store_mut().set_export_quality(quality)?;
    }
    if let Some(format) = args.format {
        session.store_mut().set_export_format(format)?;
    }
    if let Some((start, end)) = args.trim {
        session.set_trim_range(start, end)?;
    }

    let state = session.store().state();
    println!(
        "Trim {} - {} of {}, {} {}: about {}",
        format_time(state.trim_range.start),
        format_time(state.trim_range.end),
        format_time(state.playback.duration),
        state.export_settings.quality,
        state.export_settings.format,
        format_file_size(state.export_settings.estimated_size),
    );

    if args.export {
        let summary = session.export().await?;
        println!(
            "Exported {} ({}, {}) about {}",
            summary.file_name,
            summary.quality,
            summary.format,
            format_file_size(summary.estimated_size),
        );
    }
    Ok(())
}

fn print_library(videos: &[VideoDescriptor]) {
    for (index, video) in videos.iter().enumerate() {
        println!(
            "{index:>3}  {:<8} {:>10}  {:>8}  {:<10} {}{}",
            video.tier().label(),
            video.size_formatted,
            format_time(video.duration_ms),
            video.resolution(),
            video.name,
            if video.thumbnail.is_some() { "" } else { "  (no thumbnail)" },
        );
    }
}

fn write_thumbnails(session: &Session, dir: &Path) -> Result<()> {
    let settings = session.thumbnails().settings();
    for video in &session.store().state().video_library {
        let stem = video
            .path
            .file_stem()
            .map_or_else(|| video.name.clone(), |s| s.to_string_lossy().into_owned());
        let target = dir.join(format!("{stem}.jpg"));
        match &video.thumbnail {
            Some(thumbnail) => thumbnail.write_to(&target)?,
            None => placeholder(settings.width, settings.height, settings.quality)?
                .write_to(&target)?,
        }
    }
    println!("Thumbnails written to {}", dir.display());
    Ok(())
}

fn print_notifications(session: &Session) {
    for notification in session.notifications().borrow_mut().drain() {
        eprintln!("{notification}");
    }
}
