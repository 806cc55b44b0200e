use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::mpsc;
use webp_assets::config::{self, PipelineConfig};
use webp_assets::{convert, optimize, output, rewrite, transparent};

#[derive(Parser)]
#[command(name = "webp-assets")]
#[command(about = "PNG → WebP asset pipeline for static sites")]
#[command(long_about = "\
PNG → WebP asset pipeline for static sites

Every tool works on the files directly inside one directory (default: the
current one). Run them in order:

  webp-assets convert               *.png → webp/*.webp (transparency flattened)
  webp-assets convert-transparent   one PNG → WebP with alpha kept
  webp-assets optimize              shrink *.webp above the size budget, in place
  webp-assets rewrite-refs          src=\"x.png\" → src=\"x.webp\" in *.html

Defaults: quality 85, size budget 0.3 MB, output directory webp/.
Settings can be overridden in webp-assets.toml (see 'webp-assets gen-config')
or per run with flags.

Per-file failures are reported and skipped; the exit status stays 0.")]
#[command(version)]
struct Cli {
    /// Directory to scan
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every PNG to WebP, flattening transparency onto white
    Convert {
        /// Lossy WebP quality (0-100)
        #[arg(long)]
        quality: Option<u32>,
        /// Output subdirectory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Convert one PNG to WebP, keeping its alpha channel
    ConvertTransparent {
        /// Source PNG (default from config: "CALL ME.png")
        input: Option<PathBuf>,
        /// Destination (default: input with a .webp extension)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Lossy WebP quality (0-100)
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Downscale WebP files above the size budget, in place
    Optimize {
        /// Size budget in MB
        #[arg(long)]
        max_size_mb: Option<f64>,
        /// Lossy WebP quality (0-100)
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Point HTML src attributes at existing .webp files
    RewriteRefs,
    /// Print a stock webp-assets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut pipeline = config::load_config(&cli.dir)?;
    apply_overrides(&mut pipeline, &cli.command);
    pipeline.validate()?;

    match cli.command {
        Command::Convert { .. } => {
            output::print_banner("PNG → WebP batch conversion");
            let (tx, rx) = mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_convert_event(&event);
                }
            });
            let result = convert::convert_directory(&cli.dir, &pipeline.convert, Some(tx));
            printer.join().unwrap();
            match result {
                Ok(report) => output::print_conversion_report(report.as_ref()),
                Err(e) => output::print_tool_error("convert", &e),
            }
        }
        Command::ConvertTransparent { .. } => {
            output::print_banner("Transparent PNG → WebP conversion");
            let result = transparent::convert_transparent(&cli.dir, &pipeline.transparent);
            output::print_transparent_result(&result);
        }
        Command::Optimize { .. } => {
            let (tx, rx) = mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_optimize_event(&event);
                }
            });
            let result = optimize::optimize_directory(&cli.dir, &pipeline.optimize, Some(tx));
            printer.join().unwrap();
            if let Err(e) = result {
                output::print_tool_error("optimize", &e);
            }
        }
        Command::RewriteRefs => {
            output::print_banner("HTML reference rewrite");
            let (tx, rx) = mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_rewrite_event(&event);
                }
            });
            let result = rewrite::rewrite_directory(&cli.dir, &pipeline.rewrite, Some(tx));
            printer.join().unwrap();
            match result {
                Ok(report) => {
                    output::print_rewrite_report(report.as_ref(), &pipeline.rewrite.backup_suffix)
                }
                Err(e) => output::print_tool_error("rewrite-refs", &e),
            }
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Layer command-line flags over the loaded config.
fn apply_overrides(pipeline: &mut PipelineConfig, command: &Command) {
    match command {
        Command::Convert {
            quality,
            output_dir,
        } => pipeline
            .convert
            .apply_overrides(*quality, output_dir.clone()),
        Command::ConvertTransparent {
            input,
            output,
            quality,
        } => pipeline
            .transparent
            .apply_overrides(input.clone(), output.clone(), *quality),
        Command::Optimize {
            max_size_mb,
            quality,
        } => pipeline.optimize.apply_overrides(*max_size_mb, *quality),
        Command::RewriteRefs | Command::GenConfig => {}
    }
}
