use clap::{Parser, Subcommand};
use static_gallery::config::{self, ConfigError, Overrides};
use static_gallery::imaging::ResizeFilter;
use static_gallery::output::{ConsoleReporter, print_scan_output};
use static_gallery::pipeline::{self, BuildOptions, GalleryError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "static-gallery")]
#[command(about = "Static picture gallery builder")]
#[command(long_about = "\
Static picture gallery builder

Turns a directory of pictures into a browsable gallery: resized display
images, thumbnails, background images, and a copy of an HTML template with
a JSON manifest spliced into its index.html.

Input structure:

  gallery/
  ├── bg1.jpg          # Backgrounds (loose files, shared by all collections)
  ├── bg2.jpg
  └── trip/            # Collection (title = folder name)
      ├── a.jpg        # Pictures (.jpg / .jpeg, any case)
      └── c.jpeg

Output structure:

  out/
  ├── b/0.jpg          # Backgrounds
  ├── c0/0.jpg         # Original copy
  ├── c0/0-p.jpg       # Display size
  ├── c0/0-t.jpg       # Thumbnail
  └── index.html       # Template with the manifest spliced in

Run 'static-gallery gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Flags that override the config file.
#[derive(clap::Args, Clone)]
struct ImageArgs {
    /// Thumbnail bounding box, WIDTHxHEIGHT
    #[arg(long, value_name = "WxH")]
    thumb_size: Option<String>,
    /// Display bounding box, WIDTHxHEIGHT
    #[arg(long, value_name = "WxH")]
    display_size: Option<String>,
    /// Background bounding box, WIDTHxHEIGHT
    #[arg(long, value_name = "WxH")]
    background_size: Option<String>,
    /// JPEG quality, 1-100
    #[arg(long)]
    quality: Option<u32>,
    /// Resampling filter: lanczos3, gaussian, nearest, cubic or linear
    #[arg(long)]
    filter: Option<ResizeFilter>,
    /// Use picture file names as titles
    #[arg(long)]
    image_name_titles: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build the gallery: resize pictures, copy the template, splice the manifest
    Build {
        /// Output directory (must be absent or empty)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Template directory containing index.html
        #[arg(long)]
        template: Option<PathBuf>,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Inline stylesheets and scripts and strip comments in index.html
        #[arg(long)]
        optimize: bool,
        #[command(flatten)]
        images: ImageArgs,
        /// Input directory
        input: Vec<PathBuf>,
    },
    /// Validate the input directory without building
    Check {
        /// Also require this output directory to be absent or empty
        #[arg(long)]
        output: Option<PathBuf>,
        /// Input directory
        input: Vec<PathBuf>,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("ERROR: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), GalleryError> {
    match cli.command {
        Command::Build {
            output,
            template,
            config: config_path,
            optimize,
            images,
            input,
        } => {
            let input = single_input(input)?;
            let output = output.ok_or(ConfigError::MissingOutput)?;
            let template = template.ok_or(ConfigError::MissingTemplate)?;

            let mut gallery_config = config::load_config(config_path.as_deref())?;
            gallery_config.apply(&Overrides {
                thumbnail: images.thumb_size,
                display: images.display_size,
                background: images.background_size,
                quality: images.quality,
                filter: images.filter,
                titles_from_filenames: images.image_name_titles,
                optimize,
            })?;
            gallery_config.validate()?;

            println!("==> Building {} \u{2192} {}", input.display(), output.display());
            let options = BuildOptions {
                input,
                output,
                template,
                config: gallery_config,
            };
            let report = pipeline::build(&options, &mut ConsoleReporter)?;
            println!(
                "==> Build complete: {} collections, {} pictures",
                report.collections.len(),
                report.input.picture_count()
            );
        }
        Command::Check { output, input } => {
            let input = single_input(input)?;
            println!("==> Checking {}", input.display());
            let gallery = pipeline::check(&input, output.as_deref())?;
            print_scan_output(&gallery);
            println!("==> Input is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn single_input(mut inputs: Vec<PathBuf>) -> Result<PathBuf, ConfigError> {
    match inputs.len() {
        1 => Ok(inputs.remove(0)),
        n => Err(ConfigError::InputCount(n)),
    }
}
