//! docx2mdx CLI - dataset template conversion tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use docx2mdx::{ColorMode, Docx2Mdx, JsonFormat};

const DEFAULT_OUTPUT_DIR: &str = "markdown";

#[derive(Parser)]
#[command(name = "docx2mdx")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert structured DOCX dataset templates to MDX", long_about = None)]
struct Cli {
    /// Input DOCX file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Color encoding for legend stops
    #[arg(long, value_enum, default_value = "hex")]
    color_mode: ColorArg,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert DOCX to a .data.mdx file
    Convert {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Color encoding for legend stops
        #[arg(long, value_enum, default_value = "hex")]
        color_mode: ColorArg,

        /// Skip the spatial/temporal summary block
        #[arg(long)]
        no_summary: bool,
    },

    /// Print only the YAML front matter
    #[command(alias = "fm")]
    Frontmatter {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Color encoding for legend stops
        #[arg(long, value_enum, default_value = "hex")]
        color_mode: ColorArg,
    },

    /// Dump the extracted record as JSON
    Json {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    /// #RRGGBB
    Hex,
    /// rgb(r,g,b)
    Rgb,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Hex => ColorMode::Hex,
            ColorArg::Rgb => ColorMode::Rgb,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            color_mode,
            no_summary,
        }) => cmd_convert(&input, output.as_deref(), color_mode, no_summary),
        Some(Commands::Frontmatter {
            input,
            output,
            color_mode,
        }) => cmd_frontmatter(&input, output.as_deref(), color_mode),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        None => {
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), cli.color_mode, false)
            } else {
                println!("{}", "Usage: docx2mdx <FILE> [OUTPUT]".yellow());
                println!("       docx2mdx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// `dataset.docx` in `markdown/` becomes `markdown/dataset.data.mdx`.
fn derive_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.data.mdx", stem))
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    color_mode: ColorArg,
    no_summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let doc = Docx2Mdx::new()
        .with_color_mode(color_mode.into())
        .with_summary(!no_summary)
        .parse(input)?;

    // Render fully before touching the file system; a failed conversion
    // must leave no partial output behind.
    let mdx = doc.to_mdx()?;

    fs::create_dir_all(&output_dir)?;
    let output_path = derive_output_path(input, &output_dir);
    fs::write(&output_path, &mdx)?;

    let record = doc.record();
    println!(
        "{} {} ({} layer{}, {} prose block{})",
        "Converted".green().bold(),
        output_path.display(),
        record.layer_count(),
        if record.layer_count() == 1 { "" } else { "s" },
        record.prose_count(),
        if record.prose_count() == 1 { "" } else { "s" },
    );

    Ok(())
}

fn cmd_frontmatter(
    input: &Path,
    output: Option<&Path>,
    color_mode: ColorArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Docx2Mdx::new()
        .with_color_mode(color_mode.into())
        .parse(input)?;
    let front_matter = doc.to_front_matter()?;

    if let Some(path) = output {
        fs::write(path, &front_matter)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", front_matter);
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Docx2Mdx::new().parse(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = doc.to_json(format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Docx2Mdx::new().parse(input)?;
    let record = doc.record();

    println!("{}", "Dataset Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Id".bold(), record.info.id);
    println!("{}: {}", "Name".bold(), record.info.name);
    println!("{}: {}", "Layers".bold(), record.layer_count());
    for layer in &record.layers {
        println!(
            "  {} {} ({}, {} stop{})",
            "├─".dimmed(),
            layer.id,
            layer.stac_col,
            layer.legend.stops.len(),
            if layer.legend.stops.len() == 1 { "" } else { "s" },
        );
    }
    println!("{}: {}", "Prose blocks".bold(), record.prose_count());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path() {
        let path = derive_output_path(
            Path::new("docs/lis-alaska-nrt.docx"),
            Path::new("markdown"),
        );
        assert_eq!(path, PathBuf::from("markdown/lis-alaska-nrt.data.mdx"));
    }

    #[test]
    fn test_derive_output_path_no_extension() {
        let path = derive_output_path(Path::new("dataset"), Path::new("out"));
        assert_eq!(path, PathBuf::from("out/dataset.data.mdx"));
    }

    #[test]
    fn test_convert_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.docx");
        fs::write(&input, b"not a docx").unwrap();

        let out_dir = dir.path().join("markdown");
        let result = cmd_convert(&input, Some(&out_dir), ColorArg::Hex, false);
        assert!(result.is_err());
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_color_arg_conversion() {
        assert_eq!(ColorMode::from(ColorArg::Hex), ColorMode::Hex);
        assert_eq!(ColorMode::from(ColorArg::Rgb), ColorMode::Rgb);
    }
}
