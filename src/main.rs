//! quoteforge – command-line Markdown quote → PDF converter.
//!
//! If `output.pdf` is omitted the PDF is written next to the input file with
//! the same stem (e.g. `acme.md` → `acme.pdf`).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use quote_forge::assets::{AssetLoader, FsAssetLoader};
use quote_forge::catalog;
use quote_forge::fonts::FontAsset;
use quote_forge::page::pages_to_json;
use quote_forge::pipeline::{generate_html, generate_pdf, ExportJob};
use quote_forge::template::{ExportConfig, Orientation, PageSize, Quality, TemplateConfig};

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A4,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum QualityArg {
    Draft,
    Standard,
    High,
}

#[derive(Parser)]
#[command(name = "quoteforge")]
#[command(version, about = "Markdown quote to PDF converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    quoteforge quote.md                          Write quote.pdf next to the input
    quoteforge quote.md out.pdf --page-size letter --landscape
    quoteforge quote.md --font Inter=Inter.ttf --font Inter=Inter-Bold.ttf:bold")]
struct Cli {
    /// Markdown input with optional frontmatter
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output path (default: same stem as input with .pdf)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Template JSON file (camelCase keys, missing keys use the default template)
    #[arg(long, value_name = "JSON")]
    template: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Use landscape page orientation
    #[arg(short, long)]
    landscape: bool,

    /// Raster budget for the logo
    #[arg(long, value_enum, default_value = "standard")]
    quality: QualityArg,

    /// Leave the issue date out of the header and cover
    #[arg(long)]
    no_date: bool,

    /// Quote number shown in the header and cover badge
    #[arg(long, conflicts_with = "sequence")]
    quote_number: Option<String>,

    /// Build the quote number from the template prefix, e.g. 7 → BR-0007
    #[arg(long)]
    sequence: Option<u32>,

    /// Issue date (YYYY-MM-DD); no date lines are drawn without it
    #[arg(long, value_name = "DATE")]
    issued: Option<NaiveDate>,

    /// Logo as a file path or base64 data URI (default: the template's logoUrl)
    #[arg(long)]
    logo: Option<String>,

    /// Embed a font face: FAMILY=PATH with an optional :bold, :italic or :bold-italic suffix
    #[arg(long = "font", value_name = "FAMILY=PATH", value_parser = parse_font_arg)]
    fonts: Vec<FontArg>,

    /// Comma separated case study ids for the showcase pages
    #[arg(long, value_delimiter = ',')]
    case_studies: Vec<String>,

    /// Use the default case study selection
    #[arg(long, conflicts_with = "case_studies")]
    default_case_studies: bool,

    /// Also write the page layout as JSON
    #[arg(long, value_name = "PATH")]
    layout_json: Option<PathBuf>,

    /// Also write an HTML preview
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct FontArg {
    family: String,
    path: PathBuf,
    bold: bool,
    italic: bool,
}

fn parse_font_arg(value: &str) -> Result<FontArg, String> {
    let (family, rest) = value
        .split_once('=')
        .ok_or_else(|| format!("expected FAMILY=PATH, got {value:?}"))?;
    let (path, bold, italic) = match rest.rsplit_once(':') {
        Some((path, "bold")) => (path, true, false),
        Some((path, "italic")) => (path, false, true),
        Some((path, "bold-italic")) => (path, true, true),
        _ => (rest, false, false),
    };
    if family.trim().is_empty() || path.is_empty() {
        return Err(format!("expected FAMILY=PATH, got {value:?}"));
    }
    Ok(FontArg {
        family: family.trim().to_string(),
        path: PathBuf::from(path),
        bold,
        italic,
    })
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("reading '{}': {e}", path.display()))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| format!("creating output directory: {e}"))?;
        }
    }
    fs::write(path, contents).map_err(|e| format!("writing '{}': {e}", path.display()))
}

fn run(cli: Cli) -> Result<(), String> {
    let markdown = read_text(&cli.input)?;

    let template = match &cli.template {
        Some(path) => TemplateConfig::from_json(&read_text(path)?).map_err(|e| e.to_string())?,
        None => TemplateConfig::default(),
    };

    let stem = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("quote")
        .to_string();
    let quote_number = match (cli.quote_number, cli.sequence) {
        (Some(number), _) => number,
        (None, Some(seq)) => template.quote_number(seq),
        (None, None) => String::new(),
    };
    let export = ExportConfig {
        page_size: match cli.page_size {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        },
        orientation: if cli.landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        },
        filename: stem,
        quality: match cli.quality {
            QualityArg::Draft => Quality::Draft,
            QualityArg::Standard => Quality::Standard,
            QualityArg::High => Quality::High,
        },
        include_date: !cli.no_date,
        quote_number,
        issued_on: cli.issued,
    };

    // Relative asset paths resolve against the input's directory.
    let base = cli
        .input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let loader = FsAssetLoader::new(base);

    let mut job = ExportJob::new(template, export);
    job.logo = cli.logo.as_deref().and_then(|l| loader.load(l));
    if cli.logo.is_none() {
        job.load_logo(&loader);
    }
    for font in &cli.fonts {
        match fs::read(&font.path) {
            Ok(bytes) => job.fonts.push(FontAsset {
                family: font.family.clone(),
                bold: font.bold,
                italic: font.italic,
                bytes,
            }),
            Err(e) => log::warn!("Skipping font {} — {e}", font.path.display()),
        }
    }
    job.case_studies = if cli.default_case_studies {
        catalog::by_ids(&catalog::default_ids())
    } else {
        catalog::by_ids(&cli.case_studies)
    };

    let output = cli.output.unwrap_or_else(|| {
        cli.input
            .with_file_name(job.export.output_filename())
    });

    if let Some(path) = &cli.html {
        write_file(path, generate_html(&markdown, &job).as_bytes())?;
    }

    let export = generate_pdf(&markdown, job).map_err(|e| e.to_string())?;

    if let Some(path) = &cli.layout_json {
        let json = pages_to_json(&export.pages).map_err(|e| e.to_string())?;
        write_file(path, json.as_bytes())?;
    }
    write_file(&output, &export.pdf)?;

    let pages = export.pages.len();
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        export.pdf.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
    Ok(())
}
