use clap::Parser;
use log::LevelFilter;
use xdxf_reader::xdxf::utils;
use xdxf_reader::{convert, ConvertOptions, MemorySink, SourceMeta, XdxfReader};

/// Convert an XDXF dictionary into keyed HTML articles.
#[derive(Debug, Parser)]
#[command(name = "xdxf-reader", version, about)]
struct Cli {
    /// XDXF file name, `.tar`/`.tar.gz` archive holding `dict.xdxf`, or `-` for stdin
    input_file: String,

    /// Do not include article key in rendered article: some XDXF
    /// dictionaries already include the title in article text and need this
    /// to avoid title duplication
    #[arg(long)]
    skip_article_title: bool,

    /// Remove new line characters from article text
    #[arg(long)]
    remove_newline: bool,

    /// Value for the created.by tag (e.g. name or email of the creator)
    #[arg(short = 'a', long, default_value = "")]
    created_by: String,

    /// Value for the license.name tag
    #[arg(long, default_value = "")]
    license_name: String,

    /// Value for the license.url tag
    #[arg(long, default_value = "")]
    license_url: String,

    /// Number of sample keys to print
    #[arg(short = 'n', long, default_value_t = 10)]
    sample: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = ConvertOptions::default()
        .with_skip_article_title(cli.skip_article_title)
        .with_remove_newline(cli.remove_newline);
    let meta = SourceMeta {
        source: utils::source_name(&cli.input_file),
        created_by: cli.created_by.clone(),
        license_name: cli.license_name.clone(),
        license_url: cli.license_url.clone(),
    };

    println!("Reading XDXF dictionary: {}", cli.input_file);
    println!("{}", "=".repeat(60));

    let mut sink = MemorySink::new();
    let result = XdxfReader::open(&cli.input_file, options)
        .and_then(|reader| convert(reader, &mut sink, &meta));

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("\nERROR: Failed to convert XDXF dictionary");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let tag = |name: &str| sink.tag_value(name).unwrap_or_default().to_string();

    println!("\nDictionary Information:");
    println!("  Label: {}", tag("label"));
    println!("  URI: {}", tag("uri"));
    println!("  Languages: {} -> {}", tag("lang_from"), tag("lang_to"));
    println!("  Source: {}", tag("source"));

    println!("\nStatistics:");
    println!("  Articles: {}", summary.articles);
    println!("  Skipped (no title): {}", summary.skipped);
    println!("  Total keys: {}", sink.key_count());

    let keys: Vec<&String> = sink.contents().iter().flat_map(|c| &c.keys).collect();
    println!("\nSample Keys (first {}):", cli.sample);
    for (i, key) in keys.iter().take(cli.sample).enumerate() {
        println!("  {}. {}", i + 1, key);
    }
    if keys.len() > cli.sample {
        println!("  ... and {} more", keys.len() - cli.sample);
    }
}
