use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use csv2anki::{parse_delimiter, BatchSize, Config, TextEncoding, DEFAULT_DECK_NAME};
use log::{debug, LevelFilter};
use std::path::PathBuf;
use std::time::Instant;

/// Convert a CSV of words with readings into Anki decks.
///
/// Decks are split into batches of at most 10000 cards by default, the
/// largest deck jpdb will import.
#[derive(Parser, Debug)]
#[command(name = "csv2anki", version, about)]
struct Cli {
    /// Path to input csv file
    #[arg(default_value = "words.csv")]
    input_file: PathBuf,

    /// Word column name
    #[arg(short, long, default_value = "word")]
    word: String,

    /// Reading column name
    #[arg(short, long, default_value = "reading")]
    reading: String,

    /// Field delimiter. Use 'tab' or '\t' for a tab
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// Max cards per deck; 0 puts everything into a single deck
    #[arg(short, long = "batch-size", default_value_t = 10_000)]
    batch_size: usize,

    /// Output file name; the batch index is inserted before the extension
    #[arg(
        short = 'o',
        long = "output_file",
        visible_alias = "output-file",
        default_value = "output.apkg"
    )]
    output_file: String,

    /// Output directory, created if missing
    #[arg(
        short = 'O',
        long = "output_dir",
        short_alias = 'D',
        visible_alias = "output-dir",
        default_value = "output"
    )]
    output_dir: PathBuf,

    /// Deck title shown in Anki
    #[arg(long, default_value = DEFAULT_DECK_NAME)]
    deck_name: String,

    /// Input text encoding
    #[arg(long, value_enum, default_value_t = EncodingArg::Utf8)]
    encoding: EncodingArg,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum EncodingArg {
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    #[value(name = "utf-8-lossy")]
    Utf8Lossy,
}

impl From<EncodingArg> for TextEncoding {
    fn from(value: EncodingArg) -> TextEncoding {
        match value {
            EncodingArg::Utf8 => TextEncoding::Utf8,
            EncodingArg::Utf8Lossy => TextEncoding::Utf8Lossy,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Config> {
        let delimiter = parse_delimiter(&cli.delimiter)?;
        Ok(Config {
            input: cli.input_file,
            word_column: cli.word,
            reading_column: cli.reading,
            delimiter,
            encoding: cli.encoding.into(),
            batch_size: BatchSize::from_count(cli.batch_size),
            output_file: cli.output_file,
            output_dir: cli.output_dir,
            deck_name: cli.deck_name,
            verbose: cli.debug,
        })
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    init_logging(cli.debug);
    debug!("{:?}", cli);

    let config = Config::try_from(cli)?;

    let summary = csv2anki::run(&config)
        .with_context(|| format!("Failed to convert {}", config.input.display()))?;

    println!(
        "✓ {} records -> {} decks ({} cards) [{:.2}s]",
        summary.record_count,
        summary.decks.len(),
        summary.card_count(),
        start_time.elapsed().as_secs_f64()
    );
    for deck in &summary.decks {
        println!("  {}  ({} cards)", deck.path.display(), deck.card_count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> Config {
        let cli = Cli::try_parse_from(args).unwrap();
        Config::try_from(cli).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&["csv2anki"]);
        assert_eq!(config.input, PathBuf::from("words.csv"));
        assert_eq!(config.word_column, "word");
        assert_eq!(config.reading_column, "reading");
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.batch_size, BatchSize::from_count(10_000));
        assert_eq!(config.output_file, "output.apkg");
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.deck_name, "Word/Reading");
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert!(!config.verbose);
    }

    #[test]
    fn test_short_flags() {
        let config = config_from(&[
            "csv2anki", "vocab.tsv", "-w", "kanji", "-r", "kana", "-d", "tab", "-b", "0", "-o",
            "deck.apkg", "-O", "decks", "--debug",
        ]);
        assert_eq!(config.input, PathBuf::from("vocab.tsv"));
        assert_eq!(config.word_column, "kanji");
        assert_eq!(config.reading_column, "kana");
        assert_eq!(config.delimiter, b'\t');
        assert_eq!(config.batch_size, BatchSize::Unbounded);
        assert_eq!(config.output_file, "deck.apkg");
        assert_eq!(config.output_dir, PathBuf::from("decks"));
        assert!(config.verbose);
    }

    #[test]
    fn test_output_dir_aliases() {
        for args in [
            ["csv2anki", "-D", "decks"],
            ["csv2anki", "--output_dir", "decks"],
            ["csv2anki", "--output-dir", "decks"],
        ] {
            assert_eq!(config_from(&args).output_dir, PathBuf::from("decks"));
        }
    }

    #[test]
    fn test_escaped_tab_delimiter() {
        let config = config_from(&["csv2anki", "--delimiter", "\\t"]);
        assert_eq!(config.delimiter, b'\t');
    }

    #[test]
    fn test_multi_byte_delimiter_rejected() {
        let cli = Cli::try_parse_from(["csv2anki", "-d", "::"]).unwrap();
        assert!(Config::try_from(cli).is_err());
    }
}
