//! Command-line interface definition for wordlist-substitute
//!
//! Provides argument parsing and validation for the variant generator.

use crate::generate::Strategy;
use crate::output::DEFAULT_BUFFER_SIZE;
use crate::processor::DEFAULT_QUEUE_SIZE;
use clap::Parser;
use std::path::PathBuf;

/// High-performance wordlist mutator for penetration testing
///
/// Expands every dictionary word into the variants reachable through one or
/// more substitution tables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wordlist-substitute",
    author = "m0h1nd4",
    version,
    about = "Generates word variations based on a substitution table",
    long_about = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                        WORDLIST-SUBSTITUTE v1.0.0                            ║
║                 Substitution-Table Wordlist Mutation                          ║
║                         For Penetration Testing                               ║
╚══════════════════════════════════════════════════════════════════════════════╝

Expands a wordlist through substitution tables (leetspeak, transliteration).
Variants are written to stdout, one per line, in no particular order.

TABLE FORMAT:
    # comment
    a=4
    a=@
    ck=x
    $HEX[3d]=$HEX[2d]      - hashcat hex notation, needed to substitute '='

MODES:
    default                - every matched span is its own substitution
    -s, --substitute-all   - one decision per pattern, applied to all its occurrences
    -r, --reverse          - most substitutions first (first replacement only)

EXAMPLES:
    # Up to 3 substitutions per word
    wordlist-substitute rockyou.txt -t leet.table -x 3

    # Merge two tables, whole-pattern substitution
    wordlist-substitute words.txt -t leet.table -t extra.table -s

    # Only heavily mutated variants, most substituted first
    wordlist-substitute words.txt -t leet.table -m 4 -x 8 -r > mutated.txt
"#,
    after_help = "For more information, visit: https://github.com/m0h1nd4/wordlist-substitute"
)]
pub struct Args {
    /// Dictionary file, one word per line
    #[arg(value_name = "DICT")]
    pub dictionary: PathBuf,

    /// Substitution table (repeatable, merged in the order given)
    #[arg(short = 't', long = "table", value_name = "PATH", required = true)]
    pub tables: Vec<PathBuf>,

    /// Minimum substitutions per variant
    #[arg(short = 'm', long = "min", value_name = "NUM", default_value_t = 1)]
    pub min: usize,

    /// Maximum substitutions per variant
    #[arg(short = 'x', long = "max", value_name = "NUM", default_value_t = 15)]
    pub max: usize,

    /// Number of threads (default: auto-detect)
    #[arg(long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Substitute whole patterns: every occurrence at once (transliteration)
    #[arg(short, long, default_value_t = false)]
    pub substitute_all: bool,

    /// Reverse direction: start from the most substitutions
    #[arg(short, long, default_value_t = false)]
    pub reverse: bool,

    /// Output buffer size (default: 1MB)
    #[arg(long, value_name = "SIZE", default_value = "1MB")]
    pub buffer_size: String,

    /// Capacity of the queue between workers and the output writer
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_QUEUE_SIZE)]
    pub queue_size: usize,

    /// Show statistics on stderr when done
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - errors only
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Generation strategy selected by the mode and direction switches
    pub fn strategy(&self) -> Strategy {
        Strategy::from_flags(self.substitute_all, self.reverse)
    }

    /// Worker count, defaulting to the number of CPUs
    pub fn get_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }

    /// Parse buffer size string to bytes
    pub fn parse_buffer_size(&self) -> anyhow::Result<usize> {
        let size = parse_size(&self.buffer_size)?;
        Ok(if size == 0 { DEFAULT_BUFFER_SIZE } else { size })
    }
}

/// Parse human-readable size string to bytes
fn parse_size(size_str: &str) -> anyhow::Result<usize> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    Ok(num * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["wordlist-substitute", "dict.txt", "-t", "leet.table"]).unwrap();

        assert_eq!(args.dictionary, PathBuf::from("dict.txt"));
        assert_eq!(args.tables, vec![PathBuf::from("leet.table")]);
        assert_eq!(args.min, 1);
        assert_eq!(args.max, 15);
        assert_eq!(args.queue_size, DEFAULT_QUEUE_SIZE);
        assert_eq!(args.strategy(), Strategy::Forward);
        assert!(args.get_threads() >= 1);
        assert_eq!(args.parse_buffer_size().unwrap(), 1024 * 1024);
    }

    #[test]
    fn test_multiple_tables_and_modes() {
        let args = Args::try_parse_from([
            "wordlist-substitute",
            "dict.txt",
            "-t",
            "a.table",
            "--table",
            "b.table",
            "-s",
            "-r",
            "-m",
            "2",
            "-x",
            "4",
            "--threads",
            "3",
        ])
        .unwrap();

        assert_eq!(args.tables, vec![PathBuf::from("a.table"), PathBuf::from("b.table")]);
        assert_eq!(args.strategy(), Strategy::SubstituteAllReverse);
        assert_eq!((args.min, args.max), (2, 4));
        assert_eq!(args.get_threads(), 3);
    }

    #[test]
    fn test_required_arguments() {
        assert!(Args::try_parse_from(["wordlist-substitute", "dict.txt"]).is_err());
        assert!(Args::try_parse_from(["wordlist-substitute", "-t", "leet.table"]).is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64MB").unwrap(), 64 * 1024 * 1024);
        assert_eq!(parse_size("8GB").unwrap(), 8 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1024KB").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert!(parse_size("lots").is_err());
    }
}
