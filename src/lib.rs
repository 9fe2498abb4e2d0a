//! # Wordlist Substitute
//!
//! High-performance wordlist mutation through substitution tables.
//!
//! ## Features
//!
//! - **Substitution tables**: `KEY=VALUE` lines, multi-byte patterns, hashcat
//!   `$HEX[...]` notation, several tables merged in order
//! - **Occurrence-level mode**: every matched span is an independent choice
//! - **Pattern-level mode**: one choice per pattern, applied to all occurrences
//! - **Forward / reverse order**: fewest or most substitutions first
//! - **Parallel processing**: bounded worker pool with a single buffered writer
//!
//! ## Usage
//!
//! ```bash
//! # Up to 3 substitutions per word
//! wordlist-substitute wordlist.txt -t leet.table -x 3
//!
//! # Whole-pattern substitution, most substituted first
//! wordlist-substitute wordlist.txt -t leet.table -s -r
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wordlist_substitute::generate::{Bounds, Strategy};
//! use wordlist_substitute::table::SubstitutionTable;
//!
//! let mut table = SubstitutionTable::new();
//! table.insert("o", "0");
//!
//! let variants = Strategy::Forward.collect(b"foo", &table, Bounds::new(1, 2));
//! assert_eq!(variants, vec![b"f0o".to_vec(), b"f00".to_vec(), b"fo0".to_vec()]);
//!
//! let variants = Strategy::SubstituteAll.collect(b"foo", &table, Bounds::new(1, 1));
//! assert_eq!(variants, vec![b"f00".to_vec()]);
//! ```

pub mod cli;
pub mod combinations;
pub mod generate;
pub mod matcher;
pub mod output;
pub mod processor;
pub mod progress;
pub mod table;
pub mod wordlist;

pub use cli::Args;
pub use generate::{Bounds, Strategy};
pub use processor::{Processor, ProcessorConfig};
pub use table::SubstitutionTable;
