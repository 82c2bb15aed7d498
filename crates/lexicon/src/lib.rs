//! # WordPack Lexicon
//!
//! Decides which candidate terms pulled out of an imported article are worth a
//! word pack. Closed-class words, elementary vocabulary and interjections are
//! dropped; domain/academic terms and multi-word compounds are kept.
//!
//! ```rust
//! use wordpack_lexicon::LexicalFilter;
//!
//! let filter = LexicalFilter::new();
//! let kept = filter.filter(&["hello", "mitigate", "supply chain"]);
//! assert_eq!(kept, vec!["mitigate", "supply chain"]);
//! ```
//!
//! Classification is set membership over an in-process dictionary. There is no
//! frequency data and no external lookup, so the result is deterministic.

mod filter;
mod vocabulary;

pub use filter::{LexicalFilter, TermClass};
pub use vocabulary::{has_academic_suffix, is_basic_word, is_domain_term};
