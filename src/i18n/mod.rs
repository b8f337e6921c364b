//! Internationalization (i18n) for the viewer page.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported UI languages
//! - `language`: Validated `Language` type
//! - `strings`: One `LanguageStrings` table per language; a language that
//!   lacks a label does not compile
//!
//! # Example
//!
//! ```rust,ignore
//! use newsletter_viewer::i18n::Language;
//!
//! let french = Language::from_code("fr")?;
//! println!("{}", french.strings().latest);
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
