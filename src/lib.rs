//! docx-template - placeholder substitution for Word (.docx) packages
//!
//! This library opens a Word document package, replaces `{name}` placeholder
//! tokens in the main document body and footer with caller-supplied values,
//! and writes the result to a destination path or to a download stream.
//!
//! # Features
//!
//! - **Placeholder repair**: tokens that Word split across formatting runs
//!   are reassembled before matching
//! - **XML escaping**: replacement values can be escaped so raw markup never
//!   leaks into the document
//! - **Multi-line values**: line breaks become explicit line-break elements
//! - **Pass-through packaging**: entries that were never substituted are
//!   copied into the output byte-preserving
//!
//! # Example - Filling a template
//!
//! ```no_run
//! use docx_template::DocxTemplate;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tpl = DocxTemplate::open("letter.docx")?;
//!
//! tpl.replace("name", "Ada Lovelace", true)?
//!     .replace_multiline("address", "12 Main St\nLondon", true)?;
//!
//! tpl.save("letter-ada.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Streaming as a download
//!
//! ```no_run
//! use docx_template::DocxTemplate;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tpl = DocxTemplate::open("letter.docx")?;
//! tpl.replace_all([("name", "Ada"), ("year", "2026")], true)?;
//!
//! let download = tpl.into_download()?;
//! for (name, value) in download.headers().iter() {
//!     println!("{}: {}", name, value);
//! }
//! download.write_to(std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

/// Transfer headers and streaming for built packages
pub mod download;

/// Error types for template operations
pub mod error;

/// Placeholder repair for tokens split by Word markup
pub mod placeholder;

/// Literal token substitution and XML escaping
pub mod substitute;

/// The template itself: open, substitute, save or download
pub mod template;

// Re-export commonly used types for convenience
pub use download::{Download, Headers};
pub use error::{Result, TemplateError};
pub use template::DocxTemplate;
