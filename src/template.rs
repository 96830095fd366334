//! Word package templating: open, substitute, save or download.
//!
//! A [`DocxTemplate`] owns a private scratch copy of the source package and
//! an open archive handle over it. Substitutions mutate lazily-cached part
//! text in memory; the archive is rewritten once, when the template is saved
//! or turned into a download.

use crate::download::{Download, Headers};
use crate::error::{Result, TemplateError};
use crate::placeholder;
use crate::substitute;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Archive entry holding the main document body.
const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Archive entry holding the first footer, when the package has one.
const FOOTER_ENTRY: &str = "word/footer1.xml";

/// One XML payload subject to substitution.
///
/// The entry is read from the archive at most once: the first access
/// decodes, normalizes and caches the text, and every later substitution
/// mutates the cache. Replacements therefore accumulate correctly across
/// calls.
#[derive(Debug)]
struct TextPart {
    entry: &'static str,
    present: bool,
    text: Option<String>,
}

impl TextPart {
    fn new(entry: &'static str, present: bool) -> Self {
        Self {
            entry,
            present,
            text: None,
        }
    }

    /// Lazily load, normalize and cache the entry text.
    ///
    /// Returns `None` for a part whose entry is absent from the package.
    fn text_mut(&mut self, archive: &mut ZipArchive<File>) -> Result<Option<&mut String>> {
        if !self.present {
            return Ok(None);
        }
        if self.text.is_none() {
            let mut raw = Vec::new();
            archive.by_name(self.entry)?.read_to_end(&mut raw)?;
            let text = String::from_utf8(raw)?;
            self.text = Some(placeholder::normalize(&text).into_owned());
        }
        Ok(self.text.as_mut())
    }

    /// The cached text, if this part was ever read.
    fn cached(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A Word (.docx) template.
///
/// This is the main entry point for placeholder substitution. Opening a
/// template copies the source package into a scratch file and opens it as a
/// ZIP archive; `{name}` tokens in the document body and footer are then
/// replaced in memory, and the result is written out with [`save`] or
/// streamed with [`into_download`].
///
/// A template instance owns exclusive access to its scratch file and archive
/// handle; it is not meant to be shared across threads.
///
/// [`save`]: DocxTemplate::save
/// [`into_download`]: DocxTemplate::into_download
///
/// # Examples
///
/// ```rust,no_run
/// use docx_template::DocxTemplate;
///
/// let mut tpl = DocxTemplate::open("letter.docx")?;
/// tpl.replace("name", "Ada Lovelace", true)?
///     .replace_multiline("address", "12 Main St\nLondon", true)?;
/// tpl.save("letter-ada.docx")?;
/// # Ok::<(), docx_template::TemplateError>(())
/// ```
#[derive(Debug)]
pub struct DocxTemplate {
    /// Private working copy of the source package
    scratch: PathBuf,
    /// Archive handle over the scratch copy
    archive: ZipArchive<File>,
    body: TextPart,
    footer: TextPart,
    headers: Headers,
}

impl DocxTemplate {
    /// Open a .docx template, using the platform temp directory for the
    /// scratch copy.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::SourceNotFound`] if `path` does not exist,
    /// [`TemplateError::ScratchCopy`] if the working copy cannot be created,
    /// or [`TemplateError::Unpack`] if the package is not a readable ZIP
    /// archive or has no `word/document.xml` entry. A failed open leaves no
    /// scratch artifact behind.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_in(path.as_ref(), &std::env::temp_dir())
    }

    /// Open a .docx template with an explicit scratch directory.
    ///
    /// The directory must already exist; it is not created.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::ScratchDirInvalid`] if `scratch_dir` is not
    /// an existing directory, otherwise the same errors as [`open`].
    ///
    /// [`open`]: DocxTemplate::open
    pub fn open_with_scratch_dir<P, Q>(path: P, scratch_dir: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let dir = scratch_dir.as_ref();
        if !dir.is_dir() {
            return Err(TemplateError::ScratchDirInvalid(dir.display().to_string()));
        }
        Self::open_in(path.as_ref(), dir)
    }

    fn open_in(path: &Path, scratch_dir: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(TemplateError::SourceNotFound(path.display().to_string()));
        }

        let scratch = tempfile::Builder::new()
            .prefix("docx")
            .tempfile_in(scratch_dir)
            .and_then(|f| f.into_temp_path().keep().map_err(std::io::Error::from))
            .map_err(TemplateError::ScratchCopy)?;

        if let Err(e) = fs::copy(path, &scratch) {
            let _ = fs::remove_file(&scratch);
            return Err(TemplateError::ScratchCopy(e));
        }

        let archive = match File::open(&scratch)
            .map_err(|e| e.to_string())
            .and_then(|f| ZipArchive::new(f).map_err(|e| e.to_string()))
        {
            Ok(archive) => archive,
            Err(e) => {
                let _ = fs::remove_file(&scratch);
                return Err(TemplateError::Unpack(e));
            },
        };

        if archive.index_for_name(DOCUMENT_ENTRY).is_none() {
            let _ = fs::remove_file(&scratch);
            return Err(TemplateError::Unpack(format!(
                "missing {DOCUMENT_ENTRY} entry"
            )));
        }
        let has_footer = archive.index_for_name(FOOTER_ENTRY).is_some();

        Ok(Self {
            scratch,
            archive,
            body: TextPart::new(DOCUMENT_ENTRY, true),
            footer: TextPart::new(FOOTER_ENTRY, has_footer),
            headers: Headers::transfer_defaults(),
        })
    }

    /// Replace every occurrence of `{name}` in the document body and footer.
    ///
    /// When `escape` is set, XML special characters in `value` are escaped
    /// before insertion. Tokens that are not present are left alone, so
    /// re-running a substitution is a no-op.
    pub fn replace(&mut self, name: &str, value: &str, escape: bool) -> Result<&mut Self> {
        self.apply(|text| substitute::substitute(text, name, value, escape))
    }

    /// Replace every occurrence of `{name}` with a multi-line value.
    ///
    /// Line breaks in `value` become explicit line-break elements in the
    /// document markup.
    pub fn replace_multiline(&mut self, name: &str, value: &str, escape: bool) -> Result<&mut Self> {
        self.apply(|text| substitute::substitute_multiline(text, name, value, escape))
    }

    /// Replace a set of tokens, one `(name, value)` pair at a time.
    ///
    /// Pairs are substituted independently and sequentially in iteration
    /// order. With distinct token names the result does not depend on the
    /// order.
    pub fn replace_all<'a, I>(&mut self, vars: I, escape: bool) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in vars {
            self.replace(name, value, escape)?;
        }
        Ok(self)
    }

    fn apply<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: Fn(&str) -> String,
    {
        for part in [&mut self.body, &mut self.footer] {
            if let Some(text) = part.text_mut(&mut self.archive)? {
                *text = f(text);
            }
        }
        Ok(self)
    }

    /// Set a download header, replacing any default with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.set(name, value);
        self
    }

    /// The headers that will accompany a download of this template.
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Location of the scratch copy.
    ///
    /// After a failed [`save`] the scratch file is left in place at this
    /// path for manual recovery.
    ///
    /// [`save`]: DocxTemplate::save
    #[inline]
    pub fn scratch_path(&self) -> &Path {
        &self.scratch
    }

    /// Rewrite touched parts into the archive and finalize the scratch file.
    ///
    /// Entries whose part was never read are copied through byte-preserving;
    /// touched parts are rewritten from their cached text.
    fn build(mut self) -> Result<(PathBuf, u64)> {
        let scratch_dir = self
            .scratch
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        let rebuilt = tempfile::Builder::new()
            .prefix("docx")
            .tempfile_in(scratch_dir)?;

        {
            let mut writer = ZipWriter::new(rebuilt.as_file());
            let deflated =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            for i in 0..self.archive.len() {
                let entry = self.archive.by_index_raw(i)?;
                let replacement = if entry.name() == self.body.entry {
                    self.body.cached().map(|text| (self.body.entry, text))
                } else if entry.name() == self.footer.entry {
                    self.footer.cached().map(|text| (self.footer.entry, text))
                } else {
                    None
                };
                match replacement {
                    Some((name, text)) => {
                        drop(entry);
                        writer.start_file(name, deflated)?;
                        writer.write_all(text.as_bytes())?;
                    },
                    None => writer.raw_copy_file(entry)?,
                }
            }

            writer.finish()?;
        }

        rebuilt
            .persist(&self.scratch)
            .map_err(|e| TemplateError::Io(e.error))?;

        let len = fs::metadata(&self.scratch)?.len();
        Ok((self.scratch, len))
    }

    /// Build the package and move it to `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Save`] if the move fails, for instance
    /// across devices or on a permission error. The scratch file is
    /// deliberately left in place on failure.
    pub fn save<P: AsRef<Path>>(self, dest: P) -> Result<()> {
        let dest = dest.as_ref();
        let (scratch, _) = self.build()?;
        fs::rename(&scratch, dest).map_err(|source| TemplateError::Save {
            path: dest.to_path_buf(),
            source,
        })
    }

    /// Build the package and turn it into a [`Download`].
    ///
    /// The returned value carries the transfer headers, Content-Length
    /// included, and streams the package bytes on demand. The caller decides
    /// what happens after streaming; nothing here terminates the process.
    pub fn into_download(self) -> Result<Download> {
        let headers = self.headers.clone();
        let (scratch, len) = self.build()?;
        Ok(Download::new(scratch, len, headers))
    }
}
