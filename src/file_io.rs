//! Reading G-code files and replacing them atomically

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use seamflip_settings::OutputSettings;

use crate::error::{FileError, FileResult};

/// A G-code file on disk
#[derive(Debug, Clone)]
pub struct GcodeFile {
    path: PathBuf,
    file_size: u64,
}

impl GcodeFile {
    /// Open a G-code file
    ///
    /// # Errors
    /// Returns error if the path does not exist or is not a regular file
    pub fn open(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(FileError::NotFound(path));
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path));
        }

        let file_size = fs::metadata(&path)
            .map_err(|source| FileError::Read {
                path: path.clone(),
                source,
            })?
            .len();

        Ok(Self { path, file_size })
    }

    /// Get file size in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file, keeping every line's original bytes
    pub fn read_source(&self) -> FileResult<SourceText> {
        let bytes = fs::read(&self.path).map_err(|source| FileError::Read {
            path: self.path.clone(),
            source,
        })?;

        let source = SourceText::from_bytes(&bytes);
        if source.is_lossy() {
            tracing::warn!(
                "{} is not valid UTF-8; copied lines keep their original bytes",
                self.path.display()
            );
        }
        Ok(source)
    }
}

/// One input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Original bytes, terminator included
    raw: Vec<u8>,
    /// Decoded content without terminator, invalid UTF-8 replaced with U+FFFD
    text: String,
}

impl SourceLine {
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The lines of a G-code file, split on `\n` with an optional preceding `\r`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<SourceLine>,
    line_ending: &'static str,
    lossy: bool,
}

impl SourceText {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut lines = Vec::new();
        let mut line_ending = None;
        let mut lossy = false;

        for chunk in bytes.split_inclusive(|&b| b == b'\n') {
            let content = match chunk.strip_suffix(b"\n") {
                Some(content) => {
                    let without_cr = content.strip_suffix(b"\r");
                    if line_ending.is_none() {
                        line_ending = Some(if without_cr.is_some() { "\r\n" } else { "\n" });
                    }
                    without_cr.unwrap_or(content)
                }
                None => chunk,
            };
            let text = match std::str::from_utf8(content) {
                Ok(text) => text.to_string(),
                Err(_) => {
                    lossy = true;
                    String::from_utf8_lossy(content).into_owned()
                }
            };
            lines.push(SourceLine {
                raw: chunk.to_vec(),
                text,
            });
        }

        Self {
            lines,
            line_ending: line_ending.unwrap_or("\n"),
            lossy,
        }
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Decoded line contents, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(SourceLine::text)
    }

    /// Terminator of the first terminated line, `\n` if there is none
    pub fn line_ending(&self) -> &'static str {
        self.line_ending
    }

    /// Whether any line held invalid UTF-8
    pub fn is_lossy(&self) -> bool {
        self.lossy
    }

    /// Assemble output bytes.
    ///
    /// A line whose entry in `sources` names an input line is written as that line's
    /// original bytes; every other line is written as text followed by
    /// [`SourceText::line_ending`].
    pub fn render(&self, lines: &[String], sources: &[Option<usize>]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.lines.iter().map(|l| l.raw.len()).sum());
        for (position, line) in lines.iter().enumerate() {
            let original = sources
                .get(position)
                .copied()
                .flatten()
                .and_then(|index| self.lines.get(index));
            match original {
                Some(original) => {
                    out.extend_from_slice(&original.raw);
                    // an unterminated last input line no longer ends the file
                    if !original.raw.ends_with(b"\n") && position + 1 < lines.len() {
                        out.extend_from_slice(self.line_ending.as_bytes());
                    }
                }
                None => {
                    out.extend_from_slice(line.as_bytes());
                    out.extend_from_slice(self.line_ending.as_bytes());
                }
            }
        }
        out
    }
}

/// `<target><suffix>`
pub fn sibling_path(target: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `contents` to `target`.
///
/// The content goes to a sibling temporary file first, which is flushed, synced and
/// then renamed over `target`, so `target` is either left as it was or fully replaced.
/// With `keep_backup` an existing `target` is copied to `<target>.bak` before the rename.
pub fn write_atomic(target: &Path, contents: &[u8], output: &OutputSettings) -> FileResult<()> {
    let tmp_path = sibling_path(target, &output.temp_suffix);

    if let Err(err) = write_contents(&tmp_path, contents) {
        discard(&tmp_path);
        return Err(err);
    }

    if output.keep_backup && target.is_file() {
        let backup = sibling_path(target, ".bak");
        if let Err(source) = fs::copy(target, &backup) {
            discard(&tmp_path);
            return Err(FileError::Write {
                path: backup,
                source,
            });
        }
        tracing::debug!("kept original as {}", backup.display());
    }

    fs::rename(&tmp_path, target).map_err(|source| {
        discard(&tmp_path);
        FileError::Replace {
            from: tmp_path.clone(),
            to: target.to_path_buf(),
            source,
        }
    })
}

fn write_contents(path: &Path, contents: &[u8]) -> FileResult<()> {
    let write_error = |source| FileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(write_error)?;
    file.write_all(contents).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    file.sync_all().map_err(write_error)
}

fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        tracing::debug!("could not remove {}: {}", path.display(), err);
    }
}
