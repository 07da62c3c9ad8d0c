//! Batch reader loop.
//!
//! A [`Reader`] owns one input and one reject sink. Each [`Reader::read`] call parses lines into
//! a dataset until a row bound or end of input is reached, so large inputs can be consumed in
//! bounded batches by calling it repeatedly.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::sync::Arc;

use crate::dataset::{Dataset, DatasetLike};
use crate::error::{DatasetError, DatasetResult, LineError};

use super::config::ReaderConfig;
use super::line::{strip_line_end, LineParser};
use super::observability::{severity_for_error, BatchStats, ReadContext, ReadObserver, ReadSeverity};

/// Whether a read call stopped at its row bound or at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The row bound was reached and input remains.
    More,
    /// The input is exhausted.
    Eof,
}

/// Options controlling reader behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ReadOptions {
    /// Rows per read call; `None` or `Some(0)` reads until end of input.
    pub max_rows: Option<usize>,
    /// Label of the input used in diagnostics.
    pub source: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ReadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReadSeverity,
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("max_rows", &self.max_rows)
            .field("source", &self.source)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_rows: None,
            source: "<input>".to_string(),
            observer: None,
            alert_at_or_above: ReadSeverity::Critical,
        }
    }
}

/// Reads lines from `R` into datasets, writing rejected lines to `W`.
pub struct Reader<R, W> {
    input: R,
    rejects: W,
    parser: LineParser,
    options: ReadOptions,
    buf: Vec<u8>,
    lines_read: usize,
    lines_rejected: usize,
}

impl<R, W> fmt::Debug for Reader<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("parser", &self.parser)
            .field("options", &self.options)
            .field("lines_read", &self.lines_read)
            .field("lines_rejected", &self.lines_rejected)
            .finish()
    }
}

impl Reader<BufReader<File>, BufWriter<File>> {
    /// Open the configured input and create (truncate) the configured reject file.
    pub fn open(config: &ReaderConfig, observer: Option<Arc<dyn ReadObserver>>) -> DatasetResult<Self> {
        let options = ReadOptions {
            max_rows: config.row_limit(),
            source: config.input.display().to_string(),
            observer,
            ..Default::default()
        };
        let opened = File::open(&config.input).and_then(|input| Ok((input, File::create(&config.rejected)?)));
        match opened {
            Ok((input, rejects)) => Ok(Self::new(
                BufReader::new(input),
                BufWriter::new(rejects),
                config.parser(),
                options,
            )),
            Err(e) => {
                let err = DatasetError::from(e);
                let ctx = ReadContext {
                    source: options.source.clone(),
                    line: 0,
                };
                report_failure(&options, &ctx, &err);
                Err(err)
            }
        }
    }
}

impl<R: BufRead, W: Write> Reader<R, W> {
    pub fn new(input: R, rejects: W, parser: LineParser, options: ReadOptions) -> Self {
        Self {
            input,
            rejects,
            parser,
            options,
            buf: Vec::new(),
            lines_read: 0,
            lines_rejected: 0,
        }
    }

    pub fn parser(&self) -> &LineParser {
        &self.parser
    }

    /// Lines consumed so far across all calls, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Lines written to the reject sink so far across all calls.
    pub fn lines_rejected(&self) -> usize {
        self.lines_rejected
    }

    /// Read up to the row bound into `into`.
    ///
    /// Blank lines are skipped and not counted. Lines that fail to parse are written to the
    /// reject sink with their original terminator (`\n` is added to a final unterminated line)
    /// and reading continues. The dataset is appended to, never
    /// reset. Returns the number of rows pushed and whether input remains.
    pub fn read<D: DatasetLike + ?Sized>(&mut self, into: &mut D) -> DatasetResult<(usize, ReadStatus)> {
        let result = self.read_batch(into);
        if let Err(e) = &result {
            report_failure(&self.options, &self.context(), e);
        }
        result
    }

    fn read_batch<D: DatasetLike + ?Sized>(&mut self, into: &mut D) -> DatasetResult<(usize, ReadStatus)> {
        self.rejects.flush()?;

        let mut rows = 0usize;
        let mut rejected = 0usize;
        let status = loop {
            if self.options.max_rows.filter(|&max| max > 0).is_some_and(|max| rows >= max) {
                break if self.input.fill_buf()?.is_empty() {
                    ReadStatus::Eof
                } else {
                    ReadStatus::More
                };
            }

            self.buf.clear();
            if self.input.read_until(b'\n', &mut self.buf)? == 0 {
                break ReadStatus::Eof;
            }
            self.lines_read += 1;

            let line = strip_line_end(&self.buf);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match self.parser.parse(line) {
                Ok(row) => {
                    into.push_row(row)?;
                    rows += 1;
                }
                Err(e) => {
                    self.rejects.write_all(&self.buf)?;
                    if !self.buf.ends_with(b"\n") {
                        self.rejects.write_all(b"\n")?;
                    }
                    rejected += 1;
                    self.lines_rejected += 1;
                    self.emit_reject(&e);
                }
            }
        };

        if status == ReadStatus::Eof {
            self.rejects.flush()?;
        }
        if let Some(obs) = &self.options.observer {
            obs.on_batch(&self.context(), BatchStats { rows, rejected, status });
        }
        Ok((rows, status))
    }

    /// Flush the reject sink and hand back the input and sink.
    pub fn finish(mut self) -> DatasetResult<(R, W)> {
        self.rejects.flush()?;
        Ok((self.input, self.rejects))
    }

    fn emit_reject(&self, error: &LineError) {
        if let Some(obs) = &self.options.observer {
            obs.on_reject(&self.context(), error);
        }
    }

    fn context(&self) -> ReadContext {
        ReadContext {
            source: self.options.source.clone(),
            line: self.lines_read,
        }
    }
}

fn report_failure(options: &ReadOptions, ctx: &ReadContext, error: &DatasetError) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = severity_for_error(error);
        obs.on_failure(ctx, sev, error);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, error);
        }
    }
}

/// Read the whole configured input into a new dataset.
///
/// The dataset's mode comes from `DatasetMode` and its columns from the non-skip fields of
/// `InputMetadata`. Reading proceeds in `MaxRows` batches until end of input.
pub fn read_all_from_config(
    config: &ReaderConfig,
    observer: Option<Arc<dyn ReadObserver>>,
) -> DatasetResult<Dataset> {
    let mode = config.mode()?;
    let mut dataset = Dataset::from_schema(mode, &config.input_metadata);
    let mut reader = Reader::open(config, observer)?;
    while reader.read(&mut dataset)?.1 == ReadStatus::More {}
    reader.finish()?;
    Ok(dataset)
}
