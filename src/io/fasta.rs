use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 一条 FASTA 记录：标识符、残基序列及其来源文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// '>' 之后的标题文本（去首尾空白），解析得到的记录不会为空
    pub id: String,
    pub residues: String,
    /// 来源文件，变换过程中原样保留
    pub source: Option<String>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            residues: residues.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 残基数（按字符计，而非字节）
    pub fn len(&self) -> usize {
        self.residues.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// 替换残基，保留标识符与来源
    pub fn with_residues(&self, residues: String) -> Self {
        Self {
            id: self.id.clone(),
            residues,
            source: self.source.clone(),
        }
    }

    /// 以新标识符复制
    pub fn renamed(&self, id: String) -> Self {
        Self {
            id,
            residues: self.residues.clone(),
            source: self.source.clone(),
        }
    }
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    done: bool,
    peek_header: Option<(usize, String)>,
    strict: bool,
    dropped: usize,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            done: false,
            peek_header: None,
            strict: false,
            dropped: 0,
        }
    }

    /// 严格模式：首个标题之前的序列行报错，而不是丢弃
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn next_record(&mut self) -> Result<Option<Sequence>> {
        if self.done {
            return Ok(None);
        }

        // 查找标题行
        let (header_line, id) = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                if !self.read_line()? {
                    self.done = true;
                    self.report_dropped();
                    return Ok(None);
                }
                if let Some(h) = self.buf.trim_start().strip_prefix('>') {
                    break (self.line_no, h.trim().to_string());
                }
                if self.buf.trim().is_empty() {
                    continue;
                }
                if self.strict {
                    self.done = true;
                    return Err(Error::Format {
                        line: self.line_no,
                        message: "sequence data before the first header".to_string(),
                    });
                }
                self.dropped += 1;
            }
        };
        self.report_dropped();

        if id.is_empty() {
            self.done = true;
            return Err(Error::Format {
                line: header_line,
                message: "empty sequence identifier".to_string(),
            });
        }

        // 读取序列行
        let mut residues = String::new();
        loop {
            if !self.read_line()? {
                self.done = true;
                break;
            }
            if let Some(h) = self.buf.trim_start().strip_prefix('>') {
                self.peek_header = Some((self.line_no, h.trim().to_string()));
                break;
            }
            residues.push_str(self.buf.trim());
        }

        Ok(Some(Sequence::new(id, residues)))
    }

    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            return Ok(false);
        }
        self.line_no += 1;
        Ok(true)
    }

    fn report_dropped(&mut self) {
        if self.dropped > 0 {
            warn!("dropped {} sequence line(s) found before the first header", self.dropped);
            self.dropped = 0;
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<Sequence>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

pub fn parse_fasta<R: BufRead>(reader: R, strict: bool) -> Result<Vec<Sequence>> {
    FastaReader::new(reader).strict(strict).collect()
}

pub fn parse_str(text: &str) -> Result<Vec<Sequence>> {
    parse_fasta(text.as_bytes(), false)
}

/// 读取整个 FASTA 文件，每条记录标注文件路径
pub fn parse_file(path: &Path, strict: bool) -> Result<Vec<Sequence>> {
    let fh = File::open(path)?;
    let source = path.display().to_string();
    let seqs = parse_fasta(BufReader::new(fh), strict)?;
    Ok(seqs
        .into_iter()
        .map(|s| s.with_source(source.as_str()))
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CaseMode {
    /// Keep residues as read
    #[default]
    Original,
    /// Upper-case residues
    Upper,
    /// Lower-case residues
    Lower,
}

impl CaseMode {
    pub fn apply(self, residues: &str) -> Cow<'_, str> {
        match self {
            CaseMode::Original => Cow::Borrowed(residues),
            CaseMode::Upper => Cow::Owned(residues.to_uppercase()),
            CaseMode::Lower => Cow::Owned(residues.to_lowercase()),
        }
    }
}

/// [`FastaWriter`] 的输出选项。`wrap == 0` 时每条序列写成一行
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FastaFormat {
    pub case: CaseMode,
    pub wrap: usize,
}

pub struct FastaWriter<W: Write> {
    writer: W,
    format: FastaFormat,
    written: usize,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(writer: W, format: FastaFormat) -> Self {
        Self { writer, format, written: 0 }
    }

    pub fn write_record(&mut self, seq: &Sequence) -> Result<()> {
        // 记录之间空一行
        if self.written > 0 {
            writeln!(self.writer)?;
        }
        writeln!(self.writer, ">{}", seq.id)?;
        let residues = self.format.case.apply(&seq.residues);
        for line in wrap_lines(&residues, self.format.wrap) {
            writeln!(self.writer, "{}", line)?;
        }
        self.written += 1;
        Ok(())
    }

    pub fn write_all(&mut self, seqs: &[Sequence]) -> Result<()> {
        for seq in seqs {
            self.write_record(seq)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

pub fn to_fasta_string(seqs: &[Sequence], format: FastaFormat) -> Result<String> {
    let mut w = FastaWriter::new(Vec::new(), format);
    w.write_all(seqs)?;
    let buf = w.finish()?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 按 `width` 个字符切分，最后一段可以更短。
/// 宽度为 0 或空串时只返回一行
pub fn wrap_lines(s: &str, width: usize) -> Vec<&str> {
    if width == 0 || s.is_empty() {
        return vec![s];
    }
    let mut lines = Vec::with_capacity(s.len() / width + 1);
    let mut start = 0;
    for (count, (idx, _)) in s.char_indices().enumerate() {
        if count > 0 && count % width == 0 {
            lines.push(&s[start..idx]);
            start = idx;
        }
    }
    lines.push(&s[start..]);
    lines
}

pub fn check_wrap_width(width: i64) -> Result<usize> {
    usize::try_from(width)
        .map_err(|_| Error::Validation(format!("wrap width must be >= 0 (got {})", width)))
}

/// 解析文本形式的换行宽度（如命令行参数）
pub fn validate_wrap_width(raw: &str) -> Result<usize> {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) => check_wrap_width(n),
        Err(_) => Err(Error::Validation(format!(
            "wrap width must be an integer (got '{}')",
            raw
        ))),
    }
}
