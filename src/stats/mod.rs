//! 碱基组成统计：每条序列一行 `id,len,A,C,T,G,-`。
//!
//! 计数区分大小写，只统计 [`dna::TRACKED`] 中的五个符号；
//! 其余符号计入长度但不计入任何列，所以各列之和可能小于 `len`。

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::io::fasta::Sequence;
use crate::util::dna;

pub const HEADER: [&str; 7] = ["id", "len", "A", "C", "T", "G", "-"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    A,
    C,
    T,
    G,
    Gap,
}

impl Base {
    /// 箱线图使用的四种碱基，顺序与统计表一致
    pub const NUCLEOTIDES: [Base; 4] = [Base::A, Base::C, Base::T, Base::G];

    pub fn symbol(self) -> char {
        match self {
            Base::A => dna::TRACKED[0],
            Base::C => dna::TRACKED[1],
            Base::T => dna::TRACKED[2],
            Base::G => dna::TRACKED[3],
            Base::Gap => dna::TRACKED[4],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRow {
    pub id: String,
    pub len: usize,
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "T")]
    pub t: usize,
    #[serde(rename = "G")]
    pub g: usize,
    #[serde(rename = "-")]
    pub gap: usize,
}

impl StatsRow {
    pub fn from_sequence(seq: &Sequence) -> Self {
        let mut row = StatsRow {
            id: seq.id.clone(),
            len: 0,
            a: 0,
            c: 0,
            t: 0,
            g: 0,
            gap: 0,
        };
        for ch in seq.residues.chars() {
            row.len += 1;
            match ch {
                'A' => row.a += 1,
                'C' => row.c += 1,
                'T' => row.t += 1,
                'G' => row.g += 1,
                '-' => row.gap += 1,
                _ => {}
            }
        }
        row
    }

    pub fn count(&self, base: Base) -> usize {
        match base {
            Base::A => self.a,
            Base::C => self.c,
            Base::T => self.t,
            Base::G => self.g,
            Base::Gap => self.gap,
        }
    }

    pub fn tracked_total(&self) -> usize {
        self.a + self.c + self.t + self.g + self.gap
    }

    /// count / len；空序列返回 None
    pub fn fraction(&self, base: Base) -> Option<f64> {
        if self.len == 0 {
            return None;
        }
        Some(self.count(base) as f64 / self.len as f64)
    }
}

pub fn compute_table(sequences: &[Sequence]) -> Vec<StatsRow> {
    sequences.iter().map(StatsRow::from_sequence).collect()
}

/// 写出 CSV：表头总是第一行（即使没有数据行），行尾统一为 `\n`
pub fn write_csv<W: Write>(rows: &[StatsRow], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(rows: &[StatsRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let fh = File::create(path)?;
    write_csv(rows, BufWriter::new(fh))
}
