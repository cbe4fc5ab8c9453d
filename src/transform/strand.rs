use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::Transformer;
use crate::error::{Error, Result};
use crate::io::fasta::Sequence;
use crate::util::dna;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrandStyle {
    /// Reverse residue order
    Reverse,
    /// Base-pair complement (A<->T, C<->G)
    Complement,
    /// Complement of the reversed sequence
    ReverseComplement,
}

/// 链变换，无状态。互补类变换遇到 A/C/G/T（含小写）以外的符号即失败
#[derive(Debug, Clone, Copy)]
pub struct StrandTransformer {
    pub style: StrandStyle,
}

impl StrandTransformer {
    pub fn new(style: StrandStyle) -> Self {
        Self { style }
    }

    pub fn apply(&self, seq: &Sequence) -> Result<Sequence> {
        let residues = match self.style {
            StrandStyle::Reverse => dna::reverse(&seq.residues),
            StrandStyle::Complement => dna::complement_seq(&seq.residues)
                .map_err(|(position, residue)| lookup_error(seq, position, residue))?,
            StrandStyle::ReverseComplement => dna::revcomp(&seq.residues)
                .map_err(|(position, residue)| lookup_error(seq, position, residue))?,
        };
        Ok(seq.with_residues(residues))
    }
}

fn lookup_error(seq: &Sequence, position: usize, residue: char) -> Error {
    Error::Lookup {
        id: seq.id.clone(),
        residue,
        position,
    }
}

impl Transformer for StrandTransformer {
    fn transform(&self, sequences: &[Sequence]) -> Result<Vec<Sequence>> {
        sequences.iter().map(|s| self.apply(s)).collect()
    }
}
