//! 序列变换：重复标识符处理与正/反/互补链。
//!
//! 所有变换都实现 [`Transformer`]，输入借用、输出为新构造的序列列表，
//! 不修改调用方持有的任何值。

pub mod dedup;
pub mod strand;

use crate::error::Result;
use crate::io::fasta::Sequence;

pub use dedup::{DuplicatePolicy, DuplicateResolver};
pub use strand::{StrandStyle, StrandTransformer};

pub trait Transformer {
    fn transform(&self, sequences: &[Sequence]) -> Result<Vec<Sequence>>;
}
