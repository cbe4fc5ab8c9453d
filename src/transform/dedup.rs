use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::Transformer;
use crate::error::{Error, Result};
use crate::io::fasta::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the first record of each identifier
    Remove,
    /// Suffix duplicated identifiers with .1, .2, ...
    Rename,
}

#[derive(Debug, Clone, Copy)]
pub struct DuplicateResolver {
    pub policy: DuplicatePolicy,
}

impl DuplicateResolver {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }
}

impl Transformer for DuplicateResolver {
    fn transform(&self, sequences: &[Sequence]) -> Result<Vec<Sequence>> {
        match self.policy {
            DuplicatePolicy::Remove => Ok(remove_duplicates(sequences)),
            DuplicatePolicy::Rename => rename_duplicates(sequences),
        }
    }
}

/// 每个标识符只保留首次出现的记录，保持首次出现的相对顺序
pub fn remove_duplicates(sequences: &[Sequence]) -> Vec<Sequence> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(sequences.len());
    sequences
        .iter()
        .filter(|s| seen.insert(s.id.as_str()))
        .cloned()
        .collect()
}

/// 重复标识符重命名：
/// - 第一次冲突时，已保留的首条记录改名为 `X.1`，新记录为 `X.2`；
/// - 之后的记录依次为 `X.3`、`X.4`……，已改名的记录不再变动。
///
/// 先单遍计算每个输入位置的最终名称，再据此构造新的输出列表。
/// 合成名称与输出中其他标识符相同时返回 [`Error::Collision`]。
pub fn rename_duplicates(sequences: &[Sequence]) -> Result<Vec<Sequence>> {
    let n = sequences.len();
    let mut names: Vec<Option<String>> = vec![None; n];
    // 原始标识符 -> (首次出现的位置, 出现次数)
    let mut occurrences: HashMap<&str, (usize, usize)> = HashMap::with_capacity(n);
    // 输出中已占用的最终名称
    let mut taken: HashSet<String> = HashSet::with_capacity(n);

    for (i, seq) in sequences.iter().enumerate() {
        let id = seq.id.as_str();
        match occurrences.entry(id) {
            Entry::Vacant(slot) => {
                if !taken.insert(id.to_string()) {
                    return Err(Error::Collision(id.to_string()));
                }
                slot.insert((i, 1));
            }
            Entry::Occupied(mut slot) => {
                let (first, count) = slot.get_mut();
                *count += 1;
                if *count == 2 {
                    taken.remove(id);
                    let first_name = format!("{}.1", id);
                    if !taken.insert(first_name.clone()) {
                        return Err(Error::Collision(first_name));
                    }
                    names[*first] = Some(first_name);
                }
                let name = format!("{}.{}", id, count);
                if !taken.insert(name.clone()) {
                    return Err(Error::Collision(name));
                }
                names[i] = Some(name);
            }
        }
    }

    Ok(sequences
        .iter()
        .zip(names)
        .map(|(seq, name)| match name {
            Some(name) => seq.renamed(name),
            None => seq.clone(),
        })
        .collect())
}
