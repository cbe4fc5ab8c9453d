/// 统计所跟踪的符号，顺序即统计表的列顺序
pub const TRACKED: [char; 5] = ['A', 'C', 'T', 'G', '-'];

/// 碱基互补：A↔T、C↔G，大小写分别处理；其余符号（含 gap、简并碱基）无互补
#[inline]
pub fn complement(base: char) -> Option<char> {
    match base {
        'A' => Some('T'),
        'C' => Some('G'),
        'G' => Some('C'),
        'T' => Some('A'),
        'a' => Some('t'),
        'c' => Some('g'),
        'g' => Some('c'),
        't' => Some('a'),
        _ => None,
    }
}

pub fn reverse(seq: &str) -> String {
    seq.chars().rev().collect()
}

/// 逐字符互补。失败时返回第一个无法互补的符号及其位置（0 起）
pub fn complement_seq(seq: &str) -> Result<String, (usize, char)> {
    let mut out = String::with_capacity(seq.len());
    for (i, b) in seq.chars().enumerate() {
        out.push(complement(b).ok_or((i, b))?);
    }
    Ok(out)
}

/// 反向互补。报告的位置是该符号在原序列中的位置
pub fn revcomp(seq: &str) -> Result<String, (usize, char)> {
    let n = seq.chars().count();
    let mut out = String::with_capacity(seq.len());
    for (i, b) in seq.chars().rev().enumerate() {
        out.push(complement(b).ok_or((n - 1 - i, b))?);
    }
    Ok(out)
}
