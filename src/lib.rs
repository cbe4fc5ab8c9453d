//! # fastakit
//!
//! FASTA 文件的整理与统计工具。
//!
//! 本 crate 提供一条线性的批处理流程：
//!
//! - **解析 / 写出**：多行 FASTA 记录重建；按大小写模式与行宽写回
//! - **重复标识符**：只保留首条（remove）或追加 `.N` 后缀重命名（rename）
//! - **链变换**：反向、互补、反向互补
//! - **统计**：每条序列的长度与 A/C/T/G/- 计数，写出为 CSV
//! - **作图**：长度直方图与碱基占比箱线图（SVG）
//!
//! ## 快速示例
//!
//! ```rust
//! use fastakit::io::fasta::{parse_str, to_fasta_string, CaseMode, FastaFormat};
//! use fastakit::stats::compute_table;
//! use fastakit::transform::{DuplicatePolicy, DuplicateResolver, Transformer};
//!
//! let seqs = parse_str(">s1\nACGT\n>s1\nAC-GT\n")?;
//! let renamed = DuplicateResolver::new(DuplicatePolicy::Rename).transform(&seqs)?;
//! assert_eq!(renamed[0].id, "s1.1");
//! assert_eq!(renamed[1].id, "s1.2");
//!
//! let text = to_fasta_string(&renamed, FastaFormat { case: CaseMode::Lower, wrap: 2 })?;
//! assert!(text.starts_with(">s1.1\nac\ngt\n"));
//!
//! let rows = compute_table(&renamed);
//! assert_eq!(rows[1].gap, 1);
//! # Ok::<(), fastakit::Error>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA 解析与写出
//! - [`transform`] — 重复标识符处理、链变换
//! - [`stats`] — 碱基组成统计与 CSV 输出
//! - [`plot`] — SVG 统计图
//! - [`pipeline`] — 单文件 / 目录批处理
//! - [`config`] — TOML 配置文件
//! - [`util`] — 碱基互补等工具函数

pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod plot;
pub mod stats;
pub mod transform;
pub mod util;

pub use error::{Error, Result};
pub use io::fasta::Sequence;
