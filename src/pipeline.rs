//! 批处理流程：解析 → 重复标识符处理 → 链变换 → 写出，统计与作图独立进行。
//!
//! 配置通过 [`PipelineConfig`] 显式传入，流程本身不读取任何进程状态。
//! 多个文件依次处理，一个文件完成后才开始下一个。

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::io::fasta::{parse_file, CaseMode, FastaFormat, FastaWriter, Sequence};
use crate::plot;
use crate::stats;
use crate::transform::{
    DuplicatePolicy, DuplicateResolver, StrandStyle, StrandTransformer, Transformer,
};

const FASTA_EXTENSIONS: [&str; 7] = ["fasta", "fa", "fas", "fna", "ffn", "faa", "frn"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub case: CaseMode,
    /// 0 = 不换行
    pub wrap: usize,
    pub duplicates: Option<DuplicatePolicy>,
    pub strand: Option<StrandStyle>,
    /// 在输出旁写 `<stem>_stats.csv`
    pub stats: bool,
    pub plots_dir: Option<PathBuf>,
    pub strict: bool,
}

impl PipelineConfig {
    pub fn format(&self) -> FastaFormat {
        FastaFormat { case: self.case, wrap: self.wrap }
    }

    /// 按执行顺序排列的变换：先处理重复标识符，再做链变换
    pub fn transformers(&self) -> Vec<Box<dyn Transformer>> {
        let mut steps: Vec<Box<dyn Transformer>> = Vec::new();
        if let Some(policy) = self.duplicates {
            steps.push(Box::new(DuplicateResolver::new(policy)));
        }
        if let Some(style) = self.strand {
            steps.push(Box::new(StrandTransformer::new(style)));
        }
        steps
    }
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sequences: usize,
    pub stats: Option<PathBuf>,
    pub plots: Option<plot::PlotFiles>,
}

pub fn apply_transformers(mut seqs: Vec<Sequence>, cfg: &PipelineConfig) -> Result<Vec<Sequence>> {
    for step in cfg.transformers() {
        let before = seqs.len();
        seqs = step.transform(&seqs)?;
        debug!("transform step: {} -> {} sequences", before, seqs.len());
    }
    Ok(seqs)
}

pub fn process_file(input: &Path, output: &Path, cfg: &PipelineConfig) -> Result<FileReport> {
    let seqs = parse_file(input, cfg.strict)?;
    info!("{}: {} sequences read", input.display(), seqs.len());
    let seqs = apply_transformers(seqs, cfg)?;

    ensure_parent(output)?;
    let mut writer = FastaWriter::new(BufWriter::new(File::create(output)?), cfg.format());
    writer.write_all(&seqs)?;
    writer.finish()?;
    info!("{}: {} sequences written", output.display(), seqs.len());

    let stem = file_stem(input);
    let rows = if cfg.stats || cfg.plots_dir.is_some() {
        stats::compute_table(&seqs)
    } else {
        Vec::new()
    };

    let stats_path = if cfg.stats {
        let dir = output.parent().unwrap_or_else(|| Path::new(""));
        let path = dir.join(format!("{}_stats.csv", stem));
        stats::write_csv_file(&rows, &path)?;
        info!("statistics written: {}", path.display());
        Some(path)
    } else {
        None
    };

    let plots = match &cfg.plots_dir {
        Some(dir) => plot::generate_plots(&rows, &stem, dir)?,
        None => None,
    };

    Ok(FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        sequences: seqs.len(),
        stats: stats_path,
        plots,
    })
}

/// 处理目录中的每个 FASTA 文件，输出为 `<output_dir>/<stem>_result.fasta`
pub fn process_dir(input_dir: &Path, output_dir: &Path, cfg: &PipelineConfig) -> Result<Vec<FileReport>> {
    let files = fasta_files(input_dir)?;
    create_dir_all(output_dir)?;
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let out = output_dir.join(format!("{}_result.fasta", file_stem(&file)));
        reports.push(process_file(&file, &out, cfg)?);
    }
    Ok(reports)
}

pub fn process(input: &Path, output: &Path, cfg: &PipelineConfig) -> Result<Vec<FileReport>> {
    if input.is_dir() {
        process_dir(input, output, cfg)
    } else if input.is_file() {
        Ok(vec![process_file(input, output, cfg)?])
    } else {
        Err(Error::InputNotFound(input.to_path_buf()))
    }
}

/// 仅统计：写出 CSV，可选作图。返回序列条数
pub fn summarize_file(input: &Path, csv_out: &Path, plots_dir: Option<&Path>, strict: bool) -> Result<usize> {
    let seqs = parse_file(input, strict)?;
    let rows = stats::compute_table(&seqs);
    stats::write_csv_file(&rows, csv_out)?;
    info!("{}: statistics for {} sequences written to {}", input.display(), rows.len(), csv_out.display());
    if let Some(dir) = plots_dir {
        plot::generate_plots(&rows, &file_stem(input), dir)?;
    }
    Ok(rows.len())
}

/// 目录模式：每个文件写 `<out_dir>/<stem>.csv`
pub fn summarize_dir(input_dir: &Path, out_dir: &Path, plots_dir: Option<&Path>, strict: bool) -> Result<usize> {
    let files = fasta_files(input_dir)?;
    create_dir_all(out_dir)?;
    let mut total = 0;
    for file in &files {
        let csv_out = out_dir.join(format!("{}.csv", file_stem(file)));
        total += summarize_file(file, &csv_out, plots_dir, strict)?;
    }
    Ok(total)
}

pub fn summarize(input: &Path, output: &Path, plots_dir: Option<&Path>, strict: bool) -> Result<usize> {
    if input.is_dir() {
        summarize_dir(input, output, plots_dir, strict)
    } else if input.is_file() {
        summarize_file(input, output, plots_dir, strict)
    } else {
        Err(Error::InputNotFound(input.to_path_buf()))
    }
}

pub fn is_fasta_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| FASTA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 目录下（不递归）的 FASTA 文件，按文件名排序。
/// 输出以文件名主干命名，主干重复（如 `a.fa` 与 `a.fasta`）时报错
pub fn fasta_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_fasta_path(&path) {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(Error::NoInputFiles(dir.to_path_buf()));
    }
    files.sort();

    let mut stems: HashMap<String, &PathBuf> = HashMap::new();
    for file in &files {
        if let Some(first) = stems.insert(file_stem(file), file) {
            return Err(Error::DuplicateStem {
                stem: file_stem(file),
                first: first.clone(),
                second: file.clone(),
            });
        }
    }
    debug!("{}: {} FASTA files", dir.display(), files.len());
    Ok(files)
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequences".to_string())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}
