//! 统计图：序列长度直方图与碱基占比箱线图，输出为独立的 SVG 文件。

use std::fmt::Write as _;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Result;
use crate::stats::{Base, StatsRow};

pub const HISTOGRAM_BINS: usize = 10;
const HISTOGRAM_FILL: &str = "#DDA0DD";
const BOX_COLORS: [&str; 4] = ["#FFC0CB", "#ADD8E6", "#90EE90", "#FFFF66"];

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const LEFT: f64 = 80.0;
const RIGHT: f64 = 30.0;
const TOP: f64 = 50.0;
const BOTTOM: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// bins + 1 个边界，等宽
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// 在 [min, max] 上等宽分箱，最后一个箱包含右端点。
/// 所有值相同时区间扩展为 [x - 0.5, x + 0.5]。
pub fn histogram(values: &[usize], bins: usize) -> Option<Histogram> {
    let lo = *values.iter().min()? as f64;
    let hi = *values.iter().max()? as f64;
    if bins == 0 {
        return None;
    }
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v as f64) - lo) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    Some(Histogram { edges, counts })
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// 线性插值分位数，输入须已排序且非空
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// 须线取 1.5 倍四分位距内最远的数据点，其余为离群点
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let (fence_lo, fence_hi) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let whisker_low = sorted.iter().copied().find(|v| *v >= fence_lo).unwrap_or(q1);
    let whisker_high = sorted.iter().rev().copied().find(|v| *v <= fence_hi).unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < fence_lo || *v > fence_hi)
        .collect();

    Some(BoxSummary { q1, median, q3, whisker_low, whisker_high, outliers })
}

#[derive(Debug, Clone)]
pub struct PlotFiles {
    pub histogram: PathBuf,
    pub boxplot: PathBuf,
}

/// 为一个输入文件生成两张图：`<stem>_histogram.svg` 与 `<stem>_boxplot.svg`
pub fn generate_plots(rows: &[StatsRow], stem: &str, dir: &Path) -> Result<Option<PlotFiles>> {
    let lengths: Vec<usize> = rows.iter().map(|r| r.len).collect();
    let hist = match histogram(&lengths, HISTOGRAM_BINS) {
        Some(h) => h,
        None => {
            warn!("{}: no sequences, skipping plots", stem);
            return Ok(None);
        }
    };

    let boxes: Vec<Option<BoxSummary>> = Base::NUCLEOTIDES
        .iter()
        .map(|&b| {
            let fractions: Vec<f64> = rows.iter().filter_map(|r| r.fraction(b)).collect();
            box_summary(&fractions)
        })
        .collect();

    create_dir_all(dir)?;
    let files = PlotFiles {
        histogram: dir.join(format!("{}_histogram.svg", stem)),
        boxplot: dir.join(format!("{}_boxplot.svg", stem)),
    };
    write(&files.histogram, render_histogram(&hist))?;
    write(&files.boxplot, render_boxplot(&boxes))?;
    debug!(
        "plots written: {} {}",
        files.histogram.display(),
        files.boxplot.display()
    );
    Ok(Some(files))
}

struct Svg {
    buf: String,
}

impl Svg {
    fn new(title: &str) -> Self {
        let mut buf = String::new();
        let _ = writeln!(
            buf,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = WIDTH,
            h = HEIGHT
        );
        let _ = writeln!(
            buf,
            "<desc>fastakit v{} generated {}</desc>",
            env!("CARGO_PKG_VERSION"),
            chrono::Utc::now().to_rfc3339()
        );
        let _ = writeln!(buf, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let mut svg = Svg { buf };
        svg.text(WIDTH / 2.0, TOP / 2.0 + 6.0, 16.0, "middle", title);
        svg
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        let _ = writeln!(
            self.buf,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="black" stroke-width="1"/>"#,
            x, y, w, h, fill
        );
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) {
        let _ = writeln!(
            self.buf,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1"/>"#,
            x1, y1, x2, y2, stroke
        );
    }

    fn circle(&mut self, cx: f64, cy: f64) {
        let _ = writeln!(
            self.buf,
            r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="none" stroke="black"/>"#,
            cx, cy
        );
    }

    fn text(&mut self, x: f64, y: f64, size: f64, anchor: &str, content: &str) {
        let _ = writeln!(
            self.buf,
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="{}">{}</text>"#,
            x, y, size, anchor, content
        );
    }

    fn axes(&mut self, x_label: &str, y_label: &str) {
        let (x0, y0) = (LEFT, HEIGHT - BOTTOM);
        self.line(x0, TOP, x0, y0, "black");
        self.line(x0, y0, WIDTH - RIGHT, y0, "black");
        self.text((LEFT + WIDTH - RIGHT) / 2.0, HEIGHT - 20.0, 13.0, "middle", x_label);
        let _ = writeln!(
            self.buf,
            r#"<text x="20" y="{:.2}" font-size="13" text-anchor="middle" transform="rotate(-90 20 {:.2})">{}</text>"#,
            (TOP + y0) / 2.0,
            (TOP + y0) / 2.0,
            y_label
        );
    }

    fn finish(mut self) -> String {
        self.buf.push_str("</svg>\n");
        self.buf
    }
}

fn plot_width() -> f64 {
    WIDTH - LEFT - RIGHT
}

fn plot_height() -> f64 {
    HEIGHT - TOP - BOTTOM
}

fn format_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

pub fn render_histogram(hist: &Histogram) -> String {
    let mut svg = Svg::new("Histogram of sequence length distribution");
    svg.axes("Sequence length", "Frequency");

    let y0 = HEIGHT - BOTTOM;
    let ymax = hist.counts.iter().copied().max().unwrap_or(0).max(1);
    let step = ((ymax as f64) / 5.0).ceil().max(1.0) as usize;
    let mut tick = 0;
    while tick <= ymax {
        let y = y0 - plot_height() * tick as f64 / ymax as f64;
        svg.line(LEFT - 5.0, y, LEFT, y, "black");
        svg.text(LEFT - 8.0, y + 4.0, 11.0, "end", &tick.to_string());
        tick += step;
    }

    let bins = hist.counts.len().max(1);
    let bw = plot_width() / bins as f64;
    for (i, &count) in hist.counts.iter().enumerate() {
        let h = plot_height() * count as f64 / ymax as f64;
        svg.rect(LEFT + bw * i as f64, y0 - h, bw, h, HISTOGRAM_FILL);
    }
    for (i, edge) in hist.edges.iter().enumerate().step_by(2) {
        let x = LEFT + bw * i as f64;
        svg.line(x, y0, x, y0 + 5.0, "black");
        svg.text(x, y0 + 18.0, 11.0, "middle", &format_tick(*edge));
    }
    svg.finish()
}

pub fn render_boxplot(boxes: &[Option<BoxSummary>]) -> String {
    let mut svg = Svg::new("Relative percentage of bases in the total length of sequences");
    svg.axes("Bases", "Percentage");

    let y0 = HEIGHT - BOTTOM;
    let to_y = |v: f64| y0 - plot_height() * v.clamp(0.0, 1.0);
    for i in 0..=5 {
        let v = i as f64 * 0.2;
        let y = to_y(v);
        if i > 0 {
            svg.line(LEFT, y, WIDTH - RIGHT, y, "#DDDDDD");
        }
        svg.text(LEFT - 8.0, y + 4.0, 11.0, "end", &format!("{:.1}", v));
    }

    let slot = plot_width() / Base::NUCLEOTIDES.len() as f64;
    let half = slot * 0.25;
    for (i, (base, summary)) in Base::NUCLEOTIDES.iter().zip(boxes).enumerate() {
        let cx = LEFT + slot * (i as f64 + 0.5);
        svg.text(cx, y0 + 18.0, 12.0, "middle", &base.symbol().to_string());
        let Some(b) = summary else { continue };
        let color = BOX_COLORS[i % BOX_COLORS.len()];
        svg.line(cx, to_y(b.whisker_low), cx, to_y(b.q1), "black");
        svg.line(cx, to_y(b.q3), cx, to_y(b.whisker_high), "black");
        svg.line(cx - half / 2.0, to_y(b.whisker_low), cx + half / 2.0, to_y(b.whisker_low), "black");
        svg.line(cx - half / 2.0, to_y(b.whisker_high), cx + half / 2.0, to_y(b.whisker_high), "black");
        svg.rect(cx - half, to_y(b.q3), half * 2.0, to_y(b.q1) - to_y(b.q3), color);
        svg.line(cx - half, to_y(b.median), cx + half, to_y(b.median), "#FF8C00");
        for &o in &b.outliers {
            svg.circle(cx, to_y(o));
        }
    }
    svg.finish()
}
