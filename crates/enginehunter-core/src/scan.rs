//! 批量识别与并行调度
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::error::DetectError;
use crate::options::{BatchStats, DetectOptions, OutputFormat};
use crate::resolver::Detector;
use crate::types::{DetectionResult, OutputItem};

/// 未识别时的占位符
pub const NOT_FOUND_MARKER: &str = "!!!";

type Outcome = Result<Option<DetectionResult>, DetectError>;

/// 逐个识别目标并按输入顺序写出结果
/// - 单个目标的读取错误记入该项（并计数），不影响其他目标
/// - 并行时由单线程 Writer 按下标重排，输出顺序与输入一致
pub fn detect_and_write(
    targets: &[PathBuf],
    out: &mut dyn Write,
    format: OutputFormat,
    opts: &DetectOptions,
) -> Result<BatchStats> {
    let detector = Arc::new(Detector::with_options(opts)?);
    let mut stats = BatchStats::default();
    let mut writer = ItemWriter::new(out, format);

    let threads = opts.threads.unwrap_or_else(num_cpus::get);
    if threads > 1 && targets.len() > 1 {
        detect_parallel(targets, &detector, &mut writer, &mut stats, threads)?;
    } else {
        // 串行路径
        writer.begin()?;
        for target in targets {
            let outcome = detector.detect(target);
            writer.write(target, &outcome, &mut stats)?;
        }
    }
    writer.finish()?;
    Ok(stats)
}

/// 并行调度：
/// - 在后台线程内建 Rayon 线程池并行识别
/// - 当前线程作为 Writer，按 idx 重排后流式写出
fn detect_parallel(
    targets: &[PathBuf],
    detector: &Arc<Detector>,
    writer: &mut ItemWriter<'_>,
    stats: &mut BatchStats,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;
    use std::collections::BTreeMap;

    writer.begin()?;

    let (tx, rx) = channel::bounded::<(usize, Outcome)>(256);
    let detector = Arc::clone(detector);
    let indexed: Vec<(usize, PathBuf)> = targets.iter().cloned().enumerate().collect();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let worker = std::thread::spawn(move || {
        pool.install(|| {
            indexed.par_iter().for_each_with(tx, |tx, (idx, path)| {
                let _ = tx.send((*idx, detector.detect(path)));
            });
        });
        // 所有 Sender 随之释放，Receiver 收到关闭信号
    });

    let mut next_idx: usize = 0;
    let mut pending: BTreeMap<usize, Outcome> = BTreeMap::new();
    while let Ok((idx, outcome)) = rx.recv() {
        pending.insert(idx, outcome);
        while let Some(outcome) = pending.remove(&next_idx) {
            writer.write(&targets[next_idx], &outcome, stats)?;
            next_idx += 1;
        }
    }

    if worker.join().is_err() {
        anyhow::bail!("detection worker panicked");
    }
    Ok(())
}

/// 结果写出（Text 每行一项；Json 为流式数组）
struct ItemWriter<'w> {
    out: &'w mut dyn Write,
    format: OutputFormat,
    first: bool,
}

impl<'w> ItemWriter<'w> {
    fn new(out: &'w mut dyn Write, format: OutputFormat) -> Self {
        Self { out, format, first: true }
    }

    fn begin(&mut self) -> Result<()> {
        if self.format == OutputFormat::Json {
            write!(self.out, "[")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.format == OutputFormat::Json {
            writeln!(self.out, "]")?;
        }
        Ok(())
    }

    fn write(&mut self, target: &std::path::Path, outcome: &Outcome, stats: &mut BatchStats) -> Result<()> {
        stats.targets += 1;
        let error_text = match outcome {
            Ok(Some(_)) => { stats.detected += 1; None }
            Ok(None) => { stats.not_found += 1; None }
            Err(e) => {
                stats.errors += 1;
                warn!(path = %target.display(), error = %e, "detection failed");
                Some(e.to_string())
            }
        };
        let path = target.to_string_lossy();
        let found = outcome.as_ref().ok().and_then(Option::as_ref);

        match self.format {
            OutputFormat::Text => match (found, &error_text) {
                (Some(r), _) => writeln!(self.out, "{path}: {r}")?,
                (None, Some(err)) => writeln!(self.out, "{path}: error: {err}")?,
                (None, None) => writeln!(self.out, "{path}: {NOT_FOUND_MARKER}")?,
            },
            OutputFormat::Json => {
                if !self.first { write!(self.out, ",")?; } else { self.first = false; }
                let item = OutputItem {
                    path: &path,
                    engine: found.map(|r| r.engine.as_str()),
                    version: found.and_then(|r| r.version.as_deref()),
                    error: error_text.as_deref(),
                };
                serde_json::to_writer(&mut *self.out, &item)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.exe");
        let b = dir.path().join("b.exe");
        fs::write(&a, b"xx\x00WOLF_FileReadText").unwrap();
        fs::write(&b, b"plain").unwrap();
        let missing = dir.path().join("missing.exe");
        (dir, vec![a, b, missing])
    }

    #[test]
    fn text_output_in_input_order() {
        let (_dir, targets) = fixture();
        let mut out = Vec::new();
        let opts = DetectOptions { threads: Some(1), ..Default::default() };
        let stats = detect_and_write(&targets, &mut out, OutputFormat::Text, &opts).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("a.exe: WOLF RPG Editor"));
        assert!(lines[1].ends_with("b.exe: !!!"));
        assert!(lines[2].contains("missing.exe: error:"));
        assert_eq!(stats, BatchStats { targets: 3, detected: 1, not_found: 1, errors: 1 });
    }

    #[test]
    fn parallel_json_keeps_order() {
        let (_dir, targets) = fixture();
        let mut out = Vec::new();
        let opts = DetectOptions { threads: Some(4), ..Default::default() };
        let stats = detect_and_write(&targets, &mut out, OutputFormat::Json, &opts).unwrap();

        let items: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["engine"], "WOLF RPG Editor");
        assert!(items[1]["engine"].is_null());
        assert!(items[1]["error"].is_null());
        assert!(items[2]["error"].is_string());
        assert_eq!(stats.targets, 3);
    }
}
