//! 目录内候选可执行文件排序
use regex::Regex;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::error::DetectError;

const EXE_SUFFIX: &str = ".exe";
const KEYWORDS: &str = r"(?i)game|launch|run|start|begin|open|load|init|exec|\.bin$|app";

/// 排序键（升序，越小越先尝试）：
/// 非 .exe 后缀 → 无可执行位 → 不含关键字 → 文件名字典序
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    lacks_exe_suffix: bool,
    lacks_exec_bit: bool,
    lacks_keyword: bool,
    name: String,
}

/// 列出目录下的常规文件并按可能性排序；子目录不参与
pub fn rank(dir: &Path) -> Result<Vec<PathBuf>, DetectError> {
    let keywords = Regex::new(KEYWORDS)?;
    let mut ranked: Vec<(RankKey, PathBuf)> = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|e| DetectError::io(dir, e))? {
        let entry = match entry { Ok(e) => e, Err(_) => continue };
        let path = entry.path();
        // 跟随符号链接
        let meta = match std::fs::metadata(&path) { Ok(m) => m, Err(_) => continue };
        if !meta.is_file() { continue; }
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = RankKey {
            lacks_exe_suffix: !name.ends_with(EXE_SUFFIX),
            lacks_exec_bit: !has_exec_bit(&meta),
            lacks_keyword: !keywords.is_match(&name),
            name,
        };
        ranked.push((key, path));
    }

    ranked.sort_by(|a, b| a.0.cmp(&b.0));
    trace!(dir = %dir.display(), order = ?ranked.iter().map(|(k, _)| &k.name).collect::<Vec<_>>(), "ranked candidates");
    Ok(ranked.into_iter().map(|(_, p)| p).collect())
}

#[cfg(unix)]
fn has_exec_bit(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_meta: &Metadata) -> bool {
    false
}
