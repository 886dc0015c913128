//! Ren'Py 版本解码
//!
//! 版本号由两部分拼接：
//! - `renpy/__init__.pyo` 中编译后的 `version_tuple` 前缀（3~5 个整数）
//! - `renpy/vc_version.pyo` 中的 `vc_version` 整数
//!
//! 每部分先尝试字节码记录（标签字节 `i` + 小端 u32），失败再回退到对应的 `.py` 源文件。
use std::path::Path;
use tracing::debug;

use crate::lookup::{glob, read_optional};
use crate::scanner::{byte_regex, capture_first};

/// 字节码记录：1 字节标签 + 4 字节小端整数
const RECORD_LEN: usize = 5;
const INT_TAG: u8 = b'i';
/// 7.x 及以下运行于 Python 2
const PYTHON2_MAX_MAJOR: u32 = 7;

pub(crate) fn renpy_version(game_dir: &Path) -> Option<String> {
    let pkg = game_dir.join("renpy");

    let head = read_optional(&pkg.join("__init__.pyo"))
        .and_then(|data| decode_version_tuple(&data))
        .or_else(|| read_text(&pkg.join("__init__.py")).and_then(|src| parse_version_tuple_source(&src, game_dir)));
    let tail = read_optional(&pkg.join("vc_version.pyo"))
        .and_then(|data| decode_vc_version(&data))
        .or_else(|| read_text(&pkg.join("vc_version.py")).and_then(|src| parse_vc_version_source(&src)));

    match (head, tail) {
        (Some(head), Some(tail)) => Some(format!("{head}.{tail}")),
        (head, tail) => {
            debug!(head = head.is_some(), tail = tail.is_some(), "Ren'Py version incomplete");
            None
        }
    }
}

/// `vc_version` 常量 0 之后紧跟的版本元组记录
pub(crate) fn decode_version_tuple(data: &[u8]) -> Option<String> {
    let re = byte_regex(r"vc_versioni\x00{4}((?:i.{4}){3,5})s").ok()?;
    join_records(capture_first(&re, data)?)
}

pub(crate) fn decode_vc_version(data: &[u8]) -> Option<String> {
    let re = byte_regex(r"\x00{3}(i.{4})").ok()?;
    join_records(capture_first(&re, data)?)
}

/// 记录序列 → `a.b.c`；长度或标签不符即视为不可解析
fn join_records(records: &[u8]) -> Option<String> {
    if records.is_empty() || records.len() % RECORD_LEN != 0 {
        return None;
    }
    let values = records
        .chunks_exact(RECORD_LEN)
        .map(|rec| {
            if rec[0] != INT_TAG {
                return None;
            }
            Some(u32::from_le_bytes([rec[1], rec[2], rec[3], rec[4]]).to_string())
        })
        .collect::<Option<Vec<_>>>()?;
    Some(values.join("."))
}

/// 源码回退：只有当 `lib/` 下存在与主版本匹配的解释器目录时才采信，
/// 以免读到残留的旧源码
fn parse_version_tuple_source(src: &str, game_dir: &Path) -> Option<String> {
    let re = regex::Regex::new(r"version_tuple = \(([0-9]+), ([0-9]+), ([0-9]+), vc_version\)").ok()?;
    let lib = game_dir.join("lib");
    let found = re.captures_iter(src).find_map(|caps| {
        let major: u32 = caps[1].parse().ok()?;
        let interpreter = if major <= PYTHON2_MAX_MAJOR { "python2.*" } else { "python3.*" };
        if glob(&lib, interpreter).is_empty() {
            debug!(major, interpreter, "version_tuple without matching interpreter, skipped");
            return None;
        }
        Some(format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
    });
    found
}

fn parse_vc_version_source(src: &str) -> Option<String> {
    let re = regex::Regex::new(r"vc_version = ([0-9]+)").ok()?;
    re.captures(src).map(|caps| caps[1].to_string())
}

fn read_text(path: &Path) -> Option<String> {
    String::from_utf8(read_optional(path)?).ok()
}
