//! 规则定义与规则文件加载（TOML）
//!
//! 一条规则 = 探针（在哪里找什么标记）+ 引擎名 + 版本来源。
//! 内置规则见 builtin.rs；规则文件中的条目只能追加在内置规则之后。
use serde::Deserialize;
use std::path::Path;

use crate::error::DetectError;
use crate::lookup::read_sibling;
use crate::scanner::{Hit, Pattern};
use crate::types::DetectionResult;

/// 单次识别的目标上下文：主文件只读取一次，规则共享同一份字节
pub(crate) struct Target<'a> {
    pub(crate) path: &'a Path,
    pub(crate) dir: &'a Path,
    pub(crate) data: &'a [u8],
}

/// 版本提取器：`captured` 为探针命中的捕获组
pub(crate) type Extractor = fn(&Target<'_>, Option<&[u8]>) -> Option<String>;
/// 可同时改写引擎名的提取器；返回 None 时沿用规则引擎名、版本未知
pub(crate) type Refiner = fn(&Target<'_>, Option<&[u8]>) -> Option<DetectionResult>;

pub(crate) enum Probe {
    /// 与目标同级的目录存在
    SiblingDir(&'static str),
    /// 主文件中任一标记命中（按顺序尝试）
    Markers(Vec<Pattern>),
    /// 先查主文件，未命中再查同级文件
    MarkerOrSibling { marker: Pattern, sibling: &'static str },
    /// 标记命中且诱饵串不存在
    Guarded { marker: Pattern, decoy: Pattern },
    /// {标记 × 数据源} 全组合，数据源为主文件与可选的同级库文件
    CrossSource { patterns: Vec<Pattern>, sibling: &'static str },
}

pub(crate) enum Version {
    Unknown,
    Fixed(String),
    Captured,
    Extract(Extractor),
    Refine(Refiner),
}

pub(crate) struct Rule {
    pub(crate) id: String,
    pub(crate) engine: String,
    pub(crate) probe: Probe,
    pub(crate) version: Version,
}

impl Probe {
    /// 命中时返回捕获组（可能为空）
    fn check(&self, target: &Target<'_>) -> Option<Option<Vec<u8>>> {
        match self {
            Probe::SiblingDir(name) => target.dir.join(name).is_dir().then_some(None),
            Probe::Markers(patterns) => patterns.iter().find_map(|p| p.scan(target.data)).map(own),
            Probe::MarkerOrSibling { marker, sibling } => match marker.scan(target.data) {
                Some(hit) => Some(own(hit)),
                None => {
                    let data = read_sibling(target.dir, sibling)?;
                    marker.scan(&data).map(own)
                }
            },
            Probe::Guarded { marker, decoy } => {
                let hit = marker.scan(target.data)?;
                if decoy.is_match(target.data) {
                    return None;
                }
                Some(own(hit))
            }
            Probe::CrossSource { patterns, sibling } => {
                let extra = read_sibling(target.dir, sibling);
                let sources: Vec<&[u8]> = std::iter::once(target.data).chain(extra.as_deref()).collect();
                for p in patterns {
                    for data in &sources {
                        if let Some(hit) = p.scan(data).filter(|h| h.captured.is_some_and(|c| !c.is_empty())) {
                            return Some(own(hit));
                        }
                    }
                }
                None
            }
        }
    }
}

fn own(hit: Hit<'_>) -> Option<Vec<u8>> {
    hit.captured.map(<[u8]>::to_vec)
}

impl Rule {
    pub(crate) fn new(id: &str, engine: &str, probe: Probe, version: Version) -> Self {
        Self { id: id.to_string(), engine: engine.to_string(), probe, version }
    }

    pub(crate) fn evaluate(&self, target: &Target<'_>) -> Option<DetectionResult> {
        let captured = self.probe.check(target)?;
        let captured = captured.as_deref();
        let result = match &self.version {
            Version::Unknown => DetectionResult::unversioned(&self.engine),
            Version::Fixed(v) => DetectionResult::new(&self.engine, Some(v.clone())),
            Version::Captured => DetectionResult::new(
                &self.engine,
                captured.filter(|c| !c.is_empty()).map(|c| String::from_utf8_lossy(c).into_owned()),
            ),
            Version::Extract(extract) => DetectionResult::new(&self.engine, extract(target, captured)),
            Version::Refine(refine) => {
                refine(target, captured).unwrap_or_else(|| DetectionResult::unversioned(&self.engine))
            }
        };
        Some(result)
    }
}

/// 规则文件中的单条规则（`literal` 与 `regex` 二选一）
#[derive(Debug, Clone, Deserialize)]
struct RuleEntry {
    pub id: String,
    pub engine: String,
    #[serde(default)]
    pub literal: Option<String>,
    #[serde(default)]
    pub regex: Option<String>,
    /// 字面量按 UTF-16LE 编码后匹配
    #[serde(default)]
    pub utf16: bool,
    #[serde(default)]
    pub version: Option<String>,
}

/// 顶层规则文件结构
#[derive(Debug, Clone, Deserialize)]
struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// 从 TOML 规则文件加载规则
pub(crate) fn load_rules(path: &Path) -> Result<Vec<Rule>, DetectError> {
    let fail = |message: String| DetectError::RuleFile { path: path.to_path_buf(), message };
    let txt = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    let parsed: RuleFile = toml::from_str(&txt).map_err(|e| fail(e.to_string()))?;

    let mut out = Vec::with_capacity(parsed.rules.len());
    for e in parsed.rules {
        let (probe, version) = match (e.literal, e.regex) {
            (Some(lit), None) => {
                let marker = if e.utf16 { Pattern::utf16(&lit)? } else { Pattern::literal(lit.as_bytes())? };
                (Probe::Markers(vec![marker]), e.version.map_or(Version::Unknown, Version::Fixed))
            }
            (None, Some(re)) if !e.utf16 => {
                // 未给定版本时以第 1 个捕获组为版本
                (Probe::Markers(vec![Pattern::regex(&re)?]), e.version.map_or(Version::Captured, Version::Fixed))
            }
            (None, Some(_)) => return Err(fail(format!("rule `{}`: utf16 applies to literal markers only", e.id))),
            _ => return Err(fail(format!("rule `{}`: exactly one of `literal` or `regex` is required", e.id))),
        };
        out.push(Rule { id: e.id, engine: e.engine, probe, version });
    }

    Ok(out)
}
