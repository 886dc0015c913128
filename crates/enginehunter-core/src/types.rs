//! 公共类型（对外暴露）
use serde::Serialize;
use std::fmt;

/// 识别结果
/// - `version == None` 表示“引擎已识别、版本未知”
/// - “未识别”由外层的 `Option::None` 表示，两者不混用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub engine: String,
    pub version: Option<String>,
}

impl DetectionResult {
    pub fn new(engine: impl Into<String>, version: Option<String>) -> Self {
        Self { engine: engine.into(), version }
    }

    pub fn unversioned(engine: impl Into<String>) -> Self {
        Self::new(engine, None)
    }
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {}", self.engine, v),
            None => f.write_str(&self.engine),
        }
    }
}

/// 批量输出项（对应 JSON 数组中的单个元素）
#[derive(Debug, Clone, Serialize)]
pub struct OutputItem<'a> {
    pub path: &'a str,
    pub engine: Option<&'a str>,
    pub version: Option<&'a str>,
    pub error: Option<&'a str>,
}
