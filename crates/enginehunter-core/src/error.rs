//! 错误类型
//!
//! 只有“主目标读不到”和“规则本身不合法”会以错误形式返回；
//! 辅助文件缺失、结构化数据损坏等情况由各提取器降级处理，不会出现在这里。
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    /// 主目标（文件或目录）无法读取
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid marker regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid literal marker: {0}")]
    Literal(#[from] aho_corasick::BuildError),

    /// 用户规则文件读取/解析失败
    #[error("rule file {}: {message}", .path.display())]
    RuleFile { path: PathBuf, message: String },
}

impl DetectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DetectError::Io { path: path.into(), source }
    }
}
