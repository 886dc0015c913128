//! 识别选项与统计信息（模块）
use std::path::PathBuf;

/// 批量输出格式
/// - Text：每行 `<path>: <engine> <version>`，未识别输出占位符 `!!!`
/// - Json：流式 JSON 数组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 识别选项
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// 额外规则文件路径（TOML）；为空则只使用内置规则
    pub rules_path: Option<PathBuf>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
}

/// 批量识别统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub targets: usize,
    pub detected: usize,
    pub not_found: usize,
    pub errors: usize,
}
