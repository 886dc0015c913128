//! 游戏引擎指纹识别库
//!
//! 设计要点：
//! - 所有标记按“字节级”匹配（`regex::bytes` / Aho-Corasick），UTF-16LE 标记逐字节比较。
//! - 规则是一张有序表，自上而下求值、首个命中即返回；新增引擎只在表尾追加。
//! - 目录目标先对文件排序，再逐个交给文件识别；主文件只读取一次。
//! - 主目标读取失败是硬错误（`DetectError::Io`），与“未识别”（`Ok(None)`）严格区分；
//!   辅助文件缺失或损坏只会让版本退化为未知。

mod builtin;
mod candidates;
mod detectors;
mod error;
mod extractors;
mod lookup;
mod options;
mod resolver;
mod rules;
mod scan;
mod scanner;
mod types;

// 对外暴露
pub use candidates::rank as rank_candidates;
pub use error::DetectError;
pub use options::{BatchStats, DetectOptions, OutputFormat};
pub use resolver::{detect, Detector};
pub use scan::{detect_and_write, NOT_FOUND_MARKER};
pub use types::{DetectionResult, OutputItem};
