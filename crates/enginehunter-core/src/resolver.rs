//! 入口：目录 → 候选文件 → 规则集
use std::path::Path;
use tracing::{debug, trace};

use crate::candidates::rank;
use crate::detectors::RuleSet;
use crate::error::DetectError;
use crate::options::DetectOptions;
use crate::rules::Target;
use crate::types::DetectionResult;

/// 引擎识别器：规则在构建时编译一次，`detect` 之间不共享任何可变状态
pub struct Detector {
    rules: RuleSet,
}

impl Detector {
    /// 仅内置规则
    pub fn new() -> Result<Self, DetectError> {
        Ok(Self { rules: RuleSet::builtin()? })
    }

    pub fn with_options(opts: &DetectOptions) -> Result<Self, DetectError> {
        let rules = RuleSet::with_rule_file(opts.rules_path.as_deref())?;
        debug!(rules = rules.len(), "detector ready");
        Ok(Self { rules })
    }

    /// 识别目标（文件或目录）
    /// - `Ok(None)`：没有任何规则命中
    /// - `Err(DetectError::Io)`：主目标无法读取
    pub fn detect(&self, target: &Path) -> Result<Option<DetectionResult>, DetectError> {
        if target.is_dir() {
            self.detect_folder(target)
        } else {
            self.detect_file(target)
        }
    }

    /// 按排序依次尝试目录下的文件；子目录不递归
    /// - 任一候选文件读取失败即返回 `DetectError::Io`，排在其后的候选不再尝试
    pub fn detect_folder(&self, dir: &Path) -> Result<Option<DetectionResult>, DetectError> {
        for candidate in rank(dir)? {
            trace!(candidate = %candidate.display(), "trying candidate");
            if let Some(found) = self.detect_file(&candidate)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// 主文件只读一次；同级目录作为辅助查找的基准
    pub fn detect_file(&self, path: &Path) -> Result<Option<DetectionResult>, DetectError> {
        let data = std::fs::read(path).map_err(|e| DetectError::io(path, e))?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        Ok(self.rules.evaluate(&Target { path, dir, data: &data }))
    }
}

/// 使用内置规则识别单个目标
pub fn detect(target: &Path) -> Result<Option<DetectionResult>, DetectError> {
    Detector::new()?.detect(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn folder_tries_candidates_in_rank_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.txt"), b"\x00WOLF_FileReadText").unwrap();
        fs::write(dir.path().join("Game.exe"), b"org/lwjgl/LWJGL").unwrap();
        let found = Detector::new().unwrap().detect(dir.path()).unwrap().unwrap();
        assert_eq!(found.engine, "LWJGL");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_candidate_aborts_folder() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("a.exe");
        fs::write(&locked, b"").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        fs::write(dir.path().join("b.exe"), b"\x00WOLF_FileReadText").unwrap();
        // root 不受权限位限制，此时无法构造不可读文件
        if fs::read(&locked).is_ok() {
            return;
        }

        let err = Detector::new().unwrap().detect(dir.path()).unwrap_err();
        assert!(matches!(err, DetectError::Io { ref path, .. } if path == &locked));
    }
}
