//! 有序规则集
use std::path::Path;
use tracing::debug;

use crate::builtin::builtin_rules;
use crate::error::DetectError;
use crate::rules::{load_rules, Rule, Target};
use crate::types::DetectionResult;

/// 启动时构建一次，之后只读；可在线程间共享
pub(crate) struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub(crate) fn builtin() -> Result<Self, DetectError> {
        Ok(Self { rules: builtin_rules()? })
    }

    /// 内置规则 + 规则文件（追加在末尾）
    pub(crate) fn with_rule_file(path: Option<&Path>) -> Result<Self, DetectError> {
        let mut set = Self::builtin()?;
        if let Some(path) = path {
            let extra = load_rules(path)?;
            debug!(path = %path.display(), count = extra.len(), "loaded extra rules");
            set.rules.extend(extra);
        }
        Ok(set)
    }

    /// 自上而下求值，首个命中即返回
    pub(crate) fn evaluate(&self, target: &Target<'_>) -> Option<DetectionResult> {
        self.rules.iter().find_map(|rule| {
            let result = rule.evaluate(target)?;
            debug!(rule = %rule.id, path = %target.path.display(), %result, "rule matched");
            Some(result)
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }
}
