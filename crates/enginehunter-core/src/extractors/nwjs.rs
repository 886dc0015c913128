//! NW.js 外壳下的 RPG Maker MV/MZ 识别：递归扫描脚本中的 `Utils.RPGMAKER_*` 赋值
use std::path::Path;
use tracing::debug;

use crate::lookup::{glob, read_optional};
use crate::scanner::{byte_regex, capture_first};
use crate::types::DetectionResult;

// MV 与 MZ 使用不同的引号
const NAME_ASSIGN: &str = r#"Utils\.RPGMAKER_NAME = ['"]([A-Za-z]+)['"];"#;
const VERSION_ASSIGN: &str = r#"Utils\.RPGMAKER_VERSION = ['"]([0-9\.]+)['"];"#;

/// 名称与版本可能来自不同脚本；两者齐全即停止遍历
pub(crate) fn rpg_maker_scripts(game_dir: &Path) -> Option<DetectionResult> {
    let name_re = byte_regex(NAME_ASSIGN).ok()?;
    let version_re = byte_regex(VERSION_ASSIGN).ok()?;

    let mut name: Option<String> = None;
    let mut version: Option<String> = None;
    for script in glob(game_dir, "**/*.js") {
        if !script.is_file() { continue; }
        let data = match read_optional(&script) { Some(d) => d, None => continue };
        if name.is_none() {
            name = capture_first(&name_re, &data).map(|g| String::from_utf8_lossy(g).into_owned());
        }
        if version.is_none() {
            version = capture_first(&version_re, &data).map(|g| String::from_utf8_lossy(g).into_owned());
        }
        if name.is_some() && version.is_some() {
            break;
        }
    }

    match (name, version) {
        (Some(name), Some(version)) => Some(DetectionResult::new("RPG Maker", Some(format!("{name} {version}")))),
        (name, version) => {
            debug!(name = ?name, version = ?version, "no complete RPGMAKER assignment in scripts");
            None
        }
    }
}
