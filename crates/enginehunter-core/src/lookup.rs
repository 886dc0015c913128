//! 辅助文件查找
//!
//! 所有函数都把“文件不存在/读不到/解析失败”视为“没有额外证据”，返回 None 或空列表，
//! 从不向调用方抛错；只有主目标的读取失败才是硬错误（见 resolver）。
use encoding_rs::SHIFT_JIS;
use ini::{Ini, ParseOption};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// 读取同级文件；缺失即 None
pub(crate) fn read_sibling(base_dir: &Path, name: impl AsRef<Path>) -> Option<Vec<u8>> {
    read_optional(&base_dir.join(name))
}

pub(crate) fn read_optional(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(data) => Some(data),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "auxiliary file unreadable");
            }
            None
        }
    }
}

/// 按模式列出条目（文件与目录均包含），结果按文件名排序
/// - `*.ini`：仅 base_dir 当前层
/// - `**/*.js`：递归所有子目录
/// - 文件名部分最多支持一个 `*`
pub(crate) fn glob(base_dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let (recursive, name_pat) = match pattern.strip_prefix("**/") {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let max_depth = if recursive { usize::MAX } else { 1 };

    WalkDir::new(base_dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_str().is_some_and(|n| name_matches(n, name_pat)))
        .map(|e| e.into_path())
        .collect()
}

/// 单个 `*` 通配的文件名匹配
fn name_matches(name: &str, pattern: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            name.len() >= prefix.len() + suffix.len() && name.starts_with(prefix) && name.ends_with(suffix)
        }
        None => name == pattern,
    }
}

/// 读取 INI 风格配置；默认 UTF-8，解码失败时以 Shift_JIS 重试一次
pub(crate) fn read_config(path: &Path) -> Option<Ini> {
    let raw = read_optional(path)?;
    parse_config(&decode_config_text(&raw)?)
}

/// 读取缺少节头的配置文件：在正文前补一个合成节头后再解析
pub(crate) fn read_headerless_config(path: &Path, section: &str) -> Option<Ini> {
    let raw = read_optional(path)?;
    let text = decode_config_text(&raw)?;
    parse_config(&format!("[{section}]\n{text}"))
}

/// 节名区分大小写，键名不区分（与常见 INI 读取器一致）
pub(crate) fn config_value<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
}

fn decode_config_text(raw: &[u8]) -> Option<Cow<'_, str>> {
    match std::str::from_utf8(raw) {
        Ok(s) => Some(Cow::Borrowed(s.strip_prefix('\u{feff}').unwrap_or(s))),
        // 日文游戏的配置常见 Shift_JIS
        Err(_) => SHIFT_JIS.decode_without_bom_handling_and_without_replacement(raw),
    }
}

fn parse_config(text: &str) -> Option<Ini> {
    // 关闭转义：`Scripts=Data\Scripts.rxdata` 中的反斜杠须原样保留；
    // 关闭引号处理：`Title="...` 这类未闭合的引号不应让整个文件解析失败
    let opt = ParseOption { enabled_quote: false, enabled_escape: false, ..ParseOption::default() };
    match Ini::load_from_str_opt(text, opt) {
        Ok(ini) => Some(ini),
        Err(e) => {
            debug!(error = %e, "config parse failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_sibling_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_sibling(dir.path(), "UnityPlayer.dll").is_none());
    }

    #[test]
    fn glob_shallow_and_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("www/js")).unwrap();
        fs::write(dir.path().join("Game.ini"), "").unwrap();
        fs::write(dir.path().join("b.js"), "").unwrap();
        fs::write(dir.path().join("www/js/a.js"), "").unwrap();

        assert_eq!(glob(dir.path(), "*.ini"), vec![dir.path().join("Game.ini")]);
        assert_eq!(glob(dir.path(), "*.js"), vec![dir.path().join("b.js")]);
        let all = glob(dir.path(), "**/*.js");
        assert_eq!(all.len(), 2);
        assert!(glob(dir.path(), "*.txt").is_empty());
    }

    #[test]
    fn name_pattern_prefix_form() {
        assert!(name_matches("python2.7", "python2.*"));
        assert!(!name_matches("python3.9", "python2.*"));
        assert!(!name_matches("x.in", "*.ini"));
    }

    #[test]
    fn shift_jis_config_falls_back() {
        let dir = TempDir::new().unwrap();
        let (encoded, _, _) = SHIFT_JIS.encode("[Game]\nTitle=ゲーム\nScripts=Data\\Scripts.rvdata\n");
        let path = dir.path().join("Game.ini");
        fs::write(&path, &encoded).unwrap();
        assert!(std::str::from_utf8(&encoded).is_err());

        let ini = read_config(&path).unwrap();
        assert_eq!(config_value(&ini, "Game", "scripts"), Some("Data\\Scripts.rvdata"));
        assert_eq!(config_value(&ini, "Game", "Title"), Some("ゲーム"));
    }

    #[test]
    fn quotes_and_backslashes_are_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Game.ini");
        fs::write(&path, "[Game]\nTitle=\"Unclosed\nScripts=Data\\Scripts.rvdata\n").unwrap();

        let ini = read_config(&path).unwrap();
        assert_eq!(config_value(&ini, "Game", "Title"), Some("\"Unclosed"));
        assert_eq!(config_value(&ini, "Game", "Scripts"), Some("Data\\Scripts.rvdata"));
    }

    #[test]
    fn headerless_config_gets_synthetic_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mkxp.conf");
        fs::write(&path, "# comment\nrgssVersion=3\n").unwrap();
        let ini = read_headerless_config(&path, "top").unwrap();
        assert_eq!(config_value(&ini, "top", "rgssVersion"), Some("3"));
    }
}
