//! 字节级标记匹配（字面量 + 正则）
//!
//! 所有标记都按字节匹配，不做任何文本解码：
//! - 字面量（可为多个备选）使用 Aho-Corasick，命中即返回；
//! - 正则一律以“非 Unicode + `.` 匹配换行”模式编译，`\x00`/`\xFF` 即原始字节，
//!   可直接跨越嵌入的 NUL 分隔符，也能匹配 UTF-16LE 编码的 ASCII 串。
use aho_corasick::AhoCorasick;
use regex::bytes::{Regex, RegexBuilder};

use crate::error::DetectError;

/// 单个可匹配的标记
#[derive(Debug, Clone)]
pub(crate) enum Pattern {
    /// 任一字面量出现即命中
    Literal(AhoCorasick),
    /// 字节正则；若存在第 1 个捕获组则作为捕获值
    Regex(Regex),
}

/// 一次命中；`captured` 为第 1 个捕获组（若有）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Hit<'a> {
    pub(crate) captured: Option<&'a [u8]>,
}

impl Pattern {
    pub(crate) fn literal(bytes: impl AsRef<[u8]>) -> Result<Self, DetectError> {
        Self::any_literal(&[bytes.as_ref()])
    }

    pub(crate) fn any_literal(alternatives: &[&[u8]]) -> Result<Self, DetectError> {
        Ok(Pattern::Literal(AhoCorasick::new(alternatives)?))
    }

    /// ASCII 字面量按 UTF-16LE 编码后匹配
    pub(crate) fn utf16(text: &str) -> Result<Self, DetectError> {
        Self::literal(utf16le(text))
    }

    pub(crate) fn regex(pat: &str) -> Result<Self, DetectError> {
        Ok(Pattern::Regex(byte_regex(pat)?))
    }

    /// 在缓冲区内查找第一个命中
    pub(crate) fn scan<'a>(&self, buf: &'a [u8]) -> Option<Hit<'a>> {
        match self {
            Pattern::Literal(ac) => ac.find(buf).map(|_| Hit { captured: None }),
            Pattern::Regex(re) => {
                let caps = re.captures(buf)?;
                Some(Hit { captured: caps.get(1).map(|m| m.as_bytes()) })
            }
        }
    }

    pub(crate) fn is_match(&self, buf: &[u8]) -> bool {
        match self {
            Pattern::Literal(ac) => ac.is_match(buf),
            Pattern::Regex(re) => re.is_match(buf),
        }
    }
}

/// 按本模块约定编译字节正则（提取器也统一走这里）
pub(crate) fn byte_regex(pat: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pat).unicode(false).dot_matches_new_line(true).build()
}

/// 取第 1 个捕获组（无则 None）
pub(crate) fn capture_first<'a>(re: &Regex, buf: &'a [u8]) -> Option<&'a [u8]> {
    re.captures(buf)?.get(1).map(|m| m.as_bytes())
}

/// 将文本编码为 UTF-16LE 字节
pub(crate) fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_alternatives_match_any() {
        let p = Pattern::any_literal(&[b"alpha".as_slice(), b"beta".as_slice()]).unwrap();
        assert!(p.is_match(b"xx beta yy"));
        assert!(p.scan(b"gamma").is_none());
    }

    #[test]
    fn regex_spans_nul_bytes_and_captures() {
        let p = Pattern::regex(r"\x00UnityPlayer/([^\x20]+)").unwrap();
        let buf = b"\x01\x00UnityPlayer/2019.4.1f1 (x)";
        let hit = p.scan(buf).unwrap();
        assert_eq!(hit.captured, Some(&b"2019.4.1f1"[..]));
    }

    #[test]
    fn regex_matches_raw_high_bytes() {
        let p = Pattern::regex(r"\xFF{3}\x00([\d.]+)\x00").unwrap();
        let hit = p.scan(b"\xFF\xFF\xFF\x003.17\x00").unwrap();
        assert_eq!(hit.captured, Some(&b"3.17"[..]));
    }

    #[test]
    fn utf16_marker_is_matched_byte_for_byte() {
        let p = Pattern::utf16("RGSS Player").unwrap();
        assert!(p.is_match(&utf16le("..RGSS Player..")));
        // 纯 ASCII 形式不应命中
        assert!(!p.is_match(b"RGSS Player"));
    }
}
