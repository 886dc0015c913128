//! Unity 播放器版本
use std::path::Path;
use tracing::debug;

use crate::lookup::read_optional;
use crate::scanner::{byte_regex, capture_first};

/// 新版播放器中 `UnityPlayer/` 之后是格式化占位符而非真实版本
const PLACEHOLDER: &[u8] = b"%s";
const GLOBAL_GAME_MANAGERS: &str = "globalgamemanagers";

/// `captured` 为 `UnityPlayer/` 之后的原始值
/// 占位符时改读 `<exe stem>_Data/globalgamemanagers`：同一目录可能有多个 Unity 可执行文件，
/// 各自对应自己的数据目录
pub(crate) fn unity_version(exe: &Path, captured: Option<&[u8]>) -> Option<String> {
    let captured = captured?;
    if captured != PLACEHOLDER {
        return Some(String::from_utf8_lossy(captured).into_owned());
    }

    let stem = exe.file_stem()?.to_string_lossy();
    let data_dir = exe.with_file_name(format!("{stem}_Data"));
    let data = read_optional(&data_dir.join(GLOBAL_GAME_MANAGERS))?;
    let re = byte_regex(r"\x00(\d{1,4}\.\d+\.\d+[a-z]+\d+)\x00").ok()?;
    let version = capture_first(&re, &data).map(|v| String::from_utf8_lossy(v).into_owned());
    if version.is_none() {
        debug!(path = %data_dir.display(), "no version string in globalgamemanagers");
    }
    version
}
