//! 各引擎的版本提取器
//!
//! 提取器只读取辅助文件，任何缺失或格式不符都降级为“下一来源”或“版本未知”，
//! 不返回错误。
mod mkxp;
mod nwjs;
mod renpy;
mod rgss;
mod unity;

pub(crate) use mkxp::mkxp_version;
pub(crate) use nwjs::rpg_maker_scripts;
pub(crate) use renpy::renpy_version;
pub(crate) use rgss::RgssGeneration;
pub(crate) use unity::unity_version;
