//! RGSS 代际与脚本归档后缀
use std::fmt;

/// RPG Maker 脚本系统的三个代际
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RgssGeneration {
    Xp,
    Vx,
    VxAce,
}

impl RgssGeneration {
    /// 按数据文件探测顺序排列
    pub(crate) const ALL: [RgssGeneration; 3] = [RgssGeneration::Xp, RgssGeneration::Vx, RgssGeneration::VxAce];

    /// `rgssVersion` 配置值：1/2/3，其余（含 0）视为未指定
    pub(crate) fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(RgssGeneration::Xp),
            2 => Some(RgssGeneration::Vx),
            3 => Some(RgssGeneration::VxAce),
            _ => None,
        }
    }

    pub(crate) fn archive_extension(self) -> &'static str {
        match self {
            RgssGeneration::Xp => ".rxdata",
            RgssGeneration::Vx => ".rvdata",
            RgssGeneration::VxAce => ".rvdata2",
        }
    }

    /// 由脚本归档文件名后缀推断代际
    pub(crate) fn from_archive_suffix(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| name.ends_with(g.archive_extension()))
    }

    pub(crate) fn display_name(self) -> &'static str {
        match self {
            RgssGeneration::Xp => "XP",
            RgssGeneration::Vx => "VX",
            RgssGeneration::VxAce => "VX Ace",
        }
    }
}

impl fmt::Display for RgssGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
