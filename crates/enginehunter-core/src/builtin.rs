//! 内置规则表
//!
//! 顺序即优先级：部分标记是其他标记的子串或会与之同时出现，
//! 靠前的规则更具体或更可靠。新增引擎只需在末尾追加。
use crate::error::DetectError;
use crate::extractors::{mkxp_version, renpy_version, rpg_maker_scripts, unity_version, RgssGeneration};
use crate::rules::{Probe, Rule, Version};
use crate::scanner::Pattern;

pub(crate) fn builtin_rules() -> Result<Vec<Rule>, DetectError> {
    use Probe::*;

    let rgss = |g: RgssGeneration| Version::Fixed(g.display_name().to_string());

    Ok(vec![
        // 目录结构
        Rule::new("adobe-air", "Adobe AIR", SiblingDir("Adobe AIR"), Version::Unknown),
        Rule::new("renpy", "Ren'Py", SiblingDir("renpy"), Version::Extract(|t, _| renpy_version(t.dir))),
        // 主文件及辅助文件标记
        Rule::new(
            "unity",
            "Unity",
            MarkerOrSibling { marker: Pattern::regex(r"\x00UnityPlayer/([^\x20]+)")?, sibling: "UnityPlayer.dll" },
            Version::Extract(|t, captured| unity_version(t.path, captured)),
        ),
        Rule::new(
            "gamemaker",
            "GameMaker",
            Markers(vec![
                Pattern::literal(b"Made with GameMaker: Studio\x00")?,
                // 仅 Windows 运行器带有
                Pattern::literal(br#"name="YoYoGames.GameMaker.Runner""#)?,
            ]),
            Version::Unknown,
        ),
        Rule::new(
            "unreal-3",
            "Unreal Engine 3",
            Markers(vec![Pattern::regex(r"Unreal Engine 3 Licensee\x00{4}Unreal Engine 3")?]),
            Version::Unknown,
        ),
        Rule::new("unreal-4", "Unreal Engine 4", Markers(vec![Pattern::utf16(r"\UE4PrereqSetup")?]), Version::Unknown),
        Rule::new("lwjgl", "LWJGL", Markers(vec![Pattern::literal(b"org/lwjgl/LWJGL")?]), Version::Unknown),
        Rule::new(
            "libgdx",
            "LibGDX",
            Guarded {
                marker: Pattern::literal(b"com/badlogic/gdx")?,
                // NW.js 29 自带此串
                decoy: Pattern::literal(b"Heavily inspired by LibGDX's CanvasGraphicsRenderer:")?,
            },
            Version::Unknown,
        ),
        Rule::new(
            "kirikiri-z",
            "KiriKiri Z",
            Markers(vec![Pattern::literal(b"\r\nKirikiri Z Project Contributors\r\nW.Dee, casper")?]),
            Version::Unknown,
        ),
        Rule::new(
            "mkxp",
            "mkxp",
            // 后者见于 Falcon-mkxp 与 mkxp-z 分支
            Markers(vec![Pattern::any_literal(&[
                b"\x00__ZL17mkxpDataDirectoryiPmm\x00".as_slice(),
                b"\x00_mkxp_kernel_caller_alias\x00".as_slice(),
            ])?]),
            Version::Extract(|t, _| mkxp_version(t.dir)),
        ),
        Rule::new(
            "rpg-maker-2000",
            "RPG Maker",
            Markers(vec![Pattern::regex(r"\x00Software\\(?:KADOKAWA|Enterbrain)\\RPG2000\x00")?]),
            Version::Fixed("2000".into()),
        ),
        Rule::new(
            "rpg-maker-2003",
            "RPG Maker",
            Markers(vec![Pattern::regex(r"\x00Software\\(?:KADOKAWA|Enterbrain)\\RPG2003\x00")?]),
            Version::Fixed("2003".into()),
        ),
        Rule::new(
            "cocos2d",
            "Cocos2d",
            CrossSource {
                patterns: vec![
                    Pattern::regex(r"\xFF{3}\x00([\d.]+)\x00{3}Jan\x00Feb")?,
                    Pattern::regex(r"</set>\x0A\x00\xFF{3}\x00cocos2d-x ([\d.]+)\x00")?,
                ],
                sibling: "libcocos2d.dll",
            },
            Version::Captured,
        ),
        // RGSS 播放器（UTF-16LE），新代际在前
        Rule::new("rgss3-player", "RPG Maker", Markers(vec![Pattern::utf16("RGSS3 Player")?]), rgss(RgssGeneration::VxAce)),
        Rule::new(
            "rgss3-rtp",
            "RPG Maker",
            Markers(vec![Pattern::utf16(r"Software\Enterbrain\RGSS3\RTP")?]),
            rgss(RgssGeneration::VxAce),
        ),
        Rule::new("rgss2-player", "RPG Maker", Markers(vec![Pattern::utf16("RGSS2 Player")?]), rgss(RgssGeneration::Vx)),
        Rule::new("rgss-player", "RPG Maker", Markers(vec![Pattern::utf16("RGSS Player")?]), rgss(RgssGeneration::Xp)),
        Rule::new(
            "nwjs",
            "NW.js",
            Markers(vec![
                // RPG Maker MV 附带的 NW.js
                Pattern::regex(r"\\node-webkit\\src\\[a-z]+\\nw\\")?,
                // RPG Maker MZ 附带的 NW.js
                Pattern::literal(b"nw.exe.pdb")?,
            ]),
            Version::Refine(|t, _| rpg_maker_scripts(t.dir)),
        ),
        Rule::new(
            "shiva",
            "ShiVa Engine",
            Markers(vec![Pattern::regex(r"ShiVa 3D Standalone Engine ([^\x20]+)")?]),
            Version::Captured,
        ),
        Rule::new("wolf-rpg", "WOLF RPG Editor", Markers(vec![Pattern::literal(b"\x00WOLF_FileReadText")?]), Version::Unknown),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let rules = builtin_rules().unwrap();
        let ids: HashSet<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn directory_probes_come_first() {
        let rules = builtin_rules().unwrap();
        assert_eq!(rules[0].id, "adobe-air");
        assert_eq!(rules[1].id, "renpy");
        assert_eq!(rules.last().map(|r| r.id.as_str()), Some("wolf-rpg"));
    }
}
