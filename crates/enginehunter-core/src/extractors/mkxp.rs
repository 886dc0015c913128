//! mkxp 的 RGSS 代际级联：mkxp.conf → *.ini → Data/Scripts.*
//!
//! 任一阶段得到结果即返回，后续阶段不再读取。
use std::path::Path;
use tracing::debug;

use super::RgssGeneration;
use crate::lookup::{config_value, glob, read_config, read_headerless_config};

const CONF_FILE: &str = "mkxp.conf";
const CONF_SECTION: &str = "top";

pub(crate) fn mkxp_version(game_dir: &Path) -> Option<String> {
    from_conf(game_dir)
        .or_else(|| from_ini_files(game_dir))
        .or_else(|| from_script_archives(game_dir))
        .map(|g| g.to_string())
}

/// mkxp.conf 没有节头，补一个合成节头后再读 `rgssVersion`
fn from_conf(game_dir: &Path) -> Option<RgssGeneration> {
    let conf = read_headerless_config(&game_dir.join(CONF_FILE), CONF_SECTION)?;
    let raw = config_value(&conf, CONF_SECTION, "rgssVersion")?;
    let generation = raw.parse::<i64>().ok().and_then(RgssGeneration::from_number);
    debug!(value = raw, ?generation, "mkxp.conf rgssVersion");
    generation
}

/// `[Game] Scripts=` 的归档后缀决定代际
fn from_ini_files(game_dir: &Path) -> Option<RgssGeneration> {
    glob(game_dir, "*.ini").iter().find_map(|path| {
        let ini = read_config(path)?;
        RgssGeneration::from_archive_suffix(config_value(&ini, "Game", "Scripts")?)
    })
}

fn from_script_archives(game_dir: &Path) -> Option<RgssGeneration> {
    RgssGeneration::ALL.into_iter().find(|g| {
        game_dir.join("Data").join(format!("Scripts{}", g.archive_extension())).is_file()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn conf_wins_over_ini() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mkxp.conf"), "rgssVersion=3\n").unwrap();
        fs::write(dir.path().join("Game.ini"), "[Game]\nScripts=Data\\Scripts.rxdata\n").unwrap();
        assert_eq!(mkxp_version(dir.path()).as_deref(), Some("VX Ace"));
    }

    #[test]
    fn zero_in_conf_falls_through_to_ini() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mkxp.conf"), "rgssVersion=0\n").unwrap();
        fs::write(dir.path().join("Game.ini"), "[Game]\nScripts=Data\\Scripts.rvdata\n").unwrap();
        assert_eq!(mkxp_version(dir.path()).as_deref(), Some("VX"));
    }

    #[test]
    fn ini_without_scripts_falls_through_to_archives() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Game.ini"), "[Game]\nTitle=x\n").unwrap();
        fs::create_dir(dir.path().join("Data")).unwrap();
        fs::write(dir.path().join("Data/Scripts.rvdata2"), b"").unwrap();
        assert_eq!(mkxp_version(dir.path()).as_deref(), Some("VX Ace"));
    }

    #[test]
    fn unclosed_quote_in_ini_does_not_hide_scripts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Game.ini"), "[Game]\nTitle=\"Unclosed\nScripts=Data\\Scripts.rvdata\n").unwrap();
        assert_eq!(from_ini_files(dir.path()), Some(RgssGeneration::Vx));
        assert_eq!(mkxp_version(dir.path()).as_deref(), Some("VX"));
    }

    #[test]
    fn nothing_found_is_unknown() {
        let dir = TempDir::new().unwrap();
        assert_eq!(mkxp_version(dir.path()), None);
    }
}
