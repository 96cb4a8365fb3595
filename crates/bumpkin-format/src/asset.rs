//! 资源类型识别.
//!
//! 资源包中的条目只能靠扩展名区分类型 (不区分大小写).

use std::fmt;

/// 资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// M10 压缩语音
    Audio,
    /// 嵌套的 BOX 资源包
    Archive,
    /// MFB 精灵图
    Sprite,
    /// MIS 任务地图 / SAV 存档
    Map,
    /// 其他数据, 原样保存
    Binary,
}

impl AssetKind {
    /// 获取类型名称
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Audio => "m10",
            Self::Archive => "box",
            Self::Sprite => "mfb",
            Self::Map => "map",
            Self::Binary => "binary",
        }
    }

    /// 根据扩展名判断类型
    ///
    /// # 参数
    /// - `ext`: 文件扩展名 (不含 `.`, 如 "m10", "BOX")
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "m10" => Self::Audio,
            "box" => Self::Archive,
            "mfb" => Self::Sprite,
            "mis" | "sav" => Self::Map,
            _ => Self::Binary,
        }
    }

    /// 根据文件名判断类型, 没有扩展名时为 `Binary`
    pub fn from_filename(filename: &str) -> Self {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Binary,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 去掉最后一个扩展名
pub fn file_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

/// 替换扩展名, 没有扩展名时追加
pub fn replace_extension(filename: &str, ext: &str) -> String {
    format!("{}.{}", file_stem(filename), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_扩展名识别() {
        assert_eq!(AssetKind::from_filename("hello.m10"), AssetKind::Audio);
        assert_eq!(AssetKind::from_filename("SPEECH.M10"), AssetKind::Audio);
        assert_eq!(AssetKind::from_filename("video.Box"), AssetKind::Archive);
        assert_eq!(AssetKind::from_filename("farmer.mfb"), AssetKind::Sprite);
        assert_eq!(AssetKind::from_filename("level01.MIS"), AssetKind::Map);
        assert_eq!(AssetKind::from_filename("slot1.sav"), AssetKind::Map);
        assert_eq!(AssetKind::from_filename("palette.pal"), AssetKind::Binary);
        assert_eq!(AssetKind::from_filename("m10"), AssetKind::Binary);
        assert_eq!(AssetKind::from_filename("a.b.m10"), AssetKind::Audio);
    }

    #[test]
    fn test_替换扩展名() {
        assert_eq!(replace_extension("hello.m10", "wav"), "hello.wav");
        assert_eq!(replace_extension("noext", "wav"), "noext.wav");
        assert_eq!(replace_extension("a.b.m10", "wav"), "a.b.wav");
        assert_eq!(file_stem("VIDEO.BOX"), "VIDEO");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn test_类型名称() {
        assert_eq!(AssetKind::Audio.to_string(), "m10");
        assert_eq!(AssetKind::Map.name(), "map");
    }
}
