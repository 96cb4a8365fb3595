//! 端到端集成测试: BOX 资源包 → 条目分类 → M10 转 WAV.

use bumpkin::core::BumpkinError;
use bumpkin::format::{AssetKind, BoxArchive};

/// 256 字节 NUL 填充字段
fn field(text: &[u8]) -> Vec<u8> {
    let mut out = text.to_vec();
    out.resize(256, 0);
    out
}

fn entry(name: &str, data: &[u8]) -> Vec<u8> {
    let mut out = field(name.as_bytes());
    out.extend_from_slice(&field(b"D:\\BEASTS\\DATA"));
    for v in [1996u16, 11, 5, 22, 18, 4, 59, 0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&(data.len() as i32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

fn make_box(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"BOX\x01\x00\x00\x00\x00".to_vec();
    for e in entries {
        out.extend_from_slice(e);
    }
    out
}

/// 最小 M10 文件: 码流为空, 解码为静音
fn silent_m10(total_samples: u32) -> Vec<u8> {
    let mut out = b"PT\0\0".to_vec();
    out.extend_from_slice(&18u32.to_le_bytes());
    out.extend_from_slice(&[0xFD, 0x85, 0x04]);
    out.extend_from_slice(&total_samples.to_be_bytes());
    out.extend_from_slice(&[0x8A, 0x00, 0xFF]);
    out.extend_from_slice(&[0u8; 8]);
    out
}

#[test]
fn test_资源包条目分类() {
    let data = make_box(&[
        entry("HELLO.M10", &silent_m10(100)),
        entry("FARMER.MFB", &[1, 2, 3]),
        entry("LEVEL1.MIS", &[4]),
        entry("PALETTE.PAL", &[5, 6]),
    ]);
    let archive = BoxArchive::from_bytes("SPEECH.BOX", &data).unwrap();

    let kinds: Vec<AssetKind> = archive.entries().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        [
            AssetKind::Audio,
            AssetKind::Sprite,
            AssetKind::Map,
            AssetKind::Binary
        ]
    );
    assert_eq!(archive.entries()[0].path, "D:\\BEASTS\\DATA");
}

#[test]
fn test_资源包内语音转换() {
    let data = make_box(&[
        entry("A.M10", &silent_m10(500)),
        entry("B.M10", &silent_m10(0)),
    ]);
    let archive = BoxArchive::from_bytes("VOICE.BOX", &data).unwrap();

    let sizes: Vec<usize> = archive
        .entries()
        .iter()
        .filter(|e| e.kind() == AssetKind::Audio)
        .map(|e| bumpkin::m10_to_wav(&e.data).unwrap().len())
        .collect();
    assert_eq!(sizes, [44 + 1000, 44]);
}

#[test]
fn test_损坏条目不影响其他条目() {
    let data = make_box(&[
        entry("BROKEN.M10", b"NOT AN M10 FILE"),
        entry("GOOD.M10", &silent_m10(10)),
    ]);
    let archive = BoxArchive::from_bytes("MIXED.BOX", &data).unwrap();

    let results: Vec<_> = archive
        .entries()
        .iter()
        .map(|e| bumpkin::m10_to_wav(&e.data))
        .collect();
    assert!(matches!(results[0], Err(BumpkinError::Format(_))));
    assert_eq!(results[1].as_ref().unwrap().len(), 44 + 20);
}

#[test]
fn test_嵌套资源包() {
    let inner = make_box(&[entry("DEEP.M10", &silent_m10(7))]);
    let outer = make_box(&[entry("INNER.BOX", &inner), entry("TOP.BIN", &[0xAB])]);

    let archive = BoxArchive::from_bytes("OUTER.BOX", &outer).unwrap();
    let nested_entry = archive.find("inner.box").unwrap();
    assert_eq!(nested_entry.kind(), AssetKind::Archive);

    let nested = BoxArchive::from_bytes(nested_entry.name.clone(), &nested_entry.data).unwrap();
    assert_eq!(nested.stem(), "inner");
    let wav = bumpkin::m10_to_wav(&nested.entries()[0].data).unwrap();
    assert_eq!(wav.len(), 44 + 14);
}

#[test]
fn test_从磁盘读取资源包() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DISK.BOX");
    std::fs::write(&path, make_box(&[entry("X.M10", &silent_m10(3))])).unwrap();

    let archive = BoxArchive::open(&path).unwrap();
    assert_eq!(archive.stem(), "DISK");
    assert_eq!(archive.entries()[0].name, "x.m10");
    assert_eq!(archive.entries()[0].timestamp.year, 1996);
}
