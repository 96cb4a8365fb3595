//! bumpkin-probe - Beasts & Bumpkins 资源信息探测工具
//!
//! M10 文件输出 PT 头部字段与时长, BOX 资源包输出条目列表.

use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

use bumpkin_codec::PtHeader;
use bumpkin_core::PcmSpec;
use bumpkin_format::{AssetKind, BoxArchive};

#[derive(Parser, Debug)]
#[command(
    name = "bumpkin-probe",
    version,
    about = "Beasts & Bumpkins 资源信息探测工具"
)]
struct Cli {
    /// 输入文件 (.m10 或 .box)
    input: PathBuf,

    /// 以 JSON 格式输出
    #[arg(long)]
    json: bool,
}

// ============================================================
// JSON 输出结构体
// ============================================================

/// 完整探测结果
#[derive(Serialize)]
struct ProbeOutput {
    filename: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    m10: Option<M10Info>,
    #[serde(skip_serializing_if = "Option::is_none")]
    archive: Option<ArchiveInfo>,
}

/// M10 头部信息
#[derive(Serialize)]
struct M10Info {
    signature: String,
    data_offset: u32,
    total_samples: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    compression_type: Option<u32>,
    sample_rate: u32,
    channels: u16,
    duration: f64,
}

/// 资源包信息
#[derive(Serialize)]
struct ArchiveInfo {
    nb_entries: usize,
    total_bytes: u64,
    entries: Vec<EntryInfo>,
}

/// 资源包条目
#[derive(Serialize)]
struct EntryInfo {
    name: String,
    path: String,
    timestamp: String,
    size: usize,
    kind: String,
}

// ============================================================
// 主逻辑
// ============================================================

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let output = match probe(&cli.input) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("错误: {e:#}");
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("错误: JSON 序列化失败: {e}");
                process::exit(1);
            }
        }
    } else {
        if let Some(ref info) = output.m10 {
            print_m10_text(&output.filename, info);
        }
        if let Some(ref info) = output.archive {
            print_archive_text(&output.filename, info);
        }
    }
}

/// 按扩展名选择解析方式
fn probe(path: &Path) -> anyhow::Result<ProbeOutput> {
    let filename = path.display().to_string();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = AssetKind::from_filename(&name);

    let mut output = ProbeOutput {
        filename,
        kind: kind.name().to_string(),
        m10: None,
        archive: None,
    };

    match kind {
        AssetKind::Audio => {
            let data = std::fs::read(path)
                .with_context(|| format!("无法读取 '{}'", path.display()))?;
            let header = PtHeader::parse(&data).context("无法解析 PT 头部")?;
            output.m10 = Some(build_m10_info(&header));
        }
        AssetKind::Archive => {
            let archive = BoxArchive::open(path).context("无法解析资源包")?;
            output.archive = Some(build_archive_info(&archive));
        }
        other => bail!("不支持探测 {other} 类型的文件"),
    }
    Ok(output)
}

fn build_m10_info(header: &PtHeader) -> M10Info {
    let spec = PcmSpec::M10_VOICE;
    M10Info {
        signature: "PT".to_string(),
        data_offset: header.data_offset,
        total_samples: header.total_samples,
        compression_type: header.compression_type,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        duration: spec.duration_secs(u64::from(header.total_samples)),
    }
}

fn build_archive_info(archive: &BoxArchive) -> ArchiveInfo {
    let entries: Vec<EntryInfo> = archive
        .entries()
        .iter()
        .map(|e| EntryInfo {
            name: e.name.clone(),
            path: e.path.clone(),
            timestamp: e.timestamp.to_string(),
            size: e.size(),
            kind: e.kind().name().to_string(),
        })
        .collect();
    ArchiveInfo {
        nb_entries: entries.len(),
        total_bytes: entries.iter().map(|e| e.size as u64).sum(),
        entries,
    }
}

/// 文本输出: M10 头部
fn print_m10_text(filename: &str, info: &M10Info) {
    println!("[M10]");
    println!("  文件名       : {filename}");
    println!("  签名         : {}", info.signature);
    println!("  码流偏移     : {}", info.data_offset);
    println!("  总采样数     : {}", info.total_samples);
    if let Some(ct) = info.compression_type {
        println!("  压缩类型     : {ct}");
    }
    println!("  采样率       : {} Hz", info.sample_rate);
    println!("  声道数       : {}", info.channels);
    println!("  时长         : {:.3} 秒", info.duration);
    println!("[/M10]");
}

/// 文本输出: 资源包条目列表
fn print_archive_text(filename: &str, info: &ArchiveInfo) {
    println!("[BOX]");
    println!("  文件名       : {filename}");
    println!("  条目数       : {}", info.nb_entries);
    println!("  总字节数     : {}", info.total_bytes);
    println!("[/BOX]");
    println!();
    for (index, entry) in info.entries.iter().enumerate() {
        println!(
            "  #{index:<4} {:<24} {:>10}  {:<8} {}  {}",
            entry.name, entry.size, entry.kind, entry.timestamp, entry.path
        );
    }
}
