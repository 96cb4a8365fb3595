//! 资源包批量解包.
//!
//! 一个条目是一个任务, 在 rayon 线程池上并行处理. 单个条目失败只记录日志,
//! 不影响同一资源包内的其他条目.

use anyhow::Context;
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use bumpkin_format::asset::replace_extension;
use bumpkin_format::{AssetKind, BoxArchive, BoxEntry};

/// 解包选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// 保留 M10 原始字节, 不转换为 WAV
    pub raw_audio: bool,
    /// 解包前删除已有的输出目录
    pub clean: bool,
}

/// 解包统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// 写出的文件数 (含转换后的 WAV)
    pub written: usize,
    /// 其中由 M10 转换得到的 WAV 数
    pub converted: usize,
    /// 失败的条目或资源包数
    pub failed: usize,
}

impl Summary {
    fn failure() -> Self {
        Self {
            failed: 1,
            ..Self::default()
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            written: self.written + other.written,
            converted: self.converted + other.converted,
            failed: self.failed + other.failed,
        }
    }
}

/// 展开命令行输入: 文件原样保留, 目录中的 `*.box` 按文件名排序加入
pub fn collect_inputs(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found = Vec::new();
        let dir = fs::read_dir(input)
            .with_context(|| format!("无法读取目录 '{}'", input.display()))?;
        for item in dir {
            let path = item
                .with_context(|| format!("无法遍历目录 '{}'", input.display()))?
                .path();
            let is_box = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("box"));
            if is_box && path.is_file() {
                found.push(path);
            }
        }
        if found.is_empty() {
            warn!("目录 '{}' 中没有 BOX 资源包", input.display());
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// 解包多个资源包文件, 每个资源包输出到 `out_dir/<资源包名>/`
pub fn extract_files(files: &[PathBuf], out_dir: &Path, opts: ExtractOptions) -> Summary {
    files
        .par_iter()
        .map(|path| match extract_file(path, out_dir, opts) {
            Ok(summary) => summary,
            Err(e) => {
                error!("解包 '{}' 失败: {:#}", path.display(), e);
                Summary::failure()
            }
        })
        .reduce(Summary::default, Summary::merge)
}

/// 解包单个资源包文件
pub fn extract_file(path: &Path, out_dir: &Path, opts: ExtractOptions) -> anyhow::Result<Summary> {
    let archive = BoxArchive::open(path)
        .with_context(|| format!("无法解析资源包 '{}'", path.display()))?;
    let dest = out_dir.join(archive.stem());

    if opts.clean && dest.exists() {
        debug!("删除旧输出目录 '{}'", dest.display());
        fs::remove_dir_all(&dest)
            .with_context(|| format!("无法删除目录 '{}'", dest.display()))?;
    }

    info!(
        "解包 {} ({} 个条目) -> {}",
        archive.name(),
        archive.len(),
        dest.display()
    );
    extract_archive(&archive, &dest, opts)
}

/// 把资源包的全部条目写入 `dest`
pub fn extract_archive(
    archive: &BoxArchive,
    dest: &Path,
    opts: ExtractOptions,
) -> anyhow::Result<Summary> {
    fs::create_dir_all(dest).with_context(|| format!("无法创建目录 '{}'", dest.display()))?;

    let summary = archive
        .entries()
        .par_iter()
        .map(|entry| match extract_entry(entry, dest, opts) {
            Ok(summary) => summary,
            Err(e) => {
                error!("{}/{}: {:#}", archive.name(), entry.name, e);
                Summary::failure()
            }
        })
        .reduce(Summary::default, Summary::merge);
    Ok(summary)
}

fn extract_entry(entry: &BoxEntry, dest: &Path, opts: ExtractOptions) -> anyhow::Result<Summary> {
    let name = safe_file_name(&entry.name)
        .with_context(|| format!("条目名 {:?} 不能用作文件名", entry.name))?;

    match entry.kind() {
        AssetKind::Archive => {
            let nested = BoxArchive::from_bytes(name, &entry.data)
                .context("无法解析嵌套资源包")?;
            debug!("进入嵌套资源包 {} ({} 个条目)", name, nested.len());
            extract_archive(&nested, &dest.join(nested.stem()), opts)
        }
        AssetKind::Audio if !opts.raw_audio => {
            let path = dest.join(replace_extension(name, "wav"));
            let pcm_bytes = bumpkin::write_m10_as_wav(&entry.data, &path)
                .with_context(|| format!("M10 转换到 '{}' 失败", path.display()))?;
            debug!("写出 {} (PCM {} 字节)", path.display(), pcm_bytes);
            Ok(Summary {
                written: 1,
                converted: 1,
                failed: 0,
            })
        }
        _ => {
            write_file(&dest.join(name), &entry.data)?;
            Ok(Summary {
                written: 1,
                ..Summary::default()
            })
        }
    }
}

fn write_file(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    fs::write(path, data).with_context(|| format!("无法写入 '{}'", path.display()))?;
    debug!("写出 {} ({} 字节)", path.display(), data.len());
    Ok(())
}

/// 取条目名的最后一段路径, 拒绝空名与 `.`/`..`
fn safe_file_name(name: &str) -> Option<&str> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    match last {
        "" | "." | ".." => None,
        _ => Some(last),
    }
}
