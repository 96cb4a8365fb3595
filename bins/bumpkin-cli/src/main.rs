//! bumpkin-cli - Beasts & Bumpkins 资源解包工具
//!
//! 解开游戏的 BOX 资源包, 把 M10 语音转换为 WAV, 其他资源原样保存.

mod extract;
mod logging;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process;

use bumpkin_format::asset::replace_extension;
use extract::{ExtractOptions, collect_inputs, extract_files};

#[derive(Parser, Debug)]
#[command(name = "bumpkin", version, about = "Beasts & Bumpkins 资源解包与语音转换工具")]
struct Cli {
    /// 日志详细程度 (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 解包 BOX 资源包 (文件或包含 *.box 的目录)
    Extract {
        /// 输入资源包或目录
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 输出目录, 每个资源包解到其中的同名子目录
        #[arg(short, long = "output")]
        out_dir: PathBuf,

        /// 并行线程数 (默认由 rayon 决定)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// 保留 M10 原始文件, 不转换为 WAV
        #[arg(long = "raw-audio")]
        raw_audio: bool,

        /// 解包前删除已有的同名输出目录
        #[arg(long)]
        clean: bool,
    },

    /// 把单个 M10 文件转换为 WAV
    Convert {
        /// 输入 M10 文件
        input: PathBuf,

        /// 输出 WAV 文件 (默认与输入同名, 扩展名改为 .wav)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 覆盖已存在的输出文件
        #[arg(short = 'y')]
        overwrite: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init("bumpkin-cli", cli.verbose) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("错误: {e:#}");
            1
        }
    };
    process::exit(code);
}

fn run(command: Command) -> anyhow::Result<i32> {
    match command {
        Command::Extract {
            inputs,
            out_dir,
            jobs,
            raw_audio,
            clean,
        } => {
            rayon::ThreadPoolBuilder::new()
                .num_threads(jobs.unwrap_or(0))
                .thread_name(|i| format!("worker-{i}"))
                .build_global()
                .context("无法创建线程池")?;

            let files = collect_inputs(&inputs)?;
            if files.is_empty() {
                bail!("没有找到需要解包的资源包");
            }

            let opts = ExtractOptions { raw_audio, clean };
            let summary = extract_files(&files, &out_dir, opts);
            info!(
                "完成: {} 个资源包, 写出 {} 个文件 (其中 {} 个 WAV), 失败 {} 个",
                files.len(),
                summary.written,
                summary.converted,
                summary.failed
            );
            Ok(if summary.failed > 0 { 2 } else { 0 })
        }
        Command::Convert {
            input,
            output,
            overwrite,
        } => {
            let output = output.unwrap_or_else(|| default_wav_path(&input));
            if output.exists() && !overwrite {
                bail!("输出文件已存在 '{}', 使用 -y 覆盖", output.display());
            }

            let data = std::fs::read(&input)
                .with_context(|| format!("无法读取 '{}'", input.display()))?;
            let pcm_bytes = bumpkin::write_m10_as_wav(&data, &output).with_context(|| {
                format!("无法把 '{}' 转换为 '{}'", input.display(), output.display())
            })?;

            info!(
                "{} -> {} (PCM {} 字节)",
                input.display(),
                output.display(),
                pcm_bytes
            );
            Ok(0)
        }
    }
}

/// 输入路径的扩展名换为 `.wav`
fn default_wav_path(input: &std::path::Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(replace_extension(&name, "wav"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认输出路径() {
        assert_eq!(
            default_wav_path(std::path::Path::new("data/HELLO.M10")),
            PathBuf::from("data/HELLO.wav")
        );
        assert_eq!(
            default_wav_path(std::path::Path::new("speech")),
            PathBuf::from("speech.wav")
        );
    }

    #[test]
    fn test_命令行解析() {
        let cli = Cli::try_parse_from([
            "bumpkin", "-vv", "extract", "a.box", "dir", "-o", "out", "-j", "4", "--raw-audio",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Extract {
                inputs,
                out_dir,
                jobs,
                raw_audio,
                clean,
            } => {
                assert_eq!(inputs, [PathBuf::from("a.box"), PathBuf::from("dir")]);
                assert_eq!(out_dir, PathBuf::from("out"));
                assert_eq!(jobs, Some(4));
                assert!(raw_audio);
                assert!(!clean);
            }
            other => panic!("意外的子命令: {other:?}"),
        }

        let cli = Cli::try_parse_from(["bumpkin", "convert", "x.m10", "-y"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Convert {
                output: None,
                overwrite: true,
                ..
            }
        ));
    }
}
