//! bian-probe - 媒体格式探测工具
//!
//! 识别输入文件的容器格式, 输出选中的解封装器、能力标志、DRM 标志和容器元数据.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use bian_format::{ExtractorFactory, ExtractorHandle, IoSource, SniffPolicy, extractor_mime};

/// Bian 媒体格式探测工具
#[derive(Parser, Debug)]
#[command(name = "bian-probe", version, about = "纯 Rust 媒体格式探测工具")]
struct Cli {
    /// 输入文件路径
    input: PathBuf,

    /// 声明输入格式 (跳过自动探测, 支持 drm+<mode>+<inner> 形式)
    #[arg(long)]
    mime: Option<String>,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 仲裁策略文件 (JSON)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// 日志详细程度 (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// 探测结果
#[derive(Serialize, Debug)]
struct ProbeOutput {
    filename: String,
    extractor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime: Option<String>,
    flags: Vec<String>,
    drm: bool,
    metadata: Vec<(String, String)>,
}

impl ProbeOutput {
    fn new(filename: String, extractor: &ExtractorHandle) -> Self {
        let flags = extractor
            .flags()
            .iter_names()
            .map(|(name, _)| name.to_string())
            .collect();
        let metadata = extractor
            .metadata()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            filename,
            extractor: extractor.name().to_string(),
            mime: extractor_mime(extractor.as_ref()),
            flags,
            drm: extractor.drm_flag(),
            metadata,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = bian::logging::init("bian-probe", cli.verbose) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    match run(&cli) {
        Ok(output) => print_output(&output, cli.json),
        Err(e) => {
            log::error!("探测失败: {e:#}");
            eprintln!("错误: {e:#}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<ProbeOutput> {
    let policy = match &cli.policy {
        Some(path) => load_policy(path)?,
        None => SniffPolicy::default(),
    };
    let factory = ExtractorFactory::new()
        .with_policy(policy)
        .context("仲裁策略无效")?;

    let source = IoSource::open(&cli.input)
        .with_context(|| format!("无法打开文件 '{}'", cli.input.display()))?
        .into_handle();
    let extractor = factory
        .create(source, cli.mime.as_deref())
        .context("无法创建解封装器")?;

    Ok(ProbeOutput::new(cli.input.display().to_string(), &extractor))
}

fn load_policy(path: &Path) -> Result<SniffPolicy> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取策略文件 '{}'", path.display()))?;
    let policy = SniffPolicy::from_json(&text)
        .with_context(|| format!("策略文件无效 '{}'", path.display()))?;
    Ok(policy)
}

fn print_output(output: &ProbeOutput, json: bool) {
    if json {
        match serde_json::to_string_pretty(output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("错误: JSON 序列化失败: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!("文件:       {}", output.filename);
    println!("解封装器:   {}", output.extractor);
    if let Some(mime) = &output.mime {
        println!("格式:       {mime}");
    }
    println!("能力标志:   {}", output.flags.join(" | "));
    println!("DRM:        {}", if output.drm { "是" } else { "否" });
    if !output.metadata.is_empty() {
        println!("元数据:");
        for (key, value) in &output.metadata {
            println!("  {key:<16} {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn cli(input: PathBuf) -> Cli {
        Cli {
            input,
            mime: None,
            json: false,
            policy: None,
            verbose: 0,
        }
    }

    #[test]
    fn test_参数解析() {
        let cli = Cli::parse_from([
            "bian-probe",
            "a.mkv",
            "--mime",
            "drm+container_based+video/x-matroska",
            "--json",
            "-vv",
        ]);
        assert_eq!(cli.input, PathBuf::from("a.mkv"));
        assert_eq!(cli.mime.as_deref(), Some("drm+container_based+video/x-matroska"));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_探测_wav_文件() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00").unwrap();

        let output = run(&cli(file.path().to_path_buf())).unwrap();
        assert_eq!(output.extractor, "wav");
        assert_eq!(output.mime.as_deref(), Some("audio/x-wav"));
        assert!(!output.drm);
        assert_eq!(output.flags.len(), 4);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["extractor"], "wav");
    }

    #[test]
    fn test_策略文件无效时报错() {
        let mut policy = tempfile::NamedTempFile::new().unwrap();
        policy.write_all(br#"{"secondary_threshold": 2.0}"#).unwrap();
        let data = tempfile::NamedTempFile::new().unwrap();

        let mut args = cli(data.path().to_path_buf());
        args.policy = Some(policy.path().to_path_buf());
        assert!(run(&args).is_err());
    }

    #[test]
    fn test_加载策略文件() {
        let mut policy = tempfile::NamedTempFile::new().unwrap();
        policy.write_all(br#"{"min_confidence": 0.25}"#).unwrap();
        let loaded = load_policy(policy.path()).unwrap();
        assert_eq!(loaded.min_confidence, 0.25);

        let mut typo = tempfile::NamedTempFile::new().unwrap();
        typo.write_all(br#"{"min_confidnce": 0.25}"#).unwrap();
        assert!(load_policy(typo.path()).is_err());
    }

    #[test]
    fn test_无法识别的文件() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        assert!(run(&cli(file.path().to_path_buf())).is_err());
    }
}
