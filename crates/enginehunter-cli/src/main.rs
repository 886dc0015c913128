use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use enginehunter_core::{detect_and_write, DetectOptions, OutputFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "enginehunter", version, about = "识别游戏可执行文件所用的引擎及版本")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 识别一个或多个目标（可执行文件或游戏目录）
    Detect {
        /// 目标路径
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 输出格式
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// 输出文件；缺省写到标准输出
        #[arg(long)]
        output: Option<PathBuf>,

        /// 线程数（多个目标时并行；"auto"=CPU 核心数）
        #[arg(long, default_value = "auto")]
        threads: String,

        /// 额外规则文件（TOML），追加在内置规则之后
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    // 日志写到 stderr，stdout 只留结果（RUST_LOG 控制等级）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { paths, format, output, threads, rules } => {
            info!(targets = paths.len(), ?output, "starting detection");

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path).context("create output file")?)),
                None => Box::new(BufWriter::new(std::io::stdout().lock())),
            };
            let format = match format {
                Format::Text => OutputFormat::Text,
                Format::Json => OutputFormat::Json,
            };
            let opts = DetectOptions { rules_path: rules, threads: parse_threads(&threads) };

            let stats = detect_and_write(&paths, &mut out, format, &opts).context("detection failed")?;
            out.flush().context("flush output")?;

            info!(
                targets = stats.targets,
                detected = stats.detected,
                not_found = stats.not_found,
                errors = stats.errors,
                "detection finished"
            );
            // 读取失败不能被当作“未识别”静默吞掉
            if stats.errors > 0 {
                anyhow::bail!("{} target(s) could not be read", stats.errors);
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threads_argument() {
        assert_eq!(parse_threads("auto"), None);
        assert_eq!(parse_threads("AUTO"), None);
        assert_eq!(parse_threads("3"), Some(3));
        assert_eq!(parse_threads("0"), None);
        assert_eq!(parse_threads("x"), None);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
