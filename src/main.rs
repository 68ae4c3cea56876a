// ==========================================
// 仓库变更导入系统 - 命令行入口
// ==========================================
// 用法: warehouse-intake simulate <file> --customer <c> --requester <r> [--time HH:mm]
// ==========================================

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use warehouse_intake::config::{ConfigManager, CONFIG_PATH_ENV};
use warehouse_intake::{logging, LocalFile, SimulationPayload, UploadApi};

#[derive(Parser, Debug)]
#[command(name = "warehouse-intake", version, about = "Warehouse change/allocation upload simulator")]
struct Cli {
    /// 规则配置文件（JSON 对象）；未指定时读取环境变量
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 以 JSON 行格式输出日志
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 对上传文件执行规则模拟并输出结果 JSON
    Simulate {
        /// 上传文件（xlsx / xls / json / csv / txt）
        file: PathBuf,

        #[arg(long)]
        customer: String,

        #[arg(long)]
        requester: String,

        /// 本地时间 HH:mm（默认当前时间）
        #[arg(long)]
        time: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", warehouse_intake::APP_NAME, warehouse_intake::VERSION);

    let config = match &cli.config {
        Some(path) => ConfigManager::from_json_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => ConfigManager::from_env()
            .with_context(|| format!("无法加载 {} 指定的配置", CONFIG_PATH_ENV))?,
    };
    let api = UploadApi::from_config(&config).await?;

    match cli.command {
        Command::Simulate {
            file,
            customer,
            requester,
            time,
        } => {
            let local_time =
                time.unwrap_or_else(|| chrono::Local::now().format("%H:%M").to_string());
            let payload = SimulationPayload {
                customer,
                requester,
                local_time,
            };

            let response = api.simulate_rules(&LocalFile::new(&file), payload).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
