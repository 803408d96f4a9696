// ==========================================
// 库存监控驾驶舱 - 无头入口
// ==========================================
// 职责: 打开数据库，加载驾驶舱并以 JSON 输出整屏状态（stdout）
// 用法: inventory-dashboard [db_path] [--width <px>] [--json-log]
// ==========================================

use anyhow::anyhow;
use chrono::Utc;

use inventory_dashboard::app::{get_default_db_path, AppState};
use inventory_dashboard::logging;

struct Args {
    db_path: String,
    layout_width: Option<u32>,
    json_log: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut db_path = None;
    let mut layout_width = None;
    let mut json_log = false;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json-log" => json_log = true,
            "--width" => {
                let raw = it.next().ok_or_else(|| anyhow!("--width 需要像素值"))?;
                layout_width = Some(raw.parse::<u32>()?);
            }
            other if db_path.is_none() => db_path = Some(other.to_string()),
            other => return Err(anyhow!("未知参数: {}", other)),
        }
    }

    Ok(Args {
        db_path: db_path.unwrap_or_else(get_default_db_path),
        layout_width,
        json_log,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", inventory_dashboard::APP_NAME, inventory_dashboard::VERSION);
    tracing::info!("使用数据库: {}", args.db_path);
    tracing::info!("==================================================");

    let state = AppState::new(args.db_path).await.map_err(|e| anyhow!(e))?;

    let mut chart_state = state.dashboard_api.chart_state();
    if let Some(width) = args.layout_width {
        chart_state.observe_layout_width(width);
    }

    let screen = state
        .dashboard_api
        .fetch_screen()
        .await
        .map(|data| state.dashboard_api.build_view(data, &chart_state, Utc::now()));

    println!("{}", serde_json::to_string_pretty(&screen)?);
    Ok(())
}
