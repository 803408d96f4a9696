// ==========================================
// 表格引擎集成测试
// ==========================================
// 测试范围（经公开接口驱动）:
// 1. 由配置加载的驾驶舱设置播种表格
// 2. 外壳以字符串列名 + GridAction 驱动视图状态
// ==========================================

mod helpers;

use std::sync::Arc;

use helpers::mock_config::MockConfig;
use helpers::mock_service::MockInventoryService;
use helpers::test_data_builder::numbered_rows;
use inventory_dashboard::api::DashboardApi;
use inventory_dashboard::config::DashboardSettings;
use inventory_dashboard::domain::types::{SortDirection, StatusFilter};
use inventory_dashboard::engine::error::EngineError;
use inventory_dashboard::engine::grid::{GridAction, GridPage, GridStateEngine};

fn ids(page: &GridPage) -> Vec<String> {
    page.rows.iter().map(|r| r.row.id.clone()).collect()
}

fn expected(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

async fn seeded_grid(config: MockConfig, row_count: usize) -> GridStateEngine {
    let settings = DashboardSettings::load(&config).await.unwrap();
    let service = Arc::new(MockInventoryService::new(Vec::new()));
    let api = DashboardApi::new(service, settings);
    api.seed_grid(numbered_rows(row_count))
}

#[tokio::test]
async fn test_grid_seeded_from_loaded_settings() {
    let grid = seeded_grid(MockConfig::with_page_size(20), 45).await;

    let page = grid.visible_page();
    assert_eq!(page.page_size, 20);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.total_count, 45);
    assert_eq!(page.rows.len(), 20);
    assert_eq!(grid.page_size_options(), &[10, 20, 30, 40, 50]);
}

#[tokio::test]
async fn test_shell_driven_actions() {
    let mut grid = seeded_grid(MockConfig::with_page_size(20), 45).await;

    let stock = GridStateEngine::parse_column("stock").unwrap();
    for _ in 0..2 {
        grid.dispatch(GridAction::ToggleSort {
            column: stock,
            multi: false,
        })
        .unwrap();
    }
    assert_eq!(grid.sort_direction(stock), Some(SortDirection::Desc));
    assert_eq!(ids(&grid.visible_page())[..3], expected(&["r45", "r44", "r43"]));

    // 越界页码在渲染时夹取到最后一页
    grid.dispatch(GridAction::SetPage(99)).unwrap();
    let page = grid.visible_page();
    assert_eq!(page.page_index, 2);
    assert_eq!(ids(&page), expected(&["r5", "r4", "r3", "r2", "r1"]));

    grid.dispatch(GridAction::SetFilter {
        search: "r4".to_string(),
        status: StatusFilter::All,
    })
    .unwrap();
    assert_eq!(grid.page_index(), 0);

    assert_eq!(
        GridStateEngine::parse_column("price"),
        Err(EngineError::UnknownColumn("price".to_string()))
    );
    assert_eq!(
        grid.dispatch(GridAction::SetPageSize(0)),
        Err(EngineError::InvalidPageSize(0))
    );
}
