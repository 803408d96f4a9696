// ==========================================
// 驾驶舱会话集成测试
// ==========================================
// 测试范围:
// 1. 需求编辑: 未变化/非法输入不发调用，成功后重拉，失败保留输入
// 2. 调拨: 本地校验拦截，成功后重拉
// 3. 结算通道: 会话销毁后结算不 panic，过期重拉被丢弃
// 4. 拖拽: 指针/触摸/键盘得到相同结果
// ==========================================

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::mock_config::MockConfig;
use helpers::mock_service::MockInventoryService;
use helpers::test_data_builder::ProductBuilder;
use inventory_dashboard::api::{
    ApiError, DashboardApi, EditState, EditValidationError, NotificationLevel, Settlement,
};
use inventory_dashboard::app::DashboardSession;
use inventory_dashboard::config::DashboardSettings;
use inventory_dashboard::domain::ProductRow;
use inventory_dashboard::engine::reorder::{
    Key, KeyInput, KeyboardSource, PointerInput, PointerSource, ReorderOutcome, TouchSource,
};

// ==========================================
// 测试辅助函数
// ==========================================

fn rows() -> Vec<ProductRow> {
    vec![
        ProductBuilder::new("a").name("Anchor").stock(10).demand(12).build(),
        ProductBuilder::new("b").name("Bolt").stock(20).demand(5).build(),
        ProductBuilder::new("c").name("Clip").stock(7).demand(7).build(),
        ProductBuilder::new("d").name("Drill").stock(3).demand(1).build(),
    ]
}

async fn session_with(
    service: Arc<MockInventoryService>,
    config: MockConfig,
) -> DashboardSession {
    let settings = DashboardSettings::load(&config).await.unwrap();
    let api = DashboardApi::new(service.clone(), settings);
    DashboardSession::start(&api, service.rows(), Vec::new())
}

async fn create_session() -> (Arc<MockInventoryService>, DashboardSession) {
    let service = Arc::new(MockInventoryService::new(rows()));
    let session = session_with(service.clone(), MockConfig::default()).await;
    (service, session)
}

fn manual_order(session: &DashboardSession) -> Vec<String> {
    session.grid().state().manual_order().to_vec()
}

// ==========================================
// 需求编辑
// ==========================================

#[tokio::test]
async fn test_unchanged_demand_issues_no_call() {
    let (service, mut session) = create_session().await;

    session.edit_demand("a", "12").unwrap();
    assert_eq!(session.blur_demand("a").unwrap(), None);
    assert_eq!(session.in_flight(), 0);
    assert_eq!(MockInventoryService::count(&service.calls.update_demand), 0);
}

#[tokio::test]
async fn test_non_numeric_demand_issues_no_call() {
    let (service, mut session) = create_session().await;

    session.edit_demand("a", "twelve").unwrap();
    let err = session.blur_demand("a").unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation(EditValidationError::InvalidDemand { .. })
    ));
    assert_eq!(session.demand_text("a").as_deref(), Some("twelve"));
    assert_eq!(MockInventoryService::count(&service.calls.update_demand), 0);

    let notes = session.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_demand_success_commits_and_refetches() {
    let (service, mut session) = create_session().await;

    session.edit_demand("a", "30").unwrap();
    let edit_id = session.blur_demand("a").unwrap().unwrap();
    // 在途期间显示用户输入
    assert_eq!(session.demand_text("a").as_deref(), Some("30"));

    session.settle_all().await;

    assert_eq!(
        session.bridge().edit(edit_id).unwrap().state,
        EditState::Committed
    );
    assert_eq!(MockInventoryService::count(&service.calls.update_demand), 1);
    assert_eq!(MockInventoryService::count(&service.calls.fetch_products), 1);
    assert_eq!(session.grid().row("a").unwrap().demand, 30);
    assert_eq!(session.applied_refetch_seq(), 1);

    let notes = session.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert!(notes[0].message.contains("Anchor"));
}

#[tokio::test]
async fn test_demand_failure_keeps_typed_text() {
    let (service, mut session) = create_session().await;
    MockInventoryService::fail_on(&service.fail.update_demand);

    session.edit_demand("a", "30").unwrap();
    let edit_id = session.blur_demand("a").unwrap().unwrap();
    session.settle_all().await;

    assert!(matches!(
        session.bridge().edit(edit_id).unwrap().state,
        EditState::Failed(_)
    ));
    assert_eq!(session.demand_text("a").as_deref(), Some("30"));
    assert_eq!(session.grid().row("a").unwrap().demand, 12);
    assert_eq!(MockInventoryService::count(&service.calls.fetch_products), 0);

    let notes = session.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_unknown_row_is_an_engine_error() {
    let (_service, mut session) = create_session().await;
    assert!(matches!(
        session.edit_demand("zz", "1"),
        Err(ApiError::Engine(_))
    ));
}

// ==========================================
// 调拨
// ==========================================

#[tokio::test]
async fn test_transfer_over_stock_never_reaches_service() {
    let (service, mut session) = create_session().await;

    session.open_transfer("a").unwrap();
    session.set_transfer_destination("a", Some("PNQ-C"));
    session.set_transfer_amount("a", "11");
    let err = session.submit_transfer("a").unwrap_err();

    assert!(matches!(
        err,
        ApiError::Validation(EditValidationError::AmountExceedsStock { stock: 10 })
    ));
    assert_eq!(MockInventoryService::count(&service.calls.transfer_stock), 0);
    assert_eq!(session.in_flight(), 0);
    assert!(session.bridge().transfer_form("a").unwrap().open);
}

#[tokio::test]
async fn test_transfer_success_refetches_and_closes_form() {
    let (service, mut session) = create_session().await;

    assert_eq!(
        session.available_destinations("a").unwrap(),
        vec!["BLR-B", "PNQ-C", "DEL-B"]
    );

    session.open_transfer("a").unwrap();
    session.set_transfer_destination("a", Some("PNQ-C"));
    session.set_transfer_amount("a", "4");
    let edit_id = session.submit_transfer("a").unwrap();
    session.settle_all().await;

    assert_eq!(
        session.bridge().edit(edit_id).unwrap().state,
        EditState::Committed
    );
    assert_eq!(MockInventoryService::count(&service.calls.transfer_stock), 1);
    assert_eq!(session.grid().row("a").unwrap().stock, 6);
    assert_eq!(session.grid().total_count(), 5);

    let form = session.bridge().transfer_form("a").unwrap();
    assert!(!form.open);
    assert!(form.amount_text.is_empty());
}

#[tokio::test]
async fn test_transfer_failure_keeps_form_values() {
    let (service, mut session) = create_session().await;
    MockInventoryService::fail_on(&service.fail.transfer_stock);

    session.open_transfer("b").unwrap();
    session.set_transfer_destination("b", Some("DEL-B"));
    session.set_transfer_amount("b", "5");
    session.submit_transfer("b").unwrap();
    session.settle_all().await;

    let form = session.bridge().transfer_form("b").unwrap();
    assert!(form.open);
    assert_eq!(form.destination.as_deref(), Some("DEL-B"));
    assert_eq!(form.amount_text, "5");
    assert_eq!(session.grid().row("b").unwrap().stock, 20);
}

// ==========================================
// 结算通道
// ==========================================

#[tokio::test]
async fn test_settlement_after_session_drop_does_not_panic() {
    let service = Arc::new(MockInventoryService::new(rows()));
    service.set_mutation_delay(Duration::from_millis(30));
    let mut session = session_with(service.clone(), MockConfig::default()).await;

    session.edit_demand("a", "40").unwrap();
    session.blur_demand("a").unwrap();
    drop(session);

    tokio::time::sleep(Duration::from_millis(80)).await;
    // 远端已执行，结算被丢弃
    assert_eq!(MockInventoryService::count(&service.calls.update_demand), 1);
    assert_eq!(service.rows()[0].demand, 40);
}

#[tokio::test]
async fn test_stale_refetch_is_discarded() {
    let (_service, mut session) = create_session().await;

    let mut newer = rows();
    newer[0].stock = 99;
    session.apply(Settlement::Refetch {
        seq: 2,
        result: Ok(newer),
    });
    assert_eq!(session.grid().row("a").unwrap().stock, 99);

    session.apply(Settlement::Refetch {
        seq: 1,
        result: Ok(rows()),
    });
    assert_eq!(session.grid().row("a").unwrap().stock, 99);
    assert_eq!(session.applied_refetch_seq(), 2);
}

#[tokio::test]
async fn test_refetch_preserves_manual_order_by_default() {
    let (_service, mut session) = create_session().await;
    session.grid_mut().reorder("d", "a").unwrap();

    session.request_refetch();
    session.settle_all().await;

    assert_eq!(manual_order(&session), vec!["d", "a", "b", "c"]);
}

#[tokio::test]
async fn test_refetch_resets_manual_order_when_configured() {
    let service = Arc::new(MockInventoryService::new(rows()));
    let mut session = session_with(service, MockConfig::reset_on_refetch()).await;
    session.grid_mut().reorder("d", "a").unwrap();

    session.request_refetch();
    session.settle_all().await;

    assert_eq!(manual_order(&session), vec!["a", "b", "c", "d"]);
}

// ==========================================
// 拖拽
// ==========================================

const ROW_HEIGHT: f64 = 40.0;

fn pointer_inputs(from: &str, to_y: f64) -> Vec<PointerInput> {
    vec![
        PointerInput::Down {
            row_id: from.to_string(),
            on_handle: true,
            x: 8.0,
            y: 20.0,
        },
        PointerInput::Move { x: 8.0, y: to_y },
        PointerInput::Up { x: 8.0, y: to_y },
    ]
}

#[tokio::test]
async fn test_pointer_touch_and_keyboard_produce_same_order() {
    // 把 a 拖到 c 的位置（c 中心 y=100）
    let (_s1, mut by_pointer) = create_session().await;
    let layout = by_pointer.page_layout(0.0, ROW_HEIGHT);
    let mut pointer = PointerSource::new();
    for input in pointer_inputs("a", 100.0) {
        by_pointer
            .handle_gesture(&mut pointer, input, &layout)
            .unwrap();
    }

    let (_s2, mut by_touch) = create_session().await;
    let layout = by_touch.page_layout(0.0, ROW_HEIGHT);
    let mut touch = TouchSource::new();
    for input in pointer_inputs("a", 100.0) {
        by_touch.handle_gesture(&mut touch, input, &layout).unwrap();
    }

    let (_s3, mut by_keyboard) = create_session().await;
    let layout = by_keyboard.page_layout(0.0, ROW_HEIGHT);
    let mut keyboard = KeyboardSource::new();
    for key in [Key::Space, Key::ArrowDown, Key::ArrowDown, Key::Space] {
        by_keyboard
            .handle_gesture(&mut keyboard, KeyInput::new(key, Some("a")), &layout)
            .unwrap();
    }

    let expected = vec!["b", "c", "a", "d"];
    assert_eq!(manual_order(&by_pointer), expected);
    assert_eq!(manual_order(&by_touch), expected);
    assert_eq!(manual_order(&by_keyboard), expected);
}

#[tokio::test]
async fn test_horizontal_only_drag_does_not_reorder() {
    let (_service, mut session) = create_session().await;
    let layout = session.page_layout(0.0, ROW_HEIGHT);
    let mut pointer = PointerSource::new();

    let inputs = vec![
        PointerInput::Down {
            row_id: "a".to_string(),
            on_handle: true,
            x: 8.0,
            y: 20.0,
        },
        PointerInput::Move { x: 300.0, y: 20.0 },
        PointerInput::Up { x: 300.0, y: 20.0 },
    ];
    let outcomes: Vec<ReorderOutcome> = inputs
        .into_iter()
        .map(|input| session.handle_gesture(&mut pointer, input, &layout).unwrap())
        .collect();

    assert!(!outcomes
        .iter()
        .any(|o| matches!(o, ReorderOutcome::Committed { .. })));
    assert_eq!(manual_order(&session), vec!["a", "b", "c", "d"]);
}
