use super::*;
use crate::api::error::EditValidationError;
use crate::domain::product::ProductRow;
use crate::remote::error::ServiceError;
use crate::remote::inventory_service::TransferAck;

fn bridge() -> MutationBridge {
    MutationBridge::new(vec![
        "BLR-A".to_string(),
        "BLR-B".to_string(),
        "PNQ-C".to_string(),
        "DEL-B".to_string(),
    ])
}

fn row() -> ProductRow {
    ProductRow::new("p1", "Widget", "W-1", "BLR-A", 10, 12)
}

fn levels(bridge: &mut MutationBridge) -> Vec<NotificationLevel> {
    bridge
        .drain_notifications()
        .into_iter()
        .map(|n| n.level)
        .collect()
}

// ==========================================
// 需求编辑
// ==========================================

#[test]
fn test_blur_without_change_issues_nothing() {
    let mut b = bridge();
    let r = row();
    assert_eq!(b.demand_blur(&r).unwrap(), None);

    b.demand_input(&r, "12");
    assert_eq!(b.demand_blur(&r).unwrap(), None);

    b.demand_input(&r, " 12 ");
    assert_eq!(b.demand_blur(&r).unwrap(), None);
    assert!(!b.has_notifications());
}

#[test]
fn test_blur_with_change_issues_update() {
    let mut b = bridge();
    let r = row();
    b.demand_input(&r, "20");
    let cmd = b.demand_blur(&r).unwrap().unwrap();

    match &cmd {
        RemoteCommand::UpdateDemand { request, row_name, .. } => {
            assert_eq!(request.id, "p1");
            assert_eq!(request.demand, 20);
            assert_eq!(row_name, "Widget");
        }
        other => panic!("unexpected command: {:?}", other),
    }
    let record = b.edit(cmd.edit_id()).unwrap();
    assert_eq!(record.state, EditState::Pending);
    assert_eq!(record.kind, EditKind::Demand);
    // 在途期间显示用户输入
    assert_eq!(b.demand_text(&r), "20");
}

#[test]
fn test_non_numeric_demand_is_rejected_locally() {
    let mut b = bridge();
    let r = row();
    for bad in ["abc", "", "-3", "1.5"] {
        b.demand_input(&r, bad);
        let err = b.demand_blur(&r).unwrap_err();
        assert!(matches!(err, EditValidationError::InvalidDemand { .. }));
        assert_eq!(b.demand_text(&r), bad);
    }
    assert_eq!(b.pending_count(), 0);
    assert_eq!(levels(&mut b), vec![NotificationLevel::Error; 4]);
}

#[test]
fn test_demand_success_commits_and_notifies() {
    let mut b = bridge();
    let r = row();
    b.demand_input(&r, "20");
    let cmd = b.demand_blur(&r).unwrap().unwrap();
    let RemoteCommand::UpdateDemand { edit_id, row_name, request } = cmd else {
        panic!("expected demand command");
    };

    let mut updated = r.clone();
    updated.demand = 20;
    let refetch = b.apply_settlement(&Settlement::Demand {
        edit_id,
        row_name,
        request,
        result: Ok(updated.clone()),
    });

    assert!(refetch);
    assert_eq!(b.edit(edit_id).unwrap().state, EditState::Committed);
    assert_eq!(levels(&mut b), vec![NotificationLevel::Success]);

    // 重拉后输入框回到行上的值
    b.sync_rows(&[updated.clone()]);
    assert!(b.demand_cell("p1").is_none());
    assert_eq!(b.demand_text(&updated), "20");
}

#[test]
fn test_demand_failure_keeps_typed_text() {
    let mut b = bridge();
    let r = row();
    b.demand_input(&r, "20");
    let cmd = b.demand_blur(&r).unwrap().unwrap();
    let RemoteCommand::UpdateDemand { edit_id, row_name, request } = cmd else {
        panic!("expected demand command");
    };

    let refetch = b.apply_settlement(&Settlement::Demand {
        edit_id,
        row_name,
        request,
        result: Err(ServiceError::Transport("offline".to_string())),
    });

    assert!(!refetch);
    assert!(matches!(b.edit(edit_id).unwrap().state, EditState::Failed(ref m) if m.contains("offline")));
    assert_eq!(b.demand_text(&r), "20");
    assert_eq!(levels(&mut b), vec![NotificationLevel::Error]);

    // 其他编辑触发的重拉不会抹掉失败的输入
    b.sync_rows(&[r.clone()]);
    assert_eq!(b.demand_text(&r), "20");

    // 再次失焦会重新发出
    assert!(b.demand_blur(&r).unwrap().is_some());
}

// ==========================================
// 调拨
// ==========================================

#[test]
fn test_available_destinations_excludes_own_warehouse() {
    let b = bridge();
    assert_eq!(
        b.available_destinations(&row()),
        vec!["BLR-B".to_string(), "PNQ-C".to_string(), "DEL-B".to_string()]
    );
}

#[test]
fn test_transfer_validation_order() {
    let mut b = bridge();
    let r = row();
    b.open_transfer("p1");

    assert_eq!(
        b.submit_transfer(&r).unwrap_err(),
        EditValidationError::MissingDestination
    );

    b.set_transfer_destination("p1", Some("BLR-A"));
    assert!(matches!(
        b.submit_transfer(&r).unwrap_err(),
        EditValidationError::SameWarehouse { .. }
    ));

    b.set_transfer_destination("p1", Some("NYC-Z"));
    assert!(matches!(
        b.submit_transfer(&r).unwrap_err(),
        EditValidationError::UnknownDestination { .. }
    ));

    b.set_transfer_destination("p1", Some("PNQ-C"));
    for bad in ["", "0", "-1", "two"] {
        b.set_transfer_amount("p1", bad);
        assert!(matches!(
            b.submit_transfer(&r).unwrap_err(),
            EditValidationError::InvalidAmount { .. }
        ));
    }

    b.set_transfer_amount("p1", "11");
    assert_eq!(
        b.submit_transfer(&r).unwrap_err(),
        EditValidationError::AmountExceedsStock { stock: 10 }
    );

    assert_eq!(b.pending_count(), 0);
    let form = b.transfer_form("p1").unwrap();
    assert!(form.open);
    assert!(form.error.is_some());
}

#[test]
fn test_transfer_amount_equal_to_stock_is_allowed() {
    let mut b = bridge();
    let r = row();
    b.set_transfer_destination("p1", Some("PNQ-C"));
    b.set_transfer_amount("p1", "10");
    let cmd = b.submit_transfer(&r).unwrap();
    match cmd {
        RemoteCommand::TransferStock { request, .. } => {
            assert_eq!(request.amount, 10);
            assert_eq!(request.from_warehouse, "BLR-A");
            assert_eq!(request.to_warehouse, "PNQ-C");
        }
        other => panic!("unexpected command: {:?}", other),
    }
    assert!(b.transfer_form("p1").unwrap().error.is_none());
}

#[test]
fn test_transfer_success_clears_and_closes_form() {
    let mut b = bridge();
    let r = row();
    b.open_transfer("p1");
    b.set_transfer_destination("p1", Some("PNQ-C"));
    b.set_transfer_amount("p1", "4");
    let RemoteCommand::TransferStock { edit_id, request } = b.submit_transfer(&r).unwrap() else {
        panic!("expected transfer command");
    };

    let ack = TransferAck::from(&request);
    assert!(b.apply_settlement(&Settlement::Transfer {
        edit_id,
        request,
        result: Ok(ack),
    }));

    let form = b.transfer_form("p1").unwrap();
    assert!(!form.open);
    assert_eq!(form.destination, None);
    assert!(form.amount_text.is_empty());
    assert_eq!(b.edit(edit_id).unwrap().state, EditState::Committed);
    assert_eq!(levels(&mut b), vec![NotificationLevel::Success]);
}

#[test]
fn test_transfer_failure_keeps_form_open_with_values() {
    let mut b = bridge();
    let r = row();
    b.open_transfer("p1");
    b.set_transfer_destination("p1", Some("PNQ-C"));
    b.set_transfer_amount("p1", "4");
    let RemoteCommand::TransferStock { edit_id, request } = b.submit_transfer(&r).unwrap() else {
        panic!("expected transfer command");
    };

    assert!(!b.apply_settlement(&Settlement::Transfer {
        edit_id,
        request,
        result: Err(ServiceError::Rejected("nope".to_string())),
    }));

    let form = b.transfer_form("p1").unwrap();
    assert!(form.open);
    assert_eq!(form.destination.as_deref(), Some("PNQ-C"));
    assert_eq!(form.amount_text, "4");
    assert!(matches!(b.edit(edit_id).unwrap().state, EditState::Failed(_)));
    assert_eq!(levels(&mut b), vec![NotificationLevel::Error]);
}

#[test]
fn test_sync_rows_drops_state_of_removed_rows() {
    let mut b = bridge();
    let r = row();
    b.demand_input(&r, "abc");
    b.set_transfer_amount("p1", "3");
    b.sync_rows(&[]);
    assert!(b.demand_cell("p1").is_none());
    assert!(b.transfer_form("p1").is_none());
}

#[test]
fn test_unknown_edit_settlement_is_ignored() {
    let mut b = bridge();
    let r = row();
    let request = crate::remote::inventory_service::UpdateDemandRequest {
        id: r.id.clone(),
        demand: 3,
    };
    b.apply_settlement(&Settlement::Demand {
        edit_id: 999,
        row_name: r.name.clone(),
        request,
        result: Ok(r),
    });
    assert!(b.edit(999).is_none());
}

#[test]
fn test_settled_history_is_bounded() {
    let mut b = bridge();
    let r = row();

    // 一条始终在途的调拨
    b.set_transfer_destination("p1", Some("PNQ-C"));
    b.set_transfer_amount("p1", "1");
    let in_flight = b.submit_transfer(&r).unwrap().edit_id();

    let total = SETTLED_EDIT_HISTORY + 10;
    let mut first_settled = None;
    for i in 0..total {
        b.demand_input(&r, &(100 + i).to_string());
        let RemoteCommand::UpdateDemand { edit_id, row_name, request } =
            b.demand_blur(&r).unwrap().unwrap()
        else {
            panic!("expected demand command");
        };
        first_settled.get_or_insert(edit_id);
        b.apply_settlement(&Settlement::Demand {
            edit_id,
            row_name,
            request,
            result: Err(ServiceError::Transport("offline".to_string())),
        });
    }

    assert_eq!(b.edits().count(), SETTLED_EDIT_HISTORY + 1);
    assert!(b.edit(first_settled.unwrap()).is_none());
    assert_eq!(b.edit(in_flight).unwrap().state, EditState::Pending);
    assert_eq!(b.pending_count(), 1);
}
