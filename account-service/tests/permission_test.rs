mod common;

use account_service::{
    models::{AccountType, Permission, SubscriptionPlan},
    services::ServiceError,
};
use common::TestApp;

#[tokio::test]
async fn test_grant_is_persisted_and_additive() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Basic).await;
    let tech = app
        .invite(&business, &owner, AccountType::Technician, "tech@ridgeway.test")
        .await;
    let before = tech.effective_permissions();

    let updated = app
        .state
        .accounts
        .grant_permission(&business.id, &owner.id, &tech.id, Permission::ViewReports)
        .await
        .unwrap();
    assert!(updated.has_permission(Permission::ViewReports));
    assert!(before.is_subset(&updated.effective_permissions()));

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    let reloaded = loaded.member(&tech.id).unwrap();
    assert!(reloaded.explicit_permissions.contains(&Permission::ViewReports));
}

#[tokio::test]
async fn test_revoke_removes_override_but_not_default() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Basic).await;
    let tech = app
        .invite(&business, &owner, AccountType::Technician, "tech@ridgeway.test")
        .await;

    app.state
        .accounts
        .grant_permission(&business.id, &owner.id, &tech.id, Permission::ExportData)
        .await
        .unwrap();

    let revoked = app
        .state
        .accounts
        .revoke_permission(&business.id, &owner.id, &tech.id, Permission::ExportData)
        .await
        .unwrap();
    assert!(!revoked.has_permission(Permission::ExportData));

    let still = app
        .state
        .accounts
        .revoke_permission(&business.id, &owner.id, &tech.id, Permission::ViewVehicles)
        .await
        .unwrap();
    assert!(still.has_permission(Permission::ViewVehicles));
}

#[tokio::test]
async fn test_manager_manages_technicians_not_peers() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    let manager = app
        .invite(&business, &owner, AccountType::Manager, "mgr@ridgeway.test")
        .await;
    let peer = app
        .invite(&business, &owner, AccountType::Manager, "mgr2@ridgeway.test")
        .await;
    let tech = app
        .invite(&business, &manager, AccountType::Technician, "tech@ridgeway.test")
        .await;

    let ok = app
        .state
        .accounts
        .grant_permission(&business.id, &manager.id, &tech.id, Permission::ViewSchedule)
        .await;
    assert!(ok.is_ok());

    let err = app
        .state
        .accounts
        .grant_permission(&business.id, &manager.id, &peer.id, Permission::ExportData)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_actor_cannot_grant_unheld_permission() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    let manager = app
        .invite(&business, &owner, AccountType::Manager, "mgr@ridgeway.test")
        .await;
    let tech = app
        .invite(&business, &manager, AccountType::Technician, "tech@ridgeway.test")
        .await;

    let err = app
        .state
        .accounts
        .grant_permission(&business.id, &manager.id, &tech.id, Permission::ManageSubscription)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_technician_cannot_manage_members() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Basic).await;
    let tech = app
        .invite(&business, &owner, AccountType::Technician, "tech@ridgeway.test")
        .await;
    let other = app
        .invite(&business, &owner, AccountType::Technician, "tech2@ridgeway.test")
        .await;

    let err = app
        .state
        .accounts
        .deactivate_user(&business.id, &tech.id, &other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_access_scopes_round_trip_through_store() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    let manager = app
        .invite(&business, &owner, AccountType::Manager, "mgr@ridgeway.test")
        .await;

    app.state
        .accounts
        .set_access_scopes(
            &business.id,
            &owner.id,
            &manager.id,
            vec!["Y".to_string()],
            Vec::new(),
        )
        .await
        .unwrap();

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    let reloaded = loaded.member(&manager.id).unwrap();
    assert!(!reloaded.can_access_department("X"));
    assert!(reloaded.can_access_department("Y"));
    assert!(reloaded.can_access_location("Depot 7"));

    let owner_reloaded = loaded.member(&owner.id).unwrap();
    assert!(owner_reloaded.can_access_department("anything"));
}

#[tokio::test]
async fn test_blank_scope_update_keeps_existing_restriction() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    let manager = app
        .invite(&business, &owner, AccountType::Manager, "mgr@ridgeway.test")
        .await;

    app.state
        .accounts
        .set_access_scopes(&business.id, &owner.id, &manager.id, vec!["Y".to_string()], Vec::new())
        .await
        .unwrap();

    let err = app
        .state
        .accounts
        .set_access_scopes(
            &business.id,
            &owner.id,
            &manager.id,
            Vec::new(),
            vec!["Depot 7".to_string(), "".to_string()],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Configuration(_)));

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    let reloaded = loaded.member(&manager.id).unwrap();
    assert!(!reloaded.can_access_department("X"));
    assert!(reloaded.can_access_location("Depot 9"));
}

#[tokio::test]
async fn test_unknown_target_user() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Basic).await;

    let err = app
        .state
        .accounts
        .grant_permission(&business.id, &owner.id, "ghost", Permission::ViewReports)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound));
}
