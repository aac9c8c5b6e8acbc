mod common;

use account_service::{
    models::{AccountType, InviteUserRequest, Permission, Seat, SubscriptionPlan},
    services::{metrics, QuotaGuard, ServiceError},
};
use common::{TestApp, MEMBER_PASSWORD};

fn request(email: &str, account_type: AccountType) -> InviteUserRequest {
    InviteUserRequest::new("Jordan Lee", email, account_type, MEMBER_PASSWORD)
}

#[tokio::test]
async fn test_owner_invites_manager_on_pro() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;

    let manager = app
        .state
        .invitations
        .invite(&business.id, &owner.id, request("mgr@ridgeway.test", AccountType::Manager))
        .await
        .unwrap();

    assert_eq!(manager.account_type, AccountType::Manager);
    assert_eq!(manager.invited_by.as_deref(), Some(owner.id.as_str()));
    assert!(manager.is_active);
    assert!(manager.can_invite_users());

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    assert_eq!(loaded.active_members_of(AccountType::Manager), 1);
}

#[tokio::test]
async fn test_trial_plan_cannot_create_managers() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Trial).await;

    let err = app
        .state
        .invitations
        .invite(&business.id, &owner.id, request("mgr@ridgeway.test", AccountType::Manager))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::FeatureNotInPlan { plan: SubscriptionPlan::Trial, .. }));
}

#[tokio::test]
async fn test_manager_seat_limit_enforced_before_adding() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    let limit = business.max_managers;

    for i in 0..limit {
        app.invite(&business, &owner, AccountType::Manager, &format!("mgr{}@ridgeway.test", i))
            .await;
    }

    let err = app
        .state
        .invitations
        .invite(&business.id, &owner.id, request("extra@ridgeway.test", AccountType::Manager))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::QuotaExceeded { seat: Seat::Manager, limit: l, requested: r } if l == limit && r == limit + 1
    ));

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    assert_eq!(loaded.active_members_of(AccountType::Manager), limit);
    assert!(metrics::get_metrics().contains("account_quota_rejections_total"));
}

#[tokio::test]
async fn test_technician_cannot_invite() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Basic).await;
    let tech = app
        .invite(&business, &owner, AccountType::Technician, "tech@ridgeway.test")
        .await;

    let err = app
        .state
        .invitations
        .invite(&business.id, &tech.id, request("other@ridgeway.test", AccountType::Technician))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_manager_invites_technicians_only() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    let manager = app
        .invite(&business, &owner, AccountType::Manager, "mgr@ridgeway.test")
        .await;

    let tech = app
        .invite(&business, &manager, AccountType::Technician, "tech@ridgeway.test")
        .await;
    assert_eq!(tech.invited_by.as_deref(), Some(manager.id.as_str()));

    let err = app
        .state
        .invitations
        .invite(&business.id, &manager.id, request("mgr2@ridgeway.test", AccountType::Manager))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvitationNotAllowed {
            inviter: AccountType::Manager,
            invitee: AccountType::Manager
        }
    ));
}

#[tokio::test]
async fn test_second_owner_is_rejected() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Enterprise).await;

    let err = app
        .state
        .invitations
        .invite(&business.id, &owner.id, request("owner2@ridgeway.test", AccountType::Owner))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvitationNotAllowed { .. }));

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    assert_eq!(loaded.active_members_of(AccountType::Owner), 1);
    assert!(QuotaGuard::ensure_member_capacity(&loaded, AccountType::Owner).is_err());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Basic).await;
    app.invite(&business, &owner, AccountType::Technician, "tech@ridgeway.test")
        .await;

    let err = app
        .state
        .invitations
        .invite(&business.id, &owner.id, request("TECH@ridgeway.test", AccountType::Technician))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmailAlreadyRegistered));
}

#[tokio::test]
async fn test_invite_with_extra_permissions_and_scopes() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;

    let mut req = request("tech@ridgeway.test", AccountType::Technician);
    req.extra_permissions = vec!["view_reports".to_string()];
    req.department_access = vec!["Body Shop".to_string()];

    let tech = app
        .state
        .invitations
        .invite(&business.id, &owner.id, req)
        .await
        .unwrap();

    assert!(tech.has_permission(Permission::ViewReports));
    assert!(tech.has_permission(Permission::ViewVehicles));
    assert!(tech.can_access_department("Body Shop"));
    assert!(!tech.can_access_department("Paint"));
    assert!(tech.can_access_location("Any Depot"));
}

#[tokio::test]
async fn test_unknown_permission_key_is_configuration_error() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;

    let mut req = request("tech@ridgeway.test", AccountType::Technician);
    req.extra_permissions = vec!["launch_rockets".to_string()];

    let err = app
        .state
        .invitations
        .invite(&business.id, &owner.id, req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Configuration(_)));

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    assert_eq!(loaded.user_accounts.len(), 1);
}

#[tokio::test]
async fn test_blank_scope_entry_is_rejected_not_widened() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;

    let mut req = request("tech@ridgeway.test", AccountType::Technician);
    req.department_access = vec![" ".to_string()];

    let err = app
        .state
        .invitations
        .invite(&business.id, &owner.id, req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Configuration(_)));

    let loaded = app.state.accounts.load_business(&business.id).await.unwrap();
    assert_eq!(loaded.user_accounts.len(), 1);
}

#[tokio::test]
async fn test_manager_cannot_grant_what_it_lacks() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    let manager = app
        .invite(&business, &owner, AccountType::Manager, "mgr@ridgeway.test")
        .await;

    let mut req = request("tech@ridgeway.test", AccountType::Technician);
    req.extra_permissions = vec!["manage_subscription".to_string()];

    let err = app
        .state
        .invitations
        .invite(&business.id, &manager.id, req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_inactive_business_rejects_invitations() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Pro).await;
    app.state.accounts.deactivate_business(&business.id).await.unwrap();

    let err = app
        .state
        .invitations
        .invite(&business.id, &owner.id, request("tech@ridgeway.test", AccountType::Technician))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::BusinessInactive));
}

#[tokio::test]
async fn test_invitation_outcomes_are_counted() {
    let app = TestApp::new();
    let (business, owner) = app.business(SubscriptionPlan::Basic).await;
    app.invite(&business, &owner, AccountType::Technician, "tech@ridgeway.test")
        .await;

    let output = metrics::get_metrics();
    assert!(output.contains("account_invitations_total"));
    assert!(output.contains("outcome=\"created\""));
}
