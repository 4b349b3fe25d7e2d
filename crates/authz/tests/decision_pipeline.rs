//! Black-box test of the full decision pipeline: seeded catalogs, the facade,
//! and the audit sink working together the way a route layer drives them.

use std::sync::Arc;

use storekeep_authz::{
    AuthorizationFacade, AuthzError, CredentialFault, InMemoryAuditSink, OperationClass,
    Principal, RequestContext,
};
use storekeep_catalog::{
    InMemoryCatalog, Permission, PermissionAction, PermissionCategory, Role, RoleCatalog,
    RoleName, UserAccount,
};
use storekeep_core::{StoreId, UserId};

struct Harness {
    catalog: Arc<InMemoryCatalog>,
    sink: Arc<InMemoryAuditSink>,
    facade: AuthorizationFacade,
}

/// Catalog per the reference scenario: "staff" holds no grants, "manager"
/// holds products:update and sales:manage.
fn harness() -> Harness {
    let catalog = Arc::new(InMemoryCatalog::new());

    let products_update = catalog
        .insert_permission(
            Permission::new(
                "products.update",
                "products",
                PermissionAction::Update,
                PermissionCategory::Inventory,
                2,
            )
            .unwrap(),
        )
        .unwrap();
    let sales_manage = catalog
        .insert_permission(
            Permission::new(
                "sales.manage",
                "sales",
                PermissionAction::Manage,
                PermissionCategory::Sales,
                3,
            )
            .unwrap(),
        )
        .unwrap();

    catalog.save(Role::new("staff", 1).unwrap()).unwrap();

    let mut manager = Role::new("manager", 2).unwrap();
    manager.grant(products_update.id);
    manager.grant(sales_manage.id);
    catalog.save(manager).unwrap();

    let sink = Arc::new(InMemoryAuditSink::new());
    let facade = AuthorizationFacade::new(catalog.clone(), catalog.clone(), sink.clone());

    Harness {
        catalog,
        sink,
        facade,
    }
}

#[test]
fn staff_put_on_products_is_denied() {
    let h = harness();
    let p = Principal::new(UserId::new(), RoleName::STAFF).with_store(StoreId::new());

    let err = h
        .facade
        .authorize_request(Some(&p), "products", "PUT", &RequestContext::new())
        .unwrap_err();

    assert!(matches!(
        err,
        AuthzError::PermissionDenied { resource, action }
            if resource == "products" && action == PermissionAction::Update
    ));
    assert!(h.sink.records().is_empty());
}

#[test]
fn manager_put_on_products_is_allowed_via_the_update_grant() {
    let h = harness();
    let q = Principal::new(UserId::new(), RoleName::MANAGER);

    h.facade
        .authorize_request(Some(&q), "products", "PUT", &RequestContext::new())
        .unwrap();

    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].operation, OperationClass::ResourceRequest);
    assert_eq!(records[0].principal, q.id);
}

#[test]
fn manager_reaches_sales_through_the_manage_super_action() {
    let h = harness();
    let q = Principal::new(UserId::new(), RoleName::MANAGER);

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        h.facade
            .authorize_request(Some(&q), "sales", method, &RequestContext::new())
            .unwrap_or_else(|e| panic!("{method} on sales should pass: {e}"));
    }

    // The super-action is scoped to "sales"; it does not leak onto other
    // resources or verbs the manager lacks.
    assert!(
        h.facade
            .authorize_request(Some(&q), "products", "DELETE", &RequestContext::new())
            .is_err()
    );
}

#[test]
fn options_is_rejected_as_invalid_before_any_permission_decision() {
    let h = harness();
    let q = Principal::new(UserId::new(), RoleName::MANAGER);

    let err = h
        .facade
        .authorize_request(Some(&q), "sales", "OPTIONS", &RequestContext::new())
        .unwrap_err();
    assert!(matches!(err, AuthzError::InvalidMethod(m) if m == "OPTIONS"));
}

#[test]
fn the_pipeline_reresolves_catalog_state_per_decision() {
    let h = harness();
    let q = Principal::new(UserId::new(), RoleName::MANAGER);

    h.facade
        .authorize_request(Some(&q), "products", "PUT", &RequestContext::new())
        .unwrap();

    // Deactivate the grant between two decisions carrying the same snapshot.
    let mut manager = RoleCatalog::find_by_name(h.catalog.as_ref(), "manager")
        .unwrap()
        .unwrap();
    let update = h
        .catalog
        .permissions_for(&manager)
        .unwrap()
        .into_iter()
        .find(|p| p.name == "products.update")
        .unwrap();
    manager.revoke(&update.id);
    h.catalog.save(manager).unwrap();

    let err = h
        .facade
        .authorize_request(Some(&q), "products", "PUT", &RequestContext::new())
        .unwrap_err();
    assert!(matches!(err, AuthzError::PermissionDenied { .. }));
}

#[test]
fn store_scoping_composes_with_the_role_gates() {
    let h = harness();
    let s1 = StoreId::new();
    let s2 = StoreId::new();
    let manager = Principal::new(UserId::new(), RoleName::MANAGER).with_store(s1);

    let own_store = RequestContext::new().target_store(s1);
    h.facade
        .authorize_request(Some(&manager), "products", "PUT", &own_store)
        .unwrap();

    let other_store = RequestContext::new().target_store(s2);
    let err = h
        .facade
        .authorize_request(Some(&manager), "products", "PUT", &other_store)
        .unwrap_err();
    assert!(matches!(err, AuthzError::ScopeViolation { .. }));
}

#[test]
fn admin_bypasses_the_whole_pipeline() {
    let h = harness();
    let admin = Principal::new(UserId::new(), RoleName::ADMIN);

    let scoped = RequestContext::new().target_store(StoreId::new());
    h.facade
        .authorize_request(Some(&admin), "anything", "DELETE", &scoped)
        .unwrap();
    h.facade
        .authorize_bulk(Some(&admin), &RequestContext::new())
        .unwrap();
}

#[test]
fn missing_credentials_surface_before_the_gates() {
    let h = harness();

    let err = h
        .facade
        .authorize_bulk(None, &RequestContext::new())
        .unwrap_err();
    assert_eq!(err, AuthzError::Unauthenticated(CredentialFault::Missing));
}

#[test]
fn user_deletion_end_to_end() {
    let h = harness();

    let first = UserAccount::new("first@example.com", "First", RoleName::ADMIN).unwrap();
    let second = UserAccount::new("second@example.com", "Second", RoleName::ADMIN).unwrap();
    h.catalog.insert_user(first.clone()).unwrap();
    h.catalog.insert_user(second.clone()).unwrap();

    let caller = Principal::from_account(&first);

    // Two active admins: removing one is fine.
    h.facade
        .authorize_user_deletion(Some(&caller), &second.id)
        .unwrap();
    h.catalog.remove_user(&second.id).unwrap();

    // Now the caller is the sole active admin; even self-deletion is blocked.
    assert_eq!(
        h.facade
            .authorize_user_deletion(Some(&caller), &first.id)
            .unwrap_err(),
        AuthzError::LastAdminProtected
    );
}
