use onboard_core::db::open_db_in_memory;
use onboard_core::model::account::{LandingRoute, Product};
use onboard_core::store::kv_store::{CURRENT_USER_KEY, USERS_KEY};
use onboard_core::{
    AuthError, AuthService, KeyValueStore, KvUserRepository, MemoryKeyValueStore,
    SqliteKeyValueStore, ValidationError,
};

#[test]
fn register_login_logout_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    let auth = AuthService::new(KvUserRepository::new(store));

    auth.register(" Ana@Loja.com ", "segredo", "THUB").unwrap();
    let stored = store.get(USERS_KEY).unwrap().unwrap();
    assert!(!stored.contains("segredo"));

    let outcome = auth.login("ana@loja.com", "segredo", "THUB").unwrap();
    assert_eq!(outcome.user.email, "ana@loja.com");
    assert_eq!(outcome.landing, LandingRoute::Dashboard);

    let session = auth.restore_session();
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().product, Product::Thub);

    auth.logout().unwrap();
    assert_eq!(store.get(CURRENT_USER_KEY).unwrap(), None);
    assert!(!auth.restore_session().is_authenticated());
}

#[test]
fn other_products_land_on_placeholder() {
    let store = MemoryKeyValueStore::new();
    let auth = AuthService::new(KvUserRepository::new(&store));

    auth.register("bia@empresa.com", "123", "VDV Performance")
        .unwrap();
    let outcome = auth
        .login("bia@empresa.com", "123", "VDV Performance")
        .unwrap();
    assert_eq!(outcome.landing, LandingRoute::ProductPlaceholder);
}

#[test]
fn login_requires_matching_product_and_password() {
    let store = MemoryKeyValueStore::new();
    let auth = AuthService::new(KvUserRepository::new(&store));
    auth.register("caio@empresa.com", "abc", "THUB").unwrap();

    assert!(matches!(
        auth.login("caio@empresa.com", "abc", "BPO financeiro"),
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login("caio@empresa.com", "abd", "THUB"),
        Err(AuthError::InvalidCredentials)
    ));
    assert_eq!(auth.current_user(), None);
}

#[test]
fn registration_validates_input() {
    let store = MemoryKeyValueStore::new();
    let auth = AuthService::new(KvUserRepository::new(&store));

    assert!(matches!(
        auth.register("x@y.com", "pw", ""),
        Err(AuthError::Validation(ValidationError::MissingProduct))
    ));
    assert!(matches!(
        auth.register("not-an-email", "pw", "THUB"),
        Err(AuthError::Validation(ValidationError::InvalidEmail))
    ));
    assert!(matches!(
        auth.register("x@y.com", "", "THUB"),
        Err(AuthError::Validation(ValidationError::EmptyPassword))
    ));

    auth.register("x@y.com", "pw", "THUB").unwrap();
    assert!(matches!(
        auth.register("X@Y.com", "other", "VDV Performance"),
        Err(AuthError::EmailTaken)
    ));
}

#[test]
fn malformed_session_state_reads_as_logged_out() {
    let store = MemoryKeyValueStore::new();
    store.set(CURRENT_USER_KEY, "{broken").unwrap();
    store.set(USERS_KEY, "42").unwrap();

    let auth = AuthService::new(KvUserRepository::new(&store));
    assert_eq!(auth.current_user(), None);
    assert!(matches!(
        auth.login("a@b.com", "pw", "THUB"),
        Err(AuthError::InvalidCredentials)
    ));
}
