use chrono::Duration;
use uuid::Uuid;

use super::*;
use crate::domain::entities::{NewProduct, PendingAccount};

fn code_for(email: &str) -> VerificationCode {
    let payload = PendingAccount::Cliente {
        name: "Ana".into(),
        password_hash: "hash".into(),
    }
    .encode()
    .unwrap();
    VerificationCode::issue(email.to_string(), AccountKind::Cliente, payload, 60)
}

fn account_for(email: &str) -> Account {
    Account::new_verified(
        AccountKind::Cliente,
        email.to_string(),
        "Ana".into(),
        "hash".into(),
        None,
    )
}

#[tokio::test]
async fn test_create_if_none_live_rejects_second_live_code() {
    let store = InMemoryStore::new();
    assert!(store.create_if_none_live(&code_for("ana@example.com")).await.unwrap());
    assert!(!store.create_if_none_live(&code_for("ana@example.com")).await.unwrap());
    // Different kind is a different pair
    let mut company_code = code_for("ana@example.com");
    company_code.kind = AccountKind::Empresa;
    assert!(store.create_if_none_live(&company_code).await.unwrap());
}

#[tokio::test]
async fn test_expired_code_does_not_block_new_issue() {
    let store = InMemoryStore::new();
    store.create_if_none_live(&code_for("ana@example.com")).await.unwrap();
    store
        .age_codes("ana@example.com", AccountKind::Cliente, Duration::seconds(61))
        .await;
    assert!(store.create_if_none_live(&code_for("ana@example.com")).await.unwrap());
}

#[tokio::test]
async fn test_consume_and_promote_is_single_use() {
    let store = InMemoryStore::new();
    let code = code_for("ana@example.com");
    store.create_if_none_live(&code).await.unwrap();

    let first = store
        .consume_and_promote(code.id, account_for("ana@example.com"))
        .await
        .unwrap();
    assert!(first.is_some());

    let second = store
        .consume_and_promote(code.id, account_for("ana@example.com"))
        .await
        .unwrap();
    assert!(second.is_none());
    assert_eq!(store.account_count(AccountKind::Cliente).await, 1);
    assert!(store.codes_for("ana@example.com", AccountKind::Cliente).await.is_empty());
}

#[tokio::test]
async fn test_consume_duplicate_account_leaves_code() {
    let store = InMemoryStore::new();
    AccountRepository::create(&store, account_for("ana@example.com"))
        .await
        .unwrap();
    let code = code_for("ana@example.com");
    store.create_if_none_live(&code).await.unwrap();

    let result = store
        .consume_and_promote(code.id, account_for("ana@example.com"))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))
    ));
    assert_eq!(store.codes_for("ana@example.com", AccountKind::Cliente).await.len(), 1);
}

#[tokio::test]
async fn test_supersede_marks_live_codes_used() {
    let store = InMemoryStore::new();
    let old = code_for("ana@example.com");
    store.create_if_none_live(&old).await.unwrap();
    let new = old.reissue(60);
    store.supersede(&new).await.unwrap();

    let live = store.find_live("ana@example.com", AccountKind::Cliente).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, new.id);
}

#[tokio::test]
async fn test_delete_expired_removes_used_and_unused() {
    let store = InMemoryStore::new();
    let used = code_for("a@example.com");
    store.create_if_none_live(&used).await.unwrap();
    store.mark_used(used.id).await.unwrap();
    store.create_if_none_live(&code_for("b@example.com")).await.unwrap();
    store.create_if_none_live(&code_for("c@example.com")).await.unwrap();

    store.age_codes("a@example.com", AccountKind::Cliente, Duration::seconds(120)).await;
    store.age_codes("b@example.com", AccountKind::Cliente, Duration::seconds(120)).await;

    assert_eq!(store.delete_expired().await.unwrap(), 2);
    assert_eq!(store.codes_for("c@example.com", AccountKind::Cliente).await.len(), 1);
}

#[tokio::test]
async fn test_order_creation_is_all_or_nothing() {
    let store = InMemoryStore::new();
    let company = Uuid::new_v4();
    let plenty = Product::new(
        company,
        NewProduct {
            name: "Pan".into(),
            description: String::new(),
            price_cents: 100,
            stock: 10,
            image_url: None,
        },
    );
    let scarce = Product::new(
        company,
        NewProduct {
            name: "Vino".into(),
            description: String::new(),
            price_cents: 900,
            stock: 1,
            image_url: None,
        },
    );
    ProductRepository::create(&store, plenty.clone()).await.unwrap();
    ProductRepository::create(&store, scarce.clone()).await.unwrap();

    let order = Order::new(
        Uuid::new_v4(),
        company,
        &[(plenty.id, 3, 100), (scarce.id, 2, 900)],
    )
    .unwrap();
    let result = store.create_with_items(order.clone()).await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));

    let untouched = ProductRepository::find_by_id(&store, plenty.id).await.unwrap().unwrap();
    assert_eq!(untouched.stock, 10);
    assert!(OrderRepository::find_by_id(&store, order.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_cancel_restores_stock_once() {
    let store = InMemoryStore::new();
    let company = Uuid::new_v4();
    let product = Product::new(
        company,
        NewProduct {
            name: "Pan".into(),
            description: String::new(),
            price_cents: 100,
            stock: 5,
            image_url: None,
        },
    );
    ProductRepository::create(&store, product.clone()).await.unwrap();
    let order = Order::new(Uuid::new_v4(), company, &[(product.id, 2, 100)]).unwrap();
    store.create_with_items(order.clone()).await.unwrap();

    assert!(store
        .update_status(order.id, OrderStatus::Pendiente, OrderStatus::Cancelado)
        .await
        .unwrap());
    assert!(!store
        .update_status(order.id, OrderStatus::Pendiente, OrderStatus::Cancelado)
        .await
        .unwrap());

    let restored = ProductRepository::find_by_id(&store, product.id).await.unwrap().unwrap();
    assert_eq!(restored.stock, 5);
}

#[tokio::test]
async fn test_blacklist_cleanup_drops_expired_entries() {
    let store = InMemoryStore::new();
    store
        .blacklist_token("old", Utc::now() - Duration::seconds(5))
        .await
        .unwrap();
    store
        .blacklist_token("live", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();
    assert_eq!(store.cleanup_blacklist().await.unwrap(), 1);
    assert!(store.is_token_blacklisted("live").await.unwrap());
    assert!(!store.is_token_blacklisted("old").await.unwrap());
}
