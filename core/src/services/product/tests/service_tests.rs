use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{Account, AccountKind, NewProduct, Principal, ProductPatch};
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::{AccountRepository, InMemoryStore};
use crate::services::product::ProductService;

fn service(store: &InMemoryStore) -> ProductService {
    ProductService::new(Arc::new(store.clone()), Arc::new(store.clone()))
}

fn company() -> Principal {
    Principal::new(Uuid::new_v4(), AccountKind::Empresa)
}

fn input(name: &str, price_cents: i64, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: "Hecho a mano".to_string(),
        price_cents,
        stock,
        image_url: None,
    }
}

#[tokio::test]
async fn test_company_creates_product() {
    let store = InMemoryStore::new();
    let service = service(&store);
    let owner = company();

    let product = service.create_product(owner, input(" Taza ", 1500, 10)).await.unwrap();

    assert_eq!(product.name, "Taza");
    assert_eq!(product.company_id, owner.id);
    assert!(product.is_active);
    assert_eq!(service.get_product(product.id).await.unwrap().id, product.id);
}

#[tokio::test]
async fn test_client_cannot_create_product() {
    let store = InMemoryStore::new();
    let service = service(&store);
    let client = Principal::new(Uuid::new_v4(), AccountKind::Cliente);

    assert!(matches!(
        service.create_product(client, input("Taza", 1500, 10)).await,
        Err(DomainError::Auth(AuthError::InsufficientPermissions))
    ));
}

#[tokio::test]
async fn test_create_validates_input() {
    let store = InMemoryStore::new();
    let service = service(&store);

    assert!(matches!(
        service.create_product(company(), input("Taza", 0, 10)).await,
        Err(DomainError::ValidationErr(ValidationError::OutOfRange { .. }))
    ));
    assert!(matches!(
        service.create_product(company(), input("Taza", 100, -1)).await,
        Err(DomainError::ValidationErr(ValidationError::OutOfRange { .. }))
    ));
    assert!(matches!(
        service.create_product(company(), input("  ", 100, 1)).await,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));
}

#[tokio::test]
async fn test_update_is_owner_only() {
    let store = InMemoryStore::new();
    let service = service(&store);
    let owner = company();
    let product = service.create_product(owner, input("Taza", 1500, 10)).await.unwrap();

    let patch = ProductPatch {
        price_cents: Some(1800),
        ..Default::default()
    };
    assert!(matches!(
        service.update_product(company(), product.id, patch.clone()).await,
        Err(DomainError::NotFound { .. })
    ));

    let updated = service.update_product(owner, product.id, patch).await.unwrap();
    assert_eq!(updated.price_cents, 1800);
}

#[tokio::test]
async fn test_inactive_products_are_hidden_from_listings() {
    let store = InMemoryStore::new();
    let service = service(&store);
    let owner = company();
    let kept = service.create_product(owner, input("Taza", 1500, 10)).await.unwrap();
    let retired = service.create_product(owner, input("Plato", 900, 3)).await.unwrap();

    service
        .update_product(
            owner,
            retired.id,
            ProductPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = service.list_by_company(owner.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, kept.id);
    assert_eq!(service.list_active().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_company_directory() {
    let store = InMemoryStore::new();
    let service = service(&store);
    let shop = Account::new_verified(
        AccountKind::Empresa,
        "shop@example.com".into(),
        "Shop".into(),
        "hash".into(),
        Some("logo.png".into()),
    );
    AccountRepository::create(&store, shop.clone()).await.unwrap();
    AccountRepository::create(
        &store,
        Account::new_verified(
            AccountKind::Cliente,
            "ana@example.com".into(),
            "Ana".into(),
            "hash".into(),
            None,
        ),
    )
    .await
    .unwrap();

    let companies = service.list_companies().await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(service.get_company(shop.id).await.unwrap().name, "Shop");
    assert!(matches!(
        service.get_company(Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));
}
