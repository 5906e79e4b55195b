//! Shared harness for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header,
    test, web, Error,
};
use serde_json::{json, Value};

use mp_api::state::{AppState, Repositories};
use mp_core::repositories::InMemoryStore;
use mp_infra::email::{EmailServiceAdapter, MockEmailService};
use mp_shared::{AppConfig, CorsConfig};

pub const PASSWORD: &str = "secret123";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub store: InMemoryStore,
    pub email: MockEmailService,
    pub config: AppConfig,
}

pub fn context() -> TestContext {
    let mut config = AppConfig::default();
    config.auth.bcrypt_cost = 4;
    config.cors = CorsConfig::development();

    let store = InMemoryStore::new();
    let email = MockEmailService::new();
    let state = web::Data::new(AppState::build(
        &config,
        Repositories::from_store(store.clone()),
        Arc::new(EmailServiceAdapter::new(Arc::new(email.clone()))),
        None,
    ));

    TestContext {
        state,
        store,
        email,
        config,
    }
}

pub async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    test::read_body_json(resp).await
}

/// Register, verify and log in; returns `(account id, access token, refresh token)`
pub async fn signed_up<S, B>(
    app: &S,
    ctx: &TestContext,
    kind: &str,
    email: &str,
) -> (String, String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/auth/register/{}", kind))
        .set_json(json!({ "email": email, "name": "Test", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "registration of {} failed", email);

    let code = ctx.email.last_code_for(email).expect("code emailed");
    let req = test::TestRequest::post()
        .uri("/auth/verify")
        .set_json(json!({ "email": email, "code": code, "kind": kind }))
        .to_request();
    let verified = body_json(test::call_service(app, req).await).await;
    let id = verified["account"]["id"].as_str().expect("account id").to_string();

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let tokens = body_json(test::call_service(app, req).await).await;

    (
        id,
        tokens["accessToken"].as_str().expect("access token").to_string(),
        tokens["refreshToken"].as_str().expect("refresh token").to_string(),
    )
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
