//! Authentication middleware behavior on the protected API surface.
//!
//! Every failure mode of token verification must surface as 401 before
//! any handler or database work happens.

mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use dataset_platform_api::auth::{Claims, Role, TokenVerifier};

fn protected_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/datasets");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let res = common::test_app().oneshot(protected_request(None)).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() -> Result<()> {
    let req = Request::builder()
        .uri("/api/datasets")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())?;

    let res = common::test_app().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let res = common::test_app()
        .oneshot(protected_request(Some("not-a-jwt")))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_signed_with_different_secret_is_unauthorized() -> Result<()> {
    let foreign = TokenVerifier::new("a-different-secret", 30);
    let token = foreign.issue(5, Role::User)?;

    let res = common::test_app()
        .oneshot(protected_request(Some(&token)))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized_despite_valid_signature() -> Result<()> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "5".to_string(),
        role: Role::User,
        exp: now - 1,
        iat: now - 600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )?;

    let res = common::test_app()
        .oneshot(protected_request(Some(&token)))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_with_unknown_role_is_unauthorized() -> Result<()> {
    let now = Utc::now().timestamp();
    let claims = serde_json::json!({
        "sub": "5",
        "role": "superuser",
        "exp": now + 600,
        "iat": now,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )?;

    let res = common::test_app()
        .oneshot(protected_request(Some(&token)))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn valid_token_passes_the_authentication_gate() -> Result<()> {
    let verifier = TokenVerifier::new(common::TEST_SECRET, 30);
    let token = verifier.issue(5, Role::User)?;

    let res = common::test_app()
        .oneshot(protected_request(Some(&token)))
        .await?;

    // Without a reachable database the handler itself fails, but the
    // request must get past authentication.
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
