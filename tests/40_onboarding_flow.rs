mod common;

use anyhow::{Context, Result};
use reqwest::{redirect, StatusCode};
use serde_json::json;

#[tokio::test]
async fn register_responds_200_for_teen_without_consent() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    common::init_schema(&client, &server.base_url).await?;

    // Consent is only required under 13; success is a plain 200
    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({
            "email": common::unique_email("teen"),
            "password": "longenough",
            "ageRange": "15-17",
            "parentalConsent": false
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn completing_onboarding_reissues_the_session() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()?;
    common::init_schema(&client, &server.base_url).await?;

    let email = common::unique_email("onboard");
    let (_user, token) =
        common::register_user(&client, &server.base_url, &email, "18-24").await?;

    let res = client
        .post(format!("{}/api/onboarding/complete", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "interests": [
                { "category": "music", "skillLevel": "beginner", "intentLevel": "casual" }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    // The session cookie must be replaced, or the page gate would keep
    // sending the user back to onboarding
    assert!(res.headers().contains_key("set-cookie"));

    let body = res.json::<serde_json::Value>().await?;
    let fresh_token = body["data"]["token"]
        .as_str()
        .context("fresh token missing")?
        .to_string();
    assert_ne!(fresh_token, token);

    let me = client
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth(&fresh_token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(me["data"]["onboardingCompleted"], true);

    // A protected page no longer redirects to /onboarding; 404 because no
    // page renderer is mounted
    let page = client
        .get(format!("{}/dashboard", server.base_url))
        .header("cookie", format!("ll_session={}", fresh_token))
        .send()
        .await?;
    assert_eq!(page.status(), StatusCode::NOT_FOUND);
    Ok(())
}
