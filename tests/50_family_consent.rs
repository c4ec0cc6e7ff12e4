mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

async fn create_link(
    client: &reqwest::Client,
    base_url: &str,
    parent_token: &str,
    child_email: &str,
) -> Result<String> {
    let res = client
        .post(format!("{}/api/family/link", base_url))
        .bearer_auth(parent_token)
        .json(&json!({ "childEmail": child_email, "relationshipType": "parent" }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "link returned {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    anyhow::ensure!(body["data"]["childConsentGiven"] == false);
    Ok(body["data"]["id"]
        .as_str()
        .context("relationship id missing")?
        .to_string())
}

async fn family_mode_of(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
) -> Result<serde_json::Value> {
    let me = client
        .get(format!("{}/api/auth/me", base_url))
        .bearer_auth(token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    Ok(me["data"]["familyMode"].clone())
}

#[tokio::test]
async fn consent_grant_enables_family_mode_and_is_idempotent() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    common::init_schema(&client, &server.base_url).await?;

    let child_email = common::unique_email("child");
    let (_, parent_token) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("parent"),
        "25-34",
    )
    .await?;
    let (_, child_token) =
        common::register_user(&client, &server.base_url, &child_email, "13-15").await?;

    let rel_id = create_link(&client, &server.base_url, &parent_token, &child_email).await?;

    // Only the child can grant; the grant activates the link
    let res = client
        .post(format!("{}/api/family/consent", server.base_url))
        .bearer_auth(&child_token)
        .json(&json!({ "relationshipId": rel_id, "consentGiven": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["childConsentGiven"], true);

    // Both parties entered family mode
    assert_eq!(
        family_mode_of(&client, &server.base_url, &parent_token).await?,
        true
    );
    assert_eq!(
        family_mode_of(&client, &server.base_url, &child_token).await?,
        true
    );

    // A second grant changes nothing and still succeeds
    let res = client
        .post(format!("{}/api/family/consent", server.base_url))
        .bearer_auth(&child_token)
        .json(&json!({ "relationshipId": rel_id, "consentGiven": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["childConsentGiven"], true);

    // The audit trail records both the request and the grant
    let log = client
        .get(format!(
            "{}/api/family/activity-log?relationshipId={}",
            server.base_url, rel_id
        ))
        .bearer_auth(&parent_token)
        .send()
        .await?;
    assert_eq!(log.status(), StatusCode::OK);
    let log = log.json::<serde_json::Value>().await?;
    let actions: Vec<&str> = log["data"]
        .as_array()
        .context("activity log array")?
        .iter()
        .filter_map(|e| e["action"].as_str())
        .collect();
    assert!(actions.contains(&"link_requested"), "actions: {:?}", actions);
    assert!(actions.contains(&"consent_granted"), "actions: {:?}", actions);
    Ok(())
}

#[tokio::test]
async fn consent_deny_removes_the_relationship() -> Result<()> {
    if !common::db_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    common::init_schema(&client, &server.base_url).await?;

    let child_email = common::unique_email("declined-child");
    let (_, parent_token) = common::register_user(
        &client,
        &server.base_url,
        &common::unique_email("declined-parent"),
        "35-49",
    )
    .await?;
    let (_, child_token) =
        common::register_user(&client, &server.base_url, &child_email, "13-15").await?;

    let rel_id = create_link(&client, &server.base_url, &parent_token, &child_email).await?;

    let res = client
        .post(format!("{}/api/family/consent", server.base_url))
        .bearer_auth(&child_token)
        .json(&json!({ "relationshipId": rel_id, "consentGiven": false }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"].is_null());

    // The row is gone: responding again finds nothing
    let res = client
        .post(format!("{}/api/family/consent", server.base_url))
        .bearer_auth(&child_token)
        .json(&json!({ "relationshipId": rel_id, "consentGiven": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Nobody entered family mode on a declined request
    assert_eq!(
        family_mode_of(&client, &server.base_url, &parent_token).await?,
        false
    );
    Ok(())
}
