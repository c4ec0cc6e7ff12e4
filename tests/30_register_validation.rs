mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn under_13_without_consent_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({
            "email": "kid@example.com",
            "password": "longenough",
            "ageRange": "10-12",
            "parentalConsent": false
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let details = body["details"].as_array().expect("details array");
    assert!(details
        .iter()
        .any(|d| d["field"] == "parentalConsent"
            && d["message"]
                .as_str()
                .unwrap_or_default()
                .contains("under 13")));
    Ok(())
}

#[tokio::test]
async fn short_password_and_bad_age_range_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({
            "email": "a@example.com",
            "password": "short",
            "ageRange": "banana"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    let fields: Vec<&str> = body["details"]
        .as_array()
        .expect("details array")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"ageRange"));
    Ok(())
}
