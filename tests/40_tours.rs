mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

fn tour(name: &str, region: Option<&str>) -> Value {
    json!({
        "tour_id": uuid::Uuid::new_v4(),
        "tour_name": name,
        "description": null,
        "region": region,
        "duration_days": 5,
        "base_price": "850.00"
    })
}

#[tokio::test]
async fn invalid_duration_is_rejected_before_the_service() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookies = app.signed_in("guide@example.com").await?;

    let res = app
        .client
        .post(app.url("/dashboard/tours"))
        .header("Cookie", &cookies)
        .json(&json!({ "tour_name": "Glacier Walk", "duration_days": "abc", "base_price": "1299.99" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["field_errors"]["duration_days"], "Duration must be a positive number");
    assert!(!app.hosted.received("insert:"));
    Ok(())
}

#[tokio::test]
async fn created_tour_appears_in_the_list() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookies = app.signed_in("guide@example.com").await?;

    let res = app
        .client
        .post(app.url("/dashboard/tours"))
        .header("Cookie", &cookies)
        .json(&json!({
            "tour_name": " Glacier Walk ",
            "description": "",
            "region": "Patagonia",
            "duration_days": 7,
            "base_price": "1299.99"
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["navigation"]["to"], "/dashboard/tours");
    assert_eq!(body["data"]["tour"]["tour_name"], "Glacier Walk");

    let stored = app.hosted.rows("tours");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["description"], Value::Null);
    assert_eq!(stored[0]["duration_days"], 7);

    let res = app.client.get(app.url("/dashboard/tours")).header("Cookie", &cookies).send().await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["rows"][0]["region"], "Patagonia");
    Ok(())
}

#[tokio::test]
async fn search_matches_region_case_insensitively() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookies = app.signed_in("guide@example.com").await?;
    app.hosted.seed(
        "tours",
        vec![tour("Alps", Some("Europe")), tour("Andes", Some("South America")), tour("Fjords", None)],
    );

    let res = app
        .client
        .get(app.url("/dashboard/tours?search=europe"))
        .header("Cookie", &cookies)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["total"], 3);
    let rows = body["data"]["rows"].as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["tour_name"], "Alps");

    let res = app
        .client
        .get(app.url("/dashboard/tours?search=zzz"))
        .header("Cookie", &cookies)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["message"], "No tours found. Try adjusting your search.");
    Ok(())
}

#[tokio::test]
async fn delete_requires_confirmation() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookies = app.signed_in("guide@example.com").await?;
    let alps = tour("Alps", Some("Europe"));
    let id = alps["tour_id"].as_str().unwrap_or_default().to_string();
    app.hosted.seed("tours", vec![alps]);

    let res = app
        .client
        .delete(app.url(&format!("/dashboard/tours/{}", id)))
        .header("Cookie", &cookies)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "confirmation_required");
    assert_eq!(body["data"]["tour_name"], "Alps");
    assert_eq!(app.hosted.rows("tours").len(), 1);

    let res = app
        .client
        .delete(app.url(&format!("/dashboard/tours/{}?confirm=true", id)))
        .header("Cookie", &cookies)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "deleted");
    assert!(app.hosted.rows("tours").is_empty());
    Ok(())
}

#[tokio::test]
async fn edit_updates_the_stored_tour() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookies = app.signed_in("guide@example.com").await?;
    let alps = tour("Alps", Some("Europe"));
    let id = alps["tour_id"].as_str().unwrap_or_default().to_string();
    app.hosted.seed("tours", vec![alps]);

    let res = app
        .client
        .get(app.url(&format!("/dashboard/tours/{}", id)))
        .header("Cookie", &cookies)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["mode"], "edit");
    assert_eq!(body["data"]["tour"]["tour_name"], "Alps");

    let res = app
        .client
        .put(app.url(&format!("/dashboard/tours/{}", id)))
        .header("Cookie", &cookies)
        .json(&json!({ "tour_name": "Alps Traverse", "region": "Europe", "duration_days": "9", "base_price": 1500 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let stored = app.hosted.rows("tours");
    assert_eq!(stored[0]["tour_name"], "Alps Traverse");
    assert_eq!(stored[0]["duration_days"], 9);
    Ok(())
}

#[tokio::test]
async fn unknown_tour_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookies = app.signed_in("guide@example.com").await?;

    let res = app
        .client
        .get(app.url(&format!("/dashboard/tours/{}", uuid::Uuid::new_v4())))
        .header("Cookie", &cookies)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
