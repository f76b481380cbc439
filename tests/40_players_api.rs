mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{id_list, id_of};

#[tokio::test]
async fn player_creation_links_both_directions() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.register_and_login("alice").await?;

    let tournament = app.create_tournament(&token, "Cup").await?;
    let tid = id_of(&tournament);

    let player = app
        .create_child(&token, &tid, "players", &json!({ "name": "Bob" }))
        .await?;
    assert_eq!(player["name"], "Bob");
    assert_eq!(player["tournament"], Value::String(tid.clone()));
    assert!(player["playerPool"].is_null() || player.get("playerPool").is_none());

    let fetched = app
        .get_json(&token, &format!("/api/tournaments/{}", tid))
        .await?;
    assert_eq!(id_list(&fetched["players"]), vec![id_of(&player)]);

    Ok(())
}

#[tokio::test]
async fn creating_under_a_missing_tournament_is_400() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.register_and_login("alice").await?;

    let res = app
        .client
        .post(app.url("/api/tournaments/00000000-0000-4000-8000-000000000000/players"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Bob" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Request didn't contain valid data.");

    Ok(())
}

#[tokio::test]
async fn assigning_a_player_to_a_pool_updates_both_sides() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.register_and_login("alice").await?;

    let tournament = app.create_tournament(&token, "Cup").await?;
    let tid = id_of(&tournament);

    let player = app
        .create_child(&token, &tid, "players", &json!({ "name": "Bob" }))
        .await?;
    let pid = id_of(&player);

    let pool = app
        .create_child(&token, &tid, "playerpools", &json!({ "name": "Group A" }))
        .await?;
    let pool_id = id_of(&pool);

    let res = app
        .client
        .put(app.url(&format!("/api/tournaments/{}/players/{}", tid, pid)))
        .bearer_auth(&token)
        .json(&json!({ "name": "Bob", "playerPool": pool_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["playerPool"], Value::String(pool_id.clone()));

    let pool = app
        .get_json(&token, &format!("/api/tournaments/{}/playerpools/{}", tid, pool_id))
        .await?;
    assert_eq!(id_list(&pool["players"]), vec![pid.as_str()]);

    Ok(())
}

#[tokio::test]
async fn moving_a_player_leaves_no_dual_membership() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.register_and_login("alice").await?;

    let tournament = app.create_tournament(&token, "Cup").await?;
    let tid = id_of(&tournament);

    let player = app
        .create_child(&token, &tid, "players", &json!({ "name": "Bob" }))
        .await?;
    let pid = id_of(&player);

    let pool_a = app
        .create_child(&token, &tid, "playerpools", &json!({ "name": "Group A" }))
        .await?;
    let pool_b = app
        .create_child(&token, &tid, "playerpools", &json!({ "name": "Group B" }))
        .await?;

    for pool in [&pool_a, &pool_b] {
        let res = app
            .client
            .put(app.url(&format!("/api/tournaments/{}/players/{}", tid, pid)))
            .bearer_auth(&token)
            .json(&json!({ "name": "Bob", "playerPool": id_of(pool) }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == 200);
    }

    let a = app
        .get_json(
            &token,
            &format!("/api/tournaments/{}/playerpools/{}", tid, id_of(&pool_a)),
        )
        .await?;
    assert_eq!(a["players"], json!([]), "old pool keeps no stale member");

    let b = app
        .get_json(
            &token,
            &format!("/api/tournaments/{}/playerpools/{}", tid, id_of(&pool_b)),
        )
        .await?;
    assert_eq!(id_list(&b["players"]), vec![pid.as_str()]);

    Ok(())
}

#[tokio::test]
async fn deleting_a_player_shrinks_pool_and_tournament_lists() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.register_and_login("alice").await?;

    let tournament = app.create_tournament(&token, "Cup").await?;
    let tid = id_of(&tournament);

    let bob = app
        .create_child(&token, &tid, "players", &json!({ "name": "Bob" }))
        .await?;
    let carol = app
        .create_child(&token, &tid, "players", &json!({ "name": "Carol" }))
        .await?;

    let pool = app
        .create_child(
            &token,
            &tid,
            "playerpools",
            &json!({ "name": "Group A", "players": [id_of(&bob), id_of(&carol)] }),
        )
        .await?;
    let pool_id = id_of(&pool);
    assert_eq!(pool["players"].as_array().map(Vec::len), Some(2));

    let res = app
        .client
        .delete(app.url(&format!("/api/tournaments/{}/players/{}", tid, id_of(&bob))))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let pool = app
        .get_json(&token, &format!("/api/tournaments/{}/playerpools/{}", tid, pool_id))
        .await?;
    assert_eq!(id_list(&pool["players"]), vec![id_of(&carol)]);

    let tournament = app
        .get_json(&token, &format!("/api/tournaments/{}", tid))
        .await?;
    assert_eq!(id_list(&tournament["players"]), vec![id_of(&carol)]);

    Ok(())
}

#[tokio::test]
async fn another_users_player_is_out_of_reach() -> Result<()> {
    let app = common::spawn_app().await?;
    let alice = app.register_and_login("alice").await?;
    let bob = app.register_and_login("bob").await?;

    let tournament = app.create_tournament(&alice, "Cup").await?;
    let tid = id_of(&tournament);
    let player = app
        .create_child(&alice, &tid, "players", &json!({ "name": "Dave" }))
        .await?;

    let res = app
        .client
        .get(app.url(&format!("/api/tournaments/{}/players/{}", tid, id_of(&player))))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Unauthorized request");

    Ok(())
}
