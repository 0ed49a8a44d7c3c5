mod support;

use serde_json::json;

#[tokio::test]
async fn when_two_clients_join_then_identity_snapshot_and_positions_flow_between_them() {
    let url = support::ensure_server();

    let mut first = support::connect(&url).await;
    let init_first = support::next_of_type(&mut first, "initialize").await;
    let first_id = init_first["id"].as_str().expect("id").to_string();
    assert!(first_id.starts_with("player-"));
    assert!(init_first["x"].is_number());

    let mut second = support::connect(&url).await;
    let init_second = support::next_of_type(&mut second, "initialize").await;
    let second_id = init_second["id"].as_str().expect("id").to_string();
    assert_ne!(first_id, second_id);

    // The newcomer's snapshot lists the earlier client.
    let snapshot = support::next_of_type(&mut second, "currentPlayers").await;
    assert!(snapshot["players"][first_id.as_str()]["x"].is_number());
    assert!(snapshot["players"].get(second_id.as_str()).is_none());

    let announced = support::next_for(&mut first, "newPlayer", "id", &second_id).await;
    assert_eq!(announced["id"], second_id.as_str());

    support::send_json(
        &mut first,
        json!({"type": "updatePlayerPosition", "id": first_id, "x": 42.0, "y": 24.0}),
    )
    .await;
    let moved = support::next_for(&mut second, "updatePlayerPosition", "id", &first_id).await;
    assert_eq!(moved["id"], first_id.as_str());
    assert_eq!(moved["x"], 42.0);
    assert_eq!(moved["y"], 24.0);

    drop(second);
    let gone = support::next_for(&mut first, "playerDisconnected", "id", &second_id).await;
    assert_eq!(gone["id"], second_id.as_str());
}

#[tokio::test]
async fn when_client_sends_garbage_then_connection_survives() {
    let url = support::ensure_server();

    let mut client = support::connect(&url).await;
    let init = support::next_of_type(&mut client, "initialize").await;
    let id = init["id"].as_str().expect("id").to_string();

    let mut peer = support::connect(&url).await;
    support::next_of_type(&mut peer, "initialize").await;

    support::send_json(&mut client, json!({"type": "teleport"})).await;
    support::send_json(&mut client, json!({"no": "type"})).await;
    support::send_json(
        &mut client,
        json!({"type": "projectileFired", "ownerId": id, "x": 1.0, "y": 2.0, "dx": 10.0, "dy": 0.0}),
    )
    .await;

    let fired = support::next_for(&mut peer, "projectileFired", "ownerId", &id).await;
    assert_eq!(fired["ownerId"], id.as_str());
}
