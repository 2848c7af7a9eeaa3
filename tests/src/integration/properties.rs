//! # League Properties
//!
//! | # | property | driven through |
//! |---|----------|----------------|
//! | 1 | projection is idempotent | `lg_02_standings::project` |
//! | 2 | points, then goal difference, then input order | `project` and HTTP `standings` |
//! | 3 | a 2-2 draw updates both fresh teams symmetrically | HTTP |
//! | 4 | a 3-1 win credits winner and loser asymmetrically | HTTP |
//! | 5 | a stale version token is rejected and nothing changes | HTTP |
//! | 6 | `get-data` initialises an absent document exactly once | HTTP |
//! | 7 | a bad secret is refused with zero store calls | HTTP, every action |
//! | 8 | notifications read newest first; mark-read keeps order | HTTP |

#[cfg(test)]
mod tests {
    use crate::integration::support::{team, League, SECRET};
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use lg_02_standings::project;
    use lg_03_dispatcher::{Action, ACTIONS};
    use serde_json::json;
    use shared_types::Team;

    fn ranked(id: &str, points: u32, goal_difference: i64) -> Team {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let mut team = Team::new(id, id, "owner", "A", at);
        team.points = points;
        team.goals_difference = goal_difference;
        team
    }

    // =========================================================================
    // 1-2: projection
    // =========================================================================

    #[test]
    fn test_projection_is_idempotent() {
        let teams = vec![ranked("a", 3, 1), ranked("b", 6, 2), ranked("c", 3, 4)];
        assert_eq!(project(&teams), project(&teams));
    }

    #[test]
    fn test_tie_break_keeps_input_order() {
        let teams = vec![ranked("first", 7, 5), ranked("top", 9, 8), ranked("second", 7, 5)];
        let ids: Vec<_> = project(&teams)
            .rows
            .into_iter()
            .map(|row| row.team.id)
            .collect();
        assert_eq!(ids, ["top", "first", "second"]);
    }

    #[tokio::test]
    async fn test_standings_action_ranks_by_goal_difference() {
        let league = League::new();
        let a = league.register("Athletic", "A").await;
        let b = league.register("Borough", "A").await;
        let c = league.register("County", "A").await;
        // a and c both win once; c by the larger margin.
        league.play(&a, &b, 1, 0).await;
        league.play(&c, &b, 4, 0).await;

        let body = league.ok("standings", Some(json!({"group": "A"}))).await;
        let ids: Vec<_> = body["standings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, [c, a, b]);
        assert_eq!(body["goalsConserved"], true);
    }

    // =========================================================================
    // 3-4: result recording
    // =========================================================================

    #[tokio::test]
    async fn test_draw_updates_both_teams() {
        let league = League::new();
        let home = league.register("Harbour", "A").await;
        let away = league.register("Valley", "A").await;
        league.play(&home, &away, 2, 2).await;

        let document = league.document().await;
        for id in [&home, &away] {
            let t = team(&document, id);
            assert_eq!(t["played"], 1);
            assert_eq!(t["draws"], 1);
            assert_eq!(t["points"], 1);
            assert_eq!(t["goalsDifference"], 0);
        }
    }

    #[tokio::test]
    async fn test_win_and_loss_are_asymmetric() {
        let league = League::new();
        let home = league.register("Harbour", "A").await;
        let away = league.register("Valley", "A").await;
        league.play(&home, &away, 3, 1).await;

        let document = league.document().await;
        let winner = team(&document, &home);
        assert_eq!(winner["wins"], 1);
        assert_eq!(winner["points"], 3);
        assert_eq!(winner["goalsDifference"], 2);
        let loser = team(&document, &away);
        assert_eq!(loser["losses"], 1);
        assert_eq!(loser["points"], 0);
        assert_eq!(loser["goalsDifference"], -2);
    }

    // =========================================================================
    // 5-6: versioning and initialisation
    // =========================================================================

    #[tokio::test]
    async fn test_stale_version_is_rejected_without_change() {
        let league = League::new();
        let current = league.ok("get-data", None).await;
        let before = league.store.peek("data.json").unwrap();

        let (status, body) = league
            .post(json!({
                "action": "update-data",
                "secret": SECRET,
                "version": "0000000000000000000000000000000000000000",
                "data": { "teams": [], "matches": [], "news": [], "adminNotifications": [] },
            }))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["kind"], "VersionConflict");

        let after = league.store.peek("data.json").unwrap();
        assert_eq!(after.version, before.version);
        assert_eq!(after.content, before.content);
        assert_eq!(current["version"], after.version.as_str());
    }

    #[tokio::test]
    async fn test_get_data_initialises_once() {
        let league = League::new();
        let first = league.ok("get-data", None).await;
        assert_eq!(first["initialized"], true);
        assert_eq!(first["data"]["teams"], json!([]));
        assert_eq!(first["data"]["matches"], json!([]));
        assert_eq!(first["data"]["adminNotifications"], json!([]));
        assert_eq!(first["data"]["news"].as_array().unwrap().len(), 1);

        let second = league.ok("get-data", None).await;
        assert_eq!(second["initialized"], false);
        assert_eq!(second["version"], first["version"]);
        assert_eq!(second["data"], first["data"]);
        assert_eq!(league.store.write_count(), 1);
    }

    // =========================================================================
    // 7-8: authorisation and notifications
    // =========================================================================

    #[tokio::test]
    async fn test_every_gated_action_refuses_bad_secret_without_store_calls() {
        let league = League::new();
        for action in ACTIONS.iter().copied().filter(|a| *a != Action::Health) {
            for secret in [json!("wrong"), json!(null)] {
                let (status, body) = league
                    .post(json!({
                        "action": action.name(),
                        "secret": secret,
                        "data": { "message": "x" },
                    }))
                    .await;
                assert_eq!(status, StatusCode::UNAUTHORIZED, "{action}");
                assert_eq!(body["error"]["kind"], "Unauthorized");
            }
        }
        assert_eq!(league.store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_notifications_newest_first_and_mark_read_keeps_order() {
        let league = League::new();
        for message in ["A", "B", "C"] {
            league
                .ok("add-notification", Some(json!({ "message": message })))
                .await;
        }

        let messages = |document: &serde_json::Value| -> Vec<String> {
            document["adminNotifications"]
                .as_array()
                .unwrap()
                .iter()
                .map(|n| n["message"].as_str().unwrap().to_string())
                .collect()
        };
        let document = league.document().await;
        assert_eq!(messages(&document), ["C", "B", "A"]);

        let marked = league.ok("mark-notifications-read", None).await;
        assert_eq!(marked["marked"], 3);

        let document = league.document().await;
        assert_eq!(messages(&document), ["C", "B", "A"]);
        assert!(document["adminNotifications"]
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["read"] == true));
    }
}
