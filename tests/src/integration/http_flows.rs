//! # HTTP Flows
//!
//! A season driven entirely through `POST /api/update-data`:
//!
//! ```text
//! get-data (init) → register-team ×2 → schedule-match → record-result
//!     → confirm-result → add-news → stats → backup → clear-data
//! ```
//!
//! plus concurrent writers, store outages and the unauthenticated health
//! route.

#[cfg(test)]
mod tests {
    use crate::integration::support::{team, League};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use lg_01_document_store::StoreError;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tower::ServiceExt;

    // =========================================================================
    // Season lifecycle
    // =========================================================================

    #[tokio::test]
    async fn test_season_lifecycle() {
        let league = League::new();
        league.ok("get-data", None).await;

        let home = league.register("Harbour Town", "A").await;
        let away = league.register("Valley Rangers", "A").await;

        let (status, body) = league
            .call(
                "register-team",
                Some(json!({"name": "harbour town", "owner": "someone else"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "InvalidPayload");

        let (status, _) = league
            .call(
                "schedule-match",
                Some(json!({"homeTeamId": home, "awayTeamId": home, "date": "2026-06-01"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let match_id = league.schedule(&home, &away).await;
        let result = json!({"matchId": match_id, "homeScore": 3, "awayScore": 1});
        let recorded = league.ok("record-result", Some(result.clone())).await;
        assert_eq!(recorded["match"]["played"], true);
        assert_eq!(recorded["match"]["confirmed"], false);

        // Scores are write-once.
        let (status, _) = league.call("record-result", Some(result)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let confirmed = league
            .ok("confirm-result", Some(json!({"matchId": match_id})))
            .await;
        assert_eq!(confirmed["match"]["confirmed"], true);

        // Confirmation leaves the counters alone.
        let document = league.document().await;
        assert_eq!(team(&document, &home)["points"], 3);
        assert_eq!(team(&document, &home)["played"], 1);

        // A team with fixtures cannot be removed.
        let (status, _) = league
            .call("remove-team", Some(json!({"teamId": away})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        league
            .ok(
                "add-news",
                Some(json!({"title": "Harbour top the table", "content": "3-1", "pinned": true})),
            )
            .await;
        let document = league.document().await;
        assert_eq!(document["news"][0]["title"], "Harbour top the table");
        assert_eq!(document["news"].as_array().unwrap().len(), 2);

        let stats = league.ok("stats", None).await;
        assert_eq!(stats["teams"], 2);
        assert_eq!(stats["playedMatches"], 1);
        assert_eq!(stats["totalGoals"], 4);

        let backup = league.ok("backup", None).await;
        let backup_path = backup["backupPath"].as_str().unwrap().to_string();
        assert!(backup_path.starts_with("backups/data-"));
        assert!(league.store.paths().contains(&backup_path));

        league.ok("clear-data", None).await;
        let document = league.document().await;
        assert_eq!(document["teams"], json!([]));
        assert_eq!(document["matches"], json!([]));
        assert_eq!(document["news"], json!([]));

        // The backup survives the reset untouched.
        let saved = league.store.peek(&backup_path).unwrap();
        let saved: serde_json::Value = serde_json::from_slice(&saved.content).unwrap();
        assert_eq!(saved["teams"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_team_without_fixtures() {
        let league = League::new();
        let id = league.register("Lonely Albion", "B").await;
        let removed = league.ok("remove-team", Some(json!({"teamId": id}))).await;
        assert_eq!(removed["team"]["id"], id.as_str());
        assert_eq!(league.document().await["teams"], json!([]));

        let (status, body) = league
            .call("remove-team", Some(json!({"teamId": id})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["kind"], "NotFound");
    }

    #[tokio::test]
    async fn test_undated_fixture_and_oversized_score() {
        let league = League::new();
        let home = league.register("Harbour Town", "A").await;
        let away = league.register("Valley Rangers", "A").await;

        let scheduled = league
            .ok(
                "schedule-match",
                Some(json!({"homeTeamId": home, "awayTeamId": away})),
            )
            .await;
        let date = scheduled["match"]["date"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok(), "{date}");
        let match_id = scheduled["match"]["id"].as_str().unwrap().to_string();

        let (status, body) = league
            .call(
                "record-result",
                Some(json!({"matchId": match_id, "homeScore": 4294967295u64, "awayScore": 0})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "InvalidPayload");

        let document = league.document().await;
        assert_eq!(team(&document, &home)["played"], 0);
        assert_eq!(document["matches"][0]["played"], false);

        // The fixture can still take a real result.
        league
            .ok(
                "record-result",
                Some(json!({"matchId": match_id, "homeScore": 2, "awayScore": 0})),
            )
            .await;
        assert_eq!(team(&league.document().await, &home)["goalsFor"], 2);
    }

    // =========================================================================
    // Concurrency and failures
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_all_land() {
        // With four writers each one conflicts at most three times, which
        // the default retry budget absorbs.
        let league = Arc::new(League::new());
        league.ok("get-data", None).await;

        let handles: Vec<_> = ["one", "two", "three", "four"]
            .into_iter()
            .map(|message| {
                let league = Arc::clone(&league);
                tokio::spawn(async move {
                    league
                        .call("add-notification", Some(json!({ "message": message })))
                        .await
                })
            })
            .collect();
        for handle in handles {
            let (status, body) = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK, "{body}");
        }

        let document = league.document().await;
        assert_eq!(document["adminNotifications"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_store_outage_is_502_and_recovers() {
        let league = League::new();
        league
            .store
            .fail_next(StoreError::Transient("connection reset".into()));

        let (status, body) = league.call("get-data", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["kind"], "StoreUnavailable");

        league.ok("get-data", None).await;
        assert_eq!(league.metrics.store_failures.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_carries_retry_after() {
        let league = League::new();
        league.store.fail_next(StoreError::RateLimited {
            retry_after_secs: Some(42),
        });

        let (status, body) = league.call("stats", None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["retryAfterSecs"], 42);
    }

    // =========================================================================
    // Health
    // =========================================================================

    #[tokio::test]
    async fn test_health_needs_no_secret() {
        let league = League::new();

        let (status, body) = league.post(json!({"action": "health"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configured"], true);

        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = league.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
