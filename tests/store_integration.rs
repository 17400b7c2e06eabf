//! `SqliteStore` against a real database file.

use kwik::db;
use kwik::migrate::migrate_pool;
use kwik::sqlite_store::SqliteStore;
use kwik_core::history;
use kwik_core::models::Outcome;
use kwik_core::rank::{RankQuery, RankWeights};
use kwik_core::shell_history;
use kwik_core::store::Store;
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 86_400;

async fn open_store(tmp: &TempDir) -> SqliteStore {
    let pool = db::connect_path(&tmp.path().join("kwik.sqlite"))
        .await
        .unwrap();
    migrate_pool(&pool).await.unwrap();
    SqliteStore::new(pool)
}

async fn track_n(store: &SqliteStore, raw: &str, dir: &str, n: usize, at: i64) {
    for _ in 0..n {
        history::track(store, raw, dir, Outcome::ok(), at)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_identity_is_base_text_and_directory() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    track_n(&store, "git status", "/repo", 4, NOW).await;
    track_n(&store, "git status", "/other", 1, NOW).await;

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.unique_commands, 2);
    assert_eq!(stats.total_executions, 5);

    let top = store.top_commands(1).await.unwrap();
    assert_eq!(top[0].directory, "/repo");
    assert_eq!(top[0].frequency, 4);
    assert_eq!(top[0].subcommand.as_deref(), Some("status"));
    store.close().await;
}

#[tokio::test]
async fn test_upsert_keeps_created_at_and_bumps_last_used() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let first = store
        .upsert_command("make", Some("build"), "make build", "/r", NOW - DAY)
        .await
        .unwrap();
    let second = store
        .upsert_command("make", Some("build"), "make build", "/r", NOW)
        .await
        .unwrap();
    assert_eq!(first, second);

    let rec = &store.recent_commands(1).await.unwrap()[0];
    assert_eq!(rec.frequency, 2);
    assert_eq!(rec.created_at, NOW - DAY);
    assert_eq!(rec.last_used, NOW);
    store.close().await;
}

#[tokio::test]
async fn test_record_usage_feeds_failure_stats() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let id = store
        .upsert_command("cargo", Some("test"), "cargo test", "/r", NOW)
        .await
        .unwrap();
    store.record_usage(id, Outcome::ok(), NOW).await.unwrap();
    store
        .record_usage(id, Outcome::from_exit_code(101), NOW - 60)
        .await
        .unwrap();
    store
        .record_usage(id, Outcome::from_exit_code(2), NOW - 30)
        .await
        .unwrap();
    track_n(&store, "ls", "/r", 3, NOW).await;

    let failures = store.failure_stats(20).await.unwrap();
    assert_eq!(failures.len(), 1);
    let f = &failures[0];
    assert_eq!(f.command_id, id);
    assert_eq!(f.total_runs, 3);
    assert_eq!(f.failures, 2);
    assert_eq!(f.last_failure, Some(NOW - 30));
    assert_eq!(f.last_exit_code, Some(2));
    assert!((f.success_rate - 100.0 / 3.0).abs() < 1e-9);
    store.close().await;
}

#[tokio::test]
async fn test_flags_and_keywords_are_indexed() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let id = history::track(&store, "git commit -m wip", "/r", Outcome::ok(), NOW)
        .await
        .unwrap();
    history::track(&store, "git commit -m wip", "/r", Outcome::ok(), NOW)
        .await
        .unwrap();

    let flags = store.flags_for(id).await.unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].flag, "-m");
    assert_eq!(flags[0].meaning.as_deref(), Some("message"));

    // keyword lookup is case-insensitive substring
    let hits = store.search_by_keyword("COMM").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id);
    assert!(store.search_by_keyword("100%").await.unwrap().is_empty());
    store.close().await;
}

#[tokio::test]
async fn test_pattern_groups_need_two_variants() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    track_n(&store, "git status", "/a", 2, NOW).await;
    track_n(&store, "git status", "/b", 1, NOW).await;
    track_n(&store, "git push", "/a", 1, NOW).await;
    track_n(&store, "htop", "/a", 9, NOW).await;

    let groups = store.pattern_groups(10, 10).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].base, "git");
    assert_eq!(groups[0].run_count, 4);
    assert_eq!(groups[0].commands, vec!["git status", "git push"]);
    store.close().await;
}

#[tokio::test]
async fn test_long_commands_filter() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    track_n(&store, "docker compose up --build", "/a", 3, NOW).await;
    track_n(&store, "docker compose down -v", "/a", 2, NOW).await;
    track_n(&store, "git status", "/a", 7, NOW).await;

    let long = store.long_commands(20, 2, 5).await.unwrap();
    assert_eq!(long.len(), 1);
    assert_eq!(long[0].full_command, "docker compose up --build");
    store.close().await;
}

#[tokio::test]
async fn test_ranking_order_example() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    track_n(&store, "cmd-b", "/x", 1, NOW - 29 * DAY).await;
    track_n(&store, "cmd-c", "/y", 5, NOW - 5 * DAY).await;
    track_n(&store, "cmd-a", "/x", 10, NOW).await;

    let query = RankQuery {
        partial: "",
        directory: "/x",
        limit: 10,
    };
    let ranked = history::suggest(&store, &query, &RankWeights::default(), NOW)
        .await
        .unwrap();
    let order: Vec<&str> = ranked
        .iter()
        .map(|r| r.command.full_command.as_str())
        .collect();
    assert_eq!(order, vec!["cmd-a", "cmd-c", "cmd-b"]);
    assert!((ranked[0].score - 1.0).abs() < 1e-9);
    assert!((ranked[1].score - 0.5333).abs() < 1e-3);
    assert!((ranked[2].score - 0.2533).abs() < 1e-3);
    store.close().await;
}

#[tokio::test]
async fn test_reset_cascades() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let id = history::track(&store, "rm -rf build", "/r", Outcome::from_exit_code(1), NOW)
        .await
        .unwrap();
    history::reset(&store).await.unwrap();

    assert_eq!(store.stats().await.unwrap().total_executions, 0);
    assert!(store.flags_for(id).await.unwrap().is_empty());
    assert!(store.failure_stats(20).await.unwrap().is_empty());
    assert!(store.search_by_keyword("rm").await.unwrap().is_empty());

    let orphans: i64 = sqlx_count(&store, "SELECT COUNT(*) FROM usage_stats").await
        + sqlx_count(&store, "SELECT COUNT(*) FROM keywords").await;
    assert_eq!(orphans, 0);
    store.close().await;
}

#[tokio::test]
async fn test_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let store = open_store(&tmp).await;
        track_n(&store, "git status", "/r", 2, NOW).await;
        store.close().await;
    }
    let store = open_store(&tmp).await;
    assert_eq!(store.stats().await.unwrap().total_executions, 2);
    store.close().await;
}

#[tokio::test]
async fn test_history_import_never_rewinds_last_used() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    track_n(&store, "git status", "", 1, NOW).await;
    shell_history::import_lines(&store, [": 1600000000:0;git status"], NOW + 60)
        .await
        .unwrap();

    let rec = &store.recent_commands(1).await.unwrap()[0];
    assert_eq!(rec.frequency, 2);
    assert_eq!(rec.last_used, NOW);
    store.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tracking_of_one_command() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 10;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("kwik.sqlite");
    let setup = open_store(&tmp).await;

    let mut handles = Vec::with_capacity(WRITERS);
    for _ in 0..WRITERS {
        let path = path.clone();
        handles.push(tokio::spawn(async move {
            // one pool per writer, like separate `kwik track` processes
            let store = SqliteStore::new(db::connect_path(&path).await.unwrap());
            track_n(&store, "git status", "/repo", PER_WRITER, NOW).await;
            store.close().await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = setup.stats().await.unwrap();
    assert_eq!(stats.unique_commands, 1);
    assert_eq!(stats.total_executions, (WRITERS * PER_WRITER) as i64);
    assert_eq!(
        sqlx_count(&setup, "SELECT COUNT(*) FROM usage_stats").await,
        (WRITERS * PER_WRITER) as i64
    );
    setup.close().await;
}

async fn sqlx_count(store: &SqliteStore, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(store.pool())
        .await
        .unwrap()
}
