use futures::TryStreamExt;
use sqlx::PgPool;

use scriven::application::pagination::{DEFAULT_ACTIVITY_PAGE_SIZE, PageRequest};
use scriven::application::repos::{
    ActivityLogsRepo, CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use scriven::infra::db::PostgresRepositories;

fn params(title: &str, tags: &[&str]) -> CreatePostParams {
    CreatePostParams {
        title: title.to_string(),
        content: format!("{title} body"),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn first_page() -> PageRequest {
    PageRequest::new(None, None, DEFAULT_ACTIVITY_PAGE_SIZE)
}

#[sqlx::test(migrations = "./migrations")]
async fn create_pairs_post_with_new_post_log(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);

    let post = repos
        .create_post(params("first", &["go"]))
        .await
        .expect("create post");
    assert!(post.id > 0);
    assert_eq!(post.created_at, post.updated_at);

    let logs = repos.list_logs(first_page()).await.expect("list logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "new_post");
    assert_eq!(logs[0].post_id, Some(post.id));
    assert_eq!(repos.count_logs().await.expect("count logs"), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_logs_and_records_terminal_entry(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let doomed = repos
        .create_post(params("doomed", &[]))
        .await
        .expect("create doomed");
    let kept = repos
        .create_post(params("kept", &[]))
        .await
        .expect("create kept");

    let deleted = repos.delete_post(doomed.id).await.expect("delete post");
    assert_eq!(deleted.id, doomed.id);
    assert!(repos.find_by_id(doomed.id).await.expect("find").is_none());

    let logs = repos.list_logs(first_page()).await.expect("list logs");
    assert!(logs.iter().all(|log| log.post_id != Some(doomed.id)));
    assert!(
        logs.iter()
            .any(|log| log.action == "new_post" && log.post_id == Some(kept.id))
    );
    let terminal: Vec<_> = logs
        .iter()
        .filter(|log| log.action == "delete_post")
        .collect();
    assert_eq!(terminal.len(), 1);
    assert_eq!(terminal[0].post_id, None);

    assert!(matches!(
        repos.delete_post(doomed.id).await,
        Err(RepoError::NotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_rolls_back_when_log_insert_fails(pool: PgPool) {
    sqlx::query(
        "ALTER TABLE activity_logs ADD CONSTRAINT reject_new_post CHECK (action <> 'new_post')",
    )
    .execute(&pool)
    .await
    .expect("add constraint");
    let repos = PostgresRepositories::new(pool);

    let result = repos.create_post(params("orphan", &["go"])).await;
    assert!(matches!(result, Err(RepoError::Persistence(_))));
    assert_eq!(repos.count_posts().await.expect("count posts"), 0);
    assert_eq!(repos.count_logs().await.expect("count logs"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_rolls_back_when_log_insert_fails(pool: PgPool) {
    let repos = PostgresRepositories::new(pool.clone());
    let post = repos
        .create_post(params("survivor", &[]))
        .await
        .expect("create post");

    sqlx::query(
        "ALTER TABLE activity_logs ADD CONSTRAINT reject_delete_post \
         CHECK (action <> 'delete_post')",
    )
    .execute(&pool)
    .await
    .expect("add constraint");

    let result = repos.delete_post(post.id).await;
    assert!(matches!(result, Err(RepoError::Persistence(_))));

    let still_there = repos.find_by_id(post.id).await.expect("find post");
    assert_eq!(still_there.map(|found| found.id), Some(post.id));
    let logs = repos.list_logs(first_page()).await.expect("list logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "new_post");
    assert_eq!(logs[0].post_id, Some(post.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn nul_text_is_invalid_input(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);

    let result = repos.create_post(params("a\u{0}b", &[])).await;
    assert!(matches!(result, Err(RepoError::InvalidInput { .. })));
    assert_eq!(repos.count_posts().await.expect("count posts"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_rewrites_fields_and_reports_missing_rows(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let post = repos
        .create_post(params("before", &["go"]))
        .await
        .expect("create post");

    let updated = repos
        .update_post(UpdatePostParams {
            id: post.id,
            title: "after".to_string(),
            content: post.content.clone(),
            tags: vec!["rust".to_string()],
        })
        .await
        .expect("update post");
    assert_eq!(updated.title, "after");
    assert_eq!(updated.tags, vec!["rust".to_string()]);
    assert_eq!(updated.created_at, post.created_at);
    assert!(updated.updated_at >= post.updated_at);

    let missing = repos
        .update_post(UpdatePostParams {
            id: post.id + 1000,
            title: "ghost".to_string(),
            content: "ghost".to_string(),
            tags: Vec::new(),
        })
        .await;
    assert!(matches!(missing, Err(RepoError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
async fn tag_lookup_and_batch_fetch(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let go = repos
        .create_post(params("go", &["go", "db"]))
        .await
        .expect("create go");
    let rust = repos
        .create_post(params("rust", &["rust"]))
        .await
        .expect("create rust");
    let both = repos
        .create_post(params("both", &["rust", "go"]))
        .await
        .expect("create both");

    let tagged = repos.find_by_tag("go").await.expect("find by tag");
    let ids: Vec<i64> = tagged.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![both.id, go.id]);
    assert!(repos.find_by_tag("GO").await.expect("case").is_empty());

    let mut fetched: Vec<i64> = repos
        .find_by_ids(&[rust.id, go.id, 9_999])
        .await
        .expect("find by ids")
        .into_iter()
        .map(|post| post.id)
        .collect();
    fetched.sort_unstable();
    assert_eq!(fetched, vec![go.id, rust.id]);
    assert!(repos.find_by_ids(&[]).await.expect("empty ids").is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn paging_past_the_end_returns_nothing(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    for n in 0..3 {
        repos
            .create_post(params(&format!("post {n}"), &[]))
            .await
            .expect("create post");
    }

    assert_eq!(repos.count_posts().await.expect("count"), 3);
    let second = repos
        .list_posts(PageRequest::new(Some(2), Some(2), 10))
        .await
        .expect("second page");
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].title, "post 0");

    let beyond = repos
        .list_posts(PageRequest::new(Some(9), Some(2), 10))
        .await
        .expect("beyond page");
    assert!(beyond.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn stream_all_posts_yields_every_row_in_id_order(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let mut expected = Vec::new();
    for n in 0..4 {
        let post = repos
            .create_post(params(&format!("post {n}"), &["bulk"]))
            .await
            .expect("create post");
        expected.push(post.id);
    }

    let streamed: Vec<i64> = repos
        .stream_all_posts()
        .map_ok(|post| post.id)
        .try_collect()
        .await
        .expect("stream posts");
    assert_eq!(streamed, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn health_check_reaches_database(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    repos.health_check().await.expect("database reachable");
}
