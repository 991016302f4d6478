use agora_core::access::Visibility;
use agora_core::domain::{Post, PostDraft};
use agora_core::ports::{BaseRepository, PostQuery, PostRepository};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn post_model(id: i64, author_id: Uuid, is_published: bool) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: format!("Post {id}"),
        slug: format!("post-{id}"),
        content: "Content".to_owned(),
        author_id,
        category_id: None,
        attachment: None,
        is_published,
        is_pinned: false,
        created_at: now.into(),
        updated_at: now.into(),
        published_at: None,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(7, author_id, true)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, i64>::find_by_id(&repo, 7).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Post 7");
    assert_eq!(post.id, 7);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_insert_returns_assigned_id() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(12, author_id, false)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let draft = PostDraft::new(author_id, "Post 12", "Content").unwrap();
    let post = repo.insert(draft, Utc::now()).await.unwrap();

    assert_eq!(post.id, 12);
    assert!(!post.is_published);
}

fn logged_sql(repo: PostgresPostRepository) -> String {
    let log = repo.db.into_transaction_log();
    assert_eq!(log.len(), 1);
    log[0]
        .statements()
        .iter()
        .map(|stmt| stmt.sql.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[tokio::test]
async fn test_list_restricts_students_and_orders_pinned_newest_first() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(3, author_id, true),
            post_model(2, author_id, false),
        ]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let query = PostQuery {
        visibility: Visibility::PublishedOrAuthoredBy(author_id),
        category_id: None,
        limit: 20,
        offset: 0,
    };
    let posts = repo.list(&query).await.unwrap();

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2]);

    let sql = logged_sql(repo);
    assert!(
        sql.contains(r#"("posts"."is_published" = $1 OR "posts"."author_id" = $2)"#),
        "{sql}"
    );
    assert!(
        sql.contains(
            r#"ORDER BY "posts"."is_pinned" DESC, "posts"."created_at" DESC, "posts"."id" DESC"#
        ),
        "{sql}"
    );
    assert!(sql.contains("LIMIT"), "{sql}");
}

#[tokio::test]
async fn test_list_for_privileged_roles_has_no_where_clause() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let query = PostQuery {
        visibility: Visibility::Everything,
        category_id: None,
        limit: 20,
        offset: 0,
    };
    assert!(repo.list(&query).await.unwrap().is_empty());

    let sql = logged_sql(repo);
    assert!(!sql.contains("WHERE"), "{sql}");
    assert!(sql.contains(r#"ORDER BY "posts"."is_pinned" DESC"#), "{sql}");
}

#[tokio::test]
async fn test_list_filters_by_category() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let query = PostQuery {
        visibility: Visibility::Everything,
        category_id: Some(4),
        limit: 10,
        offset: 10,
    };
    repo.list(&query).await.unwrap();

    let sql = logged_sql(repo);
    assert!(sql.contains(r#"WHERE "posts"."category_id" = $1"#), "{sql}");
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_went_away() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    assert!(BaseRepository::<Post, i64>::delete(&repo, 5).await.unwrap());
    assert!(!BaseRepository::<Post, i64>::delete(&repo, 5).await.unwrap());
}
