#[cfg(test)]
mod tests {
    use crate::database::entity::{account, comment, post};
    use crate::database::postgres_repo::{
        PostgresAccountRepository, PostgresCommentRepository, PostgresPostRepository,
    };
    use fabula_core::domain::{Account, Comment, Post};
    use fabula_core::error::RepoError;
    use fabula_core::ports::{AccountRepository, BaseRepository, CommentRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: uuid::Uuid, author_id: uuid::Uuid) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            title: "Scheduled piece".to_owned(),
            text: "Body".to_owned(),
            image_ref: None,
            pub_date: now.into(),
            is_published: true,
            author_id,
            category_id: None,
            location_id: None,
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, author_id)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.title, "Scheduled piece");
        assert_eq!(post.id, post_id);
        assert_eq!(post.author_id, author_id);
    }

    #[tokio::test]
    async fn test_find_account_by_username() {
        let account_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![account::Model {
                id: account_id,
                username: "writer".to_owned(),
                first_name: "".to_owned(),
                last_name: "".to_owned(),
                email: "writer@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                is_staff: false,
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresAccountRepository::new(db);

        let result: Option<Account> = repo.find_by_username("writer").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, account_id);
    }

    #[tokio::test]
    async fn test_list_comments_for_post() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                comment::Model {
                    id: uuid::Uuid::new_v4(),
                    text: "first".to_owned(),
                    author_id,
                    post_id,
                    created_at: now.into(),
                },
                comment::Model {
                    id: uuid::Uuid::new_v4(),
                    text: "second".to_owned(),
                    author_id,
                    post_id,
                    created_at: now.into(),
                },
            ]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let result: Vec<Comment> = repo.list_for_post(post_id).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|c| c.post_id == post_id));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Result<(), RepoError> =
            BaseRepository::<Post, uuid::Uuid>::delete(&repo, uuid::Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
