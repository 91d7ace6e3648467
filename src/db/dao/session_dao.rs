use chrono::{Duration, Utc};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, EntityDao};
use crate::db::entities::session::{self, Entity as Session};

const SESSION_TOKEN_LEN: usize = 48;

pub type SessionDao = EntityDao<Session>;

pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

impl EntityDao<Session> {
    pub async fn open_session(&self, user_id: &Uuid, ttl_hours: i64) -> DaoResult<session::Model> {
        let expires_at = Utc::now().fixed_offset() + Duration::hours(ttl_hours);
        let model = session::ActiveModel {
            token: Set(generate_session_token()),
            user_id: Set(*user_id),
            expires_at: Set(expires_at),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Live session for `token`; expired rows are treated as absent.
    pub async fn find_live(&self, token: &str) -> DaoResult<Option<session::Model>> {
        let token = token.to_string();
        let now = Utc::now().fixed_offset();
        self.find_one(move |query| {
            query
                .filter(session::Column::Token.eq(token))
                .filter(session::Column::ExpiresAt.gt(now))
        })
        .await
    }

    pub async fn close_session(&self, token: &str) -> DaoResult<u64> {
        let result = Session::delete_many()
            .filter(session::Column::Token.eq(token))
            .exec(self.db())
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn purge_expired(&self) -> DaoResult<u64> {
        let result = Session::delete_many()
            .filter(session::Column::ExpiresAt.lte(Utc::now().fixed_offset()))
            .exec(self.db())
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{SESSION_TOKEN_LEN, SessionDao, generate_session_token};
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::session;

    fn session_model(token: &str, user_id: Uuid) -> session::Model {
        let now = Utc::now().fixed_offset();
        session::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            token: token.to_string(),
            user_id,
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn generated_tokens_are_alphanumeric_and_distinct() {
        let first = generate_session_token();
        let second = generate_session_token();
        assert_eq!(first.len(), SESSION_TOKEN_LEN);
        assert!(first.chars().all(|ch| ch.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn open_session_returns_inserted_row() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[session_model("tok", user_id)]])
            .into_connection();
        let dao = SessionDao::new(&db);

        let session = dao
            .open_session(&user_id, 24)
            .await
            .expect("session should open");
        assert_eq!(session.user_id, user_id);
    }

    #[tokio::test]
    async fn find_live_returns_none_for_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<session::Model>::new()])
            .into_connection();
        let dao = SessionDao::new(&db);

        let found = dao.find_live("nope").await.expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn close_session_reports_rows_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = SessionDao::new(&db);

        assert_eq!(dao.close_session("tok").await.expect("delete ok"), 1);
    }

    #[tokio::test]
    async fn purge_expired_surfaces_db_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("locked".to_string())])
            .into_connection();
        let dao = SessionDao::new(&db);

        let err = dao.purge_expired().await.expect_err("purge should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
