use sea_orm::{ColumnTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, EntityDao};
use crate::auth::Role;
use crate::db::entities::user;

pub type UserDao = EntityDao<user::Entity>;

/// Account lookups keyed by the lowercased email the login form submits.
impl EntityDao<user::Entity> {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.trim().to_lowercase();
        self.find_one(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            last_login_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_last_login(
        &self,
        id: &Uuid,
        at: &chrono::DateTime<chrono::FixedOffset>,
    ) -> DaoResult<()> {
        let at = *at;
        self.update(*id, move |active| {
            active.last_login_at = Set(Some(at));
        })
        .await
        .map(|_| ())
    }
}
