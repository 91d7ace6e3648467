use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

pub const ROLE_NAMES: &[&str] = &["admin", "editor"];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            _ => Err(()),
        }
    }
}

/// Signed envelope around a session row's token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub sid: String,
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// The signed-in account behind a live session.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip)]
    pub session_token: String,
}

impl CurrentUser {
    pub fn is(&self, id: &Uuid) -> bool {
        self.id == *id
    }
}

#[cfg(test)]
mod tests {
    use super::{ROLE_NAMES, Role};

    #[test]
    fn role_names_round_trip() {
        for name in ROLE_NAMES {
            let role = Role::try_from(*name).expect("listed role should parse");
            assert_eq!(role.as_str(), *name);
        }
        assert!(Role::try_from("owner").is_err());
    }
}
