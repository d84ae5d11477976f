use serde::{Deserialize, Serialize};
use uuid::Uuid;

const OFFLINE_ACCESS_TOKEN: &str = "access_token";

/// Player identity handed to the game. Acquiring and refreshing it is the
/// job of the authentication collaborator; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub uuid: String,
    pub access_token: String,
    #[serde(default)]
    pub xuid: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl Session {
    /// Session for offline play with a fresh random uuid.
    pub fn offline(username: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            uuid: Uuid::new_v4().simple().to_string(),
            access_token: OFFLINE_ACCESS_TOKEN.into(),
            xuid: None,
            user_type: Some("legacy".into()),
        }
    }

    pub fn sanitized(mut self) -> Self {
        if self.username.trim().is_empty() {
            self.username = "Player".into();
        }
        if self.uuid.trim().is_empty() {
            self.uuid = Uuid::new_v4().simple().to_string();
        }
        if self.access_token.trim().is_empty() {
            self.access_token = OFFLINE_ACCESS_TOKEN.into();
        }
        self.xuid = self.xuid.filter(|xuid| !xuid.trim().is_empty());
        self.user_type = self.user_type.filter(|kind| !kind.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_sessions_get_distinct_simple_uuids() {
        let a = Session::offline(" Alex ");
        let b = Session::offline("Alex");
        assert_eq!(a.username, "Alex");
        assert_eq!(a.uuid.len(), 32);
        assert!(!a.uuid.contains('-'));
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn sanitized_fills_blank_fields() {
        let session = Session {
            username: "  ".into(),
            uuid: String::new(),
            access_token: String::new(),
            xuid: Some(" ".into()),
            user_type: Some(String::new()),
        }
        .sanitized();

        assert_eq!(session.username, "Player");
        assert_eq!(session.access_token, "access_token");
        assert!(!session.uuid.is_empty());
        assert_eq!(session.xuid, None);
        assert_eq!(session.user_type, None);
    }
}
