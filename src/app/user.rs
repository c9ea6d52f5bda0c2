use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{decode_payload, Action, SectionAction};
use crate::error::{ReduceError, StoreError};
use crate::store::Section;

/// Opaque user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identifier issued by the identity provider.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sign-in status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    pub logged_in: bool,
    pub user_id: Option<UserId>,
}

impl UserState {
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Sign-in completed. The identifier is absent for local-only sessions.
    Login { user_id: Option<UserId> },
    Logout,
}

impl Section for UserState {
    const NAME: &'static str = "user";
    type Action = UserAction;

    fn reduce(&self, action: UserAction) -> Result<Self, ReduceError> {
        match action {
            UserAction::Login { user_id } => Ok(Self {
                logged_in: true,
                user_id,
            }),
            UserAction::Logout => Ok(Self::default()),
        }
    }
}

impl Action for UserAction {
    fn section(&self) -> &'static str {
        UserState::NAME
    }

    fn operation(&self) -> &'static str {
        match self {
            UserAction::Login { .. } => "login",
            UserAction::Logout => "logout",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    user_id: Option<UserId>,
}

impl SectionAction for UserAction {
    const SECTION: &'static str = UserState::NAME;

    fn decode(operation: &str, payload: Option<Value>) -> Result<Self, StoreError> {
        match operation {
            "login" => {
                let payload: Option<LoginPayload> = decode_payload(Self::SECTION, operation, payload)?;
                Ok(UserAction::Login {
                    user_id: payload.and_then(|p| p.user_id),
                })
            }
            "logout" => Ok(UserAction::Logout),
            other => Err(Self::unknown_operation(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_then_logout() {
        let state = UserState::default()
            .reduce(UserAction::Login {
                user_id: Some(UserId::new("abc")),
            })
            .unwrap();
        assert!(state.is_logged_in());
        assert_eq!(state.user_id.as_ref().map(UserId::as_str), Some("abc"));

        let state = state.reduce(UserAction::Logout).unwrap();
        assert_eq!(state, UserState::default());
    }

    #[test]
    fn login_decodes_with_or_without_payload() {
        assert_eq!(
            UserAction::decode("login", None).unwrap(),
            UserAction::Login { user_id: None }
        );
        assert_eq!(
            UserAction::decode("login", Some(serde_json::json!({ "userId": "u-7" }))).unwrap(),
            UserAction::Login {
                user_id: Some(UserId::new("u-7"))
            }
        );
    }
}
