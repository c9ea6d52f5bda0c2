//! Career Advisor application state.
//!
//! Three sections make up the state: `user` (sign-in status), `profile`
//! (what the user told us) and `career` (the career catalog with match
//! scores, plus recommendations from the language model).

mod career;
mod profile;
mod user;

pub use career::{Career, CareerAction, CareerState, Recommendation};
pub use profile::{split_list, Profile, ProfileAction, ProfileState, ProfileUpdate};
pub use user::{UserAction, UserId, UserState};

use std::sync::Arc;

use crate::action::{Action, FromRawAction, RawAction, SectionAction};
use crate::error::{ReduceError, StoreError};
use crate::store::{reduce_section, Section, State, Store};

/// A store holding the Career Advisor state.
pub type AppStore = Store<AppState>;

/// The composed snapshot. Each section sits behind its own `Arc` so a
/// dispatch only reallocates the section it targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub user: Arc<UserState>,
    pub profile: Arc<ProfileState>,
    pub career: Arc<CareerState>,
}

impl AppState {
    /// Compose a snapshot from section values.
    pub fn new(user: UserState, profile: ProfileState, career: CareerState) -> Self {
        Self {
            user: Arc::new(user),
            profile: Arc::new(profile),
            career: Arc::new(career),
        }
    }

    /// Skills required by any career in the catalog that the profile lacks.
    ///
    /// Each skill appears once, in the order the catalog first mentions it.
    pub fn skills_gap(&self) -> Vec<String> {
        let have = &self.profile.profile.skills;
        let mut gap: Vec<String> = Vec::new();
        for skill in self.career.careers.iter().flat_map(|c| &c.required_skills) {
            if !have.contains(skill) && !gap.contains(skill) {
                gap.push(skill.clone());
            }
        }
        gap
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    User(UserAction),
    Profile(ProfileAction),
    Career(CareerAction),
}

impl State for AppState {
    type Action = AppAction;

    fn apply(&self, action: AppAction) -> Result<Self, ReduceError> {
        Ok(match action {
            AppAction::User(action) => Self {
                user: reduce_section(&self.user, action)?,
                ..self.clone()
            },
            AppAction::Profile(action) => Self {
                profile: reduce_section(&self.profile, action)?,
                ..self.clone()
            },
            AppAction::Career(action) => Self {
                career: reduce_section(&self.career, action)?,
                ..self.clone()
            },
        })
    }
}

impl Action for AppAction {
    fn section(&self) -> &'static str {
        match self {
            AppAction::User(action) => action.section(),
            AppAction::Profile(action) => action.section(),
            AppAction::Career(action) => action.section(),
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            AppAction::User(action) => action.operation(),
            AppAction::Profile(action) => action.operation(),
            AppAction::Career(action) => action.operation(),
        }
    }
}

impl FromRawAction for AppAction {
    fn from_raw(raw: RawAction) -> Result<Self, StoreError> {
        let (section, operation) = raw.split()?;
        let (section, operation) = (section.to_string(), operation.to_string());
        let payload = raw.payload;
        match section.as_str() {
            UserState::NAME => UserAction::decode(&operation, payload).map(AppAction::User),
            ProfileState::NAME => {
                ProfileAction::decode(&operation, payload).map(AppAction::Profile)
            }
            CareerState::NAME => CareerAction::decode(&operation, payload).map(AppAction::Career),
            _ => Err(StoreError::UnknownSection(section)),
        }
    }
}

impl From<UserAction> for AppAction {
    fn from(action: UserAction) -> Self {
        AppAction::User(action)
    }
}

impl From<ProfileAction> for AppAction {
    fn from(action: ProfileAction) -> Self {
        AppAction::Profile(action)
    }
}

impl From<CareerAction> for AppAction {
    fn from(action: CareerAction) -> Self {
        AppAction::Career(action)
    }
}
