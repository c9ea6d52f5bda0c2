use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{decode_payload, Action, SectionAction};
use crate::error::{ReduceError, StoreError};
use crate::store::Section;

/// What the user has told us about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub education: String,
    pub experience: String,
    pub aspirations: String,
}

impl Profile {
    /// Recommendations need at least one skill and one interest.
    pub fn is_ready_for_recommendations(&self) -> bool {
        !self.skills.is_empty() && !self.interests.is_empty()
    }
}

/// A partial profile. Present fields replace the current ones, absent fields
/// are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspirations: Option<String>,
}

impl ProfileUpdate {
    /// The profile that results from applying this update over `current`.
    /// List fields are trimmed and blank entries dropped.
    pub fn merge_into(self, current: &Profile) -> Profile {
        Profile {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            skills: self
                .skills
                .map(normalize_list)
                .unwrap_or_else(|| current.skills.clone()),
            interests: self
                .interests
                .map(normalize_list)
                .unwrap_or_else(|| current.interests.clone()),
            education: self.education.unwrap_or_else(|| current.education.clone()),
            experience: self.experience.unwrap_or_else(|| current.experience.clone()),
            aspirations: self.aspirations.unwrap_or_else(|| current.aspirations.clone()),
        }
    }
}

impl From<Profile> for ProfileUpdate {
    fn from(profile: Profile) -> Self {
        Self {
            name: Some(profile.name),
            skills: Some(profile.skills),
            interests: Some(profile.interests),
            education: Some(profile.education),
            experience: Some(profile.experience),
            aspirations: Some(profile.aspirations),
        }
    }
}

/// Split a comma-separated form field into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    normalize_list(input.split(',').map(str::to_string).collect())
}

fn normalize_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    SetProfile(ProfileUpdate),
    /// Add the skill if the profile lacks it, remove it otherwise.
    ToggleSkill(String),
    Clear,
}

impl Section for ProfileState {
    const NAME: &'static str = "profile";
    type Action = ProfileAction;

    fn reduce(&self, action: ProfileAction) -> Result<Self, ReduceError> {
        let profile = match action {
            ProfileAction::SetProfile(update) => update.merge_into(&self.profile),
            ProfileAction::ToggleSkill(skill) => {
                let skill = skill.trim();
                if skill.is_empty() {
                    return Err(ReduceError::new(Self::NAME, "skill name is blank"));
                }
                let mut profile = self.profile.clone();
                match profile.skills.iter().position(|s| s == skill) {
                    Some(pos) => {
                        profile.skills.remove(pos);
                    }
                    None => profile.skills.push(skill.to_string()),
                }
                profile
            }
            ProfileAction::Clear => Profile::default(),
        };
        Ok(Self { profile })
    }
}

impl Action for ProfileAction {
    fn section(&self) -> &'static str {
        ProfileState::NAME
    }

    fn operation(&self) -> &'static str {
        match self {
            ProfileAction::SetProfile(_) => "setProfile",
            ProfileAction::ToggleSkill(_) => "toggleSkill",
            ProfileAction::Clear => "clear",
        }
    }
}

#[derive(Deserialize)]
struct ToggleSkillPayload {
    skill: String,
}

impl SectionAction for ProfileAction {
    const SECTION: &'static str = ProfileState::NAME;

    fn decode(operation: &str, payload: Option<Value>) -> Result<Self, StoreError> {
        match operation {
            "setProfile" => Ok(ProfileAction::SetProfile(decode_payload(
                Self::SECTION,
                operation,
                payload,
            )?)),
            "toggleSkill" => {
                let payload: ToggleSkillPayload = decode_payload(Self::SECTION, operation, payload)?;
                Ok(ProfileAction::ToggleSkill(payload.skill))
            }
            "clear" => Ok(ProfileAction::Clear),
            other => Err(Self::unknown_operation(other)),
        }
    }
}
