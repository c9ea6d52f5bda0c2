use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{decode_payload, Action, SectionAction};
use crate::error::{ReduceError, StoreError};
use crate::store::Section;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub match_percentage: u8,
}

impl Career {
    /// Share of this career's required skills found in `skills`, rounded to
    /// the nearest percent. `None` when the career lists no required skills.
    pub fn match_percentage_for(&self, skills: &[String]) -> Option<u8> {
        if self.required_skills.is_empty() {
            return None;
        }
        let matching = self
            .required_skills
            .iter()
            .filter(|required| skills.contains(required))
            .count();
        let percent = (matching as f64 / self.required_skills.len() as f64 * 100.0).round();
        Some(percent as u8)
    }
}

/// One entry of the recommendation endpoint's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub career: String,
    pub description: String,
    #[serde(default)]
    pub skills_to_develop: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CareerState {
    pub careers: Vec<Career>,
    pub recommendations: Vec<Recommendation>,
}

impl CareerState {
    /// Careers ordered by match percentage, best first. Ties keep catalog order.
    pub fn ranked(&self) -> Vec<&Career> {
        let mut ranked: Vec<&Career> = self.careers.iter().collect();
        ranked.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareerAction {
    SetCareers(Vec<Career>),
    /// Recompute every career's match percentage against these skills.
    ScoreCareers { skills: Vec<String> },
    SetRecommendations(Vec<Recommendation>),
    ClearRecommendations,
}

impl Section for CareerState {
    const NAME: &'static str = "career";
    type Action = CareerAction;

    fn reduce(&self, action: CareerAction) -> Result<Self, ReduceError> {
        match action {
            CareerAction::SetCareers(careers) => Ok(Self {
                careers,
                recommendations: self.recommendations.clone(),
            }),
            CareerAction::ScoreCareers { skills } => {
                let careers = self
                    .careers
                    .iter()
                    .map(|career| -> Result<Career, ReduceError> {
                        let match_percentage = career.match_percentage_for(&skills).ok_or_else(|| {
                            ReduceError::new(
                                Self::NAME,
                                format!("career {} lists no required skills", career.id),
                            )
                        })?;
                        Ok(Career {
                            match_percentage,
                            ..career.clone()
                        })
                    })
                    .collect::<Result<Vec<_>, ReduceError>>()?;
                Ok(Self {
                    careers,
                    recommendations: self.recommendations.clone(),
                })
            }
            CareerAction::SetRecommendations(recommendations) => Ok(Self {
                careers: self.careers.clone(),
                recommendations,
            }),
            CareerAction::ClearRecommendations => Ok(Self {
                careers: self.careers.clone(),
                recommendations: Vec::new(),
            }),
        }
    }
}

impl Action for CareerAction {
    fn section(&self) -> &'static str {
        CareerState::NAME
    }

    fn operation(&self) -> &'static str {
        match self {
            CareerAction::SetCareers(_) => "setCareers",
            CareerAction::ScoreCareers { .. } => "scoreCareers",
            CareerAction::SetRecommendations(_) => "setRecommendations",
            CareerAction::ClearRecommendations => "clearRecommendations",
        }
    }
}

#[derive(Deserialize)]
struct ScorePayload {
    skills: Vec<String>,
}

impl SectionAction for CareerAction {
    const SECTION: &'static str = CareerState::NAME;

    fn decode(operation: &str, payload: Option<Value>) -> Result<Self, StoreError> {
        match operation {
            "setCareers" => Ok(CareerAction::SetCareers(decode_payload(
                Self::SECTION,
                operation,
                payload,
            )?)),
            "scoreCareers" => {
                let payload: ScorePayload = decode_payload(Self::SECTION, operation, payload)?;
                Ok(CareerAction::ScoreCareers {
                    skills: payload.skills,
                })
            }
            "setRecommendations" => Ok(CareerAction::SetRecommendations(decode_payload(
                Self::SECTION,
                operation,
                payload,
            )?)),
            "clearRecommendations" => Ok(CareerAction::ClearRecommendations),
            other => Err(Self::unknown_operation(other)),
        }
    }
}
