use crate::app::{AppStore, CareerAction, Profile, Recommendation};
use crate::error::BoundaryError;

/// The generative-language endpoint: one request, one response.
pub trait RecommendationClient: Send + Sync {
    /// Send the profile and return the raw response text, which should be a
    /// JSON array of recommendations.
    fn recommend(&self, profile: &Profile) -> Result<String, BoundaryError>;
}

/// Parse the endpoint's answer: a JSON array of
/// `{ "career", "description", "skillsToDevelop" }` objects.
pub fn parse_recommendations(text: &str) -> Result<Vec<Recommendation>, BoundaryError> {
    Ok(serde_json::from_str(text.trim())?)
}

/// Ask `client` for recommendations for the store's current profile and
/// dispatch them into the `career` section.
///
/// Incomplete profiles are refused before the client is called. A malformed
/// response leaves the previous recommendations in place.
pub fn refresh_recommendations<C>(store: &AppStore, client: &C) -> Result<usize, BoundaryError>
where
    C: RecommendationClient + ?Sized,
{
    let snapshot = store.get();
    let profile = &snapshot.profile.profile;
    if !profile.is_ready_for_recommendations() {
        return Err(BoundaryError::IncompleteProfile);
    }

    let text = client.recommend(profile)?;
    let recommendations = parse_recommendations(&text).inspect_err(|err| {
        tracing::warn!(error = %err, "discarding recommendation response");
    })?;
    let count = recommendations.len();
    store.dispatch(CareerAction::SetRecommendations(recommendations).into())?;
    tracing::info!(count, "recommendations refreshed");
    Ok(count)
}
