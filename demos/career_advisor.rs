//! Demonstration of the Career Advisor flow: sign in, edit the profile,
//! sync it, score careers and fetch recommendations.

use std::sync::Arc;

use compass::app::{
    split_list, AppState, Career, CareerAction, Profile, ProfileAction, ProfileUpdate, UserId,
};
use compass::boundary::{
    refresh_recommendations, sign_in, DocumentKey, IdentityProvider, MemoryDocumentStore,
    ProfileSync, RecommendationClient,
};
use compass::{BoundaryError, RawAction, Store, StoreConfig};
use serde_json::json;
use tracing_subscriber::EnvFilter;

struct AnonymousSignIn;

impl IdentityProvider for AnonymousSignIn {
    fn current_user(&self) -> Option<UserId> {
        Some(UserId::new("anon-42"))
    }
}

/// Stands in for the language model with a fixed answer.
struct OfflineAdvisor;

impl RecommendationClient for OfflineAdvisor {
    fn recommend(&self, profile: &Profile) -> Result<String, BoundaryError> {
        let answer = json!([
            {
                "career": "Product Designer",
                "description": format!("Builds on {}", profile.skills.join(", ")),
                "skillsToDevelop": ["Prototyping", "Accessibility", "Design Systems"]
            },
            {
                "career": "Data Analyst",
                "description": "Turns data into decisions.",
                "skillsToDevelop": ["SQL", "Statistics", "Dashboards"]
            }
        ]);
        Ok(answer.to_string())
    }
}

fn catalog() -> Vec<Career> {
    let career = |id, title: &str, description: &str, skills: &str| Career {
        id,
        title: title.to_string(),
        description: description.to_string(),
        required_skills: split_list(skills),
        match_percentage: 0,
    };
    vec![
        career(1, "UX/UI Designer", "Focuses on creating intuitive and user-friendly interfaces.", "Figma, Sketch, User Research, Prototyping, Wireframing"),
        career(2, "Data Scientist", "Analyzes and interprets complex digital data.", "Python, R, Machine Learning, SQL, Data Visualization"),
        career(3, "Frontend Developer", "Builds interactive and responsive web applications.", "JavaScript, React, HTML, CSS, TypeScript"),
        career(4, "Full Stack Engineer", "Works on both frontend and backend development.", "JavaScript, React, Node.js, Python, SQL, API Design"),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    println!("=== Career Advisor ===\n");

    let store = Store::with_config(AppState::default(), StoreConfig::default().with_name("advisor"));

    println!("1. Watching the dashboard");
    let _dashboard = store.subscribe({
        let store = store.clone();
        move || {
            let state = store.get();
            println!(
                "   [Update] logged in: {}, skills: {}, recommendations: {}",
                state.user.is_logged_in(),
                state.profile.profile.skills.len(),
                state.career.recommendations.len()
            );
        }
    });
    let skill_count = store.select(|state: &AppState| state.profile.profile.skills.len());

    println!("\n2. Signing in");
    let user_id = sign_in(&store, &AnonymousSignIn)?;

    println!("\n3. Binding the profile document");
    let documents = Arc::new(MemoryDocumentStore::new());
    let sync = ProfileSync::bind(&store, documents.clone(), DocumentKey::profile(user_id))?;

    println!("\n4. Editing the profile");
    store.dispatch(
        ProfileAction::SetProfile(ProfileUpdate {
            name: Some("Irfan Khan".to_string()),
            skills: Some(split_list("Figma, Python, User Research, JavaScript")),
            interests: Some(split_list("Technology, Design, Data, Development")),
            ..ProfileUpdate::default()
        })
        .into(),
    )?;
    store.dispatch_raw(RawAction::with_payload("profile/toggleSkill", json!({ "skill": "SQL" })))?;
    println!("   Selected skills: {}", skill_count.get());

    println!("\n5. Saving the profile");
    sync.save(&store)?;

    println!("\n6. Scoring careers");
    store.dispatch(CareerAction::SetCareers(catalog()).into())?;
    let skills = store.get().profile.profile.skills.clone();
    store.dispatch(CareerAction::ScoreCareers { skills }.into())?;
    for career in store.get().career.ranked() {
        println!("   {:>3}%  {}", career.match_percentage, career.title);
    }
    println!("   Skills to learn: {}", store.get().skills_gap().join(", "));

    println!("\n7. Asking for recommendations");
    refresh_recommendations(&store, &OfflineAdvisor)?;
    for recommendation in &store.get().career.recommendations {
        println!(
            "   {}: develop {}",
            recommendation.career,
            recommendation.skills_to_develop.join(", ")
        );
    }

    println!("\n8. A typo in an action kind");
    if let Err(err) = store.dispatch_raw(RawAction::new("ghost/doThing")) {
        println!("   Rejected: {err}");
    }

    println!("\nDone.");
    Ok(())
}
