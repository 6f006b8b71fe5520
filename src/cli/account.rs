//! Session subcommands: login, register, logout, whoami and route.

use std::error::Error;

use crate::core::router::{resolve_path, RouteDecision};
use crate::core::session::{SessionController, SessionState};
use crate::utils::prompt::{prompt_line, prompt_password};

pub async fn login(session: &SessionController, email: &str) -> Result<(), Box<dyn Error>> {
    let password = prompt_password("Password: ")?;
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }
    println!("Signing in…");
    if !session.login(email, &password).await {
        return Err("Invalid email or password".into());
    }
    println!("✅ {}", whoami_report(&session.state()));
    Ok(())
}

pub async fn register(
    session: &SessionController,
    email: &str,
    full_name: &str,
) -> Result<(), Box<dyn Error>> {
    let full_name = match full_name.trim() {
        "" => prompt_line("Full name: ")?.trim().to_string(),
        name => name.to_string(),
    };
    if full_name.is_empty() {
        return Err("Full name cannot be empty".into());
    }
    let password = prompt_password("Password: ")?;
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }
    let confirm = prompt_password("Confirm password: ")?;
    if confirm != password {
        return Err("Passwords do not match".into());
    }
    println!("Creating your account…");
    if !session.register(email, &password, &full_name).await {
        return Err("Registration failed. Please try again.".into());
    }
    println!("✅ {}", whoami_report(&session.state()));
    Ok(())
}

pub fn logout(session: &SessionController) -> Result<(), Box<dyn Error>> {
    session.logout();
    println!("✅ Signed out");
    Ok(())
}

pub async fn whoami(session: &SessionController) -> Result<(), Box<dyn Error>> {
    let state = session.bootstrap().await;
    println!("{}", whoami_report(&state));
    Ok(())
}

pub async fn route(session: &SessionController, path: &str) -> Result<(), Box<dyn Error>> {
    let state = session.bootstrap().await;
    println!("{}", route_report(&state, path));
    Ok(())
}

fn whoami_report(state: &SessionState) -> String {
    match state.user() {
        Some(user) => {
            let onboarding = if user.personality_test_completed {
                "onboarding complete"
            } else {
                "onboarding pending"
            };
            format!("Signed in as {} <{}> ({onboarding})", user.full_name, user.email)
        }
        None => "Not signed in".to_string(),
    }
}

fn route_report(state: &SessionState, path: &str) -> String {
    match resolve_path(state, path) {
        RouteDecision::Loading => "Session still loading".to_string(),
        RouteDecision::Render(route) => format!("{path} renders {route}"),
        RouteDecision::Redirect(route) => format!("{path} redirects to {route}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CurrentUser;

    fn user(onboarded: bool) -> SessionState {
        SessionState::Authenticated(CurrentUser {
            id: "u1".into(),
            email: "ada@example.com".into(),
            full_name: "Ada Byron".into(),
            personality_test_completed: onboarded,
            is_active: Some(true),
            created_at: None,
            spiritual_level: Some(72),
            profile_picture: None,
        })
    }

    #[test]
    fn whoami_describes_the_session() {
        assert_eq!(whoami_report(&SessionState::Anonymous), "Not signed in");
        assert_eq!(
            whoami_report(&user(false)),
            "Signed in as Ada Byron <ada@example.com> (onboarding pending)"
        );
    }

    #[test]
    fn route_report_shows_redirects() {
        assert_eq!(
            route_report(&SessionState::Anonymous, "/chat"),
            "/chat redirects to /auth"
        );
        assert_eq!(
            route_report(&user(true), "/podcasts"),
            "/podcasts renders /lessons"
        );
        assert_eq!(
            route_report(&user(false), "/dashboard"),
            "/dashboard redirects to /onboarding"
        );
    }
}
