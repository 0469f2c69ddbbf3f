use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::view::{print_bullet, print_coach, print_heading, render_profile};
use crate::auth::{AuthContext, Route};
use crate::client::FunctionClient;
use crate::config::OnboardingConfig;
use crate::onboarding::{OnboardingPhase, OnboardingSession, ProfileField, TurnOutcome};

const QUIT: &str = "/quit";

const SUMMARY_OPTIONS: [&str; 4] = [
    "Looks good, save it",
    "Edit a field",
    "Add more detail",
    "Quit without saving",
];

/// Terminal prompts block on stdin, so they run off the async workers.
async fn ask<T, F>(prompt: F) -> Result<T>
where
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(prompt).await??)
}

async fn prompt_line(prompt: &'static str) -> Result<String> {
    ask(move || {
        Input::<String>::new()
            .with_prompt(format!("  {prompt}"))
            .allow_empty(true)
            .interact_text()
    })
    .await
}

async fn choose(prompt: &'static str, items: Vec<&'static str>) -> Result<usize> {
    ask(move || {
        Select::new()
            .with_prompt(format!("  {prompt}"))
            .items(&items)
            .default(0)
            .interact()
    })
    .await
}

async fn chat(session: &mut OnboardingSession) -> Result<bool> {
    while session.phase() == OnboardingPhase::Chat {
        let line = prompt_line("you").await?;
        if line.trim() == QUIT {
            return Ok(false);
        }
        if line.trim().is_empty() {
            continue;
        }

        let turn = session.begin_send(&line)?;
        if session.is_typing() {
            println!("  {}", style("coach is typing…").dim());
        }
        let reply = turn.reply().await;
        match session.complete(turn, reply) {
            TurnOutcome::Reply(text) | TurnOutcome::Closing(text) => print_coach(&text),
            TurnOutcome::Failed(_) => {
                if let Some(entry) = session.transcript().last() {
                    print_coach(&entry.text);
                }
            }
            TurnOutcome::ProfileUpdated | TurnOutcome::FollowUp(_) => {}
        }
    }
    Ok(true)
}

async fn edit_field(session: &mut OnboardingSession) -> Result<()> {
    let labels = ProfileField::ALL.iter().map(|f| f.label()).collect();
    let field = ProfileField::ALL[choose("Which field?", labels).await?];
    let current = session
        .profile()
        .map(|p| field.edit_text(p))
        .unwrap_or_default();
    let value = ask(move || {
        Input::<String>::new()
            .with_prompt(format!("  {}", field.label()))
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
    })
    .await?;
    if !session.edit_field(field, &value)? {
        print_bullet(&format!("{} ignored: expected a number", style("→").dim()));
    }
    Ok(())
}

async fn refine(session: &mut OnboardingSession) -> Result<()> {
    let line = prompt_line("add detail").await?;
    if line.trim().is_empty() {
        return Ok(());
    }
    let turn = session.begin_refine(&line)?;
    let reply = turn.reply().await;
    match session.complete(turn, reply) {
        TurnOutcome::ProfileUpdated => {
            println!("  {} profile updated", style("✓").green().bold());
        }
        TurnOutcome::FollowUp(question) => print_coach(&question),
        TurnOutcome::Failed(e) => {
            println!("  {} {e}", style("✗").red().bold());
        }
        TurnOutcome::Reply(_) | TurnOutcome::Closing(_) => {}
    }
    Ok(())
}

/// Interactive onboarding in the terminal. Returns once the profile is
/// saved or the user quits.
pub async fn run_onboarding(
    client: FunctionClient,
    config: &OnboardingConfig,
    auth: &AuthContext,
) -> Result<()> {
    if auth.route() == Route::Goals {
        let redo = ask(|| {
            Confirm::new()
                .with_prompt("  You're already onboarded. Start over?")
                .default(false)
                .interact()
        })
        .await?;
        if !redo {
            return Ok(());
        }
    }

    print_heading("Let's get to know you");
    if let Some(session) = auth.session() {
        print_bullet(&format!("signed in as {}", style(session.display_name()).cyan()));
    }
    print_bullet(&format!("type {} to leave", style(QUIT).cyan()));
    println!();

    let mut session = OnboardingSession::open(client, config.clone()).await;
    if let Some(entry) = session.transcript().last() {
        print_coach(&entry.text);
    }

    if !chat(&mut session).await? {
        return Ok(());
    }
    session.settle().await;

    loop {
        print_heading("Here's what I got");
        if let Some(profile) = session.profile() {
            print!("{}", render_profile(profile));
        }
        if let Some(question) = session.pending_follow_up() {
            print_coach(question);
        }
        println!();

        match choose("Next", SUMMARY_OPTIONS.to_vec()).await? {
            0 => {
                if auth.user_id().is_none() {
                    print_bullet("not signed in: pass --user <id> to save the profile");
                    return Ok(());
                }
                match session.confirm(auth).await {
                    Ok(record) => {
                        println!(
                            "  {} saved profile for {}",
                            style("✓").green().bold(),
                            style(&record.user_id).green()
                        );
                        return Ok(());
                    }
                    Err(e) => println!("  {} {e}", style("✗").red().bold()),
                }
            }
            1 => edit_field(&mut session).await?,
            2 => refine(&mut session).await?,
            _ => return Ok(()),
        }
    }
}
