use anyhow::Context;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::onboarding::run_onboarding;
use super::view::{print_heading, render_grade, render_reality};
use crate::auth::{
    AuthContext, InMemoryProfileStore, PostgrestProfileStore, ProfileStore, Session,
};
use crate::cli::{Cli, Commands};
use crate::client::{FunctionClient, HttpFunctionGateway};
use crate::composer::GoalComposer;
use crate::config::Config;
use crate::error::ProvaResult;
use crate::functions::run_functions_server;
use crate::model::ProofType;

/// Gateway to the hosted backend, or to a local `prova serve` when no
/// backend URL is configured.
fn function_client(config: &Config) -> ProvaResult<FunctionClient> {
    let backend = &config.backend;
    let gateway = if backend.base_url().is_some() {
        HttpFunctionGateway::from_config(backend)?
    } else {
        let url = config.gateway.local_url();
        info!(%url, "backend.url not set; using the local functions server");
        HttpFunctionGateway::new(&url, backend.anon_key.as_deref(), backend.bearer_token())
    };
    Ok(FunctionClient::new(Arc::new(gateway)))
}

fn profile_store(config: &Config) -> ProvaResult<Arc<dyn ProfileStore>> {
    if config.backend.base_url().is_some() {
        Ok(Arc::new(PostgrestProfileStore::from_config(&config.backend)?))
    } else {
        warn!("backend.url not set; profiles are kept in memory only");
        Ok(Arc::new(InMemoryProfileStore::new()))
    }
}

async fn auth_context(config: &Config, user: Option<String>) -> ProvaResult<AuthContext> {
    let auth = AuthContext::new(profile_store(config)?);
    let token = config.backend.bearer_token().unwrap_or_default();
    let session = user.map(|user_id| Session::new(user_id, token));
    if let Err(e) = auth.restore(session).await {
        warn!("continuing without a profile: {e}");
    }
    Ok(auth)
}

struct GoalInput {
    goal: String,
    proofs: Vec<ProofType>,
    proof_description: Option<String>,
    user: Option<String>,
}

async fn run_goal(config: &Config, input: GoalInput, with_reality: bool) -> ProvaResult<()> {
    let auth = auth_context(config, input.user).await?;
    let composer = GoalComposer::new(
        function_client(config)?,
        config.composer.clone(),
        auth.grading_context(),
    );

    composer.set_goal_text(input.goal.as_str());
    let proofs: BTreeSet<ProofType> = input.proofs.into_iter().collect();
    for proof in proofs {
        composer.toggle_proof_type(proof);
    }
    if let Some(description) = input.proof_description {
        composer.set_proof_description(description);
    }
    composer.goal_blurred()?;
    composer.settle().await;

    print_heading(input.goal.trim());
    print!("{}", render_grade(&composer.draft()));

    if with_reality {
        composer.check_reality().await?;
        print_heading("Reality check");
        print!("{}", render_reality(&composer.draft()));
    }
    Ok(())
}

/// Run one CLI command. Subsystem failures keep their typed cause.
pub async fn dispatch(cli: Cli, config: Config) -> ProvaResult<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            run_functions_server(&host, port, &config)
                .await
                .context("functions server stopped")?;
            Ok(())
        }
        Commands::Grade {
            goal,
            proofs,
            proof_description,
            user,
        } => {
            let input = GoalInput {
                goal,
                proofs,
                proof_description,
                user,
            };
            run_goal(&config, input, false).await
        }
        Commands::Check { goal, proofs, user } => {
            let input = GoalInput {
                goal,
                proofs,
                proof_description: None,
                user,
            };
            run_goal(&config, input, true).await
        }
        Commands::Onboard { user } => {
            let auth = auth_context(&config, user).await?;
            run_onboarding(function_client(&config)?, &config.onboarding, &auth).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Route;
    use crate::composer::GuardRejection;
    use crate::error::ProvaError;

    #[tokio::test]
    async fn short_goal_surfaces_the_guard() {
        let input = GoalInput {
            goal: "gym".into(),
            proofs: Vec::new(),
            proof_description: None,
            user: None,
        };
        let err = run_goal(&Config::default(), input, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvaError::Guard(GuardRejection::GoalTooShort)));
    }

    #[tokio::test]
    async fn local_setup_signs_the_user_in_against_memory() {
        let auth = auth_context(&Config::default(), Some("u1".into()))
            .await
            .unwrap();
        assert_eq!(auth.user_id().as_deref(), Some("u1"));
        assert_eq!(auth.route(), Route::Onboarding);
    }

    #[tokio::test]
    async fn no_user_is_anonymous() {
        let auth = auth_context(&Config::default(), None).await.unwrap();
        assert_eq!(auth.route(), Route::Landing);
    }
}
