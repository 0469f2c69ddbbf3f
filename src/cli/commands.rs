use crate::model::ProofType;
use clap::{Parser, Subcommand};

/// `prova` - goal coaching backend and terminal client.
#[derive(Parser, Debug)]
#[command(name = "prova")]
#[command(version)]
#[command(about = "Set goals worth keeping: SMART grading, reality checks and onboarding.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the functions server (smart-grade, goal-parse, reality-check, onboarding-chat)
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Grade a goal on SMART criteria
    Grade {
        /// The goal, in your own words
        goal: String,

        /// Proof you will post (photo, video, screenshot, text, voice)
        #[arg(long = "proof", value_parser = parse_proof)]
        proofs: Vec<ProofType>,

        /// What the proof will show
        #[arg(long)]
        proof_description: Option<String>,

        /// Judge relevance against this user's onboarding profile
        #[arg(long)]
        user: Option<String>,
    },

    /// Grade a goal, then estimate how likely you are to follow through
    Check {
        /// The goal, in your own words
        goal: String,

        /// Proof you will post (at least one)
        #[arg(long = "proof", value_parser = parse_proof, required = true)]
        proofs: Vec<ProofType>,

        /// Judge relevance against this user's onboarding profile
        #[arg(long)]
        user: Option<String>,
    },

    /// Talk through your goals with the onboarding coach
    Onboard {
        /// Save the profile for this user id
        #[arg(long)]
        user: Option<String>,
    },
}

fn parse_proof(raw: &str) -> Result<ProofType, String> {
    ProofType::parse_lenient(raw).ok_or_else(|| {
        format!("unknown proof type '{raw}' (expected photo, video, screenshot, text or voice)")
    })
}
