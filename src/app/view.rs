use crate::composer::GoalDraft;
use crate::model::{ExtractedProfile, ScoreBand, SmartDimension};
use crate::onboarding::ProfileField;
use console::{StyledObject, style};
use std::fmt::Write;

fn banded<D>(value: D, band: ScoreBand) -> StyledObject<D> {
    match band {
        ScoreBand::Strong => style(value).green(),
        ScoreBand::Fair => style(value).yellow(),
        ScoreBand::Weak => style(value).red(),
    }
}

pub fn print_bullet(text: &str) {
    println!("  {} {}", style("›").cyan(), text);
}

pub fn print_heading(title: &str) {
    println!();
    println!("  {}", style(title).white().bold());
    println!("  {}", style("─".repeat(50)).dim());
}

pub fn print_coach(text: &str) {
    println!("  {} {}", style("coach").cyan().bold(), text);
}

/// SMART breakdown, frequency chip and grading error for a draft.
pub fn render_grade(draft: &GoalDraft) -> String {
    let mut out = String::new();
    if let Some(frequency) = draft.frequency_chip() {
        let _ = writeln!(out, "  {} {}", style("⏱").cyan(), frequency);
    }
    if let Some(error) = &draft.grade_error {
        let _ = writeln!(out, "  {} {}", style("✗").red().bold(), error);
    }
    let Some(grade) = &draft.grade else {
        if draft.grade_error.is_none() {
            let _ = writeln!(out, "  {}", style("no grade yet").dim());
        }
        return out;
    };

    let _ = writeln!(
        out,
        "  SMART score {} {}",
        banded(format!("{}/100", grade.score), grade.band()).bold(),
        style(format!("({})", grade.band())).dim()
    );
    for dimension in SmartDimension::ALL {
        let score = grade.scores.get(dimension);
        let _ = writeln!(
            out,
            "    {} {:<11} {}",
            style(dimension.letter()).bold(),
            dimension.title(),
            banded(score, ScoreBand::of(score))
        );
    }
    for (dimension, tip) in grade.visible_tips() {
        let _ = writeln!(
            out,
            "  {} {}: {tip}",
            style("💡").yellow(),
            dimension.title()
        );
    }
    out
}

pub fn render_reality(draft: &GoalDraft) -> String {
    let mut out = String::new();
    if let Some(error) = &draft.reality_error {
        let _ = writeln!(out, "  {} {}", style("✗").red().bold(), error);
    }
    let Some(reality) = &draft.reality else {
        return out;
    };
    let _ = writeln!(
        out,
        "  Likelihood {}",
        banded(format!("{}%", reality.likelihood), ScoreBand::of(reality.likelihood)).bold()
    );
    for pitfall in &reality.pitfalls {
        let _ = writeln!(out, "  {} {pitfall}", style("⚠").yellow());
    }
    for suggestion in &reality.suggestions {
        let _ = writeln!(out, "  {} {suggestion}", style("→").green());
    }
    out
}

pub fn render_profile(profile: &ExtractedProfile) -> String {
    let mut out = String::new();
    for field in ProfileField::ALL {
        let _ = writeln!(
            out,
            "  {:<20} {}",
            style(field.label()).bold(),
            field.display(profile)
        );
    }
    out
}
