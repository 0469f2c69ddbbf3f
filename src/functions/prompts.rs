use crate::model::{ProofType, RealityCheckRequest, SmartGradeRequest};
use std::fmt::Write;

pub const ONBOARDING_COACH_PROMPT: &str = r#"You are the onboarding coach for Prova, a goal accountability app. Your job: have a warm, smart, natural conversation to understand the user before they start setting goals.

You need to learn (but don't ask in order, let the conversation flow naturally):
• Which areas of life they want to improve (health, career, relationships, learning, finances, creativity, etc.)
• Their vision for success in the next 6-12 months
• Their core values, what matters most to them
• What's blocking or slowing them down right now
• How much time per week they can realistically dedicate to new habits

Conversation rules:
- Keep every message SHORT, 1-3 sentences max. Never lecture.
- Ask only ONE question at a time.
- Genuinely react to what they said before moving on. Show you heard them.
- Be direct, warm, and real. Like a smart friend who's also a coach.
- Adapt dynamically. If their answer already covers the next topic, skip that question.
- Don't list topics, don't say "I need to ask you about X". Just have the conversation.
- After 5-8 meaningful exchanges (when you feel you understand them), wrap up.
- If the user adds more detail AFTER the profile was shown (refinement), update the profile accordingly and return type "done" immediately with the refreshed profile.

ALWAYS respond with valid JSON, two formats only:

Regular turn (still gathering info):
{"type":"message","text":"<your 1-3 sentence response ending with one question>"}

Final turn (you have enough to build their profile, OR user is refining after seeing the summary):
{"type":"done","text":"<short warm closing, e.g. 'Love it. Give me a second to put this together…'>","profile":{"lifeAreas":["<area>","<area>"],"direction":"<1-2 sentence vision summary>","values":"<1 sentence on core values>","blockers":"<1 sentence on main obstacles>","weeklyHours":<integer>}}

Rules for the profile:
- lifeAreas: 1-5 short strings (e.g. "health", "career", "relationships")
- direction: what they're working toward in 6-12 months
- values: their core principles in one sentence
- blockers: their main obstacle in one sentence
- weeklyHours: realistic integer hours/week for new habits

No text outside the JSON. Ever."#;

pub const ONBOARDING_OPENING_PROMPT: &str = r#"The user just opened onboarding. Start the conversation with a warm greeting and your first question. Respond with JSON: {"type":"message","text":"<greeting + question>"}"#;

fn proof_list(proof_types: &[ProofType]) -> String {
    if proof_types.is_empty() {
        return "none selected".into();
    }
    proof_types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn smart_grade_prompt(request: &SmartGradeRequest) -> String {
    let mut prompt = String::from(
        "Evaluate this goal on SMART criteria (Specific, Measurable, Achievable, Relevant, Time-bound).\n\n",
    );
    let _ = writeln!(prompt, "Goal: \"{}\"", request.goal_text.trim());
    let _ = writeln!(prompt, "Proof type: {}", proof_list(&request.proof_types));
    let description = request.proof_description.trim();
    if !description.is_empty() {
        let _ = writeln!(prompt, "Proof description: {description}");
    }
    if let Some(frequency) = request
        .parsed_frequency
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
    {
        let _ = writeln!(prompt, "Detected frequency: {frequency}");
    }
    if let Some(profile) = &request.user_profile {
        prompt.push_str("\nAbout the user (judge Relevant against this):\n");
        if !profile.life_areas.is_empty() {
            let _ = writeln!(prompt, "- Life areas: {}", profile.life_areas.join(", "));
        }
        if !profile.direction.trim().is_empty() {
            let _ = writeln!(prompt, "- Direction: {}", profile.direction.trim());
        }
        if !profile.values.trim().is_empty() {
            let _ = writeln!(prompt, "- Values: {}", profile.values.trim());
        }
    }
    prompt.push_str(
        r#"
Respond with JSON only, no explanation:
{
  "score": <0-100 integer, overall SMART score>,
  "scores": {
    "specific": <0-100 integer>,
    "measurable": <0-100 integer>,
    "achievable": <0-100 integer>,
    "relevant": <0-100 integer>,
    "time_bound": <0-100 integer>
  },
  "tips": {
    "specific": <null if good, or one short tip string>,
    "measurable": <null if good, or one short tip string>,
    "achievable": <null if good, or one short tip string>,
    "relevant": <null if good, or one short tip string>,
    "time_bound": <null if good, or one short tip string>
  }
}"#,
    );
    prompt
}

pub fn goal_parse_prompt(goal_text: &str) -> String {
    format!(
        r#"Extract frequency and duration information from this goal text.

Goal: "{}"

Respond with JSON only, no explanation:
{{
  "frequencyCount": <integer or null if not stated>,
  "frequencyUnit": <"day" | "week" | "month" | null>,
  "durationValue": <string like "8 weeks" or "until March 2026" or null if not stated>,
  "humanReadable": <short string like "3× per week" or null if nothing extracted>
}}"#,
        goal_text.trim()
    )
}

pub fn reality_check_prompt(request: &RealityCheckRequest) -> String {
    let frequency = request
        .parsed_frequency
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or("not stated");
    format!(
        r#"Do a reality check on this goal commitment:

Goal: "{}"
Proof type: {}
Frequency: {frequency}

Respond with JSON only:
{{
  "likelihood": <0-100 integer, % chance they complete this>,
  "pitfalls": [<2-3 short strings, common failure points>],
  "suggestions": [<1-2 short strings, concrete improvements>]
}}"#,
        request.goal_text.trim(),
        proof_list(&request.proof_types),
    )
}
