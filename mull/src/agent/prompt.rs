//! Deterministic prompt construction for the reasoning and critique calls.

use serde_json::json;

use crate::thought::Thought;

const HISTORY_THINKING_CHARS: usize = 500;

/// Reasoning prompt for one iteration.
///
/// Deterministic in its inputs so retries after a parse failure re-send the
/// identical prompt. The format instructions adapt to the enabled features:
/// branching adds the `next_action` field and its labels, searching adds the
/// `Search Needed` status and its `query` field; `material` carries whatever
/// the augmenter has already gathered.
pub fn reasoning_prompt(
    problem: &str,
    history: &str,
    thought_number: u32,
    branching: bool,
    searching: bool,
    material: &str,
) -> String {
    let statuses = if searching {
        "Pending|Done|Verification Needed|Search Needed"
    } else {
        "Pending|Done|Verification Needed"
    };
    let mut prompt = format!(
        "You are an advanced reasoning engine.\n\
         \n\
         Problem:\n{problem}\n\
         \n\
         Previous thoughts and plans:\n{history}\n"
    );
    if !material.is_empty() {
        prompt.push_str(&format!("\nGathered material:\n{material}"));
    }
    let mut instructions = vec![
        "Evaluate the last step's result and impact.",
        "Pick the next pending step and execute it.",
        "Update the plan: mark steps as Done, Pending, or Verification Needed.",
    ];
    if searching {
        instructions.push(
            "When a step needs information from the web, mark it Search Needed \
             and set its `query`.",
        );
    }
    instructions.push("If a step fails, adjust the plan or insert corrective actions.");
    instructions.push(
        "When the plan is entirely complete, set `next_thought_needed: false` \
         and put the complete answer in `final_answer`.",
    );
    instructions.push("Provide concise results for steps marked Done.");
    if branching {
        instructions.push(
            "If an advanced capability will help, set `next_action` to explore, \
             critique, revise, or spawn; otherwise leave \"continue\".",
        );
    }
    prompt.push_str(&format!(
        "\nCurrent thought number: {thought_number}\n\
         \n\
         Instructions:\n"
    ));
    for (i, line) in instructions.iter().enumerate() {
        prompt.push_str(&format!("{}. {line}\n", i + 1));
    }
    prompt.push_str(&format!(
        "\nReturn ONLY valid JSON matching this schema:\n\
         {{\n\
         \x20 \"current_thinking\": \"<detailed reasoning>\",\n\
         \x20 \"planning\": [\n\
         \x20   {{\n\
         \x20     \"description\": \"<step text>\",\n\
         \x20     \"status\": \"{statuses}\",\n\
         \x20     \"result\": \"<concise outcome, required when Done>\",\n"
    ));
    if searching {
        prompt.push_str("\x20     \"query\": \"<search query, required when Search Needed>\",\n");
    }
    prompt.push_str(
        "\x20     \"mark\": \"<verification note, required when Verification Needed>\",\n\
         \x20     \"sub_steps\": []\n\
         \x20   }\n\
         \x20 ],\n",
    );
    if branching {
        prompt.push_str("\x20 \"next_action\": \"continue|explore|critique|revise|spawn\",\n");
    }
    prompt.push_str(
        "\x20 \"next_thought_needed\": true|false,\n\
         \x20 \"final_answer\": \"<the answer, required when next_thought_needed is false>\"\n\
         }\n",
    );
    prompt
}

/// Critique prompt: score a rendered plan 1 to 5 with concise feedback.
pub fn critique_prompt(plan_text: &str) -> String {
    format!(
        "You are a strict reviewer.\n\
         Score the following plan 1-5 and give concise feedback.\n\
         Return ONLY JSON: {{\"score\": int, \"feedback\": str}}\n\
         \n\
         {plan_text}"
    )
}

/// Serializes the last `window` thoughts for the prompt, each `current_thinking`
/// truncated to 500 characters. Plans are carried whole.
pub fn history_text(thoughts: &[Thought], window: usize) -> String {
    if thoughts.is_empty() {
        return "No previous thoughts.".to_string();
    }
    let start = thoughts.len().saturating_sub(window);
    let entries: Vec<_> = thoughts[start..]
        .iter()
        .map(|t| {
            json!({
                "thought_number": t.thought_number,
                "current_thinking": t.current_thinking.chars().take(HISTORY_THINKING_CHARS).collect::<String>(),
                "planning": t.planning,
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}
