//! Fixed prompt text sent to the vision model.

/// System instruction attached to every query.
pub const SYSTEM_PROMPT: &str =
    "You are an AI that analyzes browser activity based on screenshots.";

/// Prompt asking for a 1-100 off-task likelihood for `goal`.
pub fn off_task_rating(goal: &str) -> String {
    format!(
        "Given a screenshot of the user’s current activity in a browser, assess how relevant it is to their goal: '{goal}'.\n\
         Determine the likelihood (1-100) that the user is off-task based on webpage content.\n\
         Be strict but fair: some websites have multiple uses (e.g., YouTube for learning vs. entertainment).\n\
         Respond with only a number (1-100), nothing else."
    )
}

/// Prompt asking for a `pass`/`fail` verdict on `reason` under `goal`.
pub fn reason_verdict(goal: &str, reason: &str) -> String {
    format!(
        "Given a screenshot of the user’s current Chrome activity, determine if their given reason ('{reason}')\n\
         justifies their current webpage use for the goal: '{goal}'.\n\
         Respond with only 'pass' or 'fail'."
    )
}
