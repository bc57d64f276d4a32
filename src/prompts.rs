use anyhow::Result;
use serde::Deserialize;

/// One instruction template plus a human-readable description. The
/// template carries `{code}` and `{preferredLanguage}` placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptVariant {
    pub prompt: String,
    pub description: String,
}

/// Substitute the `{code}` and `{preferredLanguage}` placeholders.
pub fn render(template: &str, code: &str, preferred_language: &str) -> String {
    template
        .replace("{code}", code)
        .replace("{preferredLanguage}", preferred_language)
}

/// Pull a single prompt/description pair from a remote prompt service
/// returning `{ "prompt": …, "description": … }`.
pub async fn fetch_variant(http: &reqwest::Client, url: &str) -> Result<PromptVariant> {
    let variant = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(variant)
}

const PLAIN_REVIEW: &str = r#"Review the following code and rate how well it is written on a scale from 0 to 100, where 100 is flawless. Explain the main reason for your rating in {preferredLanguage}.

````
{code}
````

Answer in exactly this format:
score: <number>
description: <reason>
````
"#;

const STRICT_REVIEWER: &str = r#"You are a strict senior engineer reviewing a pull request. Judge the following code for correctness, naming, and structure, then give it a score from 0 (unacceptable) to 100 (exemplary). Write the justification in {preferredLanguage} and do not soften your judgement.

````
{code}
````

Respond only with:
score: <number>
description: <justification>
````
"#;

const READABILITY_FOCUS: &str = r#"Evaluate only the readability and maintainability of the code below: consistent naming, function size, comment quality, and how easily a newcomer could modify it. Score it from 0 to 100 and describe the biggest readability issue in {preferredLanguage}.

````
{code}
````

Use this output format and nothing else:
score: <number>
description: <biggest issue>
````
"#;

const FEW_SHOT: &str = r#"Rate code quality from 0 to 100 and explain why in {preferredLanguage}.

Example:
````
const a = (x) => { return x + 1; }
````
score: 60
description: Works but the name `a` is meaningless and the braces are redundant.
````

Now rate this code:
````
{code}
````
"#;

const BUG_HUNT: &str = r#"Inspect the following code for likely bugs, unhandled edge cases, and misuse of the language. Score it from 0 (riddled with problems) to 100 (no problems found) and list the most serious finding in {preferredLanguage}.

````
{code}
````

Reply in the form:
score: <number>
description: <most serious finding>
````
"#;

/// The fixed, ordered list of built-in prompt variants.
pub fn builtin_variants() -> Vec<PromptVariant> {
    [
        (PLAIN_REVIEW, "Plain 0-100 quality rating"),
        (STRICT_REVIEWER, "Strict senior-engineer persona"),
        (READABILITY_FOCUS, "Readability and maintainability only"),
        (FEW_SHOT, "Few-shot with a worked example"),
        (BUG_HUNT, "Bug hunt weighted toward correctness"),
    ]
    .into_iter()
    .map(|(prompt, description)| PromptVariant {
        prompt: prompt.to_string(),
        description: description.to_string(),
    })
    .collect()
}
