//! Prompt template for the vulnerability assessment request

use crate::domain::analysis::SUPPORTED_FINDING_TYPES;

pub const ASSESSMENT_PROMPT: &str = r#"You are an expert application security auditor. Analyze the following source code for security vulnerabilities.

## Project
{project_name}

## Source Code
```
{source}
```

## Your Task
Respond with ONLY a JSON object in the following structure, with no text before or after it:

{
    "vulnerabilities": [
        {
            "severity": "critical | high | medium | low",
            "type": "one of the supported finding types listed below",
            "category": "a short grouping such as Input Validation or Authentication",
            "filePath": "path of the affected file, if identifiable",
            "lineNumber": 1,
            "codeSnippet": "the vulnerable code, abbreviated",
            "description": "what is wrong and why it is exploitable (at least 10 characters)",
            "recommendation": "how to fix it (at least 10 characters)",
            "confidenceScore": 0.9
        }
    ]
}

Report only findings of these types: {finding_types}.

If the code has no vulnerabilities, return {"vulnerabilities": []}.
Escape control characters (newlines, tabs, quotes) inside all JSON string values so the object parses cleanly.
"#;

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build_assessment_prompt(project_name: &str, source: &str) -> String {
        ASSESSMENT_PROMPT
            .replace("{finding_types}", &SUPPORTED_FINDING_TYPES.join(", "))
            .replace("{project_name}", project_name)
            .replace("{source}", source)
    }
}
