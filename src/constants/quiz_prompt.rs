use crate::models::dto::GenerateQuizRequest;

pub const QUIZ_SYSTEM_PROMPT: &str = "You are a quiz author. You write short multiple choice questions and answer ONLY in the tagged line format you are given. Never add commentary, numbering, markdown or blank tags.";

const QUIZ_FORMAT_INSTRUCTIONS: &str = "### Output format

Write each question as one block of lines. Every line starts with a tag:

[*]:<the question>
[A]:<first option>
[B]:<second option>
[C]:<third option>
[D]:<fourth option>
[_]:<the letter of the correct option, for example B>
[;]:<one sentence explaining the correct answer>

Separate consecutive blocks with a line containing only [.]

### Rules

1. Exactly one option is correct.
2. Options are short; do not repeat the question in them.
3. Keep every tag at the very start of its line, followed directly by the colon.
4. Do not wrap the output in code fences.

### Example

[*]:1+1=?
[A]:1
[B]:2
[C]:3
[D]:4
[_]:B
[;]:1+1=2
[.]
[*]:Which planet is closest to the Sun?
[A]:Venus
[B]:Mercury
[C]:Earth
[D]:Mars
[_]:B
[;]:Mercury orbits closest to the Sun.";

/// User prompt asking for `request.question_count` questions on `request.topic`.
pub fn build_quiz_prompt(request: &GenerateQuizRequest) -> String {
    format!(
        "Write {count} multiple choice question(s) about: {topic}\n\n{format}",
        count = request.question_count,
        topic = request.topic,
        format = QUIZ_FORMAT_INSTRUCTIONS,
    )
}
