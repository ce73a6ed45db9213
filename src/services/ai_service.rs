use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};

use crate::error::{Error, Result};
use crate::models::analysis::GrammarAnalysis;
use crate::models::question::{Difficulty, Question, Quiz};

const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Source of generated learning material.
#[async_trait]
pub trait QuizContentProvider: Send + Sync {
    async fn generate_quiz(&self, topic: &str, difficulty: Difficulty, count: usize)
        -> Result<Quiz>;

    async fn generate_tutorial(&self, topic: &str, difficulty: Difficulty) -> Result<String>;

    /// Grammar and sentence-formation feedback on free text, scored out of 10.
    async fn analyze_text(&self, text: &str) -> Result<GrammarAnalysis>;
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
    shuffle_options: bool,
}

impl AIService {
    pub fn new(
        api_key: String,
        model: String,
        api_base: String,
        shuffle_options: bool,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            api_base,
            shuffle_options,
        }
    }

    async fn generate_content(&self, prompt: String, json_output: bool) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );

        let mut payload = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ]
        });
        if json_output {
            payload["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "temperature": 0.8
            });
        }

        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .timeout(Duration::from_secs(60))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::ContentGeneration(format!(
                "Gemini API Error {}: {}",
                status, text
            )));
        }

        let body: JsonValue = res.json().await?;
        let text = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::ContentGeneration("Invalid Gemini response format".to_string()))?;

        Ok(text)
    }

    pub fn sanitize_questions(&self, raw: &JsonValue, num_questions: usize) -> Vec<Question> {
        let arr_val = if let Some(arr) = raw.get("questions").and_then(|a| a.as_array()) {
            arr.clone()
        } else if let Some(arr) = raw.as_array() {
            arr.clone()
        } else {
            vec![]
        };

        let mut rng = rand::thread_rng();
        let mut questions = Vec::new();

        for (idx, val) in arr_val.iter().enumerate() {
            match coerce_question(val) {
                Some(mut q) => {
                    if self.shuffle_options {
                        shuffle_options(&mut q, &mut rng);
                    }
                    questions.push(q);
                }
                None => tracing::warn!(index = idx, "Dropping malformed generated question"),
            }
        }

        questions.truncate(num_questions);
        questions
    }

    fn quiz_prompt(topic: &str, difficulty: Difficulty, count: usize) -> String {
        let schema = json!({
            "questions": [
                {
                    "question": "Question text",
                    "options": { "A": "...", "B": "...", "C": "...", "D": "..." },
                    "correct_answer": "B",
                    "explanation": "Why B is correct"
                }
            ]
        });
        format!(
            "Write a multiple choice English grammar quiz on \"{topic}\".\n\
             Difficulty: {difficulty} ({desc}).\n\
             Number of questions: {count}.\n\
             Each question has exactly four options labelled A to D and exactly one correct answer.\n\
             Let complexity grow from the first question to the last and keep explanations short.\n\
             Respond with JSON only, shaped like: {schema}",
            topic = topic,
            difficulty = difficulty,
            desc = difficulty.quiz_description(),
            count = count,
            schema = schema,
        )
    }

    fn tutorial_prompt(topic: &str, difficulty: Difficulty) -> String {
        let outline = match difficulty {
            Difficulty::Easy => {
                "1. A plain definition in three or four sentences\n\
                 2. Three or four easy examples\n\
                 3. Three practice tips\n\
                 4. Three points to remember\n\
                 Use basic vocabulary throughout."
            }
            Difficulty::Medium => {
                "1. A detailed definition\n\
                 2. Three or four key concepts\n\
                 3. Four or five varied examples\n\
                 4. Common mistakes and how to avoid them\n\
                 5. A short practice exercise with answers"
            }
            Difficulty::Hard => {
                "1. A technical definition\n\
                 2. Rules and their exceptions\n\
                 3. Complex and literary examples\n\
                 4. Subtle distinctions and edge cases\n\
                 5. A challenging exercise with worked answers"
            }
        };
        format!(
            "Explain the English grammar topic \"{}\" for a {} learner ({}).\n\
             Format the answer in Markdown with these sections:\n{}",
            topic,
            difficulty.as_str().to_lowercase(),
            difficulty.tutorial_description(),
            outline
        )
    }

    fn analysis_prompt(text: &str) -> String {
        format!(
            "Review the grammar and sentence formation of the text below and score it out of 10.\n\
             Reply in exactly this layout:\n\n\
             Grammar Analysis :\n[grammar errors and what is correct]\n\n\
             Sentence Formation :\n[structure and flow of the sentences]\n\n\
             Score : [X]/10\n\n\
             Suggestions :\n1. [suggestion]\n2. [suggestion]\n3. [suggestion]\n\n\
             Text: \"{}\"",
            text.trim()
        )
    }
}

#[async_trait]
impl QuizContentProvider for AIService {
    async fn generate_quiz(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Quiz> {
        tracing::info!(topic, %difficulty, count, "Requesting quiz from Gemini");

        let text = self
            .generate_content(Self::quiz_prompt(topic, difficulty, count), true)
            .await?;
        let raw: JsonValue = serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
            Error::ContentGeneration(format!("Model returned malformed quiz JSON: {}", e))
        })?;

        let questions = self.sanitize_questions(&raw, count);
        let quiz = Quiz::new(topic, difficulty, questions);
        quiz.validate()
            .map_err(|e| Error::ContentGeneration(e.to_string()))?;

        tracing::info!(topic, questions = quiz.len(), "Quiz generated");
        Ok(quiz)
    }

    async fn generate_tutorial(&self, topic: &str, difficulty: Difficulty) -> Result<String> {
        tracing::info!(topic, %difficulty, "Requesting tutorial from Gemini");
        let text = self
            .generate_content(Self::tutorial_prompt(topic, difficulty), false)
            .await?;
        Ok(text.trim().to_string())
    }

    async fn analyze_text(&self, text: &str) -> Result<GrammarAnalysis> {
        tracing::info!(chars = text.chars().count(), "Requesting grammar analysis from Gemini");
        let reply = self
            .generate_content(Self::analysis_prompt(text), false)
            .await?;
        let analysis = GrammarAnalysis::parse(&reply);
        if analysis.score.is_none() {
            tracing::warn!("Grammar analysis reply carried no readable score");
        }
        Ok(analysis)
    }
}

/// Returns the body of the first Markdown code fence, or the trimmed text
/// when there is none.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    // skip the info string, e.g. "json"
    let body = match after.find('\n') {
        Some(pos) => &after[pos + 1..],
        None => after.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c == ')' || c == '.' || c == ':')
        .trim()
        .to_uppercase()
}

fn coerce_question(v: &JsonValue) -> Option<Question> {
    let text = v
        .get("question")
        .or_else(|| v.get("text"))
        .and_then(|s| s.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let options: BTreeMap<String, String> = match v.get("options") {
        Some(JsonValue::Object(map)) => map
            .iter()
            .filter_map(|(label, opt)| {
                opt.as_str()
                    .map(|o| (normalize_label(label), o.trim().to_string()))
            })
            .collect(),
        Some(JsonValue::Array(items)) => items
            .iter()
            .zip(OPTION_LABELS)
            .filter_map(|(opt, label)| opt.as_str().map(|o| (label.to_string(), o.trim().to_string())))
            .collect(),
        _ => BTreeMap::new(),
    };
    if options.len() < 2 {
        return None;
    }

    let correct_label = match v.get("correct_answer") {
        Some(JsonValue::String(s)) => normalize_label(s),
        Some(JsonValue::Number(n)) => {
            let idx = n.as_u64()? as usize;
            options.keys().nth(idx)?.clone()
        }
        _ => return None,
    };
    if !options.contains_key(&correct_label) {
        return None;
    }

    let explanation = v
        .get("explanation")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(Question::new(text, options, correct_label, explanation))
}

/// Redistributes option texts across the same labels, keeping the answer
/// pointed at the right text.
fn shuffle_options(q: &mut Question, rng: &mut impl rand::Rng) {
    let Some(correct_text) = q.options.get(&q.correct_label).cloned() else {
        return;
    };
    let labels: Vec<String> = q.options.keys().cloned().collect();
    let mut texts: Vec<String> = q.options.values().cloned().collect();
    texts.shuffle(rng);

    q.options = labels.into_iter().zip(texts).collect();
    if let Some((label, _)) = q.options.iter().find(|(_, t)| **t == correct_text) {
        q.correct_label = label.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(shuffle: bool) -> AIService {
        AIService::new(
            "test-key".into(),
            "gemini-1.5-flash".into(),
            "http://localhost".into(),
            shuffle,
            Client::new(),
        )
    }

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"questions\": []}\n```";
        assert_eq!(strip_code_fence(raw), "{\"questions\": []}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(
            strip_code_fence("Here you go:\n```\n[1]\n```\nEnjoy"),
            "[1]"
        );
    }

    #[test]
    fn sanitize_keeps_well_formed_and_drops_the_rest() {
        let raw = json!({
            "questions": [
                {
                    "question": "Which word is a noun?",
                    "options": {"A": "run", "B": "table", "C": "quickly", "D": "blue"},
                    "correct_answer": "b",
                    "explanation": "A table is a thing."
                },
                {
                    "question": "Answer points nowhere",
                    "options": {"A": "x", "B": "y"},
                    "correct_answer": "E"
                },
                {
                    "question": "Too few options",
                    "options": {"A": "only"},
                    "correct_answer": "A"
                },
                {
                    "options": {"A": "x", "B": "y"},
                    "correct_answer": "A"
                }
            ]
        });

        let questions = service(false).sanitize_questions(&raw, 10);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_label, "B");
        assert_eq!(questions[0].options["B"], "table");
        assert_eq!(questions[0].explanation, "A table is a thing.");
    }

    #[test]
    fn sanitize_accepts_array_options_and_index_answers() {
        let raw = json!([
            {
                "question": "Pick the verb",
                "options": ["cat", "jump", "green", "softly"],
                "correct_answer": 1
            }
        ]);
        let questions = service(false).sanitize_questions(&raw, 5);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_label, "B");
        assert_eq!(questions[0].options["B"], "jump");
    }

    #[test]
    fn sanitize_truncates_to_requested_count() {
        let item = json!({
            "question": "q",
            "options": {"A": "1", "B": "2", "C": "3", "D": "4"},
            "correct_answer": "A"
        });
        let raw = json!({ "questions": [item.clone(), item.clone(), item.clone(), item] });
        assert_eq!(service(false).sanitize_questions(&raw, 3).len(), 3);
    }

    #[test]
    fn shuffling_keeps_answer_on_correct_text() {
        let raw = json!({
            "questions": [{
                "question": "Which is an article?",
                "options": {"A": "the", "B": "dog", "C": "ran", "D": "fast"},
                "correct_answer": "A"
            }]
        });
        let svc = service(true);
        for _ in 0..20 {
            let q = &svc.sanitize_questions(&raw, 1)[0];
            assert_eq!(q.options[&q.correct_label], "the");
            assert_eq!(q.options.len(), 4);
        }
    }

    #[test]
    fn quiz_prompt_mentions_topic_and_count() {
        let prompt = AIService::quiz_prompt("Modal Auxiliaries", Difficulty::Hard, 7);
        assert!(prompt.contains("Modal Auxiliaries"));
        assert!(prompt.contains("Number of questions: 7"));
        assert!(prompt.contains("Hard"));
    }

    #[test]
    fn analysis_prompt_asks_for_the_parsed_layout() {
        let prompt = AIService::analysis_prompt("  he go to school  ");
        assert!(prompt.contains("Text: \"he go to school\""));
        for heading in ["Grammar Analysis :", "Sentence Formation :", "Score : [X]/10", "Suggestions :"] {
            assert!(prompt.contains(heading), "missing {}", heading);
        }
    }
}
