use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Grammar,
    Sentence,
    Score,
    Suggestions,
}

const HEADINGS: [(&str, Section); 4] = [
    ("Grammar Analysis", Section::Grammar),
    ("Sentence Formation", Section::Sentence),
    ("Score", Section::Score),
    ("Suggestions", Section::Suggestions),
];

/// Model feedback on a piece of learner text, split into the sections the
/// analysis prompt asks for. `raw` keeps the full reply for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarAnalysis {
    pub grammar_analysis: String,
    pub sentence_formation: String,
    /// Out of 10; `None` when the reply carries no readable score.
    pub score: Option<f64>,
    pub suggestions: Vec<String>,
    pub raw: String,
}

impl GrammarAnalysis {
    /// Splits a reply of the form `Grammar Analysis : ... Sentence Formation :
    /// ... Score : X/10 ... Suggestions : 1. ...`. Headings may carry
    /// Markdown emphasis and any letter case.
    pub fn parse(text: &str) -> Self {
        let mut grammar = Vec::new();
        let mut sentence = Vec::new();
        let mut score = None;
        let mut suggestions = Vec::new();
        let mut current: Option<Section> = None;

        for line in text.lines() {
            let (section, content) = match heading(line) {
                Some((section, rest)) => {
                    current = Some(section);
                    (section, rest)
                }
                None => match current {
                    Some(section) => (section, line.trim()),
                    None => continue,
                },
            };
            if content.is_empty() {
                continue;
            }
            match section {
                Section::Grammar => grammar.push(content),
                Section::Sentence => sentence.push(content),
                Section::Score => {
                    if score.is_none() {
                        score = parse_score(content);
                    }
                }
                Section::Suggestions => suggestions.extend(suggestion(content)),
            }
        }

        Self {
            grammar_analysis: grammar.join("\n"),
            sentence_formation: sentence.join("\n"),
            score,
            suggestions,
            raw: text.trim().to_string(),
        }
    }
}

fn heading(line: &str) -> Option<(Section, &str)> {
    let bare = line.trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace());
    for (name, section) in HEADINGS {
        let Some(prefix) = bare.get(..name.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(name) {
            continue;
        }
        let rest = bare[name.len()..].trim_start_matches(|c: char| c == '*' || c.is_whitespace());
        if let Some(rest) = rest.strip_prefix(':') {
            return Some((section, rest.trim_matches(|c: char| c == '*' || c.is_whitespace())));
        }
    }
    None
}

fn parse_score(content: &str) -> Option<f64> {
    let value: f64 = content
        .split('/')
        .next()?
        .trim_matches(|c: char| c == '[' || c == ']' || c == '*' || c.is_whitespace())
        .parse()
        .ok()?;
    (0.0..=10.0).contains(&value).then_some(value)
}

fn suggestion(line: &str) -> Option<String> {
    let body = line
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(|c: char| c == '.' || c == ')' || c == '-' || c == '*')
        .replace("&emsp;", " ");
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}
