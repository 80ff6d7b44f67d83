use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaScore {
    pub score: u8,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartQuestion {
    pub question: String,
    pub choices: Vec<String>,
}

impl SmartQuestion {
    pub fn new(question: &str, choices: &[&str]) -> Self {
        Self {
            question: question.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }
}
