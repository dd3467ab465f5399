use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Words that suggest the asker wants figures out of a table rather than
/// prose. Any digit in the question counts as well.
static TABULAR_INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d|\b(how many|how much|totals?|sums?|averages?|median|counts?|percent|percentages?|ratios?|tables?|columns?|rows?|maximum|minimum|highest|lowest|compare|comparison|statistics|amounts?|numbers?)\b",
    )
    .expect("tabular intent pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    text: String,
}

impl Question {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn has_tabular_intent(&self) -> bool {
        TABULAR_INTENT.is_match(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_trims_text() {
        let question = Question::new("  What color is the sky?  ".to_string());
        assert_eq!(question.text(), "What color is the sky?");
        assert!(!question.is_empty());
    }

    #[test]
    fn test_blank_question_is_empty() {
        assert!(Question::new("   \n".to_string()).is_empty());
    }

    #[test]
    fn test_tabular_intent_keywords() {
        assert!(Question::new("How many units were sold?".to_string()).has_tabular_intent());
        assert!(Question::new("What is the average revenue?".to_string()).has_tabular_intent());
        assert!(Question::new("Which ROW has the highest value?".to_string()).has_tabular_intent());
        assert!(Question::new("What happened in 2023?".to_string()).has_tabular_intent());
    }

    #[test]
    fn test_prose_questions_have_no_tabular_intent() {
        assert!(!Question::new("What color is the sky?".to_string()).has_tabular_intent());
        assert!(!Question::new("Summarize the introduction".to_string()).has_tabular_intent());
        assert!(!Question::new("Who wrote the country report?".to_string()).has_tabular_intent());
        assert!(!Question::new("Why do arrows fly?".to_string()).has_tabular_intent());
    }
}
