use crate::catalog::Subject;
use rand::{Rng, rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// Number of answer options every generated question carries.
pub(crate) const OPTION_COUNT: usize = 4;
/// Hard cap on the size of a course challenge paper.
pub(crate) const CHALLENGE_QUESTION_CAP: usize = 25;
/// How many units a challenge paper draws from.
const CHALLENGE_UNIT_SPREAD: usize = 5;
/// Questions contributed by each sampled unit.
const QUESTIONS_PER_UNIT: usize = 5;
/// Topic label for filler questions that belong to no single unit.
pub(crate) const MIXED_TOPIC: &str = "Mixed Concepts";

/// A single multiple-choice question as supplied to the assessment engines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Display text. Generated questions carry a leading "[Topic]" tag for
    /// visual parity with the printed papers; the engines never parse it.
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub hint: String,
    /// Grouping label used by the challenge diagnostics. Always filled in by
    /// the provider before a question reaches an engine.
    #[serde(default)]
    pub topic: Option<String>,
}

/// Extract a topic from a leading "[Topic]" tag, if the text carries one.
pub fn topic_from_text(text: &str) -> Option<String> {
    let rest = text.strip_prefix('[')?;
    let end = rest.find(']')?;
    let topic = rest[..end].trim();
    if topic.is_empty() {
        None
    } else {
        Some(topic.to_string())
    }
}

/// Fill in missing `topic` fields on externally supplied questions: first from
/// an embedded "[Topic]" tag, otherwise from the given fallback label.
pub fn assign_topics(questions: &mut [Question], fallback: Option<&str>) {
    for question in questions {
        if question.topic.is_some() {
            continue;
        }
        question.topic = topic_from_text(&question.text)
            .or_else(|| fallback.map(|label| label.to_string()));
    }
}

const QUESTION_TEMPLATES: [&str; 7] = [
    "What is the primary defining characteristic of {t}?",
    "Which of the following statements accurately describes {t}?",
    "Solve the following problem related to {t}: calculate the standard value.",
    "In the context of {t}, identify the correct property from the options below.",
    "Apply the fundamental principles of {t} to determine the outcome.",
    "Which of these is a common misconception regarding {t}?",
    "Evaluated on the strict mathematical definition, what is {t}?",
];

const OPTION_TEMPLATES: [&str; 8] = [
    "It is a special case of {t} with a shifted index.",
    "The value increases proportionally with {t}.",
    "This holds true only when {t} is positive.",
    "It represents the derivative of {t}.",
    "It is independent of {t}.",
    "Zero.",
    "One.",
    "Undefined.",
];

const EXPLANATION_TEMPLATES: [&str; 4] = [
    "This is a fundamental property of {t} derived from first principles.",
    "By definition, {t} must satisfy this condition.",
    "Recall the standard formula for {t}. Substituting the values gives this result.",
    "This is the only option that satisfies the continuity condition of {t}.",
];

const HINT_TEMPLATES: [&str; 4] = [
    "Think about the basic definition of {t}.",
    "Recall the standard formula used for {t}.",
    "Try drawing a diagram to visualize {t}.",
    "Eliminate options that contradict the properties of {t}.",
];

fn fill(template: &str, topic: &str) -> String {
    template.replace("{t}", topic)
}

/// Generate `count` templated questions for a single topic. The correct answer
/// lands at a random option index on every question.
pub fn questions_for_topic(topic: &str, count: usize) -> Vec<Question> {
    let mut rng = rng();
    let slug: String = topic
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    (0..count)
        .map(|i| {
            let correct_index = rng.random_range(0..OPTION_COUNT);
            let mut options = vec![String::new(); OPTION_COUNT];

            options[correct_index] = fill(OPTION_TEMPLATES[(i + 2) % OPTION_TEMPLATES.len()], topic);
            if options[correct_index].contains("Undefined") {
                options[correct_index] = format!("The exact calculated value of {}.", topic);
            }

            let mut distractor = 0;
            for slot in 0..OPTION_COUNT {
                if slot == correct_index {
                    continue;
                }
                let mut text = fill(OPTION_TEMPLATES[(i + distractor) % OPTION_TEMPLATES.len()], topic);
                if text == options[correct_index] {
                    text = format!("None of the above for {}.", topic);
                }
                options[slot] = text;
                distractor += 1;
            }

            Question {
                id: format!("gen-{}-{}", slug, i + 1),
                text: format!(
                    "[{}] Q{}: {}",
                    topic,
                    i + 1,
                    fill(QUESTION_TEMPLATES[i % QUESTION_TEMPLATES.len()], topic)
                ),
                options,
                correct_answer: correct_index,
                explanation: fill(EXPLANATION_TEMPLATES[i % EXPLANATION_TEMPLATES.len()], topic),
                hint: fill(HINT_TEMPLATES[i % HINT_TEMPLATES.len()], topic),
                topic: Some(topic.to_string()),
            }
        })
        .collect()
}

/// Assemble a course challenge paper for a subject: a spread of questions
/// across randomly sampled units, padded with mixed-concept items, capped at
/// [`CHALLENGE_QUESTION_CAP`].
pub fn questions_for_challenge(subject: &Subject) -> Vec<Question> {
    let mut unit_indices: Vec<usize> = (0..subject.units.len()).collect();
    unit_indices.shuffle(&mut rng());
    unit_indices.truncate(CHALLENGE_UNIT_SPREAD);
    // Keep the sampled units in catalog order so the paper reads front-to-back.
    unit_indices.sort_unstable();

    let mut questions = Vec::new();
    for index in unit_indices {
        questions.extend(questions_for_topic(
            &subject.units[index].title,
            QUESTIONS_PER_UNIT,
        ));
    }

    if questions.len() < CHALLENGE_QUESTION_CAP {
        questions.extend(questions_for_topic(
            MIXED_TOPIC,
            CHALLENGE_QUESTION_CAP - questions.len(),
        ));
    }

    questions.truncate(CHALLENGE_QUESTION_CAP);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Subject, Unit};

    fn subject_with_units(titles: &[&str]) -> Subject {
        Subject {
            id: "test-subject".to_string(),
            title: "Test Subject".to_string(),
            exam: "JEE".to_string(),
            grade: "11th".to_string(),
            subject: "Mathematics".to_string(),
            units: titles
                .iter()
                .enumerate()
                .map(|(i, title)| Unit {
                    id: format!("unit-{}", i + 1),
                    title: title.to_string(),
                    chapters: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn generates_requested_count_with_four_options() {
        let questions = questions_for_topic("Limits", 7);
        assert_eq!(questions.len(), 7);
        for question in &questions {
            assert_eq!(question.options.len(), OPTION_COUNT);
            assert!(question.correct_answer < OPTION_COUNT);
            assert!(!question.options[question.correct_answer].is_empty());
            assert_eq!(question.topic.as_deref(), Some("Limits"));
            assert!(
                question.text.starts_with("[Limits]"),
                "generated text should carry the topic tag: {}",
                question.text
            );
            assert!(!question.hint.is_empty());
            assert!(!question.explanation.is_empty());
        }
    }

    #[test]
    fn zero_count_yields_empty_list() {
        assert!(questions_for_topic("Vectors", 0).is_empty());
    }

    #[test]
    fn topic_tag_parsing_handles_missing_and_empty_tags() {
        assert_eq!(
            topic_from_text("[Straight Lines] Q1: slope?"),
            Some("Straight Lines".to_string())
        );
        assert_eq!(topic_from_text("No tag here"), None);
        assert_eq!(topic_from_text("[] Q1: empty tag"), None);
        assert_eq!(topic_from_text("[unclosed tag"), None);
    }

    #[test]
    fn assign_topics_prefers_tag_then_fallback() {
        let mut questions = vec![
            Question {
                text: "[Sets] Q1: tagged".to_string(),
                ..Question::default()
            },
            Question {
                text: "untagged".to_string(),
                ..Question::default()
            },
            Question {
                text: "[Ignored] pre-assigned".to_string(),
                topic: Some("Relations".to_string()),
                ..Question::default()
            },
        ];

        assign_topics(&mut questions, Some("Types of Sets"));

        assert_eq!(questions[0].topic.as_deref(), Some("Sets"));
        assert_eq!(questions[1].topic.as_deref(), Some("Types of Sets"));
        assert_eq!(questions[2].topic.as_deref(), Some("Relations"));
    }

    #[test]
    fn challenge_paper_is_capped_and_fully_topic_labelled() {
        let subject = subject_with_units(&[
            "Sets, Relations and Functions",
            "Trigonometric Functions",
            "Sequence and Series",
            "Straight Lines",
            "Limits and Derivatives",
            "Probability",
        ]);

        let questions = questions_for_challenge(&subject);
        assert_eq!(questions.len(), CHALLENGE_QUESTION_CAP);
        assert!(questions.iter().all(|q| q.topic.is_some()));
    }

    #[test]
    fn challenge_paper_pads_sparse_subjects_with_mixed_concepts() {
        let subject = subject_with_units(&["Only Unit"]);

        let questions = questions_for_challenge(&subject);
        assert_eq!(questions.len(), CHALLENGE_QUESTION_CAP);
        let mixed = questions
            .iter()
            .filter(|q| q.topic.as_deref() == Some(MIXED_TOPIC))
            .count();
        assert_eq!(mixed, CHALLENGE_QUESTION_CAP - QUESTIONS_PER_UNIT);
    }

    #[test]
    fn challenge_paper_for_empty_subject_is_all_filler() {
        let subject = subject_with_units(&[]);

        let questions = questions_for_challenge(&subject);
        assert_eq!(questions.len(), CHALLENGE_QUESTION_CAP);
        assert!(
            questions
                .iter()
                .all(|q| q.topic.as_deref() == Some(MIXED_TOPIC))
        );
    }
}
