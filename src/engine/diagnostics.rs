use crate::question_bank::{MIXED_TOPIC, Question};
use std::collections::HashMap;

/// Marks awarded for a correct answer on a challenge paper.
pub(crate) const CORRECT_MARKS: i32 = 4;
/// Marks deducted for a wrong attempt. Unattempted questions score zero.
pub(crate) const WRONG_PENALTY: i32 = 1;

const STRONG_MAX_WRONG_PCT: f64 = 25.0;
const IMPROVEMENT_MAX_WRONG_PCT: f64 = 50.0;

/// Outcome of grading one question against the answer map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Unattempted,
    Correct,
    Wrong,
}

/// Grade a single question. `answer` is the selected option index, if any.
pub fn grade(question: &Question, answer: Option<usize>) -> AttemptResult {
    match answer {
        None => AttemptResult::Unattempted,
        Some(selected) if selected == question.correct_answer => AttemptResult::Correct,
        Some(_) => AttemptResult::Wrong,
    }
}

/// Aggregate marks and per-bucket counts for a full paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    pub total_score: i32,
    pub correct: usize,
    pub incorrect: usize,
    pub unattempted: usize,
}

/// Tally the negative-marking score over the whole paper in one pass.
pub fn score_summary(questions: &[Question], answers: &HashMap<usize, usize>) -> ScoreSummary {
    let mut summary = ScoreSummary::default();
    for (index, question) in questions.iter().enumerate() {
        match grade(question, answers.get(&index).copied()) {
            AttemptResult::Unattempted => summary.unattempted += 1,
            AttemptResult::Correct => {
                summary.total_score += CORRECT_MARKS;
                summary.correct += 1;
            }
            AttemptResult::Wrong => {
                summary.total_score -= WRONG_PENALTY;
                summary.incorrect += 1;
            }
        }
    }
    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicStatus {
    Strong,
    NeedsImprovement,
    Weak,
}

impl TopicStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::NeedsImprovement => "Needs Improvement",
            Self::Weak => "Weak",
        }
    }
}

/// Classify a topic by its wrong percentage. Ties at the 25% and 50% marks
/// fall into the lower-severity bucket.
pub fn classify(wrong_percentage: f64) -> TopicStatus {
    if wrong_percentage <= STRONG_MAX_WRONG_PCT {
        TopicStatus::Strong
    } else if wrong_percentage <= IMPROVEMENT_MAX_WRONG_PCT {
        TopicStatus::NeedsImprovement
    } else {
        TopicStatus::Weak
    }
}

/// Per-topic diagnostic row shown on the challenge results screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterStat {
    pub topic: String,
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    pub unattempted: usize,
    /// Wrong answers over ALL questions in the topic group, including
    /// unattempted ones.
    pub wrong_percentage: f64,
    pub status: TopicStatus,
    /// Content location to revise, present for every non-Strong topic.
    pub remediation: Option<String>,
}

/// Maps topic display names to content path fragments for remediation links.
/// Topics without an entry fall back to the base content location.
#[derive(Debug, Clone, Default)]
pub struct TopicMap {
    base: String,
    entries: HashMap<String, String>,
}

impl TopicMap {
    pub fn new<S: Into<String>>(base: S) -> Self {
        Self {
            base: base.into(),
            entries: HashMap::new(),
        }
    }

    pub fn insert<T: Into<String>, P: Into<String>>(&mut self, topic: T, path: P) {
        self.entries.insert(topic.into(), path.into());
    }

    pub fn remediation_link(&self, topic: &str) -> String {
        match self.entries.get(topic) {
            Some(path) => format!("{}/{}", self.base, path),
            None => self.base.clone(),
        }
    }
}

/// Group the paper by topic and derive the full diagnostic breakdown.
/// Groups appear in first-seen question order; questions without a topic
/// label fall into the "Mixed Concepts" group.
pub fn chapter_breakdown(
    questions: &[Question],
    answers: &HashMap<usize, usize>,
    topic_map: &TopicMap,
) -> Vec<ChapterStat> {
    let mut stats: Vec<ChapterStat> = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        let topic = question.topic.as_deref().unwrap_or(MIXED_TOPIC);
        let position = match stats.iter().position(|stat| stat.topic == topic) {
            Some(position) => position,
            None => {
                stats.push(ChapterStat {
                    topic: topic.to_string(),
                    total: 0,
                    correct: 0,
                    wrong: 0,
                    unattempted: 0,
                    wrong_percentage: 0.0,
                    status: TopicStatus::Strong,
                    remediation: None,
                });
                stats.len() - 1
            }
        };

        let stat = &mut stats[position];
        stat.total += 1;
        match grade(question, answers.get(&index).copied()) {
            AttemptResult::Unattempted => stat.unattempted += 1,
            AttemptResult::Correct => stat.correct += 1,
            AttemptResult::Wrong => stat.wrong += 1,
        }
    }

    for stat in &mut stats {
        stat.wrong_percentage = stat.wrong as f64 / stat.total as f64 * 100.0;
        stat.status = classify(stat.wrong_percentage);
        stat.remediation = match stat.status {
            TopicStatus::Strong => None,
            _ => Some(topic_map.remediation_link(&stat.topic)),
        };
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(topic: Option<&str>, correct_answer: usize) -> Question {
        Question {
            id: String::new(),
            text: String::new(),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            correct_answer,
            explanation: String::new(),
            hint: String::new(),
            topic: topic.map(|t| t.to_string()),
        }
    }

    #[test]
    fn score_matches_marking_scheme_and_counts_partition() {
        let questions: Vec<Question> = (0..6).map(|_| question(Some("T"), 0)).collect();
        // q0 correct, q1 wrong, q2 correct, q3 wrong, q4/q5 unattempted
        let answers = HashMap::from([(0, 0), (1, 2), (2, 0), (3, 3)]);

        let summary = score_summary(&questions, &answers);

        assert_eq!(summary.correct, 2);
        assert_eq!(summary.incorrect, 2);
        assert_eq!(summary.unattempted, 2);
        assert_eq!(
            summary.total_score,
            CORRECT_MARKS * summary.correct as i32 - WRONG_PENALTY * summary.incorrect as i32
        );
        assert_eq!(
            summary.correct + summary.incorrect + summary.unattempted,
            questions.len()
        );
    }

    #[test]
    fn threshold_ties_fall_to_lower_severity() {
        assert_eq!(classify(0.0), TopicStatus::Strong);
        assert_eq!(classify(25.0), TopicStatus::Strong);
        assert_eq!(classify(25.1), TopicStatus::NeedsImprovement);
        assert_eq!(classify(50.0), TopicStatus::NeedsImprovement);
        assert_eq!(classify(51.0), TopicStatus::Weak);
        assert_eq!(classify(100.0), TopicStatus::Weak);
    }

    #[test]
    fn breakdown_matches_worked_challenge_example() {
        // Topic A x3, topic B x2; correct answer is option 0 throughout.
        let questions = vec![
            question(Some("A"), 0),
            question(Some("A"), 0),
            question(Some("A"), 0),
            question(Some("B"), 0),
            question(Some("B"), 0),
        ];
        // q1 correct, q2 wrong, q3 unattempted, q4 correct, q5 wrong.
        let answers = HashMap::from([(0, 0), (1, 1), (3, 0), (4, 2)]);

        let summary = score_summary(&questions, &answers);
        assert_eq!(summary.total_score, 6);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.incorrect, 2);
        assert_eq!(summary.unattempted, 1);

        let stats = chapter_breakdown(&questions, &answers, &TopicMap::new("lectures/jee/maths"));
        assert_eq!(stats.len(), 2);

        let a = &stats[0];
        assert_eq!(a.topic, "A");
        assert_eq!((a.total, a.correct, a.wrong, a.unattempted), (3, 1, 1, 1));
        assert!((a.wrong_percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(a.status, TopicStatus::NeedsImprovement);

        let b = &stats[1];
        assert_eq!(b.topic, "B");
        assert_eq!((b.total, b.correct, b.wrong, b.unattempted), (2, 1, 1, 0));
        assert!((b.wrong_percentage - 50.0).abs() < 1e-9);
        assert_eq!(b.status, TopicStatus::NeedsImprovement);
    }

    #[test]
    fn breakdown_partitions_every_group_and_covers_the_paper() {
        let questions = vec![
            question(Some("A"), 0),
            question(None, 1),
            question(Some("B"), 2),
            question(None, 3),
            question(Some("A"), 0),
        ];
        let answers = HashMap::from([(0, 0), (1, 1), (2, 0)]);

        let stats = chapter_breakdown(&questions, &answers, &TopicMap::new("lectures"));

        let covered: usize = stats.iter().map(|stat| stat.total).sum();
        assert_eq!(covered, questions.len());
        for stat in &stats {
            assert_eq!(stat.correct + stat.wrong + stat.unattempted, stat.total);
        }
        // Untagged questions land in the sentinel group.
        assert!(stats.iter().any(|stat| stat.topic == MIXED_TOPIC));
    }

    #[test]
    fn untouched_paper_classifies_every_topic_strong() {
        let questions = vec![question(Some("A"), 0), question(Some("B"), 1)];
        let answers = HashMap::new();

        let stats = chapter_breakdown(&questions, &answers, &TopicMap::new("lectures"));

        for stat in &stats {
            assert_eq!(stat.wrong_percentage, 0.0);
            assert_eq!(stat.status, TopicStatus::Strong);
            assert!(stat.remediation.is_none());
        }
    }

    #[test]
    fn remediation_links_resolve_through_map_with_base_fallback() {
        let mut map = TopicMap::new("lectures/jee/mathematics-11");
        map.insert("Straight Lines", "straight-lines/lines-basics");

        assert_eq!(
            map.remediation_link("Straight Lines"),
            "lectures/jee/mathematics-11/straight-lines/lines-basics"
        );
        assert_eq!(
            map.remediation_link("Unknown Topic"),
            "lectures/jee/mathematics-11"
        );

        // A fully wrong topic gets a remediation entry even without a mapping.
        let questions = vec![question(Some("Unknown Topic"), 0)];
        let answers = HashMap::from([(0, 1)]);
        let stats = chapter_breakdown(&questions, &answers, &map);
        assert_eq!(stats[0].status, TopicStatus::Weak);
        assert_eq!(
            stats[0].remediation.as_deref(),
            Some("lectures/jee/mathematics-11")
        );
    }
}
