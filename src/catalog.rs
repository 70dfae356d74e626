use crate::engine::diagnostics::TopicMap;
use crate::question_bank::{self, Question};
use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

/// Course content shipped with the binary. The tree is static marketing/demo
/// data; curated question banks live inline, everything else is generated on
/// demand by the question bank.
const CATALOG_JSON: &str = include_str!("../data/catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub title: String,
    /// Target examination, e.g. "JEE" or "NEET".
    pub exam: String,
    pub grade: String,
    pub subject: String,
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub title: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub kind: ResourceKind,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub question_count: Option<usize>,
    /// Curated question bank. Absent for templated banks and non-quiz media.
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Pyq,
    Quiz,
    Article,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Pyq => "PYQs",
            Self::Quiz => "Quiz",
            Self::Article => "Article",
        }
    }

    /// Whether the resource launches a practice session.
    pub fn is_practice(self) -> bool {
        matches!(self, Self::Pyq | Self::Quiz)
    }
}

/// Parse the embedded catalog and label every curated question with its
/// chapter topic (or an embedded "[Topic]" tag) at the provider boundary.
pub fn load_default() -> Result<Catalog> {
    let mut catalog: Catalog =
        serde_json::from_str(CATALOG_JSON).wrap_err("failed to parse embedded course catalog")?;

    for subject in &mut catalog.subjects {
        for unit in &mut subject.units {
            for chapter in &mut unit.chapters {
                for resource in &mut chapter.resources {
                    if let Some(questions) = &mut resource.questions {
                        question_bank::assign_topics(questions, Some(&chapter.title));
                    }
                }
            }
        }
    }

    Ok(catalog)
}

impl Catalog {
    /// Subject indices with the preferred exam listed first, catalog order
    /// preserved within each half.
    pub fn ordered_subject_indices(&self, preferred_exam: &str) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.subjects.len())
            .filter(|&i| self.subjects[i].exam.eq_ignore_ascii_case(preferred_exam))
            .collect();
        indices.extend(
            (0..self.subjects.len())
                .filter(|&i| !self.subjects[i].exam.eq_ignore_ascii_case(preferred_exam)),
        );
        indices
    }

    /// The subject a quick-start challenge runs against: the first one for the
    /// preferred exam, falling back to the first subject overall.
    pub fn default_subject(&self, preferred_exam: &str) -> Option<&Subject> {
        self.subjects
            .iter()
            .find(|subject| subject.exam.eq_ignore_ascii_case(preferred_exam))
            .or_else(|| self.subjects.first())
    }
}

impl Subject {
    /// Base content location used for remediation links.
    pub fn base_link(&self) -> String {
        format!("lectures/{}/{}", self.exam.to_lowercase(), self.id)
    }

    /// Topic map for challenge diagnostics: each unit title points at its
    /// first chapter, matching where a revision session would begin.
    pub fn topic_map(&self) -> TopicMap {
        let mut map = TopicMap::new(self.base_link());
        for unit in &self.units {
            if let Some(first_chapter) = unit.chapters.first() {
                map.insert(
                    unit.title.clone(),
                    format!("{}/{}", unit.id, first_chapter.id),
                );
            }
        }
        map
    }
}

impl Chapter {
    /// First resource that can launch a practice session, if any.
    pub fn practice_resource(&self) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|resource| resource.kind.is_practice())
    }

    /// The question list for a practice run on this chapter: the curated bank
    /// when one is shipped, a freshly generated one otherwise.
    pub fn practice_questions(&self, default_count: usize) -> Vec<Question> {
        let resource = self.practice_resource();
        if let Some(questions) = resource.and_then(|r| r.questions.clone()) {
            return questions;
        }
        let count = resource
            .and_then(|r| r.question_count)
            .unwrap_or(default_count)
            .max(1);
        question_bank::questions_for_topic(&self.title, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses_and_is_fully_populated() {
        let catalog = load_default().expect("embedded catalog must parse");
        assert!(!catalog.subjects.is_empty());
        for subject in &catalog.subjects {
            assert!(!subject.units.is_empty(), "{} has no units", subject.id);
            for unit in &subject.units {
                assert!(!unit.chapters.is_empty(), "{} has no chapters", unit.id);
            }
        }
    }

    #[test]
    fn curated_questions_are_topic_labelled_at_load_time() {
        let catalog = load_default().unwrap();
        let mut curated = 0;
        for subject in &catalog.subjects {
            for unit in &subject.units {
                for chapter in &unit.chapters {
                    for resource in &chapter.resources {
                        for question in resource.questions.iter().flatten() {
                            curated += 1;
                            assert!(
                                question.topic.is_some(),
                                "curated question {} missing a topic",
                                question.id
                            );
                            assert_eq!(question.options.len(), 4);
                            assert!(question.correct_answer < question.options.len());
                        }
                    }
                }
            }
        }
        assert!(curated > 0, "catalog should ship at least one curated bank");
    }

    #[test]
    fn topic_map_points_each_unit_at_its_first_chapter() {
        let catalog = load_default().unwrap();
        let subject = &catalog.subjects[0];
        let map = subject.topic_map();

        let unit = &subject.units[0];
        let expected = format!(
            "{}/{}/{}",
            subject.base_link(),
            unit.id,
            unit.chapters[0].id
        );
        assert_eq!(map.remediation_link(&unit.title), expected);
        assert_eq!(map.remediation_link("No Such Unit"), subject.base_link());
    }

    #[test]
    fn practice_questions_fall_back_to_generation() {
        let chapter = Chapter {
            id: "limits".to_string(),
            title: "Limits".to_string(),
            description: String::new(),
            resources: vec![Resource {
                id: "p-limits".to_string(),
                title: "PYQs: Limits".to_string(),
                kind: ResourceKind::Pyq,
                duration: None,
                question_count: Some(3),
                questions: None,
            }],
        };

        let questions = chapter.practice_questions(5);
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.topic.as_deref() == Some("Limits")));
    }

    #[test]
    fn subjects_order_by_preferred_exam_with_fallback() {
        let catalog = load_default().unwrap();
        let order = catalog.ordered_subject_indices("NEET");
        assert_eq!(order.len(), catalog.subjects.len());

        let neet_count = catalog
            .subjects
            .iter()
            .filter(|s| s.exam.eq_ignore_ascii_case("NEET"))
            .count();
        for (position, &index) in order.iter().enumerate() {
            let is_neet = catalog.subjects[index].exam.eq_ignore_ascii_case("NEET");
            assert_eq!(is_neet, position < neet_count);
        }

        assert!(catalog.default_subject("JEE").is_some());
        // Unknown exams still resolve to something usable.
        assert!(catalog.default_subject("UPSC").is_some());
    }
}
