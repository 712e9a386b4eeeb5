use std::ops::Index;

use serde::{Deserialize, Serialize};

const MIN_QUESTION_LEN: usize = 5;

/// Validation errors raised while authoring questions and forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("question '{0}' is too short (at least 5 characters)")]
    QuestionTooShort(String),
    #[error("question '{0}' has no options")]
    NoOptions(String),
    #[error("question '{question}' lists option '{option}' more than once")]
    DuplicateOption { question: String, option: String },
    #[error("preferred answer '{preferred}' is not an option of '{question}'")]
    PreferredAnswerNotAnOption { question: String, preferred: String },
    #[error("question '{0}' already exists")]
    DuplicateQuestion(String),
    #[error("form has no question at index {index} (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A single questionnaire item with fixed options and one preferred answer.
///
/// Questions are never mutated after construction; customize a template by cloning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    name: String,
    options: Vec<String>,
    preferred_answer: String,
}

impl Question {
    pub fn new<I, S>(
        name: impl Into<String>,
        options: I,
        preferred_answer: impl Into<String>,
    ) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = normalize_question_name(&name.into())?;

        let mut collected: Vec<String> = Vec::new();
        for option in options {
            let option = option.into().trim().to_string();
            if collected.contains(&option) {
                return Err(FormError::DuplicateOption {
                    question: name,
                    option,
                });
            }
            collected.push(option);
        }

        if collected.is_empty() {
            return Err(FormError::NoOptions(name));
        }

        let preferred_answer = preferred_answer.into().trim().to_string();
        if !collected.contains(&preferred_answer) {
            return Err(FormError::PreferredAnswerNotAnOption {
                question: name,
                preferred: preferred_answer,
            });
        }

        Ok(Self {
            name,
            options: collected,
            preferred_answer,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn preferred_answer(&self) -> &str {
        &self.preferred_answer
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }
}

/// Trims the question and appends the trailing `?` when it is missing.
fn normalize_question_name(raw: &str) -> Result<String, FormError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_QUESTION_LEN {
        return Err(FormError::QuestionTooShort(trimmed.to_string()));
    }

    if trimmed.ends_with('?') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}?"))
    }
}

/// Named, ordered questionnaire. Answers are matched to questions by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    name: String,
    questions: Vec<Question>,
}

pub const STANDARD_FORM_NAME: &str = "standard";

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            questions: Vec::new(),
        }
    }

    /// The single-question form every pet starts with.
    pub fn standard_for(pet_name: &str) -> Self {
        let confirmation = Question {
            name: format!("Are you sure you want to adopt {pet_name}?"),
            options: vec!["Yes".to_string(), "No".to_string()],
            preferred_answer: "Yes".to_string(),
        };

        Self {
            name: STANDARD_FORM_NAME.to_string(),
            questions: vec![confirmation],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_question<I, S>(
        &mut self,
        name: impl Into<String>,
        options: I,
        preferred_answer: impl Into<String>,
    ) -> Result<&Question, FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let question = Question::new(name, options, preferred_answer)?;
        self.push(question)
    }

    /// Append an already-built question, typically a clone of a template question.
    pub fn push(&mut self, question: Question) -> Result<&Question, FormError> {
        if self.contains(question.name()) {
            return Err(FormError::DuplicateQuestion(question.name));
        }

        self.questions.push(question);
        let last = self.questions.len() - 1;
        Ok(&self.questions[last])
    }

    pub fn contains(&self, question_name: &str) -> bool {
        self.questions
            .iter()
            .any(|question| question.name == question_name)
    }

    pub fn remove(&mut self, index: usize) -> Result<Question, FormError> {
        if index >= self.questions.len() {
            return Err(FormError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        Ok(self.questions.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Copy of this form under a new name, sharing nothing with the original.
    pub fn clone_as(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            questions: self.questions.clone(),
        }
    }
}

impl Index<usize> for Form {
    type Output = Question;

    fn index(&self, index: usize) -> &Self::Output {
        &self.questions[index]
    }
}

impl<'a> IntoIterator for &'a Form {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
