use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::form::{Form, FormError};

pub const DEFAULT_TEMPLATE_NAME: &str = "Default Adoption Form";

const OPTION_SEPARATOR: char = '|';

const DEFAULT_QUESTIONS: [(&str, &[&str], &str); 5] = [
    (
        "Why do you want to adopt this pet?",
        &["Companionship", "Gift", "Guard", "Other"],
        "Companionship",
    ),
    (
        "Do you live in a house or apartment?",
        &["House", "Apartment", "Other"],
        "House",
    ),
    (
        "How much time can you dedicate daily to your pet?",
        &["Less than 1 hour", "1-3 hours", "More than 3 hours"],
        "1-3 hours",
    ),
    ("Do you already have other pets?", &["Yes", "No"], "No"),
    (
        "Are you financially able to cover food and veterinary costs?",
        &["Yes", "No"],
        "Yes",
    ),
];

/// Shared template shelters clone onto their pets.
pub fn default_adoption_form() -> Result<Form, FormError> {
    let mut form = Form::new(DEFAULT_TEMPLATE_NAME);
    for (question, options, preferred) in DEFAULT_QUESTIONS {
        form.add_question(question, options.iter().copied(), preferred)?;
    }
    Ok(form)
}

#[derive(Debug)]
pub enum FormTemplateImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Question { row: usize, source: FormError },
}

impl std::fmt::Display for FormTemplateImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormTemplateImportError::Io(err) => write!(f, "failed to read form template: {}", err),
            FormTemplateImportError::Csv(err) => write!(f, "invalid form template CSV: {}", err),
            FormTemplateImportError::Question { row, source } => {
                write!(f, "form template row {} rejected: {}", row, source)
            }
        }
    }
}

impl std::error::Error for FormTemplateImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormTemplateImportError::Io(err) => Some(err),
            FormTemplateImportError::Csv(err) => Some(err),
            FormTemplateImportError::Question { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for FormTemplateImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FormTemplateImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds a form from `Question,Options,Preferred Answer` rows; options are `|`-separated.
pub struct FormTemplateImporter;

impl FormTemplateImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        name: &str,
    ) -> Result<Form, FormTemplateImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, name)
    }

    pub fn from_reader<R: Read>(reader: R, name: &str) -> Result<Form, FormTemplateImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut form = Form::new(name);

        for (index, record) in csv_reader.deserialize::<TemplateRow>().enumerate() {
            let row = record?;
            // header is line 1
            let line = index + 2;
            form.add_question(row.question, row.options, row.preferred)
                .map_err(|source| FormTemplateImportError::Question { row: line, source })?;
        }

        Ok(form)
    }
}

#[derive(Debug, Deserialize)]
struct TemplateRow {
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Options", deserialize_with = "split_options")]
    options: Vec<String>,
    #[serde(rename = "Preferred Answer")]
    preferred: String,
}

fn split_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split(OPTION_SEPARATOR)
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect())
}
