use std::io::Cursor;

use crate::workflows::adoption::form::FormError;
use crate::workflows::adoption::template::{
    default_adoption_form, FormTemplateImportError, FormTemplateImporter, DEFAULT_TEMPLATE_NAME,
};

#[test]
fn default_template_has_five_questions() {
    let form = default_adoption_form().expect("default template is valid");
    assert_eq!(form.name(), DEFAULT_TEMPLATE_NAME);
    assert_eq!(form.len(), 5);
    assert_eq!(form[1].name(), "Do you live in a house or apartment?");
    assert_eq!(form[2].preferred_answer(), "1-3 hours");
    assert_eq!(form[3].preferred_answer(), "No");
}

#[test]
fn importer_reads_questions_from_csv() {
    let csv = "Question,Options,Preferred Answer\n\
               Do you have a fenced yard,Yes | No,Yes\n\
               Who will walk the dog?,Me|Family|Dog walker,Me\n";

    let form = FormTemplateImporter::from_reader(Cursor::new(csv), "dog template")
        .expect("template imports");

    assert_eq!(form.name(), "dog template");
    assert_eq!(form.len(), 2);
    assert_eq!(form[0].name(), "Do you have a fenced yard?");
    assert_eq!(form[0].options(), ["Yes".to_string(), "No".to_string()]);
    assert_eq!(form[1].options().len(), 3);
}

#[test]
fn importer_reports_the_offending_row() {
    let csv = "Question,Options,Preferred Answer\n\
               Do you have a fenced yard,Yes|No,Yes\n\
               Do you have a fenced yard?,Yes|No,No\n";

    match FormTemplateImporter::from_reader(Cursor::new(csv), "dupes") {
        Err(FormTemplateImportError::Question { row, source }) => {
            assert_eq!(row, 3);
            assert!(matches!(source, FormError::DuplicateQuestion(_)));
        }
        other => panic!("expected row rejection, got {other:?}"),
    }
}

#[test]
fn importer_rejects_missing_columns() {
    let csv = "Question,Options\nDo you have a yard,Yes|No\n";
    assert!(matches!(
        FormTemplateImporter::from_reader(Cursor::new(csv), "broken"),
        Err(FormTemplateImportError::Csv(_))
    ));
}
