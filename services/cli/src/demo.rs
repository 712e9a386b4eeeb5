use clap::Args;
use pet_adoption::config::{AppConfig, FeedbackSinkKind};
use pet_adoption::error::AppError;
use pet_adoption::telemetry;
use pet_adoption::workflows::adoption::{
    default_adoption_form, Adopter, AdopterId, AdoptionMediator, ConcreteAdoptionMediator,
    ConfiguredFeedbackSender, Form, FormTemplateImporter, InMemoryAdoptionRepository, Pet, PetId,
    Question, Shelter, ShelterId,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const SHELTER: &str = "happy-paws";
const PET: &str = "rex";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Feedback sink for denials: console or file. Overrides APP_FEEDBACK_SINK.
    #[arg(long, value_parser = FeedbackSinkKind::parse)]
    pub(crate) feedback_sink: Option<FeedbackSinkKind>,
    /// Append denial feedback to this file. Overrides APP_FEEDBACK_LOG.
    #[arg(long)]
    pub(crate) feedback_log: Option<PathBuf>,
    /// CSV template (Question,Options,Preferred Answer) to use instead of the default form.
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct FormShowArgs {
    /// CSV template to import. Prints the default template when omitted.
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Name for the imported form.
    #[arg(long, default_value = "Imported Adoption Form")]
    pub(crate) name: String,
}

#[derive(Serialize)]
struct FormView<'a> {
    name: &'a str,
    questions: Vec<QuestionView<'a>>,
}

#[derive(Serialize)]
struct QuestionView<'a> {
    question: &'a str,
    options: &'a [String],
    preferred_answer: &'a str,
}

impl<'a> FormView<'a> {
    fn new(form: &'a Form) -> Self {
        Self {
            name: form.name(),
            questions: form.iter().map(QuestionView::new).collect(),
        }
    }
}

impl<'a> QuestionView<'a> {
    fn new(question: &'a Question) -> Self {
        Self {
            question: question.name(),
            options: question.options(),
            preferred_answer: question.preferred_answer(),
        }
    }
}

pub(crate) fn run_form_show(args: FormShowArgs) -> Result<(), AppError> {
    let form = load_template(args.csv, &args.name)?;
    println!("{}", serde_json::to_string_pretty(&FormView::new(&form))?);
    Ok(())
}

fn load_template(csv: Option<PathBuf>, name: &str) -> Result<Form, AppError> {
    match csv {
        Some(path) => Ok(FormTemplateImporter::from_path(path, name)?),
        None => Ok(default_adoption_form()?),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(sink) = args.feedback_sink {
        config.feedback.sink = sink;
    }
    if let Some(path) = args.feedback_log {
        config.feedback.log_path = path;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        environment = ?config.environment,
        sink = ?config.feedback.sink,
        "starting adoption demo"
    );

    let repository = Arc::new(InMemoryAdoptionRepository::new());
    let feedback = Arc::new(ConfiguredFeedbackSender::from_config(&config.feedback));
    let mediator = ConcreteAdoptionMediator::new(repository, feedback);

    let template = load_template(args.template, "Demo Adoption Form")?;
    let shelter = ShelterId(SHELTER.to_string());
    let pet = PetId(PET.to_string());

    mediator.register_shelter(Shelter::new(SHELTER, "Happy Paws Shelter").with_pet_type("Dog"))?;
    mediator.register_pet(Pet::new(PET, shelter.clone(), "Dog"))?;
    let pet_form = template.clone_as(format!("{} for {PET}", template.name()));
    let rex = mediator.assign_form(&pet, pet_form)?;

    println!("Pet adoption demo");
    println!(
        "Shelter {} lists {} with form '{}' ({} questions)",
        shelter,
        rex.id(),
        rex.form().name(),
        rex.form().len()
    );

    let adopters = [("bob", "Bob"), ("alice", "Alice"), ("carol", "Carol")];
    for (username, name) in adopters {
        mediator.register_adopter(Adopter::new(username, name))?;
    }

    println!("\nApplications");
    for (index, (username, _)) in adopters.iter().enumerate() {
        let answers = demo_answers(rex.form(), index);
        let applicant = AdopterId(username.to_string());
        match mediator.create_application(&applicant, &pet, answers.as_slice()) {
            Ok(application) => println!(
                "  @{} submitted, score {:.0}%",
                username,
                application.score() * 100.0
            ),
            Err(err) => println!("  @{} rejected: {}", username, err),
        }
    }

    let ranked = mediator.applications_for_pet(&pet)?;
    let Some(best) = ranked.first() else {
        println!("\nNo applications to decide on");
        return Ok(());
    };

    let chosen = best.id().clone();
    println!("\nApproving {} and denying the others", chosen);
    let outcome = mediator.finalize_adoption(&chosen, "Another family was a better match")?;

    let adopted = mediator.pet(&pet)?;
    println!(
        "  {} is now {} (tutor: {})",
        adopted.id(),
        adopted.status().label(),
        adopted
            .tutor()
            .map(ToString::to_string)
            .unwrap_or_else(|| "none".to_string())
    );
    println!("  Denied applications: {}", outcome.denied.len());

    println!("\nPets at {}", shelter);
    for listed in mediator.pets_for_shelter(&shelter)? {
        println!(
            "  {} ({}): {}, {} applications",
            listed.id(),
            listed.pet_type(),
            listed.status().label(),
            listed.applications()
        );
    }

    let statuses: Vec<_> = mediator
        .applications_for_pet(&pet)?
        .iter()
        .map(|application| application.status_view())
        .collect();
    println!(
        "\nApplication statuses:\n{}",
        serde_json::to_string_pretty(&statuses)?
    );

    println!("\nNotifications");
    for notification in mediator.inbox().all() {
        println!("  [{}] {}", notification.recipient, notification.message);
    }

    Ok(())
}

/// First adopter answers every preferred option; later ones drift toward the last option.
fn demo_answers(form: &Form, adopter_index: usize) -> Vec<String> {
    form.iter()
        .enumerate()
        .map(|(position, question)| {
            if position < form.len().saturating_sub(adopter_index) {
                question.preferred_answer().to_string()
            } else {
                question
                    .options()
                    .last()
                    .cloned()
                    .unwrap_or_else(|| question.preferred_answer().to_string())
            }
        })
        .collect()
}
