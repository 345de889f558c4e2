use crate::infra::{catalog_service, InMemorySessionRepository};
use admission_form::admission::{AdmissionService, Evaluation, FormStep, SectionUpdate};
use admission_form::catalog::{option_sets, CatalogKind, CatalogService};
use admission_form::config::AppConfig;
use admission_form::error::AppError;
use admission_form::{ApplicantRecord, FieldValidator};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding an applicant record
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Date used for the age check (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Restrict select fields to the configured catalogs
    #[arg(long)]
    pub(crate) check_options: bool,
    /// Print the full evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// Catalog to list (states, careers, disabilities, municipalities...)
    pub(crate) kind: String,
    /// State whose municipalities are listed
    #[arg(long)]
    pub(crate) state_id: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date used for the age check (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        record,
        today,
        check_options,
        json,
    } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&record)?;
    let applicant: ApplicantRecord = serde_json::from_str(&raw)?;

    let mut validator = FieldValidator::new(config.validation.clone());
    if check_options {
        let catalogs = catalog_service(&config.catalog)?;
        validator = validator.with_options(option_sets(&catalogs).await);
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let evaluation = validator.evaluate_as_of(&applicant, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        println!("Applicant record: {}", record.display());
        render_evaluation(&evaluation);
    }
    Ok(())
}

pub(crate) async fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalogs = catalog_service(&config.catalog)?;

    let listing = if args.kind.trim().eq_ignore_ascii_case("municipalities") {
        let state_id = args
            .state_id
            .unwrap_or(admission_form::catalog::fallback::MORELOS_STATE_ID);
        catalogs.municipalities(state_id).await
    } else {
        let Some(kind) = CatalogKind::parse(&args.kind) else {
            let known: Vec<&str> = CatalogKind::listable()
                .into_iter()
                .map(CatalogKind::key)
                .collect();
            println!(
                "Unknown catalog `{}`. Known catalogs: {}, municipalities",
                args.kind,
                known.join(", ")
            );
            return Ok(());
        };
        catalogs.list(kind).await
    };

    let source = if listing.used_fallback {
        "built-in list"
    } else {
        "catalog source"
    };
    println!("{} ({} entries, {source})", listing.kind, listing.entries.len());
    if let Some(error) = &listing.error {
        println!("  remote lookup failed: {error}");
    }
    for entry in &listing.entries {
        match &entry.abbreviation {
            Some(abbreviation) => println!("  {:>3}  {} ({abbreviation})", entry.id, entry.name),
            None => println!("  {:>3}  {}", entry.id, entry.name),
        }
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let catalogs = CatalogService::offline();
    let validator = FieldValidator::default().with_options(option_sets(&catalogs).await);
    let service = AdmissionService::new(Arc::new(InMemorySessionRepository::default()), validator);

    println!("Admission form demo (as of {today})");
    let session = service.start()?;
    println!("Started session {}", session.session_id);

    for (step, updates) in demo_steps()? {
        for update in updates {
            let section = update.section();
            let snapshot = service.update(&session.session_id, update)?;
            let evaluation = service.evaluate_record(&snapshot.record, Some(today));
            println!(
                "- saved {:<22} completion {:>3}%",
                section.label(),
                evaluation.completion_percent
            );
        }

        let decision = service.next_step(&session.session_id, step, Some(today))?;
        match decision.next_step {
            Some(next) => println!("  {step} complete, continue to {next}"),
            None if decision.can_advance => println!("  {step} complete, form ready to submit"),
            None => {
                println!("  {step} blocked:");
                for (key, message) in &decision.blocking {
                    println!("    {key}: {message}");
                }
            }
        }
    }

    service.discard(&session.session_id)?;
    Ok(())
}

fn render_evaluation(evaluation: &Evaluation) {
    println!(
        "Completion: {}% ({}/{} required fields valid)",
        evaluation.completion_percent, evaluation.valid_fields, evaluation.required_fields
    );

    println!("Sections:");
    for entry in evaluation.section_progress() {
        let marker = if entry.is_valid { "ok" } else { "pending" };
        println!(
            "  - {:<22} {:>2}/{:<2} {marker}",
            entry.label, entry.valid_fields, entry.required_fields
        );
    }

    println!("Steps:");
    for step in FormStep::ordered() {
        let marker = if evaluation.is_step_valid(step) {
            "open"
        } else {
            "closed"
        };
        println!("  - {:<22} {marker}", step.label());
    }

    let messages = evaluation.messages();
    if !messages.is_empty() {
        println!("Field messages:");
        for (key, message) in messages {
            println!("  - {key}: {message}");
        }
    }
}

fn demo_steps() -> Result<Vec<(FormStep, Vec<SectionUpdate>)>, AppError> {
    let personal = vec![
        serde_json::from_value(json!({
            "section": "personal_general",
            "fields": {
                "first_name": "Ana Sofía",
                "first_surname": "Martínez",
                "second_surname": "Ocampo",
                "curp": "MAOA060914MMSRCNA1",
                "birth_date": "2006-09-14",
                "sex": "femenino",
                "nationality": "mexicana",
                "birth_state": "Morelos",
                "birth_municipality": "Yautepec",
                "civil_status": "Soltero(a)",
                "native_language": "Español",
                "has_children": "no"
            }
        }))?,
        serde_json::from_value(json!({
            "section": "address",
            "fields": {
                "street": "Calle Hidalgo",
                "exterior_number": "8",
                "neighborhood": "Centro",
                "state": "Morelos",
                "municipality": "Yautepec",
                "postal_code": "62730",
                "email": "ana.martinez@example.mx"
            }
        }))?,
        serde_json::from_value(json!({
            "section": "supplementary",
            "fields": {
                "disabilities": ["Ninguna"],
                "parent_indigenous_languages": ["Ninguna"],
                "indigenous_languages": ["Ninguna"]
            }
        }))?,
        serde_json::from_value(json!({
            "section": "income",
            "fields": { "family_income": "11000", "employed": "no" }
        }))?,
    ];
    let career = vec![serde_json::from_value(json!({
        "section": "career",
        "fields": {
            "desired_program": "Ingeniería en Sistemas Computacionales",
            "awareness_channel": "Redes sociales (Facebook, Instagram, TikTok)",
            "preference_rank": "Primera opción"
        }
    }))?];
    // The confirmation typo keeps the last step closed.
    let academic = vec![serde_json::from_value(json!({
        "section": "academic_history",
        "fields": {
            "school_type": "Bachillerato General",
            "school_name": "Preparatoria Yautepec",
            "school_code": "17EBH0012Z",
            "school_code_confirmation": "17EBH0021Z",
            "state": "Morelos",
            "municipality": "Yautepec",
            "gpa": "8.9",
            "has_scholarship": "no"
        }
    }))?];

    Ok(vec![
        (FormStep::Personal, personal),
        (FormStep::Career, career),
        (FormStep::AcademicHistory, academic),
    ])
}
