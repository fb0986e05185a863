use clap::Parser;
use course_registrar::app::export::{export_schedule, ExportFormat};
use course_registrar::app::session::ActionOutcome;
use course_registrar::domain::ports::Storage;
use course_registrar::utils::error::ErrorSeverity;
use course_registrar::utils::{logger, validation::Validate};
use course_registrar::{
    CliConfig, LocalStorage, RegistrarError, Session, SessionConfig, SessionReport,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting registrar");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Registration session failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(config: &CliConfig) -> Result<(), RegistrarError> {
    config.validate()?;

    tracing::info!("📁 Loading session from: {}", config.config);
    let session_config = SessionConfig::from_file(&config.config)?;
    session_config.validate()?;

    let storage = LocalStorage::beside(&config.config);
    let catalogue = session_config.load_catalogue(&storage).await?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no actions will be applied");
        for (index, action) in session_config.actions.iter().enumerate() {
            let known = catalogue.get(&action.course).is_some();
            println!(
                "{:>3}. {} {}{}",
                index + 1,
                action.action,
                action.course,
                if known { "" } else { " (not in catalogue)" }
            );
        }
        return Ok(());
    }

    let mut session = Session::new(&session_config, catalogue);
    let report = session.run(&session_config.actions)?;
    print_report(&report);

    if let Some(export_path) = &config.export {
        let format = ExportFormat::from_path(export_path).ok_or_else(|| {
            RegistrarError::InvalidConfigValueError {
                field: "export".to_string(),
                value: export_path.clone(),
                reason: "Unsupported format. Valid formats: csv, tsv".to_string(),
            }
        })?;
        let data = export_schedule(session.engine(), config.include_pending, format)?;
        LocalStorage::new(".").write_file(export_path, &data).await?;
        tracing::info!("📁 Schedule exported to: {}", export_path);
        println!("📁 Schedule exported to: {}", export_path);
    }

    Ok(())
}

fn print_report(report: &SessionReport) {
    for record in &report.actions {
        let summary = match &record.outcome {
            ActionOutcome::Added => "added to pending".to_string(),
            ActionOutcome::Rejected { message, .. } => format!("rejected: {}", message),
            ActionOutcome::Confirmed(outcome) => format!("confirm: {:?}", outcome),
            ActionOutcome::Removed { was_pending } => {
                format!("removed (was pending: {})", was_pending)
            }
            ActionOutcome::Dropped { was_registered } => {
                format!("dropped (was registered: {})", was_registered)
            }
        };
        println!("{} {}: {}", record.action, record.course, summary);
    }

    println!();
    println!("Registered:");
    for course in &report.registered {
        println!(
            "  {} {} ({} cr) {}",
            course.course.code, course.course.title, course.course.credits, course.course.schedule
        );
    }
    println!("Pending:");
    for course in &report.pending {
        println!(
            "  {} {} ({} cr) {}",
            course.course.code, course.course.title, course.course.credits, course.course.schedule
        );
    }

    println!();
    println!(
        "Credits: {} registered + {} pending = {} ({:?})",
        report.credits.registered, report.credits.pending, report.credits.combined, report.load_status
    );
    println!(
        "Degree progress: {} / {} credits ({:.1}%), {} remaining",
        report.progress.completed_credits,
        report.progress.graduation_credits,
        report.progress.percent_complete,
        report.progress.remaining_credits
    );
    for requirement in &report.progress.requirements {
        println!(
            "  {}: {} / {} credits",
            requirement.category, requirement.completed_credits, requirement.required_credits
        );
    }
}
