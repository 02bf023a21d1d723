mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use facility_report_adapters::{
    load_photo, present_options, present_reduction, present_status, write_jpeg,
    DryRunDelivery, EmailJsClient, ImageCrateCodec, SystemClock,
};
use facility_report_application::{
    ApplicationError, AttachPhotoCommand, DeliveryClient, FormSession, ImageReducer,
    PhotoOutcome, SetFieldCommand, SubmitReportCommand,
};
use facility_report_domain::{FormConfig, FormVariant, ReportField};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "facility-report",
    version,
    about = "File facility maintenance reports with a compressed photo attached"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a photo the way a submission would and print each attempt
    Compress(CompressArgs),
    /// Fill in a report and deliver it
    Submit(SubmitArgs),
    /// List the choices offered by a form variant
    Options(OptionsArgs),
}

#[derive(Args, Debug)]
struct CompressArgs {
    photo: PathBuf,
    /// Write the compressed JPEG here
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    location: String,
    /// Free text used when the location is "Other"/"Others"
    #[arg(long, default_value = "")]
    location_other: String,
    #[arg(long, default_value = "")]
    issue_type: String,
    /// Free text used when the issue type is "Other"/"Others"
    #[arg(long, default_value = "")]
    issue_type_other: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Low, Medium, High or Emergency
    #[arg(long, default_value = "")]
    urgency: String,
    #[arg(long, default_value = "")]
    contact_name: String,
    #[arg(long, default_value = "")]
    contact_email: String,
    #[arg(long, default_value = "")]
    contact_phone: String,
    #[arg(long)]
    photo: Option<PathBuf>,
    #[arg(long)]
    variant: Option<FormVariant>,
    /// Log the request instead of sending it
    #[arg(long)]
    dry_run: bool,
}

impl SubmitArgs {
    fn fields(&self) -> [(ReportField, &str); 9] {
        [
            (ReportField::Location, self.location.as_str()),
            (ReportField::LocationOther, self.location_other.as_str()),
            (ReportField::IssueType, self.issue_type.as_str()),
            (ReportField::IssueTypeOther, self.issue_type_other.as_str()),
            (ReportField::Description, self.description.as_str()),
            (ReportField::Urgency, self.urgency.as_str()),
            (ReportField::ContactName, self.contact_name.as_str()),
            (ReportField::ContactEmail, self.contact_email.as_str()),
            (ReportField::ContactPhone, self.contact_phone.as_str()),
        ]
    }
}

#[derive(Args, Debug)]
struct OptionsArgs {
    #[arg(long)]
    variant: Option<FormVariant>,
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

impl From<ApplicationError> for CommandError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Validation(_)
            | ApplicationError::InvalidInput(_)
            | ApplicationError::Domain(_)
            | ApplicationError::OversizedInput { .. } => Self::Usage(error.to_string()),
            other => Self::Runtime(other.to_string()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("invalid configuration: {message}");
            return ExitCode::from(2);
        }
    };
    logging::init_logging(config.log_json);

    match run_command(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(message)) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(message)) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

async fn run_command(command: Commands, config: &AppConfig) -> Result<(), CommandError> {
    match command {
        Commands::Compress(args) => compress(args, config),
        Commands::Submit(args) => submit(args, config).await,
        Commands::Options(args) => {
            let form = FormConfig::for_variant(args.variant.unwrap_or(config.variant));
            println!("{}", present_options(&form));
            Ok(())
        }
    }
}

fn compress(args: CompressArgs, config: &AppConfig) -> Result<(), CommandError> {
    let form = FormConfig::for_variant(config.variant);
    let raw = load_photo(&args.photo, form.reduction.max_input_bytes)?;
    let reducer = ImageReducer::new(Arc::new(ImageCrateCodec), form.reduction);
    let reduction = reducer.reduce(&raw)?;

    println!("{}", present_reduction(&reduction));
    if let Some(out) = args.out {
        write_jpeg(&reduction.image, &out)?;
        println!("wrote {}", out.display());
    }
    Ok(())
}

async fn submit(args: SubmitArgs, config: &AppConfig) -> Result<(), CommandError> {
    let delivery: Arc<dyn DeliveryClient> = if args.dry_run {
        Arc::new(DryRunDelivery)
    } else {
        let missing = config.missing_credentials();
        if !missing.is_empty() {
            return Err(CommandError::Usage(format!(
                "missing EmailJS credentials: {} (or pass --dry-run)",
                missing.join(", ")
            )));
        }
        Arc::new(EmailJsClient::new(&config.emailjs_url))
    };

    let form = FormConfig::for_variant(args.variant.unwrap_or(config.variant));
    let session = FormSession::new(
        form,
        config.credentials(),
        Arc::new(ImageCrateCodec),
        delivery,
        Arc::new(SystemClock),
    )?;

    for (field, value) in args.fields() {
        session.set_field(SetFieldCommand {
            field,
            value: value.to_string(),
        })?;
    }

    if let Some(path) = &args.photo {
        let raw = load_photo(path, session.config().reduction.max_input_bytes)?;
        if let PhotoOutcome::Attached(reduction) =
            session.attach_photo(AttachPhotoCommand { image: raw }).await?
        {
            info!(photo = %path.display(), "{}", present_reduction(&reduction));
        }
    }

    let result = session.submit(SubmitReportCommand).await;
    let state = session
        .snapshot()
        .map_err(|error| CommandError::Runtime(error.to_string()))?;
    if let Some(banner) = present_status(&state.status) {
        println!("{banner}");
    }

    let receipt = result?;
    println!(
        "delivered with status {} ({:.2} KB payload)",
        receipt.status, receipt.payload_kb
    );
    Ok(())
}
