use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use folio::{Config, ContentService};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Content client for a Strapi-backed portfolio site",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// CMS base URL (the /api prefix is added per request)
    #[arg(long, env = "FOLIO_CMS_URL", global = true)]
    cms_url: Option<String>,

    /// CMS API bearer token
    #[arg(long, env = "FOLIO_CMS_TOKEN", global = true)]
    api_token: Option<String>,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, env = "FOLIO_LOG", global = true)]
    log: Option<String>,

    /// Path to the TOML config file (default: ./folio.toml)
    #[arg(long, env = "FOLIO_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Suppress log output. JSON results are unaffected.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one resource (or everything) and print it as JSON.
    ///
    /// Examples:
    ///   folio fetch hero
    ///   folio fetch educations
    ///   folio fetch
    Fetch {
        /// Resource to fetch; omit to fetch everything.
        resource: Option<Resource>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Resource {
    Hero,
    ProfessionalExperiences,
    Educations,
    CoreCompetencies,
    Certifications,
    ToolCategories,
    Projects,
    ResearchPublications,
    Achievements,
    ContactInformation,
    About,
    SoftSkills,
    CvSection,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::new(args.cms_url, args.api_token, args.log, args.config);
    setup_logging(&config.log, args.quiet);

    let service = ContentService::new(&config)?;

    match args.command {
        Command::Fetch { resource } => {
            let value = match resource {
                Some(resource) => fetch_one(&service, resource).await?,
                None => fetch_all(&service).await?,
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

async fn fetch_one(service: &ContentService, resource: Resource) -> Result<Value> {
    let value = match resource {
        Resource::Hero => serde_json::to_value(service.hero().await)?,
        Resource::ProfessionalExperiences => {
            serde_json::to_value(service.professional_experiences().await)?
        }
        Resource::Educations => serde_json::to_value(service.educations().await)?,
        Resource::CoreCompetencies => serde_json::to_value(service.core_competencies().await)?,
        Resource::Certifications => serde_json::to_value(service.certifications().await)?,
        Resource::ToolCategories => serde_json::to_value(service.tool_categories().await)?,
        Resource::Projects => serde_json::to_value(service.projects().await)?,
        Resource::ResearchPublications => {
            serde_json::to_value(service.research_publications().await)?
        }
        Resource::Achievements => serde_json::to_value(service.achievements().await)?,
        Resource::ContactInformation => serde_json::to_value(service.contact_information().await)?,
        Resource::About => serde_json::to_value(service.about().await)?,
        Resource::SoftSkills => serde_json::to_value(service.soft_skills().await)?,
        Resource::CvSection => serde_json::to_value(service.cv_section().await)?,
    };
    Ok(value)
}

/// Snapshot of every resource, keyed the way the site consumes them.
async fn fetch_all(service: &ContentService) -> Result<Value> {
    Ok(json!({
        "hero": service.hero().await,
        "professionalExperiences": service.professional_experiences().await,
        "educations": service.educations().await,
        "coreCompetencies": service.core_competencies().await,
        "certifications": service.certifications().await,
        "toolCategories": service.tool_categories().await,
        "projects": service.projects().await,
        "researchPublications": service.research_publications().await,
        "achievements": service.achievements().await,
        "contactInformation": service.contact_information().await,
        "about": service.about().await,
        "softSkills": service.soft_skills().await,
        "cvSection": service.cv_section().await,
    }))
}

fn setup_logging(log_level: &str, quiet: bool) {
    let filter = if quiet { "error" } else { log_level };
    // Logs go to stderr so stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
