use clap::{Parser, Subcommand};
use lmn_backend::{HttpBackend, MockBackend};
use lmn_core::{
    format_long_date, missing_required_fields, render_letter, request_timeout_from_env_value,
    use_mock_data_from_env_value, wizard_policy_from_env_value, CoreConfig, DraftLetter,
    LetterBackend, WizardController, WizardPolicy,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lmn")]
#[command(about = "Letter of medical necessity CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a draft letter as plain text
    Render {
        /// Path to a draft letter JSON file
        draft: PathBuf,
        /// Print Markdown instead of plain text
        #[arg(long)]
        markdown: bool,
    },
    /// Export a draft letter as a PDF
    Export {
        /// Path to a draft letter JSON file
        draft: PathBuf,
        /// Output directory (defaults to LMN_EXPORT_DIR or ./exports)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List required fields still missing from a draft
    Check {
        /// Path to a draft letter JSON file
        draft: PathBuf,
    },
    /// List the letter templates for a product
    Templates {
        /// Product id
        product_id: String,
        /// Use the built-in demo data instead of the backend
        #[arg(long)]
        mock: bool,
    },
    /// Format a YYYY-MM-DD date the way letters print it
    FormatDate {
        /// Date to format
        date: String,
    },
}

fn read_draft(path: &Path) -> anyhow::Result<DraftLetter> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn config_from_env() -> anyhow::Result<CoreConfig> {
    let defaults = CoreConfig::default();
    let api_base_url = std::env::var("LMN_API_BASE_URL")
        .unwrap_or_else(|_| defaults.api_base_url().to_string());
    let export_dir = std::env::var("LMN_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| defaults.export_dir().to_path_buf());

    Ok(CoreConfig::new(
        api_base_url,
        request_timeout_from_env_value(std::env::var("LMN_REQUEST_TIMEOUT_SECS").ok())?,
        use_mock_data_from_env_value(std::env::var("LMN_USE_MOCK_DATA").ok())?,
        wizard_policy_from_env_value(std::env::var("LMN_WIZARD_POLICY").ok())?,
        export_dir,
    )?)
}

/// Writes the PDF for `draft` into `out_dir` and returns the file path.
///
/// Under [`WizardPolicy::RequireComplete`] an incomplete draft is refused and nothing is
/// written.
fn export_draft(
    draft: &DraftLetter,
    out_dir: &Path,
    policy: WizardPolicy,
) -> anyhow::Result<PathBuf> {
    WizardController::new(policy).ensure_complete(draft)?;
    let letter = render_letter(draft);
    let document = lmn_export::export_letter(Some(&letter))?
        .ok_or_else(|| anyhow::anyhow!("nothing to export"))?;
    Ok(document.save_to(out_dir)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render { draft, markdown }) => match read_draft(&draft) {
            Ok(letter) => {
                let rendered = render_letter(&letter);
                if markdown {
                    println!("{}", rendered.to_markdown());
                } else {
                    println!("{}", rendered.to_plain_text());
                }
            }
            Err(e) => eprintln!("Error reading draft: {}", e),
        },
        Some(Commands::Export { draft, out }) => {
            let cfg = config_from_env()?;
            let out_dir = out.unwrap_or_else(|| cfg.export_dir().to_path_buf());
            match read_draft(&draft)
                .and_then(|letter| export_draft(&letter, &out_dir, cfg.wizard_policy()))
            {
                Ok(path) => println!("Exported letter to {}", path.display()),
                Err(e) => eprintln!("Error exporting letter: {}", e),
            }
        }
        Some(Commands::Check { draft }) => match read_draft(&draft) {
            Ok(letter) => {
                let missing = missing_required_fields(&letter);
                if missing.is_empty() {
                    println!("All required fields are present.");
                } else {
                    for field in missing {
                        println!("Step {}: {}", field.step().number(), field.label());
                    }
                }
            }
            Err(e) => eprintln!("Error reading draft: {}", e),
        },
        Some(Commands::Templates { product_id, mock }) => {
            let cfg = config_from_env()?;
            let backend: Box<dyn LetterBackend> = if mock {
                Box::new(MockBackend::new())
            } else {
                Box::new(HttpBackend::new(&cfg, None)?)
            };
            match backend.get_templates(&product_id).await {
                Ok(templates) if templates.is_empty() => println!("No templates found."),
                Ok(templates) => {
                    for template in templates {
                        println!(
                            "ID: {}, Name: {}, Default: {}",
                            template.id, template.name, template.is_default
                        );
                    }
                }
                Err(e) => eprintln!("Error loading templates: {}", e),
            }
        }
        Some(Commands::FormatDate { date }) => {
            println!("{}", format_long_date(&date));
        }
        None => {
            println!("Use 'lmn --help' for commands");
        }
    }

    Ok(())
}
