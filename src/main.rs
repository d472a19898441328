use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gitops_patcher::{patch, telemetry, PatchOptions, PatchOutcome};
use similar::{ChangeTag, TextDiff};

#[derive(Parser)]
#[command(name = "gitops-patcher")]
#[command(about = "Patch values files in GitOps repositories via the GitHub or GitLab API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch a field in an application's values file and commit the change
    Patch {
        /// Name of the application whose values file is patched
        application: String,

        /// Field to patch: a `.`-prefixed path (`.image.tag`) or a bare
        /// field name (`tag`, patching every occurrence)
        patch_field: String,

        /// Value to write into the field
        patch_value: String,

        /// Base URL of the git system (e.g. https://gitlab.com)
        #[arg(short, long, env = "GITOPS_BASE_URL", default_value = "https://github.com")]
        url: String,

        /// Access token with API permissions
        #[arg(short = 't', long, env = "GITOPS_AT", hide_env_values = true)]
        access_token: String,

        /// Repository holding the gitops tree (e.g. org/deployments)
        #[arg(long, env = "GITOPS_REPO")]
        repo: String,

        /// Branch to commit to (defaults to the repository's default branch)
        #[arg(long, env = "GITOPS_BRANCH")]
        branch: Option<String>,

        /// Directory where the applications are stored
        #[arg(long, env = "GITOPS_APPLICATIONS_DIR", default_value = "applications")]
        applications_dir: String,

        /// Values file to patch
        #[arg(long, env = "GITOPS_VALUES_FILE", default_value = "values.yaml")]
        values_file: String,

        /// Commit message (replaces the generated one)
        #[arg(short, long)]
        message: Option<String>,

        /// User to act on behalf of, prefixed to the commit message
        #[arg(long)]
        behalf: Option<String>,

        /// Compute the patch but do not commit
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show a unified diff of the change
        #[arg(short, long)]
        diff: bool,

        /// Increased console output
        #[arg(long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{} {error}", "ERROR:".red().bold());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Patch {
            application,
            patch_field,
            patch_value,
            url,
            access_token,
            repo,
            branch,
            applications_dir,
            values_file,
            message,
            behalf,
            dry_run,
            diff,
            verbose,
        } => {
            telemetry::init_tracing(verbose);

            let options = PatchOptions {
                url,
                access_token,
                repo,
                branch,
                applications_dir,
                values_file,
                application,
                patch_field,
                patch_value,
                message,
                behalf,
                dry_run,
            };

            let outcome = patch(&options).await?;
            report_outcome(&outcome, diff);
            Ok(())
        }
    }
}

fn report_outcome(outcome: &PatchOutcome, show_diff: bool) {
    match outcome {
        PatchOutcome::Committed {
            file_path,
            branch,
            commit_id,
            original,
            patched,
        } => {
            println!(
                "{} Patched {} on {} ({})",
                "✓".green(),
                file_path,
                branch,
                commit_id
            );
            if show_diff {
                display_diff(file_path, original, patched);
            }
        }
        PatchOutcome::Unchanged { file_path } => {
            println!("{} {}: no changes to commit", "⊙".yellow(), file_path);
        }
        PatchOutcome::DryRun {
            file_path,
            original,
            patched,
        } => {
            println!("{} would patch {}", "[DRY RUN]".cyan(), file_path);
            if show_diff {
                display_diff(file_path, original, patched);
            }
        }
    }
}

/// Show a unified diff between the remote and the patched content.
fn display_diff(file: &str, original: &str, modified: &str) {
    println!("\n{}", format!("--- {file} (remote)").dimmed());
    println!("{}", format!("+++ {file} (patched)").dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{change}").red(),
            ChangeTag::Insert => format!("+{change}").green(),
            ChangeTag::Equal => format!(" {change}").normal(),
        };
        print!("{sign}");
    }
}
