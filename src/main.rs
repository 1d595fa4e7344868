use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use assignmentpro::api::ApiError;
use assignmentpro::config::{self, load_config};
use assignmentpro::models::{Assignment, AssignmentStatus, Attachment, Role, Tier};
use assignmentpro::pages::{
    AdminDashboard, AdminSignupForm, EditPricing, LoginForm, PageError, PricingPage, PricingView,
    SignupForm, SubmitAssignmentForm, UserDashboard,
};
use assignmentpro::pages::pricing::PRICING_UNAVAILABLE;
use assignmentpro::routes::{menu, MenuAction, Route, RouteError};
use assignmentpro::session::Session;
use assignmentpro::startup::{build_state, start};
use assignmentpro::state::AppState;
use assignmentpro::storage::{create_storage, StorageError};
use assignmentpro::theme::ThemeMode;
use assignmentpro::utils::logger::{init_logging, LoggingError};
use assignmentpro::utils::notifier::ConsoleNotifier;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{requested} is not available to this session; it redirects to {rendered}")]
    Redirected { requested: Route, rendered: Route },
}

#[derive(Parser, Debug)]
#[command(
    name = "assignmentpro",
    version,
    about = "Command-line client for the AssignmentPro marketplace"
)]
struct Cli {
    /// YAML configuration file. `ASSIGNMENTPRO_*` variables override its values.
    #[arg(long, short, env = "ASSIGNMENTPRO_CONFIG", default_value = "./config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ASSIGNMENTPRO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session token.
    Logout,
    /// Show who the stored token belongs to.
    Whoami,
    /// Create an account.
    Signup(SignupArgs),
    /// Resolve a client route for the current session.
    Open { path: String },
    /// Show the navigation menu for the current session.
    Menu,
    Assignments(AssignmentsCommand),
    Pricing(PricingCommand),
    Theme(ThemeCommand),
    /// Print the configuration JSON schema.
    Schema,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "ASSIGNMENTPRO_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, required_unless_present = "admin")]
    phone: Option<String>,
    #[arg(long, required_unless_present = "admin")]
    address: Option<String>,
    /// Role requested on the regular registration endpoint (user or admin).
    #[arg(long, default_value = "user", conflicts_with = "admin")]
    role: Role,
    /// Create an administrator through the admin sign-up endpoint.
    #[arg(long)]
    admin: bool,
}

#[derive(Args, Debug)]
struct AssignmentsCommand {
    #[command(subcommand)]
    command: AssignmentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AssignmentsSubcommand {
    /// List your submissions, or every submission with `--all` (admins).
    List {
        #[arg(long)]
        all: bool,
    },
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        assignment_file: Option<PathBuf>,
        #[arg(long)]
        answer_key_file: Option<PathBuf>,
    },
    /// Change a submission's status (admins).
    Status { id: String, status: AssignmentStatus },
    Delete { id: String },
    /// Download both files of a submission (admins).
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PricingCommand {
    #[command(subcommand)]
    command: PricingSubcommand,
}

#[derive(Subcommand, Debug)]
enum PricingSubcommand {
    Show,
    /// Edit one tier (admins). Features are a comma separated list.
    Edit {
        tier: Tier,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        page_range: Option<String>,
        #[arg(long)]
        features: Option<String>,
    },
    /// Price of an assignment with the given number of pages.
    Quote { tier: Tier, pages: u32 },
}

#[derive(Args, Debug)]
struct ThemeCommand {
    #[command(subcommand)]
    command: ThemeSubcommand,
}

#[derive(Subcommand, Debug)]
enum ThemeSubcommand {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if matches!(cli.command, Command::Schema) {
        config::print_schema()?;
        return Ok(());
    }

    let config = Arc::new(load_config(&cli.config));
    init_logging(&config.logging)?;

    // The theme is purely local; it needs neither the backend nor a session.
    let command = match cli.command {
        Command::Theme(theme) => {
            let storage = create_storage(&config.storage);
            let mode = match theme.command {
                ThemeSubcommand::Show => ThemeMode::load(storage.as_ref()),
                ThemeSubcommand::Toggle => ThemeMode::toggle(storage.as_ref())?,
            };
            let palette = mode.palette();
            println!(
                "{} (background {} / {}, text {} / {})",
                mode,
                palette.background_default,
                palette.background_paper,
                palette.text_primary,
                palette.text_secondary
            );
            return Ok(());
        }
        other => other,
    };

    let state = build_state(config, Arc::new(ConsoleNotifier))?;
    let session = start(&state).await;

    match command {
        Command::Login { email, password } => {
            enter(&state, &session, Route::Login)?;
            let landing = LoginForm::new(email, password).submit(&state).await?;
            println!("Continue at {}", landing);
        }
        Command::Logout => {
            state.session.logout();
            println!("Logged out");
        }
        Command::Whoami => match session.identity() {
            Some(identity) => println!(
                "{} <{}> ({})",
                identity.name, identity.email, identity.role
            ),
            None => println!("Not logged in"),
        },
        Command::Signup(args) => {
            enter(&state, &session, Route::Signup)?;
            let next = if args.admin {
                AdminSignupForm {
                    name: args.name,
                    email: args.email,
                    password: args.password,
                }
                .submit(&state)
                .await?
            } else {
                SignupForm {
                    name: args.name,
                    email: args.email,
                    phone: args.phone.unwrap_or_default(),
                    password: args.password,
                    address: args.address.unwrap_or_default(),
                    role: args.role,
                }
                .submit(&state)
                .await?
            };
            println!("Account created. Continue at {}", next);
        }
        Command::Open { path } => {
            let navigation = state.router.navigate(&path, &session)?;
            for hop in &navigation.redirects {
                println!("-> {}", hop);
            }
            println!("{}", navigation.rendered);
        }
        Command::Menu => {
            for item in menu(&session) {
                match item.action {
                    MenuAction::Navigate(route) => println!("{:<20} {}", item.label, route),
                    MenuAction::Logout => println!("{:<20} assignmentpro logout", item.label),
                }
            }
        }
        Command::Assignments(assignments) => {
            run_assignments(&state, &session, assignments.command).await?
        }
        Command::Pricing(pricing) => run_pricing(&state, &session, pricing.command).await?,
        Command::Theme(_) | Command::Schema => {}
    }
    Ok(())
}

/// Refuses to act when the guards send this session somewhere else.
fn enter(state: &AppState, session: &Session, route: Route) -> Result<(), CliError> {
    let navigation = state.router.resolve(route, session)?;
    if navigation.rendered == route {
        Ok(())
    } else {
        Err(CliError::Redirected {
            requested: route,
            rendered: navigation.rendered,
        })
    }
}

async fn run_assignments(
    state: &AppState,
    session: &Session,
    command: AssignmentsSubcommand,
) -> Result<(), CliError> {
    match command {
        AssignmentsSubcommand::List { all: true } => {
            enter(state, session, Route::AdminDashboard)?;
            let mut page = AdminDashboard::open(state)?;
            print_assignments(page.load().await?);
        }
        AssignmentsSubcommand::List { all: false } => {
            enter(state, session, Route::Dashboard)?;
            let mut page = UserDashboard::open(state)?;
            print_assignments(page.load().await?);
        }
        AssignmentsSubcommand::Submit {
            title,
            description,
            price,
            assignment_file,
            answer_key_file,
        } => {
            enter(state, session, Route::SubmitAssignment)?;
            let form = SubmitAssignmentForm {
                title,
                description,
                price,
                assignment_file: read_attachment(assignment_file).await?,
                answer_key_file: read_attachment(answer_key_file).await?,
            };
            let next = form.submit(state).await?;
            println!("Continue at {}", next);
        }
        AssignmentsSubcommand::Status { id, status } => {
            enter(state, session, Route::AdminDashboard)?;
            let mut page = AdminDashboard::open(state)?;
            page.load().await?;
            page.change_status(&id, status).await?;
        }
        AssignmentsSubcommand::Delete { id } => {
            enter(state, session, Route::Dashboard)?;
            let mut page = UserDashboard::open(state)?;
            page.load().await?;
            page.delete(&id).await?;
            print_assignments(page.assignments());
        }
        AssignmentsSubcommand::Download { id, dir } => {
            enter(state, session, Route::AdminDashboard)?;
            let mut page = AdminDashboard::open(state)?;
            page.load().await?;
            let folder = page.download(&id, &dir).await?;
            println!("{}", folder.display());
        }
    }
    Ok(())
}

async fn run_pricing(
    state: &AppState,
    session: &Session,
    command: PricingSubcommand,
) -> Result<(), CliError> {
    match command {
        PricingSubcommand::Show => {
            enter(state, session, Route::Pricing)?;
            let mut page = PricingPage::open(state)?;
            page.load().await;
            match page.view() {
                PricingView::Plans(pricing) => {
                    for tier in Tier::ALL {
                        let plan = pricing.tier(tier);
                        println!("{} - {}/page ({})", tier, plan.price, plan.page_range);
                        println!("  {}", plan.description);
                        for feature in &plan.features {
                            println!("  * {}", feature);
                        }
                    }
                    println!("Next: {}", page.call_to_action());
                }
                PricingView::Unavailable => {
                    println!("{}", PRICING_UNAVAILABLE)
                }
                PricingView::Failed(message) => println!("{}", message),
                PricingView::Loading => {}
            }
        }
        PricingSubcommand::Quote { tier, pages } => {
            enter(state, session, Route::Pricing)?;
            let mut page = PricingPage::open(state)?;
            page.load().await;
            match page.quote(tier, pages) {
                Some(total) => println!("{} pages on {}: {}", pages, tier, total),
                None => println!("{}", PRICING_UNAVAILABLE),
            }
        }
        PricingSubcommand::Edit {
            tier,
            price,
            description,
            page_range,
            features,
        } => {
            enter(state, session, Route::EditPricing)?;
            let mut page = EditPricing::open(state)?;
            page.load().await?;
            if let Some(price) = price {
                page.set_price(tier, price);
            }
            if let Some(description) = description {
                page.set_description(tier, &description);
            }
            if let Some(page_range) = page_range {
                page.set_page_range(tier, &page_range);
            }
            if let Some(features) = features {
                page.set_features(tier, &features);
            }
            let outcome = page.save().await;
            outcome.result?;
            println!("Continue at {}", outcome.next);
        }
    }
    Ok(())
}

async fn read_attachment(path: Option<PathBuf>) -> Result<Option<Attachment>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    match Attachment::from_path(&path).await {
        Ok(attachment) => Ok(Some(attachment)),
        Err(source) => Err(CliError::ReadFile { path, source }),
    }
}

fn print_assignments(assignments: &[Assignment]) {
    if assignments.is_empty() {
        println!("No assignments");
        return;
    }
    for a in assignments {
        let submitter = a
            .user
            .as_ref()
            .map(|u| format!(" by {} <{}>", u.name, u.email))
            .unwrap_or_default();
        println!(
            "{:<26} {:<12} {:>8.2}  {}{}",
            a.id,
            a.status.as_str(),
            a.price,
            a.title,
            submitter
        );
    }
}
