//! Command-line interface.

use std::fmt::Write as _;

use clap::{Parser, Subcommand};
use rocket_application::{
    ApplicationError, ApplicationResult, BookingEvent, CredentialStore, DetailsUpdate, Network,
    PageUpdate, RequestMore, SessionStatus,
};
use rocket_domain::{DomainError, LaunchDetails, LaunchId, SESSION_KEY};
use tokio::sync::mpsc;

const DEFAULT_PAGES: usize = 2;

#[derive(Parser)]
#[command(name = "rocket-reserver")]
#[command(version, about = "Browse and book launches on the launch booking service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The requested command; listing launches when none was given.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Launches {
            pages: DEFAULT_PAGES,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List launches, a page at a time
    Launches {
        /// Maximum number of pages to fetch
        #[arg(default_value_t = DEFAULT_PAGES)]
        pages: usize,
    },
    /// Show one launch
    Details {
        /// Launch identifier
        #[arg(value_parser = parse_launch_id)]
        id: LaunchId,
    },
    /// Book the launch, or cancel it when already booked
    Toggle {
        /// Launch identifier
        #[arg(value_parser = parse_launch_id)]
        id: LaunchId,
    },
    /// Log in and store the session token
    Login {
        /// Account email address
        email: String,
    },
    /// Forget the stored session token
    Logout,
    /// Report whether a session token is stored
    Status,
}

fn parse_launch_id(value: &str) -> Result<LaunchId, DomainError> {
    LaunchId::parse(value)
}

impl Command {
    /// Runs the command against `network`.
    ///
    /// # Errors
    ///
    /// Returns the first failure reported by the session layer.
    pub async fn run(self, network: &Network) -> ApplicationResult<()> {
        match self {
            Self::Launches { pages } => list_launches(network, pages).await,
            Self::Details { id } => {
                let details = load_details(network, id).await?;
                println!("{}", describe(&details));
                Ok(())
            }
            Self::Toggle { id } => toggle_booking(network, id).await,
            Self::Login { email } => login(network, &email).await,
            Self::Logout => {
                let removed = network.credentials().remove(SESSION_KEY)?;
                println!("{}", if removed.is_some() { "Logged out" } else { "Not logged in" });
                Ok(())
            }
            Self::Status => {
                let token = network.credentials().get(SESSION_KEY);
                println!("{}", SessionStatus::of(token.as_ref()).display_message());
                Ok(())
            }
        }
    }
}

async fn list_launches(network: &Network, pages: usize) -> ApplicationResult<()> {
    let mut pager = network.launch_pager();
    let (tx, mut rx) = mpsc::unbounded_channel();

    for _ in 0..pages {
        let sender = tx.clone();
        match pager.request_more(move |completion| {
            let _ = sender.send(completion);
        }) {
            RequestMore::Issued(_) => {}
            RequestMore::AlreadyFetching | RequestMore::Exhausted => break,
        }

        let completion = rx.recv().await.ok_or(ApplicationError::Cancelled)?;
        match pager.apply(completion) {
            PageUpdate::Loaded { errors, .. } => {
                for error in errors {
                    tracing::warn!(%error, "page delivered with errors");
                }
            }
            PageUpdate::Failed(error) => return Err(error.into()),
            PageUpdate::Stale => {}
        }
    }

    for launch in pager.launches() {
        let booked = if launch.is_booked { " [booked]" } else { "" };
        let mission = launch.mission_name().unwrap_or("(unnamed)");
        println!("{:>4}  {mission}{booked}", launch.id.as_str());
    }
    if pager.state().has_more() {
        println!("(more launches available)");
    }
    Ok(())
}

async fn load_details(network: &Network, id: LaunchId) -> ApplicationResult<LaunchDetails> {
    let mut loader = network.launch_details(id.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();

    loader.load(false, move |completion| {
        let _ = tx.send(completion);
    });
    let completion = rx.recv().await.ok_or(ApplicationError::Cancelled)?;

    match loader.apply(completion) {
        DetailsUpdate::Updated { .. } | DetailsUpdate::Stale => {}
        DetailsUpdate::Failed { messages } if !messages.is_empty() => {
            return Err(ApplicationError::Unavailable(messages.join("\n")));
        }
        DetailsUpdate::Failed { .. } => {}
    }
    loader
        .launch()
        .cloned()
        .ok_or_else(|| ApplicationError::NotFound(format!("launch {id}")))
}

async fn toggle_booking(network: &Network, id: LaunchId) -> ApplicationResult<()> {
    let details = load_details(network, id.clone()).await?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = network.booking(tx);

    controller.toggle(&details)?;

    // The refresh may finish before the booking result is reported.
    let mut loader = network.launch_details(id);
    let mut pending_refresh = true;
    let mut reported = false;
    while pending_refresh || !reported {
        match rx.recv().await.ok_or(ApplicationError::Cancelled)? {
            BookingEvent::Completed {
                action, outcome, ..
            } => match outcome {
                Ok(success) => {
                    println!("{}", success.message);
                    reported = true;
                }
                Err(failure) => {
                    tracing::error!(%failure, "{}", action.failure_title());
                    return Err(failure.into());
                }
            },
            BookingEvent::DetailsRefreshed { result, .. } => {
                pending_refresh = false;
                if let DetailsUpdate::Updated { .. } = loader.absorb(result)
                    && let Some(details) = loader.launch()
                {
                    println!("{}", describe(details));
                }
            }
        }
    }
    Ok(())
}

async fn login(network: &Network, email: &str) -> ApplicationResult<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    network.login().login(email, move |outcome| {
        let _ = tx.send(outcome);
    })?;

    let warnings = rx.recv().await.ok_or(ApplicationError::Cancelled)??;
    for warning in warnings {
        tracing::warn!(%warning, "login delivered with errors");
    }
    println!("Logged in");
    Ok(())
}

fn describe(details: &LaunchDetails) -> String {
    let mut out = String::new();
    let mission = details
        .mission
        .as_ref()
        .and_then(|m| m.name.as_deref())
        .unwrap_or("(unnamed)");
    let _ = writeln!(out, "{mission} (launch {})", details.id);
    if let Some(site) = &details.site {
        let _ = writeln!(out, "Site: {site}");
    }
    if let Some(rocket) = &details.rocket {
        let name = rocket.name.as_deref().unwrap_or("unknown");
        match rocket.rocket_type.as_deref() {
            Some(kind) => {
                let _ = writeln!(out, "Rocket: {name} ({kind})");
            }
            None => {
                let _ = writeln!(out, "Rocket: {name}");
            }
        }
    }
    let _ = write!(
        out,
        "{}",
        if details.is_booked { "Booked" } else { "Not booked" }
    );
    out
}
