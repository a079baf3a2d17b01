//! Command line front end.
//!
//! Binds user commands to the directory and portfolio controllers and renders
//! the results. Each invocation is one session over the configured store.

mod prompt;
mod view;

pub use prompt::*;
pub use view::*;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::db::{init_database, KeyValueStore, SqliteStore};
use crate::directory::{AssumeYes, Confirm, DonorCard, DonorDirectory};
use crate::errors::{AppError, AppResult};
use crate::geo::{provider_for, FixedLocationProvider, LocationProvider, LocationUpdate};
use crate::models::{Availability, BloodGroup, Coordinates, DonorFilter, NewDonorRequest, Theme};
use crate::portfolio::{ContactMessage, ParticleField, Scheduler, ThemeController, Typewriter};

#[derive(Parser, Debug)]
#[command(name = "donor-finder")]
#[command(about = "Blood donor directory and portfolio tools", version)]
pub struct Cli {
    /// SQLite database path (overrides DONOR_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    pub yes: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new donor
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_blood_group)]
        blood_group: BloodGroup,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        area: String,
        #[arg(long, value_enum, default_value_t = AvailabilityArg::Yes)]
        available: AvailabilityArg,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,
        /// Use the current location as the donor's coordinates
        #[arg(long, default_value_t = false, conflicts_with_all = ["lat", "lng"])]
        here: bool,
    },
    /// Search donors; without filters every donor is shown
    #[command(alias = "list")]
    Search {
        #[arg(long, value_parser = parse_blood_group)]
        blood_group: Option<BloodGroup>,
        #[arg(long)]
        area: Option<String>,
        #[arg(long, default_value_t = false)]
        available_only: bool,
        /// Show only donors available right now
        #[arg(long, default_value_t = false)]
        emergency: bool,
    },
    /// Delete one donor by id
    Delete { id: i64 },
    /// Delete every donor
    Clear,
    /// Set the current location used for distance sorting
    Locate {
        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,
        /// Forget the stored location instead
        #[arg(long, default_value_t = false, conflicts_with_all = ["lat", "lng"])]
        forget: bool,
    },
    /// Show, toggle or set the portfolio theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// Type out the portfolio greeting
    Intro {
        /// Skip the delay between characters
        #[arg(long, default_value_t = false)]
        instant: bool,
    },
    /// Animate the particle background as text
    Particles {
        #[arg(long, default_value_t = 10)]
        frames: usize,
        #[arg(long, default_value_t = 60)]
        cols: usize,
        #[arg(long, default_value_t = 15)]
        rows: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build the contact-form compose link
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        /// User agent deciding between mail app and webmail
        #[arg(long)]
        user_agent: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvailabilityArg {
    Yes,
    No,
}

impl From<AvailabilityArg> for Availability {
    fn from(arg: AvailabilityArg) -> Self {
        match arg {
            AvailabilityArg::Yes => Availability::Yes,
            AvailabilityArg::No => Availability::No,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Toggle,
    Dark,
    Light,
}

fn parse_blood_group(raw: &str) -> Result<BloodGroup, String> {
    BloodGroup::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = BloodGroup::ALL.iter().map(|g| g.as_str()).collect();
        format!("unknown blood group {raw:?}, expected one of {}", known.join(", "))
    })
}

/// Session state shared by command handlers.
pub struct AppState {
    pub directory: DonorDirectory,
    pub themes: ThemeController,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the session over an existing store.
    pub async fn open(store: Arc<dyn KeyValueStore>, config: Config) -> AppResult<Self> {
        let directory = DonorDirectory::open(store.clone()).await?;
        let themes = ThemeController::new(store, config.prefers_dark);
        Ok(Self {
            directory,
            themes,
            config: Arc::new(config),
        })
    }

    /// Open the SQLite store at the configured path.
    pub async fn connect(config: Config) -> AppResult<Self> {
        let pool = init_database(&config.db_path).await?;
        Self::open(Arc::new(SqliteStore::new(pool)), config).await
    }
}

/// Execute one command, writing user-facing output to `out`.
pub async fn run<W: Write>(
    state: &AppState,
    cli: Cli,
    confirm: &dyn Confirm,
    out: &mut W,
) -> AppResult<()> {
    let confirm: &dyn Confirm = if cli.yes { &AssumeYes } else { confirm };
    let mut changes = state.directory.subscribe();
    changes.borrow_and_update();

    match cli.command {
        Command::Add {
            name,
            blood_group,
            phone,
            city,
            area,
            available,
            lat,
            lng,
            here,
        } => {
            let mut request = NewDonorRequest {
                name,
                blood_group: Some(blood_group),
                phone,
                city,
                area,
                available: available.into(),
                lat,
                lng,
            };
            if here {
                state.directory.fill_location(&mut request).await?;
            }
            let record = state.directory.add_donor(request).await?;
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
                return Ok(());
            }
            writeln!(out, "Donor added successfully! (id {})", record.id)?;
        }
        Command::Search {
            blood_group,
            area,
            available_only,
            emergency,
        } => {
            let mut filter = DonorFilter {
                blood_group,
                area,
                available_only,
            };
            if emergency {
                filter = filter.emergency();
                if !cli.json {
                    writeln!(out, "Emergency mode: showing only available donors!")?;
                }
            }
            return show_results(state, &filter, cli.json, out).await;
        }
        Command::Delete { id } => {
            let removed = state.directory.delete_donor(id, confirm).await?;
            if !cli.json {
                if removed {
                    writeln!(out, "Donor deleted!")?;
                } else {
                    writeln!(out, "No donor with id {id}; nothing deleted.")?;
                }
            }
        }
        Command::Clear => {
            state.directory.clear_all(confirm).await?;
            if !cli.json {
                writeln!(out, "All donors cleared!")?;
            }
        }
        Command::Locate { lat, lng, forget } => {
            if forget {
                state.directory.forget_location().await?;
                writeln!(out, "Location cleared.")?;
                return Ok(());
            }
            let provider: Box<dyn LocationProvider> = match (lat, lng) {
                (Some(lat), Some(lng)) => {
                    let coords = Coordinates::new(lat, lng);
                    if !coords.is_valid() {
                        return Err(AppError::Validation(format!(
                            "Coordinates out of range: {lat}, {lng}"
                        )));
                    }
                    Box::new(FixedLocationProvider::new(coords))
                }
                _ => provider_for(state.config.location),
            };
            match state.directory.locate(provider.as_ref()).await? {
                LocationUpdate::Applied(coords) => {
                    writeln!(out, "Location set: {coords}. Distances will now show in search.")?;
                }
                LocationUpdate::Superseded => {
                    writeln!(out, "A newer location request replaced this one.")?;
                    return Ok(());
                }
            }
        }
        Command::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => state.themes.load().await?,
                ThemeAction::Toggle => state.themes.toggle().await?,
                ThemeAction::Dark => set_theme(state, Theme::Dark).await?,
                ThemeAction::Light => set_theme(state, Theme::Light).await?,
            };
            if cli.json {
                writeln!(out, "{}", serde_json::to_string(&theme)?)?;
            } else {
                writeln!(out, "{theme}")?;
            }
            return Ok(());
        }
        Command::Intro { instant } => {
            let mut typewriter = Typewriter::new(&state.config.greeting);
            let scheduler = if instant {
                Scheduler::new().immediate()
            } else {
                Scheduler::new()
            };
            let mut renderer = LineRenderer::new(&mut *out);
            scheduler.run(&mut typewriter, &mut renderer).await;
            writeln!(out)?;
            return Ok(());
        }
        Command::Particles {
            frames,
            cols,
            rows,
            seed,
        } => {
            let theme = state.themes.current().await?;
            let (width, height) = (cols as f64 * 10.0, rows as f64 * 20.0);
            let mut field = match seed {
                Some(seed) => ParticleField::seeded(width, height, theme, seed),
                None => ParticleField::new(width, height, theme),
            };
            let mut renderer = GridRenderer::new(&mut *out, cols, rows);
            Scheduler::new()
                .max_frames(frames.max(1))
                .run(&mut field, &mut renderer)
                .await;
            return Ok(());
        }
        Command::Contact {
            name,
            email,
            message,
            user_agent,
        } => {
            let form = ContactMessage {
                name,
                email,
                message,
            };
            let user_agent = user_agent.or_else(|| state.config.user_agent.clone());
            let action = form.compose(&state.config.contact_email, user_agent.as_deref());
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&action)?)?;
            } else {
                writeln!(out, "{}", action.url())?;
            }
            return Ok(());
        }
    }

    // Re-render the directory after a state change, as the page does
    if changes.has_changed().unwrap_or(false) && !cli.json {
        writeln!(out)?;
        show_results(state, &DonorFilter::all(), false, out).await?;
    }
    Ok(())
}

async fn set_theme(state: &AppState, theme: Theme) -> AppResult<Theme> {
    state.themes.set(theme).await?;
    Ok(theme)
}

async fn show_results<W: Write>(
    state: &AppState,
    filter: &DonorFilter,
    json: bool,
    out: &mut W,
) -> AppResult<()> {
    let outcome = state.directory.search(filter).await?;
    let country_code = &state.config.country_code;

    if json {
        let cards: Vec<DonorCard> = cards(&outcome, country_code);
        let body = serde_json::json!({
            "outcome": outcome,
            "cards": cards,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        write!(out, "{}", render_outcome(&outcome, country_code))?;
    }
    Ok(())
}
