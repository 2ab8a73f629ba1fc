use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diesel::SqliteConnection;
use provider_directory::{
    DirectoryResult,
    config::{DirectoryConfig, load_config_path},
    db::{connection::connect_sqlite, migrate},
    detail::assemble_detail,
    feed::{FeedQuery, query_feed_params},
    identity::{IdentityStore, Session, SqliteIdentity},
    rating::SqliteLedger,
    seed::seed_samples,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Provider directory CLI
#[derive(Parser, Debug)]
#[command(version, about = "Provider directory CLI")]
struct Cli {
    /// SQLite database path or sqlite: URL (defaults to $DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Optional TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Apply pending schema migrations
    Migrate,

    /// Create the sample provider and profile if missing
    SeedSamples,

    /// Print one page of a category feed
    Feed {
        /// Category label ("Builders") or feed slug ("builderfeed")
        category: String,
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        min_rating: Option<String>,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        per_page: Option<String>,
    },

    /// Submit or replace a rating
    Rate {
        /// Profile id
        profile: i32,
        /// Display name of the rating account
        #[arg(long = "as", value_name = "NAME")]
        rater: String,
        /// Star value, 1 to 5
        #[arg(long)]
        value: String,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Print a profile page as seen by an optional viewer
    Show {
        /// Profile id
        profile: i32,
        /// Display name of the viewing account
        #[arg(long = "as", value_name = "NAME")]
        viewer: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let database_url = match cli.database_url {
        Some(url) => url,
        None => shared_utils::env::get_env_var("DATABASE_URL")?,
    };
    let mut cfg = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => DirectoryConfig::default(),
    };
    if let Some(per_page) = shared_utils::env::parse_env_var::<usize>("DIRECTORY_DEFAULT_PER_PAGE")? {
        cfg.feed = cfg.feed.with_default_per_page(per_page);
    }

    match cli.cmd {
        Cmd::Migrate => migrate::run_all(&database_url)?,
        Cmd::SeedSamples => {
            let mut conn = connect_sqlite(&database_url)?;
            print_json(&directory(seed_samples(&mut conn))?)?;
        }
        Cmd::Feed {
            category,
            q,
            city,
            min_rating,
            page,
            per_page,
        } => {
            let mut conn = connect_sqlite(&database_url)?;
            let query = FeedQuery {
                q,
                city,
                min_rating,
                page,
                per_page,
            };
            print_json(&directory(query_feed_params(
                &mut conn, &category, query, &cfg.feed,
            ))?)?;
        }
        Cmd::Rate {
            profile,
            rater,
            value,
            comment,
        } => {
            let mut conn = connect_sqlite(&database_url)?;
            let session = session_for(&mut conn, Some(&rater))?;
            let rating = directory(SqliteLedger.submit_rating_form(
                &mut conn,
                &session,
                profile,
                &value,
                comment.as_deref(),
            ))?;
            print_json(&rating)?;
        }
        Cmd::Show { profile, viewer } => {
            let mut conn = connect_sqlite(&database_url)?;
            let session = session_for(&mut conn, viewer.as_deref())?;
            print_json(&directory(assemble_detail(&mut conn, profile, &session))?)?;
        }
    }

    Ok(())
}

fn session_for(conn: &mut SqliteConnection, name: Option<&str>) -> Result<Session> {
    let Some(name) = name else {
        return Ok(Session::anonymous());
    };
    let account = directory(SqliteIdentity.account_by_display_name(conn, name))?
        .with_context(|| format!("no account named {name:?}"))?;
    Ok(Session::for_account(&account))
}

/// Keeps the typed error as the source and puts the user-facing message on top.
fn directory<T>(res: DirectoryResult<T>) -> Result<T> {
    res.map_err(|e| {
        let msg = e.user_message();
        anyhow::Error::new(e).context(msg)
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
