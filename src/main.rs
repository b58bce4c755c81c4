//! Greetings CLI - compose, share and store greeting cards
//!
//! Cards are edited as local JSON drafts, shared as self-contained links or
//! saved to a backend and shared by slug.

mod codec;
mod config;
mod context;
mod models;
mod render;
mod share;
mod store;
mod suggest;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codec::{Decoded, Field};
use config::Config;
use models::lenient::Tag;
use models::{event, AnimationStyle, DecorationKind, Greeting, Layout, MediaType, Position};
use share::ShareTarget;

/// How long `open` waits for the view count update before exiting
const VIEW_COUNT_GRACE: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "greetings-cli")]
#[command(about = "Compose, share and store greeting cards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a draft card
    New {
        /// Predefined event id (see `events`)
        #[arg(short, long)]
        event: Option<String>,

        /// Name of a custom event; implies the custom event type
        #[arg(long)]
        custom: Option<String>,

        /// Emoji for a custom event
        #[arg(long, requires = "custom")]
        custom_emoji: Option<String>,

        #[arg(short, long)]
        from: Option<String>,

        #[arg(short, long)]
        to: Option<String>,

        /// Message text (repeatable)
        #[arg(long = "text")]
        texts: Vec<String>,

        /// Image URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,

        /// Video URL
        #[arg(long)]
        video: Option<String>,

        /// Sticker emoji (repeatable)
        #[arg(long = "sticker")]
        stickers: Vec<String>,

        /// Border decoration emoji (repeatable); enables the border
        #[arg(long = "border")]
        borders: Vec<String>,

        /// Layout, e.g. grid, polaroid, hexagon
        #[arg(long)]
        layout: Option<String>,

        /// Animation, e.g. fade, slide, bounce
        #[arg(long)]
        animation: Option<String>,

        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        frame: Option<String>,

        /// Write the draft here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview a draft
    Show {
        /// Draft file
        draft: PathBuf,

        /// Also list item ids
        #[arg(long)]
        ids: bool,
    },

    /// Add or remove items in a draft, in place
    Edit {
        draft: PathBuf,

        #[arg(long = "text")]
        texts: Vec<String>,

        #[arg(long = "image")]
        images: Vec<String>,

        #[arg(long = "sticker")]
        stickers: Vec<String>,

        #[arg(long = "border")]
        borders: Vec<String>,

        /// Item id to remove (see `show --ids`, repeatable)
        #[arg(long = "remove")]
        removals: Vec<String>,
    },

    /// Print an inline share link for a draft
    Link {
        draft: PathBuf,
    },

    /// Open a share link, query string or slug
    Open {
        link: String,

        /// Save the card as a draft file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save a draft to the configured backend and print its link
    Save {
        draft: PathBuf,

        #[arg(long)]
        title: Option<String>,
    },

    /// List saved greetings
    List {
        /// Owner id (defaults to configured user_id)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Print the slug a card would get
    Slug {
        #[arg(short, long, default_value = "")]
        from: String,

        #[arg(short, long, default_value = "")]
        to: String,

        #[arg(short, long, default_value = "")]
        event: String,
    },

    /// List predefined events
    Events,

    /// Ask the backend for message suggestions
    Suggest {
        #[arg(short, long)]
        event: String,

        #[arg(short, long, default_value = "")]
        from: String,

        #[arg(short, long, default_value = "")]
        to: String,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set a value, e.g. `config set relational.url https://x.supabase.co`
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::New {
            event,
            custom,
            custom_emoji,
            from,
            to,
            texts,
            images,
            video,
            stickers,
            borders,
            layout,
            animation,
            theme,
            frame,
            output,
        } => {
            let mut greeting = match (event, custom) {
                (_, Some(name)) => {
                    let mut g = Greeting::default();
                    g.set_custom_event(&name, custom_emoji.as_deref().unwrap_or(""));
                    g
                }
                (Some(id), None) => {
                    if event::lookup(&id).is_none() {
                        bail!("Unknown event: {}. Run 'greetings-cli events' for the list.", id);
                    }
                    Greeting::for_event(&id)
                }
                (None, None) => bail!("Pass --event <id> or --custom <name>"),
            };

            if let Some(from) = from {
                greeting.sender_name = from;
            }
            if let Some(to) = to {
                greeting.receiver_name = to;
            }
            add_items(&mut greeting, &texts, &images, &stickers, &borders);
            if let Some(video) = video {
                greeting.video_url = video;
            }
            if let Some(layout) = layout {
                greeting.layout = parse_tag::<Layout>(&layout, "layout")?;
            }
            if let Some(animation) = animation {
                greeting.animation_style = parse_tag::<AnimationStyle>(&animation, "animation")?;
            }
            if let Some(theme) = theme {
                greeting.theme = theme;
            }
            if let Some(frame) = frame {
                greeting.frame_style = frame;
            }

            match output {
                Some(path) => {
                    write_draft(&path, &greeting)?;
                    println!("Draft written to {}", path.display());
                }
                None => println!("{}", draft_json(&greeting)?),
            }
        }
        Commands::Show { draft, ids } => {
            let config = Config::load()?;
            let decoded = read_draft(&draft)?;
            print_card(&decoded, &config);
            if ids {
                println!("{}", render::item_list(&decoded.greeting));
            }
        }
        Commands::Edit {
            draft,
            texts,
            images,
            stickers,
            borders,
            removals,
        } => {
            let decoded = read_draft(&draft)?;
            report_repairs(&decoded);
            let mut greeting = decoded.greeting;

            for id in &removals {
                let removed = greeting.remove_text(id)
                    || greeting.remove_media(id)
                    || greeting.remove_emoji(id)
                    || greeting.remove_decoration(id);
                if !removed {
                    bail!("No item with id {} in {}", id, draft.display());
                }
            }
            add_items(&mut greeting, &texts, &images, &stickers, &borders);

            write_draft(&draft, &greeting)?;
            println!("{}", render::item_list(&greeting));
        }
        Commands::Link { draft } => {
            let config = Config::load()?;
            let decoded = read_draft(&draft)?;
            report_repairs(&decoded);
            println!("{}", share::inline_link(&config.share_base_url, &decoded.greeting));
        }
        Commands::Open { link, output } => {
            let config = Config::load()?;
            let target = share::parse_link(&link)?;

            let (decoded, pending) = match &target {
                ShareTarget::Inline(_) => match target.decode_inline() {
                    Some(decoded) => (decoded, None),
                    None => bail!("Not an inline link"),
                },
                ShareTarget::Slug(slug) => {
                    let store = store::open_store(&config)?;
                    match store::load_greeting(store, slug).await {
                        Some((stored, counted)) => {
                            println!("{}", stored.title.as_deref().unwrap_or(&stored.slug));
                            if let Some(created) = stored.created_at {
                                println!("Created {}", created.format("%Y-%m-%d %H:%M UTC"));
                            }
                            println!("Viewed {} time(s)", stored.view_count + 1);
                            (stored.decoded, Some(counted))
                        }
                        None => bail!("Greeting '{}' could not be loaded", slug),
                    }
                }
            };

            print_card(&decoded, &config);
            if let Some(path) = output {
                write_draft(&path, &decoded.greeting)?;
                println!("Draft written to {}", path.display());
            }

            if let Some(counted) = pending {
                if tokio::time::timeout(VIEW_COUNT_GRACE, counted).await.is_err() {
                    tracing::debug!("View count update still pending at exit");
                }
            }
        }
        Commands::Save { draft, title } => {
            let config = Config::load()?;
            let decoded = read_draft(&draft)?;
            report_repairs(&decoded);

            let store = store::open_store(&config)?;
            tracing::info!("Saving to {} backend...", store.backend_name());
            match store::save_greeting(store.as_ref(), &decoded.greeting, title.as_deref()).await {
                Some(slug) => println!("{}", share::slug_link(&config.share_base_url, &slug)),
                None => bail!("Greeting was not saved. Run with --verbose for details."),
            }
        }
        Commands::List { user } => {
            let config = Config::load()?;
            let Some(user_id) = user.or_else(|| config.user_id.clone()) else {
                bail!("No user id. Pass --user or run 'greetings-cli config set user_id <id>'.");
            };

            let store = store::open_store(&config)?;
            let greetings = store::list_greetings(store.as_ref(), &user_id).await;

            println!("\nSaved greetings:");
            println!("{:-<72}", "");
            if greetings.is_empty() {
                println!("  (none)");
            }
            for g in &greetings {
                tracing::debug!("{} is record {}", g.slug, g.id);
                let created = g
                    .created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<10} {:<14} {:<16} {:>5}  {}",
                    created,
                    g.event_type,
                    g.receiver_name,
                    g.view_count,
                    g.title.as_deref().unwrap_or(&g.slug)
                );
                println!("             {}", share::slug_link(&config.share_base_url, &g.slug));
            }
        }
        Commands::Slug { from, to, event } => {
            println!("{}", store::slug::generate(&from, &to, &event));
        }
        Commands::Events => {
            for e in event::catalog() {
                println!("  {} {:<16} {:<20} {}", e.emoji, e.id, e.label, e.category.as_str());
            }
        }
        Commands::Suggest { event, from, to } => {
            let config = Config::load()?;
            let suggestions = suggest::fetch_suggestions(&config, &event, &from, &to).await;
            if suggestions.is_empty() {
                let fallback = event::lookup(&event)
                    .map(|e| e.default_message)
                    .unwrap_or_else(|| event::fallback_message(config.language).to_string());
                println!("  {}", fallback);
            }
            for s in suggestions {
                println!("  {}", s);
            }
        }
        Commands::Config { action } => {
            let mut config = Config::load()?;
            match action {
                None | Some(ConfigAction::Show) => {
                    println!("# {}", Config::config_path()?.display());
                    print!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
                Some(ConfigAction::Set { key, value }) => {
                    config.set(&key, &value)?;
                    config.save()?;
                    println!("Set {}", key);
                }
            }
        }
    }

    Ok(())
}

/// Parse a tag argument strictly; unknown values are argument errors here
fn parse_tag<T: Tag>(value: &str, what: &str) -> Result<T> {
    T::from_tag(value.trim()).with_context(|| format!("Unknown {}: {}", what, value))
}

fn add_items(
    greeting: &mut Greeting,
    texts: &[String],
    images: &[String],
    stickers: &[String],
    borders: &[String],
) {
    for text in texts {
        greeting.add_text(text);
    }
    for url in images {
        greeting.add_media(url, MediaType::Image);
    }
    for sticker in stickers {
        let position = sticker_position(greeting.emojis.len());
        greeting.add_emoji(sticker, position);
    }
    for border in borders {
        greeting.add_decoration(DecorationKind::Emoji, border);
        greeting.border_settings.enabled = true;
    }
}

/// Spread stickers along the top of the card
fn sticker_position(index: usize) -> Position {
    Position {
        x: 15.0 + (index % 5) as f64 * 17.5,
        y: 12.0 + (index / 5) as f64 * 12.0,
    }
}

fn draft_json(greeting: &Greeting) -> Result<String> {
    let doc = serde_json::Value::Object(codec::document::encode(greeting));
    serde_json::to_string_pretty(&doc).context("Failed to serialize draft")
}

fn write_draft(path: &Path, greeting: &Greeting) -> Result<()> {
    fs::write(path, draft_json(greeting)? + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn read_draft(path: &Path) -> Result<Decoded> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(codec::document::decode_value(&value))
}

fn report_repairs(decoded: &Decoded) {
    if decoded.is_clean() {
        return;
    }
    let fields: Vec<&str> = decoded.repaired.iter().map(|f: &Field| f.key()).collect();
    eprintln!("Note: replaced unreadable fields with defaults: {}", fields.join(", "));
}

fn print_card(decoded: &Decoded, config: &Config) {
    report_repairs(decoded);
    let ctx = config.context();
    let descriptor = decoded.event(&ctx);
    println!("{}", render::preview(&decoded.greeting, descriptor.as_ref(), &ctx));
}
