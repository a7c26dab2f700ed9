use std::process;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use techflow_core::ai::{DraftConfig, DraftGenerator, DraftRequest, GeminiDraftClient, GeneratedDraft};
use techflow_core::application::session_manager::SessionManager;
use techflow_core::data::post_repository::PostRepository;
use techflow_core::data::stores::file::FileStore;
use techflow_core::domain::dashboard::DashboardStats;
use techflow_core::domain::post::{Category, Post, PostDraft, PostStatus};
use techflow_core::domain::session::Session;
use techflow_core::infrastructure::logging::init_logging;
use techflow_core::infrastructure::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "techflow", version, about = "Single-admin blog publishing CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Public feed of published posts.
    List {
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Include drafts (requires login).
        #[arg(long)]
        all: bool,
    },
    /// Read one post by id (counts a view).
    Read { id: String },
    /// Sign in as the blog admin.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out.
    Logout,
    /// Post statistics and the full post table (requires login).
    Dashboard,
    /// Create a post (requires login).
    Create {
        #[arg(long)]
        title: String,
        /// Markdown body. Required unless --ai is set.
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = "")]
        excerpt: String,
        #[arg(long, default_value = "Web Development")]
        category: String,
        /// Comma-separated tags.
        #[arg(long, default_value = "")]
        tags: String,
        /// Featured image URL or data URI.
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long, default_value = "published")]
        status: String,
        #[arg(long, default_value = "Admin")]
        author: String,
        /// Draft content, excerpt and tags with Gemini before saving.
        #[arg(long)]
        ai: bool,
        /// Keywords to steer the AI draft (defaults to the tags).
        #[arg(long, default_value = "")]
        keywords: String,
    },
    /// Edit an existing post; only the supplied flags change (requires login).
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        excerpt: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags.
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Re-draft content, excerpt and tags with Gemini before saving.
        #[arg(long)]
        ai: bool,
        #[arg(long, default_value = "")]
        keywords: String,
    },
    /// Delete a post (requires login).
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    init_logging(&settings.log_level)?;

    let store = FileStore::new(settings.data_dir.clone());
    let repo = PostRepository::new(store.clone());
    let mut sessions = SessionManager::init(store)?;

    match cli.command {
        Command::List { category, all } => {
            let category = category.map(|raw| parse_category(&raw)).transpose()?;
            if all {
                require_session(&sessions)?;
            }

            let posts = repo.list_all().context("failed to load posts")?;
            let visible: Vec<&Post> = posts
                .iter()
                .filter(|post| all || post.status == PostStatus::Published)
                .filter(|post| category.is_none_or(|c| post.category == c))
                .collect();
            print_feed(&visible);
        }
        Command::Read { id } => match repo.get_by_id(&id)? {
            Some(_) => {
                repo.increment_views(&id)
                    .context("failed to record the view")?;
                let post = repo
                    .get_by_id(&id)?
                    .ok_or_else(|| anyhow!("post disappeared while reading: {id}"))?;
                print_post(&post);
            }
            None => println!("Post not found: {id}"),
        },
        Command::Login { username, password } => {
            if sessions.login(&username, &password)? {
                println!("Signed in as {username}");
            } else {
                return Err(anyhow!("invalid credentials"));
            }
        }
        Command::Logout => {
            sessions.logout()?;
            println!("Signed out");
        }
        Command::Dashboard => {
            require_session(&sessions)?;
            let posts = repo.list_all().context("failed to load posts")?;
            print_dashboard(&DashboardStats::from_posts(&posts), &posts);
        }
        Command::Create {
            title,
            content,
            excerpt,
            category,
            tags,
            image,
            status,
            author,
            ai,
            keywords,
        } => {
            require_session(&sessions)?;
            let mut draft = PostDraft {
                title,
                content,
                excerpt,
                featured_image: image,
                tags: parse_tags(&tags),
                category: parse_category(&category)?,
                status: parse_status(&status)?,
                author,
            };
            if ai {
                apply_generated_draft(&mut draft, &settings, &keywords).await?;
            }

            let post = repo.save(draft, None)?;
            print_saved("Created", &post);
        }
        Command::Edit {
            id,
            title,
            content,
            excerpt,
            category,
            tags,
            image,
            status,
            author,
            ai,
            keywords,
        } => {
            require_session(&sessions)?;
            let existing = repo
                .get_by_id(&id)?
                .ok_or_else(|| anyhow!("post not found: {id}"))?;

            // Presentation-side merge: unsupplied flags keep the stored
            // value; the repository always receives the full typed draft.
            let mut draft = PostDraft {
                title: title.unwrap_or(existing.title),
                content: content.unwrap_or(existing.content),
                excerpt: excerpt.unwrap_or(existing.excerpt),
                featured_image: image.unwrap_or(existing.featured_image),
                tags: match tags {
                    Some(raw) => parse_tags(&raw),
                    None => existing.tags,
                },
                category: match category {
                    Some(raw) => parse_category(&raw)?,
                    None => existing.category,
                },
                status: match status {
                    Some(raw) => parse_status(&raw)?,
                    None => existing.status,
                },
                author: author.unwrap_or(existing.author),
            };
            if ai {
                apply_generated_draft(&mut draft, &settings, &keywords).await?;
            }

            let post = repo.save(draft, Some(&id))?;
            print_saved("Updated", &post);
        }
        Command::Delete { id } => {
            require_session(&sessions)?;
            repo.delete_by_id(&id)?;
            println!("Deleted post: id={id}");
        }
    }

    Ok(())
}

fn require_session(sessions: &SessionManager<FileStore>) -> Result<&Session> {
    sessions.current_session().ok_or_else(|| {
        anyhow!("login required: run `techflow login --username <name> --password <password>`")
    })
}

async fn apply_generated_draft(
    draft: &mut PostDraft,
    settings: &Settings,
    keywords: &str,
) -> Result<()> {
    let generator = GeminiDraftClient::new(
        settings.gemini_api_key.clone(),
        DraftConfig {
            model: settings.gemini_model.clone(),
            timeout_secs: settings.ai_request_timeout_secs,
        },
    );

    let keywords = if keywords.trim().is_empty() {
        draft.tags.join(", ")
    } else {
        keywords.to_string()
    };

    let generated = generator
        .generate(DraftRequest {
            title: draft.title.clone(),
            category: draft.category,
            keywords,
        })
        .await
        .context("failed to generate draft content")?;
    merge_generated(draft, generated);
    Ok(())
}

// The generated result only fills the pending draft; nothing is persisted
// until the save below it.
fn merge_generated(draft: &mut PostDraft, generated: GeneratedDraft) {
    draft.content = generated.content;
    draft.excerpt = generated.excerpt;
    if !generated.tags.is_empty() {
        draft.tags = parse_tags(&generated.tags.join(","));
    }
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_category(raw: &str) -> Result<Category> {
    raw.parse::<Category>().map_err(|_| {
        let known = Category::ALL
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown category '{raw}', expected one of: {known}")
    })
}

fn parse_status(raw: &str) -> Result<PostStatus> {
    raw.parse::<PostStatus>()
        .map_err(|_| anyhow!("unknown status '{raw}', expected 'published' or 'draft'"))
}

fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn print_feed(posts: &[&Post]) {
    if posts.is_empty() {
        println!("No posts yet.");
        return;
    }

    println!("Posts: {}", posts.len());
    for post in posts {
        println!(
            "- [{}] {} ({}, {} views, {})",
            post.id,
            post.title,
            post.category,
            post.views,
            format_timestamp(post.created_at)
        );
        println!("    {}", post.excerpt);
    }
}

fn print_post(post: &Post) {
    println!("{}", post.title);
    println!(
        "{} | {} | by {} | {} views | {}",
        post.category,
        post.status,
        post.author,
        post.views,
        format_timestamp(post.created_at)
    );
    if !post.tags.is_empty() {
        println!("tags: {}", post.tags.join(", "));
    }
    println!();
    println!("{}", post.content);
}

fn print_dashboard(stats: &DashboardStats, posts: &[Post]) {
    println!("Dashboard");
    println!("  total posts: {}", stats.total_posts);
    println!("  published:   {}", stats.published_posts);
    println!("  drafts:      {}", stats.draft_posts);
    println!("  total views: {}", stats.total_views);
    println!();
    for post in posts {
        println!(
            "- [{}] {} ({}, {} views, updated {})",
            post.id,
            post.title,
            post.status,
            post.views,
            format_timestamp(post.updated_at)
        );
    }
}

fn print_saved(verb: &str, post: &Post) {
    println!("{verb} post");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("status: {}", post.status);
    println!("category: {}", post.category);
    println!("updated_at: {}", format_timestamp(post.updated_at));
}
