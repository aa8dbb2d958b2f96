// src/cli.rs
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::chat::{
    suggested_questions, ChatBackend, ChatClient, ChatSession, HrChat, JobFinderChat,
    DEFAULT_SEARCH_TOP_K,
};
use crate::core::{ConfigManager, Database};
use crate::grading::{format_cv_data, summarize_cv_context, CvAnalysisFlow, CvUpload, GradingClient};
use crate::health::{HealthCheck, HealthMonitor};
use crate::store::LocalStore;
use crate::types::profile::{HrCredentials, HrProfileUpdate, JobFinderProfile, Role};

const HR_CHAT_NAME: &str = "HR chat service";
const JOB_FINDER_CHAT_NAME: &str = "Job Finder chat service";

#[derive(Parser)]
#[command(name = "cvpilot")]
#[command(about = "Score CVs and chat with the career assistants")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Overrides the configured SQLite file
    #[arg(long, global = true)]
    pub database_path: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Hr,
    JobFinder,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Hr => Role::Hr,
            RoleArg::JobFinder => Role::JobFinder,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a session
    Login {
        #[command(subcommand)]
        account: LoginCommand,
    },
    /// Create the job finder account
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        degree: String,
        #[arg(long)]
        college: String,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
    },
    /// Close a session
    Logout {
        #[arg(value_enum)]
        role: RoleArg,
    },
    /// Show open sessions
    Whoami,
    /// Show or edit a profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Upload a PDF or DOCX resume for grading
    Grade { file: PathBuf },
    /// Inspect the last analyzed CV
    Cv {
        #[command(subcommand)]
        command: CvCommand,
    },
    /// Suggested questions for the job finder chat
    Suggest,
    /// Ask one question, or start an interactive chat without one
    Chat {
        #[arg(value_enum)]
        role: RoleArg,
        message: Option<String>,
    },
    /// Check every configured backend
    Health,
    /// Sectors known to the grading service
    Sectors,
    /// Knowledge base statistics of the chat service
    Stats,
    /// Retrieve matching documents without generating an answer
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_TOP_K)]
        top_k: u32,
    },
    /// Delete every locally stored record
    Reset,
}

#[derive(Subcommand)]
pub enum LoginCommand {
    Hr {
        username: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        image: Option<String>,
    },
    JobFinder { email: String, password: String },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show {
        #[arg(value_enum)]
        role: RoleArg,
    },
    Hr {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    JobFinder {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        degree: Option<String>,
        #[arg(long)]
        college: Option<String>,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long, value_delimiter = ',')]
        skills: Option<Vec<String>>,
        #[arg(long)]
        image: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CvCommand {
    Show,
    Summary,
    Clear,
}

struct App {
    config: ConfigManager,
    store: LocalStore,
}

impl App {
    fn grading_client(&self) -> Result<GradingClient> {
        Ok(GradingClient::new(
            &self.config.services.grading_url,
            self.config.grading_timeout(),
        )?)
    }

    fn hr_chat_client(&self) -> Result<ChatClient> {
        Ok(ChatClient::new(
            HR_CHAT_NAME,
            &self.config.services.chat_url,
            self.config.chat_timeout(),
        )?)
    }

    fn job_finder_chat_client(&self) -> Result<ChatClient> {
        Ok(ChatClient::new(
            JOB_FINDER_CHAT_NAME,
            self.config.job_finder_chat_url(),
            self.config.chat_timeout(),
        )?)
    }
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let mut config = ConfigManager::load()?;
    if let Some(path) = cli.database_path {
        config.storage.database_path = path;
    }
    config.ensure_directories().await?;

    let database = Database::new(&config.storage.database_path)
        .await
        .context("Failed to open local store")?;
    let app = App {
        store: LocalStore::new(Arc::new(database)),
        config,
    };

    match cli.command {
        Command::Login { account } => login(&app, account).await,
        Command::Signup {
            full_name,
            email,
            password,
            age,
            degree,
            college,
            experience,
            skills,
        } => {
            let profile = JobFinderProfile {
                full_name,
                email,
                password,
                age,
                degree,
                college,
                experience,
                skills,
                profile_image: None,
            };
            app.store.signup_job_finder(&profile).await?;
            println!("✓ Account created for {}", profile.email);
            Ok(())
        }
        Command::Logout { role } => {
            app.store.logout(role.into()).await?;
            println!("✓ Logged out");
            Ok(())
        }
        Command::Whoami => {
            for role in [Role::Hr, Role::JobFinder] {
                match app.store.session(role).await? {
                    Some(session) => println!(
                        "{:<12} {} (since {})",
                        role,
                        session.identity,
                        session.created_at.format("%Y-%m-%d %H:%M")
                    ),
                    None => println!("{:<12} not signed in", role),
                }
            }
            Ok(())
        }
        Command::Profile { command } => profile(&app, command).await,
        Command::Grade { file } => grade(&app, file).await,
        Command::Cv { command } => cv(&app, command).await,
        Command::Suggest => {
            app.store.require_session(Role::JobFinder).await?;
            let cv = app.store.cv_data().await?;
            for question in suggested_questions(cv.as_ref()) {
                println!("• {}", question);
            }
            Ok(())
        }
        Command::Chat { role, message } => match Role::from(role) {
            Role::Hr => {
                app.store.require_session(Role::Hr).await?;
                let backend = HrChat::new(app.hr_chat_client()?).with_top_k(app.config.chat.hr_top_k);
                run_chat(ChatSession::start(backend).await, message).await
            }
            Role::JobFinder => {
                app.store.require_session(Role::JobFinder).await?;
                let backend = JobFinderChat::new(app.job_finder_chat_client()?, app.store.clone())
                    .with_rule(app.config.complexity_rule());
                run_chat(ChatSession::start(backend).await, message).await
            }
        },
        Command::Health => health(&app).await,
        Command::Sectors => {
            let info = app.grading_client()?.available_sectors().await?;
            println!("{} sectors:", info.total_sectors);
            for (sector, count) in &info.sectors {
                println!("  {:<30} {}", sector, count);
            }
            Ok(())
        }
        Command::Stats => {
            let stats = app.hr_chat_client()?.stats().await?;
            println!("Collection: {}", stats.collection_name);
            println!("Documents:  {}", stats.total_documents);
            println!("Categories: {}", stats.categories.join(", "));
            println!("Types:      {}", stats.document_types.join(", "));
            Ok(())
        }
        Command::Search { query, top_k } => {
            let response = app.hr_chat_client()?.search(&query, top_k).await?;
            println!("{} results for \"{}\"", response.count, response.query);
            for result in response.results {
                println!(
                    "- {} [{}] {:.3}",
                    result.name.as_deref().unwrap_or("(unnamed)"),
                    result.sector.as_deref().unwrap_or("-"),
                    result.score.unwrap_or_default()
                );
                if let Some(preview) = result.content_preview {
                    println!("  {}", preview);
                }
            }
            Ok(())
        }
        Command::Reset => {
            app.store.reset().await?;
            println!("✓ Local store cleared");
            Ok(())
        }
    }
}

async fn login(app: &App, account: LoginCommand) -> Result<()> {
    match account {
        LoginCommand::Hr {
            username,
            company,
            image,
        } => {
            let credentials = HrCredentials {
                username,
                company_name: company,
                profile_image: image,
            };
            app.store.login_hr(&credentials).await?;
            println!("✓ Signed in as {} ({})", credentials.username, credentials.company_name);
        }
        LoginCommand::JobFinder { email, password } => {
            let profile = app.store.login_job_finder(&email, &password).await?;
            println!("✓ Welcome back, {}", profile.full_name);
        }
    }
    Ok(())
}

async fn profile(app: &App, command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Show { role } => match Role::from(role) {
            Role::Hr => {
                app.store.require_session(Role::Hr).await?;
                let Some(credentials) = app.store.hr_credentials().await? else {
                    bail!("No HR profile stored");
                };
                println!("Username: {}", credentials.username);
                println!("Company:  {}", credentials.company_name);
                println!(
                    "Image:    {}",
                    if credentials.profile_image.is_some() { "set" } else { "none" }
                );
            }
            Role::JobFinder => {
                app.store.require_session(Role::JobFinder).await?;
                let Some(profile) = app.store.job_finder_profile().await? else {
                    bail!("No job finder profile stored");
                };
                println!("Name:       {}", profile.full_name);
                println!("Email:      {}", profile.email);
                println!("Age:        {}", profile.age);
                println!("Degree:     {}", profile.degree);
                println!("College:    {}", profile.college);
                println!("Experience: {}", profile.experience.as_deref().unwrap_or("-"));
                println!("Skills:     {}", profile.skills.join(", "));
            }
        },
        ProfileCommand::Hr { company, image } => {
            let session = app.store.require_session(Role::Hr).await?;
            let update = HrProfileUpdate {
                company_name: company,
                profile_image: image,
            };
            let credentials = app.store.update_hr_profile(&session.identity, update).await?;
            println!("✓ Profile updated for {}", credentials.username);
        }
        ProfileCommand::JobFinder {
            full_name,
            age,
            degree,
            college,
            experience,
            skills,
            image,
        } => {
            app.store.require_session(Role::JobFinder).await?;
            let Some(mut profile) = app.store.job_finder_profile().await? else {
                bail!("No job finder profile stored");
            };
            if let Some(full_name) = full_name {
                profile.full_name = full_name;
            }
            if let Some(age) = age {
                profile.age = age;
            }
            if let Some(degree) = degree {
                profile.degree = degree;
            }
            if let Some(college) = college {
                profile.college = college;
            }
            if let Some(experience) = experience {
                profile.experience = Some(experience);
            }
            if let Some(skills) = skills {
                profile.skills = skills;
            }
            if let Some(image) = image {
                profile.profile_image = Some(image);
            }
            app.store.update_job_finder_profile(&profile).await?;
            println!("✓ Profile updated for {}", profile.email);
        }
    }
    Ok(())
}

async fn grade(app: &App, file: PathBuf) -> Result<()> {
    let upload = CvUpload::from_path(&file).await?;
    let mut flow = CvAnalysisFlow::new(app.grading_client()?, app.store.clone());

    match flow.submit(upload).await {
        Ok(analysis) => {
            println!("{}", analysis.summary());
            println!("{}", analysis.grade.message());
            if analysis.cv_data.eligible_to_apply() {
                println!("✓ Eligible to apply");
            }
            println!();
            println!("{}", format_cv_data(Some(&analysis.cv_data.extracted_data)));
            Ok(())
        }
        Err(e) => {
            error!("CV analysis failed: {}", e);
            if let Some(banner) = flow.health().banner() {
                eprintln!("{}", banner);
            }
            Err(e.into())
        }
    }
}

async fn cv(app: &App, command: CvCommand) -> Result<()> {
    app.store.require_session(Role::JobFinder).await?;
    match command {
        CvCommand::Show => match app.store.cv_data().await? {
            Some(cv) => {
                let grade = cv.grade();
                println!("File:     {}", cv.file_name);
                println!("Uploaded: {}", cv.uploaded_at.format("%Y-%m-%d %H:%M"));
                println!("Score:    {}/100 ({})", cv.score, grade);
                println!("{}", grade.message());
                println!();
                println!("{}", format_cv_data(Some(&cv.extracted_data)));
            }
            None => println!("{}", format_cv_data(None)),
        },
        CvCommand::Summary => {
            let cv = app.store.cv_data().await?;
            println!("{}", summarize_cv_context(cv.as_ref().map(|c| &c.extracted_data)));
        }
        CvCommand::Clear => {
            app.store.clear_cv_data().await?;
            println!("✓ CV data cleared");
        }
    }
    Ok(())
}

async fn health(app: &App) -> Result<()> {
    let grading = app.grading_client()?;
    let mut monitor = HealthMonitor::new(grading.backend_name());
    let state = monitor.check(&grading).await;
    println!("{:<28} {:<10} {}", grading.backend_name(), state, grading.base_url());

    let mut clients = vec![app.hr_chat_client()?];
    if app.config.job_finder_chat_url() != app.config.services.chat_url {
        clients.push(app.job_finder_chat_client()?);
    }
    for client in clients {
        let mut monitor = HealthMonitor::new(client.backend_name());
        let state = monitor.check(&client).await;
        println!("{:<28} {:<10} {}", client.backend_name(), state, client.base_url());
    }
    Ok(())
}

/// Ask a single question, or loop over stdin until `/quit`.
async fn run_chat<B: ChatBackend>(mut session: ChatSession<B>, message: Option<String>) -> Result<()> {
    if let Some(message) = message {
        ask(&mut session, &message).await?;
        return Ok(());
    }

    session.check_health().await;
    if let Some(banner) = session.health().banner() {
        eprintln!("{}", banner);
    }
    for turn in session.messages() {
        println!("assistant> {}", turn.content);
    }
    println!("(/reset to start over, /sources for citations, /quit to leave; Ctrl-C cancels a pending answer)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                session.reset().await;
                for turn in session.messages() {
                    println!("assistant> {}", turn.content);
                }
            }
            "/sources" => print_sources(&session),
            input => {
                if let Err(e) = ask(&mut session, input).await {
                    eprintln!("{}", e);
                }
            }
        }
    }
    info!("Chat ended after {} turns", session.messages().len());
    Ok(())
}

async fn ask<B: ChatBackend>(session: &mut ChatSession<B>, input: &str) -> Result<()> {
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let result = session.submit(input, Some(&token)).await;
    watcher.abort();

    let reply = result?;
    println!("assistant> {}", reply.content);
    if let Some(banner) = session.health().banner() {
        eprintln!("{}", banner);
    }
    Ok(())
}

fn print_sources<B: ChatBackend>(session: &ChatSession<B>) {
    if session.sources().is_empty() {
        println!("No sources for the last answer");
        return;
    }
    for source in session.sources() {
        println!("- {} ({}) {}", source.title, source.category, source.url);
    }
}
