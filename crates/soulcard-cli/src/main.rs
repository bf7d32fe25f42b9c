//! Soulcard CLI - cards, fortunes and persona chat from the terminal
//!
//! Talks to a running soulcard-server. `bazi` runs locally.

mod api;
mod config;
mod render;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use soulcard::{
    BirthChart, ChatMode, ConversationTurn, DiagnosisMode, EarthlyBranch, TurnRole,
    REQUIRED_USER_TURNS,
};
use std::fs;

use api::SoulcardClient;
use config::{Config, FortuneForm};

#[derive(Parser)]
#[command(name = "soulcard")]
#[command(about = "Soulcard CLI - note cards, mood diagnosis, daily fortune and personality chat", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a note into a card
    Card {
        /// Note text (or use -f for file)
        text: Option<String>,
        /// Read text from file
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Diagnose the mood behind a piece of text
    Diagnose {
        /// Text to diagnose (prompts if omitted)
        text: Option<String>,
        /// gentle or savage
        #[arg(short, long, default_value = "gentle")]
        mode: DiagnosisMode,
        /// Also draw a fortune card from the diagnosis
        #[arg(long)]
        fortune: bool,
    },

    /// Daily fortune from name, birth date and birth hour
    Fortune {
        #[arg(short, long)]
        name: Option<String>,
        /// YYYY-MM-DD
        #[arg(short, long)]
        birth_date: Option<NaiveDate>,
        /// Hour branch: 午, 午时 or wu
        #[arg(short = 't', long)]
        birth_time: Option<EarthlyBranch>,
        /// Target date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Five-turn persona chat that ends with a personality card
    Chat {
        /// tieba, tea, savage or cute
        #[arg(short, long, default_value = "tieba")]
        mode: ChatMode,
    },

    /// Zodiac and BaZi for a birth date and hour (no server call)
    Bazi {
        #[arg(short, long)]
        birth_date: NaiveDate,
        #[arg(short = 't', long)]
        birth_time: EarthlyBranch,
    },

    /// Show or update configuration
    Config {
        /// Server URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Card { text, file } => cmd_card(text, file).await,
        Commands::Diagnose { text, mode, fortune } => cmd_diagnose(text, mode, fortune).await,
        Commands::Fortune {
            name,
            birth_date,
            birth_time,
            date,
        } => cmd_fortune(name, birth_date, birth_time, date).await,
        Commands::Chat { mode } => cmd_chat(mode).await,
        Commands::Bazi {
            birth_date,
            birth_time,
        } => cmd_bazi(birth_date, birth_time),
        Commands::Config { base_url } => cmd_config(base_url).await,
    }
}

// ============================================
// Command Implementations
// ============================================

fn client() -> Result<SoulcardClient> {
    let config = Config::load()?;
    Ok(SoulcardClient::new(&config.base_url))
}

fn read_text(text: Option<String>, file: Option<String>, prompt: &str) -> Result<String> {
    match (text, file) {
        (Some(t), None) => Ok(t),
        (None, Some(f)) => {
            fs::read_to_string(&f).with_context(|| format!("Failed to read file: {}", f))
        }
        (Some(_), Some(_)) => bail!("Cannot specify both text and --file"),
        (None, None) => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .context("Failed to read input"),
    }
}

async fn cmd_card(text: Option<String>, file: Option<String>) -> Result<()> {
    let text = read_text(text, file, "笔记内容")?;
    let card = client()?.card(&text).await?;
    render::card(&card);
    Ok(())
}

async fn cmd_diagnose(text: Option<String>, mode: DiagnosisMode, fortune: bool) -> Result<()> {
    let text = read_text(text, None, "此刻的心情")?;
    let client = client()?;

    let diagnosis = client.diagnose(&text, mode).await?;
    render::diagnosis(&diagnosis);

    if fortune {
        println!();
        let card = client.fortune_card(&diagnosis).await?;
        render::fortune_card(&card);
    }

    Ok(())
}

fn prompt_field(label: &str, cached: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(label);
    if let Some(value) = cached {
        input = input.default(value.to_string());
    }
    input
        .interact_text()
        .with_context(|| format!("Failed to read {}", label))
}

/// Use the given value if it parses, otherwise prompt until it does
fn resolve<T: std::str::FromStr>(label: &str, value: Option<String>) -> Result<(T, String)> {
    if let Some(raw) = value {
        if let Ok(parsed) = raw.parse() {
            return Ok((parsed, raw));
        }
        eprintln!("{} Ignoring invalid {}: {}", "!".yellow(), label, raw);
    }

    loop {
        let raw = prompt_field(label, None)?;
        match raw.trim().parse() {
            Ok(parsed) => return Ok((parsed, raw.trim().to_string())),
            Err(_) => eprintln!("{} Invalid {}: {}", "✗".red(), label, raw),
        }
    }
}

async fn cmd_fortune(
    name: Option<String>,
    birth_date: Option<NaiveDate>,
    birth_time: Option<EarthlyBranch>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let mut config = Config::load()?;

    let form = config.fortune.overlay(
        name,
        birth_date.map(|d| d.to_string()),
        birth_time.map(|b| b.to_string()),
    );

    let name = match form.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => prompt_field("姓名", None)?,
    };
    let (birth_date, birth_date_raw): (NaiveDate, String) =
        resolve("出生日期 (YYYY-MM-DD)", form.birth_date)?;
    let (birth_time, _): (EarthlyBranch, String) = resolve("出生时辰 (如 午 / wu)", form.birth_time)?;

    config.fortune = FortuneForm {
        name: Some(name.clone()),
        birth_date: Some(birth_date_raw),
        birth_time: Some(birth_time.to_string()),
    };
    config.save()?;

    let fortune = client()?
        .daily_fortune(&name, birth_date, birth_time.as_char(), date)
        .await?;
    render::daily_fortune(&fortune);

    Ok(())
}

fn user_turns(messages: &[ConversationTurn]) -> usize {
    messages.iter().filter(|t| t.role == TurnRole::User).count()
}

async fn cmd_chat(mode: ChatMode) -> Result<()> {
    let client = client()?;
    let mut messages: Vec<ConversationTurn> = Vec::new();

    println!(
        "{} {} 轮对话后生成人格卡。输入 /report 提前生成，/quit 退出。",
        format!("[{}]", mode).cyan(),
        REQUIRED_USER_TURNS
    );

    loop {
        let done = user_turns(&messages);
        let prompt = if done >= REQUIRED_USER_TURNS {
            "/report 或 /quit".to_string()
        } else {
            format!("你 ({}/{})", done + 1, REQUIRED_USER_TURNS)
        };
        let line: String = Input::new()
            .with_prompt(prompt)
            .interact_text()
            .context("Failed to read input")?;

        match line.trim() {
            "/quit" => return Ok(()),
            "/report" => {
                let card = client.personality_report(&messages, mode).await?;
                render::personality(&card);
                return Ok(());
            }
            _ if done >= REQUIRED_USER_TURNS => continue,
            _ => {}
        }

        match client.personality_turn(&messages, &line, mode).await {
            Ok(turn) => {
                messages = turn.messages;
                println!("{} {}", "AI:".magenta().bold(), turn.reply);

                if let Some(card) = turn.profile {
                    println!();
                    render::personality(&card);
                    return Ok(());
                }
                if let Some(err) = turn.profile_error {
                    eprintln!("{} {} [{}]", "✗".red(), err.error, err.kind);
                    println!("{}", "输入 /report 重试".dimmed());
                }
            }
            Err(e) => eprintln!("{} {:#}", "✗".red(), e),
        }
    }
}

fn cmd_bazi(birth_date: NaiveDate, birth_time: EarthlyBranch) -> Result<()> {
    render::birth_chart(&BirthChart::compute(birth_date, birth_time));
    Ok(())
}

async fn cmd_config(base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = base_url {
        config.set_base_url(&url);

        print!("Testing connection... ");
        match SoulcardClient::new(&config.base_url).health().await {
            Ok(true) => println!("{}", "OK".green()),
            _ => println!("{}", "Unreachable (saved anyway)".yellow()),
        }

        config.save()?;
        println!("{} Base URL saved to {:?}", "✓".green(), Config::config_path()?);
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  Cached fortune form: {} {} {}",
        config.fortune.name.as_deref().unwrap_or("-").cyan(),
        config.fortune.birth_date.as_deref().unwrap_or("-"),
        config.fortune.birth_time.as_deref().unwrap_or("-"),
    );

    Ok(())
}
