//! Terminal lesson editor for the Intellecta admin API.

mod app;
mod remote;
mod ui;

use std::{
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    time::Duration,
};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use intellecta_admin_client::RestClient;
use intellecta_admin_config::Config;
use intellecta_admin_engine::{ApiError, Editor, Lesson, LessonStore, TopicPicker};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Action, App};

/// Create or edit a lesson
#[derive(Parser, Debug)]
#[command(name = "intellecta-admin")]
#[command(about = "Terminal lesson editor for the Intellecta admin API")]
struct Args {
    /// Edit the stored lesson with this id
    #[arg(short, long, conflicts_with = "topic")]
    lesson: Option<String>,

    /// Topic a new lesson starts under
    #[arg(short, long)]
    topic: Option<String>,

    /// API base URL, overriding the config file
    #[arg(long)]
    api_url: Option<String>,

    /// File holding the bearer token, overriding the config file
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Write --api-url and --token-file to the config file
    #[arg(long)]
    save_config: bool,

    /// Print the lessons of --topic and exit
    #[arg(long, requires = "topic")]
    list: bool,

    /// Delete the lesson with this id and exit
    #[arg(long, value_name = "LESSON", conflicts_with_all = ["lesson", "list"])]
    delete: Option<String>,
}

impl Args {
    /// Apply the command-line overrides on top of the loaded config
    fn apply_to(&self, config: &mut Config) {
        if let Some(api_url) = &self.api_url {
            config.api_base_url = api_url.trim_end_matches('/').to_string();
        }
        if let Some(token_file) = &self.token_file {
            config.token_path = token_file.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging goes to stderr, which the alternate screen hides, so stay quiet unless asked
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    }

    let mut config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };
    args.apply_to(&mut config);
    if args.save_config {
        let config_path = Config::config_path();
        if let Err(e) = config.save() {
            eprintln!("Error: Failed to save config to {}: {e}", config_path.display());
            process::exit(1);
        }
        println!("Saved settings to {}", config_path.display());
    }

    let token = match config.read_token() {
        Ok(Some(token)) => Some(token),
        Ok(None) => {
            eprintln!("Error: Authentication required");
            eprintln!("Store a token in {}", config.token_path.display());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let client = RestClient::new(
        config.api_base_url.as_str(),
        token,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    log::info!("using API at {}", client.base_url());

    if let Some(lesson_id) = &args.delete {
        match remote::delete_lesson(&client, lesson_id).await {
            Ok(()) => println!("Deleted lesson {lesson_id}"),
            Err(e) => fail(
                &format!("Failed to delete lesson {lesson_id}"),
                &e,
                &config.token_path,
            ),
        }
        return Ok(());
    }
    if args.list {
        let topic = args.topic.as_deref().unwrap_or_default();
        match remote::list_lessons(&client, topic).await {
            Ok(lines) if lines.is_empty() => println!("No lessons in topic {topic}"),
            Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
            Err(e) => fail(
                &format!("Failed to load lessons of topic {topic}"),
                &e,
                &config.token_path,
            ),
        }
        return Ok(());
    }

    let editor = match &args.lesson {
        Some(lesson_id) => match client.lesson(lesson_id).await {
            Ok(lesson) => Editor::from_lesson(lesson),
            Err(e) => fail(
                &format!("Failed to load lesson {lesson_id}"),
                &e,
                &config.token_path,
            ),
        },
        None => match &args.topic {
            Some(topic) => Editor::for_topic(topic.as_str()),
            None => Editor::new(),
        },
    };

    let mut picker = TopicPicker::new();
    let preset_topic = Some(editor.draft().topic.as_str()).filter(|t| !t.is_empty());
    picker.load(&client, preset_topic).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(editor, picker);
    let res = run_app(&mut terminal, &mut app, &client, &config.token_path).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match res {
        Ok(Some(lesson)) => println!("Saved lesson {} ({})", lesson.title, lesson.id),
        Ok(None) => {}
        Err(err) => println!("{err:?}"),
    }

    Ok(())
}

fn fail(context: &str, error: &ApiError, token_path: &Path) -> ! {
    eprintln!("Error: {context}: {}", remote::describe_error(error, token_path));
    process::exit(1);
}

/// Event loop; returns the saved lesson when a submission succeeds
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: &RestClient,
    token_path: &Path,
) -> Result<Option<Lesson>> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key.code) {
            Action::None => {}
            Action::Quit => return Ok(None),
            Action::CycleCourse => app.cycle_course(client).await,
            Action::Submit => {
                let payload = match app.editor.begin_submit() {
                    Ok(payload) => payload,
                    Err(e) => {
                        log::debug!("submission rejected: {e}");
                        continue;
                    }
                };
                // Draw once so "Saving..." shows while the request is in flight
                terminal.draw(|f| ui::ui(f, app))?;

                let result = match app.editor.lesson_id() {
                    Some(id) => client.update_lesson(id, &payload).await,
                    None => client.create_lesson(&payload).await,
                };
                match app.editor.finish_submit(result) {
                    Ok(lesson) => return Ok(Some(lesson)),
                    Err(e) => app.submit_failed(&e, token_path),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_persist_to_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let token_file = temp_dir.path().join("token");
        let args = Args::try_parse_from([
            "intellecta-admin",
            "--api-url",
            "http://localhost:5000/api/v1/",
            "--token-file",
            token_file.to_str().unwrap(),
            "--save-config",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply_to(&mut config);
        config.save_to_path(&config_file).unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert!(args.save_config);
        assert_eq!(loaded.api_base_url, "http://localhost:5000/api/v1");
        assert_eq!(loaded.token_path, token_file);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = Args::try_parse_from(["intellecta-admin"]).unwrap();
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_list_needs_topic() {
        let error = Args::try_parse_from(["intellecta-admin", "--list"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);

        let args = Args::try_parse_from(["intellecta-admin", "--list", "--topic", "t1"]).unwrap();
        assert!(args.list);
    }

    #[test]
    fn test_delete_conflicts_with_edit() {
        let error = Args::try_parse_from(["intellecta-admin", "--delete", "l1", "--lesson", "l2"])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ArgumentConflict);
    }
}
