#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::repl::help_text;
use super::repl::read_patient_file;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AssessmentStep;
use crate::domain::models::BackendName;
use crate::domain::models::ContextDescriptor;
use crate::domain::models::Message;
use crate::domain::models::Page;
use crate::domain::models::QuickSuggestion;
use crate::domain::models::Storage;
use crate::domain::services::PromptDeriver;
use crate::domain::services::SessionStore;
use crate::domain::services::DEFAULT_STORAGE_KEY;
use crate::infrastructure::storage::FileStorage;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn session_storage() -> FileStorage {
    return FileStorage::new(path::PathBuf::from(Config::get(ConfigKey::StorageDir)));
}

pub fn format_message(message: &Message) -> String {
    let timestamp = message.timestamp.format("%Y-%m-%d %H:%M:%S");
    return format!("[{timestamp}] {}: {}", message.role, message.content);
}

pub fn format_suggestions(suggestions: &[QuickSuggestion]) -> String {
    return suggestions
        .iter()
        .enumerate()
        .map(|(idx, suggestion)| {
            if suggestion.is_free_form() {
                return format!("{}. {} (free-form)", idx + 1, suggestion.display_text);
            }
            return format!(
                "{}. {}\n   {}",
                idx + 1,
                suggestion.display_text,
                suggestion.query
            );
        })
        .collect::<Vec<String>>()
        .join("\n");
}

fn parse_page(matches: &ArgMatches) -> Page {
    return matches
        .get_one::<String>("page")
        .and_then(|e| return Page::parse(e))
        .unwrap_or_default();
}

fn parse_step(matches: &ArgMatches) -> Option<AssessmentStep> {
    return matches
        .get_one::<String>("step")
        .and_then(|e| return AssessmentStep::parse(e));
}

async fn print_prompt(matches: &ArgMatches) -> Result<()> {
    let mut context = ContextDescriptor::new(parse_page(matches));
    context.step = parse_step(matches);
    if let Some(patient_file) = matches.get_one::<String>("patient") {
        context.patient_snapshot = Some(read_patient_file(patient_file).await?);
    }

    println!("{}", PromptDeriver::build_system_prompt(&context));
    return Ok(());
}

fn print_suggestions(matches: &ArgMatches) {
    let suggestions = PromptDeriver::quick_suggestions(
        parse_page(matches),
        parse_step(matches),
        matches.get_flag("has-patient"),
    );

    println!(
        "{}",
        format_suggestions(PromptDeriver::visible_suggestions(suggestions))
    );
}

fn print_session() {
    let store = SessionStore::new(Arc::new(session_storage()));
    println!("{}", format!("Context: {}", store.context().label()).bold());

    if store.messages().is_empty() {
        println!("There are no messages in the current session.");
        return;
    }

    let lines = store
        .messages()
        .iter()
        .map(format_message)
        .collect::<Vec<String>>();
    println!("{}", lines.join("\n"));
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_session() -> Command {
    return Command::new("session")
        .about("Inspect or reset the persisted chat session.")
        .subcommand(Command::new("show").about("Print the persisted context and messages."))
        .subcommand(
            Command::new("clear").about("Delete the persisted session, messages and context."),
        )
        .subcommand(Command::new("path").about("Print the path of the persisted session file."));
}

fn arg_page() -> Arg {
    return Arg::new("page")
        .long("page")
        .num_args(1)
        .help(format!("Page the user is on. [default: {}]", Page::default()))
        .value_parser(PossibleValuesParser::new(Page::VARIANTS));
}

fn arg_step() -> Arg {
    return Arg::new("step")
        .long("step")
        .num_args(1)
        .help("Assessment step, only used on the assessment page.")
        .value_parser(PossibleValuesParser::new(AssessmentStep::VARIANTS));
}

fn subcommand_prompt() -> Command {
    return Command::new("prompt")
        .about("Print the system prompt derived for a context.")
        .arg(arg_page())
        .arg(arg_step())
        .arg(
            Arg::new("patient")
                .long("patient")
                .num_args(1)
                .help("Path to a JSON patient snapshot."),
        );
}

fn subcommand_suggestions() -> Command {
    return Command::new("suggestions")
        .about("Print the quick suggestions offered for a context.")
        .arg(arg_page())
        .arg(arg_step())
        .arg(
            Arg::new("has-patient")
                .long("has-patient")
                .help("Whether a patient snapshot is present.")
                .action(ArgAction::SetTrue),
        );
}

fn arg_backend() -> Arg {
    return Arg::new(ConfigKey::Backend.to_string())
        .short('b')
        .long(ConfigKey::Backend.to_string())
        .env("TRIAGE_CHAT_BACKEND")
        .num_args(1)
        .help(format!(
            "The backend hosting the model to connect to. [default: {}]",
            Config::default(ConfigKey::Backend)
        ))
        .value_parser(PossibleValuesParser::new(BackendName::VARIANTS))
        .global(true);
}

fn arg_backend_timeout() -> Arg {
    return Arg::new(ConfigKey::BackendTimeout.to_string())
        .long(ConfigKey::BackendTimeout.to_string())
        .env("TRIAGE_CHAT_BACKEND_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds for a backend reply before giving up. [default: {}]",
            Config::default(ConfigKey::BackendTimeout)
        ))
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("TRIAGE_CHAT_MODEL")
        .num_args(1)
        .help(format!(
            "The model on the backend to consume. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return format!("CHAT {line}").bold().underline().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("triage-chat")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start or resume the chat session."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_prompt())
        .subcommand(subcommand_session())
        .subcommand(subcommand_suggestions())
        .arg(arg_backend())
        .arg(arg_backend_timeout())
        .arg(arg_model())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("TRIAGE_CHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::OllamaURL.to_string())
                .long(ConfigKey::OllamaURL.to_string())
                .env("TRIAGE_CHAT_OLLAMA_URL")
                .num_args(1)
                .help(format!("Ollama API URL when using the Ollama backend. [default: {}]", Config::default(ConfigKey::OllamaURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OpenAiURL.to_string())
                .long(ConfigKey::OpenAiURL.to_string())
                .env("TRIAGE_CHAT_OPENAI_URL")
                .num_args(1)
                .help(format!("OpenAI API URL when using the OpenAI backend. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::OpenAiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OpenAiToken.to_string())
                .long(ConfigKey::OpenAiToken.to_string())
                .env("TRIAGE_CHAT_OPENAI_TOKEN")
                .num_args(1)
                .help("OpenAI API token when using the OpenAI backend.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StorageDir.to_string())
                .long(ConfigKey::StorageDir.to_string())
                .env("TRIAGE_CHAT_STORAGE_DIR")
                .num_args(1)
                .help(format!("Directory the chat session is persisted in. [default: {}]", Config::default(ConfigKey::StorageDir)))
                .global(true),
        );
}

/// Handles one-shot subcommands. Returns `true` when the chat loop should
/// start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("prompt", subcmd_matches)) => {
            print_prompt(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("session", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("show", _)) => {
                    print_session();
                }
                Some(("clear", _)) => {
                    session_storage().remove(DEFAULT_STORAGE_KEY)?;
                    println!("Cleared the persisted session");
                }
                Some(("path", _)) => {
                    let file_path = session_storage().get_file_path(DEFAULT_STORAGE_KEY);
                    println!("{}", file_path.to_string_lossy());
                }
                _ => {
                    subcommand_session().print_long_help()?;
                }
            }
            return Ok(false);
        }
        Some(("suggestions", subcmd_matches)) => {
            print_suggestions(subcmd_matches);
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
