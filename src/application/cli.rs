#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use super::session;
use super::session::format_template;
use super::session::HELP_TEXT;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::saved_code_key;
use crate::domain::models::LanguageName;
use crate::domain::models::PageStyle;
use crate::domain::models::StoreBox;
use crate::domain::models::StoreName;
use crate::domain::models::Template;
use crate::domain::services::ThemeDetector;
use crate::domain::services::TemplateStore;
use crate::infrastructure::stores::StoreManager;

/// What `main` should run once the command line has been handled.
pub struct SessionArgs {
    pub url: String,
    pub native_form: bool,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn open_store() -> Result<StoreBox> {
    return Ok(StoreManager::get(
        Config::store_name()?,
        &Config::get(ConfigKey::StoreFile),
    ));
}

fn get_language(matches: &ArgMatches) -> Result<LanguageName> {
    let language = matches
        .get_one::<String>("language")
        .map(|e| return e.as_str())
        .unwrap_or_default();

    match LanguageName::parse(language) {
        Some(language) => return Ok(language),
        None => bail!(format!("Unknown language '{language}'")),
    }
}

async fn print_templates_list(language: LanguageName) -> Result<()> {
    let templates = TemplateStore::new(open_store()?)
        .list(language)
        .await?
        .iter()
        .map(format_template)
        .collect::<Vec<String>>();

    if templates.is_empty() {
        println!("There are no {language} templates yet. Save your first one!");
    } else {
        println!("{}", templates.join("\n"));
    }

    return Ok(());
}

async fn save_template(matches: &ArgMatches) -> Result<()> {
    let language = get_language(matches)?;

    let code = if let Some(code_file) = matches.get_one::<String>("file") {
        fs::read_to_string(code_file).await?
    } else {
        matches
            .get_one::<String>("code")
            .map(|e| return e.to_string())
            .unwrap_or_default()
    };

    let template = Template {
        id: matches
            .get_one::<String>("id")
            .map(|e| return e.to_string())
            .unwrap_or_default(),
        name: matches
            .get_one::<String>("name")
            .map(|e| return e.to_string())
            .unwrap_or_default(),
        code,
    };

    if template.name.trim().is_empty() {
        bail!("Template name must not be empty");
    }

    match TemplateStore::new(open_store()?).save(language, template).await? {
        Some(saved) => println!("Saved {language} template {} (ID: {})", saved.name, saved.id),
        None => bail!("No template with that ID exists, nothing was saved"),
    }

    return Ok(());
}

async fn print_saved_code(problem_id: &str) -> Result<()> {
    let key = saved_code_key(problem_id);
    let res = open_store()?.get(&[&key]).await?;

    match res.get(&key).and_then(|e| return e.as_str()) {
        Some(code) => println!("{code}"),
        None => println!("Nothing saved for problem {problem_id} yet."),
    }

    return Ok(());
}

fn print_theme(matches: &ArgMatches) {
    let classes = |name: &str| {
        return matches
            .get_many::<String>(name)
            .map(|values| return values.map(|e| return e.to_string()).collect::<Vec<String>>())
            .unwrap_or_default();
    };

    let style = PageStyle {
        background_color: Config::get(ConfigKey::Background),
        body_classes: classes("body-class"),
        root_classes: classes("root-class"),
    };

    if ThemeDetector::is_dark(&style) {
        println!("dark");
    } else {
        println!("light");
    }
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

fn arg_url() -> Arg {
    return Arg::new("url")
        .short('u')
        .long("url")
        .help("URL of the CSES page, e.g. https://cses.fi/problemset/task/1068")
        .num_args(1)
        .required(true);
}

fn arg_language() -> Arg {
    return Arg::new("language")
        .short('l')
        .long("language")
        .help("Language the template belongs to.")
        .num_args(1)
        .value_parser(PossibleValuesParser::new(LanguageName::VARIANTS))
        .required(true);
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

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for CSES Companion")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running with environment variable RUST_LOG=cses_companion")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_session() -> Command {
    return Command::new("session")
        .about("Open a problem page with the companion editor and drive it from stdin.")
        .after_help(HELP_TEXT.trim())
        .arg(arg_url())
        .arg(
            Arg::new("no-form")
                .long("no-form")
                .help("Open the page without its native submission form, so submissions are handed to the submit page.")
                .action(ArgAction::SetTrue),
        );
}

fn subcommand_confirm() -> Command {
    return Command::new("confirm")
        .about("Open a submission page and submit the code parked by a task page.")
        .arg(arg_url());
}

fn subcommand_templates_save() -> Command {
    return Command::new("save")
        .about("Create a template, or update one in place when an ID is given.")
        .arg(arg_language())
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .help("Template name")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("id")
                .short('i')
                .long("id")
                .help("ID of the template to update")
                .num_args(1),
        )
        .arg(
            Arg::new("code")
                .long("code")
                .help("Template code")
                .num_args(1),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Read the template code from a file")
                .num_args(1),
        )
        .group(
            ArgGroup::new("code-args")
                .args(["code", "file"])
                .required(true),
        );
}

fn subcommand_templates() -> Command {
    return Command::new("templates")
        .about("Manage code templates.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List templates of a language with their ids.")
                .arg(arg_language()),
        )
        .subcommand(subcommand_templates_save())
        .subcommand(
            Command::new("delete")
                .about("Delete a template.")
                .arg(arg_language())
                .arg(
                    Arg::new("id")
                        .short('i')
                        .long("id")
                        .help("Template ID")
                        .num_args(1)
                        .required(true),
                ),
        );
}

fn subcommand_saved() -> Command {
    return Command::new("saved")
        .about("Inspect auto-saved code.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("show")
                .about("Print the code auto-saved for a problem.")
                .arg(
                    Arg::new("problem")
                        .short('p')
                        .long("problem")
                        .help("Problem ID, e.g. 1068")
                        .num_args(1)
                        .required(true),
                ),
        );
}

fn subcommand_theme() -> Command {
    return Command::new("theme")
        .about("Classify a page style as dark or light, using --background as the body background.")
        .arg(
            Arg::new("body-class")
                .long("body-class")
                .help("Class on the page body. Can be repeated.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("root-class")
                .long("root-class")
                .help("Class on the document root. Can be repeated.")
                .action(ArgAction::Append),
        );
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("cses-companion")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand(subcommand_session())
        .subcommand(subcommand_confirm())
        .subcommand(subcommand_templates())
        .subcommand(subcommand_saved())
        .subcommand(subcommand_theme())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("CSES_COMPANION_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::Store.to_string())
                .long(ConfigKey::Store.to_string())
                .env("CSES_COMPANION_STORE")
                .num_args(1)
                .help(format!("Where templates, preferences and saved code are kept. [default: {}]", Config::default(ConfigKey::Store)))
                .value_parser(PossibleValuesParser::new(StoreName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StoreFile.to_string())
                .long(ConfigKey::StoreFile.to_string())
                .env("CSES_COMPANION_STORE_FILE")
                .num_args(1)
                .help("Path to the JSON file used by the file store. Defaults to storage.json in the cache directory.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OutboxDir.to_string())
                .long(ConfigKey::OutboxDir.to_string())
                .env("CSES_COMPANION_OUTBOX_DIR")
                .num_args(1)
                .help(format!("Directory submitted files are written to. [default: {}]", Config::default(ConfigKey::OutboxDir)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::AutoSaveInterval.to_string())
                .long(ConfigKey::AutoSaveInterval.to_string())
                .env("CSES_COMPANION_AUTO_SAVE_INTERVAL")
                .num_args(1)
                .help(format!("Time in milliseconds between auto-saves of the editor contents. [default: {}]", Config::default(ConfigKey::AutoSaveInterval)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ThemeDebounce.to_string())
                .long(ConfigKey::ThemeDebounce.to_string())
                .env("CSES_COMPANION_THEME_DEBOUNCE")
                .num_args(1)
                .help(format!("Time in milliseconds the page must stay unchanged before the editor theme follows it. [default: {}]", Config::default(ConfigKey::ThemeDebounce)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Background.to_string())
                .long(ConfigKey::Background.to_string())
                .env("CSES_COMPANION_BACKGROUND")
                .num_args(1)
                .help(format!("Computed background colour of the page body. [default: {}]", Config::default(ConfigKey::Background)))
                .global(true),
        );
}

pub async fn parse() -> Result<Option<SessionArgs>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir()
                        .unwrap_or_default()
                        .join("cses-companion/debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("session", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let url = subcmd_matches
                .get_one::<String>("url")
                .map(|e| return e.to_string())
                .unwrap_or_default();

            return Ok(Some(SessionArgs {
                url,
                native_form: !subcmd_matches.get_flag("no-form"),
            }));
        }
        Some(("confirm", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let url = subcmd_matches
                .get_one::<String>("url")
                .map(|e| return e.as_str())
                .unwrap_or_default();

            let options = session::SessionOptions::from_config(true)?;
            let outcome = session::confirm(url, &options).await?;
            println!("Submission {outcome}");
            return Ok(None);
        }
        Some(("templates", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("list", list_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, list_matches]).await?;
                print_templates_list(get_language(list_matches)?).await?;
                return Ok(None);
            }
            Some(("save", save_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, save_matches]).await?;
                save_template(save_matches).await?;
                return Ok(None);
            }
            Some(("delete", delete_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, delete_matches]).await?;
                let language = get_language(delete_matches)?;
                if let Some(id) = delete_matches.get_one::<String>("id") {
                    TemplateStore::new(open_store()?).delete(language, id).await?;
                    println!("Deleted {language} template {id}");
                }
                return Ok(None);
            }
            _ => {
                subcommand_templates().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("saved", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("show", show_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, show_matches]).await?;
                if let Some(problem_id) = show_matches.get_one::<String>("problem") {
                    print_saved_code(problem_id).await?;
                }
                return Ok(None);
            }
            _ => {
                subcommand_saved().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("theme", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            print_theme(subcmd_matches);
            return Ok(None);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        _ => {
            println!("{}", Paint::yellow("Pick a subcommand, see --help."));
            return Ok(None);
        }
    }
}
