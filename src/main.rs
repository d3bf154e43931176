//! querywatch - Reactive Search Query Pipeline
//!
//! Replays a host interaction script against an in-memory search input and prints every
//! combined query state the pipeline emits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Arg, Command};
use querywatch::consumer::QueryConsumer;
use querywatch::script::{replay, HostAction};
use querywatch::{
    apply_placeholder_effect, watch_query_state, InputElement, SearchQuery, TransformKind,
    WatchOptions,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Prints each state together with the placeholder the element shows at that moment.
struct PrintingConsumer {
    element: Arc<InputElement>,
}

#[async_trait]
impl QueryConsumer for PrintingConsumer {
    async fn consume(&mut self, query: SearchQuery) -> querywatch::Result<()> {
        println!(
            "  state {}  placeholder {:?}",
            query,
            self.element.placeholder()
        );
        Ok(())
    }
}

/// Settings after merging the optional config file with command-line flags.
struct Settings {
    value: String,
    placeholder: String,
    transform: TransformKind,
}

#[cfg(feature = "config")]
fn base_settings(matches: &clap::ArgMatches) -> Result<Settings> {
    use querywatch::config::WatchConfig;

    let config = match matches.get_one::<String>("config") {
        Some(path) => WatchConfig::load(&PathBuf::from(path))
            .with_context(|| format!("failed to load config {}", path))?,
        None => WatchConfig::load_default().context("failed to load default config")?,
    };
    Ok(Settings {
        value: config.initial_value,
        placeholder: config.placeholder,
        transform: config.transform,
    })
}

#[cfg(not(feature = "config"))]
fn base_settings(_matches: &clap::ArgMatches) -> Result<Settings> {
    Ok(Settings {
        value: String::new(),
        placeholder: querywatch::element::memory::DEFAULT_PLACEHOLDER.to_string(),
        transform: TransformKind::default(),
    })
}

fn read_script(path: Option<&String>) -> Result<String> {
    match path.map(String::as_str) {
        None | Some("-") => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("failed to read script from stdin")?;
            Ok(script)
        }
        Some(path) => {
            let path = PathBuf::from(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read script {}", path.display()))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let matches = Command::new("querywatch")
        .version(querywatch::VERSION)
        .about("Replay search input interactions through the query pipeline")
        .long_about(
            "querywatch drives an in-memory search input with a script of host actions \
             (type, keyup, set, clear, focus, focus-clear, blur, fail, close, cancel) and \
             prints every de-duplicated, focus-aware query state it produces.",
        )
        .arg(
            Arg::new("script")
                .help("Path to the interaction script ('-' or omitted reads stdin)")
                .index(1),
        )
        .arg(
            Arg::new("value")
                .long("value")
                .help("Initial raw text of the input"),
        )
        .arg(
            Arg::new("placeholder")
                .long("placeholder")
                .help("Default placeholder text"),
        )
        .arg(
            Arg::new("transform")
                .long("transform")
                .help("Normalization applied to the raw text: trim or identity"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a TOML configuration file"),
        )
        .get_matches();

    let mut settings = base_settings(&matches)?;
    if let Some(value) = matches.get_one::<String>("value") {
        settings.value = value.clone();
    }
    if let Some(placeholder) = matches.get_one::<String>("placeholder") {
        settings.placeholder = placeholder.clone();
    }
    if let Some(transform) = matches.get_one::<String>("transform") {
        settings.transform = transform.parse()?;
    }

    let script = read_script(matches.get_one::<String>("script"))?;
    let actions = HostAction::parse_script(&script)?;

    let element = Arc::new(InputElement::with_placeholder(
        settings.value,
        settings.placeholder,
    ));
    let options = WatchOptions::new().with_transform(settings.transform.into_fn());
    let (states, _handle) = watch_query_state(Arc::clone(&element), options);
    let states = states.pipe(apply_placeholder_effect(Arc::clone(&element)));

    let mut printer = PrintingConsumer {
        element: Arc::clone(&element),
    };
    let outcome = replay(&actions, &element, states, &mut printer, |action| {
        println!("> {:?}", action);
    })
    .await;

    match outcome {
        Ok(delivered) => println!("{} state(s) delivered", delivered),
        Err(err) => println!("sequence ended with error: {}", err),
    }
    println!("placeholder restored to {:?}", element.placeholder());

    Ok(())
}
