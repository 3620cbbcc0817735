//! Interactive studio binary.
//!
//! A line-driven front end for the summarization backend: reads commands
//! from stdin, streams completion output to stdout as it arrives, and
//! keeps all state mutations on this single task. Tracing goes to stderr
//! so stdout stays a clean presentation channel.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use recap::completion::{CompletionCoordinator, HttpCompletionBackend};
use recap::prompts::{self, PromptTemplate};
use recap::studio::{StateChange, Studio};
use recap::theme::{EnvColorSchemeProbe, FileThemeStore, ThemeController};
use recap::StudioConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = StudioConfig::load_or_default()?;

    // Resolve the theme before the first themed output so the banner
    // paints correctly from the start.
    let theme = ThemeController::resolve(
        Box::new(FileThemeStore::at_default_path()),
        &EnvColorSchemeProbe,
    );

    let backend = Arc::new(HttpCompletionBackend::new(&config.api)?);
    let (coordinator, mut events) = CompletionCoordinator::new(backend);
    let client = reqwest::Client::new();
    let base_url = config.api.base_url.clone();
    let mut studio = Studio::new(&config, theme, coordinator);
    let mut templates: Vec<PromptTemplate> = Vec::new();

    banner(&studio);
    print_marker()?;

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin).lines();

    loop {
        tokio::select! {
            line = reader.next_line() => {
                let Some(line) = line? else { break };
                let keep_going =
                    handle_command(line.trim(), &mut studio, &client, &base_url, &mut templates)
                        .await?;
                if !keep_going {
                    break;
                }
                if !studio.completion().in_flight {
                    print_marker()?;
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match studio.apply_event(event) {
                    StateChange::Appended(text) => {
                        print!("{text}");
                        std::io::stdout().flush()?;
                    }
                    StateChange::Finished => {
                        println!();
                        print_marker()?;
                    }
                    StateChange::Failed(error) => {
                        println!();
                        println!("request failed: {error} (partial output above is kept)");
                        print_marker()?;
                    }
                    StateChange::IgnoredStale => {}
                }
            }
        }
    }

    tracing::info!("recap-studio shut down cleanly");
    Ok(())
}

/// Dispatch one command line. Returns `false` to exit.
async fn handle_command(
    line: &str,
    studio: &mut Studio,
    client: &reqwest::Client,
    base_url: &str,
    templates: &mut Vec<PromptTemplate>,
) -> anyhow::Result<bool> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" => print_help(),
        "quit" | "exit" => return Ok(false),
        "theme" => {
            let theme = studio.toggle_theme();
            banner(studio);
            println!("theme is now {theme}");
        }
        "temp" => match rest.parse::<f64>() {
            Ok(value) => {
                studio.set_temperature(value);
                println!("temperature set to {:.1}", studio.temperature());
            }
            Err(_) => println!("usage: temp <0.0-1.0>"),
        },
        "video" => {
            if rest.is_empty() {
                println!("usage: video <id>");
            } else {
                studio.on_video_uploaded(rest);
                println!("selected video {rest}");
            }
        }
        "prompt" => {
            studio.set_prompt(rest);
            println!("prompt updated ({} chars)", rest.len());
        }
        "templates" => match prompts::fetch_prompt_templates(client, base_url).await {
            Ok(fetched) => {
                *templates = fetched;
                if templates.is_empty() {
                    println!("no templates available");
                }
                for (index, template) in templates.iter().enumerate() {
                    println!("  [{index}] {}", template.title);
                }
            }
            Err(e) => println!("failed to fetch templates: {e}"),
        },
        "use" => match rest.parse::<usize>().ok().and_then(|i| templates.get(i)) {
            Some(template) => {
                println!("using template: {}", template.title);
                studio.on_prompt_selected(template.template.clone());
            }
            None => println!("usage: use <index> (run `templates` first)"),
        },
        "show" => show(studio),
        "run" => {
            if studio.prompt().is_empty() {
                println!("prompt is empty; set one with `prompt <text>` or `use <index>`");
            } else {
                studio.submit();
            }
        }
        other => println!("unknown command `{other}`; try `help`"),
    }

    Ok(true)
}

fn banner(studio: &Studio) {
    // The dark root marker selects the banner palette.
    let title = if studio.dark_root() {
        "\x1b[1;97;40m recap studio \x1b[0m"
    } else {
        "\x1b[1;30;107m recap studio \x1b[0m"
    };
    println!("{title}");
}

fn show(studio: &Studio) {
    println!("theme:       {}", studio.theme());
    println!("temperature: {:.1}", studio.temperature());
    println!("video:       {}", studio.video_id().unwrap_or("(none)"));
    println!("prompt:      {}", studio.prompt());
    let completion = studio.completion();
    if completion.in_flight {
        println!("status:      generating…");
    } else if let Some(error) = &completion.last_error {
        println!("status:      failed ({error})");
    }
    if !completion.result_text.is_empty() {
        println!("result:      {}", completion.result_text);
    }
}

fn print_help() {
    println!("commands:");
    println!("  prompt <text>   set the prompt (may embed {})", prompts::TRANSCRIPTION_PLACEHOLDER);
    println!("  templates       list prompt templates from the backend");
    println!("  use <index>     replace the prompt with a template");
    println!("  temp <value>    set generation temperature (0.0-1.0)");
    println!("  video <id>      select an uploaded video by id");
    println!("  run             submit and stream the completion");
    println!("  show            print current session state");
    println!("  theme           toggle light/dark");
    println!("  quit            exit");
}

fn print_marker() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
