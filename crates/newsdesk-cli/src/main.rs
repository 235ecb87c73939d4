mod app;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use newsdesk_client::ApiClient;
use newsdesk_config::Config;
use newsdesk_engine::editing::DocumentEditor;
use newsdesk_engine::models::{BlockMeta, ContentBlock, ContentKind};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::Path,
    process,
};
use tokio::runtime::Runtime;

#[derive(Debug, PartialEq)]
struct CliArgs {
    api_base_url: Option<String>,
    kind: ContentKind,
    id: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut api_base_url = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--api" {
            let url = iter.next().ok_or("--api needs a URL")?;
            api_base_url = Some(url.clone());
        } else if arg.starts_with("--") {
            return Err(format!("unknown option {arg}"));
        } else {
            positional.push(arg.as_str());
        }
    }

    let (resource, id) = match positional.as_slice() {
        [resource] => (*resource, None),
        [resource, id] => (*resource, Some(id.to_string())),
        _ => return Err("expected <resource> [id]".to_string()),
    };
    let kind = ContentKind::from_resource(resource)
        .ok_or_else(|| format!("unknown resource '{resource}', expected news or pages"))?;

    Ok(CliArgs {
        api_base_url,
        kind,
        id,
    })
}

/// Combine the command line with the config file. The command line URL wins.
/// A URL given when no config file exists is saved for later runs.
fn resolve_config(
    api_base_url: Option<String>,
    loaded: Option<Config>,
    config_path: &Path,
) -> Option<Config> {
    match (api_base_url, loaded) {
        (Some(url), Some(config)) => Some(Config {
            api_base_url: url,
            ..config
        }),
        (Some(url), None) => {
            let config = Config::new(url);
            match config.save_to_path(config_path) {
                Ok(()) => eprintln!("Saved API URL to {}", config_path.display()),
                Err(e) => eprintln!("Warning: could not save config file: {e:#}"),
            }
            Some(config)
        }
        (None, loaded) => loaded,
    }
}

fn usage_line(program: Option<String>) -> String {
    let program = program.unwrap_or_else(|| "newsdesk-cli".to_string());
    format!("Usage: {program} [--api <url>] <news|pages> [id]")
}

fn init_logging() -> Result<()> {
    let log_path = Config::log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    // The terminal belongs to the UI, so logs go to a file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let mut args = env::args();
    let usage = usage_line(args.next());

    let args: Vec<String> = args.collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{usage}");
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let config_path = Config::config_path();
    let config = match resolve_config(cli.api_base_url.clone(), config, &config_path) {
        Some(config) => config,
        None => {
            eprintln!("Error: No API URL provided and no config file found");
            eprintln!("{usage}");
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
    };

    init_logging()?;
    log::info!("newsdesk-cli starting against {}", config.api_base_url);

    let runtime = Runtime::new()?;
    let api = ApiClient::new(config.api_base_url.clone(), config.api_token.clone());

    let editor = match &cli.id {
        Some(id) => {
            let remote = runtime
                .block_on(api.fetch_document(cli.kind.resource(), id))
                .map_err(|e| anyhow::anyhow!(e.user_message()))
                .with_context(|| format!("loading {} {id}", cli.kind.resource()))?;
            DocumentEditor::from_remote(cli.kind, id.clone(), &remote)?
        }
        None => DocumentEditor::new(cli.kind),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(editor, api, runtime, config.upload_folder);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code)
        {
            return Ok(());
        }
    }
}

fn block_label(block: &ContentBlock) -> String {
    let preview = |text: &str| -> String {
        let first_line = text.lines().next().unwrap_or_default();
        if first_line.chars().count() > 40 {
            format!("{}…", first_line.chars().take(40).collect::<String>())
        } else {
            first_line.to_string()
        }
    };

    match &block.meta {
        BlockMeta::Heading { size } => {
            format!("{} {}", size.as_str().to_uppercase(), preview(&block.content))
        }
        BlockMeta::Paragraph => format!("¶ {}", preview(&block.content)),
        BlockMeta::List { items } => format!("• list ({} items)", items.len()),
        BlockMeta::Image { .. } if block.content.is_empty() => "▣ (no image)".to_string(),
        BlockMeta::Image { .. } => format!("▣ {}", preview(&block.content)),
        BlockMeta::Unknown { type_name, .. } => format!("? {type_name}"),
    }
}

fn block_details(block: &ContentBlock, item_cursor: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            block.type_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match &block.meta {
        BlockMeta::List { items } => {
            for (i, item) in items.iter().enumerate() {
                let text = format!("{}. {}", i + 1, item);
                if i == item_cursor {
                    lines.push(Line::from(Span::styled(
                        text,
                        Style::default().bg(Color::Yellow).fg(Color::Black),
                    )));
                } else {
                    lines.push(Line::from(text));
                }
            }
        }
        BlockMeta::Heading { size } => {
            lines.push(Line::from(format!("Size: {size}")));
            lines.push(Line::from(""));
            lines.extend(block.content.lines().map(|l| Line::from(l.to_string())));
        }
        BlockMeta::Image { caption } => {
            lines.push(Line::from(format!("URL: {}", block.content)));
            lines.push(Line::from(format!(
                "Caption: {}",
                caption.as_deref().unwrap_or("(none)")
            )));
        }
        BlockMeta::Paragraph | BlockMeta::Unknown { .. } => {
            lines.extend(block.content.lines().map(|l| Line::from(l.to_string())));
        }
    }

    lines
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(f.area());

    // Document header
    let fields = app.editor.fields();
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(fields.title.clone()),
        ]),
        Line::from(format!(
            "Excerpt: {}  |  Cover: {}  |  {}  |  {}",
            fields.excerpt.as_deref().unwrap_or("(none)"),
            fields.cover_image.as_deref().unwrap_or("(none)"),
            fields.status,
            app.state_label()
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.editor.kind().resource()),
    );
    f.render_widget(header, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    // Block list panel
    let block_items: Vec<ListItem> = app
        .editor
        .blocks()
        .blocks()
        .iter()
        .map(|block| ListItem::new(Line::from(block_label(block))))
        .collect();

    let blocks_list = List::new(block_items)
        .block(Block::default().borders(Borders::ALL).title("Blocks"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(blocks_list, body[0], &mut app.block_state);

    // Selected block panel
    let detail_text = match app.selected_block() {
        Some(block) => block_details(block, app.item_cursor),
        None => vec![Line::from("Add a block with h, p, l or i")],
    };
    let details = Paragraph::new(detail_text)
        .block(Block::default().borders(Borders::ALL).title("Block"))
        .wrap(Wrap { trim: false });
    f.render_widget(details, body[1]);

    // Input line doubles as the status line
    let (title, text) = match &app.input {
        Some(input) => (input.target.label(), format!("{}▏", input.buffer)),
        None => ("Status", app.status.clone()),
    };
    let input = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, rows[2]);

    let help = if app.input.is_some() {
        Line::from("Enter: Apply | Esc: Cancel")
    } else {
        Line::from(vec![
            Span::raw("j/k: Select | h/p/l/i: Add | Enter: Edit | Tab/1-3: Size | "),
            Span::raw("a/d/[ ]: Items | c: Caption | u/C: Upload | t/x: Title/Excerpt | "),
            Span::raw("K/J: Move | X: Delete | P: Publish | s: Save | q: Quit"),
        ])
    };
    f.render_widget(Paragraph::new(help).wrap(Wrap { trim: true }), rows[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_engine::models::{BlockType, HeadingSize};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_resource_and_id() {
        let cli = parse_args(&args(&["news", "n1"])).unwrap();
        assert_eq!(
            cli,
            CliArgs {
                api_base_url: None,
                kind: ContentKind::News,
                id: Some("n1".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_api_override() {
        let cli = parse_args(&args(&["--api", "http://localhost:5000/api", "pages"])).unwrap();
        assert_eq!(cli.api_base_url.as_deref(), Some("http://localhost:5000/api"));
        assert_eq!(cli.kind, ContentKind::Page);
        assert_eq!(cli.id, None);
    }

    #[rstest]
    #[case(&[])]
    #[case(&["posts"])]
    #[case(&["news", "1", "2"])]
    #[case(&["--api"])]
    #[case(&["--verbose", "news"])]
    fn test_parse_rejects(#[case] list: &[&str]) {
        assert!(parse_args(&args(list)).is_err());
    }

    #[test]
    fn test_first_api_url_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsdesk").join("config.toml");

        let config = resolve_config(Some("http://localhost:5000/api".to_string()), None, &path);

        assert_eq!(config, Some(Config::new("http://localhost:5000/api")));
        assert_eq!(Config::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_api_url_overrides_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let existing = Config {
            api_base_url: "https://api.example.org".to_string(),
            api_token: Some("tok".to_string()),
            upload_folder: "pages".to_string(),
        };

        let config = resolve_config(
            Some("http://localhost:5000".to_string()),
            Some(existing.clone()),
            &path,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.api_token, existing.api_token);
        assert!(!path.exists());
    }

    #[test]
    fn test_no_url_and_no_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_config(None, None, &dir.path().join("config.toml")), None);
    }

    #[test]
    fn test_usage_without_program_name() {
        assert_eq!(
            usage_line(None),
            "Usage: newsdesk-cli [--api <url>] <news|pages> [id]"
        );
        assert!(usage_line(Some("./nd".to_string())).starts_with("Usage: ./nd "));
    }

    #[test]
    fn test_block_labels() {
        let mut heading = ContentBlock::new(BlockType::Heading);
        heading.content = "Rally".to_string();
        heading.meta = BlockMeta::Heading {
            size: HeadingSize::H1,
        };
        assert_eq!(block_label(&heading), "H1 Rally");

        let list = ContentBlock::new(BlockType::List);
        assert_eq!(block_label(&list), "• list (1 items)");

        let image = ContentBlock::new(BlockType::Image);
        assert_eq!(block_label(&image), "▣ (no image)");
    }
}
