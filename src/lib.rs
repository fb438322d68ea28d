pub mod args;
pub mod config;
pub mod error;
pub mod formatting;
mod help;
pub mod logging;
pub mod operations;
pub mod qr;
pub mod reconciler;
pub mod record;
pub mod search;
pub mod shared;
pub mod store;
pub mod view;

use crate::args::{ArgParser, parse_order};
use crate::config::{BackendKind, Config};
use crate::error::ShelfError;
use crate::formatting::FormatContext;
use crate::qr::{
    HttpFetcher, KnownReachability, LocalBackend, QrBackend, RemoteBackend, Symbol,
};
use crate::reconciler::{Action, Effect, Reconciler};
use crate::record::ItemType;
use crate::shared::layout::{fit_spans, render_columns};
use crate::store::{JsonFileStore, RecordStore};
use crate::view::{View, ViewStatus};
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

type Shelf = Reconciler<JsonFileStore>;

pub fn entry() -> Result<(), Box<dyn Error>> {
    logging::init();
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        return help::run(Vec::new());
    }

    let cmd = args.remove(0);
    if matches!(cmd.as_str(), "help" | "-h" | "--help") {
        return help::run(args);
    }
    if args.iter().any(|a| a == "-h" || a == "--help") && help::has_topic(&cmd) {
        return help::run(vec![cmd]);
    }

    let config = Config::from_env()?;
    ensure_dir(&config.dir)?;
    let store = JsonFileStore::in_dir(&config.dir);
    let mut shelf = Reconciler::new(RecordStore::new(store), config.scheme.clone());

    match cmd.as_str() {
        "add" | "new" => add_item(args, &mut shelf)?,
        "list" | "ls" => list_items(args, &mut shelf, &config)?,
        "show" | "qr" => show_item(args, &mut shelf, &config)?,
        "set" | "edit" => set_content(args, &mut shelf)?,
        "note" => set_note(args, &mut shelf)?,
        "type" | "retype" => retype_item(args, &mut shelf)?,
        "delete" | "rm" => delete_item(args, &mut shelf)?,
        "top" => move_to_top(args, &mut shelf)?,
        "move" | "mv" => move_item(args, &mut shelf)?,
        "mask" => toggle_mask(args, &mut shelf)?,
        "migrate" => migrate_items(&mut shelf)?,
        "path" => println!("{}", shelf.store().backend().path().display()),
        other => {
            eprintln!("Unknown command: {other}");
            help::run(Vec::new())?;
        }
    }

    Ok(())
}

fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub(crate) fn terminal_columns() -> Option<usize> {
    terminal_size::terminal_size().map(|(terminal_size::Width(w), _)| w as usize)
}

pub(crate) fn print_lines(lines: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn add_item(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "add");
    let mut kind = ItemType::Video;
    let mut note: Option<String> = None;
    let mut text: Vec<String> = Vec::new();
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--type" => kind = parser.extract_value("--type")?.parse()?,
            "--note" => note = Some(parser.extract_value("--note")?),
            other if other.starts_with("--") => {
                return Err(format!("Unknown flag for add: {other}").into());
            }
            _ => text.push(arg),
        }
    }

    let mut actions = vec![Action::Add];
    if kind != ItemType::Video {
        actions.push(Action::Retype { order: 0, kind });
    }
    if !text.is_empty() {
        actions.push(Action::EditContent { order: 0, text: text.join(" ") });
        actions.push(Action::CommitContent { order: 0 });
    }
    if let Some(note) = note {
        actions.push(Action::EditNote { order: 0, text: note });
    }
    shelf.dispatch_all(actions)?;

    match shelf.item(0) {
        Some(item) if item.has_content() => {
            println!("Added item 0 ({}: {})", item.kind, item.content)
        }
        _ => println!("Added item 0"),
    }
    Ok(())
}

fn list_items(
    args: Vec<String>,
    shelf: &mut Shelf,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "list");
    let mut query = String::new();
    let mut codes = false;
    let mut plain = false;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-s" | "--search" => query = parser.extract_value("-s/--search")?,
            "--codes" => codes = true,
            "--plain" => plain = true,
            other => return Err(format!("Unknown flag for list: {other}").into()),
        }
    }

    shelf.dispatch(Action::Search { query })?;
    let ctx = FormatContext::new(config.use_color && !plain);
    print_view(&shelf.view(), &ctx, codes)?;
    Ok(())
}

fn print_view(view: &View, ctx: &FormatContext, codes: bool) -> io::Result<()> {
    let query = view.query.as_deref().unwrap_or_default();
    match view.status {
        ViewStatus::Empty => {
            return print_lines(&["No items yet. Try `qs add`.".to_string()]);
        }
        ViewStatus::NoMatches => {
            return print_lines(&[format!("No items match \"{query}\".")]);
        }
        ViewStatus::Items => {}
    }

    let cols = terminal_columns().unwrap_or(100).max(60);
    let content_max = (cols * 2 / 5).min(48);
    let note_max = cols.saturating_sub(content_max + 24).clamp(12, 60);

    let headers: Vec<String> = ["#", "Type", "Content", "Code", "Note"]
        .iter()
        .map(|h| ctx.format_header(h))
        .collect();
    let rows: Vec<Vec<String>> = view
        .items
        .iter()
        .map(|item| {
            let content = if item.raw_content.trim().is_empty() {
                ctx.format_muted("[empty]")
            } else {
                ctx.format_spans(&fit_spans(&item.content, content_max))
            };
            let code = match (item.has_code(), item.masked) {
                (false, _) => ctx.format_muted("-"),
                (true, true) => ctx.format_muted("masked"),
                (true, false) => "ready".to_string(),
            };
            vec![
                ctx.format_order(item.order),
                ctx.format_type(item.kind),
                content,
                code,
                ctx.format_spans(&fit_spans(&item.note, note_max)),
            ]
        })
        .collect();

    let mut lines = Vec::new();
    if view.query.is_some() {
        lines.push(format!(
            "{} of {} item(s) match \"{query}\"",
            view.match_count(),
            view.total
        ));
    }
    lines.extend(render_columns(&headers, &rows).lines().map(|l| l.trim_end().to_string()));

    if codes {
        for item in view.items.iter() {
            let Some(payload) = item.payload.as_deref() else { continue };
            lines.push(String::new());
            lines.push(format!("#{} {}", item.order, payload));
            match LocalBackend.render(payload) {
                Ok(Symbol::Text(text)) if item.masked => {
                    lines.extend(ctx.mask_overlay(&text).lines().map(str::to_string))
                }
                Ok(Symbol::Text(text)) => lines.extend(text.lines().map(str::to_string)),
                Ok(Symbol::Image { .. }) => {}
                Err(err) => lines.push(ctx.format_failure(&format!("failed: {err}"))),
            }
        }
    }
    print_lines(&lines)
}

fn show_item(
    args: Vec<String>,
    shelf: &mut Shelf,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "show");
    let mut order: Option<u32> = None;
    let mut remote = config.backend == BackendKind::Remote;
    let mut out: Option<PathBuf> = None;
    let mut reveal = false;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--remote" => remote = true,
            "--local" => remote = false,
            "--out" => out = Some(PathBuf::from(parser.extract_value("--out")?)),
            "--reveal" => reveal = true,
            other if other.starts_with('-') => {
                return Err(format!("Unknown flag for show: {other}").into());
            }
            other => order = Some(parse_order(other)?),
        }
    }
    let order = order.ok_or("Usage: qs show <order> [--remote] [--out file] [--reveal]")?;
    if out.is_some() && !remote {
        return Err("--out is only used with --remote".into());
    }

    shelf.refresh("")?;
    let item = shelf.item(order).ok_or(ShelfError::NotFound { order })?;
    let payload = shelf
        .uri()
        .qr_payload(item.kind, &item.content)
        .ok_or_else(|| format!("Item {order} has no content yet"))?;
    let masked = item.masked && !reveal;
    if masked && remote {
        return Err(format!(
            "Item {order} is masked; pass --reveal to fetch its code image"
        )
        .into());
    }
    let ctx = FormatContext::new(config.use_color);

    let rendered = if remote {
        RemoteBackend::new(
            &config.endpoint,
            config.size,
            HttpFetcher::default(),
            KnownReachability(!config.offline),
            config.retry,
        )
        .render(&payload)
    } else {
        LocalBackend.render(&payload)
    };

    let symbol = match rendered {
        Ok(symbol) => symbol,
        Err(err) => {
            eprintln!("{}", ctx.format_failure("QR render failed"));
            return Err(err.into());
        }
    };

    println!("#{order} {payload}");
    match symbol {
        Symbol::Text(text) if masked => println!("{}", ctx.mask_overlay(&text)),
        Symbol::Text(text) => println!("{text}"),
        Symbol::Image { url, bytes } => {
            let path = out.unwrap_or_else(|| PathBuf::from(format!("qr-{order}.png")));
            fs::write(&path, &bytes)?;
            tracing::info!(%url, bytes = bytes.len(), "fetched qr image");
            println!("Saved {} bytes to {}", bytes.len(), path.display());
        }
    }
    Ok(())
}

fn set_content(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    // Flags are only read before the text starts; `--` ends them early.
    let mut raw = false;
    let mut order: Option<u32> = None;
    let mut text: Vec<String> = Vec::new();
    let mut flags_done = false;
    for arg in args {
        match arg.as_str() {
            _ if flags_done => text.push(arg),
            "--raw" => raw = true,
            "--" => flags_done = true,
            other if order.is_none() => order = Some(parse_order(other)?),
            _ => {
                flags_done = true;
                text.push(arg);
            }
        }
    }
    let usage = "Usage: qs set <order> [--raw] [--] <text>";
    let order = order.ok_or(usage)?;
    if text.is_empty() {
        return Err(usage.into());
    }
    let text = text.join(" ");

    let mut actions = vec![Action::EditContent { order, text }];
    if !raw {
        actions.push(Action::CommitContent { order });
    }
    let effects = shelf.dispatch_all(actions)?;
    if let Some(Effect::ContentSaved { content }) = effects.last() {
        println!("Updated item {order}: {content}");
    }
    Ok(())
}

fn set_note(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "note");
    let order = parser.extract_order("item")?;
    let text = parser.collect_remaining().join(" ");
    let cleared = text.trim().is_empty();
    shelf.dispatch(Action::EditNote { order, text })?;
    if cleared {
        println!("Cleared note for item {order}");
    } else {
        println!("Updated note for item {order}");
    }
    Ok(())
}

fn retype_item(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "type");
    let order = parser.extract_order("item")?;
    let kind: ItemType = parser
        .next()
        .ok_or("Usage: qs type <order> video|user|custom")?
        .parse()?;
    parser.finish()?;
    shelf.dispatch(Action::Retype { order, kind })?;
    println!("Item {order} is now {kind} (content and note cleared)");
    Ok(())
}

fn delete_item(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "delete");
    let order = parser.extract_order("item")?;
    parser.finish()?;
    shelf.dispatch(Action::Delete { order })?;
    println!("Deleted item {order}");
    Ok(())
}

fn move_to_top(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "top");
    let order = parser.extract_order("item")?;
    parser.finish()?;
    shelf.dispatch(Action::MoveToTop { order })?;
    println!("Moved item {order} to the top");
    Ok(())
}

fn move_item(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "move");
    let from = parser.extract_order("source")?;
    let to = parser.extract_order("target")?;
    parser.finish()?;
    if let Effect::Moved { order } = shelf.dispatch(Action::Move { from, to })? {
        println!("Moved item {from} to {order}");
    }
    Ok(())
}

fn toggle_mask(args: Vec<String>, shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "mask");
    let order = parser.extract_order("item")?;
    parser.finish()?;
    if let Effect::MaskToggled { masked } = shelf.dispatch(Action::ToggleMask { order })? {
        if masked {
            println!("Masked item {order}");
        } else {
            println!("Unmasked item {order}");
        }
    }
    Ok(())
}

fn migrate_items(shelf: &mut Shelf) -> Result<(), Box<dyn Error>> {
    let report = shelf.migrate()?;
    if report.migrated && report.legacy {
        println!(
            "Migrated {} legacy item(s) to the ordered format (original kept under {}).",
            report.count,
            store::LEGACY_KEY
        );
    } else if report.migrated {
        println!("Normalized {} item(s).", report.count);
    } else {
        println!("Items already up to date ({} item(s)).", report.count);
    }
    Ok(())
}
