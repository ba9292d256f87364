use anyhow::{Context, Result, bail};
use folio_config::Config;
use folio_engine::{
    Cursor, Document, DocumentOptions, HtmlBuilder, ListType, NodeId, RawNode, format_outline,
};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "Usage:
  folio new <file>
  folio stats <file>
  folio html <file>
  folio outline <file>
  folio delete <file> <start-id> <start-offset> <end-id> <end-offset>
  folio list <file> <block-id> [ol|ul|nl]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    New(PathBuf),
    Stats(PathBuf),
    Html(PathBuf),
    Outline(PathBuf),
    Delete {
        file: PathBuf,
        start: Cursor,
        end: Cursor,
    },
    List {
        file: PathBuf,
        block: NodeId,
        list_type: Option<ListType>,
    },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            ["new", file] => Command::New(PathBuf::from(file)),
            ["stats", file] => Command::Stats(PathBuf::from(file)),
            ["html", file] => Command::Html(PathBuf::from(file)),
            ["outline", file] => Command::Outline(PathBuf::from(file)),
            ["delete", file, start_id, start_offset, end_id, end_offset] => Command::Delete {
                file: PathBuf::from(file),
                start: parse_cursor(start_id, start_offset)?,
                end: parse_cursor(end_id, end_offset)?,
            },
            ["list", file, block] => Command::List {
                file: PathBuf::from(file),
                block: parse_id(block)?,
                list_type: None,
            },
            ["list", file, block, list_type] => Command::List {
                file: PathBuf::from(file),
                block: parse_id(block)?,
                list_type: Some(parse_list_type(list_type)?),
            },
            _ => bail!("{USAGE}"),
        };
        Ok(command)
    }
}

fn parse_id(value: &str) -> Result<NodeId> {
    NodeId::parse(value).with_context(|| format!("'{value}' is not a node id"))
}

fn parse_cursor(id: &str, offset: &str) -> Result<Cursor> {
    let offset = offset
        .parse()
        .with_context(|| format!("'{offset}' is not an offset"))?;
    Ok(Cursor::new(parse_id(id)?, offset))
}

fn parse_list_type(value: &str) -> Result<ListType> {
    ListType::from_tag(value).with_context(|| format!("'{value}' is not one of ol, ul, nl"))
}

fn document_options(config: &Config) -> Result<DocumentOptions> {
    Ok(DocumentOptions {
        history_limit: config.history.max_entries,
        default_list_type: parse_list_type(&config.lists.default_type)
            .context("Invalid lists.default_type in config")?,
    })
}

fn load(path: &Path, options: DocumentOptions) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: RawNode = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let doc = Document::from_raw(&raw, options)?;
    log::info!("Loaded {} ({} blocks)", path.display(), doc.text_blocks().len());
    Ok(doc)
}

fn store(path: &Path, doc: &Document) -> Result<()> {
    let raw = doc.get_raw(doc.root())?;
    let content = serde_json::to_string_pretty(&raw)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Execute one command, returning what should be printed on stdout
fn run(config: &Config, command: Command) -> Result<String> {
    let options = document_options(config)?;
    let output = match command {
        Command::New(file) => {
            let file = config.resolve_document(&file);
            if file.exists() {
                bail!("{} already exists", file.display());
            }
            let mut doc = Document::with_options(options);
            let paragraph = doc.append_paragraph("")?;
            store(&file, &doc)?;
            paragraph.to_string()
        }
        Command::Stats(file) => {
            let doc = load(&config.resolve_document(&file), options)?;
            serde_json::to_string_pretty(&doc.statistic(doc.root())?)?
        }
        Command::Html(file) => {
            let doc = load(&config.resolve_document(&file), options)?;
            doc.render(doc.root(), &mut HtmlBuilder::default())?
        }
        Command::Outline(file) => {
            let doc = load(&config.resolve_document(&file), options)?;
            format_outline(&doc)
        }
        Command::Delete { file, start, end } => {
            let file = config.resolve_document(&file);
            let mut doc = load(&file, options)?;
            let focus = doc.delete_selection(start, Some(end))?;
            doc.tick();
            store(&file, &doc)?;
            match focus {
                Some(cursor) => format!("{} {}", cursor.id, cursor.offset),
                None => "unchanged".to_string(),
            }
        }
        Command::List {
            file,
            block,
            list_type,
        } => {
            let file = config.resolve_document(&file);
            let mut doc = load(&file, options)?;
            let list_type = list_type.unwrap_or(doc.options().default_list_type);
            doc.exchange_list(block, list_type)?;
            doc.tick();
            store(&file, &doc)?;
            format_outline(&doc)
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let output = run(&config, command)?;
    println!("{}", output.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn config_in(dir: &TempDir) -> Config {
        Config {
            documents_path: Some(dir.path().to_path_buf()),
            ..Config::default()
        }
    }

    fn write_doc(dir: &TempDir, name: &str, raw: &RawNode) {
        let content = serde_json::to_string(raw).unwrap();
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_parse_rejects_unknown_commands() {
        assert!(Command::parse(&args(&["frobnicate"])).is_err());
        assert!(Command::parse(&args(&[])).is_err());
        assert!(Command::parse(&args(&["list", "doc.json", "not-an-id"])).is_err());
    }

    #[test]
    fn test_parse_list_with_and_without_type() {
        let id = NodeId::new();
        let parsed = Command::parse(&args(&["list", "doc.json", &id.to_string(), "nl"])).unwrap();
        assert_eq!(
            parsed,
            Command::List {
                file: PathBuf::from("doc.json"),
                block: id,
                list_type: Some(ListType::Nl),
            }
        );

        let parsed = Command::parse(&args(&["list", "doc.json", &id.to_string()])).unwrap();
        assert!(matches!(parsed, Command::List { list_type: None, .. }));
    }

    #[test]
    fn test_new_then_stats() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        run(&config, Command::New(PathBuf::from("fresh.json"))).unwrap();
        assert!(run(&config, Command::New(PathBuf::from("fresh.json"))).is_err());

        let stats = run(&config, Command::Stats(PathBuf::from("fresh.json"))).unwrap();
        let stats: serde_json::Value = serde_json::from_str(&stats).unwrap();
        assert_eq!(stats["paragraph"], 1);
        assert_eq!(stats["characters"], 0);
    }

    #[test]
    fn test_delete_writes_merged_document_back() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let (p1, p2) = (NodeId::new(), NodeId::new());
        write_doc(
            &dir,
            "doc.json",
            &RawNode::new("article").with_children(vec![
                RawNode::paragraph("hello").with_id(p1.to_string()),
                RawNode::paragraph("world").with_id(p2.to_string()),
            ]),
        );

        let command = Command::Delete {
            file: PathBuf::from("doc.json"),
            start: Cursor::new(p1, 2),
            end: Cursor::new(p2, 3),
        };
        assert_eq!(run(&config, command).unwrap(), format!("{p1} 2"));

        let html = run(&config, Command::Html(PathBuf::from("doc.json"))).unwrap();
        assert_eq!(html, "<article><p>held</p></article>");
    }

    #[test]
    fn test_list_uses_configured_default_type() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.lists.default_type = "ol".to_string();
        let block = NodeId::new();
        write_doc(
            &dir,
            "doc.json",
            &RawNode::new("article")
                .with_children(vec![RawNode::paragraph("item").with_id(block.to_string())]),
        );

        let command = Command::List {
            file: PathBuf::from("doc.json"),
            block,
            list_type: None,
        };
        let outline = run(&config, command).unwrap();
        assert_eq!(outline, "article\n  list>ol\n    paragraph \"item\"\n");
    }

    #[test]
    fn test_bad_default_list_type_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.lists.default_type = "dl".to_string();

        let err = run(&config, Command::Stats(PathBuf::from("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("lists.default_type"));
    }
}
