//! `deck`: manage presentations in the remote store from the shell.
//!
//! Connection settings come from `DECK_BACKEND_URL`, `DECK_TOKEN`, and
//! `DECK_TIMEOUT_SECS` (a `.env` file is read if present); `--url` and
//! `--token` override them. Set `RUST_LOG=debug` for request logging.

use clap::{Parser, Subcommand};
use deck_core::{EditError, ElementTag, ImageFile, PresentationId, to_data_url};
use deck_editor::{
    DeckSession, EditLocation, ElementDraft, PreviewLocation, SessionConfig, SessionError,
};
use deck_store::{HttpStore, RemoteStore, StoreConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "deck")]
#[command(about = "Slide Deck - manage presentations in the remote store", long_about = None)]
struct Cli {
    /// Backend origin (overrides DECK_BACKEND_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Bearer credential (overrides DECK_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Apply edits to the first loaded copy instead of reloading before each write
    #[arg(long, global = true)]
    no_reload: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List presentations as dashboard cards
    List,

    /// Create a presentation with one empty slide
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Rename a presentation
    Rename { id: PresentationId, name: String },

    /// Delete a presentation; later ids shift down by one
    Delete { id: PresentationId },

    /// Append an empty slide
    AddSlide { id: PresentationId },

    /// Delete a slide (1-based)
    DeleteSlide { id: PresentationId, slide: usize },

    /// Set a slide's background, filling default slides with --default
    Background {
        id: PresentationId,
        slide: usize,
        #[arg(long = "default")]
        default_color: String,
        #[arg(long = "color")]
        slide_color: String,
    },

    /// Replace a presentation's thumbnail with a JPEG or PNG file
    Thumbnail { id: PresentationId, file: PathBuf },

    /// Add an element to a slide, e.g. `add-element 1 1 text --field text=hi ...`
    AddElement {
        id: PresentationId,
        slide: usize,
        /// text, image, video, or code
        kind: String,
        /// Form field as name=value; repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Image file to upload (image elements only)
        #[arg(long)]
        upload: Option<PathBuf>,
    },

    /// Check the stored collection against the document invariants
    Validate,

    /// Print a read-only preview link carrying a snapshot of the presentation
    PreviewLink {
        id: PresentationId,
        #[arg(long, default_value_t = 1)]
        slide: usize,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} violation(s) found")]
    Violations(usize),
}

impl From<EditError> for CliError {
    fn from(e: EditError) -> Self {
        CliError::Session(e.into())
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

fn parse_kind(kind: &str) -> Result<ElementTag, EditError> {
    match kind.to_ascii_lowercase().as_str() {
        "text" => Ok(ElementTag::Text),
        "image" => Ok(ElementTag::Image),
        "video" => Ok(ElementTag::Video),
        "code" => Ok(ElementTag::Code),
        other => Err(EditError::validation(format!("unknown element kind `{other}`"))),
    }
}

/// 1-based slide number from the command line to a 0-based index.
fn slide_index(slide: usize) -> Result<usize, EditError> {
    slide
        .checked_sub(1)
        .ok_or_else(|| EditError::validation("slide numbers start at 1"))
}

/// MIME type from the file extension. Unknown extensions are passed through
/// as-is so `to_data_url` rejects them.
fn mime_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png".into(),
        "jpg" | "jpeg" => "image/jpeg".into(),
        "gif" => "image/gif".into(),
        "" => "application/octet-stream".into(),
        other => format!("application/{other}"),
    }
}

fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ImageFile::new(mime_for(path), bytes))
}

async fn run<S: RemoteStore>(session: &mut DeckSession<S>, command: Command) -> Result<(), CliError> {
    match command {
        Command::List => {
            for card in session.load().await?.summaries() {
                println!(
                    "{:>3}  {}  ({} slide{})  {}",
                    card.id,
                    card.name,
                    card.slide_count,
                    if card.slide_count == 1 { "" } else { "s" },
                    card.description
                );
            }
        }
        Command::Create { name, description } => {
            let id = session.create_presentation(&name, &description).await?;
            println!("created {id}");
        }
        Command::Rename { id, name } => session.rename_presentation(id, &name).await?,
        Command::Delete { id } => session.delete_presentation(id).await?,
        Command::AddSlide { id } => {
            let mut nav = session.open(id).await?;
            session.add_slide(&mut nav).await?;
            println!("{} now has {} slides", id, nav.slide_count());
        }
        Command::DeleteSlide { id, slide } => {
            let location = EditLocation {
                presentation: id,
                slide: slide_index(slide)?,
            };
            let mut nav = session.open_at(location).await?;
            session.delete_slide(&mut nav).await?;
            println!("{}", nav.location());
        }
        Command::Background {
            id,
            slide,
            default_color,
            slide_color,
        } => {
            let location = EditLocation {
                presentation: id,
                slide: slide_index(slide)?,
            };
            let nav = session.open_at(location).await?;
            session.set_background(&nav, &default_color, &slide_color).await?;
        }
        Command::Thumbnail { id, file } => {
            let image = read_image(&file)?;
            if !session.change_thumbnail(id, &image).await? {
                eprintln!("{}: not a JPEG or PNG image; thumbnail unchanged", file.display());
            }
        }
        Command::AddElement {
            id,
            slide,
            kind,
            fields,
            upload,
        } => {
            // A chosen file counts even when it is not a usable image.
            let upload = match upload {
                Some(path) => Some(to_data_url(&read_image(&path)?)),
                None => None,
            };
            let lookup = |name: &str| {
                fields
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.as_str())
            };
            let draft = ElementDraft::from_fields(parse_kind(&kind)?, lookup, upload)?;
            let location = EditLocation {
                presentation: id,
                slide: slide_index(slide)?,
            };
            let nav = session.open_at(location).await?;
            let index = session.add_element(&nav, draft).await?;
            println!("added {kind} element #{index} to {}", nav.location());
        }
        Command::Validate => {
            let collection = session.load().await?;
            match deck_core::validate(collection) {
                Ok(()) => println!("ok: {} presentations", collection.len()),
                Err(violations) => {
                    for v in &violations {
                        println!("{v}");
                    }
                    return Err(CliError::Violations(violations.len()));
                }
            }
        }
        Command::PreviewLink { id, slide } => {
            session.load().await?;
            let preview = session.preview(id, slide_index(slide)?)?;
            let location: PreviewLocation = preview.location();
            println!("{location}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = StoreConfig::from_env();
    if let Some(url) = cli.url {
        config = config.with_base_url(url);
    }
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    log::debug!("using store at {}", config.store_url());

    let store = match HttpStore::new(config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("deck: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut session = DeckSession::new(store).with_config(SessionConfig {
        reload_before_write: !cli.no_reload,
    });

    match run(&mut session, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("deck: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "deck", "--token", "t", "background", "2", "3", "--default", "#111", "--color", "#222",
        ])
        .unwrap();
        assert_eq!(cli.token.as_deref(), Some("t"));
        assert!(matches!(
            cli.command,
            Command::Background { slide: 3, ref default_color, .. } if default_color == "#111"
        ));
        assert!(Cli::try_parse_from(["deck", "rename", "0", "x"]).is_err());
    }

    #[test]
    fn add_element_fields() {
        let cli = Cli::try_parse_from([
            "deck", "add-element", "1", "1", "text", "--field", "text=a=b", "--field", "size=1",
        ])
        .unwrap();
        let Command::AddElement { fields, .. } = cli.command else {
            panic!("expected add-element");
        };
        assert_eq!(fields[0], ("text".to_string(), "a=b".to_string()));
        assert!(parse_field("novalue").is_err());
    }

    #[test]
    fn helpers() {
        assert_eq!(mime_for(Path::new("cat.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
        assert_eq!(parse_kind("Code"), Ok(ElementTag::Code));
        assert!(slide_index(0).is_err());
        assert_eq!(slide_index(1), Ok(0));
    }
}
