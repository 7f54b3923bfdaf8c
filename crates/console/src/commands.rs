use crate::errors::ConsoleError;
use book_archive_core::BookId;

/// A user intent typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    /// Change the search query; an empty query shows everything.
    Search(String),
    /// Open the editor for a new record.
    Add,
    /// Open the editor on an existing record.
    Edit(BookId),
    Delete(BookId),
    /// Flip the favorite flag.
    Favorite(BookId),
    Show(BookId),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  list               show the (filtered) catalog
  search [text]      filter by title or author, no text clears the filter
  add                add a book
  edit <id>          edit a book
  delete <id>        delete a book
  fav <id>           toggle a book's favorite flag
  show <id>          print a book's full record
  help               this text
  quit               leave";

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// # Errors
    /// Fails on unknown commands and on commands missing their identifier.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let line = line.trim_start();
        if line.is_empty() {
            return Ok(None);
        }
        // Only the single separator after the command word goes; a search query is kept verbatim
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line.trim_end(), ""));
        let argument = rest.trim();

        let id = |command: &'static str| {
            if argument.is_empty() {
                Err(ConsoleError::MissingArgument {
                    command,
                    argument: "a book id",
                })
            } else {
                Ok(BookId::new(argument))
            }
        };

        let command = match name.to_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "search" | "find" => Self::Search(rest.to_owned()),
            "add" | "new" => Self::Add,
            "edit" => Self::Edit(id("edit")?),
            "delete" | "rm" => Self::Delete(id("delete")?),
            "fav" | "favorite" => Self::Favorite(id("fav")?),
            "show" => Self::Show(id("show")?),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(ConsoleError::UnknownCommand(name.to_owned())),
        };
        Ok(Some(command))
    }
}
