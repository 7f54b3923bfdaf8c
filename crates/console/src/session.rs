//! Interactive session
//!
//! Line-oriented front end over the catalog store: renders the filtered catalog, runs the record
//! editor and asks for confirmation before deletes. Input and output are injected so the session
//! runs the same against a terminal or an in-memory script.
use crate::commands::{Command, HELP};
use crate::errors::ConsoleError;
use crate::render::{render_catalog, render_details};
use book_archive_core::api::BookApi;
use book_archive_core::catalog::draft::BookDraft;
use book_archive_core::catalog::store::{CatalogStore, LoadOutcome};
use book_archive_core::{Book, BookId, BookPatch, NewBook};
use chrono::Utc;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};
use tracing::instrument;

/// Answer that empties a field in the editor.
const CLEAR: &str = "-";

pub struct Session<'store, A: BookApi, R, W> {
    store: &'store CatalogStore<A>,
    input: R,
    output: W,
}

impl<'store, A, R, W> Session<'store, A, R, W>
where
    A: BookApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub const fn new(store: &'store CatalogStore<A>, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Load the catalog, then serve commands until `quit` or end of input. The store stops
    /// applying late results once the session is over, whatever the outcome.
    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        let result = self.serve().await;
        self.store.shutdown();
        result
    }

    async fn serve(&mut self) -> Result<(), ConsoleError> {
        writeln!(
            self.output,
            "Book Archive: manage your personal book catalog. Type `help` for commands."
        )?;
        writeln!(self.output, "Loading books...")?;
        match self.store.load().await {
            LoadOutcome::Seeded { created, .. } => {
                tracing::info!(created, "seeded empty catalog with sample books");
            }
            LoadOutcome::Loaded { count } => tracing::debug!(count, "catalog loaded"),
            other => tracing::debug!(?other, "initial load finished"),
        }
        self.render().await?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line().await? else {
                writeln!(self.output)?;
                break;
            };
            match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.dispatch(command).await?,
                Ok(None) => {}
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
        Ok(())
    }

    #[instrument(name = "intent", skip(self))]
    async fn dispatch(&mut self, command: Command) -> Result<(), ConsoleError> {
        match command {
            Command::List => self.render().await,
            Command::Search(query) => {
                self.store.set_query(query).await;
                self.render().await
            }
            Command::Add => self.open_editor(None).await,
            Command::Edit(id) => match self.lookup(&id).await? {
                Some(book) => self.open_editor(Some(book)).await,
                None => Ok(()),
            },
            Command::Delete(id) => {
                if self.lookup(&id).await?.is_none() {
                    return Ok(());
                }
                if self
                    .confirm("Are you sure you want to delete this book?")
                    .await?
                {
                    self.store.delete(&id).await;
                    self.render().await?;
                }
                Ok(())
            }
            Command::Favorite(id) => {
                if let Some(book) = self.lookup(&id).await? {
                    self.store.toggle_favorite(&id, !book.is_favorite).await;
                    self.render().await?;
                }
                Ok(())
            }
            Command::Show(id) => {
                if let Some(book) = self.lookup(&id).await? {
                    render_details(&book, &mut self.output)?;
                }
                Ok(())
            }
            Command::Help => Ok(writeln!(self.output, "{HELP}")?),
            Command::Quit => Ok(()),
        }
    }

    /// Run the record editor, pre-filled from `existing` when editing. The editor closes once the
    /// draft is submitted, whether or not the endpoint accepted it.
    async fn open_editor(&mut self, existing: Option<Book>) -> Result<(), ConsoleError> {
        let heading = if existing.is_some() {
            "Edit Book"
        } else {
            "Add New Book"
        };
        writeln!(
            self.output,
            "{heading} (enter keeps the value in brackets, {CLEAR} clears it)"
        )?;
        let mut draft = existing.as_ref().map(BookDraft::from_book).unwrap_or_default();

        let Some(title) = self.prompt("Book Title (? for a random book)", &draft.title).await? else {
            return Ok(());
        };
        if title == "?" {
            draft.randomize(&mut rand::thread_rng());
        } else {
            draft.title = title;
        }
        let Some(author) = self.prompt("Author", &draft.author).await? else {
            return Ok(());
        };
        draft.author = author;
        let Some(description) = self.prompt("Description", &draft.description).await? else {
            return Ok(());
        };
        draft.description = description;
        let Some(cover_image) = self
            .prompt(
                "Cover Image URL (? for a seed image, ?sample for a sample image)",
                &draft.cover_image,
            )
            .await?
        else {
            return Ok(());
        };
        match cover_image.as_str() {
            "?" => draft.use_seed_cover(Utc::now()),
            "?sample" => draft.use_sample_cover(Utc::now()),
            _ => draft.cover_image = cover_image,
        }
        let current = if draft.is_favorite { "y" } else { "n" };
        let Some(favorite) = self.prompt("Mark as Favorite (y/n)", current).await? else {
            return Ok(());
        };
        draft.is_favorite = is_yes(&favorite);

        let record = match draft.validate() {
            Ok(record) => record,
            Err(err) => {
                writeln!(self.output, "Not saved: {err}")?;
                return Ok(());
            }
        };

        self.submit(existing.as_ref(), record).await;
        self.render().await
    }

    /// Send a validated draft: an update when editing, a create otherwise.
    async fn submit(&self, existing: Option<&Book>, record: NewBook) {
        match existing {
            None => {
                self.store.create(record).await;
            }
            Some(book) => match &book.id {
                Some(id) => {
                    self.store.update(id, BookPatch::from(record)).await;
                }
                None => {
                    tracing::warn!(
                        title = %book.title,
                        "edited book has no id yet, dropping the edit"
                    );
                }
            },
        }
    }

    async fn lookup(&mut self, id: &BookId) -> Result<Option<Book>, ConsoleError> {
        let book = self.store.find(id).await;
        if book.is_none() {
            writeln!(self.output, "No book with id {id}")?;
        }
        Ok(book)
    }

    async fn render(&mut self) -> Result<(), ConsoleError> {
        let view = self.store.view().await;
        render_catalog(&view, &mut self.output)?;
        Ok(())
    }

    /// Blocking yes/no question, anything but an explicit yes counts as no.
    async fn confirm(&mut self, question: &str) -> Result<bool, ConsoleError> {
        write!(self.output, "{question} [y/N]: ")?;
        self.output.flush()?;
        Ok(self.read_line().await?.is_some_and(|answer| is_yes(&answer)))
    }

    /// Ask for a field value; an empty answer keeps `current`, [`CLEAR`] empties the field.
    /// `None` at end of input.
    async fn prompt(&mut self, label: &str, current: &str) -> Result<Option<String>, ConsoleError> {
        if current.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{current}]: ")?;
        }
        self.output.flush()?;
        Ok(self.read_line().await?.map(|answer| {
            let answer = answer.trim();
            if answer.is_empty() {
                current.to_owned()
            } else if answer == CLEAR {
                String::new()
            } else {
                answer.to_owned()
            }
        }))
    }

    async fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
