//! Plain-text rendering of the catalog
use book_archive_core::Book;
use book_archive_core::catalog::store::CatalogView;
use std::io::{self, Write};

/// One line per visible record, or an empty-state hint.
pub fn render_catalog<W: Write>(view: &CatalogView, out: &mut W) -> io::Result<()> {
    if view.loading {
        return writeln!(out, "Loading books...");
    }
    if !view.query.is_empty() {
        writeln!(
            out,
            "Search {:?}: {} of {} books",
            view.query,
            view.visible.len(),
            view.books.len()
        )?;
    }
    if view.visible.is_empty() {
        if view.books.is_empty() {
            writeln!(out, "No Books Yet. Start building your library with `add`.")?;
        } else {
            writeln!(out, "No Results Found. Try adjusting your search terms.")?;
        }
        return Ok(());
    }
    for book in &view.visible {
        render_line(book, out)?;
    }
    Ok(())
}

pub fn render_line<W: Write>(book: &Book, out: &mut W) -> io::Result<()> {
    let id = book.id.as_ref().map_or("-", |id| id.as_str());
    let heart = if book.is_favorite { '♥' } else { ' ' };
    writeln!(out, "[{id:>4}] {heart} {} by {}", book.title, book.author)
}

/// Full record, including description and cover URL.
pub fn render_details<W: Write>(book: &Book, out: &mut W) -> io::Result<()> {
    render_line(book, out)?;
    if !book.description.is_empty() {
        writeln!(out, "       {}", book.description)?;
    }
    writeln!(out, "       cover: {}", book.cover_image)
}
