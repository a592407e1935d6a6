//! Book management commands.

use sd_model::{BookQuery, CreateBookRequest, PageQuery, UpdateBookRequest};

use crate::cli::BookCommand;
use crate::output::{info, output_page, output_single, success, BookRow};
use crate::{CliResult, Console};

use super::confirm_delete;

/// Runs a book command.
pub async fn run_book(cmd: BookCommand, console: &Console) -> CliResult<()> {
    let books = console.api().books();
    let format = console.format();

    match cmd {
        BookCommand::List {
            page,
            page_size,
            title,
            author,
        } => {
            let query = BookQuery {
                page: PageQuery::new(page, page_size),
                title,
                author,
            };
            let result = books.list(&query).await?;
            output_page::<_, BookRow>(&result, query.page.page, query.page.page_size, format)
        }
        BookCommand::Get { id } => output_single(&books.get(id).await?, format),
        BookCommand::Isbn { isbn } => output_single(&books.by_isbn(&isbn).await?, format),
        BookCommand::Create {
            title,
            author,
            isbn,
        } => {
            let book = books
                .create(&CreateBookRequest {
                    title,
                    author,
                    isbn,
                })
                .await?;
            success(&format!("Book '{}' created with ID {}", book.title, book.id));
            Ok(())
        }
        BookCommand::Update {
            id,
            title,
            author,
            isbn,
        } => {
            let request = UpdateBookRequest {
                title,
                author,
                isbn,
            };
            if request == UpdateBookRequest::default() {
                info("Nothing to update.");
                return Ok(());
            }

            let book = books.update(id, request).await?;
            success(&format!("Book {id} updated"));
            output_single(&book, format)
        }
        BookCommand::Delete { id, force } => {
            if !confirm_delete(&format!("book {id}"), force)? {
                return Ok(());
            }
            books.delete(id).await?;
            success(&format!("Book {id} deleted"));
            Ok(())
        }
    }
}
