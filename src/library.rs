//! Library Catalog - ISBN keyed inventory with borrower lists
//!
//! The same student may hold several copies of one title: each borrow
//! appends to the borrower list and each return removes one occurrence.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::core_types::{Isbn, StudentId};
use crate::error::{AdminError, AdminResult, Entity};

/// Inventory record for one title
///
/// # Invariants:
/// - `available_copies <= total_copies`
/// - `available_copies + borrowers.len() == total_copies`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub isbn: Isbn,
    pub title: String,
    pub total_copies: u32,
    pub available_copies: u32,
    /// One entry per copy out, in borrow order
    pub borrowers: Vec<StudentId>,
}

/// Result of an availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub available: u32,
    pub total: u32,
}

#[derive(Debug, Default)]
pub struct LibraryCatalog {
    books: FxHashMap<Isbn, BookRecord>,
}

impl LibraryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a title, replacing any existing record for the same ISBN
    /// (including its borrower list).
    pub fn add_book(&mut self, isbn: impl Into<Isbn>, title: impl Into<String>, copies: u32) {
        let isbn = isbn.into();
        let record = BookRecord {
            isbn: isbn.clone(),
            title: title.into(),
            total_copies: copies,
            available_copies: copies,
            borrowers: Vec::new(),
        };
        info!(isbn = %isbn, title = %record.title, copies, "Book added");
        if self.books.insert(isbn, record).is_some() {
            debug!("Existing book record replaced");
        }
    }

    pub fn borrow(&mut self, isbn: &str, student_id: impl Into<StudentId>) -> AdminResult<()> {
        let book = self.book_mut(isbn)?;
        let student_id = student_id.into();

        if book.available_copies == 0 {
            warn!(isbn, student_id = %student_id, "Borrow rejected: no copies available");
            return Err(AdminError::Unavailable { isbn: isbn.into() });
        }

        book.available_copies -= 1;
        info!(
            isbn,
            student_id = %student_id,
            available = book.available_copies,
            "Book borrowed"
        );
        book.borrowers.push(student_id);
        Ok(())
    }

    pub fn return_book(&mut self, isbn: &str, student_id: &str) -> AdminResult<()> {
        let book = self.book_mut(isbn)?;

        let Some(pos) = book.borrowers.iter().position(|b| b == student_id) else {
            warn!(isbn, student_id, "Return rejected: not a borrower");
            return Err(AdminError::NotBorrowed {
                isbn: isbn.into(),
                student_id: student_id.into(),
            });
        };

        book.borrowers.remove(pos);
        book.available_copies += 1;
        info!(
            isbn,
            student_id,
            available = book.available_copies,
            "Book returned"
        );
        Ok(())
    }

    pub fn check_availability(&self, isbn: &str) -> AdminResult<Availability> {
        let book = self.get(isbn)?;
        Ok(Availability {
            available: book.available_copies,
            total: book.total_copies,
        })
    }

    pub fn get(&self, isbn: &str) -> AdminResult<&BookRecord> {
        self.books
            .get(isbn)
            .ok_or_else(|| AdminError::not_found(Entity::Book, isbn))
    }

    /// All titles sorted by ISBN
    pub fn books(&self) -> Vec<&BookRecord> {
        let mut books: Vec<&BookRecord> = self.books.values().collect();
        books.sort_unstable_by(|a, b| a.isbn.cmp(&b.isbn));
        books
    }

    fn book_mut(&mut self, isbn: &str) -> AdminResult<&mut BookRecord> {
        match self.books.get_mut(isbn) {
            Some(book) => Ok(book),
            None => {
                warn!(isbn, "Book not found");
                Err(AdminError::not_found(Entity::Book, isbn))
            }
        }
    }
}
