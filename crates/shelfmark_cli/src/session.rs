//! Interactive menu loop.
//!
//! # Invariants
//! - Every action runs to completion before the next prompt.
//! - Operation failures are printed and never end the session; only I/O errors
//!   or end of input do.

use crate::menu::{parse_search_choice, MenuChoice, MAIN_MENU, SEARCH_MENU};
use crate::render::{format_book, format_patron, SEPARATOR};
use shelfmark_core::{AvailabilityObserver, Book, Library, NewBook, NewPatron};
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Availability observer buffering one notice line per transition.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    pending: Mutex<Vec<String>>,
}

impl NoticeBoard {
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl AvailabilityObserver for NoticeBoard {
    fn update(&self, book: &Book) {
        let status = if book.is_on_loan() {
            "is now on loan"
        } else {
            "is available again"
        };
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("notice: `{}` {status}", book.title));
    }
}

enum Flow {
    Continue,
    Exit,
}

/// One interactive session over a library.
pub struct Session<'lib, R: BufRead, W: Write> {
    library: &'lib Library,
    notices: Arc<NoticeBoard>,
    input: R,
    output: W,
}

impl<'lib, R: BufRead, W: Write> Session<'lib, R, W> {
    pub fn new(library: &'lib Library, notices: Arc<NoticeBoard>, input: R, output: W) -> Self {
        Self {
            library,
            notices,
            input,
            output,
        }
    }

    /// Runs the menu until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MAIN_MENU}")?;
            let Some(line) = self.prompt("What would you like to do? (1-12) ")? else {
                break;
            };

            let flow = match line.parse::<MenuChoice>() {
                Ok(MenuChoice::Quit) => Flow::Exit,
                Ok(choice) => self.dispatch(choice)?,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    Flow::Continue
                }
            };

            for notice in self.notices.drain() {
                writeln!(self.output, "{notice}")?;
            }

            if let Flow::Exit = flow {
                break;
            }
            writeln!(self.output, "{SEPARATOR}")?;
        }
        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<Flow> {
        match choice {
            MenuChoice::Search => self.search(),
            MenuChoice::AddBook => self.add_book(),
            MenuChoice::RemoveBook => self.remove_book(),
            MenuChoice::LoanBook => self.loan_book(),
            MenuChoice::ReturnBook => self.return_book(),
            MenuChoice::AddPatron => self.add_patron(),
            MenuChoice::RemovePatron => self.remove_patron(),
            MenuChoice::BanPatron => self.ban_patron(),
            MenuChoice::UnbanPatron => self.unban_patron(),
            MenuChoice::ListPatrons => self.list_patrons(),
            MenuChoice::ListBooks => self.list_books(),
            MenuChoice::Quit => Ok(Flow::Exit),
        }
    }

    fn search(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "{SEARCH_MENU}")?;
        let Some(line) = self.prompt("Search by? ")? else {
            return Ok(Flow::Exit);
        };
        let strategy = match parse_search_choice(&line) {
            Ok(strategy) => strategy,
            Err(err) => {
                writeln!(self.output, "{err}")?;
                return Ok(Flow::Continue);
            }
        };
        let Some(text) = self.prompt(&format!("Which {}? ", strategy.as_str()))? else {
            return Ok(Flow::Exit);
        };

        match self.library.search(strategy, &text) {
            Ok(books) if books.is_empty() => writeln!(self.output, "No matching book.")?,
            Ok(books) => {
                for book in &books {
                    writeln!(self.output, "{}", format_book(book))?;
                }
            }
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn add_book(&mut self) -> io::Result<Flow> {
        let Some([title, author, category]) =
            self.prompt_fields(["Title? ", "Author? ", "Category? "])?
        else {
            return Ok(Flow::Exit);
        };
        match self.library.add_book(&NewBook::new(title, author, category)) {
            Ok(book) => writeln!(self.output, "Added `{}` to the catalog.", book.title)?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt("Title? ")? else {
            return Ok(Flow::Exit);
        };
        match self.library.remove_book(&title) {
            Ok(()) => writeln!(self.output, "Removed `{}` from the catalog.", title.trim())?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn loan_book(&mut self) -> io::Result<Flow> {
        match self.library.on_loan_titles() {
            Ok(titles) => {
                writeln!(self.output, "Books currently on loan:")?;
                for title in titles {
                    writeln!(self.output, "  {title}")?;
                }
            }
            Err(err) => writeln!(self.output, "error: {err}")?,
        }

        let Some([title, name, surname]) =
            self.prompt_fields(["Title? ", "Patron name? ", "Patron surname? "])?
        else {
            return Ok(Flow::Exit);
        };
        match self.library.loan(&title, &name, &surname) {
            Ok(book) => writeln!(self.output, "`{}` is now on loan.", book.title)?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn return_book(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt("Title? ")? else {
            return Ok(Flow::Exit);
        };
        match self.library.return_book(&title) {
            Ok(book) => writeln!(self.output, "`{}` has been returned.", book.title)?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn add_patron(&mut self) -> io::Result<Flow> {
        let Some([name, surname]) = self.prompt_fields(["Patron name? ", "Patron surname? "])?
        else {
            return Ok(Flow::Exit);
        };
        match self.library.add_patron(&NewPatron::new(name, surname)) {
            Ok(patron) => writeln!(self.output, "Added patron {}.", format_patron(&patron))?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn remove_patron(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Patron name? ")? else {
            return Ok(Flow::Exit);
        };
        match self.library.remove_patron(&name) {
            Ok(removed) => writeln!(self.output, "Removed {removed} patron(s).")?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn ban_patron(&mut self) -> io::Result<Flow> {
        let Some([name, surname]) = self.prompt_fields(["Patron name? ", "Patron surname? "])?
        else {
            return Ok(Flow::Exit);
        };
        match self.library.ban(&name, &surname) {
            Ok(patron) => writeln!(self.output, "Banned {}.", format_patron(&patron))?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn unban_patron(&mut self) -> io::Result<Flow> {
        let Some([name, surname]) = self.prompt_fields(["Patron name? ", "Patron surname? "])?
        else {
            return Ok(Flow::Exit);
        };
        match self.library.unban(&name, &surname) {
            Ok(patron) => writeln!(self.output, "Unbanned {}.", format_patron(&patron))?,
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn list_patrons(&mut self) -> io::Result<Flow> {
        for (banned, heading) in [(true, "Banned patrons:"), (false, "Active patrons:")] {
            writeln!(self.output, "{heading}")?;
            match self.library.list_patrons(banned) {
                Ok(patrons) => {
                    for patron in &patrons {
                        writeln!(self.output, "  {}", format_patron(patron))?;
                    }
                }
                Err(err) => writeln!(self.output, "error: {err}")?,
            }
        }
        Ok(Flow::Continue)
    }

    fn list_books(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "Books:")?;
        match self.library.list_books() {
            Ok(books) => {
                for book in &books {
                    writeln!(self.output, "{}", format_book(book))?;
                }
            }
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    /// Reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_fields<const N: usize>(
        &mut self,
        labels: [&str; N],
    ) -> io::Result<Option<[String; N]>> {
        let mut values: [String; N] = std::array::from_fn(|_| String::new());
        for (value, label) in values.iter_mut().zip(labels) {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            *value = line;
        }
        Ok(Some(values))
    }
}
