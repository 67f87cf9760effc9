pub mod date;
pub mod goodreads;
