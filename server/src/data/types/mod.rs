//! Shared data types for the repository layer

mod enums;
mod transactional;

pub use enums::{BookStatus, UserStatus};

pub use transactional::{
    BookChanges, BookFilters, BookRow, NewBook, NewUser, UserChanges, UserFilters, UserRow,
};
