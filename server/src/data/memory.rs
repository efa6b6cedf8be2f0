//! In-memory repositories for service and router tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::data::error::DataError;
use crate::data::filters::{SortDirection, SortSpec, columns};
use crate::data::traits::{BookRepository, UserRepository};
use crate::data::types::{
    BookChanges, BookFilters, BookRow, NewBook, NewUser, UserChanges, UserFilters, UserRow,
    UserStatus,
};
use crate::domain::credential::{Credential, RawCredential};

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    books: Vec<BookRow>,
    /// Raw password column values that override the stored credential
    raw_passwords: HashMap<Uuid, String>,
}

impl Tables {
    /// Credential lookup result, decoding raw column values like the driver does
    fn credentials(&self, row: Option<&UserRow>) -> Result<UserRow, DataError> {
        let row = row.ok_or_else(|| DataError::not_found("user"))?;
        let mut row = row.clone();
        if let Some(raw) = self.raw_passwords.get(&row.id) {
            row.password = Credential::from_storage(RawCredential::Text(raw)).map_err(|e| {
                DataError::Postgres(sqlx::Error::ColumnDecode {
                    index: "\"password\"".to_string(),
                    source: Box::new(e),
                })
            })?;
        }
        Ok(row)
    }
}

/// Both repositories over shared tables, so the author reference and the
/// cascade on user deletion behave like the real schema
#[derive(Default, Clone)]
pub struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a user into a status, bypassing the service rules
    pub async fn set_user_status(&self, id: Uuid, status: UserStatus) {
        let mut tables = self.tables.lock().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.status = status;
        }
    }

    /// Overwrite the password column with a raw value
    pub async fn set_stored_password(&self, id: Uuid, raw: &str) {
        self.tables
            .lock()
            .await
            .raw_passwords
            .insert(id, raw.to_string());
    }

    pub async fn book_count(&self) -> usize {
        self.tables.lock().await.books.len()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T>(rows: Vec<T>, limit: Option<u32>, offset: Option<u32>) -> Vec<T> {
    let offset = offset.unwrap_or(0) as usize;
    let limit = limit.filter(|l| *l > 0).map_or(usize::MAX, |l| l as usize);
    rows.into_iter().skip(offset).take(limit).collect()
}

fn search_term(search: &Option<String>) -> Option<&str> {
    search.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

fn parse_sort(
    raw: &Option<String>,
    allowed: &'static [&'static str],
) -> Result<Option<SortSpec>, DataError> {
    match raw.as_deref().filter(|r| !r.trim().is_empty()) {
        Some(raw) => Ok(Some(SortSpec::parse(raw, allowed)?)),
        None => Ok(None),
    }
}

fn without_password(mut user: UserRow) -> UserRow {
    user.password = Credential::Absent;
    user
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn filter_users(&self, filters: &UserFilters) -> Result<Vec<UserRow>, DataError> {
        let sort = parse_sort(&filters.order_by, columns::USER_SORTABLE)?;
        let tables = self.tables.lock().await;
        let term = search_term(&filters.search);

        let mut rows: Vec<UserRow> = tables
            .users
            .iter()
            .filter(|u| filters.user_id.is_none_or(|id| id.is_nil() || u.id == id))
            .filter(|u| filters.status.is_none_or(|s| u.status == s))
            .filter(|u| {
                term.is_none_or(|t| contains_ci(&u.username, t) || contains_ci(&u.nickname, t))
            })
            .cloned()
            .map(without_password)
            .collect();

        if let Some(sort) = sort {
            rows.sort_by(|a, b| {
                let ord = match sort.column {
                    "username" => a.username.cmp(&b.username),
                    "nickname" => a.nickname.cmp(&b.nickname),
                    "status" => (a.status as i16).cmp(&(b.status as i16)),
                    "updated_at" => a.updated_at.cmp(&b.updated_at),
                    _ => a.created_at.cmp(&b.created_at),
                };
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        Ok(paginate(rows, filters.limit, filters.offset))
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRow, DataError> {
        let mut tables = self.tables.lock().await;
        let email = user.email.to_lowercase();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DataError::Conflict("users_username_key already in use".into()));
        }
        if tables.users.iter().any(|u| u.email == email) {
            return Err(DataError::Conflict("users_email_key already in use".into()));
        }

        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            email,
            bio: user.bio.clone(),
            password: user.password.clone(),
            status: user.status,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(without_password(row))
    }

    async fn get_credentials_by_username(
        &self,
        username: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError> {
        let tables = self.tables.lock().await;
        tables.credentials(
            tables
                .users
                .iter()
                .find(|u| u.username == username && u.status == status),
        )
    }

    async fn get_credentials_by_email(
        &self,
        email: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError> {
        let email = email.to_lowercase();
        let tables = self.tables.lock().await;
        tables.credentials(
            tables
                .users
                .iter()
                .find(|u| u.email == email && u.status == status),
        )
    }

    async fn get_user_by_username(
        &self,
        username: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError> {
        self.get_credentials_by_username(username, status)
            .await
            .map(without_password)
    }

    async fn get_user(&self, id: Uuid, status: UserStatus) -> Result<UserRow, DataError> {
        let tables = self.tables.lock().await;
        tables
            .users
            .iter()
            .find(|u| u.id == id && u.status == status)
            .cloned()
            .map(without_password)
            .ok_or_else(|| DataError::not_found("user"))
    }

    async fn update_user(
        &self,
        id: Uuid,
        status: UserStatus,
        changes: &UserChanges,
    ) -> Result<UserRow, DataError> {
        let mut tables = self.tables.lock().await;
        let others = || tables.users.iter().filter(move |u| u.id != id);
        if let Some(username) = &changes.username
            && others().any(|u| &u.username == username)
        {
            return Err(DataError::Conflict("users_username_key already in use".into()));
        }
        if let Some(email) = &changes.email
            && others().any(|u| u.email == email.to_lowercase())
        {
            return Err(DataError::Conflict("users_email_key already in use".into()));
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id && u.status == status)
            .ok_or_else(|| DataError::not_found("user"))?;
        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(nickname) = &changes.nickname {
            user.nickname = nickname.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.to_lowercase();
        }
        if let Some(bio) = &changes.bio {
            user.bio = bio.clone();
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        user.updated_at = Utc::now();
        Ok(without_password(user.clone()))
    }

    async fn delete_user(&self, id: Uuid, status: UserStatus) -> Result<UserRow, DataError> {
        let mut tables = self.tables.lock().await;
        let index = tables
            .users
            .iter()
            .position(|u| u.id == id && u.status == status)
            .ok_or_else(|| DataError::not_found("user"))?;
        let removed = tables.users.remove(index);
        tables.books.retain(|b| b.author_id != id);
        Ok(without_password(removed))
    }
}

#[async_trait]
impl BookRepository for MemoryRepository {
    async fn filter_books(&self, filters: &BookFilters) -> Result<Vec<BookRow>, DataError> {
        let sort = parse_sort(&filters.order_by, columns::BOOK_SORTABLE)?;
        let tables = self.tables.lock().await;
        let term = search_term(&filters.search);

        let mut rows: Vec<BookRow> = tables
            .books
            .iter()
            .filter(|b| filters.book_id.is_none_or(|id| id.is_nil() || b.id == id))
            .filter(|b| filters.author_id.is_none_or(|id| id.is_nil() || b.author_id == id))
            .filter(|b| filters.status.is_none_or(|s| b.status == s))
            .filter(|b| {
                term.is_none_or(|t| contains_ci(&b.title, t) || contains_ci(&b.description, t))
            })
            .cloned()
            .collect();

        if let Some(sort) = sort {
            rows.sort_by(|a, b| {
                let ord = match sort.column {
                    "title" => a.title.cmp(&b.title),
                    "status" => (a.status as i16).cmp(&(b.status as i16)),
                    "updated_at" => a.updated_at.cmp(&b.updated_at),
                    _ => a.created_at.cmp(&b.created_at),
                };
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        Ok(paginate(rows, filters.limit, filters.offset))
    }

    async fn create_book(&self, book: &NewBook) -> Result<BookRow, DataError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == book.author_id) {
            return Err(DataError::does_not_exist("user"));
        }
        let now = Utc::now();
        let row = BookRow {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            description: book.description.clone(),
            author_id: book.author_id,
            book_path: String::new(),
            cover_path: String::new(),
            status: book.status,
            created_at: now,
            updated_at: now,
        };
        tables.books.push(row.clone());
        Ok(row)
    }

    async fn get_book(&self, id: Uuid) -> Result<BookRow, DataError> {
        let tables = self.tables.lock().await;
        tables
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| DataError::not_found("book"))
    }

    async fn update_book(&self, id: Uuid, changes: &BookChanges) -> Result<BookRow, DataError> {
        let mut tables = self.tables.lock().await;
        if let Some(author_id) = changes.author_id
            && !tables.users.iter().any(|u| u.id == author_id)
        {
            return Err(DataError::does_not_exist("user"));
        }
        let book = tables
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| DataError::not_found("book"))?;
        if let Some(title) = &changes.title {
            book.title = title.clone();
        }
        if let Some(description) = &changes.description {
            book.description = description.clone();
        }
        if let Some(author_id) = changes.author_id {
            book.author_id = author_id;
        }
        if let Some(book_path) = &changes.book_path {
            book.book_path = book_path.clone();
        }
        if let Some(cover_path) = &changes.cover_path {
            book.cover_path = cover_path.clone();
        }
        if let Some(status) = changes.status {
            book.status = status;
        }
        book.updated_at = Utc::now();
        Ok(book.clone())
    }

    async fn delete_book(&self, id: Uuid) -> Result<BookRow, DataError> {
        let mut tables = self.tables.lock().await;
        let index = tables
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| DataError::not_found("book"))?;
        Ok(tables.books.remove(index))
    }
}
