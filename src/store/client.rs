use deadpool_postgres::Pool;
use serde_json::Value;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::store::{
    connection::StoreConfig,
    error::{Error, Result},
    seed,
    types::{
        AssistantMode, ChatContext, ChatMessage, ChatRoom, HealthData, LlmProvider, MessageRole,
        Session, User,
    },
};

/// Partial update for a health-data record; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct HealthDataPatch {
    pub data_type: Option<String>,
    pub data: Option<Value>,
}

/// Maximum characters of an assistant reply used as the room display name
const ROOM_NAME_LIMIT: usize = 50;

/// Persistence gateway over the Postgres pool.
///
/// Multi-step operations (registration, the chat append-and-read, the chat
/// finalize) run inside a single database transaction each.
#[derive(Clone)]
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Create a new store from configuration and verify connectivity
    pub async fn new(config: StoreConfig) -> Result<Self> {
        let pool = config.build_pool()?;

        // Test the connection
        let _conn = pool.get().await?;

        Ok(Self { pool })
    }

    /// Execute the DDL in `sql/schema.sql`. Idempotent; used by tests and
    /// dev bootstrap.
    pub async fn apply_schema(&self) -> Result<()> {
        let conn = self.pool.get().await?;
        conn.batch_execute(include_str!("../../sql/schema.sql"))
            .await
            .map_err(|e| Error::Database(format!("schema apply failed: {:?}", e)))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users & sessions
    // ------------------------------------------------------------------

    /// Create a user together with its seeded assistant modes and provider
    /// slots, all-or-nothing.
    ///
    /// A duplicate username surfaces as `Error::Conflict`, either from the
    /// caller's pre-check or from the unique index when two registrations
    /// race.
    pub async fn create_user_with_seeds(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User> {
        let mut conn = self.pool.get().await?;
        let tx = conn.transaction().await?;

        let row = tx
            .query_one(
                "INSERT INTO users (id, username, password_hash, has_onboarded)
                 VALUES ($1, $2, $3, FALSE)
                 RETURNING id, username, password_hash, has_onboarded, created_at",
                &[&Uuid::new_v4(), &username, &password_hash],
            )
            .await?;
        let user = user_from_row(&row);

        for mode in seed::ASSISTANT_MODES {
            tx.execute(
                "INSERT INTO assistant_modes
                     (id, author_id, name, description, system_prompt, visibility)
                 VALUES ($1, $2, $3, $4, $5, 'PRIVATE')",
                &[
                    &Uuid::new_v4(),
                    &user.id,
                    &mode.name,
                    &mode.description,
                    &mode.system_prompt,
                ],
            )
            .await?;
        }

        for provider in seed::LLM_PROVIDERS {
            tx.execute(
                "INSERT INTO llm_providers
                     (id, author_id, provider_id, name, api_key, api_url, rank)
                 VALUES ($1, $2, $3, $4, '', $5, $6)",
                &[
                    &Uuid::new_v4(),
                    &user.id,
                    &provider.provider_id,
                    &provider.name,
                    &provider.api_url,
                    &provider.rank,
                ],
            )
            .await?;
        }

        tx.commit().await?;
        Ok(user)
    }

    /// Look up a user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "SELECT id, username, password_hash, has_onboarded, created_at
                 FROM users WHERE username = $1",
                &[&username],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// Issue a new session token for a user
    pub async fn create_session(&self, user_id: Uuid) -> Result<Session> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_one(
                "INSERT INTO sessions (token, user_id)
                 VALUES ($1, $2)
                 RETURNING token, user_id, created_at",
                &[&Uuid::new_v4(), &user_id],
            )
            .await?;
        Ok(session_from_row(&row))
    }

    /// Resolve a session token; `None` means the caller is unauthenticated
    pub async fn find_session(&self, token: Uuid) -> Result<Option<Session>> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "SELECT token, user_id, created_at FROM sessions WHERE token = $1",
                &[&token],
            )
            .await?;
        Ok(row.as_ref().map(session_from_row))
    }

    // ------------------------------------------------------------------
    // Chat rooms & messages
    // ------------------------------------------------------------------

    /// Create a chat room bound to one of the user's assistant modes.
    ///
    /// When no mode id is given the user's first seeded mode is used.
    pub async fn create_chat_room(
        &self,
        user_id: Uuid,
        name: &str,
        assistant_mode_id: Option<Uuid>,
    ) -> Result<ChatRoom> {
        let conn = self.pool.get().await?;

        let mode_id = match assistant_mode_id {
            Some(id) => id,
            None => {
                let row = conn
                    .query_opt(
                        "SELECT id FROM assistant_modes
                         WHERE author_id = $1 ORDER BY name LIMIT 1",
                        &[&user_id],
                    )
                    .await?
                    .ok_or_else(|| {
                        Error::NotFound(format!("no assistant modes for user {}", user_id))
                    })?;
                row.get(0)
            }
        };

        let row = conn
            .query_one(
                "INSERT INTO chat_rooms (id, author_id, name, assistant_mode_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, author_id, name, assistant_mode_id,
                           llm_provider_id, llm_provider_model_id, last_activity_at",
                &[&Uuid::new_v4(), &user_id, &name, &mode_id],
            )
            .await?;
        Ok(chat_room_from_row(&row))
    }

    /// List a user's chat rooms, most recently active first
    pub async fn list_chat_rooms(&self, user_id: Uuid) -> Result<Vec<ChatRoom>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "SELECT id, author_id, name, assistant_mode_id,
                        llm_provider_id, llm_provider_model_id, last_activity_at
                 FROM chat_rooms
                 WHERE author_id = $1
                 ORDER BY last_activity_at DESC",
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(chat_room_from_row).collect())
    }

    /// Full message history for a room, ascending by creation time
    pub async fn list_chat_messages(&self, room_id: Uuid) -> Result<Vec<ChatMessage>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "SELECT id, content, created_at, role
                 FROM chat_messages
                 WHERE chat_room_id = $1
                 ORDER BY created_at ASC",
                &[&room_id],
            )
            .await?;
        rows.iter().map(chat_message_from_row).collect()
    }

    /// The append-and-read transaction of the chat flow.
    ///
    /// Atomically: touch the room's `last_activity_at` (an unknown room id
    /// fails with `Error::NotFound` before anything is written), insert the
    /// incoming message, then read back the assistant-mode system prompt,
    /// the full ordered history and the author's health-data records.
    ///
    /// Two concurrent sends to the same room are not serialized beyond this
    /// transaction's own atomicity; each may read a history that excludes
    /// the other's reply.
    pub async fn begin_exchange(
        &self,
        room_id: Uuid,
        user_id: Uuid,
        content: &str,
        role: MessageRole,
    ) -> Result<ChatContext> {
        let mut conn = self.pool.get().await?;
        let tx = conn.transaction().await?;

        let room_row = tx
            .query_opt(
                "UPDATE chat_rooms SET last_activity_at = now()
                 WHERE id = $1
                 RETURNING id, author_id, name, assistant_mode_id,
                           llm_provider_id, llm_provider_model_id, last_activity_at",
                &[&room_id],
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("chat room {}", room_id)))?;
        let room = chat_room_from_row(&room_row);

        tx.execute(
            "INSERT INTO chat_messages (id, chat_room_id, content, role)
             VALUES ($1, $2, $3, $4)",
            &[&Uuid::new_v4(), &room_id, &content, &role.as_str()],
        )
        .await?;

        let prompt_row = tx
            .query_one(
                "SELECT system_prompt FROM assistant_modes WHERE id = $1",
                &[&room.assistant_mode_id],
            )
            .await?;
        let system_prompt: String = prompt_row.get(0);

        let history = tx
            .query(
                "SELECT id, content, created_at, role
                 FROM chat_messages
                 WHERE chat_room_id = $1
                 ORDER BY created_at ASC",
                &[&room_id],
            )
            .await?
            .iter()
            .map(chat_message_from_row)
            .collect::<Result<Vec<_>>>()?;

        let health_data = tx
            .query(
                "SELECT id, type, data FROM health_data WHERE author_id = $1",
                &[&user_id],
            )
            .await?
            .iter()
            .map(health_data_from_row)
            .collect::<Vec<_>>();

        tx.commit().await?;

        Ok(ChatContext {
            room,
            system_prompt,
            history,
            health_data,
        })
    }

    /// Persist a substituted default model id back onto the room
    pub async fn set_room_model(&self, room_id: Uuid, model: &str) -> Result<()> {
        let conn = self.pool.get().await?;
        let updated = conn
            .execute(
                "UPDATE chat_rooms SET llm_provider_model_id = $2 WHERE id = $1",
                &[&room_id, &model],
            )
            .await?;
        if updated == 0 {
            return Err(Error::NotFound(format!("chat room {}", room_id)));
        }
        Ok(())
    }

    /// The finalize transaction of the chat flow: insert the assistant's
    /// message and refresh the room's activity timestamp and display name
    /// (first 50 characters of the reply).
    pub async fn finalize_exchange(&self, room_id: Uuid, full_text: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let tx = conn.transaction().await?;

        tx.execute(
            "INSERT INTO chat_messages (id, chat_room_id, content, role)
             VALUES ($1, $2, $3, $4)",
            &[
                &Uuid::new_v4(),
                &room_id,
                &full_text,
                &MessageRole::Assistant.as_str(),
            ],
        )
        .await?;

        tx.execute(
            "UPDATE chat_rooms SET last_activity_at = now(), name = $2 WHERE id = $1",
            &[&room_id, &room_name_from_reply(full_text)],
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Fetch a single chat room
    pub async fn get_chat_room(&self, room_id: Uuid) -> Result<ChatRoom> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "SELECT id, author_id, name, assistant_mode_id,
                        llm_provider_id, llm_provider_model_id, last_activity_at
                 FROM chat_rooms WHERE id = $1",
                &[&room_id],
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("chat room {}", room_id)))?;
        Ok(chat_room_from_row(&row))
    }

    // ------------------------------------------------------------------
    // LLM providers
    // ------------------------------------------------------------------

    /// A user's provider slots ordered by stored rank
    pub async fn list_llm_providers(&self, user_id: Uuid) -> Result<Vec<LlmProvider>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "SELECT id, provider_id, name, api_key, api_url, rank
                 FROM llm_providers
                 WHERE author_id = $1
                 ORDER BY rank ASC",
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(llm_provider_from_row).collect())
    }

    /// A user's assistant modes
    pub async fn list_assistant_modes(&self, user_id: Uuid) -> Result<Vec<AssistantMode>> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "SELECT id, name, description, system_prompt, visibility
                 FROM assistant_modes
                 WHERE author_id = $1
                 ORDER BY name ASC",
                &[&user_id],
            )
            .await?;
        Ok(rows.iter().map(assistant_mode_from_row).collect())
    }

    // ------------------------------------------------------------------
    // Health data
    // ------------------------------------------------------------------

    /// Insert a health-data record for a user
    pub async fn create_health_data(
        &self,
        user_id: Uuid,
        data_type: &str,
        data: &Value,
    ) -> Result<HealthData> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_one(
                "INSERT INTO health_data (id, author_id, type, data)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, type, data",
                &[&Uuid::new_v4(), &user_id, &data_type, data],
            )
            .await?;
        Ok(health_data_from_row(&row))
    }

    /// Fetch a record by id, `Error::NotFound` when absent
    pub async fn get_health_data(&self, id: Uuid) -> Result<HealthData> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "SELECT id, type, data FROM health_data WHERE id = $1",
                &[&id],
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("health data {}", id)))?;
        Ok(health_data_from_row(&row))
    }

    /// Partial update: only the supplied fields change
    pub async fn update_health_data(&self, id: Uuid, patch: HealthDataPatch) -> Result<HealthData> {
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt(
                "UPDATE health_data
                 SET type = COALESCE($2, type),
                     data = COALESCE($3, data)
                 WHERE id = $1
                 RETURNING id, type, data",
                &[&id, &patch.data_type, &patch.data],
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("health data {}", id)))?;
        Ok(health_data_from_row(&row))
    }

    /// Delete a record, `Error::NotFound` when absent
    pub async fn delete_health_data(&self, id: Uuid) -> Result<()> {
        let conn = self.pool.get().await?;
        let deleted = conn
            .execute("DELETE FROM health_data WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("health data {}", id)));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Row mapping
// ----------------------------------------------------------------------

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        has_onboarded: row.get("has_onboarded"),
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &Row) -> Session {
    Session {
        token: row.get("token"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    }
}

fn chat_room_from_row(row: &Row) -> ChatRoom {
    ChatRoom {
        id: row.get("id"),
        author_id: row.get("author_id"),
        name: row.get("name"),
        assistant_mode_id: row.get("assistant_mode_id"),
        llm_provider_id: row.get("llm_provider_id"),
        llm_provider_model_id: row.get("llm_provider_model_id"),
        last_activity_at: row.get("last_activity_at"),
    }
}

fn chat_message_from_row(row: &Row) -> Result<ChatMessage> {
    let role_text: String = row.get("role");
    let role = MessageRole::parse(&role_text)
        .ok_or_else(|| Error::Database(format!("unknown message role '{}'", role_text)))?;
    Ok(ChatMessage {
        id: row.get("id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        role,
    })
}

fn assistant_mode_from_row(row: &Row) -> AssistantMode {
    AssistantMode {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        system_prompt: row.get("system_prompt"),
        visibility: row.get("visibility"),
    }
}

fn llm_provider_from_row(row: &Row) -> LlmProvider {
    LlmProvider {
        id: row.get("id"),
        provider_id: row.get("provider_id"),
        name: row.get("name"),
        api_key: row.get("api_key"),
        api_url: row.get("api_url"),
        rank: row.get("rank"),
    }
}

fn health_data_from_row(row: &Row) -> HealthData {
    HealthData {
        id: row.get("id"),
        data_type: row.get("type"),
        data: row.get("data"),
    }
}

/// Derive the room display name from the first characters of a reply,
/// respecting char boundaries
fn room_name_from_reply(full_text: &str) -> String {
    full_text.chars().take(ROOM_NAME_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_name_from_reply_short() {
        assert_eq!(room_name_from_reply("Hi there"), "Hi there");
    }

    #[test]
    fn test_room_name_from_reply_truncates_at_50_chars() {
        let reply = "x".repeat(120);
        let name = room_name_from_reply(&reply);
        assert_eq!(name.chars().count(), 50);
        assert!(reply.starts_with(&name));
    }

    #[test]
    fn test_room_name_from_reply_multibyte() {
        let reply = "ß".repeat(60);
        let name = room_name_from_reply(&reply);
        assert_eq!(name.chars().count(), 50);
    }

    #[test]
    fn test_health_data_patch_default_changes_nothing() {
        let patch = HealthDataPatch::default();
        assert!(patch.data_type.is_none());
        assert!(patch.data.is_none());
    }
}
