use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseManager;
use super::models::{
    Client, ClientPatch, NewClient, NewProject, NewReminder, NewUser, Project, ProjectFilter, ProjectPatch,
    ProjectStatus, Reminder, ReminderFilter, ReminderPatch, User,
};
use super::store::{ClientStore, ProjectStore, ReminderStore, Store, StoreError, StoreResult, UserStore};
use crate::config::DatabaseConfig;
use crate::types::Resource;

const USER_COLUMNS: &str = "id, email, password_hash, name, created_at";
const CLIENT_COLUMNS: &str = "id, name, email, phone, company, notes, user_id, created_at";
const PROJECT_COLUMNS: &str = "id, title, budget, deadline, status, client_id, user_id, created_at";
const REMINDER_COLUMNS: &str =
    "id, title, description, due_date, completed, client_id, project_id, user_id, created_at";

/// Postgres-backed store. Each method issues a single statement; no
/// multi-statement transactions are opened.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = DatabaseManager::connect(config).await?;
        if config.run_migrations {
            DatabaseManager::migrate(&pool).await?;
        }
        Ok(Self::new(pool))
    }

    async fn delete_scoped(&self, resource: Resource, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", resource.table());
        let result = sqlx::query(&sql).bind(id).bind(owner).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_scoped(&self, resource: Resource, owner: Uuid) -> StoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", resource.table());
        let (count,): (i64,) = sqlx::query_as(&sql).bind(owner).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, name) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict("Email already registered".to_string())
                } else {
                    StoreError::Sqlx(e)
                }
            })
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn insert_client(&self, owner: Uuid, client: NewClient) -> StoreResult<Client> {
        let sql = format!(
            "INSERT INTO clients (id, name, email, phone, company, notes, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {CLIENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Client>(&sql)
            .bind(Uuid::new_v4())
            .bind(&client.name)
            .bind(&client.email)
            .bind(&client.phone)
            .bind(&client.company)
            .bind(&client.notes)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn clients(&self, owner: Uuid) -> StoreResult<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE user_id = $1 ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, Client>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn client(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn clients_by_ids(&self, owner: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Client>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE user_id = $1 AND id = ANY($2)");
        let rows = sqlx::query_as::<_, Client>(&sql)
            .bind(owner)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_client(&self, owner: Uuid, id: Uuid, patch: ClientPatch) -> StoreResult<Option<Client>> {
        let sql = format!(
            "UPDATE clients SET \
                name = COALESCE($3, name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                company = COALESCE($6, company), \
                notes = COALESCE($7, notes) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {CLIENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .bind(owner)
            .bind(patch.name)
            .bind(patch.email)
            .bind(patch.phone)
            .bind(patch.company)
            .bind(patch.notes)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_client(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        self.delete_scoped(Resource::Client, owner, id).await
    }

    async fn count_clients(&self, owner: Uuid) -> StoreResult<i64> {
        self.count_scoped(Resource::Client, owner).await
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, owner: Uuid, project: NewProject) -> StoreResult<Project> {
        let sql = format!(
            "INSERT INTO projects (id, title, budget, deadline, status, client_id, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PROJECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Project>(&sql)
            .bind(Uuid::new_v4())
            .bind(&project.title)
            .bind(project.budget)
            .bind(project.deadline)
            .bind(project.status)
            .bind(project.client_id)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn projects(&self, owner: Uuid, filter: ProjectFilter) -> StoreResult<Vec<Project>> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE user_id = $1 AND ($2::uuid IS NULL OR client_id = $2) \
             ORDER BY deadline ASC"
        );
        let rows = sqlx::query_as::<_, Project>(&sql)
            .bind(owner)
            .bind(filter.client_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn project(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn projects_by_ids(&self, owner: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Project>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = $1 AND id = ANY($2)");
        let rows = sqlx::query_as::<_, Project>(&sql)
            .bind(owner)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_project(&self, owner: Uuid, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        let sql = format!(
            "UPDATE projects SET \
                title = COALESCE($3, title), \
                budget = COALESCE($4, budget), \
                deadline = COALESCE($5, deadline), \
                status = COALESCE($6, status), \
                client_id = COALESCE($7, client_id) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {PROJECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(owner)
            .bind(patch.title)
            .bind(patch.budget)
            .bind(patch.deadline)
            .bind(patch.status)
            .bind(patch.client_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_project(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        self.delete_scoped(Resource::Project, owner, id).await
    }

    async fn count_projects(&self, owner: Uuid) -> StoreResult<i64> {
        self.count_scoped(Resource::Project, owner).await
    }

    async fn project_status_counts(&self, owner: Uuid) -> StoreResult<Vec<(ProjectStatus, i64)>> {
        let rows = sqlx::query_as::<_, (ProjectStatus, i64)>(
            "SELECT status, COUNT(*) FROM projects WHERE user_id = $1 GROUP BY status",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ReminderStore for PgStore {
    async fn insert_reminder(&self, owner: Uuid, reminder: NewReminder) -> StoreResult<Reminder> {
        let sql = format!(
            "INSERT INTO reminders (id, title, description, due_date, client_id, project_id, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {REMINDER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Reminder>(&sql)
            .bind(Uuid::new_v4())
            .bind(&reminder.title)
            .bind(&reminder.description)
            .bind(reminder.due_date)
            .bind(reminder.client_id)
            .bind(reminder.project_id)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn reminders(&self, owner: Uuid, filter: ReminderFilter) -> StoreResult<Vec<Reminder>> {
        let sql = format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders \
             WHERE user_id = $1 \
               AND ($2::uuid IS NULL OR client_id = $2) \
               AND ($3::uuid IS NULL OR project_id = $3) \
               AND ($4::boolean IS NULL OR completed = $4) \
               AND ($5::timestamptz IS NULL OR due_date >= $5) \
               AND ($6::timestamptz IS NULL OR due_date <= $6) \
             ORDER BY due_date ASC"
        );
        let rows = sqlx::query_as::<_, Reminder>(&sql)
            .bind(owner)
            .bind(filter.client_id)
            .bind(filter.project_id)
            .bind(filter.completed)
            .bind(filter.due_from)
            .bind(filter.due_until)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn reminder(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Reminder>> {
        let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, Reminder>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_reminder(&self, owner: Uuid, id: Uuid, patch: ReminderPatch) -> StoreResult<Option<Reminder>> {
        let sql = format!(
            "UPDATE reminders SET \
                title = COALESCE($3, title), \
                description = COALESCE($4, description), \
                due_date = COALESCE($5, due_date), \
                completed = COALESCE($6, completed), \
                client_id = COALESCE($7, client_id), \
                project_id = COALESCE($8, project_id) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {REMINDER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Reminder>(&sql)
            .bind(id)
            .bind(owner)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.due_date)
            .bind(patch.completed)
            .bind(patch.client_id)
            .bind(patch.project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_reminder(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        self.delete_scoped(Resource::Reminder, owner, id).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Closed database pool");
    }
}
