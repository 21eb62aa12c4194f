//! `PostgreSQL` repository implementations for task and asset storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        AssetId, PersistedTaskData, ProjectId, Task, TaskId, TaskPriority, TaskStatus, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::workflow::domain::{StageId, WorkflowId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use mockable::Clock;
use std::sync::Arc;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Clone)]
pub struct PostgresTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    pool: TaskPgPool,
    clock: Arc<C>,
}

impl<C> PostgresTaskRepository<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl<C> TaskRepository for PostgresTaskRepository<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(affected > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_asset_and_stage(
        &self,
        asset_id: AssetId,
        stage_id: StageId,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::asset_id.eq(asset_id.into_inner()))
                .filter(tasks::stage_id.eq(stage_id.into_inner()))
                .order(tasks::updated_at.desc())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_asset(&self, asset_id: AssetId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::asset_id.eq(asset_id.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        acting_user: &UserId,
    ) -> TaskRepositoryResult<Task> {
        let user = acting_user.clone();
        let clock = Arc::clone(&self.clock);
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .ok_or(TaskRepositoryError::NotFound(id))?;

            let mut task = row_to_task(row)?;
            task.apply_status(status, &user, &*clock);

            diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .set((
                    tasks::status.eq(task.status().as_str().to_owned()),
                    tasks::last_worked_on_by
                        .eq(task.last_worked_on_by().map(|u| u.as_str().to_owned())),
                    tasks::completed_at.eq(task.completed_at()),
                    tasks::archived_at.eq(task.archived_at()),
                    tasks::updated_at.eq(task.updated_at()),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;

            Ok(task)
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        asset_id: task.asset_id().into_inner(),
        project_id: task.project_id().into_inner(),
        workflow_id: task.workflow_id().into_inner(),
        stage_id: task.stage_id().into_inner(),
        status: task.status().as_str().to_owned(),
        assigned_to: task.assigned_to().map(|u| u.as_str().to_owned()),
        last_worked_on_by: task.last_worked_on_by().map(|u| u.as_str().to_owned()),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
        archived_at: task.archived_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status = TaskStatus::try_from(row.status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(row.priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let assigned_to = row
        .assigned_to
        .map(UserId::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let last_worked_on_by = row
        .last_worked_on_by
        .map(UserId::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        asset_id: AssetId::from_uuid(row.asset_id),
        project_id: ProjectId::from_uuid(row.project_id),
        workflow_id: WorkflowId::from_uuid(row.workflow_id),
        stage_id: StageId::from_uuid(row.stage_id),
        status,
        assigned_to,
        last_worked_on_by,
        priority,
        due_date: row.due_date,
        completed_at: row.completed_at,
        archived_at: row.archived_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
