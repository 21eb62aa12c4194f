//! `PostgreSQL` repository implementation for workflow graph storage.

use super::{
    models::{ConnectionRow, NewConnectionRow, NewStageRow, StageRow},
    schema::{stage_connections, workflow_stages},
};
use crate::workflow::{
    domain::{
        ConnectionId, DataSourceId, PersistedConnectionData, PersistedStageData, StageId,
        StageType, WorkflowId, WorkflowStage, WorkflowStageConnection,
    },
    ports::{
        WorkflowStageRepository, WorkflowStageRepositoryError, WorkflowStageRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by workflow adapters.
pub type WorkflowPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed workflow stage repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkflowStageRepository {
    pool: WorkflowPgPool,
}

impl PostgresWorkflowStageRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkflowStageRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkflowStageRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(WorkflowStageRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkflowStageRepositoryError::persistence)?
    }
}

#[async_trait]
impl WorkflowStageRepository for PostgresWorkflowStageRepository {
    async fn store_stage(&self, stage: &WorkflowStage) -> WorkflowStageRepositoryResult<()> {
        let stage_id = stage.id();
        let new_row = to_new_stage_row(stage)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(workflow_stages::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkflowStageRepositoryError::DuplicateStage(stage_id)
                    }
                    _ => WorkflowStageRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn store_connection(
        &self,
        connection: &WorkflowStageConnection,
    ) -> WorkflowStageRepositoryResult<()> {
        let connection_id = connection.id();
        let new_row = NewConnectionRow {
            id: connection.id().into_inner(),
            workflow_id: connection.workflow_id().into_inner(),
            from_stage: connection.from_stage().into_inner(),
            to_stage: connection.to_stage().into_inner(),
            condition: connection.condition().map(str::to_owned),
        };

        self.run_blocking(move |db_connection| {
            diesel::insert_into(stage_connections::table)
                .values(&new_row)
                .execute(db_connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkflowStageRepositoryError::DuplicateConnection(connection_id)
                    }
                    _ => WorkflowStageRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: StageId,
    ) -> WorkflowStageRepositoryResult<Option<WorkflowStage>> {
        self.run_blocking(move |connection| {
            let row = workflow_stages::table
                .filter(workflow_stages::id.eq(id.into_inner()))
                .select(StageRow::as_select())
                .first::<StageRow>(connection)
                .optional()
                .map_err(WorkflowStageRepositoryError::persistence)?;
            row.map(row_to_stage).transpose()
        })
        .await
    }

    async fn list_by_workflow(
        &self,
        workflow_id: WorkflowId,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStage>> {
        self.run_blocking(move |connection| {
            let rows = workflow_stages::table
                .filter(workflow_stages::workflow_id.eq(workflow_id.into_inner()))
                .order(workflow_stages::order_index.asc())
                .select(StageRow::as_select())
                .load::<StageRow>(connection)
                .map_err(WorkflowStageRepositoryError::persistence)?;
            rows.into_iter().map(row_to_stage).collect()
        })
        .await
    }

    async fn outgoing_connections(
        &self,
        stage_id: StageId,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStageConnection>> {
        self.run_blocking(move |connection| {
            let rows = stage_connections::table
                .filter(stage_connections::from_stage.eq(stage_id.into_inner()))
                .select(ConnectionRow::as_select())
                .load::<ConnectionRow>(connection)
                .map_err(WorkflowStageRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_connection).collect())
        })
        .await
    }
}

fn to_new_stage_row(stage: &WorkflowStage) -> WorkflowStageRepositoryResult<NewStageRow> {
    let order_index = i32::try_from(stage.order_index())
        .map_err(WorkflowStageRepositoryError::persistence)?;
    Ok(NewStageRow {
        id: stage.id().into_inner(),
        workflow_id: stage.workflow_id().into_inner(),
        name: stage.name().to_owned(),
        stage_type: stage.stage_type().as_str().to_owned(),
        order_index,
        is_initial: stage.is_initial(),
        is_final: stage.is_final(),
        data_source_id: stage.data_source().map(DataSourceId::into_inner),
    })
}

fn row_to_stage(row: StageRow) -> WorkflowStageRepositoryResult<WorkflowStage> {
    let stage_type = StageType::try_from(row.stage_type.as_str())
        .map_err(WorkflowStageRepositoryError::persistence)?;
    let order_index =
        u32::try_from(row.order_index).map_err(WorkflowStageRepositoryError::persistence)?;
    Ok(WorkflowStage::from_persisted(PersistedStageData {
        id: StageId::from_uuid(row.id),
        workflow_id: WorkflowId::from_uuid(row.workflow_id),
        name: row.name,
        stage_type,
        order_index,
        is_initial: row.is_initial,
        is_final: row.is_final,
        data_source: row.data_source_id.map(DataSourceId::from_uuid),
    }))
}

fn row_to_connection(row: ConnectionRow) -> WorkflowStageConnection {
    WorkflowStageConnection::from_persisted(PersistedConnectionData {
        id: ConnectionId::from_uuid(row.id),
        workflow_id: WorkflowId::from_uuid(row.workflow_id),
        from_stage: StageId::from_uuid(row.from_stage),
        to_stage: StageId::from_uuid(row.to_stage),
        condition: row.condition,
    })
}
