//! Diesel schema for task and asset persistence.

diesel::table! {
    /// Task records binding assets to workflow stages.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Asset the task operates on.
        asset_id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Owning workflow.
        workflow_id -> Uuid,
        /// Stage the task currently sits at.
        stage_id -> Uuid,
        /// Task lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Optional assignee identity.
        #[max_length = 255]
        assigned_to -> Nullable<Varchar>,
        /// Optional last-worked-on-by identity.
        #[max_length = 255]
        last_worked_on_by -> Nullable<Varchar>,
        /// Scheduling priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Optional deadline.
        due_date -> Nullable<Timestamptz>,
        /// Optional completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Optional archival timestamp.
        archived_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Asset records with their current storage location.
    assets (id) {
        /// Asset identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Data source currently holding the asset's file.
        current_data_source -> Uuid,
        /// Asset filename.
        #[max_length = 1024]
        filename -> Varchar,
        /// Asset lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, assets);
