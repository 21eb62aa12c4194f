//! Diesel schema for workflow graph persistence.

diesel::table! {
    /// Workflow stage records.
    workflow_stages (id) {
        /// Stage identifier.
        id -> Uuid,
        /// Owning workflow identifier.
        workflow_id -> Uuid,
        /// Stage display name.
        #[max_length = 255]
        name -> Varchar,
        /// Kind of work performed at the stage.
        #[max_length = 50]
        stage_type -> Varchar,
        /// Display-order position within the workflow.
        order_index -> Int4,
        /// Whether the stage is the workflow entry point.
        is_initial -> Bool,
        /// Whether the stage is a workflow exit point.
        is_final -> Bool,
        /// Optional bound data source.
        data_source_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Directed connections between workflow stages.
    stage_connections (id) {
        /// Connection identifier.
        id -> Uuid,
        /// Owning workflow identifier.
        workflow_id -> Uuid,
        /// Source stage of the edge.
        from_stage -> Uuid,
        /// Destination stage of the edge.
        to_stage -> Uuid,
        /// Optional branch-selection condition.
        #[max_length = 255]
        condition -> Nullable<Varchar>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(workflow_stages, stage_connections);
