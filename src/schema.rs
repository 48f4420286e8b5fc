// Maintained by hand; keep in sync with migrations/.

diesel::table! {
    harvest_history (id) {
        id -> Int4,
        #[max_length = 255]
        harvester_uuid -> Varchar,
        #[max_length = 255]
        harvester_type -> Varchar,
        #[max_length = 255]
        harvester_name -> Varchar,
        harvest_date -> Timestamptz,
        elapsed_seconds -> Int4,
        info -> Jsonb,
    }
}

diesel::table! {
    metadata (id) {
        id -> Int4,
        uuid -> Uuid,
        change_date -> Timestamptz,
        #[max_length = 1]
        kind -> Varchar,
        #[max_length = 255]
        source_id -> Varchar,
        #[max_length = 255]
        harvester_uuid -> Nullable<Varchar>,
        #[max_length = 1]
        harvested -> Varchar,
    }
}

diesel::table! {
    metadata_identifier_templates (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        template -> Text,
        #[max_length = 1]
        system_provided -> Varchar,
    }
}

diesel::table! {
    metadata_status (metadata_id, user_id, change_date) {
        metadata_id -> Int4,
        user_id -> Int4,
        status_id -> Int4,
        change_date -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    harvest_history,
    metadata,
    metadata_identifier_templates,
    metadata_status,
);
