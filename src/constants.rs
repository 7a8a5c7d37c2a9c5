pub mod auth {
    pub const DEFAULT_AUTH_ENDPOINT: &str = "/authentication";
    pub const DEFAULT_LANGUAGE: &str = "en";
    pub const LANGUAGES: &[&str] = &["en", "nl", "es", "fr"];
}

pub mod api {
    pub const API_SUBDOMAIN: &str = "api";
    pub const DEFAULT_SCHEME: &str = "https://";
    pub const OBJECT_ID_LENGTH: usize = 24;
    pub const LEGACY_ASSIGNMENT_PREFIX: &str = "[0].json.";
    pub const MUTATING_METHODS: &[&str] = &["POST", "PUT", "PATCH"];
}

pub mod pagination {
    pub const DEFAULT_LIMIT: u64 = 50;
    pub const DEFAULT_SKIP: u64 = 0;
    pub const DEFAULT_SORT_ORDER: i64 = 1;
    pub const FORM_SORT_FIELD: &str = "updatedAt";
    pub const FORM_SORT_ORDER: i64 = -1;
}

pub mod task {
    pub const TIMEZONE: &str = "Europe/Amsterdam";
    pub const DEFAULT_ORGCHART_ROOT: &str = "root0001";
    pub const DEFINE_FIELDS: &str = "fields";
    pub const DEFINE_JSON: &str = "json";
}

pub mod storage {
    pub const SIGN_TYPE: &str = "getObject";
    pub const ORIGINS: &[&str] = &[
        "contentAttachment",
        "contentTemplateAttachment",
        "contentVideo",
        "externalAttachment",
        "formValuesAttachment",
        "formValuesVideo",
        "lessonAttachment",
        "taskAttachment",
        "taskFormAnswer",
        "tasktemplateAttachment",
        "tasktemplateVideo",
    ];
}

pub mod limits {
    pub const LOG_SUBSTRING_LENGTH: usize = 512;
    pub const SUGGESTION_LIMIT: usize = 5;
}
