// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Database schema definitions for the compendium store.

/// Core schema SQL (documents and their child tables)
pub const SCHEMA_SQL: &str = r#"
create table if not exists documents (
    id               text primary key not null,
    name             text,
    type             text,
    document_type    text not null,
    compendium       text,
    img              text,
    folder           text,
    sort             integer not null default 0,
    ownership        text not null default '{}',
    flags            text not null default '{}',
    stats            text not null default '{}',
    created_time     integer,
    modified_time    integer,
    last_modified_by text
);

create table if not exists system_data (
    document_id text not null,
    key         text not null,
    value       text,
    value_type  text not null,
    primary key (document_id, key),
    foreign key (document_id) references documents(id) on delete cascade
);

create table if not exists effects (
    document_id text not null,
    id          text not null,
    name        text,
    data        text not null,
    primary key (document_id, id),
    foreign key (document_id) references documents(id) on delete cascade
);

create table if not exists embedded_items (
    actor_id    text not null,
    id          text not null,
    name        text,
    type        text,
    img         text,
    sort        integer not null default 0,
    system_data text not null default '{}',
    effects     text not null default '[]',
    flags       text not null default '{}',
    primary key (actor_id, id),
    foreign key (actor_id) references documents(id) on delete cascade
);

create table if not exists journal_pages (
    journal_id   text not null,
    id           text not null,
    name         text,
    type         text,
    title        text,
    text_content text,
    text_format  integer,
    sort         integer not null default 0,
    primary key (journal_id, id),
    foreign key (journal_id) references documents(id) on delete cascade
);

create table if not exists table_results (
    table_id    text not null,
    id          text not null,
    type,
    text        text,
    img         text,
    weight      integer not null default 1,
    range_start integer,
    range_end   integer,
    drawn       integer not null default 0,
    flags       text not null default '{}',
    primary key (table_id, id),
    foreign key (table_id) references documents(id) on delete cascade
);
"#;

/// Lookup indexes, built once all packs of an ingest pass are stored
pub const INDEX_SQL: &str = r#"
create index if not exists idx_documents_type on documents(type);
create index if not exists idx_documents_document_type on documents(document_type);
create index if not exists idx_documents_compendium on documents(compendium);
create index if not exists idx_system_data_document_id on system_data(document_id);
create index if not exists idx_system_data_key on system_data(key);
create index if not exists idx_embedded_items_actor_id on embedded_items(actor_id);
"#;

/// Names of the indexes created by [`INDEX_SQL`].
pub const INDEX_NAMES: [&str; 6] = [
    "idx_documents_type",
    "idx_documents_document_type",
    "idx_documents_compendium",
    "idx_system_data_document_id",
    "idx_system_data_key",
    "idx_embedded_items_actor_id",
];

/// Tables of the store, with the column linking each to its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Documents,
    SystemData,
    Effects,
    EmbeddedItems,
    JournalPages,
    TableResults,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Documents,
        Table::SystemData,
        Table::Effects,
        Table::EmbeddedItems,
        Table::JournalPages,
        Table::TableResults,
    ];

    /// Child tables, in the order they are written.
    pub const CHILDREN: [Table; 5] = [
        Table::SystemData,
        Table::Effects,
        Table::EmbeddedItems,
        Table::JournalPages,
        Table::TableResults,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Documents => "documents",
            Table::SystemData => "system_data",
            Table::Effects => "effects",
            Table::EmbeddedItems => "embedded_items",
            Table::JournalPages => "journal_pages",
            Table::TableResults => "table_results",
        }
    }

    /// Column holding the owning document id.
    pub fn document_column(self) -> &'static str {
        match self {
            Table::Documents => "id",
            Table::SystemData | Table::Effects => "document_id",
            Table::EmbeddedItems => "actor_id",
            Table::JournalPages => "journal_id",
            Table::TableResults => "table_id",
        }
    }
}
